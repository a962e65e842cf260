// Enqueue Use Case - request type and validation

use crate::domain::error::{DomainError, Result};
use crate::domain::{BarberId, BarberRoster, ServiceCatalog, ServiceId};
use serde::{Deserialize, Serialize};

/// Maximum client name length (characters)
pub const MAX_CLIENT_NAME_LEN: usize = 80;

/// Join-queue request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnqueueRequest {
    pub client_name: String,

    #[serde(default)]
    pub client_phone: Option<String>,

    pub barber_id: BarberId,
    pub service_id: ServiceId,
}

impl EnqueueRequest {
    pub fn new(client_name: impl Into<String>, barber_id: BarberId, service_id: impl Into<ServiceId>) -> Self {
        Self {
            client_name: client_name.into(),
            client_phone: None,
            barber_id,
            service_id: service_id.into(),
        }
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.client_phone = Some(phone.into());
        self
    }
}

/// Validate a request against the catalog and roster
///
/// Returns the normalized request: trimmed name, blank phone dropped.
///
/// # Errors
/// - `DomainError::Validation` for an empty or overlong name, an unknown or
///   inactive barber, or an unknown service
pub fn validate_request(
    req: EnqueueRequest,
    catalog: &ServiceCatalog,
    roster: &BarberRoster,
) -> Result<EnqueueRequest> {
    let client_name = req.client_name.trim().to_string();
    if client_name.is_empty() {
        return Err(DomainError::Validation(
            "client name cannot be empty".to_string(),
        ));
    }
    if client_name.chars().count() > MAX_CLIENT_NAME_LEN {
        return Err(DomainError::Validation(format!(
            "client name too long (max {} characters)",
            MAX_CLIENT_NAME_LEN
        )));
    }

    let barber = roster.get(req.barber_id).ok_or_else(|| {
        DomainError::Validation(format!("unknown barber {}", req.barber_id))
    })?;
    if !barber.active {
        return Err(DomainError::Validation(format!(
            "barber {} ({}) is not accepting clients",
            barber.id, barber.name
        )));
    }

    if !catalog.contains(&req.service_id) {
        return Err(DomainError::Validation(format!(
            "unknown service '{}'",
            req.service_id
        )));
    }

    let client_phone = req
        .client_phone
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty());

    Ok(EnqueueRequest {
        client_name,
        client_phone,
        barber_id: req.barber_id,
        service_id: req.service_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ShopConfig;

    fn shop() -> (ServiceCatalog, BarberRoster) {
        ShopConfig::default().into_parts().unwrap()
    }

    fn assert_validation(result: Result<EnqueueRequest>, needle: &str) {
        match result {
            Err(DomainError::Validation(msg)) => {
                assert!(msg.contains(needle), "'{}' should mention '{}'", msg, needle)
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_empty_name() {
        let (catalog, roster) = shop();
        assert_validation(
            validate_request(EnqueueRequest::new("", 1, "haircut"), &catalog, &roster),
            "empty",
        );
        assert_validation(
            validate_request(EnqueueRequest::new("   ", 1, "haircut"), &catalog, &roster),
            "empty",
        );
    }

    #[test]
    fn test_validate_name_too_long() {
        let (catalog, roster) = shop();
        let req = EnqueueRequest::new("a".repeat(MAX_CLIENT_NAME_LEN + 1), 1, "haircut");
        assert_validation(validate_request(req, &catalog, &roster), "too long");
    }

    #[test]
    fn test_validate_unknown_barber() {
        let (catalog, roster) = shop();
        let req = EnqueueRequest::new("Amy", 42, "haircut");
        assert_validation(validate_request(req, &catalog, &roster), "unknown barber");
    }

    #[test]
    fn test_validate_inactive_barber() {
        let (catalog, roster) = shop();
        // Mike Chen is inactive in the default shop
        let req = EnqueueRequest::new("Amy", 3, "haircut");
        assert_validation(validate_request(req, &catalog, &roster), "not accepting");
    }

    #[test]
    fn test_validate_unknown_service() {
        let (catalog, roster) = shop();
        let req = EnqueueRequest::new("Amy", 1, "perm");
        assert_validation(validate_request(req, &catalog, &roster), "unknown service");
    }

    #[test]
    fn test_validate_normalizes_fields() {
        let (catalog, roster) = shop();
        let req = EnqueueRequest::new("  Amy  ", 1, "haircut").with_phone("   ");

        let valid = validate_request(req, &catalog, &roster).unwrap();
        assert_eq!(valid.client_name, "Amy");
        assert_eq!(valid.client_phone, None);
    }
}
