// Static Configuration Entities: Service Catalog & Barber Roster

use super::entry::BarberId;
use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Service catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    pub id: String,
    pub name: String,
    pub duration_minutes: u32,
    pub price: u32,
}

impl Service {
    pub fn new(id: impl Into<String>, name: impl Into<String>, duration_minutes: u32, price: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            duration_minutes,
            price,
        }
    }
}

/// Barber roster entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Barber {
    pub id: BarberId,
    pub name: String,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl Barber {
    pub fn new(id: BarberId, name: impl Into<String>, active: bool) -> Self {
        Self {
            id,
            name: name.into(),
            active,
        }
    }
}

/// Immutable, ordered service catalog
#[derive(Debug, Clone)]
pub struct ServiceCatalog {
    services: Vec<Service>,
}

impl ServiceCatalog {
    /// Build a catalog, rejecting blank ids/names, zero durations and duplicates
    pub fn new(services: Vec<Service>) -> Result<Self> {
        if services.is_empty() {
            return Err(AppError::Config("service catalog is empty".to_string()));
        }

        let mut seen = HashSet::new();
        for service in &services {
            if service.id.trim().is_empty() {
                return Err(AppError::Config("service id cannot be empty".to_string()));
            }
            if service.name.trim().is_empty() {
                return Err(AppError::Config(format!(
                    "service '{}' has an empty name",
                    service.id
                )));
            }
            if service.duration_minutes == 0 {
                return Err(AppError::Config(format!(
                    "service '{}' must take at least one minute",
                    service.id
                )));
            }
            if !seen.insert(service.id.as_str()) {
                return Err(AppError::Config(format!(
                    "duplicate service id '{}'",
                    service.id
                )));
            }
        }

        Ok(Self { services })
    }

    pub fn get(&self, id: &str) -> Option<&Service> {
        self.services.iter().find(|s| s.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Duration of a service in minutes, `None` if the id is unknown
    pub fn duration_of(&self, id: &str) -> Option<u32> {
        self.get(id).map(|s| s.duration_minutes)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Service> {
        self.services.iter()
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

/// Barber roster
///
/// Membership is fixed at startup; only the active flag changes.
#[derive(Debug, Clone)]
pub struct BarberRoster {
    barbers: Vec<Barber>,
}

impl BarberRoster {
    pub fn new(barbers: Vec<Barber>) -> Result<Self> {
        if barbers.is_empty() {
            return Err(AppError::Config("barber roster is empty".to_string()));
        }

        let mut seen = HashSet::new();
        for barber in &barbers {
            if barber.name.trim().is_empty() {
                return Err(AppError::Config(format!(
                    "barber {} has an empty name",
                    barber.id
                )));
            }
            if !seen.insert(barber.id) {
                return Err(AppError::Config(format!(
                    "duplicate barber id {}",
                    barber.id
                )));
            }
        }

        Ok(Self { barbers })
    }

    pub fn get(&self, id: BarberId) -> Option<&Barber> {
        self.barbers.iter().find(|b| b.id == id)
    }

    pub fn contains(&self, id: BarberId) -> bool {
        self.get(id).is_some()
    }

    /// Update the active flag. Returns false if the barber is unknown.
    pub fn set_active(&mut self, id: BarberId, active: bool) -> bool {
        match self.barbers.iter_mut().find(|b| b.id == id) {
            Some(barber) => {
                barber.active = active;
                true
            }
            None => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Barber> {
        self.barbers.iter()
    }

    pub fn active_count(&self) -> usize {
        self.barbers.iter().filter(|b| b.active).count()
    }

    pub fn len(&self) -> usize {
        self.barbers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.barbers.is_empty()
    }
}
