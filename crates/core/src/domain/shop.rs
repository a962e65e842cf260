// Shop Configuration (service catalog + barber roster)

use super::catalog::{Barber, BarberRoster, Service, ServiceCatalog};
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Static shop configuration supplied at startup
///
/// Deserializable so adapters can load it from any source; `Default` is the
/// walk-in shop the product ships with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopConfig {
    pub services: Vec<Service>,
    pub barbers: Vec<Barber>,
}

impl Default for ShopConfig {
    fn default() -> Self {
        Self {
            services: vec![
                Service::new("haircut", "Haircut", 30, 45),
                Service::new("shave", "Shave", 10, 20),
                Service::new("haircut-shave", "Haircut + Shave", 40, 60),
                Service::new("styling", "Hair Styling", 20, 30),
            ],
            barbers: vec![
                Barber::new(1, "Alex Johnson", true),
                Barber::new(2, "Sarah Davis", true),
                Barber::new(3, "Mike Chen", false),
            ],
        }
    }
}

impl ShopConfig {
    /// Validate and split into the catalog and roster used by the queue
    pub fn into_parts(self) -> Result<(ServiceCatalog, BarberRoster)> {
        let catalog = ServiceCatalog::new(self.services)?;
        let roster = BarberRoster::new(self.barbers)?;
        Ok((catalog, roster))
    }
}
