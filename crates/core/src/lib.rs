// QueueSnip Core - Queue Domain, Wait Estimation & Ports
// NO infrastructure dependencies: persistence and presentation plug in through `port`

pub mod application;
pub mod domain;
pub mod error;
pub mod port;

pub use error::{AppError, Result};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
