// Application Layer - Use Cases and Read Models

pub mod estimator;
pub mod queue;

// Re-exports
pub use estimator::{WaitEstimate, DEFAULT_SERVICE_MINUTES};
pub use queue::{BarberBoard, BoardRow, EnqueueRequest, QueueService, RestoreReport};
