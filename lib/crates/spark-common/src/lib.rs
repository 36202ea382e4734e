pub mod config;
pub mod operations;
pub mod types;

pub use config::{ConfigError, ControllerConfig, DEFAULT_CONTROLLER_URL, normalize_base_url};
pub use operations::{OPERATIONS, Operation, OperationDescriptor};
pub use types::*;
