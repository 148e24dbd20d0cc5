pub mod api;
pub mod config;
pub mod dashboard;
pub mod entities;
pub mod error;
pub mod metrics;
pub mod session;
pub mod store;
pub mod telemetry;
pub mod theme;
pub mod workflow;

pub use config::ClientConfig;
pub use error::{AuthError, CaptureError, ConfigError, FetchError, StoreError, SubmitError, ValidationError};
