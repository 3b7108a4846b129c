//! Error handling for Mnemos.
//! One error enum per concern, `thiserror` only.

pub mod config_error;
pub mod mnemos_error;
pub mod store_error;

pub use config_error::ConfigError;
pub use mnemos_error::{ErrorKind, MnemosError, MnemosResult};
pub use store_error::StoreError;
