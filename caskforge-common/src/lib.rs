// caskforge-common/src/lib.rs
pub mod config;
pub mod error;
pub mod model;
pub mod requirement;

pub use config::Config;
pub use error::{ForgeError, Result};
