//! Configuration Management

mod settings;

pub use settings::{CorsSettings, DatabaseSettings, ServerSettings, Settings};
