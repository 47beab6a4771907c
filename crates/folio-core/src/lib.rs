//! Folio Core — error taxonomy and parse configuration shared by every stage.

pub mod config;
pub mod error;

pub use config::{ParseConfig, Thresholds};
pub use error::{Error, Result};
