pub mod config;
pub mod error;
pub mod geometry;
pub mod types;

pub use config::ArenaConfig;
pub use error::{BrainsError, Result};
