pub mod config;
pub mod error;
pub mod patch;
pub mod render;
pub mod repo;
pub mod ui;
pub mod version;

pub use error::{ReleaseError, Result};
