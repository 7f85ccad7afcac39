pub mod boundary;
pub mod config;
pub mod domain;
pub mod error;
pub mod git;
pub mod manifest;
pub mod processor;
pub mod replace;
pub mod ui;

pub use config::Config;
pub use domain::{IncrementTarget, Limits, Version};
pub use error::{MagikarpError, Result};
pub use processor::{process_package, PackageProcessor, ProcessReport};
