pub mod cli;
pub mod config;
pub mod control;
pub mod device;
pub mod error;
pub mod field;
pub mod logging;
pub mod output;
pub mod profile;
pub mod replay;
pub mod snapshot;
pub mod sysfs;

pub use error::{Error, Result};
