pub mod attachment;
pub mod config;
pub mod error;
pub mod form;
pub mod generator;
pub mod handlers;
pub mod models;
pub mod prompt;
pub mod sanitize;
pub mod service;
pub mod transport;

pub use crate::config::Config;
pub use crate::error::{PagesmithError, Result};
pub use crate::service::PagesmithService;
