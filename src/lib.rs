pub mod config;
pub mod data;
pub mod error;
pub mod pipeline;
pub mod sink;

pub use error::{LoaderError, Result};
pub use pipeline::{LoadReport, Loader};
