pub mod traits;
pub mod source;
pub mod sink;
pub mod manager;

pub use manager::{ConfigManager, AppConfig};
pub use source::SourceConfig;
pub use sink::SinkConfig;
