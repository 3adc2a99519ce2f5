pub mod load;
pub mod types;

pub use load::{get_planlog_data_dir, load_default, load_from_path};
pub use types::{ApiConfig, AppConfig, LoggingConfig, StreamConfig};
