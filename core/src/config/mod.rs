mod load;
mod types;

pub use load::{get_witsync_data_dir, load, load_from_path};
pub use types::{AppConfig, EntityProfile, ImportConfig, LoggingConfig, PathsConfig, WitConfig};
