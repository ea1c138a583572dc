pub mod config;
pub mod file_store;
pub mod loader;

pub use config::{GameData, load_catalog, load_game_data, load_timings};
pub use file_store::FileStore;
pub use loader::DataLoadError;
