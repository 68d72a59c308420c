pub mod state;

pub use state::{SettingsError, SettingsStore, WidgetSettings, default_storage_path};
