mod dirs;
mod settings;
mod store;
mod validation;

pub use dirs::Directories;
pub use settings::Settings;
pub use store::SettingsStore;
pub use validation::warn_unknown_fields;
