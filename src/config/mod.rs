//! Config module.
//! Provides configuration types, the default config path and XML loading.

pub mod paths;
pub mod types;
pub mod xml;

pub use paths::{default_config_path, path_has_symlink_ancestor};
pub use types::{Config, LogLevel, Options};
pub use xml::{load_config_from_xml, load_config_from_xml_path, XmlConfig};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "DIR_EDIT_CONFIG";

/// Editor used when neither the CLI, the config file nor `$EDITOR` name one.
#[cfg(not(windows))]
pub const EDITOR_DEFAULT: &str = "vi";
/// Windows opens the default editor when the text file itself is run.
#[cfg(windows)]
pub const EDITOR_DEFAULT: &str = "";

/// `$EDITOR` if set, else the platform default.
pub fn default_editor() -> String {
    std::env::var("EDITOR").unwrap_or_else(|_| EDITOR_DEFAULT.to_owned())
}
