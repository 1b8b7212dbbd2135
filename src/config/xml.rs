//! XML configuration support.
//! - Loads optional settings from config.xml (quick_xml).
//! - A missing file means "use defaults"; a malformed file is an error.
//!
//! Notes:
//! - Unknown XML fields are rejected (serde deny_unknown_fields) to surface typos early.
//! - CLI flags are applied afterwards and always win.

use anyhow::{Context, Result};
use quick_xml::de::from_str as from_xml_str;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::paths::default_config_path;
use super::types::{Config, LogLevel};

/// Struct mirroring the XML config for deserialization.
#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename = "config")]
#[serde(deny_unknown_fields)]
pub struct XmlConfig {
    #[serde(rename = "editor")]
    pub editor: Option<String>,
    #[serde(rename = "log_level")]
    pub log_level: Option<String>,
    #[serde(rename = "log_file")]
    pub log_file: Option<String>,
    #[serde(rename = "remove_recursive", default, deserialize_with = "de_bool_trimmed_opt")]
    pub remove_recursive: Option<bool>,
    #[serde(rename = "safe", default, deserialize_with = "de_bool_trimmed_opt")]
    pub safe: Option<bool>,
    #[serde(rename = "numeric_sort", default, deserialize_with = "de_bool_trimmed_opt")]
    pub numeric_sort: Option<bool>,
    #[serde(rename = "all", default, deserialize_with = "de_bool_trimmed_opt")]
    pub all: Option<bool>,
}

// Custom deserializer that trims surrounding whitespace for optional bools
fn de_bool_trimmed_opt<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    Ok(opt.and_then(|s| match s.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" => Some(true),
        "false" | "no" | "0" => Some(false),
        _ => None,
    }))
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

impl XmlConfig {
    /// Overlay the values present in the file onto `cfg`.
    pub fn apply_to(&self, cfg: &mut Config) {
        if let Some(editor) = non_blank(self.editor.as_deref()) {
            cfg.editor = editor.to_owned();
        }
        if let Some(level) = non_blank(self.log_level.as_deref()).and_then(LogLevel::parse) {
            cfg.log_level = level;
        }
        if let Some(file) = non_blank(self.log_file.as_deref()) {
            cfg.log_file = Some(PathBuf::from(file));
        }
        if let Some(v) = self.remove_recursive {
            cfg.remove_recursive = v;
        }
        if let Some(v) = self.safe {
            cfg.safe = v;
        }
        if let Some(v) = self.numeric_sort {
            cfg.numeric_sort = v;
        }
        if let Some(v) = self.all {
            cfg.all = v;
        }
    }
}

/// Load settings from a specific XML file path.
pub fn load_config_from_xml_path(path: &Path) -> Result<XmlConfig> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("read config xml '{}'", path.display()))?;
    let parsed: XmlConfig = from_xml_str(&contents)
        .with_context(|| format!("parse config xml '{}'", path.display()))?;
    Ok(parsed)
}

/// Load settings from the default (or `$DIR_EDIT_CONFIG`) location.
/// Returns Ok(None) when no config file exists.
pub fn load_config_from_xml() -> Result<Option<(PathBuf, XmlConfig)>> {
    let Some(path) = default_config_path() else {
        return Ok(None);
    };
    if !path.exists() {
        debug!("No config file at {}", path.display());
        return Ok(None);
    }
    let parsed = load_config_from_xml_path(&path)?;
    debug!("Loaded config from {}", path.display());
    Ok(Some((path, parsed)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_fields_with_whitespace() {
        let xml = r#"<config>
  <editor> nano </editor>
  <log_level>debug</log_level>
  <log_file>/tmp/dir_edit.log</log_file>
  <remove_recursive> true </remove_recursive>
  <safe>false</safe>
  <numeric_sort>yes</numeric_sort>
  <all>0</all>
</config>"#;
        let parsed: XmlConfig = from_xml_str(xml).unwrap();
        let mut cfg = Config::default();
        parsed.apply_to(&mut cfg);
        assert_eq!(cfg.editor, "nano");
        assert_eq!(cfg.log_level, LogLevel::Debug);
        assert_eq!(cfg.log_file, Some(PathBuf::from("/tmp/dir_edit.log")));
        assert!(cfg.remove_recursive);
        assert!(!cfg.safe);
        assert!(cfg.numeric_sort);
        assert!(!cfg.all);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let xml = "<config><edtior>vim</edtior></config>";
        assert!(from_xml_str::<XmlConfig>(xml).is_err());
    }

    #[test]
    fn empty_values_leave_defaults() {
        let parsed: XmlConfig = from_xml_str("<config><editor>  </editor></config>").unwrap();
        let mut cfg = Config::default();
        let before = cfg.editor.clone();
        parsed.apply_to(&mut cfg);
        assert_eq!(cfg.editor, before);
        assert_eq!(cfg.log_file, None);
    }
}
