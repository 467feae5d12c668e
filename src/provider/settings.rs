//! Application settings provider
//!
//! Exposes settings as sections holding radio groups. A selection is written
//! to the provider config file first; only a successful write updates the
//! stored value and reaches the apply callback.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::{Provider, ProviderError};
use crate::tags::Marker;
use crate::tree::Node;

/// Key of the built-in color scheme setting
pub const COLOR_SCHEME_KEY: &str = "colorScheme";

const APP_SECTION: &str = "compass";
const EMPTY_SECTION: &str = "no settings";

type ApplyCallback = Box<dyn FnMut(&str, &str)>;

/// A single-choice setting rendered as a radio group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RadioSetting {
    /// Key under which the value is persisted
    pub key: String,
    /// Group label shown to the user
    pub label: String,
    pub options: Vec<String>,
    pub default: String,
}

#[derive(Debug, Clone)]
struct Section {
    name: String,
    radios: Vec<RadioSetting>,
}

/// Provider over the application's own settings
pub struct SettingsProvider {
    sections: Vec<Section>,
    values: BTreeMap<String, String>,
    config_path: Option<PathBuf>,
    on_apply: Option<ApplyCallback>,
}

impl fmt::Debug for SettingsProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SettingsProvider")
            .field("sections", &self.sections)
            .field("values", &self.values)
            .field("config_path", &self.config_path)
            .finish_non_exhaustive()
    }
}

impl Default for SettingsProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsProvider {
    pub const NAME: &'static str = "settings";

    /// Create the provider with the built-in application section
    #[must_use]
    pub fn new() -> Self {
        let mut provider = Self {
            sections: Vec::new(),
            values: BTreeMap::new(),
            config_path: None,
            on_apply: None,
        };
        provider.add_radio(
            APP_SECTION,
            RadioSetting {
                key: COLOR_SCHEME_KEY.to_string(),
                label: "color scheme".to_string(),
                options: vec!["dark".to_string(), "light".to_string()],
                default: "dark".to_string(),
            },
        );
        provider
    }

    /// Register the callback run after a selection has been persisted
    pub fn on_apply(&mut self, callback: impl FnMut(&str, &str) + 'static) {
        self.on_apply = Some(Box::new(callback));
    }

    /// Register an empty section if it does not exist yet
    pub fn add_section(&mut self, name: &str) {
        if !self.sections.iter().any(|s| s.name == name) {
            self.sections.push(Section {
                name: name.to_string(),
                radios: Vec::new(),
            });
        }
    }

    /// Register a radio setting under `section`, creating the section if needed
    pub fn add_radio(&mut self, section: &str, radio: RadioSetting) {
        self.add_section(section);
        if let Some(target) = self.sections.iter_mut().find(|s| s.name == section) {
            target.radios.push(radio);
        }
    }

    /// Current value of `key`, falling back to the setting's default when the
    /// stored value is missing or not one of its options
    #[must_use]
    pub fn value(&self, key: &str) -> Option<&str> {
        let radio = self.radio_by_key(key)?;
        match self.values.get(key) {
            Some(value) if radio.options.contains(value) => Some(value.as_str()),
            _ => Some(radio.default.as_str()),
        }
    }

    fn radios(&self) -> impl Iterator<Item = &RadioSetting> {
        self.sections.iter().flat_map(|s| s.radios.iter())
    }

    fn radio_by_key(&self, key: &str) -> Option<&RadioSetting> {
        self.radios().find(|r| r.key == key)
    }

    fn radio_node(&self, radio: &RadioSetting) -> Node {
        Node::group(Marker::Radio.format(&radio.label), self.option_nodes(radio))
    }

    fn option_nodes(&self, radio: &RadioSetting) -> Vec<Node> {
        let current = self.value(&radio.key).unwrap_or(&radio.default);
        radio
            .options
            .iter()
            .map(|option| {
                if option == current {
                    Node::leaf(Marker::Checked.format(option))
                } else {
                    Node::leaf(option.as_str())
                }
            })
            .collect()
    }

    fn section_children(&self, section: &Section) -> Vec<Node> {
        if section.radios.is_empty() {
            return vec![Node::leaf(EMPTY_SECTION)];
        }
        section.radios.iter().map(|r| self.radio_node(r)).collect()
    }
}

impl Provider for SettingsProvider {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn fetch(&mut self, location: &str) -> Result<Vec<Node>, ProviderError> {
        let segments: Vec<&str> = location.split('/').filter(|s| !s.is_empty()).collect();
        let not_found = || ProviderError::NotFound(location.to_string());
        match segments.as_slice() {
            [] => Ok(self
                .sections
                .iter()
                .map(|s| Node::group(s.name.as_str(), self.section_children(s)))
                .collect()),
            [section] => {
                let section = self.sections.iter().find(|s| s.name == *section).ok_or_else(not_found)?;
                Ok(self.section_children(section))
            }
            [section, group] => {
                let radio = self
                    .sections
                    .iter()
                    .find(|s| s.name == *section)
                    .and_then(|s| s.radios.iter().find(|r| r.label == *group))
                    .ok_or_else(not_found)?;
                Ok(self.option_nodes(radio))
            }
            _ => Err(not_found()),
        }
    }

    fn on_radio_change(&mut self, group: &str, value: &str) -> Result<(), ProviderError> {
        let radio = self
            .radios()
            .find(|r| r.label == group)
            .ok_or_else(|| ProviderError::NotFound(format!("setting '{group}'")))?;
        if !radio.options.iter().any(|option| option == value) {
            return Err(ProviderError::Invalid(format!("'{value}' is not an option of '{group}'")));
        }
        let key = radio.key.clone();

        let mut values = self.values.clone();
        values.insert(key.clone(), value.to_string());
        if let Some(path) = self.config_path.as_deref() {
            write_values(path, &values)?;
        }
        self.values = values;
        info!("Setting {key} changed to {value}");
        if let Some(callback) = self.on_apply.as_mut() {
            callback(&key, value);
        }
        Ok(())
    }

    fn load_config(&mut self, path: &Path) -> Result<(), ProviderError> {
        self.config_path = Some(path.to_path_buf());
        if !path.exists() {
            debug!("No settings file at {}, using defaults", path.display());
            return Ok(());
        }
        let content = fs::read_to_string(path)?;
        let stored: BTreeMap<String, serde_json::Value> = serde_json::from_str(&content)
            .map_err(|e| ProviderError::Config(format!("Failed to parse {}: {e}", path.display())))?;
        self.values = stored
            .into_iter()
            .filter_map(|(key, value)| value.as_str().map(|v| (key, v.to_string())))
            .collect();
        Ok(())
    }

    fn save_config(&mut self, path: &Path) -> Result<(), ProviderError> {
        write_values(path, &self.values)
    }
}

fn write_values(path: &Path, values: &BTreeMap<String, String>) -> Result<(), ProviderError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(values)
        .map_err(|e| ProviderError::Config(format!("Failed to serialize settings: {e}")))?;
    fs::write(path, json)?;
    Ok(())
}
