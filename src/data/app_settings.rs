use crate::data::persistence::Persistable;
use anyhow::Result;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AppSettings {
    /// Currency suffix used wherever amounts are displayed.
    pub currency: String,
    /// Initial center of the fleet map when no vehicles are plotted.
    pub map_center_lat: f64,
    pub map_center_lng: f64,
}

impl Default for AppSettings {
    fn default() -> Self {
        // Casablanca city center.
        AppSettings {
            currency: "DH".to_string(),
            map_center_lat: 33.5731,
            map_center_lng: -7.5898,
        }
    }
}

/// Wrapper that reads the `settings` key from config.yaml, so the file can
/// grow other top-level keys without breaking settings parsing.
#[derive(Serialize, Deserialize, Default, Debug)]
struct SettingsWrapper {
    #[serde(default)]
    settings: AppSettings,
}

impl Persistable for SettingsWrapper {
    fn filename() -> &'static str {
        "config.yaml"
    }
}

impl AppSettings {
    pub fn load() -> Result<Self> {
        Ok(SettingsWrapper::load()?.settings)
    }

    pub fn save(&self) -> Result<()> {
        let wrapper = SettingsWrapper {
            settings: self.clone(),
        };
        wrapper.save()
    }

    pub(crate) fn save_to(&self, dir: &std::path::Path) -> Result<()> {
        let wrapper = SettingsWrapper {
            settings: self.clone(),
        };
        Persistable::save_to(&wrapper, dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_settings_default_values() {
        let settings = AppSettings::default();
        assert_eq!(settings.currency, "DH");
        assert!((settings.map_center_lat - 33.5731).abs() < 1e-9);
        assert!((settings.map_center_lng + 7.5898).abs() < 1e-9);
    }

    #[test]
    fn test_settings_wrapper_yaml_roundtrip() {
        let wrapper = SettingsWrapper {
            settings: AppSettings {
                currency: "EUR".to_string(),
                map_center_lat: 48.85,
                map_center_lng: 2.35,
            },
        };
        let yaml = serde_norway::to_string(&wrapper).unwrap();
        let parsed: SettingsWrapper = serde_norway::from_str(&yaml).unwrap();
        assert_eq!(parsed.settings.currency, "EUR");
        assert!((parsed.settings.map_center_lat - 48.85).abs() < 1e-9);
    }

    #[test]
    fn test_settings_wrapper_missing_key_uses_default() {
        // When config.yaml has no 'settings' key, default values kick in
        let yaml = "other_key: []";
        let wrapper: SettingsWrapper = serde_norway::from_str(yaml).unwrap();
        assert_eq!(wrapper.settings.currency, "DH");
    }

    #[test]
    fn test_save_to_and_load_from_roundtrip() {
        use tempfile::TempDir;
        let tmp = TempDir::new().unwrap();
        let settings = AppSettings {
            currency: "MAD".to_string(),
            map_center_lat: 34.02,
            map_center_lng: -6.83,
        };
        settings.save_to(tmp.path()).unwrap();
        let loaded = SettingsWrapper::load_from(tmp.path()).unwrap().settings;
        assert_eq!(loaded.currency, "MAD");
        assert!((loaded.map_center_lng + 6.83).abs() < 1e-9);
    }
}
