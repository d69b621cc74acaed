use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Configuration served for one game. Field names match the persisted file.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GameConfig {
    #[serde(default)]
    pub url: String,
    #[serde(rename = "AFKey", default)]
    pub af_key: String,
    #[serde(rename = "AdjustToken", default)]
    pub adjust_token: String,
    #[serde(rename = "Orientation", default)]
    pub orientation: String,
    #[serde(rename = "JSInterfaceName", default)]
    pub js_interface_name: String,
    #[serde(rename = "isOpen", default)]
    pub is_open: bool,
}

impl GameConfig {
    /// Gated games are not public yet; accesses to them are audited.
    pub fn is_gated(&self) -> bool {
        !self.is_open
    }
}

/// Game id -> config, sorted by id.
pub type ConfigMap = BTreeMap<String, GameConfig>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_names_follow_file_casing() {
        let cfg = GameConfig {
            url: "http://x".into(),
            af_key: "af".into(),
            adjust_token: "adj".into(),
            orientation: "portrait".into(),
            js_interface_name: "Bridge".into(),
            is_open: false,
        };
        let value = serde_json::to_value(&cfg).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "url": "http://x",
                "AFKey": "af",
                "AdjustToken": "adj",
                "Orientation": "portrait",
                "JSInterfaceName": "Bridge",
                "isOpen": false
            })
        );
    }

    #[test]
    fn missing_fields_default_to_empty() {
        let cfg: GameConfig = serde_json::from_str(r#"{"url":"http://x","isOpen":true}"#).unwrap();
        assert_eq!(cfg.url, "http://x");
        assert_eq!(cfg.af_key, "");
        assert!(cfg.is_open);
        assert!(!cfg.is_gated());
    }
}
