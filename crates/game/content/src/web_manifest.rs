//! Installability metadata consumed by the host platform.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestIcon {
    pub src: String,
    pub sizes: String,
    #[serde(rename = "type")]
    pub mime_type: String,
}

/// Opaque `manifest.json` descriptor: name, icons, start behavior, display
/// mode and theme colors.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebAppManifest {
    pub name: String,
    pub short_name: String,
    pub start_url: String,
    pub display: String,
    pub orientation: String,
    pub background_color: String,
    pub theme_color: String,
    pub icons: Vec<ManifestIcon>,
}

impl WebAppManifest {
    pub fn treehouse() -> Self {
        Self {
            name: "Treehouse Games".into(),
            short_name: "Treehouse".into(),
            start_url: "./index.html".into(),
            display: "standalone".into(),
            orientation: "any".into(),
            background_color: "#fef3c7".into(),
            theme_color: "#fef3c7".into(),
            icons: vec![
                ManifestIcon {
                    src: "icon-192.png".into(),
                    sizes: "192x192".into(),
                    mime_type: "image/png".into(),
                },
                ManifestIcon {
                    src: "icon-512.png".into(),
                    sizes: "512x512".into(),
                    mime_type: "image/png".into(),
                },
            ],
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_icon_type_field() {
        let json = WebAppManifest::treehouse().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["display"], "standalone");
        assert_eq!(value["icons"][0]["type"], "image/png");
        assert_eq!(value["theme_color"], "#fef3c7");
    }
}
