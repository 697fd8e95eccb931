//! Site-wide settings composed into the published page.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::escape::{SHORT_TEXT_MAX, is_hex_color, is_valid_image_path};

/// Maximum length of the footer text.
pub const FOOTER_TEXT_MAX: usize = 1000;

/// Theme colours, all `#RRGGBB`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Theme {
    /// Page background.
    pub background_color: String,
    /// First accent.
    pub accent1: String,
    /// Second accent.
    pub accent2: String,
    /// Third accent.
    pub accent3: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background_color: "#f5f5f5".to_string(),
            accent1: "#2563eb".to_string(),
            accent2: "#16a34a".to_string(),
            accent3: "#dc2626".to_string(),
        }
    }
}

/// The singleton settings record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Page title, shown in the header and `<title>`.
    pub site_title: String,
    /// Optional header image path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header_image: Option<String>,
    /// Optional footer text.
    pub footer_text: String,
    /// Theme colours.
    pub theme: Theme,
}

/// Partial settings update.
///
/// Only the fields listed here can be changed; anything else in a payload is
/// dropped by deserialization and never merged in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsUpdate {
    /// New site title.
    pub site_title: Option<String>,
    /// New header image path; an empty string clears it.
    pub header_image: Option<String>,
    /// New footer text.
    pub footer_text: Option<String>,
    /// New background colour.
    pub background_color: Option<String>,
    /// New first accent.
    pub accent1: Option<String>,
    /// New second accent.
    pub accent2: Option<String>,
    /// New third accent.
    pub accent3: Option<String>,
}

impl Settings {
    /// Apply `update` and validate the result.
    ///
    /// On error `self` is left unchanged.
    pub fn apply(&self, update: SettingsUpdate) -> Result<Settings> {
        let mut next = self.clone();

        if let Some(title) = update.site_title {
            next.site_title = title.trim().to_string();
        }
        if let Some(image) = update.header_image {
            let image = image.trim();
            next.header_image = (!image.is_empty()).then(|| image.to_string());
        }
        if let Some(footer) = update.footer_text {
            next.footer_text = footer.trim().to_string();
        }
        if let Some(color) = update.background_color {
            next.theme.background_color = color.trim().to_string();
        }
        if let Some(color) = update.accent1 {
            next.theme.accent1 = color.trim().to_string();
        }
        if let Some(color) = update.accent2 {
            next.theme.accent2 = color.trim().to_string();
        }
        if let Some(color) = update.accent3 {
            next.theme.accent3 = color.trim().to_string();
        }

        let errors = next.validate();
        if errors.is_empty() {
            Ok(next)
        } else {
            Err(Error::Validation(errors))
        }
    }

    /// Human readable errors; empty means valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.site_title.chars().count() > SHORT_TEXT_MAX {
            errors.push(format!("Site title must be at most {SHORT_TEXT_MAX} characters"));
        }
        if let Some(image) = &self.header_image
            && !is_valid_image_path(image)
        {
            errors.push("Header image must be a valid image path".to_string());
        }
        if self.footer_text.chars().count() > FOOTER_TEXT_MAX {
            errors.push(format!("Footer text must be at most {FOOTER_TEXT_MAX} characters"));
        }

        let colors = [
            ("Background color", &self.theme.background_color),
            ("Accent color 1", &self.theme.accent1),
            ("Accent color 2", &self.theme.accent2),
            ("Accent color 3", &self.theme.accent3),
        ];
        for (label, value) in colors {
            if !is_hex_color(value) {
                errors.push(format!("{label} must be in #RRGGBB format"));
            }
        }

        errors
    }
}
