//! The tile type contract and its declarative field schema.
//!
//! Each concrete tile type declares the fields it accepts as a static
//! [`FieldSpec`] list. [`validate_fields`] performs the schema-level checks
//! (presence, length, format, select options) that every type shares; types
//! add their own cross-field rules on top.

use maud::Markup;
use serde::Serialize;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::escape::{
    LONG_TEXT_MAX, SHORT_TEXT_MAX, URL_MAX, is_date, is_email, is_hex_color, is_phone, is_time,
    is_valid_file_path, is_valid_image_path, is_valid_url_or_path,
};
use crate::tile::TileData;

/// Kind of editor control and the format check applied to a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// Single-line text.
    Text,
    /// Multi-line text.
    Textarea,
    /// One of a fixed set of options.
    Select,
    /// Boolean.
    Checkbox,
    /// Uploaded image path or image URL.
    Image,
    /// Uploaded file path or URL.
    File,
    /// URL or same-site path.
    Url,
    /// `YYYY-MM-DD`.
    Date,
    /// `HH:MM`.
    Time,
    /// Integer or decimal number.
    Number,
    /// Email address.
    Email,
    /// Telephone number.
    Tel,
    /// `#RRGGBB` colour.
    Color,
}

impl FieldKind {
    fn default_max_length(self) -> Option<usize> {
        match self {
            Self::Text | Self::Email | Self::Tel => Some(SHORT_TEXT_MAX),
            Self::Textarea => Some(LONG_TEXT_MAX),
            Self::Url | Self::Image | Self::File => Some(URL_MAX),
            _ => None,
        }
    }
}

/// One option of a select field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    /// Stored value.
    pub value: &'static str,
    /// Editor label.
    pub label: &'static str,
}

/// Shorthand for building select option tables.
pub const fn option(value: &'static str, label: &'static str) -> SelectOption {
    SelectOption { value, label }
}

/// Metadata for one field of a tile type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSpec {
    /// Key in the tile's `data` map.
    pub name: &'static str,
    /// Human readable label, also used in error messages.
    pub label: &'static str,
    /// Control kind and format rule.
    #[serde(rename = "type")]
    pub kind: FieldKind,
    /// Whether an empty value is an error.
    pub required: bool,
    /// Value the editor pre-fills.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<&'static str>,
    /// Allowed values for select fields.
    #[serde(skip_serializing_if = "no_options")]
    pub options: &'static [SelectOption],
    /// Maximum length in characters, overriding the kind's default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    /// Hint shown next to the control.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help: Option<&'static str>,
}

fn no_options(options: &&'static [SelectOption]) -> bool {
    options.is_empty()
}

impl FieldSpec {
    /// A field of the given kind with no constraints.
    pub const fn new(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            kind,
            required: false,
            default: None,
            options: &[],
            max_length: None,
            help: None,
        }
    }

    /// Single-line text field.
    pub const fn text(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldKind::Text)
    }

    /// Multi-line text field.
    pub const fn textarea(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldKind::Textarea)
    }

    /// Select field with the given options.
    pub const fn select(
        name: &'static str,
        label: &'static str,
        options: &'static [SelectOption],
    ) -> Self {
        let mut spec = Self::new(name, label, FieldKind::Select);
        spec.options = options;
        spec
    }

    /// Checkbox field.
    pub const fn checkbox(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldKind::Checkbox)
    }

    /// Mark the field as required.
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Set the editor default.
    pub const fn default_value(mut self, value: &'static str) -> Self {
        self.default = Some(value);
        self
    }

    /// Override the maximum length.
    pub const fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    /// Attach an editor hint.
    pub const fn help(mut self, help: &'static str) -> Self {
        self.help = Some(help);
        self
    }

    fn effective_max_length(&self) -> Option<usize> {
        self.max_length.or(self.kind.default_max_length())
    }
}

/// A polymorphic content block definition.
///
/// Implementations are stateless; one instance serves every tile of its
/// type. `render` must route every interpolated value through maud's
/// escaping and every URL through [`crate::escape::safe_href`].
pub trait TileType: Send + Sync {
    /// Registry key stored in `Tile::tile_type`.
    fn key(&self) -> &'static str;

    /// Display label for the editor.
    fn name(&self) -> &'static str;

    /// One-line description for the editor.
    fn description(&self) -> &'static str;

    /// Accepted fields, in editor order.
    fn fields(&self) -> &'static [FieldSpec];

    /// Human readable errors for `data`; empty means valid.
    ///
    /// Must be pure. The default runs the schema checks only.
    fn validate(&self, data: &TileData) -> Vec<String> {
        validate_fields(self.fields(), data)
    }

    /// Render the tile body. `tile_id` is unique within the page and may be
    /// used to derive element ids.
    fn render(&self, tile_id: &str, data: &TileData) -> Result<Markup>;

    /// Stylesheet fragment emitted once per page when this type is used.
    fn css(&self) -> &'static str {
        ""
    }

    /// Script fragment emitted once per page when this type is used.
    fn js(&self) -> &'static str {
        ""
    }

    /// Client-side function the page calls once on load.
    fn init_function(&self) -> Option<&'static str> {
        None
    }

    /// Extra classes for the tile's wrapper element.
    fn wrapper_classes(&self, _data: &TileData) -> Vec<String> {
        Vec::new()
    }
}

/// Run the schema-level checks declared by `fields` against `data`.
///
/// Keys in `data` that no field declares are ignored.
pub fn validate_fields(fields: &[FieldSpec], data: &TileData) -> Vec<String> {
    let mut errors = Vec::new();

    for field in fields {
        let value = data.get(field.name).filter(|v| !v.is_null());

        match field.kind {
            FieldKind::Checkbox => {
                if let Some(v) = value
                    && parse_flag(v).is_none()
                {
                    errors.push(format!("{} must be checked or unchecked", field.label));
                }
                continue;
            }
            FieldKind::Number => {
                match value {
                    Some(v) if parse_number(v).is_none() && !is_blank(v) => {
                        errors.push(format!("{} must be a number", field.label));
                    }
                    Some(v) if is_blank(v) && field.required => {
                        errors.push(format!("{} is required", field.label));
                    }
                    None if field.required => {
                        errors.push(format!("{} is required", field.label));
                    }
                    _ => {}
                }
                continue;
            }
            _ => {}
        }

        let text = match value {
            None => "",
            Some(Value::String(s)) => s.trim(),
            Some(_) => {
                errors.push(format!("{} must be text", field.label));
                continue;
            }
        };

        if text.is_empty() {
            if field.required {
                errors.push(format!("{} is required", field.label));
            }
            continue;
        }

        if let Some(max) = field.effective_max_length()
            && text.chars().count() > max
        {
            errors.push(format!("{} must be at most {max} characters", field.label));
            continue;
        }

        let format_error = match field.kind {
            FieldKind::Url if !is_valid_url_or_path(text) => {
                Some(format!("{} must be a valid URL or path", field.label))
            }
            FieldKind::Image if !is_valid_image_path(text) => Some(format!(
                "{} must be a valid image path (e.g. uploads/photo.jpg)",
                field.label
            )),
            FieldKind::File if !is_valid_file_path(text) => Some(format!(
                "{} must be a valid file path (e.g. uploads/document.pdf)",
                field.label
            )),
            FieldKind::Date if !is_date(text) => {
                Some(format!("{} must be a date in YYYY-MM-DD format", field.label))
            }
            FieldKind::Time if !is_time(text) => {
                Some(format!("{} must be a time in HH:MM format", field.label))
            }
            FieldKind::Email if !is_email(text) => {
                Some(format!("{} must be a valid email address", field.label))
            }
            FieldKind::Tel if !is_phone(text) => {
                Some(format!("{} must be a valid phone number", field.label))
            }
            FieldKind::Color if !is_hex_color(text) => {
                Some(format!("{} must be a colour in #RRGGBB format", field.label))
            }
            FieldKind::Select if !field.options.iter().any(|o| o.value == text) => {
                Some(format!("{} has an invalid option: {text}", field.label))
            }
            _ => None,
        };
        errors.extend(format_error);
    }

    errors
}

fn is_blank(value: &Value) -> bool {
    matches!(value, Value::String(s) if s.trim().is_empty())
}

fn parse_flag(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_i64().map(|n| n != 0),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "on" | "yes" => Some(true),
            "0" | "false" | "off" | "no" | "" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn parse_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Trimmed, non-empty string value of `key`.
pub fn text<'a>(data: &'a TileData, key: &str) -> Option<&'a str> {
    data.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Boolean value of `key`, accepting checkbox-style strings.
pub fn flag(data: &TileData, key: &str) -> Option<bool> {
    data.get(key).and_then(parse_flag)
}

/// Like [`flag`], but a blank string counts as unset rather than `false`.
///
/// For tri-state checkboxes where "unset" selects a default behaviour.
pub fn explicit_flag(data: &TileData, key: &str) -> Option<bool> {
    data.get(key).filter(|v| !is_blank(v)).and_then(parse_flag)
}

/// Render error for a required field missing at render time.
pub fn missing_field(tile_id: &str, tile_type: &str, field: &str) -> Error {
    Error::Render {
        tile_id: tile_id.to_string(),
        tile_type: tile_type.to_string(),
        reason: format!("missing field '{field}'"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const LEVELS: &[SelectOption] = &[option("low", "Low"), option("high", "High")];

    const FIELDS: &[FieldSpec] = &[
        FieldSpec::text("title", "Title").required(),
        FieldSpec::textarea("body", "Body"),
        FieldSpec::new("link", "Link", FieldKind::Url),
        FieldSpec::new("image", "Image", FieldKind::Image),
        FieldSpec::new("date", "Date", FieldKind::Date),
        FieldSpec::new("time", "Time", FieldKind::Time),
        FieldSpec::select("level", "Level", LEVELS),
        FieldSpec::checkbox("enabled", "Enabled"),
        FieldSpec::new("count", "Count", FieldKind::Number),
        FieldSpec::text("short", "Short").max_length(5),
    ];

    fn data(value: serde_json::Value) -> TileData {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn valid_minimal_data() {
        let errors = validate_fields(FIELDS, &data(json!({"title": "Hello"})));
        assert!(errors.is_empty(), "{errors:?}");
    }

    #[test]
    fn required_field_missing_or_blank() {
        assert_eq!(validate_fields(FIELDS, &data(json!({}))), vec!["Title is required"]);
        assert_eq!(
            validate_fields(FIELDS, &data(json!({"title": "   "}))),
            vec!["Title is required"]
        );
        assert_eq!(
            validate_fields(FIELDS, &data(json!({"title": null}))),
            vec!["Title is required"]
        );
    }

    #[test]
    fn length_bounds() {
        let long_title = "x".repeat(SHORT_TEXT_MAX + 1);
        let errors = validate_fields(FIELDS, &data(json!({"title": long_title})));
        assert_eq!(errors, vec!["Title must be at most 200 characters"]);

        let errors = validate_fields(FIELDS, &data(json!({"title": "ok", "short": "toolong"})));
        assert_eq!(errors, vec!["Short must be at most 5 characters"]);

        let long_body = "y".repeat(LONG_TEXT_MAX + 1);
        let errors = validate_fields(FIELDS, &data(json!({"title": "ok", "body": long_body})));
        assert_eq!(errors, vec!["Body must be at most 5000 characters"]);
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        let title = "ü".repeat(SHORT_TEXT_MAX);
        assert!(validate_fields(FIELDS, &data(json!({"title": title}))).is_empty());
    }

    #[test]
    fn format_errors() {
        let errors = validate_fields(
            FIELDS,
            &data(json!({
                "title": "t",
                "link": "javascript:alert(1)",
                "image": "not-a-path",
                "date": "2025-13-01",
                "time": "25:00",
                "level": "medium",
            })),
        );
        assert_eq!(errors.len(), 5, "{errors:?}");
        assert!(errors[0].contains("Link"));
        assert!(errors[1].contains("image path"));
        assert!(errors[2].contains("YYYY-MM-DD"));
        assert!(errors[3].contains("HH:MM"));
        assert!(errors[4].contains("invalid option"));
    }

    #[test]
    fn non_string_text_rejected() {
        let errors = validate_fields(FIELDS, &data(json!({"title": 42})));
        assert_eq!(errors, vec!["Title must be text"]);
    }

    #[test]
    fn checkbox_and_number_values() {
        let ok = data(json!({"title": "t", "enabled": "on", "count": "3"}));
        assert!(validate_fields(FIELDS, &ok).is_empty());

        let bad = data(json!({"title": "t", "enabled": "maybe", "count": "three"}));
        let errors = validate_fields(FIELDS, &bad);
        assert_eq!(errors, vec!["Enabled must be checked or unchecked", "Count must be a number"]);
    }

    #[test]
    fn validation_is_repeatable() {
        let input = data(json!({"link": "nope nope", "level": "x"}));
        assert_eq!(validate_fields(FIELDS, &input), validate_fields(FIELDS, &input));
    }

    #[test]
    fn accessors() {
        let d = data(json!({
            "title": "  Hello ",
            "blank": " ",
            "on": "1",
            "off": false,
        }));
        assert_eq!(text(&d, "title"), Some("Hello"));
        assert_eq!(text(&d, "blank"), None);
        assert_eq!(text(&d, "absent"), None);
        assert_eq!(flag(&d, "on"), Some(true));
        assert_eq!(flag(&d, "off"), Some(false));
        assert_eq!(flag(&d, "absent"), None);
        assert_eq!(flag(&d, "blank"), Some(false));
        assert_eq!(explicit_flag(&d, "blank"), None);
        assert_eq!(explicit_flag(&d, "on"), Some(true));
        assert_eq!(explicit_flag(&d, "off"), Some(false));
    }

    #[test]
    fn field_spec_serializes_for_editor() {
        let value = serde_json::to_value(FIELDS[6]).unwrap();
        assert_eq!(value["type"], "select");
        assert_eq!(value["options"][1]["value"], "high");
        let value = serde_json::to_value(FIELDS[0]).unwrap();
        assert_eq!(value["required"], true);
        assert!(value.get("options").is_none());
        assert!(value.get("maxLength").is_none());
    }
}
