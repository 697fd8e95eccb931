//! Tile records: the content blocks that make up the published page.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Free-form, type-specific payload of a tile.
///
/// The shape is defined entirely by the tile's type and checked by that
/// type's `validate` at the store boundary.
pub type TileData = Map<String, Value>;

/// Fraction of the four-column layout grid a tile occupies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TileSize {
    /// One column.
    Small,
    /// Two columns.
    #[default]
    Medium,
    /// Three columns.
    Large,
    /// The full row.
    Full,
}

impl TileSize {
    /// Key used in stored records and CSS class names.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
            Self::Full => "full",
        }
    }
}

/// Visual presentation of a tile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TileStyle {
    /// No background, content sits directly on the page.
    Flat,
    /// Raised card with its own background.
    #[default]
    Card,
}

impl TileStyle {
    /// Key used in stored records and CSS class names.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Flat => "flat",
            Self::Card => "card",
        }
    }
}

/// Background colour choice of a tile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorScheme {
    /// Theme default.
    #[default]
    Default,
    /// White card. Only meaningful for [`TileStyle::Card`].
    White,
    /// First accent colour.
    Accent1,
    /// Second accent colour.
    Accent2,
    /// Third accent colour.
    Accent3,
}

impl ColorScheme {
    /// Key used in stored records and CSS class names.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::White => "white",
            Self::Accent1 => "accent1",
            Self::Accent2 => "accent2",
            Self::Accent3 => "accent3",
        }
    }
}

/// Time window outside of which a tile is hidden from viewers.
///
/// Scheduled tiles are still emitted into the document; the client runtime
/// shows and hides them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisibilitySchedule {
    /// Hidden before this instant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_from: Option<DateTime<Utc>>,
    /// Hidden after this instant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_until: Option<DateTime<Utc>>,
}

impl VisibilitySchedule {
    /// Whether neither bound is set.
    pub fn is_empty(&self) -> bool {
        self.show_from.is_none() && self.show_until.is_none()
    }
}

/// A content block instance as stored and published.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tile {
    /// Opaque unique id, assigned at creation.
    pub id: String,

    /// Registry key of the tile's type. Immutable after creation.
    #[serde(rename = "type")]
    pub tile_type: String,

    /// Ordering key; ties keep stored order.
    pub position: i64,

    /// Grid footprint.
    #[serde(default)]
    pub size: TileSize,

    /// Visual presentation.
    #[serde(default)]
    pub style: TileStyle,

    /// Background colour choice.
    #[serde(default)]
    pub color_scheme: ColorScheme,

    /// Type-specific payload.
    #[serde(default)]
    pub data: TileData,

    /// `Some(false)` means manually hidden: excluded from the published page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,

    /// Optional show-from / show-until window.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility_schedule: Option<VisibilitySchedule>,

    /// Set by the store on creation.
    pub created: DateTime<Utc>,

    /// Set by the store on every save.
    pub updated: DateTime<Utc>,
}

impl Tile {
    /// Whether the tile was manually hidden.
    pub fn is_manually_hidden(&self) -> bool {
        self.visible == Some(false)
    }

    /// The schedule, if it has at least one bound.
    pub fn schedule(&self) -> Option<&VisibilitySchedule> {
        self.visibility_schedule.as_ref().filter(|s| !s.is_empty())
    }
}

/// Tile fields as submitted by the editor.
///
/// Server-maintained fields (`created`, `updated`) are not accepted from
/// the client. A missing `id` means "create".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TileDraft {
    /// Existing tile id, or `None` to create.
    #[serde(default)]
    pub id: Option<String>,

    /// Registry key of the tile's type.
    #[serde(rename = "type")]
    pub tile_type: String,

    /// Ordering key; defaults to after the last tile on create.
    #[serde(default)]
    pub position: Option<i64>,

    /// Grid footprint.
    #[serde(default)]
    pub size: Option<TileSize>,

    /// Visual presentation.
    #[serde(default)]
    pub style: Option<TileStyle>,

    /// Background colour choice.
    #[serde(default)]
    pub color_scheme: Option<ColorScheme>,

    /// Type-specific payload.
    #[serde(default)]
    pub data: TileData,

    /// Manual visibility flag.
    #[serde(default)]
    pub visible: Option<bool>,

    /// Optional show-from / show-until window.
    #[serde(default)]
    pub visibility_schedule: Option<VisibilitySchedule>,
}

/// Coerce combinations that have no meaning.
///
/// A white card on a flat tile is indistinguishable from the page, so
/// `white` falls back to `default` whenever the style is flat.
pub fn coerce_color_scheme(style: TileStyle, scheme: ColorScheme) -> ColorScheme {
    if style == TileStyle::Flat && scheme == ColorScheme::White {
        ColorScheme::Default
    } else {
        scheme
    }
}

/// New-position request for `update_positions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionUpdate {
    /// Tile id.
    pub id: String,
    /// New position.
    pub position: i64,
}
