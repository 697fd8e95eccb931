//! Rich text tile: a title with an optional body.

use maud::{Markup, html};
use tessera_core::tile_type::text;
use tessera_core::{FieldSpec, Result, TileData, TileType};

use super::components::{paragraphs, tile_title};

const FIELDS: &[FieldSpec] = &[
    FieldSpec::text("title", "Title").required(),
    FieldSpec::textarea("content", "Content")
        .help("Blank lines start a new paragraph."),
];

const CSS: &str = r#"
.tile-text__body{font-size:1rem}
"#;

/// Heading and paragraphs of text.
pub struct TextTile;

impl TileType for TextTile {
    fn key(&self) -> &'static str {
        "text"
    }

    fn name(&self) -> &'static str {
        "Text"
    }

    fn description(&self) -> &'static str {
        "A heading with paragraphs of text"
    }

    fn fields(&self) -> &'static [FieldSpec] {
        FIELDS
    }

    fn render(&self, _tile_id: &str, data: &TileData) -> Result<Markup> {
        Ok(html! {
            (tile_title(text(data, "title")))
            @if let Some(content) = text(data, "content") {
                div class="tile__body tile-text__body" { (paragraphs(content)) }
            }
        })
    }

    fn css(&self) -> &'static str {
        CSS
    }
}
