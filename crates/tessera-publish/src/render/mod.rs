//! Built-in tile types.
//!
//! Each type lives in its own module and implements
//! [`TileType`](tessera_core::TileType): field schema, cross-field
//! validation, a maud renderer, and any stylesheet or script it needs.
//!
//! All rendering uses [maud](https://maud.lambda.xyz/), so interpolated text
//! and attribute values are escaped. URLs additionally pass through
//! [`safe_href`](tessera_core::escape::safe_href) before they reach an
//! `href` or `src`.

pub mod accordion;
pub mod components;
pub mod contact;
pub mod countdown;
pub mod download;
pub mod embed;
pub mod image;
pub mod link;
pub mod quote;
pub mod separator;
pub mod text;

use tessera_core::TileRegistry;

/// Registry holding every built-in tile type.
///
/// Registration order is the order in which per-type assets appear in the
/// published page.
pub fn builtin_registry() -> TileRegistry {
    TileRegistry::new()
        .with(text::TextTile)
        .with(image::ImageTile)
        .with(link::LinkTile)
        .with(download::DownloadTile)
        .with(embed::EmbedTile)
        .with(contact::ContactTile)
        .with(countdown::CountdownTile)
        .with(quote::QuoteTile)
        .with(accordion::AccordionTile)
        .with(separator::SeparatorTile)
}

#[cfg(test)]
pub(crate) mod test_support {
    use tessera_core::{TileData, TileType};

    pub(crate) fn data(value: serde_json::Value) -> TileData {
        value.as_object().cloned().unwrap()
    }

    pub(crate) fn render(tile_type: &dyn TileType, value: serde_json::Value) -> String {
        tile_type.render("tile_test", &data(value)).unwrap().into_string()
    }
}
