//! Separator tile: vertical space with an optional horizontal rule.

use maud::{Markup, html};
use tessera_core::tile_type::{flag, option, text};
use tessera_core::{FieldSpec, Result, SelectOption, TileData, TileType};

const SPACING_OPTIONS: &[SelectOption] = &[
    option("small", "Small"),
    option("medium", "Medium"),
    option("large", "Large"),
];

const WIDTH_OPTIONS: &[SelectOption] = &[
    option("25", "A quarter"),
    option("50", "Half"),
    option("75", "Three quarters"),
    option("100", "Full width"),
];

const LINE_STYLE_OPTIONS: &[SelectOption] = &[
    option("solid", "Solid"),
    option("dashed", "Dashed"),
    option("dotted", "Dotted"),
];

const FIELDS: &[FieldSpec] = &[
    FieldSpec::select("spacing", "Spacing", SPACING_OPTIONS).default_value("medium"),
    FieldSpec::checkbox("show_line", "Show a line"),
    FieldSpec::select("line_width", "Line width", WIDTH_OPTIONS).default_value("100"),
    FieldSpec::select("line_style", "Line style", LINE_STYLE_OPTIONS).default_value("solid"),
];

const CSS: &str = r#"
.tile-separator{display:flex;align-items:center;justify-content:center}
.tile-separator--small{min-height:1rem}
.tile-separator--medium{min-height:2.5rem}
.tile-separator--large{min-height:5rem}
.tile-separator__line{border:0;border-top:2px solid currentColor;opacity:.3}
.tile-separator__line--dashed{border-top-style:dashed}
.tile-separator__line--dotted{border-top-style:dotted}
.tile-separator__line--w25{width:25%}
.tile-separator__line--w50{width:50%}
.tile-separator__line--w75{width:75%}
.tile-separator__line--w100{width:100%}
"#;

fn pick<'a>(value: Option<&'a str>, allowed: &[SelectOption], fallback: &'a str) -> &'a str {
    match value {
        Some(v) if allowed.iter().any(|o| o.value == v) => v,
        _ => fallback,
    }
}

/// Layout spacer.
pub struct SeparatorTile;

impl TileType for SeparatorTile {
    fn key(&self) -> &'static str {
        "separator"
    }

    fn name(&self) -> &'static str {
        "Separator"
    }

    fn description(&self) -> &'static str {
        "Space between tiles, optionally with a line"
    }

    fn fields(&self) -> &'static [FieldSpec] {
        FIELDS
    }

    fn render(&self, _tile_id: &str, data: &TileData) -> Result<Markup> {
        let spacing = pick(text(data, "spacing"), SPACING_OPTIONS, "medium");
        let width = pick(text(data, "line_width"), WIDTH_OPTIONS, "100");
        let style = pick(text(data, "line_style"), LINE_STYLE_OPTIONS, "solid");

        Ok(html! {
            div class={"tile-separator tile-separator--" (spacing)} role="presentation" {
                @if flag(data, "show_line").unwrap_or(false) {
                    hr class={
                        "tile-separator__line tile-separator__line--" (style)
                        " tile-separator__line--w" (width)
                    };
                }
            }
        })
    }

    fn css(&self) -> &'static str {
        CSS
    }

    fn wrapper_classes(&self, _data: &TileData) -> Vec<String> {
        vec!["tile--bare".to_string()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::test_support::{data, render};
    use serde_json::json;

    #[test]
    fn spacer_without_line() {
        let html = render(&SeparatorTile, json!({}));
        assert_eq!(
            html,
            r#"<div class="tile-separator tile-separator--medium" role="presentation"></div>"#
        );
    }

    #[test]
    fn line_with_width_and_style() {
        let html = render(
            &SeparatorTile,
            json!({"spacing": "large", "show_line": "on", "line_width": "50", "line_style": "dashed"}),
        );
        assert!(html.contains("tile-separator--large"));
        assert!(html.contains(
            r#"<hr class="tile-separator__line tile-separator__line--dashed tile-separator__line--w50">"#
        ));
    }

    #[test]
    fn stored_values_outside_options_fall_back() {
        let html = render(
            &SeparatorTile,
            json!({"show_line": true, "line_width": "\" onmouseover=\"x", "line_style": "wavy"}),
        );
        assert!(html.contains("tile-separator__line--solid tile-separator__line--w100"));
        assert!(!html.contains("onmouseover"));
    }

    #[test]
    fn validation() {
        assert!(SeparatorTile.validate(&data(json!({}))).is_empty());
        assert_eq!(
            SeparatorTile.validate(&data(json!({"line_width": "33"}))),
            vec!["Line width has an invalid option: 33"]
        );
    }
}
