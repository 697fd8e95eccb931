//! Quote tile: quoted text with an optional source, optionally linked as a
//! whole.

use maud::{Markup, html};
use tessera_core::escape::safe_href;
use tessera_core::tile_type::{FieldKind, text};
use tessera_core::{FieldSpec, Result, TileData, TileType};

use super::link::opens_externally;

const FIELDS: &[FieldSpec] = &[
    FieldSpec::textarea("quote", "Quote").required().max_length(1000),
    FieldSpec::text("source", "Source"),
    FieldSpec::text("source_detail", "Source detail")
        .help("For example a role, a publication or a year."),
    FieldSpec::new("link", "Link", FieldKind::Url),
];

const CSS: &str = r#"
.tile-quote{margin:0}
.tile-quote blockquote{font-size:1.2rem;line-height:1.5;font-style:italic;white-space:pre-line}
.tile-quote blockquote::before{content:"\201C"}
.tile-quote blockquote::after{content:"\201D"}
.tile-quote figcaption{margin-top:.75rem;font-size:.95rem}
.tile-quote cite{font-style:normal;font-weight:600}
.tile-quote__detail{opacity:.8}
.tile-quote__link{display:block;color:inherit;text-decoration:none}
"#;

/// A quotation with attribution.
pub struct QuoteTile;

impl TileType for QuoteTile {
    fn key(&self) -> &'static str {
        "quote"
    }

    fn name(&self) -> &'static str {
        "Quote"
    }

    fn description(&self) -> &'static str {
        "A quotation or testimonial with its source"
    }

    fn fields(&self) -> &'static [FieldSpec] {
        FIELDS
    }

    fn render(&self, _tile_id: &str, data: &TileData) -> Result<Markup> {
        let figure = html! {
            figure class="tile-quote" {
                blockquote { (text(data, "quote").unwrap_or_default()) }
                @if let Some(source) = text(data, "source") {
                    figcaption {
                        "— " cite { (source) }
                        @if let Some(detail) = text(data, "source_detail") {
                            ", " span class="tile-quote__detail" { (detail) }
                        }
                    }
                }
            }
        };

        Ok(html! {
            @match text(data, "link") {
                Some(link) if opens_externally(link, None) => {
                    a class="tile-quote__link" href=(safe_href(link)) target="_blank" rel="noopener noreferrer" {
                        (figure)
                    }
                }
                Some(link) => {
                    a class="tile-quote__link" href=(safe_href(link)) { (figure) }
                }
                None => { (figure) }
            }
        })
    }

    fn css(&self) -> &'static str {
        CSS
    }

    fn wrapper_classes(&self, data: &TileData) -> Vec<String> {
        if text(data, "link").is_some() {
            vec!["tile--clickable".to_string()]
        } else {
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::test_support::{data, render};
    use serde_json::json;

    #[test]
    fn renders_quote_with_source() {
        let html = render(
            &QuoteTile,
            json!({"quote": "Best fête in years", "source": "A. Visitor", "source_detail": "2024"}),
        );
        assert!(html.contains("<blockquote>Best fête in years</blockquote>"));
        assert!(html.contains("<cite>A. Visitor</cite>"));
        assert!(html.contains(r#"<span class="tile-quote__detail">2024</span>"#));
        assert!(!html.contains("<a "));
    }

    #[test]
    fn whole_block_link() {
        let html = render(
            &QuoteTile,
            json!({"quote": "Q", "link": "https://news.example.org/review"}),
        );
        assert!(html.starts_with(r#"<a class="tile-quote__link" href="https://news.example.org/review" target="_blank""#));
        assert_eq!(
            QuoteTile.wrapper_classes(&data(json!({"link": "/x"}))),
            vec!["tile--clickable"]
        );
        assert!(QuoteTile.wrapper_classes(&data(json!({}))).is_empty());
    }

    #[test]
    fn escapes_quote_and_link() {
        let html = render(
            &QuoteTile,
            json!({"quote": "<script>alert(1)</script>", "link": "javascript:alert(1)"}),
        );
        assert!(!html.contains("<script>"));
        assert!(!html.contains("javascript:"));
    }

    #[test]
    fn quote_required() {
        assert_eq!(
            QuoteTile.validate(&data(json!({"source": "x"}))),
            vec!["Quote is required"]
        );
    }
}
