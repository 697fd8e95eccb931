//! Link tile: a labelled link, opened in a new tab when it leaves the site.

use maud::{Markup, html};
use tessera_core::escape::{is_http_url, safe_href};
use tessera_core::tile_type::{FieldKind, explicit_flag, missing_field, text};
use tessera_core::{FieldSpec, Result, TileData, TileType};

use super::components::{ICON_EXTERNAL, icon};

const FIELDS: &[FieldSpec] = &[
    FieldSpec::text("title", "Title").required(),
    FieldSpec::new("url", "URL", FieldKind::Url).required(),
    FieldSpec::textarea("description", "Description").max_length(500),
    FieldSpec::checkbox("external", "Open in new tab")
        .help("Leave unset to decide from the address."),
];

const CSS: &str = r#"
.tile-link{display:flex;flex-direction:column;gap:.35rem;color:inherit;text-decoration:none;height:100%}
.tile-link:hover .tile-link__title{text-decoration:underline}
.tile-link__title{display:flex;align-items:center;gap:.4rem;font-size:1.15rem;font-weight:650}
.tile-link__description{opacity:.85}
"#;

/// Whether a link should open in a new browsing context.
///
/// An explicit `external` flag wins; otherwise absolute `http(s)` URLs are
/// external and site paths are not.
pub fn opens_externally(url: &str, explicit: Option<bool>) -> bool {
    explicit.unwrap_or_else(|| is_http_url(url))
}

/// A single link with title and optional description.
pub struct LinkTile;

impl TileType for LinkTile {
    fn key(&self) -> &'static str {
        "link"
    }

    fn name(&self) -> &'static str {
        "Link"
    }

    fn description(&self) -> &'static str {
        "A link to another page or site"
    }

    fn fields(&self) -> &'static [FieldSpec] {
        FIELDS
    }

    fn render(&self, tile_id: &str, data: &TileData) -> Result<Markup> {
        let url = text(data, "url").ok_or_else(|| missing_field(tile_id, self.key(), "url"))?;
        let title = text(data, "title").unwrap_or(url);
        let external = opens_externally(url, explicit_flag(data, "external"));

        Ok(html! {
            @if external {
                a class="tile-link" href=(safe_href(url)) target="_blank" rel="noopener noreferrer" {
                    span class="tile-link__title" { (title) (icon(ICON_EXTERNAL)) }
                    (description(data))
                }
            } @else {
                a class="tile-link" href=(safe_href(url)) {
                    span class="tile-link__title" { (title) }
                    (description(data))
                }
            }
        })
    }

    fn css(&self) -> &'static str {
        CSS
    }

    fn wrapper_classes(&self, _data: &TileData) -> Vec<String> {
        vec!["tile--clickable".to_string()]
    }
}

fn description(data: &TileData) -> Markup {
    html! {
        @if let Some(description) = text(data, "description") {
            span class="tile-link__description" { (description) }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::test_support::{data, render};
    use serde_json::json;

    #[test]
    fn external_link_opens_new_tab() {
        let html = render(
            &LinkTile,
            json!({"title": "Site", "url": "https://example.org", "external": true}),
        );
        assert!(html.contains(r#"href="https://example.org""#));
        assert!(html.contains(r#"target="_blank""#));
        assert!(html.contains(r#"rel="noopener noreferrer""#));
    }

    #[test]
    fn external_is_detected_from_scheme() {
        assert!(opens_externally("https://example.org", None));
        assert!(!opens_externally("/events", None));
        assert!(!opens_externally("https://example.org", Some(false)));
        assert!(opens_externally("/events", Some(true)));

        let html = render(&LinkTile, json!({"title": "Events", "url": "/events"}));
        assert!(!html.contains("target="));
    }

    #[test]
    fn blank_external_falls_back_to_detection() {
        let fields = json!({"title": "Site", "url": "https://example.org", "external": ""});
        assert!(LinkTile.validate(&data(fields.clone())).is_empty());
        assert!(render(&LinkTile, fields).contains(r#"target="_blank""#));

        let html = render(
            &LinkTile,
            json!({"title": "Site", "url": "https://example.org", "external": "0"}),
        );
        assert!(!html.contains("target="));
    }

    #[test]
    fn javascript_url_is_neutralised() {
        let html = render(&LinkTile, json!({"title": "x", "url": "javascript:alert(1)"}));
        assert!(!html.contains("javascript:"));
        assert!(html.contains(r##"href="#""##));
    }

    #[test]
    fn escapes_title_and_description() {
        let html = render(
            &LinkTile,
            json!({
                "title": "<script>alert(1)</script>",
                "url": "/x",
                "description": "\"quoted\" & <b>bold</b>",
            }),
        );
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("&lt;b&gt;bold&lt;/b&gt;"));
    }

    #[test]
    fn validation() {
        assert!(LinkTile.validate(&data(json!({"title": "a", "url": "/page"}))).is_empty());
        let errors = LinkTile.validate(&data(json!({"title": "a", "url": "javascript:alert(1)"})));
        assert_eq!(errors, vec!["URL must be a valid URL or path"]);
        let errors = LinkTile.validate(&data(json!({})));
        assert_eq!(errors, vec!["Title is required", "URL is required"]);
    }

    #[test]
    fn missing_url_is_render_error() {
        let err = LinkTile.render("tile_1", &data(json!({"title": "x"}))).unwrap_err();
        assert!(matches!(err, tessera_core::Error::Render { .. }));
    }
}
