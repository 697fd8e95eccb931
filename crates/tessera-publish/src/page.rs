//! Page composition.
//!
//! [`compose`] is the single routine behind both preview and publish, so
//! the two produce byte-identical documents for the same stored state. The
//! output embeds no generation timestamp for the same reason.
//!
//! # Document shape
//!
//! ```text
//! <!DOCTYPE html>
//! <html>
//!   <head> meta, title, <style> base + theme + grid + per-type CSS </style> </head>
//!   <body>
//!     header?            image and title, title bar, or nothing
//!     <main.tile-grid>   one <article.tile> per rendered tile
//!     footer?
//!     <script>           per-type JS, runtime, Tessera.boot([init functions])
//!   </body>
//! </html>
//! ```

use std::collections::HashSet;

use chrono::SecondsFormat;
use maud::{DOCTYPE, Markup, PreEscaped, html};
use tessera_core::metrics::{self, TILES_RENDERED_TOTAL, TILES_SKIPPED_TOTAL};
use tessera_core::{Settings, Tile, TileRegistry, TileType, is_publishable};
use tracing::{debug, warn};

use crate::render::components::{
    BASE_CSS, GRID_CSS, RUNTIME_JS, site_footer, site_header, theme_css,
};

/// Title used when the site has none.
pub const FALLBACK_TITLE: &str = "Home";

/// Why a tile was left out of the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The tile's type is not registered.
    UnknownType,
    /// The type's renderer returned an error.
    RenderFailed(String),
}

impl SkipReason {
    /// Metric label value.
    pub fn as_label(&self) -> &'static str {
        match self {
            Self::UnknownType => "unknown_type",
            Self::RenderFailed(_) => "render_error",
        }
    }
}

/// A tile that was publishable but could not be rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedTile {
    /// Tile id.
    pub tile_id: String,
    /// Stored type key.
    pub tile_type: String,
    /// What went wrong.
    pub reason: SkipReason,
}

/// Result of composing a page.
#[derive(Debug, Clone)]
pub struct ComposedPage {
    /// The complete HTML document.
    pub html: String,
    /// Number of tiles in the document.
    pub tiles_rendered: usize,
    /// Tiles left out because they could not be rendered.
    pub skipped: Vec<SkippedTile>,
}

/// Compose the full document from settings and tiles.
///
/// Manually hidden tiles are excluded entirely. Tiles with an unknown type
/// or a failing renderer are logged and skipped; they never abort the page.
pub fn compose(settings: &Settings, tiles: &[Tile], registry: &TileRegistry) -> ComposedPage {
    let mut ordered: Vec<&Tile> = tiles.iter().filter(|t| is_publishable(t)).collect();
    ordered.sort_by_key(|t| t.position);

    let mut used: HashSet<&str> = HashSet::new();
    let mut articles = Vec::with_capacity(ordered.len());
    let mut skipped = Vec::new();

    for tile in ordered {
        let Some(tile_type) = registry.get(&tile.tile_type) else {
            warn!(tile_id = %tile.id, tile_type = %tile.tile_type, "unknown tile type, skipping");
            skipped.push(skip(tile, SkipReason::UnknownType));
            continue;
        };

        match tile_type.render(&tile.id, &tile.data) {
            Ok(body) => {
                used.insert(tile_type.key());
                articles.push(wrap(tile, tile_type, body));
            }
            Err(e) => {
                warn!(
                    tile_id = %tile.id,
                    tile_type = %tile.tile_type,
                    error = %e,
                    "tile failed to render, skipping"
                );
                skipped.push(skip(tile, SkipReason::RenderFailed(e.to_string())));
            }
        }
    }

    for s in &skipped {
        metrics::increment_with_reason(TILES_SKIPPED_TOTAL, s.reason.as_label());
    }
    metrics::increment(TILES_RENDERED_TOTAL, articles.len() as u64);

    // Assets follow registry order so output is deterministic.
    let types: Vec<&dyn TileType> = registry.iter().filter(|t| used.contains(t.key())).collect();
    debug!(
        tiles = articles.len(),
        skipped = skipped.len(),
        types = types.len(),
        "page composed"
    );

    ComposedPage {
        html: document(settings, &articles, &types).into_string(),
        tiles_rendered: articles.len(),
        skipped,
    }
}

fn skip(tile: &Tile, reason: SkipReason) -> SkippedTile {
    SkippedTile {
        tile_id: tile.id.clone(),
        tile_type: tile.tile_type.clone(),
        reason,
    }
}

/// Class list of a tile's wrapper element.
pub fn wrapper_classes(tile: &Tile, tile_type: &dyn TileType) -> Vec<String> {
    let mut classes = vec![
        "tile".to_string(),
        format!("tile--{}", tile_type.key()),
        format!("tile--{}", tile.size.as_str()),
        format!("tile--{}", tile.style.as_str()),
        format!("tile--{}", tile.color_scheme.as_str()),
    ];
    for extra in tile_type.wrapper_classes(&tile.data) {
        if !classes.contains(&extra) {
            classes.push(extra);
        }
    }
    classes
}

/// Wrap a rendered tile body in its grid element.
///
/// Scheduled tiles carry their window as RFC 3339 data attributes and start
/// hidden; the runtime reveals them once it has checked the window.
fn wrap(tile: &Tile, tile_type: &dyn TileType, body: Markup) -> Markup {
    let schedule = tile.schedule();
    let show_from = schedule
        .and_then(|s| s.show_from)
        .map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true));
    let show_until = schedule
        .and_then(|s| s.show_until)
        .map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true));

    html! {
        article class=(wrapper_classes(tile, tile_type).join(" "))
            id=(format!("tile-{}", tile.id))
            data-tile-id=(tile.id)
            data-show-from=[show_from]
            data-show-until=[show_until]
            style=[schedule.map(|_| "display:none")] {
            (body)
        }
    }
}

fn document(settings: &Settings, articles: &[Markup], types: &[&dyn TileType]) -> Markup {
    let title = match settings.site_title.trim() {
        "" => FALLBACK_TITLE,
        title => title,
    };

    let mut css = String::from(BASE_CSS);
    css.push_str(&theme_css(&settings.theme));
    css.push_str(GRID_CSS);
    for tile_type in types {
        css.push_str(tile_type.css());
    }

    let mut js = String::new();
    for tile_type in types {
        js.push_str(tile_type.js());
    }
    js.push_str(RUNTIME_JS);
    js.push_str(&boot_call(types));

    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                meta name="generator" content="Tessera";
                title { (title) }
                style { (PreEscaped(css)) }
            }
            body {
                (site_header(settings))
                main class="tile-grid" {
                    @for article in articles {
                        (article)
                    }
                }
                (site_footer(settings))
                script { (PreEscaped(js)) }
            }
        }
    }
}

/// `Tessera.boot([...])` naming each used type's init function once.
fn boot_call(types: &[&dyn TileType]) -> String {
    let mut names: Vec<&str> = Vec::new();
    for name in types.iter().filter_map(|t| t.init_function()) {
        if !names.contains(&name) {
            names.push(name);
        }
    }
    let list = names
        .iter()
        .map(|n| format!("\"{n}\""))
        .collect::<Vec<_>>()
        .join(",");
    format!("Tessera.boot([{list}]);\n")
}
