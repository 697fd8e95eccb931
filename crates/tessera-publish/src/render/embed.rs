//! Embedded content tile: an external page in an iframe, inline or behind
//! a button that opens a modal.
//!
//! In modal mode the target URL reaches the client only as a
//! `data-embed-src` attribute; the script reads it from the dataset and
//! assigns it to a freshly created iframe, so no URL is ever spliced into
//! script text.

use maud::{Markup, html};
use tessera_core::escape::{is_http_url, safe_href};
use tessera_core::tile_type::{FieldKind, missing_field, option, text};
use tessera_core::{FieldSpec, Result, SelectOption, TileData, TileType};

const DISPLAY_OPTIONS: &[SelectOption] = &[
    option("inline", "Inline"),
    option("modal", "Button opening a pop-up"),
];

const RATIO_OPTIONS: &[SelectOption] = &[
    option("16:9", "Widescreen (16:9)"),
    option("4:3", "Standard (4:3)"),
    option("1:1", "Square (1:1)"),
    option("9:16", "Portrait (9:16)"),
];

const FIELDS: &[FieldSpec] = &[
    FieldSpec::new("url", "Embed URL", FieldKind::Url)
        .required()
        .help("The embeddable address, e.g. a video player or map URL."),
    FieldSpec::text("title", "Title"),
    FieldSpec::select("display", "Display", DISPLAY_OPTIONS).default_value("inline"),
    FieldSpec::select("aspect_ratio", "Aspect ratio", RATIO_OPTIONS).default_value("16:9"),
    FieldSpec::text("button_label", "Button label")
        .default_value("Open")
        .max_length(50),
];

const CSS: &str = r#"
.tile-embed{position:relative;width:100%;border-radius:8px;overflow:hidden;background:#000}
.tile-embed iframe{position:absolute;inset:0;width:100%;height:100%;border:0}
.tile-embed--16x9{aspect-ratio:16/9}
.tile-embed--4x3{aspect-ratio:4/3}
.tile-embed--1x1{aspect-ratio:1/1}
.tile-embed--9x16{aspect-ratio:9/16;max-height:80vh;margin:0 auto}
.tile-embed__open{padding:.55rem 1.1rem;border:0;border-radius:6px;background:var(--accent1);color:#fff;font-weight:600}
.tile--on-dark .tile-embed__open{background:#fff;color:#111}
.tile-embed-modal{position:fixed;inset:0;z-index:1000;background:rgba(0,0,0,.85);display:flex;align-items:center;justify-content:center;padding:1rem}
.tile-embed-modal__frame{width:min(960px,100%)}
.tile-embed-modal__close{position:absolute;top:.75rem;right:.75rem;width:2.5rem;height:2.5rem;border:0;border-radius:50%;background:#fff;color:#111;font-size:1.4rem;line-height:1}
"#;

const JS: &str = r#"
window.initEmbeds=function(){
var modal=null;
function close(){if(modal){modal.remove();modal=null;document.body.style.overflow='';}}
document.addEventListener('keydown',function(e){if(e.key==='Escape')close();});
document.querySelectorAll('.tile-embed__open[data-embed-src]').forEach(function(btn){
btn.addEventListener('click',function(){
var src=btn.dataset.embedSrc;
if(!/^https?:\/\//i.test(src))return;
close();
modal=document.createElement('div');
modal.className='tile-embed-modal';
modal.setAttribute('role','dialog');
modal.setAttribute('aria-modal','true');
var frame=document.createElement('div');
frame.className='tile-embed tile-embed-modal__frame tile-embed--'+(btn.dataset.embedRatio||'16x9');
var iframe=document.createElement('iframe');
iframe.src=src;
iframe.title=btn.dataset.embedTitle||'Embedded content';
iframe.allowFullscreen=true;
frame.appendChild(iframe);
var closer=document.createElement('button');
closer.type='button';
closer.className='tile-embed-modal__close';
closer.setAttribute('aria-label','Close');
closer.textContent='×';
closer.addEventListener('click',close);
modal.addEventListener('click',function(e){if(e.target===modal)close();});
modal.appendChild(frame);
modal.appendChild(closer);
document.body.appendChild(modal);
document.body.style.overflow='hidden';
closer.focus();
});
});
};
"#;

/// Map a stored aspect ratio to its CSS modifier, defaulting to 16:9.
fn ratio_class(ratio: Option<&str>) -> &'static str {
    match ratio {
        Some("4:3") => "4x3",
        Some("1:1") => "1x1",
        Some("9:16") => "9x16",
        _ => "16x9",
    }
}

/// External content shown in an iframe.
pub struct EmbedTile;

impl TileType for EmbedTile {
    fn key(&self) -> &'static str {
        "embed"
    }

    fn name(&self) -> &'static str {
        "Embed"
    }

    fn description(&self) -> &'static str {
        "A video, map or other external page shown inline or in a pop-up"
    }

    fn fields(&self) -> &'static [FieldSpec] {
        FIELDS
    }

    fn validate(&self, data: &TileData) -> Vec<String> {
        let mut errors = tessera_core::tile_type::validate_fields(FIELDS, data);
        if errors.is_empty()
            && let Some(url) = text(data, "url")
            && !is_http_url(url)
        {
            errors.push("Embed URL must start with http:// or https://".to_string());
        }
        errors
    }

    fn render(&self, tile_id: &str, data: &TileData) -> Result<Markup> {
        let url = text(data, "url").ok_or_else(|| missing_field(tile_id, self.key(), "url"))?;
        let title = text(data, "title");
        let ratio = ratio_class(text(data, "aspect_ratio"));
        let modal = text(data, "display") == Some("modal");

        Ok(html! {
            @if let Some(title) = title {
                h2 class="tile__title" { (title) }
            }
            @if modal {
                button type="button" class="tile-embed__open"
                    data-embed-src=(safe_href(url))
                    data-embed-title=(title.unwrap_or_default())
                    data-embed-ratio=(ratio) {
                    (text(data, "button_label").unwrap_or("Open"))
                }
            } @else {
                div class={"tile-embed tile-embed--" (ratio)} {
                    iframe src=(safe_href(url)) title=(title.unwrap_or("Embedded content"))
                        loading="lazy" allowfullscreen
                        referrerpolicy="strict-origin-when-cross-origin" {}
                }
            }
        })
    }

    fn css(&self) -> &'static str {
        CSS
    }

    fn js(&self) -> &'static str {
        JS
    }

    fn init_function(&self) -> Option<&'static str> {
        Some("initEmbeds")
    }
}
