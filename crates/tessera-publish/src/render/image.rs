//! Image tile.
//!
//! An image is shown in one of three modes. The lightbox wins when both a
//! lightbox and a link are configured:
//!
//! 1. lightbox: clicking enlarges the image in an overlay
//! 2. link: the image is wrapped in a link
//! 3. plain: just the image

use maud::{Markup, html};
use tessera_core::escape::safe_href;
use tessera_core::tile_type::{FieldKind, flag, missing_field, text};
use tessera_core::{FieldSpec, Result, TileData, TileType};

use super::link::opens_externally;

const FIELDS: &[FieldSpec] = &[
    FieldSpec::new("image", "Image", FieldKind::Image).required(),
    FieldSpec::text("alt", "Alternative text")
        .help("Describe the image for screen readers."),
    FieldSpec::text("caption", "Caption"),
    FieldSpec::checkbox("lightbox", "Enlarge on click"),
    FieldSpec::new("link", "Link", FieldKind::Url)
        .help("Ignored when enlarge on click is enabled."),
];

const CSS: &str = r#"
.tile-image{margin:0}
.tile-image img{width:100%;height:auto;border-radius:inherit}
.tile-image__zoom{display:block;width:100%;padding:0;border:0;background:none;cursor:zoom-in}
.tile-image__caption{padding:.6rem 1rem;font-size:.9rem;opacity:.85}
.tile-lightbox{display:none;position:fixed;inset:0;z-index:1000;background:rgba(0,0,0,.9);align-items:center;justify-content:center;padding:1rem;cursor:zoom-out}
.tile-lightbox.is-open{display:flex}
.tile-lightbox img{max-width:95vw;max-height:95vh;object-fit:contain;border-radius:4px}
"#;

const JS: &str = r#"
window.initImageLightbox=function(){
var overlay=null,img=null;
function close(){if(!overlay)return;overlay.classList.remove('is-open');document.body.style.overflow='';}
function open(src,alt){
if(!/^(https?:\/\/|\/(?!\/)|[^:]*$)/i.test(src))return;
if(!overlay){
overlay=document.createElement('div');
overlay.className='tile-lightbox';
overlay.setAttribute('role','dialog');
overlay.setAttribute('aria-modal','true');
img=document.createElement('img');
overlay.appendChild(img);
overlay.addEventListener('click',close);
document.addEventListener('keydown',function(e){if(e.key==='Escape')close();});
document.body.appendChild(overlay);
}
img.src=src;
img.alt=alt||'';
overlay.classList.add('is-open');
document.body.style.overflow='hidden';
}
document.querySelectorAll('[data-lightbox]').forEach(function(el){
el.addEventListener('click',function(){open(el.dataset.lightbox,el.dataset.lightboxAlt);});
});
};
"#;

/// A single image with optional caption.
pub struct ImageTile;

impl TileType for ImageTile {
    fn key(&self) -> &'static str {
        "image"
    }

    fn name(&self) -> &'static str {
        "Image"
    }

    fn description(&self) -> &'static str {
        "A photo or graphic, optionally enlarged on click or linked"
    }

    fn fields(&self) -> &'static [FieldSpec] {
        FIELDS
    }

    fn render(&self, tile_id: &str, data: &TileData) -> Result<Markup> {
        let src = text(data, "image").ok_or_else(|| missing_field(tile_id, self.key(), "image"))?;
        let alt = text(data, "alt").unwrap_or_default();
        let lightbox = flag(data, "lightbox").unwrap_or(false);
        let link = text(data, "link");

        let picture = html! {
            img src=(safe_href(src)) alt=(alt) loading="lazy";
        };

        Ok(html! {
            figure class="tile-image" {
                @if lightbox {
                    button type="button" class="tile-image__zoom" data-lightbox=(safe_href(src))
                        data-lightbox-alt=(alt) aria-label="Enlarge image" {
                        (picture)
                    }
                } @else if let Some(link) = link {
                    @if opens_externally(link, None) {
                        a href=(safe_href(link)) target="_blank" rel="noopener noreferrer" { (picture) }
                    } @else {
                        a href=(safe_href(link)) { (picture) }
                    }
                } @else {
                    (picture)
                }
                @if let Some(caption) = text(data, "caption") {
                    figcaption class="tile-image__caption" { (caption) }
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
        Some("initImageLightbox")
    }

    fn wrapper_classes(&self, _data: &TileData) -> Vec<String> {
        vec!["tile--bleed".to_string()]
    }
}
