//! Shared HTML components and page-level assets.
//!
//! These are maud functions that return `Markup` fragments for composition
//! into the published page, plus the stylesheet and client runtime every
//! page carries regardless of which tile types it uses.

use maud::{Markup, PreEscaped, html};
use tessera_core::escape::{is_hex_color, safe_href};
use tessera_core::{Settings, Theme};

/// Base stylesheet: page chrome and the tile frame.
///
/// Theme colours arrive as custom properties from [`theme_css`].
pub const BASE_CSS: &str = r#"
*{margin:0;padding:0;box-sizing:border-box}
body{font-family:Inter,-apple-system,BlinkMacSystemFont,"Segoe UI",Roboto,sans-serif;line-height:1.6;color:var(--fg);background:var(--bg);min-height:100vh;display:flex;flex-direction:column}
a{color:var(--accent1)}
img{max-width:100%;height:auto;display:block}
svg.icon{width:20px;height:20px;fill:currentColor;vertical-align:-4px;flex-shrink:0}
button{font:inherit;color:inherit;cursor:pointer}

.site-header{width:100%;text-align:center}
.site-header--bar{padding:1.25rem 1rem;background:var(--card)}
.site-header--image{position:relative}
.site-header__image{width:100%;max-height:320px;object-fit:cover}
.site-header__title{font-size:1.75rem;font-weight:700;letter-spacing:-.02em}
.site-header--image .site-header__title{padding:1rem}

.site-footer{margin-top:auto;padding:1.5rem 1rem;text-align:center;font-size:.9rem;color:var(--fg2);white-space:pre-line}

.tile{border-radius:12px;padding:1.25rem;min-width:0;position:relative;overflow-wrap:anywhere}
.tile--card{background:var(--card);box-shadow:0 1px 3px rgba(0,0,0,.08)}
.tile--flat{background:transparent;padding-left:0;padding-right:0}
.tile--white{background:#fff}
.tile--accent1{background:var(--accent1)}
.tile--accent2{background:var(--accent2)}
.tile--accent3{background:var(--accent3)}
.tile--flat.tile--accent1,.tile--flat.tile--accent2,.tile--flat.tile--accent3{padding-left:1.25rem;padding-right:1.25rem}
.tile--on-dark{color:#fff}
.tile--on-dark a{color:inherit}
.tile--on-light{color:#111}
.tile--on-light a{color:inherit}
.tile--bare{background:transparent;box-shadow:none;padding:0}
.tile--bleed{padding:0;overflow:hidden}
.tile--clickable{transition:transform .15s,box-shadow .15s}
.tile--clickable:hover{transform:translateY(-2px)}
.tile--card.tile--clickable:hover{box-shadow:0 4px 12px rgba(0,0,0,.12)}
.tile__title{font-size:1.2rem;font-weight:650;line-height:1.3;margin-bottom:.5rem}
.tile__body p+p{margin-top:.75rem}

@media(prefers-reduced-motion:reduce){*{transition:none!important;animation:none!important}}
"#;

/// Layout grid: four columns on desktop, two on tablets, one on phones.
pub const GRID_CSS: &str = r#"
.tile-grid{display:grid;grid-template-columns:repeat(4,minmax(0,1fr));gap:1rem;width:100%;max-width:1120px;margin:0 auto;padding:1.5rem 1rem;grid-auto-flow:row dense}
.tile--small{grid-column:span 1}
.tile--medium{grid-column:span 2}
.tile--large{grid-column:span 3}
.tile--full{grid-column:1/-1}
@media(max-width:900px){
.tile-grid{grid-template-columns:repeat(2,minmax(0,1fr))}
.tile--small{grid-column:span 1}
.tile--medium,.tile--large,.tile--full{grid-column:1/-1}
}
@media(max-width:560px){
.tile-grid{grid-template-columns:minmax(0,1fr)}
.tile--small,.tile--medium,.tile--large,.tile--full{grid-column:1/-1}
}
"#;

/// Client runtime shipped with every page.
///
/// `Tessera.boot` runs once at the end of the body. It applies the schedule
/// windows carried in `data-show-from` / `data-show-until` (re-checked every
/// 30 seconds), picks a legible text colour for accent tiles from the WCAG
/// relative luminance of their computed background, then calls each tile
/// type's init function by name.
pub const RUNTIME_JS: &str = r#"
(function(){
'use strict';
function parseTime(v){if(!v)return null;var t=Date.parse(v);return isNaN(t)?null:t;}
function applySchedules(){
var now=Date.now();
document.querySelectorAll('.tile[data-show-from],.tile[data-show-until]').forEach(function(el){
if(el.dataset.expired==='1'){el.style.display='none';return;}
var from=parseTime(el.dataset.showFrom),until=parseTime(el.dataset.showUntil);
var hidden=(from!==null&&now<from)||(until!==null&&now>until);
el.style.display=hidden?'none':'';
});
}
function channel(c){c=c/255;return c<=0.03928?c/12.92:Math.pow((c+0.055)/1.055,2.4);}
function luminance(r,g,b){return 0.2126*channel(r)+0.7152*channel(g)+0.0722*channel(b);}
function applyContrast(){
document.querySelectorAll('.tile--accent1,.tile--accent2,.tile--accent3').forEach(function(el){
var m=getComputedStyle(el).backgroundColor.match(/[\d.]+/g);
if(!m||m.length<3)return;
if(m.length>3&&parseFloat(m[3])===0)return;
var dark=luminance(+m[0],+m[1],+m[2])<0.179;
el.classList.toggle('tile--on-dark',dark);
el.classList.toggle('tile--on-light',!dark);
});
}
window.Tessera={
refresh:applySchedules,
boot:function(inits){
applyContrast();
applySchedules();
setInterval(applySchedules,30000);
inits.forEach(function(name){
var fn=window[name];
if(typeof fn!=='function')return;
try{fn();}catch(e){if(window.console)console.error('tile init failed: '+name,e);}
});
}
};
})();
"#;

/// External link icon (arrow leaving a square).
pub const ICON_EXTERNAL: &str = r#"<svg class="icon" viewBox="0 0 24 24" aria-hidden="true"><path d="M14 3h7v7h-2V6.41l-8.29 8.3-1.42-1.42 8.3-8.29H14V3zM5 5h6v2H7v10h10v-4h2v6H5V5z"/></svg>"#;

/// Envelope icon.
pub const ICON_EMAIL: &str = r#"<svg class="icon" viewBox="0 0 24 24" aria-hidden="true"><path d="M3 5h18a1 1 0 0 1 1 1v12a1 1 0 0 1-1 1H3a1 1 0 0 1-1-1V6a1 1 0 0 1 1-1zm1 2.38V17h16V7.38l-8 5.34-8-5.34zM5.4 7 12 11.4 18.6 7H5.4z"/></svg>"#;

/// Telephone handset icon.
pub const ICON_PHONE: &str = r#"<svg class="icon" viewBox="0 0 24 24" aria-hidden="true"><path d="M6.6 10.8a15.1 15.1 0 0 0 6.6 6.6l2.2-2.2a1 1 0 0 1 1-.25 11.4 11.4 0 0 0 3.6.57 1 1 0 0 1 1 1V20a1 1 0 0 1-1 1A17 17 0 0 1 3 4a1 1 0 0 1 1-1h3.5a1 1 0 0 1 1 1c0 1.25.2 2.45.57 3.57a1 1 0 0 1-.25 1L6.6 10.8z"/></svg>"#;

/// Map pin icon.
pub const ICON_PIN: &str = r#"<svg class="icon" viewBox="0 0 24 24" aria-hidden="true"><path d="M12 2a7 7 0 0 1 7 7c0 5.25-7 13-7 13S5 14.25 5 9a7 7 0 0 1 7-7zm0 4.5A2.5 2.5 0 1 0 12 11.5 2.5 2.5 0 0 0 12 6.5z"/></svg>"#;

/// Inline `:root` block carrying the theme colours.
///
/// Stored settings are validated on save, but a hand-edited file could hold
/// anything; invalid colours fall back to the defaults so no stored value
/// ever reaches the stylesheet unchecked.
pub fn theme_css(theme: &Theme) -> String {
    let defaults = Theme::default();
    let pick = |value: &str, fallback: &str| -> String {
        if is_hex_color(value) {
            value.to_string()
        } else {
            fallback.to_string()
        }
    };

    format!(
        ":root{{--bg:{};--accent1:{};--accent2:{};--accent3:{};--fg:#1f2328;--fg2:#57606a;--card:#fff}}",
        pick(&theme.background_color, &defaults.background_color),
        pick(&theme.accent1, &defaults.accent1),
        pick(&theme.accent2, &defaults.accent2),
        pick(&theme.accent3, &defaults.accent3),
    )
}

/// Site header: image and title, a title-only bar, or nothing.
pub fn site_header(settings: &Settings) -> Markup {
    let title = settings.site_title.trim();
    let image = settings
        .header_image
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());

    html! {
        @if let Some(image) = image {
            header class="site-header site-header--image" {
                img class="site-header__image" src=(safe_href(image)) alt=(title);
                @if !title.is_empty() {
                    h1 class="site-header__title" { (title) }
                }
            }
        } @else if !title.is_empty() {
            header class="site-header site-header--bar" {
                h1 class="site-header__title" { (title) }
            }
        }
    }
}

/// Site footer, omitted when there is no footer text.
pub fn site_footer(settings: &Settings) -> Markup {
    let text = settings.footer_text.trim();
    html! {
        @if !text.is_empty() {
            footer class="site-footer" { (text) }
        }
    }
}

/// Optional tile heading.
pub fn tile_title(title: Option<&str>) -> Markup {
    html! {
        @if let Some(title) = title {
            h2 class="tile__title" { (title) }
        }
    }
}

/// Plain text as paragraphs: blank lines split paragraphs, single newlines
/// become line breaks. All text is escaped.
pub fn paragraphs(text: &str) -> Markup {
    let normalized = text.replace("\r\n", "\n");
    html! {
        @for block in normalized.split("\n\n").map(str::trim).filter(|b| !b.is_empty()) {
            p {
                @for (i, line) in block.lines().enumerate() {
                    @if i > 0 { br; }
                    (line)
                }
            }
        }
    }
}

/// Inline SVG icon.
pub fn icon(svg: &'static str) -> PreEscaped<&'static str> {
    PreEscaped(svg)
}
