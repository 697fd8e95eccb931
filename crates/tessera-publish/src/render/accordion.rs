//! Accordion tile: up to [`MAX_SECTIONS`] collapsible heading/content pairs.
//!
//! A section counts only when both its heading and its content are filled
//! in. A half-filled section is a validation error rather than being
//! dropped silently.

use maud::{Markup, html};
use tessera_core::tile_type::{flag, option, text, validate_fields};
use tessera_core::{FieldSpec, Result, SelectOption, TileData, TileType};

use super::components::{paragraphs, tile_title};

/// Maximum number of sections per accordion.
pub const MAX_SECTIONS: usize = 10;

const SCROLL_OPTIONS: &[SelectOption] = &[
    option("always", "Always"),
    option("mobile", "Only on small screens"),
    option("never", "Never"),
];

const OPEN_OPTIONS: &[SelectOption] = &[
    option("none", "None"),
    option("1", "Section 1"),
    option("2", "Section 2"),
    option("3", "Section 3"),
    option("4", "Section 4"),
    option("5", "Section 5"),
    option("6", "Section 6"),
    option("7", "Section 7"),
    option("8", "Section 8"),
    option("9", "Section 9"),
    option("10", "Section 10"),
];

const FIELDS: &[FieldSpec] = &[
    FieldSpec::text("title", "Title"),
    FieldSpec::text("heading_1", "Section 1 heading"),
    FieldSpec::textarea("content_1", "Section 1 content"),
    FieldSpec::text("heading_2", "Section 2 heading"),
    FieldSpec::textarea("content_2", "Section 2 content"),
    FieldSpec::text("heading_3", "Section 3 heading"),
    FieldSpec::textarea("content_3", "Section 3 content"),
    FieldSpec::text("heading_4", "Section 4 heading"),
    FieldSpec::textarea("content_4", "Section 4 content"),
    FieldSpec::text("heading_5", "Section 5 heading"),
    FieldSpec::textarea("content_5", "Section 5 content"),
    FieldSpec::text("heading_6", "Section 6 heading"),
    FieldSpec::textarea("content_6", "Section 6 content"),
    FieldSpec::text("heading_7", "Section 7 heading"),
    FieldSpec::textarea("content_7", "Section 7 content"),
    FieldSpec::text("heading_8", "Section 8 heading"),
    FieldSpec::textarea("content_8", "Section 8 content"),
    FieldSpec::text("heading_9", "Section 9 heading"),
    FieldSpec::textarea("content_9", "Section 9 content"),
    FieldSpec::text("heading_10", "Section 10 heading"),
    FieldSpec::textarea("content_10", "Section 10 content"),
    FieldSpec::checkbox("single_open", "Only one section open at a time"),
    FieldSpec::select("scroll", "Scroll opened section into view", SCROLL_OPTIONS)
        .default_value("mobile"),
    FieldSpec::select("open_section", "Section open on load", OPEN_OPTIONS).default_value("none"),
];

const CSS: &str = r#"
.tile-accordion__section+.tile-accordion__section{border-top:1px solid rgba(127,127,127,.25)}
.tile-accordion__heading{font-size:1rem;margin:0}
.tile-accordion__toggle{display:flex;width:100%;justify-content:space-between;align-items:center;gap:1rem;padding:.75rem 0;border:0;background:none;text-align:left;font-weight:600}
.tile-accordion__toggle::after{content:"+";font-size:1.25rem;line-height:1}
.tile-accordion__toggle[aria-expanded="true"]::after{content:"\2212"}
.tile-accordion__panel{padding:0 0 .9rem}
.tile-accordion__panel p+p{margin-top:.6rem}
"#;

const JS: &str = r#"
window.initAccordions=function(){
document.querySelectorAll('.tile-accordion').forEach(function(acc){
var single=acc.dataset.singleOpen==='true',scroll=acc.dataset.scroll||'mobile';
var toggles=acc.querySelectorAll('.tile-accordion__toggle');
function set(btn,open){
btn.setAttribute('aria-expanded',open?'true':'false');
var panel=document.getElementById(btn.getAttribute('aria-controls'));
if(panel)panel.hidden=!open;
}
toggles.forEach(function(btn){
btn.addEventListener('click',function(){
var open=btn.getAttribute('aria-expanded')!=='true';
if(open&&single){toggles.forEach(function(other){if(other!==btn)set(other,false);});}
set(btn,open);
if(open&&(scroll==='always'||(scroll==='mobile'&&window.matchMedia('(max-width:560px)').matches))){
btn.scrollIntoView({behavior:'smooth',block:'start'});
}
});
});
});
};
"#;

/// A fully populated section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section<'a> {
    /// 1-based slot number.
    pub number: usize,
    /// Heading text.
    pub heading: &'a str,
    /// Body text.
    pub content: &'a str,
}

/// Sections with both heading and content, in slot order.
pub fn sections(data: &TileData) -> Vec<Section<'_>> {
    (1..=MAX_SECTIONS)
        .filter_map(|number| {
            let heading = text(data, &format!("heading_{number}"))?;
            let content = text(data, &format!("content_{number}"))?;
            Some(Section {
                number,
                heading,
                content,
            })
        })
        .collect()
}

fn open_section(data: &TileData) -> Option<usize> {
    text(data, "open_section").and_then(|s| s.parse().ok())
}

/// Collapsible sections.
pub struct AccordionTile;

impl TileType for AccordionTile {
    fn key(&self) -> &'static str {
        "accordion"
    }

    fn name(&self) -> &'static str {
        "Accordion"
    }

    fn description(&self) -> &'static str {
        "Collapsible sections, such as FAQs"
    }

    fn fields(&self) -> &'static [FieldSpec] {
        FIELDS
    }

    fn validate(&self, data: &TileData) -> Vec<String> {
        let mut errors = validate_fields(FIELDS, data);

        for number in 1..=MAX_SECTIONS {
            let heading = text(data, &format!("heading_{number}"));
            let content = text(data, &format!("content_{number}"));
            match (heading, content) {
                (Some(_), None) => {
                    errors.push(format!("Section {number} has a heading but no content"));
                }
                (None, Some(_)) => {
                    errors.push(format!("Section {number} has content but no heading"));
                }
                _ => {}
            }
        }

        let filled = sections(data);
        if filled.is_empty() {
            errors.push("Add at least one section with a heading and content".to_string());
        } else if let Some(open) = open_section(data)
            && !filled.iter().any(|s| s.number == open)
        {
            errors.push(format!("Section {open} cannot start open because it is empty"));
        }

        errors
    }

    fn render(&self, tile_id: &str, data: &TileData) -> Result<Markup> {
        let single_open = flag(data, "single_open").unwrap_or(false);
        let scroll = match text(data, "scroll") {
            Some(mode @ ("always" | "never")) => mode,
            _ => "mobile",
        };
        let open = open_section(data);

        Ok(html! {
            (tile_title(text(data, "title")))
            div class="tile-accordion"
                data-single-open=(if single_open { "true" } else { "false" })
                data-scroll=(scroll) {
                @for section in sections(data) {
                    @let expanded = open == Some(section.number);
                    @let button_id = format!("{tile_id}-section-{}-toggle", section.number);
                    @let panel_id = format!("{tile_id}-section-{}", section.number);
                    div class="tile-accordion__section" {
                        h3 class="tile-accordion__heading" {
                            button type="button" class="tile-accordion__toggle" id=(button_id)
                                aria-expanded=(if expanded { "true" } else { "false" })
                                aria-controls=(panel_id) {
                                (section.heading)
                            }
                        }
                        div class="tile-accordion__panel" id=(panel_id) role="region"
                            aria-labelledby=(button_id) hidden[!expanded] {
                            (paragraphs(section.content))
                        }
                    }
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
        Some("initAccordions")
    }
}
