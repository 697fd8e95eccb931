//! Countdown tile.
//!
//! The server only emits the target instant; the remaining time is computed
//! and formatted in the browser every second. The target has no offset, so
//! browsers read it as the visitor's local time.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use maud::{Markup, html};
use tessera_core::tile_type::{FieldKind, option, text};
use tessera_core::{Error, FieldSpec, Result, SelectOption, TileData, TileType};

use super::components::tile_title;

const DISPLAY_OPTIONS: &[SelectOption] = &[
    option("dynamic", "Largest units (3 days, 4 hours)"),
    option("days", "Days only"),
    option("hours", "Hours only"),
    option("timer", "Digital timer (DD:HH:MM:SS)"),
];

const EXPIRED_OPTIONS: &[SelectOption] = &[
    option("text", "Show a message"),
    option("hide", "Hide the tile"),
];

const DEFAULT_EXPIRED_TEXT: &str = "The wait is over!";

const FIELDS: &[FieldSpec] = &[
    FieldSpec::text("title", "Title"),
    FieldSpec::new("target_date", "Target date", FieldKind::Date).required(),
    FieldSpec::new("target_time", "Target time", FieldKind::Time).default_value("00:00"),
    FieldSpec::select("display", "Display", DISPLAY_OPTIONS).default_value("dynamic"),
    FieldSpec::select("expired_action", "When finished", EXPIRED_OPTIONS).default_value("text"),
    FieldSpec::text("expired_text", "Finished message")
        .default_value(DEFAULT_EXPIRED_TEXT)
        .max_length(200),
];

const CSS: &str = r#"
.tile-countdown__value{font-size:1.6rem;font-weight:700;font-variant-numeric:tabular-nums;letter-spacing:-.01em}
"#;

const JS: &str = r#"
window.initCountdowns=function(){
var els=document.querySelectorAll('.tile-countdown[data-target]');
if(!els.length)return;
function plural(n,w){return n+' '+w+(n===1?'':'s');}
function pad(n){return (n<10?'0':'')+n;}
function format(ms,mode){
var s=Math.floor(ms/1000),d=Math.floor(s/86400),h=Math.floor(s%86400/3600),m=Math.floor(s%3600/60),sec=s%60;
switch(mode){
case 'days':return plural(Math.ceil(ms/86400000),'day');
case 'hours':return plural(Math.ceil(ms/3600000),'hour');
case 'timer':return pad(d)+':'+pad(h)+':'+pad(m)+':'+pad(sec);
default:
if(d>0)return plural(d,'day')+', '+plural(h,'hour');
if(h>0)return plural(h,'hour')+', '+plural(m,'minute');
return plural(m,'minute')+', '+plural(sec,'second');
}
}
function tick(){
var now=Date.now();
els.forEach(function(el){
if(el.dataset.done==='1')return;
var target=new Date(el.dataset.target).getTime();
var value=el.querySelector('.tile-countdown__value');
if(isNaN(target)||!value)return;
var left=target-now;
if(left>0){value.textContent=format(left,el.dataset.display);return;}
el.dataset.done='1';
if(el.dataset.expired==='hide'){
var tile=el.closest('.tile');
if(tile){tile.dataset.expired='1';tile.style.display='none';}
}else{
value.textContent=el.dataset.expiredText||'';
}
});
}
tick();
setInterval(tick,1000);
};
"#;

/// Combine the stored date and optional time into the target instant.
pub fn target(data: &TileData) -> Option<NaiveDateTime> {
    let date = NaiveDate::parse_from_str(text(data, "target_date")?, "%Y-%m-%d").ok()?;
    let time = match text(data, "target_time") {
        Some(t) => NaiveTime::parse_from_str(t, "%H:%M").ok()?,
        None => NaiveTime::MIN,
    };
    Some(date.and_time(time))
}

/// Live countdown to a date and time.
pub struct CountdownTile;

impl TileType for CountdownTile {
    fn key(&self) -> &'static str {
        "countdown"
    }

    fn name(&self) -> &'static str {
        "Countdown"
    }

    fn description(&self) -> &'static str {
        "A live countdown to an event"
    }

    fn fields(&self) -> &'static [FieldSpec] {
        FIELDS
    }

    fn render(&self, tile_id: &str, data: &TileData) -> Result<Markup> {
        let target = target(data).ok_or_else(|| Error::Render {
            tile_id: tile_id.to_string(),
            tile_type: self.key().to_string(),
            reason: "invalid target date or time".to_string(),
        })?;

        let display = match text(data, "display") {
            Some(mode @ ("days" | "hours" | "timer")) => mode,
            _ => "dynamic",
        };
        let expired = if text(data, "expired_action") == Some("hide") {
            "hide"
        } else {
            "text"
        };

        Ok(html! {
            (tile_title(text(data, "title")))
            div class="tile-countdown"
                data-target=(target.format("%Y-%m-%dT%H:%M:%S").to_string())
                data-display=(display)
                data-expired=(expired)
                data-expired-text=(text(data, "expired_text").unwrap_or(DEFAULT_EXPIRED_TEXT)) {
                div class="tile-countdown__value" aria-live="polite" {
                    (target.format("%A %-d %B %Y, %H:%M").to_string())
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
        Some("initCountdowns")
    }
}
