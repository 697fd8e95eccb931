//! Contact tile with obfuscated email address and phone number.
//!
//! Email and phone never appear in plain text in the published HTML. They
//! are XORed with [`OBFUSCATION_KEY`] and base64 encoded, and a click on the
//! reveal button decodes them in the browser. This only keeps naive address
//! harvesters away: the key ships with the page, so it is obfuscation and
//! not encryption.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use maud::{Markup, html};
use tessera_core::tile_type::{FieldKind, text, validate_fields};
use tessera_core::{FieldSpec, Result, TileData, TileType};

use super::components::{ICON_EMAIL, ICON_PHONE, ICON_PIN, icon, tile_title};

/// Key shared with the client-side decoder in the page script.
pub const OBFUSCATION_KEY: &str = "tessera-contact";

const FIELDS: &[FieldSpec] = &[
    FieldSpec::text("title", "Title"),
    FieldSpec::text("name", "Name"),
    FieldSpec::new("email", "Email", FieldKind::Email),
    FieldSpec::new("phone", "Phone", FieldKind::Tel),
    FieldSpec::textarea("address", "Address").max_length(500),
];

const CSS: &str = r#"
.tile-contact__name{font-weight:600;margin-bottom:.5rem}
.tile-contact__list{list-style:none;display:flex;flex-direction:column;gap:.5rem}
.tile-contact__list li{display:flex;gap:.5rem;align-items:flex-start}
.tile-contact__address{white-space:pre-line}
.tile-contact__reveal{padding:0;border:0;background:none;color:inherit;text-decoration:underline dotted;text-underline-offset:3px}
"#;

const JS: &str = r#"
window.initContactReveal=function(){
var KEY='tessera-contact';
function decode(s){
var bin=atob(s),bytes=new Uint8Array(bin.length);
for(var i=0;i<bin.length;i++){bytes[i]=bin.charCodeAt(i)^KEY.charCodeAt(i%KEY.length);}
return new TextDecoder().decode(bytes);
}
document.querySelectorAll('[data-contact]').forEach(function(el){
var btn=el.querySelector('.tile-contact__reveal');
if(!btn)return;
btn.addEventListener('click',function(){
var value;
try{value=decode(el.dataset.contact);}catch(e){return;}
var a=document.createElement('a');
a.href=el.dataset.contactKind==='email'?'mailto:'+value:'tel:'+value.replace(/[^\d+]/g,'');
a.textContent=value;
el.replaceChildren(a);
});
});
};
"#;

/// XOR `value` with [`OBFUSCATION_KEY`] and base64 encode the result.
pub fn obfuscate(value: &str) -> String {
    STANDARD.encode(xor(value.as_bytes()))
}

/// Reverse [`obfuscate`].
pub fn deobfuscate(encoded: &str) -> Option<String> {
    let bytes = STANDARD.decode(encoded).ok()?;
    String::from_utf8(xor(&bytes)).ok()
}

fn xor(bytes: &[u8]) -> Vec<u8> {
    bytes
        .iter()
        .zip(OBFUSCATION_KEY.as_bytes().iter().cycle())
        .map(|(b, k)| b ^ k)
        .collect()
}

/// Contact details with click-to-reveal email and phone.
pub struct ContactTile;

impl TileType for ContactTile {
    fn key(&self) -> &'static str {
        "contact"
    }

    fn name(&self) -> &'static str {
        "Contact"
    }

    fn description(&self) -> &'static str {
        "Contact details, with email and phone hidden from crawlers"
    }

    fn fields(&self) -> &'static [FieldSpec] {
        FIELDS
    }

    fn validate(&self, data: &TileData) -> Vec<String> {
        let mut errors = validate_fields(FIELDS, data);
        if ["email", "phone", "address"]
            .iter()
            .all(|key| text(data, key).is_none())
        {
            errors.push("Enter at least an email address, phone number or address".to_string());
        }
        errors
    }

    fn render(&self, _tile_id: &str, data: &TileData) -> Result<Markup> {
        Ok(html! {
            (tile_title(text(data, "title")))
            @if let Some(name) = text(data, "name") {
                p class="tile-contact__name" { (name) }
            }
            ul class="tile-contact__list" {
                @if let Some(email) = text(data, "email") {
                    li {
                        (icon(ICON_EMAIL))
                        span data-contact-kind="email" data-contact=(obfuscate(email)) {
                            button type="button" class="tile-contact__reveal" { "Show email address" }
                        }
                    }
                }
                @if let Some(phone) = text(data, "phone") {
                    li {
                        (icon(ICON_PHONE))
                        span data-contact-kind="phone" data-contact=(obfuscate(phone)) {
                            button type="button" class="tile-contact__reveal" { "Show phone number" }
                        }
                    }
                }
                @if let Some(address) = text(data, "address") {
                    li {
                        (icon(ICON_PIN))
                        span class="tile-contact__address" { (address) }
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
        Some("initContactReveal")
    }
}
