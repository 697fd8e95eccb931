//! Download tile: a file with a type icon and a download button.

use maud::{Markup, html};
use tessera_core::escape::{file_extension, safe_href};
use tessera_core::tile_type::{FieldKind, missing_field, text};
use tessera_core::{FieldSpec, Result, TileData, TileType};

const FIELDS: &[FieldSpec] = &[
    FieldSpec::text("title", "Title").required(),
    FieldSpec::new("file", "File", FieldKind::File).required(),
    FieldSpec::textarea("description", "Description").max_length(500),
    FieldSpec::text("button_label", "Button label")
        .default_value("Download")
        .max_length(50),
];

const CSS: &str = r#"
.tile-download{display:flex;gap:1rem;align-items:flex-start}
.tile-download__icon{flex-shrink:0;width:48px;height:58px}
.tile-download__icon text{font:700 11px/1 system-ui,sans-serif;fill:#fff;text-transform:uppercase}
.tile-download__icon--pdf .tile-download__badge{fill:#d93025}
.tile-download__icon--document .tile-download__badge{fill:#1a73e8}
.tile-download__icon--spreadsheet .tile-download__badge{fill:#188038}
.tile-download__icon--presentation .tile-download__badge{fill:#e8710a}
.tile-download__icon--archive .tile-download__badge{fill:#795548}
.tile-download__icon--audio .tile-download__badge{fill:#8e24aa}
.tile-download__icon--video .tile-download__badge{fill:#c2185b}
.tile-download__icon--image .tile-download__badge{fill:#00897b}
.tile-download__icon--file .tile-download__badge{fill:#5f6368}
.tile-download__body{min-width:0;flex:1}
.tile-download__button{display:inline-block;margin-top:.6rem;padding:.45rem 1rem;border-radius:6px;background:var(--accent1);color:#fff;text-decoration:none;font-weight:600}
.tile--on-dark .tile-download__button{background:#fff;color:#111}
"#;

/// Broad category of a downloadable file, chosen from its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// PDF document.
    Pdf,
    /// Word processor or plain text document.
    Document,
    /// Spreadsheet or CSV.
    Spreadsheet,
    /// Slide deck.
    Presentation,
    /// Compressed archive.
    Archive,
    /// Audio.
    Audio,
    /// Video.
    Video,
    /// Image.
    Image,
    /// Anything else.
    File,
}

impl FileKind {
    /// Classify a file by the extension of `path`.
    pub fn from_path(path: &str) -> Self {
        match file_extension(path).as_deref() {
            Some("pdf") => Self::Pdf,
            Some("doc" | "docx" | "odt" | "rtf" | "txt") => Self::Document,
            Some("xls" | "xlsx" | "ods" | "csv") => Self::Spreadsheet,
            Some("ppt" | "pptx" | "odp") => Self::Presentation,
            Some("zip") => Self::Archive,
            Some("mp3" | "wav" | "ogg") => Self::Audio,
            Some("mp4" | "webm" | "mov") => Self::Video,
            Some("jpg" | "jpeg" | "png" | "gif" | "webp" | "svg") => Self::Image,
            _ => Self::File,
        }
    }

    /// CSS modifier name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Document => "document",
            Self::Spreadsheet => "spreadsheet",
            Self::Presentation => "presentation",
            Self::Archive => "archive",
            Self::Audio => "audio",
            Self::Video => "video",
            Self::Image => "image",
            Self::File => "file",
        }
    }
}

/// A downloadable file.
pub struct DownloadTile;

impl TileType for DownloadTile {
    fn key(&self) -> &'static str {
        "download"
    }

    fn name(&self) -> &'static str {
        "Download"
    }

    fn description(&self) -> &'static str {
        "A file visitors can download, such as a PDF or spreadsheet"
    }

    fn fields(&self) -> &'static [FieldSpec] {
        FIELDS
    }

    fn render(&self, tile_id: &str, data: &TileData) -> Result<Markup> {
        let file = text(data, "file").ok_or_else(|| missing_field(tile_id, self.key(), "file"))?;
        let label = text(data, "button_label").unwrap_or("Download");

        Ok(html! {
            div class="tile-download" {
                (file_icon(file))
                div class="tile-download__body" {
                    @if let Some(title) = text(data, "title") {
                        h2 class="tile__title" { (title) }
                    }
                    @if let Some(description) = text(data, "description") {
                        p class="tile-download__description" { (description) }
                    }
                    a class="tile-download__button" href=(safe_href(file)) download { (label) }
                }
            }
        })
    }

    fn css(&self) -> &'static str {
        CSS
    }
}

/// Document-shaped icon coloured by file kind, labelled with the extension.
fn file_icon(path: &str) -> Markup {
    let kind = FileKind::from_path(path);
    let label: String = file_extension(path)
        .unwrap_or_else(|| "file".to_string())
        .chars()
        .take(4)
        .collect();

    html! {
        svg class={"tile-download__icon tile-download__icon--" (kind.as_str())}
            viewBox="0 0 48 58" aria-hidden="true" {
            path d="M4 0h28l12 12v42a4 4 0 0 1-4 4H4a4 4 0 0 1-4-4V4a4 4 0 0 1 4-4z" fill="#e8eaed" {}
            path d="M32 0l12 12H36a4 4 0 0 1-4-4z" fill="#c4c7c5" {}
            rect class="tile-download__badge" x="0" y="30" width="40" height="16" rx="3" {}
            text x="20" y="42" text-anchor="middle" { (label) }
        }
    }
}
