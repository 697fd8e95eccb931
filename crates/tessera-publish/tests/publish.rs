//! End-to-end publishing against a temporary data directory.

use std::fs;
use std::sync::Arc;

use chrono::{Duration, Utc};
use pretty_assertions::assert_eq;
use serde_json::json;
use tempfile::TempDir;
use tessera_core::{Error, SettingsUpdate, TileData, TileDraft, VisibilitySchedule};
use tessera_publish::{PageGenerator, PublishConfig, builtin_registry};

fn generator(tmp: &TempDir) -> PageGenerator {
    let config = PublishConfig::with_data_dir(
        tmp.path().join("data"),
        tmp.path().join("public/index.html"),
    );
    PageGenerator::open(&config, Arc::new(builtin_registry()))
}

fn data(value: serde_json::Value) -> TileData {
    value.as_object().cloned().unwrap()
}

fn draft(tile_type: &str, value: serde_json::Value) -> TileDraft {
    TileDraft {
        tile_type: tile_type.to_string(),
        data: data(value),
        ..Default::default()
    }
}

#[test]
fn link_published_and_invalid_image_rejected() {
    let tmp = TempDir::new().unwrap();
    let generator = generator(&tmp);

    let link = generator
        .tiles()
        .save(TileDraft {
            position: Some(10),
            ..draft(
                "link",
                json!({"title": "Site", "url": "https://example.org", "external": true}),
            )
        })
        .unwrap();

    let err = generator
        .tiles()
        .save(draft("image", json!({"image": "not-a-path", "alt": "Rejected image"})))
        .unwrap_err();
    match err {
        Error::Validation(messages) => {
            assert!(messages.iter().any(|m| m.contains("valid image path")));
        }
        other => panic!("expected validation error, got {other:?}"),
    }
    assert_eq!(generator.tiles().list().unwrap().len(), 1);

    let outcome = generator.generate().unwrap();
    assert_eq!(outcome.tiles_published, 1);

    let html = fs::read_to_string(generator.output_path()).unwrap();
    assert!(html.contains(&format!(r#"id="tile-{}""#, link.id)));
    assert!(html.contains(r#"href="https://example.org" target="_blank" rel="noopener noreferrer""#));
    assert!(!html.contains("not-a-path"));
    assert!(!html.contains("Rejected image"));
}

#[test]
fn hidden_tiles_never_published_and_scheduled_tiles_start_hidden() {
    let tmp = TempDir::new().unwrap();
    let generator = generator(&tmp);

    generator
        .tiles()
        .save(TileDraft {
            visible: Some(false),
            ..draft("text", json!({"title": "Secret plans", "content": "Do not publish"}))
        })
        .unwrap();
    let scheduled = generator
        .tiles()
        .save(TileDraft {
            visibility_schedule: Some(VisibilitySchedule {
                show_from: Some(Utc::now() + Duration::days(7)),
                show_until: None,
            }),
            ..draft("text", json!({"title": "Coming soon"}))
        })
        .unwrap();

    generator.generate().unwrap();
    let html = fs::read_to_string(generator.output_path()).unwrap();

    assert!(!html.contains("Secret plans"));
    assert!(!html.contains("Do not publish"));
    assert!(html.contains("Coming soon"));
    assert!(html.contains(&format!(
        r#"id="tile-{}" data-tile-id="{}" data-show-from="#,
        scheduled.id, scheduled.id
    )));
    assert!(html.contains(r#"style="display:none""#));
}

#[test]
fn preview_matches_published_document() {
    let tmp = TempDir::new().unwrap();
    let generator = generator(&tmp);

    generator
        .settings()
        .save(SettingsUpdate {
            site_title: Some("Village Fête".to_string()),
            footer_text: Some("Run by volunteers".to_string()),
            accent1: Some("#ff8800".to_string()),
            ..Default::default()
        })
        .unwrap();
    generator
        .tiles()
        .save(draft("text", json!({"title": "Welcome", "content": "Hello"})))
        .unwrap();
    generator
        .tiles()
        .save(draft(
            "accordion",
            json!({"heading_1": "Parking", "content_1": "Free after 6pm"}),
        ))
        .unwrap();
    generator
        .tiles()
        .save(draft(
            "countdown",
            json!({"title": "Opening", "target_date": "2030-06-01"}),
        ))
        .unwrap();

    let preview = generator.preview().unwrap();
    generator.generate().unwrap();
    let published = fs::read_to_string(generator.output_path()).unwrap();

    assert_eq!(preview, published);
    assert!(published.contains("<title>Village Fête</title>"));
    assert!(published.contains("--accent1:#ff8800"));
    assert!(published.contains(r#"Tessera.boot(["initCountdowns","initAccordions"]);"#));
}

#[test]
fn failed_write_keeps_previous_document() {
    let tmp = TempDir::new().unwrap();
    let generator = generator(&tmp);
    generator
        .tiles()
        .save(draft("text", json!({"title": "Version one"})))
        .unwrap();
    generator.generate().unwrap();
    let published = fs::read_to_string(generator.output_path()).unwrap();

    // A directory where the temp file should go makes the write fail.
    fs::create_dir_all(tmp.path().join("public/index.html.tmp/blocker")).unwrap();
    generator
        .tiles()
        .save(draft("text", json!({"title": "Version two"})))
        .unwrap();

    let err = generator.generate().unwrap_err();
    assert!(matches!(err, Error::Persistence { .. }));
    assert_eq!(fs::read_to_string(generator.output_path()).unwrap(), published);
}

#[test]
fn unknown_stored_type_does_not_block_publishing() {
    let tmp = TempDir::new().unwrap();
    fs::create_dir_all(tmp.path().join("data")).unwrap();
    fs::write(
        tmp.path().join("data/tiles.json"),
        serde_json::to_vec(&json!({"tiles": [
            {
                "id": "tile_legacy",
                "type": "gallery",
                "position": 10,
                "data": {"title": "Old gallery"},
                "created": "2024-01-01T00:00:00Z",
                "updated": "2024-01-01T00:00:00Z"
            },
            {
                "id": "tile_ok",
                "type": "text",
                "position": 20,
                "data": {"title": "Still here"},
                "created": "2024-01-01T00:00:00Z",
                "updated": "2024-01-01T00:00:00Z"
            }
        ]}))
        .unwrap(),
    )
    .unwrap();

    let generator = generator(&tmp);
    let outcome = generator.generate().unwrap();

    assert_eq!(outcome.tiles_published, 1);
    assert_eq!(outcome.tiles_skipped, 1);
    let html = fs::read_to_string(generator.output_path()).unwrap();
    assert!(html.contains("Still here"));
    assert!(!html.contains("Old gallery"));
}
