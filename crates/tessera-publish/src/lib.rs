//! Tessera Publish - tile renderers and static page generation.
//!
//! Turns the stored tile collection and site settings into one
//! self-contained HTML document.
//!
//! # Architecture
//!
//! - **Render**: one [`TileType`](tessera_core::TileType) per built-in tile
//!   type, rendered with maud (compile-time templates, escaped by default)
//! - **Page**: [`compose`] filters, orders and wraps tiles, then injects the
//!   CSS and JS of the types actually used
//! - **Generator**: [`PageGenerator`] backs up and atomically writes the
//!   composed page, or returns it as a preview
//!
//! # Failure model
//!
//! A tile that cannot be rendered is logged and left out; the rest of the
//! page still publishes. Failing to write the document fails the publish and
//! leaves the previously published document in place.

pub mod config;
pub mod generator;
pub mod page;
pub mod render;

pub use config::PublishConfig;
pub use generator::{PageGenerator, PublishOutcome};
pub use page::{ComposedPage, SkipReason, SkippedTile, compose};
pub use render::builtin_registry;
