//! # Etiqueta - Homebox Label Generator
//!
//! Etiqueta renders printable physical labels for locations and assets
//! tracked in a [Homebox](https://homebox.software) inventory. It provides:
//!
//! - **Identifier parsing**: `BOX.001 | Camping gear` style names split
//!   into a zero-padded identifier and a display name
//! - **Templates**: Avery 5163 sheets (PDF) and P-Touch tape (PNG bundle)
//! - **Layout**: row-major cell tiling with copies, orientations and
//!   skip-cells for partially used sheets
//! - **Rendering**: deterministic QR + text label surfaces
//!
//! ## Quick Start
//!
//! ```no_run
//! use etiqueta::{
//!     fonts::FontSet,
//!     label::{LabelPattern, Record},
//!     pipeline::{self, RenderRequest},
//! };
//!
//! // Records normally come from the Homebox API (see `api`)
//! let records = vec![Record::new(
//!     "loc-1",
//!     "BOX.001 | Camping gear",
//!     "https://homebox.example.com/location/loc-1",
//! )];
//!
//! // Render an Avery 5163 sheet with default options
//! let output = pipeline::generate(
//!     &records,
//!     &RenderRequest::new("avery5163"),
//!     &LabelPattern::default(),
//!     &FontSet::builtin(),
//! )?;
//!
//! std::fs::write(&output.filename, &output.bytes)?;
//! # Ok::<(), etiqueta::LabelError>(())
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`label`] | Identifier parsing |
//! | [`templates`] | Template registry and option resolution |
//! | [`layout`] | Placement and canvas planning |
//! | [`render`] | QR and text rasterization |
//! | [`output`] | PDF and ZIP assembly |
//! | [`pipeline`] | End-to-end render invocation |
//! | [`api`] | Homebox API client |
//! | [`server`] | Label picker web UI |
//! | [`fonts`] | Font resolution and caching |
//! | [`error`] | Error types |

pub mod api;
pub mod config;
pub mod error;
pub mod fonts;
pub mod label;
pub mod layout;
pub mod output;
pub mod pipeline;
pub mod render;
pub mod server;
pub mod templates;

// Re-exports for convenience
pub use error::LabelError;
pub use label::{LabelPattern, ParsedLabel, Record};
pub use output::Output;
pub use templates::Template;
