//! # Labsheet - Laboratory Report Template Library
//!
//! Labsheet lays out laboratory report templates: positioned elements on a
//! letter-size page, edited by dragging, resizing and typing in place. It
//! provides:
//!
//! - **Template model**: seven element kinds with typed content and style
//! - **Geometry**: percentage rectangles, drag and eight-handle resize
//! - **Editor**: message-driven editing session with inline text editing
//! - **Rendering**: one element model for the editor and the read-only
//!   preview, drawn as HTML or as a grayscale PNG
//! - **Export**: JSON interchange, HTML, PNG and share links
//! - **Import**: turn an uploaded scan into a starting template
//!
//! ## Quick Start
//!
//! ```no_run
//! use labsheet::{
//!     export::{self, ExportFormat, ExportOptions},
//!     template::{ElementKind, TemplateDocument},
//! };
//!
//! let mut doc = TemplateDocument::default_report();
//! doc.add_element(ElementKind::Footer);
//!
//! let artifact = export::export(&doc, ExportFormat::Json, &ExportOptions::default())?;
//! std::fs::write(&artifact.file_name, &artifact.bytes)?;
//!
//! # Ok::<(), labsheet::error::LabsheetError>(())
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`template`] | Documents, elements, content and style |
//! | [`geometry`] | Rectangles, drag and resize |
//! | [`editor`] | Interactive editing session |
//! | [`render`] | Element views, HTML and PNG back-ends |
//! | [`export`] | Interchange format and export artifacts |
//! | [`handoff`] | Single-slot channel from the template list to the editor |
//! | [`upload`] | Upload type and size checks |
//! | [`analysis`] | Scan layout analysis and template generation |
//! | [`library`] | Template library with built-in templates |
//! | [`server`] | HTTP API |
//! | [`error`] | Error types |

pub mod analysis;
pub mod editor;
pub mod error;
pub mod export;
pub mod geometry;
pub mod handoff;
pub mod library;
pub mod render;
pub mod server;
pub mod template;
pub mod upload;

// Re-exports for convenience
pub use error::LabsheetError;
pub use template::{ElementKind, ReportElement, TemplateDocument};
