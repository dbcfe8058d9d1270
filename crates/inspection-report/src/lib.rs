//! Property inspection report renderer
//!
//! Turns hierarchical inspection records (sections → line items → comments)
//! into a paginated PDF that follows the TREC REI 7-6 layout: repeated header
//! with report identification and status legend, a left gutter of I / NI / NP
//! / D checkboxes beside each line item, and "Page n of N" footers.
//!
//! Rendering is two passes. [`layout::paginate`] places the story onto pages,
//! then [`decorate::decorate`] draws each page knowing the final page count.
//!
//! ```no_run
//! use inspection_report::{render_report_from_json, RenderOptions};
//! use serde_json::json;
//!
//! let root = json!({
//!     "reportId": "2024-0117",
//!     "sections": [{"name": "Structural Systems", "lineItems": []}]
//! });
//! let path = render_report_from_json(&root, None, &RenderOptions::trec(), "out/report.pdf")?;
//! # Ok::<(), inspection_report::ReportError>(())
//! ```

pub mod canvas;
pub mod config;
pub mod content;
pub mod decorate;
pub mod error;
pub mod input;
pub mod layout;
pub mod metrics;
pub mod model;
pub mod normalize;
pub mod numbering;
#[cfg(feature = "pdf")]
pub mod pdf;
pub mod render;
pub mod style;
pub mod text;

pub use config::{OutputConfig, RenderOptions};
pub use decorate::FormProfile;
pub use error::{ReportError, Result};
pub use input::{RawComment, RawLineItem, RawSection, ReportInput};
pub use layout::{Layout, Overflow, Placed};
pub use model::{Comment, InspectionStatus, LineItem, ReportMetadata, Section};
pub use render::{
    compose_report, parse_report, render_inspection_report, render_report_from_json, render_to_bytes,
    write_atomic, ComposedReport,
};
