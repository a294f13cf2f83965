//! Document head subsystem.
//!
//! # Data Flow
//! ```text
//! default head elements + per-segment head elements
//!     → dedupe.rs (title override, description singleton, stable-key dedupe)
//!     → HeadBlocks { title, meta, rest }
//!     → render.rs (allow-list, escaping, section markers)
//! ```

pub mod dedupe;
pub mod element;
pub mod render;

pub use dedupe::{dedupe, HeadBlocks};
pub use element::HeadElement;
pub use render::{csp_hash_source, escape_html, HeadRenderer, RenderedHead, PERMITTED_TAGS};
