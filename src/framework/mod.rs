//! Framework core.
//!
//! # Data Flow
//! ```text
//! RequestCtx
//!     → River::ui_route_data (assembler.rs)
//!         ├─ Matcher → MatchResult          (404 when nothing matches)
//!         ├─ join: default head ∥ LoaderOrchestrator
//!         ├─ merge mutations                (redirect / error short-circuit)
//!         ├─ truncate at outermost failure, dedupe head
//!         └─ RouteMetadataCache → import URLs, export keys, deps
//!     → UIRouteOutput (output.rs)
//!     → JSON body, or ssr.rs + document.rs for HTML
//! ```
//!
//! # Design Decisions
//! - `River` is immutable after `build()` and shared behind an `Arc`
//! - Matcher, task runner, asset resolver, default head and root template
//!   are trait objects so embedders can swap each one
//! - Action routes reuse the pattern engine and task contract, never HTML

pub mod actions;
pub mod assembler;
pub mod document;
pub mod output;
pub mod river;
pub mod ssr;

pub use actions::{ActionOutcome, ActionRouter};
pub use assembler::UiRouteData;
pub use document::{body_scripts, head_section, DefaultRootTemplate, DocumentParts, RootTemplate, TemplateError};
pub use output::{ActivePathData, UIRouteOutput};
pub use river::{DefaultHeadProvider, River, RiverBuilder, RiverOptions};
pub use ssr::{render_ssr_script, SsrContext, SsrScript};
