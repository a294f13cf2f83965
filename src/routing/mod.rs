//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request path
//!     → matcher.rs (pick terminal pattern, collect ancestor layouts)
//!     → pattern.rs (segment matching, params, splat)
//!     → Return: MatchResult (outermost → innermost) or no match
//!
//! Route registration (at startup):
//!     pattern strings
//!     → parse + normalize
//!     → frozen NestedRouter shared via Arc
//! ```
//!
//! # Design Decisions
//! - Patterns registered at startup, immutable at runtime
//! - The matcher is a trait so other engines can be plugged in
//! - Normalized patterns are stable and double as cache-key parts

pub mod matcher;
pub mod pattern;

pub use matcher::{Match, MatchResult, Matcher, NestedRouter};
pub use pattern::{Params, PatternError, RoutePattern};
