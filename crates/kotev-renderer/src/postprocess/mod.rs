//! Tree passes run on the engine's output.
//!
//! 1. [`restructure_footers`]: source footers become `figcaption`s.
//! 2. [`hoist_attributes`]: attribute markers are applied and removed.
//!
//! The third pass, re-rendering `markdown`-flagged elements, needs the
//! whole pipeline and lives in [`Renderer`](crate::Renderer).

mod footer;
mod hoist;

pub use footer::restructure_footers;
pub use hoist::{OrphanPolicy, hoist_attributes};
