//! hcommander is the core of a keyboard-driven command palette for node-graph editors.
//!
//! Given a set of candidates (parameters, actions, creatable node types), each described by
//! a label and a few alternate names, it decides which candidates match a free-text query,
//! which name explains the match best, how the matches rank against each other, and which
//! characters of the label to highlight.
//!
//! # Examples
//!
//! ```
//! use hcommander::prelude::*;
//!
//! let candidates: Vec<Arc<dyn PaletteItem>> = vec![
//!     Arc::new(Candidate::text("t", ["Translate", "tx", "ty", "tz"])),
//!     Arc::new(Candidate::text("s", ["Scale", "sx", "sy", "sz"])),
//! ];
//! let index = CandidateIndex::build(candidates);
//!
//! let engine = PaletteEngine::builder().query("tx").build();
//! let ranked = engine.run(&index, &RankBuilder::default());
//!
//! assert_eq!(ranked.len(), 1);
//! assert_eq!(ranked[0].item.id(), "t");
//! assert_eq!(ranked[0].which_match, 1);
//! ```

#![warn(missing_docs)]

#[macro_use]
extern crate log;

use std::any::Any;

pub use crate::candidate::Candidate;
pub use crate::engine::{FilteredItem, PaletteEngine, QuerySummary};
pub use crate::index::CandidateIndex;
pub use crate::item::{MatchedItem, Rank, RankBuilder, RankCriteria};
pub use crate::options::CommanderOptions;
pub use crate::palette_item::PaletteItem;

pub mod action;
pub mod candidate;
pub mod cursor;
pub mod engine;
pub mod event;
pub mod fuzzy_matcher;
pub mod highlight;
pub mod index;
pub mod item;
pub mod keymap;
pub mod options;
mod palette_item;
pub mod prelude;
pub mod session;

//------------------------------------------------------------------------------
/// Trait for downcasting to concrete types from trait objects
pub trait AsAny {
    /// Returns a reference to the value as `Any`
    fn as_any(&self) -> &dyn Any;
    /// Returns a mutable reference to the value as `Any`
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
