//! Convenience re-exports of commonly used types.
//!
//! This module provides a convenient way to import all the commonly used
//! hcommander types and traits with a single `use hcommander::prelude::*;` statement.

pub use crate::action::{Action, ActionCatalog, CatalogError};
pub use crate::candidate::{NamingScheme, NodeTypeCandidate, ParmCandidate};
pub use crate::engine::PaletteEngineBuilder;
pub use crate::fuzzy_matcher::palette::PaletteMatcher;
pub use crate::fuzzy_matcher::{Alignment, FuzzyMatcher};
pub use crate::highlight::highlight;
pub use crate::keymap::{KeyAction, KeyMap};
pub use crate::options::CommanderOptionsBuilder;
pub use crate::session::{Effect, Handled, Host, Session};
pub use crate::*;
pub use std::borrow::Cow;
pub use std::sync::Arc;
