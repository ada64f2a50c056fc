//! Hotkeys of the network editor, read from a CSV key map.
//!
//! The header names a `Key Name` column, a `Selection` column and one column per network
//! context. A cell holds what the key does in that context:
//!
//! ```text
//! Key Name,Selection,OBJECT,SOP
//! h.W,,op:geo,op:attribwrangle
//! h.M,+,,mn:merge_menu()
//! h.M,,,fn:merge()
//! ```
//!
//! Several rows may bind the same key; the first one whose selector matches the selection
//! wins, with the same selector rules as the action catalog.
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::action::{CatalogError, selector_matches, split_records};

/// Column holding the key name
pub const KEY_NAME: &str = "Key Name";
/// Column holding the selector
pub const SELECTION: &str = "Selection";
/// Network contexts with a column of their own
pub const CONTEXTS: [&str; 10] = ["OBJECT", "SOP", "VOP", "DOP", "COP", "CHOP", "SHOP", "ROP", "TOP", "LOP"];

/// What a bound key does, decoded from its `op:`, `fn:` or `mn:` prefix
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyAction {
    /// `op:` create a node of this type
    CreateNode(String),
    /// `fn:` run this code in the host
    Invoke(String),
    /// `mn:` show the popup menu this code builds
    Menu(String),
}

impl KeyAction {
    /// Decodes a key map cell, `None` for an unknown prefix
    ///
    /// ```
    /// use hcommander::keymap::KeyAction;
    ///
    /// assert_eq!(KeyAction::parse("op:null"), Some(KeyAction::CreateNode("null".into())));
    /// assert_eq!(KeyAction::parse("null"), None);
    /// ```
    pub fn parse(cell: &str) -> Option<Self> {
        let (prefix, body) = cell.split_at_checked(3)?;
        let body = body.to_string();
        match prefix {
            "op:" => Some(KeyAction::CreateNode(body)),
            "fn:" => Some(KeyAction::Invoke(body)),
            "mn:" => Some(KeyAction::Menu(body)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Binding {
    selector: String,
    action: KeyAction,
}

/// Key bindings per context and key, rows in file order
#[derive(Debug, Clone, Default)]
pub struct KeyMap {
    bindings: IndexMap<&'static str, IndexMap<String, Vec<Binding>>>,
}

impl KeyMap {
    /// Reads and parses a key map file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let keymap = Self::parse(&text)?;
        debug!("loaded {} key bindings from {}", keymap.len(), path.display());
        Ok(keymap)
    }

    /// Parses key map text.
    ///
    /// Context columns absent from the header bind nothing. Cells with an unknown prefix are
    /// skipped with a warning.
    pub fn parse(text: &str) -> Result<Self, CatalogError> {
        let mut records = split_records(text)?.into_iter();
        let Some((_, header)) = records.next() else {
            return Err(CatalogError::MissingColumn(KEY_NAME));
        };

        let column = |name: &str| header.iter().position(|h| h.trim() == name);
        let key = column(KEY_NAME).ok_or(CatalogError::MissingColumn(KEY_NAME))?;
        let selection = column(SELECTION).ok_or(CatalogError::MissingColumn(SELECTION))?;
        let contexts: Vec<(&'static str, usize)> = CONTEXTS
            .iter()
            .filter_map(|&context| column(context).map(|i| (context, i)))
            .collect();
        let width = contexts.iter().map(|&(_, i)| i).fold(key.max(selection), usize::max) + 1;

        let mut bindings: IndexMap<&'static str, IndexMap<String, Vec<Binding>>> = IndexMap::new();
        for (line, fields) in records {
            if fields.len() < width {
                return Err(CatalogError::Malformed {
                    line,
                    reason: format!("expected at least {width} fields, found {}", fields.len()),
                });
            }
            let key_name = fields[key].trim();
            let selector = fields[selection].trim();
            for &(context, i) in &contexts {
                let cell = fields[i].trim();
                if cell.is_empty() {
                    continue;
                }
                let Some(action) = KeyAction::parse(cell) else {
                    warn!("line {line}: ignoring {context} binding of {key_name:?}: {cell:?}");
                    continue;
                };
                bindings
                    .entry(context)
                    .or_default()
                    .entry(key_name.to_string())
                    .or_default()
                    .push(Binding {
                        selector: selector.to_string(),
                        action,
                    });
            }
        }

        Ok(Self { bindings })
    }

    /// Replaces the key map with the content of `path`, keeping the current one on failure
    pub fn reload(&mut self, path: impl AsRef<Path>) -> Result<(), CatalogError> {
        match Self::load(path) {
            Ok(keymap) => {
                *self = keymap;
                Ok(())
            }
            Err(e) => {
                warn!("keeping previous key map: {e}");
                Err(e)
            }
        }
    }

    /// The action bound to `key` in `context` for the selection, if any.
    ///
    /// `context` is the network type category, matched ignoring case (`Sop` finds the `SOP`
    /// column). `selected` holds the type names of the selected nodes, first selected first.
    pub fn lookup(&self, context: &str, key: &str, selected: &[&str]) -> Option<&KeyAction> {
        let (_, keys) = self.bindings.iter().find(|(name, _)| name.eq_ignore_ascii_case(context))?;
        let action = keys
            .get(key)?
            .iter()
            .find(|binding| selector_matches(&binding.selector, selected))
            .map(|binding| &binding.action);
        trace!("keymap: {context}/{key} -> {action:?}");
        action
    }

    /// Number of bindings over all contexts
    pub fn len(&self) -> usize {
        self.bindings.values().flat_map(|keys| keys.values()).map(Vec::len).sum()
    }

    /// True if nothing is bound
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
