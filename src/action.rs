//! Actions configured in a CSV catalog.
//!
//! The catalog has a header row naming at least the `Label`, `Name`, `fn` and `Selection`
//! columns, in any order:
//!
//! ```text
//! Label,Name,fn,Selection
//! Merge Inputs,merge,"merge(a, b)",+
//! Add Point,addpoint,add_point(),xform
//! ```
//!
//! `Selection` decides when an action is offered: empty means always, `+` means whenever
//! something is selected, anything else must be the type name of the first selected node.
use std::borrow::Cow;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::PaletteItem;

const LABEL: &str = "Label";
const NAME: &str = "Name";
const BODY: &str = "fn";
const SELECTION: &str = "Selection";

/// Errors raised while loading an action catalog or a key map
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The file could not be read
    #[error("cannot read catalog: {0}")]
    Io(#[from] std::io::Error),
    /// The header row lacks a required column
    #[error("catalog has no `{0}` column")]
    MissingColumn(&'static str),
    /// A record could not be parsed
    #[error("malformed catalog at line {line}: {reason}")]
    Malformed {
        /// 1-based line where the record starts
        line: usize,
        /// What went wrong
        reason: String,
    },
}

/// A configured action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    /// Human readable label
    pub label: String,
    /// Short name
    pub name: String,
    /// Opaque body, handed back to the host when the action is invoked
    #[serde(rename = "fn")]
    pub body: String,
    /// Selector deciding when the action is offered
    pub selection: String,
}

impl PaletteItem for Action {
    fn variants(&self) -> Vec<Cow<'_, str>> {
        vec![Cow::Borrowed(self.label.as_str()), Cow::Borrowed(self.name.as_str())]
    }

    fn id(&self) -> Cow<'_, str> {
        Cow::Borrowed(self.name.as_str())
    }
}

/// True if an action with `selector` applies to a selection whose node type names are
/// `selected`, first selected node first
pub fn selector_matches(selector: &str, selected: &[&str]) -> bool {
    match selector {
        "" => true,
        "+" => !selected.is_empty(),
        _ => selected.first().is_some_and(|first| *first == selector),
    }
}

/// Actions grouped by selector, in file order
#[derive(Debug, Clone, Default)]
pub struct ActionCatalog {
    actions: IndexMap<String, Vec<Action>>,
}

impl ActionCatalog {
    /// Reads and parses a catalog file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let catalog = Self::parse(&text)?;
        debug!("loaded {} actions from {}", catalog.len(), path.display());
        Ok(catalog)
    }

    /// Parses catalog text
    pub fn parse(text: &str) -> Result<Self, CatalogError> {
        let mut records = split_records(text)?.into_iter();
        let Some((_, header)) = records.next() else {
            return Err(CatalogError::MissingColumn(LABEL));
        };

        let column = |name: &'static str| {
            header
                .iter()
                .position(|h| h.trim() == name)
                .ok_or(CatalogError::MissingColumn(name))
        };
        let label = column(LABEL)?;
        let name = column(NAME)?;
        let body = column(BODY)?;
        let selection = column(SELECTION)?;
        let width = label.max(name).max(body).max(selection) + 1;

        let mut actions: IndexMap<String, Vec<Action>> = IndexMap::new();
        for (line, fields) in records {
            if fields.len() < width {
                return Err(CatalogError::Malformed {
                    line,
                    reason: format!("expected at least {width} fields, found {}", fields.len()),
                });
            }
            let action = Action {
                label: fields[label].clone(),
                name: fields[name].clone(),
                body: fields[body].clone(),
                selection: fields[selection].trim().to_string(),
            };
            trace!("action {:?} for selector {:?}", action.name, action.selection);
            actions.entry(action.selection.clone()).or_default().push(action);
        }

        Ok(Self { actions })
    }

    /// Replaces the catalog with the content of `path`.
    ///
    /// On failure the current actions are kept and the error is returned.
    pub fn reload(&mut self, path: impl AsRef<Path>) -> Result<(), CatalogError> {
        match Self::load(path) {
            Ok(catalog) => {
                *self = catalog;
                Ok(())
            }
            Err(e) => {
                warn!("keeping previous action catalog: {e}");
                Err(e)
            }
        }
    }

    /// Actions applicable to the selection, in catalog order
    pub fn find(&self, selected: &[&str]) -> Vec<&Action> {
        self.actions
            .iter()
            .filter(|(selector, _)| selector_matches(selector, selected))
            .flat_map(|(_, actions)| actions.iter())
            .collect()
    }

    /// Number of actions
    pub fn len(&self) -> usize {
        self.actions.values().map(Vec::len).sum()
    }

    /// True if the catalog holds no action
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every action, in catalog order
    pub fn iter(&self) -> impl Iterator<Item = &Action> {
        self.actions.values().flatten()
    }
}

/// Splits CSV text into records, each tagged with the line it starts on.
///
/// Fields may be quoted; quoted fields can hold commas, newlines and doubled quotes.
/// Blank lines are skipped.
pub(crate) fn split_records(text: &str) -> Result<Vec<(usize, Vec<String>)>, CatalogError> {
    let mut records = Vec::new();
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut line = 1;
    let mut start = 1;

    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        if in_quotes {
            match ch {
                '"' if chars.next_if_eq(&'"').is_some() => field.push('"'),
                '"' => in_quotes = false,
                '\n' => {
                    line += 1;
                    field.push('\n');
                }
                c => field.push(c),
            }
            continue;
        }

        match ch {
            '"' if field.is_empty() => in_quotes = true,
            ',' => fields.push(std::mem::take(&mut field)),
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => {
                fields.push(std::mem::take(&mut field));
                push_record(&mut records, start, std::mem::take(&mut fields));
                line += 1;
                start = line;
            }
            c => field.push(c),
        }
    }

    if in_quotes {
        return Err(CatalogError::Malformed {
            line: start,
            reason: "unterminated quoted field".to_string(),
        });
    }
    fields.push(field);
    push_record(&mut records, start, fields);
    Ok(records)
}

fn push_record(records: &mut Vec<(usize, Vec<String>)>, line: usize, fields: Vec<String>) {
    let blank = fields.len() == 1 && fields[0].trim().is_empty();
    if !blank {
        records.push((line, fields));
    }
}

#[cfg(test)]
#[cfg_attr(coverage, coverage(off))]
mod tests {
    use super::*;

    const CATALOG: &str = "Label,Name,fn,Selection\n\
                           Merge Inputs,merge,\"merge(a, b)\",+\n\
                           \n\
                           Add Point,addpoint,add_point(),xform\n\
                           Home,home,home(),\n";

    #[test]
    fn parses_rows() {
        let catalog = ActionCatalog::parse(CATALOG).unwrap();
        assert_eq!(catalog.len(), 3);
        let merge = catalog.iter().next().unwrap();
        assert_eq!(merge.body, "merge(a, b)");
        assert_eq!(merge.selection, "+");
    }

    #[test]
    fn columns_in_any_order() {
        let text = "Selection,extra,fn,Name,Label\r\nxform,ignored,f(),n,L\r\n";
        let catalog = ActionCatalog::parse(text).unwrap();
        let action = catalog.iter().next().unwrap();
        assert_eq!(
            action,
            &Action {
                label: "L".into(),
                name: "n".into(),
                body: "f()".into(),
                selection: "xform".into(),
            }
        );
    }

    #[test]
    fn quoted_fields() {
        let text = "Label,Name,fn,Selection\n\"Say \"\"hi\"\"\",hi,\"print(1)\nprint(2)\",\n";
        let catalog = ActionCatalog::parse(text).unwrap();
        let action = catalog.iter().next().unwrap();
        assert_eq!(action.label, "Say \"hi\"");
        assert_eq!(action.body, "print(1)\nprint(2)");
    }

    #[test]
    fn missing_column() {
        let err = ActionCatalog::parse("Label,Name,Selection\na,b,\n").unwrap_err();
        assert!(matches!(err, CatalogError::MissingColumn("fn")));
        assert!(matches!(ActionCatalog::parse(""), Err(CatalogError::MissingColumn(_))));
    }

    #[test]
    fn malformed_records() {
        let err = ActionCatalog::parse("Label,Name,fn,Selection\na,b\n").unwrap_err();
        assert!(matches!(err, CatalogError::Malformed { line: 2, .. }));

        let err = ActionCatalog::parse("Label,Name,fn,Selection\n\n\"open,b,c,d\n").unwrap_err();
        assert!(matches!(err, CatalogError::Malformed { line: 3, .. }));
    }

    #[test]
    fn find_by_selection() {
        let catalog = ActionCatalog::parse(CATALOG).unwrap();
        let names = |selected: &[&str]| -> Vec<String> {
            catalog.find(selected).iter().map(|a| a.name.clone()).collect()
        };

        assert_eq!(names(&[]), ["home"]);
        assert_eq!(names(&["xform", "box"]), ["merge", "addpoint", "home"]);
        assert_eq!(names(&["box", "xform"]), ["merge", "home"]);
    }

    #[test]
    fn selectors() {
        assert!(selector_matches("", &[]));
        assert!(!selector_matches("+", &[]));
        assert!(selector_matches("+", &["box"]));
        assert!(!selector_matches("xform", &[]));
    }

    #[test]
    fn action_variants() {
        let action = Action {
            label: "Merge Inputs".into(),
            name: "merge".into(),
            body: String::new(),
            selection: String::new(),
        };
        assert_eq!(action.variants(), ["Merge Inputs", "merge"]);
        assert_eq!(action.id(), "merge");
    }
}
