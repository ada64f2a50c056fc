//! The things a palette offers: parameters, actions and node types.
use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::PaletteItem;
use crate::action::Action;

/// How the components of a parameter tuple are named
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamingScheme {
    /// `tx`, `ty`, `tz`, `tw`
    #[default]
    Xyzw,
    /// `cr`, `cg`, `cb`, `ca`
    Rgba,
    /// `uvu`, `uvv`, `uvw`
    Uvw,
    /// `size1`, `size2`, ...
    Base1,
    /// Components without a known suffix
    Other,
}

impl NamingScheme {
    /// Suffix of the component at `index`, if the scheme names it
    pub fn suffix(&self, index: usize) -> Option<Cow<'static, str>> {
        let letters = match self {
            NamingScheme::Xyzw => "xyzw",
            NamingScheme::Rgba => "rgba",
            NamingScheme::Uvw => "uvw",
            NamingScheme::Base1 => return Some(Cow::Owned((index + 1).to_string())),
            NamingScheme::Other => return None,
        };
        letters.get(index..index + 1).map(Cow::Borrowed)
    }
}

/// A parameter tuple of the selected node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParmCandidate {
    /// Internal name, e.g. `t`
    pub name: String,
    /// Human readable label, e.g. `Translate`
    pub label: String,
    /// Naming scheme of the components
    #[serde(default)]
    pub naming: NamingScheme,
    /// Number of components, 1 for a scalar parameter
    pub components: usize,
    /// False once the user changed the value
    #[serde(default = "default_true")]
    pub is_default: bool,
}

fn default_true() -> bool {
    true
}

impl ParmCandidate {
    /// A scalar parameter at its default value
    pub fn scalar(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::tuple(name, label, NamingScheme::Other, 1)
    }

    /// A parameter tuple at its default value
    pub fn tuple(name: impl Into<String>, label: impl Into<String>, naming: NamingScheme, components: usize) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            naming,
            components,
            is_default: true,
        }
    }

    /// Names of the individual components, e.g. `tx`, `ty`, `tz`.
    ///
    /// Scalar parameters and unknown schemes have none.
    pub fn component_names(&self) -> Vec<String> {
        if self.components < 2 {
            return Vec::new();
        }
        (0..self.components)
            .filter_map(|i| self.naming.suffix(i).map(|s| format!("{}{}", self.name, s)))
            .collect()
    }

    /// `Translate: t - XYZ`
    ///
    /// ```
    /// use hcommander::candidate::{NamingScheme, ParmCandidate};
    ///
    /// let parm = ParmCandidate::tuple("t", "Translate", NamingScheme::Xyzw, 3);
    /// assert_eq!(parm.display_label(), "Translate: t - XYZ");
    /// let parm = ParmCandidate::tuple("size", "Size", NamingScheme::Base1, 2);
    /// assert_eq!(parm.display_label(), "Size: size - 12");
    /// ```
    pub fn display_label(&self) -> String {
        let mut label = format!("{}: {}", self.label, self.name);
        if self.components > 1 {
            let suffixes: String = (0..self.components)
                .filter_map(|i| self.naming.suffix(i))
                .map(|s| s.to_uppercase())
                .collect();
            if !suffixes.is_empty() {
                label.push_str(" - ");
                label.push_str(&suffixes);
            }
        }
        label
    }
}

/// A node type that can be created in the current network
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeTypeCandidate {
    /// Internal type name, e.g. `xform`
    pub name: String,
    /// Human readable label, e.g. `Transform`
    pub label: String,
}

/// A free-form candidate: an identifier and its variants
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextCandidate {
    /// Identifier handed back to the host
    pub id: String,
    /// Name variants, display label first
    pub variants: Vec<String>,
}

/// Anything the palette lists
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Candidate {
    /// A parameter of the selected node
    Parameter(ParmCandidate),
    /// A configured action
    Action(Action),
    /// A node type to create
    NodeType(NodeTypeCandidate),
    /// A plain candidate, e.g. read from a line of text
    Text(TextCandidate),
}

impl Candidate {
    /// A plain candidate
    pub fn text<S, I>(id: impl Into<String>, variants: I) -> Self
    where
        S: Into<String>,
        I: IntoIterator<Item = S>,
    {
        Candidate::Text(TextCandidate {
            id: id.into(),
            variants: variants.into_iter().map(Into::into).collect(),
        })
    }

    /// The label shown in the list
    pub fn display_label(&self) -> String {
        match self {
            Candidate::Parameter(parm) => parm.display_label(),
            Candidate::Action(action) => format!("{}: {}", action.label, action.name),
            Candidate::NodeType(node) => node.label.clone(),
            Candidate::Text(text) => text.variants.first().cloned().unwrap_or_default(),
        }
    }
}

impl PaletteItem for Candidate {
    fn variants(&self) -> Vec<Cow<'_, str>> {
        match self {
            Candidate::Parameter(parm) => {
                let mut res = vec![Cow::Borrowed(parm.label.as_str()), Cow::Borrowed(parm.name.as_str())];
                res.extend(parm.component_names().into_iter().map(Cow::Owned));
                res
            }
            Candidate::Action(action) => action.variants(),
            Candidate::NodeType(node) => vec![Cow::Borrowed(node.label.as_str()), Cow::Borrowed(node.name.as_str())],
            Candidate::Text(text) => text.variants.iter().map(|v| Cow::Borrowed(v.as_str())).collect(),
        }
    }

    fn id(&self) -> Cow<'_, str> {
        match self {
            Candidate::Parameter(parm) => Cow::Borrowed(parm.name.as_str()),
            Candidate::Action(action) => Cow::Borrowed(action.name.as_str()),
            Candidate::NodeType(node) => Cow::Borrowed(node.name.as_str()),
            Candidate::Text(text) => Cow::Borrowed(text.id.as_str()),
        }
    }

    fn priority(&self) -> i64 {
        match self {
            Candidate::Parameter(parm) if !parm.is_default => -1,
            _ => 0,
        }
    }
}

impl From<ParmCandidate> for Candidate {
    fn from(parm: ParmCandidate) -> Self {
        Candidate::Parameter(parm)
    }
}

impl From<Action> for Candidate {
    fn from(action: Action) -> Self {
        Candidate::Action(action)
    }
}

impl From<NodeTypeCandidate> for Candidate {
    fn from(node: NodeTypeCandidate) -> Self {
        Candidate::NodeType(node)
    }
}
