use std::{
    borrow::Cow,
    fmt::{Debug, Display},
};

use crate::AsAny;

/// A `PaletteItem` is anything the palette can offer to the user: a parameter, an action,
/// a node type to create...
///
/// An item is described by an ordered, non-empty list of name variants. The first variant is
/// the display label, the following ones are short alternate names (e.g. `tx`, `ty`, `tz`).
///
/// # Downcast Example
/// The palette hands items back as `Arc<dyn PaletteItem>`. Use `as_any` to get the concrete
/// type back.
///
/// ```rust
/// use hcommander::prelude::*;
///
/// struct Shelf {
///     tool: String,
/// }
///
/// impl PaletteItem for Shelf {
///     fn variants(&self) -> Vec<Cow<'_, str>> {
///         vec![Cow::Borrowed(&self.tool)]
///     }
/// }
///
/// let item: Arc<dyn PaletteItem> = Arc::new(Shelf { tool: String::from("Box") });
/// let shelf: &Shelf = (*item).as_any().downcast_ref::<Shelf>().expect("not a shelf");
/// assert_eq!(shelf.tool, "Box");
/// ```
pub trait PaletteItem: AsAny + Send + Sync + 'static {
    /// The name variants used for matching, display label first
    fn variants(&self) -> Vec<Cow<'_, str>>;

    /// Opaque identifier handed back to the host, defaults to the display label
    fn id(&self) -> Cow<'_, str> {
        self.variants().into_iter().next().unwrap_or_default()
    }

    /// Secondary sort key supplied by the host, lower sorts first.
    ///
    /// Only consulted when the rank criteria include `priority`.
    fn priority(&self) -> i64 {
        0
    }
}

//------------------------------------------------------------------------------
// Implement PaletteItem for raw strings

impl<T: AsRef<str> + Send + Sync + 'static> PaletteItem for T {
    fn variants(&self) -> Vec<Cow<'_, str>> {
        vec![Cow::Borrowed(self.as_ref())]
    }
}

impl Display for dyn PaletteItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.id())
    }
}

impl Debug for dyn PaletteItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaletteItem")
            .field("id", &self.id())
            .field("variants", &self.variants())
            .finish()
    }
}
