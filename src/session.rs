//! The palette session: what happens between opening the palette and closing it.
//!
//! A [`Session`] is owned by the host and fed every editor event through
//! [`Session::handle`]. It answers whether the event was consumed and which [`Effect`]s the
//! host has to apply (write a parameter, commit an undo group, run an action...). The session
//! never touches the host's object model itself.
//!
//! ```text
//!            Space down / Shift+Space            accept parameter
//!   Idle ─────────────────────────────▶ Palette ─────────────────▶ ParmEdit
//!    ▲                                    │                          │
//!    └──────── cancel / accept action ────┘◀──── commit / revert ────┘
//! ```
use std::sync::Arc;

use crate::action::{Action, ActionCatalog};
use crate::candidate::{Candidate, NodeTypeCandidate, ParmCandidate, TextCandidate};
use crate::event::{Key, KeyCode, Modifiers, UiEvent};
use crate::index::CandidateIndex;
use crate::item::{MatchedItem, RankBuilder};
use crate::{PaletteEngine, PaletteItem};

/// Undo group label of a committed parameter edit
pub const PARM_CHANGE_LABEL: &str = "Parameter Change";

/// Value change per wheel step or arrow key in the parameter editor
pub const PARM_STEP: f64 = 0.1;

/// What the session needs to know about the host editor
pub trait Host {
    /// Type names of the selected nodes, first selected first
    fn selected_types(&self) -> Vec<String>;

    /// Parameters of the first selected node
    fn parameters(&self) -> Vec<ParmCandidate>;

    /// Current values of a parameter tuple, one per component
    fn parm_values(&self, parm: &ParmCandidate) -> Vec<f64>;

    /// Node types that can be created in the current network
    fn node_types(&self) -> Vec<NodeTypeCandidate> {
        Vec::new()
    }

    /// Free-form entries listed last, handed back by id when chosen
    fn extra_entries(&self) -> Vec<TextCandidate> {
        Vec::new()
    }
}

/// Work the host has to carry out after an event
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Live-preview one component of a parameter
    SetParm {
        /// Parameter tuple name
        parm: String,
        /// Component index
        component: usize,
        /// New value
        value: f64,
    },
    /// Revert one component to its default value
    ResetParm {
        /// Parameter tuple name
        parm: String,
        /// Component index
        component: usize,
    },
    /// Record the edited values in one undo group
    Commit {
        /// Parameter tuple name
        parm: String,
        /// Final values
        values: Vec<f64>,
        /// Undo group label
        label: &'static str,
    },
    /// Restore the values the parameter had before editing
    Revert {
        /// Parameter tuple name
        parm: String,
        /// Original values
        values: Vec<f64>,
    },
    /// Run a configured action
    InvokeAction(Action),
    /// Create a node of the given type
    CreateNode(String),
    /// A plain candidate was chosen
    Choose(String),
    /// The palette or the parameter editor closed
    Close,
}

/// Outcome of [`Session::handle`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Handled {
    /// True if the host should not process the event further
    pub consumed: bool,
    /// Effects to apply, in order
    pub effects: Vec<Effect>,
}

impl Handled {
    fn ignored() -> Self {
        Self::default()
    }

    fn consumed() -> Self {
        Self {
            consumed: true,
            effects: Vec::new(),
        }
    }

    fn with(effects: Vec<Effect>) -> Self {
        Self {
            consumed: true,
            effects,
        }
    }
}

//------------------------------------------------------------------------------
/// An open palette
#[derive(Debug)]
pub struct PaletteState {
    volatile: bool,
    query: String,
    candidates: Vec<Candidate>,
    index: CandidateIndex,
    results: Vec<MatchedItem>,
    row: usize,
}

impl PaletteState {
    /// True if releasing Space accepts the selection
    pub fn is_volatile(&self) -> bool {
        self.volatile
    }

    /// The current query
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Ranked matches of the current query
    pub fn results(&self) -> &[MatchedItem] {
        &self.results
    }

    /// The highlighted row
    pub fn row(&self) -> usize {
        self.row
    }

    /// The candidate on the highlighted row
    pub fn selected(&self) -> Option<&Candidate> {
        self.results.get(self.row).and_then(|m| self.candidates.get(m.index))
    }

    fn move_row(&mut self, delta: isize) {
        let last = self.results.len().saturating_sub(1);
        self.row = self.row.saturating_add_signed(delta).min(last);
    }
}

/// The parameter editor opened after accepting a parameter
#[derive(Debug, Clone, PartialEq)]
pub struct ParmEditor {
    parm: ParmCandidate,
    original: Vec<f64>,
    values: Vec<f64>,
    focus: usize,
}

impl ParmEditor {
    /// Opens an editor on the current values
    pub fn new(parm: ParmCandidate, values: Vec<f64>) -> Self {
        Self {
            parm,
            original: values.clone(),
            values,
            focus: 0,
        }
    }

    /// The edited parameter
    pub fn parm(&self) -> &ParmCandidate {
        &self.parm
    }

    /// Values before editing
    pub fn original(&self) -> &[f64] {
        &self.original
    }

    /// Live values
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Focused component
    pub fn focus(&self) -> usize {
        self.focus
    }

    fn nudge(&mut self, steps: f64) -> Vec<Effect> {
        let Some(value) = self.values.get_mut(self.focus) else {
            return Vec::new();
        };
        *value += steps * PARM_STEP;
        vec![Effect::SetParm {
            parm: self.parm.name.clone(),
            component: self.focus,
            value: *value,
        }]
    }

    fn edit_text(&mut self, text: &str) -> Vec<Effect> {
        let component = self.focus;
        let text = text.trim();
        if text.is_empty() {
            return vec![Effect::ResetParm {
                parm: self.parm.name.clone(),
                component,
            }];
        }
        match (text.parse::<f64>(), self.values.get_mut(component)) {
            (Ok(parsed), Some(value)) => {
                *value = parsed;
                vec![Effect::SetParm {
                    parm: self.parm.name.clone(),
                    component,
                    value: parsed,
                }]
            }
            (Err(e), _) => {
                trace!("ignoring {text:?}: {e}");
                Vec::new()
            }
            (Ok(_), None) => Vec::new(),
        }
    }

    fn cycle_focus(&mut self, backwards: bool) {
        let n = self.values.len().max(1);
        self.focus = if backwards { (self.focus + n - 1) % n } else { (self.focus + 1) % n };
    }

    fn commit(self) -> Vec<Effect> {
        vec![
            Effect::Commit {
                parm: self.parm.name,
                values: self.values,
                label: PARM_CHANGE_LABEL,
            },
            Effect::Close,
        ]
    }

    fn revert(self) -> Vec<Effect> {
        vec![
            Effect::Revert {
                parm: self.parm.name,
                values: self.original,
            },
            Effect::Close,
        ]
    }
}

#[derive(Debug, Default)]
enum State {
    #[default]
    Idle,
    Palette(PaletteState),
    ParmEdit(ParmEditor),
}

//------------------------------------------------------------------------------
/// A palette session, owned by the host
#[derive(Debug)]
pub struct Session {
    catalog: ActionCatalog,
    rank_builder: RankBuilder,
    max_query_len: Option<usize>,
    max_variant_len: Option<usize>,
    state: State,
}

impl Session {
    /// A closed session offering the actions of `catalog`
    pub fn new(catalog: ActionCatalog) -> Self {
        Self {
            catalog,
            rank_builder: RankBuilder::default(),
            max_query_len: None,
            max_variant_len: None,
            state: State::Idle,
        }
    }

    /// Sets the ranking criteria
    pub fn rank_builder(mut self, rank_builder: RankBuilder) -> Self {
        self.rank_builder = rank_builder;
        self
    }

    /// Sets the query and variant length limits
    pub fn limits(mut self, max_query_len: usize, max_variant_len: usize) -> Self {
        self.max_query_len = Some(max_query_len);
        self.max_variant_len = Some(max_variant_len);
        self
    }

    /// The action catalog, e.g. to reload it
    pub fn catalog_mut(&mut self) -> &mut ActionCatalog {
        &mut self.catalog
    }

    /// True when neither the palette nor the editor is open
    pub fn is_idle(&self) -> bool {
        matches!(self.state, State::Idle)
    }

    /// The open palette, if any
    pub fn palette(&self) -> Option<&PaletteState> {
        match &self.state {
            State::Palette(palette) => Some(palette),
            _ => None,
        }
    }

    /// The open parameter editor, if any
    pub fn editor(&self) -> Option<&ParmEditor> {
        match &self.state {
            State::ParmEdit(editor) => Some(editor),
            _ => None,
        }
    }

    /// True while the parameter editor receives the editor's events
    pub fn delegate_active(&self) -> bool {
        matches!(self.state, State::ParmEdit(_))
    }

    /// Feeds one event to the session
    pub fn handle(&mut self, host: &dyn Host, event: &UiEvent) -> Handled {
        match std::mem::take(&mut self.state) {
            State::Idle => self.handle_idle(host, event),
            State::Palette(palette) => self.handle_palette(host, palette, event),
            State::ParmEdit(editor) => self.handle_editor(editor, event),
        }
    }

    /// Opens the palette, replacing whatever was open.
    ///
    /// Lists changed parameters, the other parameters, the catalog actions for the selection,
    /// the creatable node types and the host's extra entries, in that order.
    pub fn open(&mut self, host: &dyn Host, volatile: bool) {
        let selected = host.selected_types();
        let selected: Vec<&str> = selected.iter().map(String::as_str).collect();

        let mut parms = host.parameters();
        // changed parameters first
        parms.sort_by_key(|p| p.is_default);

        let candidates: Vec<Candidate> = parms
            .into_iter()
            .map(Candidate::from)
            .chain(self.catalog.find(&selected).into_iter().cloned().map(Candidate::from))
            .chain(host.node_types().into_iter().map(Candidate::NodeType))
            .chain(host.extra_entries().into_iter().map(Candidate::Text))
            .collect();
        let index = CandidateIndex::build(
            candidates
                .iter()
                .map(|c| Arc::new(c.clone()) as Arc<dyn PaletteItem>),
        );
        debug!("session: open palette over {} candidates, volatile: {volatile}", candidates.len());

        let mut palette = PaletteState {
            volatile,
            query: String::new(),
            candidates,
            index,
            results: Vec::new(),
            row: 0,
        };
        self.rerun(&mut palette);
        self.state = State::Palette(palette);
    }

    fn rerun(&self, palette: &mut PaletteState) {
        let mut builder = PaletteEngine::builder().query(&palette.query);
        if let Some(len) = self.max_query_len {
            builder = builder.max_query_len(len);
        }
        if let Some(len) = self.max_variant_len {
            builder = builder.max_variant_len(len);
        }
        palette.results = builder.build().run(&palette.index, &self.rank_builder);
        palette.row = 0;
    }

    fn handle_idle(&mut self, host: &dyn Host, event: &UiEvent) -> Handled {
        const SPACE: Key = Key::new(KeyCode::Space);
        const SHIFT_SPACE: Key = Key::with(KeyCode::Space, Modifiers::SHIFT);

        match event {
            UiEvent::KeyDown {
                key: SPACE,
                auto_repeat: false,
            } => {
                self.open(host, true);
                Handled::consumed()
            }
            UiEvent::KeyHit(SHIFT_SPACE) => {
                self.open(host, false);
                Handled::consumed()
            }
            _ => Handled::ignored(),
        }
    }

    fn handle_palette(&mut self, host: &dyn Host, mut palette: PaletteState, event: &UiEvent) -> Handled {
        match event {
            UiEvent::KeyDown {
                key:
                    Key {
                        code: KeyCode::Space, ..
                    },
                auto_repeat: true,
            } if palette.volatile => {}
            UiEvent::KeyUp(Key {
                code: KeyCode::Space, ..
            }) => {
                if palette.volatile {
                    return self.accept(host, palette);
                }
            }
            UiEvent::Text(query) => {
                palette.query = query.clone();
                self.rerun(&mut palette);
                trace!("session: {} results for {:?}", palette.results.len(), palette.query);
            }
            UiEvent::KeyDown { key, .. } | UiEvent::KeyHit(key) => match key.code {
                KeyCode::Enter => return self.accept(host, palette),
                KeyCode::Escape => return self.close(),
                KeyCode::Up => palette.move_row(-1),
                KeyCode::Down => palette.move_row(1),
                _ => {}
            },
            UiEvent::FocusLost => return self.close(),
            _ => {}
        }
        self.state = State::Palette(palette);
        Handled::consumed()
    }

    fn accept(&mut self, host: &dyn Host, palette: PaletteState) -> Handled {
        let Some(candidate) = palette.selected().cloned() else {
            debug!("session: accepted without selection");
            return self.close();
        };
        debug!("session: accepted {}", candidate.id());

        let effect = match candidate {
            Candidate::Parameter(parm) => {
                let values = host.parm_values(&parm);
                self.state = State::ParmEdit(ParmEditor::new(parm, values));
                return Handled::consumed();
            }
            Candidate::Action(action) => Effect::InvokeAction(action),
            Candidate::NodeType(node) => Effect::CreateNode(node.name),
            Candidate::Text(text) => Effect::Choose(text.id),
        };
        self.state = State::Idle;
        Handled::with(vec![effect, Effect::Close])
    }

    fn close(&mut self) -> Handled {
        self.state = State::Idle;
        Handled::with(vec![Effect::Close])
    }

    fn handle_editor(&mut self, mut editor: ParmEditor, event: &UiEvent) -> Handled {
        let effects = match event {
            UiEvent::MouseWheel(steps) => editor.nudge(*steps),
            UiEvent::Text(text) => editor.edit_text(text),
            UiEvent::FocusLost => {
                debug!("session: reverting {}", editor.parm.name);
                return Handled::with(editor.revert());
            }
            UiEvent::KeyDown { key, .. } | UiEvent::KeyHit(key) => match key.code {
                KeyCode::Up => editor.nudge(1.0),
                KeyCode::Down => editor.nudge(-1.0),
                KeyCode::Tab => {
                    editor.cycle_focus(key.mods.shift);
                    Vec::new()
                }
                KeyCode::Enter => {
                    debug!("session: committing {}", editor.parm.name);
                    return Handled::with(editor.commit());
                }
                KeyCode::Escape => {
                    debug!("session: reverting {}", editor.parm.name);
                    return Handled::with(editor.revert());
                }
                _ => Vec::new(),
            },
            _ => Vec::new(),
        };
        self.state = State::ParmEdit(editor);
        Handled::with(effects)
    }
}

#[cfg(test)]
#[cfg_attr(coverage, coverage(off))]
mod tests {
    use super::*;
    use crate::candidate::NamingScheme;

    struct Editor;

    impl Host for Editor {
        fn selected_types(&self) -> Vec<String> {
            vec!["xform".into()]
        }

        fn parameters(&self) -> Vec<ParmCandidate> {
            let mut scale = ParmCandidate::scalar("scale", "Uniform Scale");
            scale.is_default = false;
            vec![ParmCandidate::tuple("t", "Translate", NamingScheme::Xyzw, 3), scale]
        }

        fn parm_values(&self, parm: &ParmCandidate) -> Vec<f64> {
            vec![1.0; parm.components]
        }

        fn node_types(&self) -> Vec<NodeTypeCandidate> {
            vec![NodeTypeCandidate {
                name: "attribwrangle".into(),
                label: "Attribute Wrangle".into(),
            }]
        }

        fn extra_entries(&self) -> Vec<TextCandidate> {
            vec![TextCandidate {
                id: "recent:1".into(),
                variants: vec!["Reload Shelf".into(), "rls".into()],
            }]
        }
    }

    fn session() -> Session {
        let catalog = ActionCatalog::parse("Label,Name,fn,Selection\nCenter Pivot,center,center(),xform\n").unwrap();
        Session::new(catalog)
    }

    fn ids(session: &Session) -> Vec<String> {
        session
            .palette()
            .unwrap()
            .results()
            .iter()
            .map(|m| m.item.id().into_owned())
            .collect()
    }

    #[test]
    fn opens_with_changed_parameters_first() {
        let mut s = session();
        let handled = s.handle(&Editor, &UiEvent::key_hit(Key::with(KeyCode::Space, Modifiers::SHIFT)));
        assert!(handled.consumed);
        assert!(!s.palette().unwrap().is_volatile());
        assert_eq!(ids(&s), ["scale", "t", "center", "attribwrangle", "recent:1"]);
    }

    #[test]
    fn idle_ignores_other_events() {
        let mut s = session();
        assert!(!s.handle(&Editor, &UiEvent::key_down(KeyCode::Enter)).consumed);
        assert!(!s.handle(&Editor, &UiEvent::MouseWheel(1.0)).consumed);
        assert!(s.is_idle());
    }

    #[test]
    fn typing_resets_row() {
        let mut s = session();
        s.handle(&Editor, &UiEvent::key_down(KeyCode::Space));
        for _ in 0..6 {
            s.handle(&Editor, &UiEvent::key_down(KeyCode::Down));
        }
        assert_eq!(s.palette().unwrap().row(), 4);

        s.handle(&Editor, &UiEvent::Text("tx".into()));
        let palette = s.palette().unwrap();
        assert_eq!(palette.row(), 0);
        assert_eq!(ids(&s), ["t"]);
    }

    #[test]
    fn volatile_accepts_on_space_release() {
        let mut s = session();
        s.handle(&Editor, &UiEvent::key_down(KeyCode::Space));
        let repeat = UiEvent::KeyDown {
            key: Key::new(KeyCode::Space),
            auto_repeat: true,
        };
        assert!(s.handle(&Editor, &repeat).consumed);
        s.handle(&Editor, &UiEvent::Text("center".into()));

        let handled = s.handle(&Editor, &UiEvent::key_up(KeyCode::Space));
        assert!(s.is_idle());
        assert!(matches!(&handled.effects[..], [Effect::InvokeAction(a), Effect::Close] if a.name == "center"));
    }

    #[test]
    fn escape_closes() {
        let mut s = session();
        s.handle(&Editor, &UiEvent::key_down(KeyCode::Space));
        let handled = s.handle(&Editor, &UiEvent::key_down(KeyCode::Escape));
        assert_eq!(handled.effects, [Effect::Close]);
        assert!(s.is_idle());
    }

    #[test]
    fn parameter_edit_commit() {
        let mut s = session();
        s.handle(&Editor, &UiEvent::key_hit(Key::with(KeyCode::Space, Modifiers::SHIFT)));
        s.handle(&Editor, &UiEvent::Text("ty".into()));
        s.handle(&Editor, &UiEvent::key_down(KeyCode::Enter));
        assert!(s.delegate_active());
        assert_eq!(s.editor().unwrap().values(), [1.0, 1.0, 1.0]);

        let handled = s.handle(&Editor, &UiEvent::MouseWheel(2.0));
        assert!(matches!(
            handled.effects[..],
            [Effect::SetParm { component: 0, value, .. }] if (value - 1.2).abs() < 1e-9
        ));
        s.handle(&Editor, &UiEvent::key_down(KeyCode::Tab));
        s.handle(&Editor, &UiEvent::key_down(KeyCode::Down));

        let handled = s.handle(&Editor, &UiEvent::key_down(KeyCode::Enter));
        assert!(!s.delegate_active());
        match &handled.effects[..] {
            [Effect::Commit { parm, values, label }, Effect::Close] => {
                assert_eq!(parm, "t");
                assert_eq!(*label, PARM_CHANGE_LABEL);
                assert!((values[0] - 1.2).abs() < 1e-9);
                assert!((values[1] - 0.9).abs() < 1e-9);
            }
            other => panic!("unexpected effects {other:?}"),
        }
    }

    #[test]
    fn parameter_edit_reverts_on_focus_loss() {
        let mut s = session();
        s.handle(&Editor, &UiEvent::key_down(KeyCode::Space));
        s.handle(&Editor, &UiEvent::Text("scale".into()));
        s.handle(&Editor, &UiEvent::key_up(KeyCode::Space));
        assert_eq!(s.editor().unwrap().parm().name, "scale");

        let handled = s.handle(&Editor, &UiEvent::Text("4.5".into()));
        assert_eq!(
            handled.effects,
            [Effect::SetParm {
                parm: "scale".into(),
                component: 0,
                value: 4.5
            }]
        );
        let handled = s.handle(&Editor, &UiEvent::Text("".into()));
        assert_eq!(
            handled.effects,
            [Effect::ResetParm {
                parm: "scale".into(),
                component: 0
            }]
        );
        assert!(s.handle(&Editor, &UiEvent::Text("abc".into())).effects.is_empty());

        let handled = s.handle(&Editor, &UiEvent::FocusLost);
        assert_eq!(
            handled.effects,
            [
                Effect::Revert {
                    parm: "scale".into(),
                    values: vec![1.0]
                },
                Effect::Close
            ]
        );
        assert!(s.is_idle());
    }

    #[test]
    fn accepting_node_type_creates_node() {
        let mut s = session();
        s.handle(&Editor, &UiEvent::key_hit(Key::with(KeyCode::Space, Modifiers::SHIFT)));
        s.handle(&Editor, &UiEvent::Text("wrangle".into()));
        let handled = s.handle(&Editor, &UiEvent::key_down(KeyCode::Enter));
        assert_eq!(handled.effects, [Effect::CreateNode("attribwrangle".into()), Effect::Close]);
        assert!(s.is_idle());
    }

    #[test]
    fn accepting_extra_entry_hands_back_id() {
        let mut s = session();
        s.handle(&Editor, &UiEvent::key_down(KeyCode::Space));
        s.handle(&Editor, &UiEvent::Text("rls".into()));
        let handled = s.handle(&Editor, &UiEvent::key_up(KeyCode::Space));
        assert_eq!(handled.effects, [Effect::Choose("recent:1".into()), Effect::Close]);
    }

    #[test]
    fn accept_without_results_closes() {
        let mut s = session();
        s.handle(&Editor, &UiEvent::key_down(KeyCode::Space));
        s.handle(&Editor, &UiEvent::Text("zzz".into()));
        let handled = s.handle(&Editor, &UiEvent::key_down(KeyCode::Enter));
        assert_eq!(handled.effects, [Effect::Close]);
    }
}
