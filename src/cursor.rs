//! Keyboard cursor for the node graph.
//!
//! Arrow keys move a cursor over the graph grid and select what lies under it. Holding Shift
//! while moving drags out a selection box instead; Alt+Shift moves the whole box. Releasing
//! Shift completes the box.
use serde::Serialize;

use crate::event::{Key, KeyCode, UiEvent};

/// Half the side of the square selected under the cursor
pub const HALF_EXTENT: f64 = 0.25;

/// Grid units moved per arrow key while Ctrl is held
pub const CTRL_MULTIPLIER: i32 = 10;

/// A position in graph units
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Point {
    /// Horizontal position
    pub x: f64,
    /// Vertical position, up is positive
    pub y: f64,
}

impl Point {
    /// A point
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + f64::from(dx), self.y + f64::from(dy))
    }
}

/// An axis-aligned rectangle in graph units
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Rect {
    /// Lower left corner
    pub min: Point,
    /// Upper right corner
    pub max: Point,
}

impl Rect {
    /// The rectangle spanned by two opposite corners, in any order
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            min: Point::new(a.x.min(b.x), a.y.min(b.y)),
            max: Point::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    /// The square of side `2 * HALF_EXTENT` centred on `center`
    pub fn around(center: Point) -> Self {
        Self {
            min: Point::new(center.x - HALF_EXTENT, center.y - HALF_EXTENT),
            max: Point::new(center.x + HALF_EXTENT, center.y + HALF_EXTENT),
        }
    }

    /// True if `p` lies inside or on the border
    pub fn contains(&self, p: Point) -> bool {
        (self.min.x..=self.max.x).contains(&p.x) && (self.min.y..=self.max.y).contains(&p.y)
    }
}

/// Grid move requested by a key: arrows move by one unit, ten with Ctrl
pub fn interpret(key: &Key) -> (i32, i32) {
    let (dx, dy) = match key.code {
        KeyCode::Up => (0, 1),
        KeyCode::Down => (0, -1),
        KeyCode::Left => (-1, 0),
        KeyCode::Right => (1, 0),
        _ => (0, 0),
    };
    if key.mods.ctrl {
        (dx * CTRL_MULTIPLIER, dy * CTRL_MULTIPLIER)
    } else {
        (dx, dy)
    }
}

/// What the host should do after a cursor event
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum CursorOutcome {
    /// Not a cursor event, pass it on
    Ignored,
    /// The cursor was placed under the mouse; the event still belongs to the host
    Snapped(Point),
    /// The cursor moved, select what lies in `select`
    Moved {
        /// New cursor position
        position: Point,
        /// Area to select
        select: Rect,
    },
    /// A box selection is in progress, preview `rect`
    Picking(Rect),
    /// The box selection finished, select what lies in the rectangle
    Picked(Rect),
}

impl CursorOutcome {
    /// True if the host should not process the event further
    pub fn consumed(&self) -> bool {
        !matches!(self, CursorOutcome::Ignored | CursorOutcome::Snapped(_))
    }
}

/// The graph cursor and its pending box selection
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GridCursor {
    position: Point,
    drag: Option<Point>,
}

impl GridCursor {
    /// A cursor at `position`
    pub fn at(position: Point) -> Self {
        Self { position, drag: None }
    }

    /// Current position, the anchor of a box selection
    pub fn position(&self) -> Point {
        self.position
    }

    /// True while a box selection is in progress
    pub fn is_picking(&self) -> bool {
        self.drag.is_some()
    }

    /// Feeds one editor event to the cursor
    pub fn handle(&mut self, event: &UiEvent) -> CursorOutcome {
        match self.drag {
            Some(drag) => self.handle_pick(drag, event),
            None => self.handle_idle(event),
        }
    }

    fn handle_idle(&mut self, event: &UiEvent) -> CursorOutcome {
        let key = match event {
            UiEvent::MouseDown { x, y } => {
                self.position = Point::new(x.round(), y.round());
                trace!("cursor: snapped to {:?}", self.position);
                return CursorOutcome::Snapped(self.position);
            }
            UiEvent::KeyHit(key) => key,
            _ => return CursorOutcome::Ignored,
        };
        if key.mods.alt {
            return CursorOutcome::Ignored;
        }
        let (dx, dy) = interpret(key);
        if (dx, dy) == (0, 0) {
            return CursorOutcome::Ignored;
        }

        if key.mods.shift {
            // the drag corner starts on the cursor, later keys move it
            self.drag = Some(self.position);
            debug!("cursor: box pick from {:?}", self.position);
            return CursorOutcome::Picking(Rect::from_corners(self.position, self.position));
        }

        self.position = self.position.offset(dx, dy);
        CursorOutcome::Moved {
            position: self.position,
            select: Rect::around(self.position),
        }
    }

    fn handle_pick(&mut self, mut drag: Point, event: &UiEvent) -> CursorOutcome {
        let key = match event {
            UiEvent::KeyDown { key, .. } | UiEvent::KeyUp(key) | UiEvent::KeyHit(key) => Some(key),
            UiEvent::FocusLost => {
                debug!("cursor: box pick abandoned");
                self.drag = None;
                return CursorOutcome::Ignored;
            }
            // mouse events carry no modifiers: only a key event without Shift ends the pick
            UiEvent::MouseDown { .. } | UiEvent::MouseWheel(_) | UiEvent::Text(_) => None,
        };
        let Some(key) = key else {
            return CursorOutcome::Picking(Rect::from_corners(self.position, drag));
        };

        if !key.mods.shift {
            self.drag = None;
            let rect = Rect::from_corners(self.position, drag);
            debug!("cursor: box pick done {rect:?}");
            return CursorOutcome::Picked(rect);
        }

        let (dx, dy) = if matches!(event, UiEvent::KeyHit(_)) { interpret(key) } else { (0, 0) };
        if key.mods.alt {
            self.position = self.position.offset(dx, dy);
        }
        drag = drag.offset(dx, dy);
        self.drag = Some(drag);
        CursorOutcome::Picking(Rect::from_corners(self.position, drag))
    }
}
