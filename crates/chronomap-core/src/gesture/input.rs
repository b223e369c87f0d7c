use crate::view::Point;

/// Physical device class an event came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputSource {
    Mouse,
    Pen,
    Touchpad,
    Touchscreen,
}

/// Pointer button number, 1-based (1 = left, 2 = middle, 3 = right).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ButtonId(pub u8);

impl ButtonId {
    pub const PRIMARY: ButtonId = ButtonId(1);
    pub const SECONDARY: ButtonId = ButtonId(2);
    pub const TERTIARY: ButtonId = ButtonId(3);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerKind {
    Press(ButtonId),
    /// Second press of a double click, delivered after the regular press.
    DoublePress(ButtonId),
    Motion,
    Release(ButtonId),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerEvent {
    pub source: InputSource,
    pub kind: PointerKind,
    pub pos: Point,
}

impl PointerEvent {
    pub fn mouse(kind: PointerKind, x: f64, y: f64) -> Self {
        Self {
            source: InputSource::Mouse,
            kind,
            pos: Point::new(x, y),
        }
    }

    pub fn pen(kind: PointerKind, x: f64, y: f64) -> Self {
        Self {
            source: InputSource::Pen,
            kind,
            pos: Point::new(x, y),
        }
    }

    /// Button as the arbiter sees it. Pens draw paths and open the menu
    /// rather than panning, so pen 1 acts as mouse 2 and pen 2 as mouse 3.
    pub fn effective_button(&self) -> Option<ButtonId> {
        let button = match self.kind {
            PointerKind::Press(b) | PointerKind::DoublePress(b) | PointerKind::Release(b) => b,
            PointerKind::Motion => return None,
        };
        if self.source == InputSource::Pen {
            return Some(match button {
                ButtonId::PRIMARY => ButtonId::SECONDARY,
                ButtonId::SECONDARY => ButtonId::TERTIARY,
                other => other,
            });
        }
        Some(button)
    }
}

/// Identity of one touch contact for its whole lifetime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SequenceId(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TouchPhase {
    Begin,
    Update,
    End,
    Cancel,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TouchEvent {
    pub sequence: SequenceId,
    pub phase: TouchPhase,
    pub pos: Point,
}

impl TouchEvent {
    pub fn new(sequence: u64, phase: TouchPhase, x: f64, y: f64) -> Self {
        Self {
            sequence: SequenceId(sequence),
            phase,
            pos: Point::new(x, y),
        }
    }
}

/// Smooth-scroll step; positive `dy` zooms out.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollEvent {
    pub dy: f64,
    pub pos: Point,
}

impl ScrollEvent {
    pub fn new(dy: f64, x: f64, y: f64) -> Self {
        Self {
            dy,
            pos: Point::new(x, y),
        }
    }
}
