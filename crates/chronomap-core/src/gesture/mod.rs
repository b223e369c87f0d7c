pub mod arbiter;
pub mod input;
pub mod state;

pub use arbiter::{GestureArbiter, GestureOutcome};
pub use input::{
    ButtonId, InputSource, PointerEvent, PointerKind, ScrollEvent, SequenceId, TouchEvent,
    TouchPhase,
};
pub use state::{GestureMode, GestureState, ScrollAnchor, TapHistory};
