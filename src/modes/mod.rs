//! Editing modes. Exactly one is active; switching replaces the whole variant,
//! which drops every piece of mode-local state with it.

pub mod basic;
pub mod drag;
pub mod magic_pen;

use serde::{Deserialize, Serialize};

pub use basic::{AverageReport, BasicState};
pub use drag::{DragOutcome, DragState, PointDrag};
pub use magic_pen::{PenState, Stroke};

use crate::data_types::DeviceId;
use crate::surface::InputPolicy;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ModeKind {
    #[default]
    Basic,
    Drag,
    MagicPen,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Mode {
    Basic(BasicState),
    Drag(DragState),
    MagicPen(PenState),
}

impl Mode {
    pub fn new(kind: ModeKind) -> Self {
        match kind {
            ModeKind::Basic => Mode::Basic(BasicState::default()),
            ModeKind::Drag => Mode::Drag(DragState::default()),
            ModeKind::MagicPen => Mode::MagicPen(PenState::default()),
        }
    }

    pub fn kind(&self) -> ModeKind {
        match self {
            Mode::Basic(_) => ModeKind::Basic,
            Mode::Drag(_) => ModeKind::Drag,
            Mode::MagicPen(_) => ModeKind::MagicPen,
        }
    }

    /// Basic mode leaves the left button to the surface's box selection;
    /// the editing modes take the pointer over.
    pub fn input_policy(&self) -> InputPolicy {
        match self {
            Mode::Basic(_) => InputPolicy {
                native_box_selection: true,
                capture_pointer: false,
                suppress_native_drag: false,
            },
            Mode::Drag(_) | Mode::MagicPen(_) => InputPolicy {
                native_box_selection: false,
                capture_pointer: true,
                suppress_native_drag: true,
            },
        }
    }

    /// Device edited by drag or pen gestures.
    pub fn edit_target(&self) -> Option<&DeviceId> {
        match self {
            Mode::Basic(_) => None,
            Mode::Drag(state) => state.target.as_ref(),
            Mode::MagicPen(state) => state.target.as_ref(),
        }
    }

    pub fn basic(&self) -> Option<&BasicState> {
        match self {
            Mode::Basic(state) => Some(state),
            _ => None,
        }
    }

    pub fn basic_mut(&mut self) -> Option<&mut BasicState> {
        match self {
            Mode::Basic(state) => Some(state),
            _ => None,
        }
    }
}

impl Default for Mode {
    fn default() -> Self {
        Mode::new(ModeKind::Basic)
    }
}
