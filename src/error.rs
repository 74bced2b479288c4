//! User-facing error taxonomy.
//!
//! None of these are fatal: the operation is refused, state is untouched and
//! the user can simply retry. Hosts display them through [`Notice`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data_types::DeviceId;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("Select a time range first")]
    NoSelection,

    #[error("No data in the selected range")]
    EmptySelection,

    #[error("Paste a single-device copy onto a device curve")]
    TargetRequired,

    #[error("Paste a multi-device copy onto a blank area of the chart")]
    TargetMustBeBlank,

    #[error("Unknown device: {0}")]
    UnknownDevice(DeviceId),

    #[error("At least two points are needed to compute an average")]
    InsufficientData,

    #[error("No minute in the selection has data for the displayed metric")]
    NoValidBuckets,

    #[error("Clipboard is empty")]
    EmptyClipboard,

    #[error("Nothing to undo")]
    NothingToUndo,

    #[error("Nothing to redo")]
    NothingToRedo,

    #[error("This action is only available in basic mode")]
    WrongMode,
}

impl EditError {
    pub fn severity(&self) -> Severity {
        match self {
            EditError::NothingToUndo | EditError::NothingToRedo => Severity::Info,
            _ => Severity::Warning,
        }
    }

    pub fn notice(&self) -> Notice {
        Notice::new(self.severity(), self.to_string())
    }
}

/// Severity of a message shown to the user.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

/// Structured message/severity pair returned at every operation boundary.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub severity: Severity,
    pub message: String,
}

impl Notice {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(Severity::Info, message)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(Severity::Success, message)
    }

    /// Generic message for a failed cache write.
    pub fn retry() -> Self {
        Self::new(Severity::Error, "Operation failed, please retry")
    }
}

impl From<&EditError> for Notice {
    fn from(err: &EditError) -> Self {
        err.notice()
    }
}

impl From<EditError> for Notice {
    fn from(err: EditError) -> Self {
        err.notice()
    }
}
