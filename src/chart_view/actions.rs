use std::time::Instant;

use serde::{Deserialize, Serialize};

use super::input::InputOutcome;
use super::ChartView;
use crate::container::DataContainer;
use crate::data_types::DeviceId;
use crate::error::EditError;
use crate::modes::Mode;
use crate::surface::{RenderSurface, ScreenPoint};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyCommand {
    Undo,
    Redo,
    /// Drops the selection, the edit target and any gesture in progress.
    Escape,
    Copy,
    /// Pastes at the last pointer position.
    Paste,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MenuAction {
    Copy,
    Paste,
    ComputeAverage,
    AverageCopyTo,
    ClearSelection,
    RemoveClipboard,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuEntry {
    pub action: MenuAction,
    pub enabled: bool,
}

/// Basic-mode context menu, resolved at the right-click position.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextMenu {
    /// Device under the cursor, if any curve is close enough.
    pub target_device: Option<DeviceId>,
    pub timestamp: i64,
    pub entries: Vec<MenuEntry>,
}

impl ContextMenu {
    pub fn is_enabled(&self, action: MenuAction) -> bool {
        self.entries.iter().any(|e| e.action == action && e.enabled)
    }
}

impl ChartView {
    /// Builds the context menu, or `None` outside basic mode and right after a
    /// drag-pan.
    pub fn on_context_menu<C: DataContainer + ?Sized>(
        &mut self,
        position: ScreenPoint,
        at: Instant,
        container: &C,
        surface: &dyn RenderSurface,
    ) -> Option<ContextMenu> {
        if let Some(until) = self.suppress_context_menu_until.take() {
            if at < until {
                tracing::debug!("context menu suppressed after pan");
                return None;
            }
        }
        let state = self.mode.basic()?;

        let point = surface.normalize(position);
        let target_device = surface
            .nearest_series(point, self.config.viewport.hit_test_px)
            .map(|hit| hit.device_id)
            .filter(|device_id| container.is_known(device_id));
        let timestamp = surface.time_at(point.x);

        let has_selection = state.selection.is_some();
        let has_clipboard = state.clipboard.as_ref().is_some_and(|c| !c.is_empty());
        let paste_fits = state
            .clipboard
            .as_ref()
            .is_some_and(|c| c.single_device_id.is_some() == target_device.is_some());

        let entry = |action, enabled| MenuEntry { action, enabled };
        let entries = vec![
            entry(MenuAction::Copy, has_selection),
            entry(MenuAction::ComputeAverage, has_selection),
            entry(MenuAction::AverageCopyTo, has_selection && target_device.is_some()),
            entry(MenuAction::ClearSelection, has_selection),
            entry(MenuAction::Paste, has_clipboard && paste_fits),
            entry(MenuAction::RemoveClipboard, has_clipboard),
        ];

        Some(ContextMenu {
            target_device,
            timestamp,
            entries,
        })
    }

    /// Runs a context-menu entry against the menu's target and timestamp.
    pub fn run_menu_action<C: DataContainer + ?Sized>(
        &mut self,
        menu: &ContextMenu,
        action: MenuAction,
        container: &mut C,
    ) -> InputOutcome {
        let target = menu.target_device.as_deref();
        let result = match action {
            MenuAction::Copy => self.copy(container, target).map(InputOutcome::Notice),
            MenuAction::Paste => self
                .paste(container, target, menu.timestamp)
                .map(InputOutcome::Committed),
            MenuAction::ComputeAverage => self
                .compute_average(container, target)
                .map(InputOutcome::Average),
            MenuAction::AverageCopyTo => match target {
                Some(target) => self
                    .average_copy_to(container, target)
                    .map(InputOutcome::Committed),
                None => Err(EditError::TargetRequired),
            },
            MenuAction::ClearSelection => self.clear_selection().map(|()| InputOutcome::Consumed),
            MenuAction::RemoveClipboard => self.remove_clipboard().map(InputOutcome::Notice),
        };
        result.unwrap_or_else(InputOutcome::Rejected)
    }

    pub fn on_key<C: DataContainer + ?Sized>(
        &mut self,
        command: KeyCommand,
        container: &mut C,
        surface: &dyn RenderSurface,
    ) -> InputOutcome {
        let result = match command {
            KeyCommand::Undo => self.undo(container).map(InputOutcome::Committed),
            KeyCommand::Redo => self.redo(container).map(InputOutcome::Committed),
            KeyCommand::Escape => {
                self.escape();
                Ok(InputOutcome::Consumed)
            }
            KeyCommand::Copy => self.copy(container, None).map(InputOutcome::Notice),
            KeyCommand::Paste => {
                let Some(at) = self.hover else {
                    return InputOutcome::Ignored;
                };
                let target = surface
                    .nearest_series(at, self.config.viewport.hit_test_px)
                    .map(|hit| hit.device_id)
                    .filter(|device_id| container.is_known(device_id));
                let timestamp = surface.time_at(at.x);
                self.paste(container, target.as_deref(), timestamp)
                    .map(InputOutcome::Committed)
            }
        };
        result.unwrap_or_else(InputOutcome::Rejected)
    }

    fn escape(&mut self) {
        self.pan = None;
        match &mut self.mode {
            Mode::Basic(state) => state.clear_selection(),
            Mode::Drag(state) => {
                state.cancel();
                state.target = None;
            }
            Mode::MagicPen(state) => {
                state.cancel();
                state.set_target(None);
            }
        }
    }
}
