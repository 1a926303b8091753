//! Editor commands
//!
//! Everything a toolbar button or key binding can trigger goes through
//! [`EditorCommand`], so hosts only need `can_execute` to grey out buttons
//! and `execute` to run them.

#[cfg(feature = "bevy")]
mod shortcuts;

#[cfg(feature = "bevy")]
pub use shortcuts::*;

use crate::tools::{BrushAction, EditSession, EditTool};
use tiled_level_core::MirrorAxis;
use tracing::{info, warn};

/// A command the host can issue against an [`EditSession`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorCommand {
    SwitchTool(EditTool),
    Rotate { clockwise: bool },
    Mirror(MirrorAxis),
    ToggleMultiMode,
    ToggleSnap,
    ToggleHelper,
    EditAnotherFloor { up: bool },
    ClearSelectedItemInstances,
    ClearSelectedItemInstancesInActiveFloor,
    CancelAction,
    Save,
}

impl EditorCommand {
    /// Whether the command would do anything right now
    pub fn can_execute(&self, session: &EditSession) -> bool {
        match self {
            Self::SwitchTool(tool) => session.tool() != *tool,
            Self::Rotate { .. } => session.can_rotate(),
            Self::Mirror(_) => session.can_mirror(),
            Self::ToggleMultiMode | Self::ToggleSnap | Self::ToggleHelper => true,
            Self::EditAnotherFloor { up } => {
                let level = session.level();
                let target = level.active_floor_position() + if *up { 1 } else { -1 };
                level.floor_exists(target)
            }
            Self::ClearSelectedItemInstances => !session.selected_items().is_empty(),
            Self::ClearSelectedItemInstancesInActiveFloor => {
                session.can_clear_selected_item_instances_in_active_floor()
            }
            Self::CancelAction => session.action() != BrushAction::None,
            Self::Save => session.project().path.is_some(),
        }
    }

    /// Run the command; returns whether anything changed
    pub fn execute(&self, session: &mut EditSession) -> bool {
        match *self {
            Self::SwitchTool(tool) => session.switch_tool(tool),
            Self::Rotate { clockwise } => session.rotate(clockwise),
            Self::Mirror(axis) => session.mirror(axis),
            Self::ToggleMultiMode => {
                let on = session.toggle_multi_mode();
                info!("Multi mode {}", if on { "on" } else { "off" });
                true
            }
            Self::ToggleSnap => {
                session.toggle_snap();
                true
            }
            Self::ToggleHelper => {
                session.toggle_helper();
                true
            }
            Self::EditAnotherFloor { up } => session.edit_another_floor(up),
            Self::ClearSelectedItemInstances => {
                !session.clear_selected_item_instances().is_empty()
            }
            Self::ClearSelectedItemInstancesInActiveFloor => !session
                .clear_selected_item_instances_in_active_floor()
                .is_empty(),
            Self::CancelAction => {
                let busy = self.can_execute(session);
                session.cancel_action();
                busy
            }
            Self::Save => match session.project_mut().save_current() {
                Ok(()) => true,
                Err(e) => {
                    warn!("Failed to save project: {}", e);
                    false
                }
            },
        }
    }
}
