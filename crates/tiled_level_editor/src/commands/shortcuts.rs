//! Keyboard shortcut handling

use bevy::prelude::*;

use super::EditorCommand;
use crate::tools::{EditSession, EditTool};
use tiled_level_core::MirrorAxis;

/// Commands bound to keys pressed this frame, in the order they run
pub fn shortcut_commands(keyboard: &ButtonInput<KeyCode>) -> Vec<EditorCommand> {
    let ctrl = keyboard.pressed(KeyCode::ControlLeft) || keyboard.pressed(KeyCode::ControlRight);
    let shift = keyboard.pressed(KeyCode::ShiftLeft) || keyboard.pressed(KeyCode::ShiftRight);
    let mut commands = Vec::new();

    if ctrl {
        // Ctrl+S - Save
        if keyboard.just_pressed(KeyCode::KeyS) {
            commands.push(EditorCommand::Save);
        }
        return commands;
    }

    // Escape - drop the running stroke or held selection
    if keyboard.just_pressed(KeyCode::Escape) {
        commands.push(EditorCommand::CancelAction);
    }

    // 1-5 - tools
    let tools = [
        (KeyCode::Digit1, EditTool::Select),
        (KeyCode::Digit2, EditTool::Paint),
        (KeyCode::Digit3, EditTool::Eraser),
        (KeyCode::Digit4, EditTool::Eyedropper),
        (KeyCode::Digit5, EditTool::Fill),
    ];
    for (key, tool) in tools {
        if keyboard.just_pressed(key) {
            commands.push(EditorCommand::SwitchTool(tool));
        }
    }

    // R / Space - rotate, Shift for counter-clockwise
    if keyboard.just_pressed(KeyCode::KeyR) || keyboard.just_pressed(KeyCode::Space) {
        commands.push(EditorCommand::Rotate { clockwise: !shift });
    }

    // X / Y / Shift+Z - mirror the brush
    if keyboard.just_pressed(KeyCode::KeyX) {
        commands.push(EditorCommand::Mirror(MirrorAxis::X));
    }
    if keyboard.just_pressed(KeyCode::KeyY) {
        commands.push(EditorCommand::Mirror(MirrorAxis::Y));
    }
    if keyboard.just_pressed(KeyCode::KeyZ) && shift {
        commands.push(EditorCommand::Mirror(MirrorAxis::Z));
    }

    if keyboard.just_pressed(KeyCode::KeyM) {
        commands.push(EditorCommand::ToggleMultiMode);
    }
    if keyboard.just_pressed(KeyCode::KeyG) {
        commands.push(EditorCommand::ToggleSnap);
    }
    if keyboard.just_pressed(KeyCode::KeyH) {
        commands.push(EditorCommand::ToggleHelper);
    }

    // PageUp / PageDown - floor above / below
    if keyboard.just_pressed(KeyCode::PageUp) {
        commands.push(EditorCommand::EditAnotherFloor { up: true });
    }
    if keyboard.just_pressed(KeyCode::PageDown) {
        commands.push(EditorCommand::EditAnotherFloor { up: false });
    }

    // Delete - selected items on this floor, Shift+Delete on every floor
    if keyboard.just_pressed(KeyCode::Delete) {
        commands.push(if shift {
            EditorCommand::ClearSelectedItemInstances
        } else {
            EditorCommand::ClearSelectedItemInstancesInActiveFloor
        });
    }

    commands
}

/// Handle keyboard shortcuts
pub fn handle_keyboard_shortcuts(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut session: ResMut<EditSession>,
) {
    for command in shortcut_commands(&keyboard) {
        if command.can_execute(&session) {
            command.execute(&mut session);
        }
    }
}
