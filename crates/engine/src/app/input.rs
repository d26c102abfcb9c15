use winit::event::ElementState;
use winit::keyboard::{KeyCode, PhysicalKey};

use crate::world::grid::Direction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputAction {
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    Interact,
    Cancel,
    Pause,
    Quit,
}

const ACTION_COUNT: usize = 8;

impl InputAction {
    const fn index(self) -> usize {
        match self {
            InputAction::MoveUp => 0,
            InputAction::MoveDown => 1,
            InputAction::MoveLeft => 2,
            InputAction::MoveRight => 3,
            InputAction::Interact => 4,
            InputAction::Cancel => 5,
            InputAction::Pause => 6,
            InputAction::Quit => 7,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct ActionStates {
    down: [bool; ACTION_COUNT],
}

impl ActionStates {
    fn set(&mut self, action: InputAction, is_down: bool) {
        self.down[action.index()] = is_down;
    }

    fn is_down(&self, action: InputAction) -> bool {
        self.down[action.index()]
    }
}

/// Immutable per-tick view of the input state. Held keys are level
/// signals; interact/cancel/pause are edge pulses valid for exactly one
/// snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    quit_requested: bool,
    actions: ActionStates,
    interact_pressed: bool,
    cancel_pressed: bool,
    pause_pressed: bool,
}

impl InputSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    pub fn is_down(&self, action: InputAction) -> bool {
        self.actions.is_down(action)
    }

    pub fn interact_pressed(&self) -> bool {
        self.interact_pressed
    }

    pub fn cancel_pressed(&self) -> bool {
        self.cancel_pressed
    }

    pub fn pause_pressed(&self) -> bool {
        self.pause_pressed
    }

    /// Direction intent for the movement machine. Deterministic priority
    /// when several keys are held: up, down, left, right.
    pub fn direction_intent(&self) -> Option<Direction> {
        if self.is_down(InputAction::MoveUp) {
            Some(Direction::Up)
        } else if self.is_down(InputAction::MoveDown) {
            Some(Direction::Down)
        } else if self.is_down(InputAction::MoveLeft) {
            Some(Direction::Left)
        } else if self.is_down(InputAction::MoveRight) {
            Some(Direction::Right)
        } else {
            None
        }
    }

    pub fn with_action_down(mut self, action: InputAction, is_down: bool) -> Self {
        self.actions.set(action, is_down);
        self
    }

    pub fn with_interact_pressed(mut self, pressed: bool) -> Self {
        self.interact_pressed = pressed;
        self
    }

    pub fn with_cancel_pressed(mut self, pressed: bool) -> Self {
        self.cancel_pressed = pressed;
        self
    }

    pub fn with_pause_pressed(mut self, pressed: bool) -> Self {
        self.pause_pressed = pressed;
        self
    }
}

/// Accumulates raw key events between ticks and drains them into one
/// snapshot per fixed tick, so a key tapped between ticks is never lost
/// and an edge never fires twice.
#[derive(Debug, Default)]
pub struct InputCollector {
    quit_requested: bool,
    action_states: ActionStates,
    interact_is_down: bool,
    interact_pressed_edge: bool,
    cancel_is_down: bool,
    cancel_pressed_edge: bool,
    pause_is_down: bool,
    pause_pressed_edge: bool,
}

impl InputCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    pub fn handle_key(&mut self, key: PhysicalKey, state: ElementState) {
        let is_pressed = state == ElementState::Pressed;
        match key {
            PhysicalKey::Code(KeyCode::KeyW) | PhysicalKey::Code(KeyCode::ArrowUp) => {
                self.action_states.set(InputAction::MoveUp, is_pressed);
            }
            PhysicalKey::Code(KeyCode::KeyS) | PhysicalKey::Code(KeyCode::ArrowDown) => {
                self.action_states.set(InputAction::MoveDown, is_pressed);
            }
            PhysicalKey::Code(KeyCode::KeyA) | PhysicalKey::Code(KeyCode::ArrowLeft) => {
                self.action_states.set(InputAction::MoveLeft, is_pressed);
            }
            PhysicalKey::Code(KeyCode::KeyD) | PhysicalKey::Code(KeyCode::ArrowRight) => {
                self.action_states.set(InputAction::MoveRight, is_pressed);
            }
            PhysicalKey::Code(KeyCode::KeyE) | PhysicalKey::Code(KeyCode::Space) => {
                self.action_states.set(InputAction::Interact, is_pressed);
                handle_edge(
                    &mut self.interact_is_down,
                    &mut self.interact_pressed_edge,
                    state,
                );
            }
            PhysicalKey::Code(KeyCode::KeyQ) => {
                self.action_states.set(InputAction::Cancel, is_pressed);
                handle_edge(
                    &mut self.cancel_is_down,
                    &mut self.cancel_pressed_edge,
                    state,
                );
            }
            PhysicalKey::Code(KeyCode::KeyP) => {
                self.action_states.set(InputAction::Pause, is_pressed);
                handle_edge(&mut self.pause_is_down, &mut self.pause_pressed_edge, state);
            }
            PhysicalKey::Code(KeyCode::Escape) => {
                self.action_states.set(InputAction::Quit, is_pressed);
                if is_pressed {
                    self.quit_requested = true;
                }
            }
            _ => {}
        }
    }

    pub fn snapshot_for_tick(&mut self) -> InputSnapshot {
        let snapshot = InputSnapshot {
            quit_requested: self.quit_requested,
            actions: self.action_states,
            interact_pressed: self.interact_pressed_edge,
            cancel_pressed: self.cancel_pressed_edge,
            pause_pressed: self.pause_pressed_edge,
        };
        self.interact_pressed_edge = false;
        self.cancel_pressed_edge = false;
        self.pause_pressed_edge = false;
        snapshot
    }
}

fn handle_edge(is_down: &mut bool, pressed_edge: &mut bool, state: ElementState) {
    match state {
        ElementState::Pressed => {
            if !*is_down {
                *pressed_edge = true;
            }
            *is_down = true;
        }
        ElementState::Released => *is_down = false,
    }
}
