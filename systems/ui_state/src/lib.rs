#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure input system that turns player input into level commands.
//!
//! The player is always in exactly one [`UiState`]. Each state interprets
//! mouse and keyboard input differently; the system owns the transitions and
//! emits the cursor and highlight commands that accompany them.

use glam::Vec2;
use screamporium_core::{BlockId, Command, PaletteEntry};

/// Geld granted by the debug hotkey.
pub const DEBUG_GELD: i64 = 100;

/// Interaction mode the player is in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UiState {
    /// Free cursor; clicks drop a debug mob.
    #[default]
    Normal,
    /// Previewing and placing a block variant.
    Block {
        /// Block being placed.
        block: BlockId,
        /// Footprint variant being placed.
        variant: usize,
    },
    /// Selecting placements for removal.
    Delete,
}

/// Mouse buttons the system reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MouseButton {
    /// Primary button.
    Left,
    /// Secondary button.
    Right,
}

/// Keys the system reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    /// A printable key.
    Char(char),
    /// Escape.
    Escape,
    /// Opens or closes the menu, pausing the level while open.
    Menu,
}

/// Input snapshot forwarded by the adapter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Input {
    /// Cursor moved to a world-space position.
    MouseMoved {
        /// New cursor position in world space.
        world: Vec2,
    },
    /// A mouse button was pressed at the last known cursor position.
    MousePressed {
        /// Button that was pressed.
        button: MouseButton,
    },
    /// A key was pressed.
    KeyPressed {
        /// Key that was pressed.
        key: Key,
    },
}

/// Cursor frame shown in each state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CursorFrames {
    /// Cursor in [`UiState::Normal`].
    pub normal: String,
    /// Cursor in [`UiState::Block`].
    pub block: String,
    /// Cursor in [`UiState::Delete`].
    pub delete: String,
}

impl CursorFrames {
    fn for_state(&self, state: UiState) -> &str {
        match state {
            UiState::Normal => &self.normal,
            UiState::Block { .. } => &self.block,
            UiState::Delete => &self.delete,
        }
    }
}

/// State machine translating input into commands.
#[derive(Clone, Debug)]
pub struct Ui {
    state: UiState,
    mouse: Vec2,
    menu_open: bool,
    cursors: CursorFrames,
}

impl Ui {
    /// Creates the system in [`UiState::Normal`].
    #[must_use]
    pub fn new(cursors: CursorFrames) -> Self {
        Self {
            state: UiState::Normal,
            mouse: Vec2::ZERO,
            menu_open: false,
            cursors,
        }
    }

    /// Current interaction mode.
    #[must_use]
    pub fn state(&self) -> UiState {
        self.state
    }

    /// Whether the menu is open.
    #[must_use]
    pub fn is_menu_open(&self) -> bool {
        self.menu_open
    }

    /// Announces the current state to a freshly built level.
    pub fn register(&self, out: &mut Vec<Command>) {
        out.push(Command::SetCursor {
            frame: self.cursors.for_state(self.state).to_owned(),
        });
        self.hover(out);
    }

    /// Returns to [`UiState::Normal`], dropping every preview.
    pub fn reset(&mut self, out: &mut Vec<Command>) {
        self.menu_open = false;
        self.transition(UiState::Normal, out);
    }

    /// Interprets one input event.
    ///
    /// `palette` lists the blocks the level offers; hotkeys that match no
    /// entry are ignored.
    pub fn handle(&mut self, input: Input, palette: &[PaletteEntry], out: &mut Vec<Command>) {
        if self.menu_open && input != (Input::KeyPressed { key: Key::Menu }) {
            return;
        }

        match input {
            Input::MouseMoved { world } => {
                self.mouse = world;
                out.push(Command::SetMouse { position: world });
                self.hover(out);
            }
            Input::MousePressed { button } => self.click(button, out),
            Input::KeyPressed { key } => self.key(key, palette, out),
        }
    }

    fn click(&mut self, button: MouseButton, out: &mut Vec<Command>) {
        let position = self.mouse;
        match (self.state, button) {
            (UiState::Normal, MouseButton::Left) => out.push(Command::AddMob { position }),
            (UiState::Block { block, variant }, MouseButton::Left) => {
                out.push(Command::SetBlock {
                    position,
                    block,
                    variant,
                });
                self.hover(out);
            }
            (UiState::Block { .. }, MouseButton::Right) => self.transition(UiState::Normal, out),
            (UiState::Delete, MouseButton::Left) => out.push(Command::DeleteBlock),
            _ => {}
        }
    }

    fn key(&mut self, key: Key, palette: &[PaletteEntry], out: &mut Vec<Command>) {
        match key {
            Key::Menu => {
                self.menu_open = !self.menu_open;
                out.push(Command::SetPaused {
                    paused: self.menu_open,
                });
            }
            Key::Escape => self.transition(UiState::Normal, out),
            Key::Char('d') => self.transition(UiState::Delete, out),
            Key::Char('+') => out.push(Command::AddGeld { amount: DEBUG_GELD }),
            Key::Char('r') => {
                if let UiState::Block { block, variant } = self.state {
                    let count = palette
                        .iter()
                        .find(|entry| entry.block == block)
                        .map_or(1, |entry| entry.variants.max(1));
                    self.state = UiState::Block {
                        block,
                        variant: (variant + 1) % count,
                    };
                    self.hover(out);
                }
            }
            Key::Char(symbol) => {
                if let Some(entry) = palette.iter().find(|entry| entry.hotkey == symbol) {
                    self.transition(
                        UiState::Block {
                            block: entry.block,
                            variant: 0,
                        },
                        out,
                    );
                }
            }
        }
    }

    fn transition(&mut self, next: UiState, out: &mut Vec<Command>) {
        if next == self.state {
            return;
        }
        out.push(Command::UnsetHighlights);
        self.state = next;
        self.register(out);
    }

    fn hover(&self, out: &mut Vec<Command>) {
        let position = self.mouse;
        match self.state {
            UiState::Normal => {}
            UiState::Block { block, variant } => out.push(Command::SetHighlights {
                position,
                block,
                variant,
            }),
            UiState::Delete => out.push(Command::SetDeleteHighlights { position }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ui() -> Ui {
        Ui::new(CursorFrames {
            normal: "numbered_squares_01".to_owned(),
            block: "numbered_squares_04".to_owned(),
            delete: "numbered_squares_03".to_owned(),
        })
    }

    #[test]
    fn register_announces_cursor_only_in_normal_state() {
        let mut commands = Vec::new();
        ui().register(&mut commands);
        assert_eq!(
            commands,
            vec![Command::SetCursor {
                frame: "numbered_squares_01".to_owned()
            }]
        );
    }

    #[test]
    fn menu_swallows_other_input() {
        let mut ui = ui();
        let mut commands = Vec::new();
        ui.handle(Input::KeyPressed { key: Key::Menu }, &[], &mut commands);
        ui.handle(
            Input::MousePressed {
                button: MouseButton::Left,
            },
            &[],
            &mut commands,
        );
        ui.handle(Input::KeyPressed { key: Key::Menu }, &[], &mut commands);

        assert_eq!(
            commands,
            vec![
                Command::SetPaused { paused: true },
                Command::SetPaused { paused: false },
            ]
        );
        assert!(!ui.is_menu_open());
    }
}
