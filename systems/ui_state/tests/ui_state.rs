use glam::Vec2;
use screamporium_core::{BlockId, Command, PaletteEntry};
use screamporium_system_ui_state::{CursorFrames, Input, Key, MouseButton, Ui, UiState};

fn cursors() -> CursorFrames {
    CursorFrames {
        normal: "cursor_normal".to_owned(),
        block: "cursor_block".to_owned(),
        delete: "cursor_delete".to_owned(),
    }
}

fn palette() -> Vec<PaletteEntry> {
    vec![
        PaletteEntry {
            block: BlockId::new(0),
            hotkey: '1',
            variants: 1,
            cost: 10,
        },
        PaletteEntry {
            block: BlockId::new(1),
            hotkey: '2',
            variants: 2,
            cost: 100,
        },
    ]
}

fn press(ui: &mut Ui, key: Key) -> Vec<Command> {
    let mut commands = Vec::new();
    ui.handle(Input::KeyPressed { key }, &palette(), &mut commands);
    commands
}

fn click(ui: &mut Ui, button: MouseButton) -> Vec<Command> {
    let mut commands = Vec::new();
    ui.handle(Input::MousePressed { button }, &palette(), &mut commands);
    commands
}

fn hover(ui: &mut Ui, world: Vec2) -> Vec<Command> {
    let mut commands = Vec::new();
    ui.handle(Input::MouseMoved { world }, &palette(), &mut commands);
    commands
}

#[test]
fn normal_state_drops_debug_mobs() {
    let mut ui = Ui::new(cursors());
    let position = Vec2::new(3.5, 4.5);

    assert_eq!(
        hover(&mut ui, position),
        vec![Command::SetMouse { position }],
        "normal state only tracks the mouse"
    );
    assert_eq!(
        click(&mut ui, MouseButton::Left),
        vec![Command::AddMob { position }]
    );
    assert!(click(&mut ui, MouseButton::Right).is_empty());
}

#[test]
fn palette_hotkey_enters_block_state_with_preview() {
    let mut ui = Ui::new(cursors());
    let position = Vec2::new(1.5, 1.5);
    let _ = hover(&mut ui, position);

    let commands = press(&mut ui, Key::Char('2'));
    assert_eq!(
        ui.state(),
        UiState::Block {
            block: BlockId::new(1),
            variant: 0
        }
    );
    assert_eq!(
        commands,
        vec![
            Command::UnsetHighlights,
            Command::SetCursor {
                frame: "cursor_block".to_owned()
            },
            Command::SetHighlights {
                position,
                block: BlockId::new(1),
                variant: 0,
            },
        ]
    );
}

#[test]
fn block_state_places_and_refreshes_preview() {
    let mut ui = Ui::new(cursors());
    let _ = press(&mut ui, Key::Char('1'));
    let position = Vec2::new(6.5, 2.5);

    assert_eq!(
        hover(&mut ui, position),
        vec![
            Command::SetMouse { position },
            Command::SetHighlights {
                position,
                block: BlockId::new(0),
                variant: 0,
            },
        ]
    );
    assert_eq!(
        click(&mut ui, MouseButton::Left),
        vec![
            Command::SetBlock {
                position,
                block: BlockId::new(0),
                variant: 0,
            },
            Command::SetHighlights {
                position,
                block: BlockId::new(0),
                variant: 0,
            },
        ]
    );
}

#[test]
fn rotate_cycles_through_variants() {
    let mut ui = Ui::new(cursors());
    let _ = press(&mut ui, Key::Char('2'));

    let _ = press(&mut ui, Key::Char('r'));
    assert_eq!(
        ui.state(),
        UiState::Block {
            block: BlockId::new(1),
            variant: 1
        }
    );
    let _ = press(&mut ui, Key::Char('r'));
    assert_eq!(
        ui.state(),
        UiState::Block {
            block: BlockId::new(1),
            variant: 0
        },
        "rotation wraps after the last variant"
    );

    let _ = press(&mut ui, Key::Char('1'));
    let _ = press(&mut ui, Key::Char('r'));
    assert_eq!(
        ui.state(),
        UiState::Block {
            block: BlockId::new(0),
            variant: 0
        },
        "single-variant blocks stay put"
    );
}

#[test]
fn right_click_and_escape_leave_block_state() {
    let mut ui = Ui::new(cursors());
    let _ = press(&mut ui, Key::Char('1'));

    assert_eq!(
        click(&mut ui, MouseButton::Right),
        vec![
            Command::UnsetHighlights,
            Command::SetCursor {
                frame: "cursor_normal".to_owned()
            },
        ]
    );
    assert_eq!(ui.state(), UiState::Normal);

    let _ = press(&mut ui, Key::Char('1'));
    let _ = press(&mut ui, Key::Escape);
    assert_eq!(ui.state(), UiState::Normal);
    assert!(
        press(&mut ui, Key::Escape).is_empty(),
        "escape in normal state is a no-op"
    );
}

#[test]
fn delete_state_selects_and_removes() {
    let mut ui = Ui::new(cursors());
    let position = Vec2::new(8.5, 8.5);
    let _ = hover(&mut ui, position);

    let commands = press(&mut ui, Key::Char('d'));
    assert_eq!(ui.state(), UiState::Delete);
    assert_eq!(
        commands.last(),
        Some(&Command::SetDeleteHighlights { position })
    );
    assert_eq!(
        click(&mut ui, MouseButton::Left),
        vec![Command::DeleteBlock]
    );
}

#[test]
fn shared_hotkeys_work_in_every_state() {
    let mut ui = Ui::new(cursors());
    for key in [Key::Char('d'), Key::Char('1'), Key::Escape] {
        let _ = press(&mut ui, key);
        assert_eq!(
            press(&mut ui, Key::Char('+')),
            vec![Command::AddGeld { amount: 100 }]
        );
    }

    let _ = press(&mut ui, Key::Char('d'));
    let _ = press(&mut ui, Key::Char('2'));
    assert!(matches!(ui.state(), UiState::Block { .. }));
    let _ = press(&mut ui, Key::Char('d'));
    assert_eq!(ui.state(), UiState::Delete);
    assert!(press(&mut ui, Key::Char('z')).is_empty(), "unknown keys are ignored");
}

#[test]
fn reset_returns_to_normal_and_closes_menu() {
    let mut ui = Ui::new(cursors());
    let _ = press(&mut ui, Key::Char('1'));
    let _ = press(&mut ui, Key::Menu);
    assert!(ui.is_menu_open());

    let mut commands = Vec::new();
    ui.reset(&mut commands);
    assert_eq!(ui.state(), UiState::Normal);
    assert!(!ui.is_menu_open());
    assert_eq!(commands.first(), Some(&Command::UnsetHighlights));
}
