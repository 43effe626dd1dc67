use glam::Vec2;
use screamporium_core::{BlockId, Command, Facing, GridPos};
use screamporium_rendering::{CellRole, RenderingBackend, Scene, SpriteKind};
use screamporium_world::{self as world, Background, Level, LevelConfig};

const LEVEL: &str = r#"
[layout]
sources = [[0, 1]]
sink = [7, 1]

[[blocks]]
title = "Mr. Bones"
hotkey = "1"
cost = 10
range = 1.5
max_targets = 1
fear_per_second = 4.0
variants = [["b"]]

[blocks.cells.b]
frame = "skeleton01"
normal = [0, 1, 2, 3]
scaring = [4, 5, 6, 7]
"#;

fn level() -> Level {
    let config = LevelConfig::from_toml_str(LEVEL).expect("level config parses");
    Level::new(&config, Background::empty(8, 4)).expect("level builds")
}

fn center(x: i32, y: i32) -> Vec2 {
    Vec2::new(x as f32 + 0.5, y as f32 + 0.5)
}

#[test]
fn capture_classifies_cells() {
    let mut level = level();
    let mut events = Vec::new();
    world::apply(
        &mut level,
        Command::SetBlock {
            position: center(3, 0),
            block: BlockId::new(0),
            variant: 0,
        },
        &mut events,
    );

    let scene = Scene::capture(&level);
    assert_eq!(scene.cells.len(), 32);
    let role = |x, y| scene.cell(GridPos::new(x, y)).map(|cell| cell.role);
    assert_eq!(role(0, 1), Some(CellRole::Source));
    assert_eq!(role(7, 1), Some(CellRole::Sink));
    assert_eq!(role(3, 0), Some(CellRole::Block));
    assert_eq!(role(4, 0), Some(CellRole::Terrain));
    assert_eq!(role(8, 0), None, "cells past the edge are absent");

    let block = scene.cell(GridPos::new(3, 0)).expect("block cell");
    assert_eq!(block.frame, "skeleton01_00");
    assert!(!block.passable);
    assert_eq!(block.distance, -1);
    assert_eq!(scene.cell(GridPos::new(6, 1)).map(|cell| cell.distance), Some(1));
    assert_eq!(scene.hud.geld, 90);
    assert_eq!(scene.hud.rating, 5);
}

#[test]
fn sprites_are_painted_bottom_row_first() {
    let mut level = level();
    let mut events = Vec::new();
    for (x, y) in [(2, 0), (5, 0)] {
        world::apply(
            &mut level,
            Command::SetBlock {
                position: center(x, y),
                block: BlockId::new(0),
                variant: 0,
            },
            &mut events,
        );
    }
    world::apply(
        &mut level,
        Command::AddMob {
            position: center(1, 2),
        },
        &mut events,
    );

    let scene = Scene::capture(&level);
    let order: Vec<(SpriteKind, Vec2)> = scene
        .sprites()
        .iter()
        .map(|sprite| (sprite.kind, sprite.position))
        .collect();
    assert_eq!(
        order,
        vec![
            (SpriteKind::Mob, center(1, 2)),
            (SpriteKind::Block, center(2, 0)),
            (SpriteKind::Block, center(5, 0)),
        ]
    );
    assert_eq!(scene.mobs[0].frame, "human01_00");
    assert_eq!(scene.mobs[0].facing, Facing::Right);
}

#[derive(Default)]
struct CountingBackend {
    frames: usize,
    last_geld: i64,
}

impl RenderingBackend for CountingBackend {
    fn present(&mut self, scene: &Scene) -> anyhow::Result<()> {
        self.frames += 1;
        self.last_geld = scene.hud.geld;
        Ok(())
    }
}

#[test]
fn backends_receive_captured_scenes() {
    let level = level();
    let mut backend = CountingBackend::default();
    backend
        .present(&Scene::capture(&level))
        .expect("presenting succeeds");
    assert_eq!(backend.frames, 1);
    assert_eq!(backend.last_geld, 100);
}
