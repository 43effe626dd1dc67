#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Screamporium adapters.
//!
//! A [`Scene`] is a plain snapshot of everything a frontend needs to draw one
//! frame. Backends never reach into the level directly.

use std::cmp::Ordering;

use anyhow::Result as AnyResult;
use glam::Vec2;
use screamporium_core::{Facing, GridPos};
use screamporium_world::{query, Level};

/// What a grid cell represents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CellRole {
    /// Background or default ground.
    Terrain,
    /// Part of a placed block.
    Block,
    /// Spawn zone.
    Source,
    /// Exit zone.
    Sink,
}

/// One grid cell as seen by a frontend.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneCell {
    /// Grid position.
    pub position: GridPos,
    /// Sprite frame including any animation suffix.
    pub frame: String,
    /// Whether mobs can walk over the cell.
    pub passable: bool,
    /// Steps to the sink, `-1` when unreachable.
    pub distance: i32,
    /// What the cell represents.
    pub role: CellRole,
}

/// Live mob.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneMob {
    /// World-space position.
    pub position: Vec2,
    /// Sprite frame including the walk-cycle suffix.
    pub frame: String,
    /// Horizontal facing.
    pub facing: Facing,
    /// Accumulated fear.
    pub fear: f64,
}

/// Live decal.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneDecal {
    /// Anchor position in world space.
    pub position: Vec2,
    /// Upward drift applied on top of the anchor.
    pub offset: f32,
    /// Sprite frame.
    pub frame: String,
}

/// Placement or deletion preview marker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SceneHighlight {
    /// Covered cell.
    pub position: GridPos,
    /// Marker frame.
    pub frame: String,
}

/// Numbers shown in the heads-up display.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Hud {
    /// Player currency.
    pub geld: i64,
    /// Fear rating.
    pub rating: i32,
    /// Whether the level is paused.
    pub paused: bool,
}

/// Kind of depth-sorted drawable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpriteKind {
    /// Block cell.
    Block,
    /// Mob.
    Mob,
}

/// Drawable returned by [`Scene::sprites`].
#[derive(Clone, Debug, PartialEq)]
pub struct Sprite<'a> {
    /// Kind of drawable.
    pub kind: SpriteKind,
    /// World-space centre.
    pub position: Vec2,
    /// Sprite frame.
    pub frame: &'a str,
    /// Whether the frame should be mirrored horizontally.
    pub flipped: bool,
}

/// Scene description of one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Grid width in cells.
    pub width: i32,
    /// Grid height in cells.
    pub height: i32,
    /// World-space size of one cell.
    pub cell_size: f32,
    /// Every grid cell, row-major.
    pub cells: Vec<SceneCell>,
    /// Live mobs in pool order.
    pub mobs: Vec<SceneMob>,
    /// Live decals in pool order.
    pub decals: Vec<SceneDecal>,
    /// Preview markers.
    pub highlights: Vec<SceneHighlight>,
    /// Mouse position in world space.
    pub mouse: Vec2,
    /// Cursor frame.
    pub cursor: String,
    /// Heads-up display numbers.
    pub hud: Hud,
}

impl Scene {
    /// Snapshots the drawable state of a level.
    #[must_use]
    pub fn capture(level: &Level) -> Self {
        let grid = query::grid(level);
        let sink = query::sink(level);
        let sources = grid.sources();

        let cells = grid
            .cells()
            .map(|(position, item)| {
                let role = if position == sink {
                    CellRole::Sink
                } else if sources.contains(&position) {
                    CellRole::Source
                } else if grid.foreground(position).is_some() {
                    CellRole::Block
                } else {
                    CellRole::Terrain
                };
                SceneCell {
                    position,
                    frame: item.frame().into_owned(),
                    passable: item.passable(),
                    distance: grid.distance(position),
                    role,
                }
            })
            .collect();

        let mobs = query::mobs(level)
            .iter()
            .map(|mob| SceneMob {
                position: mob.position(),
                frame: query::mob_frame(level, mob),
                facing: mob.facing(),
                fear: mob.fear(),
            })
            .collect();

        let decals = query::decals(level)
            .iter()
            .map(|decal| SceneDecal {
                position: decal.position(),
                offset: decal.offset(),
                frame: decal.frame().to_owned(),
            })
            .collect();

        let highlights = query::highlights(level)
            .iter()
            .map(|highlight| SceneHighlight {
                position: highlight.position(),
                frame: highlight.frame().to_owned(),
            })
            .collect();

        Self {
            width: grid.width(),
            height: grid.height(),
            cell_size: grid.cell_size(),
            cells,
            mobs,
            decals,
            highlights,
            mouse: query::mouse(level),
            cursor: query::cursor(level).to_owned(),
            hud: Hud {
                geld: query::geld(level),
                rating: query::rating(level),
                paused: query::is_paused(level),
            },
        }
    }

    /// Cell at `position`, if it lies on the grid.
    #[must_use]
    pub fn cell(&self, position: GridPos) -> Option<&SceneCell> {
        if !(0..self.width).contains(&position.x()) || !(0..self.height).contains(&position.y()) {
            return None;
        }
        self.cells
            .get((position.y() * self.width + position.x()) as usize)
    }

    /// Block cells and mobs in painter's order: rows further down the screen
    /// first, ties broken left to right.
    #[must_use]
    pub fn sprites(&self) -> Vec<Sprite<'_>> {
        let half = Vec2::splat(self.cell_size * 0.5);
        let blocks = self
            .cells
            .iter()
            .filter(|cell| cell.role == CellRole::Block)
            .map(|cell| Sprite {
                kind: SpriteKind::Block,
                position: Vec2::new(cell.position.x() as f32, cell.position.y() as f32)
                    * self.cell_size
                    + half,
                frame: &cell.frame,
                flipped: false,
            });
        let mobs = self.mobs.iter().map(|mob| Sprite {
            kind: SpriteKind::Mob,
            position: mob.position,
            frame: &mob.frame,
            flipped: mob.facing == Facing::Left,
        });

        let mut sprites: Vec<Sprite<'_>> = blocks.chain(mobs).collect();
        sprites.sort_by(|a, b| depth_order(a.position, b.position));
        sprites
    }
}

fn depth_order(a: Vec2, b: Vec2) -> Ordering {
    b.y.total_cmp(&a.y).then(a.x.total_cmp(&b.x))
}

/// Rendering backend capable of presenting Screamporium scenes.
pub trait RenderingBackend {
    /// Presents one captured frame.
    fn present(&mut self, scene: &Scene) -> AnyResult<()>;
}
