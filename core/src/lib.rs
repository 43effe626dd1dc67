#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Screamporium engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative level simulation, and pure systems. Adapters submit
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! that audio, presentation and session layers react to. Systems consume
//! event streams and decoded input and respond exclusively with new command
//! batches or presentation cues.

use std::{
    error::Error,
    fmt,
    ops::{Add, Sub},
    time::Duration,
};

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to the Screamporium.";

/// Commands that express all permissible level mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation by one fixed tick of the provided duration.
    Tick {
        /// Duration of simulated time covered by the tick.
        dt: Duration,
    },
    /// Records the mouse position in world space.
    SetMouse {
        /// Cursor location expressed in world units.
        position: Vec2,
    },
    /// Replaces the frame used to draw the mouse cursor.
    SetCursor {
        /// Sprite frame identifier for the cursor.
        frame: String,
    },
    /// Debug request that drops a mob at an arbitrary world position.
    AddMob {
        /// World position where the mob appears.
        position: Vec2,
    },
    /// Requests placement of a block whose anchor cell contains `position`.
    SetBlock {
        /// World position that selects the anchor cell.
        position: Vec2,
        /// Catalog entry to place.
        block: BlockId,
        /// Footprint variant of the block.
        variant: usize,
    },
    /// Removes the placement currently selected by delete highlighting.
    DeleteBlock,
    /// Previews the cells a pending placement would occupy.
    SetHighlights {
        /// World position that selects the anchor cell.
        position: Vec2,
        /// Catalog entry being previewed.
        block: BlockId,
        /// Footprint variant being previewed.
        variant: usize,
    },
    /// Previews the placement that a delete request would remove.
    SetDeleteHighlights {
        /// World position hovered by the cursor.
        position: Vec2,
    },
    /// Clears every preview highlight.
    UnsetHighlights,
    /// Adjusts the player's currency by the provided amount.
    AddGeld {
        /// Signed amount of geld to add.
        amount: i64,
    },
    /// Freezes or resumes the simulation, e.g. while a menu is open.
    SetPaused {
        /// Whether ticks should be ignored.
        paused: bool,
    },
}

/// Events broadcast by the level after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that a block was placed. Adapters play the placement sound.
    BlockPlaced {
        /// Logical anchor cell the placement is keyed by.
        anchor: GridPos,
        /// Catalog entry that was placed.
        block: BlockId,
        /// Footprint variant that was placed.
        variant: usize,
    },
    /// Reports that a placement request was rejected without mutating state.
    BlockPlacementRejected {
        /// Anchor cell requested by the player.
        anchor: GridPos,
        /// Catalog entry requested by the player.
        block: BlockId,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// Confirms that a placement was removed from the grid.
    BlockRemoved {
        /// Anchor cell of the removed placement.
        anchor: GridPos,
        /// Catalog entry of the removed placement.
        block: BlockId,
    },
    /// Reports that a removal request was rejected.
    BlockRemovalRejected {
        /// Specific reason the removal failed.
        reason: RemovalError,
    },
    /// Emitted every tick a placement frightens at least one mob.
    BlockScaring {
        /// Anchor cell of the placement.
        anchor: GridPos,
        /// Catalog entry whose scare sound should play.
        block: BlockId,
    },
    /// Confirms that a spawn zone released a mob.
    MobSpawned {
        /// Spawn cell that released the mob.
        cell: GridPos,
    },
    /// A mob's fear crossed the death threshold. Adapters play the death sound.
    MobScaredToDeath {
        /// World position where the mob died.
        position: Vec2,
    },
    /// A mob reached the sink and left the level.
    MobEscaped {
        /// Fear the mob carried when leaving.
        fear: f64,
        /// Geld awarded for the departure.
        geld: i64,
    },
    /// The player's currency changed.
    GeldChanged {
        /// Current geld balance.
        geld: i64,
    },
    /// The player-facing fear rating changed.
    RatingChanged {
        /// Current rounded rating.
        rating: i32,
    },
    /// Background music should change playback state.
    Music {
        /// Requested playback transition.
        cue: MusicCue,
    },
    /// The rating fell to the fail threshold.
    PlayerLost,
    /// The rating stayed at the win threshold for the configured duration.
    PlayerWon,
}

/// Integer grid coordinate used as the key for all spatial data.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(from = "[i32; 2]", into = "[i32; 2]")]
pub struct GridPos {
    x: i32,
    y: i32,
}

impl GridPos {
    /// Creates a new grid coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Zero-based column of the cell.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Zero-based row of the cell.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Orthogonal neighbours in west, east, north, south order.
    ///
    /// Bounds are not checked; callers filter against their grid.
    #[must_use]
    pub const fn neighbors(self) -> [GridPos; 4] {
        [
            GridPos::new(self.x - 1, self.y),
            GridPos::new(self.x + 1, self.y),
            GridPos::new(self.x, self.y - 1),
            GridPos::new(self.x, self.y + 1),
        ]
    }
}

impl Add for GridPos {
    type Output = GridPos;

    fn add(self, other: GridPos) -> GridPos {
        GridPos::new(self.x + other.x, self.y + other.y)
    }
}

impl Sub for GridPos {
    type Output = GridPos;

    fn sub(self, other: GridPos) -> GridPos {
        GridPos::new(self.x - other.x, self.y - other.y)
    }
}

impl From<[i32; 2]> for GridPos {
    fn from([x, y]: [i32; 2]) -> Self {
        Self::new(x, y)
    }
}

impl From<GridPos> for [i32; 2] {
    fn from(pos: GridPos) -> Self {
        [pos.x, pos.y]
    }
}

impl fmt::Display for GridPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Index of a block definition inside the level's catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId(u16);

impl BlockId {
    /// Creates a new block identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u16) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u16 {
        self.0
    }
}

/// Visual state of a placed block's cells.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum BlockState {
    /// Idle animation.
    #[default]
    Normal,
    /// The block is frightening at least one mob.
    Scaring,
}

/// Horizontal direction a mob faces while walking.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Facing {
    /// Facing toward decreasing columns.
    Left,
    /// Facing toward increasing columns.
    #[default]
    Right,
}

/// Playback transitions requested for the background music.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MusicCue {
    /// Start the track from the beginning.
    Play,
    /// Pause the track if it is playing.
    Pause,
    /// Resume the track if it is paused.
    Resume,
}

/// Selectable block advertised to the input layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PaletteEntry {
    /// Catalog entry selected by the hotkey.
    pub block: BlockId,
    /// Key that selects the block.
    pub hotkey: char,
    /// Number of footprint variants the block offers.
    pub variants: usize,
    /// Geld charged for a placement.
    pub cost: i64,
}

/// Reasons a block placement request may be rejected by the level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlacementError {
    /// No catalog entry exists for the requested block.
    UnknownBlock,
    /// The requested footprint variant does not exist.
    UnknownVariant,
    /// Part of the footprint lies outside the grid.
    OutOfBounds,
    /// Part of the footprint overlaps an impassable cell.
    Blocked,
    /// Part of the footprint covers a source or the sink.
    Reserved,
    /// A placement is already keyed by the requested anchor.
    AnchorTaken,
    /// The player cannot afford the block.
    InsufficientGeld,
}

impl fmt::Display for PlacementError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            Self::UnknownBlock => "unknown block",
            Self::UnknownVariant => "unknown block variant",
            Self::OutOfBounds => "footprint leaves the grid",
            Self::Blocked => "footprint overlaps an impassable cell",
            Self::Reserved => "footprint covers a source or the sink",
            Self::AnchorTaken => "anchor already holds a placement",
            Self::InsufficientGeld => "not enough geld",
        };
        f.write_str(message)
    }
}

impl Error for PlacementError {}

/// Reasons a block removal request may be rejected by the level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RemovalError {
    /// No placement is currently selected for deletion.
    NothingSelected,
}

impl fmt::Display for RemovalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NothingSelected => f.write_str("no placement selected for deletion"),
        }
    }
}

impl Error for RemovalError {}
