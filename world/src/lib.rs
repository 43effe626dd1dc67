#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative level simulation for the Screamporium.
//!
//! A [`Level`] owns the grid, the mob and decal pools, the spawn zones, the
//! placed blocks and the fear history. Adapters mutate it exclusively through
//! [`apply`] and observe it through the [`query`] module and the emitted
//! [`Event`] stream.

mod animation;
mod blocks;
mod config;
mod decals;
mod error;
mod grid;
mod grid_item;
mod map;
mod mobs;
mod pool;
mod rating;
mod spawn;

use std::{collections::BTreeMap, time::Duration};

use glam::Vec2;
use screamporium_core::{
    BlockId, BlockState, Command, Event, GridPos, MusicCue, PlacementError, RemovalError,
};
use tracing::{debug, info};

pub use blocks::{Block, BlockCatalog, BlockPlacement, CellTemplate, Footprint};
pub use config::{
    BlockConfig, CursorConfig, DecalConfig, DecalSpec, GridConfig, HighlightConfig,
    LayoutConfig, LevelConfig, PlayerConfig, PoolConfig, RatingConfig, RewardConfig,
    SpawningConfig,
};
pub use decals::Decal;
pub use error::LoadError;
pub use grid::{Grid, Step, SINK_DISTANCE, UNREACHABLE};
pub use grid_item::GridItem;
pub use map::{Background, MapLoader, TileSpec, TomlMapLoader};
pub use mobs::Mob;
pub use rating::CircularBuffer;
pub use spawn::SpawnZone;

use pool::Pool;

/// Terminal result of a level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// The rating fell to the fail threshold.
    Lost,
    /// The rating held the win threshold long enough.
    Won,
}

/// Preview marker drawn over a grid cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Highlight {
    position: GridPos,
    frame: String,
}

impl Highlight {
    /// Cell the marker covers.
    #[must_use]
    pub fn position(&self) -> GridPos {
        self.position
    }

    /// Sprite frame of the marker.
    #[must_use]
    pub fn frame(&self) -> &str {
        &self.frame
    }
}

/// Represents one running Screamporium level.
#[derive(Debug)]
pub struct Level {
    config: LevelConfig,
    catalog: BlockCatalog,
    grid: Grid,
    mobs: Pool<Mob>,
    decals: Pool<Decal>,
    spawn_zones: Vec<SpawnZone>,
    sink: SpawnZone,
    placements: BTreeMap<GridPos, BlockPlacement>,
    fear: CircularBuffer,
    geld: i64,
    rating: i32,
    mouse: Vec2,
    cursor: String,
    highlights: Vec<Highlight>,
    highlighted: Option<BlockPlacement>,
    deleteable: Option<GridPos>,
    time_at_win_rating: Duration,
    outcome: Option<Outcome>,
    paused: bool,
    killed: Vec<usize>,
}

impl Level {
    /// Builds a level from its configuration and background layer.
    ///
    /// Fails when the block catalog is malformed or the layout does not fit
    /// the map.
    pub fn new(config: &LevelConfig, background: Background) -> Result<Self, LoadError> {
        let catalog = config.catalog()?;
        let layout = &config.layout;
        if layout.sources.is_empty() {
            return Err(LoadError::NoSources);
        }
        for &source in &layout.sources {
            ensure_on_map("source", source, &background)?;
        }
        ensure_on_map("sink", layout.sink, &background)?;

        let transit = GridItem::transit(config.grid.transit_frame.clone());
        let mut grid = Grid::new(
            background,
            config.grid.cell_size,
            GridItem::terrain(config.grid.default_frame.clone(), true),
        );
        for &source in &layout.sources {
            grid.add_source(source, transit.clone());
        }
        grid.set_sink(layout.sink, transit);
        grid.recompute_distances();

        let spawning = &config.spawning;
        let mobs = Pool::new(config.pools.max_mobs, || {
            Mob::dormant(
                spawning.frame_interval(),
                &spawning.walk_right,
                &spawning.walk_left,
            )
        });
        let fear = CircularBuffer::seeded(config.rating.history, config.player.starting_rating);

        Ok(Self {
            catalog,
            grid,
            mobs,
            decals: Pool::new(config.pools.max_decals, Decal::default),
            spawn_zones: layout.sources.iter().copied().map(SpawnZone::new).collect(),
            sink: SpawnZone::new(layout.sink),
            placements: BTreeMap::new(),
            rating: fear.rating(),
            fear,
            geld: config.player.starting_geld,
            mouse: Vec2::ZERO,
            cursor: config.cursors.normal.clone(),
            highlights: Vec::new(),
            highlighted: None,
            deleteable: None,
            time_at_win_rating: Duration::ZERO,
            outcome: None,
            paused: false,
            killed: Vec::with_capacity(config.pools.max_mobs),
            config: config.clone(),
        })
    }

    /// Announces the level: starts the music and publishes the HUD values.
    pub fn begin(&self, out: &mut Vec<Event>) {
        out.push(Event::Music {
            cue: MusicCue::Play,
        });
        out.push(Event::GeldChanged { geld: self.geld });
        out.push(Event::RatingChanged {
            rating: self.rating,
        });
    }

    /// Advances the simulation by one tick.
    ///
    /// Does nothing while paused or once the level reached an outcome, and
    /// reports whether the tick ran.
    pub fn update(&mut self, elapsed: Duration, out: &mut Vec<Event>) -> bool {
        if self.paused || self.outcome.is_some() {
            return false;
        }
        out.push(Event::TimeAdvanced { dt: elapsed });

        self.update_blocks(elapsed, out);
        self.update_mobs(elapsed, out);
        self.update_spawns(out);
        self.update_decals(elapsed);
        self.grid.update(elapsed);
        self.check_conditions(elapsed, out);
        true
    }

    fn update_blocks(&mut self, elapsed: Duration, out: &mut Vec<Event>) {
        let seconds = elapsed.as_secs_f64();
        let rating = &self.config.rating;

        for placement in self.placements.values() {
            let Some(block) = self.catalog.get(placement.block()) else {
                continue;
            };
            let center = self.grid.cell_center(placement.anchor());
            let fear = block.fear_per_second() * seconds;
            let limit = block.max_targets().unwrap_or(usize::MAX);
            let mut hits = 0;
            self.killed.clear();

            for (index, mob) in self.mobs.live_mut().iter_mut().enumerate() {
                if hits >= limit {
                    break;
                }
                if mob.position().distance(center) > block.range() {
                    continue;
                }
                hits += 1;
                if mob.increase_fear(fear) {
                    continue;
                }

                // Disabled after the scan so the live prefix stays intact.
                self.killed.push(index);
                let position = mob.position();
                spawn_decal(&mut self.decals, &self.config.decals.death, position);
                out.push(Event::MobScaredToDeath { position });
                self.fear.adjust_all(-rating.kill_penalty, rating.floor);
                self.fear.add_entry(mob.fear());
                sync_rating(&mut self.rating, &self.fear, out);
            }

            if hits > 0 {
                self.grid
                    .update_block_state(placement, block, BlockState::Scaring);
                out.push(Event::BlockScaring {
                    anchor: placement.anchor(),
                    block: placement.block(),
                });
            } else {
                self.grid
                    .update_block_state(placement, block, BlockState::Normal);
            }

            for &index in self.killed.iter().rev() {
                let _ = self.mobs.disable(index);
            }
        }
    }

    fn update_mobs(&mut self, elapsed: Duration, out: &mut Vec<Event>) {
        let mut index = 0;
        while index < self.mobs.active() {
            if self.mobs.live()[index].is_pending_disable() {
                // The last live mob is swapped into `index`; visit it next.
                self.despawn_mob(index, out);
                continue;
            }
            self.mobs.live_mut()[index].update(elapsed, &self.grid);
            index += 1;
        }
    }

    fn despawn_mob(&mut self, index: usize, out: &mut Vec<Event>) {
        let Some(mob) = self.mobs.live().get(index) else {
            return;
        };
        let fear = mob.fear();
        let position = mob.position();

        let decals = &self.config.decals;
        if fear < decals.calm_below {
            spawn_decal(&mut self.decals, &decals.calm_exit, position);
        } else if fear > decals.terrified_above {
            spawn_decal(&mut self.decals, &decals.terrified_exit, position);
        }

        self.fear.add_entry(fear);
        sync_rating(&mut self.rating, &self.fear, out);
        let _ = self.mobs.disable(index);

        let geld = (fear * self.config.rewards.geld_per_fear + 0.5).floor() as i64;
        out.push(Event::MobEscaped { fear, geld });
        self.add_geld(geld, out);
    }

    fn update_spawns(&mut self, out: &mut Vec<Event>) {
        let charge = self.config.spawning.charge_per_rating * f64::from(self.rating.max(1));
        for zone in 0..self.spawn_zones.len() {
            self.spawn_zones[zone].add_charge(charge);
            while self.spawn_zones[zone].try_release() {
                let cell = self.spawn_zones[zone].position();
                let _ = self.spawn_mob(cell, out);
            }
        }
    }

    fn update_decals(&mut self, elapsed: Duration) {
        let mut index = 0;
        while index < self.decals.active() {
            if self.decals.live()[index].is_pending_disable() {
                let _ = self.decals.disable(index);
                continue;
            }
            self.decals.live_mut()[index].update(elapsed);
            index += 1;
        }
    }

    fn check_conditions(&mut self, elapsed: Duration, out: &mut Vec<Event>) {
        let rules = &self.config.rating;
        if self.rating <= rules.fail_rating {
            info!(rating = self.rating, "fear rating collapsed; player lost");
            self.outcome = Some(Outcome::Lost);
            out.push(Event::PlayerLost);
            return;
        }

        if self.rating >= rules.win_rating {
            self.time_at_win_rating += elapsed;
            if self.time_at_win_rating >= rules.win_duration() {
                info!(rating = self.rating, "fear rating held; player won");
                self.outcome = Some(Outcome::Won);
                out.push(Event::PlayerWon);
            }
        } else {
            self.time_at_win_rating = Duration::ZERO;
        }
    }

    /// Records the mouse position in world space.
    pub fn set_mouse(&mut self, position: Vec2) {
        self.mouse = position;
    }

    /// Replaces the cursor frame.
    pub fn set_cursor(&mut self, frame: String) {
        self.cursor = frame;
    }

    /// Drops a mob at an arbitrary world position. Returns `false` when the
    /// pool is full.
    pub fn add_mob(&mut self, position: Vec2, out: &mut Vec<Event>) -> bool {
        if !self.activate_mob(position) {
            return false;
        }
        out.push(Event::MobSpawned {
            cell: self.grid.world_to_grid(position),
        });
        true
    }

    /// Releases a mob at the centre of `cell`. Returns `false` when the pool
    /// is full.
    pub fn spawn_mob(&mut self, cell: GridPos, out: &mut Vec<Event>) -> bool {
        if !self.activate_mob(self.grid.cell_center(cell)) {
            return false;
        }
        out.push(Event::MobSpawned { cell });
        true
    }

    fn activate_mob(&mut self, position: Vec2) -> bool {
        let spawning = &self.config.spawning;
        let speed = spawning.mob_speed * self.grid.cell_size();
        match self.mobs.activate() {
            Some(mob) => {
                mob.activate(position, speed, spawning.initial_fear, spawning.death_fear);
                true
            }
            None => {
                debug!(capacity = self.config.pools.max_mobs, "mob pool full; spawn dropped");
                false
            }
        }
    }

    /// Places a block whose anchor cell contains `position`, charging its cost
    /// and rebuilding the distance field.
    pub fn set_block(
        &mut self,
        position: Vec2,
        block: BlockId,
        variant: usize,
        out: &mut Vec<Event>,
    ) -> Result<GridPos, PlacementError> {
        let anchor = self.grid.world_to_grid(position);
        match self.try_place(anchor, block, variant) {
            Ok(cost) => {
                self.geld -= cost;
                info!(anchor = %anchor, block = block.get(), variant, cost, "placed block");
                out.push(Event::BlockPlaced {
                    anchor,
                    block,
                    variant,
                });
                out.push(Event::GeldChanged { geld: self.geld });
                self.refresh_highlights();
                Ok(anchor)
            }
            Err(reason) => {
                debug!(anchor = %anchor, block = block.get(), %reason, "placement rejected");
                out.push(Event::BlockPlacementRejected {
                    anchor,
                    block,
                    reason,
                });
                Err(reason)
            }
        }
    }

    fn try_place(
        &mut self,
        anchor: GridPos,
        id: BlockId,
        variant: usize,
    ) -> Result<i64, PlacementError> {
        let block = self.catalog.get(id).ok_or(PlacementError::UnknownBlock)?;
        let placement = BlockPlacement::new(anchor, id, variant);
        self.grid.check_placement(&placement, block)?;
        if self.placements.contains_key(&anchor) {
            return Err(PlacementError::AnchorTaken);
        }
        if self.geld < block.cost() {
            return Err(PlacementError::InsufficientGeld);
        }

        let anchor = self.grid.place_block(&placement, block)?;
        let _ = self.placements.insert(anchor, placement);
        self.grid.recompute_distances();
        Ok(block.cost())
    }

    /// Removes the placement selected by [`Level::set_delete_highlights`].
    pub fn delete_block(&mut self, out: &mut Vec<Event>) -> Result<GridPos, RemovalError> {
        let removed = self
            .deleteable
            .take()
            .and_then(|anchor| self.placements.remove(&anchor));
        let Some(placement) = removed else {
            let reason = RemovalError::NothingSelected;
            debug!(%reason, "removal rejected");
            out.push(Event::BlockRemovalRejected { reason });
            return Err(reason);
        };

        if let Some(block) = self.catalog.get(placement.block()) {
            self.grid.remove_block(&placement, block);
        }
        self.grid.recompute_distances();
        self.highlights.clear();

        let anchor = placement.anchor();
        info!(anchor = %anchor, block = placement.block().get(), "removed block");
        out.push(Event::BlockRemoved {
            anchor,
            block: placement.block(),
        });
        Ok(anchor)
    }

    /// Previews the cells a placement at `position` would occupy.
    pub fn set_highlights(&mut self, position: Vec2, block: BlockId, variant: usize) {
        self.deleteable = None;
        self.highlighted = Some(BlockPlacement::new(
            self.grid.world_to_grid(position),
            block,
            variant,
        ));
        self.refresh_highlights();
    }

    fn refresh_highlights(&mut self) {
        let Some(placement) = self.highlighted else {
            return;
        };
        self.highlights.clear();
        let Some(block) = self.catalog.get(placement.block()) else {
            return;
        };

        let valid = self.grid.check_placement(&placement, block).is_ok()
            && !self.placements.contains_key(&placement.anchor())
            && self.geld >= block.cost();
        let frame = if valid {
            &self.config.highlights.valid
        } else {
            &self.config.highlights.invalid
        };
        self.highlights
            .extend(placement.cells(block).map(|(position, _)| Highlight {
                position,
                frame: frame.clone(),
            }));
    }

    /// Selects the placement under `position` for deletion and previews it.
    pub fn set_delete_highlights(&mut self, position: Vec2) {
        self.highlighted = None;
        self.highlights.clear();

        let cell = self.grid.world_to_grid(position);
        let catalog = &self.catalog;
        let selected = self.placements.values().find_map(|placement| {
            let block = catalog.get(placement.block())?;
            placement
                .occupies(cell, block)
                .then_some((*placement, block))
        });

        self.deleteable = selected.map(|(placement, _)| placement.anchor());
        if let Some((placement, block)) = selected {
            let frame = &self.config.highlights.delete;
            self.highlights
                .extend(placement.cells(block).map(|(position, _)| Highlight {
                    position,
                    frame: frame.clone(),
                }));
        }
    }

    /// Clears every preview and the deletion selection.
    pub fn unset_highlights(&mut self) {
        self.highlighted = None;
        self.deleteable = None;
        self.highlights.clear();
    }

    /// Adjusts the player's geld and refreshes the placement preview.
    pub fn add_geld(&mut self, amount: i64, out: &mut Vec<Event>) {
        self.geld += amount;
        out.push(Event::GeldChanged { geld: self.geld });
        self.refresh_highlights();
    }

    /// Freezes or resumes ticking, cueing the music accordingly.
    pub fn set_paused(&mut self, paused: bool, out: &mut Vec<Event>) {
        if paused == self.paused {
            return;
        }
        self.paused = paused;
        let cue = if paused {
            MusicCue::Pause
        } else {
            MusicCue::Resume
        };
        out.push(Event::Music { cue });
    }
}

fn ensure_on_map(
    what: &'static str,
    position: GridPos,
    background: &Background,
) -> Result<(), LoadError> {
    let (width, height) = (background.width(), background.height());
    if (0..width).contains(&position.x()) && (0..height).contains(&position.y()) {
        return Ok(());
    }
    Err(LoadError::OutOfBounds {
        what,
        position,
        width,
        height,
    })
}

fn spawn_decal(decals: &mut Pool<Decal>, spec: &DecalSpec, origin: Vec2) {
    match decals.activate() {
        Some(decal) => decal.activate(
            origin + spec.offset(),
            &spec.frame,
            spec.rise,
            spec.duration(),
        ),
        None => debug!(frame = %spec.frame, "decal pool full; decal dropped"),
    }
}

fn sync_rating(rating: &mut i32, fear: &CircularBuffer, out: &mut Vec<Event>) {
    let current = fear.rating();
    if current != *rating {
        *rating = current;
        out.push(Event::RatingChanged { rating: current });
    }
}

/// Applies the provided command to the level, mutating state deterministically.
pub fn apply(level: &mut Level, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick { dt } => {
            let _ = level.update(dt, out_events);
        }
        Command::SetMouse { position } => level.set_mouse(position),
        Command::SetCursor { frame } => level.set_cursor(frame),
        Command::AddMob { position } => {
            let _ = level.add_mob(position, out_events);
        }
        Command::SetBlock {
            position,
            block,
            variant,
        } => {
            let _ = level.set_block(position, block, variant, out_events);
        }
        Command::DeleteBlock => {
            let _ = level.delete_block(out_events);
        }
        Command::SetHighlights {
            position,
            block,
            variant,
        } => level.set_highlights(position, block, variant),
        Command::SetDeleteHighlights { position } => level.set_delete_highlights(position),
        Command::UnsetHighlights => level.unset_highlights(),
        Command::AddGeld { amount } => level.add_geld(amount, out_events),
        Command::SetPaused { paused } => level.set_paused(paused, out_events),
    }
}

/// Query functions that provide read-only access to the level state.
pub mod query {
    use glam::Vec2;
    use screamporium_core::{GridPos, PaletteEntry};

    use super::{
        BlockCatalog, BlockPlacement, Decal, Grid, Highlight, Level, LevelConfig, Mob, Outcome,
        SpawnZone,
    };

    /// Configuration the level was built from.
    #[must_use]
    pub fn config(level: &Level) -> &LevelConfig {
        &level.config
    }

    /// Provides read-only access to the grid.
    #[must_use]
    pub fn grid(level: &Level) -> &Grid {
        &level.grid
    }

    /// Blocks available to the player.
    #[must_use]
    pub fn catalog(level: &Level) -> &BlockCatalog {
        &level.catalog
    }

    /// Palette entries advertised to the input layer.
    #[must_use]
    pub fn palette(level: &Level) -> Vec<PaletteEntry> {
        level.catalog.palette()
    }

    /// Live placements ordered by anchor.
    pub fn placements(level: &Level) -> impl Iterator<Item = &BlockPlacement> {
        level.placements.values()
    }

    /// Live mobs in pool order.
    #[must_use]
    pub fn mobs(level: &Level) -> &[Mob] {
        level.mobs.live()
    }

    /// Sprite frame of a mob, e.g. `human01_03`.
    #[must_use]
    pub fn mob_frame(level: &Level, mob: &Mob) -> String {
        format!(
            "{}_{:02}",
            level.config.spawning.mob_frame,
            mob.animation_frame()
        )
    }

    /// Live decals in pool order.
    #[must_use]
    pub fn decals(level: &Level) -> &[Decal] {
        level.decals.live()
    }

    /// Spawn zones in configuration order.
    #[must_use]
    pub fn spawn_zones(level: &Level) -> &[SpawnZone] {
        &level.spawn_zones
    }

    /// Cell mobs leave through.
    #[must_use]
    pub fn sink(level: &Level) -> GridPos {
        level.sink.position()
    }

    /// Active preview markers.
    #[must_use]
    pub fn highlights(level: &Level) -> &[Highlight] {
        &level.highlights
    }

    /// Anchor of the placement selected for deletion.
    #[must_use]
    pub fn deleteable(level: &Level) -> Option<GridPos> {
        level.deleteable
    }

    /// Mouse position in world space.
    #[must_use]
    pub fn mouse(level: &Level) -> Vec2 {
        level.mouse
    }

    /// Current cursor frame.
    #[must_use]
    pub fn cursor(level: &Level) -> &str {
        &level.cursor
    }

    /// Player currency.
    #[must_use]
    pub fn geld(level: &Level) -> i64 {
        level.geld
    }

    /// Player-facing fear rating.
    #[must_use]
    pub fn rating(level: &Level) -> i32 {
        level.rating
    }

    /// Unrounded mean of the fear history.
    #[must_use]
    pub fn fear_sample(level: &Level) -> f64 {
        level.fear.sample()
    }

    /// Outcome reached by the level, if any.
    #[must_use]
    pub fn outcome(level: &Level) -> Option<Outcome> {
        level.outcome
    }

    /// Whether ticks are currently ignored.
    #[must_use]
    pub fn is_paused(level: &Level) -> bool {
        level.paused
    }
}
