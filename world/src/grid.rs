//! Two-layer tile grid and the distance field mobs route along.

use std::{collections::VecDeque, time::Duration};

use glam::Vec2;
use screamporium_core::{BlockState, GridPos, PlacementError};
use tracing::debug;

use crate::{
    blocks::{Block, BlockPlacement},
    grid_item::GridItem,
    map::Background,
};

/// Distance stored for the sink cell.
pub const SINK_DISTANCE: i32 = 0;

/// Distance of cells the sink cannot reach.
pub const UNREACHABLE: i32 = -1;

/// Neighbour chosen by [`Grid::next_step_toward_sink`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Step {
    /// World-space centre of the neighbour cell.
    pub target: Vec2,
    /// Grid distance from the neighbour to the sink.
    pub distance: i32,
}

/// Tile storage with an immutable background, a mutable foreground and a
/// breadth-first distance field seeded from the sink.
///
/// Lookups fall back from foreground to background to a shared default cell.
/// Positions outside `[0, width) x [0, height)` are never stored: writes are
/// ignored and reads yield the default.
#[derive(Clone, Debug)]
pub struct Grid {
    width: i32,
    height: i32,
    cell_size: f32,
    background: Vec<Option<GridItem>>,
    foreground: Vec<Option<GridItem>>,
    distances: Vec<i32>,
    default_item: GridItem,
    sources: Vec<GridPos>,
    sink: Option<GridPos>,
}

impl Grid {
    /// Creates a grid over `background` with an empty foreground.
    #[must_use]
    pub fn new(background: Background, cell_size: f32, default_item: GridItem) -> Self {
        let width = background.width();
        let height = background.height();
        let cells = background.into_cells();
        let count = cells.len();
        Self {
            width,
            height,
            cell_size,
            background: cells,
            foreground: vec![None; count],
            distances: vec![UNREACHABLE; count],
            default_item,
            sources: Vec::new(),
            sink: None,
        }
    }

    /// Width in cells.
    #[must_use]
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Height in cells.
    #[must_use]
    pub fn height(&self) -> i32 {
        self.height
    }

    /// Side length of a cell in world units.
    #[must_use]
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Reports whether `pos` lies on the grid.
    #[must_use]
    pub fn contains(&self, pos: GridPos) -> bool {
        (0..self.width).contains(&pos.x()) && (0..self.height).contains(&pos.y())
    }

    fn index(&self, pos: GridPos) -> Option<usize> {
        if !self.contains(pos) {
            return None;
        }
        let x = usize::try_from(pos.x()).ok()?;
        let y = usize::try_from(pos.y()).ok()?;
        let width = usize::try_from(self.width).ok()?;
        Some(y * width + x)
    }

    /// Effective cell at `pos`.
    #[must_use]
    pub fn get(&self, pos: GridPos) -> &GridItem {
        self.index(pos)
            .and_then(|index| {
                self.foreground[index]
                    .as_ref()
                    .or(self.background[index].as_ref())
            })
            .unwrap_or(&self.default_item)
    }

    /// Foreground cell at `pos`, if one was written.
    #[must_use]
    pub fn foreground(&self, pos: GridPos) -> Option<&GridItem> {
        self.index(pos)
            .and_then(|index| self.foreground[index].as_ref())
    }

    /// Writes a foreground cell without validation.
    pub fn set(&mut self, pos: GridPos, item: GridItem) {
        if let Some(index) = self.index(pos) {
            self.foreground[index] = Some(item);
        }
    }

    /// Removes the foreground cell at `pos`, exposing the background.
    pub fn clear(&mut self, pos: GridPos) {
        if let Some(index) = self.index(pos) {
            self.foreground[index] = None;
        }
    }

    /// Marks a spawn source, overwriting whatever the foreground held.
    pub fn add_source(&mut self, pos: GridPos, item: GridItem) {
        self.set(pos, item);
        if self.contains(pos) && !self.sources.contains(&pos) {
            self.sources.push(pos);
        }
    }

    /// Moves the sink to `pos`, clearing the previous sink cell.
    pub fn set_sink(&mut self, pos: GridPos, item: GridItem) {
        if !self.contains(pos) {
            return;
        }
        if let Some(previous) = self.sink.replace(pos) {
            self.clear(previous);
        }
        self.set(pos, item);
    }

    /// Spawn sources in registration order.
    #[must_use]
    pub fn sources(&self) -> &[GridPos] {
        &self.sources
    }

    /// Cell mobs route toward.
    #[must_use]
    pub fn sink(&self) -> Option<GridPos> {
        self.sink
    }

    /// Reports whether `pos` is a source or the sink.
    #[must_use]
    pub fn is_reserved(&self, pos: GridPos) -> bool {
        self.sink == Some(pos) || self.sources.contains(&pos)
    }

    /// Checks every cell a placement would write.
    pub fn check_placement(
        &self,
        placement: &BlockPlacement,
        block: &Block,
    ) -> Result<(), PlacementError> {
        if block.footprint(placement.variant()).is_none() {
            return Err(PlacementError::UnknownVariant);
        }
        for (pos, _) in placement.cells(block) {
            if !self.contains(pos) {
                return Err(PlacementError::OutOfBounds);
            }
            if self.is_reserved(pos) {
                return Err(PlacementError::Reserved);
            }
            if !self.get(pos).passable() {
                return Err(PlacementError::Blocked);
            }
        }
        Ok(())
    }

    /// Reports whether no cell of the placement lands on an impassable cell.
    ///
    /// This is the pure overlap rule; [`Grid::check_placement`] adds the grid
    /// bounds and the reserved transit cells on top of it.
    #[must_use]
    pub fn is_placement_valid(&self, placement: &BlockPlacement, block: &Block) -> bool {
        block.footprint(placement.variant()).is_some()
            && placement.cells(block).all(|(pos, _)| self.get(pos).passable())
    }

    /// Writes a fresh cell for every non-empty template entry and returns the
    /// logical anchor the placement should be keyed by.
    ///
    /// Distances are left untouched; callers recompute them afterwards.
    pub fn place_block(
        &mut self,
        placement: &BlockPlacement,
        block: &Block,
    ) -> Result<GridPos, PlacementError> {
        self.check_placement(placement, block)?;
        for (pos, template) in placement.cells(block) {
            self.set(pos, GridItem::from_template(template));
        }
        Ok(placement.anchor())
    }

    /// Clears exactly the cells [`Grid::place_block`] wrote.
    pub fn remove_block(&mut self, placement: &BlockPlacement, block: &Block) {
        for (pos, _) in placement.cells(block) {
            self.clear(pos);
        }
    }

    /// Pushes a visual state to every cell of a placement.
    pub fn update_block_state(
        &mut self,
        placement: &BlockPlacement,
        block: &Block,
        state: BlockState,
    ) {
        for (pos, _) in placement.cells(block) {
            if let Some(index) = self.index(pos) {
                if let Some(item) = &mut self.foreground[index] {
                    item.set_state(state);
                }
            }
        }
    }

    /// Rebuilds the distance field with a breadth-first search from the sink
    /// over passable cells, four-connected.
    pub fn recompute_distances(&mut self) {
        self.distances.fill(UNREACHABLE);

        let Some(sink) = self.sink else {
            return;
        };
        let Some(sink_index) = self.index(sink) else {
            return;
        };
        if !self.get(sink).passable() {
            return;
        }

        let mut queue = VecDeque::new();
        self.distances[sink_index] = SINK_DISTANCE;
        queue.push_back((sink, SINK_DISTANCE));
        let mut reached = 1usize;

        while let Some((cell, distance)) = queue.pop_front() {
            for neighbor in cell.neighbors() {
                let Some(index) = self.index(neighbor) else {
                    continue;
                };
                if self.distances[index] != UNREACHABLE || !self.get(neighbor).passable() {
                    continue;
                }
                self.distances[index] = distance + 1;
                reached += 1;
                queue.push_back((neighbor, distance + 1));
            }
        }

        debug!(
            sink = %sink,
            reached,
            cells = self.distances.len(),
            "recomputed distance field"
        );
    }

    /// Distance from `pos` to the sink, [`UNREACHABLE`] when there is no route
    /// or the cell lies off the grid.
    #[must_use]
    pub fn distance(&self, pos: GridPos) -> i32 {
        self.index(pos)
            .map_or(UNREACHABLE, |index| self.distances[index])
    }

    /// Picks the passable orthogonal neighbour closest to the sink.
    ///
    /// Neighbours are examined west, east, north, south; the first minimum
    /// wins. Returns `None` when no neighbour has a route.
    #[must_use]
    pub fn next_step_toward_sink(&self, world: Vec2) -> Option<Step> {
        let cell = self.world_to_grid(world);
        let mut best: Option<(GridPos, i32)> = None;
        for neighbor in cell.neighbors() {
            if !self.contains(neighbor) || !self.get(neighbor).passable() {
                continue;
            }
            let distance = self.distance(neighbor);
            if distance == UNREACHABLE {
                continue;
            }
            if best.map_or(true, |(_, current)| distance < current) {
                best = Some((neighbor, distance));
            }
        }
        best.map(|(pos, distance)| Step {
            target: self.cell_center(pos),
            distance,
        })
    }

    /// Grid cell containing a world-space point.
    #[must_use]
    pub fn world_to_grid(&self, world: Vec2) -> GridPos {
        let scaled = (world / self.cell_size).floor();
        GridPos::new(scaled.x as i32, scaled.y as i32)
    }

    /// World-space centre of a grid cell.
    #[must_use]
    pub fn cell_center(&self, pos: GridPos) -> Vec2 {
        (Vec2::new(pos.x() as f32, pos.y() as f32) + Vec2::splat(0.5)) * self.cell_size
    }

    /// Advances the animation of every foreground cell.
    pub fn update(&mut self, elapsed: Duration) {
        for item in self.foreground.iter_mut().flatten() {
            item.update(elapsed);
        }
    }

    /// Every cell position with its effective contents, row-major.
    pub fn cells(&self) -> impl Iterator<Item = (GridPos, &GridItem)> + '_ {
        (0..self.height).flat_map(move |y| {
            (0..self.width).map(move |x| {
                let pos = GridPos::new(x, y);
                (pos, self.get(pos))
            })
        })
    }
}
