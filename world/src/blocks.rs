//! Block templates, the catalog that owns them, and placed instances.

use screamporium_core::{BlockId, GridPos, PaletteEntry};
use serde::Deserialize;

/// Template for one physical cell of a block footprint.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CellTemplate {
    /// Frame name, or frame prefix when the cell is animated.
    pub frame: String,
    /// Whether mobs can walk through the cell once placed.
    #[serde(default)]
    pub passable: bool,
    /// Frame indices cycled while the block is idle.
    #[serde(default)]
    pub normal: Vec<u32>,
    /// Frame indices cycled while the block frightens a mob.
    #[serde(default)]
    pub scaring: Vec<u32>,
}

/// Sparse footprint: rows of optional cells, top row first.
pub type Footprint = Vec<Vec<Option<CellTemplate>>>;

/// Immutable definition of a placeable block.
#[derive(Clone, Debug, PartialEq)]
pub struct Block {
    pub(crate) title: String,
    pub(crate) hotkey: char,
    pub(crate) icon: String,
    pub(crate) scare_sound: Option<String>,
    pub(crate) cost: i64,
    pub(crate) range: f32,
    pub(crate) max_targets: Option<usize>,
    pub(crate) fear_per_second: f64,
    pub(crate) offset: GridPos,
    pub(crate) variants: Vec<Footprint>,
}

impl Block {
    /// Display name of the block.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Key that selects the block in the palette.
    #[must_use]
    pub fn hotkey(&self) -> char {
        self.hotkey
    }

    /// Frame shown for the block in menus.
    #[must_use]
    pub fn icon(&self) -> &str {
        &self.icon
    }

    /// Sound cue played while the block frightens mobs.
    #[must_use]
    pub fn scare_sound(&self) -> Option<&str> {
        self.scare_sound.as_deref()
    }

    /// Geld charged per placement.
    #[must_use]
    pub fn cost(&self) -> i64 {
        self.cost
    }

    /// Effect radius in world units, measured from the anchor cell centre.
    #[must_use]
    pub fn range(&self) -> f32 {
        self.range
    }

    /// Cap on mobs affected per tick; `None` is unlimited.
    #[must_use]
    pub fn max_targets(&self) -> Option<usize> {
        self.max_targets
    }

    /// Fear applied per second to each target. Negative values calm.
    #[must_use]
    pub fn fear_per_second(&self) -> f64 {
        self.fear_per_second
    }

    /// Translation from the anchor cell to the footprint's top-left cell.
    #[must_use]
    pub fn offset(&self) -> GridPos {
        self.offset
    }

    /// Number of footprint variants.
    #[must_use]
    pub fn variant_count(&self) -> usize {
        self.variants.len()
    }

    /// Footprint for the provided variant, if it exists.
    #[must_use]
    pub fn footprint(&self, variant: usize) -> Option<&Footprint> {
        self.variants.get(variant)
    }
}

/// All blocks available in a level, indexed by [`BlockId`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BlockCatalog {
    blocks: Vec<Block>,
}

impl BlockCatalog {
    pub(crate) fn new(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }

    /// Looks up a block definition.
    #[must_use]
    pub fn get(&self, id: BlockId) -> Option<&Block> {
        self.blocks.get(usize::from(id.get()))
    }

    /// Iterates the catalog in id order.
    pub fn iter(&self) -> impl Iterator<Item = (BlockId, &Block)> {
        self.blocks
            .iter()
            .enumerate()
            .map(|(index, block)| (BlockId::new(index as u16), block))
    }

    /// Number of blocks in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Reports whether the catalog holds no blocks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Selectable entries advertised to the input layer.
    #[must_use]
    pub fn palette(&self) -> Vec<PaletteEntry> {
        self.iter()
            .map(|(id, block)| PaletteEntry {
                block: id,
                hotkey: block.hotkey,
                variants: block.variant_count(),
                cost: block.cost,
            })
            .collect()
    }
}

/// A block placed on the grid, keyed by its logical anchor cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BlockPlacement {
    anchor: GridPos,
    block: BlockId,
    variant: usize,
}

impl BlockPlacement {
    /// Creates a placement record.
    #[must_use]
    pub const fn new(anchor: GridPos, block: BlockId, variant: usize) -> Self {
        Self {
            anchor,
            block,
            variant,
        }
    }

    /// Anchor cell before the block offset is applied.
    #[must_use]
    pub const fn anchor(&self) -> GridPos {
        self.anchor
    }

    /// Catalog entry of the placement.
    #[must_use]
    pub const fn block(&self) -> BlockId {
        self.block
    }

    /// Footprint variant of the placement.
    #[must_use]
    pub const fn variant(&self) -> usize {
        self.variant
    }

    /// Grid cells written by the placement together with their templates.
    ///
    /// Empty template entries are skipped. Yields nothing when the variant
    /// does not exist on `block`.
    pub fn cells<'a>(
        &self,
        block: &'a Block,
    ) -> impl Iterator<Item = (GridPos, &'a CellTemplate)> + 'a {
        let origin = self.anchor + block.offset;
        block
            .footprint(self.variant)
            .into_iter()
            .flatten()
            .enumerate()
            .flat_map(move |(y, row)| {
                row.iter().enumerate().filter_map(move |(x, cell)| {
                    cell.as_ref()
                        .map(|template| (origin + GridPos::new(x as i32, y as i32), template))
                })
            })
    }

    /// Reports whether the placement writes the provided cell.
    #[must_use]
    pub fn occupies(&self, cell: GridPos, block: &Block) -> bool {
        self.cells(block).any(|(position, _)| position == cell)
    }
}
