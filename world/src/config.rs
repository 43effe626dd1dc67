//! Level configuration loaded from TOML.
//!
//! Every section falls back to the values the shipped game uses, so an empty
//! document describes a playable level once it lists at least one block.

use std::{collections::BTreeMap, fs, path::Path, time::Duration};

use glam::Vec2;
use screamporium_core::GridPos;
use serde::Deserialize;

use crate::{
    blocks::{Block, BlockCatalog, CellTemplate, Footprint},
    error::LoadError,
};

/// Complete description of a level's rules, layout and block catalog.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LevelConfig {
    /// Starting player resources.
    pub player: PlayerConfig,
    /// Entity pool capacities.
    pub pools: PoolConfig,
    /// Grid geometry and shared frames.
    pub grid: GridConfig,
    /// Spawn sources and the sink.
    pub layout: LayoutConfig,
    /// Spawn charge and mob parameters.
    pub spawning: SpawningConfig,
    /// Fear rating history and thresholds.
    pub rating: RatingConfig,
    /// Currency awarded to the player.
    pub rewards: RewardConfig,
    /// Transient markers emitted by deaths and exits.
    pub decals: DecalConfig,
    /// Frames used for placement previews.
    pub highlights: HighlightConfig,
    /// Cursor frames per input mode.
    pub cursors: CursorConfig,
    /// Block catalog in id order.
    pub blocks: Vec<BlockConfig>,
}

impl LevelConfig {
    /// Parses a configuration document.
    pub fn from_toml_str(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Reads and parses the configuration file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents).map_err(|source| LoadError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Builds the block catalog described by the `blocks` section.
    pub fn catalog(&self) -> Result<BlockCatalog, LoadError> {
        if u16::try_from(self.blocks.len()).is_err() {
            return Err(LoadError::TooManyBlocks {
                count: self.blocks.len(),
            });
        }
        let blocks = self
            .blocks
            .iter()
            .map(BlockConfig::build)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(BlockCatalog::new(blocks))
    }
}

/// Starting player resources.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlayerConfig {
    /// Geld available when the level starts.
    pub starting_geld: i64,
    /// Value every rating history slot is seeded with.
    pub starting_rating: f64,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            starting_geld: 100,
            starting_rating: 5.0,
        }
    }
}

/// Entity pool capacities.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PoolConfig {
    /// Maximum number of simultaneously live mobs.
    pub max_mobs: usize,
    /// Maximum number of simultaneously live decals.
    pub max_decals: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_mobs: 200,
            max_decals: 10,
        }
    }
}

/// Grid geometry and shared frames.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GridConfig {
    /// Side length of a cell in world units.
    pub cell_size: f32,
    /// Frame of cells neither layer defines.
    pub default_frame: String,
    /// Frame drawn on source and sink cells.
    pub transit_frame: String,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            cell_size: 1.0,
            default_frame: "tiles_00".to_owned(),
            transit_frame: "special_squares_00".to_owned(),
        }
    }
}

/// Spawn sources and the sink.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutConfig {
    /// Cells that release mobs.
    pub sources: Vec<GridPos>,
    /// Cell mobs walk toward.
    pub sink: GridPos,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            sources: vec![GridPos::new(4, 9), GridPos::new(4, 14), GridPos::new(4, 4)],
            sink: GridPos::new(24, 9),
        }
    }
}

/// Spawn charge and mob parameters.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SpawningConfig {
    /// Charge added to every source per tick per rating point.
    pub charge_per_rating: f64,
    /// Mob walking speed in cells per second.
    pub mob_speed: f32,
    /// Fear carried by a freshly spawned mob.
    pub initial_fear: f64,
    /// Fear at which a mob is scared to death.
    pub death_fear: f64,
    /// Frame prefix of the mob sprite.
    pub mob_frame: String,
    /// Frame indices cycled while walking right.
    pub walk_right: Vec<u32>,
    /// Frame indices cycled while walking left.
    pub walk_left: Vec<u32>,
    /// Interval between mob animation frames in milliseconds.
    pub frame_interval_ms: u64,
}

impl SpawningConfig {
    pub(crate) fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }
}

impl Default for SpawningConfig {
    fn default() -> Self {
        Self {
            charge_per_rating: 0.004,
            mob_speed: 2.0,
            initial_fear: 1.0,
            death_fear: 10.0,
            mob_frame: "human01".to_owned(),
            walk_right: (0..8).collect(),
            walk_left: (0..8).collect(),
            frame_interval_ms: 100,
        }
    }
}

/// Fear rating history and thresholds.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RatingConfig {
    /// Number of recent samples averaged into the rating.
    pub history: usize,
    /// Amount every sample drops when a mob is scared to death.
    pub kill_penalty: f64,
    /// Lower clamp applied by the kill penalty.
    pub floor: f64,
    /// Rating at or below which the player loses.
    pub fail_rating: i32,
    /// Rating at or above which the win timer runs.
    pub win_rating: i32,
    /// Time the rating must stay at the win threshold, in milliseconds.
    pub win_duration_ms: u64,
}

impl RatingConfig {
    pub(crate) fn win_duration(&self) -> Duration {
        Duration::from_millis(self.win_duration_ms)
    }
}

impl Default for RatingConfig {
    fn default() -> Self {
        Self {
            history: 100,
            kill_penalty: 1.0,
            floor: 0.0,
            fail_rating: 0,
            win_rating: 9,
            win_duration_ms: 5_000,
        }
    }
}

/// Currency awarded to the player.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RewardConfig {
    /// Geld per point of fear a mob carries out through the sink.
    pub geld_per_fear: f64,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            geld_per_fear: 10.0,
        }
    }
}

/// One kind of transient marker.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DecalSpec {
    /// Frame drawn for the decal.
    pub frame: String,
    /// Offset from the triggering mob's position.
    pub offset: [f32; 2],
    /// Vertical distance the decal drifts while visible.
    pub rise: f32,
    /// Lifetime in milliseconds.
    pub duration_ms: u64,
}

impl DecalSpec {
    fn new(frame: &str, offset: [f32; 2], rise: f32, duration_ms: u64) -> Self {
        Self {
            frame: frame.to_owned(),
            offset,
            rise,
            duration_ms,
        }
    }

    pub(crate) fn offset(&self) -> Vec2 {
        Vec2::from(self.offset)
    }

    pub(crate) fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}

/// Transient markers emitted by deaths and exits.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DecalConfig {
    /// Ghost rising from a mob scared to death.
    pub death: DecalSpec,
    /// Bubble over a mob leaving unimpressed.
    pub calm_exit: DecalSpec,
    /// Bubble over a mob leaving terrified.
    pub terrified_exit: DecalSpec,
    /// Exits below this fear show the calm bubble.
    pub calm_below: f64,
    /// Exits above this fear show the terrified bubble.
    pub terrified_above: f64,
}

impl Default for DecalConfig {
    fn default() -> Self {
        Self {
            death: DecalSpec::new("ghost01_00", [0.0, 0.5], 2.0, 2_000),
            calm_exit: DecalSpec::new("bubble_00", [0.0, 1.5], 1.0, 500),
            terrified_exit: DecalSpec::new("bubble_01", [0.0, 1.5], 1.0, 500),
            calm_below: 5.0,
            terrified_above: 8.0,
        }
    }
}

/// Frames used for placement previews.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HighlightConfig {
    /// Cells of a placement that would succeed.
    pub valid: String,
    /// Cells of a placement that would be rejected.
    pub invalid: String,
    /// Cells of the placement a delete would remove.
    pub delete: String,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            valid: "special_squares_02".to_owned(),
            invalid: "special_squares_03".to_owned(),
            delete: "special_squares_01".to_owned(),
        }
    }
}

/// Cursor frames per input mode.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CursorConfig {
    /// Cursor outside any tool.
    pub normal: String,
    /// Cursor while placing a block.
    pub block: String,
    /// Cursor while deleting blocks.
    pub delete: String,
}

impl Default for CursorConfig {
    fn default() -> Self {
        Self {
            normal: "numbered_squares_01".to_owned(),
            block: "numbered_squares_04".to_owned(),
            delete: "numbered_squares_03".to_owned(),
        }
    }
}

/// Authoring format of a block.
///
/// `variants` lists footprints as rows of one-character symbols resolved
/// through `cells`; `.` and ` ` mark empty entries.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BlockConfig {
    /// Display name.
    pub title: String,
    /// Palette hotkey.
    pub hotkey: char,
    /// Geld charged per placement.
    pub cost: i64,
    /// Effect radius in world units.
    pub range: f32,
    /// Cap on mobs affected per tick; omit for unlimited.
    #[serde(default)]
    pub max_targets: Option<usize>,
    /// Fear applied per second to each target.
    pub fear_per_second: f64,
    /// Translation from the anchor to the footprint's top-left cell.
    #[serde(default)]
    pub offset: GridPos,
    /// Menu icon frame.
    #[serde(default)]
    pub icon: String,
    /// Sound cue played while scaring.
    #[serde(default)]
    pub scare_sound: Option<String>,
    /// Footprint variants as symbol rows.
    pub variants: Vec<Vec<String>>,
    /// Legend mapping symbols to cell templates.
    #[serde(default)]
    pub cells: BTreeMap<String, CellTemplate>,
}

impl BlockConfig {
    fn build(&self) -> Result<Block, LoadError> {
        if self.variants.is_empty() {
            return Err(LoadError::NoVariants {
                block: self.title.clone(),
            });
        }

        let mut legend = BTreeMap::new();
        for (symbol, template) in &self.cells {
            let _ = legend.insert(single_char(symbol)?, template);
        }

        let variants = self
            .variants
            .iter()
            .map(|rows| self.footprint(rows, &legend))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Block {
            title: self.title.clone(),
            hotkey: self.hotkey,
            icon: self.icon.clone(),
            scare_sound: self.scare_sound.clone(),
            cost: self.cost,
            range: self.range,
            max_targets: self.max_targets,
            fear_per_second: self.fear_per_second,
            offset: self.offset,
            variants,
        })
    }

    fn footprint(
        &self,
        rows: &[String],
        legend: &BTreeMap<char, &CellTemplate>,
    ) -> Result<Footprint, LoadError> {
        rows.iter()
            .map(|row| {
                row.chars()
                    .map(|symbol| match symbol {
                        '.' | ' ' => Ok(None),
                        _ => legend
                            .get(&symbol)
                            .map(|template| Some((*template).clone()))
                            .ok_or_else(|| LoadError::UnknownCell {
                                block: self.title.clone(),
                                symbol,
                            }),
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect()
    }
}

pub(crate) fn single_char(symbol: &str) -> Result<char, LoadError> {
    let mut chars = symbol.chars();
    match (chars.next(), chars.next()) {
        (Some(symbol), None) => Ok(symbol),
        _ => Err(LoadError::InvalidSymbol {
            symbol: symbol.to_owned(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use screamporium_core::BlockId;

    const RING: &str = r#"
        [[blocks]]
        title = "Spiketron 5000"
        hotkey = "2"
        cost = 100
        range = 5.0
        max_targets = 3
        fear_per_second = 3.0
        offset = [-1, -1]
        variants = [["sss", "...", "sss"], ["s.s", "s.s", "s.s"]]

        [blocks.cells.s]
        frame = "spikes01"
        normal = [0]
        scaring = [1, 2, 3]
    "#;

    #[test]
    fn empty_document_uses_shipped_defaults() {
        let config = LevelConfig::from_toml_str("").expect("empty config parses");
        assert_eq!(config.player.starting_geld, 100);
        assert_eq!(config.pools.max_mobs, 200);
        assert_eq!(config.layout.sink, GridPos::new(24, 9));
        assert_eq!(config.layout.sources.len(), 3);
        assert_eq!(config.rating.win_duration(), Duration::from_secs(5));
        assert_eq!(config.spawning.walk_right.len(), 8);
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let config = LevelConfig::from_toml_str("[player]\nstarting_geld = 7\n")
            .expect("partial config parses");
        assert_eq!(config.player.starting_geld, 7);
        assert!((config.player.starting_rating - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn block_rows_resolve_through_cell_legend() {
        let config = LevelConfig::from_toml_str(RING).expect("ring config parses");
        let catalog = config.catalog().expect("ring catalog builds");
        let block = catalog.get(BlockId::new(0)).expect("block 0 exists");

        assert_eq!(block.variant_count(), 2);
        assert_eq!(block.offset(), GridPos::new(-1, -1));
        assert_eq!(block.max_targets(), Some(3));
        let footprint = block.footprint(0).expect("variant 0 exists");
        assert!(footprint[1].iter().all(Option::is_none));
        assert_eq!(
            footprint[0][0].as_ref().map(|cell| cell.frame.as_str()),
            Some("spikes01")
        );
    }

    #[test]
    fn unknown_cell_symbols_are_rejected() {
        let broken = RING.replace("\"s.s\", \"s.s\"", "\"x.s\", \"s.s\"");
        let config = LevelConfig::from_toml_str(&broken).expect("config parses");
        match config.catalog() {
            Err(LoadError::UnknownCell { symbol, .. }) => assert_eq!(symbol, 'x'),
            other => panic!("expected unknown cell error, got {other:?}"),
        }
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(LevelConfig::from_toml_str("[player]\nstarting_gold = 5\n").is_err());
    }
}
