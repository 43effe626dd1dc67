#![allow(dead_code)]

use glam::Vec2;
use screamporium_world::{Background, Level, LevelConfig};

pub const MR_BONES: &str = r#"
[[blocks]]
title = "Mr. Bones"
hotkey = "1"
cost = 10
range = 1.5
max_targets = 1
fear_per_second = 4.0
scare_sound = "deep-laugh"
variants = [["b"]]

[blocks.cells.b]
frame = "skeleton01"
normal = [0, 1, 2, 3]
scaring = [4, 5, 6, 7]
"#;

pub const SPIKETRON: &str = r#"
[[blocks]]
title = "Spiketron 5000"
hotkey = "2"
cost = 100
range = 5.0
max_targets = 3
fear_per_second = 3.0
offset = [-1, -1]
scare_sound = "spikes"
variants = [["sss", "...", "sss"], ["s.s", "s.s", "s.s"]]

[blocks.cells.s]
frame = "spikes01"
normal = [0]
scaring = [1, 2, 3]
"#;

/// Level over an open 30x20 map with the given extra TOML prepended.
pub fn level_with(extra: &str) -> Level {
    let source = format!("{extra}\n{MR_BONES}\n{SPIKETRON}");
    let config = LevelConfig::from_toml_str(&source).expect("test config parses");
    Level::new(&config, Background::empty(30, 20)).expect("test level builds")
}

pub fn center(x: i32, y: i32) -> Vec2 {
    Vec2::new(x as f32 + 0.5, y as f32 + 0.5)
}
