use std::time::Duration;

use anyhow::{bail, ensure, Context, Result};
use screamporium_core::{Command, Event, PaletteEntry};
use screamporium_system_audio_cues::{AudioCues, Cue, SoundNames};
use screamporium_system_ui_state::{CursorFrames, Input, Key, MouseButton, Ui, UiState};
use screamporium_world::{self as world, query, Background, Level, LevelConfig, Outcome};
use tracing::{debug, info, warn};

use crate::place_request::PlaceRequest;

/// Fixed simulation step.
pub(crate) const TICK: Duration = Duration::from_nanos(1_000_000_000 / 30);

const PLACEMENT_SOUND: &str = "place-block";
const DEATH_SOUND: &str = "no";

/// Running totals reported when the session ends.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct SessionStats {
    pub(crate) ticks: u64,
    pub(crate) spawned: u64,
    pub(crate) escaped: u64,
    pub(crate) scared_to_death: u64,
    pub(crate) sounds: u64,
    pub(crate) losses: u32,
    pub(crate) wins: u32,
}

/// Owns the level and the systems around it, stepping them at a fixed rate.
pub(crate) struct Session {
    config: LevelConfig,
    background: Background,
    level: Level,
    palette: Vec<PaletteEntry>,
    ui: Ui,
    audio: AudioCues,
    accumulator: Duration,
    commands: Vec<Command>,
    events: Vec<Event>,
    cues: Vec<Cue>,
    stats: SessionStats,
}

impl Session {
    pub(crate) fn new(config: LevelConfig, background: Background) -> Result<Self> {
        let level = Level::new(&config, background.clone()).context("failed to build level")?;
        let palette = query::palette(&level);
        let cursors = &config.cursors;
        let ui = Ui::new(CursorFrames {
            normal: cursors.normal.clone(),
            block: cursors.block.clone(),
            delete: cursors.delete.clone(),
        });
        let audio = AudioCues::new(SoundNames {
            placement: PLACEMENT_SOUND.to_owned(),
            death: DEATH_SOUND.to_owned(),
            scares: query::catalog(&level)
                .iter()
                .map(|(_, block)| block.scare_sound().map(str::to_owned))
                .collect(),
        });

        let mut session = Self {
            config,
            background,
            level,
            palette,
            ui,
            audio,
            accumulator: Duration::ZERO,
            commands: Vec::new(),
            events: Vec::new(),
            cues: Vec::new(),
            stats: SessionStats::default(),
        };
        session.start();
        Ok(session)
    }

    pub(crate) fn level(&self) -> &Level {
        &self.level
    }

    pub(crate) fn stats(&self) -> SessionStats {
        self.stats
    }

    fn start(&mut self) {
        self.level.begin(&mut self.events);
        self.ui.register(&mut self.commands);
        self.drain_commands();
        self.flush_events();
    }

    /// Forwards one input event through the UI state machine.
    pub(crate) fn input(&mut self, input: Input) {
        self.ui.handle(input, &self.palette, &mut self.commands);
        self.drain_commands();
        self.flush_events();
    }

    /// Drives the UI through a full placement: select, hover, click, leave.
    ///
    /// Fails without touching the level when the hotkey names no palette
    /// block.
    pub(crate) fn place(&mut self, request: PlaceRequest) -> Result<()> {
        if !self
            .palette
            .iter()
            .any(|entry| entry.hotkey == request.hotkey)
        {
            bail!(
                "no block is bound to hotkey '{}' (requested at {})",
                request.hotkey,
                request.cell
            );
        }

        let world = query::grid(&self.level).cell_center(request.cell);
        self.input(Input::KeyPressed {
            key: Key::Char(request.hotkey),
        });
        ensure!(
            matches!(self.ui.state(), UiState::Block { .. }),
            "hotkey '{}' did not select a block",
            request.hotkey
        );
        self.input(Input::MouseMoved { world });
        self.input(Input::MousePressed {
            button: MouseButton::Left,
        });
        self.input(Input::KeyPressed { key: Key::Escape });
        Ok(())
    }

    /// Accumulates wall time and runs every whole tick it covers. Returns the
    /// number of ticks run.
    pub(crate) fn advance(&mut self, elapsed: Duration) -> Result<u32> {
        self.accumulator += elapsed;
        let mut ticks = 0;
        while self.accumulator >= TICK {
            self.accumulator -= TICK;
            world::apply(&mut self.level, Command::Tick { dt: TICK }, &mut self.events);
            self.stats.ticks += 1;
            ticks += 1;
            self.flush_events();

            if let Some(outcome) = query::outcome(&self.level) {
                self.restart(outcome)?;
            }
        }
        Ok(ticks)
    }

    fn restart(&mut self, outcome: Outcome) -> Result<()> {
        match outcome {
            Outcome::Lost => self.stats.losses += 1,
            Outcome::Won => self.stats.wins += 1,
        }
        info!(?outcome, "rebuilding level");

        self.level = Level::new(&self.config, self.background.clone())
            .context("failed to rebuild level")?;
        self.accumulator = Duration::ZERO;
        self.ui.reset(&mut self.commands);
        self.commands.clear();
        self.start();
        Ok(())
    }

    fn drain_commands(&mut self) {
        for command in self.commands.drain(..) {
            world::apply(&mut self.level, command, &mut self.events);
        }
    }

    fn flush_events(&mut self) {
        for event in &self.events {
            match event {
                Event::MobSpawned { .. } => self.stats.spawned += 1,
                Event::MobEscaped { .. } => self.stats.escaped += 1,
                Event::MobScaredToDeath { .. } => self.stats.scared_to_death += 1,
                Event::BlockPlacementRejected { anchor, reason, .. } => {
                    warn!(anchor = %anchor, %reason, "placement rejected");
                }
                Event::BlockRemovalRejected { reason } => warn!(%reason, "removal rejected"),
                _ => {}
            }
        }

        self.audio.handle(&self.events, &mut self.cues);
        for cue in self.cues.drain(..) {
            debug!(?cue, "audio cue");
            self.stats.sounds += 1;
        }
        self.events.clear();
    }
}

#[cfg(test)]
mod tests {
    use screamporium_core::GridPos;

    use super::*;

    const LEVEL: &str = r#"
        [layout]
        sources = [[1, 2]]
        sink = [10, 2]

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

    fn session(extra: &str) -> Session {
        let config =
            LevelConfig::from_toml_str(&format!("{extra}\n{LEVEL}")).expect("config parses");
        Session::new(config, Background::empty(12, 5)).expect("session builds")
    }

    #[test]
    fn advance_runs_whole_ticks_only() {
        let mut session = session("");
        let step = Duration::from_millis(20);
        assert_eq!(session.advance(step).expect("advance"), 0);
        assert_eq!(session.advance(step).expect("advance"), 1);
        assert_eq!(session.advance(TICK * 3).expect("advance"), 3);
        assert_eq!(session.stats().ticks, 4);
    }

    #[test]
    fn scripted_placement_goes_through_the_ui() {
        let mut session = session("");
        session.place(PlaceRequest {
            hotkey: '1',
            cell: GridPos::new(5, 1),
        })
        .expect("hotkey 1 is bound");

        assert_eq!(query::placements(session.level()).count(), 1);
        assert_eq!(query::geld(session.level()), 90);
        assert!(query::highlights(session.level()).is_empty());
        assert_eq!(query::cursor(session.level()), "numbered_squares_01");
    }

    #[test]
    fn unbound_hotkeys_leave_the_level_untouched() {
        let mut session = session("");
        for hotkey in ['9', 'd', '+'] {
            let error = session
                .place(PlaceRequest {
                    hotkey,
                    cell: GridPos::new(5, 1),
                })
                .expect_err("hotkey has no block");
            assert!(error.to_string().contains(&format!("'{hotkey}'")));
        }

        assert_eq!(query::placements(session.level()).count(), 0);
        assert!(query::mobs(session.level()).is_empty());
        assert_eq!(query::geld(session.level()), 100);
        assert_eq!(session.stats().spawned, 0);
        assert_eq!(session.ui.state(), UiState::Normal);
    }

    #[test]
    fn losing_rebuilds_the_level() {
        let mut session = session("[player]\nstarting_rating = 0.2\nstarting_geld = 40");
        session.place(PlaceRequest {
            hotkey: '1',
            cell: GridPos::new(5, 1),
        })
        .expect("hotkey 1 is bound");
        assert_eq!(query::geld(session.level()), 30);

        let _ = session.advance(TICK).expect("advance");
        assert_eq!(session.stats().losses, 1);
        assert_eq!(query::placements(session.level()).count(), 0);
        assert_eq!(query::geld(session.level()), 40);
        assert_eq!(query::outcome(session.level()), None);
    }
}
