//! Per-cell state stored in the grid layers.

use std::{borrow::Cow, time::Duration};

use screamporium_core::BlockState;

use crate::{animation::FrameAnimation, blocks::CellTemplate};

const CELL_ANIMATION_INTERVAL: Duration = Duration::from_millis(100);

/// Frame index sequences a block cell cycles through per state.
#[derive(Clone, Debug, PartialEq)]
struct StateFrames {
    normal: Vec<u32>,
    scaring: Vec<u32>,
}

impl StateFrames {
    fn for_state(&self, state: BlockState) -> &[u32] {
        match state {
            BlockState::Normal => &self.normal,
            BlockState::Scaring => &self.scaring,
        }
    }
}

/// Contents of a single grid cell.
///
/// Static cells display their frame verbatim. Animated cells (block cells
/// with per-state frame sequences) treat the frame as a prefix and append
/// the current two-digit frame index, e.g. `skeleton01_03`.
#[derive(Clone, Debug, PartialEq)]
pub struct GridItem {
    passable: bool,
    frame: String,
    frames: Option<StateFrames>,
    animation: Option<FrameAnimation>,
    state: BlockState,
}

impl GridItem {
    /// Creates a static terrain cell.
    #[must_use]
    pub fn terrain(frame: impl Into<String>, passable: bool) -> Self {
        Self {
            passable,
            frame: frame.into(),
            frames: None,
            animation: None,
            state: BlockState::Normal,
        }
    }

    /// Creates a passable source or sink marker.
    #[must_use]
    pub fn transit(frame: impl Into<String>) -> Self {
        Self::terrain(frame, true)
    }

    /// Instantiates a fresh cell from a block template, starting in the
    /// normal state.
    pub(crate) fn from_template(template: &CellTemplate) -> Self {
        let animated = !template.normal.is_empty() || !template.scaring.is_empty();
        if !animated {
            return Self::terrain(template.frame.clone(), template.passable);
        }

        let frames = StateFrames {
            normal: template.normal.clone(),
            scaring: template.scaring.clone(),
        };
        let animation = FrameAnimation::new(
            CELL_ANIMATION_INTERVAL,
            frames.for_state(BlockState::Normal).to_vec(),
        );
        Self {
            passable: template.passable,
            frame: template.frame.clone(),
            frames: Some(frames),
            animation: Some(animation),
            state: BlockState::Normal,
        }
    }

    /// Whether mobs may walk through the cell.
    #[must_use]
    pub fn passable(&self) -> bool {
        self.passable
    }

    /// Current visual state.
    #[must_use]
    pub fn state(&self) -> BlockState {
        self.state
    }

    /// Sprite frame currently displayed by the cell.
    #[must_use]
    pub fn frame(&self) -> Cow<'_, str> {
        match &self.animation {
            Some(animation) => Cow::Owned(format!("{}_{:02}", self.frame, animation.current())),
            None => Cow::Borrowed(&self.frame),
        }
    }

    /// Switches the animation sequence. Does nothing when the cell is already
    /// in `state` or has no frames for it.
    pub(crate) fn set_state(&mut self, state: BlockState) {
        if state == self.state {
            return;
        }
        let (Some(frames), Some(animation)) = (&self.frames, &mut self.animation) else {
            return;
        };
        let sequence = frames.for_state(state);
        if sequence.is_empty() {
            return;
        }
        animation.set_sequence(sequence);
        self.state = state;
    }

    pub(crate) fn update(&mut self, elapsed: Duration) {
        if let Some(animation) = &mut self.animation {
            animation.update(elapsed);
        }
    }
}
