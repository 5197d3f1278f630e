//! Frame schedules for hypothetical outcome plots (HOPs)
//!
//! A HOP animates a distribution by showing one draw per frame. The order
//! of draws is shuffled with an explicit seed so the same seed always
//! renders the same animation. Each block of `draws` consecutive frames is
//! its own permutation, so every draw is shown once before any repeats.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::error::{StatsError, StatsResult};

/// Draw index shown at each animation frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HopSchedule {
    seed: u64,
    draws: usize,
    order: Vec<usize>,
}

/// One frame of a HOP, keyed by frame index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HopFrame<T> {
    pub frame: usize,
    pub draw: usize,
    pub value: T,
}

impl HopSchedule {
    /// Build a schedule of `frames` frames over `draws` draws
    pub fn shuffled(draws: usize, frames: usize, seed: u64) -> StatsResult<Self> {
        if draws == 0 {
            return Err(StatsError::invalid("a HOP needs at least one draw"));
        }
        if frames == 0 {
            return Err(StatsError::invalid("a HOP needs at least one frame"));
        }

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut order = Vec::with_capacity(frames);
        let mut cycle: Vec<usize> = (0..draws).collect();
        while order.len() < frames {
            cycle.shuffle(&mut rng);
            let take = (frames - order.len()).min(draws);
            order.extend_from_slice(&cycle[..take]);
        }

        tracing::debug!(draws, frames, seed, "built HOP schedule");
        Ok(Self { seed, draws, order })
    }

    /// Number of frames
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Always false for a built schedule
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Seed the schedule was shuffled with
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Number of draws the schedule indexes into
    pub fn draws(&self) -> usize {
        self.draws
    }

    /// Draw index shown at `frame`
    pub fn frame(&self, frame: usize) -> Option<usize> {
        self.order.get(frame).copied()
    }

    /// Draw indices in frame order
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    /// Iterate `(frame, draw)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.order.iter().copied().enumerate()
    }

    /// Pair each frame with the item it shows
    ///
    /// `items` must hold exactly the number of draws the schedule was built for.
    pub fn apply<T: Clone>(&self, items: &[T]) -> StatsResult<Vec<HopFrame<T>>> {
        if items.len() != self.draws {
            return Err(StatsError::invalid(format!(
                "schedule covers {} draws but {} items were given",
                self.draws,
                items.len()
            )));
        }

        Ok(self
            .iter()
            .map(|(frame, draw)| HopFrame {
                frame,
                draw,
                value: items[draw].clone(),
            })
            .collect())
    }
}
