use std::collections::VecDeque;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::queue::{weighted_index, ShowQueue};
use crate::types::strategy_label;

/// When the engine moves on from the show it just played.
///
/// Only consulted while the head show still has episodes left; an exhausted
/// show always leaves the schedule.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum ChangeShow {
    #[default]
    AfterEveryEpisode,
    WhenShowIsComplete,
}

impl ChangeShow {
    pub const ALL: [ChangeShow; 2] = [ChangeShow::AfterEveryEpisode, ChangeShow::WhenShowIsComplete];

    pub fn name(&self) -> &'static str {
        match self {
            ChangeShow::AfterEveryEpisode => "after_every_episode",
            ChangeShow::WhenShowIsComplete => "when_show_is_complete",
        }
    }

    pub fn label(&self) -> String {
        strategy_label(self.name())
    }

    pub fn should_change(&self, _active: &VecDeque<ShowQueue<'_>>) -> bool {
        match self {
            ChangeShow::AfterEveryEpisode => true,
            ChangeShow::WhenShowIsComplete => false,
        }
    }
}

impl std::fmt::Display for ChangeShow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

pub fn parse_change_show(s: &str) -> Result<ChangeShow, String> {
    let normalized = s.trim().to_lowercase().replace('-', "_");
    ChangeShow::ALL
        .into_iter()
        .find(|c| c.name() == normalized)
        .ok_or_else(|| {
            format!(
                "Invalid change-show rule '{}': expected after_every_episode or when_show_is_complete",
                s
            )
        })
}

/// How the active shows are reordered after a show change.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum Rotate {
    /// Move the current show to the back.
    #[default]
    Rotate,
    /// Randomly permute every active show.
    Shuffle,
    /// Promote one show to the front, chosen with weight = remaining episodes.
    WeightedShuffle,
}

impl Rotate {
    pub const ALL: [Rotate; 3] = [Rotate::Rotate, Rotate::Shuffle, Rotate::WeightedShuffle];

    pub fn name(&self) -> &'static str {
        match self {
            Rotate::Rotate => "rotate",
            Rotate::Shuffle => "shuffle",
            Rotate::WeightedShuffle => "weighted_shuffle",
        }
    }

    pub fn label(&self) -> String {
        strategy_label(self.name())
    }

    /// Reorder the active list. A list of zero or one show is left as is.
    pub fn apply<R: Rng + ?Sized>(&self, active: &mut VecDeque<ShowQueue<'_>>, rng: &mut R) {
        if active.len() < 2 {
            return;
        }

        match self {
            Rotate::Rotate => active.rotate_left(1),
            Rotate::Shuffle => active.make_contiguous().shuffle(rng),
            Rotate::WeightedShuffle => {
                let weights: Vec<usize> = active.iter().map(|q| q.len()).collect();
                if let Some(index) = weighted_index(&weights, rng) {
                    if let Some(chosen) = active.remove(index) {
                        active.push_front(chosen);
                    }
                }
            }
        }
    }
}

impl std::fmt::Display for Rotate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

pub fn parse_rotate(s: &str) -> Result<Rotate, String> {
    let normalized = s.trim().to_lowercase().replace('-', "_");
    Rotate::ALL
        .into_iter()
        .find(|r| r.name() == normalized)
        .ok_or_else(|| {
            format!(
                "Invalid rotate strategy '{}': expected rotate, shuffle, or weighted_shuffle",
                s
            )
        })
}
