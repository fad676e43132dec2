use std::cmp::Reverse;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::types::{strategy_label, Episode};

/// Total order imposed on the filtered pool before it is split per show.
/// Whatever episode of a show comes first here is the first one that show plays.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum EpisodeOrder {
    Random,
    #[default]
    Chronological,
    NewestFirst,
}

impl EpisodeOrder {
    pub const ALL: [EpisodeOrder; 3] = [
        EpisodeOrder::Random,
        EpisodeOrder::Chronological,
        EpisodeOrder::NewestFirst,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            EpisodeOrder::Random => "random",
            EpisodeOrder::Chronological => "chronological",
            EpisodeOrder::NewestFirst => "newest_first",
        }
    }

    pub fn label(&self) -> String {
        strategy_label(self.name())
    }

    /// Sort `episodes` in place. Ties keep their input order.
    pub fn apply<R: Rng + ?Sized>(&self, episodes: &mut [&Episode], rng: &mut R) {
        match self {
            EpisodeOrder::Random => episodes.shuffle(rng),
            EpisodeOrder::Chronological => episodes.sort_by_key(|e| e.chronological_key()),
            EpisodeOrder::NewestFirst => episodes.sort_by_key(|e| Reverse(e.release_date)),
        }
    }
}

impl std::fmt::Display for EpisodeOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

pub fn parse_episode_order(s: &str) -> Result<EpisodeOrder, String> {
    let normalized = s.trim().to_lowercase().replace('-', "_");
    EpisodeOrder::ALL
        .into_iter()
        .find(|o| o.name() == normalized)
        .ok_or_else(|| {
            format!(
                "Invalid episode order '{}': expected random, chronological, or newest_first",
                s
            )
        })
}

/// Run the global ordering stage: order, then optionally reverse.
pub fn order_episodes<R: Rng + ?Sized>(
    order: EpisodeOrder,
    reverse: bool,
    episodes: &mut Vec<&Episode>,
    rng: &mut R,
) {
    order.apply(episodes, rng);
    if reverse {
        episodes.reverse();
    }
}
