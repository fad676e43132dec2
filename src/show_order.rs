use std::cmp::Reverse;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::queue::{weighted_index, ShowQueue};
use crate::types::strategy_label;

/// How shows are prioritized before interleaving starts.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum ShowOrder {
    /// No show ordering: the pool is played as one stream in episode order.
    None,
    #[default]
    Shuffle,
    /// Random order biased towards shows with more candidate episodes.
    WeightedShuffle,
    LeastRecentlyWatched,
    NewestEpisodesFirst,
    /// Shortest remaining watch time first.
    FinishUpDuration,
    /// Fewest remaining episodes first.
    FinishUpEpisodes,
}

impl ShowOrder {
    pub const ALL: [ShowOrder; 7] = [
        ShowOrder::None,
        ShowOrder::Shuffle,
        ShowOrder::WeightedShuffle,
        ShowOrder::LeastRecentlyWatched,
        ShowOrder::NewestEpisodesFirst,
        ShowOrder::FinishUpDuration,
        ShowOrder::FinishUpEpisodes,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ShowOrder::None => "none",
            ShowOrder::Shuffle => "shuffle",
            ShowOrder::WeightedShuffle => "weighted_shuffle",
            ShowOrder::LeastRecentlyWatched => "least_recently_watched",
            ShowOrder::NewestEpisodesFirst => "newest_episodes_first",
            ShowOrder::FinishUpDuration => "finish_up_duration",
            ShowOrder::FinishUpEpisodes => "finish_up_episodes",
        }
    }

    pub fn label(&self) -> String {
        strategy_label(self.name())
    }

    /// Whether grouping should collapse the pool into a single queue.
    pub fn collapses_shows(&self) -> bool {
        matches!(self, ShowOrder::None)
    }

    /// Reorder `queues` in place. Sorting strategies are stable, so shows that
    /// tie keep their first-seen order.
    pub fn apply<R: Rng + ?Sized>(&self, queues: &mut Vec<ShowQueue<'_>>, rng: &mut R) {
        match self {
            ShowOrder::None => {}
            ShowOrder::Shuffle => queues.shuffle(rng),
            ShowOrder::WeightedShuffle => weighted_permutation(queues, rng),
            ShowOrder::LeastRecentlyWatched => queues.sort_by_key(|q| q.show.last_watched_date),
            ShowOrder::NewestEpisodesFirst => {
                queues.sort_by_key(|q| Reverse(q.show.newest_episode_date))
            }
            ShowOrder::FinishUpDuration => queues.sort_by_key(|q| q.remaining_duration()),
            ShowOrder::FinishUpEpisodes => queues.sort_by_key(|q| q.len()),
        }
    }
}

impl std::fmt::Display for ShowOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

pub fn parse_show_order(s: &str) -> Result<ShowOrder, String> {
    let normalized = s.trim().to_lowercase().replace('-', "_");
    ShowOrder::ALL
        .into_iter()
        .find(|o| o.name() == normalized)
        .ok_or_else(|| {
            format!(
                "Invalid show order '{}': expected none, shuffle, weighted_shuffle, least_recently_watched, newest_episodes_first, finish_up_duration, or finish_up_episodes",
                s
            )
        })
}

/// Weighted permutation without replacement, weight = remaining episode count.
///
/// Each step draws one unplaced episode uniformly and places its show next,
/// then drops that show's episodes from the draw.
fn weighted_permutation<R: Rng + ?Sized>(queues: &mut Vec<ShowQueue<'_>>, rng: &mut R) {
    let mut unplaced = std::mem::take(queues);
    queues.reserve(unplaced.len());

    while !unplaced.is_empty() {
        let weights: Vec<usize> = unplaced.iter().map(|q| q.len()).collect();
        // Queues from grouping are never empty; fall back to first-seen order if one is.
        let index = weighted_index(&weights, rng).unwrap_or(0);
        queues.push(unplaced.remove(index));
    }
}

/// Run the show-priority stage: order, then optionally reverse.
pub fn order_shows<R: Rng + ?Sized>(
    order: ShowOrder,
    reverse: bool,
    queues: &mut Vec<ShowQueue<'_>>,
    rng: &mut R,
) {
    order.apply(queues, rng);
    if reverse {
        queues.reverse();
    }
}
