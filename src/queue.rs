use std::collections::{HashMap, VecDeque};

use rand::Rng;

use crate::error::PlaylistError;
use crate::types::{Episode, Show, ShowIndex};

/// The not-yet-played episodes of one show, in play order.
///
/// Only the interleave engine pops from a queue; once a queue is empty it is
/// dropped from the schedule and never comes back.
#[derive(Debug, Clone, PartialEq)]
pub struct ShowQueue<'a> {
    pub show: &'a Show,
    episodes: VecDeque<&'a Episode>,
}

impl<'a> ShowQueue<'a> {
    pub fn new(show: &'a Show) -> Self {
        Self {
            show,
            episodes: VecDeque::new(),
        }
    }

    pub fn with_episodes(show: &'a Show, episodes: impl IntoIterator<Item = &'a Episode>) -> Self {
        Self {
            show,
            episodes: episodes.into_iter().collect(),
        }
    }

    pub fn push(&mut self, episode: &'a Episode) {
        self.episodes.push_back(episode);
    }

    pub fn pop_front(&mut self) -> Option<&'a Episode> {
        self.episodes.pop_front()
    }

    pub fn len(&self) -> usize {
        self.episodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.episodes.is_empty()
    }

    /// Summed duration of the remaining episodes, in seconds.
    pub fn remaining_duration(&self) -> u64 {
        self.episodes.iter().map(|e| u64::from(e.duration)).sum()
    }

    pub fn episodes(&self) -> impl Iterator<Item = &'a Episode> + '_ {
        self.episodes.iter().copied()
    }

    pub fn show_id(&self) -> &'a str {
        &self.show.id
    }
}

/// Split an ordered pool into one queue per show, in first-seen order.
///
/// Within a queue episodes keep their relative order from `ordered`. With
/// `collapse` set, every episode lands in one queue labelled with the first
/// episode's show.
pub fn group_by_show<'a>(
    ordered: &[&'a Episode],
    shows: &'a ShowIndex,
    collapse: bool,
) -> Result<Vec<ShowQueue<'a>>, PlaylistError> {
    let mut queues: Vec<ShowQueue<'a>> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for episode in ordered {
        let show = shows
            .get(&episode.show_id)
            .ok_or_else(|| PlaylistError::UnknownShow {
                episode_id: episode.id.clone(),
                show_id: episode.show_id.clone(),
            })?;

        if collapse {
            if queues.is_empty() {
                queues.push(ShowQueue::new(show));
            }
            queues[0].push(episode);
            continue;
        }

        let index = *positions.entry(show.id.as_str()).or_insert_with(|| {
            queues.push(ShowQueue::new(show));
            queues.len() - 1
        });
        queues[index].push(episode);
    }

    Ok(queues)
}

/// Pick an index with probability proportional to its weight.
///
/// Equivalent to drawing one item uniformly from a multiset that holds
/// `weights[i]` copies of `i`. Returns `None` when every weight is zero.
pub fn weighted_index<R: Rng + ?Sized>(weights: &[usize], rng: &mut R) -> Option<usize> {
    let total: usize = weights.iter().sum();
    if total == 0 {
        return None;
    }

    let mut ticket = rng.random_range(0..total);
    for (index, weight) in weights.iter().enumerate() {
        if ticket < *weight {
            return Some(index);
        }
        ticket -= weight;
    }
    None
}
