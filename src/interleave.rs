use std::collections::VecDeque;

use rand::Rng;
use serde::Serialize;

use crate::queue::ShowQueue;
use crate::switch::{ChangeShow, Rotate};
use crate::log_debug;
use crate::types::Episode;

/// Why the engine stopped emitting.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HaltReason {
    /// The filtered pool was empty; nothing was scheduled.
    NothingToSchedule,
    /// The configured limit was reached with episodes still queued.
    LimitReached,
    /// Every show queue ran dry.
    PoolExhausted,
}

/// Result of one interleaving run.
#[derive(Debug)]
pub struct Interleaved<'a> {
    pub episodes: Vec<&'a Episode>,
    /// Shows in the order their queues ran out.
    pub exhausted_shows: Vec<&'a str>,
    pub halt_reason: HaltReason,
}

/// The live schedule: show queues in the order they will be served.
pub struct Interleaver<'a> {
    active: VecDeque<ShowQueue<'a>>,
    change_show: ChangeShow,
    rotate: Rotate,
}

impl<'a> Interleaver<'a> {
    /// Empty queues are dropped up front so every active queue has a head.
    pub fn new(queues: Vec<ShowQueue<'a>>, change_show: ChangeShow, rotate: Rotate) -> Self {
        Self {
            active: queues.into_iter().filter(|q| !q.is_empty()).collect(),
            change_show,
            rotate,
        }
    }

    pub fn active_shows(&self) -> Vec<&'a str> {
        self.active.iter().map(|q| q.show_id()).collect()
    }

    pub fn remaining(&self) -> usize {
        self.active.iter().map(|q| q.len()).sum()
    }

    /// Emit up to `limit` episodes.
    ///
    /// Each step plays the head show's next episode. An emptied show leaves the
    /// schedule for good; otherwise the change-show rule decides whether the
    /// rotate strategy reorders the active shows.
    pub fn run<R: Rng + ?Sized>(mut self, limit: usize, rng: &mut R) -> Interleaved<'a> {
        let target = limit.min(self.remaining());
        let mut episodes = Vec::with_capacity(target);
        let mut exhausted_shows = Vec::new();

        if self.active.is_empty() {
            return Interleaved {
                episodes,
                exhausted_shows,
                halt_reason: HaltReason::NothingToSchedule,
            };
        }

        while episodes.len() < target {
            let Some(head) = self.active.front_mut() else {
                break;
            };
            let Some(episode) = head.pop_front() else {
                // Unreachable: exhausted queues are removed below.
                self.active.pop_front();
                continue;
            };
            episodes.push(episode);

            if head.is_empty() {
                let show_id = head.show_id();
                log_debug!("[interleave] {} exhausted at position {}", show_id, episodes.len());
                exhausted_shows.push(show_id);
                self.active.pop_front();
            } else if self.change_show.should_change(&self.active) {
                self.rotate.apply(&mut self.active, rng);
            }
        }

        let halt_reason = if self.active.is_empty() {
            HaltReason::PoolExhausted
        } else {
            HaltReason::LimitReached
        };

        Interleaved {
            episodes,
            exhausted_shows,
            halt_reason,
        }
    }
}
