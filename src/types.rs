use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Timestamp used for "never happened": never watched, no episodes released.
/// Sorts before every real date.
pub const NEVER: DateTime<Utc> = DateTime::<Utc>::UNIX_EPOCH;

// --- Structs ---

/// One candidate episode. The compiler only ever reads these.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Episode {
    pub id: String,
    pub show_id: String,
    /// Position of the episode's season within the show.
    #[serde(default)]
    pub season_sort_order: u32,
    /// Position of the episode within its season.
    #[serde(default)]
    pub sort_order: u32,
    pub release_date: DateTime<Utc>,
    /// Seconds.
    #[serde(default)]
    pub duration: u32,
    #[serde(default)]
    pub watch_count: u32,
}

impl Episode {
    pub fn is_watched(&self) -> bool {
        self.watch_count > 0
    }

    /// Season-major, episode-minor key used by chronological ordering.
    pub fn chronological_key(&self) -> (u32, u32) {
        (self.season_sort_order, self.sort_order)
    }
}

/// A show together with the statistics the scheduler needs from its history.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Show {
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Website the show is streamed from; the allow-list matches against this.
    pub website: String,
    /// Latest watch across all of the show's episodes, or [`NEVER`].
    #[serde(default = "never")]
    pub last_watched_date: DateTime<Utc>,
    /// Latest release across all of the show's episodes, or [`NEVER`].
    #[serde(default = "never")]
    pub newest_episode_date: DateTime<Utc>,
}

fn never() -> DateTime<Utc> {
    NEVER
}

impl Show {
    pub fn new(id: &str, website: &str) -> Self {
        Self {
            id: id.to_string(),
            name: id.to_string(),
            website: website.to_string(),
            last_watched_date: NEVER,
            newest_episode_date: NEVER,
        }
    }

    pub fn has_watch_history(&self) -> bool {
        self.last_watched_date > NEVER
    }
}

/// Show lookup keyed by show id.
pub type ShowIndex = HashMap<String, Show>;

pub fn index_shows(shows: impl IntoIterator<Item = Show>) -> ShowIndex {
    shows.into_iter().map(|s| (s.id.clone(), s)).collect()
}

/// Human label for a strategy name: `only_new_episodes` -> `Only New Episodes`.
pub fn strategy_label(name: &str) -> String {
    name.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
