#![allow(dead_code)]

use std::collections::HashSet;

use chrono::{DateTime, TimeZone, Utc};

use stream_playlist::config::CompileOptions;
use stream_playlist::show_order::ShowOrder;
use stream_playlist::switch::{ChangeShow, Rotate};
use stream_playlist::types::{index_shows, Episode, Show, ShowIndex};

/// Midnight UTC on 2024-01-`day`.
pub fn day(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap()
}

/// Creates a `Show` on website `"crunchyroll"` with no watch history.
pub fn make_show(id: &str) -> Show {
    Show::new(id, "crunchyroll")
}

/// Creates an unwatched `Episode` in season 1.
///
/// Episode `n` is released on day `n` and lasts 20 minutes.
pub fn make_episode(id: &str, show_id: &str, n: u32) -> Episode {
    Episode {
        id: id.to_string(),
        show_id: show_id.to_string(),
        season_sort_order: 1,
        sort_order: n,
        release_date: day(n),
        duration: 1200,
        watch_count: 0,
    }
}

pub fn watched(mut episode: Episode, times: u32) -> Episode {
    episode.watch_count = times;
    episode
}

/// `count` episodes of `show_id`, named `{show_id}{n}` starting at 1.
pub fn episodes_for(show_id: &str, count: u32) -> Vec<Episode> {
    (1..=count)
        .map(|n| make_episode(&format!("{}{}", show_id, n), show_id, n))
        .collect()
}

/// Show A = [a1, a2, a3], Show B = [b1, b2]; A's episodes come first in the pool.
pub fn two_show_pool() -> (Vec<Episode>, ShowIndex) {
    let mut episodes = episodes_for("a", 3);
    episodes.extend(episodes_for("b", 2));
    let shows = index_shows([make_show("a"), make_show("b")]);
    (episodes, shows)
}

/// Options with no randomness: chronological episodes and
/// `least_recently_watched`, which keeps first-seen show order when no show
/// has been watched (stable sort on equal keys).
pub fn deterministic_options(change_show: ChangeShow, limit: usize) -> CompileOptions {
    CompileOptions {
        show_order: ShowOrder::LeastRecentlyWatched,
        change_show,
        rotate: Rotate::Rotate,
        limit,
        ..CompileOptions::default()
    }
}

pub fn ids(episodes: &[&Episode]) -> Vec<String> {
    episodes.iter().map(|e| e.id.clone()).collect()
}

/// Every id appears once and comes from `pool`.
pub fn assert_valid_playlist(output: &[String], pool: &[Episode]) {
    let pool_ids: HashSet<&str> = pool.iter().map(|e| e.id.as_str()).collect();
    let mut seen = HashSet::new();
    for id in output {
        assert!(pool_ids.contains(id.as_str()), "{} is not in the pool", id);
        assert!(seen.insert(id.as_str()), "{} emitted twice", id);
    }
}
