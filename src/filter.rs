use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::types::{strategy_label, Episode, ShowIndex};

/// Predicates that narrow the episode pool. Selected filters combine with AND.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EpisodeFilter {
    /// Keep episodes that have never been watched.
    OnlyNewEpisodes,
    /// Keep episodes of shows with at least one watched episode.
    OnlyStartedShows,
    /// Keep episodes of shows with no watched episodes at all.
    OnlyNewShows,
}

impl EpisodeFilter {
    pub const ALL: [EpisodeFilter; 3] = [
        EpisodeFilter::OnlyNewEpisodes,
        EpisodeFilter::OnlyStartedShows,
        EpisodeFilter::OnlyNewShows,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            EpisodeFilter::OnlyNewEpisodes => "only_new_episodes",
            EpisodeFilter::OnlyStartedShows => "only_started_shows",
            EpisodeFilter::OnlyNewShows => "only_new_shows",
        }
    }

    pub fn label(&self) -> String {
        strategy_label(self.name())
    }

    /// Whether `episode` survives this filter.
    pub fn keep(&self, episode: &Episode, context: &FilterContext) -> bool {
        match self {
            EpisodeFilter::OnlyNewEpisodes => !episode.is_watched(),
            EpisodeFilter::OnlyStartedShows => context.is_started(&episode.show_id),
            EpisodeFilter::OnlyNewShows => !context.is_started(&episode.show_id),
        }
    }
}

impl std::fmt::Display for EpisodeFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

pub fn parse_episode_filter(s: &str) -> Result<EpisodeFilter, String> {
    let normalized = s.trim().to_lowercase().replace('-', "_");
    EpisodeFilter::ALL
        .into_iter()
        .find(|f| f.name() == normalized)
        .ok_or_else(|| {
            format!(
                "Unknown filter '{}'. Valid values: only_new_episodes, only_started_shows, only_new_shows",
                s
            )
        })
}

/// Show-level facts that filters need but a single episode cannot answer.
///
/// Built once from the unfiltered pool, so the result of each filter does not
/// depend on which filters ran before it.
#[derive(Debug, Clone, Default)]
pub struct FilterContext {
    started_shows: HashSet<String>,
}

impl FilterContext {
    /// A show is started if any of its episodes in `pool` has been watched, or
    /// its statistics record a watch outside the pool.
    pub fn new(pool: &[Episode], shows: &ShowIndex) -> Self {
        let mut started_shows: HashSet<String> = shows
            .values()
            .filter(|show| show.has_watch_history())
            .map(|show| show.id.clone())
            .collect();
        started_shows.extend(
            pool.iter()
                .filter(|e| e.is_watched())
                .map(|e| e.show_id.clone()),
        );
        Self { started_shows }
    }

    pub fn is_started(&self, show_id: &str) -> bool {
        self.started_shows.contains(show_id)
    }
}

/// Rejects a filter list that names the same filter twice.
pub fn validate_filters(filters: &[EpisodeFilter]) -> Result<(), String> {
    let mut seen = HashSet::new();
    for filter in filters {
        if !seen.insert(filter) {
            return Err(format!("Duplicate filter: {} specified multiple times", filter));
        }
    }
    Ok(())
}

/// Narrow `pool` with every filter in turn, then by website when
/// `allowed_sources` is non-empty. Relative order is preserved.
pub fn apply_filters<'a>(
    filters: &[EpisodeFilter],
    allowed_sources: &HashSet<String>,
    pool: &'a [Episode],
    shows: &ShowIndex,
) -> Vec<&'a Episode> {
    let context = FilterContext::new(pool, shows);
    let mut remaining: Vec<&Episode> = pool.iter().collect();

    for filter in filters {
        remaining.retain(|episode| filter.keep(episode, &context));
    }

    if !allowed_sources.is_empty() {
        remaining.retain(|episode| {
            shows
                .get(&episode.show_id)
                .is_some_and(|show| allowed_sources.contains(&show.website))
        });
    }

    remaining
}

pub fn format_filters(filters: &[EpisodeFilter]) -> String {
    if filters.is_empty() {
        return "none".to_string();
    }
    filters
        .iter()
        .map(|f| f.to_string())
        .collect::<Vec<_>>()
        .join(" AND ")
}
