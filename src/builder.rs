use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::config::CompileOptions;
use crate::error::PlaylistError;
use crate::filter::{apply_filters, format_filters};
use crate::interleave::{HaltReason, Interleaver};
use crate::ordering::order_episodes;
use crate::queue::group_by_show;
use crate::show_order::order_shows;
use crate::types::{Episode, ShowIndex};
use crate::{log_debug, log_info, log_warn};

/// Outcome of compiling one playlist.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompileSummary {
    /// Episode ids in play order.
    pub episode_ids: Vec<String>,
    pub pool_size: usize,
    pub filtered_size: usize,
    /// Number of show queues that entered the schedule.
    pub show_count: usize,
    /// Shows whose every candidate episode made it into the playlist, in the
    /// order they finished.
    pub exhausted_shows: Vec<String>,
    pub halt_reason: HaltReason,
}

/// Random source for a run: seeded when `seed` is set, OS-seeded otherwise.
pub fn rng_for(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

/// Compile a playlist using the randomness described by `options.seed`.
pub fn compile_playlist(
    episodes: &[Episode],
    shows: &ShowIndex,
    options: &CompileOptions,
) -> Result<CompileSummary, PlaylistError> {
    let mut rng = rng_for(options.seed);
    compile(episodes, shows, options, &mut rng)
}

/// Compile a playlist with an injected random source.
///
/// Stages: filter, global episode order, group per show, show priority,
/// interleave. Fails only if an episode names a show missing from `shows`;
/// that is checked before any stage runs.
pub fn compile<R: Rng + ?Sized>(
    episodes: &[Episode],
    shows: &ShowIndex,
    options: &CompileOptions,
    rng: &mut R,
) -> Result<CompileSummary, PlaylistError> {
    if let Some(orphan) = episodes.iter().find(|e| !shows.contains_key(&e.show_id)) {
        return Err(PlaylistError::UnknownShow {
            episode_id: orphan.id.clone(),
            show_id: orphan.show_id.clone(),
        });
    }

    let mut pool = apply_filters(&options.filters, &options.allowed_sources, episodes, shows);
    log_debug!(
        "[filter] {} of {} episodes kept (filters: {})",
        pool.len(),
        episodes.len(),
        format_filters(&options.filters)
    );
    if pool.is_empty() && !episodes.is_empty() {
        log_warn!(
            "[filter] every episode was removed (filters: {})",
            format_filters(&options.filters)
        );
    }

    order_episodes(options.episode_order, options.reverse_episodes, &mut pool, rng);

    let collapse = options.show_order.collapses_shows();
    if collapse {
        let distinct: HashSet<&str> = pool.iter().map(|e| e.show_id.as_str()).collect();
        if distinct.len() > 1 {
            log_debug!(
                "[group] show order 'none': {} shows played as a single stream",
                distinct.len()
            );
        }
    }
    let mut queues = group_by_show(&pool, shows, collapse)?;

    order_shows(options.show_order, options.reverse_shows, &mut queues, rng);
    log_debug!(
        "[order] shows: {}",
        queues
            .iter()
            .map(|q| q.show_id())
            .collect::<Vec<_>>()
            .join(", ")
    );

    let show_count = queues.len();
    let run = Interleaver::new(queues, options.change_show, options.rotate).run(options.limit, rng);

    log_info!(
        "Compiled {} episodes from {} shows ({:?})",
        run.episodes.len(),
        show_count,
        run.halt_reason
    );

    Ok(CompileSummary {
        episode_ids: run.episodes.iter().map(|e| e.id.clone()).collect(),
        pool_size: episodes.len(),
        filtered_size: pool.len(),
        show_count,
        exhausted_shows: run.exhausted_shows.iter().map(|s| s.to_string()).collect(),
        halt_reason: run.halt_reason,
    })
}

/// Just the episode ids of [`compile`].
pub fn sorted_episode_ids<R: Rng + ?Sized>(
    episodes: &[Episode],
    shows: &ShowIndex,
    options: &CompileOptions,
    rng: &mut R,
) -> Result<Vec<String>, PlaylistError> {
    compile(episodes, shows, options, rng).map(|summary| summary.episode_ids)
}
