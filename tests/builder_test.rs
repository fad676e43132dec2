mod common;

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::SeedableRng;

use stream_playlist::builder::{compile, compile_playlist, rng_for, sorted_episode_ids};
use stream_playlist::config::CompileOptions;
use stream_playlist::error::PlaylistError;
use stream_playlist::filter::EpisodeFilter;
use stream_playlist::interleave::HaltReason;
use stream_playlist::ordering::EpisodeOrder;
use stream_playlist::show_order::ShowOrder;
use stream_playlist::switch::{ChangeShow, Rotate};
use stream_playlist::types::{index_shows, Show};

use common::{
    assert_valid_playlist, deterministic_options, episodes_for, make_episode, make_show,
    two_show_pool, watched,
};

fn run(options: &CompileOptions) -> Vec<String> {
    let (episodes, shows) = two_show_pool();
    let mut rng = StdRng::seed_from_u64(0);
    sorted_episode_ids(&episodes, &shows, options, &mut rng).unwrap()
}

// --- Reference scenarios ---

#[test]
fn round_robin_alternates_shows() {
    let options = deterministic_options(ChangeShow::AfterEveryEpisode, 5);
    assert_eq!(run(&options), vec!["a1", "b1", "a2", "b2", "a3"]);
}

#[test]
fn when_show_is_complete_concatenates() {
    let options = deterministic_options(ChangeShow::WhenShowIsComplete, 5);
    assert_eq!(run(&options), vec!["a1", "a2", "a3", "b1", "b2"]);
}

#[test]
fn limit_truncates_round_robin() {
    let options = deterministic_options(ChangeShow::AfterEveryEpisode, 3);
    assert_eq!(run(&options), vec!["a1", "b1", "a2"]);
}

#[test]
fn limit_above_pool_size_returns_whole_pool() {
    let options = deterministic_options(ChangeShow::AfterEveryEpisode, 1000);
    assert_eq!(run(&options).len(), 5);
}

#[test]
fn zero_limit_is_empty_not_an_error() {
    let options = deterministic_options(ChangeShow::AfterEveryEpisode, 0);
    assert!(run(&options).is_empty());
}

#[test]
fn reverse_shows_puts_b_first() {
    let options = CompileOptions {
        reverse_shows: true,
        ..deterministic_options(ChangeShow::AfterEveryEpisode, 5)
    };
    assert_eq!(run(&options), vec!["b1", "a1", "b2", "a2", "a3"]);
}

#[test]
fn reverse_episodes_plays_each_show_backwards() {
    // Reversed chronological pool is a3, b2, a2, b1, a1; a is still seen first.
    let options = CompileOptions {
        reverse_episodes: true,
        ..deterministic_options(ChangeShow::WhenShowIsComplete, 5)
    };
    assert_eq!(run(&options), vec!["a3", "a2", "a1", "b2", "b1"]);
}

#[test]
fn newest_first_orders_within_show_by_release() {
    let options = CompileOptions {
        episode_order: EpisodeOrder::NewestFirst,
        ..deterministic_options(ChangeShow::WhenShowIsComplete, 5)
    };
    // a3 (day 3) is the newest episode overall, so a is seen first.
    assert_eq!(run(&options), vec!["a3", "a2", "a1", "b2", "b1"]);
}

#[test]
fn show_order_none_follows_global_episode_order() {
    let options = CompileOptions {
        show_order: ShowOrder::None,
        ..deterministic_options(ChangeShow::AfterEveryEpisode, 5)
    };
    // Chronological: a1 and b1 share (season 1, ep 1); the stable sort keeps pool order.
    assert_eq!(run(&options), vec!["a1", "b1", "a2", "b2", "a3"]);

    let options = CompileOptions {
        show_order: ShowOrder::None,
        episode_order: EpisodeOrder::NewestFirst,
        ..deterministic_options(ChangeShow::AfterEveryEpisode, 5)
    };
    assert_eq!(run(&options), vec!["a3", "a2", "b2", "a1", "b1"]);
}

#[test]
fn finish_up_episodes_starts_with_smaller_show() {
    let options = CompileOptions {
        show_order: ShowOrder::FinishUpEpisodes,
        ..deterministic_options(ChangeShow::WhenShowIsComplete, 5)
    };
    assert_eq!(run(&options), vec!["b1", "b2", "a1", "a2", "a3"]);
}

// --- Filters through the pipeline ---

#[test]
fn only_new_episodes_output_is_all_unwatched() {
    let mut episodes = episodes_for("a", 3);
    episodes[0] = watched(episodes[0].clone(), 1);
    episodes.extend(episodes_for("b", 2));
    let shows = index_shows([make_show("a"), make_show("b")]);
    let options = CompileOptions {
        filters: vec![EpisodeFilter::OnlyNewEpisodes],
        ..deterministic_options(ChangeShow::AfterEveryEpisode, 100)
    };

    let mut rng = StdRng::seed_from_u64(3);
    let summary = compile(&episodes, &shows, &options, &mut rng).unwrap();

    // With a1 gone, b1 is the earliest episode, so b is served first.
    assert_eq!(summary.episode_ids, vec!["b1", "a2", "b2", "a3"]);
    assert_eq!(summary.filtered_size, 4);
    assert_eq!(summary.pool_size, 5);
}

#[test]
fn started_and_new_shows_together_yield_empty_playlist() {
    let mut episodes = episodes_for("a", 3);
    episodes[1] = watched(episodes[1].clone(), 2);
    episodes.extend(episodes_for("b", 2));
    let shows = index_shows([make_show("a"), make_show("b")]);
    let options = CompileOptions {
        filters: vec![EpisodeFilter::OnlyStartedShows, EpisodeFilter::OnlyNewShows],
        ..CompileOptions::default()
    };

    let mut rng = StdRng::seed_from_u64(3);
    let summary = compile(&episodes, &shows, &options, &mut rng).unwrap();

    assert!(summary.episode_ids.is_empty());
    assert_eq!(summary.halt_reason, HaltReason::NothingToSchedule);
}

#[test]
fn website_allow_list_drops_other_sources() {
    let mut episodes = episodes_for("a", 2);
    episodes.extend(episodes_for("n", 2));
    let shows = index_shows([make_show("a"), Show::new("n", "netflix")]);
    let options = CompileOptions {
        allowed_sources: HashSet::from(["netflix".to_string()]),
        ..deterministic_options(ChangeShow::AfterEveryEpisode, 10)
    };

    let mut rng = StdRng::seed_from_u64(3);
    let ids = sorted_episode_ids(&episodes, &shows, &options, &mut rng).unwrap();
    assert_eq!(ids, vec!["n1", "n2"]);
}

// --- Summary and errors ---

#[test]
fn summary_reports_exhaustion_and_halt_reason() {
    let (episodes, shows) = two_show_pool();
    let options = deterministic_options(ChangeShow::AfterEveryEpisode, 5);
    let mut rng = StdRng::seed_from_u64(0);

    let summary = compile(&episodes, &shows, &options, &mut rng).unwrap();

    assert_eq!(summary.show_count, 2);
    assert_eq!(summary.exhausted_shows, vec!["b", "a"]);
    assert_eq!(summary.halt_reason, HaltReason::PoolExhausted);

    let options = deterministic_options(ChangeShow::AfterEveryEpisode, 2);
    let summary = compile(&episodes, &shows, &options, &mut rng).unwrap();
    assert_eq!(summary.halt_reason, HaltReason::LimitReached);
    assert!(summary.exhausted_shows.is_empty());
}

#[test]
fn empty_pool_compiles_to_empty_playlist() {
    let shows = index_shows([make_show("a")]);
    let summary = compile_playlist(&[], &shows, &CompileOptions::default()).unwrap();
    assert!(summary.episode_ids.is_empty());
    assert_eq!(summary.halt_reason, HaltReason::NothingToSchedule);
}

#[test]
fn episode_with_unknown_show_is_rejected_before_scheduling() {
    let episodes = vec![make_episode("x1", "ghost", 1)];
    let shows = index_shows([make_show("a")]);

    let err = compile_playlist(&episodes, &shows, &CompileOptions::default()).unwrap_err();

    assert_eq!(
        err,
        PlaylistError::UnknownShow {
            episode_id: "x1".to_string(),
            show_id: "ghost".to_string(),
        }
    );
    assert!(!err.is_config_error());
}

// --- Randomized strategies ---

fn big_pool() -> (Vec<stream_playlist::types::Episode>, stream_playlist::types::ShowIndex) {
    let mut episodes = Vec::new();
    let mut shows = Vec::new();
    for (show, count) in [("a", 6), ("b", 3), ("c", 5), ("d", 1), ("e", 4)] {
        episodes.extend(episodes_for(show, count));
        shows.push(make_show(show));
    }
    (episodes, index_shows(shows))
}

#[test]
fn same_seed_reproduces_same_playlist() {
    let (episodes, shows) = big_pool();
    let options = CompileOptions {
        episode_order: EpisodeOrder::Random,
        show_order: ShowOrder::WeightedShuffle,
        rotate: Rotate::WeightedShuffle,
        seed: Some(1234),
        ..CompileOptions::default()
    };

    let first = compile_playlist(&episodes, &shows, &options).unwrap();
    let second = compile_playlist(&episodes, &shows, &options).unwrap();

    assert_eq!(first, second);
    assert_eq!(first.episode_ids.len(), episodes.len());
}

#[test]
fn every_strategy_combination_is_bounded_and_duplicate_free() {
    let (episodes, shows) = big_pool();

    for episode_order in EpisodeOrder::ALL {
        for show_order in ShowOrder::ALL {
            for change_show in ChangeShow::ALL {
                for rotate in Rotate::ALL {
                    for limit in [0, 1, 7, 19, 100] {
                        let options = CompileOptions {
                            episode_order,
                            show_order,
                            change_show,
                            rotate,
                            limit,
                            ..CompileOptions::default()
                        };
                        let mut rng = rng_for(Some(limit as u64 + 17));
                        let ids = sorted_episode_ids(&episodes, &shows, &options, &mut rng)
                            .unwrap();

                        assert_eq!(ids.len(), limit.min(episodes.len()), "{:?}", options);
                        assert_valid_playlist(&ids, &episodes);
                    }
                }
            }
        }
    }
}

#[test]
fn each_show_keeps_its_episode_order_under_random_rotation() {
    let (episodes, shows) = big_pool();
    let options = CompileOptions {
        show_order: ShowOrder::Shuffle,
        rotate: Rotate::Shuffle,
        ..CompileOptions::default()
    };

    for seed in 0..20 {
        let mut rng = StdRng::seed_from_u64(seed);
        let ids = sorted_episode_ids(&episodes, &shows, &options, &mut rng).unwrap();
        for show in ["a", "b", "c", "d", "e"] {
            let played: Vec<&String> = ids.iter().filter(|id| id.starts_with(show)).collect();
            let mut sorted = played.clone();
            sorted.sort_by_key(|id| id[1..].parse::<u32>().unwrap());
            assert_eq!(played, sorted, "seed {}", seed);
        }
    }
}
