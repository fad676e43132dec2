use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::PlaylistError;
use crate::filter::{parse_episode_filter, validate_filters, EpisodeFilter};
use crate::ordering::{parse_episode_order, EpisodeOrder};
use crate::show_order::{parse_show_order, ShowOrder};
use crate::switch::{parse_change_show, parse_rotate, ChangeShow, Rotate};

pub const CONFIG_FILE_NAME: &str = "stream-playlist.toml";

/// Playlist length used when nothing else is configured.
pub const DEFAULT_LIMIT: i64 = 1000;

#[derive(Default, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct StreamPlaylistConfig {
    pub library: LibraryConfig,
    pub sort: SortConfig,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct LibraryConfig {
    /// Library snapshot, relative to the config file's directory.
    pub path: String,
    /// Playlist compiled when none is named on the command line.
    pub playlist: Option<String>,
}

/// Sort options as written by a user. Strategy names stay strings until
/// [`validate`] turns them into [`CompileOptions`].
#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct SortConfig {
    pub filters: Vec<String>,
    pub episode_order: String,
    pub show_order: String,
    pub change_show: String,
    pub rotate: String,
    /// Any of `shows`, `episodes`.
    pub reverse: Vec<String>,
    /// Websites to draw from; empty means all.
    pub websites: Vec<String>,
    #[serde(alias = "number_of_episodes")]
    pub limit: i64,
    pub seed: Option<u64>,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            path: "library.json".to_string(),
            playlist: None,
        }
    }
}

impl Default for SortConfig {
    fn default() -> Self {
        Self {
            filters: vec![],
            episode_order: EpisodeOrder::default().to_string(),
            show_order: ShowOrder::default().to_string(),
            change_show: ChangeShow::default().to_string(),
            rotate: Rotate::default().to_string(),
            reverse: vec![],
            websites: vec![],
            limit: DEFAULT_LIMIT,
            seed: None,
        }
    }
}

/// Command-line replacements for [`SortConfig`] values. `None` and empty
/// lists leave the configured value alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SortOverrides {
    pub filters: Vec<String>,
    pub episode_order: Option<String>,
    pub show_order: Option<String>,
    pub change_show: Option<String>,
    pub rotate: Option<String>,
    pub reverse: Vec<String>,
    pub websites: Vec<String>,
    pub limit: Option<i64>,
    pub seed: Option<u64>,
}

impl SortConfig {
    /// Replace configured values with the ones given in `overrides`.
    ///
    /// Nothing is checked here; run [`validate`] on the merged result.
    pub fn apply_overrides(&mut self, overrides: &SortOverrides) {
        if !overrides.filters.is_empty() {
            self.filters = overrides.filters.clone();
        }
        if let Some(value) = &overrides.episode_order {
            self.episode_order = value.clone();
        }
        if let Some(value) = &overrides.show_order {
            self.show_order = value.clone();
        }
        if let Some(value) = &overrides.change_show {
            self.change_show = value.clone();
        }
        if let Some(value) = &overrides.rotate {
            self.rotate = value.clone();
        }
        if !overrides.reverse.is_empty() {
            self.reverse = overrides.reverse.clone();
        }
        if !overrides.websites.is_empty() {
            self.websites = overrides.websites.clone();
        }
        if let Some(limit) = overrides.limit {
            self.limit = limit;
        }
        if overrides.seed.is_some() {
            self.seed = overrides.seed;
        }
    }
}

/// Validated, typed selection of one strategy per axis.
#[derive(Debug, Clone, PartialEq)]
pub struct CompileOptions {
    pub filters: Vec<EpisodeFilter>,
    pub episode_order: EpisodeOrder,
    pub show_order: ShowOrder,
    pub change_show: ChangeShow,
    pub rotate: Rotate,
    pub reverse_shows: bool,
    pub reverse_episodes: bool,
    pub allowed_sources: HashSet<String>,
    pub limit: usize,
    pub seed: Option<u64>,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            filters: vec![],
            episode_order: EpisodeOrder::default(),
            show_order: ShowOrder::default(),
            change_show: ChangeShow::default(),
            rotate: Rotate::default(),
            reverse_shows: false,
            reverse_episodes: false,
            allowed_sources: HashSet::new(),
            limit: DEFAULT_LIMIT as usize,
            seed: None,
        }
    }
}

/// Check every sort option and build [`CompileOptions`].
///
/// All problems are collected so a user can fix a config in one pass.
pub fn validate(sort: &SortConfig) -> Result<CompileOptions, PlaylistError> {
    let mut errors = Vec::new();

    let mut filters = Vec::with_capacity(sort.filters.len());
    for raw in &sort.filters {
        match parse_episode_filter(raw) {
            Ok(filter) => filters.push(filter),
            Err(e) => errors.push(format!("sort.filters: {}", e)),
        }
    }
    if let Err(e) = validate_filters(&filters) {
        errors.push(format!("sort.filters: {}", e));
    }

    let episode_order = parse_episode_order(&sort.episode_order)
        .map_err(|e| errors.push(format!("sort.episode_order: {}", e)))
        .ok();
    let show_order = parse_show_order(&sort.show_order)
        .map_err(|e| errors.push(format!("sort.show_order: {}", e)))
        .ok();
    let change_show = parse_change_show(&sort.change_show)
        .map_err(|e| errors.push(format!("sort.change_show: {}", e)))
        .ok();
    let rotate = parse_rotate(&sort.rotate)
        .map_err(|e| errors.push(format!("sort.rotate: {}", e)))
        .ok();

    let mut reverse_shows = false;
    let mut reverse_episodes = false;
    for raw in &sort.reverse {
        match raw.trim().to_lowercase().as_str() {
            "shows" => reverse_shows = true,
            "episodes" => reverse_episodes = true,
            _ => errors.push(format!(
                "sort.reverse: Invalid value '{}': expected shows or episodes",
                raw
            )),
        }
    }

    if sort.limit < 0 {
        errors.push(format!("sort.limit must be >= 0, got {}", sort.limit));
    }

    match (episode_order, show_order, change_show, rotate) {
        (Some(episode_order), Some(show_order), Some(change_show), Some(rotate))
            if errors.is_empty() =>
        {
            Ok(CompileOptions {
                filters,
                episode_order,
                show_order,
                change_show,
                rotate,
                reverse_shows,
                reverse_episodes,
                allowed_sources: sort
                    .websites
                    .iter()
                    .map(|w| w.trim().to_string())
                    .filter(|w| !w.is_empty())
                    .collect(),
                limit: usize::try_from(sort.limit).unwrap_or(0),
                seed: sort.seed,
            })
        }
        _ => Err(PlaylistError::InvalidConfig(errors)),
    }
}

pub fn load_config(project_root: &Path) -> Result<StreamPlaylistConfig, String> {
    load_config_from(None, project_root)
}

/// Load `config_path`, or `{project_root}/stream-playlist.toml` when `None`.
/// A missing default file yields the built-in defaults; a missing explicit
/// file is an error.
///
/// Only the file's syntax is checked. Sort values are validated after
/// command-line overrides are merged in.
pub fn load_config_from(
    config_path: Option<&Path>,
    project_root: &Path,
) -> Result<StreamPlaylistConfig, String> {
    let path = match config_path {
        Some(p) => {
            if !p.exists() {
                return Err(format!("Config file not found: {}", p.display()));
            }
            p.to_path_buf()
        }
        None => {
            let default_path = project_root.join(CONFIG_FILE_NAME);
            if !default_path.exists() {
                return Ok(StreamPlaylistConfig::default());
            }
            default_path
        }
    };

    let contents = std::fs::read_to_string(&path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;

    toml::from_str(&contents).map_err(|e| format!("Failed to parse {}: {}", path.display(), e))
}

/// Library snapshot path: the explicit override as given, else
/// `[library].path` relative to `config_base`.
pub fn resolve_library_path(
    config_base: &Path,
    library: &LibraryConfig,
    override_path: Option<&Path>,
) -> PathBuf {
    match override_path {
        Some(p) => p.to_path_buf(),
        None => config_base.join(&library.path),
    }
}

/// Commented config file written by `stream-playlist init`.
pub fn default_config_toml() -> String {
    format!(
        r#"[library]
path = "library.json"
# playlist = "Weeknights"

[sort]
# only_new_episodes, only_started_shows, only_new_shows
filters = []
# random, chronological, newest_first
episode_order = "{episode_order}"
# none, shuffle, weighted_shuffle, least_recently_watched,
# newest_episodes_first, finish_up_duration, finish_up_episodes
show_order = "{show_order}"
# after_every_episode, when_show_is_complete
change_show = "{change_show}"
# rotate, shuffle, weighted_shuffle
rotate = "{rotate}"
# shows, episodes
reverse = []
# Empty means every website.
websites = []
limit = {limit}
# seed = 42
"#,
        episode_order = EpisodeOrder::default(),
        show_order = ShowOrder::default(),
        change_show = ChangeShow::default(),
        rotate = Rotate::default(),
        limit = DEFAULT_LIMIT,
    )
}
