//! Library snapshot: the JSON export of shows, episodes, watch history and
//! playlist membership that the compiler's inputs are derived from.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Episode, Show, ShowIndex, NEVER};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct LibrarySnapshot {
    #[serde(default)]
    pub shows: Vec<ShowRecord>,
    #[serde(default)]
    pub episodes: Vec<EpisodeRecord>,
    #[serde(default)]
    pub playlists: Vec<PlaylistRecord>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ShowRecord {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub website: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct EpisodeRecord {
    pub id: String,
    pub show_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub season_sort_order: u32,
    #[serde(default)]
    pub sort_order: u32,
    pub release_date: DateTime<Utc>,
    /// Seconds.
    #[serde(default)]
    pub duration: u32,
    /// One entry per time the episode was watched.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub watches: Vec<DateTime<Utc>>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PlaylistRecord {
    pub name: String,
    #[serde(default)]
    pub shows: Vec<String>,
}

impl EpisodeRecord {
    pub fn to_episode(&self) -> Episode {
        Episode {
            id: self.id.clone(),
            show_id: self.show_id.clone(),
            season_sort_order: self.season_sort_order,
            sort_order: self.sort_order,
            release_date: self.release_date,
            duration: self.duration,
            watch_count: u32::try_from(self.watches.len()).unwrap_or(u32::MAX),
        }
    }

    pub fn last_watched(&self) -> Option<DateTime<Utc>> {
        self.watches.iter().max().copied()
    }
}

impl LibrarySnapshot {
    /// Read and check a snapshot file.
    pub fn load(path: &Path) -> Result<Self, String> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
        let snapshot: LibrarySnapshot = serde_json::from_str(&contents)
            .map_err(|e| format!("Failed to parse {}: {}", path.display(), e))?;
        snapshot
            .validate()
            .map_err(|errors| {
                format!(
                    "Library validation failed for {}:\n{}",
                    path.display(),
                    errors
                        .iter()
                        .map(|e| format!("  - {}", e))
                        .collect::<Vec<_>>()
                        .join("\n")
                )
            })?;
        Ok(snapshot)
    }

    /// Duplicate ids and references to unknown shows.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        let mut show_ids = HashSet::new();
        for show in &self.shows {
            if !show_ids.insert(show.id.as_str()) {
                errors.push(format!("duplicate show id '{}'", show.id));
            }
        }

        let mut episode_ids = HashSet::new();
        for episode in &self.episodes {
            if !episode_ids.insert(episode.id.as_str()) {
                errors.push(format!("duplicate episode id '{}'", episode.id));
            }
            if !show_ids.contains(episode.show_id.as_str()) {
                errors.push(format!(
                    "episode '{}' references unknown show '{}'",
                    episode.id, episode.show_id
                ));
            }
        }

        let mut playlist_names = HashSet::new();
        for playlist in &self.playlists {
            if !playlist_names.insert(playlist.name.as_str()) {
                errors.push(format!("duplicate playlist '{}'", playlist.name));
            }
            for show_id in &playlist.shows {
                if !show_ids.contains(show_id.as_str()) {
                    errors.push(format!(
                        "playlist '{}' references unknown show '{}'",
                        playlist.name, show_id
                    ));
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Shows with their statistics derived from the episode records.
    pub fn show_index(&self) -> ShowIndex {
        let mut last_watched: HashMap<&str, DateTime<Utc>> = HashMap::new();
        let mut newest_release: HashMap<&str, DateTime<Utc>> = HashMap::new();

        for episode in &self.episodes {
            let show_id = episode.show_id.as_str();
            if let Some(watched) = episode.last_watched() {
                let entry = last_watched.entry(show_id).or_insert(watched);
                *entry = (*entry).max(watched);
            }
            let entry = newest_release.entry(show_id).or_insert(episode.release_date);
            *entry = (*entry).max(episode.release_date);
        }

        self.shows
            .iter()
            .map(|record| {
                let show = Show {
                    id: record.id.clone(),
                    name: record.name.clone(),
                    website: record.website.clone(),
                    last_watched_date: last_watched
                        .get(record.id.as_str())
                        .copied()
                        .unwrap_or(NEVER),
                    newest_episode_date: newest_release
                        .get(record.id.as_str())
                        .copied()
                        .unwrap_or(NEVER),
                };
                (record.id.clone(), show)
            })
            .collect()
    }

    pub fn episodes(&self) -> Vec<Episode> {
        self.episodes.iter().map(EpisodeRecord::to_episode).collect()
    }

    /// Episodes of every show in the named playlist, in snapshot order.
    pub fn playlist_episodes(&self, name: &str) -> Result<Vec<Episode>, String> {
        let playlist = self
            .playlists
            .iter()
            .find(|p| p.name == name)
            .ok_or_else(|| {
                let known: Vec<&str> = self.playlists.iter().map(|p| p.name.as_str()).collect();
                if known.is_empty() {
                    format!("Playlist '{}' not found: the library has no playlists", name)
                } else {
                    format!("Playlist '{}' not found. Known playlists: {}", name, known.join(", "))
                }
            })?;

        let members: HashSet<&str> = playlist.shows.iter().map(String::as_str).collect();
        Ok(self
            .episodes
            .iter()
            .filter(|e| members.contains(e.show_id.as_str()))
            .map(EpisodeRecord::to_episode)
            .collect())
    }
}
