/// Errors the playlist compiler reports before any scheduling happens.
///
/// An empty result is not an error: a pool that filters down to nothing, or a
/// limit of zero, compiles to an empty playlist.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PlaylistError {
    /// One or more sort options were rejected. Every problem is listed.
    #[error("Invalid playlist options:\n{}", format_messages(.0))]
    InvalidConfig(Vec<String>),

    /// An episode points at a show that is missing from the show lookup.
    #[error("Episode '{episode_id}' belongs to unknown show '{show_id}'")]
    UnknownShow { episode_id: String, show_id: String },
}

impl PlaylistError {
    /// Returns true if the error came from option validation rather than input data.
    pub fn is_config_error(&self) -> bool {
        matches!(self, PlaylistError::InvalidConfig(_))
    }
}

fn format_messages(messages: &[String]) -> String {
    messages
        .iter()
        .map(|m| format!("  - {}", m))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Lets loader and CLI code that works in `Result<T, String>` use `?` on compiler calls.
impl From<PlaylistError> for String {
    fn from(err: PlaylistError) -> String {
        err.to_string()
    }
}
