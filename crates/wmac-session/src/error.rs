use thiserror::Error;

/// Top-level error type for the `wmac-session` crate.
///
/// These are local failures that happen *before* or *instead of* a remote
/// exchange. Anything the remote side reports comes back as a
/// [`SessionOutcome`](crate::SessionOutcome) instead.
#[derive(Debug, Error)]
pub enum Error {
    // ── Input validation ────────────────────────────────────────────
    /// A required connection field was empty.
    #[error("{field} cannot be empty")]
    MissingField { field: &'static str },

    // ── Process ─────────────────────────────────────────────────────
    /// The automation interpreter could not be launched.
    #[error("failed to launch {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The automation script could not be found or written out.
    #[error("automation script unavailable ({path}): {source}")]
    ScriptUnavailable {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Returns `true` if no process was ever started.
    pub fn is_input_error(&self) -> bool {
        matches!(self, Self::MissingField { .. })
    }
}
