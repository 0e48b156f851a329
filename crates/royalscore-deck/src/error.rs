//! Error types for the deck provider boundary.

/// Errors from a deck provider.
///
/// All of these surface to the acting player as a recoverable error; the
/// room state is left unchanged and the action may be retried.
#[derive(Debug, thiserror::Error)]
pub enum DeckError {
    /// The service could not be reached or answered with a failure.
    #[error("deck service unavailable: {0}")]
    Unavailable(String),

    /// The call exceeded its time budget.
    #[error("deck service timed out")]
    Timeout,

    /// The handle does not refer to a live deck.
    #[error("unknown deck {0}")]
    UnknownDeck(String),

    /// The service answered with something we could not interpret.
    #[error("malformed deck service response: {0}")]
    Malformed(String),
}
