use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BlackjackError {
    /// A card was requested from an empty shoe that does not reshuffle by itself.
    /// The caller skipped the cut card check before starting a round.
    #[error("No cards left in shoe ({dealt} dealt since last shuffle)")]
    ExhaustedShoe { dealt: usize },
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}
