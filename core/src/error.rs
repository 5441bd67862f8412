use thiserror::Error;

/// Errors reading or decoding the recipe dataset. Fatal for any
/// recommendation request: there is no corpus to recommend from.
#[derive(Debug, Error)]
pub enum CorpusLoadError {
    /// Dataset file missing or unreadable.
    #[error("corpus source unreadable: {0}")]
    Io(#[from] std::io::Error),

    /// Dataset present but not the expected shape.
    #[error("corpus is malformed: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Every recipe must carry at least one ingredient string.
    #[error("recipe {index} ({name:?}) has no ingredients")]
    NoIngredients { index: usize, name: String },
}

/// Errors fitting the vector space over the corpus. Structural, not
/// transient: a failed fit is not retried inside a request.
#[derive(Debug, Error)]
pub enum IndexBuildError {
    #[error("cannot fit a vector space over an empty corpus")]
    EmptyCorpus,

    #[error("vocabulary is empty after document-frequency filtering")]
    EmptyVocabulary,
}
