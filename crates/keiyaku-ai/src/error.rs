/// Failure modes of a hybrid analysis run.
///
/// The rule-based side never fails for any input; every variant here traces
/// back to the model-based collaborator or to its configuration. Callers can
/// rely on the three categories staying distinct: configuration problems are
/// actionable by the operator, unavailability is retryable, and an invalid
/// response means the collaborator broke its output contract.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    /// The analyzer client is missing credentials or settings.
    #[error("analyzer configuration incomplete: {0}")]
    Configuration(String),

    /// The collaborator could not be reached, timed out, or answered with a
    /// non-success status.
    #[error("analyzer unavailable: {0}")]
    CollaboratorUnavailable(String),

    /// The collaborator answered, but the payload did not match the
    /// agreed structure.
    #[error("analyzer response invalid: {0}")]
    CollaboratorResponseInvalid(String),
}
