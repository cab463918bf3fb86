#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("No eligible bean of the day: {0}")]
    NoEligibleWinner(String),

    #[error("Store failure: {0}")]
    Store(String),
}

/// Convenience alias for results carrying a [`CoreError`].
pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    pub fn bean_not_found(id: impl Into<String>) -> Self {
        CoreError::NotFound {
            entity: "Bean",
            id: id.into(),
        }
    }

    /// Conflict naming every offending id at once.
    pub fn duplicate_ids<S: AsRef<str>>(ids: &[S]) -> Self {
        let joined = ids
            .iter()
            .map(|id| id.as_ref())
            .collect::<Vec<_>>()
            .join(", ");
        CoreError::Conflict(format!("Duplicate bean id(s): {joined}"))
    }
}

impl From<validator::ValidationErrors> for CoreError {
    fn from(errors: validator::ValidationErrors) -> Self {
        CoreError::Validation(errors.to_string())
    }
}
