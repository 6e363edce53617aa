/// Result of loading one independently fetched screen section.
///
/// Sections fail separately: a dashboard can show its enrollments while the
/// recommendations panel reports an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome<T> {
    Loaded(T),
    Empty,
    Failed(String),
}

impl<T> FetchOutcome<T> {
    /// Wraps a fetch result; `Ok` values are kept as loaded.
    pub fn from_result<E: std::fmt::Display>(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => FetchOutcome::Loaded(value),
            Err(err) => FetchOutcome::Failed(err.to_string()),
        }
    }

    #[must_use]
    pub fn as_loaded(&self) -> Option<&T> {
        match self {
            FetchOutcome::Loaded(value) => Some(value),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self, FetchOutcome::Failed(_))
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> FetchOutcome<U> {
        match self {
            FetchOutcome::Loaded(value) => FetchOutcome::Loaded(f(value)),
            FetchOutcome::Empty => FetchOutcome::Empty,
            FetchOutcome::Failed(message) => FetchOutcome::Failed(message),
        }
    }
}

impl<T> FetchOutcome<Vec<T>> {
    /// Like [`FetchOutcome::from_result`], but an empty list becomes `Empty`.
    pub fn from_list<E: std::fmt::Display>(result: Result<Vec<T>, E>) -> Self {
        match result {
            Ok(items) if items.is_empty() => FetchOutcome::Empty,
            other => FetchOutcome::from_result(other),
        }
    }
}
