use thiserror::Error;

pub type Result<T, E = GameError> = std::result::Result<T, E>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    /// The card catalog could not be used. Nothing can be played without it.
    #[error("malformed card catalog: {0}")]
    MalformedCatalog(String),
    /// A transition was requested before its precondition held. Nothing changed.
    #[error("round not ready: {selected} of {pick} responses selected")]
    NotReady { selected: usize, pick: usize },
    #[error("needed {needed} cards but only {available} are left in the pool")]
    PoolExhausted { needed: usize, available: usize },
    #[error("failed to write {key}: {reason}")]
    StoreWriteFailed { key: String, reason: String },
    #[error("failed to read {key}: {reason}")]
    StoreReadFailed { key: String, reason: String },
    #[error("saved play store is not running")]
    StoreClosed,
}

impl GameError {
    pub(crate) fn write_failed(key: &str, error: anyhow::Error) -> Self {
        GameError::StoreWriteFailed {
            key: key.to_owned(),
            reason: format!("{:#}", error),
        }
    }

    pub(crate) fn read_failed(key: &str, error: anyhow::Error) -> Self {
        GameError::StoreReadFailed {
            key: key.to_owned(),
            reason: format!("{:#}", error),
        }
    }
}
