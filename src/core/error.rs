use thiserror::Error;

#[derive(Error, Debug)]
pub enum MirrorError {
    #[error("Remote store error: {0}")]
    Remote(String),

    #[error("Record for table '{0}' is missing identity field '{1}'")]
    MissingIdentity(String, String),

    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    #[error("Mirror for table '{0}' has no active subscription")]
    NotSubscribed(String),

    #[error("Mirror for table '{0}' is closed")]
    Closed(String),
}

pub type Result<T> = std::result::Result<T, MirrorError>;
