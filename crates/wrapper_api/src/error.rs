use thiserror::Error;

#[derive(Debug, Error)]
pub enum WrapperError {
    #[error("wrapper id already registered: {id}")]
    DuplicateWrapper { id: String },
    #[error("no wrapper registered under id: {id}")]
    UnknownWrapper { id: String },
    #[error("invalid settings for wrapper {id}: {message}")]
    InvalidSettings { id: String, message: String },
    #[error("failed to decorate build log writer: {source}")]
    Decorate {
        #[source]
        source: std::io::Error,
    },
}
