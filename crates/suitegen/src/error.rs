use thiserror::Error;

#[derive(Debug, Error)]
pub enum SynthError {
    #[error("malformed schema at {context}: {msg}")]
    MalformedSchema { context: String, msg: String },

    #[error("non-serializable value for key '{key}' in case '{case}': {msg}")]
    NonSerializable { key: String, case: String, msg: String },
}
