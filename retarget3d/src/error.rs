use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("joint not found: '{name}' under '{parent}'")]
    JointNotFound { name: String, parent: String },

    #[error("invalid joint mapping for {region}: {message}")]
    InvalidMapping { region: String, message: String },

    #[error("config requests manual joint mapping; bind with explicit resolvers instead")]
    ManualMappingRequired,

    #[cfg(feature = "json")]
    #[error("failed to parse retargeting config JSON: {message}")]
    JsonParse { message: String },
}
