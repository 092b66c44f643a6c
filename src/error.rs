use thiserror::Error;

/// Fatal load failures. Anything reported here aborts the whole load.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed world file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid manifest: {0}")]
    Manifest(String),
}

impl LoadError {
    pub(crate) fn manifest(msg: impl Into<String>) -> Self {
        LoadError::Manifest(msg.into())
    }
}

/// Why a single entity record was rejected. These never abort a load.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("record does not match the entity schema: {0}")]
    Shape(String),

    #[error("record is missing an id")]
    MissingId,

    #[error("duplicate entity id '{0}'")]
    DuplicateId(String),

    #[error("entity has an empty name")]
    EmptyName,

    #[error("unknown entity type '{0}'")]
    UnknownType(String),

    #[error("unknown size class '{0}'")]
    UnknownSize(String),

    #[error("invalid property '{key}': {reason}")]
    InvalidProperty { key: String, reason: String },

    #[error("invalid interaction '{command}': {source}")]
    InvalidInteraction {
        command: String,
        #[source]
        source: ScriptError,
    },

    #[error("no initial location")]
    NoLocation,

    #[error("initial location '{0}' is neither a scene, the inventory, nor a container")]
    UnknownLocation(String),

    #[error("required key '{0}' is not a loaded entity")]
    UnknownKey(String),
}

/// Errors from the condition/effect mini-language.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScriptError {
    #[error("empty expression")]
    Empty,

    #[error("invalid path '{0}'")]
    BadPath(String),

    #[error("effect '{0}' is not of the form 'path = value'")]
    NotAnAssignment(String),

    #[error("missing value in '{0}'")]
    MissingValue(String),
}

/// A refused command. `Display` is exactly the message shown to the player.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    AlreadyInState(String),

    #[error("{0}")]
    PreconditionFailed(String),

    #[error("{0}")]
    Unsupported(String),
}
