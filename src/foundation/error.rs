/// Convenience result type used across the crate.
pub type DtiResult<T> = Result<T, DtiError>;

/// Top-level error taxonomy.
///
/// Every variant except [`DtiError::Fetch`] and [`DtiError::Other`] is a deterministic,
/// data-dependent failure. None of them are retried internally.
#[derive(thiserror::Error, Debug)]
pub enum DtiError {
    /// The validity table does not match its own header.
    #[error("corrupt validity table: {0}")]
    CorruptTable(String),

    /// A caller passed an id or value outside the known range.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The species/color combination has no legal pose at all.
    #[error("invalid species/color pair: {0}")]
    InvalidSpeciesColorPair(String),

    /// Neither the requested pose nor any fallback pose has appearance data.
    #[error("missing pet appearance: {0}")]
    MissingAppearance(String),

    /// One or more visible layers have no raster image URL.
    #[error("null asset image for layers: {}", .layers.join(", "))]
    NullAssetImage {
        /// Descriptions of the offending layers (`layer <id> (<zone label>)`).
        layers: Vec<String>,
    },

    /// A fetched layer image could not be decoded or composited.
    #[error("layer image broken: {0}")]
    DecodeOrCompose(String),

    /// A payload is missing a required field or carries an unparsable value.
    #[error("payload error: {0}")]
    Payload(String),

    /// No species matched the given id or name.
    #[error("unknown species: {0}")]
    UnknownSpecies(String),

    /// No color matched the given id or name.
    #[error("unknown color: {0}")]
    UnknownColor(String),

    /// The injected network collaborator failed.
    #[error("fetch error: {0}")]
    Fetch(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DtiError {
    /// Build a [`DtiError::CorruptTable`] value.
    pub fn corrupt_table(msg: impl Into<String>) -> Self {
        Self::CorruptTable(msg.into())
    }

    /// Build a [`DtiError::InvalidArgument`] value.
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Build a [`DtiError::InvalidSpeciesColorPair`] value.
    pub fn invalid_pair(msg: impl Into<String>) -> Self {
        Self::InvalidSpeciesColorPair(msg.into())
    }

    /// Build a [`DtiError::MissingAppearance`] value.
    pub fn missing_appearance(msg: impl Into<String>) -> Self {
        Self::MissingAppearance(msg.into())
    }

    /// Build a [`DtiError::DecodeOrCompose`] value.
    pub fn decode_or_compose(msg: impl Into<String>) -> Self {
        Self::DecodeOrCompose(msg.into())
    }

    /// Build a [`DtiError::Payload`] value.
    pub fn payload(msg: impl Into<String>) -> Self {
        Self::Payload(msg.into())
    }

    /// Build a [`DtiError::Fetch`] value.
    pub fn fetch(msg: impl Into<String>) -> Self {
        Self::Fetch(msg.into())
    }

    /// Return `true` for failures that mean "this combination does not exist".
    ///
    /// Callers usually skip these quietly, while data integrity and asset problems warrant an
    /// alert.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::InvalidSpeciesColorPair(_)
                | Self::MissingAppearance(_)
                | Self::UnknownSpecies(_)
                | Self::UnknownColor(_)
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
