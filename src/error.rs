use thiserror::Error;

/// Errors returned by [`ListBinder`](crate::ListBinder) operations.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Error {
    /// A position does not refer to a row of the current snapshot.
    #[error("position {position} is out of range for a list of {len} rows")]
    PositionOutOfRange { position: usize, len: usize },

    /// No cell type is registered for the object's kind and no cell provider is set.
    #[error("no cell type is registered for objects of kind `{kind}`")]
    MissingCellRegistration { kind: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
