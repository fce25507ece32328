/// Errors returned by `painel-core`.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("MNI error: {0}")]
    Mni(#[from] mni::MniError),
    #[error("failed to read label table: {0}")]
    FileRead(std::io::Error),
    #[error("translation error: {0}")]
    Translation(String),
}

pub type CoreResult<T> = std::result::Result<T, CoreError>;

/// A label lookup that could not produce an answer.
///
/// Distinct from a lookup that succeeded but does not know the code. Either way the normaliser
/// falls back to the raw code; only failures are logged as warnings.
#[derive(Debug, thiserror::Error)]
#[error("label lookup failed: {0}")]
pub struct LookupError(pub String);
