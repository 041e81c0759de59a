use thiserror::Error;

/// Errors raised while decoding a client-submitted entry set.
///
/// Parsing and reconciling never fail; only request decoding does.
#[derive(Debug, Error)]
pub enum TableError {
    /// The body is not a JSON entry array or `{entries, baseline}` envelope.
    #[error("Failed to parse request body: {0}")]
    Malformed(String),

    /// A field would inject an extra line into the table.
    #[error("Entry {index}: field `{field}` contains a line break")]
    LineBreak { index: usize, field: &'static str },
}

pub type Result<T> = std::result::Result<T, TableError>;
