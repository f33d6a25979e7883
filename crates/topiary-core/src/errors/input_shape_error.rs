/// Malformed corpus input. Always fatal: raised before clustering starts.
#[derive(Debug, thiserror::Error)]
pub enum InputShapeError {
    #[error("count mismatch: {texts} texts vs {embeddings} embeddings")]
    CountMismatch { texts: usize, embeddings: usize },

    #[error("label count mismatch: expected {expected} labels, got {actual}")]
    LabelCountMismatch { expected: usize, actual: usize },

    #[error("dimension mismatch at row {row}: expected {expected}, got {actual}")]
    DimensionMismatch {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("embeddings have zero dimensions")]
    ZeroDimension,

    #[error("non-finite embedding value at row {row}, column {column}")]
    NonFinite { row: usize, column: usize },

    #[error("duplicate chunk id {id}")]
    DuplicateId { id: u64 },
}
