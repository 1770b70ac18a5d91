use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransformError {
    #[error("{expected} is expected at {position} but the transformation produced `{actual}`")]
    UnexpectedTermKind {
        expected: &'static str,
        position: String,
        actual: String,
    },
}
