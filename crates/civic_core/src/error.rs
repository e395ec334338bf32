use thiserror::Error;

/// Raised when a mapping cannot be hydrated into a document entity.
///
/// `field` is a dotted path from the top-level mapping, e.g. `body.name` or
/// `matters[2].name`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaValidationError {
    #[error("{entity}: required field `{field}` is missing")]
    MissingField { entity: &'static str, field: String },
    #[error("{entity}: field `{field}` must be {expected}")]
    WrongShape {
        entity: &'static str,
        field: String,
        expected: &'static str,
    },
    #[error("{entity}: {message}")]
    Invariant {
        entity: &'static str,
        message: String,
    },
    #[error("{entity}: conversion failed: {message}")]
    Conversion {
        entity: &'static str,
        message: String,
    },
}
