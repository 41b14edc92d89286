use std::borrow::Cow;

/// Crate-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Maximum number of bytes of a raw attribute value kept in an error.
const VALUE_SAMPLE_MAX_BYTES: usize = 256;

/// Error returned by dstask APIs.
///
/// Schema violations name the offending attribute and carry a bounded sample of the raw value.
/// A failure only affects the call that returned it; nothing is retried.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A structural attribute (task id, class name, object classes, timestamps maintained by the
    /// server) is absent or unparsable. No task is produced.
    #[error("malformed task entry {dn}: {context}")]
    MalformedTaskEntry { dn: String, context: String },

    /// The task class name does not match any registered task type, or the entry lacks the
    /// type-specific object class for the class it names.
    #[error("unrecognized task type: {class_name}")]
    UnrecognizedTaskType { class_name: String },

    /// A property marked as required has no value.
    #[error("missing value for required task property {attribute}")]
    MissingRequiredProperty { attribute: String },

    /// A single-valued property has more than one value.
    #[error("task property {attribute} is single-valued but has {count} values")]
    CardinalityViolation { attribute: String, count: usize },

    /// A value cannot be interpreted as the data type its property declares.
    ///
    /// `value` is truncated to avoid unbounded output.
    #[error("cannot coerce value {value:?} of task property {attribute}")]
    TypeCoercionFailure { attribute: String, value: String },

    /// A value is not a member of its property's closed set of allowed values.
    ///
    /// `value` is truncated to avoid unbounded output.
    #[error("value {value:?} is not allowed for task property {attribute}")]
    InvalidEnumerationValue { attribute: String, value: String },

    /// Strict lookup by identifier failed for an enumeration.
    #[error("{enumeration} has no value with identifier {identifier:?}")]
    UnknownIdentifier {
        enumeration: &'static str,
        identifier: String,
    },

    /// API misuse (e.g. storing a value of the wrong type, converting a task of another type).
    #[error("invalid input: {context}")]
    InvalidInput { context: String },
}

impl Error {
    pub(crate) fn invalid_input(context: impl Into<String>) -> Self {
        Self::InvalidInput {
            context: context.into(),
        }
    }

    pub(crate) fn malformed(dn: impl Into<String>, context: impl Into<String>) -> Self {
        Self::MalformedTaskEntry {
            dn: dn.into(),
            context: context.into(),
        }
    }

    pub(crate) fn missing_required(attribute: &str) -> Self {
        Self::MissingRequiredProperty {
            attribute: attribute.to_string(),
        }
    }

    pub(crate) fn coercion(attribute: &str, value: impl AsRef<str>) -> Self {
        Self::TypeCoercionFailure {
            attribute: attribute.to_string(),
            value: truncate_for_error(value.as_ref(), VALUE_SAMPLE_MAX_BYTES).into_owned(),
        }
    }

    pub(crate) fn invalid_enumeration(attribute: &str, value: impl AsRef<str>) -> Self {
        Self::InvalidEnumerationValue {
            attribute: attribute.to_string(),
            value: truncate_for_error(value.as_ref(), VALUE_SAMPLE_MAX_BYTES).into_owned(),
        }
    }
}

fn truncate_for_error(input: &str, max_bytes: usize) -> Cow<'_, str> {
    if input.len() <= max_bytes {
        return Cow::Borrowed(input);
    }
    let mut end = max_bytes;
    while end > 0 && !input.is_char_boundary(end) {
        end -= 1;
    }
    Cow::Owned(input[..end].to_string())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]
    #![allow(clippy::panic)]
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn coercion_error_truncates_long_values_on_char_boundary() {
        let raw = "é".repeat(200);
        let Error::TypeCoercionFailure { attribute, value } = Error::coercion("ds-task-x", &raw)
        else {
            panic!("unexpected variant");
        };
        assert_eq!(attribute, "ds-task-x");
        assert!(value.len() <= VALUE_SAMPLE_MAX_BYTES);
        assert!(raw.starts_with(&value));
    }

    #[test]
    fn display_names_the_attribute() {
        let err = Error::missing_required("ds-task-export-backend-id");
        assert_eq!(
            err.to_string(),
            "missing value for required task property ds-task-export-backend-id"
        );
    }
}
