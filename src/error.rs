use thiserror::Error;

use crate::galaxy::ParameterField;

pub type Result<T> = std::result::Result<T, GalaxyError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GalaxyError {
    /// A value outside what the generator can place points with.
    #[error("invalid parameter `{field}`: {reason}")]
    InvalidParameter {
        field: ParameterField,
        reason: String,
    },

    /// `set` received the wrong kind of value for a field.
    #[error("parameter `{field}` expects {expected} value")]
    ValueMismatch {
        field: ParameterField,
        expected: &'static str,
    },
}

impl GalaxyError {
    pub(crate) fn invalid(field: ParameterField, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            field,
            reason: reason.into(),
        }
    }
}
