//! Field length validation.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// A bounded text field exceeded its character limit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Domain field name (`title`, `author`).
    pub field: &'static str,
    pub max_chars: usize,
    pub actual_chars: usize,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "`{}` must be at most {} characters, got {}",
            self.field, self.max_chars, self.actual_chars
        )
    }
}

impl Error for ValidationError {}

/// Checks `value` against a limit counted in characters, not bytes.
pub(crate) fn check_max_chars(
    field: &'static str,
    value: &str,
    max_chars: usize,
) -> Result<(), ValidationError> {
    let actual_chars = value.chars().count();
    if actual_chars > max_chars {
        return Err(ValidationError {
            field,
            max_chars,
            actual_chars,
        });
    }
    Ok(())
}
