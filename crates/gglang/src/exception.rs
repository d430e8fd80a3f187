//! Runtime error taxonomy and the non-local exit channels of the evaluator.

use std::fmt;

use strum::{Display, EnumString, IntoStaticStr};

use crate::value::Value;

/// Result type alias for operations that can produce a runtime error.
pub type RunResult<T> = Result<T, Exception>;

/// Result type alias for evaluator steps, which can also unwind with a
/// function return.
pub(crate) type EvalResult<T> = Result<T, Unwind>;

/// Error kinds raised by the interpreter.
///
/// Uses strum derives for automatic `Display`, `FromStr`, and
/// `Into<&'static str>` implementations. The string representation matches
/// the variant name exactly (e.g., `TypeError` -> "TypeError").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr)]
pub enum ExcType {
    /// A name was looked up but never defined.
    NameError,
    /// A name was declared but read before being assigned a value.
    UnboundLocalError,
    /// An operand, argument, or assignment target had the wrong kind.
    TypeError,
    /// A call supplied the wrong number of arguments.
    ArityError,
    /// A call target that is not callable.
    NotCallableError,
    /// A list index outside the valid range.
    IndexError,
    /// A dict lookup for a missing key.
    KeyError,
    /// A value expected in a collection was not found.
    ValueError,
    ZeroDivisionError,
    /// The coercion pipe `~~>` could not convert the piped value.
    CoercionError,
    /// `assert()` with a falsy condition.
    AssertionError,
    /// Catch-all for unexpected runtime conditions.
    RuntimeError,
}

impl ExcType {
    /// Creates an exception of this kind with the given message.
    pub fn msg(self, message: impl Into<String>) -> Exception {
        Exception::new(self, message)
    }
}

/// A runtime error: an error kind plus its human-readable message.
///
/// `try/catch` binds only the message text to the exception variable; the
/// kind is carried for host callers and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exception {
    exc_type: ExcType,
    message: String,
}

impl Exception {
    pub fn new(exc_type: ExcType, message: impl Into<String>) -> Self {
        Self {
            exc_type,
            message: message.into(),
        }
    }

    pub fn exc_type(&self) -> ExcType {
        self.exc_type
    }

    /// The message text, without the kind prefix. This is what a `catch`
    /// clause binds to its exception variable.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// An undefined-name error, matching the runtime's wording.
    pub(crate) fn name_undefined(name: &str) -> Self {
        ExcType::NameError.msg(format!("Variable '{name}' is not defined."))
    }

    /// A declared-but-unassigned error, matching the runtime's wording.
    pub(crate) fn name_uninitialized(name: &str) -> Self {
        ExcType::UnboundLocalError.msg(format!(
            "Variable '{name}' was declared but not assigned a value."
        ))
    }

    pub(crate) fn assign_undefined(name: &str) -> Self {
        ExcType::NameError.msg(format!("Cannot assign to undefined variable '{name}'."))
    }

    pub(crate) fn arity(name: &str, expected: usize, got: usize) -> Self {
        ExcType::ArityError.msg(format!(
            "Function '{name}' expected {expected} arguments, but got {got}."
        ))
    }

    pub(crate) fn not_callable(type_name: &str) -> Self {
        ExcType::NotCallableError.msg(format!("'{type_name}' object is not callable."))
    }
}

impl fmt::Display for Exception {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.exc_type, self.message)
    }
}

impl std::error::Error for Exception {}

/// Non-local exits used while walking the tree.
///
/// `Return` is a control signal, not an error: `try/catch` captures only the
/// `Raise` arm and lets returns continue to the nearest function invocation.
#[derive(Debug, Clone)]
pub(crate) enum Unwind {
    Raise(Exception),
    Return(Value),
}

impl From<Exception> for Unwind {
    fn from(exception: Exception) -> Self {
        Self::Raise(exception)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn display_includes_kind_and_message() {
        let exc = ExcType::TypeError.msg("bad operand");
        assert_eq!(exc.to_string(), "TypeError: bad operand");
        assert_eq!(exc.message(), "bad operand");
    }

    #[test]
    fn exc_type_round_trips_through_strings() {
        let name: &'static str = ExcType::ZeroDivisionError.into();
        assert_eq!(name, "ZeroDivisionError");
        assert_eq!(ExcType::from_str(name).unwrap(), ExcType::ZeroDivisionError);
    }
}
