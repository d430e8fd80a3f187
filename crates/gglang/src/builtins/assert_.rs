//! Implementation of the assert() builtin function.

use crate::{
    builtins::get_one_two_args,
    exception::{ExcType, RunResult},
    value::Value,
};

/// Raises `AssertionError` when the condition is falsy, with the given or
/// default message.
pub(crate) fn builtin_assert(args: Vec<Value>) -> RunResult<Value> {
    let (condition, message) = get_one_two_args("assert", args)?;
    if condition.truthy() {
        return Ok(Value::None);
    }
    let message = match message {
        None | Some(Value::None) => "Assertion failed.".to_owned(),
        Some(value) => value.str_value(),
    };
    Err(ExcType::AssertionError.msg(message))
}
