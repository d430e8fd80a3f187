//! Implementation of the type() builtin function.

use crate::{builtins::get_one_arg, exception::RunResult, value::Value};

/// Returns the runtime kind name of the argument as a string.
pub(crate) fn builtin_type(args: Vec<Value>) -> RunResult<Value> {
    let value = get_one_arg("type", args)?;
    Ok(Value::str(value.type_name()))
}
