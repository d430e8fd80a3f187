//! Implementation of the len() builtin function.

use crate::{
    builtins::get_one_arg,
    exception::{ExcType, RunResult},
    value::Value,
};

/// Length of a string (in characters), list, or dict.
pub(crate) fn builtin_len(args: Vec<Value>) -> RunResult<Value> {
    let value = get_one_arg("len", args)?;
    let len = match &value {
        Value::Str(s) => s.chars().count(),
        Value::List(items) => items.borrow().len(),
        Value::Dict(dict) => dict.borrow().len(),
        other => {
            return Err(ExcType::TypeError
                .msg(format!("object of type '{}' has no len()", other.type_name())));
        }
    };
    Ok(Value::Int(len as i64))
}
