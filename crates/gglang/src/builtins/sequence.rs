//! The list-mutating builtins: append(), pop(), and remove().

use crate::{
    builtins::{get_one_two_args, get_two_args},
    exception::{ExcType, RunResult},
    value::Value,
};

/// Appends a value to a list in place.
pub(crate) fn builtin_append(args: Vec<Value>) -> RunResult<Value> {
    let (list, value) = get_two_args("append", args)?;
    let Value::List(items) = list else {
        return Err(ExcType::TypeError.msg("append() takes a list as the first argument."));
    };
    items.borrow_mut().push(value);
    Ok(Value::None)
}

/// Removes and returns the element at `index` (default -1, the last).
/// Negative indices count from the end.
pub(crate) fn builtin_pop(args: Vec<Value>) -> RunResult<Value> {
    let (list, index) = get_one_two_args("pop", args)?;
    let Value::List(items) = list else {
        return Err(ExcType::TypeError.msg("pop() takes a list as the first argument."));
    };
    let index = match index {
        None => -1,
        Some(Value::Int(i)) => i,
        Some(_) => return Err(ExcType::TypeError.msg("pop() index must be an integer.")),
    };
    let mut items = items.borrow_mut();
    if items.is_empty() {
        return Err(ExcType::IndexError.msg("pop from empty list"));
    }
    let len = items.len() as i64;
    let resolved = if index < 0 { index + len } else { index };
    if resolved < 0 || resolved >= len {
        return Err(ExcType::IndexError.msg("pop index out of range"));
    }
    Ok(items.remove(resolved as usize))
}

/// Removes the first element equal to `value`.
pub(crate) fn builtin_remove(args: Vec<Value>) -> RunResult<Value> {
    let (list, value) = get_two_args("remove", args)?;
    let Value::List(items) = list else {
        return Err(ExcType::TypeError.msg("remove() takes a list as the first argument."));
    };
    let mut items = items.borrow_mut();
    match items.iter().position(|item| item.eq_value(&value)) {
        Some(index) => {
            items.remove(index);
            Ok(Value::None)
        }
        None => Err(ExcType::ValueError.msg(format!(
            "value '{}' not found in list.",
            value.str_value()
        ))),
    }
}
