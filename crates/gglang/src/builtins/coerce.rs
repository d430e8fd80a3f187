//! The primitive coercers int(), float(), str(), and bool().
//!
//! These serve double duty: callable builtins, and the conversion step of the
//! `~~>` coercion pipe.

use num_traits::ToPrimitive;

use crate::{
    builtins::Builtins,
    exception::{ExcType, RunResult},
    value::Value,
};

/// Applies one of the coercer builtins to a value.
///
/// # Panics
/// Panics if called with a non-coercer builtin; callers dispatch only the
/// four coercers here.
pub(crate) fn coerce_value(builtin: Builtins, value: &Value) -> RunResult<Value> {
    match builtin {
        Builtins::Int => coerce_int(value),
        Builtins::Float => coerce_float(value),
        Builtins::Str => Ok(Value::str(value.str_value())),
        Builtins::Bool => Ok(Value::Bool(value.truthy())),
        other => panic!("{other} is not a coercer"),
    }
}

/// int(): truncates floats toward zero, parses strings in base 10.
fn coerce_int(value: &Value) -> RunResult<Value> {
    match value {
        Value::Int(i) => Ok(Value::Int(*i)),
        Value::Bool(b) => Ok(Value::Int(i64::from(*b))),
        Value::Float(f) => f
            .trunc()
            .to_i64()
            .map(Value::Int)
            .ok_or_else(|| {
                ExcType::ValueError.msg(format!("cannot convert float '{}' to int", value.str_value()))
            }),
        Value::Str(s) => s
            .trim()
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|_| {
                ExcType::ValueError.msg(format!("invalid literal for int(): '{s}'"))
            }),
        other => Err(ExcType::TypeError.msg(format!(
            "int() argument must be a string or a number, not '{}'",
            other.type_name()
        ))),
    }
}

/// float(): widens ints, parses strings.
fn coerce_float(value: &Value) -> RunResult<Value> {
    match value {
        Value::Float(f) => Ok(Value::Float(*f)),
        Value::Int(i) => Ok(Value::Float(*i as f64)),
        Value::Bool(b) => Ok(Value::Float(f64::from(*b))),
        Value::Str(s) => s
            .trim()
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|_| {
                ExcType::ValueError.msg(format!("could not convert string to float: '{s}'"))
            }),
        other => Err(ExcType::TypeError.msg(format!(
            "float() argument must be a string or a number, not '{}'",
            other.type_name()
        ))),
    }
}
