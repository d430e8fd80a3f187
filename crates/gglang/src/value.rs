//! Runtime value model: the tagged variant all GGLang expressions evaluate to,
//! plus the operator semantics that dispatch on it.

use std::{cell::RefCell, cmp::Ordering, fmt::Write, rc::Rc};

use ahash::AHashSet;
use num_integer::Integer;
use strum::{Display, IntoStaticStr};

use crate::{
    ast::BinOpKind,
    builtins::Builtins,
    exception::{ExcType, RunResult},
    function::Function,
    types::{Class, Dict, Instance, SuperBinding},
};

/// Primary value type representing GGLang objects at runtime.
///
/// Small immediate values (`Int`, `Bool`, `None`) are stored inline; mutable
/// containers and objects are shared behind `Rc` so that assignment aliases
/// storage the way the language expects (two variables naming one list see
/// each other's mutations).
#[derive(Debug, Clone)]
pub(crate) enum Value {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(Rc<str>),
    List(Rc<RefCell<Vec<Value>>>),
    Dict(Rc<RefCell<Dict>>),
    /// A user function, or a bound method (a function whose closure frame
    /// defines `this` and possibly `super`).
    Function(Rc<Function>),
    /// A native builtin such as `print` or the `int` coercer.
    Builtin(Builtins),
    Class(Rc<Class>),
    Instance(Rc<Instance>),
    /// Resolves inherited methods from an instance's perspective.
    Super(Rc<SuperBinding>),
    /// A string method such as `"a".upper`, bound to its receiver.
    StrMethod(StrMethod, Rc<str>),
    /// Internal sentinel for a declared-but-unassigned binding. Reading it
    /// through the environment raises; it is never the result of an
    /// expression.
    Uninitialized,
}

/// Methods exposed on string values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub(crate) enum StrMethod {
    Upper,
    Lower,
}

impl Value {
    pub fn str(s: impl Into<Rc<str>>) -> Self {
        Self::Str(s.into())
    }

    pub fn list(items: Vec<Self>) -> Self {
        Self::List(Rc::new(RefCell::new(items)))
    }

    pub fn dict(dict: Dict) -> Self {
        Self::Dict(Rc::new(RefCell::new(dict)))
    }

    /// Runtime kind name as reported by `type()` and used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::None => "NoneType",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Str(_) => "str",
            Self::List(_) => "list",
            Self::Dict(_) => "dict",
            Self::Function(_) => "Function",
            Self::Builtin(_) | Self::StrMethod(..) => "NativeFunction",
            Self::Class(_) => "Class",
            Self::Instance(_) => "Instance",
            Self::Super(_) => "Super",
            Self::Uninitialized => "Uninitialized",
        }
    }

    /// Truthiness: everything is truthy except `false`, zero, the empty
    /// string/list/dict, and `None`.
    pub fn truthy(&self) -> bool {
        match self {
            Self::None => false,
            Self::Bool(b) => *b,
            Self::Int(i) => *i != 0,
            Self::Float(f) => *f != 0.0,
            Self::Str(s) => !s.is_empty(),
            Self::List(items) => !items.borrow().is_empty(),
            Self::Dict(dict) => !dict.borrow().is_empty(),
            _ => true,
        }
    }

    /// Structural equality. Numbers compare across `Int`/`Float`/`Bool` by
    /// numeric value; lists and dicts compare element-wise; objects,
    /// functions, and classes compare by identity; remaining cross-kind
    /// comparisons are unequal.
    pub fn eq_value(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::None, Self::None) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Int(a), Self::Float(b)) | (Self::Float(b), Self::Int(a)) => (*a as f64) == *b,
            (Self::Bool(a), Self::Int(b)) | (Self::Int(b), Self::Bool(a)) => i64::from(*a) == *b,
            (Self::Bool(a), Self::Float(b)) | (Self::Float(b), Self::Bool(a)) => {
                (i64::from(*a) as f64) == *b
            }
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::List(a), Self::List(b)) => {
                if Rc::ptr_eq(a, b) {
                    return true;
                }
                let (a, b) = (a.borrow(), b.borrow());
                a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x.eq_value(y))
            }
            (Self::Dict(a), Self::Dict(b)) => {
                if Rc::ptr_eq(a, b) {
                    return true;
                }
                a.borrow().eq_dict(&b.borrow())
            }
            (Self::Function(a), Self::Function(b)) => Rc::ptr_eq(a, b),
            (Self::Class(a), Self::Class(b)) => Rc::ptr_eq(a, b),
            (Self::Instance(a), Self::Instance(b)) => Rc::ptr_eq(a, b),
            (Self::Builtin(a), Self::Builtin(b)) => a == b,
            _ => false,
        }
    }

    /// Ordering for `<`, `>`, `<=`, `>=`. `None` means the operands are
    /// unordered (NaN involved), in which case every comparison is false.
    fn compare(&self, other: &Self, op: BinOpKind) -> RunResult<Option<Ordering>> {
        match (self.as_number(), other.as_number()) {
            (Some(Number::Int(a)), Some(Number::Int(b))) => Ok(Some(a.cmp(&b))),
            (Some(a), Some(b)) => Ok(a.as_f64().partial_cmp(&b.as_f64())),
            _ => match (self, other) {
                (Self::Str(a), Self::Str(b)) => Ok(Some(a.cmp(b))),
                _ => Err(ExcType::TypeError.msg(format!(
                    "'{}' not supported between values of type '{}' and '{}'",
                    op.symbol(),
                    self.type_name(),
                    other.type_name()
                ))),
            },
        }
    }

    fn as_number(&self) -> Option<Number> {
        match self {
            Self::Int(i) => Some(Number::Int(*i)),
            Self::Bool(b) => Some(Number::Int(i64::from(*b))),
            Self::Float(f) => Some(Number::Float(*f)),
            _ => None,
        }
    }

    /// The `str()` form: strings render as-is, everything else as its repr.
    pub fn str_value(&self) -> String {
        match self {
            Self::Str(s) => s.to_string(),
            other => other.repr_value(),
        }
    }

    /// The repr form used for container elements and explicit displays.
    pub fn repr_value(&self) -> String {
        let mut out = String::new();
        let mut seen = AHashSet::new();
        self.write_repr(&mut out, &mut seen);
        out
    }

    /// Writes the repr, tracking visited containers so self-referential
    /// lists and dicts render as `[...]` / `{...}` instead of recursing.
    fn write_repr(&self, out: &mut String, seen: &mut AHashSet<usize>) {
        match self {
            Self::None => out.push_str("None"),
            Self::Bool(true) => out.push_str("True"),
            Self::Bool(false) => out.push_str("False"),
            Self::Int(i) => {
                let _ = write!(out, "{i}");
            }
            Self::Float(f) => write_float(out, *f),
            Self::Str(s) => write_str_repr(out, s),
            Self::List(items) => {
                let addr = Rc::as_ptr(items) as usize;
                if !seen.insert(addr) {
                    out.push_str("[...]");
                    return;
                }
                out.push('[');
                for (i, item) in items.borrow().iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    item.write_repr(out, seen);
                }
                out.push(']');
                seen.remove(&addr);
            }
            Self::Dict(dict) => {
                let addr = Rc::as_ptr(dict) as usize;
                if !seen.insert(addr) {
                    out.push_str("{...}");
                    return;
                }
                out.push('{');
                for (i, (key, value)) in dict.borrow().iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    key.write_repr(out, seen);
                    out.push_str(": ");
                    value.write_repr(out, seen);
                }
                out.push('}');
                seen.remove(&addr);
            }
            Self::Function(func) => {
                let _ = write!(out, "<fn {}>", func.name());
            }
            Self::Builtin(builtin) => {
                let _ = write!(out, "<native fn {builtin}>");
            }
            Self::StrMethod(method, _) => {
                let _ = write!(out, "<native fn str.{method}>");
            }
            Self::Class(class) => {
                let _ = write!(out, "<class {}>", class.name());
            }
            Self::Instance(instance) => {
                let _ = write!(out, "<{} instance>", instance.class().name());
            }
            Self::Super(binding) => {
                let _ = write!(out, "<super: {}>", binding.superclass().name());
            }
            Self::Uninitialized => out.push_str("<uninitialized>"),
        }
    }
}

/// Numeric view used by comparison and arithmetic promotion.
#[derive(Debug, Clone, Copy)]
enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    fn as_f64(self) -> f64 {
        match self {
            Self::Int(i) => i as f64,
            Self::Float(f) => f,
        }
    }
}

/// Applies a binary operator to two evaluated operands.
pub(crate) fn binary_op(op: BinOpKind, left: &Value, right: &Value) -> RunResult<Value> {
    match op {
        BinOpKind::Eq => return Ok(Value::Bool(left.eq_value(right))),
        BinOpKind::Ne => return Ok(Value::Bool(!left.eq_value(right))),
        BinOpKind::Gt | BinOpKind::Lt | BinOpKind::Ge | BinOpKind::Le => {
            let ordering = left.compare(right, op)?;
            let holds = match ordering {
                None => false,
                Some(ord) => match op {
                    BinOpKind::Gt => ord == Ordering::Greater,
                    BinOpKind::Lt => ord == Ordering::Less,
                    BinOpKind::Ge => ord != Ordering::Less,
                    BinOpKind::Le => ord != Ordering::Greater,
                    _ => unreachable!(),
                },
            };
            return Ok(Value::Bool(holds));
        }
        BinOpKind::Add | BinOpKind::Sub | BinOpKind::Mul | BinOpKind::Div => {}
    }

    match (left, right) {
        (Value::Int(a), Value::Int(b)) => int_arith(op, *a, *b),
        (Value::Float(a), Value::Float(b)) => float_arith(op, *a, *b),
        (Value::Int(a), Value::Float(b)) => float_arith(op, *a as f64, *b),
        (Value::Float(a), Value::Int(b)) => float_arith(op, *a, *b as f64),
        (Value::Str(a), Value::Str(b)) if op == BinOpKind::Add => {
            let mut s = String::with_capacity(a.len() + b.len());
            s.push_str(a);
            s.push_str(b);
            Ok(Value::str(s))
        }
        (Value::Str(s), Value::Int(n)) | (Value::Int(n), Value::Str(s))
            if op == BinOpKind::Mul =>
        {
            let count = usize::try_from(*n).unwrap_or(0);
            Ok(Value::str(s.repeat(count)))
        }
        _ => Err(ExcType::TypeError.msg(format!(
            "unsupported operand type(s) for {}: '{}' and '{}'",
            op.symbol(),
            left.type_name(),
            right.type_name()
        ))),
    }
}

/// Integer arithmetic. `/` is floor division; overflow raises rather than
/// wrapping.
fn int_arith(op: BinOpKind, a: i64, b: i64) -> RunResult<Value> {
    let result = match op {
        BinOpKind::Add => a.checked_add(b),
        BinOpKind::Sub => a.checked_sub(b),
        BinOpKind::Mul => a.checked_mul(b),
        BinOpKind::Div => {
            if b == 0 {
                return Err(ExcType::ZeroDivisionError.msg("integer division or modulo by zero"));
            }
            if a == i64::MIN && b == -1 {
                return Err(ExcType::RuntimeError.msg("integer overflow"));
            }
            return Ok(Value::Int(a.div_floor(&b)));
        }
        _ => unreachable!(),
    };
    result
        .map(Value::Int)
        .ok_or_else(|| ExcType::RuntimeError.msg("integer overflow"))
}

fn float_arith(op: BinOpKind, a: f64, b: f64) -> RunResult<Value> {
    let result = match op {
        BinOpKind::Add => a + b,
        BinOpKind::Sub => a - b,
        BinOpKind::Mul => a * b,
        BinOpKind::Div => {
            if b == 0.0 {
                return Err(ExcType::ZeroDivisionError.msg("float division by zero"));
            }
            a / b
        }
        _ => unreachable!(),
    };
    Ok(Value::Float(result))
}

/// Shortest round-trip float formatting, with the runtime's spellings for
/// the non-finite values.
fn write_float(out: &mut String, f: f64) {
    if f.is_nan() {
        out.push_str("nan");
    } else if f.is_infinite() {
        out.push_str(if f > 0.0 { "inf" } else { "-inf" });
    } else {
        let mut buffer = ryu::Buffer::new();
        out.push_str(buffer.format_finite(f));
    }
}

/// Single-quoted string repr with the common escapes.
fn write_str_repr(out: &mut String, s: &str) {
    out.push('\'');
    for c in s.chars() {
        match c {
            '\'' => out.push_str("\\'"),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
    out.push('\'');
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn floor_division_rounds_toward_negative_infinity() {
        let div = |a, b| binary_op(BinOpKind::Div, &Value::Int(a), &Value::Int(b)).unwrap();
        assert!(matches!(div(7, 2), Value::Int(3)));
        assert!(matches!(div(-7, 2), Value::Int(-4)));
        assert!(matches!(div(7, -2), Value::Int(-4)));
    }

    #[test]
    fn mixed_numeric_division_is_ieee() {
        let result = binary_op(BinOpKind::Div, &Value::Int(7), &Value::Float(2.0)).unwrap();
        assert!(matches!(result, Value::Float(f) if f == 3.5));
    }

    #[test]
    fn numeric_equality_promotes() {
        assert!(Value::Int(1).eq_value(&Value::Float(1.0)));
        assert!(Value::Bool(true).eq_value(&Value::Int(1)));
        assert!(!Value::Int(1).eq_value(&Value::str("1")));
    }

    #[test]
    fn truthiness_matches_emptiness() {
        assert!(!Value::None.truthy());
        assert!(!Value::Int(0).truthy());
        assert!(!Value::str("").truthy());
        assert!(!Value::list(vec![]).truthy());
        assert!(Value::Float(0.5).truthy());
        assert!(Value::str("x").truthy());
    }

    #[test]
    fn repr_quotes_strings_inside_lists_only() {
        let list = Value::list(vec![Value::Int(2), Value::str("a")]);
        assert_eq!(list.str_value(), "[2, 'a']");
        assert_eq!(Value::str("a").str_value(), "a");
        assert_eq!(Value::Float(2.0).str_value(), "2.0");
    }

    #[test]
    fn self_referential_list_repr_terminates() {
        let inner = Rc::new(RefCell::new(vec![Value::Int(1)]));
        inner.borrow_mut().push(Value::List(Rc::clone(&inner)));
        assert_eq!(Value::List(inner).str_value(), "[1, [...]]");
    }
}
