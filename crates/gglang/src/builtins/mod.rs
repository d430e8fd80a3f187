//! GGLang's native builtin functions.
//!
//! Each builtin has its own submodule; this module enumerates them, registers
//! them into the global environment, and dispatches calls.

mod assert_;
mod coerce;
mod input;
mod len;
mod print;
mod sequence;
mod type_;

use strum::{Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

use crate::{
    env::Env,
    exception::{ExcType, RunResult},
    io::{InputReader, PrintWriter},
    value::Value,
};

pub(crate) use coerce::coerce_value;

/// Enumerates every native builtin.
///
/// Uses strum derives for automatic `Display`, `FromStr`, and
/// `Into<&'static str>` implementations; all variants serialize to lowercase
/// (e.g., `Print` -> "print"), which is also the global name each is
/// registered under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub(crate) enum Builtins {
    Print,
    Len,
    Append,
    Pop,
    Remove,
    Type,
    Input,
    Assert,
    Int,
    Float,
    Str,
    Bool,
}

impl Builtins {
    /// The global name this builtin is bound to.
    pub fn name(self) -> &'static str {
        self.into()
    }

    /// Whether this builtin is one of the primitive coercers used by the
    /// `~~>` pipe.
    pub fn is_coercer(self) -> bool {
        matches!(self, Self::Int | Self::Float | Self::Str | Self::Bool)
    }

    /// Calls this builtin with already-evaluated arguments.
    pub fn call(
        self,
        args: Vec<Value>,
        print: &mut impl PrintWriter,
        input: &mut impl InputReader,
    ) -> RunResult<Value> {
        match self {
            Self::Print => print::builtin_print(args, print),
            Self::Len => len::builtin_len(args),
            Self::Append => sequence::builtin_append(args),
            Self::Pop => sequence::builtin_pop(args),
            Self::Remove => sequence::builtin_remove(args),
            Self::Type => type_::builtin_type(args),
            Self::Input => input::builtin_input(args, print, input),
            Self::Assert => assert_::builtin_assert(args),
            Self::Int | Self::Float | Self::Str | Self::Bool => {
                let value = get_one_arg(self.name(), args)?;
                coerce::coerce_value(self, &value)
            }
        }
    }
}

/// Seeds the global environment with every builtin plus the boolean literals.
pub(crate) fn register(env: &Env) {
    for builtin in Builtins::iter() {
        env.define(builtin.name(), Value::Builtin(builtin));
    }
    env.define("true", Value::Bool(true));
    env.define("false", Value::Bool(false));
}

/// Checks that exactly one positional argument was passed, returning it.
pub(crate) fn get_one_arg(name: &str, mut args: Vec<Value>) -> RunResult<Value> {
    if args.len() == 1 {
        Ok(args.remove(0))
    } else {
        Err(arg_count_error(name, "exactly 1 argument", args.len()))
    }
}

/// Checks that exactly two positional arguments were passed.
pub(crate) fn get_two_args(name: &str, mut args: Vec<Value>) -> RunResult<(Value, Value)> {
    if args.len() == 2 {
        let second = args.pop().expect("length checked");
        let first = args.pop().expect("length checked");
        Ok((first, second))
    } else {
        Err(arg_count_error(name, "exactly 2 arguments", args.len()))
    }
}

/// Checks that one required and one optional argument were passed.
pub(crate) fn get_one_two_args(
    name: &str,
    mut args: Vec<Value>,
) -> RunResult<(Value, Option<Value>)> {
    match args.len() {
        1 => Ok((args.remove(0), None)),
        2 => {
            let second = args.pop().expect("length checked");
            let first = args.pop().expect("length checked");
            Ok((first, Some(second)))
        }
        got => Err(arg_count_error(name, "1 to 2 arguments", got)),
    }
}

/// Checks that at most one argument was passed.
pub(crate) fn get_zero_one_args(name: &str, mut args: Vec<Value>) -> RunResult<Option<Value>> {
    match args.len() {
        0 => Ok(None),
        1 => Ok(Some(args.remove(0))),
        got => Err(arg_count_error(name, "at most 1 argument", got)),
    }
}

fn arg_count_error(name: &str, expected: &str, got: usize) -> crate::exception::Exception {
    ExcType::ArityError.msg(format!("{name}() takes {expected} ({got} given)"))
}
