//! Implementation of the input() builtin function.

use crate::{
    builtins::get_zero_one_args,
    exception::RunResult,
    io::{InputReader, PrintWriter},
    value::Value,
};

/// Prints the prompt without a newline, then reads one line from the input
/// reader and returns it without the trailing newline.
pub(crate) fn builtin_input(
    args: Vec<Value>,
    print: &mut impl PrintWriter,
    input: &mut impl InputReader,
) -> RunResult<Value> {
    if let Some(prompt) = get_zero_one_args("input", args)? {
        let text = prompt.str_value();
        if !text.is_empty() {
            print.stdout_write(&text)?;
        }
    }
    let line = input.read_line()?;
    Ok(Value::str(line))
}
