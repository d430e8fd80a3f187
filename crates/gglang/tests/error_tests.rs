//! One minimal program per error kind, plus propagation behavior.

use gglang::{CollectStringPrint, ExcType, Exception, ParseError, QueuedInput, Runner};
use pretty_assertions::assert_eq;

fn run(code: &str) -> String {
    let runner = Runner::new(code, "test.gg").unwrap();
    let mut print = CollectStringPrint::new();
    let mut input = QueuedInput::default();
    runner.run(&mut print, &mut input).unwrap();
    print.into_output()
}

fn run_err(code: &str) -> Exception {
    let runner = Runner::new(code, "test.gg").unwrap();
    let mut print = CollectStringPrint::new();
    let mut input = QueuedInput::default();
    runner.run(&mut print, &mut input).unwrap_err()
}

#[test]
fn undefined_name() {
    let err = run_err("print(missing)");
    assert_eq!(err.exc_type(), ExcType::NameError);
    assert_eq!(err.message(), "Variable 'missing' is not defined.");
}

#[test]
fn declared_but_unassigned_name() {
    let err = run_err("var x: int print(x)");
    assert_eq!(err.exc_type(), ExcType::UnboundLocalError);
    assert_eq!(
        err.message(),
        "Variable 'x' was declared but not assigned a value."
    );
}

#[test]
fn assigning_to_an_undefined_name() {
    let err = run_err("x = 1");
    assert_eq!(err.exc_type(), ExcType::NameError);
    assert_eq!(err.message(), "Cannot assign to undefined variable 'x'.");
}

#[test]
fn mismatched_operand_kinds() {
    let err = run_err(r#"var x = 1 + "a""#);
    assert_eq!(err.exc_type(), ExcType::TypeError);
}

#[test]
fn list_concatenation_is_rejected() {
    let err = run_err("var x = [1] + [2]");
    assert_eq!(err.exc_type(), ExcType::TypeError);
}

#[test]
fn wrong_argument_count() {
    let err = run_err(
        "fn f(a: int): int { return a }
         fn main(): int { f(1, 2); return 0 }",
    );
    assert_eq!(err.exc_type(), ExcType::ArityError);
    assert_eq!(
        err.message(),
        "Function 'f' expected 1 arguments, but got 2."
    );
}

#[test]
fn mismatched_parameter_type() {
    let err = run_err(
        r#"fn f(a: int): int { return a }
           fn main(): int { f("s"); return 0 }"#,
    );
    assert_eq!(err.exc_type(), ExcType::TypeError);
    assert_eq!(
        err.message(),
        "Argument 'a' for function 'f' must be of type 'int', but got type 'str'."
    );
}

#[test]
fn non_primitive_parameter_types_are_unchecked() {
    let out = run(
        r#"fn f(a: Widget): str { return type(a) }
           fn main(): int { print(f(3)); return 0 }"#,
    );
    assert_eq!(out, "int\n");
}

#[test]
fn mismatched_declared_variable_type() {
    let err = run_err(r#"var x: int = "s""#);
    assert_eq!(err.exc_type(), ExcType::TypeError);
    assert_eq!(
        err.message(),
        "Cannot assign value of type str to variable 'x' of type 'int'"
    );
}

#[test]
fn calling_a_non_callable() {
    let err = run_err("var f = 5 f()");
    assert_eq!(err.exc_type(), ExcType::NotCallableError);
    assert_eq!(err.message(), "'int' object is not callable.");
}

#[test]
fn list_index_out_of_range() {
    let err = run_err("var xs = [1] print(xs[3])");
    assert_eq!(err.exc_type(), ExcType::IndexError);
}

#[test]
fn negative_list_indices_are_rejected() {
    let err = run_err("var xs = [1] print(xs[-1])");
    assert_eq!(err.exc_type(), ExcType::IndexError);
}

#[test]
fn missing_dict_key() {
    let err = run_err(r#"var d = {"a": 1} print(d["b"])"#);
    assert_eq!(err.exc_type(), ExcType::KeyError);
    assert_eq!(err.message(), "'b'");
}

#[test]
fn removing_an_absent_value() {
    let err = run_err("var xs = [1] remove(xs, 2)");
    assert_eq!(err.exc_type(), ExcType::ValueError);
    assert_eq!(err.message(), "value '2' not found in list.");
}

#[test]
fn integer_division_by_zero() {
    let err = run_err("print(1 / 0)");
    assert_eq!(err.exc_type(), ExcType::ZeroDivisionError);
}

#[test]
fn float_division_by_zero() {
    let err = run_err("print(1.5 / 0.0)");
    assert_eq!(err.exc_type(), ExcType::ZeroDivisionError);
}

#[test]
fn failed_pipe_coercion() {
    let err = run_err(r#"fn f(n: int): int { return n } var x = "abc" ~~> f(_)"#);
    assert_eq!(err.exc_type(), ExcType::CoercionError);
}

#[test]
fn failed_assertion_uses_the_default_message() {
    let err = run_err("assert(false)");
    assert_eq!(err.exc_type(), ExcType::AssertionError);
    assert_eq!(err.message(), "Assertion failed.");
}

#[test]
fn return_outside_a_function() {
    let err = run_err("return 1");
    assert_eq!(err.exc_type(), ExcType::RuntimeError);
}

#[test]
fn runaway_recursion_is_bounded() {
    let err = run_err(
        "fn f(): int { return f() }
         fn main(): int { f(); return 0 }",
    );
    assert_eq!(err.exc_type(), ExcType::RuntimeError);
    assert_eq!(err.message(), "maximum recursion depth exceeded");
}

#[test]
fn pop_from_an_empty_list() {
    let err = run_err("var xs = [] pop(xs)");
    assert_eq!(err.exc_type(), ExcType::IndexError);
    assert_eq!(err.message(), "pop from empty list");
}

#[test]
fn len_of_an_unsized_value() {
    let err = run_err("len(5)");
    assert_eq!(err.exc_type(), ExcType::TypeError);
}

#[test]
fn unhashable_dict_key() {
    let err = run_err("var d = {} d[[1]] = 2");
    assert_eq!(err.exc_type(), ExcType::TypeError);
    assert_eq!(err.message(), "unhashable type: 'list'");
}

#[test]
fn builtin_errors_are_catchable() {
    let out = run(r#"try { print(1 / 0) } catch (e) { print(e) }"#);
    assert_eq!(out, "integer division or modulo by zero\n");
}

#[test]
fn errors_propagate_out_of_nested_calls_to_the_nearest_catch() {
    let out = run(
        r#"fn inner() { print(missing) }
           fn outer() { inner() }
           try { outer() } catch (e) { print(e) }"#,
    );
    assert_eq!(out, "Variable 'missing' is not defined.\n");
}

#[test]
fn errors_in_the_catch_block_propagate() {
    let err = run_err("try { print(1 / 0) } catch (e) { print(also_missing) }");
    assert_eq!(err.exc_type(), ExcType::NameError);
}

#[test]
fn syntax_errors_surface_from_the_parser() {
    let err = Runner::new("fn {", "test.gg").unwrap_err();
    assert!(matches!(err, ParseError::UnexpectedToken { .. }));
}

#[test]
fn exception_display_includes_the_kind() {
    let err = run_err("print(missing)");
    assert_eq!(
        err.to_string(),
        "NameError: Variable 'missing' is not defined."
    );
}
