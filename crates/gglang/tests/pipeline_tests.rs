//! Pipeline laws: step execution, modifier algebra, typed targets, and the
//! coercion pipe.

use gglang::{CollectStringPrint, ExcType, Exception, QueuedInput, Runner};
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
fn placeholder_receives_the_piped_value() {
    assert_eq!(run("print(5 --> _ + 1)"), "6\n");
}

#[test]
fn steps_without_placeholder_replace_the_value() {
    assert_eq!(run("print(5 --> 7)"), "7\n");
}

#[test]
fn chained_steps_thread_left_to_right() {
    let out = run(
        "fn double(n: int): int { return n * 2 }
         print(2 --> double --> double --> _ + 1)",
    );
    assert_eq!(out, "9\n");
}

#[test]
fn repetition_applies_the_step_n_times() {
    let out = run(
        "fn inc(n: int): int { return n + 1 }
         print(0 --> inc ×4)",
    );
    assert_eq!(out, "4\n");
}

#[test]
fn falsy_condition_passes_the_value_through() {
    let out = run(
        "fn inc(n: int): int { return n + 1 }
         print(5 --> inc ?_ > 10)
         print(20 --> inc ?_ > 10)",
    );
    assert_eq!(out, "5\n21\n");
}

#[test]
fn condition_is_evaluated_once_for_repeated_steps() {
    let out = run(
        r#"fn check(n: int): bool { print("checked"); return n > 0 }
           fn inc(n: int): int { return n + 1 }
           print(1 --> inc ×3 ?check(_))"#,
    );
    assert_eq!(out, "checked\n4\n");
}

#[test]
fn only_the_first_repetition_modifier_is_honored() {
    let out = run(
        "fn inc(n: int): int { return n + 1 }
         print(0 --> inc ×2 ×5)",
    );
    assert_eq!(out, "2\n");
}

#[test]
fn typed_target_binds_and_passes_through() {
    let out = run(
        "fn main(): int {
             var result = 3 --> total: int --> _ + total
             print(result)
             print(total)
             return 0
         }",
    );
    assert_eq!(out, "6\n3\n");
}

#[test]
fn assignment_pipe_defines_in_the_current_environment() {
    assert_eq!(run("7 |> x: int print(x)"), "7\n");
    assert_eq!(run("3 + 4 |> y print(y)"), "7\n");
}

#[test]
fn placeholder_does_not_leak_out_of_the_pipeline() {
    let out = run_err("5 --> _ + 1 print(_)");
    assert_eq!(out.exc_type(), ExcType::NameError);
}

#[test]
fn coercion_pipe_equals_explicit_coercion() {
    let out = run(
        r#"fn f(n: int): int { return n + 1 }
           print("41" ~~> f(_))
           print(f(int("41")))"#,
    );
    assert_eq!(out, "42\n42\n");
}

#[test]
fn coercion_pipe_reads_the_placeholder_position() {
    let out = run(
        r##"fn join(prefix: str, n: float): str { return i"#{prefix}#{n}" }
           print("2.5" ~~> join("v=", _))"##,
    );
    assert_eq!(out, "v=2.5\n");
}

#[test]
fn coercion_pipe_without_placeholder_acts_like_a_plain_pipe() {
    let out = run(
        r#"fn five(): int { return 5 }
           print("x" ~~> five())"#,
    );
    assert_eq!(out, "5\n");
}

#[test]
fn coercion_pipe_requires_a_call() {
    let err = run_err(r#"fn f(n: int): int { return n } var x = "1" ~~> 5"#);
    assert_eq!(err.exc_type(), ExcType::TypeError);
}

#[test]
fn coercion_pipe_requires_a_user_function() {
    let err = run_err(r#"var x = "1" ~~> print(_)"#);
    assert_eq!(err.exc_type(), ExcType::TypeError);
}

#[test]
fn unconvertible_values_fail_with_coercion_error() {
    let err = run_err(r#"fn f(n: int): int { return n } var x = "abc" ~~> f(_)"#);
    assert_eq!(err.exc_type(), ExcType::CoercionError);
    assert_eq!(
        err.message(),
        "Could not coerce value 'abc' to type 'int'."
    );
}

#[test]
fn unknown_coercion_type_is_a_type_error() {
    let err = run_err(r#"fn f(n: Widget): int { return 1 } var x = "1" ~~> f(_)"#);
    assert_eq!(err.exc_type(), ExcType::TypeError);
    assert_eq!(err.message(), "Unknown type 'Widget' for coercion.");
}

#[test]
fn class_types_cannot_coerce() {
    let err = run_err(
        r#"class Widget { }
           fn f(n: Widget): int { return 1 }
           var x = "1" ~~> f(_)"#,
    );
    assert_eq!(err.exc_type(), ExcType::CoercionError);
}
