//! End-to-end tests driving whole programs through the public `Runner` API.

use gglang::{CollectStringPrint, Exception, QueuedInput, Runner};
use pretty_assertions::assert_eq;

fn run(code: &str) -> String {
    let runner = Runner::new(code, "test.gg").unwrap();
    let mut print = CollectStringPrint::new();
    let mut input = QueuedInput::default();
    runner.run(&mut print, &mut input).unwrap();
    print.into_output()
}

fn run_with_input(code: &str, lines: &[&str]) -> String {
    let runner = Runner::new(code, "test.gg").unwrap();
    let mut print = CollectStringPrint::new();
    let mut input = QueuedInput::new(lines.iter().copied());
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
fn arithmetic_precedence() {
    let out = run("fn main(): int { var x = 10 + 2 * 3; print(x); return 0 }");
    assert_eq!(out, "16\n");
}

#[test]
fn pipeline_with_repetition() {
    let out = run(
        "fn double(n: int): int { return n * 2 } \
         fn main(): int { var y = 3 --> double ×3; print(y); return 0 }",
    );
    assert_eq!(out, "24\n");
}

#[test]
fn coercion_pipe_converts_to_parameter_type() {
    let out = run(
        r#"fn plus_one(n: int): int { return n + 1 } fn main(): int { var r = "5" ~~> plus_one(_); print(r); return 0 }"#,
    );
    assert_eq!(out, "6\n");
}

#[test]
fn try_catch_binds_the_message() {
    let out =
        run(r#"fn main(): int { try { assert(1 == 2, "nope") } catch (e) { print(e) }; return 0 }"#);
    assert_eq!(out, "nope\n");
}

#[test]
fn list_builtins_mutate_in_place() {
    let out = run(
        "fn main(): int { var xs = [1,2,3]; append(xs, 4); print(len(xs)); print(pop(xs, 0)); print(xs); return 0 }",
    );
    assert_eq!(out, "4\n1\n[2, 3, 4]\n");
}

#[test]
fn top_level_statements_run_without_main() {
    assert_eq!(run(r#"print("hi")"#), "hi\n");
}

#[test]
fn non_function_main_is_ignored() {
    assert_eq!(run("var main = 3"), "");
}

#[test]
fn integer_division_floors() {
    assert_eq!(run("print(7 / 2) print(-7 / 2) print(7 / -2)"), "3\n-4\n-4\n");
}

#[test]
fn mixed_division_is_float() {
    assert_eq!(run("print(7 / 2.0)"), "3.5\n");
}

#[test]
fn interpolated_strings_evaluate_nested_expressions() {
    let out = run(r#"fn main(): int { var a = 2; var b = 3; print(i"sum #{a + b * 2}!"); return 0 }"#);
    assert_eq!(out, "sum 8!\n");
}

#[test]
fn interpolation_stringifies_like_str() {
    let out = run(r#"print(i"v=#{[1, 2]} f=#{1.5} b=#{1 == 1}")"#);
    assert_eq!(out, "v=[1, 2] f=1.5 b=True\n");
}

#[test]
fn dict_preserves_insertion_order() {
    let out = run(
        r#"var d = {"b": 1, "a": 2}
           d["c"] = 3
           for k in d { print(k) }
           print(d["a"])
           print(len(d))
           print(d)"#,
    );
    assert_eq!(out, "b\na\nc\n2\n3\n{'b': 1, 'a': 2, 'c': 3}\n");
}

#[test]
fn for_iterates_over_a_snapshot() {
    let out = run(
        "var xs = [1, 2, 3]
         for x in xs { append(xs, x) }
         print(xs)",
    );
    assert_eq!(out, "[1, 2, 3, 1, 2, 3]\n");
}

#[test]
fn for_iterates_string_characters() {
    assert_eq!(run(r#"for c in "ab" { print(c) }"#), "a\nb\n");
}

#[test]
fn string_methods_are_bound_callables() {
    let out = run(r#"print("abc".upper()) print("AbC".lower()) var f = "x".upper print(f())"#);
    assert_eq!(out, "ABC\nabc\nX\n");
}

#[test]
fn input_reads_queued_lines_after_prompt() {
    let out = run_with_input(
        r#"fn main(): int { var name = input("who? "); print(i"hi #{name}"); return 0 }"#,
        &["ada"],
    );
    assert_eq!(out, "who? hi ada\n");
}

#[test]
fn ternary_picks_by_truthiness() {
    let out = run(r#"print(1 > 2 ? "y" : "n") print([] ? "y" : "n") print([0] ? "y" : "n")"#);
    assert_eq!(out, "n\nn\ny\n");
}

#[test]
fn compound_assignment_reuses_operator_semantics() {
    let out = run(
        "var x = 10
         x /= 4
         print(x)
         var xs = [1, 2]
         xs[0] += 5
         print(xs)",
    );
    assert_eq!(out, "2\n[6, 2]\n");
}

#[test]
fn lists_alias_on_assignment() {
    let out = run(
        "var a = [1]
         var b = a
         append(b, 2)
         print(a)",
    );
    assert_eq!(out, "[1, 2]\n");
}

#[test]
fn redeclaration_is_permitted() {
    assert_eq!(run(r#"var x = 1 var x = "s" print(x)"#), "s\n");
}

#[test]
fn functions_close_over_their_defining_environment() {
    let out = run(
        "var n = 5
         fn show() { print(n) }
         fn main(): int { n = 6; show(); return 0 }",
    );
    assert_eq!(out, "6\n");
}

#[test]
fn declared_then_assigned_variable_reads_back() {
    assert_eq!(run("var x: int x = 5 print(x)"), "5\n");
}

#[test]
fn bare_return_yields_none() {
    assert_eq!(run("fn f() { return } print(f())"), "None\n");
}

#[test]
fn fallthrough_yields_none() {
    assert_eq!(run("fn f() { } print(f())"), "None\n");
}

#[test]
fn print_joins_arguments_with_spaces() {
    assert_eq!(run(r#"print(1, "a", [1, "b"])"#), "1 a [1, 'b']\n");
}

#[test]
fn const_declarations_bind_like_vars() {
    assert_eq!(run("const limit = 10 print(limit)"), "10\n");
}

#[test]
fn reference_capture_evaluates_plainly() {
    assert_eq!(run("var x = 3 var y = &x print(y)"), "3\n");
}

#[test]
fn equality_promotes_between_int_and_float() {
    assert_eq!(run("print(1 == 1.0) print(1 == 2.0)"), "True\nFalse\n");
}

#[test]
fn runner_is_reusable() {
    let runner = Runner::new("print(1 + 2)", "test.gg").unwrap();
    for _ in 0..2 {
        let mut print = CollectStringPrint::new();
        let mut input = QueuedInput::default();
        runner.run(&mut print, &mut input).unwrap();
        assert_eq!(print.output(), "3\n");
    }
}

#[test]
fn return_propagates_through_try_catch() {
    let out = run(
        "fn f(): int { try { return 1 } catch (e) { return 2 } }
         fn main(): int { print(f()); return 0 }",
    );
    assert_eq!(out, "1\n");
}

#[test]
fn exhausted_input_surfaces_as_runtime_error() {
    let err = run_err("fn main(): int { input(); return 0 }");
    assert_eq!(err.exc_type(), gglang::ExcType::RuntimeError);
}
