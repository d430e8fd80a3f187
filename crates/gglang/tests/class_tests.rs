//! Class declaration, instantiation, inheritance, and `super` dispatch.

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
fn super_calls_the_parent_method() {
    let out = run(
        r#"class A { fn greet() { print("A") } }
           class B(A) { fn greet() { super.greet(); print("B") } }
           fn main(): int { var b = B(); b.greet(); return 0 }"#,
    );
    assert_eq!(out, "A\nB\n");
}

#[test]
fn initialize_runs_with_constructor_arguments() {
    let out = run(
        "class Point {
             fn initialize(x: int, y: int) { @x = x; @y = y }
             fn sum(): int { return @x + @y }
         }
         fn main(): int { var p = Point(2, 3); print(p.sum()); return 0 }",
    );
    assert_eq!(out, "5\n");
}

#[test]
fn instantiation_returns_the_instance_regardless_of_initializer_result() {
    let out = run(
        "class P { fn initialize() { return 5 } }
         fn main(): int { var p = P(); print(type(p)); return 0 }",
    );
    assert_eq!(out, "Instance\n");
}

#[test]
fn methods_resolve_through_the_ancestor_chain() {
    let out = run(
        r#"class A { fn m() { print("A.m") } }
           class B(A) { }
           class C(B) { }
           fn main(): int { var c = C(); c.m(); return 0 }"#,
    );
    assert_eq!(out, "A.m\n");
}

#[test]
fn inherited_method_sees_the_concrete_instance() {
    let out = run(
        r#"class A { fn describe() { print(@name) } }
           class B(A) {
               fn initialize() { @name = "b" }
           }
           fn main(): int { var b = B(); b.describe(); return 0 }"#,
    );
    assert_eq!(out, "b\n");
}

#[test]
fn super_resolves_above_the_instance_class() {
    let out = run(
        r#"class A { fn greet() { print("A") } }
           class B(A) { fn greet() { print("B") } }
           class C(B) { fn greet() { super.greet(); print("C") } }
           fn main(): int { var c = C(); c.greet(); return 0 }"#,
    );
    assert_eq!(out, "B\nC\n");
}

#[test]
fn fields_are_readable_and_writable_from_outside() {
    let out = run(
        "class Box { fn initialize() { @v = 1 } }
         fn main(): int {
             var b = Box()
             print(b.v)
             b.v = 7
             print(b.v)
             b.v += 1
             print(b.v)
             return 0
         }",
    );
    assert_eq!(out, "1\n7\n8\n");
}

#[test]
fn typed_instance_variable_declarations_check_primitives() {
    let out = run(
        "class C {
             fn initialize() { @count: int = 0; @count += 2 }
             fn total(): int { return @count }
         }
         fn main(): int { print(C().total()); return 0 }",
    );
    assert_eq!(out, "2\n");

    let err = run_err(
        r#"class C { fn initialize() { @count: int = "x" } }
           fn main(): int { C(); return 0 }"#,
    );
    assert_eq!(err.exc_type(), ExcType::TypeError);
}

#[test]
fn instance_constants_bind_like_fields() {
    let out = run(
        "class C {
             fn initialize() { const @limit = 9 }
             fn read_limit(): int { return @limit }
         }
         fn main(): int { print(C().read_limit()); return 0 }",
    );
    assert_eq!(out, "9\n");
}

#[test]
fn bound_methods_are_first_class() {
    let out = run(
        r#"class Greeter {
               fn initialize(name: str) { @name = name }
               fn greet() { print(i"hi #{@name}") }
           }
           fn main(): int {
               var m = Greeter("ada").greet
               m()
               return 0
           }"#,
    );
    assert_eq!(out, "hi ada\n");
}

#[test]
fn fields_shadow_methods_in_property_lookup() {
    let out = run(
        r#"class C {
               fn initialize() { @tag = "field" }
               fn tag(): str { return "method" }
           }
           fn main(): int { print(C().tag); return 0 }"#,
    );
    assert_eq!(out, "field\n");
}

#[test]
fn superclass_must_be_a_class() {
    let err = run_err("var NotAClass = 3 class C(NotAClass) { }");
    assert_eq!(err.exc_type(), ExcType::TypeError);
    assert!(err.message().starts_with("Superclass must be a class."));
}

#[test]
fn undefined_property_is_a_name_error() {
    let err = run_err("class C { } var c = C() print(c.missing)");
    assert_eq!(err.exc_type(), ExcType::NameError);
    assert_eq!(err.message(), "Undefined property 'missing'.");
}

#[test]
fn super_without_method_is_a_name_error() {
    let err = run_err(
        "class A { }
         class B(A) { fn m() { super.m() } }
         fn main(): int { B().m(); return 0 }",
    );
    assert_eq!(err.exc_type(), ExcType::NameError);
    assert_eq!(err.message(), "Undefined method 'm' on super.");
}
