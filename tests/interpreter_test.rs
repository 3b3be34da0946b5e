use std::{cell::RefCell, rc::Rc};

use pretty_assertions::assert_eq;

use imperative::{
    interpreter::{Interpreter, RuntimeError},
    parser, scanner,
    session::Session,
};

fn run_program(source: &str) -> Result<String, RuntimeError> {
    let session = Session::new();
    run_in_session(&session, source)
}

fn run_in_session(session: &Session, source: &str) -> Result<String, RuntimeError> {
    let (tokens, scan_errors) = scanner::scan(source);
    assert!(scan_errors.is_empty(), "scan errors: {:?}", scan_errors);
    let program = parser::parse(session, &tokens).expect("program should parse");

    let output = Rc::new(RefCell::new(Vec::new()));
    let mut interpreter = Interpreter::new(session, output.clone());
    interpreter.interpret(&program)?;

    let output = String::from_utf8(output.take()).expect("output should be valid UTF-8");
    Ok(output)
}

fn assert_prints(source: &str, expected: &str) {
    assert_eq!(
        run_program(source).expect("program should run"),
        expected,
        "source: {source}"
    );
}

fn runtime_error(source: &str) -> RuntimeError {
    run_program(source).expect_err("program should fail at runtime")
}

#[test]
fn test_integer_arithmetic() {
    assert_prints("print 1 + 2;", "3\n");
    assert_prints("print 7 - 10;", "-3\n");
    assert_prints("print 6 * 7;", "42\n");
    assert_prints("print 5 / 2;", "2\n");
    assert_prints("print 7 % 3;", "1\n");
}

#[test]
fn test_real_promotion() {
    assert_prints("print 1 + 2.5;", "3.5\n");
    assert_prints("print 2.5 + 1;", "3.5\n");
    assert_prints("print 5.0 / 2;", "2.5\n");
    assert_prints("print 5 / 2.0;", "2.5\n");
    assert_prints("print 2 < 2.5;", "true\n");
}

#[test]
fn test_non_numeric_operands() {
    assert!(matches!(
        runtime_error("print true + 1;"),
        RuntimeError::NonNumericOperands { line: 1 }
    ));
    assert!(matches!(
        runtime_error("print -false;"),
        RuntimeError::NonNumericOperand { line: 1 }
    ));
}

#[test]
fn test_division_by_zero() {
    assert!(matches!(
        runtime_error("print 1 / 0;"),
        RuntimeError::DivisionByZero { line: 1 }
    ));
    assert!(matches!(
        runtime_error("print 1 % 0;"),
        RuntimeError::DivisionByZero { line: 1 }
    ));
}

#[test]
fn test_equality() {
    assert_prints("print 1 = 1;", "true\n");
    assert_prints("print 1 == 1;", "true\n");
    assert_prints("print 1 /= 2;", "true\n");
    // No cross-kind numeric coercion in equality.
    assert_prints("print 1 = 1.0;", "false\n");
    assert_prints("print true = true;", "true\n");
}

#[test]
fn test_logical_operators() {
    assert_prints("print true and false;", "false\n");
    assert_prints("print false or true;", "true\n");
    assert_prints("print true xor true;", "false\n");
    assert_prints("print true xor false;", "true\n");
    // Short-circuit yields the deciding operand uncoerced.
    assert_prints("print 1 or 2;", "1\n");
    assert_prints("print 1 and 2;", "2\n");
}

#[test]
fn test_short_circuit_skips_right_operand() {
    // `x` is undefined but must never be evaluated.
    assert_prints("print false and x;", "false\n");
    assert_prints("print true or x;", "true\n");
}

#[test]
fn test_truthiness() {
    assert_prints("print not false;", "true\n");
    // Zero is truthy; only nil and false are not.
    assert_prints("print not 0;", "false\n");
    assert_prints("if 0 then print 1; end", "1\n");
}

#[test]
fn test_for_loop_upper_bound_exclusive() {
    assert_prints("for i in 0..3 loop print i; end", "0\n1\n2\n");
}

#[test]
fn test_for_loop_reverse() {
    assert_prints("for i in reverse 3..0 loop print i; end", "3\n2\n1\n");
}

#[test]
fn test_for_loop_empty_ranges() {
    assert_prints("for i in 2..2 loop print i; end print 0;", "0\n");
    assert_prints("for i in reverse 0..3 loop print i; end print 0;", "0\n");
}

#[test]
fn test_for_loop_bounds_evaluated_once() {
    let source = "\
var n is 3;
for i in 0..n loop
    n := 10;
    print i;
end";
    assert_prints(source, "0\n1\n2\n");
}

#[test]
fn test_for_loop_requires_integer_bounds() {
    assert!(matches!(
        runtime_error("for i in 0..1.5 loop print i; end"),
        RuntimeError::NonIntegerRangeBounds { line: 1 }
    ));
}

#[test]
fn test_while_loop() {
    let source = "\
var i is 0;
while i < 3 loop
    print i;
    i := i + 1;
end";
    assert_prints(source, "0\n1\n2\n");
}

#[test]
fn test_if_else() {
    assert_prints("if 1 < 2 then print 1; else print 2; end", "1\n");
    assert_prints("if 1 > 2 then print 1; else print 2; end", "2\n");
    assert_prints("if 1 > 2 then print 1; end print 3;", "3\n");
}

#[test]
fn test_block_scope_is_discarded() {
    let error = runtime_error("loop var a is 1; end print a;");
    assert!(
        matches!(error, RuntimeError::UndefinedVariable { ref name, .. } if name == "a"),
        "{error}"
    );
}

#[test]
fn test_shadowing_and_redeclaration() {
    let source = "\
var x is 1;
loop
    var x is 2;
    print x;
end
print x;";
    assert_prints(source, "2\n1\n");

    assert!(matches!(
        runtime_error("var x is 1; var x is 2;"),
        RuntimeError::AlreadyDeclared { line: 1, .. }
    ));
}

#[test]
fn test_assignment_walks_outward() {
    assert_prints("var x is 1; loop x := 2; end print x;", "2\n");
    assert!(matches!(
        runtime_error("missing := 1;"),
        RuntimeError::UndefinedVariable { line: 1, .. }
    ));
}

#[test]
fn test_var_requires_initializer_or_type_only() {
    // Declared with a type but no initializer starts out null.
    assert_prints("var x : integer; print x;", "<null>\n");
}

#[test]
fn test_routine_call_and_return() {
    let source = "\
routine add(a : integer, b : integer) : integer is
    return a + b;
end
print add(2, 3);";
    assert_prints(source, "5\n");
}

#[test]
fn test_routine_without_return_yields_null() {
    assert_prints("routine noop() is end print noop();", "<null>\n");
}

#[test]
fn test_return_exits_through_nested_blocks() {
    let source = "\
routine f() is
    loop
        return 42;
    end
    print 0;
end
print f();";
    assert_prints(source, "42\n");
}

#[test]
fn test_recursion() {
    let source = "\
routine fib(n) is
    if n <= 1 then return n; end
    return fib(n - 1) + fib(n - 2);
end
for i in 0..10 loop print fib(i); end";
    assert_prints(source, "0\n1\n1\n2\n3\n5\n8\n13\n21\n34\n");
}

#[test]
fn test_arity_is_checked_exactly() {
    let source = "\
routine zero() is end
zero(1);";
    assert!(matches!(
        runtime_error(source),
        RuntimeError::Arity {
            expected: 0,
            got: 1,
            line: 2,
        }
    ));
    assert_prints("routine zero() is end zero(); print 1;", "1\n");
}

#[test]
fn test_call_on_non_callable() {
    assert!(matches!(
        runtime_error("var x is 1; x();"),
        RuntimeError::NotCallable { line: 1 }
    ));
}

#[test]
fn test_routines_do_not_capture_their_declaration_scope() {
    // Routine bodies run in a frame chained to the globals, so a local from
    // the surrounding block is not visible inside the call.
    let source = "\
loop
    var a is 1;
    routine show() is print a; end
    show();
end";
    assert!(matches!(
        runtime_error(source),
        RuntimeError::UndefinedVariable { .. }
    ));
}

#[test]
fn test_top_level_return_is_an_error() {
    assert!(matches!(
        runtime_error("return 1;"),
        RuntimeError::TopLevelReturn { line: 1 }
    ));
}

#[test]
fn test_record_fields() {
    let source = "\
record Point {
    var x is 1;
    var y is 2;
} end
var p is Point();
print p.x;
print p.y;";
    assert_prints(source, "1\n2\n");
}

#[test]
fn test_record_unknown_field() {
    let source = "\
record Point { var x is 1; } end
print Point().z;";
    assert!(matches!(
        runtime_error(source),
        RuntimeError::UndefinedProperty { ref name, line: 2 } if name == "z"
    ));
}

#[test]
fn test_field_access_on_non_record() {
    assert!(matches!(
        runtime_error("var x is 1; print x.field;"),
        RuntimeError::NotARecord { line: 1 }
    ));
}

#[test]
fn test_record_constructor_yields_singleton() {
    // Field initializers run at declaration time; every construction call
    // returns the same pre-built instance.
    let source = "\
var n is 1;
record R { var v is n; } end
n := 2;
print R().v;
print R() = R();";
    assert_prints(source, "1\ntrue\n");
}

#[test]
fn test_array_indexing_is_one_based() {
    assert_prints("array xs [10, 20, 30];\nprint xs[1];\nprint xs[3];", "10\n30\n");
}

#[test]
fn test_array_index_out_of_bounds() {
    assert!(matches!(
        runtime_error("array xs [10, 20, 30];\nprint xs[4];"),
        RuntimeError::IndexOutOfBounds {
            index: 4,
            length: 3,
            line: 2,
        }
    ));
    assert!(matches!(
        runtime_error("array xs [10];\nprint xs[0];"),
        RuntimeError::IndexOutOfBounds { index: 0, .. }
    ));
}

#[test]
fn test_index_on_non_array() {
    assert!(matches!(
        runtime_error("var x is 1; print x[1];"),
        RuntimeError::NotAnArray { line: 1 }
    ));
}

#[test]
fn test_array_members_evaluated_at_declaration() {
    let source = "\
var n is 5;
array xs [n, n + 1];
n := 9;
print xs[2];";
    assert_prints(source, "6\n");
}

#[test]
fn test_type_alias_annotations() {
    let source = "\
type id is integer;
var x : id is 5;
print x;";
    assert_prints(source, "5\n");
}

#[test]
fn test_aliases_persist_across_runs_in_one_session() {
    let session = Session::new();
    run_in_session(&session, "type id is integer;").expect("alias declaration should run");
    assert_eq!(
        run_in_session(&session, "var x : id is 1; print x;").expect("second run should work"),
        "1\n"
    );
}

#[test]
fn test_globals_persist_across_runs_in_one_session() {
    let session = Session::new();
    run_in_session(&session, "routine double(n) is return n * 2; end")
        .expect("declaration should run");
    assert_eq!(
        run_in_session(&session, "print double(21);").expect("call should work"),
        "42\n"
    );
}

#[test]
fn test_runtime_error_rendering() {
    let error = runtime_error("print 1;\nprint true + 1;");
    assert_eq!(error.to_string(), "Operands must be numbers.\n[line 2]");
}

#[test]
fn test_runtime_error_aborts_remaining_statements() {
    let session = Session::new();
    let (tokens, _) = scanner::scan("print 1;\nmissing();\nprint 2;");
    let program = parser::parse(&session, &tokens).expect("program should parse");

    let output = Rc::new(RefCell::new(Vec::new()));
    let mut interpreter = Interpreter::new(&session, output.clone());
    assert!(interpreter.interpret(&program).is_err());
    assert_eq!(String::from_utf8(output.take()).unwrap(), "1\n");
}

#[test]
fn test_assignment_expression_evaluates_to_null() {
    assert_prints("var x is 1; print x := 2;", "<null>\n");
}

#[test]
fn test_clock_builtin() {
    let output = run_program("print clock() > 0;").expect("clock should be defined");
    assert_eq!(output, "true\n");
}
