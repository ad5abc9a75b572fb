//! Integration tests for end-to-end compilation.
//!
//! These tests verify that the complete pipeline works correctly from an
//! untyped AST through type checking and code generation, and that the
//! generated instructions behave as expected on the reference machine.

use std::rc::Rc;

use stackpy::{
    ast::{
        ast::Program,
        expressions::{BinaryOp, Expr, UnaryOp},
        statements::{Parameter, Stmt},
        types::Type,
    },
    compile_program,
    compiler::instructions::InstructionSequence,
    errors::errors::{ErrorImpl, ErrorKind},
    render_error,
    type_checker::type_checker::type_check,
    vm::machine::Machine,
    Span,
};

fn run(body: Vec<Stmt>) -> Machine {
    let instructions = compile_program(Program::new(body)).unwrap();
    let mut machine = Machine::with_stdout_capture();
    machine.run(&instructions).unwrap();
    machine
}

fn compile_err(body: Vec<Stmt>) -> ErrorKind {
    compile_program(Program::new(body)).unwrap_err().kind()
}

#[test]
fn test_declare_and_increment() {
    let body = vec![
        Stmt::var_decl("x", Type::Int, Expr::number(1)),
        Stmt::assign("x", Expr::binary(BinaryOp::Plus, Expr::name("x"), Expr::number(1))),
    ];

    let typed = type_check(Program::new(body.clone())).unwrap();
    assert!(typed.expression_types().iter().all(|ty| *ty == Some(Type::Int)));

    let instructions = compile_program(Program::new(body.clone())).unwrap();
    assert_eq!(
        instructions.to_string(),
        "local-declare(x)\npush-constant(1)\nstore-local(x)\nload-local(x)\npush-constant(1)\nadd\nstore-local(x)\n"
    );

    assert_eq!(run(body).local("x"), Some(2));
}

#[test]
fn test_function_call_and_missing_return() {
    let add = Stmt::function(
        "f",
        vec![Parameter::new("a", Type::Int), Parameter::new("b", Type::Int)],
        Type::Int,
        vec![Stmt::ret(Expr::binary(BinaryOp::Plus, Expr::name("a"), Expr::name("b")))],
    );
    let typed = type_check(Program::new(vec![
        add,
        Stmt::expr(Expr::call("f", vec![Expr::number(1), Expr::number(2)])),
    ]))
    .unwrap();
    assert_eq!(typed.expression_types().last(), Some(&Some(Type::Int)));

    let error = compile_program(Program::new(vec![Stmt::function(
        "f",
        vec![Parameter::new("a", Type::Int)],
        Type::Int,
        vec![Stmt::pass()],
    )]))
    .unwrap_err();
    assert_eq!(
        error.get_impl(),
        &ErrorImpl::MissingReturn {
            function: String::from("f"),
        }
    );
}

#[test]
fn test_reassignment_with_other_type() {
    let error = compile_program(Program::new(vec![
        Stmt::var_decl("y", Type::Int, Expr::number(1)),
        Stmt::assign("y", Expr::boolean(true)),
    ]))
    .unwrap_err();

    assert_eq!(
        error.get_impl(),
        &ErrorImpl::TypeMismatch {
            expected: String::from("int"),
            received: String::from("bool"),
        }
    );
}

#[test]
fn test_same_scope_redeclaration() {
    assert_eq!(
        compile_err(vec![
            Stmt::var_decl("z", Type::Int, Expr::number(1)),
            Stmt::var_decl("z", Type::Int, Expr::number(2)),
        ]),
        ErrorKind::DuplicateDefinition
    );
}

#[test]
fn test_declaration_after_loop() {
    assert_eq!(
        compile_err(vec![
            Stmt::var_decl("x", Type::Int, Expr::number(1)),
            Stmt::while_loop(Expr::boolean(true), vec![Stmt::pass()]),
            Stmt::var_decl("y", Type::Int, Expr::number(2)),
        ]),
        ErrorKind::DefinitionOrderError
    );
}

#[test]
fn test_unary_operand_types() {
    assert_eq!(
        compile_err(vec![Stmt::expr(Expr::unary(UnaryOp::Not, Expr::number(1)))]),
        ErrorKind::TypeMismatch
    );
    assert_eq!(
        compile_err(vec![Stmt::expr(Expr::unary(UnaryOp::Neg, Expr::boolean(true)))]),
        ErrorKind::TypeMismatch
    );
}

#[test]
fn test_checked_but_not_lowered() {
    assert_eq!(
        compile_err(vec![Stmt::expr(Expr::binary(BinaryOp::Mod, Expr::number(7), Expr::number(2)))]),
        ErrorKind::UnsupportedOperation
    );
}

#[test]
fn test_print_runs_on_machine() {
    let machine = run(vec![
        Stmt::var_decl("total", Type::Int, Expr::number(5)),
        Stmt::assign(
            "total",
            Expr::binary(BinaryOp::Mul, Expr::name("total"), Expr::unary(UnaryOp::Neg, Expr::number(3))),
        ),
        Stmt::expr(Expr::call("print", vec![Expr::name("total")])),
        Stmt::expr(Expr::call("print", vec![Expr::boolean(true)])),
    ]);

    assert_eq!(machine.printed(), vec![-15, 1]);
    assert_eq!(machine.local("total"), Some(-15));
}

#[test]
fn test_listing_survives_text_form() {
    let instructions = compile_program(Program::new(vec![
        Stmt::var_decl("a", Type::Int, Expr::number(40)),
        Stmt::expr(Expr::call(
            "print",
            vec![Expr::binary(BinaryOp::Plus, Expr::name("a"), Expr::number(2))],
        )),
    ]))
    .unwrap();

    let reread: InstructionSequence = instructions.to_string().parse().unwrap();
    let mut machine = Machine::with_stdout_capture();
    machine.run(&reread).unwrap();

    assert_eq!(machine.printed(), vec![42]);
}

#[test]
fn test_error_rendering_points_at_node() {
    let source = "x: int = 1\ny = x\n";
    let file = Rc::new(String::from("main.py"));

    let error = compile_program(Program::new(vec![
        Stmt::var_decl("x", Type::Int, Expr::number(1).with_span(Span::from_offsets(9, 10, &file)))
            .with_span(Span::from_offsets(0, 10, &file)),
        Stmt::assign_to(
            Expr::name("y").with_span(Span::from_offsets(11, 12, &file)),
            Expr::name("x").with_span(Span::from_offsets(15, 16, &file)),
        )
        .with_span(Span::from_offsets(11, 16, &file)),
    ]))
    .unwrap_err();

    assert_eq!(error.get_position().0, 11);

    let rendered = render_error(&error, source, "main.py");
    assert!(rendered.starts_with("Error: NameError (`y` is not defined)"));
    assert!(rendered.contains("y = x"));
    assert!(rendered.contains("main.py"));
}
