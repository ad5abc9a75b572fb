//! Property-based tests for the check-then-generate pipeline.
//!
//! Tests the following properties:
//! - arithmetic programs behave the same on the reference machine as under
//!   direct evaluation of the tree with 32-bit wrapping arithmetic
//! - checking an already typed program changes no annotation
//! - generation is deterministic and its listing reads back unchanged

use std::collections::HashMap;

use proptest::prelude::*;
use stackpy::{
    ast::{
        ast::Program,
        expressions::{BinaryOp, Expr, UnaryOp},
        statements::Stmt,
        types::Type,
    },
    compile_program,
    compiler::{compiler::generate, instructions::InstructionSequence},
    type_checker::type_checker::type_check,
    vm::machine::Machine,
};

const VARIABLES: [&str; 3] = ["a", "b", "c"];

// =============================================================================
// Strategies for generating programs
// =============================================================================

#[derive(Debug, Clone)]
enum Arith {
    Number(i32),
    Variable(usize),
    Neg(Box<Arith>),
    Binary(BinaryOp, Box<Arith>, Box<Arith>),
}

#[derive(Debug, Clone)]
enum Action {
    Assign(usize, Arith),
    Print(Arith),
}

fn arb_arith() -> impl Strategy<Value = Arith> {
    let leaf = prop_oneof![
        any::<i32>().prop_map(Arith::Number),
        (0..VARIABLES.len()).prop_map(Arith::Variable),
    ];

    leaf.prop_recursive(4, 24, 2, |inner| {
        prop_oneof![
            inner.clone().prop_map(|operand| Arith::Neg(Box::new(operand))),
            (
                prop_oneof![Just(BinaryOp::Plus), Just(BinaryOp::Minus), Just(BinaryOp::Mul)],
                inner.clone(),
                inner,
            )
                .prop_map(|(op, left, right)| Arith::Binary(op, Box::new(left), Box::new(right))),
        ]
    })
}

fn arb_action() -> impl Strategy<Value = Action> {
    prop_oneof![
        3 => ((0..VARIABLES.len()), arb_arith()).prop_map(|(target, value)| Action::Assign(target, value)),
        1 => arb_arith().prop_map(Action::Print),
    ]
}

fn arb_program() -> impl Strategy<Value = (Vec<i32>, Vec<Action>)> {
    (
        prop::collection::vec(-1000i32..1000i32, VARIABLES.len()),
        prop::collection::vec(arb_action(), 0..8),
    )
}

// =============================================================================
// Building and evaluating trees
// =============================================================================

fn to_expr(arith: &Arith) -> Expr {
    match arith {
        Arith::Number(value) => Expr::number(*value),
        Arith::Variable(index) => Expr::name(VARIABLES[*index]),
        Arith::Neg(operand) => Expr::unary(UnaryOp::Neg, to_expr(operand)),
        Arith::Binary(op, left, right) => Expr::binary(*op, to_expr(left), to_expr(right)),
    }
}

fn build(initial: &[i32], actions: &[Action]) -> Program {
    let mut body: Vec<Stmt> = VARIABLES
        .iter()
        .zip(initial)
        .map(|(name, value)| Stmt::var_decl(name, Type::Int, Expr::number(*value)))
        .collect();

    for action in actions {
        body.push(match action {
            Action::Assign(target, value) => Stmt::assign(VARIABLES[*target], to_expr(value)),
            Action::Print(value) => Stmt::expr(Expr::call("print", vec![to_expr(value)])),
        });
    }

    Program::new(body)
}

fn evaluate(arith: &Arith, env: &HashMap<&str, i32>) -> i32 {
    match arith {
        Arith::Number(value) => *value,
        Arith::Variable(index) => env[VARIABLES[*index]],
        Arith::Neg(operand) => 0i32.wrapping_sub(evaluate(operand, env)),
        Arith::Binary(op, left, right) => {
            let (left, right) = (evaluate(left, env), evaluate(right, env));
            match op {
                BinaryOp::Plus => left.wrapping_add(right),
                BinaryOp::Minus => left.wrapping_sub(right),
                BinaryOp::Mul => left.wrapping_mul(right),
                other => unreachable!("not generated: {}", other),
            }
        }
    }
}

/// Direct evaluation: final variable values and printed values.
fn interpret(initial: &[i32], actions: &[Action]) -> (HashMap<&'static str, i32>, Vec<i32>) {
    let mut env: HashMap<&'static str, i32> = VARIABLES.iter().copied().zip(initial.iter().copied()).collect();
    let mut printed = vec![];

    for action in actions {
        match action {
            Action::Assign(target, value) => {
                let value = evaluate(value, &env);
                env.insert(VARIABLES[*target], value);
            }
            Action::Print(value) => printed.push(evaluate(value, &env)),
        }
    }

    (env, printed)
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Running the generated code matches evaluating the tree.
    #[test]
    fn machine_matches_direct_evaluation((initial, actions) in arb_program()) {
        let instructions = compile_program(build(&initial, &actions)).unwrap();

        let mut machine = Machine::with_stdout_capture();
        machine.run(&instructions).unwrap();

        let (env, printed) = interpret(&initial, &actions);
        for name in VARIABLES {
            prop_assert_eq!(machine.local(name), Some(env[name]));
        }
        prop_assert_eq!(machine.printed(), printed);
        prop_assert!(machine.stack().is_empty());
    }

    /// Re-checking a typed program leaves every annotation as it was.
    #[test]
    fn recheck_is_idempotent((initial, actions) in arb_program()) {
        let typed = type_check(build(&initial, &actions)).unwrap();
        let before = typed.expression_types();

        let rechecked = typed.recheck().unwrap();
        prop_assert_eq!(before, rechecked.expression_types());
    }

    /// Generation is deterministic and its listing reads back to the same sequence.
    #[test]
    fn listing_reads_back((initial, actions) in arb_program()) {
        let typed = type_check(build(&initial, &actions)).unwrap();
        let first = generate(&typed).unwrap();
        let second = generate(&typed).unwrap();
        prop_assert_eq!(&first, &second);

        let reread: InstructionSequence = first.to_string().parse().unwrap();
        prop_assert_eq!(reread, first);
    }
}
