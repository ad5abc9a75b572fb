//! Main compiler module.
//!
//! This module contains the core Compiler structure and drives lowering from
//! the typed AST to a flat stack machine instruction sequence. It owns the
//! local slot table and the instruction buffer.

use std::collections::HashSet;

use log::debug;

use crate::{
    ast::{expressions::ExprKind, statements::Stmt},
    errors::errors::{Error, ErrorImpl},
    type_checker::typed_ast::TypedProgram,
    Position,
};

use super::{
    instructions::{Instruction, InstructionSequence},
    stmt::gen_statement,
};

/// Settings for a single generation run.
#[derive(Debug, Clone, PartialEq)]
pub struct CompilerOptions {
    /// Slot receiving the discarded value of an expression statement.
    /// It should not be a valid source identifier.
    pub scratch_slot: String,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        CompilerOptions {
            scratch_slot: String::from("$last"),
        }
    }
}

/// The state of one lowering pass.
///
/// Slots are function-flat: every variable name declared or assigned anywhere
/// in the block gets exactly one slot, declared once at the head of the output.
pub struct Compiler {
    pub options: CompilerOptions,

    /// Allocated slot names in declaration order
    pub slots: Vec<String>,
    slot_names: HashSet<String>,

    /// The instructions emitted so far
    pub instructions: Vec<Instruction>,
}

impl Compiler {
    pub fn new(options: CompilerOptions) -> Self {
        Compiler {
            options,
            slots: vec![],
            slot_names: HashSet::new(),
            instructions: vec![],
        }
    }

    pub fn emit(&mut self, instruction: Instruction) {
        self.instructions.push(instruction);
    }

    pub fn scratch_slot(&self) -> &str {
        &self.options.scratch_slot
    }

    /// Resolves a variable name to its slot.
    ///
    /// A checked program never reaches the error case.
    pub fn slot_of(&self, name: &str, position: &Position) -> Result<String, Error> {
        if self.slot_names.contains(name) {
            Ok(name.to_string())
        } else {
            Err(Error::new(
                ErrorImpl::UnboundLocal {
                    name: name.to_string(),
                },
                position.clone(),
            ))
        }
    }

    fn allocate(&mut self, name: &str) {
        if self.slot_names.insert(name.to_string()) {
            self.slots.push(name.to_string());
        }
    }

    /// Allocates every slot the block needs and emits their declarations.
    fn declare_slots(&mut self, body: &[Stmt]) {
        let mut needs_scratch = false;
        collect_slots(self, body, &mut needs_scratch);

        if needs_scratch {
            let scratch = self.options.scratch_slot.clone();
            self.allocate(&scratch);
        }

        debug!("allocated {} local slots: {:?}", self.slots.len(), self.slots);

        for slot in self.slots.clone() {
            self.emit(Instruction::LocalDeclare(slot));
        }
    }

    /// Lowers a whole program. Nothing is returned unless every statement lowers.
    pub fn compile(mut self, program: &TypedProgram) -> Result<InstructionSequence, Error> {
        debug!("generating code for {} top-level statements", program.body().len());

        self.declare_slots(program.body());

        for statement in program.body() {
            gen_statement(&mut self, statement)?;
        }

        debug!("generated {} instructions", self.instructions.len());
        Ok(InstructionSequence::new(self.instructions))
    }
}

/// Walks a block in program order, allocating declaration and assignment
/// targets. Branch and loop bodies share the enclosing block's slots; function
/// and class bodies do not.
fn collect_slots(compiler: &mut Compiler, body: &[Stmt], needs_scratch: &mut bool) {
    for stmt in body {
        match stmt {
            Stmt::VarDecl(var_decl) => compiler.allocate(&var_decl.identifier),
            Stmt::Assign(assign) => {
                if let ExprKind::Name(name) = &assign.target.kind {
                    compiler.allocate(name);
                }
            }
            Stmt::Expression(_) => *needs_scratch = true,
            Stmt::If(if_stmt) => {
                collect_slots(compiler, &if_stmt.then_body, needs_scratch);
                for clause in if_stmt.elif_clauses.iter() {
                    collect_slots(compiler, &clause.body, needs_scratch);
                }
                collect_slots(compiler, &if_stmt.else_body, needs_scratch);
            }
            Stmt::While(while_stmt) => collect_slots(compiler, &while_stmt.body, needs_scratch),
            Stmt::FnDef(_) | Stmt::ClassDef(_) | Stmt::Pass(_) | Stmt::Return(_) => {}
        }
    }
}

/// Lowers a checked program with the default options.
pub fn generate(program: &TypedProgram) -> Result<InstructionSequence, Error> {
    Compiler::new(CompilerOptions::default()).compile(program)
}
