//! Reference interpreter for generated instruction sequences.
//!
//! The machine keeps named local slots and one operand stack of `i32`.
//! Arithmetic wraps on overflow. Built-ins are host functions linked by name.

use std::{cell::RefCell, collections::HashMap, rc::Rc};

use log::{debug, trace};

use crate::{
    compiler::{
        instructions::{Instruction, InstructionSequence},
        stdlib::lookup_builtin,
    },
    errors::errors::{Error, ErrorImpl},
    Position,
};

/// A host function callable through `call(name)`.
///
/// Arguments arrive in push order; the returned value is pushed back.
pub trait HostFn: 'static {
    fn call(&mut self, args: &[i32]) -> i32;
}

impl<F> HostFn for F
where
    F: FnMut(&[i32]) -> i32 + 'static,
{
    fn call(&mut self, args: &[i32]) -> i32 {
        self(args)
    }
}

struct LinkedFn {
    arity: usize,
    function: Box<dyn HostFn>,
}

#[derive(Default)]
pub struct Machine {
    locals: HashMap<String, i32>,
    stack: Vec<i32>,
    host_functions: HashMap<String, LinkedFn>,
    printed: Rc<RefCell<Vec<i32>>>,
}

impl Machine {
    /// A machine with `print` linked to standard output.
    pub fn new() -> Self {
        let mut machine = Machine::default();
        machine.link_builtin("print", |args: &[i32]| {
            println!("{}", args[0]);
            0
        });
        machine
    }

    /// A machine whose `print` records values instead of writing them.
    pub fn with_stdout_capture() -> Self {
        let mut machine = Machine::default();
        let printed = Rc::clone(&machine.printed);
        machine.link_builtin("print", move |args: &[i32]| {
            printed.borrow_mut().push(args[0]);
            0
        });
        machine
    }

    /// Links `function` under `name`, replacing any earlier link.
    pub fn link(&mut self, name: &str, arity: usize, function: impl HostFn) {
        self.host_functions.insert(
            name.to_string(),
            LinkedFn {
                arity,
                function: Box::new(function),
            },
        );
    }

    fn link_builtin(&mut self, name: &str, function: impl HostFn) {
        let arity = lookup_builtin(name).map_or(0, |builtin| builtin.arity);
        self.link(name, arity, function);
    }

    /// Values passed to a capturing `print`, in call order.
    pub fn printed(&self) -> Vec<i32> {
        self.printed.borrow().clone()
    }

    pub fn local(&self, name: &str) -> Option<i32> {
        self.locals.get(name).copied()
    }

    pub fn stack(&self) -> &[i32] {
        &self.stack
    }

    pub fn run(&mut self, program: &InstructionSequence) -> Result<(), Error> {
        debug!("running {} instructions", program.len());

        for (index, instruction) in program.iter().enumerate() {
            trace!("{:>4}: {}", index, instruction);
            self.step(index, instruction)?;
        }

        Ok(())
    }

    fn step(&mut self, index: usize, instruction: &Instruction) -> Result<(), Error> {
        match instruction {
            Instruction::LocalDeclare(name) => {
                self.locals.insert(name.clone(), 0);
            }
            Instruction::PushConstant(value) => self.stack.push(*value),
            Instruction::LoadLocal(name) => {
                let value = self.slot(name, index)?;
                self.stack.push(value);
            }
            Instruction::StoreLocal(name) => {
                self.slot(name, index)?;
                let value = self.pop(instruction, index)?;
                self.locals.insert(name.clone(), value);
            }
            Instruction::Add => self.arithmetic(instruction, index, i32::wrapping_add)?,
            Instruction::Sub => self.arithmetic(instruction, index, i32::wrapping_sub)?,
            Instruction::Mul => self.arithmetic(instruction, index, i32::wrapping_mul)?,
            Instruction::Call(name) => {
                let Some(linked) = self.host_functions.get_mut(name) else {
                    return Err(Error::new(
                        ErrorImpl::UnknownFunction { name: name.clone() },
                        at(index),
                    ));
                };

                if self.stack.len() < linked.arity {
                    return Err(underflow(instruction, index));
                }
                let args = self.stack.split_off(self.stack.len() - linked.arity);
                let result = linked.function.call(&args);
                self.stack.push(result);
            }
        }

        Ok(())
    }

    fn arithmetic(&mut self, instruction: &Instruction, index: usize, op: fn(i32, i32) -> i32) -> Result<(), Error> {
        let right = self.pop(instruction, index)?;
        let left = self.pop(instruction, index)?;
        self.stack.push(op(left, right));
        Ok(())
    }

    fn pop(&mut self, instruction: &Instruction, index: usize) -> Result<i32, Error> {
        self.stack.pop().ok_or_else(|| underflow(instruction, index))
    }

    fn slot(&self, name: &str, index: usize) -> Result<i32, Error> {
        self.local(name).ok_or_else(|| {
            Error::new(
                ErrorImpl::UndeclaredLocal {
                    name: name.to_string(),
                },
                at(index),
            )
        })
    }
}

/// Positions of runtime faults are instruction indices.
fn at(index: usize) -> Position {
    Position(index as u32, Rc::new(String::from("listing")))
}

fn underflow(instruction: &Instruction, index: usize) -> Error {
    Error::new(
        ErrorImpl::StackUnderflow {
            instruction: instruction.to_string(),
        },
        at(index),
    )
}
