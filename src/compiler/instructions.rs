//! Stack machine instruction vocabulary and its textual listing.
//!
//! A listing holds one instruction per line, e.g.
//!
//! ```text
//! local-declare(x)
//! push-constant(1)
//! store-local(x)
//! ```

use std::{fmt::Display, rc::Rc, str::FromStr};

use lazy_static::lazy_static;
use regex::{Captures, Regex};

use crate::{
    errors::errors::{Error, ErrorImpl},
    Position, MK_NAMED_HANDLER, MK_PLAIN_HANDLER,
};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Instruction {
    LocalDeclare(String),
    PushConstant(i32),
    LoadLocal(String),
    StoreLocal(String),
    Add,
    Sub,
    Mul,
    /// Calls a host-linked built-in by name.
    Call(String),
}

impl Display for Instruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Instruction::LocalDeclare(name) => write!(f, "local-declare({})", name),
            Instruction::PushConstant(value) => write!(f, "push-constant({})", value),
            Instruction::LoadLocal(name) => write!(f, "load-local({})", name),
            Instruction::StoreLocal(name) => write!(f, "store-local({})", name),
            Instruction::Add => write!(f, "add"),
            Instruction::Sub => write!(f, "sub"),
            Instruction::Mul => write!(f, "mul"),
            Instruction::Call(name) => write!(f, "call({})", name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InstructionSequence {
    pub instructions: Vec<Instruction>,
}

impl InstructionSequence {
    pub fn new(instructions: Vec<Instruction>) -> Self {
        InstructionSequence { instructions }
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Instruction> {
        self.instructions.iter()
    }

    /// Names of every `local-declare`, in order.
    pub fn declared_locals(&self) -> Vec<&str> {
        self.instructions
            .iter()
            .filter_map(|instruction| match instruction {
                Instruction::LocalDeclare(name) => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl<'a> IntoIterator for &'a InstructionSequence {
    type Item = &'a Instruction;
    type IntoIter = std::slice::Iter<'a, Instruction>;

    fn into_iter(self) -> Self::IntoIter {
        self.instructions.iter()
    }
}

impl Display for InstructionSequence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for instruction in self.instructions.iter() {
            writeln!(f, "{}", instruction)?;
        }
        Ok(())
    }
}

/// Builds an instruction from the captures of a whole-line match.
/// `None` means the line matched but its operand is out of range.
pub type ListingHandler = fn(&Captures) -> Option<Instruction>;

pub struct ListingPattern {
    regex: Regex,
    handler: ListingHandler,
}

lazy_static! {
    static ref LISTING_PATTERNS: Vec<ListingPattern> = vec![
        ListingPattern { regex: Regex::new(r"^local-declare\(([^()\s]+)\)$").unwrap(), handler: MK_NAMED_HANDLER!(Instruction::LocalDeclare) },
        ListingPattern { regex: Regex::new(r"^push-constant\((-?[0-9]+)\)$").unwrap(), handler: constant_handler },
        ListingPattern { regex: Regex::new(r"^load-local\(([^()\s]+)\)$").unwrap(), handler: MK_NAMED_HANDLER!(Instruction::LoadLocal) },
        ListingPattern { regex: Regex::new(r"^store-local\(([^()\s]+)\)$").unwrap(), handler: MK_NAMED_HANDLER!(Instruction::StoreLocal) },
        ListingPattern { regex: Regex::new(r"^add$").unwrap(), handler: MK_PLAIN_HANDLER!(Instruction::Add) },
        ListingPattern { regex: Regex::new(r"^sub$").unwrap(), handler: MK_PLAIN_HANDLER!(Instruction::Sub) },
        ListingPattern { regex: Regex::new(r"^mul$").unwrap(), handler: MK_PLAIN_HANDLER!(Instruction::Mul) },
        ListingPattern { regex: Regex::new(r"^call\(([^()\s]+)\)$").unwrap(), handler: MK_NAMED_HANDLER!(Instruction::Call) },
    ];
}

fn constant_handler(captures: &Captures) -> Option<Instruction> {
    captures[1].parse::<i32>().ok().map(Instruction::PushConstant)
}

/// Reads a single trimmed, non-empty listing line.
pub fn parse_instruction(line: &str) -> Option<Instruction> {
    LISTING_PATTERNS.iter().find_map(|pattern| {
        pattern
            .regex
            .captures(line)
            .and_then(|captures| (pattern.handler)(&captures))
    })
}

impl FromStr for InstructionSequence {
    type Err = Error;

    fn from_str(listing: &str) -> Result<Self, Self::Err> {
        let file = Rc::new(String::from("listing"));
        let mut instructions = vec![];
        let mut offset = 0;

        for raw_line in listing.split('\n') {
            let line = raw_line.trim();

            if !line.is_empty() {
                let Some(instruction) = parse_instruction(line) else {
                    return Err(Error::new(
                        ErrorImpl::MalformedInstruction {
                            line: line.to_string(),
                        },
                        Position(offset as u32, Rc::clone(&file)),
                    ));
                };
                instructions.push(instruction);
            }

            offset += raw_line.len() + 1;
        }

        Ok(InstructionSequence { instructions })
    }
}
