#![allow(clippy::module_inception)]

use std::rc::Rc;

use crate::{
    ast::ast::Program,
    compiler::{compiler::generate, instructions::InstructionSequence},
    errors::errors::{Error, ErrorTip},
    type_checker::type_checker::type_check,
};

pub mod ast;
pub mod compiler;
pub mod errors;
pub mod macros;
pub mod type_checker;
pub mod vm;

extern crate regex;

#[derive(Debug, Clone, PartialEq)]
pub struct Position(pub u32, pub Rc<String>);

impl Position {
    pub fn null() -> Self {
        Position(0, Rc::new(String::from("<null>")))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn null() -> Self {
        Span {
            start: Position::null(),
            end: Position::null(),
        }
    }

    /// Builds a span from the byte offsets reported by the syntax tree cursor.
    pub fn from_offsets(from: u32, to: u32, file: &Rc<String>) -> Self {
        Span {
            start: Position(from, Rc::clone(file)),
            end: Position(to, Rc::clone(file)),
        }
    }
}

/// Checks and lowers a whole program. No instructions are produced if any stage fails.
pub fn compile_program(program: Program) -> Result<InstructionSequence, Error> {
    let typed = type_check(program)?;
    generate(&typed)
}

pub fn get_line_at_position(content: &str, position: u32) -> Option<(usize, String, usize)> {
    let pos = position as usize;

    if pos >= content.len() {
        return None;
    }

    let mut start = 0;
    let mut line_number = 1;

    for line in content.split_inclusive('\n') {
        let end = start + line.len();

        if (start..end).contains(&pos) {
            let line_pos = pos - start;
            return Some((line_number, line.to_string(), line_pos));
        }

        start = end;
        line_number += 1;
    }

    None
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use crate::{
        errors::errors::{Error, ErrorImpl, NameErrorReason},
        Position,
    };

    const SOURCE: &str = "x: int = 1\nwhile True:\n    pass\ny: int = 2\n";

    #[test]
    fn test_get_line_at_position() {
        let (line_number, line, line_pos) = super::get_line_at_position(SOURCE, 3).unwrap();
        assert_eq!(line_number, 1);
        assert_eq!(line, "x: int = 1\n");
        assert_eq!(line_pos, 3);

        let (line_number, line, line_pos) = super::get_line_at_position(SOURCE, 27).unwrap();
        assert_eq!(line_number, 3);
        assert_eq!(line, "    pass\n");
        assert_eq!(line_pos, 4);

        assert!(super::get_line_at_position(SOURCE, 500).is_none());
    }

    #[test]
    fn test_render_error_points_at_offending_line() {
        let error = Error::new(
            ErrorImpl::DefinitionOrderError {
                name: String::from("y"),
            },
            Position(32, Rc::new(String::from("main.py"))),
        );

        let rendered = super::render_error(&error, SOURCE, "main.py");
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines[0], "Error: DefinitionOrderError (Declaration of `y` must come before any statement in its block)");
        assert_eq!(lines[1], "-> main.py");
        assert_eq!(lines[3], "4 | y: int = 2");
        assert_eq!(lines[4], "  | ^");
    }

    #[test]
    fn test_render_error_caret_on_tab_indented_line() {
        let source = "while True:\n\t\tx = 1\n";
        let error = Error::new(
            ErrorImpl::NameError {
                name: String::from("x"),
                reason: NameErrorReason::NotDefined,
            },
            Position(14, Rc::new(String::from("main.py"))),
        );

        let rendered = super::render_error(&error, source, "main.py");
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines[3], "2 | x = 1");
        assert_eq!(lines[4], "  | ^");
    }

    #[test]
    fn test_render_error_without_source_line() {
        let error = Error::new(
            ErrorImpl::UnboundLocal {
                name: String::from("x"),
            },
            Position::null(),
        );

        let rendered = super::render_error(&error, "", "<null>");
        assert_eq!(rendered.lines().count(), 2);
    }
}

pub fn render_error(error: &Error, source: &str, file_name: &str) -> String {
    /*
        Error: name (tip)
        -> main.py
           |
        20 | x = y + 1
           | ----^
    */

    let mut out = String::new();

    if let ErrorTip::None = error.get_tip() {
        out.push_str(&format!("Error: {}\n", error.get_error_name()));
    } else {
        out.push_str(&format!("Error: {} ({})\n", error.get_error_name(), error.get_tip()));
    }
    out.push_str(&format!("-> {}\n", file_name));

    let position = error.get_position();
    let Some((line, line_text, line_pos)) = get_line_at_position(source, position.0) else {
        return out;
    };

    let line_string = line.to_string();
    let padding = line_string.len() + 2;

    out.push_str(&format!("{:>padding$}\n", "|"));

    let (line_text_removed, removed_whitespace) = remove_starting_whitespace(&line_text);
    out.push_str(&format!("{} | {}\n", line_string, line_text_removed.trim()));

    let arrows = line_pos.saturating_sub(removed_whitespace) + 1;

    out.push_str(&format!("{:>padding$} {:->arrows$}\n", "|", "^"));
    out
}

fn remove_starting_whitespace(string: &str) -> (String, usize) {
    let mut start = 0;
    for c in string.chars() {
        if c.is_whitespace() {
            start += c.len_utf8();
        } else {
            break;
        }
    }

    (String::from(&string[start..]), start)
}
