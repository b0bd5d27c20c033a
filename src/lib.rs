#![allow(clippy::module_inception)]

use std::{cmp::Ordering, fmt::Display};

use crate::errors::errors::{Error, ErrorTip};

pub mod ast;
pub mod errors;
pub mod evaluator;
pub mod lexer;
pub mod macros;
pub mod operators;
pub mod parser;

extern crate regex;

/// A line/column range in the source text.
///
/// Lines and columns are 1-based, `column_to` is exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CodePosition {
    pub line_from: u32,
    pub line_to: u32,
    pub column_from: u32,
    pub column_to: u32,
}

impl CodePosition {
    /// Position of synthetic nodes which have no source representation.
    pub const EMPTY: CodePosition = CodePosition {
        line_from: 0,
        line_to: 0,
        column_from: 0,
        column_to: 0,
    };

    pub fn new(line_from: u32, line_to: u32, column_from: u32, column_to: u32) -> Self {
        CodePosition {
            line_from,
            line_to,
            column_from,
            column_to,
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == CodePosition::EMPTY
    }

    /// Returns the smallest range containing both positions.
    pub fn combine(&self, other: &CodePosition) -> CodePosition {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }

        let (line_from, column_from) = match (self.line_from, self.column_from)
            .cmp(&(other.line_from, other.column_from))
        {
            Ordering::Greater => (other.line_from, other.column_from),
            _ => (self.line_from, self.column_from),
        };
        let (line_to, column_to) = match (self.line_to, self.column_to)
            .cmp(&(other.line_to, other.column_to))
        {
            Ordering::Less => (other.line_to, other.column_to),
            _ => (self.line_to, self.column_to),
        };

        CodePosition {
            line_from,
            line_to,
            column_from,
            column_to,
        }
    }
}

impl Display for CodePosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            return write!(f, "<unknown>");
        }

        write!(
            f,
            "{}:{}-{}:{}",
            self.line_from, self.column_from, self.line_to, self.column_to
        )
    }
}

/// Returns the line number, the line text and the 0-based column of `position`.
pub fn get_line_at_position(source: &str, position: &CodePosition) -> Option<(usize, String, usize)> {
    if position.is_empty() {
        return None;
    }

    let line_number = position.line_from as usize;
    let line = source.split_inclusive('\n').nth(line_number.checked_sub(1)?)?;

    Some((
        line_number,
        line.to_string(),
        position.column_from.saturating_sub(1) as usize,
    ))
}

#[cfg(test)]
mod tests {
    use super::CodePosition;

    #[test]
    fn test_get_line_at_position() {
        let source = "Hello, world!\n$a = 42\n\nTesting { }\n";

        let (line_number, line, line_pos) =
            super::get_line_at_position(source, &CodePosition::new(1, 1, 11, 12)).unwrap();
        assert_eq!(line_number, 1);
        assert_eq!(line, "Hello, world!\n");
        assert_eq!(line_pos, 10);

        let (line_number, line, line_pos) =
            super::get_line_at_position(source, &CodePosition::new(4, 4, 9, 10)).unwrap();
        assert_eq!(line_number, 4);
        assert_eq!(line, "Testing { }\n");
        assert_eq!(line_pos, 8);

        assert!(super::get_line_at_position(source, &CodePosition::EMPTY).is_none());
        assert!(super::get_line_at_position(source, &CodePosition::new(9, 9, 1, 2)).is_none());
    }

    #[test]
    fn test_combine_positions() {
        let a = CodePosition::new(1, 1, 5, 8);
        let b = CodePosition::new(1, 2, 2, 4);

        assert_eq!(a.combine(&b), CodePosition::new(1, 2, 2, 4));
        assert_eq!(b.combine(&a), CodePosition::new(1, 2, 2, 4));
        assert_eq!(a.combine(&CodePosition::EMPTY), a);
        assert_eq!(CodePosition::EMPTY.combine(&b), b);
    }
}

pub fn display_error(error: &Error, source: &str, file: &str) {
    /*
        Error: name (tip)
        -> script.lang
           |
        20 | $a = func.f(1, 2
           | -----------^
    */

    if let ErrorTip::None = error.get_tip() {
        println!("Error: {}", error.get_error_name());
    } else {
        println!("Error: {} ({})", error.get_error_name(), error.get_tip());
    }
    println!("-> {}", file);

    let Some((line, line_text, line_pos)) = get_line_at_position(source, error.get_position())
    else {
        return;
    };

    let line_string = line.to_string();
    let padding = line_string.len() + 2;

    println!("{:>padding$}", "|");

    let (line_text_removed, removed_whitespace) = remove_starting_whitespace(&line_text);
    println!("{} | {}", line_string, line_text_removed.trim_end());

    let arrows = line_pos.saturating_sub(removed_whitespace) + 1;

    println!("{:>padding$} {:->arrows$}", "|", "^");
}

fn remove_starting_whitespace(string: &str) -> (String, usize) {
    let mut start = 0;
    for c in string.chars() {
        if c == ' ' || c == '\t' {
            start += 1;
        } else {
            break;
        }
    }

    (String::from(&string[start..]), start)
}
