//! Minimal tokenizer and recursive-descent parser for solver terms.
//!
//! Grammar (whitespace allowed between tokens):
//!
//! ```text
//! term     := integer | string | name [ '(' args ')' ] | '(' args ')'
//! args     := [ term { ',' term } [ ',' ] ]
//! name     := (letter | '_') { letter | digit | '_' | '\'' | '.' }
//! integer  := [ '-' ] digit { digit }
//! ```
//!
//! Dotted names are accepted so that wrapper calls emitted by other tools
//! (`np.int64(24)`) parse as ordinary function terms.

use crate::common::ParseError;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Term {
    Integer(i64),
    Symbol(String),
    Str(String),
    Function { name: String, args: Vec<Term> },
    Tuple(Vec<Term>),
}

impl Term {
    /// Integer value, looking through single-argument wrappers such as
    /// `train(3)` or `np.int64(3)`.
    pub fn unwrap_integer(&self) -> Option<i64> {
        match self {
            Term::Integer(v) => Some(*v),
            Term::Function { args, .. } if args.len() == 1 => args[0].unwrap_integer(),
            Term::Tuple(items) if items.len() == 1 => items[0].unwrap_integer(),
            _ => None,
        }
    }

    /// Non-negative integer that fits in a `u32`.
    pub fn unwrap_u32(&self) -> Option<u32> {
        self.unwrap_integer().and_then(|v| u32::try_from(v).ok())
    }

    pub fn function(&self) -> Option<(&str, &[Term])> {
        match self {
            Term::Function { name, args } => Some((name.as_str(), args.as_slice())),
            _ => None,
        }
    }

    pub fn tuple(&self) -> Option<&[Term]> {
        match self {
            Term::Tuple(items) => Some(items.as_slice()),
            _ => None,
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn join(f: &mut fmt::Formatter<'_>, items: &[Term]) -> fmt::Result {
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    write!(f, ",")?;
                }
                write!(f, "{}", item)?;
            }
            Ok(())
        }

        match self {
            Term::Integer(v) => write!(f, "{}", v),
            Term::Symbol(s) => write!(f, "{}", s),
            Term::Str(s) => write!(f, "\"{}\"", s),
            Term::Function { name, args } => {
                write!(f, "{}(", name)?;
                join(f, args)?;
                write!(f, ")")
            }
            Term::Tuple(items) => {
                write!(f, "(")?;
                join(f, items)?;
                write!(f, ")")
            }
        }
    }
}

/// Parse exactly one term; anything but whitespace after it is an error.
pub fn parse_term(input: &str) -> Result<Term, ParseError> {
    let mut parser = TermParser::new(input);
    let term = parser.term()?;
    parser.skip_whitespace();
    match parser.peek() {
        None => Ok(term),
        Some(_) => Err(ParseError::TrailingInput { offset: parser.pos }),
    }
}

/// Split a whitespace-separated stream of atoms at paren depth zero.
///
/// Whitespace inside parentheses or string literals does not split, so
/// `position(0, (1, 2), n, 0)` stays a single atom. An atom left open by an
/// unclosed `(` or `"` ends before the next whitespace-preceded `name(`, so
/// one broken atom never swallows the atoms after it.
pub fn split_atoms(input: &str) -> Vec<&str> {
    let mut atoms = Vec::new();
    let mut rest = input;
    while let Some(open) = split_balanced(rest, &mut atoms) {
        match resync_point(open) {
            Some(cut) => {
                atoms.push(open[..cut].trim_end());
                rest = &open[cut..];
            }
            None => {
                atoms.push(open.trim_end());
                break;
            }
        }
    }
    atoms
}

/// Push every atom that closes at depth zero. Returns the trailing span if
/// the input ends inside an unbalanced atom.
fn split_balanced<'a>(input: &'a str, atoms: &mut Vec<&'a str>) -> Option<&'a str> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    let mut start: Option<usize> = None;

    for (i, c) in input.char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match c {
            c if c.is_whitespace() && depth == 0 => {
                if let Some(s) = start.take() {
                    atoms.push(&input[s..i]);
                }
                continue;
            }
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            '"' => in_string = true,
            _ => {}
        }

        if start.is_none() && !c.is_whitespace() {
            start = Some(i);
        }
    }

    let s = start?;
    if depth > 0 || in_string {
        return Some(&input[s..]);
    }
    atoms.push(&input[s..]);
    None
}

/// Byte offset of the first `name(` that follows whitespace, past the start.
fn resync_point(span: &str) -> Option<usize> {
    let mut after_space = false;
    for (i, c) in span.char_indices() {
        if c.is_whitespace() {
            after_space = true;
            continue;
        }
        if after_space && (c.is_ascii_lowercase() || c == '_') {
            let name_len = span[i..]
                .find(|ch: char| !(ch.is_ascii_alphanumeric() || ch == '_' || ch == '\''))
                .unwrap_or(span.len() - i);
            if span[i + name_len..].starts_with('(') {
                return Some(i);
            }
        }
        after_space = false;
    }
    None
}

struct TermParser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> TermParser<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.bump();
        }
    }

    fn expect(&mut self, wanted: char) -> Result<(), ParseError> {
        self.skip_whitespace();
        match self.bump() {
            Some(c) if c == wanted => Ok(()),
            Some(c) => Err(ParseError::UnexpectedChar {
                found: c,
                offset: self.pos - c.len_utf8(),
            }),
            None => Err(ParseError::UnexpectedEnd { offset: self.pos }),
        }
    }

    fn term(&mut self) -> Result<Term, ParseError> {
        self.skip_whitespace();
        match self.peek() {
            None => Err(ParseError::UnexpectedEnd { offset: self.pos }),
            Some('(') => {
                self.bump();
                Ok(Term::Tuple(self.args()?))
            }
            Some('"') => self.string(),
            Some(c) if c == '-' || c.is_ascii_digit() => self.integer(),
            Some(c) if c.is_alphabetic() || c == '_' => {
                let name = self.name();
                self.skip_whitespace();
                if self.peek() == Some('(') {
                    self.bump();
                    let args = self.args()?;
                    Ok(Term::Function { name, args })
                } else {
                    Ok(Term::Symbol(name))
                }
            }
            Some(c) => Err(ParseError::UnexpectedChar {
                found: c,
                offset: self.pos,
            }),
        }
    }

    /// Arguments after an opening paren, consuming the closing one.
    fn args(&mut self) -> Result<Vec<Term>, ParseError> {
        let mut args = Vec::new();
        self.skip_whitespace();
        if self.peek() == Some(')') {
            self.bump();
            return Ok(args);
        }
        loop {
            args.push(self.term()?);
            self.skip_whitespace();
            match self.bump() {
                Some(',') => {
                    self.skip_whitespace();
                    if self.peek() == Some(')') {
                        self.bump();
                        return Ok(args);
                    }
                }
                Some(')') => return Ok(args),
                Some(c) => {
                    return Err(ParseError::UnexpectedChar {
                        found: c,
                        offset: self.pos - c.len_utf8(),
                    })
                }
                None => return Err(ParseError::UnexpectedEnd { offset: self.pos }),
            }
        }
    }

    fn name(&mut self) -> String {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_alphanumeric() || c == '_' || c == '\'' || c == '.')
        {
            self.bump();
        }
        self.input[start..self.pos].to_string()
    }

    fn integer(&mut self) -> Result<Term, ParseError> {
        let start = self.pos;
        if self.peek() == Some('-') {
            self.bump();
        }
        let digits_start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            self.bump();
        }
        if self.pos == digits_start {
            return match self.peek() {
                Some(c) => Err(ParseError::UnexpectedChar {
                    found: c,
                    offset: self.pos,
                }),
                None => Err(ParseError::UnexpectedEnd { offset: self.pos }),
            };
        }
        let text = &self.input[start..self.pos];
        text.parse::<i64>()
            .map(Term::Integer)
            .map_err(|_| ParseError::IntegerOverflow {
                text: text.to_string(),
            })
    }

    fn string(&mut self) -> Result<Term, ParseError> {
        self.expect('"')?;
        let mut value = String::new();
        loop {
            match self.bump() {
                None => return Err(ParseError::UnexpectedEnd { offset: self.pos }),
                Some('"') => return Ok(Term::Str(value)),
                Some('\\') => match self.bump() {
                    Some(c) => value.push(c),
                    None => return Err(ParseError::UnexpectedEnd { offset: self.pos }),
                },
                Some(c) => value.push(c),
            }
        }
    }
}
