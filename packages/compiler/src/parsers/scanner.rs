//! Shared scanner for the micro-grammars.

use crate::error::{Error, Result};

pub struct Scanner {
    chars: Vec<char>,
    pos: usize,
}

impl Scanner {
    pub fn new(input: &str) -> Self {
        Scanner {
            chars: input.chars().collect(),
            pos: 0,
        }
    }

    pub fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    pub fn eof(&self) -> bool {
        self.pos >= self.chars.len()
    }

    /// True when only whitespace remains.
    pub fn at_end(&mut self) -> bool {
        self.skip_ws();
        self.eof()
    }

    pub fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    pub fn bump(&mut self) -> Option<char> {
        let c = self.peek();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    /// Consume `c` if it is next (after whitespace).
    pub fn eat(&mut self, c: char) -> bool {
        self.skip_ws();
        if self.peek() == Some(c) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    pub fn expect(&mut self, c: char) -> Result<()> {
        if self.eat(c) {
            Ok(())
        } else {
            Err(Error::attribute_parse(format!(": expected `{}`", c)))
        }
    }

    /// `[A-Za-z_][A-Za-z0-9_]*`
    pub fn ident(&mut self) -> Result<String> {
        self.skip_ws();
        let mut name = String::new();
        match self.peek() {
            Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
            _ => return Err(Error::attribute_parse(": expected identifier")),
        }
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == '_' {
                name.push(c);
                self.pos += 1;
            } else {
                break;
            }
        }
        Ok(name)
    }

    /// A type token: identifiers possibly qualified with `.` and decorated
    /// with `[]` or `*`.
    pub fn type_token(&mut self) -> Result<String> {
        self.skip_ws();
        let mut tok = String::new();
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '[' | ']' | '*') {
                tok.push(c);
                self.pos += 1;
            } else {
                break;
            }
        }
        if tok.is_empty() {
            return Err(Error::attribute_parse(": expected type"));
        }
        Ok(tok)
    }

    /// Scan an expression up to (not consuming) one of `stops` at nesting
    /// depth zero, respecting brackets and string literals. Returns the
    /// trimmed text.
    pub fn balanced_until(&mut self, stops: &[char]) -> Result<String> {
        let mut out = String::new();
        let mut depth: usize = 0;
        while let Some(c) = self.peek() {
            if depth == 0 && stops.contains(&c) {
                break;
            }
            match c {
                '(' | '[' | '{' => depth += 1,
                ')' | ']' | '}' => {
                    if depth == 0 {
                        return Err(Error::attribute_parse(": unbalanced parentheses"));
                    }
                    depth -= 1;
                }
                '"' | '\'' | '`' => {
                    out.push(c);
                    self.pos += 1;
                    loop {
                        match self.peek() {
                            None => {
                                return Err(Error::attribute_parse(
                                    ": unterminated string literal",
                                ))
                            }
                            Some('\\') => {
                                out.push('\\');
                                self.pos += 1;
                                if let Some(e) = self.bump() {
                                    out.push(e);
                                }
                                continue;
                            }
                            Some(q) => {
                                out.push(q);
                                self.pos += 1;
                                if q == c {
                                    break;
                                }
                            }
                        }
                    }
                    continue;
                }
                _ => {}
            }
            out.push(c);
            self.pos += 1;
        }
        if depth != 0 {
            return Err(Error::attribute_parse(": unbalanced parentheses"));
        }
        Ok(out.trim().to_string())
    }

    /// Everything that remains, trimmed.
    pub fn rest(&mut self) -> String {
        let out: String = self.chars[self.pos..].iter().collect();
        self.pos = self.chars.len();
        out.trim().to_string()
    }

    /// Error when trailing input remains after a complete parse.
    pub fn finish(&mut self) -> Result<()> {
        if self.at_end() {
            Ok(())
        } else {
            Err(Error::attribute_parse(format!(
                ": unexpected trailing input `{}`",
                self.rest()
            )))
        }
    }
}
