//! `args` attributes: comma-separated expressions, split at top level only.

use crate::error::{Error, Result};
use crate::ir::Arguments;

use super::scanner::Scanner;

pub fn analyse_arguments(s: &str) -> Result<Arguments> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Ok(Arguments::default());
    }
    let mut sc = Scanner::new(trimmed);
    let mut items = Vec::new();
    loop {
        let item = sc.balanced_until(&[','])?;
        if item.is_empty() {
            return Err(Error::attribute_parse(": empty argument"));
        }
        items.push(item);
        if !sc.eat(',') {
            break;
        }
    }
    Ok(Arguments {
        raw: trimmed.to_string(),
        items,
    })
}
