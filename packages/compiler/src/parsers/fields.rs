//! `<a:data>` bodies: `NAME TYPE (= DEFAULT)?`, one per line or `;`.

use std::collections::HashSet;

use crate::error::{Error, Result};
use crate::ir::Field;

use super::scanner::Scanner;

pub fn parse_fields(s: &str) -> Result<Vec<Field>> {
    let mut ret = Vec::new();
    let mut seen = HashSet::new();
    for decl in s.split(|c| c == '\n' || c == ';') {
        if decl.trim().is_empty() {
            continue;
        }
        let mut sc = Scanner::new(decl);
        let name = sc.ident()?;
        let type_ = sc.type_token()?;
        let default = if sc.eat('=') {
            let expr = sc.rest();
            if expr.is_empty() {
                return Err(Error::attribute_parse(": missing default value"));
            }
            Some(expr)
        } else {
            sc.finish()?;
            None
        };
        if !seen.insert(name.clone()) {
            return Err(Error::structural(format!(
                ": duplicate field name: `{}`",
                name
            )));
        }
        ret.push(Field {
            name,
            type_,
            default,
        });
    }
    Ok(ret)
}
