//! `a:bindings` bodies: `BOUND : NAME` or `BOUND : (NAME TYPE)` lists.
//!
//! A bare name binds with `Auto` type, resolved when the binding is placed.

use crate::error::{Error, Result};
use crate::ir::{VarType, Variable, VariableMapping};

use super::bound::{parse_bound, BoundContext};
use super::scanner::Scanner;

pub fn parse_bindings(s: &str) -> Result<Vec<VariableMapping>> {
    let mut sc = Scanner::new(s);
    let mut ret = Vec::new();
    loop {
        let value = parse_bound(&mut sc, BoundContext::Binding)?;
        sc.expect(':')?;
        let variable = if sc.eat('(') {
            let name = sc.ident()?;
            let type_name = sc.ident()?;
            sc.expect(')')?;
            let type_ = match type_name.as_str() {
                "int" => VarType::Int,
                "string" => VarType::String,
                "bool" => VarType::Bool,
                _ => {
                    return Err(Error::attribute_parse(format!(
                        ": unsupported type: {}",
                        type_name
                    )))
                }
            };
            Variable { name, type_ }
        } else {
            Variable {
                name: sc.ident()?,
                type_: VarType::Auto,
            }
        };
        ret.push(VariableMapping {
            variable,
            value,
            path: Vec::new(),
        });
        if !sc.eat(',') {
            break;
        }
    }
    sc.finish()?;
    Ok(ret)
}
