//! Handler and controller-method signatures, and component parameter lists.
//!
//! One declaration per line (or `;`-separated):
//! `NAME '(' (PARAM TYPE),* ')' RETURNTYPE?`. Type restriction to the
//! primitive set is enforced by the analyzer, not here: controller methods
//! may use any type.

use crate::error::Result;
use crate::ir::{Param, ParamType};

use super::scanner::Scanner;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawHandler {
    pub name: String,
    pub params: Vec<Param>,
    pub returns: Option<ParamType>,
}

/// Parse the text body of `<a:handlers>` or `<a:controller>`.
pub fn parse_handlers(s: &str) -> Result<Vec<RawHandler>> {
    let mut ret = Vec::new();
    for decl in s.split(|c| c == '\n' || c == ';') {
        if decl.trim().is_empty() {
            continue;
        }
        ret.push(parse_signature(decl)?);
    }
    Ok(ret)
}

/// Parse the `params` attribute of `<a:component>`: `NAME TYPE (',' …)*`.
pub fn parse_params(s: &str) -> Result<Vec<Param>> {
    let mut sc = Scanner::new(s);
    if sc.at_end() {
        return Ok(Vec::new());
    }
    let params = param_list(&mut sc)?;
    sc.finish()?;
    Ok(params)
}

fn parse_signature(s: &str) -> Result<RawHandler> {
    let mut sc = Scanner::new(s);
    let name = sc.ident()?;
    sc.expect('(')?;
    let params = if sc.eat(')') {
        Vec::new()
    } else {
        let params = param_list(&mut sc)?;
        sc.expect(')')?;
        params
    };
    let returns = if sc.at_end() {
        None
    } else {
        Some(parse_type(&mut sc)?)
    };
    sc.finish()?;
    Ok(RawHandler {
        name,
        params,
        returns,
    })
}

fn param_list(sc: &mut Scanner) -> Result<Vec<Param>> {
    let mut params = Vec::new();
    loop {
        let name = sc.ident()?;
        let type_ = parse_type(sc)?;
        params.push(Param { name, type_ });
        if !sc.eat(',') {
            break;
        }
    }
    Ok(params)
}

fn parse_type(sc: &mut Scanner) -> Result<ParamType> {
    let tok = sc.type_token()?;
    Ok(match tok.as_str() {
        "int" => ParamType::Int,
        "string" => ParamType::String,
        "bool" => ParamType::Bool,
        _ => ParamType::Named(tok),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signature_with_params() {
        let list = parse_handlers("onClick(n int, s string)").unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].name, "onClick");
        assert_eq!(list[0].params.len(), 2);
        assert_eq!(list[0].params[0].name, "n");
        assert_eq!(list[0].params[0].type_, ParamType::Int);
        assert_eq!(list[0].returns, None);
    }

    #[test]
    fn test_return_type_and_multiple_decls() {
        let list = parse_handlers("submit() bool\nreset()").unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].returns, Some(ParamType::Bool));
        assert_eq!(list[1].returns, None);
    }

    #[test]
    fn test_named_types_allowed() {
        let list = parse_handlers("update(items []Item)").unwrap();
        assert_eq!(
            list[0].params[0].type_,
            ParamType::Named("[]Item".to_string())
        );
    }

    #[test]
    fn test_params_attribute() {
        let params = parse_params("name string, age int").unwrap();
        assert_eq!(params.len(), 2);
        assert_eq!(params[1].type_, ParamType::Int);
        assert!(parse_params("").unwrap().is_empty());
    }

    #[test]
    fn test_malformed() {
        assert!(parse_handlers("onClick(").is_err());
        assert!(parse_handlers("(x int)").is_err());
    }
}
