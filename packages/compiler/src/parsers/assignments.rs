//! `a:assign` bodies: `BOUND = EXPRESSION` lists.

use crate::error::{Error, Result};
use crate::ir::Assignment;

use super::bound::{parse_bound, BoundContext};
use super::scanner::Scanner;

/// Parse the content of an `a:assign` attribute. Paths are left empty; the
/// analyzer fills them in.
pub fn parse_assignments(s: &str) -> Result<Vec<Assignment>> {
    let mut sc = Scanner::new(s);
    let mut ret = Vec::new();
    loop {
        let target = parse_bound(&mut sc, BoundContext::Assignment)?;
        sc.expect('=')?;
        let expression = sc.balanced_until(&[','])?;
        if expression.is_empty() {
            return Err(Error::attribute_parse(": missing expression"));
        }
        ret.push(Assignment {
            expression,
            target,
            path: Vec::new(),
        });
        if !sc.eat(',') {
            break;
        }
    }
    sc.finish()?;
    Ok(ret)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::BoundValue;

    #[test]
    fn test_single() {
        let list = parse_assignments("prop(textContent)=x").unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].expression, "x");
        assert_eq!(list[0].target, BoundValue::Property("textContent".to_string()));
    }

    #[test]
    fn test_list_with_nested_commas() {
        let list = parse_assignments("style(width)=f(a, b), dataset(idx)=i").unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].expression, "f(a, b)");
        assert_eq!(list[1].target, BoundValue::Dataset("idx".to_string()));
    }

    #[test]
    fn test_missing_expression() {
        assert!(parse_assignments("prop(x)=").is_err());
        assert!(parse_assignments("prop(x)").is_err());
    }
}
