//! Bound-value syntax, shared by assignments, bindings and captures.
//!
//! `self`, `prop(id)`, `style(id)`, `dataset(id)`, `class(a, b)`,
//! `form(id)`, `data(id)`, and — in captures only — `event(dotted.path)`
//! and `expr(raw code)`.

use crate::error::{Error, Result};
use crate::ir::BoundValue;

use super::scanner::Scanner;

/// Where a bound value appears; `event()`/`expr()` are capture-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundContext {
    Assignment,
    Binding,
    Capture,
}

pub fn parse_bound(sc: &mut Scanner, ctx: BoundContext) -> Result<BoundValue> {
    let kw = sc.ident()?;
    match kw.as_str() {
        "self" => Ok(BoundValue::Self_),
        "prop" => Ok(BoundValue::Property(single_id(sc)?)),
        "style" => Ok(BoundValue::Style(single_id(sc)?)),
        "dataset" => Ok(BoundValue::Dataset(single_id(sc)?)),
        "data" => Ok(BoundValue::Data(single_id(sc)?)),
        "class" => {
            sc.expect('(')?;
            let mut ids = vec![sc.ident()?];
            while sc.eat(',') {
                ids.push(sc.ident()?);
            }
            sc.expect(')')?;
            Ok(BoundValue::Class(ids))
        }
        "form" => Ok(BoundValue::FormValue {
            id: single_id(sc)?,
            is_radio: false,
            form_depth: 0,
        }),
        "event" => {
            capture_only(ctx, "event")?;
            sc.expect('(')?;
            let mut path = sc.ident()?;
            while sc.eat('.') {
                path.push('.');
                path.push_str(&sc.ident()?);
            }
            sc.expect(')')?;
            Ok(BoundValue::EventValue(path))
        }
        "expr" => {
            capture_only(ctx, "expr")?;
            sc.expect('(')?;
            let code = sc.balanced_until(&[')'])?;
            sc.expect(')')?;
            if code.is_empty() {
                return Err(Error::attribute_parse(": empty expr()"));
            }
            Ok(BoundValue::Expression(code))
        }
        _ => Err(Error::attribute_parse(format!(
            ": unknown bound value kind `{}`",
            kw
        ))),
    }
}

fn single_id(sc: &mut Scanner) -> Result<String> {
    sc.expect('(')?;
    let id = sc.ident()?;
    sc.expect(')')?;
    Ok(id)
}

fn capture_only(ctx: BoundContext, kw: &str) -> Result<()> {
    if ctx == BoundContext::Capture {
        Ok(())
    } else {
        Err(Error::attribute_parse(format!(
            ": `{}()` is only allowed in captures",
            kw
        )))
    }
}
