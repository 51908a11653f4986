//! `a:capture` bodies: `EVENT : HANDLER mappings? option?` lists.
//!
//! `mappings` is `{ PARAM = BOUND, … }`; `option` is one of
//! `:preventDefault`, `:dontPreventDefault`, `:askPreventDefault`. Without
//! an option the mapping stays `AutoPreventDefault` and is normalized
//! against the handler's return type during analysis.

use indexmap::IndexMap;

use crate::error::{Error, Result};
use crate::ir::{EventHandling, UnboundEventMapping};

use super::bound::{parse_bound, BoundContext};
use super::scanner::Scanner;

pub fn parse_captures(s: &str) -> Result<Vec<UnboundEventMapping>> {
    let mut sc = Scanner::new(s);
    let mut ret = Vec::new();
    loop {
        let event = sc.ident()?;
        sc.expect(':')?;
        let handler = sc.ident()?;
        let mut param_mappings = IndexMap::new();
        if sc.eat('{') {
            if !sc.eat('}') {
                loop {
                    let param = sc.ident()?;
                    sc.expect('=')?;
                    let value = parse_bound(&mut sc, BoundContext::Capture)?;
                    if param_mappings.insert(param.clone(), value).is_some() {
                        return Err(Error::attribute_parse(format!(
                            ": duplicate parameter `{}`",
                            param
                        )));
                    }
                    if !sc.eat(',') {
                        break;
                    }
                }
                sc.expect('}')?;
            }
        }
        let handling = if sc.eat(':') {
            let word = sc.ident()?;
            match word.as_str() {
                "preventDefault" => EventHandling::PreventDefault,
                "dontPreventDefault" => EventHandling::DontPreventDefault,
                "askPreventDefault" => EventHandling::AskPreventDefault,
                _ => {
                    return Err(Error::attribute_parse(format!(
                        ": unknown capture option `{}`",
                        word
                    )))
                }
            }
        } else {
            EventHandling::AutoPreventDefault
        };
        ret.push(UnboundEventMapping {
            event,
            handler,
            param_mappings,
            handling,
        });
        if !sc.eat(',') {
            break;
        }
    }
    sc.finish()?;
    Ok(ret)
}
