//! `<a:import>` bodies: `ALIAS = PATH` lines.

use indexmap::IndexMap;
use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{Error, Result};

lazy_static! {
    static ref IMPORT_LINE: Regex =
        Regex::new(r"^([A-Za-z_][A-Za-z0-9_]*)\s*=\s*([A-Za-z0-9_./\-]+)$").unwrap();
}

pub fn parse_imports(s: &str) -> Result<IndexMap<String, String>> {
    let mut ret = IndexMap::new();
    for line in s.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let caps = IMPORT_LINE.captures(line).ok_or_else(|| {
            Error::attribute_parse(format!(": cannot parse import line `{}`", line))
        })?;
        let alias = caps[1].to_string();
        let path = caps[2].to_string();
        if ret.insert(alias.clone(), path).is_some() {
            return Err(Error::structural(format!(
                ": duplicate import alias `{}`",
                alias
            )));
        }
    }
    Ok(ret)
}
