//! Compiler Attribute Extraction
//!
//! Recognizes the `a:*` attributes of template elements and the plain
//! attribute sets of the compiler's own elements, parses each through the
//! matching micro-grammar and strips it from the node. Re-running extraction
//! on an already-stripped element yields an empty record.

use crate::dom::Element;
use crate::error::{Error, Result};
use crate::ir::{Arguments, Assignment, Param, UnboundEventMapping, VariableMapping};
use crate::parsers::{self, ForLoop};

/// The `a:*` attributes legal on any template element.
#[derive(Debug, Default)]
pub struct GeneralAttrs {
    pub assign: Vec<Assignment>,
    pub bindings: Vec<VariableMapping>,
    pub capture: Vec<UnboundEventMapping>,
    pub if_expr: Option<String>,
    pub for_loop: Option<ForLoop>,
}

/// Strip and parse all `a:*` attributes of a plain element.
pub fn extract_askew_attribs(el: &mut Element) -> Result<GeneralAttrs> {
    let mut taken = Vec::new();
    el.attrs.retain(|a| {
        if a.name.starts_with("a:") {
            taken.push(a.clone());
            false
        } else {
            true
        }
    });

    let mut ret = GeneralAttrs::default();
    for attr in taken {
        let suffix = &attr.name[2..];
        match suffix {
            "assign" => ret
                .assign
                .extend(parse_attr(&attr.value, parsers::parse_assignments)?),
            "bindings" => ret
                .bindings
                .extend(parse_attr(&attr.value, parsers::parse_bindings)?),
            "capture" => ret
                .capture
                .extend(parse_attr(&attr.value, parsers::parse_captures)?),
            "if" => {
                if ret.if_expr.is_some() {
                    return Err(Error::structural(": duplicate attribute `a:if`"));
                }
                let expr = attr.value.trim().to_string();
                if expr.is_empty() {
                    return Err(Error::attribute_parse(": missing expression in a:if"));
                }
                ret.if_expr = Some(expr);
            }
            "for" => {
                if ret.for_loop.is_some() {
                    return Err(Error::structural(": duplicate attribute `a:for`"));
                }
                ret.for_loop = Some(parse_attr(&attr.value, parsers::parse_for)?);
            }
            _ => {
                return Err(Error::structural(format!(
                    ": unknown attribute `{}`",
                    attr.name
                )))
            }
        }
    }
    Ok(ret)
}

fn parse_attr<T>(value: &str, parse: impl Fn(&str) -> Result<T>) -> Result<T> {
    parse(value).map_err(|e| {
        Error::attribute_parse(format!(": unable to parse `{}`{}", value, e.message()))
    })
}

/// Attributes of `<a:component>`.
#[derive(Debug, Default)]
pub struct ComponentAttrs {
    pub name: String,
    pub params: Vec<Param>,
    pub init: Option<String>,
}

pub fn collect_component(el: &mut Element) -> Result<ComponentAttrs> {
    let mut ret = ComponentAttrs::default();
    for attr in std::mem::take(&mut el.attrs) {
        match attr.name.as_str() {
            "name" => ret.name = attr.value,
            "params" => ret.params = parse_attr(&attr.value, parsers::parse_params)?,
            "init" => ret.init = Some(attr.value),
            _ => {
                return Err(Error::structural(format!(
                    ": unknown attribute `{}`",
                    attr.name
                )))
            }
        }
    }
    for p in &ret.params {
        if !p.type_.is_primitive() {
            return Err(Error::type_restriction(
                ": component parameters must only use int, string and bool types",
            ));
        }
    }
    Ok(ret)
}

/// Attributes of `<a:embed>`. `list`, `optional` and `control` are boolean
/// presence attributes.
#[derive(Debug, Default)]
pub struct EmbedAttrs {
    pub name: String,
    pub type_ref: Option<String>,
    pub args: Arguments,
    pub list: bool,
    pub optional: bool,
    pub control: bool,
}

pub fn collect_embed(el: &mut Element) -> Result<EmbedAttrs> {
    let mut ret = EmbedAttrs::default();
    for attr in std::mem::take(&mut el.attrs) {
        match attr.name.as_str() {
            "name" => ret.name = attr.value,
            "type" => ret.type_ref = Some(attr.value),
            "args" => {
                ret.args = parsers::analyse_arguments(&attr.value)
                    .map_err(|e| Error::attribute_parse(format!(": in args{}", e.message())))?
            }
            "list" => ret.list = true,
            "optional" => ret.optional = true,
            "control" => ret.control = true,
            _ => {
                return Err(Error::structural(format!(
                    ": unknown attribute `{}`",
                    attr.name
                )))
            }
        }
    }
    Ok(ret)
}

/// Attributes of an `.asite` root element. Unrecognized attributes are left
/// alone; the root is an ordinary HTML element.
#[derive(Debug, Default)]
pub struct SiteAttrs {
    pub html_file: Option<String>,
    pub js_path: Option<String>,
    pub wasm_exec_path: Option<String>,
    pub wasm_path: Option<String>,
}

pub fn collect_site(el: &mut Element) -> SiteAttrs {
    SiteAttrs {
        html_file: el.take_attr("html-file"),
        js_path: el.take_attr("js-path"),
        wasm_exec_path: el.take_attr("wasm-exec-path"),
        wasm_path: el.take_attr("wasm-path"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse_fragment;
    use crate::ir::{BoundValue, ParamType};

    fn element(source: &str) -> Element {
        let mut nodes = parse_fragment(source).unwrap();
        match nodes.remove(0) {
            crate::dom::Node::Element(el) => el,
            other => panic!("expected element, got {:?}", other),
        }
    }

    #[test]
    fn test_extract_strips_recognized() {
        let mut el = element("<span a:assign=\"prop(x)=y\" class=\"c\"></span>");
        let attrs = extract_askew_attribs(&mut el).unwrap();
        assert_eq!(attrs.assign.len(), 1);
        assert_eq!(attrs.assign[0].target, BoundValue::Property("x".to_string()));
        assert_eq!(el.attr("class"), Some("c"));
        assert_eq!(el.attr("a:assign"), None);

        // a second extraction finds nothing and changes nothing
        let again = extract_askew_attribs(&mut el).unwrap();
        assert!(again.assign.is_empty());
        assert_eq!(el.attr("class"), Some("c"));
    }

    #[test]
    fn test_unknown_attribute_is_fatal() {
        let mut el = element("<span a:frobnicate=\"x\"></span>");
        assert!(extract_askew_attribs(&mut el).is_err());
    }

    #[test]
    fn test_parse_failure_carries_original_text() {
        let mut el = element("<span a:assign=\"prop(x\"></span>");
        let err = extract_askew_attribs(&mut el).unwrap_err();
        assert!(err.message().contains("prop(x"));
    }

    #[test]
    fn test_collect_component() {
        let mut el = element("<a:component name=\"Foo\" params=\"n int\"></a:component>");
        let attrs = collect_component(&mut el).unwrap();
        assert_eq!(attrs.name, "Foo");
        assert_eq!(attrs.params[0].type_, ParamType::Int);
        assert!(el.attrs.is_empty());
    }

    #[test]
    fn test_component_params_must_be_primitive() {
        let mut el = element("<a:component name=\"Foo\" params=\"m Model\"></a:component>");
        assert!(collect_component(&mut el).is_err());
    }

    #[test]
    fn test_collect_embed_flags() {
        let mut el = element("<a:embed name=\"items\" type=\"Item\" list></a:embed>");
        let attrs = collect_embed(&mut el).unwrap();
        assert!(attrs.list);
        assert!(!attrs.optional);
        assert_eq!(attrs.type_ref.as_deref(), Some("Item"));
    }

    #[test]
    fn test_collect_site_defaults_left_to_caller() {
        let mut el = element("<site html-file=\"a.html\" lang=\"en\"></site>");
        let attrs = collect_site(&mut el);
        assert_eq!(attrs.html_file.as_deref(), Some("a.html"));
        assert_eq!(attrs.js_path, None);
        assert_eq!(el.attr("lang"), Some("en"));
    }
}
