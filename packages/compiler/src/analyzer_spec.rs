//! End-to-end analyzer scenarios: literal sources in, IR shapes out.

use crate::dom::parse_fragment;
use crate::error::Error;
use crate::ir::{
    Assignment, BoundValue, Component, ControlKind, EmbedKind, EventHandling, NestedKind, VarType,
};
use crate::project::{AskewFile, BaseDir, Package};
use crate::symbols::Symbols;
use crate::units;

fn file(path: &str, source: &str) -> AskewFile {
    let base_name = path.rsplit('/').next().unwrap().trim_end_matches(".askew");
    AskewFile {
        base_name: base_name.to_string(),
        path: path.to_string(),
        content: parse_fragment(source).unwrap(),
        ..Default::default()
    }
}

fn analyze(source: &str) -> Symbols {
    try_analyze(source).unwrap()
}

fn try_analyze(source: &str) -> Result<Symbols, Error> {
    let mut base = BaseDir::default();
    base.packages.insert(
        String::new(),
        Package {
            path: String::new(),
            files: vec![file("test.askew", source)],
        },
    );
    let mut syms = Symbols::new(base);
    let mut counter = 0;
    units::process_file(&mut syms, &mut counter, "", 0)?;
    Ok(syms)
}

fn component<'a>(syms: &'a Symbols, name: &str) -> &'a Component {
    syms.base.packages[""].files[0]
        .components
        .get(name)
        .unwrap_or_else(|| panic!("component {} not registered", name))
}

#[test]
fn test_trivial_assignment() {
    let syms = analyze(
        "<a:component name=\"C\"><span a:assign=\"prop(textContent)=x\"></span></a:component>",
    );
    let c = component(&syms, "C");
    assert_eq!(c.name, "C");
    assert_eq!(c.id, "askew-component-1-c");
    assert_eq!(
        c.unit.block.assignments,
        vec![Assignment {
            expression: "x".to_string(),
            target: BoundValue::Property("textContent".to_string()),
            path: vec![0],
        }]
    );
    assert!(c.unit.embeds.is_empty());
    assert!(c.unit.captures.is_empty());
    assert!(c.unit.block.controlled.is_empty());
    // the span survives in the template, stripped of compiler attributes
    let span = c.template.children[0].as_element().unwrap();
    assert_eq!(span.name, "span");
    assert!(span.attrs.is_empty());
}

#[test]
fn test_empty_component() {
    let syms = analyze("<a:component name=\"Empty\"></a:component>");
    let c = component(&syms, "Empty");
    assert!(c.template.children.is_empty());
    assert!(c.unit.block.assignments.is_empty());
    assert!(c.unit.embeds.is_empty());
    assert!(c.unit.captures.is_empty());
}

#[test]
fn test_embed_reversal() {
    let syms = analyze(
        "<a:component name=\"Item\"></a:component>\
         <a:component name=\"Host\">\
         <a:embed name=\"a\" type=\"Item\"></a:embed>\
         <a:embed name=\"b\" type=\"Item\"></a:embed>\
         </a:component>",
    );
    let host = component(&syms, "Host");
    assert_eq!(host.unit.embeds.len(), 2);
    assert_eq!(host.unit.embeds[0].field, "b");
    assert_eq!(host.unit.embeds[0].path, vec![1]);
    assert_eq!(host.unit.embeds[1].field, "a");
    assert_eq!(host.unit.embeds[1].path, vec![0]);
    // both replaced by comment markers, indices intact
    assert_eq!(
        host.template.children[0],
        crate::dom::Node::Comment("embed(a)".to_string())
    );
    assert_eq!(
        host.template.children[1],
        crate::dom::Node::Comment("embed(b)".to_string())
    );
}

#[test]
fn test_handler_auto_parameters() {
    let syms = analyze(
        "<a:component name=\"C\">\
         <a:handlers>onClick(n int, s string)</a:handlers>\
         <button a:capture=\"click:onClick\"></button>\
         </a:component>",
    );
    let c = component(&syms, "C");
    assert_eq!(c.unit.captures.len(), 1);
    let capture = &c.unit.captures[0];
    assert_eq!(capture.path, vec![1]);
    let mapping = &capture.mappings[0];
    assert_eq!(mapping.event, "click");
    assert_eq!(mapping.handler, "onClick");
    assert!(!mapping.from_controller);
    assert_eq!(mapping.handling, EventHandling::DontPreventDefault);
    assert_eq!(mapping.param_mappings.len(), 2);
    assert_eq!(mapping.param_mappings[0].param, "n");
    assert_eq!(
        mapping.param_mappings[0].value,
        BoundValue::Data("n".to_string())
    );
    assert_eq!(mapping.param_mappings[1].param, "s");
    assert_eq!(
        mapping.param_mappings[1].value,
        BoundValue::Data("s".to_string())
    );
}

#[test]
fn test_form_scoping() {
    let syms = analyze(
        "<a:component name=\"C\">\
         <a:handlers>h(q string)</a:handlers>\
         <form>\
         <div><button a:capture=\"click:h{q=form(q)}\"></button></div>\
         <input name=\"q\" type=\"text\">\
         <input name=\"n\" type=\"number\" min=\"1\">\
         <span a:bindings=\"form(n):N\"></span>\
         </form>\
         </a:component>",
    );
    let c = component(&syms, "C");
    // capture sits at depth 3; the form scope started at depth 1
    let capture = &c.unit.captures[0];
    assert_eq!(capture.path, vec![1, 0, 0]);
    assert_eq!(
        capture.mappings[0].param_mappings[0].value,
        BoundValue::FormValue {
            id: "q".to_string(),
            is_radio: false,
            form_depth: 2,
        }
    );
    // the discovered type of the number input flows into the auto binding
    let binding = &c.unit.variables[0];
    assert_eq!(binding.variable.name, "N");
    assert_eq!(binding.variable.type_, VarType::Int);
    assert_eq!(
        binding.value,
        BoundValue::FormValue {
            id: "n".to_string(),
            is_radio: false,
            form_depth: 1,
        }
    );
}

#[test]
fn test_control_block_path_reset() {
    let syms = analyze(
        "<a:component name=\"C\">\
         <div a:for=\"i := range xs\"><span a:assign=\"prop(x)=i\"></span></div>\
         </a:component>",
    );
    let c = component(&syms, "C");
    assert!(c.unit.block.assignments.is_empty());
    assert_eq!(c.unit.block.controlled.len(), 1);
    let cb = &c.unit.block.controlled[0];
    assert_eq!(cb.kind, ControlKind::For);
    assert_eq!(cb.expression, "xs");
    assert_eq!(cb.index.as_deref(), Some("i"));
    assert_eq!(cb.variable, None);
    assert_eq!(cb.path, vec![0]);
    // the span's path is relative to the for-body, not the component root
    assert_eq!(cb.block.assignments.len(), 1);
    assert_eq!(cb.block.assignments[0].path, vec![0]);
}

#[test]
fn test_nested_form_is_error() {
    let err = try_analyze("<a:component name=\"C\"><form><form></form></form></a:component>")
        .unwrap_err();
    assert!(err.to_string().contains("nested <form> not allowed"));
    assert!(err.to_string().starts_with("test.askew"));
}

#[test]
fn test_control_blocks_reversed() {
    let syms = analyze(
        "<a:component name=\"C\">\
         <div a:if=\"a\"></div>\
         <div a:if=\"b\"></div>\
         </a:component>",
    );
    let c = component(&syms, "C");
    assert_eq!(c.unit.block.controlled.len(), 2);
    assert_eq!(c.unit.block.controlled[0].expression, "b");
    assert_eq!(c.unit.block.controlled[0].path, vec![1]);
    assert_eq!(c.unit.block.controlled[1].expression, "a");
}

#[test]
fn test_assignment_on_control_element_lands_inside_block() {
    let syms = analyze(
        "<a:component name=\"C\">\
         <div a:if=\"cond\" a:assign=\"prop(hidden)=h\"></div>\
         </a:component>",
    );
    let c = component(&syms, "C");
    let cb = &c.unit.block.controlled[0];
    assert_eq!(cb.kind, ControlKind::If);
    assert_eq!(cb.block.assignments.len(), 1);
    assert_eq!(cb.block.assignments[0].path, Vec::<usize>::new());
}

#[test]
fn test_form_scope_survives_control_block() {
    let syms = analyze(
        "<a:component name=\"C\">\
         <form>\
         <input name=\"q\" type=\"text\">\
         <div a:for=\"i := range xs\"><span a:assign=\"form(q)=vals[i]\"></span></div>\
         </form>\
         </a:component>",
    );
    let c = component(&syms, "C");
    let cb = &c.unit.block.controlled[0];
    assert_eq!(cb.path, vec![0, 1]);
    assert_eq!(
        cb.block.assignments[0].target,
        BoundValue::FormValue {
            id: "q".to_string(),
            is_radio: false,
            form_depth: 2,
        }
    );
}

#[test]
fn test_radio_group_single_entry() {
    let syms = analyze(
        "<a:component name=\"C\">\
         <form a:bindings=\"form(pick):Choice\">\
         <input name=\"pick\" type=\"radio\" value=\"a\">\
         <input name=\"pick\" type=\"radio\" value=\"b\">\
         </form>\
         </a:component>",
    );
    let c = component(&syms, "C");
    let binding = &c.unit.variables[0];
    assert_eq!(binding.variable.type_, VarType::String);
    assert_eq!(
        binding.value,
        BoundValue::FormValue {
            id: "pick".to_string(),
            is_radio: true,
            form_depth: 0,
        }
    );
}

#[test]
fn test_duplicate_nonradio_form_name_is_error() {
    let err = try_analyze(
        "<a:component name=\"C\">\
         <form><input name=\"x\" type=\"text\"><input name=\"x\" type=\"text\"></form>\
         </a:component>",
    )
    .unwrap_err();
    assert!(err.to_string().contains("duplicate name `x` in same form"));
}

#[test]
fn test_list_embed_without_constructs() {
    let syms = analyze(
        "<a:component name=\"X\"></a:component>\
         <a:component name=\"Host\">\
         <a:embed name=\"items\" type=\"X\" list></a:embed>\
         </a:component>",
    );
    let host = component(&syms, "Host");
    assert_eq!(host.unit.embeds[0].kind, EmbedKind::List);
    assert!(host.unit.embeds[0].constructor_calls.is_empty());
    assert_eq!(host.unit.embeds[0].args.count(), 0);
    assert!(component(&syms, "X").needs_list);
    assert!(!component(&syms, "X").needs_optional);
}

#[test]
fn test_constructor_calls() {
    let syms = analyze(
        "<a:component name=\"X\" params=\"n int\"></a:component>\
         <a:component name=\"Host\">\
         <a:embed name=\"items\" type=\"X\" list>\
         <a:construct args=\"1\"></a:construct>\
         <a:construct args=\"k\" a:for=\"i := range ks\"></a:construct>\
         </a:embed>\
         <a:embed name=\"maybe\" type=\"X\" optional>\
         <a:construct args=\"0\" a:if=\"cond\"></a:construct>\
         </a:embed>\
         </a:component>",
    );
    let host = component(&syms, "Host");
    // reverse document order
    let maybe = &host.unit.embeds[0];
    assert_eq!(maybe.kind, EmbedKind::Optional);
    assert_eq!(maybe.constructor_calls.len(), 1);
    assert_eq!(maybe.constructor_calls[0].kind, NestedKind::If);
    assert_eq!(maybe.constructor_calls[0].expression.as_deref(), Some("cond"));
    let items = &host.unit.embeds[1];
    assert_eq!(items.constructor_calls.len(), 2);
    assert_eq!(items.constructor_calls[0].kind, NestedKind::Direct);
    assert_eq!(items.constructor_calls[1].kind, NestedKind::For);
    assert_eq!(items.constructor_calls[1].index.as_deref(), Some("i"));
    assert!(component(&syms, "X").needs_optional);
}

#[test]
fn test_optional_embed_rejects_second_construct() {
    let err = try_analyze(
        "<a:component name=\"X\"></a:component>\
         <a:component name=\"Host\">\
         <a:embed name=\"m\" type=\"X\" optional>\
         <a:construct args=\"\"></a:construct>\
         <a:construct args=\"\"></a:construct>\
         </a:embed>\
         </a:component>",
    )
    .unwrap_err();
    assert!(err.to_string().contains("too many <a:construct>"));
}

#[test]
fn test_embed_arity_checked() {
    let err = try_analyze(
        "<a:component name=\"X\" params=\"a int, b string\"></a:component>\
         <a:component name=\"Host\">\
         <a:embed name=\"x\" type=\"X\" args=\"1\"></a:embed>\
         </a:component>",
    )
    .unwrap_err();
    assert!(err
        .to_string()
        .contains("target component requires 2 arguments, but 1 were given"));
}

#[test]
fn test_direct_embed_requires_type() {
    let err = try_analyze(
        "<a:component name=\"Host\"><a:embed name=\"x\"></a:embed></a:component>",
    )
    .unwrap_err();
    assert!(err.to_string().contains("attribute `type` missing"));
}

#[test]
fn test_duplicate_handler_name_across_tables() {
    let err = try_analyze(
        "<a:component name=\"C\">\
         <a:handlers>go()</a:handlers>\
         <a:controller>go()</a:controller>\
         </a:component>",
    )
    .unwrap_err();
    assert!(err.to_string().contains("duplicate handler name: go"));
}

#[test]
fn test_handler_types_restricted() {
    let err = try_analyze(
        "<a:component name=\"C\"><a:handlers>f(m Model)</a:handlers></a:component>",
    )
    .unwrap_err();
    assert!(err
        .to_string()
        .contains("handlers must only use int, string and bool as parameter types"));
}

#[test]
fn test_controller_capture_guard() {
    // rich types are fine on controller methods, but not capturable
    let err = try_analyze(
        "<a:component name=\"C\">\
         <a:controller>update(m Model)</a:controller>\
         <button a:capture=\"click:update\"></button>\
         </a:component>",
    )
    .unwrap_err();
    assert!(err.to_string().contains("parameter types are not only int"));

    let syms = analyze(
        "<a:component name=\"C\">\
         <a:controller>pick(n int) bool</a:controller>\
         <button a:capture=\"click:pick\"></button>\
         </a:component>",
    );
    let mapping = &component(&syms, "C").unit.captures[0].mappings[0];
    assert!(mapping.from_controller);
    assert_eq!(mapping.handling, EventHandling::AskPreventDefault);
}

#[test]
fn test_unknown_capture_param_is_error() {
    let err = try_analyze(
        "<a:component name=\"C\">\
         <a:handlers>h(a int)</a:handlers>\
         <button a:capture=\"click:h{b=self}\"></button>\
         </a:component>",
    )
    .unwrap_err();
    assert!(err.to_string().contains("unknown param for capture mapping: b"));
}

#[test]
fn test_capture_inside_control_block_is_error() {
    let err = try_analyze(
        "<a:component name=\"C\">\
         <a:handlers>h()</a:handlers>\
         <div a:for=\"i := range xs\"><button a:capture=\"click:h\"></button></div>\
         </a:component>",
    )
    .unwrap_err();
    assert!(err.to_string().contains("cannot capture inside a:if or a:for"));
}

#[test]
fn test_if_and_for_mutually_exclusive() {
    let err = try_analyze(
        "<a:component name=\"C\"><div a:if=\"x\" a:for=\"i := range xs\"></div></a:component>",
    )
    .unwrap_err();
    assert!(err.to_string().contains("cannot have a:if and a:for on same element"));
}

#[test]
fn test_declarations_must_sit_at_depth_one() {
    let err = try_analyze(
        "<a:component name=\"C\"><div><a:handlers>h()</a:handlers></div></a:component>",
    )
    .unwrap_err();
    assert!(err
        .to_string()
        .contains("must be defined as direct child of <a:component>"));
}

#[test]
fn test_a_text_becomes_self_assignment() {
    let syms = analyze(
        "<a:component name=\"C\"><p><a:text expr=\"msg\"></a:text></p></a:component>",
    );
    let c = component(&syms, "C");
    assert_eq!(
        c.unit.block.assignments,
        vec![Assignment {
            expression: "msg".to_string(),
            target: BoundValue::Self_,
            path: vec![0, 0],
        }]
    );
    let p = c.template.children[0].as_element().unwrap();
    assert_eq!(p.children[0], crate::dom::Node::Comment("a:text".to_string()));
}

#[test]
fn test_data_declaration() {
    let syms = analyze(
        "<a:component name=\"C\"><a:data>count int = 0\nlabel string</a:data></a:component>",
    );
    let c = component(&syms, "C");
    assert_eq!(c.unit.fields.len(), 2);
    assert_eq!(c.unit.fields[0].name, "count");
    assert_eq!(c.unit.fields[0].default.as_deref(), Some("0"));
    assert_eq!(
        c.template.children[0],
        crate::dom::Node::Comment("data".to_string())
    );
}

#[test]
fn test_duplicate_component_name_in_file() {
    let err = try_analyze(
        "<a:component name=\"C\"></a:component><a:component name=\"C\"></a:component>",
    )
    .unwrap_err();
    assert!(err.to_string().contains("duplicate component name: `C`"));
}

#[test]
fn test_counter_increments_across_components() {
    let syms = analyze(
        "<a:component name=\"A\"></a:component><a:component name=\"B\"></a:component>",
    );
    assert_eq!(component(&syms, "A").id, "askew-component-1-a");
    assert_eq!(component(&syms, "B").id, "askew-component-2-b");
}

#[test]
fn test_analysis_is_deterministic() {
    let source = "<a:component name=\"Item\"></a:component>\
         <a:component name=\"C\">\
         <a:handlers>h(q string)</a:handlers>\
         <form><input name=\"q\" type=\"text\"><button a:capture=\"click:h{q=form(q)}\"></button></form>\
         <div a:for=\"i := range xs\"><a:embed name=\"e\" type=\"Item\"></a:embed></div>\
         </a:component>";
    let first = analyze(source);
    let second = analyze(source);
    assert_eq!(component(&first, "C"), component(&second, "C"));
    assert_eq!(component(&first, "Item"), component(&second, "Item"));
}

#[test]
fn test_embed_inside_control_block_joins_host_list() {
    let syms = analyze(
        "<a:component name=\"Item\"></a:component>\
         <a:component name=\"C\">\
         <div a:for=\"i := range xs\"><a:embed name=\"e\" type=\"Item\"></a:embed></div>\
         </a:component>",
    );
    let c = component(&syms, "C");
    assert_eq!(c.unit.embeds.len(), 1);
    // path is relative to the control block root
    assert_eq!(c.unit.embeds[0].path, vec![0]);
}

#[test]
fn test_aliased_embed_across_packages() {
    let mut base = BaseDir::default();
    base.packages.insert(
        "lib".to_string(),
        Package {
            path: "lib".to_string(),
            files: vec![file(
                "lib/widgets.askew",
                "<a:component name=\"Button\" params=\"label string\"></a:component>",
            )],
        },
    );
    let mut app = file(
        "app.askew",
        "<a:component name=\"Page\"><a:embed name=\"ok\" type=\"ui.Button\" args=\"caption\"></a:embed></a:component>",
    );
    app.imports.insert("ui".to_string(), "lib".to_string());
    base.packages.insert(
        String::new(),
        Package {
            path: String::new(),
            files: vec![app],
        },
    );

    let mut syms = Symbols::new(base);
    let mut counter = 0;
    units::process_file(&mut syms, &mut counter, "lib", 0).unwrap();
    units::process_file(&mut syms, &mut counter, "", 0).unwrap();

    let page = component(&syms, "Page");
    assert_eq!(page.unit.embeds[0].type_name.as_deref(), Some("Button"));
    assert_eq!(page.unit.embeds[0].namespace.as_deref(), Some("ui"));
    assert_eq!(page.unit.embeds[0].args.items, vec!["caption".to_string()]);
}
