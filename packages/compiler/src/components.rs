//! Component Analysis
//!
//! Walks each `<a:component>` and builds its IR: bindings, captures, embeds
//! and control blocks, with every DOM position recorded as an index path.
//! The same walk context analyzes the body of an `.asite` skeleton.

use indexmap::IndexMap;

use crate::attributes::{self, GeneralAttrs};
use crate::dom::{Element, Node};
use crate::error::{Error, Result};
use crate::ir::{
    Assignment, Block, BoundParam, BoundValue, Capture, Component, ControlBlock, ControlKind,
    ControllerMethod, Embed, EmbedKind, EventHandling, EventMapping, HandlerSig, NestedConstructorCall,
    NestedKind, Param, ParamType, UnboundEventMapping, Unit, VarType, VariableMapping,
};
use crate::parsers;
use crate::symbols::{ResolvedComponent, Symbols};
use crate::walker::{walk_children, Handlers, Step, TextPolicy};

/// Reads all components of the current file.
pub struct Processor<'a> {
    pub syms: &'a mut Symbols,
    /// Monotonic id counter, shared across the whole compilation.
    pub counter: &'a mut usize,
}

impl<'a> Processor<'a> {
    pub fn new(syms: &'a mut Symbols, counter: &'a mut usize) -> Self {
        Processor { syms, counter }
    }

    /// Process one `<a:component>` element. The element is replaced by a
    /// comment marker; the cleaned subtree moves into the component's
    /// `<template>`.
    pub fn process(&mut self, el: &mut Element) -> Result<Step> {
        let attrs = attributes::collect_component(el)?;
        if attrs.name.is_empty() {
            return Err(Error::missing_attribute(": attribute `name` missing"));
        }
        *self.counter += 1;
        let id = format!(
            "askew-component-{}-{}",
            *self.counter,
            attrs.name.to_lowercase()
        );
        let mut template = Element::new("template");
        template.set_attr("id", &id);
        let mut cmp = Component {
            name: attrs.name.clone(),
            id,
            parameters: attrs.params,
            init: attrs.init,
            template,
            unit: Unit::default(),
            needs_list: false,
            needs_optional: false,
        };

        let mut children = std::mem::take(&mut el.children);
        let mut path = Vec::new();
        {
            let mut walk = UnitWalk::new(&mut *self.syms, &mut cmp.unit);
            walk_children(&mut walk, &mut path, &mut children)?;
        }
        cmp.template.children = children;

        // Reverse so that emission processes embeds and control blocks back
        // to front: each insertion mutates sibling indices of later
        // siblings, and reverse order keeps the precomputed paths valid.
        cmp.unit.embeds.reverse();
        cmp.unit.block.controlled.reverse();

        self.syms.register_component(cmp)?;
        Ok(Step::replace(Node::Comment(format!(
            "component({})",
            attrs.name
        ))))
    }
}

/// Walk context for the body of a component or site skeleton.
pub(crate) struct UnitWalk<'a> {
    syms: &'a mut Symbols,
    unit: &'a mut Unit,
    form: FormScope,
    seen_handlers: bool,
    seen_controller: bool,
    seen_data: bool,
}

impl<'a> UnitWalk<'a> {
    pub(crate) fn new(syms: &'a mut Symbols, unit: &'a mut Unit) -> Self {
        UnitWalk {
            syms,
            unit,
            form: FormScope::default(),
            seen_handlers: false,
            seen_controller: false,
            seen_data: false,
        }
    }

    fn map_captures(&mut self, path: &[usize], captures: Vec<UnboundEventMapping>) -> Result<()> {
        if captures.is_empty() {
            return Ok(());
        }
        let form_depth = self.form.depth(path.len());
        let mut mappings = Vec::with_capacity(captures.len());
        for unmapped in captures {
            let (sig, from_controller) = if let Some(h) = self.unit.handlers.get(&unmapped.handler)
            {
                (h.clone(), false)
            } else if let Some(c) = self.unit.controller.get(&unmapped.handler) {
                if !c.can_capture {
                    return Err(Error::type_restriction(format!(
                        ": capture references handler whose parameter types are not only int, string and bool: {}",
                        unmapped.handler
                    )));
                }
                (c.sig.clone(), true)
            } else {
                return Err(Error::name_resolution(format!(
                    ": capture references unknown handler: {}",
                    unmapped.handler
                )));
            };

            let mut remaining = unmapped.param_mappings;
            let mut mapped = Vec::with_capacity(sig.params.len());
            for p in &sig.params {
                match remaining.shift_remove(&p.name) {
                    None => mapped.push(BoundParam {
                        param: p.name.clone(),
                        value: BoundValue::Data(p.name.clone()),
                    }),
                    Some(mut value) => {
                        self.form.resolve_form_value(&mut value, form_depth)?;
                        mapped.push(BoundParam {
                            param: p.name.clone(),
                            value,
                        });
                    }
                }
            }
            if let Some((unknown, _)) = remaining.first() {
                return Err(Error::name_resolution(format!(
                    ": unknown param for capture mapping: {}",
                    unknown
                )));
            }

            let handling = match unmapped.handling {
                EventHandling::AutoPreventDefault => {
                    if sig.returns == Some(ParamType::Bool) {
                        EventHandling::AskPreventDefault
                    } else {
                        EventHandling::DontPreventDefault
                    }
                }
                other => other,
            };
            mappings.push(EventMapping {
                event: unmapped.event,
                handler: unmapped.handler,
                param_mappings: mapped,
                handling,
                from_controller,
            });
        }
        self.unit.captures.push(Capture {
            path: path.to_vec(),
            mappings,
        });
        Ok(())
    }

    fn process_bindings(&mut self, path: &[usize], bindings: Vec<VariableMapping>) -> Result<()> {
        let form_depth = self.form.depth(path.len());
        for mut vb in bindings {
            if let BoundValue::FormValue { .. } = vb.value {
                self.form.resolve_form_value(&mut vb.value, form_depth)?;
                if vb.variable.type_ == VarType::Auto {
                    if let BoundValue::FormValue { ref id, .. } = vb.value {
                        if let Some(fv) = self.form.get(id) {
                            vb.variable.type_ = fv.type_;
                        }
                    }
                }
            } else if vb.variable.type_ == VarType::Auto {
                vb.variable.type_ = if matches!(vb.value, BoundValue::Class(_)) {
                    VarType::Bool
                } else {
                    VarType::String
                };
            }
            vb.path = path.to_vec();
            self.unit.variables.push(vb);
        }
        Ok(())
    }
}

impl Handlers for UnitWalk<'_> {
    fn std_element(&mut self, path: &mut Vec<usize>, el: &mut Element) -> Result<Step> {
        self.form.update(path, el)?;
        let mut attrs = attributes::extract_askew_attribs(el)?;
        let descend = handle_control_and_assignments(
            &mut *self.syms,
            &mut self.unit.block,
            &mut self.unit.embeds,
            &self.form,
            path,
            el,
            &mut attrs,
        )?;
        if descend {
            self.map_captures(path, std::mem::take(&mut attrs.capture))?;
            self.process_bindings(path, std::mem::take(&mut attrs.bindings))?;
            Ok(Step::descend())
        } else {
            if !attrs.capture.is_empty() {
                return Err(Error::structural(": cannot capture inside a:if or a:for"));
            }
            if !attrs.bindings.is_empty() {
                return Err(Error::structural(": cannot bind inside a:if or a:for"));
            }
            Ok(Step::skip())
        }
    }

    fn a_text(&mut self, path: &mut Vec<usize>, el: &mut Element) -> Result<Step> {
        process_a_text(&mut self.unit.block, path, el)
    }

    fn embed(&mut self, path: &mut Vec<usize>, el: &mut Element) -> Result<Step> {
        process_embed(&mut *self.syms, &mut self.unit.embeds, path, el)
    }

    fn handlers_decl(&mut self, path: &mut Vec<usize>, el: &mut Element) -> Result<Step> {
        if path.len() != 1 {
            return Err(Error::structural(
                ": must be defined as direct child of <a:component>",
            ));
        }
        let text = single_text_child(el)?;
        let parsed = parsers::parse_handlers(&text).map_err(|e| {
            Error::attribute_parse(format!(": unable to parse `{}`{}", text, e.message()))
        })?;
        if self.seen_handlers {
            return Err(Error::structural(
                ": only one <a:handlers> allowed per <a:component>",
            ));
        }
        self.seen_handlers = true;
        for raw in parsed {
            if self.unit.handlers.contains_key(&raw.name)
                || self.unit.controller.contains_key(&raw.name)
            {
                return Err(Error::structural(format!(
                    ": duplicate handler name: {}",
                    raw.name
                )));
            }
            if !can_capture(&raw.params) {
                return Err(Error::type_restriction(
                    ": handlers must only use int, string and bool as parameter types",
                ));
            }
            self.unit.handlers.insert(
                raw.name,
                HandlerSig {
                    params: raw.params,
                    returns: raw.returns,
                },
            );
        }
        Ok(Step::replace(Node::Comment("handlers".to_string())))
    }

    fn controller_decl(&mut self, path: &mut Vec<usize>, el: &mut Element) -> Result<Step> {
        if path.len() != 1 {
            return Err(Error::structural(
                ": must be defined as direct child of <a:component>",
            ));
        }
        let text = single_text_child(el)?;
        if self.seen_controller {
            return Err(Error::structural(
                ": only one <a:controller> allowed per <a:component>",
            ));
        }
        self.seen_controller = true;
        let parsed = parsers::parse_handlers(&text).map_err(|e| {
            Error::attribute_parse(format!(": unable to parse `{}`{}", text, e.message()))
        })?;
        for raw in parsed {
            if self.unit.controller.contains_key(&raw.name)
                || self.unit.handlers.contains_key(&raw.name)
            {
                return Err(Error::structural(format!(
                    ": duplicate handler name: {}",
                    raw.name
                )));
            }
            let can_capture = can_capture(&raw.params);
            self.unit.controller.insert(
                raw.name,
                ControllerMethod {
                    sig: HandlerSig {
                        params: raw.params,
                        returns: raw.returns,
                    },
                    can_capture,
                },
            );
        }
        Ok(Step::replace(Node::Comment("controller".to_string())))
    }

    fn data_decl(&mut self, path: &mut Vec<usize>, el: &mut Element) -> Result<Step> {
        if self.seen_data {
            return Err(Error::structural(": duplicate a:data for component"));
        }
        if path.len() != 1 {
            return Err(Error::structural(
                ": must be defined as direct child of <a:component>",
            ));
        }
        let text = single_text_child(el)?;
        self.unit.fields = parsers::parse_fields(&text).map_err(|e| {
            Error::attribute_parse(format!(": unable to parse fields{}", e.message()))
        })?;
        self.seen_data = true;
        Ok(Step::replace(Node::Comment("data".to_string())))
    }
}

/// Walk context for the interior of an `a:if`/`a:for` subtree. Paths are
/// relative to the controlled element; captures and bindings are forbidden,
/// only assignments, embeds and further control blocks remain.
struct CtrlBlockWalk<'a> {
    syms: &'a mut Symbols,
    block: &'a mut Block,
    embeds: &'a mut Vec<Embed>,
    form: FormScope,
}

impl Handlers for CtrlBlockWalk<'_> {
    fn std_element(&mut self, path: &mut Vec<usize>, el: &mut Element) -> Result<Step> {
        self.form.update(path, el)?;
        let mut attrs = attributes::extract_askew_attribs(el)?;
        if !attrs.capture.is_empty() {
            return Err(Error::structural(": cannot capture inside a:if or a:for"));
        }
        if !attrs.bindings.is_empty() {
            return Err(Error::structural(": cannot bind inside a:if or a:for"));
        }
        let descend = handle_control_and_assignments(
            &mut *self.syms,
            &mut *self.block,
            &mut *self.embeds,
            &self.form,
            path,
            el,
            &mut attrs,
        )?;
        Ok(Step {
            descend,
            replacement: None,
        })
    }

    fn a_text(&mut self, path: &mut Vec<usize>, el: &mut Element) -> Result<Step> {
        process_a_text(&mut *self.block, path, el)
    }

    fn embed(&mut self, path: &mut Vec<usize>, el: &mut Element) -> Result<Step> {
        process_embed(&mut *self.syms, &mut *self.embeds, path, el)
    }
}

/// `<a:text expr="…">` becomes a `Self`-targeted assignment plus a comment
/// marker.
fn process_a_text(block: &mut Block, path: &[usize], el: &mut Element) -> Result<Step> {
    let expr = el.take_attr("expr").unwrap_or_default();
    if expr.is_empty() {
        return Err(Error::missing_attribute(": missing attribute `expr`"));
    }
    if !el.children.is_empty() {
        return Err(Error::structural(": node may not have child nodes"));
    }
    block.assignments.push(Assignment {
        expression: expr,
        target: BoundValue::Self_,
        path: path.to_vec(),
    });
    Ok(Step::replace(Node::Comment("a:text".to_string())))
}

/// Handle `a:if`/`a:for` and `a:assign` of one element. Returns whether the
/// outer walker should descend: a controlled element walks its own subtree
/// with a reset index path.
fn handle_control_and_assignments(
    syms: &mut Symbols,
    block: &mut Block,
    embeds: &mut Vec<Embed>,
    form: &FormScope,
    path: &[usize],
    el: &mut Element,
    attrs: &mut GeneralAttrs,
) -> Result<bool> {
    let control = match (attrs.if_expr.take(), attrs.for_loop.take()) {
        (Some(_), Some(_)) => {
            return Err(Error::structural(
                ": cannot have a:if and a:for on same element",
            ))
        }
        (Some(expr), None) => Some(ControlBlock {
            kind: ControlKind::If,
            expression: expr,
            index: None,
            variable: None,
            path: path.to_vec(),
            block: Block::default(),
        }),
        (None, Some(f)) => Some(ControlBlock {
            kind: ControlKind::For,
            expression: f.expression,
            index: Some(f.index),
            variable: f.variable,
            path: path.to_vec(),
            block: Block::default(),
        }),
        (None, None) => None,
    };

    match control {
        Some(mut cb) => {
            // Paths inside the block are relative to its own root; the form
            // scope travels along with its start rebased into the block's
            // coordinate system.
            let inner_form = form.rebased(path.len());
            process_assignments_into(
                &mut cb.block,
                &inner_form,
                0,
                std::mem::take(&mut attrs.assign),
                Vec::new(),
            )?;
            let mut inner_path = Vec::new();
            {
                let mut walk = CtrlBlockWalk {
                    syms,
                    block: &mut cb.block,
                    embeds,
                    form: inner_form,
                };
                walk_children(&mut walk, &mut inner_path, &mut el.children)?;
            }
            cb.block.controlled.reverse();
            block.controlled.push(cb);
            Ok(false)
        }
        None => {
            process_assignments_into(
                block,
                form,
                path.len(),
                std::mem::take(&mut attrs.assign),
                path.to_vec(),
            )?;
            Ok(true)
        }
    }
}

fn process_assignments_into(
    block: &mut Block,
    form: &FormScope,
    path_len: usize,
    assignments: Vec<Assignment>,
    path: Vec<usize>,
) -> Result<()> {
    let form_depth = form.depth(path_len);
    for mut a in assignments {
        form.resolve_form_value(&mut a.target, form_depth)?;
        a.path = path.clone();
        block.assignments.push(a);
    }
    Ok(())
}

/// Resolve an `<a:embed>` element into an IR embed.
fn resolve_embed(
    syms: &mut Symbols,
    path: &[usize],
    el: &mut Element,
) -> Result<(Embed, Option<ResolvedComponent>)> {
    let attrs = attributes::collect_embed(el)?;
    let mut e = Embed {
        kind: EmbedKind::Direct,
        field: attrs.name,
        control: attrs.control,
        path: path.to_vec(),
        type_name: None,
        namespace: None,
        args: Default::default(),
        constructor_calls: Vec::new(),
    };
    if e.field.is_empty() {
        return Err(Error::missing_attribute(": attribute `name` missing"));
    }
    if attrs.list {
        e.kind = EmbedKind::List;
    }
    if attrs.optional {
        if e.kind != EmbedKind::Direct {
            return Err(Error::structural(": cannot mix `list` and `optional`"));
        }
        e.kind = EmbedKind::Optional;
    }
    let Some(type_ref) = attrs.type_ref else {
        if e.kind == EmbedKind::Direct {
            return Err(Error::missing_attribute(
                ": attribute `type` missing (may only be omitted for optional or list embeds)",
            ));
        }
        if attrs.args.count() != 0 {
            return Err(Error::structural(
                ": embed with `list` or `optional` cannot have `args`",
            ));
        }
        return Ok((e, None));
    };
    let target = syms.resolve_component(&type_ref).map_err(|err| {
        Error::name_resolution(format!(": attribute `type` invalid: {}", err.message()))
    })?;
    match e.kind {
        EmbedKind::List => syms.mark_needs_list(&target),
        EmbedKind::Optional => syms.mark_needs_optional(&target),
        EmbedKind::Direct => {}
    }
    e.type_name = Some(target.type_name.clone());
    e.namespace = if target.alias.is_empty() {
        None
    } else {
        Some(target.alias.clone())
    };
    if e.kind != EmbedKind::Direct {
        if attrs.args.count() != 0 {
            return Err(Error::structural(
                ": embed with `list` or `optional` cannot have `args`",
            ));
        }
    } else {
        e.args = attrs.args;
        if target.param_count != e.args.count() {
            return Err(Error::arity(format!(
                ": target component requires {} arguments, but {} were given",
                target.param_count,
                e.args.count()
            )));
        }
    }
    Ok((e, Some(target)))
}

/// Process an `<a:embed>`: resolve it, collect its constructor calls and
/// replace the element with an `embed(<field>)` comment so that sibling
/// indices stay stable.
fn process_embed(
    syms: &mut Symbols,
    embeds: &mut Vec<Embed>,
    path: &[usize],
    el: &mut Element,
) -> Result<Step> {
    let (mut e, target) = resolve_embed(syms, path, el)?;
    {
        let mut walk = ConstructWalk {
            embed: &mut e,
            target: target.as_ref(),
        };
        let mut construct_path = Vec::new();
        walk_children(&mut walk, &mut construct_path, &mut el.children)?;
    }
    if e.kind == EmbedKind::Optional && e.constructor_calls.len() > 1 {
        return Err(Error::structural(
            ": too many <a:construct> for optional embed",
        ));
    }
    if embeds.iter().any(|prev| prev.field == e.field) {
        return Err(Error::structural(format!(
            ": duplicate embed name: `{}`",
            e.field
        )));
    }
    let marker = Node::Comment(format!("embed({})", e.field));
    embeds.push(e);
    Ok(Step::replace(marker))
}

/// Walk context inside `<a:embed>`: only `<a:construct>` and whitespace.
struct ConstructWalk<'a> {
    embed: &'a mut Embed,
    target: Option<&'a ResolvedComponent>,
}

impl Handlers for ConstructWalk<'_> {
    fn text_policy(&self) -> TextPolicy {
        TextPolicy::WhitespaceOnly
    }

    fn construct(&mut self, _path: &mut Vec<usize>, el: &mut Element) -> Result<Step> {
        if self.embed.kind == EmbedKind::Direct {
            return Err(Error::structural(
                ": element requires list or optional embed as parent",
            ));
        }
        let Some(target) = self.target else {
            return Err(Error::structural(
                ": element requires embed with explicit type as parent",
            ));
        };
        let mut attrs = attributes::extract_askew_attribs(el)?;
        if !attrs.assign.is_empty() {
            return Err(Error::structural(": a:assign not allowed here"));
        }
        if !attrs.bindings.is_empty() {
            return Err(Error::structural(": a:bindings not allowed here"));
        }
        if !attrs.capture.is_empty() {
            return Err(Error::structural(": a:capture not allowed here"));
        }
        if attrs.if_expr.is_some() && attrs.for_loop.is_some() {
            return Err(Error::structural(": cannot have both a:if and a:for here"));
        }
        let args = parsers::analyse_arguments(&el.take_attr("args").unwrap_or_default())
            .map_err(|e| Error::attribute_parse(format!(": in args{}", e.message())))?;
        if args.count() != target.param_count {
            return Err(Error::arity(format!(
                ": target component requires {} arguments, but {} were given",
                target.param_count,
                args.count()
            )));
        }
        let call = if let Some(expression) = attrs.if_expr.take() {
            NestedConstructorCall {
                kind: NestedKind::If,
                expression: Some(expression),
                index: None,
                variable: None,
                args,
            }
        } else if let Some(f) = attrs.for_loop.take() {
            if self.embed.kind == EmbedKind::Optional {
                return Err(Error::structural(
                    ": a:for not allowed inside optional embed",
                ));
            }
            NestedConstructorCall {
                kind: NestedKind::For,
                expression: Some(f.expression),
                index: Some(f.index),
                variable: f.variable,
                args,
            }
        } else {
            NestedConstructorCall {
                kind: NestedKind::Direct,
                expression: None,
                index: None,
                variable: None,
                args,
            }
        };
        self.embed.constructor_calls.push(call);

        let mut empty = NoContent;
        let mut inner_path = Vec::new();
        walk_children(&mut empty, &mut inner_path, &mut el.children)?;
        Ok(Step::skip())
    }
}

/// Accepts whitespace and nothing else.
struct NoContent;

impl Handlers for NoContent {
    fn text_policy(&self) -> TextPolicy {
        TextPolicy::WhitespaceOnly
    }
}

fn can_capture(params: &[Param]) -> bool {
    params.iter().all(|p| p.type_.is_primitive())
}

fn single_text_child(el: &Element) -> Result<String> {
    match el.children.as_slice() {
        [Node::Text(text)] => Ok(text.clone()),
        _ => Err(Error::structural(
            ": must have plain text as content and nothing else",
        )),
    }
}

/// The active `<form>` scope: its discovered inputs and the path depth at
/// which it began. Never deeper than one (`<form>` does not nest).
#[derive(Debug, Clone, Default)]
struct FormScope {
    active: Option<ActiveForm>,
}

#[derive(Debug, Clone)]
struct ActiveForm {
    /// Start depth. Negative inside a control block whose root lies below
    /// the form element.
    start: isize,
    values: IndexMap<String, DiscoveredFormValue>,
}

#[derive(Debug, Clone, Copy)]
struct DiscoveredFormValue {
    type_: VarType,
    radio: bool,
}

impl FormScope {
    /// Called on entry of every plain element. Pops the scope once the walk
    /// has ascended above its start, then opens a new scope on `<form>`.
    fn update(&mut self, path: &[usize], el: &mut Element) -> Result<()> {
        if let Some(f) = &self.active {
            if (path.len() as isize) <= f.start {
                self.active = None;
            }
        }
        if el.name == "form" {
            if self.active.is_some() {
                return Err(Error::structural(": nested <form> not allowed"));
            }
            let values = discover_form_values(el)?;
            self.active = Some(ActiveForm {
                start: path.len() as isize,
                values,
            });
        }
        Ok(())
    }

    fn depth(&self, path_len: usize) -> Option<usize> {
        self.active
            .as_ref()
            .map(|f| (path_len as isize - f.start) as usize)
    }

    fn get(&self, id: &str) -> Option<&DiscoveredFormValue> {
        self.active.as_ref().and_then(|f| f.values.get(id))
    }

    /// The scope as seen from inside a control block rooted at the current
    /// element: same inputs, start shifted into the block's own path
    /// coordinates.
    fn rebased(&self, outer_len: usize) -> FormScope {
        FormScope {
            active: self.active.as_ref().map(|f| ActiveForm {
                start: f.start - outer_len as isize,
                values: f.values.clone(),
            }),
        }
    }

    /// Fill in depth and radio flag of a `form()` bound value, validating
    /// that a scope is active and the name exists.
    fn resolve_form_value(
        &self,
        value: &mut BoundValue,
        form_depth: Option<usize>,
    ) -> Result<()> {
        if let BoundValue::FormValue {
            id,
            is_radio,
            form_depth: fd,
        } = value
        {
            let depth = form_depth.ok_or_else(|| {
                Error::structural(": illegal form() binding outside of <form> element")
            })?;
            *fd = depth;
            let found = self.get(id).ok_or_else(|| {
                Error::name_resolution(format!(": unknown form value name: `{}`", id))
            })?;
            *is_radio = found.radio;
        }
        Ok(())
    }
}

/// Pre-scan a `<form>` subtree for named inputs, without descending into
/// `<a:embed>` or `<a:handlers>`.
fn discover_form_values(form: &mut Element) -> Result<IndexMap<String, DiscoveredFormValue>> {
    let mut discovery = FormValueDiscovery {
        values: IndexMap::new(),
    };
    let mut path = Vec::new();
    walk_children(&mut discovery, &mut path, &mut form.children)?;
    Ok(discovery.values)
}

struct FormValueDiscovery {
    values: IndexMap<String, DiscoveredFormValue>,
}

impl Handlers for FormValueDiscovery {
    fn std_element(&mut self, _path: &mut Vec<usize>, el: &mut Element) -> Result<Step> {
        let name = match el.attr("name") {
            Some(n) if !n.is_empty() => n.to_string(),
            _ => return Ok(Step::descend()),
        };
        let value = match el.name.as_str() {
            "input" => {
                let input_type = el.attr("type").unwrap_or("").to_string();
                match input_type.as_str() {
                    "radio" => DiscoveredFormValue {
                        type_: VarType::String,
                        radio: true,
                    },
                    "number" | "range" => {
                        for key in ["min", "max", "step"] {
                            if el.attr(key).unwrap_or("").contains('.') {
                                return Err(Error::type_restriction(format!(
                                    ": non-integer {} inputs not supported",
                                    input_type
                                )));
                            }
                        }
                        DiscoveredFormValue {
                            type_: VarType::Int,
                            radio: false,
                        }
                    }
                    "text" | "" => DiscoveredFormValue {
                        type_: VarType::String,
                        radio: false,
                    },
                    "submit" | "reset" | "hidden" => return Ok(Step::descend()),
                    _ => {
                        return Err(Error::type_restriction(format!(
                            ": unsupported input type: `{}`",
                            input_type
                        )))
                    }
                }
            }
            "select" | "textarea" => DiscoveredFormValue {
                type_: VarType::String,
                radio: false,
            },
            _ => return Ok(Step::descend()),
        };
        if let Some(existing) = self.values.get(&name) {
            if value.radio && existing.radio {
                return Ok(Step::descend());
            }
            return Err(Error::structural(format!(
                ": duplicate name `{}` in same form",
                name
            )));
        }
        self.values.insert(name, value);
        Ok(Step::descend())
    }

    fn a_text(&mut self, _path: &mut Vec<usize>, _el: &mut Element) -> Result<Step> {
        Ok(Step::skip())
    }

    fn embed(&mut self, _path: &mut Vec<usize>, _el: &mut Element) -> Result<Step> {
        Ok(Step::skip())
    }

    fn handlers_decl(&mut self, _path: &mut Vec<usize>, _el: &mut Element) -> Result<Step> {
        Ok(Step::skip())
    }
}
