//! Intermediate Representation
//!
//! The fully-resolved form of every analyzed component: template DOM, typed
//! field layout, binding and capture paths, the embed graph and control-flow
//! blocks. Built once during analysis, frozen before emission.
//!
//! All DOM positions are index paths (child-index descent from the component
//! root), never node references: the consumer executes against cloned
//! subtrees where node identity does not survive.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::dom::Element;

/// Type of a two-way bound variable. `Auto` only exists between parsing and
/// analysis; it is resolved to a concrete type when the binding is placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VarType {
    Auto,
    Int,
    String,
    Bool,
}

/// Type of a handler or controller-method parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParamType {
    Int,
    String,
    Bool,
    /// Any other declared type. Permitted on controller methods only.
    Named(String),
}

impl ParamType {
    pub fn is_primitive(&self) -> bool {
        !matches!(self, ParamType::Named(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    pub type_: ParamType,
}

/// Signature of a handler or controller method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandlerSig {
    pub params: Vec<Param>,
    pub returns: Option<ParamType>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerMethod {
    pub sig: HandlerSig,
    /// True iff every parameter type is in {int, string, bool}. Only such
    /// methods may be targeted by a capture.
    pub can_capture: bool,
}

/// An addressable source or sink for data on a template element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoundValue {
    /// The element itself.
    Self_,
    /// A DOM property of the element.
    Property(String),
    /// An inline style of the element.
    Style(String),
    /// A `data-*` entry of the element.
    Dataset(String),
    /// Boolean membership in one or more CSS classes.
    Class(Vec<String>),
    /// A named input of the enclosing `<form>`. `form_depth` is the number
    /// of path steps between the form scope's start and the element.
    FormValue {
        id: String,
        is_radio: bool,
        form_depth: usize,
    },
    /// A field read off the event object. Captures only.
    EventValue(String),
    /// A raw code expression. Captures only.
    Expression(String),
    /// The handler parameter itself; the default mapping.
    Data(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
    pub name: String,
    pub type_: VarType,
}

/// A two-way binding between a declared variable and a bound DOM value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableMapping {
    pub variable: Variable,
    pub value: BoundValue,
    pub path: Vec<usize>,
}

/// A one-way write of an expression into a bound DOM value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub expression: String,
    pub target: BoundValue,
    pub path: Vec<usize>,
}

/// A template region sharing one control context.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub assignments: Vec<Assignment>,
    /// Nested `a:if`/`a:for` blocks, stored in reverse document order so
    /// that emission can process them back to front while sibling indices
    /// stay valid.
    pub controlled: Vec<ControlBlock>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControlKind {
    If,
    For,
}

/// A subtree wrapped by `a:if` or `a:for`. Paths inside `block` are relative
/// to the controlled element itself, not to the component root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlBlock {
    pub kind: ControlKind,
    pub expression: String,
    pub index: Option<String>,
    pub variable: Option<String>,
    pub path: Vec<usize>,
    pub block: Block,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmbedKind {
    Direct,
    List,
    Optional,
}

/// A parsed argument list. Items are split at top-level commas only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Arguments {
    pub raw: String,
    pub items: Vec<String>,
}

impl Arguments {
    pub fn count(&self) -> usize {
        self.items.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NestedKind {
    Direct,
    If,
    For,
}

/// An `<a:construct>` seeding one initial item of a list or optional embed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NestedConstructorCall {
    pub kind: NestedKind,
    pub expression: Option<String>,
    pub index: Option<String>,
    pub variable: Option<String>,
    pub args: Arguments,
}

/// A slot in a template that instantiates another component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Embed {
    pub kind: EmbedKind,
    /// Field name on the host; unique within the host.
    pub field: String,
    /// Propagate the host as the embedded component's controller.
    pub control: bool,
    /// Path to the comment marker that replaced the `<a:embed>`.
    pub path: Vec<usize>,
    pub type_name: Option<String>,
    pub namespace: Option<String>,
    pub args: Arguments,
    pub constructor_calls: Vec<NestedConstructorCall>,
}

/// How an event mapping treats the browser's default action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventHandling {
    /// Pre-resolution only: rewritten to `AskPreventDefault` when the
    /// handler returns bool, `DontPreventDefault` otherwise.
    AutoPreventDefault,
    PreventDefault,
    DontPreventDefault,
    AskPreventDefault,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundParam {
    pub param: String,
    pub value: BoundValue,
}

/// One event of a capture, resolved against the declared handler signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventMapping {
    pub event: String,
    pub handler: String,
    /// One entry per formal parameter, in declaration order.
    pub param_mappings: Vec<BoundParam>,
    pub handling: EventHandling,
    pub from_controller: bool,
}

/// A capture as parsed from `a:capture`, before handler resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnboundEventMapping {
    pub event: String,
    pub handler: String,
    pub param_mappings: IndexMap<String, BoundValue>,
    pub handling: EventHandling,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capture {
    pub path: Vec<usize>,
    pub mappings: Vec<EventMapping>,
}

/// An instance field declared via `<a:data>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub type_: String,
    pub default: Option<String>,
}

/// The analyzable content shared by components and site skeletons.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    pub fields: Vec<Field>,
    pub handlers: IndexMap<String, HandlerSig>,
    pub controller: IndexMap<String, ControllerMethod>,
    pub block: Block,
    /// Reverse document order after analysis.
    pub embeds: Vec<Embed>,
    pub captures: Vec<Capture>,
    pub variables: Vec<VariableMapping>,
}

/// One declared UI component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    pub name: String,
    /// Synthesized `askew-component-<counter>-<lowercase name>`.
    pub id: String,
    pub parameters: Vec<Param>,
    pub init: Option<String>,
    /// The cleaned template subtree; a `<template>` element carrying the id.
    pub template: Element,
    pub unit: Unit,
    /// Set by referrers with list embeds, never by the component itself.
    pub needs_list: bool,
    /// Set by referrers with optional embeds.
    pub needs_optional: bool,
}
