//! Path-Tracking Walker
//!
//! Depth-first traversal over the children of a node. The walker maintains
//! the index path from the walk root to the current node and dispatches each
//! node to the handler slot matching its kind. A handler may replace the
//! node in its parent's child list (preserving the sibling position) and
//! decides whether the walker descends into the children.
//!
//! Positions are index paths rather than node references: the IR is later
//! executed against cloned subtrees where node identity does not survive.

use crate::dom::{is_whitespace, Element, Node};
use crate::error::{Error, Result};

/// What the walker does with text nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextPolicy {
    /// Keep text nodes untouched.
    Allow,
    /// Error on any non-whitespace text.
    WhitespaceOnly,
    /// Ignore text content entirely.
    DontDescend,
}

/// A handler's verdict for the current node.
pub struct Step {
    pub descend: bool,
    pub replacement: Option<Node>,
}

impl Step {
    pub fn descend() -> Self {
        Step {
            descend: true,
            replacement: None,
        }
    }

    pub fn skip() -> Self {
        Step {
            descend: false,
            replacement: None,
        }
    }

    pub fn replace(node: Node) -> Self {
        Step {
            descend: false,
            replacement: Some(node),
        }
    }
}

enum AskewKind {
    Text,
    Embed,
    HandlersDecl,
    ControllerDecl,
    DataDecl,
    ImportDecl,
    Component,
    MacroDecl,
    Construct,
}

fn classify(name: &str) -> Result<Option<AskewKind>> {
    let Some(suffix) = name.strip_prefix("a:") else {
        return Ok(None);
    };
    let kind = match suffix {
        "text" => AskewKind::Text,
        "embed" => AskewKind::Embed,
        "handlers" => AskewKind::HandlersDecl,
        "controller" => AskewKind::ControllerDecl,
        "data" => AskewKind::DataDecl,
        "import" => AskewKind::ImportDecl,
        "component" => AskewKind::Component,
        "macro" => AskewKind::MacroDecl,
        "construct" => AskewKind::Construct,
        _ => {
            return Err(Error::structural(format!(
                ": unknown element <{}>",
                name
            )))
        }
    };
    Ok(Some(kind))
}

fn not_allowed() -> Error {
    Error::structural(": element not allowed here")
}

/// The handler record. Slots default to rejecting the element; a walk
/// context overrides the slots it accepts.
pub trait Handlers {
    fn text_policy(&self) -> TextPolicy {
        TextPolicy::Allow
    }

    fn std_element(&mut self, path: &mut Vec<usize>, el: &mut Element) -> Result<Step> {
        let _ = (path, el);
        Err(not_allowed())
    }

    fn a_text(&mut self, path: &mut Vec<usize>, el: &mut Element) -> Result<Step> {
        let _ = (path, el);
        Err(not_allowed())
    }

    fn embed(&mut self, path: &mut Vec<usize>, el: &mut Element) -> Result<Step> {
        let _ = (path, el);
        Err(not_allowed())
    }

    fn handlers_decl(&mut self, path: &mut Vec<usize>, el: &mut Element) -> Result<Step> {
        let _ = (path, el);
        Err(not_allowed())
    }

    fn controller_decl(&mut self, path: &mut Vec<usize>, el: &mut Element) -> Result<Step> {
        let _ = (path, el);
        Err(not_allowed())
    }

    fn data_decl(&mut self, path: &mut Vec<usize>, el: &mut Element) -> Result<Step> {
        let _ = (path, el);
        Err(not_allowed())
    }

    fn import_decl(&mut self, path: &mut Vec<usize>, el: &mut Element) -> Result<Step> {
        let _ = (path, el);
        Err(not_allowed())
    }

    fn component(&mut self, path: &mut Vec<usize>, el: &mut Element) -> Result<Step> {
        let _ = (path, el);
        Err(not_allowed())
    }

    fn macro_decl(&mut self, path: &mut Vec<usize>, el: &mut Element) -> Result<Step> {
        let _ = (path, el);
        Err(not_allowed())
    }

    fn construct(&mut self, path: &mut Vec<usize>, el: &mut Element) -> Result<Step> {
        let _ = (path, el);
        Err(not_allowed())
    }
}

/// Walk the given child list. Before visiting child *k* the walker pushes
/// *k* onto `path`; it pops after the subtree is done.
pub fn walk_children<H: Handlers>(
    h: &mut H,
    path: &mut Vec<usize>,
    children: &mut Vec<Node>,
) -> Result<()> {
    for i in 0..children.len() {
        path.push(i);
        let step = visit(h, path, &mut children[i])?;
        if let Some(replacement) = step.replacement {
            children[i] = replacement;
        }
        if step.descend {
            if let Node::Element(el) = &mut children[i] {
                walk_children(h, path, &mut el.children)?;
            }
        }
        path.pop();
    }
    Ok(())
}

fn visit<H: Handlers>(h: &mut H, path: &mut Vec<usize>, node: &mut Node) -> Result<Step> {
    match node {
        Node::Text(text) => match h.text_policy() {
            TextPolicy::Allow | TextPolicy::DontDescend => Ok(Step::skip()),
            TextPolicy::WhitespaceOnly => {
                if is_whitespace(text) {
                    Ok(Step::skip())
                } else {
                    Err(Error::structural(
                        ": non-whitespace text content not allowed here",
                    ))
                }
            }
        },
        Node::Comment(_) => Ok(Step::skip()),
        Node::Element(el) => {
            let name = el.name.clone();
            let result = match classify(&name)? {
                None => h.std_element(path, el),
                Some(AskewKind::Text) => h.a_text(path, el),
                Some(AskewKind::Embed) => h.embed(path, el),
                Some(AskewKind::HandlersDecl) => h.handlers_decl(path, el),
                Some(AskewKind::ControllerDecl) => h.controller_decl(path, el),
                Some(AskewKind::DataDecl) => h.data_decl(path, el),
                Some(AskewKind::ImportDecl) => h.import_decl(path, el),
                Some(AskewKind::Component) => h.component(path, el),
                Some(AskewKind::MacroDecl) => h.macro_decl(path, el),
                Some(AskewKind::Construct) => h.construct(path, el),
            };
            result.map_err(|e| e.in_element(&name))
        }
    }
}
