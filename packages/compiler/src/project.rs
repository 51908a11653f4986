//! Project File Records
//!
//! Discovery (owned by the CLI crate) fills these in; the analyzer consumes
//! and mutates them. Packages are keyed by their root-relative directory
//! path, which is also the path `<a:import>` declarations refer to.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::dom::{Element, Node};
use crate::ir::{Component, Unit};

/// One `.askew` source file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AskewFile {
    /// File name without the `.askew` extension.
    pub base_name: String,
    pub path: String,
    /// Parsed fragment; mutated in place during analysis.
    pub content: Vec<Node>,
    /// Alias → package path, from the file's `<a:import>`.
    pub imports: IndexMap<String, String>,
    /// Filled by the analyzer, in document order.
    pub components: IndexMap<String, Component>,
}

/// One `.asite` skeleton file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ASiteFile {
    /// File name without the `.asite` extension.
    pub base_name: String,
    pub path: String,
    pub document: Vec<Node>,
    pub imports: IndexMap<String, String>,
    pub html_file: String,
    pub js_path: String,
    pub wasm_exec_path: String,
    pub wasm_path: String,
    /// The skeleton body, analyzed as a single implicit component.
    pub unit: Unit,
}

impl ASiteFile {
    pub fn root_element(&self) -> Option<&Element> {
        self.document.iter().find_map(|n| n.as_element())
    }

    pub fn root_element_mut(&mut self) -> Option<&mut Element> {
        self.document.iter_mut().find_map(|n| n.as_element_mut())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Package {
    /// Root-relative directory path; empty for the project root.
    pub path: String,
    pub files: Vec<AskewFile>,
}

/// Everything discovery found under the project root.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BaseDir {
    pub packages: IndexMap<String, Package>,
    pub sites: Vec<ASiteFile>,
}
