//! File-Level Drivers
//!
//! `process_file` analyzes the components of one `.askew` file in document
//! order. `process_site` handles an `.asite` skeleton: it resolves the
//! output-path attributes of the root element and analyzes its body as one
//! implicit component. The first error aborts the current file, prefixed
//! with its source path.

use tracing::info;

use crate::components::{Processor, UnitWalk};
use crate::error::{Error, Result};
use crate::project::ASiteFile;
use crate::symbols::Symbols;
use crate::walker::{walk_children, Handlers, Step, TextPolicy};
use crate::{attributes, dom};

/// Analyze all components of the file at `packages[pkg].files[index]`.
pub fn process_file(
    syms: &mut Symbols,
    counter: &mut usize,
    pkg: &str,
    index: usize,
) -> Result<()> {
    syms.set_current_file(pkg, index);
    let (file_path, mut content) = {
        let file = syms.file_mut(pkg, index)?;
        (file.path.clone(), std::mem::take(&mut file.content))
    };
    info!("processing units: {}", file_path);

    let mut path = Vec::new();
    let result = {
        let mut walk = FileWalk {
            processor: Processor::new(syms, counter),
        };
        walk_children(&mut walk, &mut path, &mut content)
    };

    let file = syms.file_mut(pkg, index)?;
    file.content = content;
    result.map_err(|e| e.in_file(&file_path))
}

struct FileWalk<'a> {
    processor: Processor<'a>,
}

impl Handlers for FileWalk<'_> {
    fn text_policy(&self) -> TextPolicy {
        TextPolicy::WhitespaceOnly
    }

    fn component(&mut self, _path: &mut Vec<usize>, el: &mut dom::Element) -> Result<Step> {
        self.processor.process(el)
    }

    fn macro_decl(&mut self, _path: &mut Vec<usize>, _el: &mut dom::Element) -> Result<Step> {
        Err(Error::structural(": macros are not supported"))
    }
}

/// Analyze an `.asite` skeleton.
pub fn process_site(syms: &mut Symbols, site: &mut ASiteFile) -> Result<()> {
    info!("processing site: {}", site.path);
    syms.set_current_site(site.imports.clone());
    let site_path = site.path.clone();
    let result = process_site_inner(syms, site);
    result.map_err(|e| e.in_file(&site_path))
}

fn process_site_inner(syms: &mut Symbols, site: &mut ASiteFile) -> Result<()> {
    process_site_descriptor(site)?;
    let mut document = std::mem::take(&mut site.document);
    let result = (|| {
        let root = document
            .iter_mut()
            .find_map(|n| n.as_element_mut())
            .ok_or_else(|| Error::structural(": missing root element"))?;
        let mut path = Vec::new();
        let mut walk = UnitWalk::new(syms, &mut site.unit);
        walk_children(&mut walk, &mut path, &mut root.children)
    })();
    site.document = document;
    result?;
    site.unit.embeds.reverse();
    site.unit.block.controlled.reverse();
    Ok(())
}

/// Resolve the output-path attributes of the site's root element, fill in
/// their defaults and rename the root to `html`.
fn process_site_descriptor(site: &mut ASiteFile) -> Result<()> {
    let base_name = site.base_name.clone();
    let attrs = {
        let root = site
            .root_element_mut()
            .ok_or_else(|| Error::structural(": missing root element"))?;
        attributes::collect_site(root)
    };
    site.html_file = attrs.html_file.unwrap_or_else(|| "index.html".to_string());
    site.js_path = attrs
        .js_path
        .unwrap_or_else(|| format!("{}.js", base_name));
    site.wasm_exec_path = attrs
        .wasm_exec_path
        .unwrap_or_else(|| "wasm_exec.js".to_string());
    site.wasm_path = attrs
        .wasm_path
        .unwrap_or_else(|| format!("{}.wasm", base_name));
    let root = site
        .root_element_mut()
        .ok_or_else(|| Error::structural(": missing root element"))?;
    root.name = "html".to_string();
    Ok(())
}
