//! Source Discovery & Module Graph
//!
//! Scans a project root for `.askew` and `.asite` sources, parses each file
//! and collects its `<a:import>` declarations. Packages are keyed by their
//! root-relative directory path — the same path import lines refer to — and
//! are ordered by import dependencies so that every embed target is already
//! analyzed when it is referenced.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use anyhow::{bail, Context};
use indexmap::IndexMap;
use tracing::info;

use askew_compiler::dom::{self, Element, Node};
use askew_compiler::error::{Error, Result as CompileResult};
use askew_compiler::parsers;
use askew_compiler::project::{ASiteFile, AskewFile, BaseDir, Package};
use askew_compiler::walker::{walk_children, Handlers, Step, TextPolicy};

/// Walk the file system below `root` and load every source file.
pub fn discover(root: &Path) -> anyhow::Result<BaseDir> {
    let mut base = BaseDir::default();

    for path in sources(root, "askew")? {
        let rel = relative(&path, root);
        info!("discovered: {}", rel);
        let source = fs::read_to_string(&path).with_context(|| format!("reading {}", rel))?;
        let content = dom::parse_fragment(&source).map_err(|e| e.in_file(&rel))?;
        let mut file = AskewFile {
            base_name: base_name(&path),
            path: rel.clone(),
            content,
            ..Default::default()
        };
        scan_askew_imports(&mut file).map_err(|e| e.in_file(&rel))?;

        let pkg_key = package_key(&rel);
        let pkg = base
            .packages
            .entry(pkg_key.clone())
            .or_insert_with(|| Package {
                path: pkg_key,
                files: Vec::new(),
            });
        pkg.files.push(file);
    }

    for path in sources(root, "asite")? {
        let rel = relative(&path, root);
        info!("discovered: {}", rel);
        let source = fs::read_to_string(&path).with_context(|| format!("reading {}", rel))?;
        let document = dom::parse_document(&source).map_err(|e| e.in_file(&rel))?;
        let mut site = ASiteFile {
            base_name: base_name(&path),
            path: rel.clone(),
            document,
            ..Default::default()
        };
        scan_site_imports(&mut site).map_err(|e| e.in_file(&rel))?;
        base.sites.push(site);
    }

    Ok(base)
}

/// Topologically order package keys by their import dependencies. An import
/// cycle is a compile error.
pub fn order_packages(base: &BaseDir) -> anyhow::Result<Vec<String>> {
    let keys: Vec<String> = base.packages.keys().cloned().collect();
    let mut deps: IndexMap<&str, Vec<&str>> = IndexMap::new();
    for (key, pkg) in &base.packages {
        let mut targets = Vec::new();
        for file in &pkg.files {
            for target in file.imports.values() {
                if target != key
                    && base.packages.contains_key(target.as_str())
                    && !targets.contains(&target.as_str())
                {
                    targets.push(target.as_str());
                }
            }
        }
        deps.insert(key.as_str(), targets);
    }

    let mut ordered = Vec::with_capacity(keys.len());
    let mut placed: HashSet<&str> = HashSet::new();
    while ordered.len() < keys.len() {
        let mut progressed = false;
        for key in &keys {
            if placed.contains(key.as_str()) {
                continue;
            }
            let ready = deps
                .get(key.as_str())
                .map(|ts| ts.iter().all(|t| placed.contains(t)))
                .unwrap_or(true);
            if ready {
                placed.insert(key.as_str());
                ordered.push(key.clone());
                progressed = true;
            }
        }
        if !progressed {
            let remaining: Vec<&str> = keys
                .iter()
                .map(String::as_str)
                .filter(|k| !placed.contains(*k))
                .collect();
            bail!("import cycle among packages: {}", remaining.join(", "));
        }
    }
    Ok(ordered)
}

fn sources(root: &Path, extension: &str) -> anyhow::Result<Vec<std::path::PathBuf>> {
    let pattern = format!("{}/**/*.{}", root.display(), extension);
    let mut paths = Vec::new();
    for entry in glob::glob(&pattern).with_context(|| format!("bad glob pattern {}", pattern))? {
        paths.push(entry?);
    }
    paths.sort();
    Ok(paths)
}

fn relative(path: &Path, root: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn base_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn package_key(rel: &str) -> String {
    match rel.rsplit_once('/') {
        Some((dir, _)) => dir.to_string(),
        None => String::new(),
    }
}

/// Collect the `<a:import>` of an `.askew` file; components and macros are
/// left for unit processing.
fn scan_askew_imports(file: &mut AskewFile) -> CompileResult<()> {
    let mut content = std::mem::take(&mut file.content);
    let mut scan = ImportScan {
        imports: &mut file.imports,
        seen: false,
        skip_std_elements: false,
    };
    let mut path = Vec::new();
    let result = walk_children(&mut scan, &mut path, &mut content);
    file.content = content;
    result
}

/// Collect the `<a:import>` of an `.asite` skeleton. Imports must be direct
/// children of the root element; the rest of the skeleton is left alone.
fn scan_site_imports(site: &mut ASiteFile) -> CompileResult<()> {
    let Some(root) = site.document.iter_mut().find_map(|n| n.as_element_mut()) else {
        return Err(Error::structural(": missing root element"));
    };
    let mut imports = IndexMap::new();
    let mut scan = ImportScan {
        imports: &mut imports,
        seen: false,
        skip_std_elements: true,
    };
    let mut path = Vec::new();
    walk_children(&mut scan, &mut path, &mut root.children)?;
    site.imports = imports;
    Ok(())
}

struct ImportScan<'a> {
    imports: &'a mut IndexMap<String, String>,
    seen: bool,
    /// Site skeletons carry arbitrary markup next to the import element.
    skip_std_elements: bool,
}

impl Handlers for ImportScan<'_> {
    fn text_policy(&self) -> TextPolicy {
        if self.skip_std_elements {
            TextPolicy::Allow
        } else {
            TextPolicy::WhitespaceOnly
        }
    }

    fn std_element(&mut self, _path: &mut Vec<usize>, _el: &mut Element) -> Result<Step, Error> {
        if self.skip_std_elements {
            Ok(Step::skip())
        } else {
            Err(Error::structural(": element not allowed here"))
        }
    }

    fn import_decl(&mut self, _path: &mut Vec<usize>, el: &mut Element) -> Result<Step, Error> {
        let raw = match el.children.as_slice() {
            [] => String::new(),
            [Node::Text(text)] => text.clone(),
            _ => return Err(Error::structural(": may only contain text content")),
        };
        if self.seen {
            return Err(Error::structural(
                ": cannot have more than one <a:import> per file",
            ));
        }
        self.seen = true;
        *self.imports = parsers::parse_imports(&raw)?;
        Ok(Step::replace(Node::Comment("import".to_string())))
    }

    fn component(&mut self, _path: &mut Vec<usize>, _el: &mut Element) -> Result<Step, Error> {
        if self.skip_std_elements {
            Err(Error::structural(": element not allowed here"))
        } else {
            Ok(Step::skip())
        }
    }

    fn macro_decl(&mut self, _path: &mut Vec<usize>, _el: &mut Element) -> Result<Step, Error> {
        if self.skip_std_elements {
            Err(Error::structural(": element not allowed here"))
        } else {
            Ok(Step::skip())
        }
    }
}
