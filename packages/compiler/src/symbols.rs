//! Symbol Table & Resolver
//!
//! Maps component references (bare names or `alias.Name`) to their
//! declarations and owns the per-file and per-package scopes. The
//! `needs_list`/`needs_optional` flags of a target component are set here,
//! in place, when a referrer embeds it; targets are always already analyzed
//! because packages are processed in dependency order.

use indexmap::IndexMap;

use crate::error::{Error, Result};
use crate::ir::Component;
use crate::project::{AskewFile, BaseDir};

#[derive(Debug, Clone)]
enum Cursor {
    None,
    File { pkg: String, index: usize },
    Site { imports: IndexMap<String, String> },
}

#[derive(Debug)]
pub struct Symbols {
    pub base: BaseDir,
    cursor: Cursor,
}

/// A successfully resolved component reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedComponent {
    /// Package key of the target.
    pub pkg: String,
    pub name: String,
    /// Exported type name of the target.
    pub type_name: String,
    /// Import alias used in the reference; empty for package-local refs.
    pub alias: String,
    pub param_count: usize,
}

impl Symbols {
    pub fn new(base: BaseDir) -> Self {
        Symbols {
            base,
            cursor: Cursor::None,
        }
    }

    pub fn set_current_file(&mut self, pkg: &str, index: usize) {
        self.cursor = Cursor::File {
            pkg: pkg.to_string(),
            index,
        };
    }

    pub fn set_current_site(&mut self, imports: IndexMap<String, String>) {
        self.cursor = Cursor::Site { imports };
    }

    pub fn file_mut(&mut self, pkg: &str, index: usize) -> Result<&mut AskewFile> {
        self.base
            .packages
            .get_mut(pkg)
            .and_then(|p| p.files.get_mut(index))
            .ok_or_else(|| {
                Error::name_resolution(format!("unknown source file in package `{}`", pkg))
            })
    }

    /// Resolve a bare name or `alias.Name` reference to a component.
    pub fn resolve_component(&self, reference: &str) -> Result<ResolvedComponent> {
        let (alias, name) = match reference.split_once('.') {
            Some((alias, name)) => (Some(alias), name),
            None => (None, reference),
        };
        match (&self.cursor, alias) {
            (Cursor::File { pkg, .. }, None) => self.find_in_package(pkg, name, ""),
            (Cursor::File { pkg, index }, Some(alias)) => {
                let file = self
                    .base
                    .packages
                    .get(pkg)
                    .and_then(|p| p.files.get(*index))
                    .ok_or_else(|| Error::name_resolution("no current file".to_string()))?;
                let target = file.imports.get(alias).ok_or_else(|| {
                    Error::name_resolution(format!("unknown import alias `{}`", alias))
                })?;
                self.find_in_package(target, name, alias)
            }
            (Cursor::Site { imports }, Some(alias)) => {
                let target = imports.get(alias).ok_or_else(|| {
                    Error::name_resolution(format!("unknown import alias `{}`", alias))
                })?;
                self.find_in_package(target, name, alias)
            }
            (Cursor::Site { .. }, None) => Err(Error::name_resolution(format!(
                "unknown component: {} (site skeletons must reference components through an import alias)",
                name
            ))),
            (Cursor::None, _) => Err(Error::name_resolution(
                "no compilation unit is active".to_string(),
            )),
        }
    }

    fn find_in_package(&self, pkg_key: &str, name: &str, alias: &str) -> Result<ResolvedComponent> {
        let pkg = self.base.packages.get(pkg_key).ok_or_else(|| {
            Error::name_resolution(format!("unknown package `{}`", pkg_key))
        })?;
        for file in &pkg.files {
            if let Some(cmp) = file.components.get(name) {
                return Ok(ResolvedComponent {
                    pkg: pkg_key.to_string(),
                    name: name.to_string(),
                    type_name: cmp.name.clone(),
                    alias: alias.to_string(),
                    param_count: cmp.parameters.len(),
                });
            }
        }
        Err(Error::name_resolution(format!(
            "unknown component: {}",
            name
        )))
    }

    fn component_mut(&mut self, target: &ResolvedComponent) -> Option<&mut Component> {
        self.base
            .packages
            .get_mut(&target.pkg)?
            .files
            .iter_mut()
            .find_map(|f| f.components.get_mut(&target.name))
    }

    pub fn mark_needs_list(&mut self, target: &ResolvedComponent) {
        if let Some(cmp) = self.component_mut(target) {
            cmp.needs_list = true;
        }
    }

    pub fn mark_needs_optional(&mut self, target: &ResolvedComponent) {
        if let Some(cmp) = self.component_mut(target) {
            cmp.needs_optional = true;
        }
    }

    /// Register a finished component in the current file. Component names
    /// are unique per file.
    pub fn register_component(&mut self, cmp: Component) -> Result<()> {
        let Cursor::File { pkg, index } = self.cursor.clone() else {
            return Err(Error::structural(
                ": components may only be declared in .askew files",
            ));
        };
        let file = self.file_mut(&pkg, index)?;
        if file.components.contains_key(&cmp.name) {
            return Err(Error::structural(format!(
                ": duplicate component name: `{}`",
                cmp.name
            )));
        }
        file.components.insert(cmp.name.clone(), cmp);
        Ok(())
    }
}
