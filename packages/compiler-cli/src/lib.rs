//! Askew Compiler CLI
//!
//! Drives a whole compilation: discover sources, order packages by their
//! imports, analyze every `.askew` file and `.asite` skeleton, and
//! optionally dump the resulting IR as JSON. Code emission consumes the
//! same IR in a later stage.

pub mod discovery;

use std::path::Path;

use anyhow::bail;
use tracing::info;

use askew_compiler::symbols::Symbols;
use askew_compiler::units;

/// Analyze every source below `root`. With `dump_ir`, the analyzed project
/// is printed to stdout as JSON.
pub fn run(root: &Path, dump_ir: bool) -> anyhow::Result<()> {
    let base = discovery::discover(root)?;
    if base.packages.is_empty() && base.sites.is_empty() {
        bail!("no .askew or .asite files found under {}", root.display());
    }
    let order = discovery::order_packages(&base)?;

    let mut syms = Symbols::new(base);
    let mut counter = 0usize;
    for pkg in order {
        let file_count = syms
            .base
            .packages
            .get(&pkg)
            .map(|p| p.files.len())
            .unwrap_or(0);
        for index in 0..file_count {
            units::process_file(&mut syms, &mut counter, &pkg, index)?;
        }
    }

    let mut sites = std::mem::take(&mut syms.base.sites);
    for site in &mut sites {
        units::process_site(&mut syms, site)?;
    }
    syms.base.sites = sites;

    info!(
        "analyzed {} package(s), {} site(s)",
        syms.base.packages.len(),
        syms.base.sites.len()
    );

    if dump_ir {
        let stdout = std::io::stdout();
        serde_json::to_writer_pretty(stdout.lock(), &syms.base)?;
        println!();
    }
    Ok(())
}
