//! Preflight command - check tools and privileges before a run.

use anyhow::{bail, Result};

use crate::preflight;

/// Execute the preflight command.
pub fn cmd_preflight(strict: bool) -> Result<()> {
    let results = preflight::run_checks();

    println!("Preflight checks:");
    for check in &results {
        let marker = if check.passed() { "PASS" } else { "FAIL" };
        println!("  [{marker}] {:<16} {}", check.name, check.detail);
    }

    if preflight::all_passed(&results) {
        println!("\nAll checks passed.");
    } else if strict {
        bail!("preflight failed");
    } else {
        println!("\nSome checks failed; `gbmc install` will refuse to run.");
    }
    Ok(())
}
