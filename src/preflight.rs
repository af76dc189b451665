//! Preflight checks: privileges and native tools.
//!
//! Everything the installer shells out to must exist before a destructive
//! run starts, and the process must be root to open raw device nodes.

use crate::device;

/// Outcome of a single check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStatus {
    Pass,
    Fail,
}

/// One named check with a human-readable detail line.
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub detail: String,
}

impl CheckResult {
    pub fn pass(name: &str, detail: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Pass,
            detail: detail.to_string(),
        }
    }

    pub fn fail(name: &str, detail: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Fail,
            detail: detail.to_string(),
        }
    }

    pub fn passed(&self) -> bool {
        self.status == CheckStatus::Pass
    }
}

/// Native tools the given platform needs.
pub fn required_tools(os: &str) -> Vec<&'static str> {
    let mut tools = vec!["umount", "dd"];
    match os {
        "linux" => tools.push("lsblk"),
        "freebsd" | "dragonfly" => tools.push("geom"),
        "macos" => tools.push("diskutil"),
        _ => {}
    }
    tools
}

/// Suggest how to install a missing tool on the given platform.
pub fn install_suggestion(tool: &str, os: &str) -> String {
    match os {
        "linux" => format!(
            "Install {tool} using your package manager (e.g. `apt install {tool}` or `dnf install {tool}`)."
        ),
        "freebsd" | "dragonfly" => format!("Install {tool} using `pkg install {tool}`."),
        "macos" => format!("Install {tool} using Homebrew (`brew install {tool}`)."),
        _ => format!("Install {tool} manually for this platform."),
    }
}

/// Run all checks for the host platform.
pub fn run_checks() -> Vec<CheckResult> {
    let os = std::env::consts::OS;
    let mut results = Vec::new();

    if device::supported_platform(os) {
        results.push(CheckResult::pass("platform", os));
    } else {
        results.push(CheckResult::fail(
            "platform",
            &format!("no device enumeration support for '{os}'"),
        ));
    }

    if nix::unistd::geteuid().is_root() {
        results.push(CheckResult::pass("root privileges", "running as root"));
    } else {
        results.push(CheckResult::fail(
            "root privileges",
            "must be run as root; re-run with sudo or as root",
        ));
    }

    for tool in required_tools(os) {
        match which::which(tool) {
            Ok(path) => results.push(CheckResult::pass(tool, &path.display().to_string())),
            Err(_) => results.push(CheckResult::fail(tool, &install_suggestion(tool, os))),
        }
    }

    results
}

/// True when no check failed.
pub fn all_passed(results: &[CheckResult]) -> bool {
    results.iter().all(CheckResult::passed)
}
