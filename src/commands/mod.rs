//! CLI command handlers.
//!
//! Each submodule handles a specific CLI command:
//! - `devices` - List candidate target devices
//! - `install` - Run the full unmount/wipe/download/write pipeline
//! - `preflight` - Check tools and privileges

pub mod devices;
pub mod install;
pub mod preflight;

pub use devices::cmd_devices;
pub use install::cmd_install;
pub use preflight::cmd_preflight;
