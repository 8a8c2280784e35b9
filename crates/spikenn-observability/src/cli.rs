//! CLI argument parsing for per-crate debug flags
//!
//! Supports flags like `--debug-spikenn-npu-engine` to raise one crate to
//! debug level, or `--debug-all` for every crate.

use std::collections::BTreeSet;
use std::env;

use crate::KNOWN_CRATES;

/// Crates whose log level is raised to `debug`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrateDebugFlags {
    pub enabled_crates: BTreeSet<String>,
}

impl CrateDebugFlags {
    /// Parse `--debug-{crate-name}` and `--debug-all` from arguments
    pub fn from_args<I>(args: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut flags = CrateDebugFlags::default();

        for arg in args {
            if arg == "--debug-all" {
                flags.enable_all();
            } else if let Some(crate_name) = arg.strip_prefix("--debug-") {
                flags.enabled_crates.insert(crate_name.to_string());
            }
        }

        flags
    }

    pub fn enable_all(&mut self) {
        self.enabled_crates
            .extend(KNOWN_CRATES.iter().map(|name| name.to_string()));
    }

    pub fn is_enabled(&self, crate_name: &str) -> bool {
        self.enabled_crates.contains(crate_name)
    }

    pub fn any_enabled(&self) -> bool {
        !self.enabled_crates.is_empty()
    }

    /// `EnvFilter` directive string, e.g. `"spikenn_npu_engine=debug,info"`.
    ///
    /// Crate names are converted to their module-path form, which is what
    /// tracing targets use.
    pub fn to_filter_string(&self, default_level: &str) -> String {
        let mut filters: Vec<String> = self
            .enabled_crates
            .iter()
            .map(|name| format!("{}=debug", name.replace('-', "_")))
            .collect();
        filters.push(default_level.to_lowercase());
        filters.join(",")
    }
}

/// Parse debug flags from process arguments and `SPIKENN_DEBUG`
///
/// `SPIKENN_DEBUG` is a comma-separated list of crate names, or `all`.
pub fn parse_debug_flags() -> CrateDebugFlags {
    let mut flags = CrateDebugFlags::from_args(env::args());

    if let Ok(env_var) = env::var("SPIKENN_DEBUG") {
        if env_var == "all" {
            flags.enable_all();
        } else {
            flags.enabled_crates.extend(
                env_var
                    .split(',')
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .map(str::to_string),
            );
        }
    }

    flags
}

/// Generate help text for debug flags
pub fn debug_flags_help() -> String {
    format!(
        r#"Debug Flags:
  --debug-all                    Enable debug logging for all crates
  --debug-{{crate-name}}          Enable debug logging for specific crate

Available crates:
  {}

Environment Variable:
  SPIKENN_DEBUG={{crate-name}}[,{{crate-name}}]
  SPIKENN_DEBUG=all
"#,
        KNOWN_CRATES.join(", ")
    )
}
