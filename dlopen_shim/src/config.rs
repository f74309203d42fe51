//! Load-time configuration.
//!
//! Read once from the environment on the first intercepted call:
//!
//! - `DLOPEN_SHIM_RENAMES`: extra renames, `from=to,other.so=` (an empty
//!   replacement opens the main program)
//! - `DLOPEN_SHIM_QUIET`: when set, requested names are not logged

use std::io::Write;

use crate::rename::RenameTable;

pub const RENAMES_ENV: &str = "DLOPEN_SHIM_RENAMES";
pub const QUIET_ENV: &str = "DLOPEN_SHIM_QUIET";

#[derive(Clone, Debug, Default)]
pub struct ShimConfig {
    pub renames: RenameTable,
    pub quiet: bool,
}

impl ShimConfig {
    pub fn from_env() -> Self {
        let renames = std::env::var(RENAMES_ENV).ok();
        let quiet = std::env::var_os(QUIET_ENV).is_some();
        Self::from_vars(renames.as_deref(), quiet)
    }

    /// Build a config from already-read variable values.
    ///
    /// Invalid entries are reported on stderr and skipped; the shim keeps
    /// working with whatever did parse.
    pub fn from_vars(renames: Option<&str>, quiet: bool) -> Self {
        let mut table = RenameTable::builtin().unwrap_or_else(|e| {
            log_line(format_args!("invalid built-in rename table: {e:#}"));
            RenameTable::new()
        });

        if let Some(list) = renames {
            for e in table.extend_from_list(list) {
                log_line(format_args!("{RENAMES_ENV}: {e:#}"));
            }
        }

        Self {
            renames: table,
            quiet,
        }
    }
}

/// Write one diagnostic line to stderr, ignoring write failures.
pub(crate) fn log_line(args: std::fmt::Arguments<'_>) {
    let _ = writeln!(std::io::stderr(), "dlopen-shim: {args}");
}
