//! Library rename table.
//!
//! Maps a requested library name to the name that is actually handed to the
//! loader. A replacement of `None` opens the main program, the same as
//! calling `dlopen(NULL, flags)`.

use anyhow::{bail, Context, Result};
use std::ffi::{CStr, CString};

/// Renames compiled into the shim. Entries configured at load time are
/// appended after these, so these win on duplicate names.
pub const BUILTIN_RENAMES: &[(&str, Option<&str>)] = &[];

/// One `requested -> replacement` entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rename {
    pub requested: CString,
    pub replacement: Option<CString>,
}

impl Rename {
    /// Replacement pointer to hand to the loader (null for `None`).
    pub fn replacement_ptr(&self) -> *const libc::c_char {
        self.replacement
            .as_deref()
            .map_or(std::ptr::null(), CStr::as_ptr)
    }
}

/// Ordered list of renames; the first matching entry applies.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RenameTable {
    entries: Vec<Rename>,
}

impl RenameTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Table holding [`BUILTIN_RENAMES`].
    pub fn builtin() -> Result<Self> {
        Self::from_pairs(BUILTIN_RENAMES.iter().copied())
    }

    pub fn from_pairs<'a>(
        pairs: impl IntoIterator<Item = (&'a str, Option<&'a str>)>,
    ) -> Result<Self> {
        let mut table = Self::new();
        for (requested, replacement) in pairs {
            table.push(requested, replacement)?;
        }
        Ok(table)
    }

    /// Append an entry.
    pub fn push(&mut self, requested: &str, replacement: Option<&str>) -> Result<()> {
        if requested.is_empty() {
            bail!("Empty library name in rename entry");
        }
        let requested = CString::new(requested)
            .with_context(|| format!("Library name {requested:?} contains a NUL byte"))?;
        let replacement = replacement
            .map(|name| {
                CString::new(name)
                    .with_context(|| format!("Replacement {name:?} contains a NUL byte"))
            })
            .transpose()?;
        self.entries.push(Rename {
            requested,
            replacement,
        });
        Ok(())
    }

    /// Append the entries of a `from=to,other.so=` list.
    ///
    /// Entries that fail to parse are skipped and returned so the caller can
    /// report them; the valid ones are still added.
    pub fn extend_from_list(&mut self, list: &str) -> Vec<anyhow::Error> {
        let mut errors = Vec::new();
        for entry in list.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let added = parse_entry(entry)
                .and_then(|(requested, replacement)| self.push(requested, replacement));
            if let Err(e) = added {
                errors.push(e.context(format!("Ignoring rename entry {entry:?}")));
            }
        }
        errors
    }

    /// First entry whose requested name equals `name`.
    pub fn lookup(&self, name: &CStr) -> Option<&Rename> {
        self.entries
            .iter()
            .find(|entry| entry.requested.as_c_str() == name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Split `from=to` into its parts; an empty `to` means "no name".
fn parse_entry(entry: &str) -> Result<(&str, Option<&str>)> {
    let Some((requested, replacement)) = entry.split_once('=') else {
        bail!("Expected 'name=replacement'");
    };
    let replacement = replacement.trim();
    Ok((
        requested.trim(),
        (!replacement.is_empty()).then_some(replacement),
    ))
}
