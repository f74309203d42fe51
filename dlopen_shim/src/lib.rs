//! dlopen-shim: redirect `dlopen()` requests through a rename table.
//!
//! The exported [`redirect_dlopen`] has the same signature as `dlopen(3)`.
//! It logs the requested name, swaps it for a configured replacement when
//! one matches exactly, and hands the call to the real loader. Whatever the
//! loader returns (including a null handle, with `dlerror()` set) is passed
//! back untouched.
//!
//! With the `interpose` feature the library also exports `dlopen` itself,
//! so it can be injected with `LD_PRELOAD`:
//!
//! ```text
//! DLOPEN_SHIM_RENAMES=libcudart.so=libcudart.so.12 \
//!     LD_PRELOAD=target/release/libdlopen_shim.so ./app
//! ```

pub mod config;
pub mod rename;

use std::ffi::CStr;
use std::sync::OnceLock;

use libc::{c_char, c_int, c_void};

pub use config::ShimConfig;
pub use rename::{Rename, RenameTable, BUILTIN_RENAMES};

use config::log_line;

/// Signature shared by `dlopen` and [`redirect_dlopen`].
pub type DlopenFn = unsafe extern "C" fn(*const c_char, c_int) -> *mut c_void;

static CONFIG: OnceLock<ShimConfig> = OnceLock::new();

/// Process-wide configuration, read from the environment on first use.
pub fn shim_config() -> &'static ShimConfig {
    CONFIG.get_or_init(ShimConfig::from_env)
}

/// Apply `config` to one `dlopen` request and forward it to `open`.
///
/// A null `filename` skips the lookup and is forwarded as-is. `flags` is
/// never modified and the result of `open` is returned unchanged.
///
/// # Safety
///
/// `filename` must be null or point to a NUL-terminated string that stays
/// valid for the duration of the call.
pub unsafe fn redirect<F>(
    config: &ShimConfig,
    filename: *const c_char,
    flags: c_int,
    open: F,
) -> *mut c_void
where
    F: FnOnce(*const c_char, c_int) -> *mut c_void,
{
    if filename.is_null() {
        return open(filename, flags);
    }

    // SAFETY: non-null and NUL-terminated per this function's contract.
    let requested = unsafe { CStr::from_ptr(filename) };
    let target = match config.renames.lookup(requested) {
        Some(rename) => {
            if !config.quiet {
                match &rename.replacement {
                    Some(to) => log_line(format_args!(
                        "{} -> {}",
                        requested.to_string_lossy(),
                        to.to_string_lossy()
                    )),
                    None => log_line(format_args!("{} -> (null)", requested.to_string_lossy())),
                }
            }
            rename.replacement_ptr()
        }
        None => {
            if !config.quiet {
                log_line(format_args!("{}", requested.to_string_lossy()));
            }
            filename
        }
    };

    open(target, flags)
}

#[cfg(not(feature = "interpose"))]
unsafe fn real_dlopen(filename: *const c_char, flags: c_int) -> *mut c_void {
    unsafe { libc::dlopen(filename, flags) }
}

// With `dlopen` exported from this library, `libc::dlopen` would bind back to
// it, so the next definition in lookup order is used instead.
#[cfg(feature = "interpose")]
unsafe fn real_dlopen(filename: *const c_char, flags: c_int) -> *mut c_void {
    static NEXT: OnceLock<Option<DlopenFn>> = OnceLock::new();

    let next = NEXT.get_or_init(|| {
        // SAFETY: RTLD_NEXT lookup of a symbol every libc provides.
        let sym = unsafe { libc::dlsym(libc::RTLD_NEXT, c"dlopen".as_ptr()) };
        if sym.is_null() {
            log_line(format_args!("could not resolve the next dlopen"));
            None
        } else {
            // SAFETY: the symbol is libc's dlopen, which has this signature.
            Some(unsafe { std::mem::transmute::<*mut c_void, DlopenFn>(sym) })
        }
    });

    match next {
        Some(dlopen) => unsafe { dlopen(filename, flags) },
        None => std::ptr::null_mut(),
    }
}

/// `dlopen(3)` replacement applying the process-wide rename table.
///
/// # Safety
///
/// Same contract as `dlopen(3)`: `filename` is null or a valid C string.
#[no_mangle]
pub unsafe extern "C" fn redirect_dlopen(filename: *const c_char, flags: c_int) -> *mut c_void {
    unsafe {
        redirect(shim_config(), filename, flags, |name, flags| {
            real_dlopen(name, flags)
        })
    }
}

/// Exported under the loader's own name for `LD_PRELOAD` use.
///
/// # Safety
///
/// Same contract as `dlopen(3)`.
#[cfg(feature = "interpose")]
#[no_mangle]
pub unsafe extern "C" fn dlopen(filename: *const c_char, flags: c_int) -> *mut c_void {
    unsafe { redirect_dlopen(filename, flags) }
}
