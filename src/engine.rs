//! Binding to the pdfium shared library.
//!
//! `pdfium-render` loads pdfium dynamically at runtime. The library is
//! looked up in this order, first match wins:
//!
//! 1. the explicit path from [`crate::ConversionConfig::pdfium_lib_path`]
//! 2. `PDFIUM_LIB_PATH`
//! 3. the platform library name (`libpdfium.so`, `libpdfium.dylib`,
//!    `pdfium.dll`) in the current directory
//! 4. the system library search path
//!
//! Steps 1 and 2 accept either the library file or the directory holding it.
//! An explicit location that fails to load is an error; it never falls
//! through to the system library.

use crate::error::PdfStackError;
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable naming a pdfium library file or directory.
pub const PDFIUM_LIB_PATH_ENV: &str = "PDFIUM_LIB_PATH";

/// Bind pdfium, honouring an explicit location first.
pub fn bind_pdfium(explicit: Option<&Path>) -> Result<Pdfium, PdfStackError> {
    if let Some(path) = explicit {
        return bind_at(path);
    }

    if let Some(path) = std::env::var_os(PDFIUM_LIB_PATH_ENV).filter(|p| !p.is_empty()) {
        return bind_at(Path::new(&path));
    }

    let local = Pdfium::pdfium_platform_library_name_at_path("./");
    let bindings = Pdfium::bind_to_library(&local)
        .inspect(|_| debug!("Bound pdfium from {}", local.display()))
        .or_else(|_| Pdfium::bind_to_system_library())
        .map_err(|e| PdfStackError::PdfiumBindingFailed(format!("{e:?}")))?;

    Ok(Pdfium::new(bindings))
}

/// Bind to a library file, or to the platform library inside a directory.
fn bind_at(path: &Path) -> Result<Pdfium, PdfStackError> {
    let lib = library_file(path);
    debug!("Binding pdfium from {}", lib.display());

    Pdfium::bind_to_library(&lib)
        .map(Pdfium::new)
        .map_err(|e| PdfStackError::PdfiumBindingFailed(format!("'{}': {e:?}", lib.display())))
}

/// Resolve a user-supplied location to the library file itself.
fn library_file(path: &Path) -> PathBuf {
    if path.is_dir() {
        Pdfium::pdfium_platform_library_name_at_path(path)
    } else {
        path.to_path_buf()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directory_resolves_to_platform_library_name() {
        let dir = tempfile::tempdir().unwrap();
        let lib = library_file(dir.path());
        assert_eq!(lib.parent(), Some(dir.path()));
        assert_eq!(
            lib.file_name(),
            Some(Pdfium::pdfium_platform_library_name().as_os_str())
        );
    }

    #[test]
    fn file_path_is_kept_as_is() {
        let p = Path::new("/opt/pdfium/lib/libpdfium.so");
        assert_eq!(library_file(p), p.to_path_buf());
    }

    #[test]
    fn missing_explicit_library_is_a_binding_error() {
        match bind_pdfium(Some(Path::new("/definitely/not/libpdfium.so"))) {
            Err(PdfStackError::PdfiumBindingFailed(msg)) => {
                assert!(msg.contains("/definitely/not/libpdfium.so"), "got: {msg}")
            }
            Err(other) => panic!("unexpected error: {other:?}"),
            Ok(_) => panic!("binding a missing library should fail"),
        }
    }
}
