//! Input validation: make sure the user-supplied path is a readable PDF.
//!
//! We check existence, read permission and the `%PDF-` header before
//! pdfium is bound, so a typo in the path is reported the same way whether
//! or not the pdfium library is installed.

use crate::error::PdfStackError;
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::{Path, PathBuf};
use tracing::debug;

/// pdfium accepts a header anywhere in this many leading bytes.
const HEADER_SEARCH_LEN: u64 = 1024;

const PDF_HEADER: &[u8] = b"%PDF-";

/// Validate a local file path, returning it as an owned `PathBuf`.
pub fn resolve_local(path: &Path) -> Result<PathBuf, PdfStackError> {
    let path = path.to_path_buf();

    if !path.is_file() {
        return Err(PdfStackError::FileNotFound { path });
    }

    match File::open(&path) {
        Ok(f) => {
            let mut head = Vec::new();
            f.take(HEADER_SEARCH_LEN)
                .read_to_end(&mut head)
                .map_err(|source| PdfStackError::CorruptPdf {
                    path: path.clone(),
                    detail: source.to_string(),
                })?;
            if !has_pdf_header(&head) {
                let mut magic = [0u8; 4];
                let n = head.len().min(4);
                magic[..n].copy_from_slice(&head[..n]);
                return Err(PdfStackError::NotAPdf { path, magic });
            }
        }
        Err(e) if e.kind() == ErrorKind::PermissionDenied => {
            return Err(PdfStackError::PermissionDenied { path });
        }
        Err(_) => {
            return Err(PdfStackError::FileNotFound { path });
        }
    }

    debug!("Resolved local PDF: {}", path.display());
    Ok(path)
}

fn has_pdf_header(head: &[u8]) -> bool {
    head.windows(PDF_HEADER.len()).any(|w| w == PDF_HEADER)
}
