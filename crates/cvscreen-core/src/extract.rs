use std::io::Write;

use thiserror::Error;

use crate::{BackendError, PdfBackend};

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("failed to stage temporary file: {0}")]
    TempFile(#[from] std::io::Error),
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Extract text from an in-memory PDF.
///
/// The bytes are spooled to a named temporary file because backends open
/// documents by path. The tempfile guard deletes the file on drop, so the
/// file is cleaned up on every exit path, including extraction errors.
pub fn extract_text(data: &[u8], backend: &dyn PdfBackend) -> Result<String, ExtractError> {
    let mut tmp = tempfile::Builder::new()
        .prefix("cvscreen-")
        .suffix(".pdf")
        .tempfile()?;
    tmp.write_all(data)?;
    tmp.flush()?;

    let text = backend.extract_text(tmp.path())?;
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    /// Backend that returns the staged file's bytes as text, so tests can
    /// observe exactly what was written.
    struct EchoBackend;

    impl PdfBackend for EchoBackend {
        fn extract_text(&self, path: &Path) -> Result<String, BackendError> {
            std::fs::read_to_string(path).map_err(|e| BackendError::Open(e.to_string()))
        }
    }

    /// Backend that always fails but records the staged path.
    struct FailingBackend(std::sync::Mutex<Option<std::path::PathBuf>>);

    impl PdfBackend for FailingBackend {
        fn extract_text(&self, path: &Path) -> Result<String, BackendError> {
            *self.0.lock().unwrap() = Some(path.to_path_buf());
            Err(BackendError::Extraction("boom".into()))
        }
    }

    #[test]
    fn stages_bytes_for_the_backend() {
        let text = extract_text("резюме".as_bytes(), &EchoBackend).unwrap();
        assert_eq!(text, "резюме");
    }

    #[test]
    fn temp_file_is_removed_even_when_extraction_fails() {
        let backend = FailingBackend(std::sync::Mutex::new(None));
        let err = extract_text(b"%PDF-", &backend).unwrap_err();
        assert!(matches!(err, ExtractError::Backend(_)));

        let staged = backend.0.lock().unwrap().take().unwrap();
        assert!(!staged.exists());
    }
}
