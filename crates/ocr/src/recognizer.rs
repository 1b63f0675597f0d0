use thiserror::Error;

#[derive(Debug, Error)]
pub enum OcrError {
    #[error("Image decode error: {0}")]
    ImageDecode(String),
    #[error("OCR engine error: {0}")]
    Engine(String),
    #[error("Tesseract not available — build with `tesseract` feature")]
    NotAvailable,
}

/// The external text-recognition collaborator.
///
/// Implementations take preprocessed PNG bytes and return whatever text the
/// engine saw. Engines are built once at startup and shared across requests;
/// `Send + Sync` so one instance can serve the watcher task and the CLI path.
pub trait OcrEngine: Send + Sync {
    fn recognize(&self, image_bytes: &[u8]) -> Result<String, OcrError>;
}

impl OcrEngine for Box<dyn OcrEngine> {
    fn recognize(&self, image_bytes: &[u8]) -> Result<String, OcrError> {
        (**self).recognize(image_bytes)
    }
}

// ── Fixed-text engine (always available, used for tests) ─────────────────────

/// Returns a canned string regardless of input, so the routing pipeline can
/// be exercised without Tesseract installed.
pub struct FixedTextEngine {
    pub text: String,
}

impl FixedTextEngine {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl OcrEngine for FixedTextEngine {
    fn recognize(&self, _image_bytes: &[u8]) -> Result<String, OcrError> {
        Ok(self.text.clone())
    }
}

// ── Tesseract engine (optional, gated behind `tesseract` feature) ────────────

#[cfg(feature = "tesseract")]
pub mod tesseract {
    use super::{OcrEngine, OcrError};
    use leptess::LepTess;

    /// Tesseract-backed engine. Holds configuration only; `LepTess` itself is
    /// not `Sync`, so a fresh handle is set up inside each `recognize` call.
    pub struct TesseractEngine {
        data_path: Option<String>,
        lang: String,
    }

    impl TesseractEngine {
        pub fn new(data_path: Option<String>, lang: &str) -> Self {
            Self { data_path, lang: lang.to_string() }
        }
    }

    impl OcrEngine for TesseractEngine {
        fn recognize(&self, image_bytes: &[u8]) -> Result<String, OcrError> {
            let mut lt = LepTess::new(self.data_path.as_deref(), &self.lang)
                .map_err(|e| OcrError::Engine(e.to_string()))?;
            lt.set_image_from_mem(image_bytes)
                .map_err(|e| OcrError::ImageDecode(e.to_string()))?;
            lt.get_utf8_text().map_err(|e| OcrError::Engine(e.to_string()))
        }
    }
}
