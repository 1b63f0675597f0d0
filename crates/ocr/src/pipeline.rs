use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::sync::mpsc;

use pinroute_core::{route, Registry, RoutingResult};

use crate::preprocess;
use crate::recognizer::{OcrEngine, OcrError};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image preprocessing failed: {0}")]
    Preprocess(#[from] preprocess::PreprocessError),
    #[error("OCR recognition failed: {0}")]
    Ocr(#[from] OcrError),
}

/// The outcome of sorting one envelope.
#[derive(Debug)]
pub struct SortResult {
    /// Raw text the OCR engine saw, kept for operator display.
    pub ocr_text: String,
    /// The routing decision made from that text.
    pub routing: RoutingResult,
}

/// Orchestrates one envelope: preprocess → OCR → route.
///
/// Holds the engine and registry for the life of the process; each call is
/// otherwise stateless — nothing about one envelope affects the next.
pub struct EnvelopePipeline<E: OcrEngine> {
    engine: E,
    registry: Registry,
}

impl<E: OcrEngine> EnvelopePipeline<E> {
    pub fn new(engine: E, registry: Registry) -> Self {
        Self { engine, registry }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Sort an envelope image on disk.
    pub async fn process_file(&self, path: &Path) -> Result<SortResult, PipelineError> {
        let bytes = tokio::fs::read(path).await?;
        self.process_bytes(&bytes)
    }

    /// Sort an envelope image held in memory (upload or camera capture).
    pub fn process_bytes(&self, data: &[u8]) -> Result<SortResult, PipelineError> {
        let prepared = preprocess::prepare_envelope_bytes(data)?;
        let ocr_text = self.engine.recognize(&prepared)?;
        let routing = route(&ocr_text, &self.registry);
        Ok(SortResult { ocr_text, routing })
    }
}

// ── Intake-folder integration ────────────────────────────────────────────────

/// Spawn a notify watcher on `intake_dir` that sends newly created file paths
/// to `tx`. Returns the watcher — it must be kept alive for watching to
/// continue.
pub fn spawn_intake_watcher(
    intake_dir: &Path,
    tx: mpsc::Sender<PathBuf>,
) -> notify::Result<impl notify::Watcher> {
    use notify::{EventKind, RecursiveMode, Watcher};

    let mut watcher = notify::recommended_watcher(move |event: notify::Result<notify::Event>| {
        if let Ok(ev) = event {
            if matches!(ev.kind, EventKind::Create(_)) {
                for path in ev.paths {
                    let _ = tx.try_send(path);
                }
            }
        }
    })?;

    watcher.watch(intake_dir, RecursiveMode::NonRecursive)?;
    Ok(watcher)
}

// ── Tests ────────────────────────────────────────────────────────────────────
