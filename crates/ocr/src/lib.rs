pub mod pipeline;
pub mod preprocess;
pub mod recognizer;

pub use pipeline::{spawn_intake_watcher, EnvelopePipeline, PipelineError, SortResult};
pub use preprocess::{prepare_envelope, prepare_envelope_bytes, PreprocessError};
pub use recognizer::{FixedTextEngine, OcrEngine, OcrError};
