//! Shrinks PDFs by rebuilding them page by page and re-saving them with
//! object streams, using one of a few fixed presets or custom settings.
//!
//! Built for the browser through `wasm-bindgen`; the same pipeline backs the
//! command-line tool.

pub mod artifact;
pub mod copier;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod preset;
pub mod session;
pub mod settings;

#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use artifact::{InputFile, OutputArtifact, OUTPUT_FILE_NAME, OUTPUT_MEDIA_TYPE};
pub use error::{CompressError, SessionError, Stage};
pub use model::{DocumentModel, Lopdf};
pub use pipeline::{compress, Compressor};
pub use preset::{Preset, PresetCatalog, PresetId};
pub use session::{Phase, Session};
pub use settings::{CompressionSettings, SettingsError};
