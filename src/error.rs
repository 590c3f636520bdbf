use std::fmt;

use thiserror::Error;

use crate::settings::SettingsError;

/// Pipeline step a document-model failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Parse,
    CopyPages,
    Save,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Parse => "load",
            Stage::CopyPages => "copy pages of",
            Stage::Save => "save",
        })
    }
}

#[derive(Error, Debug)]
pub enum CompressError {
    #[error("Please upload a PDF file")]
    InvalidInputKind { media_type: String },

    #[error("Failed to {stage} PDF: {source}")]
    DocumentProcessing {
        stage: Stage,
        #[source]
        source: lopdf::Error,
    },

    #[error("Invalid compression settings: {0}")]
    InvalidSettings(#[from] SettingsError),
}

impl CompressError {
    pub(crate) fn at(stage: Stage) -> impl FnOnce(lopdf::Error) -> CompressError {
        move |source| CompressError::DocumentProcessing { stage, source }
    }

    pub fn stage(&self) -> Option<Stage> {
        match self {
            CompressError::DocumentProcessing { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum SessionError {
    #[error("A compression run is already in progress")]
    Busy,

    #[error("No compression run is in progress")]
    NotRunning,

    #[error("Custom settings can only be edited while the custom preset is selected")]
    CustomNotSelected,

    #[error(transparent)]
    Settings(#[from] SettingsError),
}
