use log::{debug, info};

use crate::artifact::InputFile;
use crate::copier::copy_pages;
use crate::error::{CompressError, Stage};
use crate::model::{DocumentModel, Lopdf};
use crate::preset::{PresetCatalog, PresetId};
use crate::settings::CompressionSettings;

/// Rebuilds a PDF page by page into a fresh document and saves it with the
/// given settings.
///
/// Every call is independent: nothing from one run is kept for the next.
#[derive(Debug, Default, Clone)]
pub struct Compressor<M = Lopdf> {
    model: M,
}

impl Compressor<Lopdf> {
    pub fn new() -> Self {
        Self { model: Lopdf }
    }
}

impl<M: DocumentModel> Compressor<M> {
    pub fn with_model(model: M) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn compress(
        &self,
        input: &InputFile,
        settings: &CompressionSettings,
    ) -> Result<Vec<u8>, CompressError> {
        if !input.is_pdf() {
            return Err(CompressError::InvalidInputKind {
                media_type: input.media_type.clone(),
            });
        }
        settings.validate()?;

        let source = self
            .model
            .load(&input.bytes)
            .map_err(CompressError::at(Stage::Parse))?;
        debug!(
            "Loaded PDF {}: {} objects",
            source.version,
            source.objects.len()
        );

        let mut output = self.model.create();
        let pages = copy_pages(&source, &mut output).map_err(CompressError::at(Stage::CopyPages))?;
        drop(source);

        let bytes = self
            .model
            .save(&mut output, settings)
            .map_err(CompressError::at(Stage::Save))?;

        info!(
            "Compressed {} pages: {} -> {} bytes ({:?})",
            pages,
            input.bytes.len(),
            bytes.len(),
            settings
        );
        Ok(bytes)
    }

    /// Resolves `preset` against the catalog (or `custom`) and compresses.
    pub fn compress_with_preset(
        &self,
        input: &InputFile,
        preset: PresetId,
        custom: &CompressionSettings,
    ) -> Result<Vec<u8>, CompressError> {
        let settings = PresetCatalog::global().resolve(preset, custom);
        self.compress(input, &settings)
    }
}

/// Compresses with the default `lopdf` model.
pub fn compress(input: &InputFile, settings: &CompressionSettings) -> Result<Vec<u8>, CompressError> {
    Compressor::new().compress(input, settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_wrong_media_type_before_parsing() {
        let input = InputFile::new("text/plain", b"%PDF-1.7 but declared as text".to_vec());
        let err = compress(&input, &CompressionSettings::default()).unwrap_err();
        assert!(
            matches!(err, CompressError::InvalidInputKind { ref media_type } if media_type == "text/plain")
        );
        assert_eq!(err.to_string(), "Please upload a PDF file");
        assert_eq!(err.stage(), None);
    }

    #[test]
    fn empty_pdf_fails_at_parse() {
        let input = InputFile::new("application/pdf", Vec::new());
        let err = compress(&input, &CompressionSettings::default()).unwrap_err();
        assert_eq!(err.stage(), Some(Stage::Parse));
        assert!(err.to_string().starts_with("Failed to load PDF"));
    }

    #[test]
    fn invalid_settings_are_refused() {
        let input = InputFile::new("application/pdf", Vec::new());
        let settings = CompressionSettings {
            objects_per_tick: 0,
            ..CompressionSettings::default()
        };
        let err = compress(&input, &settings).unwrap_err();
        assert!(matches!(err, CompressError::InvalidSettings(_)));
    }
}
