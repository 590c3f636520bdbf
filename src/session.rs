use log::{debug, warn};

use crate::artifact::{InputFile, OutputArtifact};
use crate::error::{CompressError, SessionError};
use crate::model::DocumentModel;
use crate::pipeline::Compressor;
use crate::preset::{PresetCatalog, PresetId};
use crate::settings::{CompressionSettings, SettingsError};

/// Where the session is in its run lifecycle. Only one of loading, error and
/// result can hold at a time.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Running,
    Succeeded(OutputArtifact),
    Failed(String),
}

/// Per-page-load state behind the compressor UI.
#[derive(Debug, Clone, Default)]
pub struct Session {
    preset: PresetId,
    custom: CompressionSettings,
    phase: Phase,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn preset(&self) -> PresetId {
        self.preset
    }

    pub fn select_preset(&mut self, preset: PresetId) {
        debug!("Preset selected: {preset}");
        self.preset = preset;
    }

    pub fn custom_settings(&self) -> &CompressionSettings {
        &self.custom
    }

    /// Replaces the custom record with the result of `edit`. Refused unless the
    /// custom preset is selected; a failed edit leaves the record untouched.
    pub fn edit_custom<F>(&mut self, edit: F) -> Result<&CompressionSettings, SessionError>
    where
        F: FnOnce(CompressionSettings) -> Result<CompressionSettings, SettingsError>,
    {
        if self.preset != PresetId::Custom {
            return Err(SessionError::CustomNotSelected);
        }
        let edited = edit(self.custom)?;
        edited.validate()?;
        self.custom = edited;
        Ok(&self.custom)
    }

    pub fn set_custom_quality(&mut self, quality: f32) -> Result<&CompressionSettings, SessionError> {
        self.edit_custom(|s| s.with_quality(quality))
    }

    pub fn set_custom_objects_per_tick(
        &mut self,
        objects_per_tick: u32,
    ) -> Result<&CompressionSettings, SessionError> {
        self.edit_custom(|s| s.with_objects_per_tick(objects_per_tick))
    }

    pub fn set_custom_object_streams(&mut self, value: bool) -> Result<&CompressionSettings, SessionError> {
        self.edit_custom(|s| Ok(s.with_object_streams(value)))
    }

    pub fn set_custom_default_page(&mut self, value: bool) -> Result<&CompressionSettings, SessionError> {
        self.edit_custom(|s| Ok(s.with_default_page(value)))
    }

    pub fn resolve_settings(&self) -> CompressionSettings {
        PresetCatalog::global().resolve(self.preset, &self.custom)
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Running
    }

    pub fn error(&self) -> Option<&str> {
        match &self.phase {
            Phase::Failed(message) => Some(message),
            _ => None,
        }
    }

    pub fn output(&self) -> Option<&OutputArtifact> {
        match &self.phase {
            Phase::Succeeded(artifact) => Some(artifact),
            _ => None,
        }
    }

    /// A new file was picked: the previous result or error is dropped.
    pub fn select_file(&mut self) -> Result<(), SessionError> {
        if self.is_loading() {
            return Err(SessionError::Busy);
        }
        self.phase = Phase::Idle;
        Ok(())
    }

    /// Enters `Running` and returns the settings the run must use.
    pub fn begin(&mut self) -> Result<CompressionSettings, SessionError> {
        if self.is_loading() {
            return Err(SessionError::Busy);
        }
        self.phase = Phase::Running;
        Ok(self.resolve_settings())
    }

    pub fn finish(&mut self, result: Result<OutputArtifact, CompressError>) -> Result<&Phase, SessionError> {
        if !self.is_loading() {
            return Err(SessionError::NotRunning);
        }
        self.phase = match result {
            Ok(artifact) => Phase::Succeeded(artifact),
            Err(e) => {
                warn!("Compression failed: {e}");
                Phase::Failed(e.to_string())
            }
        };
        Ok(&self.phase)
    }

    /// Runs one compression from file selection to result.
    pub fn run<M: DocumentModel>(
        &mut self,
        compressor: &Compressor<M>,
        input: &InputFile,
    ) -> Result<&Phase, SessionError> {
        self.select_file()?;
        let settings = self.begin()?;
        let result = compressor
            .compress(input, &settings)
            .map(|bytes| OutputArtifact {
                bytes,
                original_len: input.bytes.len(),
            });
        self.finish(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_idle_with_balanced() {
        let session = Session::new();
        assert_eq!(session.preset(), PresetId::Balanced);
        assert_eq!(session.phase(), &Phase::Idle);
        assert!(!session.is_loading());
        assert_eq!(session.error(), None);
        assert_eq!(session.output(), None);
        assert_eq!(
            session.resolve_settings(),
            PresetCatalog::global().resolve(PresetId::Balanced, &CompressionSettings::default())
        );
    }

    #[test]
    fn custom_edits_require_custom_preset() {
        let mut session = Session::new();
        assert_eq!(
            session.set_custom_quality(0.9),
            Err(SessionError::CustomNotSelected)
        );

        session.select_preset(PresetId::Custom);
        session.set_custom_quality(0.9).unwrap();
        session.set_custom_objects_per_tick(25).unwrap();
        let settings = session.resolve_settings();
        assert_eq!(settings.quality, 0.9);
        assert_eq!(settings.objects_per_tick, 25);
        assert!(settings.use_object_streams);
        assert!(!settings.add_default_page);
    }

    #[test]
    fn rejected_edit_keeps_previous_record() {
        let mut session = Session::new();
        session.select_preset(PresetId::Custom);
        session.set_custom_quality(0.7).unwrap();
        assert_eq!(
            session.set_custom_quality(3.0),
            Err(SessionError::Settings(SettingsError::QualityOutOfRange(3.0)))
        );
        assert_eq!(
            session.set_custom_objects_per_tick(0),
            Err(SessionError::Settings(SettingsError::ZeroObjectsPerTick))
        );
        assert_eq!(session.custom_settings().quality, 0.7);
        assert_eq!(session.custom_settings().objects_per_tick, 50);
    }

    #[test]
    fn custom_record_survives_preset_switches() {
        let mut session = Session::new();
        session.select_preset(PresetId::Custom);
        session.set_custom_default_page(true).unwrap();
        session.set_custom_object_streams(false).unwrap();

        session.select_preset(PresetId::Maximum);
        assert_eq!(session.resolve_settings().objects_per_tick, 100);
        assert!(session.resolve_settings().use_object_streams);

        session.select_preset(PresetId::Custom);
        assert!(session.resolve_settings().add_default_page);
        assert!(!session.resolve_settings().use_object_streams);
    }

    #[test]
    fn lifecycle_transitions() {
        let mut session = Session::new();
        assert_eq!(
            session.finish(Ok(OutputArtifact {
                bytes: vec![],
                original_len: 0
            })),
            Err(SessionError::NotRunning)
        );

        let settings = session.begin().unwrap();
        assert_eq!(settings.objects_per_tick, 50);
        assert!(session.is_loading());
        assert_eq!(session.begin(), Err(SessionError::Busy));
        assert_eq!(session.select_file(), Err(SessionError::Busy));

        let artifact = OutputArtifact {
            bytes: b"%PDF".to_vec(),
            original_len: 8,
        };
        session.finish(Ok(artifact.clone())).unwrap();
        assert!(!session.is_loading());
        assert_eq!(session.output(), Some(&artifact));
        assert_eq!(session.error(), None);

        session.select_file().unwrap();
        assert_eq!(session.phase(), &Phase::Idle);

        session.begin().unwrap();
        let failure = CompressError::InvalidInputKind {
            media_type: "image/png".into(),
        };
        session.finish(Err(failure)).unwrap();
        assert_eq!(session.error(), Some("Please upload a PDF file"));
        assert_eq!(session.output(), None);
    }

    #[test]
    fn run_records_failure() {
        let mut session = Session::new();
        let input = InputFile::new("application/pdf", Vec::new());
        let phase = session.run(&Compressor::new(), &input).unwrap();
        assert!(matches!(phase, Phase::Failed(message) if message.starts_with("Failed to load PDF")));
        assert!(!session.is_loading());
    }
}
