use thiserror::Error;

pub const MIN_QUALITY: f32 = 0.1;
pub const MAX_QUALITY: f32 = 1.0;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SettingsError {
    #[error("quality must be between 0.1 and 1.0, got {0}")]
    QualityOutOfRange(f32),

    #[error("objects per tick must be at least 1")]
    ZeroObjectsPerTick,

    #[error("unknown preset: {0}")]
    UnknownPreset(String),
}

/// Options handed to the document model when the output is saved.
///
/// Build through [`CompressionSettings::new`] or the `with_*` methods to get a
/// record that is known to be in range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompressionSettings {
    /// Nominal quality in `[0.1, 1.0]`. Carried to the save call but no
    /// image is re-encoded with it.
    pub quality: f32,
    /// Pack indirect objects into compressed object streams.
    pub use_object_streams: bool,
    /// Give the output a blank page when it would otherwise have none.
    pub add_default_page: bool,
    /// How many objects the save routine would handle per unit of work.
    /// Validated and carried to the save call; lopdf saves in one pass, so
    /// it does not change the output.
    pub objects_per_tick: u32,
}

impl Default for CompressionSettings {
    fn default() -> Self {
        Self {
            quality: 0.5,
            use_object_streams: true,
            add_default_page: false,
            objects_per_tick: 50,
        }
    }
}

impl CompressionSettings {
    pub fn new(
        quality: f32,
        use_object_streams: bool,
        add_default_page: bool,
        objects_per_tick: u32,
    ) -> Result<Self, SettingsError> {
        let settings = Self {
            quality,
            use_object_streams,
            add_default_page,
            objects_per_tick,
        };
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        // also rejects NaN
        if !(MIN_QUALITY..=MAX_QUALITY).contains(&self.quality) {
            return Err(SettingsError::QualityOutOfRange(self.quality));
        }
        if self.objects_per_tick == 0 {
            return Err(SettingsError::ZeroObjectsPerTick);
        }
        Ok(())
    }

    pub fn with_quality(self, quality: f32) -> Result<Self, SettingsError> {
        Self::new(
            quality,
            self.use_object_streams,
            self.add_default_page,
            self.objects_per_tick,
        )
    }

    pub fn with_objects_per_tick(self, objects_per_tick: u32) -> Result<Self, SettingsError> {
        Self::new(
            self.quality,
            self.use_object_streams,
            self.add_default_page,
            objects_per_tick,
        )
    }

    pub fn with_object_streams(self, use_object_streams: bool) -> Self {
        Self {
            use_object_streams,
            ..self
        }
    }

    pub fn with_default_page(self, add_default_page: bool) -> Self {
        Self {
            add_default_page,
            ..self
        }
    }
}
