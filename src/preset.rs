use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;

use crate::settings::{CompressionSettings, SettingsError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PresetId {
    Maximum,
    #[default]
    Balanced,
    Minimal,
    Custom,
}

impl PresetId {
    /// Every preset, in the order the selection list shows them.
    pub const ALL: [PresetId; 4] = [
        PresetId::Maximum,
        PresetId::Balanced,
        PresetId::Minimal,
        PresetId::Custom,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PresetId::Maximum => "maximum",
            PresetId::Balanced => "balanced",
            PresetId::Minimal => "minimal",
            PresetId::Custom => "custom",
        }
    }
}

impl fmt::Display for PresetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PresetId {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "maximum" => Ok(PresetId::Maximum),
            "balanced" => Ok(PresetId::Balanced),
            "minimal" => Ok(PresetId::Minimal),
            "custom" => Ok(PresetId::Custom),
            _ => Err(SettingsError::UnknownPreset(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Preset {
    pub id: PresetId,
    pub settings: CompressionSettings,
    pub description: &'static str,
}

const CUSTOM_DESCRIPTION: &str = "Custom settings";

/// Fixed presets. The custom record is session state and never lives here.
#[derive(Debug)]
pub struct PresetCatalog {
    presets: [Preset; 3],
}

lazy_static! {
    static ref CATALOG: PresetCatalog = PresetCatalog::new();
}

impl PresetCatalog {
    fn new() -> Self {
        let preset = |id, quality, objects_per_tick, description| Preset {
            id,
            settings: CompressionSettings {
                quality,
                use_object_streams: true,
                add_default_page: false,
                objects_per_tick,
            },
            description,
        };

        Self {
            presets: [
                preset(
                    PresetId::Maximum,
                    0.2,
                    100,
                    "Maximum compression (smallest file)",
                ),
                preset(
                    PresetId::Balanced,
                    0.5,
                    50,
                    "Balanced compression (recommended)",
                ),
                preset(
                    PresetId::Minimal,
                    0.8,
                    25,
                    "Minimal compression (best quality)",
                ),
            ],
        }
    }

    pub fn global() -> &'static PresetCatalog {
        &CATALOG
    }

    /// Looks up a fixed preset. `None` for [`PresetId::Custom`].
    pub fn get(&self, id: PresetId) -> Option<&Preset> {
        self.presets.iter().find(|p| p.id == id)
    }

    pub fn presets(&self) -> &[Preset] {
        &self.presets
    }

    /// Settings for `id`; `custom` is the caller's live custom record.
    pub fn resolve(&self, id: PresetId, custom: &CompressionSettings) -> CompressionSettings {
        match self.get(id) {
            Some(preset) => preset.settings,
            None => *custom,
        }
    }

    pub fn describe(&self, id: PresetId) -> &'static str {
        self.get(id)
            .map(|p| p.description)
            .unwrap_or(CUSTOM_DESCRIPTION)
    }
}
