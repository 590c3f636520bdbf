//! Browser bindings. The host page owns the drop zone and the download link;
//! it hands over the dropped file's bytes and declared type and gets the
//! compressed bytes back.

use log::{info, Level, LevelFilter, Log, Metadata, Record};
use wasm_bindgen::prelude::*;

use crate::artifact::InputFile;
use crate::pipeline::Compressor;
use crate::preset::{PresetCatalog, PresetId};
use crate::session::Session;
use crate::settings::CompressionSettings;
use crate::{OUTPUT_FILE_NAME, OUTPUT_MEDIA_TYPE};

struct ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = JsValue::from_str(&format!("[{}] {}", record.target(), record.args()));
        match record.level() {
            Level::Error => web_sys::console::error_1(&line),
            Level::Warn => web_sys::console::warn_1(&line),
            _ => web_sys::console::log_1(&line),
        }
    }

    fn flush(&self) {}
}

static LOGGER: ConsoleLogger = ConsoleLogger;

#[wasm_bindgen(start)]
pub fn start() {
    // Better error messages in the browser console
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(LevelFilter::Info);
    }
}

fn run(input: &[u8], media_type: &str, settings: &CompressionSettings) -> Result<Vec<u8>, JsError> {
    let started = js_sys::Date::now();
    let input = InputFile::new(media_type, input.to_vec());
    let bytes = Compressor::new().compress(&input, settings)?;
    info!("Finished in {:.0} ms", js_sys::Date::now() - started);
    Ok(bytes)
}

/// One-shot compression with a named preset. `custom` uses the default
/// custom record.
#[wasm_bindgen]
pub fn compress_pdf(input: &[u8], media_type: &str, preset: &str) -> Result<Vec<u8>, JsError> {
    let preset: PresetId = preset.parse()?;
    let settings = PresetCatalog::global().resolve(preset, &CompressionSettings::default());
    run(input, media_type, &settings)
}

#[wasm_bindgen]
pub fn compress_pdf_custom(
    input: &[u8],
    media_type: &str,
    quality: f32,
    use_object_streams: bool,
    add_default_page: bool,
    objects_per_tick: u32,
) -> Result<Vec<u8>, JsError> {
    let settings =
        CompressionSettings::new(quality, use_object_streams, add_default_page, objects_per_tick)?;
    run(input, media_type, &settings)
}

#[wasm_bindgen]
pub fn preset_description(preset: &str) -> Result<String, JsError> {
    let preset: PresetId = preset.parse()?;
    Ok(PresetCatalog::global().describe(preset).to_string())
}

#[wasm_bindgen]
pub fn preset_ids() -> Vec<String> {
    PresetId::ALL.iter().map(|id| id.as_str().to_string()).collect()
}

/// Session object the page keeps for its lifetime.
#[wasm_bindgen]
pub struct PdfCompressor {
    session: Session,
    compressor: Compressor,
}

#[wasm_bindgen]
impl PdfCompressor {
    #[wasm_bindgen(constructor)]
    pub fn new() -> PdfCompressor {
        PdfCompressor {
            session: Session::new(),
            compressor: Compressor::new(),
        }
    }

    #[wasm_bindgen(js_name = selectPreset)]
    pub fn select_preset(&mut self, preset: &str) -> Result<(), JsError> {
        self.session.select_preset(preset.parse()?);
        Ok(())
    }

    #[wasm_bindgen(js_name = selectedPreset)]
    pub fn selected_preset(&self) -> String {
        self.session.preset().to_string()
    }

    #[wasm_bindgen(js_name = setCustomQuality)]
    pub fn set_custom_quality(&mut self, quality: f32) -> Result<(), JsError> {
        self.session.set_custom_quality(quality)?;
        Ok(())
    }

    #[wasm_bindgen(js_name = setCustomObjectsPerTick)]
    pub fn set_custom_objects_per_tick(&mut self, objects_per_tick: u32) -> Result<(), JsError> {
        self.session.set_custom_objects_per_tick(objects_per_tick)?;
        Ok(())
    }

    #[wasm_bindgen(js_name = setCustomObjectStreams)]
    pub fn set_custom_object_streams(&mut self, value: bool) -> Result<(), JsError> {
        self.session.set_custom_object_streams(value)?;
        Ok(())
    }

    #[wasm_bindgen(js_name = setCustomDefaultPage)]
    pub fn set_custom_default_page(&mut self, value: bool) -> Result<(), JsError> {
        self.session.set_custom_default_page(value)?;
        Ok(())
    }

    #[wasm_bindgen(js_name = selectFile)]
    pub fn select_file(&mut self) -> Result<(), JsError> {
        self.session.select_file()?;
        Ok(())
    }

    /// Runs the selected preset over the file and returns the output bytes.
    /// On failure the message is also kept for `error()`.
    pub fn compress(&mut self, input: &[u8], media_type: &str) -> Result<Vec<u8>, JsError> {
        let started = js_sys::Date::now();
        let input = InputFile::new(media_type, input.to_vec());
        self.session.run(&self.compressor, &input)?;
        info!("Finished in {:.0} ms", js_sys::Date::now() - started);

        match self.session.output() {
            Some(artifact) => Ok(artifact.bytes.clone()),
            None => Err(JsError::new(
                self.session
                    .error()
                    .unwrap_or("An error occurred while compressing the file"),
            )),
        }
    }

    #[wasm_bindgen(js_name = isLoading)]
    pub fn is_loading(&self) -> bool {
        self.session.is_loading()
    }

    pub fn error(&self) -> Option<String> {
        self.session.error().map(str::to_string)
    }

    pub fn output(&self) -> Option<Vec<u8>> {
        self.session.output().map(|a| a.bytes.clone())
    }

    #[wasm_bindgen(js_name = outputFileName)]
    pub fn output_file_name(&self) -> String {
        OUTPUT_FILE_NAME.to_string()
    }

    #[wasm_bindgen(js_name = outputMediaType)]
    pub fn output_media_type(&self) -> String {
        OUTPUT_MEDIA_TYPE.to_string()
    }
}

impl Default for PdfCompressor {
    fn default() -> Self {
        Self::new()
    }
}
