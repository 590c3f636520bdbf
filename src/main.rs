use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use pdf_preset_compressor::{
    Compressor, CompressionSettings, InputFile, PresetCatalog, PresetId, Session,
};

/// Shrink a PDF by re-saving it with object streams
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Input PDF file
    input: PathBuf,

    /// Output PDF file
    output: PathBuf,

    /// Compression preset (maximum, balanced, minimal, custom)
    #[arg(long, default_value_t = PresetId::Balanced)]
    preset: PresetId,

    /// Quality between 0.1 and 1.0 (custom preset)
    #[arg(long)]
    quality: Option<f32>,

    /// Objects processed per unit of work (custom preset)
    #[arg(long)]
    objects_per_tick: Option<u32>,

    /// Save without object streams (custom preset)
    #[arg(long)]
    no_object_streams: bool,

    /// Add a blank page if the output would be empty (custom preset)
    #[arg(long)]
    add_default_page: bool,

    /// Declared media type of the input; guessed from the extension if absent
    #[arg(long)]
    media_type: Option<String>,
}

impl Args {
    fn has_custom_overrides(&self) -> bool {
        self.quality.is_some()
            || self.objects_per_tick.is_some()
            || self.no_object_streams
            || self.add_default_page
    }

    fn session(&self) -> Result<Session> {
        let mut session = Session::new();
        let preset = if self.has_custom_overrides() {
            PresetId::Custom
        } else {
            self.preset
        };
        session.select_preset(preset);

        if preset == PresetId::Custom {
            session.edit_custom(|settings| {
                let mut settings: CompressionSettings = settings
                    .with_object_streams(!self.no_object_streams)
                    .with_default_page(self.add_default_page);
                if let Some(quality) = self.quality {
                    settings = settings.with_quality(quality)?;
                }
                if let Some(objects_per_tick) = self.objects_per_tick {
                    settings = settings.with_objects_per_tick(objects_per_tick)?;
                }
                Ok(settings)
            })?;
        }
        Ok(session)
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let mut session = args.session()?;

    let mut input = InputFile::from_path(&args.input)
        .with_context(|| format!("Failed to read {:?}", args.input))?;
    if let Some(media_type) = &args.media_type {
        input.media_type = media_type.clone();
    }

    println!(
        "Compressing {:?} with {} preset: {}",
        args.input,
        session.preset(),
        PresetCatalog::global().describe(session.preset())
    );
    info!("Settings: {:?}", session.resolve_settings());

    let start = Instant::now();
    session.run(&Compressor::new(), &input)?;
    if let Some(message) = session.error() {
        anyhow::bail!("{message}");
    }
    let artifact = session
        .output()
        .context("Compression finished without output")?;
    println!("Compressed in {:.2?}", start.elapsed());

    std::fs::write(&args.output, &artifact.bytes)
        .with_context(|| format!("Failed to write {:?}", args.output))?;

    println!(
        "Original size: {:.2} MB",
        input.bytes.len() as f64 / 1_048_576.0
    );
    println!(
        "New size:      {:.2} MB ({:.1}% smaller)",
        artifact.len() as f64 / 1_048_576.0,
        artifact.reduction_percent()
    );

    Ok(())
}
