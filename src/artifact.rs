use std::io;
use std::path::Path;

pub const OUTPUT_FILE_NAME: &str = "compressed.pdf";
pub const OUTPUT_MEDIA_TYPE: &str = "application/pdf";

/// A file handed over by the picker: what the host says it is, plus its bytes.
#[derive(Debug, Clone)]
pub struct InputFile {
    pub media_type: String,
    pub bytes: Vec<u8>,
}

impl InputFile {
    pub fn new(media_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            media_type: media_type.into(),
            bytes,
        }
    }

    /// Reads a file from disk, declaring its type from the extension the way a
    /// browser file picker would.
    pub fn from_path(path: &Path) -> io::Result<Self> {
        let bytes = std::fs::read(path)?;
        Ok(Self::new(media_type_for(path), bytes))
    }

    /// Checks the declared type only, case-sensitively; the bytes are not
    /// sniffed.
    pub fn is_pdf(&self) -> bool {
        self.media_type.contains("pdf")
    }
}

pub fn media_type_for(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("pdf") => OUTPUT_MEDIA_TYPE,
        _ => "application/octet-stream",
    }
}

/// Result of a successful run, offered for download as `compressed.pdf`.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputArtifact {
    pub bytes: Vec<u8>,
    pub original_len: usize,
}

impl OutputArtifact {
    pub fn file_name(&self) -> &'static str {
        OUTPUT_FILE_NAME
    }

    pub fn media_type(&self) -> &'static str {
        OUTPUT_MEDIA_TYPE
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Percentage saved against the input; negative when the output grew.
    pub fn reduction_percent(&self) -> f64 {
        if self.original_len == 0 {
            return 0.0;
        }
        100.0 - (self.bytes.len() as f64 / self.original_len as f64 * 100.0)
    }
}
