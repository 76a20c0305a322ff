//! PNG encoding for rendered charts
//!
//! Charts are encoded fully in memory; [`write_png`] then writes the bytes
//! to a temporary file next to the target and renames it into place, so a
//! failed encode or write never leaves a partial file.

use crate::result::{CovplotError, CovplotResult};
use image::RgbaImage;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Text chunks embedded in the PNG
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PngMetadata {
    /// Image title
    pub title: Option<String>,
    /// Image description
    pub description: Option<String>,
    /// Software that generated the image
    pub software: Option<String>,
}

impl PngMetadata {
    /// Create new empty metadata
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the title
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the description
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the software name
    #[must_use]
    pub fn with_software(mut self, software: impl Into<String>) -> Self {
        self.software = Some(software.into());
        self
    }

    fn chunks(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            ("Title", self.title.as_deref()),
            ("Description", self.description.as_deref()),
            ("Software", self.software.as_deref()),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.map(|v| (key, v)))
    }
}

/// PNG encoder for chart images
#[derive(Debug, Clone)]
pub struct PngEncoder {
    metadata: PngMetadata,
}

impl Default for PngEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl PngEncoder {
    /// Create an encoder with the default metadata
    #[must_use]
    pub fn new() -> Self {
        Self {
            metadata: PngMetadata::new().with_software(concat!("covplot ", env!("CARGO_PKG_VERSION"))),
        }
    }

    /// Set the metadata
    #[must_use]
    pub fn with_metadata(mut self, metadata: PngMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Get the current metadata
    #[must_use]
    pub fn metadata(&self) -> &PngMetadata {
        &self.metadata
    }

    /// Encode an RGBA image to PNG bytes
    pub fn encode(&self, img: &RgbaImage) -> CovplotResult<Vec<u8>> {
        let (width, height) = img.dimensions();
        let mut output = Vec::new();

        {
            let mut encoder = png::Encoder::new(&mut output, width, height);
            encoder.set_color(png::ColorType::Rgba);
            encoder.set_depth(png::BitDepth::Eight);
            encoder.set_compression(png::Compression::Balanced);

            for (keyword, text) in self.metadata.chunks() {
                // tEXt only carries Latin-1; anything else goes in iTXt as UTF-8
                let added = if is_latin1(text) {
                    encoder.add_text_chunk(keyword.to_string(), text.to_string())
                } else {
                    encoder.add_itxt_chunk(keyword.to_string(), text.to_string())
                };
                added.map_err(|e| CovplotError::render(format!("Failed to add PNG text chunk: {e}")))?;
            }

            let mut writer = encoder
                .write_header()
                .map_err(|e| CovplotError::render(format!("Failed to write PNG header: {e}")))?;

            writer
                .write_image_data(img.as_raw())
                .map_err(|e| CovplotError::render(format!("Failed to write PNG data: {e}")))?;

            writer
                .finish()
                .map_err(|e| CovplotError::render(format!("Failed to finish PNG stream: {e}")))?;
        }

        Ok(output)
    }
}

fn is_latin1(text: &str) -> bool {
    text.chars().all(|c| u32::from(c) <= 0xFF)
}

/// Write encoded bytes to `path`, creating parent directories
///
/// The bytes land in a temporary file in the same directory first; `path`
/// is only replaced once they are fully written.
pub fn write_png(path: &Path, data: &[u8]) -> CovplotResult<()> {
    let parent = match path.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(parent) => {
            fs::create_dir_all(parent).map_err(|e| {
                CovplotError::render(format!("Failed to create {}: {e}", parent.display()))
            })?;
            parent
        }
        None => Path::new("."),
    };

    let write_failed =
        |e: std::io::Error| CovplotError::render(format!("Failed to write {}: {e}", path.display()));

    let mut staged = NamedTempFile::new_in(parent).map_err(write_failed)?;
    // temp files start out owner-only
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        staged
            .as_file()
            .set_permissions(fs::Permissions::from_mode(0o644))
            .map_err(write_failed)?;
    }
    staged.write_all(data).map_err(write_failed)?;
    staged.as_file().sync_all().map_err(write_failed)?;
    staged.persist(path).map_err(|e| write_failed(e.error))?;
    Ok(())
}
