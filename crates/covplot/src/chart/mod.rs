//! Coverage chart rendering
//!
//! Turns a [`CoverageSummary`] into a horizontal bar chart PNG.
//!
//! ## Components
//!
//! - [`font`]: 5x7 bitmap glyphs for labels
//! - [`canvas`]: clipped RGBA drawing surface
//! - [`palette`]: bar and furniture colours
//! - [`bar_chart`]: layout and rasterisation
//! - [`encoder`]: in-memory PNG encoding and writing
//!
//! ## Example
//!
//! ```no_run
//! use covplot::chart::{render, ChartStyle};
//! use covplot::summary::{CoverageSummary, SortOrder, SummaryEntry};
//! use std::path::Path;
//!
//! let summary = CoverageSummary::new(
//!     SortOrder::Descending,
//!     vec![SummaryEntry {
//!         file_name: "src/lib.rs".to_string(),
//!         coverage_percentage: 87.5,
//!         samples: 1,
//!     }],
//! );
//! render(&summary, Path::new("coverage_report.png"), &ChartStyle::default())?;
//! # Ok::<(), covplot::CovplotError>(())
//! ```

pub mod bar_chart;
pub mod canvas;
pub mod encoder;
pub mod font;
pub mod palette;

pub use bar_chart::{elide_label, format_percentage, BarChart, ChartLayout, ChartStyle};
pub use canvas::Canvas;
pub use encoder::{write_png, PngEncoder, PngMetadata};
pub use font::BitmapFont;
pub use palette::{colors, BarPalette, ColorPalette, Rgb};

use crate::result::CovplotResult;
use crate::summary::CoverageSummary;
use std::path::Path;
use tracing::{debug, info};

/// Rasterise and encode `summary` without touching the filesystem
pub fn render_to_bytes(summary: &CoverageSummary, style: &ChartStyle) -> CovplotResult<Vec<u8>> {
    let image = BarChart::new(style.clone()).draw(summary)?;
    debug!(
        width = image.width(),
        height = image.height(),
        bars = summary.len(),
        "chart rasterised"
    );

    let metadata = PngMetadata::new()
        .with_title(style.title.clone())
        .with_description(format!("{} files", summary.len()))
        .with_software(concat!("covplot ", env!("CARGO_PKG_VERSION")));
    PngEncoder::new().with_metadata(metadata).encode(&image)
}

/// Render `summary` as a PNG at `target`
///
/// The image is encoded before anything is written, so an empty summary or
/// an encoding failure leaves `target` untouched.
pub fn render(summary: &CoverageSummary, target: &Path, style: &ChartStyle) -> CovplotResult<()> {
    let bytes = render_to_bytes(summary, style)?;
    write_png(target, &bytes)?;
    info!(path = %target.display(), bytes = bytes.len(), "coverage chart written");
    Ok(())
}
