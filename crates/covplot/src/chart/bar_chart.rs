//! Horizontal coverage bar chart
//!
//! ```text
//!              Code Coverage per File
//!   F  src/lib.rs |██████████████████ 92.0%
//!   i  src/cli.rs |███████████ 55.5%
//!   l  src/io.rs  |███ 12.5%
//!   e             +----+----+----+----+----+
//!                 0   20   40   60   80  100
//!                    Coverage Percentage
//! ```
//!
//! The best-covered file is always the top bar.

use super::canvas::Canvas;
use super::font::BitmapFont;
use super::palette::{colors, BarPalette, ColorPalette, Rgb};
use crate::result::{CovplotError, CovplotResult};
use crate::summary::CoverageSummary;
use image::RgbaImage;
use serde::{Deserialize, Serialize};

/// Narrowest canvas that still leaves room for labels and bars
pub const MIN_WIDTH: u32 = 320;
/// Widest accepted canvas
pub const MAX_WIDTH: u32 = 8192;
/// Tallest accepted canvas, including the height grown from the row count
pub const MAX_HEIGHT: u32 = 65_535;
/// Largest accepted per-bar height
pub const MAX_ROW_HEIGHT: u32 = 512;

const PADDING: u32 = 16;
const LABEL_GAP: u32 = 8;
const TICK_LENGTH: u32 = 5;
const BAR_FILL: f64 = 0.7;
const TICKS: [u32; 6] = [0, 20, 40, 60, 80, 100];
const ELLIPSIS: &str = "...";

/// Visual settings for the chart
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartStyle {
    /// Canvas width in pixels
    pub width: u32,
    /// Height reserved per bar in pixels
    pub row_height: u32,
    /// Canvas height floor in pixels
    pub min_height: u32,
    /// Chart title
    pub title: String,
    /// X axis label
    pub x_label: String,
    /// Y axis label
    pub y_label: String,
    /// Decimal places on bar annotations (1 or 2)
    pub decimals: u8,
    /// Fill for [`BarPalette::Solid`]
    pub bar_color: Rgb,
    /// Bar fill mode
    pub palette: BarPalette,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            width: 1000,
            row_height: 28,
            min_height: 600,
            title: "Code Coverage per File".to_string(),
            x_label: "Coverage Percentage".to_string(),
            y_label: "File".to_string(),
            decimals: 1,
            bar_color: colors::SKY_BLUE,
            palette: BarPalette::Solid,
        }
    }
}

impl ChartStyle {
    /// Create the default style
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the title
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the x axis label
    #[must_use]
    pub fn with_x_label(mut self, label: impl Into<String>) -> Self {
        self.x_label = label.into();
        self
    }

    /// Set the canvas width
    #[must_use]
    pub const fn with_width(mut self, width: u32) -> Self {
        self.width = width;
        self
    }

    /// Set annotation decimals
    #[must_use]
    pub const fn with_decimals(mut self, decimals: u8) -> Self {
        self.decimals = decimals;
        self
    }

    /// Set the bar fill mode
    #[must_use]
    pub const fn with_palette(mut self, palette: BarPalette) -> Self {
        self.palette = palette;
        self
    }

    /// Reject settings that cannot produce a readable chart
    pub fn validate(&self) -> CovplotResult<()> {
        if !(1..=2).contains(&self.decimals) {
            return Err(CovplotError::config(format!(
                "decimals must be 1 or 2, got {}",
                self.decimals
            )));
        }
        if !(MIN_WIDTH..=MAX_WIDTH).contains(&self.width) {
            return Err(CovplotError::config(format!(
                "width must be between {MIN_WIDTH} and {MAX_WIDTH}px, got {}",
                self.width
            )));
        }
        if !(8..=MAX_ROW_HEIGHT).contains(&self.row_height) {
            return Err(CovplotError::config(format!(
                "row_height must be between 8 and {MAX_ROW_HEIGHT}px, got {}",
                self.row_height
            )));
        }
        if self.min_height > MAX_HEIGHT {
            return Err(CovplotError::config(format!(
                "min_height must be at most {MAX_HEIGHT}px, got {}",
                self.min_height
            )));
        }
        Ok(())
    }

    /// Fill color for a bar
    #[must_use]
    pub fn bar_fill(&self, percentage: f64) -> Rgb {
        match self.palette {
            BarPalette::Solid => self.bar_color,
            BarPalette::Threshold => ColorPalette::traffic_light().color_for_coverage(percentage),
        }
    }
}

/// Format an annotation, e.g. `87.5%`
#[must_use]
pub fn format_percentage(value: f64, decimals: u8) -> String {
    format!("{:.*}%", usize::from(decimals), value)
}

/// Shorten `label` to `max_chars`, keeping its tail
#[must_use]
pub fn elide_label(label: &str, max_chars: usize) -> String {
    let count = label.chars().count();
    if count <= max_chars {
        return label.to_string();
    }
    if max_chars <= ELLIPSIS.len() {
        return label.chars().skip(count - max_chars).collect();
    }
    let keep = max_chars - ELLIPSIS.len();
    let tail: String = label.chars().skip(count - keep).collect();
    format!("{ELLIPSIS}{tail}")
}

/// Pixel geometry of a chart
#[derive(Debug, Clone, PartialEq)]
pub struct ChartLayout {
    /// Canvas width
    pub width: u32,
    /// Canvas height
    pub height: u32,
    /// Left edge of the plot area (0%)
    pub plot_left: u32,
    /// Plot area width (0% to 100%)
    pub plot_width: u32,
    /// Top edge of the plot area
    pub plot_top: u32,
    /// Plot area height
    pub plot_height: u32,
    /// Vertical space per bar
    pub row_pitch: f64,
    /// Bar thickness
    pub bar_height: u32,
    /// Labels longer than this are elided
    pub max_label_chars: usize,
}

impl ChartLayout {
    /// Compute the layout for `rows` bars whose longest label has `longest_label` chars
    ///
    /// Fails when the rows need a canvas taller than [`MAX_HEIGHT`].
    pub fn compute(style: &ChartStyle, rows: usize, longest_label: usize) -> CovplotResult<Self> {
        let label_font = BitmapFont::new(2);
        let title_font = BitmapFont::new(3);
        let advance = label_font.advance();

        let annotation_width = label_font.text_width(&format_percentage(100.0, style.decimals));
        let right_margin = LABEL_GAP + annotation_width + PADDING;
        let y_label_width = label_font.height() + PADDING;

        // labels may take at most 40% of the canvas
        let label_budget = (f64::from(style.width) * 0.4) as u32 / advance;
        let max_label_chars = longest_label.clamp(1, label_budget.max(4) as usize);
        let gutter = label_font.text_width(&"W".repeat(max_label_chars)) + LABEL_GAP;

        let plot_left = PADDING + y_label_width + gutter;
        let plot_width = style
            .width
            .saturating_sub(plot_left + right_margin)
            .max(1);

        let plot_top = PADDING + title_font.height() + PADDING;
        let bottom_margin =
            TICK_LENGTH + LABEL_GAP + label_font.height() + LABEL_GAP + label_font.height() + PADDING;

        let natural = u32::try_from(rows)
            .ok()
            .and_then(|rows| rows.checked_mul(style.row_height))
            .and_then(|bars| bars.checked_add(plot_top + bottom_margin))
            .filter(|&h| h <= MAX_HEIGHT)
            .ok_or_else(|| {
                CovplotError::render(format!(
                    "{rows} bars at {}px each exceed the {MAX_HEIGHT}px canvas limit",
                    style.row_height
                ))
            })?;
        let height = natural.max(style.min_height);
        let plot_height = height - plot_top - bottom_margin;

        let row_pitch = f64::from(plot_height) / rows.max(1) as f64;
        let bar_height = ((row_pitch * BAR_FILL).round() as u32).max(1);

        Ok(Self {
            width: style.width,
            height,
            plot_left,
            plot_width,
            plot_top,
            plot_height,
            row_pitch,
            bar_height,
            max_label_chars,
        })
    }

    /// Bottom edge of the plot area (the x axis)
    #[must_use]
    pub const fn plot_bottom(&self) -> u32 {
        self.plot_top + self.plot_height
    }

    /// X coordinate of a percentage on the axis
    #[must_use]
    pub fn x_for(&self, percentage: f64) -> u32 {
        let clamped = percentage.clamp(0.0, 100.0);
        self.plot_left + (clamped / 100.0 * f64::from(self.plot_width)).round() as u32
    }

    /// Vertical centre of bar `index` (0 = top)
    #[must_use]
    pub fn row_center(&self, index: usize) -> u32 {
        (f64::from(self.plot_top) + (index as f64 + 0.5) * self.row_pitch).round() as u32
    }

    /// `(x, y, width, height)` of bar `index` at `percentage`
    #[must_use]
    pub fn bar_rect(&self, index: usize, percentage: f64) -> (u32, u32, u32, u32) {
        let y = self.row_center(index).saturating_sub(self.bar_height / 2);
        let width = self.x_for(percentage) - self.plot_left;
        (self.plot_left, y, width, self.bar_height)
    }
}

/// Draws a [`CoverageSummary`] as a horizontal bar chart
#[derive(Debug, Clone)]
pub struct BarChart {
    style: ChartStyle,
    label_font: BitmapFont,
    title_font: BitmapFont,
}

impl BarChart {
    /// Create a chart with `style`
    #[must_use]
    pub fn new(style: ChartStyle) -> Self {
        Self {
            style,
            label_font: BitmapFont::new(2),
            title_font: BitmapFont::new(3),
        }
    }

    /// Layout for `summary`
    pub fn layout(&self, summary: &CoverageSummary) -> CovplotResult<ChartLayout> {
        let longest = summary
            .entries
            .iter()
            .map(|e| e.file_name.chars().count())
            .max()
            .unwrap_or(0);
        ChartLayout::compute(&self.style, summary.len(), longest)
    }

    /// Rasterise `summary`; an empty summary is an error
    pub fn draw(&self, summary: &CoverageSummary) -> CovplotResult<RgbaImage> {
        if summary.is_empty() {
            return Err(CovplotError::render(
                "no coverage rows to chart; refusing to write an empty image",
            ));
        }
        self.style.validate()?;

        let layout = self.layout(summary)?;
        let mut canvas = Canvas::new(layout.width, layout.height, colors::WHITE);

        self.draw_grid(&mut canvas, &layout);
        self.draw_bars(&mut canvas, &layout, summary);
        self.draw_axes(&mut canvas, &layout);
        self.draw_titles(&mut canvas, &layout);

        Ok(canvas.into_image())
    }

    fn draw_grid(&self, canvas: &mut Canvas, layout: &ChartLayout) {
        let font = self.label_font;
        let tick_label_y = layout.plot_bottom() + TICK_LENGTH + LABEL_GAP;
        for tick in TICKS {
            let x = layout.x_for(f64::from(tick));
            if tick > 0 {
                canvas.vline(x, layout.plot_top, layout.plot_height, colors::GRID);
            }
            canvas.vline(x, layout.plot_bottom(), TICK_LENGTH, colors::INK);

            let text = tick.to_string();
            let text_x = x.saturating_sub(font.text_width(&text) / 2);
            canvas.draw_text(text_x, tick_label_y, &text, font, colors::INK);
        }
    }

    fn draw_bars(&self, canvas: &mut Canvas, layout: &ChartLayout, summary: &CoverageSummary) {
        let font = self.label_font;
        for (index, entry) in summary.best_first().enumerate() {
            let pct = entry.coverage_percentage;
            let (x, y, width, height) = layout.bar_rect(index, pct);
            canvas.fill_rect(x, y, width, height, self.style.bar_fill(pct));

            let text_y = layout.row_center(index).saturating_sub(font.height() / 2);

            let label = elide_label(&entry.file_name, layout.max_label_chars);
            let label_x = layout
                .plot_left
                .saturating_sub(LABEL_GAP + font.text_width(&label));
            canvas.draw_text(label_x, text_y, &label, font, colors::INK);

            let annotation = format_percentage(pct, self.style.decimals);
            canvas.draw_text(x + width + LABEL_GAP, text_y, &annotation, font, colors::INK);
        }
    }

    fn draw_axes(&self, canvas: &mut Canvas, layout: &ChartLayout) {
        canvas.vline(layout.plot_left, layout.plot_top, layout.plot_height + 1, colors::INK);
        canvas.hline(layout.plot_left, layout.plot_bottom(), layout.plot_width + 1, colors::INK);
    }

    fn draw_titles(&self, canvas: &mut Canvas, layout: &ChartLayout) {
        let title_width = self.title_font.text_width(&self.style.title);
        canvas.draw_text(
            (layout.width.saturating_sub(title_width)) / 2,
            PADDING,
            &self.style.title,
            self.title_font,
            colors::INK,
        );

        let font = self.label_font;
        let x_label_width = font.text_width(&self.style.x_label);
        let x_label_y = layout.height - PADDING - font.height();
        canvas.draw_text(
            (layout.plot_left + layout.plot_width / 2).saturating_sub(x_label_width / 2),
            x_label_y,
            &self.style.x_label,
            font,
            colors::INK,
        );

        let y_label_span = font.text_width(&self.style.y_label);
        let y_label_top = (layout.plot_top + layout.plot_height / 2).saturating_sub(y_label_span / 2);
        canvas.draw_text_vertical(PADDING, y_label_top, &self.style.y_label, font, colors::INK);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::summary::{SortOrder, SummaryEntry};

    fn summary(order: SortOrder, rows: &[(&str, f64)]) -> CoverageSummary {
        CoverageSummary::new(
            order,
            rows.iter()
                .map(|&(name, pct)| SummaryEntry {
                    file_name: name.to_string(),
                    coverage_percentage: pct,
                    samples: 1,
                })
                .collect(),
        )
    }

    mod style_tests {
        use super::*;

        #[test]
        fn test_default_style() {
            let style = ChartStyle::default();
            assert_eq!(style.title, "Code Coverage per File");
            assert_eq!(style.x_label, "Coverage Percentage");
            assert_eq!(style.bar_color, colors::SKY_BLUE);
            assert!(style.validate().is_ok());
        }

        #[test]
        fn test_validate_decimals() {
            assert!(ChartStyle::new().with_decimals(0).validate().is_err());
            assert!(ChartStyle::new().with_decimals(2).validate().is_ok());
            assert!(ChartStyle::new().with_decimals(3).validate().is_err());
        }

        #[test]
        fn test_validate_width() {
            let err = ChartStyle::new().with_width(100).validate().unwrap_err();
            assert!(matches!(err, CovplotError::Config { .. }));
            assert!(ChartStyle::new().with_width(MAX_WIDTH).validate().is_ok());
            assert!(ChartStyle::new().with_width(MAX_WIDTH + 1).validate().is_err());
            assert!(ChartStyle::new().with_width(u32::MAX).validate().is_err());
        }

        #[test]
        fn test_validate_row_height() {
            let mut style = ChartStyle::new();
            style.row_height = 4;
            assert!(style.validate().is_err());
            style.row_height = MAX_ROW_HEIGHT;
            assert!(style.validate().is_ok());
            style.row_height = 100_000_000;
            assert!(matches!(style.validate(), Err(CovplotError::Config { .. })));
        }

        #[test]
        fn test_validate_min_height() {
            let mut style = ChartStyle::new();
            style.min_height = MAX_HEIGHT;
            assert!(style.validate().is_ok());
            style.min_height = u32::MAX;
            assert!(style.validate().is_err());
        }

        #[test]
        fn test_x_label_builder() {
            let style = ChartStyle::new().with_x_label("Lines hit (%)");
            assert_eq!(style.x_label, "Lines hit (%)");
            assert_eq!(style.y_label, "File");
        }

        #[test]
        fn test_threshold_fill() {
            let style = ChartStyle::new().with_palette(BarPalette::Threshold);
            let palette = ColorPalette::traffic_light();
            assert_eq!(style.bar_fill(10.0), palette.low);
            assert_eq!(style.bar_fill(95.0), palette.full);
            assert_eq!(ChartStyle::new().bar_fill(10.0), colors::SKY_BLUE);
        }

        #[test]
        fn test_partial_yaml_keeps_defaults() {
            let style: ChartStyle =
                serde_yaml_ng::from_str("title: Flutter Test Coverage by File\nbar_color: '#FF0000'\n")
                    .unwrap();
            assert_eq!(style.title, "Flutter Test Coverage by File");
            assert_eq!(style.bar_color, Rgb::new(255, 0, 0));
            assert_eq!(style.width, 1000);
        }
    }

    mod label_tests {
        use super::*;

        #[test]
        fn test_format_percentage() {
            assert_eq!(format_percentage(50.0, 1), "50.0%");
            assert_eq!(format_percentage(66.666, 2), "66.67%");
            assert_eq!(format_percentage(0.0, 1), "0.0%");
        }

        #[test]
        fn test_elide_short_label_untouched() {
            assert_eq!(elide_label("a.py", 10), "a.py");
        }

        #[test]
        fn test_elide_keeps_tail() {
            assert_eq!(elide_label("src/very/deep/module.rs", 12), "...module.rs");
            assert_eq!(elide_label("src/very/deep/module.rs", 12).chars().count(), 12);
        }

        #[test]
        fn test_elide_tiny_budget() {
            assert_eq!(elide_label("abcdef", 2), "ef");
        }
    }

    mod layout_tests {
        use super::*;

        #[test]
        fn test_min_height_floor() {
            let layout = ChartLayout::compute(&ChartStyle::default(), 2, 4).unwrap();
            assert_eq!(layout.height, 600);
            assert_eq!(layout.width, 1000);
        }

        #[test]
        fn test_height_grows_with_rows() {
            let style = ChartStyle::default();
            let layout = ChartLayout::compute(&style, 100, 10).unwrap();
            assert!(layout.height > 100 * style.row_height);
            assert!(layout.row_pitch >= f64::from(style.row_height));
        }

        #[test]
        fn test_axis_mapping() {
            let layout = ChartLayout::compute(&ChartStyle::default(), 3, 10).unwrap();
            assert_eq!(layout.x_for(0.0), layout.plot_left);
            assert_eq!(layout.x_for(100.0), layout.plot_left + layout.plot_width);
            assert_eq!(layout.x_for(150.0), layout.x_for(100.0));
        }

        #[test]
        fn test_plot_fits_canvas() {
            let layout = ChartLayout::compute(&ChartStyle::default(), 5, 500).unwrap();
            assert!(layout.plot_left + layout.plot_width < layout.width);
            assert!(layout.max_label_chars < 500);
        }

        #[test]
        fn test_height_overflow_is_render_error() {
            let mut style = ChartStyle::default();
            style.row_height = 100_000_000;
            let err = ChartLayout::compute(&style, 50, 10).unwrap_err();
            assert!(matches!(err, CovplotError::Render { .. }));
        }

        #[test]
        fn test_too_many_rows_is_render_error() {
            let style = ChartStyle::default();
            let rows = (MAX_HEIGHT / style.row_height) as usize + 1;
            assert!(ChartLayout::compute(&style, rows, 10).is_err());
            assert!(ChartLayout::compute(&style, usize::MAX, 10).is_err());
        }

        #[test]
        fn test_rows_are_top_to_bottom() {
            let layout = ChartLayout::compute(&ChartStyle::default(), 3, 10).unwrap();
            assert!(layout.row_center(0) < layout.row_center(1));
            assert!(layout.row_center(2) < layout.plot_bottom());
        }
    }

    mod draw_tests {
        use super::*;

        fn is_bar(img: &RgbaImage, x: u32, y: u32) -> bool {
            *img.get_pixel(x, y) == colors::SKY_BLUE.to_rgba()
        }

        #[test]
        fn test_empty_summary_is_render_error() {
            let chart = BarChart::new(ChartStyle::default());
            let err = chart.draw(&summary(SortOrder::Descending, &[])).unwrap_err();
            assert!(matches!(err, CovplotError::Render { .. }));
        }

        #[test]
        fn test_best_bar_on_top_descending() {
            let chart = BarChart::new(ChartStyle::default());
            let s = summary(SortOrder::Descending, &[("a.py", 50.0), ("b.py", 100.0)]);
            let img = chart.draw(&s).unwrap();
            let layout = chart.layout(&s).unwrap();

            let sample_x = layout.x_for(75.0);
            assert!(is_bar(&img, sample_x, layout.row_center(0)));
            assert!(!is_bar(&img, sample_x, layout.row_center(1)));
            assert!(is_bar(&img, layout.x_for(25.0), layout.row_center(1)));
        }

        #[test]
        fn test_best_bar_on_top_ascending() {
            let chart = BarChart::new(ChartStyle::default());
            let s = summary(SortOrder::Ascending, &[("a.py", 50.0), ("b.py", 100.0)]);
            assert_eq!(s.entries[0].file_name, "a.py");

            let img = chart.draw(&s).unwrap();
            let layout = chart.layout(&s).unwrap();
            assert!(is_bar(&img, layout.x_for(75.0), layout.row_center(0)));
            assert!(!is_bar(&img, layout.x_for(75.0), layout.row_center(1)));
        }

        #[test]
        fn test_zero_percent_draws_no_bar() {
            let chart = BarChart::new(ChartStyle::default());
            let s = summary(SortOrder::Descending, &[("c.py", 0.0)]);
            let img = chart.draw(&s).unwrap();
            let bar_pixels = img.pixels().filter(|p| **p == colors::SKY_BLUE.to_rgba()).count();
            assert_eq!(bar_pixels, 0);
        }

        #[test]
        fn test_draw_is_deterministic() {
            let chart = BarChart::new(ChartStyle::default().with_palette(BarPalette::Threshold));
            let s = summary(SortOrder::Descending, &[("x", 12.5), ("y", 99.0), ("z", 60.0)]);
            assert_eq!(chart.draw(&s).unwrap(), chart.draw(&s).unwrap());
        }

        #[test]
        fn test_invalid_style_rejected_at_draw() {
            let chart = BarChart::new(ChartStyle::default().with_decimals(5));
            let s = summary(SortOrder::Descending, &[("x", 12.5)]);
            assert!(matches!(chart.draw(&s), Err(CovplotError::Config { .. })));
        }
    }
}
