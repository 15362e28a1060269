// StashScope - core/raster.rs
//
// Off-screen rendering of the timeline chart for PNG export.
// Drawn with plotters into an RGB buffer (stacked bars, date labels, count
// axis, league legend) and encoded with the image PNG codec.

use crate::core::model::ChartData;
use crate::util::constants::{PNG_PLOT_MARGIN, SERIES_PALETTE};
use crate::util::error::ExportError;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, RgbImage};
use plotters::coord::Shift;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;
use plotters_backend::{
    BackendColor, BackendCoord, BackendStyle, BackendTextStyle, DrawingBackend, DrawingErrorKind,
};
use std::io::Write;
use std::panic;
use std::path::Path;

/// Half the width of a bar, in label slots.
const BAR_HALF_WIDTH: f64 = 0.35;

/// Upper bound on date labels along the x axis.
const MAX_X_LABELS: usize = 12;

/// Headroom above the tallest stack.
const Y_HEADROOM: f64 = 1.1;

/// Palette colour for series `idx`, cycling through `SERIES_PALETTE`.
pub fn palette_colour(idx: usize) -> [u8; 3] {
    SERIES_PALETTE[idx % SERIES_PALETTE.len()]
}

fn series_rgb(idx: usize) -> RGBColor {
    let [r, g, b] = palette_colour(idx);
    RGBColor(r, g, b)
}

/// Render `chart` as captioned stacked bars into a `width` x `height` image.
pub fn render_timeline(
    chart: &ChartData,
    title: &str,
    width: u32,
    height: u32,
) -> Result<RgbImage, String> {
    let mut buf = vec![0u8; width as usize * height as usize * 3];
    {
        let backend = BitMapBackend::with_buffer(&mut buf, (width, height));
        let root = TextSafeBackend::new(backend).into_drawing_area();
        draw_stacked_bars(&root, chart, title).map_err(|e| format!("plotting error: {e}"))?;
    }
    RgbImage::from_raw(width, height, buf).ok_or_else(|| "plot buffer size mismatch".to_string())
}

fn draw_stacked_bars<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    chart: &ChartData,
    title: &str,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    root.fill(&WHITE)?;

    let (width, height) = root.dim_in_pixel();
    let (width, height) = (width as i32, height as i32);
    let margin = (PNG_PLOT_MARGIN as i32).min(width / 20).min(height / 20);
    let caption_px = (height / 25).clamp(8, 24);

    let n = chart.labels.len().max(1);
    let y_max = chart.max_stacked_total().max(1) as f64 * Y_HEADROOM;

    let mut ctx = ChartBuilder::on(root)
        .caption(title, ("sans-serif", caption_px))
        .margin(margin)
        .x_label_area_size((height / 12).clamp(10, 40))
        .y_label_area_size((width / 16).clamp(16, 60))
        .build_cartesian_2d(-0.5f64..(n as f64 - 0.5), 0f64..y_max)?;

    let x_label = |v: &f64| slot_label(&chart.labels, *v);
    let y_label = |v: &f64| format!("{v:.0}");
    ctx.configure_mesh()
        .disable_x_mesh()
        .x_labels(n.min(MAX_X_LABELS))
        .x_label_formatter(&x_label)
        .y_label_formatter(&y_label)
        .draw()?;

    let mut base = vec![0u64; chart.labels.len()];
    for (series_idx, series) in chart.series.iter().enumerate() {
        let colour = series_rgb(series_idx);
        let mut bars = Vec::new();
        for (idx, bottom) in base.iter_mut().enumerate() {
            let value = series.values.get(idx).copied().unwrap_or(0);
            if value == 0 {
                continue;
            }
            let x = idx as f64;
            let top = *bottom + value;
            bars.push(Rectangle::new(
                [(x - BAR_HALF_WIDTH, *bottom as f64), (x + BAR_HALF_WIDTH, top as f64)],
                colour.filled(),
            ));
            *bottom = top;
        }
        ctx.draw_series(bars)?
            .label(series.name.as_str())
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], colour.filled()));
    }

    if !chart.series.is_empty() {
        ctx.configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()?;
    }

    root.present()?;
    Ok(())
}

/// Axis label for tick `value`: the chart label at that slot, or nothing
/// for ticks between slots.
pub fn slot_label(labels: &[String], value: f64) -> String {
    let slot = value.round();
    if (value - slot).abs() > 1e-6 || slot < 0.0 {
        return String::new();
    }
    labels.get(slot as usize).cloned().unwrap_or_default()
}

/// Encode `img` as PNG into `writer`.
pub fn write_png<W: Write>(img: &RgbImage, writer: W, export_path: &Path) -> Result<(), ExportError> {
    PngEncoder::new(writer)
        .write_image(img.as_raw(), img.width(), img.height(), ExtendedColorType::Rgb8)
        .map_err(|e| ExportError::Image {
            path: export_path.to_path_buf(),
            source: e,
        })
}

// =============================================================================
// Text-safe backend
// =============================================================================

/// Backend wrapper that skips text when no usable font is installed, so a
/// snapshot still renders its bars on minimal systems.
struct TextSafeBackend<DB> {
    inner: DB,
}

impl<DB> TextSafeBackend<DB> {
    fn new(inner: DB) -> Self {
        Self { inner }
    }
}

impl<DB: DrawingBackend> DrawingBackend for TextSafeBackend<DB> {
    type ErrorType = DB::ErrorType;

    fn get_size(&self) -> (u32, u32) {
        self.inner.get_size()
    }

    fn ensure_prepared(&mut self) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.ensure_prepared()
    }

    fn present(&mut self) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.present()
    }

    fn draw_pixel(
        &mut self,
        point: BackendCoord,
        color: BackendColor,
    ) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.draw_pixel(point, color)
    }

    fn draw_line<S: BackendStyle>(
        &mut self,
        from: BackendCoord,
        to: BackendCoord,
        style: &S,
    ) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.draw_line(from, to, style)
    }

    fn draw_rect<S: BackendStyle>(
        &mut self,
        upper_left: BackendCoord,
        bottom_right: BackendCoord,
        style: &S,
        fill: bool,
    ) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.draw_rect(upper_left, bottom_right, style, fill)
    }

    fn draw_path<S: BackendStyle, I: IntoIterator<Item = BackendCoord>>(
        &mut self,
        path: I,
        style: &S,
    ) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.draw_path(path, style)
    }

    fn blit_bitmap(
        &mut self,
        pos: BackendCoord,
        (iw, ih): (u32, u32),
        src: &[u8],
    ) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.blit_bitmap(pos, (iw, ih), src)
    }

    fn draw_text<TStyle: BackendTextStyle>(
        &mut self,
        text: &str,
        style: &TStyle,
        pos: BackendCoord,
    ) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        match panic::catch_unwind(panic::AssertUnwindSafe(|| {
            self.inner.draw_text(text, style, pos)
        })) {
            Ok(Err(DrawingErrorKind::FontError(e))) => {
                tracing::trace!(error = %e, "Chart text skipped");
                Ok(())
            }
            Ok(result) => result,
            Err(_) => Ok(()),
        }
    }

    fn estimate_text_size<TStyle: BackendTextStyle>(
        &self,
        text: &str,
        style: &TStyle,
    ) -> Result<(u32, u32), DrawingErrorKind<Self::ErrorType>> {
        let estimated = || {
            let size = style.size().max(1.0);
            ((text.chars().count() as f64 * size * 0.6) as u32, size as u32)
        };
        match panic::catch_unwind(panic::AssertUnwindSafe(|| {
            self.inner.estimate_text_size(text, style)
        })) {
            Ok(Err(DrawingErrorKind::FontError(_))) | Err(_) => Ok(estimated()),
            Ok(result) => result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::Series;
    use image::Rgb;

    fn chart() -> ChartData {
        ChartData {
            labels: vec!["d1".into(), "d2".into()],
            series: vec![
                Series { name: "A".into(), values: vec![1, 1] },
                Series { name: "B".into(), values: vec![1, 0] },
            ],
        }
    }

    fn count_colour(img: &RgbImage, rgb: [u8; 3]) -> usize {
        img.pixels().filter(|p| p.0 == rgb).count()
    }

    #[test]
    fn test_render_has_requested_size() {
        let img = render_timeline(&chart(), "Timeline", 320, 200).unwrap();
        assert_eq!(img.dimensions(), (320, 200));
    }

    #[test]
    fn test_each_series_gets_its_colour() {
        let img = render_timeline(&chart(), "Timeline", 640, 400).unwrap();
        let a = count_colour(&img, palette_colour(0));
        let b = count_colour(&img, palette_colour(1));
        assert!(b > 0);
        // A has two segments, B one, all of equal height.
        assert!(a > b);
    }

    #[test]
    fn test_empty_chart_draws_no_series_colour() {
        let img = render_timeline(&ChartData::default(), "Timeline", 200, 120).unwrap();
        assert_eq!(count_colour(&img, palette_colour(0)), 0);
        assert_eq!(img.get_pixel(0, 0), &Rgb([255, 255, 255]));
    }

    #[test]
    fn test_smallest_configurable_size_renders() {
        let img = render_timeline(&chart(), "Timeline", 100, 100).unwrap();
        assert_eq!(img.dimensions(), (100, 100));
    }

    #[test]
    fn test_axis_labels_only_on_slots() {
        let labels = vec!["2024-01-05".to_string(), "2024-01-06".to_string()];
        assert_eq!(slot_label(&labels, 1.0), "2024-01-06");
        assert_eq!(slot_label(&labels, 0.5), "");
        assert_eq!(slot_label(&labels, 2.0), "");
        assert_eq!(slot_label(&labels, -1.0), "");
    }

    #[test]
    fn test_write_png_produces_png_signature() {
        let img = render_timeline(&chart(), "Timeline", 64, 48).unwrap();
        let mut buf = Vec::new();
        write_png(&img, &mut buf, Path::new("chart.png")).unwrap();
        assert_eq!(&buf[..8], b"\x89PNG\r\n\x1a\n");
        let decoded = image::load_from_memory(&buf).unwrap();
        assert_eq!(decoded.into_rgb8().width(), 64);
    }

    #[test]
    fn test_palette_cycles() {
        assert_eq!(palette_colour(0), palette_colour(SERIES_PALETTE.len()));
    }
}
