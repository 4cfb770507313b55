//! Diagnostic plot
//!
//! Renders the onset-strength envelope over time with stems at each kept
//! onset's (time, strength), plus grid, tick labels, axis labels, title and
//! legend, to a 1500×500 PNG.

use std::path::Path;

use image::{ImageFormat, Rgb, RgbImage};

use super::glyphs::{glyph, text_width, GLYPH_HEIGHT, GLYPH_WIDTH, GLYPH_ADVANCE};
use crate::analysis::result::Onset;
use crate::error::AnalysisError;
use crate::features::onset::OnsetEnvelope;

/// Image width in pixels (15 plot units)
pub const PLOT_WIDTH: u32 = 1500;

/// Image height in pixels (5 plot units)
pub const PLOT_HEIGHT: u32 = 500;

/// Plot title
pub const PLOT_TITLE: &str = "Onset Detection and Strength Analysis";

const MARGIN_LEFT: i32 = 90;
const MARGIN_RIGHT: i32 = 20;
const MARGIN_TOP: i32 = 40;
const MARGIN_BOTTOM: i32 = 60;

const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
const GRID: Rgb<u8> = Rgb([0, 0, 0]);
const LEGEND_BORDER: Rgb<u8> = Rgb([204, 204, 204]);
const ENVELOPE: Rgb<u8> = Rgb([31, 119, 180]);
const ONSET: Rgb<u8> = Rgb([255, 0, 0]);

const GRID_ALPHA: f32 = 0.2;
const ENVELOPE_ALPHA: f32 = 0.5;
const MARKER_RADIUS: i32 = 3;

/// Data-space extent of the plot area
#[derive(Debug, Clone, Copy, PartialEq)]
struct Extent {
    x_min: f32,
    x_max: f32,
    y_min: f32,
    y_max: f32,
}

impl Extent {
    /// Fit the envelope and onsets with a 5% margin on the value axis
    fn fit(times: &[f32], envelope: &[f32], onsets: &[Onset]) -> Self {
        let x_max = times
            .iter()
            .copied()
            .chain(onsets.iter().map(|o| o.time as f32))
            .fold(0.0f32, f32::max);
        let y_top = envelope
            .iter()
            .copied()
            .chain(onsets.iter().map(|o| o.strength))
            .fold(0.0f32, f32::max);

        let x_max = if x_max > 0.0 { x_max } else { 1.0 };
        let y_max = if y_top > 0.0 { y_top * 1.05 } else { 1.0 };
        Self {
            x_min: 0.0,
            x_max,
            y_min: -0.05 * y_max,
            y_max,
        }
    }
}

/// Maps data coordinates to pixels inside the plot area
struct Canvas {
    image: RgbImage,
    left: i32,
    top: i32,
    width: i32,
    height: i32,
    extent: Extent,
}

impl Canvas {
    fn new(extent: Extent) -> Self {
        Self {
            image: RgbImage::from_pixel(PLOT_WIDTH, PLOT_HEIGHT, WHITE),
            left: MARGIN_LEFT,
            top: MARGIN_TOP,
            width: PLOT_WIDTH as i32 - MARGIN_LEFT - MARGIN_RIGHT,
            height: PLOT_HEIGHT as i32 - MARGIN_TOP - MARGIN_BOTTOM,
            extent,
        }
    }

    fn px_x(&self, x: f32) -> i32 {
        let e = &self.extent;
        let frac = (x - e.x_min) / (e.x_max - e.x_min);
        self.left + (frac * self.width as f32).round() as i32
    }

    fn px_y(&self, y: f32) -> i32 {
        let e = &self.extent;
        let frac = (y - e.y_min) / (e.y_max - e.y_min);
        self.top + self.height - (frac * self.height as f32).round() as i32
    }

    fn blend(&mut self, x: i32, y: i32, color: Rgb<u8>, alpha: f32) {
        if x < 0 || y < 0 || x >= PLOT_WIDTH as i32 || y >= PLOT_HEIGHT as i32 {
            return;
        }
        let pixel = self.image.get_pixel_mut(x as u32, y as u32);
        for (dst, &src) in pixel.0.iter_mut().zip(color.0.iter()) {
            let mixed = *dst as f32 * (1.0 - alpha) + src as f32 * alpha;
            *dst = mixed.round().clamp(0.0, 255.0) as u8;
        }
    }

    fn in_plot_area(&self, x: i32, y: i32) -> bool {
        x >= self.left && x <= self.left + self.width && y >= self.top && y <= self.top + self.height
    }

    /// Bresenham line; `clip` restricts drawing to the plot area
    fn line(&mut self, from: (i32, i32), to: (i32, i32), color: Rgb<u8>, alpha: f32, clip: bool) {
        let (mut x0, mut y0) = from;
        let (x1, y1) = to;
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            if !clip || self.in_plot_area(x0, y0) {
                self.blend(x0, y0, color, alpha);
            }
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }

    fn disc(&mut self, cx: i32, cy: i32, radius: i32, color: Rgb<u8>) {
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                if dx * dx + dy * dy <= radius * radius {
                    self.blend(cx + dx, cy + dy, color, 1.0);
                }
            }
        }
    }

    fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Rgb<u8>) {
        for py in y..y + h {
            for px in x..x + w {
                self.blend(px, py, color, 1.0);
            }
        }
    }

    fn rect_outline(&mut self, x: i32, y: i32, w: i32, h: i32, color: Rgb<u8>) {
        self.line((x, y), (x + w, y), color, 1.0, false);
        self.line((x, y + h), (x + w, y + h), color, 1.0, false);
        self.line((x, y), (x, y + h), color, 1.0, false);
        self.line((x + w, y), (x + w, y + h), color, 1.0, false);
    }

    /// Draw text with its top-left corner at (x, y)
    fn text(&mut self, x: i32, y: i32, text: &str, scale: u32, color: Rgb<u8>) {
        let s = scale as i32;
        for (i, c) in text.chars().enumerate() {
            let origin_x = x + i as i32 * (GLYPH_ADVANCE as i32) * s;
            for (row, bits) in glyph(c).iter().enumerate() {
                for col in 0..GLYPH_WIDTH as i32 {
                    if bits & (1 << (GLYPH_WIDTH as i32 - 1 - col)) != 0 {
                        self.fill_rect(origin_x + col * s, y + row as i32 * s, s, s, color);
                    }
                }
            }
        }
    }

    /// Draw text rotated 90° counter-clockwise, reading bottom to top, with
    /// its bottom-left corner at (x, y)
    fn text_vertical(&mut self, x: i32, y: i32, text: &str, scale: u32, color: Rgb<u8>) {
        let s = scale as i32;
        for (i, c) in text.chars().enumerate() {
            let origin_y = y - i as i32 * (GLYPH_ADVANCE as i32) * s;
            for (row, bits) in glyph(c).iter().enumerate() {
                for col in 0..GLYPH_WIDTH as i32 {
                    if bits & (1 << (GLYPH_WIDTH as i32 - 1 - col)) != 0 {
                        let px = x + row as i32 * s;
                        let py = origin_y - (col + 1) * s;
                        self.fill_rect(px, py, s, s, color);
                    }
                }
            }
        }
    }
}

/// Step between ticks: 1, 2 or 5 times a power of ten giving about `target` ticks
fn nice_step(span: f32, target: usize) -> f32 {
    if span.is_nan() || span <= 0.0 || target == 0 {
        return 1.0;
    }
    let raw = span / target as f32;
    let magnitude = 10f32.powf(raw.log10().floor());
    let normalized = raw / magnitude;
    let nice = if normalized < 1.5 {
        1.0
    } else if normalized < 3.0 {
        2.0
    } else if normalized < 7.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

/// Tick values inside `[min, max]`
fn ticks(min: f32, max: f32, target: usize) -> Vec<f32> {
    let step = nice_step(max - min, target);
    let first = (min / step).ceil() as i64;
    let last = (max / step).floor() as i64;
    (first..=last).map(|k| k as f32 * step).collect()
}

/// Tick label with as many decimals as the step needs
fn tick_label(value: f32, step: f32) -> String {
    let decimals = if step >= 1.0 {
        0
    } else {
        (-step.log10().floor()) as usize
    };
    let value = if value.abs() < step * 1e-3 { 0.0 } else { value };
    format!("{:.*}", decimals, value)
}

/// Render the diagnostic plot to an in-memory image
///
/// # Arguments
///
/// * `envelope` - Raw onset-strength envelope
/// * `onsets` - Onsets to mark (normally the filtered set)
/// * `threshold` - Threshold shown in the legend
pub fn render_plot(envelope: &OnsetEnvelope, onsets: &[Onset], threshold: f32) -> RgbImage {
    // Pixel space is f32
    let times: Vec<f32> = envelope.times().into_iter().map(|t| t as f32).collect();
    let extent = Extent::fit(&times, &envelope.values, onsets);
    let mut canvas = Canvas::new(extent);

    let (left, top, width, height) = (canvas.left, canvas.top, canvas.width, canvas.height);
    let bottom = top + height;
    let right = left + width;

    // Grid and tick labels
    let x_ticks = ticks(extent.x_min, extent.x_max, 10);
    let x_step = nice_step(extent.x_max - extent.x_min, 10);
    for &t in &x_ticks {
        let px = canvas.px_x(t);
        canvas.line((px, top), (px, bottom), GRID, GRID_ALPHA, true);
        canvas.line((px, bottom), (px, bottom + 5), BLACK, 1.0, false);
        let label = tick_label(t, x_step);
        let w = text_width(&label, 2) as i32;
        canvas.text(px - w / 2, bottom + 9, &label, 2, BLACK);
    }

    let y_ticks = ticks(extent.y_min, extent.y_max, 5);
    let y_step = nice_step(extent.y_max - extent.y_min, 5);
    for &v in &y_ticks {
        let py = canvas.px_y(v);
        canvas.line((left, py), (right, py), GRID, GRID_ALPHA, true);
        canvas.line((left - 5, py), (left, py), BLACK, 1.0, false);
        let label = tick_label(v, y_step);
        let w = text_width(&label, 2) as i32;
        canvas.text(left - 9 - w, py - GLYPH_HEIGHT as i32, &label, 2, BLACK);
    }

    // Envelope
    let points: Vec<(i32, i32)> = times
        .iter()
        .zip(envelope.values.iter())
        .map(|(&t, &v)| (canvas.px_x(t), canvas.px_y(v)))
        .collect();
    for pair in points.windows(2) {
        canvas.line(pair[0], pair[1], ENVELOPE, ENVELOPE_ALPHA, true);
        canvas.line(
            (pair[0].0, pair[0].1 + 1),
            (pair[1].0, pair[1].1 + 1),
            ENVELOPE,
            ENVELOPE_ALPHA * 0.5,
            true,
        );
    }

    // Onset stems
    if !onsets.is_empty() {
        let baseline = canvas.px_y(0.0);
        let first = canvas.px_x(onsets[0].time as f32);
        let last = canvas.px_x(onsets[onsets.len() - 1].time as f32);
        canvas.line((first, baseline), (last, baseline), ONSET, 1.0, true);
        for onset in onsets {
            let px = canvas.px_x(onset.time as f32);
            let py = canvas.px_y(onset.strength);
            canvas.line((px, baseline), (px, py), ONSET, 1.0, true);
            canvas.disc(px, py, MARKER_RADIUS, ONSET);
        }
    }

    // Axes frame
    canvas.rect_outline(left, top, width, height, BLACK);

    // Title and axis labels
    let title_w = text_width(PLOT_TITLE, 3) as i32;
    canvas.text(left + (width - title_w) / 2, 8, PLOT_TITLE, 3, BLACK);

    let x_label = "Time (s)";
    let x_label_w = text_width(x_label, 2) as i32;
    canvas.text(left + (width - x_label_w) / 2, bottom + 32, x_label, 2, BLACK);

    let y_label = "Strength";
    let y_label_h = text_width(y_label, 2) as i32;
    canvas.text_vertical(12, top + (height + y_label_h) / 2, y_label, 2, BLACK);

    // Legend
    let entries = [
        "Onset Strength Envelope".to_string(),
        format!("Detected Onsets (Strength >= {})", threshold),
    ];
    let text_w = entries
        .iter()
        .map(|e| text_width(e, 2))
        .max()
        .unwrap_or(0) as i32;
    let row_h = 2 * GLYPH_HEIGHT as i32 + 10;
    let box_w = 50 + text_w + 12;
    let box_h = row_h * entries.len() as i32 + 8;
    let box_x = right - box_w - 10;
    let box_y = top + 10;
    canvas.fill_rect(box_x, box_y, box_w, box_h, WHITE);
    canvas.rect_outline(box_x, box_y, box_w, box_h, LEGEND_BORDER);

    let row_center = |row: i32| box_y + 4 + row * row_h + row_h / 2;
    let env_y = row_center(0);
    canvas.line((box_x + 8, env_y), (box_x + 40, env_y), ENVELOPE, ENVELOPE_ALPHA, false);
    canvas.line((box_x + 8, env_y + 1), (box_x + 40, env_y + 1), ENVELOPE, ENVELOPE_ALPHA * 0.5, false);
    let onset_y = row_center(1);
    canvas.line((box_x + 8, onset_y), (box_x + 40, onset_y), ONSET, 1.0, false);
    canvas.disc(box_x + 24, onset_y, MARKER_RADIUS, ONSET);
    for (row, entry) in entries.iter().enumerate() {
        let y = row_center(row as i32) - GLYPH_HEIGHT as i32;
        canvas.text(box_x + 50, y, entry, 2, BLACK);
    }

    canvas.image
}

/// Render and save the diagnostic plot as PNG, replacing any existing file
///
/// # Errors
///
/// Returns `AnalysisError::OutputError` if the image cannot be written
pub fn save_plot<P: AsRef<Path>>(
    path: P,
    envelope: &OnsetEnvelope,
    onsets: &[Onset],
    threshold: f32,
) -> Result<(), AnalysisError> {
    let path = path.as_ref();
    log::debug!(
        "Rendering plot with {} envelope frames and {} onsets to {}",
        envelope.len(),
        onsets.len(),
        path.display()
    );

    let image = render_plot(envelope, onsets, threshold);
    image.save_with_format(path, ImageFormat::Png)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn envelope() -> OnsetEnvelope {
        let values: Vec<f32> = (0..200).map(|i| ((i as f32) * 0.3).sin().abs() * 4.0).collect();
        OnsetEnvelope::new(values, 22050, 512)
    }

    fn count_color(image: &RgbImage, color: Rgb<u8>) -> usize {
        image.pixels().filter(|p| **p == color).count()
    }

    #[test]
    fn test_dimensions() {
        let image = render_plot(&envelope(), &[], 0.15);
        assert_eq!(image.dimensions(), (PLOT_WIDTH, PLOT_HEIGHT));
    }

    #[test]
    fn test_markers_drawn_only_with_onsets() {
        let env = envelope();
        let without = render_plot(&env, &[], 0.15);

        let onsets = vec![
            Onset::raw(1.0, 3.0).with_strength(0.8),
            Onset::raw(2.5, 4.0).with_strength(1.0),
        ];
        let with = render_plot(&env, &onsets, 0.15);

        // Only the legend swatch is pure red when no onsets are plotted
        assert!(count_color(&with, ONSET) > count_color(&without, ONSET));
    }

    #[test]
    fn test_empty_envelope_still_renders() {
        let env = OnsetEnvelope::new(Vec::new(), 22050, 512);
        let image = render_plot(&env, &[], 0.15);
        assert_eq!(image.dimensions(), (PLOT_WIDTH, PLOT_HEIGHT));
    }

    #[test]
    fn test_nice_ticks() {
        assert!((nice_step(10.0, 10) - 1.0).abs() < 1e-6);
        assert!((nice_step(4.6, 10) - 0.5).abs() < 1e-6);
        assert!((nice_step(0.9, 5) - 0.2).abs() < 1e-6);
        let t = ticks(0.0, 4.6, 10);
        assert_eq!(t.len(), 10);
        assert_eq!(tick_label(2.5, 0.5), "2.5");
        assert_eq!(tick_label(3.0, 1.0), "3");
    }

    #[test]
    fn test_save_plot_writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plot.png");
        save_plot(&path, &envelope(), &[], 0.15).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn test_save_plot_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("plot.png");
        let result = save_plot(&path, &envelope(), &[], 0.15);
        assert!(matches!(result, Err(AnalysisError::OutputError(_))));
    }
}
