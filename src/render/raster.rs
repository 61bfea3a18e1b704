//! # Raster back-end
//!
//! Draws rendered element views into an 8-bit grayscale canvas and encodes it
//! as PNG. Text uses the Spleen bitmap fonts; images are drawn as crossed
//! placeholder boxes since logo sources are never fetched.
//!
//! ## Font selection
//!
//! | Font size | Spleen face |
//! |-----------|-------------|
//! | 10–12px | 6×12 |
//! | 14–18px | 8×16 |
//! | 20–28px | 12×24 |

use image::{GrayImage, ImageEncoder, Luma};
use spleen_font::{FONT_6X12, FONT_8X16, FONT_12X24, PSF2Font};

use super::{ElementView, Node, RenderMode, render_document};
use crate::error::LabsheetError;
use crate::geometry::{PAGE_ASPECT, Rect};
use crate::template::{FontSize, TemplateDocument, TextAlign};

pub const WHITE: u8 = 255;
pub const BLACK: u8 = 0;
const GUIDE: u8 = 200;
const GRID: u8 = 160;

/// Narrowest and widest page render.
pub const MIN_WIDTH: usize = 200;
pub const MAX_WIDTH: usize = 2000;

/// Reference canvas width that pixel sizes (padding, rule) are expressed in.
const REFERENCE_WIDTH: f64 = 850.0;

/// Bitmap face used for one font size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Face {
    pub char_width: usize,
    pub char_height: usize,
    data: &'static [u8],
}

impl Face {
    pub const SMALL: Face = Face {
        char_width: 6,
        char_height: 12,
        data: FONT_6X12,
    };
    pub const MEDIUM: Face = Face {
        char_width: 8,
        char_height: 16,
        data: FONT_8X16,
    };
    pub const LARGE: Face = Face {
        char_width: 12,
        char_height: 24,
        data: FONT_12X24,
    };

    pub fn for_size(size: FontSize) -> Face {
        match size.px() {
            0..=12 => Face::SMALL,
            13..=18 => Face::MEDIUM,
            _ => Face::LARGE,
        }
    }
}

/// Grayscale drawing surface.
pub struct Canvas {
    width: usize,
    height: usize,
    buffer: Vec<u8>,
}

impl Canvas {
    /// White canvas.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            buffer: vec![WHITE; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<u8> {
        (x < self.width && y < self.height).then(|| self.buffer[y * self.width + x])
    }

    /// Set a pixel; out-of-range writes are ignored.
    pub fn set_pixel(&mut self, x: usize, y: usize, luma: u8) {
        if x >= self.width || y >= self.height {
            return;
        }
        self.buffer[y * self.width + x] = luma;
    }

    pub fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, luma: u8) {
        for py in y..y.saturating_add(h) {
            for px in x..x.saturating_add(w) {
                self.set_pixel(px, py, luma);
            }
        }
    }

    pub fn hline(&mut self, x: usize, y: usize, w: usize, luma: u8) {
        self.fill_rect(x, y, w, 1, luma);
    }

    pub fn vline(&mut self, x: usize, y: usize, h: usize, luma: u8) {
        self.fill_rect(x, y, 1, h, luma);
    }

    pub fn stroke_rect(&mut self, x: usize, y: usize, w: usize, h: usize, luma: u8) {
        if w == 0 || h == 0 {
            return;
        }
        self.hline(x, y, w, luma);
        self.hline(x, y + h - 1, w, luma);
        self.vline(x, y, h, luma);
        self.vline(x + w - 1, y, h, luma);
    }

    /// Dashed outline (4 on, 4 off).
    pub fn dashed_rect(&mut self, x: usize, y: usize, w: usize, h: usize, luma: u8) {
        if w == 0 || h == 0 {
            return;
        }
        for i in (0..w).filter(|i| i % 8 < 4) {
            self.set_pixel(x + i, y, luma);
            self.set_pixel(x + i, y + h - 1, luma);
        }
        for i in (0..h).filter(|i| i % 8 < 4) {
            self.set_pixel(x, y + i, luma);
            self.set_pixel(x + w - 1, y + i, luma);
        }
    }

    /// Box with both diagonals.
    pub fn placeholder(&mut self, x: usize, y: usize, w: usize, h: usize, luma: u8) {
        self.stroke_rect(x, y, w, h, luma);
        let steps = w.max(h).max(1);
        for i in 0..steps {
            let dx = i * w / steps;
            let dy = i * h / steps;
            self.set_pixel(x + dx, y + dy, luma);
            self.set_pixel(x + w.saturating_sub(1 + dx), y + dy, luma);
        }
    }

    /// Draw one line of text; returns the drawn width in pixels.
    ///
    /// Glyphs missing from the face are drawn as boxes.
    pub fn draw_text(
        &mut self,
        x: usize,
        y: usize,
        text: &str,
        face: Face,
        bold: bool,
        luma: u8,
    ) -> Result<usize, LabsheetError> {
        let mut font = PSF2Font::new(face.data)
            .map_err(|_| LabsheetError::Render("failed to load bitmap font".into()))?;
        let mut cx = x;
        for ch in text.chars() {
            let utf8 = ch.to_string();
            match font.glyph_for_utf8(utf8.as_bytes()) {
                Some(glyph) => {
                    for (row_y, row) in glyph.enumerate() {
                        for (col_x, on) in row.enumerate() {
                            if on {
                                self.set_pixel(cx + col_x, y + row_y, luma);
                                if bold {
                                    self.set_pixel(cx + col_x + 1, y + row_y, luma);
                                }
                            }
                        }
                    }
                }
                None => self.stroke_rect(cx + 1, y + 1, face.char_width - 2, face.char_height - 2, luma),
            }
            cx += face.char_width;
        }
        Ok(cx - x)
    }

    /// Draw a QR code with `cell` pixels per module and a 4-module quiet zone.
    pub fn draw_qr(&mut self, x: usize, y: usize, data: &str, cell: usize) -> Result<(), LabsheetError> {
        use qrcode::{EcLevel, QrCode};

        let code = QrCode::with_error_correction_level(data, EcLevel::M)
            .map_err(|e| LabsheetError::Render(format!("QR code generation failed: {}", e)))?;
        let cell = cell.max(1);
        let size = code.width();
        for qy in 0..size {
            for qx in 0..size {
                if code[(qx, qy)] == qrcode::Color::Dark {
                    self.fill_rect(x + (qx + 4) * cell, y + (qy + 4) * cell, cell, cell, BLACK);
                }
            }
        }
        Ok(())
    }

    /// Encode as 8-bit grayscale PNG.
    pub fn to_png(&self) -> Result<Vec<u8>, LabsheetError> {
        let img = GrayImage::from_fn(self.width as u32, self.height as u32, |x, y| {
            Luma([self.buffer[y as usize * self.width + x as usize]])
        });

        let mut png_bytes = Vec::new();
        let encoder = image::codecs::png::PngEncoder::new(&mut png_bytes);
        encoder
            .write_image(
                img.as_raw(),
                self.width as u32,
                self.height as u32,
                image::ExtendedColorType::L8,
            )
            .map_err(|e: image::ImageError| LabsheetError::Render(e.to_string()))?;

        Ok(png_bytes)
    }
}

/// Pixel side of a QR code drawn by [`Canvas::draw_qr`].
pub fn qr_side(data: &str, cell: usize) -> Result<usize, LabsheetError> {
    let code = qrcode::QrCode::new(data)
        .map_err(|e| LabsheetError::Render(format!("QR code generation failed: {}", e)))?;
    Ok((code.width() + 8) * cell.max(1))
}

/// Luminance of a CSS color (hex, named, `rgb()`, `hsl()`, ...).
///
/// `None` for fully transparent colors and anything unparseable.
pub fn css_luma(color: &str) -> Option<u8> {
    let parsed: csscolorparser::Color = color.trim().parse().ok()?;
    let [r, g, b, a] = parsed.to_rgba8();
    if a == 0 {
        return None;
    }
    let luma = 0.299 * r as f64 + 0.587 * g as f64 + 0.114 * b as f64;
    Some(luma.round() as u8)
}

/// Leading pixel count of a CSS length such as `"15px"` or `"10px 20px"`.
fn css_px(value: &str) -> f64 {
    let digits: String = value
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    digits.parse().unwrap_or(0.0)
}

/// Render a document to PNG at the given pixel width (8.5:11 page).
///
/// The width is clamped to [`MIN_WIDTH`]..=[`MAX_WIDTH`].
pub fn render_png(doc: &TemplateDocument, mode: RenderMode, width: usize) -> Result<Vec<u8>, LabsheetError> {
    let width = width.clamp(MIN_WIDTH, MAX_WIDTH);
    let views = render_document(doc, mode);
    let height = (width as f64 / PAGE_ASPECT).round() as usize;
    let mut canvas = Canvas::new(width, height);
    for view in &views {
        draw_view(&mut canvas, view, mode)?;
    }
    canvas.to_png()
}

/// Pixel box of a percentage rectangle.
pub fn pixel_box(canvas: &Canvas, rect: &Rect) -> (usize, usize, usize, usize) {
    let w = canvas.width() as f64;
    let h = canvas.height() as f64;
    (
        (rect.x / 100.0 * w).round() as usize,
        (rect.y / 100.0 * h).round() as usize,
        (rect.width / 100.0 * w).round() as usize,
        (rect.height / 100.0 * h).round() as usize,
    )
}

/// Draw one element view, clipped loosely to its rectangle.
pub fn draw_view(canvas: &mut Canvas, view: &ElementView, mode: RenderMode) -> Result<(), LabsheetError> {
    let (x, y, w, h) = pixel_box(canvas, &view.rect);
    let scale = canvas.width() as f64 / REFERENCE_WIDTH;

    let background = view.style.background_color.as_deref().and_then(css_luma);
    if let Some(bg) = background {
        canvas.fill_rect(x, y, w, h, bg);
    }
    if view.style.border.is_some() {
        canvas.stroke_rect(x, y, w, h, GRID);
    } else if !mode.is_preview() {
        canvas.dashed_rect(x, y, w, h, GUIDE);
    }

    let ink = css_luma(&view.style.color).unwrap_or(BLACK);
    let pad = (css_px(&view.style.padding) * scale).round() as usize;
    let inner_x = x + pad;
    let inner_w = w.saturating_sub(pad * 2);
    let bottom = y + h;
    let mut cursor = y + pad;

    for node in &view.body {
        if cursor >= bottom {
            break;
        }
        match node {
            Node::Text {
                text,
                font_size,
                bold,
                ..
            } => {
                let face = Face::for_size(*font_size);
                for line in wrap(text, inner_w / face.char_width.max(1)) {
                    if cursor + face.char_height > bottom {
                        break;
                    }
                    let line_w = line.chars().count() * face.char_width;
                    let lx = match view.style.text_align {
                        TextAlign::Left => inner_x,
                        TextAlign::Center => inner_x + inner_w.saturating_sub(line_w) / 2,
                        TextAlign::Right => inner_x + inner_w.saturating_sub(line_w),
                    };
                    canvas.draw_text(lx, cursor, &line, face, *bold, ink)?;
                    cursor += face.char_height + 2;
                }
            }
            Node::Image { .. } => {
                let bw = inner_w.min((150.0 * scale) as usize);
                let bh = bottom.saturating_sub(cursor).saturating_sub(pad).min((60.0 * scale) as usize);
                let bx = match view.style.text_align {
                    TextAlign::Left => inner_x,
                    TextAlign::Center => inner_x + inner_w.saturating_sub(bw) / 2,
                    TextAlign::Right => inner_x + inner_w.saturating_sub(bw),
                };
                canvas.placeholder(bx, cursor, bw, bh, GRID);
                cursor += bh;
            }
            Node::LabelGrid { heading, entries } => {
                let face = Face::MEDIUM;
                canvas.draw_text(inner_x, cursor, heading, face, true, ink)?;
                cursor += face.char_height + 6;
                let col_w = inner_w / 2;
                for (i, entry) in entries.iter().enumerate() {
                    let cx = inner_x + (i % 2) * col_w;
                    let cy = cursor + (i / 2) * (face.char_height + 4);
                    if cy + face.char_height > bottom {
                        break;
                    }
                    let drawn = canvas.draw_text(cx, cy, &entry.label, face, true, ink)?;
                    if let Some(placeholder) = &entry.placeholder {
                        canvas.draw_text(cx + drawn + face.char_width, cy, placeholder, face, false, GRID)?;
                    }
                }
                cursor += entries.len().div_ceil(2) * (face.char_height + 4);
            }
            Node::Table {
                title,
                columns,
                rows,
            } => {
                let face = Face::MEDIUM;
                canvas.draw_text(inner_x, cursor, title, face, true, ink)?;
                cursor += face.char_height + 6;
                if columns.is_empty() {
                    continue;
                }
                let col_w = inner_w / columns.len();
                let row_h = face.char_height + 8;
                let header = std::iter::once(columns);
                for (r, row) in header.chain(rows.iter()).enumerate() {
                    if cursor + row_h > bottom {
                        break;
                    }
                    if r == 0 {
                        canvas.fill_rect(inner_x, cursor, col_w * columns.len(), row_h, 235);
                    }
                    for (c, cell) in row.iter().enumerate() {
                        let cx = inner_x + c * col_w;
                        canvas.stroke_rect(cx, cursor, col_w + 1, row_h + 1, GRID);
                        let fit: String = cell.chars().take(col_w.saturating_sub(8) / face.char_width).collect();
                        canvas.draw_text(cx + 4, cursor + 4, &fit, face, r == 0, ink)?;
                    }
                    cursor += row_h;
                }
            }
            Node::Rule { width, height } => {
                let rw = ((*width as f64) * scale).round() as usize;
                let rh = ((*height as f64) * scale).round() as usize;
                let rx = match view.style.text_align {
                    TextAlign::Left => inner_x,
                    TextAlign::Center => inner_x + inner_w.saturating_sub(rw) / 2,
                    TextAlign::Right => inner_x + inner_w.saturating_sub(rw),
                };
                canvas.hline(rx, cursor + rh.saturating_sub(1), rw, ink);
                cursor += rh + 2;
            }
            Node::Unrecognized { kind } => {
                canvas.dashed_rect(x, y, w, h, BLACK);
                let label = format!("Unrecognized element: {}", kind);
                canvas.draw_text(inner_x, cursor, &label, Face::SMALL, false, BLACK)?;
                cursor += Face::SMALL.char_height;
            }
        }
    }
    Ok(())
}

/// Greedy word wrap at `max` characters; explicit newlines are kept.
fn wrap(text: &str, max: usize) -> Vec<String> {
    let max = max.max(1);
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut line = String::new();
        for word in paragraph.split(' ') {
            let needed = if line.is_empty() {
                word.chars().count()
            } else {
                line.chars().count() + 1 + word.chars().count()
            };
            if needed > max && !line.is_empty() {
                lines.push(std::mem::take(&mut line));
            }
            if !line.is_empty() {
                line.push(' ');
            }
            line.push_str(word);
            while line.chars().count() > max {
                let head: String = line.chars().take(max).collect();
                let tail: String = line.chars().skip(max).collect();
                lines.push(head);
                line = tail;
            }
        }
        lines.push(line);
    }
    lines
}
