use crate::direction::TextDirection;
use crate::error::ContextError;
use crate::options::{HorizontalAnchor, LayoutOptions};
use crate::text::TextContent;

/// The largest mask a text can be rasterized into, in pixels.
pub const MAX_MASK_PIXELS: usize = 1 << 26;

/// The opacity of the rasterized text, one byte per pixel stored row after row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterMask {
    width: u32,
    height: u32,
    alpha: Vec<u8>,
}

impl RasterMask {
    /// A fully transparent mask.
    pub fn new(width: u32, height: u32) -> Self {
        RasterMask {
            width,
            height,
            alpha: vec![0; width as usize * height as usize],
        }
    }

    pub fn from_alpha(width: u32, height: u32, alpha: Vec<u8>) -> Result<Self, ContextError> {
        let expected_length = width as usize * height as usize;
        if alpha.len() != expected_length {
            return Err(ContextError::with_context(format!(
                "A {}x{} mask needs {} alpha values, found {}",
                width,
                height,
                expected_length,
                alpha.len()
            )));
        }
        Ok(RasterMask {
            width,
            height,
            alpha,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel_count(&self) -> usize {
        self.alpha.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alpha.is_empty()
    }

    pub fn alpha(&self) -> &[u8] {
        &self.alpha
    }

    pub fn get(&self, x: u32, y: u32) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.alpha.get(self.index(x, y)).copied()
    }

    /// The sum of every alpha value, in units of fully opaque pixels.
    pub fn total_opacity(&self) -> f64 {
        self.alpha.iter().map(|&alpha| alpha as f64).sum::<f64>() / 255.0
    }

    /// Covers a pixel with the given coverage in `[0, 1]`, overlapping glyphs keep the highest opacity.
    /// Pixels outside of the mask are ignored.
    pub fn cover(&mut self, x: i32, y: i32, coverage: f32) {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return;
        }
        let index = self.index(x as u32, y as u32);
        let alpha = (coverage.clamp(0.0, 1.0) * 255.0).round() as u8;
        self.alpha[index] = self.alpha[index].max(alpha);
    }

    /// Fills a rectangle opaque, clipped to the mask.
    pub fn fill_rect(&mut self, x: i32, y: i32, width: u32, height: u32) {
        for row in y..y.saturating_add(height as i32) {
            for column in x..x.saturating_add(width as i32) {
                self.cover(column, row, 1.0);
            }
        }
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }
}

/// The face a line of text is set in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceRequest<'a> {
    pub family: &'a str,
    pub size: f32,
    pub bold: bool,
    pub italic: bool,
}

impl<'a> From<&'a LayoutOptions> for FaceRequest<'a> {
    fn from(layout: &'a LayoutOptions) -> Self {
        FaceRequest {
            family: &layout.font,
            size: layout.font_size,
            bold: layout.bold,
            italic: layout.italic,
        }
    }
}

/// Measures and fills lines of text, this is how the glyph shapes reach the mask.
pub trait Typesetter {
    /// The horizontal advance of the whole line, in pixels.
    fn line_width(&self, line: &str, face: &FaceRequest<'_>) -> Result<f32, ContextError>;

    /// Fills the line opaque into the mask, `left` and `top` being the corner of the line box.
    fn fill_line(
        &self,
        line: &str,
        face: &FaceRequest<'_>,
        left: f32,
        top: f32,
        mask: &mut RasterMask,
    ) -> Result<(), ContextError>;
}

/// Renders every line of the text into a mask as wide as the widest line and
/// `lines + 0.2` font sizes tall, with the line `n` starting at `n * font_size`.
pub fn rasterize<T: Typesetter + ?Sized>(
    text: &TextContent,
    layout: &LayoutOptions,
    typesetter: &T,
    direction: TextDirection,
) -> Result<RasterMask, ContextError> {
    let face = FaceRequest::from(layout);
    let line_widths = text
        .lines()
        .iter()
        .map(|line| typesetter.line_width(line, &face))
        .collect::<Result<Vec<_>, _>>()?;

    let width = line_widths
        .iter()
        .map(|line_width| line_width.floor() as u32)
        .max()
        .unwrap_or(0);
    let height = ((text.line_count() as f32 + 0.2) * layout.font_size).floor() as u32;
    let pixel_count = (width as usize).checked_mul(height as usize);
    if !pixel_count.is_some_and(|pixel_count| pixel_count <= MAX_MASK_PIXELS) {
        return Err(ContextError::invalid_configuration(format!(
            "The text needs a {}x{} mask, more than {} pixels",
            width, height, MAX_MASK_PIXELS
        )));
    }
    let mut mask = RasterMask::new(width, height);
    if mask.is_empty() {
        log::debug!("The text {:?} covers no pixel", text.to_string());
        return Ok(mask);
    }

    let anchor = layout.align.resolve(direction);
    for (line_index, (line, line_width)) in text.lines().iter().zip(line_widths).enumerate() {
        let left = match anchor {
            HorizontalAnchor::Left => 0.0,
            HorizontalAnchor::Center => (width as f32 - line_width) / 2.0,
            HorizontalAnchor::Right => width as f32 - line_width,
        };
        let top = line_index as f32 * layout.font_size;
        typesetter.fill_line(line, &face, left, top, &mut mask)?;
    }
    log::debug!(
        "Rasterized {} line(s) into a {}x{} mask aligned {:?} ({})",
        text.line_count(),
        width,
        height,
        anchor,
        direction
    );

    Ok(mask)
}
