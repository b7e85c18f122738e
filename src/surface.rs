use image::RgbaImage;
use nalgebra_glm::Vec2;

use crate::color::Color;

/// Where the bubbles are drawn.
pub trait Surface {
    /// Fills one disc of the given radius around each center, all in the same color.
    fn fill_circles(&mut self, color: Color, centers: &[Vec2], radius: f32);
}

/// Paints over the image with the source-over operator, the edge of each disc is antialiased
/// over one pixel.
impl Surface for RgbaImage {
    fn fill_circles(&mut self, color: Color, centers: &[Vec2], radius: f32) {
        if radius <= 0.0 || color.alpha == 0 {
            return;
        }
        let (width, height) = self.dimensions();
        for center in centers {
            let minimum_x = (center.x - radius - 1.0).floor().max(0.0) as u32;
            let minimum_y = (center.y - radius - 1.0).floor().max(0.0) as u32;
            let maximum_x = ((center.x + radius + 1.0).ceil().max(0.0) as u32).min(width);
            let maximum_y = ((center.y + radius + 1.0).ceil().max(0.0) as u32).min(height);

            for y in minimum_y..maximum_y {
                for x in minimum_x..maximum_x {
                    // Distance between the disc center and the pixel center
                    let distance = ((x as f32 + 0.5 - center.x).powi(2)
                        + (y as f32 + 0.5 - center.y).powi(2))
                    .sqrt();
                    let coverage = (radius + 0.5 - distance).clamp(0.0, 1.0);
                    if coverage > 0.0 {
                        let pixel = self.get_pixel_mut(x, y);
                        pixel.0 = source_over(color, coverage, pixel.0);
                    }
                }
            }
        }
    }
}

/// Composites the color, scaled by the coverage, over a straight alpha destination pixel.
fn source_over(color: Color, coverage: f32, destination: [u8; 4]) -> [u8; 4] {
    let source_alpha = color.alpha as f32 / 255.0 * coverage;
    let destination_alpha = destination[3] as f32 / 255.0;
    let output_alpha = source_alpha + destination_alpha * (1.0 - source_alpha);
    if output_alpha <= 0.0 {
        return [0, 0, 0, 0];
    }

    let source = [color.red, color.green, color.blue];
    let mut output = [0; 4];
    for channel in 0..3 {
        let blended = (source[channel] as f32 * source_alpha
            + destination[channel] as f32 * destination_alpha * (1.0 - source_alpha))
            / output_alpha;
        output[channel] = blended.round().clamp(0.0, 255.0) as u8;
    }
    output[3] = (output_alpha * 255.0).round().clamp(0.0, 255.0) as u8;
    output
}
