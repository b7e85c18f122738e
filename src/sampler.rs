use nalgebra_glm::UVec2;
use rand::{seq::SliceRandom as _, Rng};

use crate::animator::{sort_by_palette, Bubble};
use crate::color::Color;
use crate::raster::RasterMask;

/// Pixels of spacing between two bubbles for each pixel of font size, at a density of 1.
const BASE_SPACING_RATIO: f32 = 1e-5;
/// Scales the accumulated opacity so that the bubble count does not depend on the mask resolution.
const JUMP_RATIO: f64 = 0.08;

/// The order in which the sampled bubbles are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DrawOrder {
    /// The scan order, top to bottom.
    Scan,
    /// A random permutation, so that no color is consistently drawn over another.
    #[default]
    Shuffled,
    /// Shuffled, then grouped by palette color, for surfaces that are faster filling one color at once.
    GroupedByColor,
}

/// Turns the opacity of a mask into bubbles: the more opaque a region, the denser its bubbles.
#[derive(Debug, Clone, PartialEq)]
pub struct Sampler<'a> {
    pub font_size: f32,
    pub density: f32,
    pub colors: &'a [Color],
    pub draw_order: DrawOrder,
}

impl Sampler<'_> {
    /// Scans the mask row after row, taking out of a counter the opacity of each pixel. Whenever the
    /// counter gets below zero a bubble is placed on the pixel and the counter starts again from a
    /// random value between one and two spacings.
    pub fn sample<R: Rng + ?Sized>(&self, mask: &RasterMask, rng: &mut R) -> Vec<Bubble> {
        if mask.is_empty() || self.colors.is_empty() || self.density <= 0.0 {
            return Vec::new();
        }
        let space = (self.font_size * BASE_SPACING_RATIO / self.density) as f64;
        // The original worked on the RGBA bytes of the mask, hence four bytes per pixel
        let jump = JUMP_RATIO / ((mask.pixel_count() * 4) as f64).sqrt();
        let width = mask.width() as usize;

        let mut bubbles = Vec::new();
        let mut counter = space / 2.0;
        for (index, &alpha) in mask.alpha().iter().enumerate() {
            if alpha == 0 {
                continue;
            }
            counter -= (alpha as f64 / 255.0) * jump;
            if counter < 0.0 {
                let color = self.colors[rng.gen_range(0..self.colors.len())];
                let origin = UVec2::new((index % width) as u32, (index / width) as u32);
                bubbles.push(Bubble::new(origin, color, rng));
                counter = space * rng.gen_range(1.0..2.0);
            }
        }

        self.arrange(&mut bubbles, rng);
        log::debug!(
            "Sampled {} bubbles from {} opaque pixels (space {:e}, jump {:e})",
            bubbles.len(),
            mask.total_opacity(),
            space,
            jump
        );

        bubbles
    }

    fn arrange<R: Rng + ?Sized>(&self, bubbles: &mut [Bubble], rng: &mut R) {
        match self.draw_order {
            DrawOrder::Scan => {}
            DrawOrder::Shuffled => bubbles.shuffle(rng),
            DrawOrder::GroupedByColor => {
                bubbles.shuffle(rng);
                sort_by_palette(bubbles, self.colors);
            }
        }
    }
}
