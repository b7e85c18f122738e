use nalgebra_glm::{vec2, UVec2, Vec2};
use rand::Rng;

use crate::color::Color;
use crate::surface::Surface;

/// A point sampled from the text, drawn as a disc wandering around its origin.
#[derive(Debug, Clone, PartialEq)]
pub struct Bubble {
    origin: UVec2,
    color: Color,
    velocity: Vec2,
    displacement: Vec2,
}

impl Bubble {
    /// Creates a bubble at rest on its origin. The horizontal speed is drawn in `[0.25, 0.75]` and the
    /// vertical one makes up the rest of a unit, both with a random sign.
    pub fn new<R: Rng + ?Sized>(origin: UVec2, color: Color, rng: &mut R) -> Self {
        let horizontal_speed = rng.gen_range(0.25..=0.75);
        let vertical_speed = 1.0 - horizontal_speed;
        Bubble {
            origin,
            color,
            velocity: vec2(
                horizontal_speed * random_sign(rng),
                vertical_speed * random_sign(rng),
            ),
            displacement: vec2(0.0, 0.0),
        }
    }

    pub fn origin(&self) -> UVec2 {
        self.origin
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn displacement(&self) -> Vec2 {
        self.displacement
    }

    /// Where the bubble is drawn.
    pub fn position(&self) -> Vec2 {
        vec2(self.origin.x as f32, self.origin.y as f32) + self.displacement
    }

    /// Moves the bubble by its velocity times `speed`, then turns it back on each axis where it went
    /// further than `freedom` from its origin. The bound is checked after the move, so the bubble can
    /// overshoot it by one step. A freedom of zero keeps the bubble still.
    pub fn advance(&mut self, speed: f32, freedom: f32) {
        if freedom <= 0.0 {
            return;
        }
        self.displacement += self.velocity * speed;

        for axis in 0..2 {
            let displacement = self.displacement[axis];
            let velocity = self.velocity[axis];
            if (displacement > freedom && velocity > 0.0) || (displacement < -freedom && velocity < 0.0)
            {
                self.velocity[axis] = -velocity;
            }
        }
    }
}

fn random_sign<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    if rng.gen_bool(0.5) {
        1.0
    } else {
        -1.0
    }
}

/// Stable sort on the index of each bubble color in the palette, unknown colors go last.
pub(crate) fn sort_by_palette(bubbles: &mut [Bubble], colors: &[Color]) {
    bubbles.sort_by_key(|bubble| {
        colors
            .iter()
            .position(|&color| color == bubble.color)
            .unwrap_or(usize::MAX)
    });
}

/// Owns the bubbles of one build and moves them frame after frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Animator {
    bubbles: Vec<Bubble>,
}

impl Animator {
    pub fn new(bubbles: Vec<Bubble>) -> Self {
        Animator { bubbles }
    }

    pub fn bubbles(&self) -> &[Bubble] {
        &self.bubbles
    }

    pub fn len(&self) -> usize {
        self.bubbles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bubbles.is_empty()
    }

    pub fn step(&mut self, speed: f32, freedom: f32) {
        for bubble in &mut self.bubbles {
            bubble.advance(speed, freedom);
        }
    }

    /// Gives every bubble a new random color of the palette, nothing else changes.
    pub fn recolor<R: Rng + ?Sized>(&mut self, colors: &[Color], rng: &mut R) {
        if colors.is_empty() {
            return;
        }
        for bubble in &mut self.bubbles {
            bubble.set_color(colors[rng.gen_range(0..colors.len())]);
        }
    }

    /// Puts the bubbles in the order of the palette, bubbles of the same color keep their relative order.
    pub fn group_by_palette(&mut self, colors: &[Color]) {
        sort_by_palette(&mut self.bubbles, colors);
    }

    /// Draws every bubble in order. Consecutive bubbles of the same color are filled in one call.
    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S, radius: f32) {
        if radius <= 0.0 || self.bubbles.is_empty() {
            return;
        }
        let mut centers = Vec::new();
        for run in self
            .bubbles
            .chunk_by(|bubble, next_bubble| bubble.color == next_bubble.color)
        {
            centers.clear();
            centers.extend(run.iter().map(Bubble::position));
            surface.fill_circles(run[0].color, &centers, radius);
        }
    }
}
