use rand::{rngs::StdRng, Rng, SeedableRng as _};

use crate::animator::{Animator, Bubble};
use crate::color::Color;
use crate::direction::{LocaleDirection, TextDirection, TextDirectionSource};
use crate::error::ContextError;
use crate::options::{Alignment, AppearanceOptions, LayoutOptions, StyleOptions};
use crate::raster::{rasterize, Typesetter};
use crate::sampler::{DrawOrder, Sampler};
use crate::surface::Surface;
use crate::text::TextContent;

/// Font size divided by this is the distance, in pixels, a bubble travels per frame at a speed of 1.
const SPEED_DIVISOR: f32 = 600.0;
/// Font size divided by this is how far, in pixels, a bubble can wander at a freedom of 1.
const FREEDOM_DIVISOR: f32 = 30.0;
/// Font size divided by this is the radius, in pixels, of a bubble at a size of 1.
const RADIUS_DIVISOR: f32 = 40.0;

/// Some text drawn with bubbles.
///
/// The options come in two groups. Changing the text or any [`LayoutOptions`] (font, font size,
/// bold, italic, alignment, density) rasterizes the text again and replaces every bubble. Changing
/// any [`AppearanceOptions`] (colors, size, speed, freedom) keeps the bubbles where they are: new
/// colors are picked at random for the existing bubbles, the size, speed and freedom only affect
/// the next frames.
///
/// An update that is rejected leaves the fizzle as it was before.
pub struct Fizzle<T, R = StdRng> {
    text: TextContent,
    options: StyleOptions,
    draw_order: DrawOrder,
    typesetter: T,
    direction_source: Box<dyn TextDirectionSource>,
    rng: R,
    width: u32,
    height: u32,
    animator: Animator,
}

impl<T: Typesetter> Fizzle<T, StdRng> {
    /// A fizzle reading the text direction from the locale, with an entropy seeded random source.
    pub fn new<S: Into<TextContent>>(
        text: S,
        options: StyleOptions,
        typesetter: T,
    ) -> Result<Self, ContextError> {
        Fizzle::with_collaborators(
            text,
            options,
            typesetter,
            LocaleDirection,
            StdRng::from_entropy(),
        )
    }
}

impl<T: Typesetter, R: Rng> Fizzle<T, R> {
    pub fn with_collaborators<S, D>(
        text: S,
        options: StyleOptions,
        typesetter: T,
        direction_source: D,
        rng: R,
    ) -> Result<Self, ContextError>
    where
        S: Into<TextContent>,
        D: TextDirectionSource + 'static,
    {
        options.validate()?;
        let mut fizzle = Fizzle {
            text: text.into(),
            options,
            draw_order: DrawOrder::default(),
            typesetter,
            direction_source: Box::new(direction_source),
            rng,
            width: 0,
            height: 0,
            animator: Animator::default(),
        };
        fizzle.build()?;

        Ok(fizzle)
    }

    /// Discards every bubble and samples new ones from the text rasterized with the current options.
    fn build(&mut self) -> Result<(), ContextError> {
        let direction: TextDirection = self.direction_source.text_direction();
        let mask = rasterize(&self.text, &self.options.layout, &self.typesetter, direction)?;
        let sampler = Sampler {
            font_size: self.options.layout.font_size,
            density: self.options.layout.density,
            colors: &self.options.appearance.colors,
            draw_order: self.draw_order,
        };
        let bubbles = sampler.sample(&mask, &mut self.rng);

        self.width = mask.width();
        self.height = mask.height();
        self.animator = Animator::new(bubbles);
        log::debug!(
            "Built {} bubbles for {:?} in a {}x{} area",
            self.animator.len(),
            self.text.to_string(),
            self.width,
            self.height
        );

        Ok(())
    }

    /// Moves every bubble by one frame and then draws them.
    pub fn render<S: Surface + ?Sized>(&mut self, surface: &mut S) {
        let font_size = self.options.layout.font_size;
        let appearance = &self.options.appearance;
        let speed = appearance.speed * font_size / SPEED_DIVISOR;
        let freedom = appearance.freedom * font_size / FREEDOM_DIVISOR;
        let radius = appearance.size * font_size / RADIUS_DIVISOR;

        self.animator.step(speed, freedom);
        self.animator.draw(surface, radius);
    }

    pub fn set_text<S: Into<TextContent>>(&mut self, text: S) -> Result<(), ContextError> {
        let previous_text = std::mem::replace(&mut self.text, text.into());
        if let Err(error) = self.build() {
            self.text = previous_text;
            return Err(error);
        }
        Ok(())
    }

    /// Applies the changes to the layout options and rebuilds every bubble.
    pub fn update_layout<F: FnOnce(&mut LayoutOptions)>(
        &mut self,
        update: F,
    ) -> Result<(), ContextError> {
        let mut layout = self.options.layout.clone();
        update(&mut layout);
        layout.validate()?;

        let previous_layout = std::mem::replace(&mut self.options.layout, layout);
        if let Err(error) = self.build() {
            self.options.layout = previous_layout;
            return Err(error);
        }
        Ok(())
    }

    /// Applies the changes to the appearance options on the existing bubbles.
    pub fn update_appearance<F: FnOnce(&mut AppearanceOptions)>(
        &mut self,
        update: F,
    ) -> Result<(), ContextError> {
        let mut appearance = self.options.appearance.clone();
        update(&mut appearance);
        appearance.validate()?;

        if appearance.colors != self.options.appearance.colors {
            self.recolor(&appearance.colors);
        }
        self.options.appearance = appearance;
        Ok(())
    }

    pub fn set_font<S: Into<String>>(&mut self, font: S) -> Result<(), ContextError> {
        let font = font.into();
        self.update_layout(|layout| layout.font = font)
    }

    pub fn set_font_size(&mut self, font_size: f32) -> Result<(), ContextError> {
        self.update_layout(|layout| layout.font_size = font_size)
    }

    pub fn set_bold(&mut self, bold: bool) -> Result<(), ContextError> {
        self.update_layout(|layout| layout.bold = bold)
    }

    pub fn set_italic(&mut self, italic: bool) -> Result<(), ContextError> {
        self.update_layout(|layout| layout.italic = italic)
    }

    pub fn set_align(&mut self, align: Alignment) -> Result<(), ContextError> {
        self.update_layout(|layout| layout.align = align)
    }

    pub fn set_density(&mut self, density: f32) -> Result<(), ContextError> {
        self.update_layout(|layout| layout.density = density)
    }

    /// Changes the drawing order of the bubbles, which samples them again.
    pub fn set_draw_order(&mut self, draw_order: DrawOrder) -> Result<(), ContextError> {
        let previous_draw_order = std::mem::replace(&mut self.draw_order, draw_order);
        if let Err(error) = self.build() {
            self.draw_order = previous_draw_order;
            return Err(error);
        }
        Ok(())
    }

    /// Gives every bubble a new random color of the palette, even when it is the current one.
    pub fn set_colors(&mut self, colors: Vec<Color>) -> Result<(), ContextError> {
        let appearance = AppearanceOptions {
            colors,
            ..self.options.appearance.clone()
        };
        appearance.validate()?;

        self.recolor(&appearance.colors);
        self.options.appearance = appearance;
        Ok(())
    }

    fn recolor(&mut self, colors: &[Color]) {
        self.animator.recolor(colors, &mut self.rng);
        if self.draw_order == DrawOrder::GroupedByColor {
            self.animator.group_by_palette(colors);
        }
    }

    pub fn set_size(&mut self, size: f32) -> Result<(), ContextError> {
        self.update_appearance(|appearance| appearance.size = size)
    }

    pub fn set_speed(&mut self, speed: f32) -> Result<(), ContextError> {
        self.update_appearance(|appearance| appearance.speed = speed)
    }

    pub fn set_freedom(&mut self, freedom: f32) -> Result<(), ContextError> {
        self.update_appearance(|appearance| appearance.freedom = freedom)
    }

    pub fn text(&self) -> &TextContent {
        &self.text
    }

    pub fn options(&self) -> &StyleOptions {
        &self.options
    }

    pub fn font(&self) -> &str {
        &self.options.layout.font
    }

    pub fn font_size(&self) -> f32 {
        self.options.layout.font_size
    }

    pub fn bold(&self) -> bool {
        self.options.layout.bold
    }

    pub fn italic(&self) -> bool {
        self.options.layout.italic
    }

    pub fn align(&self) -> Alignment {
        self.options.layout.align
    }

    pub fn density(&self) -> f32 {
        self.options.layout.density
    }

    pub fn colors(&self) -> &[Color] {
        &self.options.appearance.colors
    }

    pub fn size(&self) -> f32 {
        self.options.appearance.size
    }

    pub fn speed(&self) -> f32 {
        self.options.appearance.speed
    }

    pub fn freedom(&self) -> f32 {
        self.options.appearance.freedom
    }

    pub fn draw_order(&self) -> DrawOrder {
        self.draw_order
    }

    /// Width of the rasterized text, in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height of the rasterized text, in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// How far outside of the rasterized text a bubble can be drawn, in pixels.
    pub fn reach(&self) -> f32 {
        let font_size = self.options.layout.font_size;
        let appearance = &self.options.appearance;
        let step = appearance.speed * font_size / SPEED_DIVISOR;
        appearance.freedom * font_size / FREEDOM_DIVISOR
            + step
            + appearance.size * font_size / RADIUS_DIVISOR
    }

    pub fn bubbles(&self) -> &[Bubble] {
        self.animator.bubbles()
    }

    pub fn bubble_count(&self) -> usize {
        self.animator.len()
    }
}
