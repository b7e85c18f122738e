use std::cell::Cell;
use std::rc::Rc;

use fizzle::options::default_colors;
use fizzle::raster::FaceRequest;
use fizzle::{
    Alignment, Color, ContextError, DrawOrder, Fizzle, RasterMask, StyleOptions, Surface,
    TextDirection, Typesetter,
};
use image::RgbaImage;
use nalgebra_glm::Vec2;
use rand::{rngs::StdRng, SeedableRng as _};

/// Sets every character as a block 0.6 font sizes wide and 0.7 tall, 0.2 below the top of the line.
/// Spaces are advanced over but left empty, and only the "sans-serif" family is known.
#[derive(Clone, Default)]
struct BlockTypesetter {
    filled_lines: Rc<Cell<usize>>,
}

impl BlockTypesetter {
    const ADVANCE: f32 = 0.6;
    const TOP: f32 = 0.2;
    const HEIGHT: f32 = 0.7;

    fn check_family(face: &FaceRequest<'_>) -> Result<(), ContextError> {
        if face.family != "sans-serif" {
            return Err(ContextError::with_context(format!(
                "Unable to find the font family {:?}",
                face.family
            )));
        }
        Ok(())
    }
}

impl Typesetter for BlockTypesetter {
    fn line_width(&self, line: &str, face: &FaceRequest<'_>) -> Result<f32, ContextError> {
        BlockTypesetter::check_family(face)?;
        Ok(line.chars().count() as f32 * face.size * BlockTypesetter::ADVANCE)
    }

    fn fill_line(
        &self,
        line: &str,
        face: &FaceRequest<'_>,
        left: f32,
        top: f32,
        mask: &mut RasterMask,
    ) -> Result<(), ContextError> {
        BlockTypesetter::check_family(face)?;
        self.filled_lines.set(self.filled_lines.get() + 1);
        let advance = face.size * BlockTypesetter::ADVANCE;
        for (index, character) in line.chars().enumerate() {
            if character == ' ' {
                continue;
            }
            mask.fill_rect(
                (left + index as f32 * advance).round() as i32,
                (top + face.size * BlockTypesetter::TOP).round() as i32,
                advance as u32,
                (face.size * BlockTypesetter::HEIGHT) as u32,
            );
        }
        Ok(())
    }
}

/// Records the fills instead of drawing them.
#[derive(Default)]
struct RecordingSurface {
    fills: Vec<(Color, Vec<Vec2>, f32)>,
}

impl RecordingSurface {
    fn circle_count(&self) -> usize {
        self.fills.iter().map(|(_, centers, _)| centers.len()).sum()
    }
}

impl Surface for RecordingSurface {
    fn fill_circles(&mut self, color: Color, centers: &[Vec2], radius: f32) {
        self.fills.push((color, centers.to_vec(), radius));
    }
}

fn options(font_size: f32) -> StyleOptions {
    let mut options = StyleOptions::default();
    options.layout.font_size = font_size;
    options
}

fn seeded_fizzle<S: Into<fizzle::TextContent>>(
    text: S,
    options: StyleOptions,
    direction: TextDirection,
    seed: u64,
) -> Fizzle<BlockTypesetter> {
    Fizzle::with_collaborators(
        text,
        options,
        BlockTypesetter::default(),
        direction,
        StdRng::seed_from_u64(seed),
    )
    .unwrap()
}

#[test]
fn single_letter_is_covered_with_bubbles_of_the_default_palette() {
    let fizzle = seeded_fizzle("A", options(100.0), TextDirection::Ltr, 1);

    assert_eq!(fizzle.width(), 60);
    assert_eq!(fizzle.height(), 120);
    assert!(fizzle.bubble_count() > 0);
    let palette = default_colors();
    for bubble in fizzle.bubbles() {
        let origin = bubble.origin();
        assert!(origin.x < 60, "{:?}", origin);
        assert!((20..90).contains(&origin.y), "{:?}", origin);
        assert!(palette.contains(&bubble.color()));
    }
}

#[test]
fn empty_text_has_no_bubbles_and_draws_nothing() {
    let mut fizzle = seeded_fizzle("", options(100.0), TextDirection::Ltr, 2);

    assert_eq!(fizzle.bubble_count(), 0);
    assert_eq!(fizzle.width(), 0);
    let mut surface = RecordingSurface::default();
    for _ in 0..3 {
        fizzle.render(&mut surface);
    }
    assert!(surface.fills.is_empty());
}

#[test]
fn two_lines_are_a_fifth_of_a_line_taller_than_two_font_sizes() {
    let fizzle = seeded_fizzle(["AB", "CD"], options(100.0), TextDirection::Ltr, 3);
    assert_eq!(fizzle.height(), 220);
    assert_eq!(fizzle.width(), 120);
    assert_eq!(fizzle.text().to_string(), "AB\nCD");
}

#[test]
fn no_density_means_no_bubbles() {
    let mut style_options = options(100.0);
    style_options.layout.density = 0.0;
    let mut fizzle = seeded_fizzle("Hello", style_options, TextDirection::Ltr, 4);
    assert_eq!(fizzle.bubble_count(), 0);

    fizzle.set_density(1.0).unwrap();
    assert!(fizzle.bubble_count() > 0);
}

#[test]
fn no_freedom_keeps_every_bubble_on_its_origin() {
    let mut style_options = options(100.0);
    style_options.appearance.freedom = 0.0;
    let mut fizzle = seeded_fizzle("Hi", style_options, TextDirection::Ltr, 5);
    let bubbles = fizzle.bubbles().to_vec();

    let mut surface = RecordingSurface::default();
    for _ in 0..50 {
        fizzle.render(&mut surface);
    }
    similar_asserts::assert_eq!(fizzle.bubbles(), &bubbles[..]);
    assert_eq!(surface.circle_count(), 50 * bubbles.len());
}

#[test]
fn rendering_moves_the_bubbles_within_their_freedom() {
    let mut fizzle = seeded_fizzle("Hi", options(60.0), TextDirection::Ltr, 6);
    let freedom = 60.0 / 30.0;
    let step = 60.0 / 600.0;

    let mut surface = RecordingSurface::default();
    for _ in 0..500 {
        fizzle.render(&mut surface);
    }
    assert!(fizzle
        .bubbles()
        .iter()
        .any(|bubble| bubble.displacement() != Vec2::zeros()));
    for bubble in fizzle.bubbles() {
        let displacement = bubble.displacement();
        assert!(displacement.x.abs() <= freedom + step);
        assert!(displacement.y.abs() <= freedom + step);
    }
    // The radius of a bubble at a size of 1 is a fortieth of the font size
    assert!(surface.fills.iter().all(|(_, _, radius)| *radius == 1.5));
}

#[test]
fn new_colors_are_applied_to_the_existing_bubbles() {
    let mut fizzle = seeded_fizzle("Hello", options(80.0), TextDirection::Ltr, 7);
    let origins: Vec<_> = fizzle.bubbles().iter().map(|bubble| bubble.origin()).collect();

    let palette = vec![Color::rgb(1, 2, 3), Color::rgb(4, 5, 6)];
    fizzle.set_colors(palette.clone()).unwrap();

    let recolored_origins: Vec<_> = fizzle.bubbles().iter().map(|bubble| bubble.origin()).collect();
    assert_eq!(origins, recolored_origins);
    assert!(fizzle
        .bubbles()
        .iter()
        .all(|bubble| palette.contains(&bubble.color())));
    assert!(palette
        .iter()
        .all(|color| fizzle.bubbles().iter().any(|bubble| bubble.color() == *color)));
    assert_eq!(fizzle.colors(), &palette[..]);
}

#[test]
fn appearance_changes_do_not_sample_again() {
    let typesetter = BlockTypesetter::default();
    let filled_lines = typesetter.filled_lines.clone();
    let mut fizzle = Fizzle::with_collaborators(
        "Hello",
        options(80.0),
        typesetter,
        TextDirection::Ltr,
        StdRng::seed_from_u64(8),
    )
    .unwrap();
    assert_eq!(filled_lines.get(), 1);
    let bubbles = fizzle.bubbles().to_vec();

    fizzle.set_speed(3.0).unwrap();
    fizzle.set_freedom(0.5).unwrap();
    fizzle.set_size(2.0).unwrap();
    fizzle
        .update_appearance(|appearance| {
            appearance.speed = 0.25;
            appearance.size = 0.0;
        })
        .unwrap();

    assert_eq!(filled_lines.get(), 1);
    similar_asserts::assert_eq!(fizzle.bubbles(), &bubbles[..]);
    assert_eq!((fizzle.speed(), fizzle.freedom(), fizzle.size()), (0.25, 0.5, 0.0));
}

#[test]
fn layout_changes_sample_again() {
    let typesetter = BlockTypesetter::default();
    let filled_lines = typesetter.filled_lines.clone();
    let mut fizzle = Fizzle::with_collaborators(
        "Hello",
        options(80.0),
        typesetter,
        TextDirection::Ltr,
        StdRng::seed_from_u64(9),
    )
    .unwrap();

    fizzle.set_bold(false).unwrap();
    fizzle.set_italic(true).unwrap();
    fizzle.set_align(Alignment::Center).unwrap();
    fizzle.set_font("sans-serif").unwrap();
    fizzle.set_density(2.0).unwrap();
    assert_eq!(filled_lines.get(), 6);

    fizzle.set_font_size(40.0).unwrap();
    assert_eq!(filled_lines.get(), 7);
    assert_eq!(fizzle.width(), 120);

    fizzle.set_text("Hello\nworld").unwrap();
    assert_eq!(filled_lines.get(), 9);
    assert_eq!(fizzle.text().line_count(), 2);

    fizzle
        .update_layout(|layout| {
            layout.font_size = 50.0;
            layout.density = 1.0;
        })
        .unwrap();
    assert_eq!(filled_lines.get(), 11);
    assert_eq!(fizzle.height(), 110);

    fizzle.set_draw_order(DrawOrder::GroupedByColor).unwrap();
    assert_eq!(filled_lines.get(), 13);
}

#[test]
fn rejected_updates_leave_the_fizzle_unchanged() {
    let mut fizzle = seeded_fizzle("Hello", options(80.0), TextDirection::Ltr, 10);
    let bubbles = fizzle.bubbles().to_vec();

    assert!(fizzle.set_density(-1.0).unwrap_err().is_invalid_configuration());
    assert!(fizzle.set_speed(f32::INFINITY).unwrap_err().is_invalid_configuration());
    assert!(fizzle.set_colors(Vec::new()).unwrap_err().is_invalid_configuration());
    let error = fizzle.set_font("cursive").unwrap_err();
    assert_eq!(error.to_string(), "Unable to find the font family \"cursive\"");

    assert_eq!(fizzle.density(), 1.0);
    assert_eq!(fizzle.speed(), 1.0);
    assert_eq!(fizzle.font(), "sans-serif");
    assert_eq!(fizzle.colors(), &default_colors()[..]);
    similar_asserts::assert_eq!(fizzle.bubbles(), &bubbles[..]);
}

fn color_runs(fizzle: &Fizzle<BlockTypesetter>) -> usize {
    fizzle
        .bubbles()
        .chunk_by(|bubble, next_bubble| bubble.color() == next_bubble.color())
        .count()
}

#[test]
fn recoloring_keeps_bubbles_grouped_by_color() {
    let mut fizzle = seeded_fizzle("Hi", options(60.0), TextDirection::Ltr, 14);
    fizzle.set_draw_order(DrawOrder::GroupedByColor).unwrap();
    assert!(color_runs(&fizzle) <= default_colors().len());

    let palette = vec![
        Color::rgb(255, 0, 0),
        Color::rgb(0, 255, 0),
        Color::rgb(0, 0, 255),
    ];
    fizzle.set_colors(palette.clone()).unwrap();
    assert!(fizzle.bubble_count() > 100);
    assert_eq!(fizzle.draw_order(), DrawOrder::GroupedByColor);
    assert!(color_runs(&fizzle) <= palette.len(), "{} runs", color_runs(&fizzle));

    fizzle
        .update_appearance(|appearance| appearance.colors = default_colors())
        .unwrap();
    assert!(color_runs(&fizzle) <= default_colors().len());
    let mut surface = RecordingSurface::default();
    fizzle.render(&mut surface);
    assert!(surface.fills.len() <= default_colors().len());
}

#[test]
fn huge_font_sizes_are_rejected_without_allocating() {
    let result = Fizzle::with_collaborators(
        "A",
        options(1.0e6),
        BlockTypesetter::default(),
        TextDirection::Ltr,
        StdRng::seed_from_u64(15),
    );
    assert!(result.err().unwrap().is_invalid_configuration());

    let mut fizzle = seeded_fizzle("A", options(100.0), TextDirection::Ltr, 15);
    let bubbles = fizzle.bubbles().to_vec();
    assert!(fizzle.set_font_size(1.0e6).unwrap_err().is_invalid_configuration());
    assert_eq!(fizzle.font_size(), 100.0);
    assert_eq!(fizzle.height(), 120);
    similar_asserts::assert_eq!(fizzle.bubbles(), &bubbles[..]);
}

#[test]
fn invalid_options_are_rejected_on_creation() {
    let mut style_options = options(100.0);
    style_options.appearance.colors.clear();
    let result = Fizzle::with_collaborators(
        "A",
        style_options,
        BlockTypesetter::default(),
        TextDirection::Ltr,
        StdRng::seed_from_u64(11),
    );
    assert!(result.err().unwrap().is_invalid_configuration());
}

#[test]
fn start_alignment_follows_the_text_direction() {
    let mut style_options = options(100.0);
    style_options.layout.align = Alignment::Start;
    // The first line is one block wide, the second one three blocks
    let left_to_right = seeded_fizzle(["A", "BBB"], style_options.clone(), TextDirection::Ltr, 12);
    let right_to_left = seeded_fizzle(["A", "BBB"], style_options, TextDirection::Rtl, 12);

    let first_line_x = |fizzle: &Fizzle<BlockTypesetter>| -> Vec<u32> {
        fizzle
            .bubbles()
            .iter()
            .filter(|bubble| bubble.origin().y < 100)
            .map(|bubble| bubble.origin().x)
            .collect()
    };
    let left_xs = first_line_x(&left_to_right);
    let right_xs = first_line_x(&right_to_left);
    assert!(!left_xs.is_empty() && !right_xs.is_empty());
    assert!(left_xs.iter().all(|&x| x < 60));
    assert!(right_xs.iter().all(|&x| x >= 120));
}

#[test]
fn bubble_counts_are_stable_across_builds() {
    let counts: Vec<usize> = (0..10)
        .map(|seed| seeded_fizzle("Fizzle", options(60.0), TextDirection::Ltr, seed).bubble_count())
        .collect();
    let mean = counts.iter().sum::<usize>() as f64 / counts.len() as f64;
    assert!(mean > 0.0);
    for count in counts {
        assert!((count as f64 - mean).abs() < mean * 0.1, "{} vs {}", count, mean);
    }
}

#[test]
fn blank_text_never_has_bubbles() {
    for seed in 0..5 {
        let fizzle = seeded_fizzle("   ", options(60.0), TextDirection::Ltr, seed);
        assert!(fizzle.width() > 0);
        assert_eq!(fizzle.bubble_count(), 0);
    }
}

#[test]
fn bubbles_are_painted_on_images() {
    let mut style_options = options(40.0);
    style_options.appearance.colors = vec![Color::rgb(255, 0, 0)];
    let mut fizzle = seeded_fizzle("I", style_options, TextDirection::Ltr, 13);
    let mut image = RgbaImage::new(fizzle.width(), fizzle.height());

    fizzle.render(&mut image);

    let painted: Vec<_> = image.pixels().filter(|pixel| pixel.0[3] > 0).collect();
    assert!(!painted.is_empty());
    assert!(painted.iter().all(|pixel| pixel.0[0] == 255 && pixel.0[1] == 0));
}

#[test]
fn default_collaborators_build_the_text() {
    let fizzle = Fizzle::new(vec!["A".to_string()], options(50.0), BlockTypesetter::default()).unwrap();
    assert!(fizzle.bubble_count() > 0);
    assert_eq!(fizzle.draw_order(), DrawOrder::Shuffled);
    assert!(fizzle.reach() > 0.0);
}
