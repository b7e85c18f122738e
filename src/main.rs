use std::path::PathBuf;

use clap::Parser;
use fizzle::{
    Color, ContextError, Fizzle, FontTypesetter, FontsConfiguration, LocaleDirection, StyleOptions,
    Surface, TextDirection, TextDirectionSource,
};
use image::RgbaImage;
use nalgebra_glm::{vec2, Vec2};
use rand::{rngs::StdRng, SeedableRng as _};

/// Renders some text as bubbles into a sequence of PNG frames.
#[derive(Parser, Debug)]
#[command(version, long_about = None)]
struct CliArguments {
    /// A line of text, repeat the flag for several lines.
    #[arg(short = 't', long = "text", value_name = "line", required = true)]
    text_lines: Vec<String>,
    /// The JSON file associating the font families with their font files.
    #[arg(short = 'f', long = "fonts", value_name = "json_file")]
    fonts_configuration_path: PathBuf,
    /// The JSON file of the style options, the defaults are used without it.
    #[arg(short = 's', long = "style", value_name = "json_file")]
    style_options_path: Option<PathBuf>,
    /// The directory the frames are saved into.
    #[arg(short = 'o', long = "output", value_name = "directory")]
    output_directory: PathBuf,
    #[arg(short = 'n', long = "frames", default_value_t = 60)]
    frames: u32,
    #[arg(long = "background", default_value = "#00000000")]
    background: Color,
    /// Seeds the random source, for frames that are the same from one run to the other.
    #[arg(long = "seed")]
    seed: Option<u64>,
    /// Overrides the direction of the text read from the locale.
    #[arg(long = "direction", value_name = "ltr|rtl")]
    direction: Option<TextDirection>,
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Draws on an image translated by an offset, which leaves a margin around the text.
struct OffsetSurface<'a> {
    image: &'a mut RgbaImage,
    offset: Vec2,
    buffer: Vec<Vec2>,
}

impl Surface for OffsetSurface<'_> {
    fn fill_circles(&mut self, color: Color, centers: &[Vec2], radius: f32) {
        self.buffer.clear();
        self.buffer
            .extend(centers.iter().map(|&center| center + self.offset));
        self.image.fill_circles(color, &self.buffer, radius);
    }
}

fn main() {
    let arguments = CliArguments::parse();
    env_logger::builder()
        .filter_level(match arguments.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        })
        .init();

    if let Err(error) = fallible_main(arguments) {
        log::error!("{}", error);
        std::process::exit(1);
    }
}

fn fallible_main(arguments: CliArguments) -> Result<(), ContextError> {
    log::debug!("{:?}", arguments);

    let fonts_configuration = FontsConfiguration::from_path(&arguments.fonts_configuration_path)?;
    let typesetter = FontTypesetter::load(&fonts_configuration)?;
    let style_options = match &arguments.style_options_path {
        Some(style_options_path) => StyleOptions::from_path(style_options_path)?,
        None => StyleOptions::default(),
    };
    let direction_source: Box<dyn TextDirectionSource> = match arguments.direction {
        Some(direction) => Box::new(direction),
        None => Box::new(LocaleDirection),
    };
    let rng = match arguments.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut fizzle = Fizzle::with_collaborators(
        arguments.text_lines,
        style_options,
        typesetter,
        direction_source,
        rng,
    )?;
    log::info!(
        "Sampled {} bubbles in a {}x{} area",
        fizzle.bubble_count(),
        fizzle.width(),
        fizzle.height()
    );

    // Leave enough room for the bubbles wandering the furthest from the text
    let margin = fizzle.reach().ceil() + 1.0;
    let mut image = RgbaImage::new(
        fizzle.width() + 2 * margin as u32,
        fizzle.height() + 2 * margin as u32,
    );

    std::fs::create_dir_all(&arguments.output_directory).map_err(|error| {
        ContextError::with_error(
            format!(
                "Failed to create the output directory {:?}",
                arguments.output_directory
            ),
            &error,
        )
    })?;
    for frame_index in 0..arguments.frames {
        for pixel in image.pixels_mut() {
            *pixel = arguments.background.into();
        }
        let mut surface = OffsetSurface {
            image: &mut image,
            offset: vec2(margin, margin),
            buffer: Vec::new(),
        };
        fizzle.render(&mut surface);

        let frame_path = arguments
            .output_directory
            .join(format!("frame_{:04}.png", frame_index));
        image.save(&frame_path).map_err(|error| {
            ContextError::with_error(format!("Failed to save the frame {:?}", frame_path), &error)
        })?;
        log::debug!("Saved the frame {:?}", frame_path);
    }
    log::info!(
        "Saved {} frame(s) to the directory {:?}",
        arguments.frames,
        arguments.output_directory
    );

    Ok(())
}
