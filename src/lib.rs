//! Fizzle renders a piece of text as a mosaic of colored bubbles sampled from the shape of its glyphs,
//! each bubble then wandering around the place it was sampled from, frame after frame.
//!
//! The entry point of this crate is the struct `Fizzle`. It is built from the text, the `StyleOptions`
//! and a `Typesetter`, which is what turns the lines of text into an opacity mask. For TrueType and
//! OpenType fonts this is the `FontTypesetter`. The host then calls `Fizzle::render` once per frame with
//! any `Surface`, an `image::RgbaImage` being one.

/// The module where the `Fizzle` interface is presented.
///
/// # Introduction
///
/// A `Fizzle` owns the text, its options, the typesetter, the source of the text direction and the random
/// source. Every change of the text or of the layout options rasterizes the text again and samples new bubbles,
/// while the changes of the appearance options are applied to the existing bubbles.
pub mod fizzle;

/// This module contains the `ContextError` type which is the error type used throughout this library.
///
/// The `ContextError` type carries a context and possibly the message of the error which caused it. The options
/// which are out of range are all reported with the same "Invalid configuration" context.
pub mod error;

/// The options of a fizzle, split into the layout options and the appearance options.
pub mod options;

pub mod color;

/// The lines of text, normalized.
pub mod text;

/// Detection of the direction of the text, used to resolve the `start` and `end` alignments.
pub mod direction;

/// The opacity mask of the rasterized text and the `Typesetter` trait which fills it.
pub mod raster;

/// The `FontTypesetter`, which sets the text with the fonts of a `FontsConfiguration`.
///
/// The configuration associates each font family with its regular face and optionally with its bold, italic and
/// bold-italic faces. A missing face is replaced by the closest available one.
pub mod fonts;

/// Sampling of the bubbles from an opacity mask.
pub mod sampler;

/// The bubbles and their bounded random walk.
pub mod animator;

/// The `Surface` trait which the bubbles are drawn on.
pub mod surface;

pub use crate::animator::{Animator, Bubble};
pub use crate::color::Color;
pub use crate::direction::{LocaleDirection, TextDirection, TextDirectionSource};
pub use crate::error::ContextError;
pub use crate::fizzle::Fizzle;
pub use crate::fonts::{FontTypesetter, FontsConfiguration};
pub use crate::options::{Alignment, AppearanceOptions, LayoutOptions, StyleOptions};
pub use crate::raster::{RasterMask, Typesetter};
pub use crate::sampler::DrawOrder;
pub use crate::surface::Surface;
pub use crate::text::TextContent;
