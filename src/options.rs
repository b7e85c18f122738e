use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::direction::TextDirection;
use crate::error::ContextError;

/// The horizontal alignment of the lines inside the mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Alignment {
    Left,
    Center,
    Right,
    /// Left for left-to-right text, right for right-to-left text.
    #[default]
    Start,
    /// Right for left-to-right text, left for right-to-left text.
    End,
}

/// Where a line is anchored once the alignment has been resolved against the text direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HorizontalAnchor {
    Left,
    Center,
    Right,
}

impl Alignment {
    pub const ALL: [Alignment; 5] = [
        Alignment::Left,
        Alignment::Center,
        Alignment::Right,
        Alignment::Start,
        Alignment::End,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
            Alignment::Start => "start",
            Alignment::End => "end",
        }
    }

    pub fn resolve(self, direction: TextDirection) -> HorizontalAnchor {
        match (self, direction) {
            (Alignment::Left, _) => HorizontalAnchor::Left,
            (Alignment::Center, _) => HorizontalAnchor::Center,
            (Alignment::Right, _) => HorizontalAnchor::Right,
            (Alignment::Start, TextDirection::Ltr) | (Alignment::End, TextDirection::Rtl) => {
                HorizontalAnchor::Left
            }
            (Alignment::Start, TextDirection::Rtl) | (Alignment::End, TextDirection::Ltr) => {
                HorizontalAnchor::Right
            }
        }
    }
}

impl std::str::FromStr for Alignment {
    type Err = ContextError;

    fn from_str(string: &str) -> Result<Self, Self::Err> {
        Alignment::ALL
            .into_iter()
            .find(|alignment| alignment.as_str() == string)
            .ok_or_else(|| {
                ContextError::invalid_configuration(format!(
                    "The alignment {:?} is not one of left, center, right, start or end",
                    string
                ))
            })
    }
}

impl std::fmt::Display for Alignment {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl TryFrom<String> for Alignment {
    type Error = ContextError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Alignment> for String {
    fn from(value: Alignment) -> Self {
        value.as_str().into()
    }
}

/// The options that decide where the bubbles are sampled, changing any of them rebuilds every bubble.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutOptions {
    /// A font family of the fonts configuration.
    pub font: String,
    /// Size of the text in pixels.
    pub font_size: f32,
    pub bold: bool,
    pub italic: bool,
    pub align: Alignment,
    /// Ratio of the bubbles density, higher than 1 makes for very dense and slow text (0 means no bubbles).
    pub density: f32,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        LayoutOptions {
            font: "sans-serif".into(),
            font_size: 200.0,
            bold: true,
            italic: false,
            align: Alignment::Start,
            density: 1.0,
        }
    }
}

impl LayoutOptions {
    pub fn validate(&self) -> Result<(), ContextError> {
        if self.font.trim().is_empty() {
            return Err(ContextError::invalid_configuration(
                "The font family must not be empty",
            ));
        }
        ensure_non_negative("font size", self.font_size)?;
        ensure_non_negative("density", self.density)
    }
}

/// The options applied to the existing bubbles in place, without sampling them again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppearanceOptions {
    /// The palette every bubble picks its color from.
    pub colors: Vec<Color>,
    /// Radius of the bubbles relative to the font size (0 means invisible bubbles).
    #[serde(alias = "radius")]
    pub size: f32,
    /// Speed of the bubbles relative to the font size (0 means no movement).
    pub speed: f32,
    /// Bounds of the bubbles movement relative to the font size (0 means no movement).
    pub freedom: f32,
}

impl Default for AppearanceOptions {
    fn default() -> Self {
        AppearanceOptions {
            colors: default_colors(),
            size: 1.0,
            speed: 1.0,
            freedom: 1.0,
        }
    }
}

impl AppearanceOptions {
    pub fn validate(&self) -> Result<(), ContextError> {
        if self.colors.is_empty() {
            return Err(ContextError::invalid_configuration(
                "At least one color is needed to paint the bubbles",
            ));
        }
        ensure_non_negative("size", self.size)?;
        ensure_non_negative("speed", self.speed)?;
        ensure_non_negative("freedom", self.freedom)
    }
}

/// The palette used when no colors are given.
pub fn default_colors() -> Vec<Color> {
    vec![
        Color::rgb(0x31, 0xff, 0xb7),
        Color::rgb(0xff, 0xb0, 0x31),
        Color::rgb(0xc1, 0xff, 0x31),
        Color::rgb(0x79, 0x31, 0xff),
    ]
}

/// Every option of a fizzle, read from and written to a flat JSON object.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StyleOptions {
    #[serde(flatten)]
    pub layout: LayoutOptions,
    #[serde(flatten)]
    pub appearance: AppearanceOptions,
}

impl StyleOptions {
    pub fn from_path(style_options_path: &Path) -> Result<Self, ContextError> {
        let style_options_content =
            std::fs::read_to_string(style_options_path).map_err(|error| {
                ContextError::with_error(
                    format!("Unable to read the style options {:?}", style_options_path),
                    &error,
                )
            })?;
        StyleOptions::from_json(&style_options_content)
    }

    pub fn from_json(style_options_content: &str) -> Result<Self, ContextError> {
        let style_options: StyleOptions =
            serde_json::from_str(style_options_content).map_err(|error| {
                ContextError::invalid_configuration(format!(
                    "Unable to parse the style options: {}",
                    error
                ))
            })?;
        style_options.validate()?;

        Ok(style_options)
    }

    pub fn validate(&self) -> Result<(), ContextError> {
        self.layout.validate()?;
        self.appearance.validate()
    }
}

fn ensure_non_negative(name: &str, value: f32) -> Result<(), ContextError> {
    if !value.is_finite() {
        return Err(ContextError::invalid_configuration(format!(
            "The {} must be a finite number, found {}",
            name, value
        )));
    }
    if value < 0.0 {
        return Err(ContextError::invalid_configuration(format!(
            "The {} must not be negative, found {}",
            name, value
        )));
    }
    Ok(())
}
