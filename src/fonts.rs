use std::collections::HashMap;
use std::path::{Path, PathBuf};

use rusttype::{point, Font, Point, PositionedGlyph, Scale};
use serde::{Deserialize, Serialize};

use crate::error::ContextError;
use crate::raster::{FaceRequest, RasterMask, Typesetter};

/// Which font files make up each font family.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FontsConfiguration {
    pub font_associations: Vec<FontAssociation>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FontAssociation {
    pub font_family: String,
    pub regular: PathBuf,
    #[serde(default)]
    pub bold: Option<PathBuf>,
    #[serde(default)]
    pub italic: Option<PathBuf>,
    #[serde(default)]
    pub bold_italic: Option<PathBuf>,
}

impl FontsConfiguration {
    pub fn from_path(fonts_configuration_file_path: &Path) -> Result<Self, ContextError> {
        let configuration_file_contents = std::fs::read_to_string(fonts_configuration_file_path)
            .map_err(|error| {
                ContextError::with_error(
                    format!(
                        "Failed to read the fonts configuration file {:?}",
                        fonts_configuration_file_path
                    ),
                    &error,
                )
            })?;
        let mut configuration: FontsConfiguration =
            serde_json::from_str(&configuration_file_contents).map_err(|error| {
                ContextError::with_error(
                    format!(
                        "Failed to parse the fonts configuration file {:?}",
                        fonts_configuration_file_path
                    ),
                    &error,
                )
            })?;

        // Relative font paths are read from the directory of the configuration file
        if let Some(configuration_directory) = fonts_configuration_file_path.parent() {
            for font_association in configuration.font_associations.iter_mut() {
                font_association.resolve_paths(configuration_directory);
            }
        }

        Ok(configuration)
    }

    pub fn get_font_association(&self, font_family: &str) -> Option<&FontAssociation> {
        self.font_associations
            .iter()
            .find(|font_association| font_association.font_family == font_family)
    }
}

impl FontAssociation {
    fn resolve_paths(&mut self, directory: &Path) {
        let resolve = |path: &mut PathBuf| {
            if path.is_relative() {
                *path = directory.join(&*path);
            }
        };
        resolve(&mut self.regular);
        for path in [&mut self.bold, &mut self.italic, &mut self.bold_italic]
            .into_iter()
            .flatten()
        {
            resolve(path);
        }
    }
}

/// The faces of one font family, only the regular one is mandatory.
#[derive(Clone)]
pub struct FontStyles {
    pub regular_font: Font<'static>,
    pub bold_font: Option<Font<'static>>,
    pub italic_font: Option<Font<'static>>,
    pub bold_italic_font: Option<Font<'static>>,
}

impl FontStyles {
    pub fn load(font_association: &FontAssociation) -> Result<Self, ContextError> {
        let load_optional = |path: &Option<PathBuf>| path.as_deref().map(load_font).transpose();

        Ok(FontStyles {
            regular_font: load_font(&font_association.regular)?,
            bold_font: load_optional(&font_association.bold)?,
            italic_font: load_optional(&font_association.italic)?,
            bold_italic_font: load_optional(&font_association.bold_italic)?,
        })
    }

    /// Picks the face closest to the requested style, bold-italic falls back to bold and then to italic.
    pub fn select(&self, bold: bool, italic: bool) -> &Font<'static> {
        let candidates = match (bold, italic) {
            (true, true) => [
                self.bold_italic_font.as_ref(),
                self.bold_font.as_ref(),
                self.italic_font.as_ref(),
            ],
            (true, false) => [self.bold_font.as_ref(), None, None],
            (false, true) => [self.italic_font.as_ref(), None, None],
            (false, false) => [None, None, None],
        };
        candidates
            .into_iter()
            .flatten()
            .next()
            .unwrap_or(&self.regular_font)
    }

    fn has_exact(&self, bold: bool, italic: bool) -> bool {
        match (bold, italic) {
            (true, true) => self.bold_italic_font.is_some(),
            (true, false) => self.bold_font.is_some(),
            (false, true) => self.italic_font.is_some(),
            (false, false) => true,
        }
    }
}

fn load_font(font_path: &Path) -> Result<Font<'static>, ContextError> {
    let raw_font_data = std::fs::read(font_path).map_err(|error| {
        ContextError::with_error(
            format!("Unable to read the font data {:?}", font_path),
            &error,
        )
    })?;
    Font::try_from_vec(raw_font_data).ok_or_else(|| {
        ContextError::with_context(format!("Unable to load the font {:?}", font_path))
    })
}

/// Sets the text with TrueType and OpenType fonts.
///
/// Glyphs are placed in their logical order, there is no bidirectional reordering or shaping.
/// A right-to-left direction only moves the anchor of the lines, so Arabic or Hebrew text comes
/// out with its characters left to right.
#[derive(Clone, Default)]
pub struct FontTypesetter {
    font_styles_map: HashMap<String, FontStyles>,
}

impl FontTypesetter {
    /// Loads every font file of the configuration.
    pub fn load(fonts_configuration: &FontsConfiguration) -> Result<Self, ContextError> {
        let mut typesetter = FontTypesetter::default();
        for font_association in &fonts_configuration.font_associations {
            let font_styles = FontStyles::load(font_association).map_err(|error| {
                ContextError::with_error(
                    format!(
                        "Unable to load the font family {:?}",
                        font_association.font_family
                    ),
                    &error,
                )
            })?;
            log::debug!("Loaded the font family {:?}", font_association.font_family);
            typesetter.insert(font_association.font_family.clone(), font_styles);
        }

        Ok(typesetter)
    }

    pub fn insert(&mut self, font_family: String, font_styles: FontStyles) {
        self.font_styles_map.insert(font_family, font_styles);
    }

    pub fn font_families(&self) -> impl Iterator<Item = &str> {
        self.font_styles_map.keys().map(String::as_str)
    }

    fn font(&self, face: &FaceRequest<'_>) -> Result<&Font<'static>, ContextError> {
        let font_styles = self.font_styles_map.get(face.family).ok_or_else(|| {
            let mut font_families: Vec<&str> = self.font_families().collect();
            font_families.sort_unstable();
            ContextError::with_context(format!(
                "Unable to find the font family {:?} among {:?}",
                face.family, font_families
            ))
        })?;
        if !font_styles.has_exact(face.bold, face.italic) {
            log::warn!(
                "The font family {:?} has no face for bold={} italic={}, falling back to the closest one",
                face.family,
                face.bold,
                face.italic
            );
        }
        Ok(font_styles.select(face.bold, face.italic))
    }

    /// Positions the glyphs of a line with their kerning, the caret ends at the advance of the line.
    fn layout_line(
        font: &Font<'static>,
        line: &str,
        scale: Scale,
        caret: &mut Point<f32>,
    ) -> Vec<PositionedGlyph<'static>> {
        let mut positioned_glyphs = Vec::new();
        let mut last_glyph_id = None;

        for character in line.chars() {
            if character.is_control() {
                continue;
            }
            let base_glyph = font.glyph(character);
            if base_glyph.id().0 == 0 {
                log::warn!("Unable to find the character {:?} in the font", character);
            }
            if let Some(id) = last_glyph_id.take() {
                caret.x += font.pair_kerning(scale, id, base_glyph.id());
            }
            last_glyph_id = Some(base_glyph.id());

            let glyph = base_glyph.scaled(scale).positioned(*caret);
            caret.x += glyph.unpositioned().h_metrics().advance_width;
            positioned_glyphs.push(glyph);
        }

        positioned_glyphs
    }
}

impl Typesetter for FontTypesetter {
    fn line_width(&self, line: &str, face: &FaceRequest<'_>) -> Result<f32, ContextError> {
        let font = self.font(face)?;
        let mut caret = point(0.0, 0.0);
        FontTypesetter::layout_line(font, line, Scale::uniform(face.size), &mut caret);
        Ok(caret.x)
    }

    fn fill_line(
        &self,
        line: &str,
        face: &FaceRequest<'_>,
        left: f32,
        top: f32,
        mask: &mut RasterMask,
    ) -> Result<(), ContextError> {
        let font = self.font(face)?;
        let scale = Scale::uniform(face.size);
        // The top of the line box sits one ascent above the baseline
        let mut caret = point(left, top + font.v_metrics(scale).ascent);

        for glyph in FontTypesetter::layout_line(font, line, scale, &mut caret) {
            if let Some(bounding_box) = glyph.pixel_bounding_box() {
                glyph.draw(|x, y, coverage| {
                    mask.cover(
                        x as i32 + bounding_box.min.x,
                        y as i32 + bounding_box.min.y,
                        coverage,
                    )
                });
            }
        }

        Ok(())
    }
}
