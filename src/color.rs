use serde::{Deserialize, Serialize};

use crate::error::ContextError;

/// A straight (not premultiplied) RGBA color, written in the options as a hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub alpha: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    pub const fn rgb(red: u8, green: u8, blue: u8) -> Color {
        Color::rgba(red, green, blue, 255)
    }

    pub const fn rgba(red: u8, green: u8, blue: u8, alpha: u8) -> Color {
        Color {
            red,
            green,
            blue,
            alpha,
        }
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.red, self.green, self.blue, self.alpha]
    }
}

impl std::str::FromStr for Color {
    type Err = ContextError;

    /// Parses `#rgb`, `#rgba`, `#rrggbb` and `#rrggbbaa` strings.
    fn from_str(string: &str) -> Result<Self, Self::Err> {
        let invalid_color =
            || ContextError::invalid_configuration(format!("The color {:?} is not a hex color", string));

        let digits = string.trim().strip_prefix('#').ok_or_else(invalid_color)?;
        if !digits.chars().all(|character| character.is_ascii_hexdigit()) {
            return Err(invalid_color());
        }
        let nibble = |index: usize| {
            u8::from_str_radix(&digits[index..index + 1], 16).map(|value| value * 17)
        };
        let byte = |index: usize| u8::from_str_radix(&digits[index * 2..index * 2 + 2], 16);

        let components = match digits.len() {
            3 => [nibble(0), nibble(1), nibble(2), Ok(255)],
            4 => [nibble(0), nibble(1), nibble(2), nibble(3)],
            6 => [byte(0), byte(1), byte(2), Ok(255)],
            8 => [byte(0), byte(1), byte(2), byte(3)],
            _ => return Err(invalid_color()),
        };
        match components {
            [Ok(red), Ok(green), Ok(blue), Ok(alpha)] => Ok(Color::rgba(red, green, blue, alpha)),
            _ => Err(invalid_color()),
        }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            formatter,
            "#{:02x}{:02x}{:02x}",
            self.red, self.green, self.blue
        )?;
        if self.alpha != 255 {
            write!(formatter, "{:02x}", self.alpha)?;
        }
        Ok(())
    }
}

impl TryFrom<String> for Color {
    type Error = ContextError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(value: Color) -> Self {
        value.to_string()
    }
}

impl From<Color> for image::Rgba<u8> {
    fn from(value: Color) -> Self {
        image::Rgba(value.to_array())
    }
}
