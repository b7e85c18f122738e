use serde::{Deserialize, Serialize};

use crate::error::ContextError;

/// The direction in which the text of the current locale is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextDirection {
    #[default]
    Ltr,
    Rtl,
}

impl std::fmt::Display for TextDirection {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TextDirection::Ltr => write!(formatter, "ltr"),
            TextDirection::Rtl => write!(formatter, "rtl"),
        }
    }
}

impl std::str::FromStr for TextDirection {
    type Err = ContextError;

    fn from_str(string: &str) -> Result<Self, Self::Err> {
        match string {
            "ltr" => Ok(TextDirection::Ltr),
            "rtl" => Ok(TextDirection::Rtl),
            _ => Err(ContextError::invalid_configuration(format!(
                "The text direction {:?} is neither ltr nor rtl",
                string
            ))),
        }
    }
}

/// Anything able to tell the direction of the text, it is consulted once per build.
pub trait TextDirectionSource {
    fn text_direction(&self) -> TextDirection;
}

/// A fixed direction is its own source.
impl TextDirectionSource for TextDirection {
    fn text_direction(&self) -> TextDirection {
        *self
    }
}

impl<S: TextDirectionSource + ?Sized> TextDirectionSource for Box<S> {
    fn text_direction(&self) -> TextDirection {
        (**self).text_direction()
    }
}

/// Language codes whose script is written from right to left.
const RIGHT_TO_LEFT_LANGUAGES: [&str; 14] = [
    "ar", "arc", "ckb", "dv", "fa", "ha", "he", "khw", "ks", "ku", "ps", "sd", "ur", "yi",
];

/// Detects the direction from the locale environment variables of the process.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocaleDirection;

impl LocaleDirection {
    const LOCALE_VARIABLES: [&'static str; 3] = ["LC_ALL", "LC_MESSAGES", "LANG"];

    /// The direction of a POSIX or BCP 47 locale such as `he_IL.UTF-8` or `ar-EG`.
    pub fn of_locale(locale: &str) -> TextDirection {
        let language = locale
            .split(['_', '-', '.', '@'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        if RIGHT_TO_LEFT_LANGUAGES.contains(&language.as_str()) {
            TextDirection::Rtl
        } else {
            TextDirection::Ltr
        }
    }
}

impl TextDirectionSource for LocaleDirection {
    fn text_direction(&self) -> TextDirection {
        let locale = Self::LOCALE_VARIABLES
            .iter()
            .filter_map(|variable| std::env::var(variable).ok())
            .find(|value| !value.is_empty());
        match locale {
            Some(locale) => {
                let direction = LocaleDirection::of_locale(&locale);
                log::trace!("The locale {:?} is read as {}", locale, direction);
                direction
            }
            None => TextDirection::Ltr,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn right_to_left_locales_are_detected() {
        assert_eq!(LocaleDirection::of_locale("he_IL.UTF-8"), TextDirection::Rtl);
        assert_eq!(LocaleDirection::of_locale("ar-EG"), TextDirection::Rtl);
        assert_eq!(LocaleDirection::of_locale("FA"), TextDirection::Rtl);
        assert_eq!(LocaleDirection::of_locale("ckb_IQ"), TextDirection::Rtl);
    }

    #[test]
    fn other_locales_are_left_to_right() {
        assert_eq!(LocaleDirection::of_locale("en_US.UTF-8"), TextDirection::Ltr);
        assert_eq!(LocaleDirection::of_locale("C"), TextDirection::Ltr);
        assert_eq!(LocaleDirection::of_locale("hr_HR"), TextDirection::Ltr);
        assert_eq!(LocaleDirection::of_locale(""), TextDirection::Ltr);
    }

    #[test]
    fn fixed_directions_report_themselves() {
        assert_eq!(TextDirection::Rtl.text_direction(), TextDirection::Rtl);
        assert_eq!(TextDirection::Ltr.to_string(), "ltr");
        assert_eq!("rtl".parse::<TextDirection>().unwrap(), TextDirection::Rtl);
        assert!("auto".parse::<TextDirection>().is_err());
    }
}
