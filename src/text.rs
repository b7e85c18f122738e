use unicode_normalization::UnicodeNormalization as _;

/// The lines of text turned into bubbles, there is always at least one (possibly empty) line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextContent {
    lines: Vec<String>,
}

impl TextContent {
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Whether no line holds a single character.
    pub fn is_blank(&self) -> bool {
        self.lines.iter().all(|line| line.is_empty())
    }

    fn from_lines<I, S>(lines: I) -> TextContent
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut lines: Vec<String> = lines
            .into_iter()
            .map(|line| line.as_ref().nfc().collect())
            .collect();
        if lines.is_empty() {
            lines.push(String::new());
        }
        TextContent { lines }
    }
}

impl std::fmt::Display for TextContent {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(&self.lines.join("\n"))
    }
}

impl From<&str> for TextContent {
    fn from(value: &str) -> Self {
        TextContent::from_lines(value.split('\n'))
    }
}

impl From<String> for TextContent {
    fn from(value: String) -> Self {
        TextContent::from(value.as_str())
    }
}

impl From<Vec<String>> for TextContent {
    fn from(value: Vec<String>) -> Self {
        TextContent::from_lines(value)
    }
}

impl From<&[&str]> for TextContent {
    fn from(value: &[&str]) -> Self {
        TextContent::from_lines(value)
    }
}

impl<const N: usize> From<[&str; N]> for TextContent {
    fn from(value: [&str; N]) -> Self {
        TextContent::from_lines(value)
    }
}
