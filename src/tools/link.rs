use url::Url;

/// What scanned text turned out to be
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScannedText {
    /// An absolute URL with a scheme
    Link(Url),
    Plain(String),
}

impl ScannedText {
    /// Classify decoded text; never fails.
    pub fn classify(text: &str) -> Self {
        match Url::parse(text) {
            Ok(url) => ScannedText::Link(url),
            Err(_) => ScannedText::Plain(text.to_owned()),
        }
    }

    pub fn is_link(&self) -> bool {
        matches!(self, ScannedText::Link(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert!(ScannedText::classify("https://example.com/a?b=c").is_link());
        assert!(ScannedText::classify("mailto:someone@example.com").is_link());
        assert!(!ScannedText::classify("example.com").is_link());
        assert!(!ScannedText::classify("just some words").is_link());
        assert!(!ScannedText::classify("").is_link());
    }
}
