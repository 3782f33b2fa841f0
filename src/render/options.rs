//! Rendering options and configuration.

use std::borrow::Cow;

/// Options for rendering notes into ENEX.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// How paragraph text and titles are inserted into markup
    pub escaping: TextEscaping,
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the text escaping policy.
    pub fn with_escaping(mut self, escaping: TextEscaping) -> Self {
        self.escaping = escaping;
        self
    }

    /// Escape markup-significant characters in text.
    pub fn escaped(mut self) -> Self {
        self.escaping = TextEscaping::Escape;
        self
    }
}

/// Policy for inserting document text into ENEX markup.
///
/// `Verbatim` writes text exactly as extracted, which matches existing
/// exports byte for byte but yields malformed XML when the text contains
/// `&`, `<` or `>`. `Escape` replaces those characters with entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextEscaping {
    /// Insert text unchanged
    #[default]
    Verbatim,
    /// Replace `&`, `<` and `>` with XML entities
    Escape,
}

impl TextEscaping {
    /// Apply this policy to a piece of text.
    pub fn apply<'a>(&self, text: &'a str) -> Cow<'a, str> {
        match self {
            TextEscaping::Verbatim => Cow::Borrowed(text),
            TextEscaping::Escape => escape_xml(text),
        }
    }
}

fn escape_xml(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>']) {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len() + 16);
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_verbatim() {
        let options = RenderOptions::default();
        assert_eq!(options.escaping, TextEscaping::Verbatim);
        assert_eq!(options.escaping.apply("a < b & c"), "a < b & c");
    }

    #[test]
    fn test_escape() {
        let options = RenderOptions::new().escaped();
        assert_eq!(
            options.escaping.apply("a < b & c > d"),
            "a &lt; b &amp; c &gt; d"
        );
        assert!(matches!(options.escaping.apply("plain"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_escape_breaks_cdata_terminator() {
        assert_eq!(TextEscaping::Escape.apply("x]]>y"), "x]]&gt;y");
    }
}
