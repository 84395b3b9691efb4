use std::borrow::Cow;

/// Escape text for XML element content and attribute values.
///
/// Absent input yields an empty string. Besides the five XML entities, `/` is written as
/// `&#x2F;` so output matches documents produced by earlier releases byte for byte.
///
/// ```
/// use arcgis_converter::io::escape_xml;
///
/// assert_eq!(escape_xml("a<b"), "a&lt;b");
/// assert_eq!(escape_xml(None), "");
/// ```
pub fn escape_xml<'a>(text: impl Into<Option<&'a str>>) -> Cow<'a, str> {
    let Some(text) = text.into() else {
        return Cow::Borrowed("");
    };
    if !text.contains(['<', '>', '&', '\'', '"', '/']) {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len() + 16);
    for c in text.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '\'' => out.push_str("&apos;"),
            '"' => out.push_str("&quot;"),
            '/' => out.push_str("&#x2F;"),
            c => out.push(c),
        }
    }
    Cow::Owned(out)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn escapes_every_special_character() {
        assert_eq!(
            escape_xml(r#"Tom & Jerry's "Show"/1"#),
            "Tom &amp; Jerry&apos;s &quot;Show&quot;&#x2F;1"
        );
        assert_eq!(escape_xml("<a>"), "&lt;a&gt;");
    }

    #[test]
    fn plain_text_is_borrowed() {
        assert!(matches!(escape_xml("Parks 2024"), Cow::Borrowed("Parks 2024")));
        assert_eq!(escape_xml(Some("")), "");
        assert_eq!(escape_xml(None), "");
    }
}
