//! Decoding for the HTML entities the question bank embeds in its text fields.

/// Replaces HTML character references (`&quot;`, `&#039;`, `&eacute;`, ...) with the characters
/// they stand for.
///
/// Text that is not a known reference is copied through unchanged.
#[must_use]
pub fn decode_entities(input: &str) -> String {
    html_escape::decode_html_entities(input).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_named_and_numeric_references() {
        assert_eq!(
            decode_entities("&quot;Halo&quot; &amp; &#039;Doom&#039;"),
            "\"Halo\" & 'Doom'"
        );
        assert_eq!(decode_entities("Pok&eacute;mon &#x2F; Z&#246;lda"), "Pokémon / Zölda");
        assert_eq!(decode_entities("&ldquo;Snake?&rdquo; &hellip;"), "\u{201c}Snake?\u{201d} \u{2026}");
    }

    #[test]
    fn leaves_bare_ampersands_alone() {
        assert_eq!(decode_entities("Tom & Jerry"), "Tom & Jerry");
        assert_eq!(decode_entities("trailing &"), "trailing &");
    }

    #[test]
    fn plain_text_passes_through() {
        assert_eq!(decode_entities("Super Mario 64"), "Super Mario 64");
    }
}
