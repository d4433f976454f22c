//! Text helpers shared by the page-scraping providers
//!
//! Two concerns live here:
//! - building URL slugs from artist/title (accent folding, removal of
//!   URL-hostile characters, separator collapsing)
//! - turning an HTML fragment into plain lyrics text

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Characters usually removed or replaced in site URLs
pub const URL_ESCAPE: &str = ".¿?%_@,;&\\/()'\"-!¡";

/// `URL_ESCAPE` plus space
pub const URL_ESCAPES: &str = ".¿?%_@,;&\\/()'\"-!¡ ";

static BR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<br\s*/?>\r?\n?").expect("valid regex"));
static COMMENT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<!--.*?-->").expect("valid regex"));
static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<[^>]*>").expect("valid regex"));
static ENTITY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&(#[xX][0-9a-fA-F]+|#[0-9]+|[a-zA-Z]+);").expect("valid regex"));

/// Replace accented characters with their plain counterparts
pub fn fold_accents(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            'á' | 'ä' => out.push('a'),
            'æ' => out.push_str("ae"),
            'é' => out.push('e'),
            'í' => out.push('i'),
            'ó' | 'ö' => out.push('o'),
            'ú' | 'ü' => out.push('u'),
            'ñ' => out.push('n'),
            other => out.push(other),
        }
    }
    out
}

/// Fold accents, then replace every character of `chars` with `replacement`
pub fn normalize(s: &str, chars: &str, replacement: &str) -> String {
    translate(s, &[(chars, replacement)])
}

/// Fold accents, then apply each `(chars, replacement)` mapping in order
///
/// Every character found in `chars` is replaced by `replacement`.
pub fn translate(s: &str, mappings: &[(&str, &str)]) -> String {
    let mut out = fold_accents(s);
    for (chars, replacement) in mappings {
        out = out
            .chars()
            .fold(String::with_capacity(out.len()), |mut acc, c| {
                if chars.contains(c) {
                    acc.push_str(replacement);
                } else {
                    acc.push(c);
                }
                acc
            });
    }
    out
}

/// Collapse runs of `sep` into a single one
pub fn collapse(s: &str, sep: char) -> String {
    let mut out = String::with_capacity(s.len());
    let mut previous_was_sep = false;
    for c in s.chars() {
        if c == sep {
            if !previous_was_sep {
                out.push(c);
            }
            previous_was_sep = true;
        } else {
            out.push(c);
            previous_was_sep = false;
        }
    }
    out
}

/// Keep only lowercase alphanumerics, for loose title comparison
pub fn alnum_key(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Convert an HTML fragment to plain text
///
/// `<br>` (with the line break that usually follows it) becomes a newline, comments and tags are dropped, entities are
/// decoded. Surrounding whitespace is trimmed.
pub fn strip_tags(html: &str) -> String {
    let text = BR_RE.replace_all(html, "\n");
    let text = COMMENT_RE.replace_all(&text, "");
    let text = TAG_RE.replace_all(&text, "");
    decode_entities(&text).replace('\r', "").trim().to_string()
}

/// Decode named and numeric HTML entities
pub fn decode_entities(s: &str) -> String {
    ENTITY_RE
        .replace_all(s, |caps: &Captures| {
            let entity = &caps[1];
            let decoded = if let Some(hex) = entity
                .strip_prefix("#x")
                .or_else(|| entity.strip_prefix("#X"))
            {
                u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
            } else if let Some(dec) = entity.strip_prefix('#') {
                dec.parse::<u32>().ok().and_then(char::from_u32)
            } else {
                match entity {
                    "amp" => Some('&'),
                    "lt" => Some('<'),
                    "gt" => Some('>'),
                    "quot" => Some('"'),
                    "apos" => Some('\''),
                    "nbsp" => Some(' '),
                    _ => None,
                }
            };
            match decoded {
                Some(c) => c.to_string(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fold_accents() {
        assert_eq!(fold_accents("Mötörhead"), "Motorhead");
        assert_eq!(fold_accents("canción æ"), "cancion ae");
    }

    #[test]
    fn test_normalize_removes_url_escapes() {
        assert_eq!(normalize("guns n' roses", URL_ESCAPES, ""), "gunsnroses");
        assert_eq!(normalize("AC/DC", URL_ESCAPE, ""), "ACDC");
        assert_eq!(normalize("iron maiden", " ", "_"), "iron_maiden");
    }

    #[test]
    fn test_translate_applies_mappings_in_order() {
        let slug = translate("Simon & Garfunkel", &[("&", "and"), (URL_ESCAPE, ""), (" ", "-")]);
        assert_eq!(slug, "Simon-and-Garfunkel");

        // '-' is an escape char, so it is removed before spaces become '-'
        let slug = translate("a - b", &[(URL_ESCAPE, ""), (" ", "-")]);
        assert_eq!(collapse(&slug, '-'), "a-b");
    }

    #[test]
    fn test_collapse() {
        assert_eq!(collapse("a---b--c-", '-'), "a-b-c-");
        assert_eq!(collapse("a__b", '_'), "a_b");
    }

    #[test]
    fn test_alnum_key() {
        assert_eq!(alnum_key("Hallowed Be Thy Name!"), "hallowedbethyname");
    }

    #[test]
    fn test_strip_tags() {
        let html = "<div>\r\n<!-- note -->First line<br>Second &amp; <i>third</i><br/>\n&#39;fourth&#x27;</div>";
        assert_eq!(strip_tags(html), "First line\nSecond & third\n'fourth'");
    }

    #[test]
    fn test_unknown_entities_are_kept() {
        assert_eq!(decode_entities("&bogus; &lt;"), "&bogus; <");
    }
}
