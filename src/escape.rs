//! JSON string escaping for emitted record fields.
//!
//! The escaper works on single bytes: the two JSON metacharacters and the
//! C0 control range are rewritten, every other byte (including each byte of
//! a multi-byte UTF-8 sequence) is copied through untouched.

use crate::config::SectionTitlePolicy;

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// Appends the JSON string body for `raw` to `out`, without surrounding quotes.
///
/// # Examples
///
/// ```
/// use inline_diff_json::escape::write_escaped_json;
///
/// let mut out = String::new();
/// write_escaped_json(&mut out, "say \"hi\"\n");
/// assert_eq!(out, r#"say \"hi\"\n"#);
/// ```
pub fn write_escaped_json(out: &mut String, raw: &str) {
    let mut plain_start = 0;

    for (i, byte) in raw.bytes().enumerate() {
        let replacement: &str = match byte {
            b'"' => "\\\"",
            b'\\' => "\\\\",
            0x08 => "\\b",
            0x0c => "\\f",
            b'\n' => "\\n",
            b'\r' => "\\r",
            b'\t' => "\\t",
            0x00..=0x1f => "",
            _ => continue,
        };

        // Escaped bytes are all ASCII, so `i` is always a char boundary.
        out.push_str(&raw[plain_start..i]);
        if replacement.is_empty() {
            out.push_str("\\u00");
            out.push(HEX_DIGITS[(byte >> 4) as usize] as char);
            out.push(HEX_DIGITS[(byte & 0x0f) as usize] as char);
        } else {
            out.push_str(replacement);
        }
        plain_start = i + 1;
    }

    out.push_str(&raw[plain_start..]);
}

/// Returns the escaped form of `raw` as a new string.
pub fn escape_json(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    write_escaped_json(&mut out, raw);
    out
}

/// Appends the `sectionTitle` field value: `null` for an empty title,
/// otherwise a quoted string.
pub fn write_section_title(out: &mut String, title: &str, policy: SectionTitlePolicy) {
    if title.is_empty() {
        out.push_str("null");
        return;
    }

    out.push('"');
    match policy {
        SectionTitlePolicy::Escaped => write_escaped_json(out, title),
        SectionTitlePolicy::Raw => out.push_str(title),
    }
    out.push('"');
}
