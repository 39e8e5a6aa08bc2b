//! Encoding label resolution, line decoding and transliteration.
//!
//! Source bytes are decoded per physical line with `encoding_rs`; values are
//! then narrowed to the repertoire of the target encoding, replacing any
//! character the target cannot represent with its closest representable form.

use crate::error::{CsvError, Result};
use encoding_rs::{Encoding, GB18030, UTF_16BE, UTF_16LE, UTF_8};
use std::borrow::Cow;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Windows/DOS code page names that are not WHATWG labels.
fn code_page_alias(label: &str) -> Option<&'static Encoding> {
    match label {
        "ansi_874" => Some(encoding_rs::WINDOWS_874),
        "ansi_932" => Some(encoding_rs::SHIFT_JIS),
        "ansi_936" => Some(encoding_rs::GBK),
        "ansi_949" => Some(encoding_rs::EUC_KR),
        "ansi_950" => Some(encoding_rs::BIG5),
        "ansi_1250" => Some(encoding_rs::WINDOWS_1250),
        "ansi_1251" => Some(encoding_rs::WINDOWS_1251),
        "ansi_1252" => Some(encoding_rs::WINDOWS_1252),
        "ansi_1253" => Some(encoding_rs::WINDOWS_1253),
        "ansi_1254" => Some(encoding_rs::WINDOWS_1254),
        "ansi_1255" => Some(encoding_rs::WINDOWS_1255),
        "ansi_1256" => Some(encoding_rs::WINDOWS_1256),
        "ansi_1257" => Some(encoding_rs::WINDOWS_1257),
        "ansi_1258" => Some(encoding_rs::WINDOWS_1258),
        "dos850" | "dos860" | "dos861" | "dos863" | "dos865" => Some(encoding_rs::WINDOWS_1252),
        "dos852" => Some(encoding_rs::WINDOWS_1250),
        "dos855" | "dos866" => Some(encoding_rs::IBM866),
        "utf8" | "unicode" => Some(UTF_8),
        _ => None,
    }
}

/// Resolve an encoding label such as `"UTF-8"`, `"ISO-8859-1"` or
/// `"ANSI_1252"` (case-insensitive).
///
/// Note that, as in browsers, `ISO-8859-1` resolves to `windows-1252`.
pub fn resolve_encoding(label: &str) -> Result<&'static Encoding> {
    let label = label.trim();
    Encoding::for_label(label.as_bytes())
        .or_else(|| code_page_alias(&label.to_ascii_lowercase()))
        .ok_or_else(|| CsvError::Encoding(format!("Unknown encoding '{}'", label)))
}

/// Resolve a source encoding label.  Lines are split on the `\n` byte, so
/// the encoding must be ASCII-compatible.
pub fn resolve_source_encoding(label: &str) -> Result<&'static Encoding> {
    let encoding = resolve_encoding(label)?;
    if !encoding.is_ascii_compatible() {
        return Err(CsvError::Encoding(format!(
            "Source encoding '{}' is not ASCII-compatible",
            encoding.name()
        )));
    }
    Ok(encoding)
}

/// Decode one physical line.
///
/// On the first line a leading UTF-8 byte order mark is removed; the second
/// element of the result reports whether that happened.  Malformed sequences
/// are replaced with U+FFFD rather than failing.
pub fn decode_line(bytes: &[u8], encoding: &'static Encoding, first_line: bool) -> (String, bool) {
    if first_line && encoding == UTF_8 && bytes.starts_with(UTF8_BOM) {
        let (decoded, _) = encoding.decode_without_bom_handling(&bytes[UTF8_BOM.len()..]);
        return (decoded.into_owned(), true);
    }
    let (decoded, _) = encoding.decode_without_bom_handling(bytes);
    (decoded.into_owned(), false)
}

/// Encodings that can represent every Unicode scalar value.
fn is_unicode(encoding: &'static Encoding) -> bool {
    encoding == UTF_8 || encoding == UTF_16LE || encoding == UTF_16BE || encoding == GB18030
}

fn is_representable(ch: char, target: &'static Encoding) -> bool {
    if ch.is_ascii() {
        return true;
    }
    let mut buf = [0u8; 4];
    let (_, _, had_errors) = target.encode(ch.encode_utf8(&mut buf));
    !had_errors
}

/// Narrow `value` to the repertoire of `target`.
///
/// A character the target cannot represent is replaced by the representable
/// base characters of its canonical decomposition (`é` becomes `e`), or by
/// `?` when nothing of it survives.
pub fn transliterate<'a>(value: &'a str, target: &'static Encoding) -> Cow<'a, str> {
    if value.is_ascii() || is_unicode(target) {
        return Cow::Borrowed(value);
    }
    let (_, _, had_errors) = target.encode(value);
    if !had_errors {
        return Cow::Borrowed(value);
    }

    let mut out = String::with_capacity(value.len());
    let mut buf = [0u8; 4];
    for ch in value.chars() {
        if is_representable(ch, target) {
            out.push(ch);
            continue;
        }

        let before = out.len();
        for base in ch.encode_utf8(&mut buf).nfd() {
            if !is_combining_mark(base) && is_representable(base, target) {
                out.push(base);
            }
        }
        if out.len() == before {
            out.push('?');
        }
    }
    Cow::Owned(out)
}
