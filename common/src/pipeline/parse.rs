//! Cell-level parsers.
//!
//! Two number parsers live here on purpose and they are not interchangeable:
//!
//! - [`parse_number_simple`] swaps `,` for `.` and yields `0.0` for anything it
//!   cannot read. KPI cards and other display-only cells go through it.
//! - [`parse_number_locale`] understands thousands separators (`1.234,56`) and
//!   yields `None` for blank or unreadable cells. Indicator values go through it
//!   so that a blank cell stays distinguishable from a real zero.
//!
//! Feeding the same malformed cell to both gives `0.0` and `None`, which sum the
//! same but count differently in the composition matrix.

use unicode_normalization::UnicodeNormalization as _;
use unicode_normalization::char::is_combining_mark;

/// Trims a cell and turns non-breaking spaces into plain ones.
pub fn clean_text(raw: &str) -> String {
    raw.replace('\u{00A0}', " ").trim().to_string()
}

/// Comparison key: trimmed, lower-cased, diacritics stripped.
///
/// `" Família Acolhedora "` and `"familia acolhedora"` share a key.
pub fn normalize_key(raw: &str) -> String {
    clean_text(raw)
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Lenient parser: decimal comma accepted, failures read as zero.
pub fn parse_number_simple(raw: &str) -> f64 {
    clean_text(raw)
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .unwrap_or(0.0)
}

/// Locale-aware parser for indicator values.
///
/// Accepts `10`, `10,5`, `10.5`, `1.234`, `1.234,56`, `1,234.56` and
/// `-3,2`. Whichever separator comes last is the decimal one when both are
/// present; a lone comma is always decimal, several dots are always thousands,
/// and a lone dot is a thousands separator only in front of a full group of
/// three digits.
/// Blank or unreadable input gives `None`.
pub fn parse_number_locale(raw: &str) -> Option<f64> {
    let compact: String = clean_text(raw)
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    if compact.is_empty() {
        return None;
    }

    let last_comma = compact.rfind(',');
    let last_dot = compact.rfind('.');
    let canonical = match (last_comma, last_dot) {
        (Some(comma), Some(dot)) if dot > comma => compact.replace(',', ""),
        (Some(_), _) => {
            if compact.matches(',').count() > 1 {
                return None;
            }
            compact.replace('.', "").replace(',', ".")
        }
        (None, Some(_)) if compact.matches('.').count() > 1 => compact.replace('.', ""),
        (None, Some(dot)) if is_thousands_group(&compact, dot) => compact.replace('.', ""),
        _ => compact,
    };

    canonical.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// `1.200` reads as twelve hundred: one dot, a non-zero integer part and
/// exactly three digits after it. `0.125` and `10.5` stay decimals.
fn is_thousands_group(compact: &str, dot: usize) -> bool {
    let (int, frac) = (&compact[..dot], &compact[dot + 1..]);
    let int = int.strip_prefix('-').unwrap_or(int);
    frac.len() == 3
        && frac.bytes().all(|b| b.is_ascii_digit())
        && !int.is_empty()
        && int.bytes().all(|b| b.is_ascii_digit())
        && int.bytes().any(|b| b != b'0')
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("10", Some(10.0); "integer")]
    #[test_case(" 10,5 ", Some(10.5); "decimal comma")]
    #[test_case("10.5", Some(10.5); "decimal dot")]
    #[test_case("1.234,56", Some(1234.56); "pt-br thousands and decimal")]
    #[test_case("1,234.56", Some(1234.56); "en-us thousands and decimal")]
    #[test_case("1.234.567", Some(1_234_567.0); "several dots are thousands")]
    #[test_case("1.200", Some(1200.0); "single thousands group")]
    #[test_case("0.125", Some(0.125); "leading zero stays decimal")]
    #[test_case("12.50", Some(12.5); "two decimals stay decimal")]
    #[test_case("-3,2", Some(-3.2); "negative")]
    #[test_case("1 234,5", Some(1234.5); "space as thousands")]
    #[test_case("", None; "blank")]
    #[test_case("   ", None; "whitespace only")]
    #[test_case("abc", None; "text")]
    #[test_case("1,2,3", None; "several commas")]
    #[test_case("NaN", None; "nan is rejected")]
    #[test_case("inf", None; "infinity is rejected")]
    fn locale_parser(raw: &str, expected: Option<f64>) {
        assert_eq!(parse_number_locale(raw), expected);
    }

    #[test_case("10", 10.0; "integer")]
    #[test_case("10,5", 10.5; "decimal comma")]
    #[test_case("", 0.0; "blank is zero")]
    #[test_case("n/a", 0.0; "text is zero")]
    #[test_case("1.234,56", 0.0; "thousands separators are not understood")]
    fn simple_parser(raw: &str, expected: f64) {
        assert_eq!(parse_number_simple(raw), expected);
    }

    #[test]
    fn variants_disagree_on_malformed_input() {
        assert_eq!(parse_number_simple("x"), 0.0);
        assert_eq!(parse_number_locale("x"), None);
    }

    #[test]
    fn keys_ignore_case_accents_and_padding() {
        assert_eq!(normalize_key(" Família Acolhedora "), "familia acolhedora");
        assert_eq!(normalize_key("EM TODOS OS ACOLHIMENTOS"), "em todos os acolhimentos");
        assert_eq!(normalize_key("RJ\u{00A0}"), "rj");
        assert_eq!(normalize_key("São Gonçalo"), normalize_key("sao goncalo"));
    }
}
