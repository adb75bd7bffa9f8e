//! Built-in pattern catalogue.
//!
//! Patterns are matched against the whole value. Digit classes are ASCII
//! except in the Unicode predicates (`isdigit`, `isdecimal` and friends).

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

use super::coordinates;
use crate::schema::{NamedTest, TestKind};

const ALPHA: &str = r"[a-zA-Z]+";
const DIGIT: &str = r"[1-9][0-9]*|0";
const ALPHANUMERIC: &str = r"[a-zA-Z0-9]+";
const ABBREVIATION: &str = r"[a-zA-Z]+\.";

/// Thousands-grouped or plain digits, shared by several patterns.
const GROUPED: &str = r"[0-9]{1,3}(?:,[0-9]{3})+|[0-9]+";

const YYYYMMDD: &str = r"(?:19|20)[0-9]{2}[-/](?:0?[1-9]|1[012])[-/](?:0?[1-9]|[12][0-9]|3[01])";
const MMDDYYYY: &str = r"(?:0?[1-9]|1[012])[-/](?:0?[1-9]|[12][0-9]|3[01])[-/](?:19|20)?[0-9]{2}";
const IP: &str =
    r"(?:(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)\.){3}(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)";
const HANDLE: &str = r"@[a-zA-Z0-9_]{1,15}";
const HASHTAG: &str = r"#[a-zA-Z0-9_]+";

static NAMED_PATTERNS: Lazy<Vec<(NamedTest, String)>> = Lazy::new(|| {
    let mut patterns = vec![
        (NamedTest::Integer, r"[-+]?[1-9][0-9]*|0".to_string()),
        (NamedTest::Number, GROUPED.to_string()),
        (
            NamedTest::Decimal,
            format!(r"[-+(]?(?:\.[0-9]+|(?:{GROUPED})(?:\.[0-9]*)?)\)?"),
        ),
        (NamedTest::Numeric, r"[0-9]+".to_string()),
        (NamedTest::AlphaLower, r"[a-z]+".to_string()),
        (NamedTest::AlphaUpper, r"[A-Z]+".to_string()),
        (
            NamedTest::AlphaPlus,
            r"#?[a-zA-Z]+(?:[-_./(]?[a-zA-Z]\)?)*".to_string(),
        ),
        (NamedTest::AlphanumericLower, r"[a-z0-9]+".to_string()),
        (NamedTest::AlphanumericUpper, r"[A-Z0-9]+".to_string()),
        (NamedTest::Yyyymmdd, YYYYMMDD.to_string()),
        (NamedTest::Mmddyyyy, MMDDYYYY.to_string()),
        (NamedTest::Year, r"(?:19|20)[0-9]{2}".to_string()),
        (NamedTest::Ssn, r"[0-9]{3}-[0-9]{2}-[0-9]{4}|[0-9]{9}".to_string()),
        (
            NamedTest::Phone,
            r"(?:(?:1[-. ]?)?(?:(?:\([0-9]{3}\)|[0-9]{3})[-. ]?))?[0-9]{3}[-.]?[0-9]{4}(?:(?:[, ] ?|[, ]? ?x|[, ]? ?ext\.? ?)[0-9]{1,5})?"
                .to_string(),
        ),
        (NamedTest::IpAddress, IP.to_string()),
        (NamedTest::ZipCode, r"[0-9]{5}(?:-[0-9]{4})?".to_string()),
        (
            NamedTest::Email,
            r#"[-a-zA-Z0-9._%+!#$&'*/=?^`{|}~]{1,64}@[-a-zA-Z0-9.]+\.[a-zA-Z]{2,}"#.to_string(),
        ),
        (
            NamedTest::Website,
            r"(?:(?:https?|ftp)://)?(?:[-a-zA-Z0-9_]+\.)+[a-zA-Z]{2,}(?::[0-9]{1,5})?[-a-zA-Z0-9_/+=#%&.~?]*"
                .to_string(),
        ),
        (NamedTest::Percent, r"(?:[1-9][0-9]*|0)%".to_string()),
        (
            NamedTest::Time,
            r"(?:1[0-2]|0?[1-9])(?::[0-5][0-9]){0,2} ?(?:AM|a\.m\.|PM|p\.m\.)?".to_string(),
        ),
        (
            NamedTest::Time24,
            r"(?:[01]?[0-9]|2[0-3])(?::[0-5][0-9]){1,2}".to_string(),
        ),
        (
            NamedTest::Dollar,
            format!(r"[-+(]?\$(?:\.[0-9]{{2}}|(?:{GROUPED})(?:\.[0-9]{{2}})?)\)?"),
        ),
        (NamedTest::Ascii, r"[\x20-\x7e]+".to_string()),
        (NamedTest::Mdyorymd, format!("{YYYYMMDD}|{MMDDYYYY}")),
        (
            NamedTest::Mmyyyy,
            r"(?:0?[1-9]|1[012])[-/](?:19|20)?[0-9]{2}".to_string(),
        ),
        (
            NamedTest::Notation,
            r"[-+]?[0-9](?:\.[0-9]+)?[Ee][-+]?[0-9]+".to_string(),
        ),
        (NamedTest::IpPort, format!("{IP}(?::[0-9]{{1,5}})?")),
        (
            NamedTest::IpCidr,
            format!("{IP}(?:/(?:3[012]|[21][0-9]|[0-9]))?"),
        ),
        (NamedTest::Name, r#"[-a-zA-Z0-9'" .,]+"#.to_string()),
        (
            NamedTest::AlphanumericPlus,
            r"#?[a-zA-Z0-9]+(?:[-_./(]?[a-zA-Z0-9]+\)?)*".to_string(),
        ),
        (
            NamedTest::AlphanumericUpperPlus,
            r"#?[A-Z0-9]+(?:[-_./(]?[A-Z0-9]+\)?)*".to_string(),
        ),
        (NamedTest::Username, r"[a-zA-Z][-a-zA-Z0-9_]{1,15}".to_string()),
        (NamedTest::Address, r"[-a-zA-Z0-9 .,()/]+".to_string()),
        (NamedTest::TwitterHandle, HANDLE.to_string()),
        (
            NamedTest::TwitterHandles,
            format!("{HANDLE}(?:(?: |, ?){HANDLE})*"),
        ),
        (NamedTest::Hashtag, HASHTAG.to_string()),
        (
            NamedTest::Hashtags,
            format!("{HASHTAG}(?:(?: |, ?){HASHTAG})*"),
        ),
        (
            NamedTest::PercentPlus,
            r"(?:(?:[1-9][0-9]*|0)(?:\.[0-9]+)?|\.[0-9]+)%".to_string(),
        ),
        (NamedTest::CcNumber, r"[0-9]{12,19}".to_string()),
        (NamedTest::CcNumberPlus, r"[0-9][- 0-9]{11,22}".to_string()),
        (
            NamedTest::CreditCard,
            [
                r"9792[0-9]{12}",
                r"3[05689][0-9]{12,17}",
                r"2[01][0-9]{13}",
                r"1[0-9]{14}",
                r"4[0-9]{12,18}",
                r"3[47][0-9]{13}",
                r"(?:5[06789]|6[0-9])[0-9]{10,17}",
                r"(?:5[12345]|2[2-7])[0-9]{14}",
            ]
            .join("|"),
        ),
        (
            NamedTest::CreditCardPlus,
            [
                r"9792(?:[- ]?[0-9]{4}){3}",
                r"3[05689][- 0-9]{12,21}",
                r"2[01][- 0-9]{13,16}",
                r"1[0-9]{3}[- ]?[0-9]{5}[- ][0-9]{6}",
                r"4[- 0-9]{12,22}",
                r"3[47][0-9]{2}[- ]?[0-9]{6}[- ]?[0-9]{5}",
                r"(?:5[06789]|6[0-9])[- 0-9]{10,21}",
                r"(?:5[12345]|2[2-7])[0-9]{2}(?:[- ]?[0-9]{4}){3}",
            ]
            .join("|"),
        ),
        (
            NamedTest::Sentence,
            r"[\x20-\x2a\x2c-\x3b\x3f-\x5a\x61-\x7a]+".to_string(),
        ),
        (NamedTest::Latin1, r"[\x20-\x7e\x{a0}-\x{ff}]+".to_string()),
        (
            NamedTest::Windows,
            concat!(
                r"[\x20-\x7e\x{a0}-\x{ff}\x{152}\x{153}\x{160}\x{161}\x{178}\x{17d}\x{17e}",
                r"\x{192}\x{2c6}\x{2dc}\x{2013}\x{2014}\x{2018}-\x{201a}\x{201c}-\x{201e}",
                r"\x{2020}-\x{2022}\x{2026}\x{2030}\x{2039}\x{203a}\x{20ac}\x{2122}]+",
            )
            .to_string(),
        ),
        (NamedTest::IsDecimal, r"\p{Nd}+".to_string()),
        (
            NamedTest::IsDigit,
            r"[\p{Nd}\x{b2}\x{b3}\x{b9}\x{2070}\x{2074}-\x{2079}\x{2080}-\x{2089}\x{2460}-\x{2468}]+"
                .to_string(),
        ),
        (NamedTest::IsPrintable, r"(?:[^\p{C}\p{Z}]| )+".to_string()),
    ];
    patterns.extend(coordinates::patterns());
    patterns
});

static COMPILED: Lazy<HashMap<NamedTest, Regex>> = Lazy::new(|| {
    NAMED_PATTERNS
        .iter()
        .map(|(test, pattern)| (*test, anchored(pattern)))
        .collect()
});

static ALPHA_RE: Lazy<Regex> = Lazy::new(|| anchored(ALPHA));
static DIGIT_RE: Lazy<Regex> = Lazy::new(|| anchored(DIGIT));
static ALPHANUMERIC_RE: Lazy<Regex> = Lazy::new(|| anchored(ALPHANUMERIC));
static ABBREVIATION_RE: Lazy<Regex> = Lazy::new(|| anchored(ABBREVIATION));

/// Integer literal with optional sign, radix prefix and digit separators.
static INT_RE: Lazy<Regex> = Lazy::new(|| {
    anchored(
        r"\s*[-+]?(?:0[xX](?:_?[0-9a-fA-F])+|0[oO](?:_?[0-7])+|0[bB](?:_?[01])+|0(?:_?0)*|[1-9](?:_?[0-9])*)\s*",
    )
});

fn anchored(pattern: &str) -> Regex {
    Regex::new(&format!("^(?:{pattern})$")).expect("built-in pattern compiles")
}

/// Compiles a user pattern with the same full-match semantics.
pub fn compile_full_match(pattern: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!("^(?:{pattern})$"))
}

impl NamedTest {
    /// Returns true if `value` passes this test.
    pub fn matches(&self, value: &str) -> bool {
        match self {
            NamedTest::Nothing => value.is_empty(),
            NamedTest::Something => !value.is_empty(),
            NamedTest::Int => INT_RE.is_match(value),
            NamedTest::Float => value.trim().parse::<f64>().is_ok(),
            NamedTest::CreditCard | NamedTest::CreditCardPlus => {
                compiled_match(self, value) && luhn(value)
            }
            NamedTest::IsNumeric => !value.is_empty() && value.chars().all(char::is_numeric),
            NamedTest::IsAlpha => !value.is_empty() && value.chars().all(char::is_alphabetic),
            NamedTest::IsAlnum => !value.is_empty() && value.chars().all(char::is_alphanumeric),
            NamedTest::IsLower => cased(value.chars(), char::is_lowercase, char::is_uppercase),
            NamedTest::IsUpper => cased(value.chars(), char::is_uppercase, char::is_lowercase),
            NamedTest::IsTitle => title_case(value.chars(), char::is_uppercase, char::is_lowercase),
            NamedTest::IsAscii => value.is_ascii(),
            NamedTest::BytesIsDigit => bytes_all(value, u8::is_ascii_digit),
            NamedTest::BytesIsAlpha => bytes_all(value, u8::is_ascii_alphabetic),
            NamedTest::BytesIsAlnum => bytes_all(value, u8::is_ascii_alphanumeric),
            NamedTest::BytesIsLower => cased(
                value.bytes(),
                |b| b.is_ascii_lowercase(),
                |b| b.is_ascii_uppercase(),
            ),
            NamedTest::BytesIsUpper => cased(
                value.bytes(),
                |b| b.is_ascii_uppercase(),
                |b| b.is_ascii_lowercase(),
            ),
            NamedTest::BytesIsTitle => title_case(
                value.bytes(),
                |b| b.is_ascii_uppercase(),
                |b| b.is_ascii_lowercase(),
            ),
            // Every byte of the UTF-8 encoding is below 0x80.
            NamedTest::BytesIsAscii => value.is_ascii(),
            other => compiled_match(other, value),
        }
    }
}

fn compiled_match(test: &NamedTest, value: &str) -> bool {
    COMPILED
        .get(test)
        .map(|re| re.is_match(value))
        .unwrap_or(false)
}

fn bytes_all(value: &str, pred: fn(&u8) -> bool) -> bool {
    !value.is_empty() && value.bytes().all(|b| pred(&b))
}

/// At least one character of the wanted case and none of the other.
fn cased<T: Copy>(
    items: impl Iterator<Item = T>,
    wanted: impl Fn(T) -> bool,
    other: impl Fn(T) -> bool,
) -> bool {
    let mut seen = false;
    for item in items {
        if other(item) {
            return false;
        }
        seen |= wanted(item);
    }
    seen
}

/// Uppercase only after an uncased character, lowercase only after a cased
/// one, and at least one cased character.
fn title_case<T: Copy>(
    items: impl Iterator<Item = T>,
    upper: impl Fn(T) -> bool,
    lower: impl Fn(T) -> bool,
) -> bool {
    let mut previous_cased = false;
    let mut seen = false;
    for item in items {
        if upper(item) {
            if previous_cased {
                return false;
            }
            previous_cased = true;
            seen = true;
        } else if lower(item) {
            if !previous_cased {
                return false;
            }
            previous_cased = true;
            seen = true;
        } else {
            previous_cased = false;
        }
    }
    seen
}

/// Luhn checksum over the digits of `value`; separators are ignored.
fn luhn(value: &str) -> bool {
    let mut sum = 0;
    for (i, d) in value
        .bytes()
        .rev()
        .filter(u8::is_ascii_digit)
        .map(|b| u32::from(b - b'0'))
        .enumerate()
    {
        sum += if i % 2 == 1 {
            let doubled = d * 2;
            if doubled > 9 { doubled - 9 } else { doubled }
        } else {
            d
        };
    }
    sum % 10 == 0
}

                
/// Evaluates the pattern-family kinds. Returns `None` for kinds that need
/// compiled resources.
pub fn builtin_matches(kind: &TestKind, value: &str) -> Option<bool> {
    match kind {
        TestKind::Anything => Some(true),
        TestKind::Alpha => Some(ALPHA_RE.is_match(value)),
        TestKind::Digit => Some(DIGIT_RE.is_match(value)),
        TestKind::Alphanumeric => Some(ALPHANUMERIC_RE.is_match(value)),
        TestKind::Abbreviation => Some(ABBREVIATION_RE.is_match(value)),
        TestKind::Named { test } => Some(test.matches(value)),
        _ => None,
    }
}

/// Every built-in kind, in the order the template generator ranks them.
pub fn catalogue() -> Vec<TestKind> {
    let mut kinds = vec![
        TestKind::Digit,
        TestKind::Alpha,
        TestKind::Alphanumeric,
        TestKind::Abbreviation,
    ];
    kinds.extend(
        NamedTest::ALL
            .iter()
            .filter(|t| !matches!(t, NamedTest::Nothing | NamedTest::Something))
            .map(|t| TestKind::Named { test: *t }),
    );
    kinds
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(test: NamedTest) -> TestKind {
        TestKind::Named { test }
    }

    #[test]
    fn test_every_named_pattern_compiles() {
        for test in NamedTest::ALL {
            // Forces the lazy table; panics on a bad pattern.
            let _ = test.matches("x");
        }
        assert_eq!(COMPILED.len(), NAMED_PATTERNS.len());
    }

    #[test]
    fn test_family_kinds() {
        assert_eq!(builtin_matches(&TestKind::Alpha, "Hello"), Some(true));
        assert_eq!(builtin_matches(&TestKind::Alpha, "Hello1"), Some(false));
        assert_eq!(builtin_matches(&TestKind::Digit, "123"), Some(true));
        assert_eq!(builtin_matches(&TestKind::Digit, "0"), Some(true));
        assert_eq!(builtin_matches(&TestKind::Digit, "0123"), Some(false));
        assert_eq!(builtin_matches(&TestKind::Digit, "-1"), Some(false));
        assert_eq!(builtin_matches(&TestKind::Abbreviation, "Mr."), Some(true));
        assert_eq!(builtin_matches(&TestKind::Abbreviation, "Mr"), Some(false));
        assert_eq!(builtin_matches(&TestKind::Alphanumeric, "ab12"), Some(true));
        assert_eq!(builtin_matches(&TestKind::Anything, ""), Some(true));
    }

    #[test]
    fn test_full_match_only() {
        assert!(!NamedTest::Numeric.matches("12a"));
        assert!(!NamedTest::Year.matches("19999"));
        assert!(!NamedTest::Ssn.matches("123-45-67890"));
    }

    #[test]
    fn test_ascii_digits_only() {
        assert_eq!(builtin_matches(&TestKind::Digit, "١٢٣"), Some(false));
        assert!(!NamedTest::Numeric.matches("٣"));
    }

    #[test]
    fn test_int_and_float() {
        for ok in ["0", "-12", "+7", "0x1F", "0b101", "1_000", " 42 "] {
            assert!(NamedTest::Int.matches(ok), "{ok}");
        }
        for bad in ["007", "1.5", "", "abc", "1__0"] {
            assert!(!NamedTest::Int.matches(bad), "{bad}");
        }
        assert!(NamedTest::Float.matches("1.5e3"));
        assert!(NamedTest::Float.matches("-2"));
        assert!(!NamedTest::Float.matches("1.2.3"));
    }

    #[test]
    fn test_selected_named_patterns() {
        assert!(NamedTest::Number.matches("1,234,567"));
        assert!(!NamedTest::Number.matches("1,23"));
        assert!(NamedTest::Decimal.matches("(1,234.50)"));
        assert!(NamedTest::Decimal.matches(".5"));
        assert!(NamedTest::Dollar.matches("$1,234.56"));
        assert!(!NamedTest::Dollar.matches("$1.5"));
        assert!(NamedTest::Yyyymmdd.matches("2020-02-29"));
        assert!(NamedTest::Mmddyyyy.matches("12/31/99"));
        assert!(NamedTest::Phone.matches("(555) 123-4567"));
        assert!(NamedTest::IpAddress.matches("192.168.0.1"));
        assert!(!NamedTest::IpAddress.matches("256.1.1.1"));
        assert!(NamedTest::ZipCode.matches("12345-6789"));
        assert!(NamedTest::Email.matches("someone@example.com"));
        assert!(!NamedTest::Email.matches("someone@example"));
        assert!(NamedTest::Website.matches("https://example.com/a?b=c"));
        assert!(NamedTest::Percent.matches("45%"));
        assert!(NamedTest::Time.matches("10:30 PM"));
        assert!(NamedTest::Time24.matches("23:59:59"));
        assert!(!NamedTest::Time24.matches("24:00"));
        assert!(NamedTest::AlphaPlus.matches("#St.Louis"));
        assert!(NamedTest::Ascii.matches("plain text ~"));
        assert!(!NamedTest::Ascii.matches("caf\u{e9}"));
        assert!(NamedTest::Nothing.matches(""));
        assert!(!NamedTest::Something.matches(""));
    }

    #[test]
    fn test_extended_text_patterns() {
        assert!(NamedTest::Mdyorymd.matches("2021/3/4"));
        assert!(NamedTest::Mdyorymd.matches("3/4/2021"));
        assert!(NamedTest::Mmyyyy.matches("03/2021"));
        assert!(!NamedTest::Mmyyyy.matches("13/2021"));
        assert!(NamedTest::Notation.matches("6.02E23"));
        assert!(!NamedTest::Notation.matches("60.2E22"));
        assert!(NamedTest::IpPort.matches("10.0.0.1:8080"));
        assert!(NamedTest::IpCidr.matches("10.0.0.0/24"));
        assert!(!NamedTest::IpCidr.matches("10.0.0.0/33"));
        assert!(NamedTest::Name.matches("O'Brien, Jr."));
        assert!(NamedTest::AlphanumericPlus.matches("A1-b2/c3"));
        assert!(!NamedTest::AlphanumericUpperPlus.matches("A1-b2"));
        assert!(NamedTest::Username.matches("jdoe_42"));
        assert!(!NamedTest::Username.matches("4jdoe"));
        assert!(NamedTest::Address.matches("12 Main St. (Rear), Apt 3/B"));
        assert!(NamedTest::TwitterHandle.matches("@rustlang"));
        assert!(NamedTest::TwitterHandles.matches("@a, @b @c"));
        assert!(!NamedTest::TwitterHandle.matches("@abcdefghijklmnop"));
        assert!(NamedTest::Hashtags.matches("#one,#two"));
        assert!(NamedTest::PercentPlus.matches("12.5%"));
        assert!(NamedTest::PercentPlus.matches(".5%"));
        assert!(!NamedTest::Percent.matches("12.5%"));
        assert!(NamedTest::Sentence.matches("Hello, world; 42 (ok)"));
        assert!(!NamedTest::Sentence.matches("a+b"));
    }

    #[test]
    fn test_card_numbers() {
        assert!(NamedTest::CcNumber.matches("4111111111111112"));
        assert!(NamedTest::CcNumberPlus.matches("4111 1111 1111 1112"));
        assert!(NamedTest::CreditCard.matches("4111111111111111"));
        assert!(NamedTest::CreditCard.matches("378282246310005"));
        // Right shape, bad checksum.
        assert!(!NamedTest::CreditCard.matches("4111111111111112"));
        assert!(NamedTest::CreditCardPlus.matches("5555-5555-5555-4444"));
        assert!(NamedTest::CreditCardPlus.matches("3782 822463 10005"));
        assert!(!NamedTest::CreditCardPlus.matches("5555-5555-5555-4445"));
        assert!(!NamedTest::CreditCard.matches("8111111111111111"));
    }

    #[test]
    fn test_character_sets() {
        assert!(NamedTest::Latin1.matches("caf\u{e9}"));
        assert!(!NamedTest::Latin1.matches("\u{20ac}5"));
        assert!(NamedTest::Windows.matches("\u{20ac}5 \u{2013} caf\u{e9}"));
        assert!(!NamedTest::Windows.matches("\u{3b1}"));
        assert!(NamedTest::IsPrintable.matches("caf\u{e9} au lait"));
        assert!(!NamedTest::IsPrintable.matches("tab\there"));
        assert!(!NamedTest::IsPrintable.matches("a\u{a0}b"));
    }

    #[test]
    fn test_unicode_predicates() {
        assert!(NamedTest::IsDecimal.matches("\u{661}\u{662}"));
        assert!(!NamedTest::IsDecimal.matches("\u{b2}"));
        assert!(NamedTest::IsDigit.matches("2\u{b2}"));
        assert!(!NamedTest::IsDigit.matches("\u{bd}"));
        assert!(NamedTest::IsNumeric.matches("\u{bd}3"));
        assert!(!NamedTest::IsNumeric.matches("1.5"));
        assert!(NamedTest::IsAlpha.matches("\u{e9}t\u{e9}"));
        assert!(!NamedTest::IsAlpha.matches("a b"));
        assert!(NamedTest::IsAlnum.matches("abc123"));
        assert!(NamedTest::IsLower.matches("abc 12"));
        assert!(!NamedTest::IsLower.matches("12"));
        assert!(!NamedTest::IsLower.matches("aBc"));
        assert!(NamedTest::IsUpper.matches("ABC-1"));
        assert!(NamedTest::IsTitle.matches("Hello World"));
        assert!(NamedTest::IsTitle.matches("O'Neil Jr."));
        assert!(!NamedTest::IsTitle.matches("Hello world"));
        assert!(!NamedTest::IsTitle.matches("HEllo"));
        assert!(NamedTest::IsAscii.matches("abc"));
        assert!(!NamedTest::IsAscii.matches("\u{e9}"));
    }

    #[test]
    fn test_byte_predicates_are_ascii_only() {
        assert!(NamedTest::BytesIsDigit.matches("123"));
        assert!(!NamedTest::BytesIsDigit.matches("\u{661}"));
        assert!(!NamedTest::BytesIsAlpha.matches("\u{e9}t\u{e9}"));
        assert!(NamedTest::BytesIsAlnum.matches("abc123"));
        assert!(NamedTest::BytesIsLower.matches("abc \u{c9}"));
        assert!(NamedTest::BytesIsUpper.matches("ABC"));
        assert!(NamedTest::BytesIsTitle.matches("Hello World"));
        assert!(!NamedTest::BytesIsTitle.matches("hello"));
        assert!(NamedTest::BytesIsAscii.matches("~"));
        assert!(!NamedTest::BytesIsAscii.matches("\u{e9}"));
    }

    #[test]
    fn test_luhn() {
        assert!(luhn("79927398713"));
        assert!(!luhn("79927398710"));
        assert!(luhn("4111-1111-1111-1111"));
    }

    #[test]
    fn test_catalogue_excludes_blank_tests() {
        let kinds = catalogue();
        assert!(!kinds.contains(&named(NamedTest::Nothing)));
        assert!(kinds.contains(&named(NamedTest::Ascii)));
        assert_eq!(kinds[0], TestKind::Digit);
    }
}
