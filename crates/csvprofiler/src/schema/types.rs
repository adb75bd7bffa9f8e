//! Core type definitions for the column specification.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ProfilerError, Result};

use super::range::RangeSpec;

/// Category a field-level failure is counted and limited under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Value shorter than `min_length` or longer than `max_length`.
    Length,
    /// Empty value in a column where blank is an error.
    Blank,
    /// Value rejected by the column's main test.
    Format,
    /// Cross-reference rule violated or key not found.
    CrossReference,
    /// Custom function rejected the value.
    Custom,
}

impl ErrorCategory {
    /// All categories in reporting order.
    pub const ALL: [ErrorCategory; 5] = [
        ErrorCategory::Length,
        ErrorCategory::Blank,
        ErrorCategory::Format,
        ErrorCategory::CrossReference,
        ErrorCategory::Custom,
    ];

    /// Short label used in reports and error output.
    pub fn label(&self) -> &'static str {
        match self {
            ErrorCategory::Length => "length",
            ErrorCategory::Blank => "blank",
            ErrorCategory::Format => "format",
            ErrorCategory::CrossReference => "xref",
            ErrorCategory::Custom => "custom",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How many failure records a column may forward for one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "max", rename_all = "snake_case")]
pub enum Limit {
    /// Every failure is emitted.
    Unlimited,
    /// Nothing is emitted; statistics still count.
    Suppressed,
    /// At most this many failures are emitted.
    Max(u64),
}

impl Limit {
    /// Parses a limit cell: blank is unlimited, `0` suppresses, a positive
    /// integer caps emission.
    pub fn parse(cell: &str) -> Result<Self> {
        let cell = cell.trim();
        if cell.is_empty() {
            return Ok(Limit::Unlimited);
        }
        match cell.parse::<u64>() {
            Ok(0) => Ok(Limit::Suppressed),
            Ok(n) => Ok(Limit::Max(n)),
            Err(_) => Err(ProfilerError::config(format!(
                "error limit must be blank or a non-negative integer, got '{cell}'"
            ))),
        }
    }

    /// Returns true if another record may be emitted after `emitted` so far.
    pub fn allows(&self, emitted: u64) -> bool {
        match self {
            Limit::Unlimited => true,
            Limit::Suppressed => false,
            Limit::Max(n) => emitted < *n,
        }
    }
}

impl Default for Limit {
    fn default() -> Self {
        Limit::Unlimited
    }
}

impl fmt::Display for Limit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Limit::Unlimited => f.write_str("unlimited"),
            Limit::Suppressed => f.write_str("suppressed"),
            Limit::Max(n) => write!(f, "{n}"),
        }
    }
}

/// Per-category error output limits for one column.
///
/// Categories without an explicit entry are unlimited.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorLimits {
    limits: BTreeMap<ErrorCategory, Limit>,
}

impl ErrorLimits {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the limit for one category.
    pub fn set(&mut self, category: ErrorCategory, limit: Limit) {
        self.limits.insert(category, limit);
    }

    /// Builder form of [`set`](Self::set).
    pub fn with(mut self, category: ErrorCategory, limit: Limit) -> Self {
        self.set(category, limit);
        self
    }

    pub fn get(&self, category: ErrorCategory) -> Limit {
        self.limits.get(&category).copied().unwrap_or_default()
    }
}

/// Profiling behaviour for a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileMode {
    /// No value tallying.
    Off,
    /// Count occurrences of every distinct value.
    Occurrence,
    /// Count occurrences and record the rows of duplicate values.
    Unique,
    /// Count occurrences and summarize the values numerically.
    Statistical,
}

impl ProfileMode {
    /// Parses a profile cell (`y`/`p`, `u`, `s`, or `n`/blank).
    pub fn parse(cell: &str) -> Result<Self> {
        match cell.trim().chars().next() {
            None | Some('n' | 'N') => Ok(ProfileMode::Off),
            Some('y' | 'Y' | 'p' | 'P') => Ok(ProfileMode::Occurrence),
            Some('u' | 'U') => Ok(ProfileMode::Unique),
            Some('s' | 'S') => Ok(ProfileMode::Statistical),
            Some(_) => Err(ProfilerError::config(format!(
                "profile must be one of y, n, p, u, s; got '{}'",
                cell.trim()
            ))),
        }
    }

    pub fn is_enabled(&self) -> bool {
        !matches!(self, ProfileMode::Off)
    }
}

impl Default for ProfileMode {
    fn default() -> Self {
        ProfileMode::Off
    }
}

/// Built-in named pattern families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NamedTest {
    Nothing,
    Something,
    Int,
    Float,
    Integer,
    Number,
    Decimal,
    Numeric,
    AlphaLower,
    AlphaUpper,
    AlphaPlus,
    AlphanumericLower,
    AlphanumericUpper,
    Yyyymmdd,
    Mmddyyyy,
    Year,
    Ssn,
    Phone,
    IpAddress,
    ZipCode,
    Email,
    Website,
    Percent,
    Time,
    Time24,
    Dollar,
    Ascii,
    /// Either date order.
    Mdyorymd,
    Mmyyyy,
    Notation,
    IpPort,
    IpCidr,
    Name,
    AlphanumericPlus,
    AlphanumericUpperPlus,
    Username,
    Address,
    TwitterHandle,
    TwitterHandles,
    Hashtag,
    Hashtags,
    PercentPlus,
    CcNumber,
    CcNumberPlus,
    /// Issuer prefix and length, with a Luhn checksum.
    CreditCard,
    CreditCardPlus,
    /// Degrees, minutes and seconds.
    Lat,
    Lon,
    LatLon,
    /// Decimal degrees.
    LatDec,
    LonDec,
    LatLonDec,
    /// ISO 6709 strings.
    Lat6709,
    Lon6709,
    LatLon6709,
    Sentence,
    Latin1,
    Windows,
    /// Unicode character-class predicates.
    IsDigit,
    IsDecimal,
    IsNumeric,
    IsLower,
    IsUpper,
    IsTitle,
    IsAlpha,
    IsAlnum,
    IsPrintable,
    IsAscii,
    /// ASCII-only forms of the predicates.
    BytesIsDigit,
    BytesIsLower,
    BytesIsUpper,
    BytesIsTitle,
    BytesIsAlpha,
    BytesIsAlnum,
    BytesIsAscii,
}

impl NamedTest {
    /// Every named test, in catalogue order.
    pub const ALL: &'static [NamedTest] = &[
        NamedTest::Nothing,
        NamedTest::Something,
        NamedTest::Int,
        NamedTest::Float,
        NamedTest::Integer,
        NamedTest::Number,
        NamedTest::Decimal,
        NamedTest::Numeric,
        NamedTest::AlphaLower,
        NamedTest::AlphaUpper,
        NamedTest::AlphaPlus,
        NamedTest::AlphanumericLower,
        NamedTest::AlphanumericUpper,
        NamedTest::Yyyymmdd,
        NamedTest::Mmddyyyy,
        NamedTest::Year,
        NamedTest::Ssn,
        NamedTest::Phone,
        NamedTest::IpAddress,
        NamedTest::ZipCode,
        NamedTest::Email,
        NamedTest::Website,
        NamedTest::Percent,
        NamedTest::Time,
        NamedTest::Time24,
        NamedTest::Dollar,
        NamedTest::Ascii,
        NamedTest::Mdyorymd,
        NamedTest::Mmyyyy,
        NamedTest::Notation,
        NamedTest::IpPort,
        NamedTest::IpCidr,
        NamedTest::Name,
        NamedTest::AlphanumericPlus,
        NamedTest::AlphanumericUpperPlus,
        NamedTest::Username,
        NamedTest::Address,
        NamedTest::TwitterHandle,
        NamedTest::TwitterHandles,
        NamedTest::Hashtag,
        NamedTest::Hashtags,
        NamedTest::PercentPlus,
        NamedTest::CcNumber,
        NamedTest::CcNumberPlus,
        NamedTest::CreditCard,
        NamedTest::CreditCardPlus,
        NamedTest::Lat,
        NamedTest::Lon,
        NamedTest::LatLon,
        NamedTest::LatDec,
        NamedTest::LonDec,
        NamedTest::LatLonDec,
        NamedTest::Lat6709,
        NamedTest::Lon6709,
        NamedTest::LatLon6709,
        NamedTest::Sentence,
        NamedTest::Latin1,
        NamedTest::Windows,
        NamedTest::IsDigit,
        NamedTest::IsDecimal,
        NamedTest::IsNumeric,
        NamedTest::IsLower,
        NamedTest::IsUpper,
        NamedTest::IsTitle,
        NamedTest::IsAlpha,
        NamedTest::IsAlnum,
        NamedTest::IsPrintable,
        NamedTest::IsAscii,
        NamedTest::BytesIsDigit,
        NamedTest::BytesIsLower,
        NamedTest::BytesIsUpper,
        NamedTest::BytesIsTitle,
        NamedTest::BytesIsAlpha,
        NamedTest::BytesIsAlnum,
        NamedTest::BytesIsAscii,
    ];

    /// The name used in param files.
    pub fn name(&self) -> &'static str {
        match self {
            NamedTest::Nothing => "nothing",
            NamedTest::Something => "something",
            NamedTest::Int => "int",
            NamedTest::Float => "float",
            NamedTest::Integer => "integer",
            NamedTest::Number => "number",
            NamedTest::Decimal => "decimal",
            NamedTest::Numeric => "numeric",
            NamedTest::AlphaLower => "alpha",
            NamedTest::AlphaUpper => "ALPHA",
            NamedTest::AlphaPlus => "Alpha+",
            NamedTest::AlphanumericLower => "alphanumeric",
            NamedTest::AlphanumericUpper => "ALPHANUMERIC",
            NamedTest::Yyyymmdd => "yyyymmdd",
            NamedTest::Mmddyyyy => "mmddyyyy",
            NamedTest::Year => "year",
            NamedTest::Ssn => "ssn",
            NamedTest::Phone => "phone",
            NamedTest::IpAddress => "ipaddress",
            NamedTest::ZipCode => "zipcode+",
            NamedTest::Email => "Email",
            NamedTest::Website => "Website",
            NamedTest::Percent => "percent",
            NamedTest::Time => "time",
            NamedTest::Time24 => "time24",
            NamedTest::Dollar => "dollar",
            NamedTest::Ascii => "ASCII",
            NamedTest::Mdyorymd => "mdyorymd",
            NamedTest::Mmyyyy => "mmyyyy",
            NamedTest::Notation => "notation",
            NamedTest::IpPort => "ip+port",
            NamedTest::IpCidr => "ip+cidr",
            NamedTest::Name => "Name",
            NamedTest::AlphanumericPlus => "Alphanumeric+",
            NamedTest::AlphanumericUpperPlus => "ALPHANUMERIC+",
            NamedTest::Username => "Username",
            NamedTest::Address => "Address",
            NamedTest::TwitterHandle => "@Twitter",
            NamedTest::TwitterHandles => "@Twitter+",
            NamedTest::Hashtag => "#Twitter",
            NamedTest::Hashtags => "#Twitter+",
            NamedTest::PercentPlus => "percent+",
            NamedTest::CcNumber => "ccnumber",
            NamedTest::CcNumberPlus => "ccnumber+",
            NamedTest::CreditCard => "creditcard",
            NamedTest::CreditCardPlus => "creditcard+",
            NamedTest::Lat => "lat",
            NamedTest::Lon => "lon",
            NamedTest::LatLon => "latlon",
            NamedTest::LatDec => "latdec",
            NamedTest::LonDec => "londec",
            NamedTest::LatLonDec => "latlondec",
            NamedTest::Lat6709 => "lat6709",
            NamedTest::Lon6709 => "lon6709",
            NamedTest::LatLon6709 => "latlon6709",
            NamedTest::Sentence => "Sentence",
            NamedTest::Latin1 => "Latin1",
            NamedTest::Windows => "Windows",
            NamedTest::IsDigit => "isdigit",
            NamedTest::IsDecimal => "isdecimal",
            NamedTest::IsNumeric => "isnumeric",
            NamedTest::IsLower => "islower",
            NamedTest::IsUpper => "isupper",
            NamedTest::IsTitle => "istitle",
            NamedTest::IsAlpha => "isalpha",
            NamedTest::IsAlnum => "isalnum",
            NamedTest::IsPrintable => "isprintable",
            NamedTest::IsAscii => "isascii",
            NamedTest::BytesIsDigit => "b.isdigit",
            NamedTest::BytesIsLower => "b.islower",
            NamedTest::BytesIsUpper => "b.isupper",
            NamedTest::BytesIsTitle => "b.istitle",
            NamedTest::BytesIsAlpha => "b.isalpha",
            NamedTest::BytesIsAlnum => "b.isalnum",
            NamedTest::BytesIsAscii => "b.isascii",
        }
    }

    /// Looks a named test up by its exact (case-sensitive) name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.name() == name)
    }
}

/// Where a user pattern comes from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum PatternSource {
    /// Pattern text written in the param file.
    Inline(String),
    /// Pattern loaded through the resource loader under this name,
    /// prefix included (`regex_zip`).
    Resource(String),
}

/// Where a lookup list comes from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum LookupSource {
    /// Values written in the param file's user data rows.
    Inline(Vec<String>),
    /// List loaded through the resource loader under this name, prefix
    /// included (`lookup_states`).
    Resource(String),
}

/// The main test bound to a column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TestKind {
    /// No main test.
    Anything,
    /// ASCII letters only.
    Alpha,
    /// Unsigned whole number without leading zeros.
    Digit,
    /// ASCII letters and digits.
    Alphanumeric,
    /// Letters followed by a period.
    Abbreviation,
    /// One of the built-in named pattern families.
    Named { test: NamedTest },
    /// A user regular expression, full-match.
    Regex { name: String, source: PatternSource },
    /// Membership in a lookup list.
    Lookup { name: String, source: LookupSource },
    /// Inclusive int, float or date range.
    Range { spec: RangeSpec },
    /// Values allowed depend on another column in the same row.
    CrossReference { key_column: String, table: String },
    /// A registered custom function.
    Custom { function: String },
}

impl TestKind {
    /// Parses a `Column Test` cell together with the column's user data.
    pub fn parse(test: &str, user_data: &[String]) -> Result<Self> {
        let test = test.trim();
        let first = user_data.first().map(|s| s.trim()).unwrap_or("");

        match test {
            "" | "anything" => return Ok(TestKind::Anything),
            "Alpha" => return Ok(TestKind::Alpha),
            "digit" => return Ok(TestKind::Digit),
            "Alphanumeric" => return Ok(TestKind::Alphanumeric),
            "Abbrev" => return Ok(TestKind::Abbreviation),
            _ => {}
        }
        if let Some(named) = NamedTest::from_name(test) {
            return Ok(TestKind::Named { test: named });
        }
        if test.starts_with("range(") {
            return Ok(TestKind::Range {
                spec: RangeSpec::parse(test)?,
            });
        }
        if let Some(name) = suffix(test, "regex_")? {
            let source = if first.is_empty() {
                PatternSource::Resource(test.to_string())
            } else if first.starts_with("regex_") {
                PatternSource::Resource(first.to_string())
            } else {
                PatternSource::Inline(first.to_string())
            };
            return Ok(TestKind::Regex {
                name: name.to_string(),
                source,
            });
        }
        if let Some(name) = suffix(test, "lookup_")? {
            let source = if first.is_empty() {
                LookupSource::Resource(test.to_string())
            } else if first.starts_with("lookup_") {
                LookupSource::Resource(first.to_string())
            } else {
                LookupSource::Inline(user_data.iter().map(|s| s.trim().to_string()).collect())
            };
            return Ok(TestKind::Lookup {
                name: name.to_string(),
                source,
            });
        }
        if let Some(table) = suffix(test, "xref_")? {
            if first.is_empty() {
                return Err(ProfilerError::config(format!(
                    "'{test}' needs the key column name in its first user data cell"
                )));
            }
            return Ok(TestKind::CrossReference {
                key_column: first.to_string(),
                table: table.to_string(),
            });
        }
        if let Some(function) = suffix(test, "custom_")? {
            return Ok(TestKind::Custom {
                function: function.to_string(),
            });
        }

        Err(ProfilerError::config(format!("unknown column test '{test}'")))
    }

    /// Error category used when the main test fails.
    pub fn category(&self) -> ErrorCategory {
        match self {
            TestKind::CrossReference { .. } => ErrorCategory::CrossReference,
            TestKind::Custom { .. } => ErrorCategory::Custom,
            _ => ErrorCategory::Format,
        }
    }

    /// Returns true when the column has no main test.
    pub fn is_anything(&self) -> bool {
        matches!(self, TestKind::Anything)
    }
}

impl Default for TestKind {
    fn default() -> Self {
        TestKind::Anything
    }
}

impl fmt::Display for TestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestKind::Anything => f.write_str("anything"),
            TestKind::Alpha => f.write_str("Alpha"),
            TestKind::Digit => f.write_str("digit"),
            TestKind::Alphanumeric => f.write_str("Alphanumeric"),
            TestKind::Abbreviation => f.write_str("Abbrev"),
            TestKind::Named { test } => f.write_str(test.name()),
            TestKind::Regex { name, .. } => write!(f, "regex_{name}"),
            TestKind::Lookup { name, .. } => write!(f, "lookup_{name}"),
            TestKind::Range { spec } => write!(f, "{spec}"),
            TestKind::CrossReference { table, .. } => write!(f, "xref_{table}"),
            TestKind::Custom { function } => write!(f, "custom_{function}"),
        }
    }
}

/// Returns the name after `prefix`, or an error when the prefix is bare.
fn suffix<'a>(test: &'a str, prefix: &str) -> Result<Option<&'a str>> {
    match test.strip_prefix(prefix) {
        Some("") => Err(ProfilerError::config(format!(
            "'{test}' is missing a name after '{prefix}'"
        ))),
        Some(name) => Ok(Some(name)),
        None if test == prefix.trim_end_matches('_') => Err(ProfilerError::config(format!(
            "'{test}' is missing a name (expected '{prefix}<name>')"
        ))),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_limit_parse() {
        assert_eq!(Limit::parse("").unwrap(), Limit::Unlimited);
        assert_eq!(Limit::parse("  ").unwrap(), Limit::Unlimited);
        assert_eq!(Limit::parse("0").unwrap(), Limit::Suppressed);
        assert_eq!(Limit::parse("25").unwrap(), Limit::Max(25));
        assert!(Limit::parse("-1").is_err());
        assert!(Limit::parse("lots").is_err());
    }

    #[test]
    fn test_limit_allows() {
        assert!(Limit::Unlimited.allows(1_000_000));
        assert!(!Limit::Suppressed.allows(0));
        assert!(Limit::Max(2).allows(1));
        assert!(!Limit::Max(2).allows(2));
    }

    #[test]
    fn test_error_limits_default_unlimited() {
        let limits = ErrorLimits::new().with(ErrorCategory::Blank, Limit::Suppressed);
        assert_eq!(limits.get(ErrorCategory::Blank), Limit::Suppressed);
        assert_eq!(limits.get(ErrorCategory::Format), Limit::Unlimited);
    }

    #[test]
    fn test_profile_mode_parse() {
        assert_eq!(ProfileMode::parse("").unwrap(), ProfileMode::Off);
        assert_eq!(ProfileMode::parse("n").unwrap(), ProfileMode::Off);
        assert_eq!(ProfileMode::parse("Y").unwrap(), ProfileMode::Occurrence);
        assert_eq!(ProfileMode::parse("p").unwrap(), ProfileMode::Occurrence);
        assert_eq!(ProfileMode::parse("u").unwrap(), ProfileMode::Unique);
        assert_eq!(ProfileMode::parse("stat").unwrap(), ProfileMode::Statistical);
        assert!(ProfileMode::parse("x").is_err());
    }

    #[test]
    fn test_named_test_names_roundtrip() {
        for test in NamedTest::ALL {
            assert_eq!(NamedTest::from_name(test.name()), Some(*test));
        }
        assert_eq!(NamedTest::from_name("Ascii"), None);
        assert_eq!(NamedTest::from_name("b.isalpha"), Some(NamedTest::BytesIsAlpha));
        assert_eq!(NamedTest::from_name("@Twitter+"), Some(NamedTest::TwitterHandles));

        let mut names: Vec<&str> = NamedTest::ALL.iter().map(NamedTest::name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), NamedTest::ALL.len());
    }

    #[test]
    fn test_parse_builtin_kinds() {
        assert_eq!(TestKind::parse("", &[]).unwrap(), TestKind::Anything);
        assert_eq!(TestKind::parse("Alpha", &[]).unwrap(), TestKind::Alpha);
        assert_eq!(TestKind::parse("digit", &[]).unwrap(), TestKind::Digit);
        assert_eq!(TestKind::parse("Abbrev", &[]).unwrap(), TestKind::Abbreviation);
        assert_eq!(
            TestKind::parse("alpha", &[]).unwrap(),
            TestKind::Named {
                test: NamedTest::AlphaLower
            }
        );
        assert!(TestKind::parse("bogus", &[]).is_err());
    }

    #[test]
    fn test_parse_regex_sources() {
        let inline = TestKind::parse("regex_code", &data(&["[A-Z]{2}"])).unwrap();
        assert_eq!(
            inline,
            TestKind::Regex {
                name: "code".into(),
                source: PatternSource::Inline("[A-Z]{2}".into())
            }
        );

        let shared = TestKind::parse("regex_code", &data(&["regex_other"])).unwrap();
        assert!(matches!(
            shared,
            TestKind::Regex { source: PatternSource::Resource(ref r), .. } if r == "regex_other"
        ));

        let own = TestKind::parse("regex_code", &[]).unwrap();
        assert!(matches!(
            own,
            TestKind::Regex { source: PatternSource::Resource(ref r), .. } if r == "regex_code"
        ));
    }

    #[test]
    fn test_parse_lookup_inline_values() {
        let kind = TestKind::parse("lookup_colors", &data(&["red", " green "])).unwrap();
        assert_eq!(
            kind,
            TestKind::Lookup {
                name: "colors".into(),
                source: LookupSource::Inline(vec!["red".into(), "green".into()])
            }
        );

        let own = TestKind::parse("lookup_states", &[]).unwrap();
        assert!(matches!(
            own,
            TestKind::Lookup { source: LookupSource::Resource(ref r), .. } if r == "lookup_states"
        ));
        let shared = TestKind::parse("lookup_codes", &data(&["lookup_states"])).unwrap();
        assert!(matches!(
            shared,
            TestKind::Lookup { source: LookupSource::Resource(ref r), .. } if r == "lookup_states"
        ));
    }

    #[test]
    fn test_parse_xref_needs_key_column() {
        assert!(TestKind::parse("xref_territory", &[]).is_err());
        let kind = TestKind::parse("xref_territory", &data(&["Dept"])).unwrap();
        assert_eq!(
            kind,
            TestKind::CrossReference {
                key_column: "Dept".into(),
                table: "territory".into()
            }
        );
        assert_eq!(kind.category(), ErrorCategory::CrossReference);
    }

    #[test]
    fn test_bare_prefixes_rejected() {
        for bare in ["regex", "regex_", "lookup", "xref_", "custom"] {
            assert!(TestKind::parse(bare, &data(&["x"])).is_err(), "{bare}");
        }
    }

    #[test]
    fn test_display_matches_param_names() {
        for name in ["anything", "Alpha", "digit", "Abbrev", "ASCII", "range(1:99)"] {
            assert_eq!(TestKind::parse(name, &[]).unwrap().to_string(), name);
        }
        assert_eq!(
            TestKind::parse("custom_states", &[]).unwrap().to_string(),
            "custom_states"
        );
    }
}
