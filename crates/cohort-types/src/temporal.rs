//! Temporal patterns
//!
//! Datasets carry dates as text. A `TemporalPattern` is a compiled
//! Java/Spark style pattern (`yyyy-MM-dd HH:mm:ss`) translated once into a
//! chrono format string. Compilation errors are configuration errors and
//! surface as `InvalidPattern`; parsing a cell never fails loudly and simply
//! yields `None`.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use cohort_diagnostics::{CohortError, Result};
use std::fmt;

/// Pattern for full timestamps as found in `STOP` and `DEATHDATE`
pub const TIMESTAMP_PATTERN: &str = "yyyy-MM-dd HH:mm:ss";
/// Pattern for date-only values as found in `BIRTHDATE`
pub const DATE_PATTERN: &str = "yyyy-MM-dd";

/// A compiled date or timestamp pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemporalPattern {
    source: String,
    format: String,
    has_time: bool,
}

#[derive(Default)]
struct Fields {
    year: bool,
    month: bool,
    day: bool,
    hour24: bool,
    hour12: bool,
    am_pm: bool,
    minute: bool,
    second: bool,
}

impl TemporalPattern {
    /// Compile a pattern such as `yyyy-MM-dd HH:mm:ss`.
    ///
    /// Supported letters: `y`, `M`, `d`, `H`, `h`, `a`, `m`, `s`, `S`, `E`.
    /// Text inside single quotes is literal, `''` is a literal quote, and any
    /// other non-letter character is matched as is.
    pub fn compile(pattern: &str) -> Result<Self> {
        if pattern.trim().is_empty() {
            return Err(CohortError::invalid_pattern(pattern, "pattern is empty"));
        }

        let mut format = String::with_capacity(pattern.len() * 2);
        let mut fields = Fields::default();
        let chars: Vec<char> = pattern.chars().collect();
        let mut i = 0;

        while i < chars.len() {
            let c = chars[i];

            if c == '\'' {
                if chars.get(i + 1) == Some(&'\'') {
                    format.push('\'');
                    i += 2;
                    continue;
                }
                let close = chars[i + 1..]
                    .iter()
                    .position(|&ch| ch == '\'')
                    .ok_or_else(|| CohortError::invalid_pattern(pattern, "unterminated quote"))?;
                for &ch in &chars[i + 1..i + 1 + close] {
                    push_literal(&mut format, ch);
                }
                i += close + 2;
                continue;
            }

            if !c.is_ascii_alphabetic() {
                push_literal(&mut format, c);
                i += 1;
                continue;
            }

            let run = chars[i..].iter().take_while(|&&ch| ch == c).count();
            let spec = field_spec(c, run, &mut fields)
                .ok_or_else(|| unsupported(pattern, c, run))?;
            format.push_str(spec);
            i += run;
        }

        if !(fields.year && fields.month && fields.day) {
            return Err(CohortError::invalid_pattern(
                pattern,
                "pattern must contain year (y), month (M) and day (d) fields",
            ));
        }
        if fields.hour12 && !fields.am_pm {
            return Err(CohortError::invalid_pattern(pattern, "'h' requires an am/pm marker 'a'"));
        }
        let has_hour = fields.hour24 || fields.hour12;
        if has_hour != fields.minute || (fields.second && !has_hour) {
            return Err(CohortError::invalid_pattern(
                pattern,
                "time fields must include both hour and minute",
            ));
        }

        Ok(Self {
            source: pattern.to_string(),
            format,
            has_time: has_hour,
        })
    }

    /// The `yyyy-MM-dd HH:mm:ss` pattern
    pub fn timestamp() -> Self {
        Self {
            source: TIMESTAMP_PATTERN.to_string(),
            format: "%Y-%m-%d %H:%M:%S".to_string(),
            has_time: true,
        }
    }

    /// The `yyyy-MM-dd` pattern
    pub fn date() -> Self {
        Self {
            source: DATE_PATTERN.to_string(),
            format: "%Y-%m-%d".to_string(),
            has_time: false,
        }
    }

    /// The pattern as written by the user
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// The chrono format string this pattern compiled to
    pub fn chrono_format(&self) -> &str {
        &self.format
    }

    /// Whether the pattern carries a time of day
    pub fn has_time(&self) -> bool {
        self.has_time
    }

    /// Parse a cell as a timestamp. Date-only patterns yield midnight.
    pub fn parse_timestamp(&self, input: &str) -> Option<NaiveDateTime> {
        if input.is_empty() {
            return None;
        }
        if self.has_time {
            NaiveDateTime::parse_from_str(input, &self.format).ok()
        } else {
            NaiveDate::parse_from_str(input, &self.format)
                .ok()
                .map(|d| d.and_time(NaiveTime::MIN))
        }
    }

    /// Parse a cell as a date, dropping any time of day
    pub fn parse_date(&self, input: &str) -> Option<NaiveDate> {
        self.parse_timestamp(input).map(|ts| ts.date())
    }

    /// Parse a configuration literal; unlike cell parsing this fails loudly
    pub fn parse_literal(&self, literal: &str) -> Result<NaiveDateTime> {
        self.parse_timestamp(literal)
            .ok_or_else(|| CohortError::invalid_temporal_literal(literal, &self.source))
    }

    /// Render a timestamp with this pattern
    pub fn format(&self, value: &NaiveDateTime) -> String {
        value.format(&self.format).to_string()
    }
}

impl fmt::Display for TemporalPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl std::str::FromStr for TemporalPattern {
    type Err = CohortError;

    fn from_str(s: &str) -> Result<Self> {
        Self::compile(s)
    }
}

fn push_literal(format: &mut String, c: char) {
    if c == '%' {
        format.push_str("%%");
    } else {
        format.push(c);
    }
}

fn field_spec(letter: char, run: usize, fields: &mut Fields) -> Option<&'static str> {
    let spec = match (letter, run) {
        ('y', 2) => "%y",
        ('y', 1 | 3 | 4) => "%Y",
        ('M', 1 | 2) => "%m",
        ('M', 3) => "%b",
        ('M', 4) => "%B",
        ('d', 1 | 2) => "%d",
        ('H', 1 | 2) => "%H",
        ('h', 1 | 2) => "%I",
        ('a', 1) => "%p",
        ('m', 1 | 2) => "%M",
        ('s', 1 | 2) => "%S",
        ('S', 3) => "%3f",
        ('S', 6) => "%6f",
        ('S', 9) => "%9f",
        ('E', 3) => "%a",
        ('E', 4) => "%A",
        _ => return None,
    };
    match letter {
        'y' => fields.year = true,
        'M' => fields.month = true,
        'd' => fields.day = true,
        'H' => fields.hour24 = true,
        'h' => fields.hour12 = true,
        'a' => fields.am_pm = true,
        'm' => fields.minute = true,
        's' => fields.second = true,
        _ => {}
    }
    Some(spec)
}

fn unsupported(pattern: &str, letter: char, run: usize) -> CohortError {
    let field: String = std::iter::repeat_n(letter, run).collect();
    CohortError::invalid_pattern(pattern, format!("unsupported field '{field}'"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cohort_diagnostics::ErrorKind;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn ts(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    #[rstest]
    #[case("yyyy-MM-dd HH:mm:ss", "%Y-%m-%d %H:%M:%S", true)]
    #[case("yyyy-MM-dd", "%Y-%m-%d", false)]
    #[case("dd/MM/yyyy", "%d/%m/%Y", false)]
    #[case("yyyy-MM-dd'T'HH:mm:ss.SSS", "%Y-%m-%dT%H:%M:%S.%3f", true)]
    #[case("yyyyMMdd hh:mm a", "%Y%m%d %I:%M %p", true)]
    #[case("d MMM yyyy", "%d %b %Y", false)]
    fn test_compile(#[case] pattern: &str, #[case] format: &str, #[case] has_time: bool) {
        let compiled = TemporalPattern::compile(pattern).unwrap();
        assert_eq!(compiled.chrono_format(), format);
        assert_eq!(compiled.has_time(), has_time);
    }

    #[rstest]
    #[case("")]
    #[case("yyyy-QQ-dd")]
    #[case("yyyy-MM")]
    #[case("yyyy-MM-dd 'T")]
    #[case("yyyy-MM-dd HH")]
    #[case("yyyy-MM-dd hh:mm")]
    #[case("yyyyy-MM-dd")]
    fn test_compile_invalid(#[case] pattern: &str) {
        let err = TemporalPattern::compile(pattern).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidPattern);
    }

    #[test]
    fn test_constants_match_compiled() {
        assert_eq!(TemporalPattern::compile(TIMESTAMP_PATTERN).unwrap(), TemporalPattern::timestamp());
        assert_eq!(TemporalPattern::compile(DATE_PATTERN).unwrap(), TemporalPattern::date());
    }

    #[test]
    fn test_parse_timestamp() {
        let p = TemporalPattern::timestamp();
        assert_eq!(p.parse_timestamp("2018-12-20 22:57:39"), Some(ts(2018, 12, 20, 22, 57, 39)));
        assert_eq!(p.parse_timestamp(""), None);
        assert_eq!(p.parse_timestamp("2018-12-20"), None);
        assert_eq!(p.parse_timestamp("2018-13-20 00:00:00"), None);
        assert_eq!(p.parse_timestamp("not a date"), None);
    }

    #[test]
    fn test_parse_date_only_pattern() {
        let p = TemporalPattern::date();
        assert_eq!(p.parse_timestamp("2000-06-15"), Some(ts(2000, 6, 15, 0, 0, 0)));
        assert_eq!(p.parse_date("2000-06-15"), NaiveDate::from_ymd_opt(2000, 6, 15));
        assert_eq!(p.parse_date("2000-06-15 10:00:00"), None);
        assert_eq!(p.parse_date("2001-02-29"), None);
    }

    #[test]
    fn test_parse_date_from_timestamp_pattern() {
        let p = TemporalPattern::timestamp();
        assert_eq!(p.parse_date("2020-01-01 23:59:59"), NaiveDate::from_ymd_opt(2020, 1, 1));
    }

    #[test]
    fn test_parse_literal() {
        let p = TemporalPattern::timestamp();
        assert_eq!(p.parse_literal("1999-07-15 00:00:00").unwrap(), ts(1999, 7, 15, 0, 0, 0));
        let err = p.parse_literal("1999-07-15").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidPattern);
    }

    #[test]
    fn test_format_round_trip_display() {
        let p = TemporalPattern::timestamp();
        assert_eq!(p.format(&ts(2000, 1, 1, 0, 0, 0)), "2000-01-01 00:00:00");
        assert_eq!(p.to_string(), TIMESTAMP_PATTERN);
    }
}
