//! Value formatters.
//!
//! Formatting never fails: input a formatter cannot interpret is returned
//! in its plain string form.

use crate::data::{float_repr, Scalar};
use crate::template::Formatter;
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use std::fmt::Write;

/// Render `value` through `formatter`.
pub fn apply(value: &Scalar, formatter: Option<&Formatter>) -> String {
    let Some(formatter) = formatter else {
        return value.to_string();
    };

    match formatter {
        Formatter::Date(pattern) => {
            format_date(value, pattern).unwrap_or_else(|| value.to_string())
        }
        Formatter::Number(spec) => {
            format_number(value, spec).unwrap_or_else(|| value.to_string())
        }
        Formatter::Upper => value.to_string().to_uppercase(),
        Formatter::Lower => value.to_string().to_lowercase(),
        Formatter::Title => title_case(&value.to_string()),
        Formatter::Unknown(name) => {
            log::debug!("Unknown formatter '{}', value left unformatted", name);
            value.to_string()
        }
    }
}

/// Render a date-like value with a strftime pattern.
fn format_date(value: &Scalar, pattern: &str) -> Option<String> {
    let datetime = match value {
        Scalar::Date(d) => d.and_time(NaiveTime::MIN),
        Scalar::DateTime(dt) => *dt,
        Scalar::Text(s) => parse_datetime(s)?,
        _ => return None,
    };

    let items: Vec<Item<'_>> = StrftimeItems::new(pattern).collect();
    if items.iter().any(|i| matches!(i, Item::Error)) {
        return None;
    }

    // Specifiers a naive value cannot satisfy (e.g. %z) surface as fmt errors.
    let mut out = String::new();
    write!(out, "{}", datetime.format_with_items(items.into_iter())).ok()?;
    Some(out)
}

/// Parse the date and date-time spellings a data layer typically emits.
fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(d.and_time(NaiveTime::MIN));
    }
    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, pattern) {
            return Some(dt);
        }
    }
    DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.naive_local())
}

/// Render a numeric value with a format spec like `,.2f`.
fn format_number(value: &Scalar, spec: &str) -> Option<String> {
    let v = match value {
        Scalar::Integer(i) => *i as f64,
        Scalar::Float(f) => *f,
        Scalar::Text(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    NumberSpec::parse(spec)?.render(v)
}

/// Largest precision accepted by `number:`; anything above falls back.
const MAX_PRECISION: usize = 100;

/// Parsed `[sign][grouping][.precision][type]` spec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct NumberSpec {
    sign: Option<char>,
    grouping: Option<char>,
    precision: Option<usize>,
    kind: Option<char>,
}

impl NumberSpec {
    fn parse(spec: &str) -> Option<Self> {
        let mut rest = spec;
        let sign = take_if(&mut rest, |c| matches!(c, '+' | '-' | ' '));
        let grouping = take_if(&mut rest, |c| matches!(c, ',' | '_'));

        let precision = match rest.strip_prefix('.') {
            Some(after) => {
                let digits: String = after.chars().take_while(|c| c.is_ascii_digit()).collect();
                if digits.is_empty() {
                    return None;
                }
                rest = &after[digits.len()..];
                let precision: usize = digits.parse().ok()?;
                if precision > MAX_PRECISION {
                    return None;
                }
                Some(precision)
            }
            None => None,
        };

        let kind = take_if(&mut rest, |c| matches!(c, 'f' | 'F' | '%'));
        if !rest.is_empty() || (kind.is_none() && precision.is_some()) {
            return None;
        }

        Some(Self {
            sign,
            grouping,
            precision,
            kind,
        })
    }

    fn render(&self, v: f64) -> Option<String> {
        if !v.is_finite() {
            return Some(float_repr(v));
        }

        let (digits, suffix) = match self.kind {
            Some('%') => (
                format!("{:.*}", self.precision.unwrap_or(6), (v * 100.0).abs()),
                "%",
            ),
            Some(_) => (format!("{:.*}", self.precision.unwrap_or(6), v.abs()), ""),
            None => (float_repr(v.abs()), ""),
        };

        let (int_part, frac_part) = match digits.split_once('.') {
            Some((i, f)) => (i.to_string(), Some(f.to_string())),
            None => (digits, None),
        };
        let int_part = match self.grouping {
            Some(sep) if int_part.bytes().all(|b| b.is_ascii_digit()) => group(&int_part, sep),
            _ => int_part,
        };

        let sign = match (v.is_sign_negative(), self.sign) {
            (true, _) => "-",
            (false, Some('+')) => "+",
            (false, Some(' ')) => " ",
            _ => "",
        };

        let mut out = format!("{}{}", sign, int_part);
        if let Some(frac) = frac_part {
            out.push('.');
            out.push_str(&frac);
        }
        out.push_str(suffix);
        Some(out)
    }
}

/// Consume the next char of `rest` if it satisfies `pred`.
fn take_if(rest: &mut &str, pred: impl Fn(char) -> bool) -> Option<char> {
    let c = rest.chars().next().filter(|c| pred(*c))?;
    *rest = &rest[c.len_utf8()..];
    Some(c)
}

/// Insert `sep` every three digits from the right.
fn group(digits: &str, sep: char) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(sep);
        }
        out.push(c);
    }
    out
}

/// Uppercase the first letter of every alphabetic run, lowercase the rest.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_word = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fmt(value: impl Into<Scalar>, spec: &str) -> String {
        apply(&value.into(), Formatter::parse(spec).as_ref())
    }

    #[test]
    fn test_number_grouping() {
        assert_eq!(fmt(1234.567, "number:\",.2f\""), "1,234.57");
        assert_eq!(fmt(1234567.0, "number:',.2f'"), "1,234,567.00");
        assert_eq!(fmt(-9876543.21, "number:,.1f"), "-9,876,543.2");
        assert_eq!(fmt(999i64, "number:,.0f"), "999");
    }

    #[test]
    fn test_number_variants() {
        assert_eq!(fmt(0.256, "number:.1%"), "25.6%");
        assert_eq!(fmt(12.34567, "number:+.2f"), "+12.35");
        assert_eq!(fmt(1234.5, "number:,"), "1,234.5");
        assert_eq!(fmt(1234.5, "number:_.1f"), "1_234.5");
        assert_eq!(fmt(-0.001, "number:.2f"), "-0.00");
        assert_eq!(fmt("42.5", "number:.2f"), "42.50");
    }

    #[test]
    fn test_number_fallbacks() {
        assert_eq!(fmt("abc", "number:,.2f"), "abc");
        assert_eq!(fmt(12.5, "number:bogus"), "12.5");
        assert_eq!(fmt(12.5, "number:.2"), "12.5");
        assert_eq!(fmt(true, "number:.2f"), "true");
    }

    #[test]
    fn test_number_precision_out_of_range() {
        assert_eq!(fmt(1.5, "number:.70000f"), "1.5");
        assert_eq!(fmt(1.5, "number:,.99999999999999999999999f"), "1.5");
        assert_eq!(fmt(0.5, "number:.101%"), "0.5");
        assert_eq!(fmt(1.5, "number:.100f").len(), 102);
    }

    #[test]
    fn test_date_formatter() {
        assert_eq!(fmt("2025-12-28T10:30:00", "date:'%Y-%m-%d'"), "2025-12-28");
        assert_eq!(fmt("2025-12-28", "date:%d/%m/%Y"), "28/12/2025");
        assert_eq!(fmt("2025-12-28 10:30:00", "date:%H:%M"), "10:30");
        assert_eq!(fmt("2025-12-28T10:30:00+02:00", "date:%Y"), "2025");

        let date = NaiveDate::from_ymd_opt(2025, 1, 5).unwrap();
        assert_eq!(apply(&Scalar::Date(date), Formatter::parse("date:%d.%m.%Y").as_ref()), "05.01.2025");
        let dt = date.and_hms_opt(8, 15, 0).unwrap();
        assert_eq!(apply(&Scalar::DateTime(dt), Formatter::parse("date:%Y-%m-%d").as_ref()), "2025-01-05");
    }

    #[test]
    fn test_date_fallbacks() {
        assert_eq!(fmt("not a date", "date:%Y"), "not a date");
        assert_eq!(fmt(42i64, "date:%Y"), "42");
        assert_eq!(fmt("2025-12-28", "date:%Q"), "2025-12-28");
        assert_eq!(fmt("2025-12-28", "date:%z"), "2025-12-28");
    }

    #[test]
    fn test_case_formatters() {
        assert_eq!(fmt("test string", "upper"), "TEST STRING");
        assert_eq!(fmt("TEST STRING", "lower"), "test string");
        assert_eq!(fmt("test string here", "title"), "Test String Here");
        assert_eq!(fmt("mIxEd-case words", "title"), "Mixed-Case Words");
        assert_eq!(fmt("as is", "shout"), "as is");
        assert_eq!(fmt("plain", ""), "plain");
    }

    #[test]
    fn test_group() {
        assert_eq!(group("1", ','), "1");
        assert_eq!(group("123", ','), "123");
        assert_eq!(group("1234", ','), "1,234");
        assert_eq!(group("1234567", ','), "1,234,567");
    }
}
