//! Placeholder expressions: a dotted field path plus an optional formatter.

use std::fmt;

/// A parsed placeholder such as `partner_id.country_id.name|upper`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderExpression {
    /// Field names to traverse, never empty
    pub path: Vec<String>,

    /// Post-processing transform for the terminal value
    pub formatter: Option<Formatter>,
}

impl PlaceholderExpression {
    /// Parse the trimmed inside of a `{{...}}` token.
    ///
    /// Parsing never fails; a blank expression yields a single empty segment
    /// which no record will have.
    pub fn parse(raw: &str) -> Self {
        let (path, formatter) = match raw.split_once('|') {
            Some((path, spec)) => (path, Formatter::parse(spec)),
            None => (raw, None),
        };

        Self {
            path: path.trim().split('.').map(|s| s.trim().to_string()).collect(),
            formatter,
        }
    }

    /// The path joined with dots, without formatter.
    pub fn path_string(&self) -> String {
        self.path.join(".")
    }
}

impl fmt::Display for PlaceholderExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path_string())?;
        if let Some(ref formatter) = self.formatter {
            write!(f, "|{}", formatter)?;
        }
        Ok(())
    }
}

/// Named value transforms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Formatter {
    /// `date:<strftime pattern>`
    Date(String),
    /// `number:<format spec>`, e.g. `,.2f`
    Number(String),
    /// `upper`
    Upper,
    /// `lower`
    Lower,
    /// `title`
    Title,
    /// Anything else; values pass through unformatted
    Unknown(String),
}

impl Formatter {
    /// Parse a formatter spec. Blank input means no formatter.
    pub fn parse(spec: &str) -> Option<Self> {
        let spec = spec.trim();
        if spec.is_empty() {
            return None;
        }

        let formatter = if let Some(pattern) = spec.strip_prefix("date:") {
            Formatter::Date(unquote(pattern).to_string())
        } else if let Some(pattern) = spec.strip_prefix("number:") {
            Formatter::Number(unquote(pattern).to_string())
        } else {
            match spec {
                "upper" => Formatter::Upper,
                "lower" => Formatter::Lower,
                "title" => Formatter::Title,
                other => Formatter::Unknown(other.to_string()),
            }
        };
        Some(formatter)
    }
}

impl fmt::Display for Formatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Formatter::Date(p) => write!(f, "date:'{}'", p),
            Formatter::Number(p) => write!(f, "number:'{}'", p),
            Formatter::Upper => f.write_str("upper"),
            Formatter::Lower => f.write_str("lower"),
            Formatter::Title => f.write_str("title"),
            Formatter::Unknown(s) => f.write_str(s),
        }
    }
}

fn unquote(s: &str) -> &str {
    s.trim().trim_matches(|c| c == '\'' || c == '"')
}
