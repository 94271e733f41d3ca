//! Output templates for human-readable sizes.
//!
//! A template is literal text with two placeholders: `{value}` (the scaled
//! magnitude) and `{symbol}` (the unit). The magnitude takes an optional
//! precision, `{value:.3}`; without one it is shown with a single decimal.
//! Literal braces are written `{{` and `}}`.

use std::fmt;
use std::str::FromStr;

use num_bigint::BigUint;

use super::SizeError;

/// Template used when the caller does not supply one
pub const DEFAULT_TEMPLATE: &str = "{value:.1} {symbol}";

const DEFAULT_PRECISION: usize = 1;
const MAX_PRECISION: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Value { precision: usize },
    Symbol,
}

/// Parsed output template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizeTemplate {
    source: String,
    segments: Vec<Segment>,
}

impl SizeTemplate {
    pub fn parse(template: &str) -> Result<Self, SizeError> {
        let invalid = |reason: String| SizeError::InvalidTemplate {
            template: template.to_string(),
            reason,
        };

        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = template.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '{' if chars.peek() == Some(&'{') => {
                    chars.next();
                    literal.push('{');
                }
                '}' if chars.peek() == Some(&'}') => {
                    chars.next();
                    literal.push('}');
                }
                '}' => return Err(invalid("unmatched `}`".to_string())),
                '{' => {
                    let mut name = String::new();
                    let mut closed = false;
                    for c in chars.by_ref() {
                        if c == '}' {
                            closed = true;
                            break;
                        }
                        name.push(c);
                    }
                    if !closed {
                        return Err(invalid("unclosed `{`".to_string()));
                    }
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(parse_placeholder(&name).map_err(invalid)?);
                }
                _ => literal.push(c),
            }
        }
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        let has_value = segments.iter().any(|s| matches!(s, Segment::Value { .. }));
        let has_symbol = segments.iter().any(|s| matches!(s, Segment::Symbol));
        if !(has_value && has_symbol) {
            return Err(invalid("must contain {value} and {symbol}".to_string()));
        }

        Ok(Self {
            source: template.to_string(),
            segments,
        })
    }

    /// Substitute a magnitude and unit symbol into the template
    pub fn render(&self, value: f64, symbol: &str) -> String {
        self.render_with(|precision| format!("{:.*}", precision, value), symbol)
    }

    /// Substitute the exact magnitude `numerator / denominator`.
    ///
    /// Used for magnitudes an `f64` cannot hold. Rounds half to even at the
    /// template's precision, like [`render`](Self::render).
    pub fn render_ratio(
        &self,
        numerator: &BigUint,
        denominator: &BigUint,
        symbol: &str,
    ) -> String {
        self.render_with(
            |precision| decimal_ratio(numerator, denominator, precision),
            symbol,
        )
    }

    fn render_with(&self, value: impl Fn(usize) -> String, symbol: &str) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Value { precision } => out.push_str(&value(*precision)),
                Segment::Symbol => out.push_str(symbol),
            }
        }
        out
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }
}

fn decimal_ratio(numerator: &BigUint, denominator: &BigUint, precision: usize) -> String {
    let shifted = numerator * BigUint::from(10u8).pow(precision as u32);
    let mut digits = &shifted / denominator;
    let twice_remainder = (&shifted % denominator) << 1u8;
    if twice_remainder > *denominator || (twice_remainder == *denominator && digits.bit(0)) {
        digits += 1u8;
    }

    let digits = format!("{:0>width$}", digits.to_string(), width = precision + 1);
    if precision == 0 {
        return digits;
    }
    let (whole, fraction) = digits.split_at(digits.len() - precision);
    format!("{}.{}", whole, fraction)
}

fn parse_placeholder(name: &str) -> Result<Segment, String> {
    match name {
        "value" => Ok(Segment::Value {
            precision: DEFAULT_PRECISION,
        }),
        "symbol" => Ok(Segment::Symbol),
        _ => {
            let digits = name
                .strip_prefix("value:.")
                .ok_or_else(|| format!("unknown placeholder `{{{}}}`", name))?;
            let precision: usize = digits
                .parse()
                .map_err(|_| format!("invalid precision `{}`", digits))?;
            if precision > MAX_PRECISION {
                return Err(format!("precision {} exceeds {}", precision, MAX_PRECISION));
            }
            Ok(Segment::Value { precision })
        }
    }
}

impl Default for SizeTemplate {
    fn default() -> Self {
        Self {
            source: DEFAULT_TEMPLATE.to_string(),
            segments: vec![
                Segment::Value {
                    precision: DEFAULT_PRECISION,
                },
                Segment::Literal(" ".to_string()),
                Segment::Symbol,
            ],
        }
    }
}

impl FromStr for SizeTemplate {
    type Err = SizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for SizeTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}
