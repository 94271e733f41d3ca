//! Human-readable byte sizes
//!
//! Converts byte counts into strings such as `9.6 K` or `9.6 kibi` and parses
//! such strings back into counts. Counts are arbitrary precision, so inputs
//! well past 64 bits still resolve to the largest fitting unit.
//!
//! Parsing is the inverse only up to display rounding: formatting 9856 bytes
//! yields `9.6 K`, which parses back as 9830.

mod table;
mod template;

pub use table::{scale, UnitTable, TABLE_LEN};
pub use template::{SizeTemplate, DEFAULT_TEMPLATE};

use num_bigint::{BigInt, BigUint};
use num_traits::{FromPrimitive, ToPrimitive};
use thiserror::Error;

/// Broad category of a [`SizeError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The input is outside the function's domain (negative count, unknown table)
    Domain,
    /// Text that could not be interpreted (size strings, templates)
    Format,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SizeError {
    #[error("byte count must not be negative (got {0})")]
    NegativeCount(BigInt),

    #[error("unknown unit table `{0}` (expected customary, customary_ext, iec or iec_ext)")]
    UnknownTable(String),

    #[error("can't interpret `{0}`")]
    Uninterpretable(String),

    #[error("invalid size template `{template}`: {reason}")]
    InvalidTemplate { template: String, reason: String },
}

impl SizeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SizeError::NegativeCount(_) | SizeError::UnknownTable(_) => ErrorKind::Domain,
            SizeError::Uninterpretable(_) | SizeError::InvalidTemplate { .. } => ErrorKind::Format,
        }
    }
}

/// Format a byte count with the largest unit of `table` that does not exceed it.
///
/// Counts below 1024 use the table's unprefixed unit with the raw count as value.
pub fn bytes_to_human(
    n: impl Into<BigInt>,
    template: &SizeTemplate,
    table: UnitTable,
) -> Result<String, SizeError> {
    let n: BigInt = n.into();
    let Some(count) = n.to_biguint() else {
        return Err(SizeError::NegativeCount(n));
    };

    let symbols = table.symbols();
    for index in (1..TABLE_LEN).rev() {
        let divisor = scale(index);
        if count >= divisor {
            let rendered = match count.to_f64() {
                Some(value) if value.is_finite() => {
                    template.render(value / to_f64(&divisor), symbols[index])
                }
                // Past f64 range the quotient is formatted exactly
                _ => template.render_ratio(&count, &divisor, symbols[index]),
            };
            return Ok(rendered);
        }
    }

    Ok(template.render(to_f64(&count), symbols[0]))
}

/// Like [`bytes_to_human`], taking the table by name.
pub fn bytes_to_human_named(
    n: impl Into<BigInt>,
    template: &SizeTemplate,
    table: &str,
) -> Result<String, SizeError> {
    bytes_to_human(n, template, table.parse()?)
}

/// Format with the default template and the customary table (`1.5 K`, `3.0 G`).
pub fn format_size(n: impl Into<BigInt>) -> Result<String, SizeError> {
    bytes_to_human(n, &SizeTemplate::default(), UnitTable::Customary)
}

/// Parse `<number><optional whitespace><unit>` into a byte count.
///
/// The unit may come from any table; a bare `k` is accepted for `K`. The
/// result is truncated toward zero.
pub fn human_to_bytes(input: &str) -> Result<BigUint, SizeError> {
    let uninterpretable = || SizeError::Uninterpretable(input.to_string());

    let split = input
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(input.len());
    let (number, unit) = input.split_at(split);
    let number: f64 = number.parse().map_err(|_| uninterpretable())?;

    let unit = unit.trim();
    let index = UnitTable::ALL
        .iter()
        .find_map(|table| table.position(unit))
        .or_else(|| match unit {
            "k" => UnitTable::Customary.position("K"),
            _ => None,
        })
        .ok_or_else(uninterpretable)?;

    let bytes = number * to_f64(&scale(index));
    BigUint::from_f64(bytes.trunc()).ok_or_else(uninterpretable)
}

fn to_f64(n: &BigUint) -> f64 {
    n.to_f64().unwrap_or(f64::INFINITY)
}
