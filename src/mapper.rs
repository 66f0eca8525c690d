use crate::error::{ExportError, Result};
use crate::profile::{Presence, TextConversion};
use crate::sqlite::Value;

impl Value {
    /// Whether the value is written under the given presence predicate.
    pub fn is_present(&self, presence: Presence) -> bool {
        match (presence, self) {
            (_, Value::Null) => false,
            (Presence::NotNull, _) => true,
            (Presence::Truthy, Value::Integer(i)) => *i != 0,
            (Presence::Truthy, Value::Real(f)) => *f != 0.0,
            (Presence::Truthy, Value::Text(b) | Value::Blob(b)) => !b.is_empty(),
        }
    }

    /// Element text for a non-NULL value.
    pub fn to_text(&self, conversion: TextConversion) -> Result<String> {
        match (conversion, self) {
            (_, Value::Null) => Ok(String::new()),
            (_, Value::Integer(i)) => Ok(i.to_string()),
            (_, Value::Real(f)) => Ok(format_real(*f)),
            (TextConversion::Minimal, Value::Text(b) | Value::Blob(b)) => {
                String::from_utf8(b.clone()).map_err(|_| {
                    let kind = if matches!(self, Value::Text(_)) { "text" } else { "blob" };
                    ExportError::Serialization(format!("{kind} value is not valid UTF-8"))
                })
            }
            (TextConversion::Generic, Value::Text(b) | Value::Blob(b)) => {
                Ok(String::from_utf8_lossy(b).into_owned())
            }
        }
    }
}

/// Shortest round-trip form, `.0` on integral values, exponent notation
/// outside `[1e-4, 1e16)`.
pub fn format_real(f: f64) -> String {
    if f.is_nan() {
        return "nan".to_string();
    }
    if f.is_infinite() {
        return if f > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    let magnitude = f.abs();
    if magnitude != 0.0 && !(1e-4..1e16).contains(&magnitude) {
        let formatted = format!("{f:e}");
        let (mantissa, exponent) = formatted.split_once('e').unwrap_or((formatted.as_str(), "0"));
        let (sign, digits) = match exponent.strip_prefix('-') {
            Some(digits) => ('-', digits),
            None => ('+', exponent),
        };
        return format!("{mantissa}e{sign}{digits:0>2}");
    }
    let formatted = f.to_string();
    if formatted.contains('.') {
        formatted
    } else {
        format!("{formatted}.0")
    }
}

/// Present `(column, text)` pairs of one row, in column order.
pub fn map_row(
    columns: &[String],
    row: &[Value],
    presence: Presence,
    conversion: TextConversion,
) -> Result<Vec<(String, String)>> {
    columns
        .iter()
        .zip(row)
        .filter(|(_, value)| value.is_present(presence))
        .map(|(name, value)| Ok((name.clone(), value.to_text(conversion)?)))
        .collect()
}
