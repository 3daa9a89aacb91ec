use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A cell's stored value.
///
/// Hosts hand us loosely typed JSON. Conversion into this enum happens once, at
/// the boundary, so the rest of the crate never probes object shapes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    /// A value of a shape we do not understand. Kept for round trips, displayed as empty.
    Unresolved(Value),
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty | Self::Unresolved(_) => true,
            Self::Text(s) => s.trim().is_empty(),
            Self::Number(_) => false,
        }
    }

    /// Text shown in the grid.
    pub fn display_text(&self) -> String {
        match self {
            Self::Empty | Self::Unresolved(_) => String::new(),
            Self::Text(s) => s.clone(),
            Self::Number(n) => format_number(*n),
        }
    }

    /// Numeric interpretation: numbers as-is, text when it parses as a finite number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) if n.is_finite() => Some(*n),
            Self::Text(s) => parse_number(s),
            _ => None,
        }
    }

    /// Build a value from raw user input: numeric text becomes a number.
    pub fn from_input(input: &str) -> Self {
        if input.trim().is_empty() {
            return Self::Empty;
        }
        match parse_number(input) {
            Some(n) => Self::Number(n),
            None => Self::Text(input.to_string()),
        }
    }
}

/// Parse trimmed text as a finite number. `inf`/`NaN` spellings are rejected.
pub fn parse_number(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

fn format_number(n: f64) -> String {
    if n.is_finite() {
        n.to_string()
    } else {
        String::new()
    }
}

impl From<Value> for CellValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Empty,
            Value::String(s) if s.is_empty() => Self::Empty,
            Value::String(s) => Self::Text(s),
            Value::Number(ref n) => match n.as_f64() {
                Some(f) if f.is_finite() => Self::Number(f),
                _ => Self::Unresolved(value),
            },
            Value::Bool(b) => Self::Text(b.to_string()),
            Value::Object(ref map) => {
                // Wrapped payloads from the storage/AI backends: {"value": ...} or {"message": ...}
                match (map.get("value"), map.get("message")) {
                    (Some(Value::String(s)), _) => Self::from(Value::String(s.clone())),
                    (Some(Value::Number(n)), _) => Self::from(Value::Number(n.clone())),
                    (_, Some(Value::String(s))) => Self::from(Value::String(s.clone())),
                    _ => Self::Unresolved(value),
                }
            }
            Value::Array(_) => Self::Unresolved(value),
        }
    }
}

impl From<CellValue> for Value {
    fn from(value: CellValue) -> Self {
        match value {
            CellValue::Empty => Value::String(String::new()),
            CellValue::Text(s) => Value::String(s),
            CellValue::Number(n) => serde_json::Number::from_f64(n)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            CellValue::Unresolved(v) => v,
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        if s.is_empty() {
            Self::Empty
        } else {
            Self::Text(s.to_string())
        }
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

/// Presentation attributes; independent of the value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellStyle {
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub bold: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub italic: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub underline: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_align: Option<String>,
}

/// A single cell's data and style
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    #[serde(default)]
    pub value: CellValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<CellStyle>,
    /// Formula text. Stored, never evaluated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formula: Option<String>,
}

impl Cell {
    pub fn new(value: impl Into<CellValue>) -> Self {
        Self {
            value: value.into(),
            ..Self::default()
        }
    }
}

/// One pending write for the cell store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellUpdate {
    pub cell_id: String,
    pub value: CellValue,
}

impl CellUpdate {
    pub fn new(cell_id: impl Into<String>, value: impl Into<CellValue>) -> Self {
        Self {
            cell_id: cell_id.into(),
            value: value.into(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn wrapped_objects_unwrap_to_text() {
        assert_eq!(
            CellValue::from(json!({"value": "hello"})),
            CellValue::Text("hello".into())
        );
        assert_eq!(
            CellValue::from(json!({"message": "error: quota"})),
            CellValue::Text("error: quota".into())
        );
        assert_eq!(CellValue::from(json!({"value": 4})), CellValue::Number(4.0));
        assert!(matches!(
            CellValue::from(json!({"x": 1})),
            CellValue::Unresolved(_)
        ));
    }

    #[test]
    fn unresolved_displays_empty() {
        let v = CellValue::from(json!([1, 2]));
        assert!(v.is_empty());
        assert_eq!(v.display_text(), "");
        assert_eq!(v.as_number(), None);
    }

    #[test]
    fn number_display_drops_trailing_zero() {
        assert_eq!(CellValue::Number(25.0).display_text(), "25");
        assert_eq!(CellValue::Number(2.5).display_text(), "2.5");
    }

    #[test]
    fn from_input_detects_numbers() {
        assert_eq!(CellValue::from_input(" 42 "), CellValue::Number(42.0));
        assert_eq!(CellValue::from_input("42a"), CellValue::Text("42a".into()));
        assert_eq!(CellValue::from_input("   "), CellValue::Empty);
        assert_eq!(CellValue::from_input("NaN"), CellValue::Text("NaN".into()));
    }

    #[test]
    fn cell_deserializes_loose_json() {
        let cell: Cell = serde_json::from_value(json!({"value": 7, "formula": "=A1+1"})).unwrap();
        assert_eq!(cell.value.as_number().unwrap(), 7.0);
        assert_eq!(cell.formula.as_deref(), Some("=A1+1"));
    }
}
