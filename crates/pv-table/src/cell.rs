//! Typed table cells and their display form.

use core::cmp::Ordering;
use core::fmt;

/// A single table cell.
///
/// Column types are inferred once at load time, so a column holds either
/// integers, floats or text, with `Missing` allowed anywhere.
#[derive(Debug, Clone)]
pub enum CellValue {
    Missing,
    Int(i64),
    Float(f64),
    Text(String),
}

impl CellValue {
    pub fn is_missing(&self) -> bool {
        matches!(self, CellValue::Missing)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Int(v) => Some(*v as f64),
            CellValue::Float(v) => Some(*v),
            CellValue::Missing | CellValue::Text(_) => None,
        }
    }

    /// Text form for id-like use (`None` when missing).
    pub fn as_text(&self) -> Option<String> {
        match self {
            CellValue::Missing => None,
            CellValue::Text(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Ordering used by the sort proxy: numbers before text, missing is
    /// handled by the caller.
    pub fn sort_cmp(&self, other: &CellValue) -> Ordering {
        match (self.as_f64(), other.as_f64()) {
            (Some(a), Some(b)) => a.total_cmp(&b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => match (self, other) {
                (CellValue::Text(a), CellValue::Text(b)) => a.cmp(b),
                (CellValue::Missing, CellValue::Missing) => Ordering::Equal,
                (CellValue::Missing, _) => Ordering::Greater,
                (_, CellValue::Missing) => Ordering::Less,
                _ => Ordering::Equal,
            },
        }
    }
}

impl PartialEq for CellValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (CellValue::Missing, CellValue::Missing) => true,
            (CellValue::Int(a), CellValue::Int(b)) => a == b,
            (CellValue::Float(a), CellValue::Float(b)) => a == b || (a.is_nan() && b.is_nan()),
            (CellValue::Text(a), CellValue::Text(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Missing => f.write_str("nan"),
            CellValue::Int(v) => write!(f, "{v}"),
            CellValue::Float(v) => f.write_str(&format_float(*v)),
            CellValue::Text(s) => f.write_str(s),
        }
    }
}

/// Locale-independent float formatting matching the usual `repr` of a float:
/// `1.0`, `0.25`, `1e-05`, `1e+16`, `nan`, `inf`.
pub fn format_float(v: f64) -> String {
    if v.is_nan() {
        return "nan".to_string();
    }
    if v.is_infinite() {
        return if v > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    let magnitude = v.abs();
    if magnitude != 0.0 && !(1e-4..1e16).contains(&magnitude) {
        return scientific(v);
    }
    if v.fract() == 0.0 {
        format!("{v:.1}")
    } else {
        format!("{v}")
    }
}

fn scientific(v: f64) -> String {
    let raw = format!("{v:e}");
    match raw.split_once('e') {
        Some((mantissa, exp)) => {
            let exp: i32 = exp.parse().unwrap_or(0);
            let sign = if exp < 0 { '-' } else { '+' };
            format!("{mantissa}e{sign}{:02}", exp.abs())
        }
        None => raw,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floats_render_like_default_repr() {
        assert_eq!(format_float(1.0), "1.0");
        assert_eq!(format_float(-0.0), "-0.0");
        assert_eq!(format_float(0.25), "0.25");
        assert_eq!(format_float(0.1 + 0.2), "0.30000000000000004");
        assert_eq!(format_float(1e-5), "1e-05");
        assert_eq!(format_float(2.5e20), "2.5e+20");
        assert_eq!(format_float(f64::NAN), "nan");
        assert_eq!(format_float(f64::NEG_INFINITY), "-inf");
    }

    #[test]
    fn missing_displays_as_nan() {
        assert_eq!(CellValue::Missing.to_string(), "nan");
        assert_eq!(CellValue::Int(7).to_string(), "7");
        assert_eq!(CellValue::Text("obs_a".into()).to_string(), "obs_a");
    }

    #[test]
    fn numbers_sort_before_text() {
        let num = CellValue::Float(10.0);
        let text = CellValue::Text("a".into());
        assert_eq!(num.sort_cmp(&text), Ordering::Less);
        assert_eq!(CellValue::Int(2).sort_cmp(&CellValue::Float(1.5)), Ordering::Greater);
    }

    #[test]
    fn nan_floats_compare_equal() {
        assert_eq!(CellValue::Float(f64::NAN), CellValue::Float(f64::NAN));
        assert_ne!(CellValue::Float(1.0), CellValue::Int(1));
    }
}
