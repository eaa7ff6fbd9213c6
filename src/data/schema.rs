use super::error::{DataError, Result};
use super::model::Value;

// ---------------------------------------------------------------------------
// Declared column schema of the campaign dataset
// ---------------------------------------------------------------------------

/// Declared type of a column. Cells of typed columns are parsed strictly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Integer,
    Float,
    Text,
}

pub const AGE: &str = "Age";
pub const GENDER: &str = "Gender";
pub const INCOME: &str = "Income";
pub const CAMPAIGN_CHANNEL: &str = "CampaignChannel";
pub const CAMPAIGN_TYPE: &str = "CampaignType";
pub const CLICK_THROUGH_RATE: &str = "ClickThroughRate";
pub const CONVERSION_RATE: &str = "ConversionRate";
pub const AD_SPEND: &str = "AdSpend";
pub const TIME_ON_SITE: &str = "TimeOnSite";
pub const SOCIAL_SHARES: &str = "SocialShares";
pub const PREVIOUS_PURCHASES: &str = "PreviousPurchases";
pub const LOYALTY_POINTS: &str = "LoyaltyPoints";
pub const ADVERTISING_PLATFORM: &str = "AdvertisingPlatform";
pub const ADVERTISING_TOOL: &str = "AdvertisingTool";

/// Columns every input file must carry, with their declared kinds.
pub const REQUIRED_COLUMNS: [(&str, ColumnKind); 14] = [
    (AGE, ColumnKind::Integer),
    (GENDER, ColumnKind::Text),
    (INCOME, ColumnKind::Float),
    (CAMPAIGN_CHANNEL, ColumnKind::Text),
    (CAMPAIGN_TYPE, ColumnKind::Text),
    (CLICK_THROUGH_RATE, ColumnKind::Float),
    (CONVERSION_RATE, ColumnKind::Float),
    (AD_SPEND, ColumnKind::Float),
    (TIME_ON_SITE, ColumnKind::Float),
    (SOCIAL_SHARES, ColumnKind::Integer),
    (PREVIOUS_PURCHASES, ColumnKind::Integer),
    (LOYALTY_POINTS, ColumnKind::Integer),
    (ADVERTISING_PLATFORM, ColumnKind::Text),
    (ADVERTISING_TOOL, ColumnKind::Text),
];

/// Columns removed by the cleaner as irrelevant to the analysis.
pub const DROPPED_COLUMNS: [&str; 2] = [ADVERTISING_PLATFORM, ADVERTISING_TOOL];

/// Declared kind of a column, or `None` for columns outside the schema.
pub fn kind_of(column: &str) -> Option<ColumnKind> {
    REQUIRED_COLUMNS
        .iter()
        .find(|(name, _)| *name == column)
        .map(|(_, kind)| *kind)
}

/// Fail with [`DataError::Schema`] naming every required column `headers` lacks.
pub fn validate_headers<S: AsRef<str>>(headers: &[S]) -> Result<()> {
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|(name, _)| !headers.iter().any(|h| h.as_ref() == *name))
        .map(|(name, _)| name.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(DataError::Schema { missing })
    }
}

// ---------------------------------------------------------------------------
// Cell parsing / coercion
// ---------------------------------------------------------------------------

/// Cell texts read as missing, the same set `pandas.read_csv` uses by default.
pub const NA_TOKENS: [&str; 19] = [
    "", "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "-nan", "null", "NULL", "None", "#N/A",
    "#NA", "<NA>", "#N/A N/A", "-1.#IND", "1.#QNAN", "-1.#QNAN", "1.#IND",
];

/// Whether a (trimmed) cell text stands for a missing value.
pub fn is_na(text: &str) -> bool {
    NA_TOKENS.contains(&text)
}

/// Fold `-0.0` into `0.0` so equal floats hash and dedup alike.
pub fn normalize_float(v: f64) -> f64 {
    if v == 0.0 {
        0.0
    } else {
        v
    }
}

/// Parse a raw text cell. Typed columns are strict; untyped columns are guessed.
/// Any of [`NA_TOKENS`] is a null in every column.
pub fn parse_cell(text: &str, column: &str, row: usize) -> Result<Value> {
    let text = text.trim();
    if is_na(text) {
        return Ok(Value::Null);
    }
    match kind_of(column) {
        Some(ColumnKind::Text) => Ok(Value::Text(text.to_string())),
        Some(ColumnKind::Integer) => parse_integer(text)
            .map(Value::Integer)
            .ok_or_else(|| DataError::parse(row, column, format!("'{text}' is not an integer"))),
        Some(ColumnKind::Float) => text
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(|v| Value::Float(normalize_float(v)))
            .ok_or_else(|| DataError::parse(row, column, format!("'{text}' is not a number"))),
        None => Ok(guess_value_type(text)),
    }
}

/// Bring an already-typed value (JSON / Parquet) in line with the declared kind.
pub fn coerce(value: Value, column: &str, row: usize) -> Result<Value> {
    let Some(kind) = kind_of(column) else {
        return Ok(value);
    };
    match (kind, value) {
        (_, Value::Null) => Ok(Value::Null),
        (ColumnKind::Integer, Value::Integer(i)) => Ok(Value::Integer(i)),
        (ColumnKind::Integer, Value::Float(f)) if f.fract() == 0.0 && f.is_finite() => {
            Ok(Value::Integer(f as i64))
        }
        (ColumnKind::Float, Value::Float(f)) if f.is_nan() => Ok(Value::Null),
        (ColumnKind::Float, Value::Float(f)) => Ok(Value::Float(normalize_float(f))),
        (ColumnKind::Float, Value::Integer(i)) => Ok(Value::Float(i as f64)),
        (ColumnKind::Text, Value::Text(s)) => Ok(Value::Text(s)),
        (ColumnKind::Text, other) => Ok(Value::Text(other.to_string())),
        (_, Value::Text(s)) => parse_cell(&s, column, row),
        (kind, other) => Err(DataError::parse(
            row,
            column,
            format!("expected {kind:?}, found {other}"),
        )),
    }
}

/// Integers, also accepting an integral float such as `42.0`.
fn parse_integer(text: &str) -> Option<i64> {
    if let Ok(i) = text.parse::<i64>() {
        return Some(i);
    }
    text.parse::<f64>()
        .ok()
        .filter(|f| f.is_finite() && f.fract() == 0.0)
        .map(|f| f as i64)
}

fn guess_value_type(s: &str) -> Value {
    if let Ok(i) = s.parse::<i64>() {
        return Value::Integer(i);
    }
    match s.parse::<f64>() {
        Ok(f) if f.is_finite() => Value::Float(normalize_float(f)),
        _ => Value::Text(s.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_every_missing_column() {
        let headers = vec!["Age", "Gender", "Income"];
        match validate_headers(&headers) {
            Err(DataError::Schema { missing }) => {
                assert_eq!(missing.len(), REQUIRED_COLUMNS.len() - 3);
                assert!(missing.contains(&"AdvertisingTool".to_string()));
                assert!(!missing.contains(&"Age".to_string()));
            }
            other => panic!("expected schema error, got {other:?}"),
        }
    }

    #[test]
    fn full_header_validates() {
        let headers: Vec<&str> = REQUIRED_COLUMNS.iter().map(|(n, _)| *n).collect();
        assert!(validate_headers(&headers).is_ok());
    }

    #[test]
    fn typed_cells_parse_strictly() {
        assert_eq!(parse_cell("42", AGE, 0).unwrap(), Value::Integer(42));
        assert_eq!(parse_cell("42.0", AGE, 0).unwrap(), Value::Integer(42));
        assert_eq!(parse_cell("0.25", CONVERSION_RATE, 0).unwrap(), Value::Float(0.25));
        assert_eq!(parse_cell("7", INCOME, 0).unwrap(), Value::Float(7.0));
        assert_eq!(parse_cell("", GENDER, 0).unwrap(), Value::Null);
        assert_eq!(parse_cell("Female", GENDER, 0).unwrap(), Value::Text("Female".into()));

        let err = parse_cell("forty", AGE, 3).unwrap_err();
        assert!(matches!(err, DataError::Parse { row: 3, .. }));
        assert!(parse_cell("inf", AD_SPEND, 0).is_err());
    }

    #[test]
    fn na_tokens_are_null_in_every_column() {
        for token in ["NA", "NaN", "nan", "N/A", "null", "None", "#N/A", " <NA> "] {
            assert_eq!(parse_cell(token, AD_SPEND, 0).unwrap(), Value::Null, "{token}");
            assert_eq!(parse_cell(token, GENDER, 0).unwrap(), Value::Null, "{token}");
            assert_eq!(parse_cell(token, AGE, 0).unwrap(), Value::Null, "{token}");
        }
        // Only exact tokens count; a real category that merely contains one stays.
        assert_eq!(parse_cell("NAB", GENDER, 0).unwrap(), Value::Text("NAB".into()));
    }

    #[test]
    fn negative_zero_folds_into_zero() {
        let parsed = parse_cell("-0.0", AD_SPEND, 0).unwrap();
        assert_eq!(parsed, Value::Float(0.0));
        assert_eq!(coerce(Value::Float(-0.0), CONVERSION_RATE, 0).unwrap(), Value::Float(0.0));
        assert_eq!(parse_cell("-0.0", "Mystery", 0).unwrap(), Value::Float(0.0));
        let Value::Float(v) = parsed else { unreachable!() };
        assert!(v.is_sign_positive());
    }

    #[test]
    fn coerce_nan_float_is_null() {
        assert_eq!(coerce(Value::Float(f64::NAN), INCOME, 0).unwrap(), Value::Null);
    }

    #[test]
    fn unknown_columns_are_guessed() {
        assert_eq!(parse_cell("8000", "CustomerID", 0).unwrap(), Value::Integer(8000));
        assert_eq!(parse_cell("IsConfid", "Mystery", 0).unwrap(), Value::Text("IsConfid".into()));
    }

    #[test]
    fn coerce_aligns_json_numbers() {
        assert_eq!(coerce(Value::Float(30.0), AGE, 0).unwrap(), Value::Integer(30));
        assert_eq!(coerce(Value::Integer(5), INCOME, 0).unwrap(), Value::Float(5.0));
        assert!(coerce(Value::Float(30.5), AGE, 0).is_err());
        assert_eq!(coerce(Value::Integer(1), GENDER, 0).unwrap(), Value::Text("1".into()));
    }
}
