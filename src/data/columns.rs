//! Typed readers over polars columns.
//!
//! Every reader returns one `Option` per row so that row positions stay
//! aligned with the source frame.

use polars::prelude::{DataFrame, DataType, Series};

use crate::error::{AnalysisError, Result};

pub(crate) fn column<'a>(frame: &'a DataFrame, name: &str) -> Result<&'a Series> {
    frame
        .column(name)
        .map_err(|_| AnalysisError::MissingColumn(name.to_string()))
}

/// Read a continuous column, mapping nulls, `NaN` and the missing sentinel to `None`.
///
/// String columns must hold numbers or the sentinel. For numeric columns a
/// sentinel that parses as a number (for example `-999`) marks matching cells.
pub fn continuous_values(frame: &DataFrame, name: &str, missing: &str) -> Result<Vec<Option<f64>>> {
    let series = column(frame, name)?;
    match series.dtype() {
        DataType::String => series
            .str()?
            .into_iter()
            .map(|cell| match cell.map(str::trim) {
                None => Ok(None),
                Some(raw) if raw == missing || raw.is_empty() => Ok(None),
                Some(raw) => raw
                    .parse::<f64>()
                    .map(|value| Some(value).filter(|v| !v.is_nan()))
                    .map_err(|_| AnalysisError::NonNumeric {
                        column: name.to_string(),
                        value: raw.to_string(),
                    }),
            })
            .collect(),
        dtype if dtype.is_numeric() => {
            let sentinel = missing.trim().parse::<f64>().ok();
            let floats = series.cast(&DataType::Float64)?;
            let values = floats
                .f64()?
                .into_iter()
                .map(|cell| cell.filter(|value| !value.is_nan() && Some(*value) != sentinel))
                .collect();
            Ok(values)
        }
        other => Err(AnalysisError::NonNumeric {
            column: name.to_string(),
            value: format!("<{other}>"),
        }),
    }
}

/// Flag each row as case (`true`) or non-case (`false`); null outcomes stay `None`.
///
/// Numeric outcomes are compared numerically with `case_value`, boolean ones
/// against `true`/`1`, anything else by trimmed string equality.
pub fn case_indicator(frame: &DataFrame, name: &str, case_value: &str) -> Result<Vec<Option<bool>>> {
    let series = column(frame, name)?;
    let wanted = case_value.trim();
    match series.dtype() {
        DataType::Boolean => {
            let flag = matches!(wanted.to_ascii_lowercase().as_str(), "1" | "true");
            Ok(series
                .bool()?
                .into_iter()
                .map(|cell| cell.map(|value| value == flag))
                .collect())
        }
        dtype if dtype.is_numeric() => {
            let target = wanted
                .parse::<f64>()
                .map_err(|_| AnalysisError::NonNumeric {
                    column: name.to_string(),
                    value: wanted.to_string(),
                })?;
            let floats = series.cast(&DataType::Float64)?;
            let flags = floats
                .f64()?
                .into_iter()
                .map(|cell| cell.filter(|value| !value.is_nan()).map(|value| value == target))
                .collect();
            Ok(flags)
        }
        _ => {
            let strings = series.cast(&DataType::String)?;
            let flags = strings
                .str()?
                .into_iter()
                .map(|cell| cell.map(|value| value.trim() == wanted))
                .collect();
            Ok(flags)
        }
    }
}

/// Read an ordinal category column as nullable integers.
pub fn category_labels(frame: &DataFrame, name: &str) -> Result<Vec<Option<i64>>> {
    let labels = column(frame, name)?.cast(&DataType::Int64)?;
    let values = labels.i64()?.into_iter().collect();
    Ok(values)
}
