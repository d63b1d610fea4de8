//! DataFrame helpers: numeric coercion and conversion to ndarray

use crate::error::{PipelineError, Result};
use ndarray::Array2;
use polars::prelude::*;

/// Column names in frame order
pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names().iter().map(|s| s.to_string()).collect()
}

fn series_of<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Series> {
    df.column(name)
        .map(|c| c.as_materialized_series())
        .map_err(|_| {
            PipelineError::schema(format!("Column not found: {name}"), vec![name.to_string()])
        })
}

/// Strict coercion: every value must parse as a number and none may be missing
pub fn numeric_column(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
    let series = series_of(df, name)?;
    let cast = series.strict_cast(&DataType::Float64).map_err(|e| {
        PipelineError::CoercionFailure(format!("Column '{name}' is not numeric: {e}"))
    })?;
    let ca = cast.f64()?;

    let null_count = ca.null_count();
    if null_count > 0 {
        return Err(PipelineError::CoercionFailure(format!(
            "Column '{name}' has {null_count} missing values"
        )));
    }

    Ok(ca.into_iter().flatten().collect())
}

/// Lenient coercion: values that do not parse become `None`
pub fn lenient_numeric_column(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let series = series_of(df, name)?;
    let cast = series.cast(&DataType::Float64)?;
    Ok(cast.f64()?.into_iter().collect())
}

/// Extract named columns into a row-major `Array2<f64>`, in the given order
pub fn columns_to_array2(df: &DataFrame, col_names: &[String]) -> Result<Array2<f64>> {
    let n_rows = df.height();
    let n_cols = col_names.len();

    let col_data: Vec<Vec<f64>> = col_names
        .iter()
        .map(|name| numeric_column(df, name))
        .collect::<Result<Vec<_>>>()?;

    let col_refs: Vec<&[f64]> = col_data.iter().map(|c| c.as_slice()).collect();
    Ok(Array2::from_shape_fn((n_rows, n_cols), |(r, c)| col_refs[c][r]))
}

pub fn first_column_name(df: &DataFrame) -> Result<String> {
    column_names(df)
        .into_iter()
        .next()
        .ok_or_else(|| PipelineError::Data("frame has no columns".to_string()))
}

/// Select rows by position, keeping their order
pub fn take_rows(df: &DataFrame, indices: &[usize]) -> Result<DataFrame> {
    let idx: Vec<IdxSize> = indices.iter().map(|&i| i as IdxSize).collect();
    let idx = IdxCa::from_vec("idx".into(), idx);
    Ok(df.take(&idx)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_columns_to_array2_respects_order() {
        let df = df!(
            "a" => &[1.0, 2.0],
            "b" => &[10.0, 20.0]
        )
        .unwrap();

        let x = columns_to_array2(&df, &["b".to_string(), "a".to_string()]).unwrap();
        assert_eq!(x.shape(), &[2, 2]);
        assert_eq!(x[[0, 0]], 10.0);
        assert_eq!(x[[1, 1]], 2.0);
    }

    #[test]
    fn test_numeric_column_casts_integers() {
        let df = df!("a" => &[1i64, 2, 3]).unwrap();
        assert_eq!(numeric_column(&df, "a").unwrap(), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_numeric_column_rejects_text() {
        let df = df!("a" => &["1.0", "abc"]).unwrap();
        let err = numeric_column(&df, "a").unwrap_err();
        assert!(matches!(err, PipelineError::CoercionFailure(_)));
    }

    #[test]
    fn test_lenient_column_nulls_text() {
        let df = df!("a" => &["1.5", "abc", "3"]).unwrap();
        let values = lenient_numeric_column(&df, "a").unwrap();
        assert_eq!(values, vec![Some(1.5), None, Some(3.0)]);
    }

    #[test]
    fn test_missing_column_is_schema_violation() {
        let df = df!("a" => &[1.0]).unwrap();
        let err = numeric_column(&df, "zzz").unwrap_err();
        assert!(matches!(err, PipelineError::SchemaViolation { .. }));
    }

    #[test]
    fn test_take_rows() {
        let df = df!("a" => &[0.0, 1.0, 2.0, 3.0]).unwrap();
        let taken = take_rows(&df, &[3, 1]).unwrap();
        assert_eq!(numeric_column(&taken, "a").unwrap(), vec![3.0, 1.0]);
    }
}
