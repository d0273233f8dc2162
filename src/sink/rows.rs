use super::schema::{SqlType, TablePlan};
use crate::error::Result;
use chrono::NaiveDate;
use polars::prelude::*;

/// One typed cell ready to bind. `None` is SQL NULL of that type.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Boolean(Option<bool>),
    Integer(Option<i64>),
    Double(Option<f64>),
    Date(Option<NaiveDate>),
    Text(Option<String>),
}

fn column_values(column: &Column, sql_type: SqlType) -> Result<Vec<SqlValue>> {
    let values: Vec<SqlValue> = match sql_type {
        SqlType::Boolean => column.bool()?.into_iter().map(SqlValue::Boolean).collect(),
        SqlType::Integer => {
            // u64 values past i64::MAX fail here instead of turning into nulls
            let cast = column.strict_cast(&DataType::Int64)?;
            cast.i64()?.into_iter().map(SqlValue::Integer).collect()
        }
        SqlType::Double => {
            let cast = column.cast(&DataType::Float64)?;
            cast.f64()?.into_iter().map(SqlValue::Double).collect()
        }
        SqlType::Date => column.date()?.as_date_iter().map(SqlValue::Date).collect(),
        SqlType::Text => {
            let cast = column.cast(&DataType::String)?;
            cast.str()?
                .into_iter()
                .map(|v| SqlValue::Text(v.map(str::to_string)))
                .collect()
        }
    };
    Ok(values)
}

/// Row-major cells of `df` in frame order, typed per `plan`
pub fn frame_rows(df: &DataFrame, plan: &TablePlan) -> Result<Vec<Vec<SqlValue>>> {
    let mut rows: Vec<Vec<SqlValue>> = (0..df.height())
        .map(|_| Vec::with_capacity(plan.columns.len()))
        .collect();

    for col in &plan.columns {
        let values = column_values(df.column(&col.name)?, col.sql_type)?;
        for (row, value) in rows.iter_mut().zip(values) {
            row.push(value);
        }
    }

    Ok(rows)
}
