use super::{
    rows::{frame_rows, SqlValue},
    schema::TablePlan,
    target::{DatabaseTarget, Dialect},
};
use crate::error::Result;
use chrono::NaiveDate;
use polars::prelude::DataFrame;
use sqlx::{
    postgres::{PgPool, PgPoolOptions},
    query_builder::Separated,
    sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions},
    Database, Encode, Postgres, QueryBuilder, Sqlite, Type,
};
use std::str::FromStr;

/// Database handle the loader writes through. One connection is enough.
pub enum SqlSink {
    Postgres(PgPool),
    Sqlite(SqlitePool),
}

impl SqlSink {
    pub async fn connect(target: &DatabaseTarget) -> Result<Self> {
        log::info!("connecting to {}", target.redacted());
        let sink = match target.dialect {
            Dialect::Postgres => {
                let pool = PgPoolOptions::new()
                    .max_connections(1)
                    .connect(&target.url)
                    .await?;
                Self::Postgres(pool)
            }
            Dialect::Sqlite => {
                let options = SqliteConnectOptions::from_str(&target.url)?.create_if_missing(true);
                let pool = SqlitePoolOptions::new()
                    .max_connections(1)
                    .connect_with(options)
                    .await?;
                Self::Sqlite(pool)
            }
        };
        Ok(sink)
    }

    pub fn dialect(&self) -> Dialect {
        match self {
            Self::Postgres(_) => Dialect::Postgres,
            Self::Sqlite(_) => Dialect::Sqlite,
        }
    }

    /// Drop `table` if it exists, recreate it from the frame's schema and
    /// insert every row in frame order, all inside one transaction.
    /// Returns the number of rows inserted.
    pub async fn replace_table(&self, table: &str, df: &DataFrame, batch_size: usize) -> Result<u64> {
        let plan = TablePlan::from_frame(table, df)?;
        let rows = frame_rows(df, &plan)?;
        let per_batch = plan.rows_per_batch(self.dialect(), batch_size);
        log::debug!(
            "replacing {} with {} rows, {} rows per insert",
            table,
            rows.len(),
            per_batch
        );

        let written = match self {
            Self::Postgres(pool) => replace_postgres(pool, &plan, rows, per_batch).await?,
            Self::Sqlite(pool) => replace_sqlite(pool, &plan, rows, per_batch).await?,
        };

        log::info!("replaced table {} with {} rows", table, written);
        Ok(written)
    }

    pub async fn close(self) {
        match self {
            Self::Postgres(pool) => pool.close().await,
            Self::Sqlite(pool) => pool.close().await,
        }
    }
}

async fn replace_postgres(
    pool: &PgPool,
    plan: &TablePlan,
    rows: Vec<Vec<SqlValue>>,
    per_batch: usize,
) -> Result<u64> {
    let mut tx = pool.begin().await?;
    sqlx::query(&plan.drop_sql()).execute(&mut *tx).await?;
    sqlx::query(&plan.create_sql(Dialect::Postgres))
        .execute(&mut *tx)
        .await?;

    let mut written = 0;
    let mut rows = rows.into_iter();
    loop {
        let batch: Vec<Vec<SqlValue>> = rows.by_ref().take(per_batch).collect();
        if batch.is_empty() {
            break;
        }
        let mut insert = QueryBuilder::<Postgres>::new(plan.insert_prefix());
        insert.push_values(batch, |mut row, values| {
            for value in values {
                push_value(&mut row, value);
            }
        });
        written += insert.build().execute(&mut *tx).await?.rows_affected();
    }

    tx.commit().await?;
    Ok(written)
}

async fn replace_sqlite(
    pool: &SqlitePool,
    plan: &TablePlan,
    rows: Vec<Vec<SqlValue>>,
    per_batch: usize,
) -> Result<u64> {
    let mut tx = pool.begin().await?;
    sqlx::query(&plan.drop_sql()).execute(&mut *tx).await?;
    sqlx::query(&plan.create_sql(Dialect::Sqlite))
        .execute(&mut *tx)
        .await?;

    let mut written = 0;
    let mut rows = rows.into_iter();
    loop {
        let batch: Vec<Vec<SqlValue>> = rows.by_ref().take(per_batch).collect();
        if batch.is_empty() {
            break;
        }
        let mut insert = QueryBuilder::<Sqlite>::new(plan.insert_prefix());
        insert.push_values(batch, |mut row, values| {
            for value in values {
                push_value(&mut row, value);
            }
        });
        written += insert.build().execute(&mut *tx).await?.rows_affected();
    }

    tx.commit().await?;
    Ok(written)
}

fn push_value<'args, DB>(row: &mut Separated<'_, 'args, DB, &'static str>, value: SqlValue)
where
    DB: Database,
    Option<bool>: Encode<'args, DB> + Type<DB>,
    Option<i64>: Encode<'args, DB> + Type<DB>,
    Option<f64>: Encode<'args, DB> + Type<DB>,
    Option<NaiveDate>: Encode<'args, DB> + Type<DB>,
    Option<String>: Encode<'args, DB> + Type<DB>,
{
    match value {
        SqlValue::Boolean(v) => {
            row.push_bind(v);
        }
        SqlValue::Integer(v) => {
            row.push_bind(v);
        }
        SqlValue::Double(v) => {
            row.push_bind(v);
        }
        SqlValue::Date(v) => {
            row.push_bind(v);
        }
        SqlValue::Text(v) => {
            row.push_bind(v);
        }
    }
}
