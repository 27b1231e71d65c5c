//! PostgreSQL Table Store

use std::collections::BTreeSet;

use sqlx::{PgConnection, PgPool, Postgres, QueryBuilder};

use crate::domain::row::{PreparedRow, Record, prepare_row};
use crate::domain::store::TableStore;
use crate::domain::table::{TableHandle, TableName, infer_columns, quote_identifier};
use crate::error::RecordsResult;

/// Width of every inferred column
pub const INFERRED_COLUMN_TYPE: &str = "VARCHAR(256)";

/// PostgreSQL-backed dynamic tables
#[derive(Clone)]
pub struct PgTableStore {
    pool: PgPool,
}

impl PgTableStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Round-trip a trivial query
    pub async fn check_connection(&self) -> RecordsResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn table_columns(&self, name: &TableName) -> RecordsResult<BTreeSet<String>> {
        let rows: Vec<(String,)> = sqlx::query_as(
            r#"
            SELECT column_name::TEXT
            FROM information_schema.columns
            WHERE table_schema = current_schema() AND table_name = $1
            "#,
        )
        .bind(name.as_str())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|(c,)| c).collect())
    }
}

impl TableStore for PgTableStore {
    async fn ensure_table(&self, name: &TableName, sample: &[Record]) -> RecordsResult<TableHandle> {
        let columns = infer_columns(name, sample);

        sqlx::query(&create_table_sql(name, &columns))
            .execute(&self.pool)
            .await
            .inspect_err(|e| tracing::error!(table = %name, error = %e, "Failed to create table"))?;

        let columns = self.table_columns(name).await?;

        tracing::debug!(table = %name, columns = columns.len(), "Table ready");

        Ok(TableHandle {
            name: name.clone(),
            columns,
        })
    }

    async fn bulk_upsert(&self, table: &TableHandle, records: &[Record]) -> RecordsResult<u64> {
        if records.is_empty() {
            return Ok(0);
        }

        tracing::info!(table = %table.name, records = records.len(), "Saving records");

        let mut tx = self.pool.begin().await?;
        let mut written = 0u64;
        // Rows written with an explicit id do not advance the id sequence
        let mut sequence_behind = false;

        for record in records {
            let row = prepare_row(table, record);
            if !row.dropped.is_empty() {
                tracing::warn!(
                    table = %table.name,
                    dropped = ?row.dropped,
                    "Skipping keys with no matching column"
                );
            }

            let mut result = Ok(());
            if row.id.is_none() && sequence_behind {
                result = sync_id_sequence(&mut *tx, &table.name).await;
                sequence_behind = false;
            }
            if result.is_ok() {
                result = build_write(&table.name, &row)
                    .build()
                    .execute(&mut *tx)
                    .await
                    .map(|done| written += done.rows_affected());
                sequence_behind |= row.id.is_some();
            }

            if let Err(e) = result {
                tracing::error!(table = %table.name, error = %e, "Record batch failed, rolling back");
                // Explicit so the rollback happens before the error surfaces
                tx.rollback().await?;
                return Err(e.into());
            }
        }

        if sequence_behind && let Err(e) = sync_id_sequence(&mut *tx, &table.name).await {
            tracing::error!(table = %table.name, error = %e, "Id sequence sync failed, rolling back");
            tx.rollback().await?;
            return Err(e.into());
        }

        tx.commit().await?;

        tracing::info!(table = %table.name, rows = written, "Records saved");

        Ok(written)
    }
}

/// `CREATE TABLE IF NOT EXISTS` with the fixed columns plus `columns`
///
/// `columns` must already be valid identifiers.
fn create_table_sql(name: &TableName, columns: &[String]) -> String {
    let mut sql = format!(
        "CREATE TABLE IF NOT EXISTS {} (\
         id BIGSERIAL PRIMARY KEY, \
         created_at TIMESTAMPTZ NOT NULL DEFAULT now(), \
         updated_at TIMESTAMPTZ NOT NULL DEFAULT now()",
        name.quoted()
    );
    for column in columns {
        sql.push_str(&format!(", {} {} NULL", quote_identifier(column), INFERRED_COLUMN_TYPE));
    }
    sql.push(')');
    sql
}

/// Move the `id` sequence past the largest stored id
///
/// `$1` is the quoted table name.
fn sync_id_sequence_sql(table: &TableName) -> String {
    format!(
        "SELECT setval(pg_get_serial_sequence($1, 'id'), COALESCE(MAX(\"id\"), 0) + 1, false) \
         FROM {}",
        table.quoted()
    )
}

async fn sync_id_sequence(conn: &mut PgConnection, table: &TableName) -> Result<(), sqlx::Error> {
    sqlx::query(&sync_id_sequence_sql(table))
        .bind(table.quoted())
        .execute(conn)
        .await?;
    Ok(())
}

/// INSERT for rows without an id, INSERT .. ON CONFLICT (id) for rows with one
fn build_write(table: &TableName, row: &PreparedRow) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!("INSERT INTO {} ", table.quoted()));

    if row.id.is_none() && row.values.is_empty() {
        qb.push("DEFAULT VALUES");
        return qb;
    }

    let mut names = Vec::with_capacity(row.values.len() + 1);
    if row.id.is_some() {
        names.push("\"id\"".to_string());
    }
    names.extend(row.values.iter().map(|(c, _)| quote_identifier(c)));
    qb.push(format!("({}) VALUES (", names.join(", ")));

    let mut values = qb.separated(", ");
    if let Some(id) = row.id {
        values.push_bind(id.get());
    }
    for (_, value) in &row.values {
        values.push_bind(value.clone());
    }
    values.push_unseparated(")");

    if row.id.is_some() {
        qb.push(" ON CONFLICT (\"id\") DO UPDATE SET ");
        let mut set = qb.separated(", ");
        for (column, _) in &row.values {
            let column = quote_identifier(column);
            set.push(format!("{column} = EXCLUDED.{column}"));
        }
        set.push("updated_at = now()");
    }

    qb
}

#[cfg(test)]
mod tests {
    use super::*;
    use kernel::id::RecordId;

    fn name() -> TableName {
        TableName::new("items").unwrap()
    }

    fn row(id: Option<i64>, values: &[(&str, Option<&str>)]) -> PreparedRow {
        PreparedRow {
            id: id.map(RecordId::new),
            values: values
                .iter()
                .map(|(c, v)| (c.to_string(), v.map(str::to_string)))
                .collect(),
            dropped: Vec::new(),
        }
    }

    #[test]
    fn test_create_table_sql() {
        let sql = create_table_sql(&name(), &["name".to_string(), "price".to_string()]);
        assert_eq!(
            sql,
            "CREATE TABLE IF NOT EXISTS \"items\" (id BIGSERIAL PRIMARY KEY, \
             created_at TIMESTAMPTZ NOT NULL DEFAULT now(), \
             updated_at TIMESTAMPTZ NOT NULL DEFAULT now(), \
             \"name\" VARCHAR(256) NULL, \"price\" VARCHAR(256) NULL)"
        );
    }

    #[test]
    fn test_create_table_sql_without_data_columns() {
        let sql = create_table_sql(&name(), &[]);
        assert!(sql.ends_with("updated_at TIMESTAMPTZ NOT NULL DEFAULT now())"));
    }

    #[test]
    fn test_plain_insert() {
        let qb = build_write(&name(), &row(None, &[("name", Some("a")), ("price", None)]));
        assert_eq!(
            qb.sql(),
            "INSERT INTO \"items\" (\"name\", \"price\") VALUES ($1, $2)"
        );
    }

    #[test]
    fn test_upsert_on_id() {
        let qb = build_write(&name(), &row(Some(3), &[("name", Some("a"))]));
        assert_eq!(
            qb.sql(),
            "INSERT INTO \"items\" (\"id\", \"name\") VALUES ($1, $2) \
             ON CONFLICT (\"id\") DO UPDATE SET \"name\" = EXCLUDED.\"name\", updated_at = now()"
        );
    }

    #[test]
    fn test_upsert_id_only_touches_timestamp() {
        let qb = build_write(&name(), &row(Some(3), &[]));
        assert_eq!(
            qb.sql(),
            "INSERT INTO \"items\" (\"id\") VALUES ($1) \
             ON CONFLICT (\"id\") DO UPDATE SET updated_at = now()"
        );
    }

    #[test]
    fn test_sync_id_sequence_sql() {
        assert_eq!(
            sync_id_sequence_sql(&name()),
            "SELECT setval(pg_get_serial_sequence($1, 'id'), COALESCE(MAX(\"id\"), 0) + 1, false) \
             FROM \"items\""
        );
    }

    #[test]
    fn test_empty_row_uses_defaults() {
        let qb = build_write(&name(), &row(None, &[]));
        assert_eq!(qb.sql(), "INSERT INTO \"items\" DEFAULT VALUES");
    }
}
