//! PostgreSQL article store
//!
//! Opens one `PgConnection` per batch, no pool. Values always travel as text;
//! columns whose type is not a string type get an explicit cast, so DATE,
//! array and numeric columns accept the loose record values.

use super::{ArticleRecord, ArticleStore, StoreError, ARTICLE_COLUMNS, ARTICLE_TABLE};
use async_trait::async_trait;
use sqlx::{Connection, PgConnection};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Non-string columns of a table with their `format_type` rendering
const COLUMN_CASTS_SQL: &str = r#"
    SELECT a.attname::text, format_type(a.atttypid, a.atttypmod)
    FROM pg_attribute a
    JOIN pg_type t ON t.oid = a.atttypid
    WHERE a.attrelid = to_regclass($1)
      AND a.attnum > 0
      AND NOT a.attisdropped
      AND t.typcategory <> 'S'
"#;

/// Positional INSERT over `ARTICLE_COLUMNS`.
///
/// Columns named in `casts` read their parameter as `$n::text::<type>`. The
/// rest bind plainly, which keeps length checks on VARCHAR columns.
fn build_insert_sql(casts: &HashMap<String, String>) -> String {
    let placeholders: Vec<String> = ARTICLE_COLUMNS
        .iter()
        .enumerate()
        .map(|(index, column)| match casts.get(*column) {
            Some(column_type) => format!("${}::text::{column_type}", index + 1),
            None => format!("${}", index + 1),
        })
        .collect();

    format!(
        "INSERT INTO {ARTICLE_TABLE} ({}) VALUES ({})",
        ARTICLE_COLUMNS.join(", "),
        placeholders.join(", ")
    )
}

/// `ArticleStore` backed by a fresh PostgreSQL connection per batch
#[derive(Debug, Clone, Copy, Default)]
pub struct PgArticleStore;

impl PgArticleStore {
    pub fn new() -> Self {
        Self
    }

    async fn column_casts(
        conn: &mut PgConnection,
    ) -> Result<HashMap<String, String>, sqlx::Error> {
        let rows: Vec<(String, String)> = sqlx::query_as(COLUMN_CASTS_SQL)
            .bind(ARTICLE_TABLE)
            .fetch_all(conn)
            .await?;
        Ok(rows.into_iter().collect())
    }

    async fn insert_in_transaction(
        conn: &mut PgConnection,
        articles: &[ArticleRecord],
    ) -> Result<u64, sqlx::Error> {
        let mut tx = conn.begin().await?;

        let insert_sql = match Self::column_casts(&mut tx).await {
            Ok(casts) => build_insert_sql(&casts),
            Err(e) => {
                if let Err(rollback_error) = tx.rollback().await {
                    warn!(error = %rollback_error, "Rollback failed");
                }
                return Err(e);
            }
        };
        debug!(sql = %insert_sql, "Prepared article insert");

        for (index, article) in articles.iter().enumerate() {
            let mut query = sqlx::query(&insert_sql);
            for value in article.column_values() {
                query = query.bind(value);
            }

            let outcome = query.execute(&mut *tx).await;
            if let Err(e) = outcome {
                debug!(index, "Insert failed, rolling back");
                if let Err(rollback_error) = tx.rollback().await {
                    warn!(error = %rollback_error, "Rollback failed");
                }
                return Err(e);
            }
        }

        tx.commit().await?;
        Ok(articles.len() as u64)
    }
}

#[async_trait]
impl ArticleStore for PgArticleStore {
    async fn insert_batch(
        &self,
        database_url: &str,
        articles: &[ArticleRecord],
    ) -> Result<u64, StoreError> {
        let mut conn = PgConnection::connect(database_url).await?;

        let result = Self::insert_in_transaction(&mut conn, articles).await;

        // Release the connection on every path; a close failure after commit
        // does not undo the commit.
        if let Err(e) = conn.close().await {
            warn!(error = %e, "Failed to close database connection");
        }

        Ok(result?)
    }
}
