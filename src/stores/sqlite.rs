//! Implements a SQLite backed transaction store.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::{Connection, params_from_iter, types::Value as SqlValue};
use time::OffsetDateTime;

use crate::{
    Error,
    db::MapRow,
    transaction::{Transaction, TransactionBuilder},
};

use super::{
    Aggregation, Field, Filter, Group, GroupKey, RowsAffected, TransactionStore, Value,
};

const COLUMNS: &str = "id, title, description, category, price, sold, date_of_sale, image, \
    created_at, updated_at";

/// The price as text, without a fractional part for whole prices.
const PRICE_TEXT: &str = "CASE WHEN price = CAST(price AS INTEGER) \
    THEN CAST(CAST(price AS INTEGER) AS TEXT) ELSE CAST(price AS TEXT) END";

/// Stores transactions in a SQLite database.
///
/// The database must have been set up with [initialize_db](crate::initialize_db).
/// Queries run on tokio's blocking thread pool.
#[derive(Debug, Clone)]
pub struct SQLiteTransactionStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteTransactionStore {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }

    /// Run `operation` with exclusive access to the connection on the blocking thread pool.
    async fn with_connection<T, F>(&self, operation: F) -> Result<T, Error>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> Result<T, Error> + Send + 'static,
    {
        let connection = self.connection.clone();

        tokio::task::spawn_blocking(move || {
            let mut connection = connection
                .lock()
                .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
                .map_err(|_| Error::DatabaseLockError)?;

            operation(&mut *connection)
        })
        .await
        .map_err(|error| Error::BlockingTaskFailed(error.to_string()))?
    }
}

#[async_trait]
impl TransactionStore for SQLiteTransactionStore {
    async fn find(
        &self,
        filter: &Filter,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<Transaction>, Error> {
        let filter = filter.clone();

        self.with_connection(move |connection| {
            let mut params = Vec::new();
            let where_clause = to_sql(&filter, &mut params);
            let query = format!(
                "SELECT {COLUMNS} FROM \"transaction\" WHERE {where_clause} \
                ORDER BY id ASC LIMIT ?{} OFFSET ?{}",
                params.len() + 1,
                params.len() + 2
            );
            params.push(SqlValue::Integer(to_sql_integer(limit)));
            params.push(SqlValue::Integer(to_sql_integer(skip)));

            connection
                .prepare(&query)?
                .query_map(params_from_iter(params.iter()), Transaction::map_row)?
                .map(|maybe_transaction| maybe_transaction.map_err(Error::from))
                .collect()
        })
        .await
    }

    async fn count(&self, filter: &Filter) -> Result<u64, Error> {
        let filter = filter.clone();

        self.with_connection(move |connection| {
            let mut params = Vec::new();
            let where_clause = to_sql(&filter, &mut params);
            let query = format!("SELECT COUNT(*) FROM \"transaction\" WHERE {where_clause}");

            let count: i64 =
                connection.query_row(&query, params_from_iter(params.iter()), |row| row.get(0))?;

            Ok(count.max(0) as u64)
        })
        .await
    }

    async fn aggregate(&self, aggregation: &Aggregation) -> Result<Vec<Group>, Error> {
        let aggregation = aggregation.clone();

        self.with_connection(move |connection| {
            let mut params = Vec::new();
            let key = group_key_to_sql(&aggregation.group_by, &mut params);
            let where_clause = to_sql(&aggregation.filter, &mut params);

            let mut query = format!(
                "SELECT {key}, COUNT(*), TOTAL(price) FROM \"transaction\" WHERE {where_clause}"
            );
            if aggregation.group_by != GroupKey::Nothing {
                query.push_str(" GROUP BY 1 ORDER BY 1");
            }

            connection
                .prepare(&query)?
                .query_map(params_from_iter(params.iter()), |row| {
                    let count: i64 = row.get(1)?;

                    Ok(Group {
                        key: row.get(0)?,
                        count: count.max(0) as u64,
                        price_sum: row.get(2)?,
                    })
                })?
                .map(|maybe_group| maybe_group.map_err(Error::from))
                .collect()
        })
        .await
    }

    async fn insert_many(&self, builders: Vec<TransactionBuilder>) -> Result<usize, Error> {
        self.with_connection(move |connection| {
            let now = OffsetDateTime::now_utc();
            let tx = connection.transaction()?;

            let mut inserted = 0;
            {
                let mut statement = tx.prepare(
                    "INSERT INTO \"transaction\" \
                    (title, description, category, price, sold, date_of_sale, image, created_at, updated_at) \
                    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                )?;

                for builder in builders {
                    let builder = builder.normalized();
                    inserted += statement.execute((
                        builder.title,
                        builder.description,
                        builder.category,
                        builder.price,
                        builder.sold,
                        builder.date_of_sale,
                        builder.image,
                        now,
                        now,
                    ))?;
                }
            }

            tx.commit()?;

            Ok(inserted)
        })
        .await
    }

    async fn delete_one(&self, filter: &Filter) -> Result<RowsAffected, Error> {
        let filter = filter.clone();

        self.with_connection(move |connection| {
            let mut params = Vec::new();
            let where_clause = to_sql(&filter, &mut params);
            let query = format!(
                "DELETE FROM \"transaction\" WHERE id = \
                (SELECT id FROM \"transaction\" WHERE {where_clause} ORDER BY id ASC LIMIT 1)"
            );

            connection
                .execute(&query, params_from_iter(params.iter()))
                .map_err(Error::from)
        })
        .await
    }
}

fn to_sql_integer(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// Translate `filter` into a SQL boolean expression, appending bound values to `params`.
///
/// Placeholders are numbered from `params.len() + 1`.
fn to_sql(filter: &Filter, params: &mut Vec<SqlValue>) -> String {
    match filter {
        Filter::All => "1".to_owned(),
        Filter::And(filters) if filters.is_empty() => "1".to_owned(),
        Filter::Or(filters) if filters.is_empty() => "0".to_owned(),
        Filter::And(filters) => join(filters, " AND ", params),
        Filter::Or(filters) => join(filters, " OR ", params),
        Filter::Equals(field, value) => {
            params.push(to_sql_value(value));
            format!("{} = ?{}", column(*field), params.len())
        }
        Filter::Contains(field, text) => {
            params.push(SqlValue::Text(text.clone()));
            format!(
                "instr(lower({}), lower(?{})) > 0",
                text_column(*field),
                params.len()
            )
        }
    }
}

fn join(filters: &[Filter], separator: &str, params: &mut Vec<SqlValue>) -> String {
    let parts: Vec<String> = filters
        .iter()
        .map(|filter| to_sql(filter, params))
        .collect();

    format!("({})", parts.join(separator))
}

fn column(field: Field) -> &'static str {
    match field {
        Field::Id => "id",
        Field::Title => "title",
        Field::Description => "description",
        Field::Price => "price",
        Field::Sold => "sold",
        Field::MonthOfSale => "CAST(strftime('%m', date_of_sale) AS INTEGER)",
    }
}

fn text_column(field: Field) -> String {
    match field {
        Field::Title | Field::Description => column(field).to_owned(),
        Field::Price => PRICE_TEXT.to_owned(),
        other => format!("CAST({} AS TEXT)", column(other)),
    }
}

fn to_sql_value(value: &Value) -> SqlValue {
    match value {
        Value::Integer(integer) => SqlValue::Integer(*integer),
        Value::Real(real) => SqlValue::Real(*real),
        Value::Bool(boolean) => SqlValue::Integer(i64::from(*boolean)),
    }
}

fn group_key_to_sql(group_by: &GroupKey, params: &mut Vec<SqlValue>) -> String {
    match group_by {
        GroupKey::Nothing => "NULL".to_owned(),
        GroupKey::Category => "category".to_owned(),
        GroupKey::PriceRange { ranges, otherwise } => {
            let mut case = String::from("CASE");

            for range in ranges.iter() {
                let lower = match range.above {
                    Some(above) => {
                        params.push(SqlValue::Real(above));
                        format!("price > ?{} AND ", params.len())
                    }
                    None => String::new(),
                };
                params.push(SqlValue::Real(range.up_to));
                let upper = params.len();
                params.push(SqlValue::Text(range.label.to_owned()));
                let label = params.len();

                case.push_str(&format!(" WHEN {lower}price <= ?{upper} THEN ?{label}"));
            }

            params.push(SqlValue::Text((*otherwise).to_owned()));
            case.push_str(&format!(" ELSE ?{} END", params.len()));

            case
        }
    }
}
