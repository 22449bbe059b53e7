//! The transaction record, the core type of the application.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::{OffsetDateTime, UtcOffset};

use crate::{
    database_id::TransactionId,
    db::{CreateTable, MapRow},
};

/// A product sale listing, sold or not.
///
/// To create a new `Transaction`, use [Transaction::build] and insert the
/// resulting builder into a [TransactionStore](crate::stores::TransactionStore).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// The ID assigned by the store.
    pub id: TransactionId,
    /// The product title.
    pub title: String,
    /// The product description.
    pub description: String,
    /// The product category, free text.
    pub category: String,
    /// The listed price, never negative.
    pub price: f64,
    /// Whether the product has been sold.
    pub sold: bool,
    /// When the product was sold, in UTC.
    #[serde(with = "time::serde::rfc3339")]
    pub date_of_sale: OffsetDateTime,
    /// An image URL for the product.
    pub image: Option<String>,
    /// When the record was inserted.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// When the record was last modified.
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [TransactionBuilder::new] for discoverability.
    pub fn build(title: &str, price: f64, date_of_sale: OffsetDateTime) -> TransactionBuilder {
        TransactionBuilder::new(title, price, date_of_sale)
    }
}

/// The fields of a transaction that has not been inserted yet.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionBuilder {
    /// The product title.
    pub title: String,
    /// The product description.
    pub description: String,
    /// The product category.
    pub category: String,
    /// The listed price.
    pub price: f64,
    /// Whether the product has been sold.
    pub sold: bool,
    /// When the product was sold.
    pub date_of_sale: OffsetDateTime,
    /// An image URL for the product.
    pub image: Option<String>,
}

impl TransactionBuilder {
    /// Create a builder for an unsold transaction with an empty description and category.
    pub fn new(title: &str, price: f64, date_of_sale: OffsetDateTime) -> Self {
        Self {
            title: title.to_owned(),
            description: String::new(),
            category: String::new(),
            price,
            sold: false,
            date_of_sale,
            image: None,
        }
    }

    /// Set the description.
    pub fn description(mut self, description: &str) -> Self {
        self.description = description.to_owned();
        self
    }

    /// Set the category.
    pub fn category(mut self, category: &str) -> Self {
        self.category = category.to_owned();
        self
    }

    /// Set whether the product has been sold.
    pub fn sold(mut self, sold: bool) -> Self {
        self.sold = sold;
        self
    }

    /// Set the image URL.
    pub fn image(mut self, image: Option<&str>) -> Self {
        self.image = image.map(str::to_owned);
        self
    }

    /// Trim the text fields and convert the sale date to UTC, as stored.
    pub(crate) fn normalized(self) -> Self {
        Self {
            title: self.title.trim().to_owned(),
            description: self.description.trim().to_owned(),
            category: self.category.trim().to_owned(),
            date_of_sale: self.date_of_sale.to_offset(UtcOffset::UTC),
            image: self.image.map(|image| image.trim().to_owned()),
            ..self
        }
    }
}

impl CreateTable for Transaction {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY,
                title TEXT NOT NULL,
                description TEXT NOT NULL,
                category TEXT NOT NULL,
                price REAL NOT NULL CHECK (price >= 0),
                sold INTEGER NOT NULL DEFAULT 0,
                date_of_sale TEXT NOT NULL,
                image TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
                )",
            (),
        )?;

        // Used by the pie chart's group by category.
        connection.execute(
            "CREATE INDEX IF NOT EXISTS idx_transaction_category ON \"transaction\"(category)",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for Transaction {
    type ReturnType = Self;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            id: row.get(offset)?,
            title: row.get(offset + 1)?,
            description: row.get(offset + 2)?,
            category: row.get(offset + 3)?,
            price: row.get(offset + 4)?,
            sold: row.get(offset + 5)?,
            date_of_sale: row.get(offset + 6)?,
            image: row.get(offset + 7)?,
            created_at: row.get(offset + 8)?,
            updated_at: row.get(offset + 9)?,
        })
    }
}
