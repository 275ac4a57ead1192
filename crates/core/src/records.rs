//! Row types for the five schema tables.
//!
//! These mirror the database schema column for column. Primary keys come from
//! the fixture file verbatim; the store never generates them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Represents a row in the `publisher` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Publisher {
    /// Fixture-supplied primary key.
    pub id: i64,
    /// Publisher name, unique across the table.
    pub name: String,
}

/// Represents a row in the `book` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Book {
    /// Fixture-supplied primary key.
    pub id: i64,
    /// Book title, unique across the table.
    pub title: String,
    /// Owning publisher.
    pub id_publisher: i64,
}

/// Represents a row in the `shop` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Shop {
    /// Fixture-supplied primary key.
    pub id: i64,
    /// Shop name, unique across the table.
    pub name: String,
}

/// Represents a row in the `stock` table: "this shop carries this book".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Stock {
    /// Fixture-supplied primary key.
    pub id: i64,
    /// Book carried by the shop.
    pub id_book: i64,
    /// Shop carrying the book.
    pub id_shop: i64,
    /// Quantity on hand.
    pub count: i64,
}

/// Represents a row in the `sale` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Sale {
    /// Fixture-supplied primary key.
    pub id: i64,
    /// Sale price, kept as decimal-as-text.
    pub price: String,
    /// Moment of sale.
    pub date_sale: DateTime<Utc>,
    /// Stock row the sale drew from.
    pub id_stock: i64,
    /// Quantity sold.
    pub count: i64,
}

/// One row of the publisher sales report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleReportRow {
    /// Title of the sold book.
    pub title: String,
    /// Name of the shop that sold it.
    pub shop: String,
    /// Sale price, decimal-as-text.
    pub price: String,
    /// Moment of sale.
    pub sold_at: DateTime<Utc>,
}

impl SaleReportRow {
    /// Render the pipe-delimited report line.
    ///
    /// Sub-second precision is truncated to zero.
    pub fn report_line(&self) -> String {
        format!(
            "{} | {} | {} | {}",
            self.title,
            self.shop,
            self.price,
            self.sold_at.format("%Y-%m-%d %H:%M:%S")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_report_line_format() {
        let row = SaleReportRow {
            title: "Go Deep".into(),
            shop: "Corner Store".into(),
            price: "9.99".into(),
            sold_at: Utc.with_ymd_and_hms(2020, 1, 1, 10, 0, 0).unwrap(),
        };
        assert_eq!(
            row.report_line(),
            "Go Deep | Corner Store | 9.99 | 2020-01-01 10:00:00"
        );
    }

    #[test]
    fn test_report_line_truncates_subseconds() {
        let sold_at = Utc
            .with_ymd_and_hms(2022, 11, 5, 14, 30, 59)
            .unwrap()
            .checked_add_signed(chrono::Duration::microseconds(987_654))
            .unwrap();
        let row = SaleReportRow {
            title: "Carry On".into(),
            shop: "Main Street Books".into(),
            price: "120.50".into(),
            sold_at,
        };
        assert_eq!(
            row.report_line(),
            "Carry On | Main Street Books | 120.50 | 2022-11-05 14:30:59"
        );
    }
}
