//! Shared entity fixtures and test connections.
#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use std::cell::RefCell;
use tablekit_core::{
    ColumnDescriptor, ColumnKind, DbError, DbResult, Dialect, Entity, ForeignKey, MappedRow,
    OrmResult, SchemaRegistry, SqlConnection, SqlRow, SqlValue, TableDescriptor, UniqueKey,
};

pub const SQLITE_SCHEMA: &str = "
CREATE TABLE users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    email TEXT NOT NULL UNIQUE
);
CREATE TABLE orders (
    id INTEGER PRIMARY KEY,
    user_id INTEGER NOT NULL REFERENCES users (id),
    amount TEXT NOT NULL,
    placed_on TEXT NOT NULL,
    shipped_at TEXT,
    gift INTEGER NOT NULL,
    code TEXT
);
CREATE TABLE tickets (
    id INTEGER PRIMARY KEY,
    priority INTEGER NOT NULL,
    level INTEGER NOT NULL,
    score REAL NOT NULL,
    ratio REAL NOT NULL,
    status TEXT NOT NULL,
    payload BLOB
);";

#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: Option<i64>,
    pub name: String,
    pub email: String,
}

impl User {
    pub fn new(id: Option<i64>, name: &str, email: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            email: email.to_string(),
        }
    }
}

impl Entity for User {
    fn column_value(&self, column: &str) -> Option<SqlValue> {
        match column {
            "id" => Some(self.id.into()),
            "name" => Some(self.name.as_str().into()),
            "email" => Some(self.email.as_str().into()),
            _ => None,
        }
    }

    fn from_row(row: &MappedRow) -> OrmResult<Self> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            email: row.get("email")?,
        })
    }
}

pub fn user_table() -> TableDescriptor {
    TableDescriptor::new("users")
        .column(ColumnDescriptor::new("id", ColumnKind::BigInt).auto_increment())
        .column(ColumnDescriptor::new("name", ColumnKind::Text).length(50).not_null())
        .column(ColumnDescriptor::new("email", ColumnKind::Text).length(100).not_null())
        .unique_key(UniqueKey::new(["email"]))
}

#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: i64,
    pub user_id: i64,
    pub amount: Decimal,
    pub placed_on: NaiveDate,
    pub shipped_at: Option<NaiveDateTime>,
    pub gift: bool,
    pub code: Option<char>,
}

impl Entity for Order {
    fn column_value(&self, column: &str) -> Option<SqlValue> {
        match column {
            "id" => Some(self.id.into()),
            "user_id" => Some(self.user_id.into()),
            "amount" => Some(self.amount.into()),
            "placed_on" => Some(self.placed_on.into()),
            "shipped_at" => Some(self.shipped_at.into()),
            "gift" => Some(self.gift.into()),
            "code" => Some(self.code.into()),
            _ => None,
        }
    }

    fn from_row(row: &MappedRow) -> OrmResult<Self> {
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            amount: row.get("amount")?,
            placed_on: row.get("placed_on")?,
            shipped_at: row.get("shipped_at")?,
            gift: row.get("gift")?,
            code: row.get("code")?,
        })
    }
}

pub fn order_table() -> TableDescriptor {
    TableDescriptor::new("orders")
        .column(ColumnDescriptor::new("id", ColumnKind::BigInt).primary_key())
        .column(ColumnDescriptor::new("user_id", ColumnKind::BigInt).not_null())
        .column(ColumnDescriptor::new("amount", ColumnKind::Decimal).not_null())
        .column(ColumnDescriptor::new("placed_on", ColumnKind::Date).not_null())
        .column(ColumnDescriptor::new("shipped_at", ColumnKind::DateTime))
        .column(ColumnDescriptor::new("gift", ColumnKind::Bool).not_null())
        .column(ColumnDescriptor::new("code", ColumnKind::Char).length(3))
        .check("amount >= 0")
        .check("gift in (0, 1)")
        .foreign_key(ForeignKey::to::<User, _, _>(["user_id"], ["id"]))
        .unique_key(UniqueKey::new(["user_id", "placed_on"]))
}

pub fn sample_order(id: i64, user_id: i64) -> Order {
    Order {
        id,
        user_id,
        amount: Decimal::new(1999, 2),
        placed_on: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
        shipped_at: NaiveDate::from_ymd_opt(2024, 5, 3)
            .unwrap()
            .and_hms_opt(10, 30, 0),
        gift: true,
        code: Some('X'),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketStatus {
    Open,
    Closed,
}

impl TicketStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "open" => Some(Self::Open),
            "closed" => Some(Self::Closed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ticket {
    pub id: i32,
    pub priority: i16,
    pub level: i8,
    pub score: f32,
    pub ratio: f64,
    pub status: TicketStatus,
    pub payload: Option<Vec<u8>>,
}

impl Entity for Ticket {
    fn column_value(&self, column: &str) -> Option<SqlValue> {
        match column {
            "id" => Some(self.id.into()),
            "priority" => Some(self.priority.into()),
            "level" => Some(self.level.into()),
            "score" => Some(self.score.into()),
            "ratio" => Some(self.ratio.into()),
            "status" => Some(self.status.as_str().into()),
            "payload" => Some(self.payload.clone().into()),
            _ => None,
        }
    }

    fn from_row(row: &MappedRow) -> OrmResult<Self> {
        Ok(Self {
            id: row.get("id")?,
            priority: row.get("priority")?,
            level: row.get("level")?,
            score: row.get("score")?,
            ratio: row.get("ratio")?,
            status: row.get_parsed("status", TicketStatus::parse)?,
            payload: row.get("payload")?,
        })
    }
}

pub fn ticket_table() -> TableDescriptor {
    TableDescriptor::new("tickets")
        .column(ColumnDescriptor::new("id", ColumnKind::Int).primary_key())
        .column(ColumnDescriptor::new("priority", ColumnKind::SmallInt).not_null())
        .column(ColumnDescriptor::new("level", ColumnKind::TinyInt).not_null())
        .column(ColumnDescriptor::new("score", ColumnKind::Float).not_null())
        .column(ColumnDescriptor::new("ratio", ColumnKind::Double).not_null())
        .column(ColumnDescriptor::new("status", ColumnKind::Enum).not_null())
        .column(ColumnDescriptor::new("payload", ColumnKind::Other("blob")))
}

/// Registry holding users, orders and tickets.
pub fn registry() -> SchemaRegistry {
    let registry = SchemaRegistry::default();
    registry.register::<User>(user_table()).unwrap();
    registry.register::<Order>(order_table()).unwrap();
    registry.register::<Ticket>(ticket_table()).unwrap();
    registry
}

/// Records every statement and answers queries with canned rows.
pub struct RecordingConnection {
    dialect: Dialect,
    rows: Vec<SqlRow>,
    statements: RefCell<Vec<(String, Vec<SqlValue>)>>,
}

impl RecordingConnection {
    pub fn mariadb() -> Self {
        Self::with_rows(Vec::new())
    }

    pub fn with_rows(rows: Vec<SqlRow>) -> Self {
        Self {
            dialect: Dialect::MariaDb,
            rows,
            statements: RefCell::new(Vec::new()),
        }
    }

    pub fn statements(&self) -> Vec<(String, Vec<SqlValue>)> {
        self.statements.borrow().clone()
    }
}

impl SqlConnection for RecordingConnection {
    fn dialect(&self) -> Dialect {
        self.dialect
    }

    fn execute(&self, sql: &str, params: &[SqlValue]) -> DbResult<usize> {
        self.statements
            .borrow_mut()
            .push((sql.to_string(), params.to_vec()));
        Ok(1)
    }

    fn query(&self, sql: &str, params: &[SqlValue]) -> DbResult<Vec<SqlRow>> {
        self.statements
            .borrow_mut()
            .push((sql.to_string(), params.to_vec()));
        Ok(self.rows.clone())
    }
}

/// Fails every statement like a dropped connection.
pub struct BrokenConnection;

impl SqlConnection for BrokenConnection {
    fn dialect(&self) -> Dialect {
        Dialect::MariaDb
    }

    fn execute(&self, _sql: &str, _params: &[SqlValue]) -> DbResult<usize> {
        Err(DbError::Driver("connection lost".into()))
    }

    fn query(&self, _sql: &str, _params: &[SqlValue]) -> DbResult<Vec<SqlRow>> {
        Err(DbError::Driver("connection lost".into()))
    }
}

pub fn row(columns: &[(&str, SqlValue)]) -> SqlRow {
    SqlRow::new(
        columns
            .iter()
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect(),
    )
}
