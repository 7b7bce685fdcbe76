//! Demo entities printed by the CLI.

use rust_decimal::Decimal;
use tablekit_core::{
    ColumnDescriptor, ColumnKind, ConfigError, Entity, ForeignKey, MappedRow, OrmResult,
    SchemaRegistry, SqlValue, TableDescriptor, UniqueKey,
};

pub struct Customer {
    pub id: Option<i64>,
    pub name: String,
    pub email: String,
}

impl Entity for Customer {
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

pub struct Invoice {
    pub id: i64,
    pub customer_id: i64,
    pub total: Decimal,
    pub note: Option<String>,
}

impl Entity for Invoice {
    fn column_value(&self, column: &str) -> Option<SqlValue> {
        match column {
            "id" => Some(self.id.into()),
            "customer_id" => Some(self.customer_id.into()),
            "total" => Some(self.total.into()),
            "note" => Some(self.note.as_deref().into()),
            _ => None,
        }
    }

    fn from_row(row: &MappedRow) -> OrmResult<Self> {
        Ok(Self {
            id: row.get("id")?,
            customer_id: row.get("customer_id")?,
            total: row.get("total")?,
            note: row.get("note")?,
        })
    }
}

pub fn register(registry: &SchemaRegistry) -> Result<(), ConfigError> {
    registry.register::<Customer>(
        TableDescriptor::new("customers")
            .column(ColumnDescriptor::new("id", ColumnKind::BigInt).auto_increment())
            .column(ColumnDescriptor::new("name", ColumnKind::Text).length(80).not_null())
            .column(ColumnDescriptor::new("email", ColumnKind::Text).not_null())
            .unique_key(UniqueKey::new(["email"])),
    )?;
    registry.register::<Invoice>(
        TableDescriptor::new("invoices")
            .column(ColumnDescriptor::new("id", ColumnKind::BigInt).primary_key())
            .column(ColumnDescriptor::new("customer_id", ColumnKind::BigInt).not_null())
            .column(ColumnDescriptor::new("total", ColumnKind::Decimal).not_null())
            .column(ColumnDescriptor::new("note", ColumnKind::Text).length(500))
            .check("total >= 0")
            .foreign_key(ForeignKey::to::<Customer, _, _>(["customer_id"], ["id"])),
    )?;
    Ok(())
}
