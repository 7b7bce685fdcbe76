mod support;

use support::{order_table, registry, user_table, Order, Ticket, User};
use tablekit_core::{
    ColumnDescriptor, ColumnKind, ConfigError, Entity, ForeignKey, MappedRow, OrmResult,
    SchemaConfig, SchemaRegistry, SqlValue, TableDescriptor, UniqueKey,
};

struct Note;

impl Entity for Note {
    fn column_value(&self, _column: &str) -> Option<SqlValue> {
        None
    }

    fn from_row(_row: &MappedRow) -> OrmResult<Self> {
        Ok(Self)
    }
}

struct Metric;

impl Entity for Metric {
    fn column_value(&self, _column: &str) -> Option<SqlValue> {
        None
    }

    fn from_row(_row: &MappedRow) -> OrmResult<Self> {
        Ok(Self)
    }
}

const USERS_DDL: &str = concat!(
    "create or replace table users (\n",
    "\tid     bigint        not null auto_increment,\n",
    "\tname   varchar(50)   not null,\n",
    "\temail  varchar(100)  not null,\n",
    "\tconstraint uk_users_01 unique (email),\n",
    "\tprimary key (id)\n",
    ") engine = InnoDB\n",
    "  charset = utf8mb4\n",
    "  collate = utf8mb4_unicode_ci;",
);

#[test]
fn users_ddl_matches_reference_text() {
    let registry = registry();
    let ddl = registry.ddl_of_create_table::<User>(true).unwrap();
    assert_eq!(ddl, USERS_DDL);
}

#[test]
fn default_ddl_uses_or_replace_and_is_deterministic() {
    let registry = registry();
    let first = registry.ddl_of_create_table_default::<User>().unwrap();
    let second = registry.ddl_of_create_table_default::<User>().unwrap();
    assert_eq!(first, second);
    assert_eq!(first, USERS_DDL);
}

#[test]
fn without_or_replace_emits_plain_create() {
    let registry = registry();
    let ddl = registry.ddl_of_create_table::<User>(false).unwrap();
    assert!(ddl.starts_with("create table users (\n"));
}

#[test]
fn orders_constraints_are_ordered_numbered_and_comma_separated() {
    let registry = registry();
    let ddl = registry.ddl_of_create_table::<Order>(true).unwrap();
    let lines: Vec<&str> = ddl.lines().collect();

    assert_eq!(lines[0], "create or replace table orders (");
    let tail = &lines[8..];
    assert_eq!(
        tail,
        [
            "\tconstraint ck_orders_01 check (amount >= 0),",
            "\tconstraint ck_orders_02 check (gift in (0, 1)),",
            "\tconstraint fk_orders_01 foreign key (user_id) references users (id),",
            "\tconstraint uk_orders_01 unique (user_id, placed_on),",
            "\tprimary key (id)",
            ") engine = InnoDB",
            "  charset = utf8mb4",
            "  collate = utf8mb4_unicode_ci;",
        ]
    );
}

#[test]
fn orders_column_block_is_aligned_to_widest_name_and_type() {
    let registry = registry();
    let ddl = registry.ddl_of_create_table::<Order>(true).unwrap();
    let column_lines: Vec<&str> = ddl.lines().skip(1).take(7).collect();

    let table = order_table();
    let name_width = table.columns.iter().map(|c| c.name.len()).max().unwrap();
    let type_width = "decimal(38, 2)".len();
    let type_start = 1 + name_width + 2;
    let nullability_start = type_start + type_width + 2;

    for (line, column) in column_lines.iter().zip(&table.columns) {
        assert!(line.starts_with(&format!("\t{} ", column.name)), "{line}");
        let sql_type = column.sql_type().unwrap();
        assert_eq!(&line[type_start..type_start + sql_type.len()], sql_type, "{line}");
        assert!(
            line[nullability_start..].starts_with("null")
                || line[nullability_start..].starts_with("not null"),
            "{line}"
        );
        assert!(line.ends_with(','), "{line}");
    }

    assert_eq!(
        column_lines[4],
        "\tshipped_at  datetime        null,"
    );
    assert_eq!(
        column_lines[6],
        "\tcode        char(3)         null,"
    );
}

#[test]
fn table_without_constraints_has_no_trailing_comma() {
    let registry = SchemaRegistry::default();
    registry
        .register::<Note>(
            TableDescriptor::new("notes")
                .engine("Aria")
                .column(ColumnDescriptor::new("body", ColumnKind::Text)),
        )
        .unwrap();

    let ddl = registry.ddl_of_create_table::<Note>(false).unwrap();
    assert_eq!(
        ddl,
        "create table notes (\n\tbody  varchar(255)  null\n) engine = Aria\n  charset = utf8mb4\n  collate = utf8mb4_unicode_ci;"
    );
}

#[test]
fn configured_line_separator_joins_every_line() {
    let registry = SchemaRegistry::new(SchemaConfig {
        line_separator: "\r\n".to_string(),
        ..SchemaConfig::default()
    });
    registry.register::<User>(user_table()).unwrap();

    let ddl = registry.ddl_of_create_table::<User>(true).unwrap();
    assert_eq!(ddl, USERS_DDL.replace('\n', "\r\n"));
}

#[test]
fn dump_schema_follows_registration_order() {
    let registry = SchemaRegistry::default();
    registry.register::<User>(user_table()).unwrap();
    registry.register::<Order>(order_table()).unwrap();

    let dump = registry.dump_schema(true).unwrap();
    let statements: Vec<&str> = dump.split("\n\n").collect();
    assert_eq!(statements.len(), 2);
    assert_eq!(statements[0], USERS_DDL);
    assert!(statements[1].starts_with("create or replace table orders ("));
}

#[test]
fn dump_schema_fails_on_first_underivable_table() {
    let registry = registry();
    let err = registry.dump_schema(true).unwrap_err();
    assert!(matches!(err, ConfigError::UnsupportedType { column, .. } if column == "status"));
}

#[test]
fn enum_columns_have_no_ddl_type() {
    let registry = registry();
    let err = registry.ddl_of_create_table::<Ticket>(true).unwrap_err();
    match err {
        ConfigError::UnsupportedType {
            entity,
            column,
            kind,
        } => {
            assert!(entity.ends_with("Ticket"));
            assert_eq!(column, "status");
            assert_eq!(kind, "enum");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn unregistered_entity_is_missing_table() {
    let registry = SchemaRegistry::default();
    let err = registry.ddl_of_create_table::<User>(true).unwrap_err();
    assert!(matches!(err, ConfigError::MissingTable { .. }));
}

#[test]
fn foreign_key_to_unregistered_entity_fails() {
    let registry = SchemaRegistry::default();
    registry.register::<Order>(order_table()).unwrap();

    let err = registry.ddl_of_create_table::<Order>(true).unwrap_err();
    assert!(matches!(err, ConfigError::MissingTable { entity } if entity.ends_with("User")));
}

#[test]
fn foreign_key_source_column_must_exist() {
    let registry = SchemaRegistry::default();
    registry.register::<User>(user_table()).unwrap();
    registry
        .register::<Note>(
            TableDescriptor::new("notes")
                .column(ColumnDescriptor::new("body", ColumnKind::Text))
                .foreign_key(ForeignKey::to::<User, _, _>(["author_id"], ["id"])),
        )
        .unwrap();

    let err = registry.ddl_of_create_table::<Note>(true).unwrap_err();
    assert!(matches!(
        err,
        ConfigError::DanglingColumn { entity, column } if entity.ends_with("Note") && column == "author_id"
    ));
}

#[test]
fn foreign_key_target_column_must_exist() {
    let registry = SchemaRegistry::default();
    registry.register::<User>(user_table()).unwrap();
    registry
        .register::<Note>(
            TableDescriptor::new("notes")
                .column(ColumnDescriptor::new("author_id", ColumnKind::BigInt))
                .foreign_key(ForeignKey::to::<User, _, _>(["author_id"], ["uuid"])),
        )
        .unwrap();

    let err = registry.ddl_of_create_table::<Note>(true).unwrap_err();
    assert!(matches!(
        err,
        ConfigError::DanglingColumn { entity, column } if entity.ends_with("User") && column == "uuid"
    ));
}

#[test]
fn unique_key_columns_must_exist() {
    let registry = SchemaRegistry::default();
    registry
        .register::<Note>(
            TableDescriptor::new("notes")
                .column(ColumnDescriptor::new("body", ColumnKind::Text))
                .unique_key(UniqueKey::new(["slug"])),
        )
        .unwrap();

    let err = registry.ddl_of_create_table::<Note>(true).unwrap_err();
    assert!(matches!(err, ConfigError::DanglingColumn { column, .. } if column == "slug"));
}

#[test]
fn numeric_kinds_and_repeated_constraints_derive_exact_text() {
    let registry = registry();
    registry
        .register::<Metric>(
            TableDescriptor::new("metrics")
                .column(ColumnDescriptor::new("a", ColumnKind::Int).auto_increment())
                .column(ColumnDescriptor::new("b", ColumnKind::SmallInt).not_null())
                .column(ColumnDescriptor::new("c", ColumnKind::TinyInt))
                .column(ColumnDescriptor::new("d", ColumnKind::Float))
                .column(ColumnDescriptor::new("e", ColumnKind::Double))
                .column(ColumnDescriptor::new("f", ColumnKind::Bool))
                .column(ColumnDescriptor::new("user_id", ColumnKind::BigInt).not_null())
                .column(ColumnDescriptor::new("order_id", ColumnKind::BigInt).not_null())
                .foreign_key(ForeignKey::to::<User, _, _>(["user_id"], ["id"]))
                .foreign_key(ForeignKey::to::<Order, _, _>(["order_id"], ["id"]))
                .unique_key(UniqueKey::new(["b"]))
                .unique_key(UniqueKey::new(["user_id", "order_id"])),
        )
        .unwrap();

    let ddl = registry.ddl_of_create_table::<Metric>(false).unwrap();
    assert_eq!(
        ddl,
        concat!(
            "create table metrics (\n",
            "\ta         int       not null auto_increment,\n",
            "\tb         smallint  not null,\n",
            "\tc         tinyint   null,\n",
            "\td         float     null,\n",
            "\te         double    null,\n",
            "\tf         bit       null,\n",
            "\tuser_id   bigint    not null,\n",
            "\torder_id  bigint    not null,\n",
            "\tconstraint fk_metrics_01 foreign key (user_id) references users (id),\n",
            "\tconstraint fk_metrics_02 foreign key (order_id) references orders (id),\n",
            "\tconstraint uk_metrics_01 unique (b),\n",
            "\tconstraint uk_metrics_02 unique (user_id, order_id),\n",
            "\tprimary key (a)\n",
            ") engine = InnoDB\n",
            "  charset = utf8mb4\n",
            "  collate = utf8mb4_unicode_ci;",
        )
    );
}
