//! Schema loader backed by `information_schema`.

use crate::schema::{ColumnInfo, Schema, SchemaLoader, TableInfo};
use pggo::{Entity, in_list};
use tokio_postgres::NoTls;

#[derive(Debug, Default, Entity)]
struct TableRow {
    table_schema: String,
    table_name: String,
}

#[derive(Debug, Default, Entity)]
struct ColumnRow {
    table_schema: String,
    table_name: String,
    column_name: String,
    ordinal_position: i32,
    is_nullable: String,
    data_type: String,
    udt_name: String,
}

impl ColumnRow {
    /// `information_schema` reports arrays as `ARRAY`; the element type is the `udt_name`
    /// without its leading underscore.
    fn resolved_type(&self) -> String {
        if self.data_type == "ARRAY" {
            format!("{}[]", self.udt_name.trim_start_matches('_'))
        } else if self.data_type == "USER-DEFINED" {
            self.udt_name.clone()
        } else {
            self.data_type.clone()
        }
    }
}

/// Loads tables and columns of the configured schemas from a live database.
#[derive(Debug, Clone)]
pub struct PostgresLoader {
    pub url: String,
    pub schemas: Vec<String>,
}

impl PostgresLoader {
    pub fn new(url: impl Into<String>, schemas: Vec<String>) -> Self {
        Self {
            url: url.into(),
            schemas,
        }
    }
}

impl SchemaLoader for PostgresLoader {
    async fn load(&self) -> anyhow::Result<Schema> {
        let (client, connection) = tokio_postgres::connect(&self.url, NoTls)
            .await
            .map_err(|e| anyhow::anyhow!("failed to connect to database: {e}"))?;
        tokio::spawn(async move {
            let _ = connection.await;
        });

        let db = pggo::pg::with(&client);

        let mut tables: Vec<TableRow> = Vec::new();
        db.select([
            "table_schema::text AS table_schema",
            "table_name::text AS table_name",
        ])
        .from_table("information_schema.tables")
        .where_([in_list("table_schema::text", self.schemas.clone())])
        .query(&mut tables)
        .await
        .map_err(|e| anyhow::anyhow!("failed to load tables: {e}"))?;

        let mut columns: Vec<ColumnRow> = Vec::new();
        db.select([
            "table_schema::text AS table_schema",
            "table_name::text AS table_name",
            "column_name::text AS column_name",
            "ordinal_position::int4 AS ordinal_position",
            "is_nullable::text AS is_nullable",
            "data_type::text AS data_type",
            "udt_name::text AS udt_name",
        ])
        .from_table("information_schema.columns")
        .where_([in_list("table_schema::text", self.schemas.clone())])
        .query(&mut columns)
        .await
        .map_err(|e| anyhow::anyhow!("failed to load columns: {e}"))?;

        assemble(tables, columns)
    }
}

fn assemble(tables: Vec<TableRow>, mut columns: Vec<ColumnRow>) -> anyhow::Result<Schema> {
    let mut schema = Schema::default();
    let mut owners = std::collections::BTreeMap::<String, String>::new();

    for t in tables {
        if let Some(prev) = owners.get(&t.table_name) {
            anyhow::bail!(
                "table {} exists in schemas {prev} and {}",
                t.table_name,
                t.table_schema
            );
        }
        owners.insert(t.table_name.clone(), t.table_schema);
        schema.insert(TableInfo {
            name: t.table_name,
            columns: Vec::new(),
        });
    }

    columns.sort_by(|a, b| {
        (&a.table_name, a.ordinal_position).cmp(&(&b.table_name, b.ordinal_position))
    });
    for c in columns {
        if owners.get(&c.table_name) != Some(&c.table_schema) {
            continue;
        }
        let Some(table) = schema.tables.get_mut(&c.table_name) else {
            continue;
        };
        let data_type = c.resolved_type();
        table.columns.push(ColumnInfo {
            name: c.column_name,
            nullable: c.is_nullable == "YES",
            data_type,
        });
    }

    Ok(schema)
}
