use crate::schema::ColumnInfo;
use std::collections::BTreeMap;

/// Maps PostgreSQL type names to Rust field types.
#[derive(Debug, Clone, Default)]
pub struct TypeMapper {
    /// Overrides from the `[types]` config table, keyed by normalized PG type.
    custom: BTreeMap<String, String>,
}

impl TypeMapper {
    pub fn new(custom: BTreeMap<String, String>) -> Self {
        let custom = custom
            .into_iter()
            .map(|(k, v)| (normalize_pg_type(&k), v))
            .collect();
        Self { custom }
    }

    /// Field type for `column`; nullable columns become `Option<_>`.
    pub fn rust_type(&self, column: &ColumnInfo) -> String {
        let inner = self.map(&column.data_type);
        if column.nullable {
            format!("Option<{inner}>")
        } else {
            inner
        }
    }

    pub fn map(&self, pg_type: &str) -> String {
        let normalized = normalize_pg_type(pg_type);

        if let Some(t) = self.custom.get(&normalized) {
            return t.clone();
        }

        if let Some(base) = normalized.strip_suffix("[]") {
            let inner = self.map(base);
            return format!("Vec<{inner}>");
        }

        match normalized.as_str() {
            "bool" | "boolean" => "bool",
            "char" | "\"char\"" => "i8",

            "int2" | "smallint" | "smallserial" => "i16",
            "int4" | "integer" | "serial" => "i32",
            "int8" | "bigint" | "bigserial" => "i64",
            "oid" => "u32",

            "float4" | "real" => "f32",
            "float8" | "double precision" => "f64",

            "text" | "varchar" | "character" | "bpchar" | "name" | "citext" => "String",

            "uuid" => "uuid::Uuid",
            "json" | "jsonb" => "serde_json::Value",

            "timestamptz" => "chrono::DateTime<chrono::Utc>",
            "timestamp" | "timestamp without time zone" => "chrono::NaiveDateTime",
            "date" => "chrono::NaiveDate",
            "time" | "time without time zone" => "chrono::NaiveTime",

            "bytea" => "Vec<u8>",

            // Unknown and user-defined types fall back to text; override them in `[types]`.
            _ => "String",
        }
        .to_string()
    }
}

/// Lowercase, strip `(…)` typmods, collapse whitespace and fold common synonyms.
pub fn normalize_pg_type(pg_type: &str) -> String {
    let mut s = pg_type.trim().to_lowercase();

    while let Some(start) = s.find('(') {
        let Some(end) = s[start..].find(')') else {
            break;
        };
        s.replace_range(start..start + end + 1, "");
    }

    let s = s.split_whitespace().collect::<Vec<_>>().join(" ");

    match s.as_str() {
        "character varying" => "varchar".to_string(),
        "timestamp with time zone" => "timestamptz".to_string(),
        _ => s,
    }
}
