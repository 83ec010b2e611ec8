//! Renders model and schema modules from a loaded [`Schema`].

use crate::schema::{Schema, SchemaLoader, TableInfo};
use crate::type_mapper::TypeMapper;
use crate::write::{GeneratedFile, WriteSummary, Writer};
use heck::{ToShoutySnakeCase, ToUpperCamelCase};
use std::collections::HashSet;

const HEADER: &str = "// @generated by pggo (pggo-cli)\n\n";

/// Loads a schema, renders it and hands the files to a writer.
pub struct Generator<L, W> {
    pub loader: L,
    pub writer: W,
    /// Render only this table; `None` renders every table plus the `mod.rs` files.
    pub table: Option<String>,
    pub types: TypeMapper,
}

impl<L: SchemaLoader, W: Writer> Generator<L, W> {
    pub fn new(loader: L, writer: W) -> Self {
        Self {
            loader,
            writer,
            table: None,
            types: TypeMapper::default(),
        }
    }

    pub fn table(mut self, table: Option<String>) -> Self {
        self.table = table;
        self
    }

    pub fn types(mut self, types: TypeMapper) -> Self {
        self.types = types;
        self
    }

    pub async fn generate(&mut self) -> anyhow::Result<WriteSummary> {
        let schema = self.loader.load().await?;
        let files = render(&schema, self.table.as_deref(), &self.types)?;
        self.writer.write(&files)
    }
}

struct TableNames {
    module: String,
    file_stem: String,
    struct_name: String,
}

impl TableNames {
    fn of(table: &TableInfo) -> Self {
        let module = sanitize_field_ident(&table.name);
        let file_stem = module.trim_start_matches("r#").to_string();
        let camel = table.name.to_upper_camel_case();
        let mut struct_name = if camel.is_empty() {
            "Table".to_string()
        } else {
            sanitize_type_ident(&camel)
        };
        if struct_name == "Self" {
            struct_name.push('_');
        }
        Self {
            module,
            file_stem,
            struct_name,
        }
    }
}

/// Render the files for `table`, or for every table when `None`.
pub fn render(
    schema: &Schema,
    table: Option<&str>,
    types: &TypeMapper,
) -> anyhow::Result<Vec<GeneratedFile>> {
    let tables: Vec<&TableInfo> = match table {
        Some(name) => {
            let Some(t) = schema.find_table(name) else {
                anyhow::bail!("generator: {name} couldn't be found in the schema");
            };
            vec![t]
        }
        None => schema.tables.values().collect(),
    };

    let mut files = Vec::new();
    let mut seen_modules = HashSet::new();
    let mut names = Vec::with_capacity(tables.len());

    for t in &tables {
        let n = TableNames::of(t);
        if !seen_modules.insert(n.module.clone()) {
            anyhow::bail!("duplicate module name after sanitization: {}", n.module);
        }

        files.push(GeneratedFile::new(
            format!("{}.rs", n.file_stem),
            render_model(t, &n.struct_name, types)?,
        ));
        files.push(GeneratedFile::new(
            format!("schema/{}.rs", n.file_stem),
            render_schema(t, &n.struct_name)?,
        ));
        names.push(n);
    }

    if table.is_none() {
        files.push(GeneratedFile::new("mod.rs", render_mod(&names, true)));
        files.push(GeneratedFile::new("schema/mod.rs", render_mod(&names, false)));
    }

    Ok(files)
}

fn render_model(t: &TableInfo, struct_name: &str, types: &TypeMapper) -> anyhow::Result<String> {
    let mut out = String::new();
    out.push_str(HEADER);
    out.push_str(&format!("/// {struct_name} represents the {} table.\n", t.name));
    out.push_str("#[derive(Debug, Clone, Default, pggo::Entity)]\n");
    out.push_str(&format!("pub struct {struct_name} {{\n"));

    let mut seen = HashSet::new();
    for c in &t.columns {
        let field = sanitize_field_ident(&c.name);
        if !seen.insert(field.clone()) {
            anyhow::bail!(
                "duplicate field name after sanitization: {field} (table: {})",
                t.name
            );
        }
        if field.trim_start_matches("r#") != c.name {
            out.push_str(&format!("    #[pggo(column = {:?})]\n", c.name));
        }
        out.push_str(&format!("    pub {field}: {},\n", types.rust_type(c)));
    }

    out.push_str("}\n");
    Ok(out)
}

fn render_schema(t: &TableInfo, struct_name: &str) -> anyhow::Result<String> {
    let mut out = String::new();
    out.push_str(HEADER);
    out.push_str(&format!("/// {struct_name} describes the {} table.\n", t.name));
    out.push_str("#[derive(Debug, Clone, Copy, Default)]\n");
    out.push_str(&format!("pub struct {struct_name};\n\n"));

    let columns = t
        .columns
        .iter()
        .map(|c| format!("{:?}", c.name))
        .collect::<Vec<_>>()
        .join(", ");

    out.push_str(&format!("impl {struct_name} {{\n"));
    out.push_str(&format!(
        "    pub const TABLE: pggo::TableDef = pggo::TableDef::new({:?}, &[{columns}]);\n",
        t.name
    ));
    if !t.columns.is_empty() {
        out.push('\n');
    }

    let mut seen = HashSet::new();
    for c in &t.columns {
        let ident = const_ident(&c.name);
        if !seen.insert(ident.clone()) {
            anyhow::bail!(
                "duplicate column constant after sanitization: {ident} (table: {})",
                t.name
            );
        }
        out.push_str(&format!(
            "    pub const {ident}: &'static str = {:?};\n",
            c.name
        ));
    }
    out.push_str("}\n\n");

    out.push_str(&format!("impl pggo::Build for {struct_name} {{\n"));
    out.push_str(
        "    fn build(&self, sql: &mut String, args: &mut pggo::ParamList) -> pggo::OrmResult<()> {\n",
    );
    out.push_str("        pggo::Build::build(&Self::TABLE, sql, args)\n");
    out.push_str("    }\n");
    out.push_str("}\n\n");
    out.push_str(&format!("impl pggo::Table for {struct_name} {{}}\n"));

    Ok(out)
}

fn render_mod(names: &[TableNames], root: bool) -> String {
    let mut out = String::new();
    out.push_str(HEADER);

    if root {
        out.push_str("pub mod schema;\n\n");
    }

    for n in names {
        out.push_str(&format!("pub mod {};\n", n.module));
    }
    if !names.is_empty() {
        out.push('\n');
    }
    for n in names {
        out.push_str(&format!("pub use {}::{};\n", n.module, n.struct_name));
    }

    out
}

fn const_ident(column: &str) -> String {
    let mut s = sanitize_type_ident(column).to_shouty_snake_case();
    if s.is_empty() {
        s.push_str("COLUMN");
    }
    if s.starts_with(|c: char| c.is_ascii_digit()) {
        s.insert(0, '_');
    }
    if s == "TABLE" {
        s.push_str("_COLUMN");
    }
    s
}

fn sanitize_type_ident(name: &str) -> String {
    let mut s = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect::<String>();

    if s.is_empty() {
        s.push('_');
    }

    if s.starts_with(|c: char| c.is_ascii_digit()) {
        s.insert(0, '_');
    }

    s
}

fn sanitize_field_ident(column: &str) -> String {
    let mut s = column
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect::<String>();
    s = heck::ToSnakeCase::to_snake_case(s.as_str());
    if s.is_empty() {
        s.push_str("column");
    }
    if s.starts_with(|c: char| c.is_ascii_digit()) {
        s.insert(0, '_');
    }
    // These cannot be raw identifiers.
    if matches!(s.as_str(), "crate" | "self" | "super") {
        s.push('_');
        return s;
    }
    if is_rust_keyword(&s) {
        format!("r#{s}")
    } else {
        s
    }
}

fn is_rust_keyword(s: &str) -> bool {
    matches!(
        s,
        "as" | "async"
            | "await"
            | "break"
            | "const"
            | "continue"
            | "dyn"
            | "else"
            | "enum"
            | "extern"
            | "false"
            | "fn"
            | "for"
            | "gen"
            | "if"
            | "impl"
            | "in"
            | "let"
            | "loop"
            | "match"
            | "mod"
            | "move"
            | "mut"
            | "pub"
            | "ref"
            | "return"
            | "static"
            | "struct"
            | "trait"
            | "true"
            | "type"
            | "unsafe"
            | "use"
            | "where"
            | "while"
    )
}
