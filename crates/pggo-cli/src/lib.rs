mod cli;
mod config;
mod generate;
mod init;
mod write;

pub mod generator;
pub mod loader;
pub mod schema;
pub mod type_mapper;

pub use generator::{Generator, render};
pub use loader::PostgresLoader;
pub use schema::{ColumnInfo, Schema, SchemaLoader, TableInfo};
pub use type_mapper::TypeMapper;
pub use write::{FileWriter, GeneratedFile, WriteSummary, Writer};

pub async fn run(args: Vec<String>) -> anyhow::Result<()> {
    let cmd = cli::parse_args(&args)?;
    match cmd {
        cli::Command::Help(topic) => {
            cli::print_help(topic);
            Ok(())
        }
        cli::Command::Init(args) => init::run(args),
        cli::Command::Generate(args) => generate::run(args).await,
    }
}
