use std::path::PathBuf;

pub const DEFAULT_CONFIG: &str = "pggo.toml";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelpTopic {
    Root,
    Init,
}

#[derive(Debug, Clone)]
pub enum Command {
    Help(HelpTopic),
    Init(InitArgs),
    Generate(GenerateArgs),
}

#[derive(Debug, Clone)]
pub struct InitArgs {
    pub config: PathBuf,
}

#[derive(Debug, Clone, Default)]
pub struct GenerateArgs {
    /// Explicit `--config`; `None` means the optional default `pggo.toml`.
    pub config: Option<PathBuf>,
    pub url: Option<String>,
    pub dir: Option<PathBuf>,
    pub table: Option<String>,
    pub schemas: Option<Vec<String>>,
    pub dry_run: bool,
    pub check: bool,
}

pub fn parse_args(args: &[String]) -> anyhow::Result<Command> {
    let mut it = args.iter().skip(1).map(|s| s.as_str()).peekable();

    match it.peek() {
        Some(&"init") => {
            it.next();
            parse_init(it)
        }
        _ => parse_generate(it),
    }
}

fn parse_init<'a>(mut it: impl Iterator<Item = &'a str>) -> anyhow::Result<Command> {
    let mut config = PathBuf::from(DEFAULT_CONFIG);

    while let Some(token) = it.next() {
        match token {
            "-h" | "--help" => return Ok(Command::Help(HelpTopic::Init)),
            "-c" | "--config" => config = PathBuf::from(value(token, it.next())?),
            _ if token.starts_with("--config=") => {
                config = PathBuf::from(token.trim_start_matches("--config="));
            }
            other => anyhow::bail!("unknown argument: {other}"),
        }
    }

    Ok(Command::Init(InitArgs { config }))
}

fn parse_generate<'a>(mut it: impl Iterator<Item = &'a str>) -> anyhow::Result<Command> {
    let mut args = GenerateArgs::default();

    while let Some(token) = it.next() {
        match token {
            "-h" | "--help" => return Ok(Command::Help(HelpTopic::Root)),
            "-c" | "--config" => args.config = Some(PathBuf::from(value(token, it.next())?)),
            _ if token.starts_with("--config=") => {
                args.config = Some(PathBuf::from(token.trim_start_matches("--config=")));
            }
            "-u" | "--url" => args.url = Some(value(token, it.next())?.to_string()),
            _ if token.starts_with("--url=") => {
                args.url = Some(token.trim_start_matches("--url=").to_string());
            }
            "-d" | "--dir" => args.dir = Some(PathBuf::from(value(token, it.next())?)),
            _ if token.starts_with("--dir=") => {
                args.dir = Some(PathBuf::from(token.trim_start_matches("--dir=")));
            }
            "-t" | "--table" => args.table = Some(value(token, it.next())?.to_string()),
            _ if token.starts_with("--table=") => {
                args.table = Some(token.trim_start_matches("--table=").to_string());
            }
            "--schema" => args.schemas = Some(parse_schemas(value(token, it.next())?)?),
            _ if token.starts_with("--schema=") => {
                args.schemas = Some(parse_schemas(token.trim_start_matches("--schema="))?);
            }
            "--dry-run" => args.dry_run = true,
            "--check" => args.check = true,
            other => anyhow::bail!("unknown argument: {other}"),
        }
    }

    if args.dry_run && args.check {
        anyhow::bail!("--dry-run and --check cannot be combined");
    }
    if args.table.as_deref().is_some_and(|t| t.trim().is_empty()) {
        anyhow::bail!("--table must not be empty");
    }

    Ok(Command::Generate(args))
}

fn value<'a>(flag: &str, v: Option<&'a str>) -> anyhow::Result<&'a str> {
    v.ok_or_else(|| anyhow::anyhow!("{flag} requires a value"))
}

fn parse_schemas(v: &str) -> anyhow::Result<Vec<String>> {
    let parsed = split_csv(v);
    if parsed.is_empty() {
        anyhow::bail!("--schema must not be empty");
    }
    Ok(parsed)
}

fn split_csv(v: &str) -> Vec<String> {
    v.split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}

pub fn print_help(topic: HelpTopic) {
    match topic {
        HelpTopic::Root => {
            println!(
                "\
pggo - generate pggo models and table descriptions from a PostgreSQL schema

USAGE:
  pggo [OPTIONS]
  pggo init [--config <FILE>]

OPTIONS:
  -u, --url <URL>         Database connection string (or [database].url, or DATABASE_URL)
  -d, --dir <DIR>         Output directory (default: .)
  -t, --table <TABLE>     Generate a single table instead of the whole schema
      --schema <LIST>     Comma-separated schemas to read (default: public)
  -c, --config <FILE>     Config file path (default: pggo.toml, optional)
      --dry-run           Print files that would change
      --check             Exit non-zero if output would change
  -h, --help              Print help

Run `pggo init --help` for the config template."
            );
        }
        HelpTopic::Init => {
            println!(
                "\
USAGE:
  pggo init [OPTIONS]

Writes a template config file. Refuses to overwrite an existing file.

OPTIONS:
  -c, --config <FILE>     Config file path (default: pggo.toml)
  -h, --help              Print help"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("pggo")
            .chain(list.iter().copied())
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn no_arguments_generate_with_defaults() {
        let Command::Generate(g) = parse_args(&args(&[])).unwrap() else {
            panic!("expected generate");
        };
        assert!(g.config.is_none());
        assert!(g.url.is_none());
        assert!(g.dir.is_none());
        assert!(g.table.is_none());
        assert!(!g.dry_run && !g.check);
    }

    #[test]
    fn parse_short_and_long_flags() {
        let cmd = parse_args(&args(&[
            "-u",
            "postgres://localhost/app",
            "--dir=src/db",
            "-t",
            "users",
            "--schema",
            "public, audit",
            "--dry-run",
        ]))
        .unwrap();
        let Command::Generate(g) = cmd else {
            panic!("expected generate");
        };

        assert_eq!(g.url.as_deref(), Some("postgres://localhost/app"));
        assert_eq!(g.dir, Some(PathBuf::from("src/db")));
        assert_eq!(g.table.as_deref(), Some("users"));
        assert_eq!(
            g.schemas,
            Some(vec!["public".to_string(), "audit".to_string()])
        );
        assert!(g.dry_run);
    }

    #[test]
    fn parse_init_with_config() {
        let cmd = parse_args(&args(&["init", "--config", "db/pggo.toml"])).unwrap();
        let Command::Init(init) = cmd else {
            panic!("expected init");
        };
        assert_eq!(init.config, PathBuf::from("db/pggo.toml"));
    }

    #[test]
    fn help_topics() {
        assert!(matches!(
            parse_args(&args(&["--help"])).unwrap(),
            Command::Help(HelpTopic::Root)
        ));
        assert!(matches!(
            parse_args(&args(&["init", "-h"])).unwrap(),
            Command::Help(HelpTopic::Init)
        ));
    }

    #[test]
    fn rejects_bad_input() {
        let err = parse_args(&args(&["--url"])).unwrap_err();
        assert_eq!(err.to_string(), "--url requires a value");

        assert!(parse_args(&args(&["--verbose"])).is_err());
        assert!(parse_args(&args(&["--schema", " , "])).is_err());
        assert!(parse_args(&args(&["--dry-run", "--check"])).is_err());
        assert!(parse_args(&args(&["--table="])).is_err());
    }
}
