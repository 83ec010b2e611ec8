use crate::cli::{DEFAULT_CONFIG, GenerateArgs};
use crate::config::ProjectConfig;
use crate::generator::Generator;
use crate::loader::PostgresLoader;
use crate::type_mapper::TypeMapper;
use crate::write::FileWriter;
use std::path::PathBuf;

/// Generation settings after merging flags, config file and environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub url: String,
    pub dir: PathBuf,
    pub schemas: Vec<String>,
    pub table: Option<String>,
}

pub async fn run(args: GenerateArgs) -> anyhow::Result<()> {
    let (config_path, required) = match &args.config {
        Some(p) => (p.clone(), true),
        None => (PathBuf::from(DEFAULT_CONFIG), false),
    };
    let project = ProjectConfig::load(&config_path, required)?;
    let settings = resolve(&args, &project, std::env::var("DATABASE_URL").ok())?;

    let writer = FileWriter {
        dry_run: args.dry_run,
        check: args.check,
        ..FileWriter::new(&settings.dir)
    };
    let loader = PostgresLoader::new(settings.url, settings.schemas);

    let mut generator = Generator::new(loader, writer)
        .table(settings.table)
        .types(TypeMapper::new(project.file.types.clone()));
    generator.generate().await?;
    Ok(())
}

/// Flags win over the config file; the URL falls back to `env_url` last.
pub fn resolve(
    args: &GenerateArgs,
    project: &ProjectConfig,
    env_url: Option<String>,
) -> anyhow::Result<Settings> {
    let url = args
        .url
        .clone()
        .or_else(|| project.file.database.url.clone())
        .or(env_url)
        .filter(|u| !u.trim().is_empty())
        .ok_or_else(|| {
            anyhow::anyhow!(
                "missing database url: pass --url, set [database].url in the config file, or set DATABASE_URL"
            )
        })?;

    let dir = match (&args.dir, &project.file.output.dir) {
        (Some(d), _) => d.clone(),
        (None, Some(d)) => project.resolve_path(d),
        (None, None) => PathBuf::from("."),
    };

    let schemas = match &args.schemas {
        Some(s) => s.clone(),
        None if !project.file.database.schemas.is_empty() => project.file.database.schemas.clone(),
        None => vec!["public".to_string()],
    };

    Ok(Settings {
        url,
        dir,
        schemas,
        table: args.table.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigFile;

    fn project(raw: &str) -> ProjectConfig {
        ProjectConfig {
            config_dir: PathBuf::from("proj"),
            file: crate::config::parse(raw).unwrap(),
        }
    }

    #[test]
    fn defaults_without_config() {
        let empty = ProjectConfig {
            config_dir: PathBuf::from("."),
            file: ConfigFile::default(),
        };
        let s = resolve(
            &GenerateArgs::default(),
            &empty,
            Some("postgres://env/app".to_string()),
        )
        .unwrap();

        assert_eq!(s.url, "postgres://env/app");
        assert_eq!(s.dir, PathBuf::from("."));
        assert_eq!(s.schemas, vec!["public"]);
        assert_eq!(s.table, None);
    }

    #[test]
    fn config_fills_in_missing_flags() {
        let p = project(
            r#"
[database]
url = "postgres://config/app"
schemas = ["audit"]

[output]
dir = "src/db"
"#,
        );
        let s = resolve(
            &GenerateArgs::default(),
            &p,
            Some("postgres://env/app".to_string()),
        )
        .unwrap();

        assert_eq!(s.url, "postgres://config/app");
        assert_eq!(s.dir, PathBuf::from("proj/src/db"));
        assert_eq!(s.schemas, vec!["audit"]);
    }

    #[test]
    fn flags_override_config() {
        let p = project(
            r#"
[database]
url = "postgres://config/app"

[output]
dir = "src/db"
"#,
        );
        let args = GenerateArgs {
            url: Some("postgres://flag/app".to_string()),
            dir: Some(PathBuf::from("out")),
            table: Some("users".to_string()),
            schemas: Some(vec!["public".to_string(), "audit".to_string()]),
            ..GenerateArgs::default()
        };
        let s = resolve(&args, &p, None).unwrap();

        assert_eq!(s.url, "postgres://flag/app");
        assert_eq!(s.dir, PathBuf::from("out"));
        assert_eq!(s.schemas, vec!["public", "audit"]);
        assert_eq!(s.table.as_deref(), Some("users"));
    }

    #[test]
    fn missing_url_is_an_error() {
        let p = project("");
        let err = resolve(&GenerateArgs::default(), &p, None).unwrap_err();
        assert!(err.to_string().starts_with("missing database url"));
    }
}
