use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Contents of `pggo.toml`. Every section is optional; command-line flags win over it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub output: OutputConfig,

    /// PostgreSQL type -> Rust type overrides.
    #[serde(default)]
    pub types: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    #[serde(default)]
    pub schemas: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    pub dir: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ProjectConfig {
    pub config_dir: PathBuf,
    pub file: ConfigFile,
}

impl ProjectConfig {
    /// Load `config_path`. A missing file is only an error when `required` is set.
    pub fn load(config_path: &Path, required: bool) -> anyhow::Result<Self> {
        let config_dir = config_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf();

        if !config_path.exists() {
            if required {
                anyhow::bail!("config file not found: {}", config_path.display());
            }
            return Ok(Self {
                config_dir,
                file: ConfigFile::default(),
            });
        }

        let raw = std::fs::read_to_string(config_path).map_err(|e| {
            anyhow::anyhow!(
                "failed to read config file {}: {e}",
                config_path.display()
            )
        })?;

        let file = parse(&raw).map_err(|e| {
            anyhow::anyhow!(
                "failed to parse config file {}: {e:#}",
                config_path.display()
            )
        })?;

        Ok(Self { config_dir, file })
    }

    pub fn resolve_path(&self, p: impl AsRef<Path>) -> PathBuf {
        let p = p.as_ref();
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            self.config_dir.join(p)
        }
    }
}

/// Parse and expand `${VAR}` references in every string value.
pub fn parse(raw: &str) -> anyhow::Result<ConfigFile> {
    let mut file: ConfigFile = toml::from_str(raw)?;
    file.expand_env()?;
    file.validate()?;
    Ok(file)
}

impl ConfigFile {
    fn expand_env(&mut self) -> anyhow::Result<()> {
        if let Some(url) = self.database.url.as_mut() {
            *url = expand_env_vars(url)?;
        }
        for s in &mut self.database.schemas {
            *s = expand_env_vars(s)?;
        }
        if let Some(dir) = self.output.dir.as_mut() {
            *dir = expand_env_vars(dir)?;
        }
        for v in self.types.values_mut() {
            *v = expand_env_vars(v)?;
        }
        Ok(())
    }

    fn validate(&self) -> anyhow::Result<()> {
        if let Some(url) = &self.database.url {
            if url.trim().is_empty() {
                anyhow::bail!("database.url must not be empty");
            }
        }
        if self.database.schemas.iter().any(|s| s.trim().is_empty()) {
            anyhow::bail!("database.schemas must not contain empty names");
        }
        for (pg, rust) in &self.types {
            if rust.trim().is_empty() {
                anyhow::bail!("types.\"{pg}\" must not be empty");
            }
        }
        Ok(())
    }
}

fn expand_env_vars(input: &str) -> anyhow::Result<String> {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '$' && chars.peek() == Some(&'{') {
            chars.next();

            let mut key = String::new();
            let mut closed = false;
            for ch in chars.by_ref() {
                if ch == '}' {
                    closed = true;
                    break;
                }
                key.push(ch);
            }

            if !closed {
                anyhow::bail!("unterminated env var reference: ${{{key}");
            }
            if key.is_empty() {
                anyhow::bail!("invalid env var reference: ${{}}");
            }

            let v = std::env::var(&key)
                .map_err(|_| anyhow::anyhow!("missing env var for config expansion: {key}"))?;
            out.push_str(&v);
            continue;
        }

        out.push(c);
    }

    Ok(out)
}
