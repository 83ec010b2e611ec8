use std::path::{Path, PathBuf};

/// A rendered output file, relative to the output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub path: PathBuf,
    pub content: String,
}

impl GeneratedFile {
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct WriteSummary {
    pub changed: Vec<PathBuf>,
    pub written: Vec<PathBuf>,
}

/// Destination of generated files.
pub trait Writer {
    fn write(&mut self, files: &[GeneratedFile]) -> anyhow::Result<WriteSummary>;
}

/// Writes files under `dir`, skipping the ones whose content is unchanged.
#[derive(Debug, Clone)]
pub struct FileWriter {
    pub dir: PathBuf,
    /// Only report what would change.
    pub dry_run: bool,
    /// Fail if anything would change.
    pub check: bool,
}

impl FileWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            dry_run: false,
            check: false,
        }
    }
}

impl Writer for FileWriter {
    fn write(&mut self, files: &[GeneratedFile]) -> anyhow::Result<WriteSummary> {
        let mut files = files
            .iter()
            .map(|f| (self.dir.join(&f.path), f.content.as_str()))
            .collect::<Vec<_>>();
        files.sort_by(|a, b| a.0.cmp(&b.0));

        let mut summary = WriteSummary::default();

        for (path, content) in &files {
            let existing = std::fs::read_to_string(path).ok();
            if existing.as_deref() != Some(*content) {
                summary.changed.push(path.clone());
            }
        }

        if self.dry_run {
            for p in &summary.changed {
                println!("would write {}", p.display());
            }
            return Ok(summary);
        }

        if self.check {
            if !summary.changed.is_empty() {
                anyhow::bail!("generated files are out of date");
            }
            return Ok(summary);
        }

        for (path, content) in &files {
            if !summary.changed.contains(path) {
                continue;
            }
            write_atomic(path, content)?;
            summary.written.push(path.clone());
        }

        for p in &summary.written {
            println!("wrote {}", p.display());
        }

        Ok(summary)
    }
}

fn write_atomic(path: &Path, content: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| anyhow::anyhow!("failed to create directory {}: {e}", parent.display()))?;
    }

    let tmp = tmp_path(path);
    std::fs::write(&tmp, content)
        .map_err(|e| anyhow::anyhow!("failed to write {}: {e}", tmp.display()))?;
    std::fs::rename(&tmp, path).map_err(|e| {
        anyhow::anyhow!(
            "failed to rename {} -> {}: {e}",
            tmp.display(),
            path.display()
        )
    })?;
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => path.with_extension(format!("{ext}.tmp")),
        None => path.with_extension("tmp"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("pggo-write-{name}-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn writes_nested_files_and_skips_unchanged() {
        let dir = temp_dir("nested");
        let files = vec![
            GeneratedFile::new("users.rs", "pub struct Users;\n"),
            GeneratedFile::new("schema/users.rs", "pub struct UsersSchema;\n"),
        ];

        let mut writer = FileWriter::new(&dir);
        let first = writer.write(&files).unwrap();
        assert_eq!(first.written.len(), 2);
        assert_eq!(
            std::fs::read_to_string(dir.join("schema/users.rs")).unwrap(),
            "pub struct UsersSchema;\n"
        );
        assert!(!dir.join("schema/users.rs.tmp").exists());

        let second = writer.write(&files).unwrap();
        assert!(second.changed.is_empty());
        assert!(second.written.is_empty());

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn dry_run_does_not_touch_disk() {
        let dir = temp_dir("dry-run");
        let mut writer = FileWriter {
            dry_run: true,
            ..FileWriter::new(&dir)
        };

        let summary = writer
            .write(&[GeneratedFile::new("users.rs", "x")])
            .unwrap();
        assert_eq!(summary.changed, vec![dir.join("users.rs")]);
        assert!(summary.written.is_empty());
        assert!(!dir.exists());
    }

    #[test]
    fn check_fails_when_output_is_stale() {
        let dir = temp_dir("check");
        let files = [GeneratedFile::new("users.rs", "x")];

        let mut check = FileWriter {
            check: true,
            ..FileWriter::new(&dir)
        };
        let err = check.write(&files).unwrap_err();
        assert!(err.to_string().contains("out of date"));

        FileWriter::new(&dir).write(&files).unwrap();
        assert!(check.write(&files).unwrap().changed.is_empty());

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
