//! CLI execution context.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use bottega_commerce::catalog::InMemoryCatalog;
use bottega_commerce::StorefrontConfig;

use crate::output::Output;

/// File names searched for, in order, in each directory.
pub const CONFIG_NAMES: [&str; 3] = ["bottega.toml", ".bottega.toml", "bottega.json"];

/// Execution context for CLI commands.
pub struct Context {
    /// Storefront configuration.
    pub config: StorefrontConfig,
    /// Where the configuration came from, if a file was found.
    pub config_path: Option<PathBuf>,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
    catalog_override: Option<String>,
}

impl Context {
    /// Load context from an explicit config file or the nearest one found
    /// walking up from the working directory.
    pub fn load(
        config_path: Option<&str>,
        catalog_path: Option<&str>,
        output: Output,
    ) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;
        Self::load_in(cwd, config_path, catalog_path, output)
    }

    pub(crate) fn load_in(
        cwd: PathBuf,
        config_path: Option<&str>,
        catalog_path: Option<&str>,
        output: Output,
    ) -> Result<Self> {
        let (config, config_path) = match config_path {
            Some(path) => {
                let path = resolve_against(&cwd, path);
                let config = StorefrontConfig::load(&path)
                    .with_context(|| format!("Failed to load config file: {}", path.display()))?;
                (config, Some(path))
            }
            None => match Self::find_config(&cwd) {
                Some((config, path)) => (config, Some(path)),
                None => (StorefrontConfig::default(), None),
            },
        };

        Ok(Self {
            config: config.with_env_overrides(),
            config_path,
            output,
            cwd,
            catalog_override: catalog_path.map(str::to_string),
        })
    }

    /// Find config file in directory tree.
    fn find_config(start: &Path) -> Option<(StorefrontConfig, PathBuf)> {
        let mut current = start.to_path_buf();
        loop {
            for name in &CONFIG_NAMES {
                let config_path = current.join(name);
                if config_path.exists() {
                    if let Ok(config) = StorefrontConfig::load(&config_path) {
                        return Some((config, config_path));
                    }
                }
            }

            if !current.pop() {
                break;
            }
        }

        None
    }

    /// Path of the catalog document.
    ///
    /// `--catalog` is relative to the working directory; `catalog_path` from
    /// a config file is relative to that file's directory.
    pub fn catalog_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.catalog_override {
            return Ok(self.resolve_path(path));
        }
        let path = self
            .config
            .catalog_path
            .as_deref()
            .context("No catalog given: pass --catalog or set catalog_path in bottega.toml")?;
        let base = self
            .config_path
            .as_deref()
            .and_then(Path::parent)
            .unwrap_or(&self.cwd);
        Ok(resolve_against(base, path))
    }

    /// Open the catalog named by `--catalog` or the config's `catalog_path`.
    pub fn catalog(&self) -> Result<InMemoryCatalog> {
        let path = self.catalog_path()?;
        self.output
            .debug(&format!("Loading catalog from {}", path.display()));
        InMemoryCatalog::load(&path)
            .with_context(|| format!("Failed to load catalog: {}", path.display()))
    }

    /// Resolve a path relative to the working directory.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        resolve_against(&self.cwd, path)
    }
}

fn resolve_against(base: &Path, path: &str) -> PathBuf {
    if Path::new(path).is_absolute() {
        PathBuf::from(path)
    } else {
        base.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const CATALOG: &str = r#"{"products": [{"id": "p1", "title": "Tazza", "slug": "tazza"}]}"#;

    fn output() -> Output {
        Output::new(false, false)
    }

    #[test]
    fn test_catalog_path_follows_config_found_in_parent() {
        let root = tempfile::tempdir().unwrap();
        fs::write(root.path().join("bottega.toml"), "catalog_path = \"catalog.json\"\n").unwrap();
        fs::write(root.path().join("catalog.json"), CATALOG).unwrap();
        let nested = root.path().join("ordini").join("2024");
        fs::create_dir_all(&nested).unwrap();

        let ctx = Context::load_in(nested, None, None, output()).unwrap();

        assert_eq!(ctx.config_path, Some(root.path().join("bottega.toml")));
        assert_eq!(ctx.catalog_path().unwrap(), root.path().join("catalog.json"));
        assert_eq!(ctx.catalog().unwrap().document().products.len(), 1);
    }

    #[test]
    fn test_explicit_config_in_subdirectory() {
        let root = tempfile::tempdir().unwrap();
        let demos = root.path().join("demos");
        fs::create_dir_all(&demos).unwrap();
        fs::write(demos.join("bottega.toml"), "catalog_path = \"catalog.json\"\n").unwrap();
        fs::write(demos.join("catalog.json"), CATALOG).unwrap();

        let ctx = Context::load_in(
            root.path().to_path_buf(),
            Some("demos/bottega.toml"),
            None,
            output(),
        )
        .unwrap();

        assert_eq!(ctx.catalog_path().unwrap(), demos.join("catalog.json"));
        assert!(ctx.catalog().is_ok());
    }

    #[test]
    fn test_catalog_flag_is_relative_to_working_directory() {
        let root = tempfile::tempdir().unwrap();
        fs::write(root.path().join("bottega.toml"), "catalog_path = \"catalog.json\"\n").unwrap();
        let nested = root.path().join("lavoro");
        fs::create_dir_all(&nested).unwrap();

        let ctx = Context::load_in(nested.clone(), None, Some("altro.json"), output()).unwrap();

        assert_eq!(ctx.catalog_path().unwrap(), nested.join("altro.json"));
    }

    #[test]
    fn test_missing_explicit_config_fails() {
        let root = tempfile::tempdir().unwrap();
        let ctx = Context::load_in(
            root.path().to_path_buf(),
            Some("missing.toml"),
            None,
            output(),
        );
        assert!(ctx.is_err());
    }
}
