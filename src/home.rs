use crate::Result;
use anyhow::Context;
use std::path::{Path, PathBuf};
use tokio::fs;

/// The `Home` object represents the file paths of the `$BUDGET_BOOK_HOME` directory and the
/// fixed locations within it, such as `$BUDGET_BOOK_HOME/config.json` and the SQLite file.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Home {
    root: PathBuf,
    config: PathBuf,
    db: PathBuf,
}

impl Home {
    /// This will create the home directory, if it does not exist, and canonicalize itself.
    pub async fn new(budget_home: impl Into<PathBuf>) -> Result<Self> {
        let maybe_relative = budget_home.into();
        make_dir(&maybe_relative)
            .await
            .context("Unable to create the budget home directory")?;
        let root = fs::canonicalize(&maybe_relative).await.with_context(|| {
            format!(
                "Unable to canonicalize the path {}",
                maybe_relative.to_string_lossy()
            )
        })?;
        Ok(Self {
            config: root.join("config.json"),
            db: root.join("budget.sqlite"),
            root,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &Path {
        &self.config
    }

    pub fn db(&self) -> &Path {
        &self.db
    }
}

async fn make_dir(p: &Path) -> Result<()> {
    fs::create_dir_all(p)
        .await
        .with_context(|| format!("Unable to create directory at {}", p.to_string_lossy()))
}

#[tokio::test]
async fn test_home() {
    use tempfile::TempDir;
    let dir = TempDir::new().unwrap();
    let home_dir = dir.path().join("budget");
    let home = Home::new(&home_dir).await.unwrap();
    assert!(home.root().is_dir());
    assert!(home.config().ends_with("config.json"));
    assert!(home.db().ends_with("budget.sqlite"));
}
