//! Report renderer that writes the markup straight to disk.
//!
//! The HTML opens in any browser, which takes care of printing and
//! saving as PDF.

use async_trait::async_trait;
use std::path::PathBuf;

use super::{DocumentRenderer, FileRef, RenderError};

pub struct HtmlFileRenderer {
    dir: PathBuf,
}

impl HtmlFileRenderer {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn next_path(&self) -> PathBuf {
        let stamp = chrono::Local::now().format("%Y%m%d-%H%M%S-%3f");
        self.dir.join(format!("wound-report-{}.html", stamp))
    }
}

#[async_trait]
impl DocumentRenderer for HtmlFileRenderer {
    async fn render(&self, html: &str) -> Result<FileRef, RenderError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| RenderError::Write {
                path: self.dir.clone(),
                source,
            })?;

        let path = self.next_path();
        tokio::fs::write(&path, html)
            .await
            .map_err(|source| RenderError::Write {
                path: path.clone(),
                source,
            })?;

        tracing::info!("Report written to {}", path.display());
        Ok(FileRef::new(path))
    }
}
