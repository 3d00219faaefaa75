//! Show command - print metadata files from inside a published file.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Args;
use tracing::debug;

use crate::browser::Browser;
use crate::registry::Fetch;

use super::status_error;

#[derive(Args)]
pub struct ShowCmd {
    /// Project name on the index (e.g., requests)
    pub project: String,

    /// Published filename (e.g., requests-2.31.0-py3-none-any.whl)
    pub dist: String,

    /// Files inside the archive (METADATA, pyproject.toml, setup.cfg or
    /// setup.py). Shows every one present when omitted.
    pub arcnames: Vec<String>,

    /// Write to a file instead of stdout (one file name only)
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

/// A member read from the archive.
#[derive(Debug)]
struct Shown {
    name: String,
    content: Vec<u8>,
}

impl ShowCmd {
    pub async fn run(&self, index_url: Option<&str>) -> Result<()> {
        let config = super::load_config(index_url)?;
        let browser = Browser::from_config(&config)?;

        match (&self.output, self.arcnames.as_slice()) {
            (Some(path), [arcname]) => {
                let content = browser
                    .read(&self.project, &self.dist, arcname)
                    .await
                    .map_err(status_error)?;
                tokio::fs::write(path, &content)
                    .await
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                eprintln!("Wrote {} bytes to {}", content.len(), path.display());
            }
            (Some(_), _) => bail!("--output takes exactly one file name"),
            (None, _) => {
                let shown = self.collect(&browser).await?;
                let mut stdout = std::io::stdout().lock();
                write_shown(&mut stdout, &shown)?;
                stdout.flush()?;
            }
        }

        Ok(())
    }

    /// Read the requested members through one browser, so they share a
    /// single download of the archive.
    async fn collect<F: Fetch>(&self, browser: &Browser<F>) -> Result<Vec<Shown>> {
        let entry = browser
            .find_entry(&self.project, &self.dist)
            .await
            .map_err(status_error)?;

        let requested = !self.arcnames.is_empty();
        let names: Vec<&str> = if requested {
            self.arcnames.iter().map(String::as_str).collect()
        } else {
            entry.useful_filenames().to_vec()
        };

        let results = browser.read_members(&entry, &names).await;

        let mut shown = Vec::with_capacity(names.len());
        for (name, result) in names.into_iter().zip(results) {
            match result {
                Ok(content) => shown.push(Shown {
                    name: name.to_string(),
                    content,
                }),
                // Sdists rarely carry all of their useful files.
                Err(e) if !requested && e.is_not_found() => {
                    debug!(member = name, "not present");
                }
                Err(e) => return Err(status_error(e)),
            }
        }

        if shown.is_empty() {
            bail!("[404] no metadata files found in {}", self.dist);
        }
        Ok(shown)
    }
}

/// A single file is written as-is; several get `==> name <==` headers.
fn write_shown(out: &mut impl Write, shown: &[Shown]) -> std::io::Result<()> {
    if let [file] = shown {
        return out.write_all(&file.content);
    }

    for (i, file) in shown.iter().enumerate() {
        if i > 0 {
            writeln!(out)?;
        }
        writeln!(out, "==> {} <==", file.name)?;
        out.write_all(&file.content)?;
        if !file.content.ends_with(b"\n") {
            writeln!(out)?;
        }
    }
    Ok(())
}
