//! List command - show a project's published files, latest first.

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use crate::archive::{ArchiveKind, Entry};
use crate::browser::Browser;

#[derive(Args)]
pub struct ListCmd {
    /// Project name on the index (e.g., requests)
    pub project: String,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

/// One row of `wfb list --json`.
#[derive(Debug, Serialize)]
struct EntrySummary<'a> {
    filename: &'a str,
    kind: ArchiveKind,
    url: &'a str,
    requires_python: Option<&'a str>,
    yanked: bool,
    files: Vec<FileSummary>,
}

#[derive(Debug, Serialize)]
struct FileSummary {
    name: &'static str,
    path: String,
}

impl<'a> From<&'a Entry> for EntrySummary<'a> {
    fn from(entry: &'a Entry) -> Self {
        Self {
            filename: entry.filename(),
            kind: entry.kind,
            url: &entry.link.url,
            requires_python: entry.link.requires_python.as_deref(),
            yanked: entry.link.yanked.is_some(),
            files: entry
                .useful_filenames()
                .iter()
                .map(|&name| FileSummary {
                    name,
                    path: entry.url_for_content(name),
                })
                .collect(),
        }
    }
}

impl ListCmd {
    pub async fn run(&self, index_url: Option<&str>) -> Result<()> {
        let config = super::load_config(index_url)?;
        let browser = Browser::from_config(&config)?;

        let entries = browser
            .entries(&self.project)
            .await
            .map_err(super::status_error)?;

        if self.json {
            let summaries: Vec<EntrySummary> = entries.iter().map(EntrySummary::from).collect();
            println!("{}", serde_json::to_string_pretty(&summaries)?);
            return Ok(());
        }

        if entries.is_empty() {
            println!("No files published for '{}'.", self.project);
            return Ok(());
        }

        for entry in &entries {
            println!("{}", format_entry(entry));
            for name in entry.useful_filenames() {
                println!("    {:<16} {}", name, entry.url_for_content(name));
            }
        }

        Ok(())
    }
}

fn format_entry(entry: &Entry) -> String {
    let mut line = format!("{} [{}]", entry.filename(), entry.kind);
    if let Some(requires) = &entry.link.requires_python {
        line.push_str(&format!(" (python {})", requires));
    }
    match entry.link.yanked.as_deref() {
        Some("") => line.push_str(" [yanked]"),
        Some(reason) => line.push_str(&format!(" [yanked: {}]", reason)),
        None => {}
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ArtifactLink;

    #[test]
    fn test_format_entry() {
        let mut link =
            ArtifactLink::new("demo-1.0.tar.gz", "https://files.example/demo-1.0.tar.gz");
        link.requires_python = Some(">=3.8".to_string());
        let entry = Entry::new("demo", link);

        assert_eq!(
            format_entry(&entry),
            "demo-1.0.tar.gz [sdist (tar.gz)] (python >=3.8)"
        );
    }

    #[test]
    fn test_format_yanked_entry() {
        let mut link = ArtifactLink::new("demo-1.0.zip", "https://files.example/demo-1.0.zip");
        link.yanked = Some("broken".to_string());
        let entry = Entry::new("demo", link);

        assert_eq!(
            format_entry(&entry),
            "demo-1.0.zip [sdist (zip)] [yanked: broken]"
        );
    }

    #[test]
    fn test_summary_lists_content_paths() {
        let entry = Entry::new(
            "demo",
            ArtifactLink::new(
                "demo-1.0-py3-none-any.whl",
                "https://files.example/demo-1.0-py3-none-any.whl",
            ),
        );

        let summary = EntrySummary::from(&entry);
        assert_eq!(summary.files.len(), 1);
        assert_eq!(summary.files[0].name, "METADATA");
        assert_eq!(
            summary.files[0].path,
            "/demo/demo-1.0-py3-none-any.whl/METADATA"
        );
        assert!(!summary.yanked);
    }
}
