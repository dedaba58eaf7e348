//! Ingest command handler.

use clap::Args;
use paperbrain_core::{config::AppConfig, AppError, AppResult};
use paperbrain_knowledge::extract;
use std::path::PathBuf;
use walkdir::WalkDir;

/// Ingest documents into the index
#[derive(Args, Debug)]
pub struct IngestCommand {
    /// Files or directories to ingest (directories are walked recursively)
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl IngestCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        let files = collect_files(&self.paths)?;
        if files.is_empty() {
            return Err(AppError::Config(
                "no supported documents found (pdf, txt, docx)".to_string(),
            ));
        }

        tracing::info!("Ingesting {} files", files.len());

        let mut session = super::open_session(config).await?;
        let report = session.upload_all(&files).await;

        if !report.ingested.is_empty() {
            session.index().save(&config.index_path)?;
        }

        if self.json {
            let output = serde_json::json!({
                "ingested": report.ingested.iter().map(|(name, chunks)| {
                    serde_json::json!({ "file": name, "chunks": chunks })
                }).collect::<Vec<_>>(),
                "failures": report.failures.iter().map(|(name, error)| {
                    serde_json::json!({ "file": name, "error": error })
                }).collect::<Vec<_>>(),
                "indexedChunks": session.index().len(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            for (name, chunks) in &report.ingested {
                println!("Ingested {} ({} chunks)", name, chunks);
            }
            for (name, error) in &report.failures {
                println!("Skipped {}: {}", name, error);
            }
            println!(
                "\nIndex now holds {} chunks from {} documents",
                session.index().len(),
                session.index().document_count()
            );
        }

        // All files failing is an error, partial success is not
        if report.ingested.is_empty() {
            return Err(AppError::Extraction(
                "no files could be ingested".to_string(),
            ));
        }

        Ok(())
    }
}

/// Expand the given paths into supported files, walking directories.
fn collect_files(paths: &[PathBuf]) -> AppResult<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_dir() {
            for entry in WalkDir::new(path).sort_by_file_name() {
                let entry = entry.map_err(|e| {
                    AppError::Io(std::io::Error::other(format!(
                        "failed to walk {}: {}",
                        path.display(),
                        e
                    )))
                })?;
                if entry.file_type().is_file() && extract::is_supported(entry.path()) {
                    files.push(entry.into_path());
                }
            }
        } else {
            // Explicitly named files are passed through even when
            // unsupported, so the user sees the per-file error.
            files.push(path.clone());
        }
    }

    Ok(files)
}
