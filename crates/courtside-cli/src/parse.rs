//! `courtside parse`: run the response extractor on saved text.

use std::path::Path;

use anyhow::{Context, Result};
use tokio::io::AsyncReadExt;

use courtside_gemini::{shots_from_response, ResponseShots};

async fn read_response(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        tokio::io::stdin()
            .read_to_string(&mut text)
            .await
            .context("Failed to read stdin")?;
        return Ok(text);
    }
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))
}

/// Entry point for the `parse` subcommand.
pub async fn run(path: &Path, json: bool) -> Result<()> {
    let text = read_response(path).await?;

    match shots_from_response(&text) {
        ResponseShots::Detected { shots, method } => {
            if json {
                println!("{}", serde_json::to_string_pretty(&shots)?);
            } else {
                println!("{} shots ({:?})\n", shots.len(), method);
                print!("{}", crate::render::shot_table(&shots));
            }
        }
        ResponseShots::NoShotsDetected => {
            if json {
                println!("[]");
            } else {
                println!("No shots detected.");
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_reads_response_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("response.txt");
        tokio::fs::write(&path, "MADE - Layup. Nice touch.").await.unwrap();

        assert_eq!(read_response(&path).await.unwrap(), "MADE - Layup. Nice touch.");
        run(&path, true).await.unwrap();
    }

    #[tokio::test]
    async fn test_missing_file_is_an_error() {
        let err = run(Path::new("/nonexistent/response.txt"), false).await.unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }
}
