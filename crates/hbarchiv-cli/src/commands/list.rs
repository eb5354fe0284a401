//! List command implementation
//!
//! Prints the audiobook catalog with normalized author and title names.

use anyhow::{Context, Result};
use colored::Colorize;
use hbarchiv_convert::find_audiobooks;
use hbarchiv_core::ensure_root;
use serde::Serialize;
use std::path::Path;
use std::process::ExitCode;

/// One catalog entry in JSON output.
#[derive(Debug, Serialize)]
pub struct BookEntry {
    pub author: String,
    pub normalized_author: String,
    pub title: String,
    pub normalized_title: String,
    pub path: String,
    pub file_count: usize,
}

/// JSON output for the list command.
#[derive(Debug, Serialize)]
pub struct ListOutput {
    pub root: String,
    pub count: usize,
    pub books: Vec<BookEntry>,
}

/// Run the list command
///
/// # Arguments
/// * `root` - Archive root directory
/// * `files` - Whether to list every audio file per book
/// * `json` - Whether to output machine-readable JSON
///
/// # Returns
/// Exit code: 0 on success, 2 if the root is not a directory
pub fn run(root: &str, files: bool, json: bool) -> Result<ExitCode> {
    let root_path = Path::new(root);
    if let Err(err) = ensure_root(root_path) {
        eprintln!("{}", err.to_string().red());
        return Ok(ExitCode::from(2));
    }

    let books = find_audiobooks(root_path)
        .with_context(|| format!("failed to scan archive root: {root}"))?;

    if json {
        let output = ListOutput {
            root: root.to_string(),
            count: books.len(),
            books: books
                .iter()
                .map(|book| BookEntry {
                    author: book.author.clone(),
                    normalized_author: book.normalized_author(),
                    title: book.title.clone(),
                    normalized_title: book.normalized_title(),
                    path: book.path.display().to_string(),
                    file_count: book.audio_files.len(),
                })
                .collect(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(ExitCode::SUCCESS);
    }

    println!("{} {}", "Gefundene Hörbücher:".cyan().bold(), books.len());
    for book in &books {
        println!(
            "{} {} -> {}, {} {} -> {} ({} Dateien)",
            "Author:".bold(),
            book.author,
            book.normalized_author(),
            "Titel:".bold(),
            book.title,
            book.normalized_title(),
            book.audio_files.len()
        );
        if files {
            for file in &book.audio_files {
                println!("  {}", file.display().to_string().dimmed());
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
