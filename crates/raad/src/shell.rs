// SPDX-FileCopyrightText: 2026 Raad Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `raad shell` command implementation.
//!
//! Interactive REPL with a colored prompt and readline history. Plain lines
//! are questions for the selected dataset; lines starting with `/` are
//! commands.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use colored::Colorize;
use raad_agent::{DisplayAction, RecentQuery, Reply, examples};
use raad_config::RaadConfig;
use raad_core::{RaadError, Table};
use raad_data::{
    PreviewStats, StoreInfo, export_filename, preview, render_text_table, summaries,
    table_to_csv, write_export,
};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use crate::app::App;

/// A parsed shell input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Ask(String),
    Dataset(Option<String>),
    Datasets,
    Preview,
    Examples,
    History,
    Clear,
    Export(Option<PathBuf>),
    SaveTable,
    Recent,
    Favorite(Option<String>),
    Unfavorite(Option<String>),
    Favorites,
    Help,
    Quit,
    Unknown(String),
}

impl ShellCommand {
    /// Parses one line. Blank lines yield `None`.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        let Some(rest) = line.strip_prefix('/') else {
            return Some(ShellCommand::Ask(line.to_string()));
        };
        let (name, arg) = match rest.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, Some(arg.trim().to_string()).filter(|a| !a.is_empty())),
            None => (rest, None),
        };
        Some(match name {
            "dataset" => ShellCommand::Dataset(arg),
            "datasets" => ShellCommand::Datasets,
            "preview" => ShellCommand::Preview,
            "examples" => ShellCommand::Examples,
            "history" => ShellCommand::History,
            "clear" => ShellCommand::Clear,
            "export" => ShellCommand::Export(arg.map(PathBuf::from)),
            "csv" => ShellCommand::SaveTable,
            "recent" => ShellCommand::Recent,
            "favorite" | "fav" => ShellCommand::Favorite(arg),
            "unfavorite" => ShellCommand::Unfavorite(arg),
            "favorites" => ShellCommand::Favorites,
            "help" | "?" => ShellCommand::Help,
            "quit" | "exit" => ShellCommand::Quit,
            other => ShellCommand::Unknown(other.to_string()),
        })
    }
}

const HELP: &str = "\
  /dataset [name]   show or select the dataset (filings, facts, ratios, analytics)
  /datasets         list datasets with row and column counts
  /preview          preview the selected dataset
  /examples         example questions
  /history          show this conversation
  /clear            clear the conversation
  /export [file]    save the conversation as markdown
  /csv              save the last table as CSV
  /recent           recent questions with their dataset
  /favorite [text]  save a question as favorite (default: the last one asked)
  /unfavorite text  remove a favorite
  /favorites        list favorite questions
  /quit             exit";

/// Runs the `raad shell` interactive REPL.
pub async fn run_shell(config: RaadConfig) -> Result<(), RaadError> {
    let app = App::new(config)?;
    let datasets = app.load_data()?;
    let mut session = app.session();
    let mut last_table: Option<Table> = None;

    let mut rl = DefaultEditor::new()
        .map_err(|e| RaadError::Internal(format!("failed to initialize readline: {e}")))?;

    let info = StoreInfo::of(&datasets);
    println!("{}", "raad shell".bold().green());
    println!(
        "{}",
        format!(
            "{} companies, {} periods | model: {}",
            info.companies, info.periods, app.engine_status.model_display
        )
        .dimmed()
    );
    if let Some(reason) = &app.engine_status.error {
        println!("{}", reason.yellow());
    }
    println!("Type {} for commands, {} to exit.\n", "/help".yellow(), "/quit".yellow());

    loop {
        let prompt = format!("{}> ", format!("raad:{}", session.dataset()).green());
        let line = match rl.readline(&prompt) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("{}: {e}", "error".red());
                break;
            }
        };
        let Some(command) = ShellCommand::parse(&line) else {
            continue;
        };
        let _ = rl.add_history_entry(line.trim());

        match command {
            ShellCommand::Quit => break,
            ShellCommand::Ask(question) => match session.ask(&question).await {
                Ok(reply) => {
                    if let DisplayAction::Table(table) = &reply.display {
                        last_table = Some(table.clone());
                    }
                    print_reply(&reply, true);
                }
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => eprintln!("{}: {e}", "error".red()),
            },
            ShellCommand::Dataset(None) => println!("dataset: {}", session.dataset()),
            ShellCommand::Dataset(Some(name)) => match session.select_dataset(&name) {
                Ok(dataset) => println!("dataset: {}", dataset.to_string().bold()),
                Err(e) => eprintln!("{}: {e}", "error".red()),
            },
            ShellCommand::Datasets => {
                for s in summaries(&datasets) {
                    println!(
                        "  {:<10} {:<22} {:>7} rows {:>4} cols  {}",
                        s.name.to_string().bold(),
                        s.display_name,
                        s.rows,
                        s.columns,
                        s.description.dimmed()
                    );
                }
            }
            ShellCommand::Preview => {
                let table = datasets.get(session.dataset());
                let stats = PreviewStats::of(table);
                print!(
                    "{}",
                    render_text_table(&preview(
                        table,
                        app.config.data.preview_rows,
                        app.config.data.preview_cols
                    ))
                );
                println!(
                    "{}",
                    format!("{} rows x {} columns", stats.rows, stats.columns).dimmed()
                );
            }
            ShellCommand::Examples => {
                for (category, items) in examples::by_category() {
                    println!("{}", category.to_string().bold());
                    for e in items {
                        println!("  {:<34} {}", e.label, e.query.dimmed());
                    }
                }
            }
            ShellCommand::History => {
                for message in session.history().all() {
                    println!(
                        "{} {:<9} {}",
                        message.formatted_timestamp().dimmed(),
                        message.role().to_string().cyan(),
                        message.content()
                    );
                }
            }
            ShellCommand::Clear => {
                session.clear_history();
                println!("{}", "history cleared".dimmed());
            }
            ShellCommand::Export(path) => {
                let now = Utc::now();
                let markdown = session.history().to_markdown_at(now);
                let exports_dir = &app.config.data.exports_dir;
                match export_to(exports_dir, path.as_deref(), "chat_history", "md", &markdown, now) {
                    Ok(path) => println!("saved {}", path.display()),
                    Err(e) => eprintln!("{}: {e}", "error".red()),
                }
            }
            ShellCommand::SaveTable => match &last_table {
                Some(table) => {
                    let exports_dir = &app.config.data.exports_dir;
                    let written = table_to_csv(table)
                        .and_then(|csv| {
                            export_to(exports_dir, None, "query_results", "csv", &csv, Utc::now())
                        });
                    match written {
                        Ok(path) => println!("saved {}", path.display()),
                        Err(e) => eprintln!("{}: {e}", "error".red()),
                    }
                }
                None => println!("{}", "no table to save yet".dimmed()),
            },
            ShellCommand::Recent => {
                for recent in session.recent_queries() {
                    println!(
                        "  {} {:<10} {}",
                        recent.at.format("%H:%M:%S").to_string().dimmed(),
                        recent.dataset.to_string().cyan(),
                        recent.query
                    );
                }
            }
            ShellCommand::Favorite(query) => {
                match favorite_candidate(query, session.recent_queries()) {
                    Some(query) => match session.add_favorite(&query) {
                        Ok(true) => println!("saved favorite: {query}"),
                        Ok(false) => println!("{}", "already a favorite".dimmed()),
                        Err(e) => eprintln!("{}: {e}", "error".red()),
                    },
                    None => println!("{}", "no question to save yet".dimmed()),
                }
            }
            ShellCommand::Unfavorite(None) => println!("usage: /unfavorite <question>"),
            ShellCommand::Unfavorite(Some(query)) => {
                if session.remove_favorite(&query) {
                    println!("removed favorite: {query}");
                } else {
                    println!("{}", "not a favorite".dimmed());
                }
            }
            ShellCommand::Favorites => {
                if session.favorites().is_empty() {
                    println!("{}", "no favorites yet".dimmed());
                }
                for (i, query) in session.favorites().iter().enumerate() {
                    println!("  {:>2}. {query}", i + 1);
                }
            }
            ShellCommand::Help => println!("{HELP}"),
            ShellCommand::Unknown(name) => {
                eprintln!("unknown command /{name}, try {}", "/help".yellow());
            }
        }
    }

    println!("{}", "goodbye".dimmed());
    Ok(())
}

/// The question `/favorite` saves: the argument, else the last question asked.
fn favorite_candidate(arg: Option<String>, recent: &[RecentQuery]) -> Option<String> {
    arg.or_else(|| recent.first().map(|r| r.query.clone()))
}

/// Writes to `file` when given, else to a timestamped file in `exports_dir`.
fn export_to(
    exports_dir: &Path,
    file: Option<&Path>,
    base: &str,
    extension: &str,
    contents: &str,
    at: DateTime<Utc>,
) -> Result<PathBuf, RaadError> {
    match file {
        Some(file) => {
            let name = file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .ok_or_else(|| RaadError::Internal(format!("not a file path: {}", file.display())))?;
            let dir = file.parent().unwrap_or(Path::new(""));
            write_export(dir, &name, contents)
        }
        None => write_export(
            exports_dir,
            &export_filename(base, extension, &at),
            contents,
        ),
    }
}

/// Prints an answer: text as-is, tables aligned, charts by path, then any code.
pub fn print_reply(reply: &Reply, color: bool) {
    match &reply.display {
        DisplayAction::Text(text) if color && text.starts_with(raad_agent::ERROR_PREFIX) => {
            println!("{}", text.red());
        }
        DisplayAction::Text(text) => println!("{text}"),
        DisplayAction::Table(table) => {
            print!("{}", render_text_table(table));
            let footer = format!("({} rows)", table.row_count());
            if color {
                println!("{}", footer.dimmed());
            } else {
                println!("{footer}");
            }
        }
        DisplayAction::Chart(path) => println!("Chart saved to {}", path.display()),
    }

    if let Some(kind) = reply.error_type {
        let heading = format!("{}:", kind.title());
        if color {
            println!("{}", heading.yellow());
        } else {
            println!("{heading}");
        }
        for step in kind.resolution_steps() {
            println!("  - {step}");
        }
    }

    if let Some(code) = reply.code.as_deref().filter(|c| !c.trim().is_empty()) {
        if color {
            println!("\n{}\n{}", "Generated code:".dimmed(), code.trim_end().dimmed());
        } else {
            println!("\nGenerated code:\n{}", code.trim_end());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn plain_lines_are_questions() {
        assert_eq!(
            ShellCommand::parse("  Top 10 by revenue? "),
            Some(ShellCommand::Ask("Top 10 by revenue?".into()))
        );
        assert_eq!(ShellCommand::parse("   "), None);
    }

    #[test]
    fn commands_with_arguments() {
        assert_eq!(
            ShellCommand::parse("/dataset ratios"),
            Some(ShellCommand::Dataset(Some("ratios".into())))
        );
        assert_eq!(ShellCommand::parse("/dataset"), Some(ShellCommand::Dataset(None)));
        assert_eq!(
            ShellCommand::parse("/export out/chat.md"),
            Some(ShellCommand::Export(Some(PathBuf::from("out/chat.md"))))
        );
        assert_eq!(ShellCommand::parse("/exit"), Some(ShellCommand::Quit));
        assert_eq!(ShellCommand::parse("/favorite"), Some(ShellCommand::Favorite(None)));
        assert_eq!(
            ShellCommand::parse("/favorite  Top 10 by revenue "),
            Some(ShellCommand::Favorite(Some("Top 10 by revenue".into())))
        );
        assert_eq!(
            ShellCommand::parse("/unfavorite ROE by sector"),
            Some(ShellCommand::Unfavorite(Some("ROE by sector".into())))
        );
        assert_eq!(ShellCommand::parse("/unfavorite"), Some(ShellCommand::Unfavorite(None)));
        assert_eq!(ShellCommand::parse("/favorites"), Some(ShellCommand::Favorites));
        assert_eq!(ShellCommand::parse("/recent"), Some(ShellCommand::Recent));
        assert_eq!(
            ShellCommand::parse("/frobnicate"),
            Some(ShellCommand::Unknown("frobnicate".into()))
        );
    }

    #[test]
    fn favorite_defaults_to_last_question() {
        let recent = vec![
            RecentQuery {
                query: "Net profit 2024".into(),
                dataset: raad_core::DatasetName::Facts,
                at: Utc::now(),
            },
            RecentQuery {
                query: "Top 10 by revenue".into(),
                dataset: raad_core::DatasetName::Analytics,
                at: Utc::now(),
            },
        ];
        assert_eq!(
            favorite_candidate(None, &recent).as_deref(),
            Some("Net profit 2024")
        );
        assert_eq!(
            favorite_candidate(Some("ROE by sector".into()), &recent).as_deref(),
            Some("ROE by sector")
        );
        assert_eq!(favorite_candidate(None, &[]), None);
    }

    #[test]
    fn export_to_explicit_and_default_paths() {
        let dir = tempfile::tempdir().unwrap();
        let explicit = dir.path().join("nested").join("chat.md");
        let at = Utc.with_ymd_and_hms(2026, 3, 1, 14, 5, 9).unwrap();
        let written =
            export_to(dir.path(), Some(&explicit), "chat_history", "md", "# hi", at).unwrap();
        assert_eq!(written, explicit);
        assert_eq!(std::fs::read_to_string(&explicit).unwrap(), "# hi");

        let written = export_to(dir.path(), None, "query_results", "csv", "a\n1\n", at).unwrap();
        assert_eq!(written, dir.path().join("query_results_20260301_140509.csv"));
    }
}
