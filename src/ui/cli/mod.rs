//! CLI - reedline-based REPL interface
//!
//! Headless mode: browse, filter and export the records, and run the
//! georeferencing and measuring tools, without opening a window.

use anyhow::Result;
use colored::Colorize;
use reedline::{Prompt, PromptHistorySearch, PromptHistorySearchStatus, Reedline, Signal};
use std::borrow::Cow;

use crate::app::{execute, help_entries, parse_command, AppCommand, CommandEffect, Session};

/// Prompt showing the visible record count and active filter
pub struct DikePrompt {
    visible: usize,
    total: usize,
    filter: String,
}

impl DikePrompt {
    pub fn new() -> Self {
        Self {
            visible: 0,
            total: 0,
            filter: String::new(),
        }
    }

    /// Refresh from the session after each command
    pub fn update(&mut self, session: &Session) {
        self.visible = session.table.visible_len();
        self.total = session.table.len();
        self.filter = session.table.filter().to_string();
    }
}

impl Default for DikePrompt {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompt for DikePrompt {
    fn render_prompt_left(&self) -> Cow<'_, str> {
        if self.filter.is_empty() {
            Cow::Owned(format!("[{}]", self.total))
        } else {
            Cow::Owned(format!("[{}/{} {}]", self.visible, self.total, self.filter))
        }
    }

    fn render_prompt_right(&self) -> Cow<'_, str> {
        Cow::Borrowed("")
    }

    fn render_prompt_indicator(&self, _prompt_mode: reedline::PromptEditMode) -> Cow<'_, str> {
        Cow::Borrowed("> ")
    }

    fn render_prompt_multiline_indicator(&self) -> Cow<'_, str> {
        Cow::Borrowed("... ")
    }

    fn render_prompt_history_search_indicator(
        &self,
        history_search: PromptHistorySearch,
    ) -> Cow<'_, str> {
        let prefix = match history_search.status {
            PromptHistorySearchStatus::Passing => "",
            PromptHistorySearchStatus::Failing => "(failed) ",
        };
        Cow::Owned(format!("(search: {}{}) ", prefix, history_search.term))
    }
}

/// Print the help message
fn print_help() {
    println!("{}", "DikeFinder CLI Commands".bold().cyan());
    println!("{}", "═".repeat(50).cyan());
    for (usage, desc) in help_entries() {
        println!("  {:<38} {}", usage.green(), desc);
    }
}

/// Print command output with the log-prefix colors
fn print_lines(lines: &[String]) {
    for line in lines {
        if let Some(rest) = line.strip_prefix("[✓]") {
            println!("{}{}", "[✓]".green(), rest);
        } else if let Some(rest) = line.strip_prefix("[✗]") {
            println!("{}{}", "[✗]".red(), rest);
        } else if let Some(rest) = line.strip_prefix("[!]") {
            println!("{}{}", "[!]".yellow(), rest);
        } else {
            println!("{}", line);
        }
    }
}

/// Run the CLI REPL
pub fn run_cli(mut session: Session) -> Result<()> {
    let mut line_editor = Reedline::create();
    let mut prompt = DikePrompt::new();
    prompt.update(&session);

    println!(
        "{}",
        "╔══════════════════════════════════════════════════════════════╗".cyan()
    );
    println!(
        "{}",
        "║  DikeFinder CLI - Type 'help' for commands, 'quit' to exit   ║".cyan()
    );
    println!(
        "{}",
        "╚══════════════════════════════════════════════════════════════╝".cyan()
    );
    println!(
        "[*] {} records from {}",
        session.table.len(),
        session.source_label()
    );

    loop {
        let sig = line_editor.read_line(&prompt)?;
        match sig {
            Signal::Success(buffer) => {
                let input = buffer.trim();
                if input.is_empty() {
                    continue;
                }

                let cmd = parse_command(input);
                if cmd == AppCommand::Help {
                    print_help();
                    continue;
                }
                let output = execute(&mut session, cmd);
                print_lines(&output.lines);
                match output.effect {
                    CommandEffect::Quit => break,
                    CommandEffect::Clear => {
                        line_editor.clear_screen()?;
                    }
                    CommandEffect::Select(row) => {
                        log::debug!("Selected source row {}", row);
                    }
                    _ => {}
                }
                prompt.update(&session);
            }
            Signal::CtrlD | Signal::CtrlC => {
                println!("\n[*] Interrupted");
                break;
            }
        }
    }

    Ok(())
}
