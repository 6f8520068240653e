//! Command processing
//!
//! Shared command definitions used by both CLI and GUI.

use std::path::Path;

use crate::data::{export_csv, SortColumn, SortOrder, COLUMN_HEADERS};
use crate::geodesy::{georeference_workbook, measure};

use super::state::Session;

/// Rows printed by `list` without a count
pub const DEFAULT_LIST_ROWS: usize = 20;

/// Application commands that can be executed
#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    /// Load an Excel workbook
    Load(String),
    /// Set the map image directory
    Images(String),
    /// Print the first N visible rows
    List(usize),
    /// Filter by photo name (`None` clears)
    Filter(Option<String>),
    /// List filter prefixes and their images
    Prefixes,
    /// Sort by a column; no order toggles
    Sort(SortColumn, Option<SortOrder>),
    /// Show (select) the row with a sequence number
    Show(usize),
    /// Export the visible rows to CSV
    Export(String),
    /// Georeference a workbook
    Georef(String),
    /// Distance and angle between two lat/lng points
    Measure([f64; 4]),
    /// Show help
    Help,
    /// Clear console/logs
    Clear,
    /// Quit application
    Quit,
    /// Unknown or malformed command
    Unknown(String),
}

/// Side effect a front end should apply after a command ran
#[derive(Debug, Clone, PartialEq)]
pub enum CommandEffect {
    None,
    /// Records were replaced
    DataReloaded,
    /// Image directory changed
    ImagesChanged,
    /// Filter changed to this prefix (empty = all)
    Filtered(String),
    /// Select this source row
    Select(usize),
    Clear,
    Quit,
}

/// Lines to print plus the effect to apply
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub lines: Vec<String>,
    pub effect: CommandEffect,
}

impl CommandOutput {
    fn lines(lines: Vec<String>) -> Self {
        Self {
            lines,
            effect: CommandEffect::None,
        }
    }

    fn line(line: impl Into<String>) -> Self {
        Self::lines(vec![line.into()])
    }

    fn with_effect(mut self, effect: CommandEffect) -> Self {
        self.effect = effect;
        self
    }
}

/// Parse a command string into AppCommand
pub fn parse_command(input: &str) -> AppCommand {
    let input = input.trim();
    let parts: Vec<&str> = input.splitn(2, ' ').collect();
    let cmd = parts.first().unwrap_or(&"");
    let arg = parts.get(1).map(|s| s.trim()).filter(|s| !s.is_empty());

    match *cmd {
        "load" | "open" | "o" => match arg {
            Some(path) => AppCommand::Load(path.to_string()),
            None => AppCommand::Unknown("load requires a path".into()),
        },
        "images" | "img" => match arg {
            Some(dir) => AppCommand::Images(dir.to_string()),
            None => AppCommand::Unknown("images requires a directory".into()),
        },
        "list" | "ls" => match arg {
            None => AppCommand::List(DEFAULT_LIST_ROWS),
            Some(n) => match n.parse() {
                Ok(n) => AppCommand::List(n),
                Err(_) => AppCommand::Unknown(format!("Invalid row count: {}", n)),
            },
        },
        "filter" | "f" => AppCommand::Filter(arg.map(str::to_string)),
        "prefixes" => AppCommand::Prefixes,
        "sort" => match arg {
            Some(args) => parse_sort(args),
            None => AppCommand::Unknown("sort requires a column".into()),
        },
        "show" => match arg.and_then(|s| s.parse().ok()) {
            Some(seq) => AppCommand::Show(seq),
            None => AppCommand::Unknown("show requires a row number".into()),
        },
        "export" => match arg {
            Some(path) => AppCommand::Export(path.to_string()),
            None => AppCommand::Unknown("export requires a path".into()),
        },
        "georef" => match arg {
            Some(path) => AppCommand::Georef(path.to_string()),
            None => AppCommand::Unknown("georef requires a path".into()),
        },
        "measure" => {
            let values: Result<Vec<f64>, _> = arg
                .unwrap_or("")
                .split_whitespace()
                .map(str::parse::<f64>)
                .collect();
            match values.as_deref() {
                Ok(&[lat1, lng1, lat2, lng2]) => AppCommand::Measure([lat1, lng1, lat2, lng2]),
                _ => AppCommand::Unknown("measure requires <lat1> <lng1> <lat2> <lng2>".into()),
            }
        }
        "help" | "?" => AppCommand::Help,
        "clear" => AppCommand::Clear,
        "quit" | "exit" | "q" => AppCommand::Quit,
        _ => AppCommand::Unknown(format!("Unknown command: '{}'", input)),
    }
}

/// `<column> [asc|desc]`; the column may contain spaces (e.g. `좌표 X`)
fn parse_sort(args: &str) -> AppCommand {
    let (column, order) = match args.rsplit_once(' ') {
        Some((col, "asc")) => (col.trim(), Some(SortOrder::Ascending)),
        Some((col, "desc")) => (col.trim(), Some(SortOrder::Descending)),
        _ => (args, None),
    };
    match SortColumn::parse(column) {
        Some(col) => AppCommand::Sort(col, order),
        None => AppCommand::Unknown(format!("Unknown column: {}", column)),
    }
}

/// Command reference as (usage, description) pairs
pub fn help_entries() -> &'static [(&'static str, &'static str)] {
    &[
        ("load <xlsx>", "Load dike data from an Excel workbook"),
        ("images <dir>", "Set the map image directory"),
        ("list [n]", "Print the first n visible rows"),
        ("filter [photo]", "Filter by photo name (no argument shows all)"),
        ("prefixes", "List photo-name filters with their images"),
        ("sort <col> [asc|desc]", "Sort by column header or number"),
        ("show <#>", "Show the row with this sequence number"),
        ("export <csv>", "Export the visible rows to CSV"),
        ("georef <xlsx>", "Compute lat/lng for every row of a workbook"),
        ("measure <lat1> <lng1> <lat2> <lng2>", "Distance and angle between points"),
        ("clear", "Clear the console"),
        ("help", "Show this help"),
        ("quit", "Quit DikeFinder"),
    ]
}

/// Execute a command against the session
pub fn execute(session: &mut Session, cmd: AppCommand) -> CommandOutput {
    match cmd {
        AppCommand::Load(path) => match session.load_workbook(&path) {
            Ok(count) => {
                CommandOutput::line(format!("[✓] Loaded {} records from {}", count, path))
                    .with_effect(CommandEffect::DataReloaded)
            }
            Err(e) => CommandOutput::line(format!("[✗] Error loading Excel: {}", e)),
        },
        AppCommand::Images(dir) => {
            if !Path::new(&dir).is_dir() {
                return CommandOutput::line(format!("[✗] Not a directory: {}", dir));
            }
            let count = session.set_image_dir(&dir);
            CommandOutput::line(format!(
                "[✓] Image directory set to {} ({} filters)",
                dir, count
            ))
            .with_effect(CommandEffect::ImagesChanged)
        }
        AppCommand::List(n) => CommandOutput::lines(list_rows(session, n)),
        AppCommand::Filter(prefix) => {
            let prefix = prefix.unwrap_or_default();
            session.table.set_filter(&prefix);
            CommandOutput::line(format!("[*] {}", session.filter_summary()))
                .with_effect(CommandEffect::Filtered(prefix))
        }
        AppCommand::Prefixes => {
            if session.prefixes.is_empty() {
                return CommandOutput::line("[!] No photo-name filters (set an image directory)");
            }
            let lines = session
                .prefixes
                .iter()
                .map(|(prefix, path)| {
                    let file = path
                        .file_name()
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_default();
                    format!("  {:<20} {}", prefix, file)
                })
                .collect();
            CommandOutput::lines(lines)
        }
        AppCommand::Sort(column, order) => {
            match order {
                Some(order) => session.table.sort_by(column, order),
                None => session.table.toggle_sort(column),
            }
            let (column, order) = session.table.sort_state();
            CommandOutput::line(format!("[*] Sorted by {} {}", column.header(), order.arrow()))
        }
        AppCommand::Show(seq) => match session.table.row_by_sequence(seq) {
            Some(row) => CommandOutput::lines(describe_row(session, row))
                .with_effect(CommandEffect::Select(row)),
            None => CommandOutput::line(format!("[✗] No visible row #{}", seq)),
        },
        AppCommand::Export(path) => match export_csv(&session.table, &path) {
            Ok(n) => CommandOutput::line(format!("[✓] Exported {} rows to {}", n, path)),
            Err(e) => CommandOutput::line(format!("[✗] Export failed: {}", e)),
        },
        AppCommand::Georef(path) => match georeference_workbook(&path) {
            Ok(report) => {
                let mut lines = vec![format!(
                    "[✓] Georeferenced {} of {} rows across {} images",
                    report.located_rows,
                    report.total_rows,
                    report.transforms.len()
                )];
                for photo in &report.skipped {
                    lines.push(format!("[!] Not enough known coordinates for {}", photo));
                }
                lines.push(format!("[✓] Saved to {}", report.output.display()));
                CommandOutput::lines(lines)
            }
            Err(e) => CommandOutput::line(format!("[✗] Georeferencing failed: {}", e)),
        },
        AppCommand::Measure([lat1, lng1, lat2, lng2]) => {
            let m = measure(lat1, lng1, lat2, lng2);
            CommandOutput::line(format!(
                "Distance: {:.2} m, Angle: {:.2}°",
                m.distance_m, m.angle_deg
            ))
        }
        AppCommand::Help => CommandOutput::lines(
            help_entries()
                .iter()
                .map(|(usage, desc)| format!("  {:<38} {}", usage, desc))
                .collect(),
        ),
        AppCommand::Clear => CommandOutput::lines(Vec::new()).with_effect(CommandEffect::Clear),
        AppCommand::Quit => CommandOutput::line("[*] Shutting down...").with_effect(CommandEffect::Quit),
        AppCommand::Unknown(msg) => CommandOutput::lines(vec![
            format!("[!] {}", msg),
            "    Type 'help' for commands".into(),
        ]),
    }
}

fn list_rows(session: &Session, n: usize) -> Vec<String> {
    let table = &session.table;
    let mut lines = vec![format!(
        "{:>4}  {:<10} {:<6} {:>8} {:>8} {:>8}  {}",
        "#", COLUMN_HEADERS[0], COLUMN_HEADERS[1], COLUMN_HEADERS[5], COLUMN_HEADERS[9],
        COLUMN_HEADERS[10], COLUMN_HEADERS[11]
    )];
    for pos in 0..table.visible_len().min(n) {
        lines.push(format!(
            "{:>4}  {:<10} {:<6} {:>8} {:>8} {:>8}  {}",
            table.display_cell(pos, 0),
            table.display_cell(pos, 1),
            table.display_cell(pos, 2),
            table.display_cell(pos, 6),
            table.display_cell(pos, 10),
            table.display_cell(pos, 11),
            table.display_cell(pos, 12),
        ));
    }
    if table.visible_len() > n {
        lines.push(format!("... {} more rows", table.visible_len() - n));
    }
    lines
}

fn describe_row(session: &Session, row: usize) -> Vec<String> {
    let Some(record) = session.table.record(row) else {
        return Vec::new();
    };
    let mut lines = vec![format!("Row #{}", session.table.sequence_number(row))];
    for (header, cell) in COLUMN_HEADERS.iter().zip(&record.cells) {
        lines.push(format!("  {:<10} {}", header, cell));
    }
    if let Some((lat, lng)) = record.lat_lng() {
        lines.push(format!("  {:<10} {:.6}, {:.6}", "Lat/Lng", lat, lng));
    }

    match session.images.find_image(&record.photo_name()) {
        Some(path) => lines.push(format!("  {:<10} {}", "Image", path.display())),
        None => lines.push(format!("  {:<10} (not found)", "Image")),
    }
    let markers = session.table.markers_for_selection(row);
    if let Some(primary) = markers.primary {
        lines.push(format!(
            "  {:<10} ({}, {}) with {} other markers",
            "Marker",
            primary.x,
            primary.y,
            markers.secondary.len()
        ));
    }
    lines
}
