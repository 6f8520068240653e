//! Table view over the loaded records
//!
//! Holds the records in load order plus a view (filter + sort) that maps
//! visible positions back to source rows. Sequence numbers are always the
//! 1-based visible position, so they are renumbered on every filter/sort.

use std::collections::BTreeSet;

use super::record::{DikeRecord, COLUMN_HEADERS, SEQUENCE_HEADER};
use super::sample::sample_records;

/// Column to sort by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    /// The `#` column: load order
    Sequence,
    /// A data column, index into [`COLUMN_HEADERS`]
    Data(usize),
}

impl SortColumn {
    /// Resolve a column by header text or 0-based display index
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s == SEQUENCE_HEADER {
            return Some(SortColumn::Sequence);
        }
        if let Some(i) = COLUMN_HEADERS.iter().position(|h| *h == s) {
            return Some(SortColumn::Data(i));
        }
        match s.parse::<usize>().ok()? {
            0 => Some(SortColumn::Sequence),
            n if n <= COLUMN_HEADERS.len() => Some(SortColumn::Data(n - 1)),
            _ => None,
        }
    }

    pub fn header(&self) -> &'static str {
        match self {
            SortColumn::Sequence => SEQUENCE_HEADER,
            SortColumn::Data(i) => COLUMN_HEADERS.get(*i).copied().unwrap_or(""),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn toggled(self) -> Self {
        match self {
            SortOrder::Ascending => SortOrder::Descending,
            SortOrder::Descending => SortOrder::Ascending,
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            SortOrder::Ascending => "▲",
            SortOrder::Descending => "▼",
        }
    }
}

/// A marker in image pixel coordinates, labelled with its sequence number
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marker {
    pub x: f32,
    pub y: f32,
    pub number: usize,
}

/// Markers to draw over one map image
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarkerSet {
    pub primary: Option<Marker>,
    pub secondary: Vec<Marker>,
}

impl MarkerSet {
    pub fn len(&self) -> usize {
        self.secondary.len() + usize::from(self.primary.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Records plus the current filter/sort view
#[derive(Debug, Clone)]
pub struct DikeTable {
    records: Vec<DikeRecord>,
    source: Option<String>,
    filter: String,
    sort_column: SortColumn,
    sort_order: SortOrder,
    view: Vec<usize>,
}

impl Default for DikeTable {
    fn default() -> Self {
        Self::new(Vec::new(), None)
    }
}

impl DikeTable {
    pub fn new(records: Vec<DikeRecord>, source: Option<String>) -> Self {
        let mut table = Self {
            records,
            source,
            filter: String::new(),
            sort_column: SortColumn::Sequence,
            sort_order: SortOrder::Ascending,
            view: Vec::new(),
        };
        table.rebuild_view();
        table
    }

    /// Table with the built-in sample rows
    pub fn sample() -> Self {
        Self::new(sample_records(), None)
    }

    /// Replace the records, keeping sort settings and clearing the filter
    pub fn replace_records(&mut self, records: Vec<DikeRecord>, source: Option<String>) {
        self.records = records;
        self.source = source;
        self.filter.clear();
        self.rebuild_view();
    }

    pub fn records(&self) -> &[DikeRecord] {
        &self.records
    }

    pub fn record(&self, source_row: usize) -> Option<&DikeRecord> {
        self.records.get(source_row)
    }

    /// Workbook the records came from (`None` for sample data)
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn visible_len(&self) -> usize {
        self.view.len()
    }

    /// Source row indices in visible order
    pub fn view(&self) -> &[usize] {
        &self.view
    }

    /// Source row at a visible position
    pub fn source_row(&self, view_pos: usize) -> Option<usize> {
        self.view.get(view_pos).copied()
    }

    /// Visible position of a source row (None if filtered out)
    pub fn view_position(&self, source_row: usize) -> Option<usize> {
        self.view.iter().position(|&r| r == source_row)
    }

    /// Sequence number of a source row, falling back to load order when hidden
    pub fn sequence_number(&self, source_row: usize) -> usize {
        self.view_position(source_row)
            .map(|p| p + 1)
            .unwrap_or(source_row + 1)
    }

    /// Visible source row with the given sequence number
    pub fn row_by_sequence(&self, seq: usize) -> Option<usize> {
        seq.checked_sub(1).and_then(|p| self.source_row(p))
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    /// Show only rows whose photo name contains `prefix` (case-sensitive).
    /// An empty prefix shows everything.
    pub fn set_filter(&mut self, prefix: &str) {
        self.filter = prefix.to_string();
        self.rebuild_view();
        log::debug!(
            "Filter '{}': {} of {} rows",
            self.filter,
            self.view.len(),
            self.records.len()
        );
    }

    pub fn sort_state(&self) -> (SortColumn, SortOrder) {
        (self.sort_column, self.sort_order)
    }

    pub fn sort_by(&mut self, column: SortColumn, order: SortOrder) {
        self.sort_column = column;
        self.sort_order = order;
        self.rebuild_view();
    }

    /// Header click: same column flips the order, a new column sorts ascending
    pub fn toggle_sort(&mut self, column: SortColumn) {
        let order = if self.sort_column == column {
            self.sort_order.toggled()
        } else {
            SortOrder::Ascending
        };
        self.sort_by(column, order);
    }

    fn rebuild_view(&mut self) {
        let mut view: Vec<usize> = (0..self.records.len()).collect();

        if let SortColumn::Data(col) = self.sort_column {
            let records = &self.records;
            view.sort_by(|&a, &b| records[a].cell(col).sort_cmp(records[b].cell(col)));
        }
        if self.sort_order == SortOrder::Descending {
            // Reverse of a stable ascending sort, with ties kept in load order
            match self.sort_column {
                SortColumn::Sequence => view.reverse(),
                SortColumn::Data(col) => {
                    let records = &self.records;
                    view.sort_by(|&a, &b| records[b].cell(col).sort_cmp(records[a].cell(col)));
                }
            }
        }

        if !self.filter.is_empty() {
            let filter = &self.filter;
            let records = &self.records;
            view.retain(|&r| records[r].photo_name().contains(filter.as_str()));
        }
        self.view = view;
    }

    /// Text for a display cell; column 0 is the sequence number
    pub fn display_cell(&self, view_pos: usize, column: usize) -> String {
        if column == 0 {
            return (view_pos + 1).to_string();
        }
        self.source_row(view_pos)
            .and_then(|r| self.records.get(r))
            .map(|rec| rec.cell(column - 1).to_string())
            .unwrap_or_default()
    }

    /// Distinct, non-blank photo names in load order
    pub fn photo_names(&self) -> Vec<String> {
        let mut seen = BTreeSet::new();
        self.records
            .iter()
            .map(|r| r.photo_name())
            .filter(|p| !p.trim().is_empty() && seen.insert(p.clone()))
            .collect()
    }

    /// Markers for every row sharing the selected row's photo name.
    /// The selected row becomes the primary marker.
    pub fn markers_for_selection(&self, source_row: usize) -> MarkerSet {
        let mut set = MarkerSet::default();
        let Some(selected) = self.records.get(source_row) else {
            return set;
        };
        let photo = selected.photo_name();

        for (row, rec) in self.records.iter().enumerate() {
            if rec.photo_name() != photo {
                continue;
            }
            let Some(coord) = rec.map_coordinate() else {
                log::debug!("Row {} has no numeric coordinates, skipping marker", row + 1);
                continue;
            };
            let (x, y) = coord.to_pixels();
            let marker = Marker {
                x,
                y,
                number: self.sequence_number(row),
            };
            if row == source_row {
                set.primary = Some(marker);
            } else {
                set.secondary.push(marker);
            }
        }
        set
    }

    /// Markers for all visible rows, numbered by sequence, none primary
    pub fn markers_for_visible(&self) -> MarkerSet {
        let secondary = self
            .view
            .iter()
            .enumerate()
            .filter_map(|(pos, &row)| {
                let coord = self.records[row].map_coordinate()?;
                let (x, y) = coord.to_pixels();
                Some(Marker { x, y, number: pos + 1 })
            })
            .collect();
        MarkerSet {
            primary: None,
            secondary,
        }
    }
}
