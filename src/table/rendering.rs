//! View rendering for the table.
//!
//! Cell widths are measured in terminal columns on the ANSI-stripped text,
//! so styled output from custom renderers lines up with plain cells.

use super::Model;
use crate::column::ColumnDescriptor;
use crate::paginator::PageItem;
use crate::row::TableRow;
use crate::sort::SortDirection;
use std::collections::HashMap;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

const COLUMN_GAP: &str = "  ";
const ELLIPSIS: &str = "…";

/// Display width of `s` in terminal columns, ignoring ANSI escapes.
pub(crate) fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(strip_ansi_escapes::strip_str(s).as_str())
}

/// Cuts `s` to at most `max` columns, ending in an ellipsis when cut.
///
/// Styled text that needs cutting loses its styling.
pub(crate) fn truncate(s: &str, max: usize) -> String {
    if display_width(s) <= max {
        return s.to_string();
    }
    let plain = strip_ansi_escapes::strip_str(s);
    let budget = max.saturating_sub(1);
    let mut out = String::new();
    let mut used = 0;
    for g in plain.graphemes(true) {
        let w = UnicodeWidthStr::width(g);
        if used + w > budget {
            break;
        }
        out.push_str(g);
        used += w;
    }
    out.push_str(ELLIPSIS);
    out
}

/// Right-pads `s` with spaces to `width` columns.
pub(crate) fn pad(s: &str, width: usize) -> String {
    let w = display_width(s);
    format!("{s}{}", " ".repeat(width.saturating_sub(w)))
}

impl<T: TableRow + Send + 'static> Model<T> {
    /// Renders the table.
    pub fn view(&self) -> String {
        let mut sections = vec![self.view_search()];
        if self.menu.is_open() {
            sections.push(self.menu.view(&self.state));
        }
        sections.push(self.view_table());
        let footer = self.view_footer();
        if !footer.is_empty() {
            sections.push(footer);
        }
        sections.join("\n")
    }

    fn view_search(&self) -> String {
        let prompt = self.styles.search_prompt.render("Search: ");
        let cursor = if self.editing_search { "▏" } else { "" };
        let mut line = format!("{prompt}{}{cursor}", self.search_input);
        if self.is_searching {
            line.push_str(&self.styles.status.render(" (searching…)"));
        }
        line
    }

    /// Columns in display order; while a column is being moved, the order
    /// it would land in.
    fn display_columns(&self) -> Vec<&ColumnDescriptor> {
        if !self.keyboard_drag.is_active() {
            return self.state.visible_columns();
        }
        self.keyboard_drag
            .preview(&self.state)
            .iter()
            .filter(|key| self.state.is_visible(key))
            .filter_map(|key| self.state.registry().get(key))
            .collect()
    }

    fn header_label(&self, column: &ColumnDescriptor) -> String {
        match self.state.sort_state().direction_for(&column.key) {
            Some(SortDirection::Asc) => format!("{} ▲", column.label),
            Some(SortDirection::Desc) => format!("{} ▼", column.label),
            None => column.label.clone(),
        }
    }

    fn cell_text(&self, row: &T, key: &str, rendered: Option<&HashMap<String, String>>) -> String {
        if let Some(text) = rendered.and_then(|map| map.get(key)) {
            return text.clone();
        }
        match &self.cell_renderer {
            Some(render) => render(row, key),
            None => row.value(key).to_string(),
        }
    }

    fn view_table(&self) -> String {
        let columns = self.display_columns();
        let rows = self.page_rows();
        let max = self.config.max_cell_width;

        let cells: Vec<Vec<String>> = rows
            .iter()
            .map(|row| {
                let rendered = self.row_renderer.as_ref().map(|f| f(row));
                columns
                    .iter()
                    .map(|c| truncate(&self.cell_text(row, &c.key, rendered.as_ref()), max))
                    .collect()
            })
            .collect();
        let labels: Vec<String> = columns.iter().map(|c| truncate(&self.header_label(c), max)).collect();
        let actions: Option<Vec<String>> = self
            .actions_renderer
            .as_ref()
            .map(|f| rows.iter().map(|row| truncate(&f(row), max)).collect());

        let mut widths: Vec<usize> = labels.iter().map(|l| display_width(l)).collect();
        for row in &cells {
            for (w, cell) in widths.iter_mut().zip(row) {
                *w = (*w).max(display_width(cell));
            }
        }
        let actions_width = actions
            .as_ref()
            .map(|a| a.iter().map(|s| display_width(s)).max().unwrap_or(0).max(7));

        let selectable = self.config.selectable;
        let mut lines = Vec::new();

        // Header
        let mut header = vec!["  ".to_string()];
        if selectable {
            let check = if self.is_all_selected() {
                "[x]"
            } else if self.is_indeterminate() {
                "[-]"
            } else {
                "[ ]"
            };
            header.push(check.to_string());
        }
        let focused = self.focused_column_key();
        let moving = self.keyboard_drag.active();
        for ((column, label), width) in columns.iter().zip(&labels).zip(&widths) {
            let padded = pad(label, *width);
            let styled = if moving == Some(column.key.as_str()) {
                self.styles.moving_header.render(&padded)
            } else if self.focus && focused.as_deref() == Some(column.key.as_str()) {
                self.styles.focused_header.render(&padded)
            } else {
                self.styles.header.render(&padded)
            };
            header.push(styled);
        }
        if let Some(w) = actions_width {
            header.push(self.styles.header.render(&pad("Actions", w)));
        }
        lines.push(header.join(COLUMN_GAP).trim_end().to_string());

        let total_width = 2
            + if selectable { 3 + COLUMN_GAP.len() } else { 0 }
            + widths.iter().map(|w| w + COLUMN_GAP.len()).sum::<usize>()
            + actions_width.map(|w| w + COLUMN_GAP.len()).unwrap_or(0);
        lines.push(self.styles.separator.render(&"─".repeat(total_width.saturating_sub(COLUMN_GAP.len()))));

        // Body
        if self.loading {
            lines.push(self.styles.message.render(&self.config.loading_message));
            return lines.join("\n");
        }
        if rows.is_empty() {
            lines.push(self.styles.message.render(&self.config.empty_message));
            return lines.join("\n");
        }

        for (i, (row, row_cells)) in rows.iter().zip(&cells).enumerate() {
            let is_cursor = i == self.cursor;
            let disabled = self.is_row_disabled(row);
            let selected = self.selection.is_selected(&self.row_id(row));

            let mut parts = vec![if is_cursor { "> " } else { "  " }.to_string()];
            if selectable {
                let check = if disabled {
                    " - "
                } else if selected {
                    "[x]"
                } else {
                    "[ ]"
                };
                parts.push(check.to_string());
            }
            for (cell, width) in row_cells.iter().zip(&widths) {
                parts.push(pad(cell, *width));
            }
            if let (Some(actions), Some(w)) = (&actions, actions_width) {
                parts.push(pad(&actions[i], w));
            }
            let line = parts.join(COLUMN_GAP).trim_end().to_string();
            let line = if disabled {
                self.styles.disabled_row.render(&line)
            } else if is_cursor {
                self.styles.cursor_row.render(&line)
            } else if selected {
                self.styles.selected_row.render(&line)
            } else {
                line
            };
            lines.push(line);
        }
        lines.join("\n")
    }

    fn view_page_bar(&self) -> String {
        let current = self.paginator.page();
        let mut parts = vec![self.styles.page.render("‹")];
        for item in self.paginator.page_numbers() {
            parts.push(match item {
                PageItem::Page(n) if n == current => self.styles.current_page.render(&format!("[{n}]")),
                PageItem::Page(n) => self.styles.page.render(&n.to_string()),
                PageItem::Ellipsis => self.styles.page.render(ELLIPSIS),
            });
        }
        parts.push(self.styles.page.render("›"));
        parts.join(" ")
    }

    fn view_footer(&self) -> String {
        let mut lines = Vec::new();
        let total = self.filtered.len();

        if self.config.pagination && total > 0 && !self.loading {
            let (start, end) = self.paginator.slice_bounds(total);
            lines.push(format!(
                "{}  {}",
                self.view_page_bar(),
                self.styles
                    .status
                    .render(&format!("Showing {}-{} of {}", start + 1, end, total))
            ));
        }

        if self.config.selectable && !self.selection.is_empty() {
            let mut status = format!("{} selected", self.selection.len());
            for (i, label) in self.bulk_action_labels().iter().enumerate().take(9) {
                status.push_str(&format!(" · {} {}", i + 1, label));
            }
            lines.push(self.styles.status.render(&status));
        }

        if let Some(message) = &self.status_message {
            lines.push(self.styles.status.render(message));
        }
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_width_ignores_ansi() {
        assert_eq!(display_width("\x1b[1mabc\x1b[0m"), 3);
        assert_eq!(display_width("日本"), 4);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefgh", 5), "abcd…");
        assert_eq!(truncate("日本語テキスト", 5), "日本…");
        assert_eq!(truncate("e\u{301}tude", 3), "e\u{301}t…");
    }

    #[test]
    fn test_pad() {
        assert_eq!(pad("ab", 4), "ab  ");
        assert_eq!(pad("abcd", 2), "abcd");
    }
}
