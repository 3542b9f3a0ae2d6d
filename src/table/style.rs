//! Styles for the table component.

use lipgloss_extras::prelude::*;

/// Visual styles used when rendering a table.
///
/// ```rust
/// use bubbletea_datatable::table::TableStyles;
/// use lipgloss_extras::prelude::*;
///
/// let mut styles = TableStyles::default();
/// styles.header = Style::new().bold(true).foreground(Color::from("#7D56F4"));
/// ```
#[derive(Debug, Clone)]
pub struct TableStyles {
    /// Header labels.
    pub header: Style,
    /// Header of the focused column.
    pub focused_header: Style,
    /// Header of a column being moved.
    pub moving_header: Style,
    /// Row under the cursor.
    pub cursor_row: Style,
    /// Selected rows.
    pub selected_row: Style,
    /// Rows that cannot be selected.
    pub disabled_row: Style,
    /// Header separator line.
    pub separator: Style,
    /// Empty and loading messages.
    pub message: Style,
    /// Search prompt.
    pub search_prompt: Style,
    /// Current page in the page bar.
    pub current_page: Style,
    /// Other entries of the page bar.
    pub page: Style,
    /// Status line.
    pub status: Style,
}

impl Default for TableStyles {
    fn default() -> Self {
        let subdued = AdaptiveColor {
            Light: "#9B9B9B",
            Dark: "#5C5C5C",
        };
        Self {
            header: Style::new().bold(true),
            focused_header: Style::new()
                .bold(true)
                .underline(true)
                .foreground(Color::from("#7D56F4")),
            moving_header: Style::new()
                .bold(true)
                .foreground(Color::from("#FFFDF5"))
                .background(Color::from("#7D56F4")),
            cursor_row: Style::new().foreground(AdaptiveColor {
                Light: "#EE6FF8",
                Dark: "#EE6FF8",
            }),
            selected_row: Style::new().bold(true),
            disabled_row: Style::new().foreground(subdued.clone()),
            separator: Style::new().foreground(subdued.clone()),
            message: Style::new().italic(true).foreground(subdued.clone()),
            search_prompt: Style::new().foreground(AdaptiveColor {
                Light: "#04B575",
                Dark: "#ECFD65",
            }),
            current_page: Style::new().bold(true).foreground(Color::from("#7D56F4")),
            page: Style::new().foreground(subdued.clone()),
            status: Style::new().foreground(subdued),
        }
    }
}
