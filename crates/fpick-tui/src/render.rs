//! Frame composition: header, query line, entry list and status bar.

use fpick_core::{Browser, EntryKind, FileEntry, ResultSet};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::input::ListViewport;

/// Draws the whole picker and returns where the list landed.
///
/// `list_state` persists between frames so the scroll offset is stable.
pub fn render(
    f: &mut Frame,
    browser: &Browser,
    flash: Option<&str>,
    list_state: &mut ListState,
) -> ListViewport {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // header
            Constraint::Length(3), // query
            Constraint::Min(3),    // entries
            Constraint::Length(1), // status
        ])
        .split(f.area());

    render_header(f, chunks[0], browser);
    render_query(f, chunks[1], browser.query());
    let viewport = render_entries(f, chunks[2], browser, list_state);
    render_status(f, chunks[3], browser, flash);
    viewport
}

fn render_header(f: &mut Frame, area: Rect, browser: &Browser) {
    let mut spans = vec![
        Span::styled(
            " fpick ",
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(
            browser.relative_path(),
            Style::default().fg(Color::Cyan),
        ),
    ];
    if browser.can_go_back() {
        spans.push(Span::styled("  ← back", Style::default().fg(Color::DarkGray)));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_query(f: &mut Frame, area: Rect, query: &str) {
    let text = if query.is_empty() {
        Line::from(Span::styled(
            "type to search…",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Line::from(vec![Span::raw(query.to_owned()), Span::raw("█")])
    };
    let block = Block::default().borders(Borders::ALL).title(" Search ");
    f.render_widget(Paragraph::new(text).block(block), area);
}

fn render_entries(
    f: &mut Frame,
    area: Rect,
    browser: &Browser,
    list_state: &mut ListState,
) -> ListViewport {
    let active = browser.active();
    let title = if browser.is_searching() {
        format!(" Results ({}) ", active.len())
    } else {
        format!(" {} ", browser.current_path())
    };
    let block = Block::default().borders(Borders::ALL).title(title);
    let inner = block.inner(area);

    if active.is_empty() {
        let placeholder = empty_placeholder(active, browser.is_loading(), browser.is_searching());
        let style = if active.error().is_some() {
            Style::default().fg(Color::Red)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        f.render_widget(
            Paragraph::new(Span::styled(placeholder, style)).block(block),
            area,
        );
        *list_state = ListState::default();
        return ListViewport {
            area: inner,
            offset: 0,
        };
    }

    let items: Vec<ListItem> = active
        .entries()
        .iter()
        .map(|entry| {
            ListItem::new(entry_line(entry, browser.is_searching(), browser.history().base()))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .add_modifier(Modifier::REVERSED)
                .fg(Color::Cyan),
        )
        .highlight_symbol("> ");

    list_state.select(Some(browser.selected_index()));
    f.render_stateful_widget(list, area, list_state);
    ListViewport {
        area: inner,
        offset: list_state.offset(),
    }
}

fn entry_line(entry: &FileEntry, searching: bool, base: &str) -> Line<'static> {
    let name_style = if entry.is_directory() {
        Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    let mut spans = vec![
        Span::raw(icon_for_kind(entry.kind())),
        Span::styled(entry.name().to_owned(), name_style),
    ];
    if searching {
        if let Some(parent) = display_parent(entry.path(), base) {
            spans.push(Span::styled(
                format!("  {parent}"),
                Style::default().fg(Color::DarkGray),
            ));
        }
    }
    let size = format_size(entry.size());
    if !size.is_empty() {
        spans.push(Span::styled(
            format!("  {size}"),
            Style::default().fg(Color::DarkGray),
        ));
    }
    Line::from(spans)
}

/// Parent directory of a search hit, shown relative to `base` when nested
/// below it. `None` for hits directly in `base`.
fn display_parent(path: &str, base: &str) -> Option<String> {
    let parent = std::path::Path::new(path).parent()?;
    let shown = fpick_core::relative_path(base, &parent.to_string_lossy());
    (shown != "/").then_some(shown)
}

fn render_status(f: &mut Frame, area: Rect, browser: &Browser, flash: Option<&str>) {
    let active = browser.active();
    let (text, style) = status_text(active, browser.is_loading(), flash);
    let hints = Span::styled(
        "  ↑↓ move  → open  ← back  ⏎ select  esc close",
        Style::default().fg(Color::DarkGray),
    );
    let line = Line::from(vec![Span::styled(text, style), hints]);
    f.render_widget(Paragraph::new(line), area);
}

/// Status bar text for the active set. Loading and truncation take
/// precedence over transient messages.
fn status_text(active: &ResultSet, loading: bool, flash: Option<&str>) -> (String, Style) {
    if loading && active.is_showing_cached() {
        return (
            format!(" {} items · updating…", active.len()),
            Style::default().fg(Color::Yellow),
        );
    }
    if loading {
        return (" Loading…".to_string(), Style::default().fg(Color::Yellow));
    }
    if let Some(notice) = active.notice() {
        return (format!(" {notice}"), Style::default().fg(Color::Yellow));
    }
    if let Some(message) = flash {
        return (format!(" {message}"), Style::default().fg(Color::Gray));
    }
    (format!(" {} items", active.len()), Style::default())
}

fn empty_placeholder(active: &ResultSet, loading: bool, searching: bool) -> String {
    if let Some(error) = active.error() {
        return error.to_string();
    }
    match (loading, searching) {
        (true, true) => "Searching…".to_string(),
        (true, false) => "Loading…".to_string(),
        (false, true) => "No files found".to_string(),
        (false, false) => "Empty directory".to_string(),
    }
}

/// Nerd Font glyph for each entry kind.
fn icon_for_kind(kind: EntryKind) -> &'static str {
    match kind {
        EntryKind::Directory => "\u{f07b} ",
        EntryKind::Code => "\u{f121} ",
        EntryKind::Text => "\u{f15c} ",
        EntryKind::Image => "\u{f1c5} ",
        EntryKind::Other => "\u{f15b} ",
    }
}

/// Human-readable size; empty for zero (directories and empty files).
fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes == 0 {
        String::new()
    } else if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{bytes} B")
    }
}
