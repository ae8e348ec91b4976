use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph};

use super::app::{App, Row, RowKind};
use crate::view::{Screen, ViewMode};

const PALETTE: [Color; 8] = [
    Color::Blue,
    Color::Magenta,
    Color::LightMagenta,
    Color::Green,
    Color::Yellow,
    Color::Red,
    Color::Cyan,
    Color::LightBlue,
];

/// Stable color for a subject: polynomial rolling hash over the char codes
/// (h = c + h*31), modulo the palette size.
pub fn subject_color(subject: &str) -> Color {
    let mut h: i32 = 0;
    for c in subject.chars() {
        h = (c as i32).wrapping_add(h.wrapping_shl(5).wrapping_sub(h));
    }
    PALETTE[h.unsigned_abs() as usize % PALETTE.len()]
}

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);
    render_body(frame, app, chunks[1]);
    render_footer(frame, app, chunks[2]);
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let mode = match app.state.mode() {
        ViewMode::Flat => "flat",
        ViewMode::Hierarchical => "tree",
    };
    let header = format!(
        " {}/{} completed ({}%) | {} subjects | filter: {} | view: {mode}",
        app.overall.completed,
        app.overall.total,
        app.overall.percentage,
        app.subject_count,
        app.state.filter().label(),
    );
    frame.render_widget(Paragraph::new(header).style(Style::default().bold()), area);
}

fn render_body(frame: &mut Frame, app: &App, area: Rect) {
    if app.state.screen() == Screen::Landing {
        let msg = Paragraph::new("No tasks yet. Import a course plan to get started.")
            .block(Block::default().borders(Borders::ALL).title(" Tasks "));
        frame.render_widget(msg, area);
        return;
    }

    let items: Vec<ListItem> = app
        .rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let item = ListItem::new(row_line(app, row));
            if i == app.cursor {
                item.style(Style::default().bg(Color::DarkGray))
            } else {
                item
            }
        })
        .collect();

    let list = List::new(items).block(Block::default().borders(Borders::ALL).title(" Tasks "));
    frame.render_widget(list, area);
}

fn row_line<'a>(app: &App, row: &'a Row) -> Line<'a> {
    let mut prefix = String::new();
    for d in 1..=row.depth {
        let last = row.is_last_at_depth[d - 1];
        if d == row.depth {
            prefix.push_str(if last { "└── " } else { "├── " });
        } else {
            prefix.push_str(if last { "    " } else { "│   " });
        }
    }

    let collapse_indicator = if row.has_children {
        if row.collapsed {
            "> "
        } else {
            "v "
        }
    } else {
        "  "
    };

    match row.kind {
        RowKind::Subject => {
            let stats = row.stats.unwrap_or_default();
            Line::from(vec![
                Span::raw(prefix),
                Span::raw(collapse_indicator),
                Span::styled(
                    row.label.clone(),
                    Style::default().fg(subject_color(&row.subject)).bold(),
                ),
                Span::raw(format!(
                    "  {}/{} ({}%)",
                    stats.completed, stats.total, stats.percentage
                )),
            ])
        }
        RowKind::Topic => {
            let stats = row.stats.unwrap_or_default();
            Line::from(vec![
                Span::raw(prefix),
                Span::raw(collapse_indicator),
                Span::styled(row.label.clone(), Style::default().bold()),
                Span::raw(format!("  {}/{}", stats.completed, stats.total)),
            ])
        }
        RowKind::Task => {
            let (icon, icon_style, name_style) = if row.completed {
                (
                    "x",
                    Style::default().fg(Color::Green),
                    Style::default().fg(Color::DarkGray).crossed_out(),
                )
            } else {
                (".", Style::default().fg(Color::Yellow), Style::default())
            };
            let priority = row
                .priority
                .map(|p| format!("  [{}]", p.label()))
                .unwrap_or_default();
            // Flat mode shows the subject badge since there is no grouping
            let badge = if app.state.mode() == ViewMode::Flat {
                Span::styled(
                    format!("{} ", row.subject),
                    Style::default().fg(subject_color(&row.subject)),
                )
            } else {
                Span::raw("")
            };
            Line::from(vec![
                Span::raw(prefix),
                Span::raw(collapse_indicator),
                Span::styled(format!("{icon} "), icon_style),
                badge,
                Span::styled(row.label.clone(), name_style),
                Span::raw(priority),
            ])
        }
    }
}

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let text = if let Some((_, name)) = &app.pending_delete {
        format!(" delete '{name}'? y/n")
    } else if let Some(err) = &app.error {
        format!(" error: {err}")
    } else {
        " j/k move  space fold  x done  d delete  f filter  m view  r refresh  q quit".to_string()
    };
    let style = if app.pending_delete.is_some() {
        Style::default().fg(Color::Red)
    } else if app.error.is_some() {
        Style::default().fg(Color::Red)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    frame.render_widget(Paragraph::new(text).style(style), area);
}
