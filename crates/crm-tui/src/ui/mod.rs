use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap};
use ratatui::Frame;

use crm_api::LoadOrigin;
use crm_core::domain::Channel;
use crm_core::dto::CustomerRowDto;
use crm_core::present::{results_label, EMPTY_VIEW_HINT, EMPTY_VIEW_TITLE};
use crm_core::query::{BirthdayMode, SortDirection, SortKey};
use crm_core::time::format_timestamp_datetime;

use crate::app::{App, ConfirmState, Mode};

pub fn draw(frame: &mut Frame<'_>, app: &App) {
    let size = frame.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(5),
            Constraint::Length(3),
        ])
        .split(size);

    render_header(frame, chunks[0], app);

    match &app.mode {
        Mode::Admin | Mode::Confirm(_) => render_admin(frame, chunks[1], app),
        _ => render_table(frame, chunks[1], app),
    }

    render_footer(frame, chunks[2], app);

    if app.show_help {
        render_help(frame, size);
    }

    if let Mode::Confirm(state) = &app.mode {
        render_confirm(frame, size, state);
    }
}

fn render_header(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let count = if app.is_loading() {
        "loading".to_string()
    } else {
        results_label(app.rows.len())
    };
    let birthdays = match app.query.birthdays {
        BirthdayMode::All => "all",
        BirthdayMode::ThisWeek => "this week",
    };
    let search_style = if app.mode == Mode::SearchEditing {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let search = if app.mode == Mode::SearchEditing {
        format!("{}_", app.query.search)
    } else if app.query.search.is_empty() {
        "(none)".to_string()
    } else {
        app.query.search.clone()
    };

    let first = Line::from(vec![
        Span::styled(count, Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("  search: "),
        Span::styled(search, search_style),
        Span::raw(format!("  birthdays: {birthdays}")),
    ]);
    let mut second = vec![match &app.origin {
        Some(LoadOrigin::Primary { source }) => Span::raw(format!("data: {source}")),
        Some(LoadOrigin::Fallback { reason }) => Span::styled(
            format!("data: sample customers ({reason})"),
            Style::default().fg(Color::Yellow),
        ),
        None => Span::raw("data: -"),
    }];
    if let Some(ts) = app.loaded_at {
        second.push(Span::styled(
            format!("  loaded {}", format_timestamp_datetime(ts)),
            Style::default().fg(Color::DarkGray),
        ));
    }

    let block = Block::default().borders(Borders::ALL).title("crm-dash");
    let paragraph = Paragraph::new(vec![first, Line::from(second)]).block(block);
    frame.render_widget(paragraph, area);
}

fn render_footer(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let hint = match app.mode {
        Mode::List => "j/k move  1-4 sort  / search  b birthdays  c clear  tab admin  ? help  q quit",
        Mode::SearchEditing => "type to search  enter keep  esc clear",
        Mode::Admin => "g generate data  r reset database  tab back  ? help  q quit",
        Mode::Confirm(_) => "y confirm  n cancel",
    };

    let mut spans = vec![Span::styled(hint, Style::default().fg(Color::DarkGray))];
    if let Some(err) = &app.error {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(err.clone(), Style::default().fg(Color::Red)));
    } else if let Some(status) = &app.status {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(status.clone(), Style::default().fg(Color::Green)));
    }

    let paragraph = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
    frame.render_widget(paragraph, area);
}

fn render_table(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let block = Block::default().borders(Borders::ALL).title("Customers");

    if app.is_loading() {
        let paragraph = Paragraph::new("Loading customers...")
            .block(block)
            .alignment(Alignment::Center);
        frame.render_widget(paragraph, area);
        return;
    }

    if app.rows.is_empty() {
        let text = vec![
            Line::from(Span::styled(
                EMPTY_VIEW_TITLE,
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                EMPTY_VIEW_HINT,
                Style::default().fg(Color::DarkGray),
            )),
        ];
        let paragraph = Paragraph::new(text)
            .block(block)
            .alignment(Alignment::Center);
        frame.render_widget(paragraph, area);
        return;
    }

    let header = Row::new(SortKey::ALL.iter().enumerate().map(|(idx, key)| {
        let mut title = format!("{} {}", idx + 1, key.title());
        let mut style = Style::default().add_modifier(Modifier::BOLD);
        if *key == app.query.sort.key {
            title.push_str(match app.query.sort.direction {
                SortDirection::Asc => " ▲",
                SortDirection::Desc => " ▼",
            });
            style = style.fg(Color::Cyan);
        }
        Cell::from(title).style(style)
    }));

    let rows: Vec<Row> = app
        .rows
        .iter()
        .map(|row| {
            let name = Line::from(vec![
                Span::styled(
                    format!("{:<2} ", row.initials),
                    Style::default().fg(Color::Black).bg(Color::Blue),
                ),
                Span::raw(" "),
                Span::raw(row.full_name.clone()),
            ]);
            let mut birthday = vec![Span::raw(row.birthday.clone())];
            if row.birthday_this_week {
                birthday.push(Span::raw(" "));
                birthday.push(Span::styled(
                    "this week",
                    Style::default()
                        .fg(Color::Magenta)
                        .add_modifier(Modifier::BOLD),
                ));
            }
            Row::new(vec![
                Cell::from(name),
                Cell::from(row.company.clone()),
                Cell::from(Line::from(birthday)),
                Cell::from(interaction_line(row)),
            ])
        })
        .collect();

    let widths = [
        Constraint::Percentage(32),
        Constraint::Percentage(24),
        Constraint::Percentage(22),
        Constraint::Percentage(22),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .row_highlight_style(
            Style::default()
                .fg(Color::Black)
                .bg(Color::LightGreen)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("➤ ");

    let mut state = TableState::default().with_selected(Some(app.selected));
    frame.render_stateful_widget(table, area, &mut state);
}

fn render_admin(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let mut lines = vec![
        Line::from(Span::styled(
            "Test data",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("g  Generate users, companies, customers and interactions on the backend."),
        Line::from("   Large runs can take several minutes."),
        Line::from(""),
        Line::from(Span::styled(
            "r  Delete all customer data (asks for confirmation)",
            Style::default().fg(Color::Red),
        )),
        Line::from(""),
    ];

    if let Some(action) = app.admin_running {
        lines.push(Line::from(Span::styled(
            action.progress_message(),
            Style::default().fg(Color::Yellow),
        )));
    } else if let Some(message) = &app.admin_message {
        let color = if message.success {
            Color::Green
        } else {
            Color::Red
        };
        lines.push(Line::from(Span::styled(
            message.text.clone(),
            Style::default().fg(color),
        )));
    }

    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Admin"))
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn render_confirm(frame: &mut Frame<'_>, area: Rect, state: &ConfirmState) {
    let modal = centered_rect(50, 30, area);
    frame.render_widget(Clear, modal);
    let paragraph = Paragraph::new(state.message.clone())
        .block(Block::default().borders(Borders::ALL).title("Confirm"))
        .alignment(Alignment::Center);
    frame.render_widget(paragraph, modal);
}

fn render_help(frame: &mut Frame<'_>, area: Rect) {
    let modal = centered_rect(70, 60, area);
    frame.render_widget(Clear, modal);

    let text = vec![
        Line::from("Global: q quit, Ctrl+C quit, ? help"),
        Line::from("List: j/k move, 1 name, 2 company, 3 birthday, 4 last interaction (again to reverse)"),
        Line::from("Filters: / search name or company, b birthdays this week, c clear"),
        Line::from("Search: enter keep, esc clear, Ctrl+U clear line, Ctrl+W delete word"),
        Line::from("Admin (tab): g generate test data, r reset database"),
    ];

    let paragraph = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL).title("Help"))
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, modal);
}

fn interaction_line(row: &CustomerRowDto) -> Line<'static> {
    let mut spans = vec![
        Span::styled(
            format!("{} ", row.channel.glyph()),
            Style::default().fg(channel_color(row.channel)),
        ),
        Span::raw(row.last_interaction.clone()),
    ];
    if !row.channel_label.is_empty() {
        spans.push(Span::styled(
            format!(" ({})", row.channel_label),
            Style::default().fg(Color::DarkGray),
        ));
    }
    Line::from(spans)
}

fn channel_color(channel: Channel) -> Color {
    match channel {
        Channel::Phone => Color::Green,
        Channel::Email => Color::Blue,
        Channel::Sms => Color::Yellow,
        Channel::Facebook => Color::Indexed(33),
        Channel::Message => Color::Gray,
    }
}

fn centered_rect(percent_x: u16, percent_y: u16, rect: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(rect);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
