use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::connector::tui::ChatApp;
use crate::domain::{Role, TranscriptEntry};

const TITLE: &str = "chatline";
const PLACEHOLDER: &str = "Type a message and press Enter to start chatting.";
const UNAVAILABLE_HINT: &str = "Chat is unavailable. Set ANTHROPIC_API_KEY and restart.";
const KEY_HINTS: &str = " Enter send · ↑/↓ PgUp/PgDn scroll · Esc quit ";

pub fn render(app: &mut ChatApp, frame: &mut Frame) {
    let banner_height = u16::from(app.conversation().banner().is_some());

    let [header_area, transcript_area, banner_area, input_area, footer_area] =
        Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(banner_height),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .areas(frame.area());

    render_header(app, frame, header_area);
    render_transcript(app, frame, transcript_area);
    if banner_height > 0 {
        render_banner(app, frame, banner_area);
    }
    render_input(app, frame, input_area);

    frame.render_widget(
        Paragraph::new(KEY_HINTS).style(Style::default().fg(Color::DarkGray)),
        footer_area,
    );
}

fn render_header(app: &ChatApp, frame: &mut Frame, area: Rect) {
    let model = app.conversation().model_name().unwrap_or("no model");
    let header = Line::from(vec![
        Span::styled(
            format!(" {TITLE} "),
            Style::default().fg(Color::Black).bg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!(" {model}"), Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(Paragraph::new(header), area);
}

/// Lines for the whole transcript, including the pending indicator.
pub fn transcript_lines(app: &ChatApp) -> Vec<Line<'static>> {
    let conversation = app.conversation();
    let mut lines: Vec<Line<'static>> = Vec::new();

    for entry in conversation.entries() {
        lines.push(role_line(entry.role()));
        let body_style = entry_style(entry);
        for line in entry.content().lines() {
            lines.push(Line::from(Span::styled(line.to_string(), body_style)));
        }
        lines.push(Line::default());
    }

    if conversation.is_pending() {
        lines.push(role_line(Role::Assistant));
        let dots = ".".repeat(usize::from(app.animation_frame()) + 1);
        lines.push(Line::from(Span::styled(
            format!("Thinking{dots}"),
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )));
    }

    lines
}

fn role_line(role: Role) -> Line<'static> {
    let color = match role {
        Role::User => Color::Cyan,
        Role::Assistant => Color::Yellow,
    };
    Line::from(Span::styled(
        role.label(),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    ))
}

fn entry_style(entry: &TranscriptEntry) -> Style {
    if entry.is_error() {
        Style::default().fg(Color::Red)
    } else {
        Style::default()
    }
}

fn render_transcript(app: &mut ChatApp, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Conversation ");

    let inner = block.inner(area);
    let lines = transcript_lines(app);

    if lines.is_empty() {
        let hint = if app.conversation().is_available() {
            PLACEHOLDER
        } else {
            UNAVAILABLE_HINT
        };
        let placeholder = Paragraph::new(Text::from(Span::styled(
            hint,
            Style::default().fg(Color::DarkGray),
        )))
        .block(block)
        .wrap(Wrap { trim: true });
        frame.render_widget(placeholder, area);
        return;
    }

    let paragraph = Paragraph::new(Text::from(lines)).wrap(Wrap { trim: false });
    let total = paragraph.line_count(inner.width);
    let total = u16::try_from(total).unwrap_or(u16::MAX);
    let offset = app.resolve_offset(total, inner.height);

    frame.render_widget(paragraph.block(block).scroll((offset, 0)), area);
}

fn render_banner(app: &ChatApp, frame: &mut Frame, area: Rect) {
    let Some(message) = app.conversation().banner() else {
        return;
    };
    let label = if app.conversation().is_available() {
        " Error "
    } else {
        " Configuration error "
    };
    let banner = Paragraph::new(Line::from(vec![
        Span::styled(label, Style::default().fg(Color::White).bg(Color::Red)),
        Span::styled(format!(" {message}"), Style::default().fg(Color::Red)),
    ]));
    frame.render_widget(banner, area);
}

fn render_input(app: &ChatApp, frame: &mut Frame, area: Rect) {
    let conversation = app.conversation();
    let (title, border_color) = if !conversation.is_available() {
        (" Input disabled ", Color::DarkGray)
    } else if conversation.is_pending() {
        (" Waiting for response ", Color::DarkGray)
    } else {
        (" Message ", Color::Yellow)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(title);

    // Keep the cursor visible by scrolling the line horizontally.
    let inner_width = usize::from(area.width.saturating_sub(2));
    let cursor = app.input().cursor();
    let scroll_offset = if inner_width > 0 && cursor >= inner_width {
        cursor - inner_width + 1
    } else {
        0
    };

    let visible: String = app
        .input()
        .text()
        .chars()
        .skip(scroll_offset)
        .take(inner_width)
        .collect();

    let text_style = if conversation.is_available() {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    frame.render_widget(Paragraph::new(visible).style(text_style).block(block), area);

    if conversation.is_available() {
        let cursor_x = u16::try_from(cursor - scroll_offset).unwrap_or(0);
        frame.set_cursor_position((area.x + 1 + cursor_x, area.y + 1));
    }
}
