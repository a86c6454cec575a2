use crate::application::{App, AppMode, FormController, Pane};
use crate::domain::{FormInput, SubmissionStatus};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

pub fn render_ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.area());

    render_header(f, app, chunks[0]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(chunks[1]);
    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(10), Constraint::Min(0)])
        .split(columns[1]);

    render_form(f, app, &app.contact, Pane::Contact, "Let's Connect", columns[0]);
    render_site_info(f, app, right[0]);
    render_form(f, app, &app.newsletter, Pane::Newsletter, "Newsletter", right[1]);
    render_status_bar(f, app, chunks[2]);

    if matches!(app.mode, AppMode::Help) {
        render_help_popup(f, app.help_scroll);
    }
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let header = Paragraph::new(format!(
        "{} | Fleet management consultancy | Focus: {}",
        app.site.name,
        app.pane.kind()
    ))
    .style(Style::default().fg(Color::Cyan));
    f.render_widget(header, area);
}

fn render_form<F: FormInput>(
    f: &mut Frame,
    app: &App,
    controller: &FormController<F>,
    pane: Pane,
    title: &str,
    area: Rect,
) {
    let focused = app.pane == pane;
    let mut lines: Vec<Line> = Vec::new();

    for (index, spec) in F::fields().iter().enumerate() {
        let selected = focused && app.selected == index;
        let marker = if selected { "> " } else { "  " };
        let label_style = if selected {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Yellow)
        };
        lines.push(Line::from(Span::styled(format!("{marker}{}", spec.label), label_style)));

        let value = controller.input().value(spec.name).unwrap_or_default();
        if selected && app.mode == AppMode::Editing {
            lines.push(editing_line(&app.input, app.cursor_position));
        } else if value.is_empty() {
            lines.push(Line::from(Span::styled(
                format!("  {}", spec.placeholder),
                Style::default().fg(Color::DarkGray),
            )));
        } else {
            let style = if controller.input_locked() {
                Style::default().fg(Color::DarkGray)
            } else {
                Style::default()
            };
            lines.push(Line::from(Span::styled(format!("  {value}"), style)));
        }

        if let Some(message) = controller.errors().get(spec.name) {
            lines.push(Line::from(Span::styled(
                format!("  {message}"),
                Style::default().fg(Color::Red),
            )));
        }
    }

    lines.push(Line::from(""));
    let trigger_selected = focused && app.trigger_selected();
    let trigger_style = if !controller.trigger_enabled() {
        Style::default().fg(Color::DarkGray)
    } else if trigger_selected {
        Style::default().bg(Color::Blue).fg(Color::White)
    } else {
        Style::default().fg(Color::Cyan)
    };
    lines.push(Line::from(Span::styled(
        format!(
            "{}[ {} ]",
            if trigger_selected { "> " } else { "  " },
            controller.kind().trigger_label(controller.is_submitting())
        ),
        trigger_style,
    )));

    match controller.status() {
        SubmissionStatus::Success => lines.push(Line::from(Span::styled(
            format!("  {}", controller.kind().success_banner()),
            Style::default().fg(Color::Green),
        ))),
        SubmissionStatus::Error => lines.push(Line::from(Span::styled(
            format!("  {}", controller.kind().error_banner()),
            Style::default().fg(Color::Red),
        ))),
        SubmissionStatus::Idle | SubmissionStatus::Submitting => {}
    }

    let border_style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let form = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title(title.to_string()),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(form, area);
}

fn editing_line(input: &str, cursor: usize) -> Line<'static> {
    let before: String = input.chars().take(cursor).collect();
    let at: String = input.chars().nth(cursor).map(String::from).unwrap_or_else(|| " ".to_string());
    let after: String = input.chars().skip(cursor + 1).collect();
    let edit_style = Style::default().fg(Color::Green);

    Line::from(vec![
        Span::styled(format!("  {before}"), edit_style),
        Span::styled(at, edit_style.add_modifier(Modifier::REVERSED)),
        Span::styled(after, edit_style),
    ])
}

fn render_site_info(f: &mut Frame, app: &App, area: Rect) {
    let site = &app.site;
    let lines = vec![
        Line::from(Span::styled(
            format!("{} - {}", site.owner, site.role),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(format!("Email:   {}", site.email)),
        Line::from(format!("Phone:   {}", site.phone)),
        Line::from(format!("Address: {}", site.address[0])),
        Line::from(format!("         {}, {}", site.address[1], site.address[2])),
        Line::from(format!("         {}", site.address[3])),
        Line::from(Span::styled(
            "100% Secure | No Spam | Direct response within 24 hours",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let info = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Contact"))
        .wrap(Wrap { trim: true });
    f.render_widget(info, area);
}

fn render_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let text = match app.mode {
        AppMode::Normal => match app.status_message {
            Some(ref status) => status.clone(),
            None => "↑↓/jk: select | Enter: edit/submit | Ctrl+S: submit | Tab: switch form | F1/?: help | q: quit".to_string(),
        },
        AppMode::Editing => match app.status_message {
            Some(ref status) => status.clone(),
            None => "Editing (Enter to keep, Esc to cancel, Ctrl+V to paste)".to_string(),
        },
        AppMode::Help => "↑↓/jk: scroll | PgUp/PgDn: fast scroll | Home: top | Esc/q: close help".to_string(),
    };

    let status = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL).title("Status"))
        .style(match app.mode {
            AppMode::Normal => Style::default(),
            AppMode::Editing => Style::default().fg(Color::Green),
            AppMode::Help => Style::default().fg(Color::Cyan),
        });
    f.render_widget(status, area);
}

fn render_help_popup(f: &mut Frame, scroll: usize) {
    let area = f.area();
    let popup_area = Rect {
        x: area.width / 10,
        y: area.height / 10,
        width: area.width * 4 / 5,
        height: area.height * 4 / 5,
    };

    f.render_widget(Clear, popup_area);

    let help_lines: Vec<&str> = HELP_TEXT.lines().collect();
    let visible_height = popup_area.height.saturating_sub(2) as usize;

    let start_line = scroll.min(help_lines.len().saturating_sub(visible_height));
    let end_line = (start_line + visible_height).min(help_lines.len());

    let visible_text = help_lines[start_line..end_line].join("\n");

    let help_widget = Paragraph::new(visible_text)
        .block(Block::default()
            .borders(Borders::ALL)
            .title(format!("olaris Help (Line {}/{})", start_line + 1, help_lines.len()))
            .style(Style::default().fg(Color::Cyan)))
        .style(Style::default().fg(Color::White));

    f.render_widget(help_widget, popup_area);
}

const HELP_TEXT: &str = r#"OLARIS CONSULTING - CONTACT & NEWSLETTER

=== FORMS ===
Contact form      Name, email and message are required.
                  Phone and company are optional.
Newsletter        A valid email address is required.

=== VALIDATION ===
Name              At least 2 characters
Email             Must be a valid email address
Message           At least 10 characters
                  Errors appear under each field and clear as you fix them.
                  Nothing is sent until every field passes.

=== SUBMITTING ===
Ctrl+S            Submit the focused form
Enter on [ ... ]  Submit the focused form
                  The button is disabled while a submission is in flight.
                  Contact results stay visible until the next attempt.
                  Newsletter results disappear after a few seconds.
                  A failed submission keeps what you typed; submit again to retry.

=== NAVIGATION ===
Tab / Shift+Tab   Switch between the contact and newsletter forms
Up/Down or k/j    Select a field or the submit button
Enter / F2        Edit the selected field
Esc               Clear the status message
F1 or ?           Show this help
q                 Quit

=== EDITING ===
Enter / Tab       Keep the value and move to the next field
Esc               Discard changes to the field
Left/Right        Move the cursor
Home/End          Jump to start/end
Backspace/Delete  Remove characters
Ctrl+V            Paste from the clipboard

=== HELP NAVIGATION ===
↑↓ or j/k         Scroll help text up/down one line
Page Up/Down      Scroll help text up/down 5 lines
Home              Jump to top of help text
Esc/F1/?/q        Close this help window"#;
