use ratatui::{
    layout::{Alignment, Constraint},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap},
};

use crate::file_picker::FilePicker;
use crate::form::elements::TEXT_PLACEHOLDER;

use super::app::App;
use super::types::InputMode;

pub fn create_header(app: &App) -> Paragraph {
    let header_text = vec![Line::from(vec![
        Span::raw("mailtriage "),
        Span::styled(
            "Email Triage",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" | "),
        Span::styled(&app.current_time, Style::default().fg(Color::Yellow)),
    ])];

    Paragraph::new(header_text)
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Blue)))
        .alignment(Alignment::Center)
}

pub fn create_text_input(app: &App) -> Paragraph {
    let ui = &app.form.ui;
    let editing = app.input_mode == InputMode::EditingText;

    let mut lines: Vec<Line> = Vec::new();
    if ui.text_value.is_empty() {
        lines.push(Line::from(Span::styled(
            TEXT_PLACEHOLDER,
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )));
    } else {
        for line in ui.text_value.lines() {
            lines.push(Line::from(line.to_string()));
        }
        if ui.text_value.ends_with('\n') {
            lines.push(Line::from(""));
        }
    }
    if editing {
        if let Some(last) = lines.last_mut() {
            last.spans.push(Span::styled(
                "_",
                Style::default().add_modifier(Modifier::SLOW_BLINK),
            ));
        }
    }

    let title = if ui.text_enabled {
        " Email text "
    } else {
        " Email text (disabled - file selected) "
    };
    let border = if editing {
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
    } else if ui.text_enabled {
        Style::default().fg(Color::Gray)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(title).border_style(border))
        .wrap(Wrap { trim: false })
}

pub fn create_file_zone(app: &App) -> Paragraph {
    let ui = &app.form.ui;

    let line = if ui.file_loading {
        Line::from(Span::styled(
            "reading file...",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::ITALIC),
        ))
    } else {
        Line::from(Span::styled(
            ui.file_message.clone(),
            if ui.file_enabled {
                Style::default()
            } else {
                Style::default().fg(Color::DarkGray)
            },
        ))
    };

    let title = if ui.file_enabled {
        " File "
    } else {
        " File (disabled - text entered) "
    };
    let border = if ui.drop_highlight {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else if ui.file_enabled {
        Style::default().fg(Color::Gray)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    Paragraph::new(vec![line])
        .block(Block::default().borders(Borders::ALL).title(title).border_style(border))
        .alignment(Alignment::Center)
}

pub fn create_picker(app: &App) -> Table {
    let header = Row::new(vec![
        Cell::from("Name").style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
        Cell::from("Size").style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
    ]);

    let rows: Vec<Row> = app
        .picker
        .items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let style = if i == app.picker.selected_index {
                Style::default().bg(Color::Blue).fg(Color::White)
            } else if item.is_dir {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };

            let name = if item.is_dir {
                format!("[D] {}", item.name)
            } else {
                format!("    {}", item.name)
            };

            Row::new(vec![
                Cell::from(name),
                Cell::from(if item.is_dir {
                    "-".to_string()
                } else {
                    FilePicker::format_size(item.size)
                }),
            ])
            .style(style)
        })
        .collect();

    let widths = [Constraint::Min(20), Constraint::Length(6)];

    let title = format!(" {} ", app.picker.current_dir.to_string_lossy());

    Table::new(rows, widths).header(header).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
    )
}

pub fn create_output(app: &App) -> Paragraph {
    let ui = &app.form.ui;
    let mut lines: Vec<Line> = Vec::new();

    if ui.main_loading {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "analyzing...",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::ITALIC),
        )));
    } else if let Some(error) = &ui.error_message {
        lines.push(Line::from(Span::styled(
            "Error",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(""));
        lines.push(Line::from(error.clone()));
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "r: try again   n: analyze new",
            Style::default().fg(Color::DarkGray),
        )));
    } else {
        lines.push(Line::from(vec![
            Span::styled("Category: ", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
            Span::raw(ui.result_category.clone().unwrap_or_default()),
        ]));
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Suggested response:",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )));
        for line in ui.result_response.clone().unwrap_or_default().lines() {
            lines.push(Line::from(line.to_string()));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "r: try again   n: analyze new",
            Style::default().fg(Color::DarkGray),
        )));
    }

    let border = if ui.error_message.is_some() {
        Style::default().fg(Color::Red)
    } else {
        Style::default().fg(Color::Gray)
    };

    Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Analysis ").border_style(border))
        .wrap(Wrap { trim: false })
}

pub fn create_status_bar(app: &App) -> Paragraph {
    let shortcuts = match app.input_mode {
        InputMode::Normal => {
            if app.can_reset() {
                "r:try-again n:analyze-new q:quit"
            } else if app.form.ui.submit_enabled {
                "Enter/s:submit i:edit f:browse q:quit ?:help"
            } else {
                "i:edit f:browse q:quit ?:help"
            }
        }
        InputMode::EditingText => "Esc:done Enter:newline Ctrl+D:submit",
        InputMode::Picker => "jk:move Enter:select h:up-dir .:hidden Esc:back",
    };

    let submit_indicator = if app.form.ui.submit_enabled {
        Span::styled("SUBMIT READY", Style::default().fg(Color::Green))
    } else {
        Span::styled("submit disabled", Style::default().fg(Color::DarkGray))
    };

    let status = vec![Line::from(vec![
        submit_indicator,
        Span::raw(" | "),
        Span::raw(&app.status_message),
        Span::raw(" | "),
        Span::styled(shortcuts, Style::default().fg(Color::DarkGray)),
    ])];

    Paragraph::new(status).style(Style::default().bg(Color::Black).fg(Color::White))
}
