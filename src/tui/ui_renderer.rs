use super::app_logic::TuiApp;
use super::app_state::AppMode;
use crate::config::{MAX_MAX_FILE_SIZE, MIN_MAX_FILE_SIZE};
use crate::tree_builder::build_tree_labels;
use crate::tree_model::EntryKind;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
};

fn draw_help_block(f: &mut Frame, app: &TuiApp, area: Rect) {
    let help_text_lines_content = vec![
        Line::from("Arrows/jk: Nav | Space: Check | r: Check subtree | Tab/o/Enter: Open | y: Copy | q/Esc: Quit"),
        Line::from("a: Select all | d: Deselect all | /: Extension filter | h: Hidden files | m: Max file size"),
        Line::from(format!(
            "Filter: {} | Hidden: {} | Max size: {}KB | {}",
            if app.config.filter_pattern().is_empty() {
                "(none)"
            } else {
                app.config.filter_pattern()
            },
            if app.config.hide_hidden { "hidden" } else { "shown" },
            app.config.max_file_size / 1024,
            app.status
        )),
    ];
    let help_paragraph = Paragraph::new(help_text_lines_content).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Treepaste Interactive Selection"),
    );
    f.render_widget(help_paragraph, area);
}

fn max_size_prompt() -> String {
    format!(
        "Maximum file size in KB, {}-{} (Esc to cancel, Enter to apply)",
        MIN_MAX_FILE_SIZE / 1024,
        MAX_MAX_FILE_SIZE / 1024
    )
}

fn draw_input_block(f: &mut Frame, app: &TuiApp, area: Rect) {
    let title = match app.mode {
        AppMode::EditingMaxSize => max_size_prompt(),
        _ => "Extension filter regex, e.g. \\.py$|\\.txt$ (Esc to cancel, Enter to apply)".to_string(),
    };
    let input_paragraph = Paragraph::new(app.input.text.as_str())
        .block(Block::default().borders(Borders::ALL).title(title))
        .wrap(Wrap { trim: false });
    f.render_widget(input_paragraph, area);
    f.set_cursor_position((area.x + 1 + app.input.cursor as u16, area.y + 1));
}

fn draw_main_list_block(f: &mut Frame, app: &mut TuiApp, area: Rect) {
    app.list_viewport_height = area.height.saturating_sub(2) as usize;
    app.ensure_selection_is_visible_in_viewport();

    let rows = app.rows();
    let labels = build_tree_labels(&app.tree, &rows);
    let start = app.scroll_offset.min(rows.len());
    let window = start..(start + app.list_viewport_height).min(rows.len());

    let partial = app.tree.dirs_with_checked_descendants();

    let list_items: Vec<ListItem> = rows[window.clone()]
        .iter()
        .zip(&labels[window])
        .map(|(row, label)| {
            let entry = app.tree.entry(row.id);
            let check_prefix = if entry.check.is_checked() {
                "[x] "
            } else if partial.contains(&row.id) {
                "[-] "
            } else {
                "[ ] "
            };
            let expansion_prefix = if entry.is_dir() {
                if entry.open { "[-] " } else { "[+] " }
            } else {
                "    "
            };
            let full_line = format!("{}{}{}", expansion_prefix, check_prefix, label);
            match entry.kind {
                EntryKind::Error(_) => ListItem::new(full_line).style(Style::default().fg(Color::Red)),
                _ => ListItem::new(full_line),
            }
        })
        .collect();

    let list_title = format!(
        "Select files ({} checked, {} loaded)",
        app.tree.checked_files().len(),
        app.tree.len()
    );

    let list_widget = List::new(list_items)
        .block(Block::default().borders(Borders::ALL).title(list_title))
        .highlight_style(
            Style::default()
                .add_modifier(Modifier::BOLD)
                .bg(Color::DarkGray),
        )
        .highlight_symbol("❯ ");

    let mut list_state_for_view = ratatui::widgets::ListState::default();
    let current_pos = app
        .current
        .and_then(|id| rows.iter().position(|row| row.id == id));

    if let Some(pos) = current_pos {
        if pos >= app.scroll_offset && pos < app.scroll_offset + app.list_viewport_height {
            list_state_for_view.select(Some(pos - app.scroll_offset));
        }
    }
    f.render_stateful_widget(list_widget, area, &mut list_state_for_view);
}

pub(super) fn ui_frame(frame: &mut Frame, app: &mut TuiApp) {
    let help_lines = 3;
    let editing = app.mode != AppMode::Normal;
    let input_height = if editing { 3 } else { 0 };
    let top_block_container_height = (help_lines + 2) + input_height;

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(top_block_container_height),
            Constraint::Min(0),
        ])
        .split(frame.area());

    let top_container_area = main_chunks[0];
    let list_area = main_chunks[1];

    let top_content_constraints = if editing {
        vec![
            Constraint::Length(help_lines + 2),
            Constraint::Length(input_height),
        ]
    } else {
        vec![Constraint::Length(help_lines + 2)]
    };
    let top_content_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(top_content_constraints)
        .split(top_container_area);

    draw_help_block(frame, app, top_content_chunks[0]);
    if editing {
        draw_input_block(frame, app, top_content_chunks[1]);
    }

    draw_main_list_block(frame, app, list_area);
}
