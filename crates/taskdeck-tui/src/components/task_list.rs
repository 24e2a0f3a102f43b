use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};
use taskdeck_core::task::{Task, TaskFilter, TaskSortKey};
use taskdeck_core::ViewMode;

use super::collection::{grid_cells, grid_columns, Collection};

pub type TaskCollection = Collection<Task, TaskFilter, TaskSortKey>;

pub const EMPTY_MESSAGE: &str = "No tasks yet. Add your first task!";
pub const NO_MATCH_MESSAGE: &str = "No tasks match the current search or filter.";

const CARD_HEIGHT: u16 = 4;

pub fn columns_for(tasks: &TaskCollection, width: u16) -> usize {
    match tasks.query().view_mode {
        ViewMode::Grid => grid_columns(width),
        ViewMode::List => 1,
    }
}

pub fn toolbar(tasks: &TaskCollection) -> Line<'static> {
    let q = tasks.query();
    let sort = q
        .sort
        .map(|k| format!("{} ({})", k.display_name(), q.direction.symbol()))
        .unwrap_or_else(|| "None".into());
    let search = if q.search.is_empty() {
        String::new()
    } else {
        format!("Search: \"{}\"  ", q.search)
    };
    Line::from(vec![
        Span::styled(search, Style::default().fg(Color::Yellow)),
        Span::raw(format!(
            "Filter: {}  Sort: {}  View: {}  ({} of {})",
            q.filter.display_name(),
            sort,
            q.view_mode.display_name(),
            tasks.visible().len(),
            tasks.items().len(),
        )),
    ])
}

fn checkbox(task: &Task) -> Span<'static> {
    if task.is_completed() {
        Span::styled("[x] ", Style::default().fg(Color::Green))
    } else {
        Span::styled("[ ] ", Style::default().fg(Color::Yellow))
    }
}

fn title_style(task: &Task) -> Style {
    if task.is_completed() {
        Style::default().fg(Color::DarkGray).crossed_out()
    } else {
        Style::default()
    }
}

fn due_label(task: &Task) -> String {
    match task.due_date {
        Some(date) => format!("due {}", date.format("%Y-%m-%d")),
        None => "no due date".into(),
    }
}

pub fn render(frame: &mut Frame, tasks: &TaskCollection, area: Rect) {
    if tasks.visible().is_empty() {
        let message = if tasks.items().is_empty() {
            EMPTY_MESSAGE
        } else {
            NO_MATCH_MESSAGE
        };
        let paragraph = Paragraph::new(message)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL).title(" Tasks "));
        frame.render_widget(paragraph, area);
        return;
    }
    match tasks.query().view_mode {
        ViewMode::Grid => render_grid(frame, tasks, area),
        ViewMode::List => render_list(frame, tasks, area),
    }
}

fn render_grid(frame: &mut Frame, tasks: &TaskCollection, area: Rect) {
    let selected = tasks.selected_index();
    for (idx, cell) in grid_cells(
        area,
        tasks.visible().len(),
        grid_columns(area.width),
        CARD_HEIGHT,
        selected,
    ) {
        let task = &tasks.visible()[idx];
        let border_style = if selected == Some(idx) {
            Style::default().fg(Color::Cyan).bold()
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style);
        let lines = vec![
            Line::from(vec![
                checkbox(task),
                Span::styled(task.title.clone(), title_style(task)),
            ]),
            Line::from(Span::styled(
                due_label(task),
                Style::default().fg(Color::Gray),
            )),
        ];
        frame.render_widget(Paragraph::new(lines).block(block), cell);
    }
}

fn render_list(frame: &mut Frame, tasks: &TaskCollection, area: Rect) {
    let items: Vec<ListItem> = tasks
        .visible()
        .iter()
        .map(|t| {
            ListItem::new(Line::from(vec![
                checkbox(t),
                Span::styled(t.title.clone(), title_style(t)),
                Span::styled(
                    format!("  {}", due_label(t)),
                    Style::default().fg(Color::Gray),
                ),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(" Tasks "))
        .highlight_style(Style::default().fg(Color::Black).bg(Color::Cyan).bold())
        .highlight_symbol("> ");
    let mut state = ListState::default();
    state.select(tasks.selected_index());
    frame.render_stateful_widget(list, area, &mut state);
}
