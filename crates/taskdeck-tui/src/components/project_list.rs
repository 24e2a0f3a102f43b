use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};
use taskdeck_core::project::{Project, ProjectFilter, ProjectSortKey, ProjectStatus};
use taskdeck_core::ViewMode;

use super::collection::{grid_cells, grid_columns, Collection};
use super::progress_bar::ProgressBar;

pub type ProjectCollection = Collection<Project, ProjectFilter, ProjectSortKey>;

pub const EMPTY_MESSAGE: &str = "No projects yet. Create your first project!";
pub const NO_MATCH_MESSAGE: &str = "No projects match the current search or filter.";

const CARD_HEIGHT: u16 = 5;

/// Cursor stride for j/k at this width.
pub fn columns_for(projects: &ProjectCollection, width: u16) -> usize {
    match projects.query().view_mode {
        ViewMode::Grid => grid_columns(width),
        ViewMode::List => 1,
    }
}

pub fn toolbar(projects: &ProjectCollection) -> Line<'static> {
    let q = projects.query();
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
            projects.visible().len(),
            projects.items().len(),
        )),
    ])
}

fn status_style(status: ProjectStatus) -> Style {
    match status {
        ProjectStatus::NotStarted => Style::default().fg(Color::DarkGray),
        ProjectStatus::InProgress => Style::default().fg(Color::Yellow),
        ProjectStatus::Completed => Style::default().fg(Color::Green),
    }
}

pub fn render(frame: &mut Frame, projects: &ProjectCollection, area: Rect) {
    if projects.visible().is_empty() {
        let message = if projects.items().is_empty() {
            EMPTY_MESSAGE
        } else {
            NO_MATCH_MESSAGE
        };
        let paragraph = Paragraph::new(message)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL).title(" Projects "));
        frame.render_widget(paragraph, area);
        return;
    }
    match projects.query().view_mode {
        ViewMode::Grid => render_grid(frame, projects, area),
        ViewMode::List => render_list(frame, projects, area),
    }
}

fn render_grid(frame: &mut Frame, projects: &ProjectCollection, area: Rect) {
    let columns = grid_columns(area.width);
    let selected = projects.selected_index();
    for (idx, cell) in grid_cells(
        area,
        projects.visible().len(),
        columns,
        CARD_HEIGHT,
        selected,
    ) {
        let project = &projects.visible()[idx];
        render_card(frame, project, cell, selected == Some(idx));
    }
}

fn render_card(frame: &mut Frame, project: &Project, area: Rect, is_selected: bool) {
    let border_style = if is_selected {
        Style::default().fg(Color::Cyan).bold()
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let block = Block::default()
        .title(format!(" {} ", project.title))
        .borders(Borders::ALL)
        .border_style(border_style);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.height == 0 {
        return;
    }

    let status = project.status();
    let description = project.description.as_deref().unwrap_or("");
    let top = Rect { height: 1, ..inner };
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(format!("{} ", status.display_name()), status_style(status)),
            Span::styled(description, Style::default().fg(Color::Gray)),
        ]))
        .wrap(Wrap { trim: true }),
        top,
    );
    if inner.height > 2 {
        let bar = Rect {
            y: inner.y + 2,
            height: 1,
            ..inner
        };
        frame.render_widget(ProgressBar::new(project.progress()), bar);
    }
}

fn render_list(frame: &mut Frame, projects: &ProjectCollection, area: Rect) {
    let items: Vec<ListItem> = projects
        .visible()
        .iter()
        .map(|p| {
            let progress = p.progress();
            let status = p.status();
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{:>4} ", progress.percent_label()),
                    Style::default().fg(super::progress_bar::progress_color(&progress)),
                ),
                Span::raw(p.title.clone()),
                Span::styled(
                    format!("  {}  {}", status.display_name(), progress.label()),
                    status_style(status),
                ),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(" Projects "))
        .highlight_style(Style::default().fg(Color::Black).bg(Color::Cyan).bold())
        .highlight_symbol("> ");
    let mut state = ListState::default();
    state.select(projects.selected_index());
    frame.render_stateful_widget(list, area, &mut state);
}
