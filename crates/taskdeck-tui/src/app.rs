use std::cell::Cell;

use chrono::Local;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use taskdeck_core::project::Project;
use taskdeck_core::task::Task;
use taskdeck_core::validate;
use taskdeck_service::{BlockingHttpService, ServiceError};
use tracing::{info, warn};

use crate::components::form::Form;
use crate::components::progress_bar::ProgressBar;
use crate::components::project_list::{self, ProjectCollection};
use crate::components::task_list::{self, TaskCollection};

pub const REGISTERED_NOTICE: &str = "Registration successful! Please login!";
pub const INVALID_LOGIN: &str = "Invalid email or password";
pub const DETAIL_LOAD_FAILED: &str = "Failed to load project";
pub const DETAIL_UNAVAILABLE: &str = "Project could not be loaded. R: retry  b: back";

/// Where the user is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Register,
    Projects,
    ProjectDetail(i64),
}

impl Route {
    /// `/login`, `/register`, `/projects` and `/projects/<id>`. Anything
    /// else lands on the project list.
    pub fn parse(path: &str) -> Self {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            ["login"] => Route::Login,
            ["register"] => Route::Register,
            ["projects", id] => id
                .parse()
                .map(Route::ProjectDetail)
                .unwrap_or(Route::Projects),
            _ => Route::Projects,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Login => "/login".into(),
            Route::Register => "/register".into(),
            Route::Projects => "/projects".into(),
            Route::ProjectDetail(id) => format!("/projects/{id}"),
        }
    }

    pub fn is_protected(&self) -> bool {
        matches!(self, Route::Projects | Route::ProjectDetail(_))
    }

    /// Protected routes need a session; without one the user goes to login.
    pub fn guard(self, authenticated: bool) -> Self {
        if self.is_protected() && !authenticated {
            Route::Login
        } else {
            self
        }
    }
}

enum Screen {
    Login {
        form: Form,
    },
    Register {
        form: Form,
    },
    Projects {
        projects: ProjectCollection,
    },
    ProjectDetail {
        project_id: i64,
        project: Option<Project>,
        tasks: TaskCollection,
    },
}

/// Overlay on top of the current screen.
#[derive(Debug, Clone)]
pub enum Mode {
    Normal,
    /// Live search over the current list
    Search { input: String },
    NewProject { form: Form },
    NewTask { form: Form },
    TaskDetail { task: Task },
    ConfirmDelete { task: Task },
}

pub struct App {
    service: BlockingHttpService,
    screen: Screen,
    mode: Mode,
    /// Error from the last failed request; Esc dismisses it.
    banner: Option<String>,
    notice: Option<String>,
    /// A fetch for the current screen is due. The event loop draws once with
    /// the loading indicator, then calls [`App::load`].
    loading: bool,
    list_width: Cell<u16>,
}

impl App {
    pub fn new(service: BlockingHttpService, start: Route) -> Self {
        let mut app = Self {
            service,
            screen: Screen::Login {
                form: Form::login(),
            },
            mode: Mode::Normal,
            banner: None,
            notice: None,
            loading: false,
            list_width: Cell::new(80),
        };
        app.navigate(start);
        app
    }

    pub fn route(&self) -> Route {
        match &self.screen {
            Screen::Login { .. } => Route::Login,
            Screen::Register { .. } => Route::Register,
            Screen::Projects { .. } => Route::Projects,
            Screen::ProjectDetail { project_id, .. } => Route::ProjectDetail(*project_id),
        }
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Inline error on the login/register form or the open dialog.
    pub fn form_error(&self) -> Option<&str> {
        let form = match (&self.mode, &self.screen) {
            (Mode::NewProject { form } | Mode::NewTask { form }, _) => form,
            (Mode::Normal, Screen::Login { form } | Screen::Register { form }) => form,
            _ => return None,
        };
        form.error.as_deref()
    }

    pub fn projects(&self) -> Option<&ProjectCollection> {
        match &self.screen {
            Screen::Projects { projects } => Some(projects),
            _ => None,
        }
    }

    pub fn project(&self) -> Option<&Project> {
        match &self.screen {
            Screen::ProjectDetail { project, .. } => project.as_ref(),
            _ => None,
        }
    }

    pub fn tasks(&self) -> Option<&TaskCollection> {
        match &self.screen {
            Screen::ProjectDetail { tasks, .. } => Some(tasks),
            _ => None,
        }
    }

    pub fn is_input_mode(&self) -> bool {
        match self.mode {
            Mode::Search { .. } | Mode::NewProject { .. } | Mode::NewTask { .. } => true,
            Mode::Normal => matches!(
                self.screen,
                Screen::Login { .. } | Screen::Register { .. }
            ),
            Mode::TaskDetail { .. } | Mode::ConfirmDelete { .. } => false,
        }
    }

    /// Switch screens through the route guard. Protected screens start with
    /// a fetch pending.
    pub fn navigate(&mut self, route: Route) {
        let route = route.guard(self.service.is_authenticated());
        info!(route = %route.path(), "navigate");
        self.mode = Mode::Normal;
        self.banner = None;
        self.notice = None;
        self.screen = match route {
            Route::Login => Screen::Login {
                form: Form::login(),
            },
            Route::Register => Screen::Register {
                form: Form::register(),
            },
            Route::Projects => Screen::Projects {
                projects: ProjectCollection::new(),
            },
            Route::ProjectDetail(project_id) => Screen::ProjectDetail {
                project_id,
                project: None,
                tasks: TaskCollection::new(),
            },
        };
        self.loading = route.is_protected();
    }

    fn request_reload(&mut self) {
        self.loading = true;
    }

    /// Re-fetch everything the current screen shows.
    pub fn load(&mut self) {
        self.loading = false;
        match self.route() {
            Route::Projects => match self.service.list_projects() {
                Ok(items) => {
                    if let Screen::Projects { projects } = &mut self.screen {
                        let keep = projects.selected().map(|p| p.id);
                        projects.set_items(items);
                        if let Some(id) = keep {
                            projects.select_where(|p| p.id == id);
                        }
                    }
                }
                Err(e) => self.fail(e, "Failed to load projects"),
            },
            Route::ProjectDetail(id) => match self.service.load_project_with_tasks(id) {
                Ok((loaded, items)) => {
                    if let Screen::ProjectDetail { project, tasks, .. } = &mut self.screen {
                        let keep = tasks.selected().map(|t| t.id);
                        *project = Some(loaded);
                        tasks.set_items(items);
                        if let Some(id) = keep {
                            tasks.select_where(|t| t.id == id);
                        }
                    }
                }
                Err(e) if e.is_unauthorized() => self.fail(e, DETAIL_LOAD_FAILED),
                // Either half failing is one error state, whatever the backend said.
                Err(e) => {
                    warn!(project_id = id, "{DETAIL_LOAD_FAILED}: {e}");
                    self.notice = None;
                    self.banner = Some(DETAIL_LOAD_FAILED.into());
                }
            },
            Route::Login | Route::Register => {}
        }
    }

    /// Route a failed request. A 401 has already cleared the session, so the
    /// user just goes back to login without a banner.
    fn fail(&mut self, err: ServiceError, fallback: &str) {
        if err.is_unauthorized() {
            info!("session rejected by backend, returning to login");
            self.navigate(Route::Login);
            return;
        }
        warn!("{fallback}: {err}");
        self.notice = None;
        self.banner = Some(err.user_message(fallback));
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        match self.mode.clone() {
            Mode::Normal => self.handle_normal(key),
            Mode::Search { input } => self.handle_search(key, input),
            Mode::NewProject { form } => self.handle_new_project(key, form),
            Mode::NewTask { form } => self.handle_new_task(key, form),
            Mode::TaskDetail { task } => self.handle_task_detail(key, task),
            Mode::ConfirmDelete { task } => self.handle_confirm_delete(key, task),
        }
    }

    fn handle_normal(&mut self, key: KeyEvent) {
        match self.route() {
            Route::Login => self.handle_login(key),
            Route::Register => self.handle_register(key),
            Route::Projects => self.handle_projects(key),
            Route::ProjectDetail(id) => self.handle_project_detail(key, id),
        }
    }

    // -- Auth screens --

    fn handle_login(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('r') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.navigate(Route::Register)
            }
            KeyCode::Enter => self.submit_login(),
            _ => {
                if let Screen::Login { form } = &mut self.screen {
                    form.handle_key(key);
                }
            }
        }
    }

    fn submit_login(&mut self) {
        let Screen::Login { form } = &mut self.screen else {
            return;
        };
        let request = match validate::login(form.value(0), form.value(1)) {
            Ok(request) => request,
            Err(e) => {
                form.error = Some(e.to_string());
                return;
            }
        };
        match self.service.login(&request) {
            Ok(session) => {
                info!(user = session.display_name().unwrap_or_default(), "signed in");
                self.navigate(Route::Projects);
            }
            Err(e) if e.is_unauthorized() => form.error = Some(INVALID_LOGIN.into()),
            Err(e) => {
                warn!("login failed: {e}");
                form.error = Some(e.user_message("Login failed"));
            }
        }
    }

    fn handle_register(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.navigate(Route::Login),
            KeyCode::Enter => self.submit_register(),
            _ => {
                if let Screen::Register { form } = &mut self.screen {
                    form.handle_key(key);
                }
            }
        }
    }

    fn submit_register(&mut self) {
        let Screen::Register { form } = &mut self.screen else {
            return;
        };
        let request = match validate::register(
            form.value(0),
            form.value(1),
            form.value(2),
            form.value(3),
        ) {
            Ok(request) => request,
            Err(e) => {
                form.error = Some(e.to_string());
                return;
            }
        };
        match self.service.register(&request) {
            Ok(_) => {
                info!(email = %request.email, "registered");
                self.navigate(Route::Login);
                self.notice = Some(REGISTERED_NOTICE.into());
            }
            Err(e) => {
                warn!("registration failed: {e}");
                form.error = Some(e.user_message("Registration failed"));
            }
        }
    }

    // -- List screens --

    /// Apply one of two edits to whichever list the screen holds.
    fn on_list(
        &mut self,
        on_projects: impl FnOnce(&mut ProjectCollection),
        on_tasks: impl FnOnce(&mut TaskCollection),
    ) {
        match &mut self.screen {
            Screen::Projects { projects } => on_projects(projects),
            Screen::ProjectDetail { tasks, .. } => on_tasks(tasks),
            Screen::Login { .. } | Screen::Register { .. } => {}
        }
    }

    fn current_search(&self) -> String {
        match &self.screen {
            Screen::Projects { projects } => projects.query().search.clone(),
            Screen::ProjectDetail { tasks, .. } => tasks.query().search.clone(),
            _ => String::new(),
        }
    }

    /// Keys shared by both list screens. Returns false if not handled.
    fn handle_list_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('/') => {
                self.mode = Mode::Search {
                    input: self.current_search(),
                };
            }
            KeyCode::Char('f') => self.on_list(
                |p| p.set_filter(p.query().filter.next()),
                |t| t.set_filter(t.query().filter.next()),
            ),
            KeyCode::Char('s') => self.on_list(|p| p.cycle_sort(), |t| t.cycle_sort()),
            KeyCode::Char('r') => self.on_list(|p| p.flip_direction(), |t| t.flip_direction()),
            KeyCode::Char('v') => self.on_list(|p| p.toggle_view_mode(), |t| t.toggle_view_mode()),
            KeyCode::Char('R') => self.request_reload(),
            KeyCode::Char('L') => {
                info!("signed out");
                self.service.logout();
                self.navigate(Route::Login);
            }
            _ => {
                let width = self.list_width.get();
                self.on_list(
                    |p| {
                        let columns = project_list::columns_for(p, width);
                        p.handle_key(key, columns)
                    },
                    |t| {
                        let columns = task_list::columns_for(t, width);
                        t.handle_key(key, columns)
                    },
                );
                return false;
            }
        }
        true
    }

    fn handle_projects(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.banner = None,
            KeyCode::Enter => {
                let selected = self
                    .projects()
                    .and_then(|p| p.selected())
                    .map(|p| p.id);
                if let Some(id) = selected {
                    self.navigate(Route::ProjectDetail(id));
                }
            }
            KeyCode::Char('n') => {
                self.mode = Mode::NewProject {
                    form: Form::new_project(),
                };
            }
            _ => {
                self.handle_list_key(key);
            }
        }
    }

    fn selected_task(&self) -> Option<Task> {
        self.tasks().and_then(|t| t.selected()).cloned()
    }

    fn handle_project_detail(&mut self, key: KeyEvent, project_id: i64) {
        match key.code {
            KeyCode::Esc if self.banner.is_some() => self.banner = None,
            KeyCode::Esc | KeyCode::Char('b') => self.navigate(Route::Projects),
            KeyCode::Char('n') => {
                self.mode = Mode::NewTask {
                    form: Form::new_task(),
                };
            }
            KeyCode::Char(' ') | KeyCode::Char('x') => {
                if let Some(task) = self.selected_task() {
                    self.toggle_task(project_id, &task);
                }
            }
            KeyCode::Char('d') => {
                if let Some(task) = self.selected_task() {
                    self.mode = Mode::ConfirmDelete { task };
                }
            }
            KeyCode::Enter => {
                if let Some(task) = self.selected_task() {
                    self.mode = Mode::TaskDetail { task };
                }
            }
            _ => {
                self.handle_list_key(key);
            }
        }
    }

    // -- Overlays --

    fn set_search(&mut self, search: &str) {
        self.on_list(|p| p.set_search(search), |t| t.set_search(search));
    }

    fn handle_search(&mut self, key: KeyEvent, mut input: String) {
        match key.code {
            KeyCode::Enter => self.mode = Mode::Normal,
            KeyCode::Esc => {
                self.set_search("");
                self.mode = Mode::Normal;
            }
            KeyCode::Backspace => {
                input.pop();
                self.set_search(&input);
                self.mode = Mode::Search { input };
            }
            KeyCode::Char(c) => {
                input.push(c);
                self.set_search(&input);
                self.mode = Mode::Search { input };
            }
            _ => {}
        }
    }

    fn handle_new_project(&mut self, key: KeyEvent, mut form: Form) {
        match key.code {
            KeyCode::Esc => self.mode = Mode::Normal,
            KeyCode::Enter => {
                let input = match validate::new_project(form.value(0), form.value(1)) {
                    Ok(input) => input,
                    Err(e) => {
                        form.error = Some(e.to_string());
                        self.mode = Mode::NewProject { form };
                        return;
                    }
                };
                match self.service.create_project(&input) {
                    Ok(project) => {
                        info!(id = project.id, title = %project.title, "project created");
                        self.mode = Mode::Normal;
                        self.banner = None;
                        self.notice = Some("Project created".into());
                        self.request_reload();
                    }
                    Err(e) => {
                        let expired = e.is_unauthorized();
                        self.fail(e, "Failed to create project");
                        if !expired {
                            form.error = None;
                            self.mode = Mode::NewProject { form };
                        }
                    }
                }
            }
            _ => {
                form.handle_key(key);
                self.mode = Mode::NewProject { form };
            }
        }
    }

    fn handle_new_task(&mut self, key: KeyEvent, mut form: Form) {
        let Route::ProjectDetail(project_id) = self.route() else {
            self.mode = Mode::Normal;
            return;
        };
        match key.code {
            KeyCode::Esc => self.mode = Mode::Normal,
            KeyCode::Enter => {
                let today = Local::now().date_naive();
                let input =
                    match validate::new_task(form.value(0), form.value(1), form.value(2), today) {
                        Ok(input) => input,
                        Err(e) => {
                            form.error = Some(e.to_string());
                            self.mode = Mode::NewTask { form };
                            return;
                        }
                    };
                match self.service.create_task(project_id, &input) {
                    Ok(task) => {
                        info!(project_id, task_id = task.id, "task created");
                        self.mode = Mode::Normal;
                        self.banner = None;
                        self.notice = Some("Task created".into());
                        self.request_reload();
                    }
                    Err(e) => {
                        let expired = e.is_unauthorized();
                        self.fail(e, "Failed to create task");
                        if !expired {
                            form.error = None;
                            self.mode = Mode::NewTask { form };
                        }
                    }
                }
            }
            _ => {
                form.handle_key(key);
                self.mode = Mode::NewTask { form };
            }
        }
    }

    fn handle_task_detail(&mut self, key: KeyEvent, task: Task) {
        match key.code {
            KeyCode::Esc | KeyCode::Enter => self.mode = Mode::Normal,
            KeyCode::Char(' ') | KeyCode::Char('x') => {
                self.mode = Mode::Normal;
                if let Route::ProjectDetail(project_id) = self.route() {
                    self.toggle_task(project_id, &task);
                }
            }
            KeyCode::Char('d') => self.mode = Mode::ConfirmDelete { task },
            _ => {}
        }
    }

    fn handle_confirm_delete(&mut self, key: KeyEvent, task: Task) {
        self.mode = Mode::Normal;
        if key.code != KeyCode::Char('y') {
            return;
        }
        let Route::ProjectDetail(project_id) = self.route() else {
            return;
        };
        match self.service.delete_task(project_id, task.id) {
            Ok(()) => {
                info!(project_id, task_id = task.id, "task deleted");
                self.notice = Some("Task deleted".into());
                self.request_reload();
            }
            Err(e) => self.fail(e, "Failed to delete task"),
        }
    }

    fn toggle_task(&mut self, project_id: i64, task: &Task) {
        match self.service.toggle_task(project_id, task.id) {
            Ok(updated) => {
                info!(project_id, task_id = task.id, status = %updated.status, "task toggled");
                self.request_reload();
            }
            Err(e) => self.fail(e, "Failed to update task"),
        }
    }

    // -- Rendering --

    pub fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(area);

        self.render_title_bar(frame, layout[0]);
        self.render_message_line(frame, layout[1]);
        match &self.screen {
            Screen::Login { form } | Screen::Register { form } => {
                form.render(frame, centered_rect(60, 60, layout[2]))
            }
            Screen::Projects { projects } => self.render_projects(frame, projects, layout[2]),
            Screen::ProjectDetail { project, tasks, .. } => {
                self.render_project_detail(frame, project.as_ref(), tasks, layout[2])
            }
        }
        self.render_status_bar(frame, layout[3]);

        // Overlays
        match &self.mode {
            Mode::Normal => {}
            Mode::Search { input } => self.render_input_bar(frame, " Search ", input, area),
            Mode::NewProject { form } | Mode::NewTask { form } => {
                form.render(frame, centered_rect(60, 50, area))
            }
            Mode::TaskDetail { task } => self.render_task_detail(frame, task, area),
            Mode::ConfirmDelete { task } => self.render_confirm_delete_dialog(frame, task, area),
        }
    }

    fn render_title_bar(&self, frame: &mut Frame, area: Rect) {
        let location = match &self.screen {
            Screen::Login { .. } => "Login".to_string(),
            Screen::Register { .. } => "Register".to_string(),
            Screen::Projects { .. } => "Projects".to_string(),
            Screen::ProjectDetail { project, .. } => project
                .as_ref()
                .map(|p| format!("Projects / {}", p.title))
                .unwrap_or_else(|| "Projects / ...".into()),
        };
        let user = self
            .service
            .session()
            .current()
            .and_then(|s| s.display_name().map(String::from))
            .map(|name| format!("  [{name}]"))
            .unwrap_or_default();
        let title = Line::from(vec![
            Span::styled(" taskdeck ", Style::default().fg(Color::Black).bg(Color::Cyan).bold()),
            Span::raw(format!(" {location}")),
            Span::styled(user, Style::default().fg(Color::DarkGray)),
        ]);
        frame.render_widget(Paragraph::new(title), area);
    }

    fn render_message_line(&self, frame: &mut Frame, area: Rect) {
        let line = if let Some(banner) = &self.banner {
            Line::from(vec![
                Span::styled(format!(" {banner}"), Style::default().fg(Color::Red).bold()),
                Span::styled("  (Esc to dismiss)", Style::default().fg(Color::DarkGray)),
            ])
        } else if let Some(notice) = &self.notice {
            Line::from(Span::styled(
                format!(" {notice}"),
                Style::default().fg(Color::Green),
            ))
        } else {
            Line::from("")
        };
        frame.render_widget(Paragraph::new(line), area);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let text = if self.loading {
            " Loading...".to_string()
        } else {
            let hints = match (&self.mode, self.route()) {
                (Mode::Search { .. }, _) => "Enter: keep  Esc: clear",
                (Mode::NewProject { .. } | Mode::NewTask { .. }, _) => "Enter: create  Esc: cancel",
                (Mode::TaskDetail { .. }, _) => "x: toggle  d: delete  Esc: close",
                (Mode::ConfirmDelete { .. }, _) => "y: delete  any other key: cancel",
                (Mode::Normal, Route::Login) => "Enter: sign in  Ctrl+R: register  Ctrl+C: quit",
                (Mode::Normal, Route::Register) => "Enter: register  Esc: back  Ctrl+C: quit",
                (Mode::Normal, Route::Projects) => {
                    "Enter: open  n: new  /: search  f: filter  s: sort  r: direction  v: view  R: reload  L: logout  q: quit"
                }
                (Mode::Normal, Route::ProjectDetail(_)) => {
                    "n: new  x: toggle  d: delete  Enter: detail  /: search  f: filter  s: sort  r: direction  v: view  b: back  q: quit"
                }
            };
            format!(" {hints}")
        };
        let status = Paragraph::new(text).style(Style::default().fg(Color::DarkGray));
        frame.render_widget(status, area);
    }

    fn render_projects(&self, frame: &mut Frame, projects: &ProjectCollection, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(0)])
            .split(area);
        frame.render_widget(Paragraph::new(project_list::toolbar(projects)), chunks[0]);
        self.list_width.set(chunks[1].width);
        if self.loading && projects.items().is_empty() {
            frame.render_widget(loading_block(" Projects "), chunks[1]);
        } else {
            project_list::render(frame, projects, chunks[1]);
        }
    }

    fn render_project_detail(
        &self,
        frame: &mut Frame,
        project: Option<&Project>,
        tasks: &TaskCollection,
        area: Rect,
    ) {
        let Some(project) = project else {
            if self.loading {
                frame.render_widget(loading_block(" Project "), area);
            } else {
                let body = Paragraph::new(DETAIL_UNAVAILABLE)
                    .alignment(Alignment::Center)
                    .style(Style::default().fg(Color::DarkGray))
                    .block(Block::default().borders(Borders::ALL).title(" Project "));
                frame.render_widget(body, area);
            }
            return;
        };
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5),
                Constraint::Length(1),
                Constraint::Min(0),
            ])
            .split(area);

        let block = Block::default()
            .title(format!(" {} ", project.title))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));
        let inner = block.inner(chunks[0]);
        frame.render_widget(block, chunks[0]);
        let header = vec![
            Line::from(Span::styled(
                project.description.clone().unwrap_or_default(),
                Style::default().fg(Color::Gray),
            )),
            Line::from(Span::styled(
                project.status().display_name(),
                Style::default().bold(),
            )),
        ];
        frame.render_widget(Paragraph::new(header), inner);
        if inner.height >= 3 {
            let bar = Rect {
                y: inner.y + 2,
                height: 1,
                ..inner
            };
            frame.render_widget(ProgressBar::new(project.progress()), bar);
        }

        frame.render_widget(Paragraph::new(task_list::toolbar(tasks)), chunks[1]);
        self.list_width.set(chunks[2].width);
        task_list::render(frame, tasks, chunks[2]);
    }

    fn render_input_bar(&self, frame: &mut Frame, label: &str, input: &str, area: Rect) {
        let input_area = Rect {
            x: area.x,
            y: area.y + area.height.saturating_sub(3),
            width: area.width,
            height: 3.min(area.height),
        };
        frame.render_widget(Clear, input_area);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(label);
        let paragraph = Paragraph::new(format!("{input}_")).block(block);
        frame.render_widget(paragraph, input_area);
    }

    fn render_task_detail(&self, frame: &mut Frame, task: &Task, area: Rect) {
        let popup = centered_rect(60, 60, area);
        frame.render_widget(Clear, popup);

        let block = Block::default()
            .title(" Task Detail ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));

        let due = task
            .due_date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "None".into());
        let lines = vec![
            Line::from(vec![
                Span::styled("Title: ", Style::default().bold()),
                Span::raw(task.title.as_str()),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Status: ", Style::default().bold()),
                Span::raw(task.status.display_name()),
            ]),
            Line::from(vec![
                Span::styled("Due: ", Style::default().bold()),
                Span::raw(due),
            ]),
            Line::from(vec![
                Span::styled("Created: ", Style::default().bold()),
                Span::raw(task.created_at.format("%Y-%m-%d %H:%M").to_string()),
            ]),
            Line::from(""),
            Line::from(Span::styled("Description:", Style::default().bold())),
            Line::from(task.description.clone().unwrap_or_else(|| "(none)".into())),
        ];
        let paragraph = Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false });
        frame.render_widget(paragraph, popup);
    }

    fn render_confirm_delete_dialog(&self, frame: &mut Frame, task: &Task, area: Rect) {
        let popup = centered_rect(50, 20, area);
        frame.render_widget(Clear, popup);

        let block = Block::default()
            .title(" Confirm Delete ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red));

        let text = format!("Delete \"{}\"?\n\n(y)es / (any key) cancel", task.title);
        let paragraph = Paragraph::new(text)
            .block(block)
            .wrap(Wrap { trim: false })
            .alignment(Alignment::Center);
        frame.render_widget(paragraph, popup);
    }
}

fn loading_block(title: &'static str) -> Paragraph<'static> {
    Paragraph::new("Loading...")
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::ALL).title(title))
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_paths() {
        assert_eq!(Route::parse("/login"), Route::Login);
        assert_eq!(Route::parse("/register/"), Route::Register);
        assert_eq!(Route::parse("/projects"), Route::Projects);
        assert_eq!(Route::parse("/projects/12"), Route::ProjectDetail(12));
    }

    #[test]
    fn unknown_paths_fall_back_to_projects() {
        assert_eq!(Route::parse(""), Route::Projects);
        assert_eq!(Route::parse("/"), Route::Projects);
        assert_eq!(Route::parse("/nowhere"), Route::Projects);
        assert_eq!(Route::parse("/projects/abc"), Route::Projects);
        assert_eq!(Route::parse("/projects/1/tasks"), Route::Projects);
    }

    #[test]
    fn guard_sends_anonymous_users_to_login() {
        assert_eq!(Route::Projects.guard(false), Route::Login);
        assert_eq!(Route::ProjectDetail(3).guard(false), Route::Login);
        assert_eq!(Route::Register.guard(false), Route::Register);
        assert_eq!(Route::Login.guard(false), Route::Login);
        assert_eq!(Route::ProjectDetail(3).guard(true), Route::ProjectDetail(3));
    }

    #[test]
    fn path_round_trips() {
        for route in [
            Route::Login,
            Route::Register,
            Route::Projects,
            Route::ProjectDetail(42),
        ] {
            assert_eq!(Route::parse(&route.path()), route);
        }
    }

    #[test]
    fn centered_rect_is_inside_area() {
        let area = Rect::new(0, 0, 100, 50);
        let popup = centered_rect(60, 40, area);
        assert_eq!(popup.width, 60);
        assert_eq!(popup.height, 20);
        assert_eq!(popup.x, 20);
    }
}
