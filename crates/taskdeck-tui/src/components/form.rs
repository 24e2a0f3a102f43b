use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

#[derive(Debug, Clone)]
pub struct FormField {
    pub label: &'static str,
    pub value: String,
    masked: bool,
}

impl FormField {
    pub fn text(label: &'static str) -> Self {
        Self {
            label,
            value: String::new(),
            masked: false,
        }
    }

    pub fn secret(label: &'static str) -> Self {
        Self {
            masked: true,
            ..Self::text(label)
        }
    }

    fn display_value(&self) -> String {
        if self.masked {
            "*".repeat(self.value.chars().count())
        } else {
            self.value.clone()
        }
    }
}

/// A titled stack of single-line fields with one focused field and an
/// inline error line. Submission is up to the owner.
#[derive(Debug, Clone)]
pub struct Form {
    title: &'static str,
    fields: Vec<FormField>,
    focus: usize,
    pub error: Option<String>,
    pub hint: Option<&'static str>,
}

impl Form {
    pub fn new(title: &'static str, fields: Vec<FormField>) -> Self {
        Self {
            title,
            fields,
            focus: 0,
            error: None,
            hint: None,
        }
    }

    pub fn with_hint(mut self, hint: &'static str) -> Self {
        self.hint = Some(hint);
        self
    }

    pub fn login() -> Self {
        Self::new(
            " Login ",
            vec![FormField::text("Email"), FormField::secret("Password")],
        )
        .with_hint("Tab: next field  Enter: sign in  Ctrl+R: create account")
    }

    pub fn register() -> Self {
        Self::new(
            " Create Account ",
            vec![
                FormField::text("Name"),
                FormField::text("Email"),
                FormField::secret("Password"),
                FormField::secret("Confirm password"),
            ],
        )
        .with_hint("Tab: next field  Enter: register  Esc: back to login")
    }

    pub fn new_project() -> Self {
        Self::new(
            " New Project ",
            vec![FormField::text("Title"), FormField::text("Description")],
        )
        .with_hint("Tab: next field  Enter: create  Esc: cancel")
    }

    pub fn new_task() -> Self {
        Self::new(
            " New Task ",
            vec![
                FormField::text("Title"),
                FormField::text("Description"),
                FormField::text("Due date (YYYY-MM-DD)"),
            ],
        )
        .with_hint("Tab: next field  Enter: create  Esc: cancel")
    }

    /// Value of field `idx`; empty if out of range.
    pub fn value(&self, idx: usize) -> &str {
        self.fields.get(idx).map(|f| f.value.as_str()).unwrap_or("")
    }

    pub fn focus(&self) -> usize {
        self.focus
    }

    pub fn set_value(&mut self, idx: usize, value: &str) {
        if let Some(field) = self.fields.get_mut(idx) {
            field.value = value.to_string();
        }
    }

    /// Editing keys: Tab/BackTab/Up/Down move focus, Backspace and plain
    /// characters edit the focused field. Returns false for keys the form
    /// does not consume.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        let n = self.fields.len();
        if n == 0 {
            return false;
        }
        match key.code {
            KeyCode::Tab | KeyCode::Down => self.focus = (self.focus + 1) % n,
            KeyCode::BackTab | KeyCode::Up => self.focus = (self.focus + n - 1) % n,
            KeyCode::Backspace => {
                self.fields[self.focus].value.pop();
            }
            KeyCode::Char(c)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                self.fields[self.focus].value.push(c);
            }
            _ => return false,
        }
        true
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        frame.render_widget(Clear, area);
        let block = Block::default()
            .title(self.title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Magenta));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let mut lines = Vec::new();
        for (i, field) in self.fields.iter().enumerate() {
            let label_style = if i == self.focus {
                Style::default().fg(Color::Cyan).bold()
            } else {
                Style::default()
            };
            let cursor = if i == self.focus { "_" } else { "" };
            lines.push(Line::from(vec![
                Span::styled(format!("{}: ", field.label), label_style),
                Span::raw(field.display_value()),
                Span::styled(cursor, Style::default().fg(Color::Cyan)),
            ]));
            lines.push(Line::from(""));
        }
        if let Some(error) = &self.error {
            lines.push(Line::from(Span::styled(
                error.as_str(),
                Style::default().fg(Color::Red),
            )));
        }
        if let Some(hint) = self.hint {
            lines.push(Line::from(Span::styled(
                hint,
                Style::default().fg(Color::DarkGray),
            )));
        }
        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_str(form: &mut Form, s: &str) {
        for c in s.chars() {
            form.handle_key(key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn typing_goes_to_focused_field() {
        let mut form = Form::login();
        type_str(&mut form, "ada@example.com");
        form.handle_key(key(KeyCode::Tab));
        type_str(&mut form, "secret!");
        form.handle_key(key(KeyCode::Backspace));
        assert_eq!(form.value(0), "ada@example.com");
        assert_eq!(form.value(1), "secret");
    }

    #[test]
    fn focus_wraps_both_ways() {
        let mut form = Form::new_task();
        form.handle_key(key(KeyCode::BackTab));
        assert_eq!(form.focus(), 2);
        form.handle_key(key(KeyCode::Tab));
        assert_eq!(form.focus(), 0);
    }

    #[test]
    fn control_chords_are_not_typed() {
        let mut form = Form::login();
        let consumed = form.handle_key(KeyEvent::new(KeyCode::Char('r'), KeyModifiers::CONTROL));
        assert!(!consumed);
        assert_eq!(form.value(0), "");
        assert!(!form.handle_key(key(KeyCode::Enter)));
    }

    #[test]
    fn secrets_are_masked() {
        let mut field = FormField::secret("Password");
        field.value = "hunter22".into();
        assert_eq!(field.display_value(), "********");
        assert_eq!(Form::login().value(5), "");
    }
}
