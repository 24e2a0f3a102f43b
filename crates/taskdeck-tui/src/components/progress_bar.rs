use ratatui::prelude::*;
use ratatui::widgets::Gauge;
use taskdeck_core::Progress;

/// One-line gauge: clamped percentage on the bar, "c / t tasks" beside it.
pub struct ProgressBar {
    progress: Progress,
    show_label: bool,
}

impl ProgressBar {
    pub fn new(progress: Progress) -> Self {
        Self {
            progress,
            show_label: true,
        }
    }

    pub fn show_label(mut self, show: bool) -> Self {
        self.show_label = show;
        self
    }
}

pub fn progress_color(progress: &Progress) -> Color {
    match progress.percent() {
        100 => Color::Green,
        50..=99 => Color::Cyan,
        1..=49 => Color::Yellow,
        _ => Color::DarkGray,
    }
}

impl Widget for ProgressBar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }
        let label = self.progress.label();
        let label_width = if self.show_label {
            (label.chars().count() as u16 + 1).min(area.width / 2)
        } else {
            0
        };
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(label_width)])
            .split(area);

        Gauge::default()
            .gauge_style(Style::default().fg(progress_color(&self.progress)))
            .ratio(self.progress.ratio())
            .label(self.progress.percent_label())
            .render(chunks[0], buf);

        if self.show_label {
            Line::from(format!(" {label}"))
                .style(Style::default().fg(Color::Gray))
                .render(chunks[1], buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(progress: Progress, width: u16) -> String {
        let area = Rect::new(0, 0, width, 1);
        let mut buf = Buffer::empty(area);
        ProgressBar::new(progress).render(area, &mut buf);
        (0..width)
            .map(|x| buf[(x, 0)].symbol().to_string())
            .collect()
    }

    #[test]
    fn shows_rounded_percent_and_counts() {
        let text = rendered(Progress::new(57.4, 4, 7), 40);
        assert!(text.contains("57%"), "{text}");
        assert!(text.contains("4 / 7 tasks"), "{text}");
    }

    #[test]
    fn out_of_range_is_clamped() {
        assert!(rendered(Progress::new(150.0, 5, 5), 40).contains("100%"));
        assert!(rendered(Progress::new(-5.0, 0, 5), 40).contains("0%"));
    }

    #[test]
    fn colors_by_band() {
        assert_eq!(progress_color(&Progress::new(0.0, 0, 0)), Color::DarkGray);
        assert_eq!(progress_color(&Progress::new(20.0, 1, 5)), Color::Yellow);
        assert_eq!(progress_color(&Progress::new(60.0, 3, 5)), Color::Cyan);
        assert_eq!(progress_color(&Progress::new(100.0, 5, 5)), Color::Green);
    }

    #[test]
    fn zero_sized_area_is_a_no_op() {
        let area = Rect::new(0, 0, 0, 0);
        let mut buf = Buffer::empty(area);
        ProgressBar::new(Progress::new(50.0, 1, 2)).render(area, &mut buf);
    }
}
