use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::Rect;
use taskdeck_core::view::{self, ListFilter, ListQuery, Searchable, SortKey};

/// Widest a grid gets, in cards.
pub const MAX_GRID_COLUMNS: usize = 3;
const MIN_CARD_WIDTH: u16 = 28;

/// Items fetched for a screen plus the client-side query over them.
///
/// `visible` is recomputed from `items` whenever either side changes; the
/// source list keeps backend order.
#[derive(Debug, Clone)]
pub struct Collection<T, F, K> {
    items: Vec<T>,
    visible: Vec<T>,
    query: ListQuery<F, K>,
    selected: Option<usize>,
}

impl<T, F, K> Default for Collection<T, F, K>
where
    F: Default,
{
    fn default() -> Self {
        Self {
            items: Vec::new(),
            visible: Vec::new(),
            query: ListQuery::default(),
            selected: None,
        }
    }
}

impl<T, F, K> Collection<T, F, K>
where
    T: Searchable + Clone,
    F: ListFilter<T> + Default,
    K: SortKey<T>,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the source items, keeping the query.
    pub fn set_items(&mut self, items: Vec<T>) {
        self.items = items;
        self.refresh();
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn visible(&self) -> &[T] {
        &self.visible
    }

    pub fn query(&self) -> &ListQuery<F, K> {
        &self.query
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected(&self) -> Option<&T> {
        self.visible.get(self.selected?)
    }

    /// Select the first visible item matching `pred`, if any.
    pub fn select_where(&mut self, pred: impl Fn(&T) -> bool) -> bool {
        match self.visible.iter().position(pred) {
            Some(idx) => {
                self.selected = Some(idx);
                true
            }
            None => false,
        }
    }

    pub fn set_search(&mut self, search: &str) {
        self.query.search = search.to_string();
        self.refresh();
    }

    pub fn set_filter(&mut self, filter: F) {
        self.query.filter = filter;
        self.refresh();
    }

    pub fn cycle_sort(&mut self) {
        self.query.cycle_sort::<T>();
        self.refresh();
    }

    pub fn flip_direction(&mut self) {
        self.query.flip_direction();
        self.refresh();
    }

    pub fn toggle_view_mode(&mut self) {
        self.query.toggle_view_mode();
    }

    fn refresh(&mut self) {
        self.visible = view::apply(&self.items, &self.query);
        self.selected = match (self.visible.len(), self.selected) {
            (0, _) => None,
            (len, Some(idx)) => Some(idx.min(len - 1)),
            (_, None) => Some(0),
        };
    }

    /// Cursor movement. `columns` is the grid width (1 in list mode), so
    /// h/l move within a row and j/k move by whole rows.
    pub fn handle_key(&mut self, key: KeyEvent, columns: usize) {
        let len = self.visible.len();
        let Some(current) = self.selected else {
            return;
        };
        let columns = columns.max(1);
        let next = match key.code {
            KeyCode::Char('j') | KeyCode::Down => current + columns,
            KeyCode::Char('k') | KeyCode::Up => current.saturating_sub(columns),
            KeyCode::Char('l') | KeyCode::Right if columns > 1 => current + 1,
            KeyCode::Char('h') | KeyCode::Left if columns > 1 => current.saturating_sub(1),
            KeyCode::Char('g') | KeyCode::Home => 0,
            KeyCode::Char('G') | KeyCode::End => len - 1,
            _ => return,
        };
        if next < len {
            self.selected = Some(next);
        }
    }
}

/// Number of grid columns that fit in `width`.
pub fn grid_columns(width: u16) -> usize {
    ((width / MIN_CARD_WIDTH) as usize).clamp(1, MAX_GRID_COLUMNS)
}

/// Lay `count` cards of `card_height` rows out in `area`, scrolled so the
/// row holding `selected` is on screen. Returns `(item index, cell)` pairs.
pub fn grid_cells(
    area: Rect,
    count: usize,
    columns: usize,
    card_height: u16,
    selected: Option<usize>,
) -> Vec<(usize, Rect)> {
    let columns = columns.max(1);
    if count == 0 || area.height < card_height || area.width == 0 {
        return Vec::new();
    }
    let rows_on_screen = (area.height / card_height).max(1) as usize;
    let selected_row = selected.unwrap_or(0) / columns;
    let first_row = selected_row.saturating_sub(rows_on_screen - 1);
    let cell_width = area.width / columns as u16;

    let mut cells = Vec::new();
    for row in 0..rows_on_screen {
        for col in 0..columns {
            let idx = (first_row + row) * columns + col;
            if idx >= count {
                return cells;
            }
            let width = if col + 1 == columns {
                area.width - cell_width * col as u16
            } else {
                cell_width
            };
            cells.push((
                idx,
                Rect {
                    x: area.x + cell_width * col as u16,
                    y: area.y + card_height * row as u16,
                    width,
                    height: card_height,
                },
            ));
        }
    }
    cells
}
