//! Client-side search, filter and sort over fetched collections.
//!
//! Everything here is a pure function of the cached list and the current
//! [`ListQuery`]. The source slice is never reordered; callers get a fresh
//! `Vec` each time.

use std::cmp::Ordering;

/// Something that can be matched by the search box.
pub trait Searchable {
    fn title(&self) -> &str;
    fn description(&self) -> Option<&str>;
}

/// A status/progress bucket the list can be narrowed to.
pub trait ListFilter<T> {
    fn matches(&self, item: &T) -> bool;
}

/// A sort key for items of type `T`.
pub trait SortKey<T>: Copy + PartialEq + 'static {
    /// Ascending comparison.
    fn cmp(&self, a: &T, b: &T) -> Ordering;

    /// Comparison with direction applied. Override when some ordering rule
    /// must hold regardless of direction.
    fn compare(&self, a: &T, b: &T, direction: SortDirection) -> Ordering {
        direction.apply(self.cmp(a, b))
    }

    /// Every key, in the order the UI cycles through them.
    fn all() -> &'static [Self];
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn apply(&self, ord: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    }

    pub fn flipped(&self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "asc",
            SortDirection::Descending => "desc",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ViewMode {
    #[default]
    Grid,
    List,
}

impl ViewMode {
    pub fn toggled(&self) -> Self {
        match self {
            ViewMode::Grid => ViewMode::List,
            ViewMode::List => ViewMode::Grid,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ViewMode::Grid => "Grid",
            ViewMode::List => "List",
        }
    }
}

/// UI state that shapes how a fetched collection is displayed.
#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery<F, K> {
    pub search: String,
    pub filter: F,
    /// `None` keeps the order the backend returned.
    pub sort: Option<K>,
    pub direction: SortDirection,
    pub view_mode: ViewMode,
}

impl<F: Default, K> Default for ListQuery<F, K> {
    fn default() -> Self {
        Self {
            search: String::new(),
            filter: F::default(),
            sort: None,
            direction: SortDirection::default(),
            view_mode: ViewMode::default(),
        }
    }
}

impl<F, K> ListQuery<F, K> {
    /// Advance the sort key: unsorted, then each key in turn, then unsorted.
    pub fn cycle_sort<T>(&mut self)
    where
        K: SortKey<T>,
    {
        let keys = <K as SortKey<T>>::all();
        self.sort = match self.sort {
            None => keys.first().copied(),
            Some(current) => {
                let idx = keys.iter().position(|k| *k == current);
                idx.and_then(|i| keys.get(i + 1)).copied()
            }
        };
    }

    pub fn flip_direction(&mut self) {
        self.direction = self.direction.flipped();
    }

    pub fn toggle_view_mode(&mut self) {
        self.view_mode = self.view_mode.toggled();
    }
}

/// Case-insensitive substring match against title and description.
/// A blank query matches everything.
pub fn matches_search<T: Searchable>(item: &T, query: &str) -> bool {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    item.title().to_lowercase().contains(&needle)
        || item
            .description()
            .is_some_and(|d| d.to_lowercase().contains(&needle))
}

/// Produce the displayed sequence for `items` under `query`.
pub fn apply<T, F, K>(items: &[T], query: &ListQuery<F, K>) -> Vec<T>
where
    T: Searchable + Clone,
    F: ListFilter<T>,
    K: SortKey<T>,
{
    let mut out: Vec<T> = items
        .iter()
        .filter(|item| matches_search(*item, &query.search))
        .filter(|item| query.filter.matches(item))
        .cloned()
        .collect();
    if let Some(key) = query.sort {
        out.sort_by(|a, b| key.compare(a, b, query.direction));
    }
    out
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveDateTime};

    use super::*;
    use crate::project::{Project, ProjectFilter, ProjectSortKey};
    use crate::task::{Task, TaskFilter, TaskSortKey, TaskStatus};

    type TaskQuery = ListQuery<TaskFilter, TaskSortKey>;
    type ProjectQuery = ListQuery<ProjectFilter, ProjectSortKey>;

    fn created(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, day)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
    }

    fn task(id: i64, title: &str, due: Option<(i32, u32, u32)>, status: TaskStatus) -> Task {
        Task {
            id,
            title: title.into(),
            description: None,
            due_date: due.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d)),
            status,
            created_at: created(id as u32),
        }
    }

    fn sample_tasks() -> Vec<Task> {
        vec![
            task(3, "deploy", None, TaskStatus::Pending),
            task(1, "Build", Some((2024, 5, 1)), TaskStatus::Completed),
            task(4, "alpha", Some((2024, 3, 1)), TaskStatus::Pending),
            task(2, "Zeta", None, TaskStatus::Completed),
            task(5, "review", Some((2024, 4, 1)), TaskStatus::Pending),
        ]
    }

    fn ids(tasks: &[Task]) -> Vec<i64> {
        tasks.iter().map(|t| t.id).collect()
    }

    #[test]
    fn empty_query_keeps_order() {
        let tasks = sample_tasks();
        let out = apply(&tasks, &TaskQuery::default());
        assert_eq!(out, tasks);
    }

    #[test]
    fn search_is_case_insensitive_on_title_and_description() {
        let mut tasks = sample_tasks();
        tasks[0].description = Some("Push to PRODUCTION".into());
        let q = TaskQuery {
            search: "production".into(),
            ..Default::default()
        };
        assert_eq!(ids(&apply(&tasks, &q)), vec![3]);

        let q = TaskQuery {
            search: "  BUILD ".into(),
            ..Default::default()
        };
        assert_eq!(ids(&apply(&tasks, &q)), vec![1]);
    }

    #[test]
    fn search_without_match_is_empty() {
        let q = TaskQuery {
            search: "nothing-here".into(),
            ..Default::default()
        };
        assert!(apply(&sample_tasks(), &q).is_empty());
    }

    #[test]
    fn filter_partitions_tasks() {
        let tasks = sample_tasks();
        let pending = apply(
            &tasks,
            &TaskQuery {
                filter: TaskFilter::Pending,
                ..Default::default()
            },
        );
        let completed = apply(
            &tasks,
            &TaskQuery {
                filter: TaskFilter::Completed,
                ..Default::default()
            },
        );
        assert_eq!(ids(&pending), vec![3, 4, 5]);
        assert_eq!(ids(&completed), vec![1, 2]);
        assert_eq!(pending.len() + completed.len(), tasks.len());
    }

    #[test]
    fn title_sort_is_lexicographic() {
        let q = TaskQuery {
            sort: Some(TaskSortKey::Title),
            ..Default::default()
        };
        // Uppercase sorts before lowercase in a plain byte compare.
        assert_eq!(ids(&apply(&sample_tasks(), &q)), vec![1, 2, 4, 3, 5]);
    }

    #[test]
    fn due_date_sort_puts_undated_last_in_both_directions() {
        let tasks = sample_tasks();
        let mut q = TaskQuery {
            sort: Some(TaskSortKey::DueDate),
            ..Default::default()
        };
        let asc = apply(&tasks, &q);
        assert_eq!(ids(&asc), vec![4, 5, 1, 3, 2]);

        q.direction = SortDirection::Descending;
        let desc = apply(&tasks, &q);
        assert_eq!(ids(&desc), vec![1, 5, 4, 3, 2]);

        for out in [asc, desc] {
            let first_undated = out.iter().position(|t| t.due_date.is_none()).unwrap();
            assert!(out[first_undated..].iter().all(|t| t.due_date.is_none()));
        }
    }

    #[test]
    fn created_and_status_sorts() {
        let tasks = sample_tasks();
        let q = TaskQuery {
            sort: Some(TaskSortKey::CreatedAt),
            direction: SortDirection::Descending,
            ..Default::default()
        };
        assert_eq!(ids(&apply(&tasks, &q)), vec![5, 4, 3, 2, 1]);

        let q = TaskQuery {
            sort: Some(TaskSortKey::Status),
            ..Default::default()
        };
        // COMPLETED < PENDING; stable within a group.
        assert_eq!(ids(&apply(&tasks, &q)), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn apply_is_idempotent_and_leaves_source_alone() {
        let tasks = sample_tasks();
        let snapshot = tasks.clone();
        let q = TaskQuery {
            search: "e".into(),
            filter: TaskFilter::Pending,
            sort: Some(TaskSortKey::Title),
            direction: SortDirection::Descending,
            view_mode: ViewMode::List,
        };
        let once = apply(&tasks, &q);
        let twice = apply(&once, &q);
        assert_eq!(once, twice);
        assert_eq!(tasks, snapshot);
    }

    fn project(id: i64, title: &str, total: u32, pct: f64) -> Project {
        Project {
            id,
            title: title.into(),
            description: Some(format!("{title} description")),
            created_at: None,
            total_tasks: total,
            completed_tasks: (total as f64 * pct / 100.0) as u32,
            progress_percentage: pct,
        }
    }

    fn sample_projects() -> Vec<Project> {
        vec![
            project(1, "Mobile", 4, 50.0),
            project(2, "Backend", 0, 0.0),
            project(3, "Docs", 2, 100.0),
            project(4, "Apps", 10, 10.0),
        ]
    }

    #[test]
    fn project_filters() {
        let projects = sample_projects();
        let by = |filter| {
            ids_p(&apply(
                &projects,
                &ProjectQuery {
                    filter,
                    ..Default::default()
                },
            ))
        };
        assert_eq!(by(ProjectFilter::All), vec![1, 2, 3, 4]);
        assert_eq!(by(ProjectFilter::NotStarted), vec![2]);
        assert_eq!(by(ProjectFilter::InProgress), vec![1, 4]);
        assert_eq!(by(ProjectFilter::Completed), vec![3]);
    }

    fn ids_p(projects: &[Project]) -> Vec<i64> {
        projects.iter().map(|p| p.id).collect()
    }

    #[test]
    fn project_sorts() {
        let projects = sample_projects();
        let sorted = |key, direction| {
            ids_p(&apply(
                &projects,
                &ProjectQuery {
                    sort: Some(key),
                    direction,
                    ..Default::default()
                },
            ))
        };
        assert_eq!(
            sorted(ProjectSortKey::Title, SortDirection::Ascending),
            vec![4, 2, 3, 1]
        );
        assert_eq!(
            sorted(ProjectSortKey::Progress, SortDirection::Descending),
            vec![3, 1, 4, 2]
        );
        assert_eq!(
            sorted(ProjectSortKey::TaskCount, SortDirection::Ascending),
            vec![2, 3, 1, 4]
        );
    }

    #[test]
    fn project_search_matches_description() {
        let q = ProjectQuery {
            search: "DOCS DESC".into(),
            ..Default::default()
        };
        assert_eq!(ids_p(&apply(&sample_projects(), &q)), vec![3]);
    }

    #[test]
    fn sort_cycle_returns_to_unsorted() {
        let mut q = TaskQuery::default();
        let mut seen = Vec::new();
        for _ in 0..=TaskSortKey::ALL.len() {
            q.cycle_sort::<Task>();
            seen.push(q.sort);
        }
        assert_eq!(
            seen,
            vec![
                Some(TaskSortKey::Title),
                Some(TaskSortKey::DueDate),
                Some(TaskSortKey::CreatedAt),
                Some(TaskSortKey::Status),
                None,
            ]
        );
    }

    #[test]
    fn direction_and_view_mode_toggle() {
        let mut q = ProjectQuery::default();
        q.flip_direction();
        assert_eq!(q.direction, SortDirection::Descending);
        q.flip_direction();
        assert_eq!(q.direction, SortDirection::Ascending);
        q.toggle_view_mode();
        assert_eq!(q.view_mode, ViewMode::List);
        q.toggle_view_mode();
        assert_eq!(q.view_mode, ViewMode::Grid);
    }
}
