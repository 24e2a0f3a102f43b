pub mod collection;
pub mod form;
pub mod progress_bar;
pub mod project_list;
pub mod task_list;
