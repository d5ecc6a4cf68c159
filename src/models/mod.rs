pub mod page_view;
pub mod role;
pub mod view_stats;
