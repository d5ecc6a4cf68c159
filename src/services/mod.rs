pub mod view_tracker;
