pub mod admin_request;
pub mod view_request;
