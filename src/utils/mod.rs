pub mod client_ip;
pub mod hash_ip;
pub mod jwt;
pub mod view_date;
