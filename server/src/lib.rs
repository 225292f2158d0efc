pub mod api;
pub mod cache;
pub mod svg;
pub mod types;
