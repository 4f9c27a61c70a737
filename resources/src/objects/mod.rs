pub mod app;
pub mod labels;
