pub mod config;
pub mod objects;
pub mod template;
