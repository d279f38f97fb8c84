pub mod build;
pub mod project;
