pub mod coaching;
pub mod meeting;
