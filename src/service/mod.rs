pub mod chat;
pub mod error;
pub mod lifecycle;
pub mod transition;
