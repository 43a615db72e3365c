pub mod admin;
pub mod auth;
pub mod chatbot;
pub mod customer;
pub mod tickets;
