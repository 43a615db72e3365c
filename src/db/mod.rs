pub mod admindb;
pub mod customerdb;
pub mod db;
pub mod notificationdb;
pub mod ticketdb;
