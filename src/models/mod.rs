pub mod adminmodel;
pub mod customermodel;
pub mod ticketmodel;
