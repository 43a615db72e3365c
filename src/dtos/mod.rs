pub mod authdtos;
pub mod chatdtos;
pub mod ticketdtos;
