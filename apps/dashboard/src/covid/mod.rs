pub mod aggregate;
pub mod client;
pub mod history;
