// Library surface shared by the server binary and the converter CLI
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod presentation;
