pub mod barcode;
pub mod command;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod process;
