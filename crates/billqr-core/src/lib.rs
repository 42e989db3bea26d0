//! Pure bill-splitting core: argument parsing, amount and content
//! normalization, markup escaping, bank directory and QR URL building.
//!
//! Nothing here talks to a chat platform. The only I/O is reading the bank
//! directory and dotenv files from disk.

pub mod amount;
pub mod bank_directory;
pub mod command;
pub mod content;
pub mod env_file;
pub mod error;
pub mod markup;
pub mod qr;

pub use error::BillError;
