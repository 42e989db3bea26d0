pub mod bill;
pub mod channels;
pub mod config;
pub mod delivery;
pub mod error;
pub mod logging;
pub mod slash_commands;
