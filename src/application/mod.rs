pub mod cli;
pub mod commands;
pub mod ui;
pub mod views;
