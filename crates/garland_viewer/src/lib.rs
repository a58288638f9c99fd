pub mod cli;
pub mod plugin;
pub mod ui;
pub mod viewport;
