pub mod button;
pub mod commands;
