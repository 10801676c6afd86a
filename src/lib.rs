//! Taskdeck library - Terminal kanban client for a shared task server
//!
//! The TUI is the primary surface; the `cli` module covers scripting use.

pub mod api;
pub mod auth;
pub mod board;
pub mod cli;
pub mod config;
pub mod task;
pub mod tui;
