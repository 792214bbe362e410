//! hexed - terminal hex editor with vi-style navigation
//!
//! The editing core (`app`, `buffer`) is independent of the terminal;
//! `ui` draws a [`app::render::RenderModel`] with ratatui.

pub mod app;
pub mod buffer;
pub mod config;
pub mod ui;

pub use app::Editor;
