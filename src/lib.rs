//! Cozy Reads application library
//!
//! Feature modules (books, ui) and the wiring that turns them into a service.

pub mod app;
pub mod modules;

pub use app::Application;
