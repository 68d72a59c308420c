#![deny(unsafe_code)]

//! Desktop host for the floating chat launcher.

/// Root view: launcher, chat panel and the request pipeline.
pub mod app;
pub mod chat;
/// gpui mouse events mapped onto widget pointer events.
pub mod pointer;
/// Settings loading and persistence.
pub mod settings;
pub mod viewport;
