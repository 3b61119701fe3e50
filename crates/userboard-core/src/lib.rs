//! Core types for the userboard dashboard: the user record model, the
//! in-memory record store with its load state, and the derived views computed
//! from it on every render.
//!
//! This crate is deliberately free of HTTP and terminal dependencies. The
//! data source is abstracted behind [`source::UserSource`].

pub mod error;
pub mod expansion;
pub mod source;
pub mod store;
pub mod user;
pub mod view;

pub use error::{Error, Result};
