//! `superlists` - A minimal to-do list web application
//!
//! One page takes a new item through a form, stores it in `SQLite`, and
//! redirects to a page listing every saved item.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod error;
pub mod item;
pub mod logging;
pub mod storage;
pub mod web;

pub use config::Config;
pub use error::{Error, Result};
pub use item::Item;
pub use logging::init_logging;
pub use storage::Storage;
pub use web::{router, AppState};
