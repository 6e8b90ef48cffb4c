pub mod cli;
pub mod config;
pub mod domain;
pub mod editor;
pub mod error;
pub mod steps;
pub mod ui;
pub mod warning;

pub use error::{ReleaseError, Result};
