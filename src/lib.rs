pub mod auth;
pub mod drive;
pub mod error;
pub mod ops;
pub mod output;
pub mod walk;

pub use error::{Error, Result};
