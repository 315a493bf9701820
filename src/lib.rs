pub mod api;
pub mod config;
pub mod db;
pub mod domain;
pub mod error;

pub use config::Config;
pub use db::{init_db, Repository, StoreError};
pub use domain::{ElectionStatus, ElectionType, Scope};
pub use error::AppError;
