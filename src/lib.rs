//! taskdesk: a local task-list engine.
//!
//! Three layers: an embedded SQLite store for lists, tasks and categories
//! ([`db::Store`]), change notification with live re-query delivery
//! ([`watch`]), and a pure derivation engine ([`views`]) plus time formatting
//! ([`timefmt`]) that turn a store snapshot into display-ready views. The
//! presentation layer is external; it issues CRUD calls, subscribes to
//! changes, and renders whatever the engine derives.

pub mod colors;
pub mod db;
pub mod errors;
pub mod greeting;
pub mod models;
pub mod timefmt;
pub mod views;
pub mod watch;

pub use db::Store;
pub use errors::{AppError, AppResult};
