//! Domain types and pure logic for the Stockroom inventory service.
//!
//! Nothing in this crate touches the database or HTTP; the `db` and `api`
//! crates build on top of it.

pub mod error;
pub mod inventory;
pub mod types;
