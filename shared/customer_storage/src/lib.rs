//! Customer storage for the document database
//!
//! This crate provides the customer repository together with the two collaborators it is
//! wired from: the connection configuration loader and the container factory.

#![deny(clippy::all, missing_docs)]

pub mod config;
pub mod container;
pub mod customer;

mod error;

pub use error::{is_not_found, StorageError, StorageResult};
