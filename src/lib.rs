//! `crossconf` - multi-file JSON configuration loading and validation
//!
//! A directory of JSON files is loaded into typed config models, each file
//! checked against its own schema, and then validators that span several
//! configs are run against whatever loaded successfully. Every failure is
//! collected as a structured [`error::ValidationError`] rather than
//! stopping the batch.
//!
//! ```no_run
//! use crossconf::catalog::Catalog;
//!
//! let catalog = Catalog::builtin()?;
//! let (configs, mut errors) = catalog.loader("configs").load().unpack();
//! errors.extend(catalog.runner().run(&configs));
//! for error in &errors {
//!     println!("{error}");
//! }
//! # Ok::<(), crossconf::error::ValidationError>(())
//! ```

pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod observability;
pub mod validation;
