//! Semillero - research-group management core
//!
//! Role-based authorization, the selected-semillero session context and a
//! pluggable entity store for projects, resources, communication and
//! outreach records. All modules are public for the CLI and tests.

pub mod authz;
pub mod content;
pub mod credentials;
pub mod directory;
pub mod entities;
pub mod errors;
pub mod model;
pub mod reports;
pub mod seed;
pub mod session;
pub mod settings;
pub mod storage;
