//! Unit tests for startup configuration.
//!
//! - `helpers`: shared layer composition
//! - `precedence`: layer precedence
//! - `loading`: loading from real environment variables and CLI flags
//! - `validation`: rejection of unusable values

mod helpers;
