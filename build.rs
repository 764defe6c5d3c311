//! Rebuilds the crate when the embedded settings migrations change.
//!
//! `embed_migrations!` reads `migrations/` at compile time, which Cargo does
//! not track on its own.

const MIGRATIONS_DIR: &str = "migrations";

fn main() {
    println!("cargo:rerun-if-changed={MIGRATIONS_DIR}");
}
