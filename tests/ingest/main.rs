//! Ingestion test suite.
//!
//! Drives the decode, aggregate and save pipeline and the publish HTTP
//! endpoint against an in-memory storage backend. The `test_postgres` module
//! saves through a real database when `DATABASE_URL` or the `DB_*` variables
//! are set.
//!
//! Run with: cargo test --test ingest

mod test_helpers;

mod test_collect_file;
mod test_pipeline;
mod test_postgres;
