//! The file module is the loading pipeline built on top of the security gate.
//!
//! ## Architecture
//!
//! ### loader.rs
//! Loads a single path end to end: validate, reject binary extensions before
//! any I/O, stat, enforce the per-file size ceiling from the stat result,
//! read as UTF-8, detect language, and produce a `FileContent`.
//!
//! ### scanner.rs
//! Enumerates a directory tree under include/exclude glob filters. Hidden
//! entries and symlinks are never traversed, registry defaults are merged
//! with caller excludes, and the file-count ceiling is enforced before any
//! content is read.
//!
//! ### batch.rs
//! Fans a list of paths out to the loader with bounded concurrency and
//! per-item failure isolation: a bad file becomes a diagnostic, never an
//! error for the whole batch.
//!
//! ### manager.rs
//! `FileGate` ties everything together and offers the high-level APIs:
//! read_file, read_files, read_directory. All consumers go through it.

pub mod batch;
pub mod loader;
pub mod manager;
pub mod scanner;
pub mod types;
