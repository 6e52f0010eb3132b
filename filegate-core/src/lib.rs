//! filegate-core: a secure, bounded file-access gate.
//!
//! Decides, for every path a caller wants to read, whether the read is safe,
//! bounded, and policy-compliant before any byte of content is returned:
//! traversal detection, sensitive-file matching, allow-list containment,
//! symlink rejection, and size/count ceilings. Upstream tooling consumes
//! this crate solely through [`FileContent`] and the typed error families.

pub mod file;
pub mod registry;
pub mod security;

// Public library API - consumers should only need these types.
pub use file::manager::FileGate;
pub use file::types::{
    BatchResult, DirectoryOptions, FileContent, LoadError, ReadDiagnostic, ReadError,
};
pub use security::types::{SecurityConfig, SecurityError};
pub use security::validator::PathValidator;
