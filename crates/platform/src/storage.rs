//! Removable-storage abstraction
//!
//! The control core never reads file contents; it only needs to know whether
//! the medium is present and whether a given track path exists. Directory
//! enumeration is provided for diagnostics output and feeds nothing back
//! into control decisions.

/// Storage trait for path queries against the removable medium.
pub trait Storage {
    /// Error type
    type Error: core::fmt::Debug;

    /// Whether the medium is mounted and answering queries.
    fn ready(&mut self) -> bool;

    /// Check if `path` exists on the medium.
    fn exists(&mut self, path: &str) -> Result<bool, Self::Error>;

    /// Enumerate root entries into `visit`, for diagnostics only.
    ///
    /// The default implementation reports nothing; media without cheap
    /// listing support may leave it that way.
    fn list_root(&mut self, visit: &mut dyn FnMut(&str)) {
        let _ = visit;
    }
}
