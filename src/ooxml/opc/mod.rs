/// Open Packaging Conventions (OPC) read support.
///
/// This module covers the parts of the OPC specification a reader needs:
///
/// - Part names (`PackURI`) and relative reference resolution
/// - Relationship parts (`_rels/*.rels`)
/// - ZIP-based physical packaging behind the `PartReader` seam
pub mod constants;
pub mod packuri;
pub mod phys_pkg;
pub mod rel;

// Re-export commonly used types
pub use packuri::PackURI;
pub use phys_pkg::{MemoryPackage, PartReader, ZipPackage};
pub use rel::{Relationship, Relationships};
