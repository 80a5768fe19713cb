/// Constant values related to the Open Packaging Convention.
///
/// Relationship types and well-known part names used to locate the parts of
/// a spreadsheet package.

/// Relationship type URIs
pub mod relationship_type {
    pub const OFFICE_DOCUMENT: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
    /// Strict OOXML variant of [`OFFICE_DOCUMENT`]
    pub const OFFICE_DOCUMENT_STRICT: &str =
        "http://purl.oclc.org/ooxml/officeDocument/relationships/officeDocument";
    pub const WORKSHEET: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet";
    pub const STYLES: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles";
    pub const SHARED_STRINGS: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/sharedStrings";
}

/// Target mode of a relationship
pub mod target_mode {
    pub const EXTERNAL: &str = "External";
}

/// Conventional part names, used when a package omits the relationship that
/// would otherwise locate the part.
pub mod default_part {
    pub const WORKBOOK: &str = "/xl/workbook.xml";
    pub const STYLES: &str = "/xl/styles.xml";
    pub const SHARED_STRINGS: &str = "/xl/sharedStrings.xml";
}
