/// Relationship-related objects for OPC packages.
///
/// A `.rels` part maps relationship IDs of one source part to their targets.
/// The spreadsheet reader uses it to find the workbook manifest, its styles
/// and shared strings, and the worksheet behind every sheet entry.
use quick_xml::Reader;
use quick_xml::events::Event;
use smallvec::SmallVec;

use crate::common::error::Result;
use crate::ooxml::opc::constants::target_mode;
use crate::ooxml::opc::packuri::PackURI;

/// A single relationship from a source part to a target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    /// Relationship ID (e.g., "rId1", "rId2")
    r_id: String,

    /// Relationship type URI
    reltype: String,

    /// Target reference - either a part URI or external URL
    target_ref: String,

    /// Whether this is an external relationship
    is_external: bool,
}

impl Relationship {
    /// Create a new relationship.
    pub fn new(r_id: String, reltype: String, target_ref: String, is_external: bool) -> Self {
        Self {
            r_id,
            reltype,
            target_ref,
            is_external,
        }
    }

    /// Get the relationship ID.
    #[inline]
    pub fn r_id(&self) -> &str {
        &self.r_id
    }

    /// Get the relationship type.
    #[inline]
    pub fn reltype(&self) -> &str {
        &self.reltype
    }

    /// Get the target reference as written in the `.rels` part.
    #[inline]
    pub fn target_ref(&self) -> &str {
        &self.target_ref
    }

    /// Check if this is an external relationship.
    #[inline]
    pub fn is_external(&self) -> bool {
        self.is_external
    }
}

/// Collection of relationships from a single source part.
///
/// Kept in document order; packages rarely carry more than a handful of
/// relationships per source, so lookups are linear scans.
#[derive(Debug, Clone)]
pub struct Relationships {
    /// Base URI for resolving relative references
    base_uri: String,

    /// Relationships in document order
    rels: SmallVec<[Relationship; 8]>,
}

impl Relationships {
    /// Create a new empty relationships collection.
    pub fn new(base_uri: impl Into<String>) -> Self {
        Self {
            base_uri: base_uri.into(),
            rels: SmallVec::new(),
        }
    }

    /// Parse a `.rels` part belonging to the source part `source`.
    pub fn parse(xml: &[u8], source: &PackURI) -> Result<Self> {
        let mut rels = Self::new(source.base_uri());
        let mut reader = Reader::from_reader(xml);
        reader.config_mut().trim_text(true);

        let mut buf = Vec::with_capacity(256);

        loop {
            buf.clear();
            match reader.read_event_into(&mut buf)? {
                Event::Empty(ref e) | Event::Start(ref e)
                    if e.local_name().as_ref() == b"Relationship" =>
                {
                    let mut r_id = None;
                    let mut reltype = None;
                    let mut target_ref = None;
                    let mut is_external = false;

                    for attr in e.attributes() {
                        let attr = attr?;
                        let value = attr.decode_and_unescape_value(reader.decoder())?;
                        match attr.key.local_name().as_ref() {
                            b"Id" => r_id = Some(value.into_owned()),
                            b"Type" => reltype = Some(value.into_owned()),
                            b"Target" => target_ref = Some(value.into_owned()),
                            b"TargetMode" => is_external = value == target_mode::EXTERNAL,
                            _ => {},
                        }
                    }

                    if let (Some(r_id), Some(reltype), Some(target_ref)) = (r_id, reltype, target_ref)
                    {
                        rels.add_relationship(reltype, target_ref, r_id, is_external);
                    }
                },
                Event::Eof => break,
                _ => {},
            }
        }

        Ok(rels)
    }

    /// Add a relationship to the collection.
    pub fn add_relationship(
        &mut self,
        reltype: String,
        target_ref: String,
        r_id: String,
        is_external: bool,
    ) {
        self.rels
            .push(Relationship::new(r_id, reltype, target_ref, is_external));
    }

    /// Get a relationship by its ID.
    pub fn get(&self, r_id: &str) -> Option<&Relationship> {
        self.rels.iter().find(|rel| rel.r_id() == r_id)
    }

    /// Get the first internal relationship of the given type.
    pub fn by_type(&self, reltype: &str) -> Option<&Relationship> {
        self.rels
            .iter()
            .find(|rel| rel.reltype() == reltype && !rel.is_external())
    }

    /// Resolve an internal relationship's target to an absolute part name.
    pub fn target_partname(&self, rel: &Relationship) -> Result<PackURI> {
        PackURI::from_rel_ref(&self.base_uri, rel.target_ref())
    }

    /// Get an iterator over all relationships.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Relationship> {
        self.rels.iter()
    }

    /// Get the number of relationships in the collection.
    #[inline]
    pub fn len(&self) -> usize {
        self.rels.len()
    }

    /// Check if the collection is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rels.is_empty()
    }
}
