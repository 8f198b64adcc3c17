//! Turns package parts (raw XML bytes) into the typed document model,
//! `spec.md` §6's "external XML contract" consumer side.
//!
//! Grounded on `docx-core/src/reader/from_xml_quick.rs` (the only reader
//! trait definition the retrieved pack kept — `reader/mod.rs` itself and the
//! plain `FromXML` trait it declares were filtered out, so `FromXML` below
//! is reconstructed from its call sites in `reader/rels.rs`/`reader/styles.rs`
//! etc: every part reader implements both `FromXML` (byte-slice entry point)
//! and `FromXMLQuickXml` (the quick-xml-backed implementation `FromXML`
//! delegates to).

use std::io::Read;

pub use crate::error::ReaderError;

pub mod rels;

/// Parses a single package part from a byte stream.
pub trait FromXML {
    fn from_xml<R: Read>(reader: R) -> Result<Self, ReaderError>
    where
        Self: Sized;
}

/// The quick-xml-backed implementation every `FromXML` impl in this crate
/// delegates to; kept as a separate trait so a type can expose both a plain
/// byte-slice entry point and the buffered-reader path without two
/// identically-named inherent methods.
pub trait FromXMLQuickXml {
    fn from_xml_quick<R: Read>(reader: R) -> Result<Self, ReaderError>
    where
        Self: Sized;
}

/// Implements both `FromXML` and `FromXMLQuickXml` for a type that already
/// derives/implements `serde::Deserialize`, delegating straight to
/// `quick_xml::de::from_reader` — the shape every part reader in this crate
/// needs, since quick-xml is this crate's sole XML parser (per the teacher's
/// own dependency choice).
macro_rules! impl_from_xml_via_quick {
    ($ty:ty) => {
        impl $crate::reader::FromXMLQuickXml for $ty {
            fn from_xml_quick<R: std::io::Read>(reader: R) -> Result<Self, $crate::reader::ReaderError> {
                Ok(quick_xml::de::from_reader(std::io::BufReader::new(reader))?)
            }
        }

        impl $crate::reader::FromXML for $ty {
            fn from_xml<R: std::io::Read>(reader: R) -> Result<Self, $crate::reader::ReaderError> {
                <$ty as $crate::reader::FromXMLQuickXml>::from_xml_quick(reader)
            }
        }
    };
}

pub(crate) use impl_from_xml_via_quick;
