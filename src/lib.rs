//! Read, edit, and write WordprocessingML (`.docx`) documents.
//!
//! Grounded on `docx-core`'s crate layout: a typed document object model
//! under [`documents`], a small set of cross-cutting helpers
//! (`error`, `namespace`, `types`, `xml_builder`, `escape`) at the crate
//! root, an [`opc`] layer for the ZIP/OPC container, a [`reader`] layer that
//! turns package parts into the typed model, and a top-level [`docx::Docx`]
//! facade tying a parsed package's parts together.

pub mod docx;
pub mod documents;
pub mod error;
pub mod escape;
pub mod namespace;
pub mod opc;
pub mod reader;
pub mod text;
pub mod types;
pub mod xml_builder;

pub use docx::Docx;
pub use documents::{Document, DocumentChild};
pub use error::ReaderError;
