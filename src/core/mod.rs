//! Core timeline pipeline: extraction, layout, export, and the generation
//! backend client.

pub mod extract;
pub mod fcp_xml;
pub mod generation;
pub mod layout;
