//! Rendering module for converting assembled notes to ENEX documents.

mod enex;
mod options;

pub use enex::{
    render_resource, to_enex, APPLICATION, APPLICATION_VERSION, EXPORT_DTD, NOTE_DTD,
};
pub use options::{RenderOptions, TextEscaping};
