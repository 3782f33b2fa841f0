//! Content model types.
//!
//! This module defines the intermediate representation that bridges
//! document parsing and ENEX rendering: the ordered elements a parser
//! extracts, and the note they are assembled into.

mod element;
mod note;

pub use element::{Element, ImageElement};
pub use note::{Note, ResourceRecord, IMAGE_MIME};
