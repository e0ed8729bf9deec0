/*! Corpus reading utilities

PAN files are read as a stream of [Unit]s, see [pan].
!*/
pub mod pan;

pub use pan::{PanReader, ParserOptions, Unit};
