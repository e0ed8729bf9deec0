/*! Aligned corpus and label alignment.

A [Corpus] is built once, either by aligning parsed units (see [aligner]) or by loading a cached
artifact (see [crate::io::cache]), and is read-only afterwards.
!*/
pub mod aligner;
#[allow(clippy::module_inception)]
mod corpus;

pub use aligner::{align, Aligner};
pub use corpus::{Corpus, Summary};
