/*!
# IO utilities

Reading of raw PAN files and saving/loading of aligned corpora.
!*/
pub mod cache;
pub mod reader;

pub use cache::{load, save};
pub use reader::{PanReader, ParserOptions, Unit};
