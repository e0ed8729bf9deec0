//! Pipeline trait.
use crate::error::Error;

/// A runnable unit of work over PAN data.
///
/// Generic over the output: ingestion gives a [crate::corpus::Corpus],
/// tag inventory gives a set of tag names.
pub trait Pipeline<T> {
    fn run(&self) -> Result<T, Error>;
}
