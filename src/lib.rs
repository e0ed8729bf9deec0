/*! # pancorpus

Ingestion of PAN author-profiling corpora.

A PAN file groups conversations by author, and each author declares its gender and age group.
This crate streams such files, normalizes conversation texts and aligns them with their
author's labels, producing a [corpus::Corpus] of parallel `texts`, `genders` and `ages`.
Corpora can be cached in a compact binary file (see [io::cache]).

```no_run
use std::path::Path;
use pancorpus::io::ParserOptions;
use pancorpus::pipelines::load_or_ingest;

let corpus = load_or_ingest(
    Path::new("texts-en.xml"),
    Path::new("texts-en.avro"),
    ParserOptions::default(),
)?;
println!("{} documents", corpus.len());
# Ok::<(), pancorpus::error::Error>(())
```
!*/
pub mod corpus;
pub mod error;
pub mod io;
pub mod labels;
pub mod normalize;
pub mod pipelines;
