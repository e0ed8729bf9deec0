//! PAN ingestion pipelines
//!
//! # Processing
//! 1. The PAN file is streamed, conversation texts are normalized as soon as they close.
//! 1. Author labels are copied onto their conversations.
//! 1. The aligned corpus is saved (cached ingestion only).
//!
//! A cached ingestion loads the existing cache file instead of parsing again.
//! Errors on that cache file are returned as is: a broken cache is never silently rebuilt.
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::corpus::{align, Corpus};
use crate::error::Error;
use crate::io::{cache, PanReader, ParserOptions};
use crate::pipelines::pipeline::Pipeline;

/// Parse and align a PAN file.
pub struct Ingest {
    src: PathBuf,
    options: ParserOptions,
}

impl Ingest {
    pub fn new(src: PathBuf, options: ParserOptions) -> Self {
        Self { src, options }
    }
}

impl Pipeline<Corpus> for Ingest {
    fn run(&self) -> Result<Corpus, Error> {
        let vocabulary = self.options.vocabulary.clone();
        let units = PanReader::from_path(&self.src, self.options.clone())?;
        align(units, vocabulary)
    }
}

/// [Ingest] backed by a cache file.
pub struct CachedIngest {
    ingest: Ingest,
    cache: PathBuf,
    force: bool,
}

impl CachedIngest {
    pub fn new(ingest: Ingest, cache: PathBuf) -> Self {
        Self {
            ingest,
            cache,
            force: false,
        }
    }

    /// Always parse the source and overwrite the cache.
    pub fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }
}

impl Pipeline<Corpus> for CachedIngest {
    fn run(&self) -> Result<Corpus, Error> {
        if self.cache.exists() {
            if !self.force {
                info!("using cached corpus {:?}", self.cache);
                return cache::load(&self.cache);
            }
            warn!("overwriting cached corpus {:?}", self.cache);
        }

        let corpus = self.ingest.run()?;
        cache::save(&corpus, &self.cache)?;
        Ok(corpus)
    }
}

/// Parse and align `src`.
pub fn ingest(src: &Path, options: ParserOptions) -> Result<Corpus, Error> {
    Ingest::new(src.to_path_buf(), options).run()
}

/// Load `cache` if it exists, otherwise ingest `src` and save the result to `cache`.
pub fn load_or_ingest(src: &Path, cache: &Path, options: ParserOptions) -> Result<Corpus, Error> {
    CachedIngest::new(Ingest::new(src.to_path_buf(), options), cache.to_path_buf()).run()
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::error::{CacheError, StructureError};

    const PAN: &str = r#"<author gender="female" age_group="20s">
        <conversations>
            <conversation>one</conversation>
            <conversation>two &lt;b&gt;bold&lt;/b&gt;</conversation>
            <conversation>three http://x.com/page</conversation>
        </conversations>
    </author>
    <author gender="male" age_group="10s"></author>"#;

    #[test]
    fn ingest_file() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("pan.xml");
        fs::write(&src, PAN).unwrap();

        let c = ingest(&src, ParserOptions::default()).unwrap();
        assert_eq!(c.texts(), &["one", "two bold", "three [URL]"]);
        assert_eq!(c.genders(), &[1, 1, 1]);
        assert_eq!(c.ages(), &[1, 1, 1]);
    }

    #[test]
    fn missing_source() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("pan.xml");
        assert!(matches!(
            ingest(&src, ParserOptions::default()),
            Err(Error::Io(_))
        ));
    }

    #[test]
    fn no_corpus_on_structure_error() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("pan.xml");
        let cache = dir.path().join("pan.avro");
        fs::write(
            &src,
            r#"<author gender="female"><conversation>x</conversation></author>"#,
        )
        .unwrap();

        let err = load_or_ingest(&src, &cache, ParserOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            Error::Structure(StructureError::MissingAttribute { .. })
        ));
        assert!(!cache.exists());
    }

    #[test]
    fn cache_is_used() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("pan.xml");
        let cache = dir.path().join("pan.avro");
        fs::write(&src, PAN).unwrap();

        let first = load_or_ingest(&src, &cache, ParserOptions::default()).unwrap();
        assert!(cache.exists());

        // source is not read again
        fs::remove_file(&src).unwrap();
        let second = load_or_ingest(&src, &cache, ParserOptions::default()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn force_rebuilds() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("pan.xml");
        let cache = dir.path().join("pan.avro");
        fs::write(&src, PAN).unwrap();
        load_or_ingest(&src, &cache, ParserOptions::default()).unwrap();

        fs::write(
            &src,
            r#"<author gender="male" age_group="30s"><conversation>new</conversation></author>"#,
        )
        .unwrap();
        let p = CachedIngest::new(Ingest::new(src.clone(), ParserOptions::default()), cache.clone())
            .force(true);
        let c = p.run().unwrap();
        assert_eq!(c.texts(), &["new"]);
        assert_eq!(cache::load(&cache).unwrap(), c);
    }

    #[test]
    fn broken_cache_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("pan.xml");
        let cache = dir.path().join("pan.avro");
        fs::write(&src, PAN).unwrap();
        fs::write(&cache, b"").unwrap();

        assert!(matches!(
            load_or_ingest(&src, &cache, ParserOptions::default()),
            Err(Error::Cache(CacheError::Corrupt(_)))
        ));
    }
}
