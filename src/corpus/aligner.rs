//! Label alignment.
//!
//! Conversations come before the labels of their author.
//! The [Aligner] counts conversations waiting for labels and flushes that many
//! label copies when an author closes.
//! Conversations that no author encloses can never be labelled, and make alignment fail.
use std::iter::repeat;

use log::{debug, info};

use crate::error::Error;
use crate::io::reader::Unit;
use crate::labels::{Labels, Vocabulary};

use super::Corpus;

pub struct Aligner {
    vocabulary: Vocabulary,
    texts: Vec<String>,
    genders: Vec<u8>,
    ages: Vec<u8>,

    // texts waiting for their author's labels
    pending: usize,
    // texts outside of any author
    stray: usize,

    nb_authors: usize,
    nb_empty_authors: usize,
}

impl Aligner {
    pub fn new(vocabulary: Vocabulary) -> Self {
        Self {
            vocabulary,
            texts: Vec::new(),
            genders: Vec::new(),
            ages: Vec::new(),
            pending: 0,
            stray: 0,
            nb_authors: 0,
            nb_empty_authors: 0,
        }
    }

    pub fn push_text(&mut self, text: String) {
        self.texts.push(text);
        self.pending += 1;
    }

    /// Label every pending text with `labels`.
    pub fn push_author(&mut self, labels: Labels) {
        self.nb_authors += 1;
        if self.pending == 0 {
            debug!("author #{} has no conversation", self.nb_authors);
            self.nb_empty_authors += 1;
            return;
        }

        self.genders.extend(repeat(labels.gender).take(self.pending));
        self.ages.extend(repeat(labels.age).take(self.pending));
        self.pending = 0;
    }

    /// Record a text that has no author. It is not kept.
    pub fn push_stray(&mut self) {
        self.stray += 1;
    }

    pub fn push(&mut self, unit: Unit) {
        match unit {
            Unit::Conversation(text) => self.push_text(text),
            Unit::Author(labels) => self.push_author(labels),
            Unit::Stray(_) => self.push_stray(),
        }
    }

    /// Number of texts that are not labelled yet.
    pub fn pending(&self) -> usize {
        self.pending + self.stray
    }

    /// Get the aligned corpus.
    ///
    /// Errors if some texts were never labelled.
    pub fn finish(self) -> Result<Corpus, Error> {
        let unlabeled = self.pending + self.stray;
        if unlabeled > 0 {
            return Err(Error::Alignment { unlabeled });
        }

        info!(
            "{} authors ({} without conversations), {} documents",
            self.nb_authors,
            self.nb_empty_authors,
            self.texts.len()
        );
        Corpus::from_raw_parts(self.vocabulary, self.texts, self.genders, self.ages)
            .map_err(Error::Custom)
    }
}

/// Align a stream of [Unit]s, stopping at the first error.
pub fn align<I>(units: I, vocabulary: Vocabulary) -> Result<Corpus, Error>
where
    I: IntoIterator<Item = Result<Unit, Error>>,
{
    let mut aligner = Aligner::new(vocabulary);
    for unit in units {
        aligner.push(unit?);
    }
    aligner.finish()
}
