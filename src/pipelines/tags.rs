//! Markup tag inventory.
//!
//! Lists the tags that appear in raw conversation texts,
//! to check what normalization will have to strip.
use std::collections::BTreeSet;
use std::path::PathBuf;

use log::info;

use crate::error::Error;
use crate::io::{PanReader, ParserOptions, Unit};
use crate::normalize::{entities, tag_names};
use crate::pipelines::pipeline::Pipeline;

pub struct TagInventory {
    src: PathBuf,
}

impl TagInventory {
    pub fn new(src: PathBuf) -> Self {
        Self { src }
    }

    /// Collect tag names from a stream of raw [Unit]s.
    pub fn collect<I>(units: I) -> Result<BTreeSet<String>, Error>
    where
        I: IntoIterator<Item = Result<Unit, Error>>,
    {
        let mut tags = BTreeSet::new();
        let mut nb_conversations = 0;
        for unit in units {
            match unit? {
                Unit::Conversation(text) | Unit::Stray(text) => {
                    nb_conversations += 1;
                    tags.extend(tag_names(&entities::decode(&text)));
                }
                Unit::Author(_) => (),
            }
        }
        info!(
            "{} distinct tags in {} conversations",
            tags.len(),
            nb_conversations
        );
        Ok(tags)
    }
}

impl Pipeline<BTreeSet<String>> for TagInventory {
    fn run(&self) -> Result<BTreeSet<String>, Error> {
        let units = PanReader::from_path(&self.src, ParserOptions::default())?.raw_text();
        Self::collect(units)
    }
}
