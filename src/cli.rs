//! Command line arguments and parameters management/parsing.
use std::path::PathBuf;

use structopt::StructOpt;

use pancorpus::error::Error;
use pancorpus::io::ParserOptions;
use pancorpus::labels::Vocabulary;
use pancorpus::normalize::{LinkText, Normalizer};

#[derive(Debug, StructOpt)]
#[structopt(name = "pancorpus", about = "PAN corpus ingestion tool.")]
/// Holds every command that is callable by the `pancorpus` command.
pub enum PanCorpus {
    #[structopt(about = "Parse a PAN file and cache the aligned corpus")]
    Ingest(Ingest),
    #[structopt(about = "Print statistics about a cached corpus")]
    Inspect(Inspect),
    #[structopt(about = "List markup tags found in raw conversations")]
    Tags(Tags),
}

#[derive(Debug, StructOpt)]
/// Ingest command and parameters.
///
/// ```sh
/// pancorpus-ingest 0.1.0
/// Parse a PAN file and cache the aligned corpus
///
/// USAGE:
///     pancorpus ingest [FLAGS] [OPTIONS] <src> <dst>
///
/// FLAGS:
///     -f, --force      parse again even if <dst> exists
///
/// OPTIONS:
///         --ages <ages>...              age group categories [default: 10s,20s,30s]
///         --genders <genders>...        gender categories [default: male,female]
///         --link-text <link-text>       anchor text policy: keep or placeholder [default: keep]
///
/// ARGS:
///     <src>    path to PAN xml file
///     <dst>    cached corpus destination
/// ```
pub struct Ingest {
    #[structopt(parse(from_os_str), help = "path to PAN xml file")]
    pub src: PathBuf,
    #[structopt(parse(from_os_str), help = "cached corpus destination")]
    pub dst: PathBuf,
    #[structopt(short = "f", long = "force", help = "parse again even if <dst> exists")]
    pub force: bool,
    #[structopt(
        long = "genders",
        help = "gender categories",
        use_delimiter = true,
        default_value = "male,female"
    )]
    pub genders: Vec<String>,
    #[structopt(
        long = "ages",
        help = "age group categories",
        use_delimiter = true,
        default_value = "10s,20s,30s"
    )]
    pub ages: Vec<String>,
    #[structopt(
        long = "link-text",
        help = "anchor text policy: keep or placeholder",
        default_value = "keep"
    )]
    pub link_text: LinkText,
}

impl Ingest {
    pub fn parser_options(&self) -> Result<ParserOptions, Error> {
        let vocabulary = Vocabulary::new(self.genders.clone(), self.ages.clone())?;
        if vocabulary != Vocabulary::default() {
            info!("using custom vocabulary: {}", vocabulary);
        }
        Ok(ParserOptions::new(vocabulary, Normalizer::new(self.link_text)))
    }
}

#[derive(Debug, StructOpt)]
/// Inspect command and parameters.
pub struct Inspect {
    #[structopt(parse(from_os_str), help = "cached corpus location")]
    pub src: PathBuf,
    #[structopt(long = "json", help = "print statistics as JSON")]
    pub json: bool,
}

#[derive(Debug, StructOpt)]
/// Tags command and parameters.
pub struct Tags {
    #[structopt(parse(from_os_str), help = "path to PAN xml file")]
    pub src: PathBuf,
}
