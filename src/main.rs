//! # pancorpus
//!
//! Turns PAN author-profiling XML into a cached, label-aligned corpus.
//!
//! ```sh
//! pancorpus 0.1.0
//! PAN corpus ingestion tool.
//!
//! USAGE:
//!     pancorpus <SUBCOMMAND>
//!
//! FLAGS:
//!     -h, --help       Prints help information
//!     -V, --version    Prints version information
//!
//! SUBCOMMANDS:
//!     help       Prints this message or the help of the given subcommand(s)
//!     ingest     Parse a PAN file and cache the aligned corpus
//!     inspect    Print statistics about a cached corpus
//!     tags       List markup tags found in raw conversations
//! ```
//!
//! Logging is configured through `RUST_LOG` (e.g. `RUST_LOG=pancorpus=info`).
use structopt::StructOpt;

use pancorpus::error::Error;
use pancorpus::io::cache;
use pancorpus::pipelines::{CachedIngest, Ingest, Pipeline, TagInventory};

#[macro_use]
extern crate log;

mod cli;

fn main() -> Result<(), Error> {
    env_logger::init();

    let opt = cli::PanCorpus::from_args();
    debug!("cli args\n{:#?}", opt);

    match opt {
        cli::PanCorpus::Ingest(i) => {
            let options = i.parser_options()?;
            let p = CachedIngest::new(Ingest::new(i.src, options), i.dst).force(i.force);
            let corpus = p.run()?;
            info!("corpus ready:\n{}", corpus.summary());
        }

        cli::PanCorpus::Inspect(i) => {
            let corpus = cache::load(&i.src)?;
            let summary = corpus.summary();
            if i.json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print!("{}", summary);
                println!("vocabulary: {}", corpus.vocabulary());
            }
        }

        cli::PanCorpus::Tags(t) => {
            let tags = TagInventory::new(t.src).run()?;
            for tag in tags {
                println!("{}", tag);
            }
        }
    };
    Ok(())
}
