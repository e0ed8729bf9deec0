/*! Corpus cache files.

A cached corpus is an Avro object container file (Snappy-compressed) holding a single record:
the label vocabularies, then the texts, genders and ages of the [Corpus].

The writer schema is embedded in the file, and loading checks that it is the current one.
Files are first written in a temporary file next to the destination, then renamed,
so an interrupted save never leaves a loadable file behind.
!*/
use std::fs::File;
use std::io::{BufReader, ErrorKind, Write};
use std::path::Path;

use avro_rs::{AvroResult, Codec, Reader, Schema, Writer};
use lazy_static::lazy_static;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::corpus::Corpus;
use crate::error::{CacheError, Error};
use crate::labels::Vocabulary;

lazy_static! {
    static ref SCHEMA: Schema = {
        let schema = r#"
{
  "type":"record",
  "name":"pan_corpus_v1",
  "fields":[
    {"name": "gender_names", "type": {"type": "array", "items": "string"}},
    {"name": "age_names", "type": {"type": "array", "items": "string"}},
    {"name": "texts", "type": {"type": "array", "items": "string"}},
    {"name": "genders", "type": {"type": "array", "items": "int"}},
    {"name": "ages", "type": {"type": "array", "items": "int"}}
  ]
}
"#;
        Schema::parse_str(schema).unwrap()
    };
}

/// Borrowed record, used for writing.
///
/// Field order must follow the schema.
#[derive(Serialize)]
struct CorpusRecordRef<'a> {
    gender_names: &'a [String],
    age_names: &'a [String],
    texts: &'a [String],
    genders: Vec<i32>,
    ages: Vec<i32>,
}

impl<'a> From<&'a Corpus> for CorpusRecordRef<'a> {
    fn from(corpus: &'a Corpus) -> Self {
        Self {
            gender_names: corpus.vocabulary().genders(),
            age_names: corpus.vocabulary().ages(),
            texts: corpus.texts(),
            genders: corpus.genders().iter().map(|&g| i32::from(g)).collect(),
            ages: corpus.ages().iter().map(|&a| i32::from(a)).collect(),
        }
    }
}

#[derive(Deserialize, Debug)]
struct CorpusRecord {
    gender_names: Vec<String>,
    age_names: Vec<String>,
    texts: Vec<String>,
    genders: Vec<i32>,
    ages: Vec<i32>,
}

impl TryFrom<CorpusRecord> for Corpus {
    type Error = String;

    fn try_from(record: CorpusRecord) -> Result<Self, Self::Error> {
        let vocabulary = Vocabulary::new(record.gender_names, record.age_names)
            .map_err(|e| e.to_string())?;
        let to_labels = |labels: Vec<i32>| -> Result<Vec<u8>, String> {
            labels
                .into_iter()
                .map(|l| u8::try_from(l).map_err(|_| format!("invalid label {l}")))
                .collect()
        };
        let genders = to_labels(record.genders)?;
        let ages = to_labels(record.ages)?;

        Corpus::from_raw_parts(vocabulary, record.texts, genders, ages)
    }
}

/// Holds an Avro writer.
pub struct CorpusWriter<'a, T> {
    writer: Writer<'a, T>,
}

impl<'a, T: Write> CorpusWriter<'a, T> {
    pub fn new(writer: T) -> Self {
        Self {
            writer: Writer::with_codec(&SCHEMA, writer, Codec::Snappy),
        }
    }

    /// Append a corpus record.
    ///
    /// This function is not guaranteed to perform a write operation
    /// See documentation of [avro_rs::Writer] for more information.
    pub fn append(&mut self, corpus: &Corpus) -> AvroResult<usize> {
        self.writer.append_ser(CorpusRecordRef::from(corpus))
    }

    /// Flush the underlying buffer.
    pub fn flush(&mut self) -> AvroResult<usize> {
        self.writer.flush()
    }
}

/// Save `corpus` at `dst`, replacing any existing file.
pub fn save(corpus: &Corpus, dst: &Path) -> Result<(), Error> {
    let dir = match dst.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = tempfile::Builder::new()
        .prefix(".pancorpus")
        .suffix(".tmp")
        .tempfile_in(dir)?;
    debug!("writing corpus to temporary file {:?}", tmp.path());

    {
        let mut writer = CorpusWriter::new(tmp.as_file_mut());
        writer.append(corpus)?;
        writer.flush()?;
    }
    tmp.as_file().sync_all()?;

    // the temporary file is removed if persisting fails
    tmp.persist(dst).map_err(|e| Error::Io(e.error))?;
    info!("saved {} documents to {:?}", corpus.len(), dst);
    Ok(())
}

/// Load a corpus saved by [save].
///
/// A missing file, a file that is not a complete cache file or a file written with
/// another schema are reported as distinct [CacheError]s.
pub fn load(src: &Path) -> Result<Corpus, Error> {
    let f = match File::open(src) {
        Ok(f) => f,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(CacheError::Missing(src.to_path_buf()).into())
        }
        Err(e) => return Err(e.into()),
    };

    let corrupt = |e: avro_rs::Error| CacheError::Corrupt(e.to_string());

    let mut reader = Reader::new(BufReader::new(f)).map_err(corrupt)?;

    let expected = SCHEMA.canonical_form();
    let found = reader.writer_schema().canonical_form();
    if found != expected {
        return Err(CacheError::VersionMismatch { expected, found }.into());
    }

    let value = match reader.next() {
        Some(value) => value.map_err(corrupt)?,
        None => return Err(CacheError::Corrupt("no corpus record".to_string()).into()),
    };
    if reader.next().is_some() {
        return Err(CacheError::Corrupt("more than one corpus record".to_string()).into());
    }

    let record: CorpusRecord = avro_rs::from_value(&value).map_err(corrupt)?;
    let corpus = Corpus::try_from(record).map_err(CacheError::Corrupt)?;

    info!("loaded {} documents from {:?}", corpus.len(), src);
    Ok(corpus)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::labels::Vocabulary;

    fn corpus() -> Corpus {
        let texts = vec![
            "first [URL]".to_string(),
            String::new(),
            "trois café ☺".to_string(),
        ];
        Corpus::from_raw_parts(Vocabulary::default(), texts, vec![1, 1, 0], vec![1, 1, 2]).unwrap()
    }

    #[test]
    fn round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let dst = dir.path().join("corpus.avro");
        let c = corpus();
        save(&c, &dst).unwrap();
        assert_eq!(load(&dst).unwrap(), c);
    }

    #[test]
    fn round_trip_custom_vocabulary() {
        let dir = tempfile::tempdir().unwrap();
        let dst = dir.path().join("corpus.avro");
        let vocabulary = Vocabulary::new(
            vec!["female".into(), "male".into()],
            vec!["18-24".into(), "25-34".into(), "35-49".into(), "50-64".into()],
        )
        .unwrap();
        let c = Corpus::from_raw_parts(vocabulary, vec!["x".into()], vec![0], vec![3]).unwrap();
        save(&c, &dst).unwrap();
        assert_eq!(load(&dst).unwrap(), c);
    }

    #[test]
    fn empty_corpus_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let dst = dir.path().join("empty.avro");
        let c = Corpus::default();
        save(&c, &dst).unwrap();
        let loaded = load(&dst).unwrap();
        assert!(loaded.is_empty());
        assert_eq!(loaded, c);
    }

    #[test]
    fn save_is_stable() {
        let dir = tempfile::tempdir().unwrap();
        let dst = dir.path().join("corpus.avro");
        let c = corpus();
        save(&c, &dst).unwrap();
        let once = load(&dst).unwrap();
        save(&once, &dst).unwrap();
        assert_eq!(load(&dst).unwrap(), c);
    }

    #[test]
    fn missing() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("nope.avro");
        assert!(matches!(
            load(&src),
            Err(Error::Cache(CacheError::Missing(p))) if p == src
        ));
    }

    #[test]
    fn truncated() {
        let dir = tempfile::tempdir().unwrap();
        let dst = dir.path().join("corpus.avro");
        save(&corpus(), &dst).unwrap();

        let bytes = fs::read(&dst).unwrap();
        for len in [0, 10, bytes.len() / 2, bytes.len() - 1] {
            fs::write(&dst, &bytes[..len]).unwrap();
            assert!(
                matches!(load(&dst), Err(Error::Cache(CacheError::Corrupt(_)))),
                "truncated at {len}"
            );
        }
    }

    #[test]
    fn not_an_avro_file() {
        let dir = tempfile::tempdir().unwrap();
        let dst = dir.path().join("corpus.avro");
        fs::write(&dst, b"<author gender=\"male\"/>").unwrap();
        assert!(matches!(
            load(&dst),
            Err(Error::Cache(CacheError::Corrupt(_)))
        ));
    }

    #[test]
    fn other_schema() {
        let dir = tempfile::tempdir().unwrap();
        let dst = dir.path().join("corpus.avro");

        let old = Schema::parse_str(
            r#"{"type":"record","name":"pan_corpus_v0","fields":[
                {"name": "texts", "type": {"type": "array", "items": "string"}}
            ]}"#,
        )
        .unwrap();
        #[derive(Serialize)]
        struct Old {
            texts: Vec<String>,
        }

        let f = File::create(&dst).unwrap();
        let mut w = Writer::new(&old, f);
        w.append_ser(Old {
            texts: vec!["a".to_string()],
        })
        .unwrap();
        w.flush().unwrap();
        drop(w);

        assert!(matches!(
            load(&dst),
            Err(Error::Cache(CacheError::VersionMismatch { .. }))
        ));
    }

    #[test]
    fn failed_save_leaves_nothing() {
        let dir = tempfile::tempdir().unwrap();
        // renaming a file over a non-empty directory fails
        let dst = dir.path().join("taken");
        fs::create_dir(&dst).unwrap();
        fs::write(dst.join("keep"), b"").unwrap();

        assert!(save(&corpus(), &dst).is_err());

        let entries: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("taken")]);
    }
}
