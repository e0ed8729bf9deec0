/*! Streaming reader for PAN author-profiling XML.

```xml
<author lang="en" gender="female" age_group="20s">
  <conversations count="2">
    <conversation id="1">some &lt;b&gt;text&lt;/b&gt;</conversation>
    <conversation id="2"></conversation>
  </conversations>
</author>
```

The file is read as a stream of XML events.
Units are yielded when their element closes: a [Unit::Conversation] for each `conversation`,
then a [Unit::Author] carrying the labels of the enclosing `author`.
A conversation outside of any author gives a [Unit::Stray].
Only the text of the current conversation is buffered.
!*/
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::{debug, info};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::{Error, StructureError};
use crate::labels::{Dimension, Labels, Vocabulary};
use crate::normalize::{entities, Normalizer};

const AUTHOR: &str = "author";
const CONVERSATION: &str = "conversation";

/// Parsing parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParserOptions {
    pub vocabulary: Vocabulary,
    pub normalizer: Normalizer,
}

impl ParserOptions {
    pub fn new(vocabulary: Vocabulary, normalizer: Normalizer) -> Self {
        Self {
            vocabulary,
            normalizer,
        }
    }
}

/// Closed elements, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Unit {
    /// Text of a conversation. Empty conversations give an empty string.
    Conversation(String),
    /// Labels of an author, following the author's conversations.
    Author(Labels),
    /// Text of a conversation that is not enclosed by any author.
    Stray(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Author,
    Conversation,
}

impl Kind {
    fn of(name: &[u8]) -> Option<Self> {
        match name {
            b"author" => Some(Kind::Author),
            b"conversation" => Some(Kind::Conversation),
            _ => None,
        }
    }
}

/// Attributes of the currently open author.
/// Values are only checked when the author closes.
#[derive(Debug)]
struct OpenAuthor {
    gender: Option<String>,
    age: Option<String>,
    position: u64,
}

enum Step {
    Skip,
    Emit(Unit),
    Eof,
}

/// Iterator over the [Unit]s of a PAN file.
///
/// Stops at the first error.
pub struct PanReader<R: BufRead> {
    reader: Reader<R>,
    buf: Vec<u8>,
    options: ParserOptions,
    raw: bool,

    author: Option<OpenAuthor>,
    conversation: Option<String>,

    nb_authors: usize,
    nb_conversations: usize,
    done: bool,
}

impl PanReader<BufReader<File>> {
    pub fn from_path(src: &Path, options: ParserOptions) -> Result<Self, Error> {
        let f = File::open(src)?;
        info!("reading PAN data from {:?}", src);
        Ok(Self::new(BufReader::new(f), options))
    }
}

impl<R: BufRead> PanReader<R> {
    pub fn new(reader: R, options: ParserOptions) -> Self {
        Self {
            reader: Reader::from_reader(reader),
            buf: Vec::new(),
            options,
            raw: false,
            author: None,
            conversation: None,
            nb_authors: 0,
            nb_conversations: 0,
            done: false,
        }
    }

    /// Yield conversation texts as found in the file, without normalizing them.
    pub fn raw_text(mut self) -> Self {
        self.raw = true;
        self
    }

    fn read_unit(&mut self) -> Result<Option<Unit>, Error> {
        let mut buf = std::mem::take(&mut self.buf);
        let result = loop {
            buf.clear();
            match self.step(&mut buf) {
                Ok(Step::Skip) => continue,
                Ok(Step::Emit(unit)) => break Ok(Some(unit)),
                Ok(Step::Eof) => break Ok(None),
                Err(e) => break Err(e),
            }
        };
        self.buf = buf;
        result
    }

    fn step(&mut self, buf: &mut Vec<u8>) -> Result<Step, Error> {
        let position = self.reader.buffer_position() as u64;

        match self.reader.read_event_into(buf)? {
            Event::Start(e) => {
                self.open(&e, position)?;
                Ok(Step::Skip)
            }
            Event::Empty(e) => match self.open(&e, position)? {
                Some(kind) => self.close(kind).map(Step::Emit),
                None => Ok(Step::Skip),
            },
            Event::End(e) => match Kind::of(e.name().as_ref()) {
                Some(kind) => self.close(kind).map(Step::Emit),
                None => Ok(Step::Skip),
            },
            Event::Text(e) => {
                if let Some(text) = self.conversation.as_mut() {
                    text.push_str(&entities::decode(utf8(&e, position)?));
                }
                Ok(Step::Skip)
            }
            Event::CData(e) => {
                if let Some(text) = self.conversation.as_mut() {
                    text.push_str(utf8(&e, position)?);
                }
                Ok(Step::Skip)
            }
            Event::Eof => {
                if self.conversation.is_some() {
                    return Err(StructureError::UnclosedElement {
                        element: CONVERSATION,
                    }
                    .into());
                }
                if self.author.is_some() {
                    return Err(StructureError::UnclosedElement { element: AUTHOR }.into());
                }
                Ok(Step::Eof)
            }
            _ => Ok(Step::Skip),
        }
    }

    /// Track an opening element, checking that it can be nested where it is.
    fn open(&mut self, e: &BytesStart, position: u64) -> Result<Option<Kind>, Error> {
        let kind = match Kind::of(e.name().as_ref()) {
            Some(kind) => kind,
            None => return Ok(None),
        };

        let nesting = |element: &'static str, parent: &'static str| {
            StructureError::UnexpectedNesting {
                element,
                parent,
                position,
            }
        };

        match kind {
            Kind::Author => {
                if self.conversation.is_some() {
                    return Err(nesting(AUTHOR, CONVERSATION).into());
                }
                if self.author.is_some() {
                    return Err(nesting(AUTHOR, AUTHOR).into());
                }
                self.author = Some(OpenAuthor {
                    gender: attribute(e, Dimension::Gender.attribute())?,
                    age: attribute(e, Dimension::Age.attribute())?,
                    position,
                });
            }
            Kind::Conversation => {
                if self.conversation.is_some() {
                    return Err(nesting(CONVERSATION, CONVERSATION).into());
                }
                self.conversation = Some(String::new());
            }
        }

        Ok(Some(kind))
    }

    /// Close an element and build its [Unit], releasing its buffered state.
    fn close(&mut self, kind: Kind) -> Result<Unit, Error> {
        match kind {
            Kind::Conversation => {
                let text = self.conversation.take().ok_or_else(|| {
                    Error::Custom("closing a conversation that was never opened".to_string())
                })?;
                self.nb_conversations += 1;

                let text = if self.raw {
                    text
                } else {
                    self.options.normalizer.normalize(&text)
                };

                if self.author.is_some() {
                    Ok(Unit::Conversation(text))
                } else {
                    debug!("conversation #{} has no author", self.nb_conversations);
                    Ok(Unit::Stray(text))
                }
            }
            Kind::Author => {
                let author = self.author.take().ok_or_else(|| {
                    Error::Custom("closing an author that was never opened".to_string())
                })?;
                self.nb_authors += 1;

                let vocabulary = &self.options.vocabulary;
                let gender = vocabulary.resolve(
                    Dimension::Gender,
                    author.gender.as_deref(),
                    author.position,
                )?;
                let age =
                    vocabulary.resolve(Dimension::Age, author.age.as_deref(), author.position)?;
                debug!(
                    "author at byte {}: {:?}/{:?}",
                    author.position, author.gender, author.age
                );

                Ok(Unit::Author(Labels::new(gender, age)))
            }
        }
    }
}

fn utf8(bytes: &[u8], position: u64) -> Result<&str, StructureError> {
    std::str::from_utf8(bytes).map_err(|_| StructureError::InvalidText { position })
}

/// Get an unescaped attribute value.
fn attribute(e: &BytesStart, key: &str) -> Result<Option<String>, Error> {
    match e.try_get_attribute(key)? {
        Some(attr) => Ok(Some(attr.unescape_value()?.into_owned())),
        None => Ok(None),
    }
}

impl<R: BufRead> Iterator for PanReader<R> {
    type Item = Result<Unit, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        match self.read_unit() {
            Ok(Some(unit)) => Some(Ok(unit)),
            Ok(None) => {
                self.done = true;
                info!(
                    "read {} authors, {} conversations",
                    self.nb_authors, self.nb_conversations
                );
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
