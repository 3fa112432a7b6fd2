//! Structured-source parse events.
//!
//! The loader consumes [`SourceEvent`]s rather than a parser API; [`XmlEvents`]
//! produces them from an XML byte stream.

use std::collections::VecDeque;
use std::fmt;
use std::io::BufRead;

use quick_xml::Reader;
use quick_xml::encoding::Decoder;
use quick_xml::events::{BytesStart, Event};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceEvent {
    ElementStart {
        name: String,
        attributes: Vec<(String, String)>,
    },
    ElementEnd {
        name: String,
    },
    Text(String),
    EndOfSource,
    Error(SyntaxError),
}

impl SourceEvent {
    /// Element start with the given attributes, mostly for tests
    pub fn start(name: &str, attributes: &[(&str, &str)]) -> Self {
        SourceEvent::ElementStart {
            name: name.to_string(),
            attributes: attributes
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    pub fn end(name: &str) -> Self {
        SourceEvent::ElementEnd {
            name: name.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Logged, parsing continues
    Warning,
    /// Aborts the load
    Fatal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub severity: Severity,
    /// Byte offset into the source
    pub offset: u64,
    pub message: String,
}

impl SyntaxError {
    pub fn warning(offset: u64, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            offset,
            message: message.into(),
        }
    }

    pub fn fatal(offset: u64, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Fatal,
            offset,
            message: message.into(),
        }
    }

    pub fn is_fatal(&self) -> bool {
        self.severity == Severity::Fatal
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let kind = match self.severity {
            Severity::Warning => "Warning",
            Severity::Fatal => "Fatal Error",
        };
        write!(f, "[{kind}] {}: {}", self.offset, self.message)
    }
}

/// Iterator of [`SourceEvent`]s over an XML document.
///
/// Text is decoded with the encoding the document declares. Ends with
/// [`SourceEvent::EndOfSource`], or right after a fatal error.
pub struct XmlEvents<R: BufRead> {
    reader: Reader<R>,
    buf: Vec<u8>,
    pending: VecDeque<SourceEvent>,
    /// Names of the elements currently open, outermost first
    open: Vec<String>,
    root_closed: bool,
    done: bool,
}

impl<R: BufRead> XmlEvents<R> {
    pub fn new(input: R) -> Self {
        let mut reader = Reader::from_reader(input);
        reader.config_mut().trim_text(true);

        Self {
            reader,
            buf: Vec::new(),
            pending: VecDeque::new(),
            open: Vec::new(),
            root_closed: false,
            done: false,
        }
    }

    fn fail(&mut self, error: SyntaxError) -> Option<SourceEvent> {
        self.done = true;
        self.pending.clear();
        Some(SourceEvent::Error(error))
    }
}

impl<R: BufRead> Iterator for XmlEvents<R> {
    type Item = SourceEvent;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(event) = self.pending.pop_front() {
            return Some(event);
        }
        if self.done {
            return None;
        }

        loop {
            self.buf.clear();
            let offset;
            let step = {
                let event = self.reader.read_event_into(&mut self.buf);
                offset = self.reader.buffer_position() as u64;
                let decoder = self.reader.decoder();

                match event {
                    Ok(Event::Start(e)) => element_start(&e, decoder, offset, &mut self.pending).map(Some),
                    Ok(Event::Empty(e)) => element_start(&e, decoder, offset, &mut self.pending).map(|name| {
                        self.pending.push_back(SourceEvent::ElementEnd { name });
                        None
                    }),
                    Ok(Event::End(e)) => match decode(decoder, e.name().as_ref(), offset) {
                        Ok(name) => {
                            self.open.pop();
                            self.root_closed = self.open.is_empty();
                            return Some(SourceEvent::ElementEnd { name });
                        }
                        Err(err) => Err(err),
                    },
                    Ok(Event::Text(e)) => match e.unescape() {
                        Ok(text) => return Some(SourceEvent::Text(text.into_owned())),
                        Err(quick_xml::Error::Escape(err)) => match decode(decoder, &e, offset) {
                            Ok(raw) => {
                                self.pending.push_back(SourceEvent::Text(raw));
                                return Some(SourceEvent::Error(SyntaxError::warning(offset, err.to_string())));
                            }
                            Err(err) => Err(err),
                        },
                        Err(err) => Err(SyntaxError::fatal(offset, err.to_string())),
                    },
                    Ok(Event::CData(e)) => match decode(decoder, &e, offset) {
                        Ok(text) => return Some(SourceEvent::Text(text)),
                        Err(err) => Err(err),
                    },
                    Ok(Event::Eof) => match self.open.last() {
                        Some(name) => Err(SyntaxError::fatal(offset, format!("unclosed <{name}> at end of document"))),
                        None if !self.root_closed => Err(SyntaxError::fatal(offset, "document has no root element")),
                        None => {
                            self.done = true;
                            return Some(SourceEvent::EndOfSource);
                        }
                    },
                    Ok(_) => continue,
                    Err(err) => Err(SyntaxError::fatal(offset, err.to_string())),
                }
            };

            match step {
                Ok(opened) => {
                    if self.root_closed {
                        return self.fail(SyntaxError::fatal(offset, "content after the root element"));
                    }
                    match opened {
                        Some(name) => self.open.push(name),
                        // an empty root element closes the document
                        None if self.open.is_empty() => self.root_closed = true,
                        None => {}
                    }
                }
                Err(err) => return self.fail(err),
            }

            if let Some(event) = self.pending.pop_front() {
                return Some(event);
            }
        }
    }
}

fn decode(decoder: Decoder, bytes: &[u8], offset: u64) -> Result<String, SyntaxError> {
    decoder
        .decode(bytes)
        .map(|text| text.into_owned())
        .map_err(|err| SyntaxError::fatal(offset, format!("Failed to decode XML content: {err}")))
}

/// Queue the start event of `e`, preceded by warnings for attributes that
/// could not be read. Returns the element name.
fn element_start(
    e: &BytesStart,
    decoder: Decoder,
    offset: u64,
    out: &mut VecDeque<SourceEvent>,
) -> Result<String, SyntaxError> {
    let name = decode(decoder, e.name().as_ref(), offset)?;
    let mut attributes = Vec::new();

    for attr in e.attributes() {
        let attr = match attr {
            Ok(attr) => attr,
            Err(err) => {
                out.push_back(SourceEvent::Error(SyntaxError::warning(
                    offset,
                    format!("Failed to parse XML attribute: {err}"),
                )));
                continue;
            }
        };

        let key = decode(decoder, attr.key.as_ref(), offset)?;
        let value = match attr.decode_and_unescape_value(decoder) {
            Ok(value) => value.into_owned(),
            Err(quick_xml::Error::Escape(err)) => {
                out.push_back(SourceEvent::Error(SyntaxError::warning(
                    offset,
                    format!("Failed to unescape XML value of '{key}': {err}"),
                )));
                decode(decoder, &attr.value, offset)?
            }
            Err(err) => {
                return Err(SyntaxError::fatal(
                    offset,
                    format!("Failed to decode XML value of '{key}': {err}"),
                ));
            }
        };
        attributes.push((key, value));
    }

    out.push_back(SourceEvent::ElementStart {
        name: name.clone(),
        attributes,
    });
    Ok(name)
}
