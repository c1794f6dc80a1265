use anyhow::{Context, Result};
use bzip2::read::BzDecoder;
use quick_xml::events::Event;
use quick_xml::reader::Reader;
use std::fs::File;
use std::io::{BufReader, Read};

/// One page pulled from the dump. Only the title and the raw wikitext body
/// are kept; entity ids come from the page infoboxes, not the dump metadata.
#[derive(Debug, Clone)]
pub struct WikiPage {
    pub title: String,
    pub text: String,
}

enum Capture {
    Title,
    Text,
}

/// Streaming reader over a MediaWiki XML export, plain or BZ2-compressed
/// (chosen by the `.bz2` extension). Yields pages in dump order.
pub struct WikiReader {
    reader: Reader<BufReader<Box<dyn Read>>>,
    buf: Vec<u8>,
}

impl WikiReader {
    pub fn new(path: &str) -> Result<Self> {
        let file =
            File::open(path).with_context(|| format!("Failed to open wiki dump at: {}", path))?;
        let input: Box<dyn Read> = if path.ends_with(".bz2") {
            Box::new(BzDecoder::new(file))
        } else {
            Box::new(file)
        };
        Ok(WikiReader {
            reader: Reader::from_reader(BufReader::new(input)),
            buf: Vec::with_capacity(64 * 1024),
        })
    }
}

impl Iterator for WikiReader {
    type Item = Result<WikiPage>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut title = String::new();
        let mut text = String::new();
        let mut in_page = false;
        let mut capture: Option<Capture> = None;

        loop {
            self.buf.clear();
            match self.reader.read_event_into(&mut self.buf) {
                Ok(Event::Start(e)) => match e.name().as_ref() {
                    b"page" => {
                        in_page = true;
                        title.clear();
                        text.clear();
                    }
                    b"title" if in_page => capture = Some(Capture::Title),
                    b"text" if in_page => capture = Some(Capture::Text),
                    _ => {}
                },
                Ok(Event::Text(t)) => {
                    if let Some(field) = &capture {
                        match t.unescape() {
                            Ok(s) => match field {
                                Capture::Title => title.push_str(&s),
                                Capture::Text => text.push_str(&s),
                            },
                            Err(e) => return Some(Err(e.into())),
                        }
                    }
                }
                Ok(Event::CData(t)) => {
                    if let Some(field) = &capture {
                        let s = String::from_utf8_lossy(&t);
                        match field {
                            Capture::Title => title.push_str(&s),
                            Capture::Text => text.push_str(&s),
                        }
                    }
                }
                Ok(Event::End(e)) => match e.name().as_ref() {
                    b"title" | b"text" => capture = None,
                    b"page" => {
                        return Some(Ok(WikiPage {
                            title: std::mem::take(&mut title),
                            text: std::mem::take(&mut text),
                        }))
                    }
                    _ => {}
                },
                Ok(Event::Eof) => return None,
                Ok(_) => {}
                Err(e) => return Some(Err(e.into())),
            }
        }
    }
}
