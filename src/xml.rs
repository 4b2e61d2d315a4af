//! Thin pull-parser helpers over `quick-xml`.
//!
//! Decoders walk documents element by element. Every helper that receives an
//! [`Element`] that is not empty must consume it up to and including its end
//! tag, so callers always resume at the next sibling.
//!
//! Names are compared by local name: `s:key`, `opensearch:totalResults` and
//! `key` all match on the part after the prefix.

use crate::error::{Result, SplunkError};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// A structurally significant XML event.
pub(crate) enum Node<'a> {
    /// Start of a child element.
    Element(Element<'a>),
    /// Character data, already unescaped.
    Text(String),
    /// End tag of the enclosing element.
    End,
}

/// An element start tag and whether it was self-closing.
pub(crate) struct Element<'a> {
    start: BytesStart<'a>,
    empty: bool,
}

impl<'a> Element<'a> {
    /// Local name, without any namespace prefix.
    pub(crate) fn local_name(&self) -> &[u8] {
        self.start.local_name().into_inner()
    }

    /// Check the local name against `name`.
    pub(crate) fn is(&self, name: &str) -> bool {
        self.local_name() == name.as_bytes()
    }

    /// Local name as text, for error messages.
    pub(crate) fn display_name(&self) -> String {
        String::from_utf8_lossy(self.local_name()).into_owned()
    }

    /// True for `<tag/>`.
    pub(crate) fn is_empty(&self) -> bool {
        self.empty
    }

    /// Unescaped value of attribute `name`, if present.
    pub(crate) fn attr(&self, name: &str) -> Result<Option<String>> {
        match self.start.try_get_attribute(name)? {
            Some(attr) => Ok(Some(attr.unescape_value()?.into_owned())),
            None => Ok(None),
        }
    }
}

/// Pull reader over an in-memory document or fragment.
pub(crate) struct XmlReader<'a> {
    reader: Reader<&'a [u8]>,
}

impl<'a> XmlReader<'a> {
    pub(crate) fn new(text: &'a str) -> Self {
        XmlReader {
            reader: Reader::from_str(text),
        }
    }

    /// Next structural node, skipping comments, declarations and processing
    /// instructions. `None` at end of input.
    pub(crate) fn next(&mut self) -> Result<Option<Node<'a>>> {
        loop {
            let node = match self.reader.read_event()? {
                Event::Start(start) => Node::Element(Element { start, empty: false }),
                Event::Empty(start) => Node::Element(Element { start, empty: true }),
                Event::End(_) => Node::End,
                Event::Text(text) => Node::Text(text.unescape()?.into_owned()),
                Event::CData(data) => Node::Text(
                    std::str::from_utf8(&data)
                        .map_err(|e| SplunkError::Decode(e.to_string()))?
                        .to_string(),
                ),
                Event::Eof => return Ok(None),
                Event::Comment(_) | Event::Decl(_) | Event::PI(_) | Event::DocType(_) => continue,
            };
            return Ok(Some(node));
        }
    }

    /// Like [`next`](Self::next) but treats end of input as truncation.
    pub(crate) fn next_within(&mut self, context: &str) -> Result<Node<'a>> {
        self.next()?.ok_or_else(|| {
            SplunkError::Decode(format!("document ends inside <{}>", context))
        })
    }

    /// The document element. Only whitespace may precede it.
    pub(crate) fn root(&mut self) -> Result<Element<'a>> {
        loop {
            match self.next()? {
                Some(Node::Element(element)) => return Ok(element),
                Some(Node::Text(text)) if text.trim().is_empty() => continue,
                Some(Node::Text(_)) => {
                    return Err(SplunkError::Decode("text before the document element".into()))
                }
                Some(Node::End) => {
                    return Err(SplunkError::Decode("end tag before the document element".into()))
                }
                None => return Err(SplunkError::Decode("document is empty".into())),
            }
        }
    }

    /// Require that nothing but whitespace follows the document element.
    pub(crate) fn finish(&mut self) -> Result<()> {
        loop {
            match self.next()? {
                None => return Ok(()),
                Some(Node::Text(text)) if text.trim().is_empty() => continue,
                Some(_) => {
                    return Err(SplunkError::Decode(
                        "content after the document element".into(),
                    ))
                }
            }
        }
    }

    /// Visit each child element of `parent`; text between children is ignored.
    ///
    /// `visit` must consume every non-empty child it is given.
    pub(crate) fn children<F>(&mut self, parent: &Element<'_>, mut visit: F) -> Result<()>
    where
        F: FnMut(&mut Self, Element<'a>) -> Result<()>,
    {
        if parent.is_empty() {
            return Ok(());
        }
        let context = parent.display_name();
        loop {
            match self.next_within(&context)? {
                Node::Element(child) => visit(self, child)?,
                Node::Text(_) => {}
                Node::End => return Ok(()),
            }
        }
    }

    /// All text inside `element`, with nested markup flattened away.
    pub(crate) fn text(&mut self, element: &Element<'_>) -> Result<String> {
        let mut text = String::new();
        if element.is_empty() {
            return Ok(text);
        }
        let context = element.display_name();
        let mut depth = 0usize;
        loop {
            match self.next_within(&context)? {
                Node::Text(chunk) => text.push_str(&chunk),
                Node::Element(child) if !child.is_empty() => depth += 1,
                Node::Element(_) => {}
                Node::End if depth == 0 => return Ok(text),
                Node::End => depth -= 1,
            }
        }
    }

    /// Consume `element` without looking at it.
    pub(crate) fn skip(&mut self, element: &Element<'_>) -> Result<()> {
        if !element.is_empty() {
            self.reader.read_to_end(element.start.name())?;
        }
        Ok(())
    }
}
