//! Incremental framing of search results payloads.
//!
//! Text arrives in arbitrary chunks. [`ResultsParser`] scans the buffered text
//! for tag boundaries only, tracking element depth, until one child of
//! `<results>` is complete. That child is then decoded with `quick-xml` and
//! removed from the buffer, so the buffer never holds more than the unit being
//! assembled.
//!
//! # Depth
//!
//! | Depth | Position |
//! |-------|----------|
//! | 0 | between `<results>` documents |
//! | 1 | inside `<results>`, between units |
//! | 2+ | inside a unit (`<meta>`, `<messages>`, `<result>`) |
//!
//! Comments, CDATA sections, processing instructions and quoted attribute
//! values are skipped as a whole, so a `<` or `>` inside them never counts as
//! a tag boundary.

use super::result::SearchResult;
use crate::error::{Result, SplunkError};
use crate::protocol::results as names;
use crate::types::{Fields, Message, MessageKind, Value};
use crate::xml::{Element, XmlReader};
use std::collections::BTreeMap;

/// One decoded structural unit of a results payload.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Unit {
    /// Start of a `<results>` document.
    Header { preview: bool },
    /// Field order announced in `<meta>`.
    Meta { field_order: Vec<String> },
    /// Server messages.
    Messages(Vec<Message>),
    /// One result row.
    Row(SearchResult),
}

/// Incremental parser for a sequence of `<results>` documents.
#[derive(Debug, Default)]
pub(crate) struct ResultsParser {
    /// Text not consumed yet.
    buffer: String,
    /// Scan position in `buffer`.
    pos: usize,
    /// Number of open elements at `pos`.
    depth: usize,
    /// Start of the unit being assembled, when `depth >= 2`.
    unit_start: usize,
    /// Whether any `<results>` start tag was seen.
    seen_header: bool,
}

impl ResultsParser {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Append decoded text.
    pub(crate) fn push(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    /// Bytes held in the buffer.
    pub(crate) fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Next complete unit, or `None` when more input is needed.
    pub(crate) fn next_unit(&mut self) -> Result<Option<Unit>> {
        loop {
            let bytes = self.buffer.as_bytes();
            let Some(lt) = find(bytes, self.pos, b"<") else {
                self.check_text(self.pos, bytes.len())?;
                self.pos = bytes.len();
                self.compact();
                return Ok(None);
            };
            self.check_text(self.pos, lt)?;
            self.pos = lt;
            let rest = &bytes[lt..];

            if rest.starts_with(b"<?") {
                match find(bytes, lt + 2, b"?>") {
                    Some(end) => self.pos = end + 2,
                    None => return Ok(None),
                }
                continue;
            }

            if rest.starts_with(b"<!") {
                if rest.len() < 4 {
                    return Ok(None);
                }
                if rest.starts_with(b"<!--") {
                    match find(bytes, lt + 4, b"-->") {
                        Some(end) => self.pos = end + 3,
                        None => return Ok(None),
                    }
                } else if rest.starts_with(b"<![") {
                    if rest.len() < 9 {
                        return Ok(None);
                    }
                    if !rest.starts_with(b"<![CDATA[") {
                        return Err(self.fault("malformed markup declaration"));
                    }
                    if self.depth < 2 {
                        return Err(self.fault("character data outside of a result"));
                    }
                    match find(bytes, lt + 9, b"]]>") {
                        Some(end) => self.pos = end + 3,
                        None => return Ok(None),
                    }
                } else {
                    match find(bytes, lt + 2, b">") {
                        Some(end) => self.pos = end + 1,
                        None => return Ok(None),
                    }
                }
                continue;
            }

            if rest.starts_with(b"</") {
                let Some(gt) = find(bytes, lt + 2, b">") else {
                    return Ok(None);
                };
                let end = gt + 1;
                match self.depth {
                    0 => return Err(self.fault("unexpected end tag")),
                    1 => {
                        let name = tag_name(&self.buffer[lt + 2..gt]);
                        if local_name(name) != names::RESULTS {
                            return Err(SplunkError::Decode(format!(
                                "expected </results>, found </{}>",
                                name
                            )));
                        }
                        self.depth = 0;
                        self.pos = end;
                        self.compact();
                    }
                    2 => {
                        let unit = parse_unit(&self.buffer[self.unit_start..end])?;
                        self.depth = 1;
                        self.pos = end;
                        self.compact();
                        if let Some(unit) = unit {
                            return Ok(Some(unit));
                        }
                    }
                    _ => {
                        self.depth -= 1;
                        self.pos = end;
                    }
                }
                continue;
            }

            let Some(gt) = find_tag_end(bytes, lt) else {
                return Ok(None);
            };
            let end = gt + 1;
            let empty = bytes[gt - 1] == b'/';
            match self.depth {
                0 => {
                    let tag = &self.buffer[lt..end];
                    if local_name(tag_name(&tag[1..])) != names::RESULTS {
                        return Err(self.fault(&format!(
                            "expected <results>, found <{}>",
                            tag_name(&tag[1..])
                        )));
                    }
                    let preview = read_preview(tag)
                        .map_err(|err| self.fault(&format!("malformed <results> header: {}", err)))?;
                    self.seen_header = true;
                    self.depth = if empty { 0 } else { 1 };
                    self.pos = end;
                    self.compact();
                    return Ok(Some(Unit::Header { preview }));
                }
                1 if empty => {
                    let unit = parse_unit(&self.buffer[lt..end])?;
                    self.pos = end;
                    self.compact();
                    if let Some(unit) = unit {
                        return Ok(Some(unit));
                    }
                }
                1 => {
                    self.unit_start = lt;
                    self.depth = 2;
                    self.pos = end;
                }
                _ => {
                    if !empty {
                        self.depth += 1;
                    }
                    self.pos = end;
                }
            }
        }
    }

    /// Check the state at end of input.
    pub(crate) fn finish(&self) -> Result<()> {
        if !self.seen_header {
            return Err(SplunkError::Format(
                "body ended before a <results> header".into(),
            ));
        }
        match self.depth {
            0 => {}
            1 => return Err(SplunkError::Decode("body ended before </results>".into())),
            _ => return Err(SplunkError::Decode("body ended inside a result".into())),
        }
        if !self.buffer[self.pos..].trim().is_empty() {
            return Err(SplunkError::Decode("body ended inside markup".into()));
        }
        Ok(())
    }

    /// Framing error: `Format` before any header, `Decode` after.
    fn fault(&self, message: &str) -> SplunkError {
        if self.seen_header {
            SplunkError::Decode(message.to_string())
        } else {
            SplunkError::Format(message.to_string())
        }
    }

    /// Only whitespace may appear outside of units.
    fn check_text(&self, from: usize, to: usize) -> Result<()> {
        if self.depth < 2 && !self.buffer[from..to].trim().is_empty() {
            return Err(self.fault("character data outside of a result"));
        }
        Ok(())
    }

    /// Drop consumed text while no unit is being assembled.
    fn compact(&mut self) {
        if self.depth < 2 && self.pos > 0 {
            self.buffer.drain(..self.pos);
            self.pos = 0;
        }
    }
}

fn find(bytes: &[u8], from: usize, pattern: &[u8]) -> Option<usize> {
    if from >= bytes.len() {
        return None;
    }
    bytes[from..]
        .windows(pattern.len())
        .position(|window| window == pattern)
        .map(|p| p + from)
}

/// Position of the `>` closing the start tag at `lt`, skipping quoted values.
fn find_tag_end(bytes: &[u8], lt: usize) -> Option<usize> {
    let mut quote = None;
    for (i, &b) in bytes.iter().enumerate().skip(lt + 1) {
        match quote {
            Some(q) if b == q => quote = None,
            Some(_) => {}
            None if b == b'"' || b == b'\'' => quote = Some(b),
            None if b == b'>' => return Some(i),
            None => {}
        }
    }
    None
}

/// Tag name at the start of `text` (which follows `<` or `</`).
fn tag_name(text: &str) -> &str {
    let end = text
        .find(|c: char| c.is_whitespace() || c == '/' || c == '>')
        .unwrap_or(text.len());
    &text[..end]
}

fn local_name(name: &str) -> &str {
    name.rsplit(':').next().unwrap_or(name)
}

fn read_preview(tag: &str) -> Result<bool> {
    let mut reader = XmlReader::new(tag);
    let root = reader.root()?;
    Ok(matches!(
        root.attr(names::PREVIEW_ATTR)?.as_deref().map(str::trim),
        Some("1") | Some("true")
    ))
}

/// Decode one complete child of `<results>`. Unknown children yield `None`.
fn parse_unit(text: &str) -> Result<Option<Unit>> {
    let mut reader = XmlReader::new(text);
    let element = reader.root()?;

    let unit = if element.is(names::RESULT) {
        Some(Unit::Row(read_row(&mut reader, &element)?))
    } else if element.is(names::META) {
        Some(Unit::Meta {
            field_order: read_field_order(&mut reader, &element)?,
        })
    } else if element.is(names::MESSAGES) {
        Some(Unit::Messages(read_messages(&mut reader, &element)?))
    } else {
        tracing::trace!("skipping <{}> in results", element.display_name());
        reader.skip(&element)?;
        None
    };

    reader.finish()?;
    Ok(unit)
}

fn read_field_order(reader: &mut XmlReader<'_>, meta: &Element<'_>) -> Result<Vec<String>> {
    let mut order = Vec::new();
    reader.children(meta, |reader, child| {
        if !child.is(names::FIELD_ORDER) {
            return reader.skip(&child);
        }
        reader.children(&child, |reader, field| {
            if field.is(names::FIELD) {
                order.push(reader.text(&field)?.trim().to_string());
                Ok(())
            } else {
                reader.skip(&field)
            }
        })
    })?;
    Ok(order)
}

fn read_messages(reader: &mut XmlReader<'_>, element: &Element<'_>) -> Result<Vec<Message>> {
    let mut messages = Vec::new();
    reader.children(element, |reader, child| {
        if child.is(names::MSG) {
            let kind = MessageKind::from_attr(&child.attr("type")?.unwrap_or_default());
            let text = reader.text(&child)?.trim().to_string();
            messages.push(Message { kind, text });
            Ok(())
        } else {
            reader.skip(&child)
        }
    })?;
    Ok(messages)
}

fn read_row(reader: &mut XmlReader<'_>, element: &Element<'_>) -> Result<SearchResult> {
    let offset = match element.attr(names::OFFSET_ATTR)? {
        Some(text) => Some(text.trim().parse::<u64>().map_err(|_| {
            SplunkError::Decode(format!("invalid result offset {:?}", text))
        })?),
        None => None,
    };

    let mut values: BTreeMap<String, Vec<String>> = BTreeMap::new();
    reader.children(element, |reader, child| {
        if !child.is(names::FIELD) {
            return reader.skip(&child);
        }
        let name = child
            .attr(names::KEY_ATTR)?
            .ok_or_else(|| SplunkError::Decode("<field> without a k attribute".into()))?;
        let slot = values.entry(name).or_default();

        reader.children(&child, |reader, part| {
            if part.is(names::VALUE) {
                reader.children(&part, |reader, inner| {
                    if inner.is(names::TEXT) {
                        slot.push(reader.text(&inner)?);
                        Ok(())
                    } else {
                        reader.skip(&inner)
                    }
                })
            } else if part.is(names::RAW) {
                slot.push(reader.text(&part)?);
                Ok(())
            } else {
                reader.skip(&part)
            }
        })
    })?;

    let fields = values
        .into_iter()
        .map(|(name, mut texts)| {
            let value = match texts.len() {
                0 => Value::Null,
                1 => Value::Text(texts.remove(0)),
                _ => Value::List(texts.into_iter().map(Value::Text).collect()),
            };
            (name, value)
        })
        .collect::<Fields>();

    Ok(SearchResult::new(offset, fields))
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"<?xml version='1.0' encoding='UTF-8'?>
<results preview='0'>
<meta>
<fieldOrder>
<field>_raw</field>
<field>count</field>
</fieldOrder>
</meta>
<messages><msg type="INFO">Your timerange was substituted</msg></messages>
<!-- a comment with <result> inside -->
<result offset='0'>
  <field k='_raw'><v xml:space='preserve' trunc='0'>GET <sg h="1">/index</sg> 200</v></field>
  <field k='count'><value><text>12</text><tag>t</tag></value></field>
</result>
<result offset='1'>
  <field k='host'><value><text>a&amp;b</text></value><value><text>c</text></value></field>
  <field k='note'><value><text><![CDATA[x > y]]></text></value></field>
  <field k='empty'/>
</result>
</results>
"#;

    fn drain(parser: &mut ResultsParser) -> Vec<Unit> {
        let mut units = Vec::new();
        while let Some(unit) = parser.next_unit().unwrap() {
            units.push(unit);
        }
        units
    }

    #[test]
    fn test_whole_document() {
        let mut parser = ResultsParser::new();
        parser.push(DOC);
        let units = drain(&mut parser);
        parser.finish().unwrap();

        assert_eq!(units.len(), 5);
        assert_eq!(units[0], Unit::Header { preview: false });
        assert_eq!(
            units[1],
            Unit::Meta { field_order: vec!["_raw".into(), "count".into()] }
        );
        assert!(matches!(&units[2], Unit::Messages(m) if m[0].kind == MessageKind::Info));

        let Unit::Row(first) = &units[3] else { panic!("expected a row") };
        assert_eq!(first.offset(), Some(0));
        assert_eq!(first.get("_raw").unwrap().as_text(), Some("GET /index 200"));
        assert_eq!(first.get("count").unwrap().as_text(), Some("12"));

        let Unit::Row(second) = &units[4] else { panic!("expected a row") };
        assert_eq!(
            second.get("host"),
            Some(&Value::List(vec!["a&b".into(), "c".into()]))
        );
        assert_eq!(second.get("note").unwrap().as_text(), Some("x > y"));
        assert_eq!(second.get("empty"), Some(&Value::Null));
        assert_eq!(second.field_names(), vec!["empty", "host", "note"]);
    }

    #[test]
    fn test_any_chunking_gives_same_units() {
        let mut whole = ResultsParser::new();
        whole.push(DOC);
        let expected = drain(&mut whole);

        for size in [1, 2, 3, 7, 64] {
            let mut parser = ResultsParser::new();
            let mut units = Vec::new();
            let chars: Vec<char> = DOC.chars().collect();
            for chunk in chars.chunks(size) {
                parser.push(&chunk.iter().collect::<String>());
                units.extend(drain(&mut parser));
            }
            parser.finish().unwrap();
            assert_eq!(units, expected, "chunk size {}", size);
        }
    }

    #[test]
    fn test_buffer_is_released_after_each_row() {
        let mut parser = ResultsParser::new();
        parser.push("<results preview='1'><result offset='0'><field k='a'><value><text>1</text></value></field></result>");
        assert_eq!(parser.next_unit().unwrap(), Some(Unit::Header { preview: true }));
        assert!(matches!(parser.next_unit().unwrap(), Some(Unit::Row(_))));
        assert_eq!(parser.next_unit().unwrap(), None);
        assert_eq!(parser.buffered(), 0);
    }

    #[test]
    fn test_repeated_field_appends() {
        let mut parser = ResultsParser::new();
        parser.push(
            "<results><result>\
               <field k='a'><value><text>1</text></value></field>\
               <field k='a'><value><text>2</text></value></field>\
             </result></results>",
        );
        let units = drain(&mut parser);
        let Unit::Row(row) = &units[1] else { panic!("expected a row") };
        assert_eq!(row.get("a"), Some(&Value::List(vec!["1".into(), "2".into()])));
        assert_eq!(row.offset(), None);
    }

    #[test]
    fn test_consecutive_documents() {
        let mut parser = ResultsParser::new();
        parser.push("<results preview='1'><result offset='0'/></results>\n<results preview='0'></results>");
        let units = drain(&mut parser);
        parser.finish().unwrap();
        assert_eq!(units.len(), 3);
        assert_eq!(units[2], Unit::Header { preview: false });
    }

    #[test]
    fn test_quoted_gt_in_attribute() {
        let mut parser = ResultsParser::new();
        parser.push("<results><result offset='0'><field k='a>b'><value><text>1</text></value></field></result></results>");
        let units = drain(&mut parser);
        let Unit::Row(row) = &units[1] else { panic!("expected a row") };
        assert_eq!(row.field_names(), vec!["a>b"]);
    }

    #[test]
    fn test_wrong_root_is_format_error() {
        let mut parser = ResultsParser::new();
        parser.push("<response><messages/></response>");
        assert!(matches!(parser.next_unit(), Err(SplunkError::Format(_))));

        let mut parser = ResultsParser::new();
        parser.push("Internal error");
        assert!(matches!(parser.next_unit(), Err(SplunkError::Format(_))));
    }

    #[test]
    fn test_malformed_header_attributes() {
        let mut parser = ResultsParser::new();
        parser.push("<results preview=><result offset='0'/></results>");
        assert!(matches!(parser.next_unit(), Err(SplunkError::Format(_))));

        let mut parser = ResultsParser::new();
        parser.push("<results preview='0'></results><results preview=>");
        assert!(matches!(parser.next_unit(), Ok(Some(Unit::Header { preview: false }))));
        assert!(matches!(parser.next_unit(), Err(SplunkError::Decode(_))));
    }

    #[test]
    fn test_finish_detects_truncation() {
        let mut parser = ResultsParser::new();
        assert!(matches!(parser.finish(), Err(SplunkError::Format(_))));

        parser.push("<results><result offset='0'><field k='a'><value><te");
        drain(&mut parser);
        assert!(matches!(parser.finish(), Err(SplunkError::Decode(_))));

        let mut parser = ResultsParser::new();
        parser.push("<results>");
        drain(&mut parser);
        assert!(matches!(parser.finish(), Err(SplunkError::Decode(_))));

        let mut parser = ResultsParser::new();
        parser.push("<results></results><res");
        drain(&mut parser);
        assert!(matches!(parser.finish(), Err(SplunkError::Decode(_))));
    }

    #[test]
    fn test_mismatched_row_is_decode_error() {
        let mut parser = ResultsParser::new();
        parser.push("<results><result><field k='a'></result></field></results>");
        assert!(parser.next_unit().is_ok());
        assert!(matches!(parser.next_unit(), Err(SplunkError::Decode(_))));
    }

    #[test]
    fn test_text_between_rows_is_decode_error() {
        let mut parser = ResultsParser::new();
        parser.push("<results>stray<result/></results>");
        assert!(parser.next_unit().is_ok());
        assert!(matches!(parser.next_unit(), Err(SplunkError::Decode(_))));
    }
}
