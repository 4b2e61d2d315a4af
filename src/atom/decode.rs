//! Element-level decoding of Atom documents.

use super::feed::{AtomEntry, AtomFeed, Generator, Pagination};
use crate::error::{Result, SplunkError};
use crate::protocol::atom;
use crate::types::{Fields, Message, MessageKind, Value, Version};
use crate::xml::{Element, Node, XmlReader};
use chrono::{DateTime, FixedOffset};
use std::collections::BTreeMap;

pub(super) fn parse_feed(text: &str) -> Result<AtomFeed> {
    let mut reader = XmlReader::new(text);
    let root = reader.root()?;

    let feed = if root.is(atom::FEED) {
        read_feed(&mut reader, &root)?
    } else if root.is(atom::ENTRY) {
        let entry = read_entry(&mut reader, &root)?;
        AtomFeed {
            pagination: Pagination {
                total_results: 1,
                items_per_page: 1,
                start_index: 0,
            },
            entries: vec![entry],
            ..AtomFeed::default()
        }
    } else {
        return Err(unexpected_root(&root, "<feed> or <entry>"));
    };

    reader.finish()?;
    Ok(feed)
}

pub(super) fn parse_entry(text: &str) -> Result<AtomEntry> {
    let mut reader = XmlReader::new(text);
    let root = reader.root()?;
    if !root.is(atom::ENTRY) {
        return Err(unexpected_root(&root, "<entry>"));
    }
    let entry = read_entry(&mut reader, &root)?;
    reader.finish()?;
    Ok(entry)
}

fn unexpected_root(root: &Element<'_>, expected: &str) -> SplunkError {
    SplunkError::Decode(format!(
        "expected {} document element, found <{}>",
        expected,
        root.display_name()
    ))
}

fn read_feed(reader: &mut XmlReader<'_>, root: &Element<'_>) -> Result<AtomFeed> {
    let mut feed = AtomFeed::default();

    reader.children(root, |reader, child| {
        match child.local_name() {
            n if n == atom::TITLE.as_bytes() => feed.title = trimmed_text(reader, &child)?,
            n if n == atom::ID.as_bytes() => feed.id = trimmed_text(reader, &child)?,
            n if n == atom::UPDATED.as_bytes() => {
                feed.updated = Some(timestamp(reader, &child)?)
            }
            n if n == atom::AUTHOR.as_bytes() => feed.author = read_author(reader, &child)?,
            n if n == atom::LINK.as_bytes() => read_link(reader, &child, &mut feed.links)?,
            n if n == atom::GENERATOR.as_bytes() => {
                feed.generator = Some(read_generator(reader, &child)?)
            }
            n if n == atom::TOTAL_RESULTS.as_bytes() => {
                feed.pagination.total_results = counter(reader, &child)?
            }
            n if n == atom::ITEMS_PER_PAGE.as_bytes() => {
                feed.pagination.items_per_page = counter(reader, &child)?
            }
            n if n == atom::START_INDEX.as_bytes() => {
                feed.pagination.start_index = counter(reader, &child)?
            }
            n if n == atom::MESSAGES.as_bytes() => read_messages(reader, &child, &mut feed.messages)?,
            n if n == atom::ENTRY.as_bytes() => feed.entries.push(read_entry(reader, &child)?),
            _ => reader.skip(&child)?,
        }
        Ok(())
    })?;

    Ok(feed)
}

fn read_entry(reader: &mut XmlReader<'_>, element: &Element<'_>) -> Result<AtomEntry> {
    let mut entry = AtomEntry::default();

    reader.children(element, |reader, child| {
        match child.local_name() {
            n if n == atom::TITLE.as_bytes() => entry.title = trimmed_text(reader, &child)?,
            n if n == atom::ID.as_bytes() => entry.id = trimmed_text(reader, &child)?,
            n if n == atom::UPDATED.as_bytes() => {
                entry.updated = Some(timestamp(reader, &child)?)
            }
            n if n == atom::PUBLISHED.as_bytes() => {
                entry.published = Some(timestamp(reader, &child)?)
            }
            n if n == atom::AUTHOR.as_bytes() => entry.author = read_author(reader, &child)?,
            n if n == atom::LINK.as_bytes() => read_link(reader, &child, &mut entry.links)?,
            n if n == atom::CONTENT.as_bytes() => entry.content = read_value(reader, &child)?,
            _ => reader.skip(&child)?,
        }
        Ok(())
    })?;

    Ok(entry)
}

fn trimmed_text(reader: &mut XmlReader<'_>, element: &Element<'_>) -> Result<String> {
    Ok(reader.text(element)?.trim().to_string())
}

fn timestamp(reader: &mut XmlReader<'_>, element: &Element<'_>) -> Result<DateTime<FixedOffset>> {
    let text = trimmed_text(reader, element)?;
    DateTime::parse_from_rfc3339(&text).map_err(|e| {
        SplunkError::Decode(format!(
            "invalid <{}> timestamp {:?}: {}",
            element.display_name(),
            text,
            e
        ))
    })
}

fn counter(reader: &mut XmlReader<'_>, element: &Element<'_>) -> Result<u64> {
    let text = trimmed_text(reader, element)?;
    if text.is_empty() {
        return Ok(0);
    }
    text.parse().map_err(|_| {
        SplunkError::Decode(format!("invalid <{}> value {:?}", element.display_name(), text))
    })
}

fn read_author(reader: &mut XmlReader<'_>, element: &Element<'_>) -> Result<Option<String>> {
    let mut name = None;
    reader.children(element, |reader, child| {
        if child.is(atom::NAME) {
            name = Some(trimmed_text(reader, &child)?);
        } else {
            reader.skip(&child)?;
        }
        Ok(())
    })?;
    Ok(name)
}

fn read_link(
    reader: &mut XmlReader<'_>,
    element: &Element<'_>,
    links: &mut BTreeMap<String, String>,
) -> Result<()> {
    if let Some(href) = element.attr("href")? {
        let rel = element.attr("rel")?.unwrap_or_else(|| "alternate".to_string());
        links.insert(rel, href);
    }
    reader.skip(element)
}

fn read_generator(reader: &mut XmlReader<'_>, element: &Element<'_>) -> Result<Generator> {
    let version = match element.attr("version")? {
        Some(text) => Some(text.trim().parse::<Version>().map_err(|e| {
            SplunkError::Decode(format!("invalid generator version: {}", e))
        })?),
        None => None,
    };
    let build = element.attr("build")?;
    reader.skip(element)?;
    Ok(Generator { version, build })
}

fn read_messages(
    reader: &mut XmlReader<'_>,
    element: &Element<'_>,
    messages: &mut Vec<Message>,
) -> Result<()> {
    reader.children(element, |reader, child| {
        if child.is(atom::MSG) {
            let kind = MessageKind::from_attr(&child.attr("type")?.unwrap_or_default());
            let text = trimmed_text(reader, &child)?;
            messages.push(Message { kind, text });
        } else {
            reader.skip(&child)?;
        }
        Ok(())
    })
}

/// Decode the value held by `element`: a nested dict or list if there is one,
/// otherwise its text. Empty text is null.
fn read_value(reader: &mut XmlReader<'_>, element: &Element<'_>) -> Result<Value> {
    if element.is_empty() {
        return Ok(Value::Null);
    }

    let context = element.display_name();
    let mut text = String::new();
    let mut nested = None;
    loop {
        match reader.next_within(&context)? {
            Node::Text(chunk) => text.push_str(&chunk),
            Node::Element(child) if child.is(atom::DICT) => {
                nested = Some(Value::Dict(read_dict(reader, &child)?))
            }
            Node::Element(child) if child.is(atom::LIST) => {
                nested = Some(Value::List(read_list(reader, &child)?))
            }
            Node::Element(child) => reader.skip(&child)?,
            Node::End => break,
        }
    }

    Ok(match nested {
        Some(value) => value,
        None if text.is_empty() => Value::Null,
        None => Value::Text(text),
    })
}

fn read_dict(reader: &mut XmlReader<'_>, element: &Element<'_>) -> Result<Fields> {
    let mut fields = Fields::new();
    reader.children(element, |reader, child| {
        if child.is(atom::KEY) {
            let name = child.attr("name")?.ok_or_else(|| {
                SplunkError::Decode("<s:key> without a name attribute".into())
            })?;
            fields.insert(name, read_value(reader, &child)?);
        } else {
            reader.skip(&child)?;
        }
        Ok(())
    })?;
    Ok(fields)
}

fn read_list(reader: &mut XmlReader<'_>, element: &Element<'_>) -> Result<Vec<Value>> {
    let mut items = Vec::new();
    reader.children(element, |reader, child| {
        if child.is(atom::ITEM) {
            items.push(read_value(reader, &child)?);
        } else {
            reader.skip(&child)?;
        }
        Ok(())
    })?;
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value_of(xml: &str) -> Value {
        let mut reader = XmlReader::new(xml);
        let root = reader.root().unwrap();
        read_value(&mut reader, &root).unwrap()
    }

    #[test]
    fn test_scalar_keeps_inner_whitespace() {
        assert_eq!(value_of("<s:key name='q'> search * </s:key>"), Value::from(" search * "));
    }

    #[test]
    fn test_empty_values_are_null() {
        assert_eq!(value_of("<s:key name='a'/>"), Value::Null);
        assert_eq!(value_of("<s:key name='a'></s:key>"), Value::Null);
        assert_eq!(value_of("<s:item/>"), Value::Null);
    }

    #[test]
    fn test_nested_list_of_dicts() {
        let value = value_of(
            "<s:key name='x'><s:list>\
               <s:item><s:dict><s:key name='a'>1</s:key></s:dict></s:item>\
               <s:item>two</s:item>\
             </s:list></s:key>",
        );
        let items = value.as_list().unwrap();
        assert_eq!(items[0].get("a").unwrap().as_text(), Some("1"));
        assert_eq!(items[1], Value::from("two"));
    }

    #[test]
    fn test_key_without_name_fails() {
        let mut reader = XmlReader::new("<s:dict><s:key>1</s:key></s:dict>");
        let root = reader.root().unwrap();
        assert!(read_dict(&mut reader, &root).is_err());
    }

    #[test]
    fn test_link_defaults_to_alternate() {
        let feed = parse_feed("<feed><link href='/x'/><link rel='list' href='/y'/></feed>").unwrap();
        assert_eq!(feed.links["alternate"], "/x");
        assert_eq!(feed.links["list"], "/y");
    }

    #[test]
    fn test_blank_counter_is_zero() {
        let feed = parse_feed("<feed><opensearch:startIndex> </opensearch:startIndex></feed>").unwrap();
        assert_eq!(feed.pagination.start_index, 0);
    }
}
