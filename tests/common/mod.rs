#![allow(dead_code)]

use bytes::Bytes;
use futures::stream::{self, BoxStream, Stream, StreamExt};
use http::HeaderMap;
use splunk_client::{Response, Result};
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};

pub const APPS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom" xmlns:s="http://dev.splunk.com/ns/rest" xmlns:opensearch="http://a9.com/-/spec/opensearch/1.1/">
  <title>localapps</title>
  <id>https://localhost:8089/services/apps/local</id>
  <updated>2014-03-28T15:20:23-07:00</updated>
  <generator build="201162" version="6.1.1"/>
  <author><name>Splunk</name></author>
  <opensearch:totalResults>2</opensearch:totalResults>
  <opensearch:itemsPerPage>30</opensearch:itemsPerPage>
  <opensearch:startIndex>0</opensearch:startIndex>
  <s:messages/>
  <entry>
    <title>launcher</title>
    <id>https://localhost:8089/servicesNS/nobody/system/apps/local/launcher</id>
    <updated>2014-03-28T15:20:23-07:00</updated>
    <link href="/servicesNS/nobody/system/apps/local/launcher" rel="alternate"/>
    <author><name>nobody</name></author>
    <content type="text/xml">
      <s:dict>
        <s:key name="check_for_updates">1</s:key>
        <s:key name="disabled">0</s:key>
        <s:key name="label">Home</s:key>
        <s:key name="version">1.0</s:key>
        <s:key name="visible">1</s:key>
        <s:key name="eai:acl">
          <s:dict>
            <s:key name="app">system</s:key>
            <s:key name="can_write">1</s:key>
            <s:key name="modifiable">1</s:key>
            <s:key name="owner">nobody</s:key>
            <s:key name="perms">
              <s:dict>
                <s:key name="read"><s:list><s:item>*</s:item></s:list></s:key>
                <s:key name="write"><s:list><s:item>admin</s:item><s:item>power</s:item></s:list></s:key>
              </s:dict>
            </s:key>
            <s:key name="removable">0</s:key>
            <s:key name="sharing">app</s:key>
          </s:dict>
        </s:key>
      </s:dict>
    </content>
  </entry>
  <entry>
    <title>search</title>
    <id>https://localhost:8089/servicesNS/nobody/system/apps/local/search</id>
    <updated>2014-03-28T15:20:23-07:00</updated>
    <author><name>nobody</name></author>
    <content type="text/xml">
      <s:dict>
        <s:key name="check_for_updates">1</s:key>
        <s:key name="disabled">0</s:key>
        <s:key name="label">Search &amp; Reporting</s:key>
        <s:key name="version">6.1.1</s:key>
        <s:key name="visible">1</s:key>
      </s:dict>
    </content>
  </entry>
</feed>"#;

pub const EMPTY_FEED: &str = r#"<feed xmlns="http://www.w3.org/2005/Atom">
  <title>localapps</title>
  <opensearch:totalResults xmlns:opensearch="http://a9.com/-/spec/opensearch/1.1/">0</opensearch:totalResults>
</feed>"#;

pub const THREE_ROWS: &str = "<?xml version='1.0' encoding='UTF-8'?>\n\
<results preview='0'>\n\
<meta><fieldOrder><field>_time</field><field>count</field><field>host</field></fieldOrder></meta>\n\
<messages><msg type=\"DEBUG\">base lispy: [ AND index::_internal ]</msg></messages>\n\
<result offset='0'><field k='host'><value><text>web-01</text></value></field><field k='count'><value><text>12</text></value></field></result>\n\
<result offset='1'><field k='host'><value><text>web-02</text></value></field><field k='count'><value><text>7</text></value></field></result>\n\
<result offset='2'><field k='host'><value><text>db-01</text></value></field><field k='count'><value><text>3</text></value></field></result>\n\
</results>\n";

/// Body stream that counts how often it was released.
pub struct CountingBody {
    inner: BoxStream<'static, Result<Bytes>>,
    drops: Arc<AtomicUsize>,
}

impl Stream for CountingBody {
    type Item = Result<Bytes>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.poll_next_unpin(cx)
    }
}

impl Drop for CountingBody {
    fn drop(&mut self) {
        self.drops.fetch_add(1, Ordering::SeqCst);
    }
}

/// A response over `chunks` plus the counter of body releases.
pub fn counted_response(status: u16, chunks: Vec<&'static str>) -> (Response, Arc<AtomicUsize>) {
    let body = stream::iter(chunks.into_iter().map(|chunk| Ok(Bytes::from(chunk))));
    counted(status, body.boxed())
}

/// A response whose body yields `head` and then never completes.
pub fn stalled_response(head: &'static str) -> (Response, Arc<AtomicUsize>) {
    let body = stream::iter(vec![Ok(Bytes::from(head))]).chain(stream::pending());
    counted(200, body.boxed())
}

fn counted(status: u16, inner: BoxStream<'static, Result<Bytes>>) -> (Response, Arc<AtomicUsize>) {
    let drops = Arc::new(AtomicUsize::new(0));
    let body = CountingBody {
        inner,
        drops: drops.clone(),
    };
    (Response::new(status, HeaderMap::new(), body), drops)
}

/// Split `text` into chunks of `size` bytes.
pub fn chunks_of(text: &'static str, size: usize) -> Vec<&'static str> {
    let mut chunks = Vec::new();
    let mut start = 0;
    while start < text.len() {
        let end = (start + size).min(text.len());
        chunks.push(&text[start..end]);
        start = end;
    }
    chunks
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}
