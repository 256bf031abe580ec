//! RSS feed content source
//!
//! Pulls items from RSS 2.0 feeds over HTTP. Defaults point at the
//! Google News top stories, technology and business feeds.

use std::collections::HashSet;
use std::sync::LazyLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use quick_xml::events::Event;
use quick_xml::Reader;
use regex::Regex;
use reqwest::Client;
use tracing::{debug, info, warn};

use super::model::ContentItem;
use super::source::ContentSource;
use crate::error::Error;
use crate::Result;

/// Feeds consulted by [`ContentSource::fetch`] when none are configured
pub const DEFAULT_FEEDS: &[&str] = &[
    "https://news.google.com/rss?hl=en-US&gl=US&ceid=US:en",
    "https://news.google.com/rss/topics/CAAqJggKIiBDQkFTRWdvSUwyMHZNRGx6TVdZU0FtVnVHZ0pWVXlnQVAB?hl=en-US&gl=US&ceid=US:en",
    "https://news.google.com/rss/topics/CAAqJggKIiBDQkFTRWdvSUwyMHZNRGx1YlY4U0FtVnVHZ0pWVXlnQVAB?hl=en-US&gl=US&ceid=US:en",
];

const CATEGORY_FEEDS: &[(&str, &str)] = &[
    (
        "technology",
        "https://news.google.com/rss/topics/CAAqJggKIiBDQkFTRWdvSUwyMHZNRGx6TVdZU0FtVnVHZ0pWVXlnQVAB?hl=en-US&gl=US&ceid=US:en",
    ),
    (
        "business",
        "https://news.google.com/rss/topics/CAAqJggKIiBDQkFTRWdvSUwyMHZNRGx1YlY4U0FtVnVHZ0pWVXlnQVAB?hl=en-US&gl=US&ceid=US:en",
    ),
    (
        "world",
        "https://news.google.com/rss/topics/CAAqJggKIiBDQkFTRWdvSUwyMHZNRGx1YlY4U0FtVnVHZ0pWVXlnQVAB?hl=en-US&gl=US&ceid=US:en",
    ),
    (
        "sports",
        "https://news.google.com/rss/topics/CAAqJggKIiBDQkFTRWdvSUwyMHZNRFp1ZEdvU0FtVnVHZ0pWVXlnQVAB?hl=en-US&gl=US&ceid=US:en",
    ),
    (
        "entertainment",
        "https://news.google.com/rss/topics/CAAqJggKIiBDQkFTRWdvSUwyMHZNREpxYW5RU0FtVnVHZ0pWVXlnQVAB?hl=en-US&gl=US&ceid=US:en",
    ),
];

const CATEGORY_ITEM_LIMIT: usize = 10;
const DESCRIPTION_MAX_CHARS: usize = 500;
const FALLBACK_SOURCE: &str = "Google News";

static HTML_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("html tag pattern is valid"));

/// Content source backed by a list of RSS feeds
#[derive(Debug, Clone)]
pub struct RssFeedSource {
    client: Client,
    feeds: Vec<String>,
}

impl Default for RssFeedSource {
    fn default() -> Self {
        Self::with_feeds(DEFAULT_FEEDS.iter().map(|url| url.to_string()).collect())
    }
}

impl RssFeedSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom list of default feeds
    pub fn with_feeds(feeds: Vec<String>) -> Self {
        Self {
            client: Client::new(),
            feeds,
        }
    }

    pub fn feeds(&self) -> &[String] {
        &self.feeds
    }

    /// Resolve the feed for a category, falling back to the first default feed
    pub fn category_feed(&self, category: &str) -> Option<&str> {
        let wanted = category.trim().to_lowercase();
        CATEGORY_FEEDS
            .iter()
            .find(|(name, _)| *name == wanted)
            .map(|(_, url)| *url)
            .or_else(|| self.feeds.first().map(String::as_str))
    }

    async fn fetch_feed(&self, url: &str) -> Result<Vec<ContentItem>> {
        debug!("Fetching feed {}", url);
        let body = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        parse_feed(&body)
    }
}

#[async_trait]
impl ContentSource for RssFeedSource {
    async fn fetch(&self, limit: usize) -> Result<Vec<ContentItem>> {
        let mut collected = Vec::new();

        for url in &self.feeds {
            match self.fetch_feed(url).await {
                Ok(items) => collected.extend(items.into_iter().take(limit)),
                Err(e) => warn!("Error fetching feed {}: {}", url, e),
            }
        }

        let mut unique = dedupe_by_title(collected);
        unique.truncate(limit);
        info!("Fetched {} items from {} feeds", unique.len(), self.feeds.len());
        Ok(unique)
    }

    async fn fetch_by_category(&self, category: &str) -> Result<Vec<ContentItem>> {
        let url = self
            .category_feed(category)
            .ok_or_else(|| Error::Source("no feeds configured".to_string()))?
            .to_string();

        let mut items = self.fetch_feed(&url).await.map_err(|e| {
            Error::Source(format!("failed to fetch {} feed: {}", category, e))
        })?;
        items.truncate(CATEGORY_ITEM_LIMIT);
        Ok(items)
    }
}

/// Drop items whose title repeats an earlier one, ignoring case
fn dedupe_by_title(items: Vec<ContentItem>) -> Vec<ContentItem> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.title.to_lowercase()))
        .collect()
}

/// Strip markup and collapse whitespace
fn clean_description(raw: &str) -> String {
    let stripped = HTML_TAG.replace_all(raw, "");
    stripped
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .take(DESCRIPTION_MAX_CHARS)
        .collect()
}

fn parse_pub_date(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc2822(raw.trim())
        .map(|date| date.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[derive(Debug, Default)]
struct RawItem {
    title: String,
    link: String,
    description: String,
    pub_date: String,
    creator: String,
    source: String,
    content: String,
}

impl RawItem {
    fn field_mut(&mut self, element: &[u8]) -> Option<&mut String> {
        match element {
            b"title" => Some(&mut self.title),
            b"link" => Some(&mut self.link),
            b"description" => Some(&mut self.description),
            b"pubDate" => Some(&mut self.pub_date),
            b"dc:creator" => Some(&mut self.creator),
            b"source" => Some(&mut self.source),
            b"content:encoded" => Some(&mut self.content),
            _ => None,
        }
    }

    fn into_item(self, channel_title: Option<&str>) -> ContentItem {
        let raw_description = self.description.trim().to_string();
        let source = non_empty(self.creator)
            .or_else(|| non_empty(self.source))
            .or_else(|| channel_title.map(str::to_string))
            .unwrap_or_else(|| FALLBACK_SOURCE.to_string());

        ContentItem {
            title: self.title.trim().to_string(),
            description: clean_description(&raw_description),
            link: self.link.trim().to_string(),
            published_at: parse_pub_date(&self.pub_date),
            source,
            content: non_empty(self.content).or_else(|| non_empty(raw_description)),
        }
    }
}

/// Parse an RSS 2.0 document into content items, in document order
pub fn parse_feed(xml: &str) -> Result<Vec<ContentItem>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut channel_title: Option<String> = None;
    let mut raw_items = Vec::new();
    let mut current: Option<RawItem> = None;
    let mut element: Option<Vec<u8>> = None;

    loop {
        let text = match reader.read_event() {
            Ok(Event::Start(start)) => {
                let name = start.name().as_ref().to_vec();
                if name == b"item" {
                    current = Some(RawItem::default());
                }
                element = Some(name);
                continue;
            }
            Ok(Event::End(end)) => {
                if end.name().as_ref() == b"item" {
                    if let Some(item) = current.take() {
                        raw_items.push(item);
                    }
                }
                element = None;
                continue;
            }
            Ok(Event::Text(text)) => text
                .unescape()
                .map(|unescaped| unescaped.into_owned())
                .unwrap_or_else(|_| String::from_utf8_lossy(&text).into_owned()),
            Ok(Event::CData(data)) => String::from_utf8_lossy(&data.into_inner()).into_owned(),
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::Parse(format!(
                    "at position {}: {}",
                    reader.buffer_position(),
                    e
                )))
            }
            Ok(_) => continue,
        };

        let Some(name) = element.as_deref() else {
            continue;
        };

        match current.as_mut() {
            Some(item) => {
                if let Some(slot) = item.field_mut(name) {
                    slot.push_str(&text);
                }
            }
            None if name == b"title" && channel_title.is_none() => {
                channel_title = Some(text.trim().to_string());
            }
            None => {}
        }
    }

    Ok(raw_items
        .into_iter()
        .map(|raw| raw.into_item(channel_title.as_deref()))
        .collect())
}
