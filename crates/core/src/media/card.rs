//! Card renderer - SVG title cards with a narration script

use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;

use super::transformer::{Artifact, MediaTransformer};
use crate::content::ContentItem;
use crate::error::Error;
use crate::Result;

const CARD_WIDTH: u32 = 1280;
const CARD_HEIGHT: u32 = 720;
const TITLE_MAX_CHARS: usize = 80;
const SCRIPT_SEGMENTS: usize = 3;
const SVG_MIME: &str = "image/svg+xml";

static SENTENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^.!?]+[.!?]+").expect("sentence pattern is valid"));

/// Renders a "breaking news" title card for each item
#[derive(Debug, Clone, Default)]
pub struct CardRenderer;

impl CardRenderer {
    pub fn new() -> Self {
        Self
    }

    fn render_card(&self, title: &str) -> String {
        let title: String = title.chars().take(TITLE_MAX_CHARS).collect();
        let title = escape_xml(&title);
        let (w, h) = (CARD_WIDTH, CARD_HEIGHT);

        format!(
            r##"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}">
  <defs>
    <linearGradient id="bgGrad" x1="0%" y1="0%" x2="100%" y2="100%">
      <stop offset="0%" style="stop-color:#ff6b6b;stop-opacity:1" />
      <stop offset="100%" style="stop-color:#4ecdc4;stop-opacity:1" />
    </linearGradient>
  </defs>
  <rect width="{w}" height="{h}" fill="url(#bgGrad)"/>
  <rect width="{w}" height="{h}" fill="rgba(0,0,0,0.4)"/>
  <rect x="40" y="40" width="300" height="80" fill="#ff0000"/>
  <text x="190" y="95" font-size="28" font-weight="bold" fill="#ffffff" text-anchor="middle">BREAKING NEWS</text>
  <text x="{cx}" y="{cy}" font-size="56" font-weight="bold" fill="#ffffff" text-anchor="middle">{title}</text>
</svg>
"##,
            cx = w / 2,
            cy = h / 2,
        )
    }
}

#[async_trait]
impl MediaTransformer for CardRenderer {
    async fn transform(&self, item: &ContentItem) -> Result<Artifact> {
        let title = item.title.trim();
        if title.is_empty() {
            return Err(Error::Transform(format!(
                "cannot render item without a title ({})",
                item.link
            )));
        }

        let script = if item.description.trim().is_empty() {
            title.to_string()
        } else {
            item.description.trim().to_string()
        };
        let segments = split_script(&script, SCRIPT_SEGMENTS);

        Ok(Artifact {
            media: self.render_card(title).into_bytes(),
            mime_type: SVG_MIME.to_string(),
            script,
            segments,
        })
    }
}

/// Split a script into at most `count` segments of whole sentences
fn split_script(script: &str, count: usize) -> Vec<String> {
    let sentences: Vec<&str> = SENTENCE
        .find_iter(script)
        .map(|m| m.as_str().trim())
        .filter(|s| !s.is_empty())
        .collect();

    if sentences.is_empty() || count == 0 {
        return vec![script.to_string()];
    }

    let per_segment = sentences.len().div_ceil(count);
    sentences
        .chunks(per_segment)
        .map(|chunk| chunk.join(" "))
        .collect()
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
