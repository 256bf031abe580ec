use rand::seq::SliceRandom;

use crate::content::ContentItem;

pub const TWITTER_CAPTION_LIMIT: usize = 280;
pub const DEFAULT_CAPTION_LIMIT: usize = 2200;

const CAPTION_EMOJIS: &[&str] = &["🔥", "📰", "⚡", "🌟", "💡", "🚨"];
const DESCRIPTION_PREVIEW_CHARS: usize = 200;
const HASHTAGS: &str = "#News #Breaking #Today";

/// Build a post caption for an item, clipped to `limit` characters
pub fn compose_caption(item: &ContentItem, limit: usize) -> String {
    let emoji = CAPTION_EMOJIS
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or("📰");
    let preview: String = item
        .description
        .chars()
        .take(DESCRIPTION_PREVIEW_CHARS)
        .collect();

    let caption = format!("{} {}\n\n{}...\n\n{}", emoji, item.title, preview, HASHTAGS);
    caption.chars().take(limit).collect()
}
