//! core/hooks.rs
//! Glue the host calls while building pages and feeds.
//!
//! This is where item-level failure isolation lives: every error from the sync
//! service is logged here and swallowed, so one bad episode never stops a build.

use std::path::PathBuf;

use tracing::{error, info};

use super::feed::{FeedItem, resolve_url};
use super::sync::MediaSyncService;
use super::types::EpisodeMetadata;

/// Source tree and publish tree of one site build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentDirs {
    pub source: PathBuf,
    pub output: PathBuf,
}

/// Feed-building hook: sync the item's media and attach the enclosure.
///
/// Relative enclosure URLs are made absolute against `site_base_url`.
pub fn attach_enclosure(
    service: &mut MediaSyncService,
    item: &mut FeedItem,
    dirs: &ContentDirs,
    site_base_url: &str,
) {
    if item.metadata.media_reference().is_none() {
        return;
    }

    clean_item_content(item);

    match service.process_media(&item.metadata, &dirs.source, &dirs.output) {
        Ok(Some(mut enclosure)) => {
            if !enclosure.is_remote() {
                enclosure.url = resolve_url(&enclosure.url, site_base_url, "");
            }
            item.enclosure = Some(enclosure);
            info!("Added podcast enclosure for: {}", item.title);
        }
        Ok(None) => {}
        Err(e) => error!("Failed to process podcast media for {}: {e}", item.title),
    }
}

/// Page-render hook: expose the published media to templates.
///
/// Sets `audio_url` (or `video_url` for video MIME types), `media_type` and
/// `media_length` on the page metadata.
pub fn enrich_page(service: &mut MediaSyncService, metadata: &mut EpisodeMetadata, dirs: &ContentDirs) {
    if metadata.media_reference().is_none() {
        return;
    }

    match service.process_media(metadata, &dirs.source, &dirs.output) {
        Ok(Some(enclosure)) => {
            let key = if enclosure.is_video() { "video_url" } else { "audio_url" };
            metadata.insert(key, enclosure.url);
            metadata.insert("media_type", enclosure.mime_type);
            metadata.insert("media_length", enclosure.length);
        }
        Ok(None) => {}
        Err(e) => error!("Failed to process podcast media for page: {e}"),
    }
}

/// Feeds carry only the article body: the inner HTML of
/// `<div class="content-body">`, or the description when there is none.
pub fn clean_item_content(item: &mut FeedItem) {
    let Some(content) = item.content.as_deref() else {
        return;
    };
    if content.is_empty() {
        return;
    }

    const OPEN: &str = "<div class=\"content-body\">";
    let body = content.find(OPEN).and_then(|start| {
        let inner = &content[start + OPEN.len()..];
        inner.find("</div>").map(|end| inner[..end].trim().to_string())
    });

    item.content = body.or_else(|| item.description.clone());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_body_is_extracted() {
        let mut item = FeedItem {
            content: Some("<html><div class=\"content-body\">\n<p>Hi</p>\n</div></html>".into()),
            description: Some("desc".into()),
            ..FeedItem::default()
        };
        clean_item_content(&mut item);
        assert_eq!(item.content.as_deref(), Some("<p>Hi</p>"));
    }

    #[test]
    fn content_falls_back_to_description() {
        let mut item = FeedItem {
            content: Some("<p>full page</p>".into()),
            description: Some("desc".into()),
            ..FeedItem::default()
        };
        clean_item_content(&mut item);
        assert_eq!(item.content.as_deref(), Some("desc"));
    }
}
