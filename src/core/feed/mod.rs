//! core/feed/mod.rs
//!
//! Feed-side data and the extension seam.
//! - [`FeedChannel`] / [`FeedItem`] are what the feed builder hands an extension.
//! - [`FeedExtension`] is the hook a builder calls once per channel and once per item.
//! - [`ItunesExtension`] is the podcast (`itunes:`) implementation.
//! - [`build_rss`] is a small RSS 2.0 builder that drives the extensions.

mod itunes;
mod xml;

use serde::Deserialize;

pub use itunes::{ITUNES_NAMESPACE, ItunesExtension};
pub use xml::XmlElement;

use super::types::{Enclosure, EpisodeMetadata, is_remote_url};

/// Channel-level values. `metadata` is the raw site/podcast front matter.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FeedChannel {
    pub title: String,
    pub link: String,
    pub description: String,
    pub author: Option<String>,
    pub copyright: Option<String>,
    pub metadata: EpisodeMetadata,
}

/// One feed entry. `enclosure` is filled from the media sync result.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FeedItem {
    pub title: String,
    pub link: String,
    pub description: Option<String>,
    pub author: Option<String>,
    pub content: Option<String>,
    pub metadata: EpisodeMetadata,
    #[serde(skip)]
    pub enclosure: Option<Enclosure>,
}

/// Adds namespaced elements to a feed the builder has already laid out.
///
/// Implementations only append; they never remove or duplicate what the builder wrote.
pub trait FeedExtension {
    /// `(prefix, uri)` pairs to declare on the root element.
    fn namespaces(&self) -> Vec<(&'static str, &'static str)>;

    fn apply_to_channel(&self, channel: &mut XmlElement, data: &FeedChannel);

    fn apply_to_item(&self, item: &mut XmlElement, data: &FeedItem);
}

/// Lay out an RSS 2.0 document, then let each extension decorate it.
///
/// The builder owns `<title>`, `<link>`, `<description>`, `<copyright>` and
/// `<enclosure>`; everything namespaced comes from `extensions`.
pub fn build_rss(
    channel: &FeedChannel,
    items: &[FeedItem],
    extensions: &[&dyn FeedExtension],
) -> XmlElement {
    let mut rss = XmlElement::new("rss").with_attr("version", "2.0");
    for ext in extensions {
        for (prefix, uri) in ext.namespaces() {
            rss = rss.with_attr(format!("xmlns:{prefix}"), uri);
        }
    }

    let mut chan = XmlElement::new("channel")
        .with_child(XmlElement::text_node("title", &channel.title))
        .with_child(XmlElement::text_node("link", &channel.link))
        .with_child(XmlElement::text_node("description", &channel.description));
    if let Some(copyright) = channel.copyright.as_deref().filter(|c| !c.trim().is_empty()) {
        chan.append(XmlElement::text_node("copyright", copyright));
    }
    for ext in extensions {
        ext.apply_to_channel(&mut chan, channel);
    }

    for item in items {
        chan.append(item_element(item, extensions));
    }

    rss.with_child(chan)
}

fn item_element(item: &FeedItem, extensions: &[&dyn FeedExtension]) -> XmlElement {
    let mut el = XmlElement::new("item")
        .with_child(XmlElement::text_node("title", &item.title))
        .with_child(XmlElement::text_node("link", &item.link))
        .with_child(XmlElement::text_node("guid", &item.link));
    if let Some(desc) = &item.description {
        el.append(XmlElement::text_node("description", desc));
    }
    if let Some(enc) = &item.enclosure {
        el.append(
            XmlElement::new("enclosure")
                .with_attr("url", &enc.url)
                .with_attr("length", enc.length.to_string())
                .with_attr("type", &enc.mime_type),
        );
    }
    for ext in extensions {
        ext.apply_to_item(&mut el, item);
    }
    el
}

/// Absolute URL for `url`.
///
/// - `http(s)://...` is returned verbatim
/// - otherwise joined onto `site_base` (or `link` when no base is configured)
///   with exactly one `/` between them
pub fn resolve_url(url: &str, site_base: &str, link: &str) -> String {
    if is_remote_url(url) {
        return url.to_string();
    }

    let base = if site_base.trim().is_empty() {
        link
    } else {
        site_base
    };

    format!(
        "{}/{}",
        base.trim().trim_end_matches('/'),
        url.trim().trim_start_matches('/')
    )
}
