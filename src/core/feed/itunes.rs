//! core/feed/itunes.rs
//! iTunes podcast namespace (`itunes:*`) on top of a plain RSS 2.0 feed.
//!
//! Pure projection: front matter in, elements out. No IO, no cache.
//! The `<enclosure>` element belongs to the feed builder; this only adds the
//! podcast layer around it.

use chrono::Datelike;

use super::super::fields::{self, Category};
use super::super::types::EpisodeMetadata;
use super::xml::XmlElement;
use super::{FeedChannel, FeedExtension, FeedItem, resolve_url};

pub const ITUNES_NAMESPACE: &str = "http://www.itunes.com/dtds/podcast-1.0.dtd";

#[derive(Debug, Clone)]
pub struct ItunesExtension {
    site_base_url: String,
    copyright_year: i32,
}

impl ItunesExtension {
    pub fn new(site_base_url: impl Into<String>) -> Self {
        Self {
            site_base_url: site_base_url.into(),
            copyright_year: chrono::Local::now().year(),
        }
    }

    /// Pin the year used by the copyright fallback.
    pub fn with_copyright_year(mut self, year: i32) -> Self {
        self.copyright_year = year;
        self
    }

    fn image(&self, meta: &EpisodeMetadata, link: &str) -> Option<XmlElement> {
        let image = meta.non_empty("itunes_image")?;
        let href = resolve_url(&image, &self.site_base_url, link);
        Some(XmlElement::new("itunes:image").with_attr("href", href))
    }
}

fn explicit(meta: &EpisodeMetadata) -> Option<XmlElement> {
    meta.get("itunes_explicit")
        .map(|v| XmlElement::text_node("itunes:explicit", fields::normalize_explicit(v)))
}

fn category_node(cat: Category) -> XmlElement {
    let node = XmlElement::new("itunes:category").with_attr("text", cat.text);
    match cat.child {
        Some(child) => node.with_child(XmlElement::new("itunes:category").with_attr("text", child)),
        None => node,
    }
}

fn push_text(parent: &mut XmlElement, name: &str, text: Option<String>) {
    if let Some(text) = text {
        parent.append(XmlElement::text_node(name, text));
    }
}

impl FeedExtension for ItunesExtension {
    fn namespaces(&self) -> Vec<(&'static str, &'static str)> {
        vec![("itunes", ITUNES_NAMESPACE)]
    }

    fn apply_to_channel(&self, channel: &mut XmlElement, data: &FeedChannel) {
        let meta = &data.metadata;
        let owner_name = meta.non_empty("itunes_owner_name");
        let owner_email = meta.non_empty("itunes_owner_email");

        let has_copyright = data
            .copyright
            .as_deref()
            .is_some_and(|c| !c.trim().is_empty());
        if let (false, Some(owner)) = (has_copyright, &owner_name) {
            channel.append(XmlElement::text_node(
                "copyright",
                format!("© {} {owner}", self.copyright_year),
            ));
        }

        let show_type = fields::first_text(meta, fields::SHOW_TYPE)
            .unwrap_or_else(|| fields::DEFAULT_SHOW_TYPE.to_string());
        channel.append(XmlElement::text_node("itunes:type", show_type));

        push_text(channel, "itunes:author", fields::first_text(meta, fields::AUTHOR));

        let summary = fields::first_present([
            fields::first_text(meta, fields::SUMMARY),
            Some(data.description.clone()),
        ]);
        push_text(channel, "itunes:summary", summary);

        if owner_name.is_some() || owner_email.is_some() {
            let mut owner = XmlElement::new("itunes:owner");
            push_text(&mut owner, "itunes:name", owner_name);
            push_text(&mut owner, "itunes:email", owner_email);
            channel.append(owner);
        }

        if let Some(image) = self.image(meta, &data.link) {
            channel.append(image);
        }

        if let Some(value) = meta.get("itunes_category").filter(|v| fields::is_truthy(v)) {
            for cat in fields::categories(value) {
                channel.append(category_node(cat));
            }
        }

        if let Some(node) = explicit(meta) {
            channel.append(node);
        }
    }

    fn apply_to_item(&self, item: &mut XmlElement, data: &FeedItem) {
        let meta = &data.metadata;

        push_text(item, "itunes:title", meta.non_empty("itunes_title"));
        push_text(item, "itunes:episodeType", meta.non_empty("itunes_episode_type"));

        let author = fields::first_present([
            fields::first_text(meta, fields::AUTHOR),
            data.author.clone(),
        ]);
        push_text(item, "itunes:author", author);

        push_text(item, "itunes:subtitle", meta.non_empty("itunes_subtitle"));

        let summary = fields::first_present([
            meta.non_empty("itunes_summary"),
            data.description.clone(),
            meta.non_empty("description"),
        ]);
        push_text(item, "itunes:summary", summary);

        push_text(item, "itunes:duration", meta.non_empty("itunes_duration"));

        if let Some(node) = explicit(meta) {
            item.append(node);
        }

        for (key, name) in [("itunes_episode", "itunes:episode"), ("itunes_season", "itunes:season")] {
            let number = meta.get(key).and_then(fields::coerce_int);
            push_text(item, name, number.map(|n| n.to_string()));
        }

        if let Some(image) = self.image(meta, &data.link) {
            item.append(image);
        }
    }
}
