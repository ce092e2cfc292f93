//! @acp:module "Render Context"
//! @acp:summary "Per-item cross-link context and inherited bundle defaults"
//! @acp:domain content
//! @acp:layer service
//!
//! A context is built fresh for every item; nothing is shared between renders.

use serde::Serialize;

use super::types::{ItemKind, Link, RenderBundle, RenderItem};
use crate::data::SourceRef;

/// @acp:summary "Hub/spoke links injected into a template"
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LinkContext {
    /// Hubs only: every other hub
    pub hubs: Vec<Link>,
    /// Hubs only: items whose `hub_slug` is this hub
    pub spokes: Vec<Link>,
    /// Spokes only: the parent hub
    pub parent: Option<Link>,
    /// Spokes only: other spokes under the same hub
    pub siblings: Vec<Link>,
}

impl LinkContext {
    pub fn build(bundle: &RenderBundle, item: &RenderItem) -> Self {
        let Some(kind) = item.item_kind() else {
            return Self::default();
        };

        let link_to = |other: &RenderItem| Link::internal(other.display_title(), &other.slug);
        let is_hub = |other: &RenderItem| other.item_kind() == Some(ItemKind::Hub);

        if kind == ItemKind::Hub {
            Self {
                hubs: bundle
                    .items
                    .iter()
                    .filter(|o| is_hub(o) && o.slug != item.slug)
                    .map(link_to)
                    .collect(),
                spokes: bundle
                    .items
                    .iter()
                    .filter(|o| !is_hub(o) && o.hub_slug.as_deref() == Some(item.slug.as_str()))
                    .map(link_to)
                    .collect(),
                parent: None,
                siblings: Vec::new(),
            }
        } else {
            let Some(hub_slug) = item.hub_slug.as_deref() else {
                return Self::default();
            };
            Self {
                hubs: Vec::new(),
                spokes: Vec::new(),
                parent: bundle
                    .items
                    .iter()
                    .find(|o| is_hub(o) && o.slug == hub_slug)
                    .map(link_to),
                siblings: bundle
                    .items
                    .iter()
                    .filter(|o| {
                        !is_hub(o)
                            && o.slug != item.slug
                            && o.hub_slug.as_deref() == Some(hub_slug)
                    })
                    .map(link_to)
                    .collect(),
            }
        }
    }
}

/// @acp:summary "Everything a renderer needs besides the item itself"
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RenderContext {
    pub bundle_slug: Option<String>,
    pub links: LinkContext,
    /// Item list if set, else the bundle default
    pub external_links: Vec<Link>,
    /// Item source if set, else the bundle default
    pub source: Option<SourceRef>,
}

impl RenderContext {
    pub fn build(bundle: &RenderBundle, item: &RenderItem) -> Self {
        Self {
            bundle_slug: bundle.bundle_slug.clone(),
            links: LinkContext::build(bundle, item),
            external_links: item
                .external_links
                .clone()
                .unwrap_or_else(|| bundle.external_links.clone()),
            source: item.source.clone().or_else(|| bundle.source.clone()),
        }
    }
}
