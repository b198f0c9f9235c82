//! Section grouping shared by navigation and the plain-text exports.
//!
//! Documents are grouped by their first slug segment. Keys listed in
//! [`NavigationConfig::sections`] become sections in that order; grouped
//! sections split documents more than two segments deep into subgroups
//! keyed by the second segment. Everything else lands in `other`.
//! The home page belongs to no group.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use apidocs_config::NavigationConfig;
use apidocs_markup::title_case;

use crate::content::{Document, DocumentInfo};
use crate::slug::Slug;

/// Anything that can be placed into sections.
pub(crate) trait Entry {
    fn slug(&self) -> &Slug;
    fn title(&self) -> &str;
}

impl Entry for DocumentInfo {
    fn slug(&self) -> &Slug {
        &self.slug
    }

    fn title(&self) -> &str {
        &self.title
    }
}

impl Entry for Document {
    fn slug(&self) -> &Slug {
        &self.slug
    }

    fn title(&self) -> &str {
        Document::title(self)
    }
}

pub(crate) struct Section<'a, T> {
    pub label: String,
    /// Documents outside any subgroup, sorted by title.
    pub direct: Vec<&'a T>,
    /// Subgroups in key order.
    pub subgroups: Vec<Subgroup<'a, T>>,
}

pub(crate) struct Subgroup<'a, T> {
    pub label: String,
    /// Sorted by title.
    pub entries: Vec<&'a T>,
}

pub(crate) struct Grouped<'a, T> {
    /// Non-empty sections in configured order.
    pub sections: Vec<Section<'a, T>>,
    /// Documents outside every configured section, in slug order.
    pub other: Vec<&'a T>,
}

pub(crate) fn group<'a, T: Entry>(entries: &'a [T], config: &NavigationConfig) -> Grouped<'a, T> {
    let mut by_section: BTreeMap<&str, Vec<&'a T>> = BTreeMap::new();
    let mut other = Vec::new();

    for entry in entries {
        let Some(key) = entry.slug().segment(0) else {
            continue;
        };
        if config.is_section(key) {
            by_section.entry(key).or_default().push(entry);
        } else {
            other.push(entry);
        }
    }

    let sections = config
        .sections
        .iter()
        .filter_map(|key| {
            let members = by_section.remove(key.as_str())?;
            Some(build_section(key, members, config))
        })
        .collect();

    other.sort_by(|a, b| a.slug().cmp(b.slug()));
    Grouped { sections, other }
}

fn build_section<'a, T: Entry>(
    key: &str,
    members: Vec<&'a T>,
    config: &NavigationConfig,
) -> Section<'a, T> {
    let label = config
        .labels
        .get(key)
        .cloned()
        .unwrap_or_else(|| title_case(key));

    let mut direct = Vec::new();
    let mut buckets: BTreeMap<&str, Vec<&'a T>> = BTreeMap::new();
    let grouped = config.is_grouped(key);

    for entry in members {
        match entry.slug().segment(1) {
            Some(subgroup) if grouped && entry.slug().len() > 2 => {
                buckets.entry(subgroup).or_default().push(entry);
            }
            _ => direct.push(entry),
        }
    }

    direct.sort_by(|a, b| by_title(*a, *b));
    let subgroups = buckets
        .into_iter()
        .map(|(key, mut entries)| {
            entries.sort_by(|a, b| by_title(*a, *b));
            Subgroup {
                label: title_case(key),
                entries,
            }
        })
        .collect();

    Section {
        label,
        direct,
        subgroups,
    }
}

/// Case-insensitive title order with a deterministic tie-break.
pub(crate) fn by_title<T: Entry>(a: &T, b: &T) -> Ordering {
    a.title()
        .to_lowercase()
        .cmp(&b.title().to_lowercase())
        .then_with(|| a.title().cmp(b.title()))
        .then_with(|| a.slug().cmp(b.slug()))
}
