//! The global vocabulary of known tags.

use std::rc::Rc;

use crate::models::Tag;
use crate::observer::{Observer, Subscribers};

/// Change events emitted by a [`TagRegistry`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryEvent {
    Added(Tag),
    /// Emitted for every removal request, even when the tag was not present
    Removed(Tag),
}

/// Ordered, name-unique list of existing tags
#[derive(Debug, Default)]
pub struct TagRegistry {
    tags: Vec<Tag>,
    subscribers: Subscribers<RegistryEvent>,
}

impl TagRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from persisted tags, dropping repeated names.
    pub fn from_tags(tags: impl IntoIterator<Item = Tag>) -> Self {
        let mut registry = Self::new();
        for tag in tags {
            if !registry.tags.contains(&tag) {
                registry.tags.push(tag);
            }
        }
        registry
    }

    /// Find a tag by exact name
    pub fn find_by_name(&self, name: &str) -> Option<&Tag> {
        self.tags.iter().find(|tag| tag.name() == name)
    }

    pub fn contains(&self, tag: &Tag) -> bool {
        self.tags.contains(tag)
    }

    pub fn contains_all(&self, tags: &[Tag]) -> bool {
        tags.iter().all(|tag| self.contains(tag))
    }

    /// Add a tag unless one with the same name exists.
    ///
    /// Returns whether the tag was added.
    pub fn add(&mut self, tag: Tag) -> bool {
        if self.contains(&tag) {
            return false;
        }

        tracing::debug!("Registered tag '{}'", tag);
        self.tags.push(tag.clone());
        self.subscribers.notify(&RegistryEvent::Added(tag));
        true
    }

    /// Remove the tag with the same name, if any.
    ///
    /// Observers are notified whether or not anything was removed.
    pub fn remove(&mut self, tag: &Tag) {
        if let Some(index) = self.tags.iter().position(|existing| existing == tag) {
            self.tags.remove(index);
            tracing::debug!("Removed tag '{}'", tag);
        }
        self.subscribers.notify(&RegistryEvent::Removed(tag.clone()));
    }

    /// Copy of the tags in insertion order
    pub fn snapshot(&self) -> Vec<Tag> {
        self.tags.clone()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tag> {
        self.tags.iter()
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn subscribe(&mut self, observer: &Rc<dyn Observer<RegistryEvent>>) {
        self.subscribers.subscribe(observer);
    }
}
