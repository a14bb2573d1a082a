//! Group Registry
//!
//! Maps group names to `Group` instances. The registry is built by the application
//! before the peer server starts and handed to it as a `GroupSource`, instead of
//! living in a process-wide global.

use dashmap::DashMap;
use std::sync::Arc;

use super::group::Group;
use crate::peers::{CacheGroup, GroupSource};

pub struct GroupRegistry {
    groups: DashMap<String, Arc<Group>>,
}

impl GroupRegistry {
    /// Creates a new, empty registry.
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            groups: DashMap::new(),
        })
    }

    /// Registers `group` under its own name, replacing any group with the same name.
    pub fn register(&self, group: Group) -> Arc<Group> {
        let name = group.name().to_string();
        let group = Arc::new(group);
        self.groups.insert(name.clone(), group.clone());

        tracing::info!("Registered cache group: {}", name);
        group
    }

    pub fn get(&self, name: &str) -> Option<Arc<Group>> {
        self.groups.get(name).map(|entry| entry.value().clone())
    }

    /// Returns the names of all registered groups.
    pub fn list_groups(&self) -> Vec<String> {
        self.groups.iter().map(|entry| entry.key().clone()).collect()
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }
}

impl GroupSource for GroupRegistry {
    fn get_group(&self, name: &str) -> Option<Arc<dyn CacheGroup>> {
        self.get(name).map(|group| group as Arc<dyn CacheGroup>)
    }
}

impl Default for GroupRegistry {
    fn default() -> Self {
        Self {
            groups: DashMap::new(),
        }
    }
}
