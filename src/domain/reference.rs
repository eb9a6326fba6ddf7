use crate::domain::Container;
use crate::error::{ConfigError, Result};
use std::collections::{BTreeMap, HashSet};

pub const DEFAULT_GROUP: &str = "default";

/// Turns a user-supplied target into concrete container names.
#[derive(Debug, Clone, Copy)]
pub struct ReferenceResolver<'a> {
    containers: &'a BTreeMap<String, Container>,
    groups: &'a BTreeMap<String, Vec<String>>,
}

impl<'a> ReferenceResolver<'a> {
    pub fn new(
        containers: &'a BTreeMap<String, Container>,
        groups: &'a BTreeMap<String, Vec<String>>,
    ) -> Self {
        Self { containers, groups }
    }

    /// Containers for `target`, without duplicates, in first-seen order.
    ///
    /// An empty target means the `default` group, or every container when
    /// there is no such group.
    pub fn resolve(&self, target: &str) -> Result<Vec<String>> {
        if target.is_empty() {
            if self.groups.contains_key(DEFAULT_GROUP) {
                return self.group_members(DEFAULT_GROUP);
            }
            return Ok(self.containers.keys().cloned().collect());
        }

        if self.groups.contains_key(target) {
            return self.group_members(target);
        }

        if self.containers.contains_key(target) {
            return Ok(vec![target.to_string()]);
        }

        Err(ConfigError::UnknownReference {
            name: target.to_string(),
        })
    }

    /// Flattened members of `group`, nested groups expanded in place
    pub fn group_members(&self, group: &str) -> Result<Vec<String>> {
        let mut members = Vec::new();
        let mut seen = HashSet::new();
        let mut path = Vec::new();
        self.collect(group, &mut path, &mut seen, &mut members)?;
        Ok(members)
    }

    fn collect(
        &self,
        group: &str,
        path: &mut Vec<String>,
        seen: &mut HashSet<String>,
        members: &mut Vec<String>,
    ) -> Result<()> {
        if let Some(pos) = path.iter().position(|g| g == group) {
            let mut cycle = path[pos..].to_vec();
            cycle.push(group.to_string());
            return Err(ConfigError::Cycle { path: cycle });
        }

        let Some(raw_members) = self.groups.get(group) else {
            return Err(ConfigError::UnknownReference {
                name: group.to_string(),
            });
        };

        path.push(group.to_string());
        for member in raw_members {
            if self.containers.contains_key(member) {
                if seen.insert(member.clone()) {
                    members.push(member.clone());
                }
            } else if self.groups.contains_key(member) {
                self.collect(member, path, seen, members)?;
            } else {
                return Err(ConfigError::UnknownMember {
                    group: group.to_string(),
                    member: member.clone(),
                });
            }
        }
        path.pop();

        Ok(())
    }
}
