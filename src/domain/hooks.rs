use crate::error::{ConfigError, Result};
use serde::Deserialize;
use std::fmt;

/// Lifecycle events a hook can be attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HookEvent {
    PreStart,
    PostStart,
    PreStop,
    PostStop,
}

impl HookEvent {
    pub const ALL: [HookEvent; 4] = [
        HookEvent::PreStart,
        HookEvent::PostStart,
        HookEvent::PreStop,
        HookEvent::PostStop,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PreStart => "pre-start",
            Self::PostStart => "post-start",
            Self::PreStop => "pre-stop",
            Self::PostStop => "post-stop",
        }
    }
}

impl fmt::Display for HookEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shell commands bound to the lifecycle events of a container or group.
///
/// The same shape is used for the raw `hooks` entries of a document and for
/// the effective hooks attached to a container after resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Hooks {
    #[serde(default)]
    pub pre_start: Option<String>,
    #[serde(default)]
    pub post_start: Option<String>,
    #[serde(default)]
    pub pre_stop: Option<String>,
    #[serde(default)]
    pub post_stop: Option<String>,
}

impl Hooks {
    /// Command for `event`, ignoring blank definitions
    pub fn get(&self, event: HookEvent) -> Option<&str> {
        let slot = match event {
            HookEvent::PreStart => &self.pre_start,
            HookEvent::PostStart => &self.post_start,
            HookEvent::PreStop => &self.pre_stop,
            HookEvent::PostStop => &self.post_stop,
        };
        slot.as_deref().filter(|cmd| !cmd.trim().is_empty())
    }

    pub fn set(&mut self, event: HookEvent, command: Option<String>) {
        let slot = match event {
            HookEvent::PreStart => &mut self.pre_start,
            HookEvent::PostStart => &mut self.post_start,
            HookEvent::PreStop => &mut self.pre_stop,
            HookEvent::PostStop => &mut self.post_stop,
        };
        *slot = command;
    }

    pub fn is_empty(&self) -> bool {
        HookEvent::ALL.iter().all(|event| self.get(*event).is_none())
    }
}

/// Hook definitions that apply to one container, by tier.
#[derive(Debug, Default)]
pub struct HookSources<'a> {
    /// Entry keyed by the container's own name
    pub own: Option<&'a Hooks>,
    /// Entries of the non-default groups the container belongs to
    pub groups: Vec<(&'a str, &'a Hooks)>,
    /// The `default` entry, when it applies to this container
    pub default: Option<&'a Hooks>,
}

/// Merges the three tiers into the effective hooks of `container`.
///
/// Each event is resolved on its own: the container's entry wins, then a
/// single group definition, then the default tier. Groups that disagree on
/// the command for an event make the whole resolution fail.
pub fn resolve_hooks(container: &str, sources: &HookSources<'_>) -> Result<Hooks> {
    let mut resolved = Hooks::default();

    for event in HookEvent::ALL {
        if let Some(cmd) = sources.own.and_then(|hooks| hooks.get(event)) {
            resolved.set(event, Some(cmd.to_string()));
            continue;
        }

        let defined: Vec<(&str, &str)> = sources
            .groups
            .iter()
            .filter_map(|(group, hooks)| hooks.get(event).map(|cmd| (*group, cmd)))
            .collect();

        if let Some((_, first)) = defined.first() {
            if defined.iter().any(|(_, cmd)| cmd != first) {
                let mut groups: Vec<String> =
                    defined.iter().map(|(group, _)| group.to_string()).collect();
                groups.sort();
                return Err(ConfigError::AmbiguousHook {
                    container: container.to_string(),
                    event,
                    sources: groups,
                });
            }
            resolved.set(event, Some(first.to_string()));
            continue;
        }

        let fallback = sources.default.and_then(|hooks| hooks.get(event));
        resolved.set(event, fallback.map(str::to_string));
    }

    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hooks(pre_start: Option<&str>, post_start: Option<&str>) -> Hooks {
        Hooks {
            pre_start: pre_start.map(Into::into),
            post_start: post_start.map(Into::into),
            ..Default::default()
        }
    }

    #[test]
    fn own_definition_wins_over_groups_and_default() {
        let own = hooks(Some("own"), None);
        let group = hooks(Some("group"), None);
        let default = hooks(Some("default"), None);
        let sources = HookSources {
            own: Some(&own),
            groups: vec![("backend", &group)],
            default: Some(&default),
        };

        let resolved = resolve_hooks("web", &sources).unwrap();
        assert_eq!(resolved.get(HookEvent::PreStart), Some("own"));
    }

    #[test]
    fn group_definition_wins_over_default() {
        let group = hooks(Some("group"), None);
        let default = hooks(Some("default"), Some("default-post"));
        let sources = HookSources {
            own: None,
            groups: vec![("backend", &group)],
            default: Some(&default),
        };

        let resolved = resolve_hooks("web", &sources).unwrap();
        assert_eq!(resolved.get(HookEvent::PreStart), Some("group"));
        assert_eq!(resolved.get(HookEvent::PostStart), Some("default-post"));
    }

    #[test]
    fn events_are_resolved_independently() {
        let own = hooks(Some("own-pre"), None);
        let default = hooks(None, Some("default-post"));
        let sources = HookSources {
            own: Some(&own),
            groups: vec![],
            default: Some(&default),
        };

        let resolved = resolve_hooks("web", &sources).unwrap();
        assert_eq!(resolved.get(HookEvent::PreStart), Some("own-pre"));
        assert_eq!(resolved.get(HookEvent::PostStart), Some("default-post"));
        assert_eq!(resolved.get(HookEvent::PreStop), None);
        assert_eq!(resolved.get(HookEvent::PostStop), None);
    }

    #[test]
    fn conflicting_groups_are_ambiguous() {
        let first = hooks(Some("first"), None);
        let second = hooks(Some("second"), None);
        let sources = HookSources {
            own: None,
            groups: vec![("group2", &second), ("group1", &first)],
            default: None,
        };

        let err = resolve_hooks("a", &sources).unwrap_err();
        match err {
            ConfigError::AmbiguousHook {
                container,
                event,
                sources,
            } => {
                assert_eq!(container, "a");
                assert_eq!(event, HookEvent::PreStart);
                assert_eq!(sources, vec!["group1", "group2"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn own_definition_settles_group_conflict() {
        let own = hooks(Some("own"), None);
        let first = hooks(Some("first"), None);
        let second = hooks(Some("second"), None);
        let sources = HookSources {
            own: Some(&own),
            groups: vec![("group1", &first), ("group2", &second)],
            default: None,
        };

        let resolved = resolve_hooks("a", &sources).unwrap();
        assert_eq!(resolved.get(HookEvent::PreStart), Some("own"));
    }

    #[test]
    fn groups_agreeing_on_a_command_are_not_ambiguous() {
        let first = hooks(Some("same"), None);
        let second = hooks(Some("same"), None);
        let sources = HookSources {
            own: None,
            groups: vec![("group1", &first), ("group2", &second)],
            default: None,
        };

        let resolved = resolve_hooks("a", &sources).unwrap();
        assert_eq!(resolved.get(HookEvent::PreStart), Some("same"));
    }

    #[test]
    fn blank_commands_count_as_undefined() {
        let own = hooks(Some("   "), None);
        let default = hooks(Some("default"), None);
        let sources = HookSources {
            own: Some(&own),
            groups: vec![],
            default: Some(&default),
        };

        let resolved = resolve_hooks("a", &sources).unwrap();
        assert_eq!(resolved.get(HookEvent::PreStart), Some("default"));
    }

    #[test]
    fn no_sources_yield_empty_hooks() {
        let resolved = resolve_hooks("a", &HookSources::default()).unwrap();
        assert!(resolved.is_empty());
    }
}
