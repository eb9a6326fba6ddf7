use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// `[registry/]repository[:tag][@digest]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageReference {
    registry: Option<String>,
    repository: String,
    tag: Option<String>,
    digest: Option<String>,
}

impl ImageReference {
    pub fn registry(&self) -> Option<&str> {
        self.registry.as_deref()
    }

    pub fn repository(&self) -> &str {
        &self.repository
    }

    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    pub fn digest(&self) -> Option<&str> {
        self.digest.as_deref()
    }

    /// Same reference with `tag`; digests are immutable and stay as they are.
    pub fn with_tag(&self, tag: &str) -> Self {
        if self.digest().is_some() || self.repository.is_empty() {
            return self.clone();
        }
        Self {
            tag: Some(tag.to_string()),
            ..self.clone()
        }
    }
}

fn is_registry(segment: &str) -> bool {
    segment.contains('.') || segment.contains(':') || segment == "localhost"
}

impl From<&str> for ImageReference {
    fn from(s: &str) -> Self {
        let (name, digest) = match s.split_once('@') {
            Some((name, digest)) => (name, Some(digest)),
            None => (s, None),
        };

        let (registry, path) = match name.split_once('/') {
            Some((first, rest)) if is_registry(first) => (Some(first.to_string()), rest),
            _ => (None, name),
        };

        // A colon after the last slash separates the tag
        let last_slash = path.rfind('/').map_or(0, |idx| idx + 1);
        let (repository, tag) = match path[last_slash..].rfind(':') {
            Some(idx) => {
                let split = last_slash + idx;
                (&path[..split], Some(&path[split + 1..]))
            }
            None => (path, None),
        };

        Self {
            registry,
            repository: repository.to_string(),
            tag: tag.map(str::to_string),
            digest: digest.map(str::to_string),
        }
    }
}

impl FromStr for ImageReference {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl fmt::Display for ImageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(registry) = &self.registry {
            write!(f, "{registry}/")?;
        }
        f.write_str(&self.repository)?;
        if let Some(tag) = &self.tag {
            write!(f, ":{tag}")?;
        }
        if let Some(digest) = &self.digest {
            write!(f, "@{digest}")?;
        }
        Ok(())
    }
}
