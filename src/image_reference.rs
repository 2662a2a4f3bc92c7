use crate::error::HubError;
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

pub static DEFAULT_NAMESPACE: &str = "library";
pub static DEFAULT_TAG: &str = "latest";

// Namespace ends at the first slash, the tag starts at the first colon after it.
static IMAGE_REF_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(?P<namespace>[^/]*)/)?(?P<name>[^:]*)(?::(?P<tag>.*))?$")
        .expect("image reference pattern is valid")
});

/// A Docker Hub image reference of the form `namespace/name:tag`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    pub namespace: String,
    pub name: String,
    pub tag: String,
    pub show_tag: bool,
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.show_tag {
            write!(f, "{}/{}:{}", self.namespace, self.name, self.tag)
        } else {
            write!(f, "{}/{}", self.namespace, self.name)
        }
    }
}

impl ImageRef {
    /// Builds a reference from its parts. Empty namespace and tag fall back to
    /// `library` and `latest`.
    pub fn new(namespace: &str, name: &str, tag: &str) -> Result<Self, HubError> {
        if name.is_empty() {
            return Err(HubError::InvalidImageName(name.to_string()));
        }

        let namespace = match namespace {
            "" => DEFAULT_NAMESPACE,
            ns => ns,
        };
        let tag = match tag {
            "" => DEFAULT_TAG,
            t => t,
        };

        Ok(Self {
            namespace: namespace.to_string(),
            name: name.to_string(),
            tag: tag.to_string(),
            show_tag: true,
        })
    }

    pub fn parse(s: &str) -> Result<Self, HubError> {
        let invalid = || HubError::InvalidImageName(s.to_string());
        let caps = IMAGE_REF_PATTERN.captures(s).ok_or_else(invalid)?;

        let namespace = caps.name("namespace").map(|m| m.as_str());
        let name = caps.name("name").map_or("", |m| m.as_str());
        let tag = caps.name("tag").map(|m| m.as_str());

        // "/name"; "name/" leaves an empty name and is rejected below
        if namespace.is_some_and(str::is_empty) {
            return Err(invalid());
        }
        // "name:" and ":tag"
        if tag.is_some_and(|t| t.is_empty() || name.is_empty()) {
            return Err(invalid());
        }

        Self::new(namespace.unwrap_or(""), name, tag.unwrap_or(""))
            .map_err(|_| invalid())
    }

    /// `namespace/name`, the path segment Docker Hub uses for a repository.
    pub fn repository(&self) -> String {
        format!("{}/{}", self.namespace, self.name)
    }

    pub fn without_tag(&self) -> Self {
        Self {
            show_tag: false,
            ..self.clone()
        }
    }
}
