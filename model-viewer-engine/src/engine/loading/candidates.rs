use std::fmt;

use constants::path::PUBLIC_DIR;

/// Logical name of a model, as declared by a catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetReference(String);

impl AssetReference {
    /// Blank references count as absent.
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            None
        } else {
            Some(Self(raw))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Reference with a single leading slash removed.
    fn clean(&self) -> &str {
        self.0.strip_prefix('/').unwrap_or(&self.0)
    }
}

impl fmt::Display for AssetReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// User-supplied model file scoped to the current viewing session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalOverride(String);

impl LocalOverride {
    pub fn new(path: impl Into<String>) -> Option<Self> {
        let path = path.into();
        if path.trim().is_empty() {
            None
        } else {
            Some(Self(path))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn location(&self) -> CandidateLocation {
        CandidateLocation(self.0.clone())
    }
}

/// One concrete path handed to the asset loader.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CandidateLocation(String);

impl CandidateLocation {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CandidateLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Rules turning an [`AssetReference`] into ordered candidate locations.
///
/// With an explicit base directory only the literal reference and the
/// base-relative path are tried. Without one, the conventional deployment
/// layouts are searched in order of likelihood.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidatePolicy {
    base_dir: Option<String>,
}

impl CandidatePolicy {
    pub fn with_base_dir(base_dir: Option<String>) -> Self {
        let base_dir = base_dir
            .map(|dir| dir.trim_end_matches('/').to_string())
            .filter(|dir| !dir.is_empty());
        Self { base_dir }
    }

    pub fn base_dir(&self) -> Option<&str> {
        self.base_dir.as_deref()
    }

    /// Never empty: the reference as supplied always comes first.
    pub fn candidates(&self, reference: &AssetReference) -> Vec<CandidateLocation> {
        let clean = reference.clean();
        let raw = match &self.base_dir {
            Some(base) => vec![reference.as_str().to_string(), format!("{base}/{clean}")],
            None => vec![
                reference.as_str().to_string(),
                format!("/{clean}"),
                format!("./{clean}"),
                format!("{PUBLIC_DIR}/{clean}"),
                format!("/{PUBLIC_DIR}/{clean}"),
            ],
        };

        let mut unique: Vec<CandidateLocation> = Vec::with_capacity(raw.len());
        for path in raw {
            let location = CandidateLocation(path);
            if !unique.contains(&location) {
                unique.push(location);
            }
        }
        unique
    }
}
