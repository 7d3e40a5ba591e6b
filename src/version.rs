use std::fmt;

/// Semantic version representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

/// Which semantic-version component to increment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BumpKind {
    Patch,
    Minor,
    Major,
}

impl Version {
    /// Create a new version
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Version {
            major,
            minor,
            patch,
        }
    }

    /// Parse an exact `x.y.z` version string.
    ///
    /// Returns `None` (never an error) on any mismatch: wrong number of
    /// components, non-digit characters, empty input, or leading zeros
    /// (`"01.2.3"` is rejected so that parse and format round-trip).
    /// Surrounding whitespace is trimmed first.
    pub fn parse(text: &str) -> Option<Self> {
        let trimmed = text.trim();

        let parts: Vec<&str> = trimmed.split('.').collect();
        if parts.len() != 3 {
            return None;
        }

        let major = parse_component(parts[0])?;
        let minor = parse_component(parts[1])?;
        let patch = parse_component(parts[2])?;

        Some(Version::new(major, minor, patch))
    }

    /// Bump version according to bump kind.
    ///
    /// Lower components reset to zero:
    /// - `Major`: major += 1, minor = 0, patch = 0
    /// - `Minor`: minor += 1, patch = 0
    /// - `Patch`: patch += 1
    ///
    /// A component already at `u32::MAX` saturates instead of overflowing.
    pub fn bump(&self, kind: BumpKind) -> Self {
        match kind {
            BumpKind::Major => Version::new(self.major.saturating_add(1), 0, 0),
            BumpKind::Minor => Version::new(self.major, self.minor.saturating_add(1), 0),
            BumpKind::Patch => Version::new(self.major, self.minor, self.patch.saturating_add(1)),
        }
    }
}

/// Parse one version component: all digits, no leading zeros.
fn parse_component(part: &str) -> Option<u32> {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if part.len() > 1 && part.starts_with('0') {
        return None;
    }
    part.parse::<u32>().ok()
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// The version target given on the command line: either a bump keyword
/// or an explicit `x.y.z` literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BumpTarget {
    Kind(BumpKind),
    Explicit(Version),
}

impl BumpTarget {
    /// Parse a target argument. `None` means the argument is neither a
    /// bump keyword nor a valid version literal.
    pub fn parse(text: &str) -> Option<Self> {
        match text.trim() {
            "patch" => Some(BumpTarget::Kind(BumpKind::Patch)),
            "minor" => Some(BumpTarget::Kind(BumpKind::Minor)),
            "major" => Some(BumpTarget::Kind(BumpKind::Major)),
            other => Version::parse(other).map(BumpTarget::Explicit),
        }
    }

    /// Resolve the target against the current version.
    pub fn resolve(&self, current: Version) -> Version {
        match self {
            BumpTarget::Kind(kind) => current.bump(*kind),
            BumpTarget::Explicit(version) => *version,
        }
    }
}
