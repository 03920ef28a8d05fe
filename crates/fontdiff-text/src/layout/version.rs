use core::ops::{Index, IndexMut};

/// Which of the two compared font versions a value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Version {
    Before,
    After,
}

impl Version {
    pub const ALL: [Version; 2] = [Version::Before, Version::After];
}

/// A pair of values, one per font version.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PerVersion<T> {
    pub before: T,
    pub after: T,
}

impl<T> PerVersion<T> {
    pub fn new(before: T, after: T) -> Self {
        Self { before, after }
    }

    /// Build both values with the same function.
    pub fn from_fn(mut f: impl FnMut(Version) -> T) -> Self {
        Self {
            before: f(Version::Before),
            after: f(Version::After),
        }
    }
}

impl<T> Index<Version> for PerVersion<T> {
    type Output = T;

    fn index(&self, version: Version) -> &T {
        match version {
            Version::Before => &self.before,
            Version::After => &self.after,
        }
    }
}

impl<T> IndexMut<Version> for PerVersion<T> {
    fn index_mut(&mut self, version: Version) -> &mut T {
        match version {
            Version::Before => &mut self.before,
            Version::After => &mut self.after,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indexes_by_version() {
        let mut pair = PerVersion::new(1, 2);
        assert_eq!(pair[Version::Before], 1);
        pair[Version::After] += 10;
        assert_eq!(pair.after, 12);
    }

    #[test]
    fn from_fn_visits_both_versions() {
        let pair = PerVersion::from_fn(|v| v == Version::After);
        assert!(!pair.before);
        assert!(pair.after);
    }
}
