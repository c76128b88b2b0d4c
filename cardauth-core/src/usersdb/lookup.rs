//! Uniqueness tracking for directory lookups.

use super::DirectoryError;

/// Collects candidate matches and decides whether exactly one distinct
/// value was seen.
///
/// Seeing the same value again is not ambiguity. Seeing a second distinct
/// value is, and no later input can undo that.
#[derive(Debug, Default)]
pub struct UniqueMatch {
    found: Option<String>,
    ambiguous: bool,
}

impl UniqueMatch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one matching candidate.
    pub fn observe(&mut self, candidate: String) {
        match &self.found {
            None => self.found = Some(candidate),
            Some(found) if *found != candidate => self.ambiguous = true,
            Some(_) => {}
        }
    }

    /// True once two distinct candidates have been observed.
    #[must_use]
    pub fn is_ambiguous(&self) -> bool {
        self.ambiguous
    }

    /// End the scan and produce the result.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::Ambiguous` if distinct candidates were seen,
    /// `DirectoryError::NotFound` if none were.
    pub fn finish(self) -> Result<String, DirectoryError> {
        if self.ambiguous {
            return Err(DirectoryError::Ambiguous);
        }
        self.found.ok_or(DirectoryError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_candidates_is_not_found() {
        assert!(matches!(
            UniqueMatch::new().finish(),
            Err(DirectoryError::NotFound)
        ));
    }

    #[test]
    fn test_single_candidate() {
        let mut matches = UniqueMatch::new();
        matches.observe("alice".into());
        assert!(!matches.is_ambiguous());
        assert_eq!(matches.finish().unwrap(), "alice");
    }

    #[test]
    fn test_repeated_candidate_is_not_ambiguous() {
        let mut matches = UniqueMatch::new();
        for _ in 0..3 {
            matches.observe("alice".into());
        }
        assert_eq!(matches.finish().unwrap(), "alice");
    }

    #[test]
    fn test_distinct_candidates_are_ambiguous() {
        let mut matches = UniqueMatch::new();
        matches.observe("alice".into());
        matches.observe("carol".into());
        assert!(matches.is_ambiguous());
        matches.observe("alice".into());
        assert!(matches!(matches.finish(), Err(DirectoryError::Ambiguous)));
    }

    #[test]
    fn test_match_is_case_sensitive() {
        let mut matches = UniqueMatch::new();
        matches.observe("alice".into());
        matches.observe("Alice".into());
        assert!(matches!(matches.finish(), Err(DirectoryError::Ambiguous)));
    }
}
