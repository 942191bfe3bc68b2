//! Last-seen tracking for one-way mirroring of external values.

/// Remembers the last value observed from outside an editor.
#[derive(Debug, Clone)]
pub struct Observed<T> {
    last: Option<T>,
}

impl<T> Default for Observed<T> {
    fn default() -> Self {
        Observed { last: None }
    }
}

impl<T: PartialEq + Clone> Observed<T> {
    /// Nothing observed yet; the first [`Observed::changed`] call reports a change
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a known value
    pub fn seeded(value: T) -> Self {
        Observed { last: Some(value) }
    }

    /// Record `value`, returning true when it differs from the previous observation.
    pub fn changed(&mut self, value: &T) -> bool {
        if self.last.as_ref() == Some(value) {
            return false;
        }
        self.last = Some(value.clone());
        true
    }

    pub fn last(&self) -> Option<&T> {
        self.last.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_observation_is_a_change() {
        let mut seen = Observed::new();
        assert!(seen.changed(&"a"));
        assert!(!seen.changed(&"a"));
        assert!(seen.changed(&"b"));
        assert_eq!(seen.last(), Some(&"b"));
    }

    #[test]
    fn test_seeded_value_is_not_a_change() {
        let mut seen = Observed::seeded(String::from("x"));
        assert!(!seen.changed(&String::from("x")));
        assert!(seen.changed(&String::new()));
    }
}
