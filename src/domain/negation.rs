//! Statement negation seam
//!
//! The tree stores every statement once, in its affirmative form. Whenever it
//! needs the "false" rendering (enumeration of the `no` branch) it asks a
//! [`Negation`] rule supplied by the caller.

/// Turns an affirmative statement into its negated rendering.
pub trait Negation {
    fn negate(&self, statement: &str) -> String;
}

impl<F> Negation for F
where
    F: Fn(&str) -> String,
{
    fn negate(&self, statement: &str) -> String {
        self(statement)
    }
}

/// Deterministic rule toggling a `NOT ` prefix.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotPrefix;

impl NotPrefix {
    pub const PREFIX: &'static str = "NOT ";
}

impl Negation for NotPrefix {
    fn negate(&self, statement: &str) -> String {
        match statement.strip_prefix(Self::PREFIX) {
            Some(affirmative) => affirmative.to_string(),
            None => format!("{}{}", Self::PREFIX, statement),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_prefix_toggles() {
        let rule = NotPrefix;
        assert_eq!(rule.negate("It meows"), "NOT It meows");
        assert_eq!(rule.negate(&rule.negate("It meows")), "It meows");
    }

    #[test]
    fn test_closure_is_a_negation() {
        let rule = |s: &str| format!("{s}?!");
        assert_eq!(rule.negate("It barks"), "It barks?!");
    }
}
