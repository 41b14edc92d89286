//! Flexible lookup of enumeration values by symbolic name.
//!
//! Every enumeration used in task entries (task state, failed dependency action, timestamp
//! format, security level) can be resolved from free-form input: matching ignores ASCII case,
//! treats `_` and `-` as interchangeable, and also accepts the name with all separators removed.
//! Both the identifier and the human-readable display name are accepted.
//!
//! Lookup keys are computed once per enumeration and stored in a [`NameTable`]; resolving a name
//! only folds the input's case.

use crate::{Error, Result};

use std::collections::HashMap;
use std::fmt;

/// An enumeration whose values have a stable identifier and a display name.
pub trait SymbolicName: Copy + Eq + fmt::Debug + Send + Sync + 'static {
    /// Name of the enumeration, used in error messages.
    const ENUMERATION: &'static str;

    /// Every value, in registration order.
    fn values() -> &'static [Self];

    /// Identifier written to task entries.
    fn identifier(self) -> &'static str;

    /// Human-readable name. Defaults to the identifier.
    fn display_name(self) -> &'static str {
        self.identifier()
    }

    /// The shared lookup table for this enumeration.
    fn name_table() -> &'static NameTable<Self>;

    /// Resolve a free-form name. Returns `None` when nothing matches.
    fn for_name(name: &str) -> Option<Self> {
        Self::name_table().resolve(name)
    }

    /// Strict lookup by exact identifier.
    fn from_identifier(identifier: &str) -> Result<Self> {
        Self::values()
            .iter()
            .copied()
            .find(|v| v.identifier() == identifier)
            .ok_or_else(|| Error::UnknownIdentifier {
                enumeration: Self::ENUMERATION,
                identifier: identifier.to_string(),
            })
    }
}

/// Precomputed map from normalized name to enumeration value.
#[derive(Clone, Debug)]
pub struct NameTable<T> {
    entries: HashMap<String, T>,
}

impl<T: SymbolicName> NameTable<T> {
    /// Build the table, failing if two distinct values share a lookup key.
    pub fn try_new(values: &[T]) -> Result<Self> {
        let mut entries = HashMap::<String, T>::new();
        for &value in values {
            for key in value_keys(value) {
                match entries.get(&key) {
                    Some(existing) if *existing != value => {
                        return Err(Error::invalid_input(format!(
                            "{}: lookup key {key:?} is shared by {} and {}",
                            T::ENUMERATION,
                            existing.identifier(),
                            value.identifier()
                        )));
                    }
                    Some(_) => {}
                    None => {
                        entries.insert(key, value);
                    }
                }
            }
        }
        Ok(Self { entries })
    }

    /// Build the table, keeping the first registered value when keys collide.
    pub(crate) fn build(values: &[T]) -> Self {
        let mut entries = HashMap::<String, T>::new();
        for &value in values {
            for key in value_keys(value) {
                if let Some(existing) = entries.get(&key) {
                    if *existing != value {
                        #[cfg(feature = "tracing")]
                        tracing::warn!(
                            enumeration = T::ENUMERATION,
                            %key,
                            kept = existing.identifier(),
                            shadowed = value.identifier(),
                            "enumeration lookup key collision"
                        );
                        debug_assert!(
                            false,
                            "{}: lookup key {key:?} collides",
                            T::ENUMERATION
                        );
                    }
                    continue;
                }
                entries.insert(key, value);
            }
        }
        Self { entries }
    }

    /// Resolve a name (case-insensitive, separator-insensitive).
    pub fn resolve(&self, name: &str) -> Option<T> {
        self.entries.get(&name.to_ascii_lowercase()).copied()
    }

    /// Number of distinct lookup keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the table has no keys.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Returns true if `candidate` names the same symbol as `canonical` under resolver rules.
pub(crate) fn names_match(candidate: &str, canonical: &str) -> bool {
    let candidate = candidate.to_ascii_lowercase();
    lookup_keys(canonical).iter().any(|k| *k == candidate)
}

fn value_keys<T: SymbolicName>(value: T) -> Vec<String> {
    let mut keys = lookup_keys(value.identifier());
    if value.display_name() != value.identifier() {
        keys.extend(lookup_keys(value.display_name()));
    }
    keys.sort();
    keys.dedup();
    keys
}

fn lookup_keys(name: &str) -> Vec<String> {
    let lower = name.to_ascii_lowercase();
    let mut keys = vec![
        lower.replace('_', "-"),
        lower.replace('-', "_"),
        lower.replace(['_', '-'], ""),
        lower,
    ];
    keys.sort();
    keys.dedup();
    keys
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]
    #![allow(clippy::panic)]
    #![allow(clippy::unwrap_used)]

    use super::*;

    use std::sync::LazyLock;

    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    enum Color {
        DarkRed,
        LightBlue,
    }

    impl SymbolicName for Color {
        const ENUMERATION: &'static str = "Color";

        fn values() -> &'static [Self] {
            &[Color::DarkRed, Color::LightBlue]
        }

        fn identifier(self) -> &'static str {
            match self {
                Color::DarkRed => "dark_red",
                Color::LightBlue => "light-blue",
            }
        }

        fn display_name(self) -> &'static str {
            match self {
                Color::DarkRed => "Crimson",
                Color::LightBlue => "light-blue",
            }
        }

        fn name_table() -> &'static NameTable<Self> {
            static TABLE: LazyLock<NameTable<Color>> =
                LazyLock::new(|| NameTable::build(Color::values()));
            &TABLE
        }
    }

    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    enum Clash {
        A,
        B,
    }

    impl SymbolicName for Clash {
        const ENUMERATION: &'static str = "Clash";

        fn values() -> &'static [Self] {
            &[Clash::A, Clash::B]
        }

        fn identifier(self) -> &'static str {
            match self {
                Clash::A => "foo_bar",
                Clash::B => "foobar",
            }
        }

        fn name_table() -> &'static NameTable<Self> {
            static TABLE: LazyLock<NameTable<Clash>> =
                LazyLock::new(|| NameTable::build(&[Clash::A]));
            &TABLE
        }
    }

    #[test]
    fn resolves_identifier_variants() {
        for input in [
            "dark_red", "DARK_RED", "Dark_Red", "dark-red", "DARK-RED", "darkred", "DARKRED",
        ] {
            assert_eq!(Color::for_name(input), Some(Color::DarkRed), "input={input}");
        }
        for input in ["light-blue", "light_blue", "LIGHT_BLUE", "lightblue"] {
            assert_eq!(Color::for_name(input), Some(Color::LightBlue), "input={input}");
        }
    }

    #[test]
    fn resolves_display_name_when_distinct() {
        assert_eq!(Color::for_name("crimson"), Some(Color::DarkRed));
        assert_eq!(Color::for_name("CRIMSON"), Some(Color::DarkRed));
    }

    #[test]
    fn unmatched_name_is_none() {
        assert_eq!(Color::for_name("undefined"), None);
        assert_eq!(Color::for_name(""), None);
        assert_eq!(Color::for_name("dark red"), None);
    }

    #[test]
    fn strict_identifier_lookup_is_exact() {
        assert_eq!(Color::from_identifier("dark_red").unwrap(), Color::DarkRed);
        let err = Color::from_identifier("DARK_RED").expect_err("must fail");
        let Error::UnknownIdentifier { enumeration, .. } = err else {
            panic!("unexpected error: {err:?}");
        };
        assert_eq!(enumeration, "Color");
    }

    #[test]
    fn try_new_reports_collisions() {
        let err = NameTable::try_new(Clash::values()).expect_err("must collide");
        let Error::InvalidInput { context } = err else {
            panic!("unexpected error: {err:?}");
        };
        assert!(context.contains("foobar"), "context={context}");
        assert_eq!(Clash::for_name("foo-bar"), Some(Clash::A));
    }

    #[test]
    fn names_match_follows_resolver_rules() {
        assert!(names_match("OBSCURE_SECRETS", "obscure-secrets"));
        assert!(names_match("obscuresecrets", "obscure-secrets"));
        assert!(!names_match("obscure secrets", "obscure-secrets"));
    }
}
