//! In-memory directory entry shape that tasks encode to and decode from.

/// Name of the attribute holding the entry's object classes.
pub const OBJECT_CLASS_ATTRIBUTE: &str = "objectClass";

/// One attribute of an [`Entry`]: a name and its ordered values.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Attribute {
    pub name: String,
    pub values: Vec<String>,
}

/// A directory entry: a DN plus attributes.
///
/// Attribute names are matched case-insensitively; attribute and value order are preserved as
/// inserted. An attribute with no values is never stored.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Entry {
    dn: String,
    attributes: Vec<Attribute>,
}

impl Entry {
    pub fn new(dn: impl Into<String>) -> Self {
        Self {
            dn: dn.into(),
            attributes: Vec::new(),
        }
    }

    pub fn dn(&self) -> &str {
        &self.dn
    }

    /// Iterate attributes in insertion order.
    pub fn attributes(&self) -> impl Iterator<Item = &Attribute> {
        self.attributes.iter()
    }

    /// Returns true if the attribute exists (it then has at least one value).
    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Values of an attribute; empty when absent.
    pub fn values(&self, name: &str) -> &[String] {
        match self.position(name) {
            Some(idx) => &self.attributes[idx].values,
            None => &[],
        }
    }

    pub fn first_value(&self, name: &str) -> Option<&str> {
        self.values(name).first().map(String::as_str)
    }

    /// Append one value, creating the attribute if needed.
    pub fn add_value(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.position(name) {
            Some(idx) => self.attributes[idx].values.push(value),
            None => self.attributes.push(Attribute {
                name: name.to_string(),
                values: vec![value],
            }),
        }
    }

    /// Replace all values of an attribute. An empty iterator removes the attribute.
    pub fn set_values<I, S>(&mut self, name: &str, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values: Vec<String> = values.into_iter().map(Into::into).collect();
        match (self.position(name), values.is_empty()) {
            (Some(idx), true) => {
                self.attributes.remove(idx);
            }
            (Some(idx), false) => self.attributes[idx].values = values,
            (None, true) => {}
            (None, false) => self.attributes.push(Attribute {
                name: name.to_string(),
                values,
            }),
        }
    }

    /// Remove an attribute, returning its values.
    pub fn remove(&mut self, name: &str) -> Option<Vec<String>> {
        let idx = self.position(name)?;
        Some(self.attributes.remove(idx).values)
    }

    pub fn object_classes(&self) -> &[String] {
        self.values(OBJECT_CLASS_ATTRIBUTE)
    }

    pub fn has_object_class(&self, object_class: &str) -> bool {
        self.object_classes()
            .iter()
            .any(|oc| oc.eq_ignore_ascii_case(object_class))
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.attributes
            .iter()
            .position(|a| a.name.eq_ignore_ascii_case(name))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]
    #![allow(clippy::panic)]
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn lookup_is_case_insensitive_and_order_preserving() {
        let mut e = Entry::new("cn=x");
        e.add_value("ds-task-dependency-id", "b");
        e.add_value("DS-TASK-DEPENDENCY-ID", "a");
        assert_eq!(e.values("Ds-Task-Dependency-Id"), ["b", "a"]);
        assert_eq!(e.first_value("ds-task-dependency-id"), Some("b"));
        assert_eq!(e.attributes().count(), 1);
    }

    #[test]
    fn absent_attribute_has_no_values() {
        let e = Entry::new("cn=x");
        assert!(e.values("missing").is_empty());
        assert_eq!(e.first_value("missing"), None);
        assert!(!e.contains("missing"));
    }

    #[test]
    fn set_values_with_empty_input_removes_attribute() {
        let mut e = Entry::new("cn=x");
        e.set_values("a", ["1", "2"]);
        assert_eq!(e.values("a"), ["1", "2"]);
        e.set_values("A", Vec::<String>::new());
        assert!(!e.contains("a"));
    }

    #[test]
    fn object_class_check_ignores_case() {
        let mut e = Entry::new("cn=x");
        e.set_values(OBJECT_CLASS_ATTRIBUTE, ["top", "DS-Task"]);
        assert!(e.has_object_class("ds-task"));
        assert!(!e.has_object_class("ds-task-export"));
    }
}
