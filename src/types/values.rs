use crate::schema::{DataType, TaskProperty};
use crate::symbolic::SymbolicName;
use crate::{Error, Result, util};

use chrono::{DateTime, Utc};

use std::collections::BTreeMap;
use std::fmt;

/// One typed value of a task property.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PropertyValue {
    /// Used for both [`DataType::String`] and [`DataType::TaskReference`].
    String(String),
    Boolean(bool),
    Integer(i64),
    /// Always held with millisecond precision.
    Timestamp(DateTime<Utc>),
}

impl PropertyValue {
    /// Returns true if this value is the representation of `data_type`.
    pub fn matches(&self, data_type: DataType) -> bool {
        matches!(
            (self, data_type),
            (PropertyValue::String(_), DataType::String | DataType::TaskReference)
                | (PropertyValue::Boolean(_), DataType::Boolean)
                | (PropertyValue::Integer(_), DataType::Integer)
                | (PropertyValue::Timestamp(_), DataType::Timestamp)
        )
    }

    /// String form written to task entries.
    pub fn encode(&self) -> String {
        match self {
            PropertyValue::String(s) => s.clone(),
            PropertyValue::Boolean(b) => b.to_string(),
            PropertyValue::Integer(i) => i.to_string(),
            PropertyValue::Timestamp(t) => util::encode_generalized_time(t),
        }
    }

    /// Coerce a raw entry value to the property's data type.
    pub(crate) fn decode(property: &TaskProperty, raw: &str) -> Result<Self> {
        let attribute = property.attribute_name();
        match property.data_type() {
            DataType::String | DataType::TaskReference => {
                Ok(PropertyValue::String(raw.to_string()))
            }
            DataType::Boolean => util::decode_boolean(raw)
                .map(PropertyValue::Boolean)
                .ok_or_else(|| Error::coercion(attribute, raw)),
            DataType::Integer => raw
                .trim()
                .parse::<i64>()
                .map(PropertyValue::Integer)
                .map_err(|_| Error::coercion(attribute, raw)),
            DataType::Timestamp => util::decode_generalized_time(raw)
                .map(PropertyValue::Timestamp)
                .ok_or_else(|| Error::coercion(attribute, raw)),
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::String(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::String(value)
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        PropertyValue::Boolean(value)
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        PropertyValue::Integer(value)
    }
}

impl From<DateTime<Utc>> for PropertyValue {
    fn from(value: DateTime<Utc>) -> Self {
        PropertyValue::Timestamp(util::normalize_timestamp(value))
    }
}

/// Values bound to a task's properties, keyed by attribute name.
///
/// An unset property reads as an empty slice. Setting a property never checks presence or
/// cardinality; those are enforced when a task is reconstructed or decoded.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PropertyValueMap {
    values: BTreeMap<&'static str, Vec<PropertyValue>>,
}

impl PropertyValueMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Values of a property; empty when unset.
    pub fn get(&self, property: &TaskProperty) -> &[PropertyValue] {
        self.values
            .get(property.attribute_name())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Replace all values of a property. An empty sequence unsets it.
    ///
    /// Fails with `TypeCoercionFailure` if a value does not match the property's data type.
    pub fn set<I>(&mut self, property: &TaskProperty, values: I) -> Result<()>
    where
        I: IntoIterator<Item = PropertyValue>,
    {
        let values: Vec<PropertyValue> = values
            .into_iter()
            .map(|v| match v {
                PropertyValue::Timestamp(t) => PropertyValue::from(t),
                other => other,
            })
            .collect();
        if let Some(bad) = values.iter().find(|v| !v.matches(property.data_type())) {
            return Err(Error::coercion(property.attribute_name(), bad.encode()));
        }
        self.put(property, values);
        Ok(())
    }

    pub fn clear(&mut self, property: &TaskProperty) {
        self.values.remove(property.attribute_name());
    }

    pub fn contains(&self, property: &TaskProperty) -> bool {
        self.values.contains_key(property.attribute_name())
    }

    /// Iterate set properties as `(attribute name, values)`.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &[PropertyValue])> {
        self.values.iter().map(|(k, v)| (*k, v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// All string values of a property (also used for task references).
    pub fn strings(&self, property: &TaskProperty) -> Vec<String> {
        self.get(property)
            .iter()
            .filter_map(|v| match v {
                PropertyValue::String(s) => Some(s.clone()),
                _ => None,
            })
            .collect()
    }

    /// First string value of a property.
    pub fn string(&self, property: &TaskProperty) -> Option<&str> {
        self.get(property).iter().find_map(|v| match v {
            PropertyValue::String(s) => Some(s.as_str()),
            _ => None,
        })
    }

    pub fn boolean(&self, property: &TaskProperty) -> Option<bool> {
        self.get(property).iter().find_map(|v| match v {
            PropertyValue::Boolean(b) => Some(*b),
            _ => None,
        })
    }

    pub fn integer(&self, property: &TaskProperty) -> Option<i64> {
        self.get(property).iter().find_map(|v| match v {
            PropertyValue::Integer(i) => Some(*i),
            _ => None,
        })
    }

    pub fn timestamp(&self, property: &TaskProperty) -> Option<DateTime<Utc>> {
        self.get(property).iter().find_map(|v| match v {
            PropertyValue::Timestamp(t) => Some(*t),
            _ => None,
        })
    }

    pub(crate) fn required_string(&self, property: &TaskProperty) -> Result<String> {
        self.string(property)
            .map(str::to_string)
            .ok_or_else(|| Error::missing_required(property.attribute_name()))
    }

    /// Resolve a closed-set value to its enumeration. Expects canonical (validated) input.
    pub(crate) fn enumeration<T: SymbolicName>(
        &self,
        property: &TaskProperty,
    ) -> Result<Option<T>> {
        let Some(raw) = self.string(property) else {
            return Ok(None);
        };
        T::from_identifier(raw)
            .map(Some)
            .map_err(|_| Error::invalid_enumeration(property.attribute_name(), raw))
    }

    pub(crate) fn put(&mut self, property: &TaskProperty, values: Vec<PropertyValue>) {
        if values.is_empty() {
            self.values.remove(property.attribute_name());
        } else {
            self.values.insert(property.attribute_name(), values);
        }
    }

    pub(crate) fn put_string(&mut self, property: &TaskProperty, value: Option<&str>) {
        let values = value
            .filter(|s| !s.is_empty())
            .map(|s| vec![PropertyValue::from(s)])
            .unwrap_or_default();
        self.put(property, values);
    }

    pub(crate) fn put_strings(&mut self, property: &TaskProperty, values: &[String]) {
        self.put(
            property,
            values.iter().map(|s| PropertyValue::from(s.as_str())).collect(),
        );
    }

    pub(crate) fn put_bool(&mut self, property: &TaskProperty, value: Option<bool>) {
        self.put(property, value.map(PropertyValue::from).into_iter().collect());
    }

    pub(crate) fn put_integer(&mut self, property: &TaskProperty, value: Option<i64>) {
        self.put(property, value.map(PropertyValue::from).into_iter().collect());
    }

    pub(crate) fn put_timestamp(&mut self, property: &TaskProperty, value: Option<DateTime<Utc>>) {
        self.put(property, value.map(PropertyValue::from).into_iter().collect());
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]
    #![allow(clippy::panic)]
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::schema::{ALERT_ON_START, DEPENDENCY_ID, SCHEDULED_START_TIME, TASK_ID};

    use chrono::TimeZone;

    #[test]
    fn unset_property_reads_as_empty() {
        let m = PropertyValueMap::new();
        assert!(m.get(&DEPENDENCY_ID).is_empty());
        assert!(m.strings(&DEPENDENCY_ID).is_empty());
        assert_eq!(m.string(&TASK_ID), None);
        assert_eq!(m.boolean(&ALERT_ON_START), None);
    }

    #[test]
    fn set_replaces_values_and_preserves_order() {
        let mut m = PropertyValueMap::new();
        m.set(&DEPENDENCY_ID, [PropertyValue::from("b"), PropertyValue::from("a")])
            .expect("ok");
        m.set(&DEPENDENCY_ID, ["c", "b", "a"].into_iter().map(PropertyValue::from))
            .expect("ok");
        assert_eq!(m.strings(&DEPENDENCY_ID), ["c", "b", "a"]);

        m.set(&DEPENDENCY_ID, Vec::new()).expect("ok");
        assert!(!m.contains(&DEPENDENCY_ID));
        assert!(m.is_empty());
    }

    #[test]
    fn set_rejects_values_of_the_wrong_type() {
        let mut m = PropertyValueMap::new();
        let err = m
            .set(&ALERT_ON_START, [PropertyValue::from("yes")])
            .expect_err("must fail");
        let Error::TypeCoercionFailure { attribute, value } = err else {
            panic!("unexpected error: {err:?}");
        };
        assert_eq!(attribute, "ds-task-alert-on-start");
        assert_eq!(value, "yes");
        assert!(m.get(&ALERT_ON_START).is_empty());
    }

    #[test]
    fn set_accepts_empty_value_for_any_property() {
        let mut m = PropertyValueMap::new();
        m.set(&TASK_ID, Vec::new()).expect("deferred validation");
    }

    #[test]
    fn decode_coerces_by_data_type() {
        let t = Utc.with_ymd_and_hms(2026, 10, 18, 9, 30, 0).unwrap();
        assert_eq!(
            PropertyValue::decode(&SCHEDULED_START_TIME, "20261018093000Z").unwrap(),
            PropertyValue::Timestamp(t)
        );
        assert_eq!(
            PropertyValue::decode(&ALERT_ON_START, "TRUE").unwrap(),
            PropertyValue::Boolean(true)
        );
        let err = PropertyValue::decode(&SCHEDULED_START_TIME, "tomorrow").expect_err("must fail");
        let Error::TypeCoercionFailure { .. } = err else {
            panic!("unexpected error: {err:?}");
        };
    }

    #[test]
    fn timestamps_are_truncated_to_millis() {
        let t = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()
            + chrono::Duration::microseconds(1_234_567);
        let PropertyValue::Timestamp(stored) = PropertyValue::from(t) else {
            panic!("unexpected variant");
        };
        assert_eq!(stored.timestamp_subsec_millis(), 234);
        assert_eq!(stored.timestamp_subsec_nanos(), 234_000_000);
    }
}
