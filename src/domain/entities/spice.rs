//! Spice entity and its status flags.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier assigned to a spice document by the remote store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpiceId(String);

impl SpiceId {
    /// Creates an id, rejecting the empty string.
    ///
    /// An empty id marks a spice that has not been created yet, so it never
    /// makes a valid `SpiceId`.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        if value.is_empty() {
            None
        } else {
            Some(Self(value))
        }
    }

    /// Returns id as string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SpiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One of the three independent stock flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusFlag {
    /// Nothing left.
    OutOfStock,
    /// Almost gone.
    RunningLow,
    /// A spare jar is on the shelf.
    HaveExtra,
}

impl StatusFlag {
    /// Badge display order.
    pub const ALL: [Self; 3] = [Self::OutOfStock, Self::RunningLow, Self::HaveExtra];

    /// Badge text.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::OutOfStock => "Out of stock",
            Self::RunningLow => "Running low",
            Self::HaveExtra => "Have extra",
        }
    }

    /// Emoji shown after the badge text when enabled.
    #[must_use]
    pub const fn emoji(self) -> &'static str {
        match self {
            Self::OutOfStock => "😡",
            Self::RunningLow => "😯",
            Self::HaveExtra => "😎",
        }
    }

    /// Label of the toggle in the edit surface.
    #[must_use]
    pub const fn question(self) -> &'static str {
        match self {
            Self::OutOfStock => "Out of stock?",
            Self::RunningLow => "Running low?",
            Self::HaveExtra => "Have extra?",
        }
    }
}

impl fmt::Display for StatusFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Document body of a spice, everything except its id.
///
/// Serialized with the field names the collection uses.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpiceFields {
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Free-text note, may be empty.
    #[serde(default)]
    pub note: String,
    /// A spare jar is on the shelf.
    #[serde(default)]
    pub have_extra: bool,
    /// Almost gone.
    #[serde(default)]
    pub running_low: bool,
    /// Nothing left.
    #[serde(default)]
    pub out_of_stock: bool,
}

impl SpiceFields {
    /// Creates fields with the given name and everything else blank.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Sets the note.
    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }

    /// Sets a flag.
    #[must_use]
    pub fn with_flag(mut self, flag: StatusFlag, value: bool) -> Self {
        self.set_flag(flag, value);
        self
    }

    /// Returns flag value.
    #[must_use]
    pub const fn flag(&self, flag: StatusFlag) -> bool {
        match flag {
            StatusFlag::OutOfStock => self.out_of_stock,
            StatusFlag::RunningLow => self.running_low,
            StatusFlag::HaveExtra => self.have_extra,
        }
    }

    /// Sets flag value.
    pub fn set_flag(&mut self, flag: StatusFlag, value: bool) {
        match flag {
            StatusFlag::OutOfStock => self.out_of_stock = value,
            StatusFlag::RunningLow => self.running_low = value,
            StatusFlag::HaveExtra => self.have_extra = value,
        }
    }

    /// Flips flag value.
    pub fn toggle_flag(&mut self, flag: StatusFlag) {
        self.set_flag(flag, !self.flag(flag));
    }

    /// Flags that are set, in badge order.
    #[must_use]
    pub fn badges(&self) -> Vec<StatusFlag> {
        StatusFlag::ALL
            .into_iter()
            .filter(|flag| self.flag(*flag))
            .collect()
    }
}

/// A spice as stored in the remote collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spice {
    id: SpiceId,
    fields: SpiceFields,
}

impl Spice {
    /// Creates spice from id and document body.
    #[must_use]
    pub const fn new(id: SpiceId, fields: SpiceFields) -> Self {
        Self { id, fields }
    }

    /// Returns store-assigned id.
    #[must_use]
    pub const fn id(&self) -> &SpiceId {
        &self.id
    }

    /// Returns document body.
    #[must_use]
    pub const fn fields(&self) -> &SpiceFields {
        &self.fields
    }

    /// Returns name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.fields.name
    }

    /// Returns note.
    #[must_use]
    pub fn note(&self) -> &str {
        &self.fields.note
    }

    /// Returns set flags in badge order.
    #[must_use]
    pub fn badges(&self) -> Vec<StatusFlag> {
        self.fields.badges()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_id_is_rejected() {
        assert!(SpiceId::new("").is_none());
        assert_eq!(SpiceId::new("a1").map(|id| id.to_string()), Some("a1".into()));
    }

    #[test]
    fn test_badges_follow_fixed_order() {
        let fields = SpiceFields::named("Saffron")
            .with_flag(StatusFlag::HaveExtra, true)
            .with_flag(StatusFlag::OutOfStock, true);

        assert_eq!(
            fields.badges(),
            vec![StatusFlag::OutOfStock, StatusFlag::HaveExtra]
        );
    }

    #[test]
    fn test_running_low_only_shows_one_badge() {
        let fields = SpiceFields::named("Cumin").with_flag(StatusFlag::RunningLow, true);
        assert_eq!(fields.badges(), vec![StatusFlag::RunningLow]);
        assert_eq!(fields.badges()[0].label(), "Running low");
    }

    #[test]
    fn test_contradictory_flags_are_allowed() {
        let mut fields = SpiceFields::named("Sumac");
        fields.set_flag(StatusFlag::OutOfStock, true);
        fields.set_flag(StatusFlag::HaveExtra, true);

        assert!(fields.out_of_stock);
        assert!(fields.have_extra);
    }

    #[test]
    fn test_fields_use_collection_field_names() {
        let fields = SpiceFields::named("Paprika").with_flag(StatusFlag::HaveExtra, true);
        let json = serde_json::to_value(&fields).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "name": "Paprika",
                "note": "",
                "haveExtra": true,
                "runningLow": false,
                "outOfStock": false,
            })
        );
    }

    #[test]
    fn test_missing_fields_default() {
        let fields: SpiceFields = serde_json::from_str(r#"{"name":"Mace"}"#).unwrap();
        assert_eq!(fields, SpiceFields::named("Mace"));
    }
}
