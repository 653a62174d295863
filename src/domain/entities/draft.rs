//! Local editing state for a single spice.

use super::spice::{Spice, SpiceFields, SpiceId, StatusFlag};

/// Title label used when creating a spice.
pub const NEW_SPICE_LABEL: &str = "New Spice";

/// Uncommitted copy of a spice being edited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpiceDraft {
    id: Option<SpiceId>,
    label: String,
    fields: SpiceFields,
}

/// Write produced by saving a draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveRequest {
    /// The draft had no id; the store assigns one.
    Create(SpiceFields),
    /// Overwrite the whole document at `id`.
    Replace {
        /// Document to overwrite.
        id: SpiceId,
        /// New document body.
        fields: SpiceFields,
    },
}

impl SpiceDraft {
    /// Draft for a spice that does not exist yet.
    #[must_use]
    pub fn new_spice() -> Self {
        Self {
            id: None,
            label: NEW_SPICE_LABEL.to_string(),
            fields: SpiceFields::default(),
        }
    }

    /// Draft pre-filled from an existing spice. The label freezes the
    /// current name.
    #[must_use]
    pub fn edit(spice: &Spice) -> Self {
        Self {
            id: Some(spice.id().clone()),
            label: spice.name().to_string(),
            fields: spice.fields().clone(),
        }
    }

    /// Returns id, `None` for a spice not created yet.
    #[must_use]
    pub const fn id(&self) -> Option<&SpiceId> {
        self.id.as_ref()
    }

    /// Returns title label frozen when editing began.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns edited fields.
    #[must_use]
    pub const fn fields(&self) -> &SpiceFields {
        &self.fields
    }

    /// Returns whether saving creates a document.
    #[must_use]
    pub const fn is_new(&self) -> bool {
        self.id.is_none()
    }

    /// Sets name.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.fields.name = name.into();
    }

    /// Sets note.
    pub fn set_note(&mut self, note: impl Into<String>) {
        self.fields.note = note.into();
    }

    /// Flips one flag.
    pub fn toggle(&mut self, flag: StatusFlag) {
        self.fields.toggle_flag(flag);
    }

    /// Drops the label and turns the draft into the write it stands for.
    #[must_use]
    pub fn into_save_request(self) -> SaveRequest {
        match self.id {
            Some(id) => SaveRequest::Replace {
                id,
                fields: self.fields,
            },
            None => SaveRequest::Create(self.fields),
        }
    }
}

impl SaveRequest {
    /// Document body to be written.
    #[must_use]
    pub const fn fields(&self) -> &SpiceFields {
        match self {
            Self::Create(fields) | Self::Replace { fields, .. } => fields,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn cumin() -> Spice {
        Spice::new(
            SpiceId::new("a1").unwrap(),
            SpiceFields::named("Cumin").with_flag(StatusFlag::RunningLow, true),
        )
    }

    #[test]
    fn test_new_draft_is_blank() {
        let draft = SpiceDraft::new_spice();

        assert!(draft.is_new());
        assert_eq!(draft.label(), "New Spice");
        assert_eq!(draft.fields(), &SpiceFields::default());
    }

    #[test]
    fn test_label_does_not_follow_name_edits() {
        let mut draft = SpiceDraft::edit(&cumin());
        draft.set_name("Black cumin");

        assert_eq!(draft.label(), "Cumin");
        assert_eq!(draft.fields().name, "Black cumin");
    }

    #[test_case(StatusFlag::OutOfStock ; "out_of_stock")]
    #[test_case(StatusFlag::RunningLow ; "running_low")]
    #[test_case(StatusFlag::HaveExtra ; "have_extra")]
    fn test_toggle_changes_only_one_flag(flag: StatusFlag) {
        let mut draft = SpiceDraft::edit(&cumin());
        let before = draft.fields().clone();

        draft.toggle(flag);

        for other in StatusFlag::ALL {
            if other == flag {
                assert_ne!(draft.fields().flag(other), before.flag(other));
            } else {
                assert_eq!(draft.fields().flag(other), before.flag(other));
            }
        }
        assert_eq!(draft.fields().name, before.name);
        assert_eq!(draft.fields().note, before.note);
    }

    #[test]
    fn test_new_draft_saves_as_create() {
        let mut draft = SpiceDraft::new_spice();
        draft.set_name("Paprika");
        draft.toggle(StatusFlag::HaveExtra);

        assert_eq!(
            draft.into_save_request(),
            SaveRequest::Create(SpiceFields::named("Paprika").with_flag(StatusFlag::HaveExtra, true))
        );
    }

    #[test]
    fn test_existing_draft_saves_as_replace() {
        let mut draft = SpiceDraft::edit(&cumin());
        draft.toggle(StatusFlag::RunningLow);
        draft.toggle(StatusFlag::OutOfStock);

        assert_eq!(
            draft.into_save_request(),
            SaveRequest::Replace {
                id: SpiceId::new("a1").unwrap(),
                fields: SpiceFields::named("Cumin").with_flag(StatusFlag::OutOfStock, true),
            }
        );
    }
}
