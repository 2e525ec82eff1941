//! Selection state: the current tool, its form fields, pending candidates.

use crate::events::FormFields;
use crate::inventory::ToolRecord;
use crate::search::Candidate;
use crate::types::ToolNumber;

/// At most one current tool, plus what the form shows for it.
#[derive(Debug, Default, Clone)]
pub struct Selection {
    current: Option<ToolNumber>,
    form: FormFields,
    pending: Vec<Candidate>,
}

impl Selection {
    /// Make `record` current and mirror it into the form.
    pub fn select(&mut self, record: &ToolRecord) -> &FormFields {
        self.current = Some(record.number);
        self.pending.clear();
        self.form = FormFields {
            number: record.number.to_string(),
            name: record.name.to_string(),
            location: record.location.to_string(),
            borrower: record
                .borrowed_by
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default(),
        };
        &self.form
    }

    /// Forget the current tool and blank every form field.
    pub fn clear(&mut self) {
        self.current = None;
        self.pending.clear();
        self.form = FormFields::default();
    }

    pub fn current(&self) -> Option<ToolNumber> {
        self.current
    }

    pub fn form(&self) -> &FormFields {
        &self.form
    }

    pub(crate) fn form_mut(&mut self) -> &mut FormFields {
        &mut self.form
    }

    /// Candidates awaiting an explicit pick.
    pub fn pending(&self) -> &[Candidate] {
        &self.pending
    }

    pub(crate) fn offer(&mut self, candidates: Vec<Candidate>) {
        self.pending = candidates;
    }

    pub fn is_offered(&self, number: ToolNumber) -> bool {
        self.pending.iter().any(|c| c.number == number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::Location;
    use crate::search::MatchKind;
    use crate::types::{Borrower, ToolName};

    fn record() -> ToolRecord {
        ToolRecord::new(
            ToolNumber::new(4).unwrap(),
            ToolName::new("Hoe").unwrap(),
            Location::Spatial { page: 0, x: 3, y: 9 },
        )
        .with_borrower(Borrower::new("Ana").unwrap())
    }

    #[test]
    fn test_select_populates_form() {
        let mut sel = Selection::default();
        let form = sel.select(&record()).clone();
        assert_eq!(form.number, "4");
        assert_eq!(form.name, "Hoe");
        assert_eq!(form.location, "(3, 9)");
        assert_eq!(form.borrower, "Ana");
        assert_eq!(sel.current(), ToolNumber::new(4));
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut sel = Selection::default();
        sel.select(&record());
        sel.offer(vec![Candidate {
            number: ToolNumber::new(4).unwrap(),
            name: "Hoe".to_string(),
            kind: MatchKind::Fuzzy,
            score: 0.8,
        }]);
        sel.clear();
        assert_eq!(sel.current(), None);
        assert!(sel.form().is_empty());
        assert!(sel.pending().is_empty());
    }
}
