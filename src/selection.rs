use crate::domain::CollectionId;

/// One-shot reveal of the chart area: flips to `Revealed` on the first
/// non-empty selection and never reverts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Reveal {
    #[default]
    Hidden,
    Revealed,
}

impl Reveal {
    pub fn is_revealed(self) -> bool {
        matches!(self, Reveal::Revealed)
    }
}

/// What the user has picked: the primary dropdown choice, the independent
/// checklist, and the modality filter that only narrows the year chart.
#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    primary: Option<CollectionId>,
    checklist: Vec<CollectionId>,
    modality_filter: Option<String>,
    reveal: Reveal,
}

impl SelectionState {
    pub fn primary(&self) -> Option<&CollectionId> {
        self.primary.as_ref()
    }

    pub fn checklist(&self) -> &[CollectionId] {
        &self.checklist
    }

    pub fn modality_filter(&self) -> Option<&str> {
        self.modality_filter.as_deref()
    }

    pub fn reveal(&self) -> Reveal {
        self.reveal
    }

    pub fn is_checked(&self, id: &CollectionId) -> bool {
        self.checklist.contains(id)
    }

    /// Picking from the dropdown also checks the entry, as the original UI
    /// did, so the checklist always reflects everything being charted.
    pub fn set_primary(&mut self, id: CollectionId) {
        if !self.checklist.contains(&id) {
            self.checklist.push(id.clone());
        }
        self.primary = Some(id);
        self.reveal = Reveal::Revealed;
    }

    pub fn clear_primary(&mut self) {
        self.primary = None;
    }

    /// Toggle a checklist entry. Unchecking the entry that equals the
    /// primary selection clears the primary as well.
    pub fn toggle(&mut self, id: &CollectionId) {
        if let Some(pos) = self.checklist.iter().position(|entry| entry == id) {
            self.checklist.remove(pos);
            if self.primary.as_ref() == Some(id) {
                self.primary = None;
            }
        } else {
            self.checklist.push(id.clone());
            self.reveal = Reveal::Revealed;
        }
    }

    /// Empty the checklist. The primary selection is untouched.
    pub fn deselect_all(&mut self) {
        self.checklist.clear();
    }

    pub fn set_modality_filter(&mut self, modality: Option<String>) {
        self.modality_filter = modality.filter(|value| !value.is_empty());
    }

    /// Deduplicated union of the primary selection and the checklist,
    /// primary first. This is the set every fetch cycle runs over.
    pub fn effective_collections(&self) -> Vec<CollectionId> {
        let mut effective = Vec::new();
        if let Some(primary) = &self.primary {
            effective.push(primary.clone());
        }
        for entry in &self.checklist {
            if !effective.contains(entry) {
                effective.push(entry.clone());
            }
        }
        effective
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(code: &str) -> CollectionId {
        code.parse().unwrap()
    }

    #[test]
    fn reveal_is_one_shot() {
        let mut state = SelectionState::default();
        assert_eq!(state.reveal(), Reveal::Hidden);
        state.set_primary(id("TCGA-BRCA"));
        assert!(state.reveal().is_revealed());
        state.toggle(&id("TCGA-BRCA"));
        state.deselect_all();
        assert!(state.reveal().is_revealed());
    }

    #[test]
    fn unchecking_primary_clears_it() {
        let mut state = SelectionState::default();
        state.set_primary(id("TCGA-BRCA"));
        state.toggle(&id("TCGA-LUAD"));
        state.toggle(&id("TCGA-BRCA"));
        assert!(state.primary().is_none());
        assert_eq!(state.effective_collections(), vec![id("TCGA-LUAD")]);
    }

    #[test]
    fn effective_set_is_deduplicated_union() {
        let mut state = SelectionState::default();
        state.set_primary(id("TCGA-BRCA"));
        state.toggle(&id("TCGA-LUAD"));
        let effective = state.effective_collections();
        assert_eq!(effective, vec![id("TCGA-BRCA"), id("TCGA-LUAD")]);
    }
}
