use super::MediaDescriptor;

/// Suppresses records that only differ from the last admitted one by position.
#[derive(Debug, Default, Clone)]
pub struct ChangeGate {
    last: Option<MediaDescriptor>,
}

impl ChangeGate {
    /// Admit `candidate` if it is the first record or its content changed.
    ///
    /// Admitted records become the new comparison baseline.
    pub fn admit(&mut self, candidate: &MediaDescriptor) -> bool {
        if self
            .last
            .as_ref()
            .is_some_and(|last| last.same_content(candidate))
        {
            return false;
        }

        self.last = Some(candidate.clone());
        true
    }

    /// Last admitted record
    pub fn last(&self) -> Option<&MediaDescriptor> {
        self.last.as_ref()
    }

    /// Forget the baseline so the next record is always admitted
    pub fn reset(&mut self) {
        self.last = None;
    }
}
