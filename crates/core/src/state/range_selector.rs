use cone_viewer_protocol::EccentricityRange;

use super::generation::{Generation, GenerationCounter};
use crate::model::RangeSelection;

/// A range list the caller should fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeFetch {
    pub generation: Generation,
    pub subject_id: String,
    pub meridian: String,
}

/// Multi-select dropdown over the eccentricity ranges of one
/// subject/meridian pair.
#[derive(Debug, Default)]
pub struct RangeSelectorState {
    inputs: Option<(String, String)>,
    available: Vec<EccentricityRange>,
    selection: RangeSelection,
    loading: bool,
    open: bool,
    generation: GenerationCounter,
}

impl RangeSelectorState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update the subject/meridian inputs.
    ///
    /// Returns the fetch to issue when both are set and changed. When either
    /// is missing the available list is cleared and any in-flight fetch is
    /// invalidated.
    pub fn set_inputs(
        &mut self,
        subject_id: Option<&str>,
        meridian: Option<&str>,
    ) -> Option<RangeFetch> {
        let inputs = match (subject_id, meridian) {
            (Some(s), Some(m)) if !s.is_empty() && !m.is_empty() => {
                Some((s.to_string(), m.to_string()))
            }
            _ => None,
        };
        if inputs == self.inputs {
            return None;
        }
        self.inputs = inputs;
        let generation = self.generation.advance();
        match &self.inputs {
            Some((subject_id, meridian)) => {
                self.loading = true;
                Some(RangeFetch {
                    generation,
                    subject_id: subject_id.clone(),
                    meridian: meridian.clone(),
                })
            }
            None => {
                self.available.clear();
                self.selection.clear_all();
                self.loading = false;
                self.open = false;
                None
            }
        }
    }

    /// Apply a fetch outcome. A failure leaves an empty list; it is not
    /// reported upward. Returns `false` when the result was stale.
    pub fn ranges_loaded(
        &mut self,
        generation: Generation,
        result: Result<Vec<EccentricityRange>, String>,
    ) -> bool {
        if !self.generation.is_current(generation) {
            return false;
        }
        self.available = result.unwrap_or_default();
        self.selection.retain_available(&self.available);
        self.loading = false;
        if self.available.is_empty() {
            self.open = false;
        }
        true
    }

    pub fn available(&self) -> &[EccentricityRange] {
        &self.available
    }

    pub fn selection(&self) -> &RangeSelection {
        &self.selection
    }

    pub fn is_selected(&self, range: &EccentricityRange) -> bool {
        self.selection.contains(range)
    }

    pub fn toggle(&mut self, range: &EccentricityRange) {
        self.selection.toggle(range);
    }

    pub fn select_all(&mut self) {
        self.selection.select_all(&self.available);
    }

    pub fn clear_all(&mut self) {
        self.selection.clear_all();
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// The dropdown cannot be opened while loading or with nothing to pick.
    pub fn is_disabled(&self) -> bool {
        self.loading || self.available.is_empty()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn toggle_open(&mut self) {
        self.open = !self.open && !self.is_disabled();
    }

    pub fn button_label(&self) -> String {
        if self.loading {
            "Loading...".to_string()
        } else {
            self.selection.summary_label(self.available.len())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ranges() -> Vec<EccentricityRange> {
        vec![
            EccentricityRange::new(0.0, 5.0, "0-5°"),
            EccentricityRange::new(5.0, 10.0, "5-10°"),
        ]
    }

    #[test]
    fn fetches_only_with_both_inputs() {
        let mut sel = RangeSelectorState::new();
        assert!(sel.set_inputs(Some("S001"), None).is_none());
        let Some(fetch) = sel.set_inputs(Some("S001"), Some("Temporal")) else {
            unreachable!("both inputs set");
        };
        assert_eq!(fetch.subject_id, "S001");
        assert!(sel.is_loading());
        assert!(sel.is_disabled());
        assert_eq!(sel.button_label(), "Loading...");
        assert!(sel.ranges_loaded(fetch.generation, Ok(ranges())));
        assert_eq!(sel.available().len(), 2);
        assert!(!sel.is_disabled());
    }

    #[test]
    fn clearing_inputs_clears_list() {
        let mut sel = RangeSelectorState::new();
        let fetch = sel.set_inputs(Some("S001"), Some("Temporal"));
        if let Some(f) = fetch {
            sel.ranges_loaded(f.generation, Ok(ranges()));
        }
        sel.select_all();
        assert!(sel.set_inputs(None, Some("Temporal")).is_none());
        assert!(sel.available().is_empty());
        assert!(sel.selection().is_empty());
    }

    #[test]
    fn failure_yields_empty_list() {
        let mut sel = RangeSelectorState::new();
        let Some(fetch) = sel.set_inputs(Some("S001"), Some("Nasal")) else {
            unreachable!("both inputs set");
        };
        assert!(sel.ranges_loaded(fetch.generation, Err("HTTP 500".into())));
        assert!(sel.available().is_empty());
        assert!(!sel.is_loading());
        assert_eq!(sel.button_label(), "Select eccentricity ranges");
    }

    #[test]
    fn stale_result_is_dropped() {
        let mut sel = RangeSelectorState::new();
        let Some(old) = sel.set_inputs(Some("S001"), Some("Nasal")) else {
            unreachable!("both inputs set");
        };
        let Some(new) = sel.set_inputs(Some("S002"), Some("Nasal")) else {
            unreachable!("inputs changed");
        };
        assert!(!sel.ranges_loaded(old.generation, Ok(ranges())));
        assert!(sel.available().is_empty());
        assert!(sel.ranges_loaded(new.generation, Ok(ranges()[..1].to_vec())));
        assert_eq!(sel.available().len(), 1);
    }

    #[test]
    fn open_requires_ranges() {
        let mut sel = RangeSelectorState::new();
        sel.toggle_open();
        assert!(!sel.is_open());
        if let Some(f) = sel.set_inputs(Some("S001"), Some("Nasal")) {
            sel.ranges_loaded(f.generation, Ok(ranges()));
        }
        sel.toggle_open();
        assert!(sel.is_open());
        sel.toggle(&ranges()[1]);
        assert_eq!(sel.button_label(), "5-10°");
    }
}
