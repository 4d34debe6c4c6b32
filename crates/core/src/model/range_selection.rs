use cone_viewer_protocol::EccentricityRange;

/// A multi-select over eccentricity ranges.
///
/// Membership is by `(min, max)`, so a range re-fetched from the backend
/// (a different value with the same bounds) is still recognised as
/// selected.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RangeSelection {
    selected: Vec<EccentricityRange>,
}

impl RangeSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, range: &EccentricityRange) -> bool {
        self.selected.iter().any(|r| r == range)
    }

    /// Add the range if absent, remove it if present.
    pub fn toggle(&mut self, range: &EccentricityRange) {
        if self.contains(range) {
            self.selected.retain(|r| r != range);
        } else {
            self.selected.push(range.clone());
        }
    }

    pub fn select_all(&mut self, available: &[EccentricityRange]) {
        self.selected = available.to_vec();
    }

    pub fn clear_all(&mut self) {
        self.selected.clear();
    }

    /// Drop selections that are no longer offered.
    pub fn retain_available(&mut self, available: &[EccentricityRange]) {
        self.selected.retain(|r| available.contains(r));
    }

    pub fn selected(&self) -> &[EccentricityRange] {
        &self.selected
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Button caption summarising the selection.
    pub fn summary_label(&self, available: usize) -> String {
        match self.selected.as_slice() {
            [] => "Select eccentricity ranges".to_string(),
            s if s.len() == available => "All ranges selected".to_string(),
            [only] => only.label.to_string(),
            s => format!("{} ranges selected", s.len()),
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
            EccentricityRange::new(10.0, 15.0, "10-15°"),
        ]
    }

    #[test]
    fn toggle_adds_once_then_removes() {
        let available = ranges();
        let mut sel = RangeSelection::new();
        sel.toggle(&available[1]);
        assert_eq!(sel.len(), 1);
        assert!(sel.contains(&available[1]));

        // Same bounds, different label: still the same range.
        sel.toggle(&EccentricityRange::new(5.0, 10.0, "relabelled"));
        assert!(sel.is_empty());
    }

    #[test]
    fn select_all_and_clear_all() {
        let available = ranges();
        let mut sel = RangeSelection::new();
        sel.select_all(&available);
        assert_eq!(sel.selected(), available.as_slice());
        sel.clear_all();
        assert!(sel.is_empty());
    }

    #[test]
    fn summary_label_cases() {
        let available = ranges();
        let mut sel = RangeSelection::new();
        assert_eq!(sel.summary_label(3), "Select eccentricity ranges");
        sel.toggle(&available[0]);
        assert_eq!(sel.summary_label(3), "0-5°");
        sel.toggle(&available[2]);
        assert_eq!(sel.summary_label(3), "2 ranges selected");
        sel.toggle(&available[1]);
        assert_eq!(sel.summary_label(3), "All ranges selected");
    }

    #[test]
    fn retain_available_prunes_stale_selection() {
        let available = ranges();
        let mut sel = RangeSelection::new();
        sel.select_all(&available);
        sel.retain_available(&available[..1]);
        assert_eq!(sel.len(), 1);
    }
}
