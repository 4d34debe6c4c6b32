use cone_viewer_protocol::Eye;

/// A subject id as shown to the user, optionally carrying a one-letter eye
/// suffix (`S001R`, `S001L`).
///
/// API calls always take the bare subject id; the suffixed form is only for
/// display and export file naming.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DisplayId {
    subject_id: String,
    eye: Option<Eye>,
}

impl DisplayId {
    pub fn new(subject_id: impl Into<String>, eye: Option<Eye>) -> Self {
        Self {
            subject_id: subject_id.into(),
            eye,
        }
    }

    /// Split a display identifier into subject id and eye.
    ///
    /// A trailing `R`/`L` is treated as the eye suffix as long as something
    /// remains in front of it; an id without a suffix parses to itself.
    pub fn parse(display: &str) -> Self {
        let display = display.trim();
        let mut chars = display.chars();
        if let Some(last) = chars.next_back()
            && let Some(eye) = Eye::from_suffix(last)
            && !chars.as_str().is_empty()
        {
            return Self::new(chars.as_str(), Some(eye));
        }
        Self::new(display, None)
    }

    pub fn subject_id(&self) -> &str {
        &self.subject_id
    }

    pub fn eye(&self) -> Option<Eye> {
        self.eye
    }
}

impl std::fmt::Display for DisplayId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.eye {
            Some(eye) => write!(f, "{}{}", self.subject_id, eye.suffix()),
            None => write!(f, "{}", self.subject_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_right_eye_suffix() {
        let id = DisplayId::parse("S001R");
        assert_eq!(id.subject_id(), "S001");
        assert_eq!(id.eye(), Some(Eye::Right));
        assert_eq!(id.to_string(), "S001R");
    }

    #[test]
    fn strips_left_eye_suffix() {
        let id = DisplayId::parse("S042L");
        assert_eq!(id.subject_id(), "S042");
        assert_eq!(id.eye(), Some(Eye::Left));
    }

    #[test]
    fn bare_id_is_unchanged() {
        let id = DisplayId::parse("S001");
        assert_eq!(id.subject_id(), "S001");
        assert_eq!(id.eye(), None);
        assert_eq!(id.to_string(), "S001");
    }

    #[test]
    fn lone_suffix_letter_is_a_subject() {
        assert_eq!(DisplayId::parse("R").subject_id(), "R");
        assert_eq!(DisplayId::parse("").subject_id(), "");
    }
}
