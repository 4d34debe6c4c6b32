use cone_viewer_protocol::{Patient, SharedStr};

use crate::model::{CONE_TYPES, ConeType, DisplayId, Filters, MERIDIANS};

/// Patient list as fetched once when the filter bar appears.
#[derive(Debug, Clone, PartialEq)]
pub enum PatientList {
    Loading,
    Loaded(Vec<Patient>),
    /// Shown to the user; not retried automatically.
    Failed(String),
}

/// Which composition the filter bar feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterMode {
    /// One dataset; eccentricity bounds are user-editable.
    #[default]
    Single,
    /// One sub-plot per eccentricity range; bounds come from the ranges.
    MultiRange,
}

/// Filter bar selection state.
///
/// Every mutator returns `Some(filters)` when the change should be emitted
/// to the parent: the value actually changed and the selection is complete.
#[derive(Debug, Clone)]
pub struct FilterBarState {
    patients: PatientList,
    display_ids: bool,
    mode: FilterMode,
    /// As shown in the subject picker: the display id when `display_ids`
    /// is on, otherwise the bare subject id.
    subject: Option<String>,
    meridian: String,
    /// Kept in catalog order so toggling is reversible.
    cone_types: Vec<SharedStr>,
    eccentricity_min: Option<f64>,
    eccentricity_max: Option<f64>,
}

impl FilterBarState {
    pub fn new(mode: FilterMode, display_ids: bool) -> Self {
        Self {
            patients: PatientList::Loading,
            display_ids,
            mode,
            subject: None,
            meridian: MERIDIANS[0].to_string(),
            cone_types: vec![SharedStr::from(CONE_TYPES[0])],
            eccentricity_min: None,
            eccentricity_max: None,
        }
    }

    pub fn patients_loaded(&mut self, result: Result<Vec<Patient>, String>) {
        self.patients = match result {
            Ok(patients) => PatientList::Loaded(patients),
            Err(e) => PatientList::Failed(e),
        };
    }

    pub fn patients(&self) -> &PatientList {
        &self.patients
    }

    /// User-visible patient-list error, if the fetch failed.
    pub fn error(&self) -> Option<&str> {
        match &self.patients {
            PatientList::Failed(e) => Some(e),
            _ => None,
        }
    }

    /// Values for the subject picker, deduplicated, in backend order.
    pub fn subject_options(&self) -> Vec<String> {
        let PatientList::Loaded(patients) = &self.patients else {
            return Vec::new();
        };
        let mut out: Vec<String> = Vec::with_capacity(patients.len());
        for p in patients {
            let value = if self.display_ids {
                p.display_id()
            } else {
                p.subject_id.clone()
            };
            if !out.contains(&value) {
                out.push(value);
            }
        }
        out
    }

    pub fn mode(&self) -> FilterMode {
        self.mode
    }

    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }

    pub fn meridian(&self) -> &str {
        &self.meridian
    }

    pub fn cone_types(&self) -> &[SharedStr] {
        &self.cone_types
    }

    pub fn is_cone_type_selected(&self, cone_type: &str) -> bool {
        self.cone_types.iter().any(|t| t == cone_type)
    }

    pub fn eccentricity_min(&self) -> Option<f64> {
        self.eccentricity_min
    }

    pub fn eccentricity_max(&self) -> Option<f64> {
        self.eccentricity_max
    }

    pub fn set_mode(&mut self, mode: FilterMode) -> Option<Filters> {
        if self.mode == mode {
            return None;
        }
        self.mode = mode;
        self.filters()
    }

    /// Select a subject by its picker value. An empty value clears the
    /// selection.
    pub fn set_subject(&mut self, subject: Option<String>) -> Option<Filters> {
        let subject = subject.filter(|s| !s.trim().is_empty());
        if self.subject == subject {
            return None;
        }
        self.subject = subject;
        self.filters()
    }

    pub fn set_meridian(&mut self, meridian: impl Into<String>) -> Option<Filters> {
        let meridian = meridian.into();
        if self.meridian == meridian {
            return None;
        }
        self.meridian = meridian;
        self.filters()
    }

    /// Add or remove a cone type. The set may become empty; emission is
    /// then suppressed until a type is selected again.
    pub fn toggle_cone_type(&mut self, cone_type: &str) -> Option<Filters> {
        if self.is_cone_type_selected(cone_type) {
            self.cone_types.retain(|t| t != cone_type);
        } else {
            self.cone_types.push(SharedStr::from(cone_type));
            self.cone_types
                .sort_by_key(|t| ConeType::catalog_rank(t.as_str()));
        }
        self.filters()
    }

    pub fn set_eccentricity_min(&mut self, min: Option<f64>) -> Option<Filters> {
        let min = min.filter(|v| v.is_finite());
        if self.eccentricity_min == min {
            return None;
        }
        self.eccentricity_min = min;
        self.bounds_changed()
    }

    pub fn set_eccentricity_max(&mut self, max: Option<f64>) -> Option<Filters> {
        let max = max.filter(|v| v.is_finite());
        if self.eccentricity_max == max {
            return None;
        }
        self.eccentricity_max = max;
        self.bounds_changed()
    }

    fn bounds_changed(&self) -> Option<Filters> {
        match self.mode {
            FilterMode::Single => self.filters(),
            // Bounds do not participate in multi-range filters.
            FilterMode::MultiRange => None,
        }
    }

    /// The subject currently selected, resolved to subject id + eye.
    pub fn display_id(&self) -> Option<DisplayId> {
        let shown = self.subject.as_deref()?;
        if !self.display_ids {
            return Some(DisplayId::new(shown, None));
        }
        if let PatientList::Loaded(patients) = &self.patients
            && let Some(p) = patients.iter().find(|p| p.display_id() == shown)
        {
            return Some(DisplayId::new(p.subject_id.clone(), p.eye));
        }
        Some(DisplayId::parse(shown))
    }

    /// Normalized filters, or `None` while the selection is incomplete.
    pub fn filters(&self) -> Option<Filters> {
        let id = self.display_id()?;
        let filters = Filters::new(id.subject_id(), &self.meridian, self.cone_types.clone()).ok()?;
        Some(match self.mode {
            FilterMode::Single => {
                filters.with_eccentricity(self.eccentricity_min, self.eccentricity_max)
            }
            FilterMode::MultiRange => filters,
        })
    }

    pub fn can_download(&self) -> bool {
        self.subject.is_some() && !self.cone_types.is_empty()
    }

    /// "Download will include: ..." line shown under the filter bar.
    pub fn download_summary(&self) -> Option<String> {
        let shown = self.subject.as_deref()?;
        let types: Vec<&str> = self.cone_types.iter().map(SharedStr::as_str).collect();
        let mut line = format!(
            "Download will include: {shown} | {} | {} cones",
            self.meridian,
            types.join(", ")
        );
        if self.mode == FilterMode::Single {
            if let Some(min) = self.eccentricity_min {
                line.push_str(&format!(" | Eccentricity: {min}°"));
            }
            if let Some(max) = self.eccentricity_max {
                line.push_str(&format!(" - {max}°"));
            }
        }
        Some(line)
    }
}
