use cone_viewer_protocol::{Color, SharedStr, ThemeToken};

/// Spectral types offered by the filter bar, in display order.
pub const CONE_TYPES: [&str; 3] = ["L", "M", "S"];

/// Meridians offered by the filter bar. The first one is the default.
pub const MERIDIANS: [&str; 4] = ["Temporal", "Nasal", "Superior", "Inferior"];

/// A cone photoreceptor's spectral class.
///
/// The backend stores the class as free text, so anything outside L/M/S is
/// kept verbatim in `Other` instead of being rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ConeType {
    L,
    M,
    S,
    Other(SharedStr),
}

impl ConeType {
    pub fn parse(label: &str) -> Self {
        match label {
            "L" => Self::L,
            "M" => Self::M,
            "S" => Self::S,
            other => Self::Other(SharedStr::from(other)),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::L => "L",
            Self::M => "M",
            Self::S => "S",
            Self::Other(s) => s,
        }
    }

    pub fn theme_token(&self) -> ThemeToken {
        match self {
            Self::L => ThemeToken::ConeL,
            Self::M => ThemeToken::ConeM,
            Self::S => ThemeToken::ConeS,
            Self::Other(_) => ThemeToken::ConeUnclassified,
        }
    }

    /// Position in [`CONE_TYPES`]; unknown types sort after the catalog.
    pub fn catalog_rank(label: &str) -> usize {
        CONE_TYPES
            .iter()
            .position(|t| *t == label)
            .unwrap_or(CONE_TYPES.len())
    }
}

/// Theme token for a spectral-type label. Total: unknown labels get
/// [`ThemeToken::ConeUnclassified`].
pub fn cone_token(label: &str) -> ThemeToken {
    ConeType::parse(label).theme_token()
}

/// Canonical marker colors. These do not change with the light/dark theme.
///
/// Returns `None` for tokens that are not cone tokens.
pub fn cone_color(token: ThemeToken) -> Option<Color> {
    match token {
        // CSS `red`, `green`, `blue`.
        ThemeToken::ConeL => Some(Color::rgb(1.0, 0.0, 0.0)),
        ThemeToken::ConeM => Some(Color::rgb(0.0, 128.0 / 255.0, 0.0)),
        ThemeToken::ConeS => Some(Color::rgb(0.0, 0.0, 1.0)),
        ThemeToken::ConeUnclassified => Some(Color::rgb(0.5, 0.5, 0.5)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_types_map_to_fixed_colors() {
        assert_eq!(cone_token("L"), ThemeToken::ConeL);
        assert_eq!(cone_token("M"), ThemeToken::ConeM);
        assert_eq!(cone_token("S"), ThemeToken::ConeS);
        assert_eq!(
            cone_color(ThemeToken::ConeL).map(|c| c.to_hex()).as_deref(),
            Some("#ff0000")
        );
        assert_eq!(
            cone_color(ThemeToken::ConeM).map(|c| c.to_hex()).as_deref(),
            Some("#008000")
        );
        assert_eq!(
            cone_color(ThemeToken::ConeS).map(|c| c.to_hex()).as_deref(),
            Some("#0000ff")
        );
    }

    #[test]
    fn unknown_type_gets_fallback_not_error() {
        assert_eq!(cone_token("rod"), ThemeToken::ConeUnclassified);
        assert_eq!(cone_token("l"), ThemeToken::ConeUnclassified);
        assert!(cone_color(cone_token("?")).is_some());
        assert_eq!(ConeType::parse("rod").label(), "rod");
    }

    #[test]
    fn non_cone_tokens_have_no_canonical_color() {
        assert!(cone_color(ThemeToken::Background).is_none());
    }

    #[test]
    fn catalog_rank_orders_unknown_last() {
        assert_eq!(ConeType::catalog_rank("L"), 0);
        assert_eq!(ConeType::catalog_rank("S"), 2);
        assert_eq!(ConeType::catalog_rank("X"), 3);
    }
}
