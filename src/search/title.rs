//! Decide whether a resolved profile belongs to a titled player

use crate::core::types::PlayerProfile;

/// Name prefixes that mark a title when the declared field is empty
pub const TITLE_PREFIXES: [&str; 9] = ["GM", "IM", "FM", "CM", "NM", "WGM", "WIM", "WFM", "WCM"];

/// Which signal identified the title
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TitleSource {
    /// The service's explicit title field
    Declared(String),
    /// A recognised abbreviation leading the display name
    NamePrefix(&'static str),
}

/// Classify a profile, preferring the declared title over the name prefix
pub fn classify(profile: &PlayerProfile) -> Option<TitleSource> {
    if !profile.exists {
        return None;
    }

    if let Some(title) = profile.declared_title() {
        return Some(TitleSource::Declared(title.to_string()));
    }

    // Records that predate the title field carry it in the name
    TITLE_PREFIXES
        .iter()
        .copied()
        .find(|prefix| {
            profile
                .display_name
                .strip_prefix(prefix)
                .is_some_and(|rest| rest.starts_with(' '))
        })
        .map(TitleSource::NamePrefix)
}

pub fn is_titled(profile: &PlayerProfile) -> bool {
    classify(profile).is_some()
}
