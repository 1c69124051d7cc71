/// Static emergency response steps for each known disaster type.
///
/// Lookups are exact and case-sensitive. Unknown labels resolve to a
/// single-step fallback so callers never need an error path.
use crate::alerts::DisasterType;

/// Shown when a label has no entry in the table.
pub const STEPS_NOT_AVAILABLE: &str = "Steps not available.";

/// Closing line displayed under every step list.
pub const ADVISORY: &str =
    "Remember: Always follow instructions from local authorities and emergency services.";

const WILDFIRE_STEPS: &[&str] = &[
    "Evacuate immediately if instructed.",
    "Cover your mouth and nose with a damp cloth.",
    "Stay informed through official channels.",
    "Pack emergency supplies and important documents.",
    "Follow designated evacuation routes.",
];

const EARTHQUAKE_STEPS: &[&str] = &[
    "Drop, cover, and hold on.",
    "Stay away from windows and exterior walls.",
    "After shaking stops, check for injuries and damage.",
    "Be prepared for aftershocks.",
    "Listen to emergency broadcasts.",
];

const FLOOD_STEPS: &[&str] = &[
    "Move to higher ground immediately.",
    "Avoid walking or driving through floodwaters.",
    "Stay informed about flood warnings and evacuation orders.",
    "Prepare emergency supplies.",
    "Turn off utilities if instructed.",
];

const FALLBACK: &[&str] = &[STEPS_NOT_AVAILABLE];

/// Ordered response steps for `label`, or `["Steps not available."]`.
pub fn response_steps(label: &str) -> &'static [&'static str] {
    match DisasterType::from_label(label) {
        Some(kind) => steps_for(kind),
        None => FALLBACK,
    }
}

/// Ordered response steps for a known disaster type.
pub fn steps_for(kind: DisasterType) -> &'static [&'static str] {
    match kind {
        DisasterType::Wildfire => WILDFIRE_STEPS,
        DisasterType::Earthquake => EARTHQUAKE_STEPS,
        DisasterType::Flood => FLOOD_STEPS,
    }
}

/// Steps prefixed with 1-based numbering, as rendered by the guide view.
pub fn numbered_steps(label: &str) -> Vec<String> {
    response_steps(label)
        .iter()
        .enumerate()
        .map(|(i, step)| format!("{}. {step}", i + 1))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wildfire_has_five_steps() {
        let steps = response_steps("Wildfire");
        assert_eq!(steps.len(), 5);
        assert_eq!(steps[0], "Evacuate immediately if instructed.");
    }

    #[test]
    fn every_known_type_has_five_steps() {
        for kind in DisasterType::ALL {
            assert_eq!(response_steps(kind.label()).len(), 5, "{kind}");
        }
    }

    #[test]
    fn unknown_type_falls_back() {
        assert_eq!(response_steps("Tornado"), ["Steps not available."]);
        assert_eq!(response_steps(""), ["Steps not available."]);
        assert_eq!(response_steps("wildfire"), ["Steps not available."]);
    }

    #[test]
    fn numbering_is_one_based() {
        let numbered = numbered_steps("Earthquake");
        assert_eq!(numbered[0], "1. Drop, cover, and hold on.");
        assert_eq!(numbered[4], "5. Listen to emergency broadcasts.");
    }
}
