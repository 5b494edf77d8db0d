//! The fixed threat-label mapping shared with the inference firmware.
//!
//! Integer class labels 0-9 map positionally onto these names on both sides
//! of the training/inference boundary. The order here is the contract; the
//! firmware indexes its own label table with the classifier's argmax, so a
//! reorder on either side silently corrupts classification semantics.
//! Everything that needs the mapping goes through this enum: the trainer
//! validates class counts against [`NUM_CLASSES`], and the format converter
//! embeds [`label_names`] into the artifact metadata.

use serde::{Deserialize, Serialize};

/// Number of output classes the classifier predicts.
pub const NUM_CLASSES: usize = 10;

/// One of the ten categorical outcomes the classifier predicts.
///
/// Variant order is the on-wire ABI. Do not reorder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThreatLabel {
    Safe,
    Crowded,
    OpenNetwork,
    EvilTwinRisk,
    DeauthDetected,
    RogueAp,
    HighRisk,
    BatteryCritical,
    GestureCommand,
    LearningMode,
}

impl ThreatLabel {
    /// All labels in ABI order (index == integer class label).
    pub const ALL: [ThreatLabel; NUM_CLASSES] = [
        ThreatLabel::Safe,
        ThreatLabel::Crowded,
        ThreatLabel::OpenNetwork,
        ThreatLabel::EvilTwinRisk,
        ThreatLabel::DeauthDetected,
        ThreatLabel::RogueAp,
        ThreatLabel::HighRisk,
        ThreatLabel::BatteryCritical,
        ThreatLabel::GestureCommand,
        ThreatLabel::LearningMode,
    ];

    /// The firmware-facing name of this label.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            ThreatLabel::Safe => "SAFE",
            ThreatLabel::Crowded => "CROWDED",
            ThreatLabel::OpenNetwork => "OPEN_NETWORK",
            ThreatLabel::EvilTwinRisk => "EVIL_TWIN_RISK",
            ThreatLabel::DeauthDetected => "DEAUTH_DETECTED",
            ThreatLabel::RogueAp => "ROGUE_AP",
            ThreatLabel::HighRisk => "HIGH_RISK",
            ThreatLabel::BatteryCritical => "BATTERY_CRITICAL",
            ThreatLabel::GestureCommand => "GESTURE_COMMAND",
            ThreatLabel::LearningMode => "LEARNING_MODE",
        }
    }

    /// The integer class label of this variant.
    #[must_use]
    pub fn index(self) -> usize {
        Self::ALL
            .iter()
            .position(|&l| l == self)
            .expect("variant is in ALL")
    }

    /// Looks up the label for an integer class value.
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

/// Label names in ABI order, as embedded in artifact metadata.
#[must_use]
pub fn label_names() -> [&'static str; NUM_CLASSES] {
    let mut names = [""; NUM_CLASSES];
    for (i, label) in ThreatLabel::ALL.iter().enumerate() {
        names[i] = label.name();
    }
    names
}
