//! Pipeline stages a lead moves through and their display metadata.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::types::TypeConstraintError;

/// Ordered phases of the sales pipeline.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    NewBooking,
    DiscoveryComplete,
    AwaitingData,
    RecommendationCall,
    LetterPending,
    AwaitingSignature,
}

/// Presentation metadata attached to a stage.
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
pub struct StageDescriptor {
    pub id: PipelineStage,
    pub label: &'static str,
    pub color: &'static str,
}

impl PipelineStage {
    /// Every stage in pipeline order.
    pub const ALL: [PipelineStage; 6] = [
        PipelineStage::NewBooking,
        PipelineStage::DiscoveryComplete,
        PipelineStage::AwaitingData,
        PipelineStage::RecommendationCall,
        PipelineStage::LetterPending,
        PipelineStage::AwaitingSignature,
    ];

    /// Storage representation of the stage.
    pub const fn as_str(self) -> &'static str {
        match self {
            PipelineStage::NewBooking => "new_booking",
            PipelineStage::DiscoveryComplete => "discovery_complete",
            PipelineStage::AwaitingData => "awaiting_data",
            PipelineStage::RecommendationCall => "recommendation_call",
            PipelineStage::LetterPending => "letter_pending",
            PipelineStage::AwaitingSignature => "awaiting_signature",
        }
    }

    /// Label and color shown for the stage.
    pub const fn descriptor(self) -> StageDescriptor {
        let (label, color) = match self {
            PipelineStage::NewBooking => ("New Booking", "hsl(220, 90%, 56%)"),
            PipelineStage::DiscoveryComplete => ("Discovery Done", "hsl(270, 91%, 65%)"),
            PipelineStage::AwaitingData => ("Awaiting Data", "hsl(38, 92%, 50%)"),
            PipelineStage::RecommendationCall => ("Recommendation Call", "hsl(189, 94%, 43%)"),
            PipelineStage::LetterPending => ("Letter Pending", "hsl(330, 81%, 60%)"),
            PipelineStage::AwaitingSignature => ("Awaiting Signature", "hsl(0, 84%, 60%)"),
        };
        StageDescriptor {
            id: self,
            label,
            color,
        }
    }

    /// Position of the stage in the pipeline, starting at zero.
    pub fn position(self) -> usize {
        Self::ALL
            .iter()
            .position(|stage| *stage == self)
            .unwrap_or_default()
    }

    /// Human readable form used in notifications, e.g. `awaiting data`.
    pub fn humanized(self) -> String {
        self.as_str().replace('_', " ")
    }
}

impl Display for PipelineStage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PipelineStage {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|stage| stage.as_str() == s)
            .ok_or_else(|| TypeConstraintError::InvalidValue(format!("unknown stage `{s}`")))
    }
}

impl TryFrom<String> for PipelineStage {
    type Error = TypeConstraintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
