use loopbox_core::types::{ImageGroup, Segment};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// VideoStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoStatus {
    #[default]
    Draft,
    Rendering,
    Ready,
    Failed,
}

impl VideoStatus {
    /// Whether polling can stop: everything except an outstanding render.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, VideoStatus::Rendering)
    }
}

// ---------------------------------------------------------------------------
// Video resource
// ---------------------------------------------------------------------------

/// Canonical server-side view of the video resource. Durations here are
/// authoritative; the client never computes them into a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoSnapshot {
    pub status: VideoStatus,
    pub total_duration_seconds: f64,
    pub file_id: Option<String>,
    pub segments: Vec<Segment>,
    pub image_groups: Vec<ImageGroup>,
}

/// Update request for the video resource. Derived fields (durations, ids
/// the server owns) are intentionally absent — the server reconstructs the
/// full resource and returns a fresh [`VideoSnapshot`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVideoRequest {
    pub segments: Vec<SegmentPatch>,
    pub image_groups: Vec<ImageGroupPatch>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentPatch {
    pub music_version_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageGroupPatch {
    pub image_version_id: String,
    pub segment_index_start: usize,
    pub segment_index_end: usize,
}

/// Response of the fire-and-forget render trigger; completion is observed
/// by polling the video resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderReceipt {
    pub status: VideoStatus,
    pub file_id: Option<String>,
}

// ---------------------------------------------------------------------------
// Version catalog
// ---------------------------------------------------------------------------

/// One generated music take. The duration ships with the catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MusicVersion {
    pub id: String,
    pub music_id: String,
    pub duration_seconds: f64,
}

/// One generated image. Images carry no spatial or temporal metadata;
/// a group's span comes entirely from user placement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageVersion {
    pub id: String,
    pub image_id: String,
}
