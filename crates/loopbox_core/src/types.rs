use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Segment
// ---------------------------------------------------------------------------

/// One music clip placed on the timeline.
///
/// Segments live in an ordered `Vec`; a segment's position in that sequence
/// *is* its identity for all range computations, so there is no persisted
/// index field. Ids reference backend-owned resources and are opaque here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    pub music_version_id: String,
    pub music_id: String,
    pub duration_seconds: f64,
}

impl Segment {
    pub fn new(
        music_version_id: impl Into<String>,
        music_id: impl Into<String>,
        duration_seconds: f64,
    ) -> Self {
        Self {
            music_version_id: music_version_id.into(),
            music_id: music_id.into(),
            duration_seconds: duration_seconds.max(0.0),
        }
    }
}

// ---------------------------------------------------------------------------
// ImageGroup
// ---------------------------------------------------------------------------

/// An image overlay bound to a contiguous, inclusive range of segment
/// ordinals. Across a collection the ranges never overlap and stay within
/// `[0, segment_count - 1]`; the reconciliation functions in
/// [`crate::groups`] are the only way a collection is supposed to change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageGroup {
    pub image_version_id: String,
    pub image_id: String,
    pub segment_index_start: usize,
    pub segment_index_end: usize,
}

impl ImageGroup {
    pub fn new(
        image_version_id: impl Into<String>,
        image_id: impl Into<String>,
        segment_index_start: usize,
        segment_index_end: usize,
    ) -> Self {
        Self {
            image_version_id: image_version_id.into(),
            image_id: image_id.into(),
            segment_index_start,
            segment_index_end,
        }
    }

    /// Number of segments the group spans. Always at least 1 because the
    /// range is inclusive.
    pub fn span_len(&self) -> usize {
        self.segment_index_end - self.segment_index_start + 1
    }

    /// Whether the group's range covers the given segment ordinal.
    pub fn covers(&self, index: usize) -> bool {
        self.segment_index_start <= index && index <= self.segment_index_end
    }
}

// ---------------------------------------------------------------------------
// SegmentSpan
// ---------------------------------------------------------------------------

/// Cumulative-seconds boundaries of one segment, as computed by
/// [`crate::timing::segment_spans`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SegmentSpan {
    pub start: f64,
    pub end: f64,
}

// ---------------------------------------------------------------------------
// DragPayload
// ---------------------------------------------------------------------------

/// What the user is currently dragging.
///
/// Version variants carry the backend id of a catalog entry being dragged
/// *into* the timeline; segment/group variants carry the ordinal of an
/// existing timeline entity being reordered. Decoding normalizes raw
/// transfer data into this enum once, at the boundary ([`crate::drag`]);
/// everything downstream matches exhaustively over these four variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DragPayload {
    #[serde(rename = "music-version")]
    MusicVersion { id: String },

    #[serde(rename = "image-version")]
    ImageVersion { id: String },

    #[serde(rename = "music-segment")]
    MusicSegment { index: usize },

    #[serde(rename = "image-group")]
    ImageGroup { index: usize },
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
