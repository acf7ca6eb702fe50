//! Time/index arithmetic over the segment sequence.
//!
//! All inputs here come straight from pointer-position math and can
//! transiently go negative or past the end of the timeline, so every
//! function clamps rather than panicking.

use crate::types::{ImageGroup, Segment, SegmentSpan};

/// Total timeline duration in seconds. Zero for an empty sequence.
pub fn total_duration(segments: &[Segment]) -> f64 {
    segments.iter().map(|s| s.duration_seconds).sum()
}

/// Cumulative-sum boundaries for each segment: `spans[0].start == 0` and
/// `spans[i].start == spans[i - 1].end`.
pub fn segment_spans(segments: &[Segment]) -> Vec<SegmentSpan> {
    let mut spans = Vec::with_capacity(segments.len());
    let mut cursor = 0.0;
    for seg in segments {
        let end = cursor + seg.duration_seconds;
        spans.push(SegmentSpan { start: cursor, end });
        cursor = end;
    }
    spans
}

/// Ordinal position where an item dropped at time `t` should be inserted.
///
/// Walks the segments accumulating duration and returns the first index
/// whose midpoint exceeds `t`; past the last midpoint the drop appends.
/// The midpoint tie-break makes a drop in the first half of a segment land
/// before it and a drop in the second half land after it, so the item ends
/// up at the nearest edge instead of always after the segment under the
/// pointer.
pub fn insert_index_by_time(segments: &[Segment], t: f64) -> usize {
    let mut cursor = 0.0;
    for (i, seg) in segments.iter().enumerate() {
        if t < cursor + seg.duration_seconds / 2.0 {
            return i;
        }
        cursor += seg.duration_seconds;
    }
    segments.len()
}

/// Index of the segment that contains time `t`.
///
/// Unlike [`insert_index_by_time`] this compares against segment ends, not
/// midpoints. Past the last segment the result clamps to the last valid
/// index; an empty sequence yields 0.
pub fn segment_index_by_time(segments: &[Segment], t: f64) -> usize {
    let mut cursor = 0.0;
    for (i, seg) in segments.iter().enumerate() {
        cursor += seg.duration_seconds;
        if t < cursor {
            return i;
        }
    }
    segments.len().saturating_sub(1)
}

/// Percentage-of-total offset of the start of ordinal `index`, for visual
/// placement of an insertion preview. Returns 0 when `total <= 0`; `index`
/// is clamped to `[0, segments.len()]`.
pub fn insert_offset_percent(segments: &[Segment], total: f64, index: usize) -> f64 {
    if total <= 0.0 {
        return 0.0;
    }
    let index = index.min(segments.len());
    let offset: f64 = segments[..index].iter().map(|s| s.duration_seconds).sum();
    offset / total * 100.0
}

/// Summed duration of the segments an image group spans, with the group's
/// range clamped into the segment sequence. Zero for an empty sequence or
/// an absent group.
pub fn group_duration(segments: &[Segment], group: Option<&ImageGroup>) -> f64 {
    let Some(group) = group else { return 0.0 };
    if segments.is_empty() {
        return 0.0;
    }
    let start = group.segment_index_start.min(segments.len() - 1);
    let end = group.segment_index_end.min(segments.len() - 1);
    segments[start..=end].iter().map(|s| s.duration_seconds).sum()
}

/// Start offset in seconds of the first segment an image group spans,
/// clamped the same way as [`group_duration`].
pub fn group_start_offset(segments: &[Segment], group: Option<&ImageGroup>) -> f64 {
    let Some(group) = group else { return 0.0 };
    if segments.is_empty() {
        return 0.0;
    }
    let start = group.segment_index_start.min(segments.len() - 1);
    segments[..start].iter().map(|s| s.duration_seconds).sum()
}
