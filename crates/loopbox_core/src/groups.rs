//! Image-group range reconciliation.
//!
//! Image groups bind an overlay to a contiguous, inclusive range of segment
//! ordinals, and across the collection no two ranges may overlap. Every
//! operation here re-validates from scratch, takes the collection by
//! reference, and returns a new collection on success — a rejected mutation
//! leaves the caller's draft untouched and carries a display-ready error.

use crate::error::{CoreError, Result};
use crate::types::ImageGroup;

/// Outcome of a single-index image drop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupInsert {
    /// The target segment is already covered by a group of the same image
    /// version; dropping onto your own range is idempotent.
    AlreadyCovered,
    /// The collection changed; contains the new group list.
    Updated(Vec<ImageGroup>),
}

/// Drop an image version onto a single segment ordinal.
///
/// Placement rules, in order:
/// - out-of-bounds target: error, collection unchanged
/// - target covered by a group of the same version: [`GroupInsert::AlreadyCovered`]
/// - target covered by a different version: error, never silently resolved
/// - adjacent group(s) of the same version: extend or bridge them
/// - otherwise: a new singleton group `[index, index]`
pub fn insert_image_at(
    groups: &[ImageGroup],
    image_version_id: &str,
    image_id: &str,
    index: usize,
    segment_count: usize,
) -> Result<GroupInsert> {
    if index >= segment_count {
        return Err(CoreError::IndexOutOfBounds {
            index,
            segment_count,
        });
    }

    if let Some(owner) = groups.iter().find(|g| g.covers(index)) {
        if owner.image_version_id == image_version_id {
            return Ok(GroupInsert::AlreadyCovered);
        }
        return Err(CoreError::SlotOccupied { index });
    }

    let left = groups.iter().position(|g| {
        g.image_version_id == image_version_id && index > 0 && g.segment_index_end == index - 1
    });
    let right = groups.iter().position(|g| {
        g.image_version_id == image_version_id && g.segment_index_start == index + 1
    });

    let mut out = groups.to_vec();
    match (left, right) {
        (Some(l), Some(r)) => {
            // Bridge: one group spanning from the left neighbor's start to
            // the right neighbor's end replaces both.
            let merged = ImageGroup::new(
                image_version_id,
                image_id,
                out[l].segment_index_start,
                out[r].segment_index_end,
            );
            let (first, second) = if l < r { (l, r) } else { (r, l) };
            out.remove(second);
            out.remove(first);
            out.insert(first, merged);
        }
        (Some(l), None) => {
            out[l].segment_index_end = index;
        }
        (None, Some(r)) => {
            out[r].segment_index_start = index;
        }
        (None, None) => {
            out.push(ImageGroup::new(image_version_id, image_id, index, index));
        }
    }
    Ok(GroupInsert::Updated(out))
}

/// Add a group over an explicit `[start, end]` range.
///
/// Unlike the single-index drop this path never merges: any intersection
/// with an existing group is rejected outright, whichever version owns it.
pub fn add_image_range(
    groups: &[ImageGroup],
    image_version_id: &str,
    image_id: &str,
    start: usize,
    end: usize,
    segment_count: usize,
) -> Result<Vec<ImageGroup>> {
    if start > end {
        return Err(CoreError::InvalidRange { start, end });
    }
    if end >= segment_count {
        return Err(CoreError::IndexOutOfBounds {
            index: end,
            segment_count,
        });
    }
    let intersects = groups
        .iter()
        .any(|g| !(end < g.segment_index_start || start > g.segment_index_end));
    if intersects {
        return Err(CoreError::RangeOverlap { start, end });
    }

    let mut out = groups.to_vec();
    out.push(ImageGroup::new(image_version_id, image_id, start, end));
    Ok(out)
}

/// Move an existing group so its range starts at `new_start`.
///
/// Relocation can shrink gaps and create new adjacencies at the same time,
/// so instead of reasoning about pairwise shifts the collection is
/// flattened into a per-segment occupancy array, the moving block is
/// excised and spliced back in at the clamped target, and the groups are
/// rebuilt from the maximal runs of the result. Adjacent rebuilt groups of
/// the same image version coalesce into one.
///
/// `new_start` is signed because it comes from pointer math that can run
/// past the left edge; it is clamped to `[0, segment_count - len]`.
pub fn relocate_group(
    groups: &[ImageGroup],
    group_index: usize,
    new_start: i64,
    segment_count: usize,
) -> Result<Vec<ImageGroup>> {
    let Some(moving) = groups.get(group_index) else {
        return Err(CoreError::GroupNotFound(group_index));
    };
    if segment_count == 0 {
        return Err(CoreError::IndexOutOfBounds {
            index: 0,
            segment_count,
        });
    }

    let len = moving.span_len().min(segment_count);
    let new_start = new_start.clamp(0, (segment_count - len) as i64) as usize;

    // Per-segment occupancy: which group (by collection position) owns each
    // slot. Written in collection order; the collection is assumed already
    // consistent, so overwrites only happen on corrupt input.
    let mut slots: Vec<Option<usize>> = vec![None; segment_count];
    for (pos, group) in groups.iter().enumerate() {
        let start = group.segment_index_start.min(segment_count - 1);
        let end = group.segment_index_end.min(segment_count - 1);
        for slot in &mut slots[start..=end] {
            *slot = Some(pos);
        }
    }

    slots.retain(|slot| *slot != Some(group_index));
    let insert_at = new_start.min(slots.len());
    slots.splice(insert_at..insert_at, std::iter::repeat(Some(group_index)).take(len));

    Ok(rebuild_from_slots(groups, &slots))
}

/// Account for a segment inserted at `index`: ranges past it shift up by
/// one, and a group whose range straddles the insertion point stretches to
/// keep covering the same music on both sides (the new segment lands inside
/// the overlay's span).
pub fn shift_for_inserted_segment(groups: &[ImageGroup], index: usize) -> Vec<ImageGroup> {
    let mut out = groups.to_vec();
    for group in &mut out {
        if group.segment_index_start >= index {
            group.segment_index_start += 1;
        }
        if group.segment_index_end >= index {
            group.segment_index_end += 1;
        }
    }
    out
}

/// Remove the segment at `index` from under the groups: ranges past it
/// shift down by one, groups covering it shrink, and a singleton group
/// that covered only the removed segment disappears.
pub fn remove_segment_at(
    groups: &[ImageGroup],
    index: usize,
    segment_count: usize,
) -> Vec<ImageGroup> {
    if index >= segment_count {
        return groups.to_vec();
    }
    let mut out = Vec::with_capacity(groups.len());
    for group in groups {
        let mut group = group.clone();
        if group.segment_index_start == index && group.segment_index_end == index {
            continue;
        }
        if group.segment_index_start > index {
            group.segment_index_start -= 1;
        }
        if group.segment_index_end >= index {
            group.segment_index_end -= 1;
        }
        out.push(group);
    }
    out
}

/// Rebuild a group list from an occupancy array: one group per maximal run
/// of the same owner, then coalesce adjacent runs of the same image
/// version.
fn rebuild_from_slots(groups: &[ImageGroup], slots: &[Option<usize>]) -> Vec<ImageGroup> {
    let mut rebuilt: Vec<ImageGroup> = Vec::new();
    let mut run: Option<(usize, usize)> = None; // (owner, run start)

    for (i, slot) in slots.iter().enumerate() {
        if matches!((slot, run), (Some(owner), Some((current, _))) if *owner == current) {
            continue;
        }
        if let Some((current, start)) = run.take() {
            rebuilt.push(run_group(&groups[current], start, i - 1));
        }
        if let Some(owner) = slot {
            run = Some((*owner, i));
        }
    }
    if let Some((current, start)) = run {
        rebuilt.push(run_group(&groups[current], start, slots.len() - 1));
    }

    // Relocation may have made two blocks of the same image adjacent.
    let mut coalesced: Vec<ImageGroup> = Vec::with_capacity(rebuilt.len());
    for group in rebuilt {
        match coalesced.last_mut() {
            Some(prev)
                if prev.image_version_id == group.image_version_id
                    && prev.segment_index_end + 1 == group.segment_index_start =>
            {
                prev.segment_index_end = group.segment_index_end;
            }
            _ => coalesced.push(group),
        }
    }
    coalesced
}

fn run_group(source: &ImageGroup, start: usize, end: usize) -> ImageGroup {
    ImageGroup::new(
        source.image_version_id.clone(),
        source.image_id.clone(),
        start,
        end,
    )
}
