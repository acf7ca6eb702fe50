use crate::error::{EditorError, Result};
use anyhow::Context;
use loopbox_api::client::VideoApi;
use loopbox_api::poll;
use loopbox_api::types::{
    ImageGroupPatch, ImageVersion, MusicVersion, SegmentPatch, UpdateVideoRequest, VideoSnapshot,
    VideoStatus,
};
use loopbox_core::types::{DragPayload, ImageGroup, Segment, SegmentSpan};
use loopbox_core::{groups, reorder, timing};
use std::collections::HashMap;
use std::time::Duration;

/// What a routed drop did to the draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropEffect {
    SegmentInserted { index: usize },
    SegmentMoved { from: usize, to: usize },
    /// `merged` is true for the idempotent same-image drop that left the
    /// collection untouched.
    ImagePlaced { merged: bool },
    GroupRelocated { group_index: usize },
    /// The payload/target combination has no meaning here; per the error
    /// policy an unroutable drop is ignored, not failed.
    Ignored,
}

/// One editing session over a project's video resource.
///
/// The session owns the in-memory draft exclusively. Mutations go through
/// the pure functions in `loopbox_core` and replace whole collections, so
/// a rejected operation or a failed save leaves the previous draft intact.
#[derive(Debug, Clone)]
pub struct EditorSession {
    project_id: String,
    status: VideoStatus,
    file_id: Option<String>,
    segments: Vec<Segment>,
    image_groups: Vec<ImageGroup>,
    music_catalog: HashMap<String, MusicVersion>,
    image_catalog: HashMap<String, ImageVersion>,
}

impl EditorSession {
    /// Load a project: the video resource and both version catalogs are
    /// fetched concurrently, then any version the snapshot references but
    /// the listings missed is resolved individually.
    pub async fn open<A: VideoApi>(api: &A, project_id: impl Into<String>) -> anyhow::Result<Self> {
        let project_id = project_id.into();
        let (video, music, images) = tokio::try_join!(
            api.get_video(&project_id),
            api.list_music_versions(&project_id),
            api.list_image_versions(&project_id),
        )
        .with_context(|| format!("failed to load project {project_id}"))?;

        let mut session = Self {
            project_id,
            status: video.status,
            file_id: None,
            segments: vec![],
            image_groups: vec![],
            music_catalog: music.into_iter().map(|v| (v.id.clone(), v)).collect(),
            image_catalog: images.into_iter().map(|v| (v.id.clone(), v)).collect(),
        };
        session.apply_snapshot(video);
        session.resolve_missing_versions(api).await?;
        tracing::info!(project_id = %session.project_id, "project loaded");
        Ok(session)
    }

    /// Fetch details for every version id the draft references but the
    /// catalog does not know, all in one concurrent batch.
    pub async fn resolve_missing_versions<A: VideoApi>(&mut self, api: &A) -> anyhow::Result<()> {
        let missing_music: Vec<String> = self
            .segments
            .iter()
            .map(|s| s.music_version_id.clone())
            .filter(|id| !self.music_catalog.contains_key(id))
            .collect();
        let missing_images: Vec<String> = self
            .image_groups
            .iter()
            .map(|g| g.image_version_id.clone())
            .filter(|id| !self.image_catalog.contains_key(id))
            .collect();

        let music = futures::future::try_join_all(
            missing_music.iter().map(|id| api.get_music_version(id)),
        );
        let images = futures::future::try_join_all(
            missing_images.iter().map(|id| api.get_image_version(id)),
        );
        let (music, images) = tokio::try_join!(music, images)
            .context("failed to resolve referenced versions")?;

        for version in music {
            self.music_catalog.insert(version.id.clone(), version);
        }
        for version in images {
            self.image_catalog.insert(version.id.clone(), version);
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Draft accessors and aggregate queries
    // -----------------------------------------------------------------------

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub fn status(&self) -> VideoStatus {
        self.status
    }

    pub fn file_id(&self) -> Option<&str> {
        self.file_id.as_deref()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn image_groups(&self) -> &[ImageGroup] {
        &self.image_groups
    }

    pub fn total_duration(&self) -> f64 {
        timing::total_duration(&self.segments)
    }

    pub fn segment_spans(&self) -> Vec<SegmentSpan> {
        timing::segment_spans(&self.segments)
    }

    /// Percent offset at which an insertion preview marker should render
    /// for a drag currently hovering at `time`.
    pub fn insert_preview_percent(&self, time: f64) -> f64 {
        let index = timing::insert_index_by_time(&self.segments, time);
        timing::insert_offset_percent(&self.segments, self.total_duration(), index)
    }

    /// Start offset and duration, in seconds, of an image group's span.
    pub fn group_span(&self, group_index: usize) -> (f64, f64) {
        let group = self.image_groups.get(group_index);
        (
            timing::group_start_offset(&self.segments, group),
            timing::group_duration(&self.segments, group),
        )
    }

    // -----------------------------------------------------------------------
    // Drop routing
    // -----------------------------------------------------------------------

    /// Apply a drop that landed on the timeline strip at `time` seconds.
    pub fn apply_timeline_drop(&mut self, payload: &DragPayload, time: f64) -> Result<DropEffect> {
        match payload {
            DragPayload::MusicVersion { id } => {
                let version = self
                    .music_catalog
                    .get(id)
                    .ok_or_else(|| EditorError::UnknownMusicVersion(id.clone()))?;
                let segment = Segment::new(
                    version.id.clone(),
                    version.music_id.clone(),
                    version.duration_seconds,
                );
                let index = timing::insert_index_by_time(&self.segments, time);
                let mut segments = self.segments.clone();
                segments.insert(index, segment);
                self.image_groups = groups::shift_for_inserted_segment(&self.image_groups, index);
                self.segments = segments;
                tracing::debug!(index, "segment inserted");
                Ok(DropEffect::SegmentInserted { index })
            }
            DragPayload::ImageVersion { id } => {
                let version = self
                    .image_catalog
                    .get(id)
                    .ok_or_else(|| EditorError::UnknownImageVersion(id.clone()))?;
                let index = timing::segment_index_by_time(&self.segments, time);
                match groups::insert_image_at(
                    &self.image_groups,
                    &version.id,
                    &version.image_id,
                    index,
                    self.segments.len(),
                )? {
                    groups::GroupInsert::AlreadyCovered => {
                        Ok(DropEffect::ImagePlaced { merged: true })
                    }
                    groups::GroupInsert::Updated(updated) => {
                        self.image_groups = updated;
                        tracing::debug!(index, "image placed");
                        Ok(DropEffect::ImagePlaced { merged: false })
                    }
                }
            }
            DragPayload::MusicSegment { index } => {
                let to = timing::insert_index_by_time(&self.segments, time);
                self.segments = reorder::move_by_index_insert(&self.segments, *index, to);
                tracing::debug!(from = index, to, "segment moved");
                Ok(DropEffect::SegmentMoved { from: *index, to })
            }
            DragPayload::ImageGroup { index } => {
                let new_start = timing::segment_index_by_time(&self.segments, time) as i64;
                self.image_groups = groups::relocate_group(
                    &self.image_groups,
                    *index,
                    new_start,
                    self.segments.len(),
                )?;
                tracing::debug!(group_index = index, new_start, "image group relocated");
                Ok(DropEffect::GroupRelocated { group_index: *index })
            }
        }
    }

    /// Apply a drop that landed directly on an existing row: the dragged
    /// segment takes over that slot instead of opening a gap. Payloads
    /// that have no replace-mode meaning are ignored.
    pub fn apply_row_drop(&mut self, payload: &DragPayload, row: usize) -> Result<DropEffect> {
        match payload {
            DragPayload::MusicSegment { index } => {
                self.segments = reorder::move_by_index_replace(&self.segments, *index, row);
                tracing::debug!(from = index, to = row, "segment swapped into row");
                Ok(DropEffect::SegmentMoved {
                    from: *index,
                    to: row,
                })
            }
            _ => Ok(DropEffect::Ignored),
        }
    }

    // -----------------------------------------------------------------------
    // Explicit (non-drag) edits
    // -----------------------------------------------------------------------

    /// Add an image over an explicit segment range. Unlike the drop path
    /// this rejects any intersection and never merges.
    pub fn add_image_range(&mut self, version_id: &str, start: usize, end: usize) -> Result<()> {
        let version = self
            .image_catalog
            .get(version_id)
            .ok_or_else(|| EditorError::UnknownImageVersion(version_id.to_string()))?;
        self.image_groups = groups::add_image_range(
            &self.image_groups,
            &version.id,
            &version.image_id,
            start,
            end,
            self.segments.len(),
        )?;
        Ok(())
    }

    /// Remove a segment; image-group ranges are reconciled to the shorter
    /// timeline.
    pub fn remove_segment(&mut self, index: usize) -> Result<()> {
        if index >= self.segments.len() {
            return Err(loopbox_core::error::CoreError::IndexOutOfBounds {
                index,
                segment_count: self.segments.len(),
            }
            .into());
        }
        self.image_groups =
            groups::remove_segment_at(&self.image_groups, index, self.segments.len());
        let mut segments = self.segments.clone();
        segments.remove(index);
        self.segments = segments;
        Ok(())
    }

    pub fn remove_image_group(&mut self, group_index: usize) -> Result<()> {
        if group_index >= self.image_groups.len() {
            return Err(loopbox_core::error::CoreError::GroupNotFound(group_index).into());
        }
        let mut image_groups = self.image_groups.clone();
        image_groups.remove(group_index);
        self.image_groups = image_groups;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Persistence and render
    // -----------------------------------------------------------------------

    /// Push the draft to the backend and absorb the canonical snapshot it
    /// returns. On failure the draft is left exactly as it was.
    pub async fn save<A: VideoApi>(&mut self, api: &A) -> anyhow::Result<()> {
        let request = UpdateVideoRequest {
            segments: self
                .segments
                .iter()
                .map(|s| SegmentPatch {
                    music_version_id: s.music_version_id.clone(),
                })
                .collect(),
            image_groups: self
                .image_groups
                .iter()
                .map(|g| ImageGroupPatch {
                    image_version_id: g.image_version_id.clone(),
                    segment_index_start: g.segment_index_start,
                    segment_index_end: g.segment_index_end,
                })
                .collect(),
        };
        let snapshot = api
            .update_video(&self.project_id, &request)
            .await
            .context("failed to save timeline")?;
        self.apply_snapshot(snapshot);
        tracing::info!(project_id = %self.project_id, "timeline saved");
        Ok(())
    }

    /// Fire the render trigger. Completion is observed via
    /// [`wait_for_render`].
    ///
    /// [`wait_for_render`]: EditorSession::wait_for_render
    pub async fn render<A: VideoApi>(&mut self, api: &A) -> anyhow::Result<VideoStatus> {
        let receipt = api
            .render_video(&self.project_id)
            .await
            .context("failed to start render")?;
        self.status = receipt.status;
        tracing::info!(project_id = %self.project_id, status = ?self.status, "render triggered");
        Ok(self.status)
    }

    /// Poll the backend until the render reaches a terminal status and
    /// absorb the final snapshot.
    pub async fn wait_for_render<A: VideoApi>(
        &mut self,
        api: &A,
        interval: Duration,
    ) -> anyhow::Result<VideoStatus> {
        let snapshot = poll::poll_until_terminal(api, &self.project_id, interval)
            .await
            .context("render polling failed")?;
        self.apply_snapshot(snapshot);
        tracing::info!(project_id = %self.project_id, status = ?self.status, "render finished");
        Ok(self.status)
    }

    /// Replace the draft with a canonical server snapshot. Durations are
    /// authoritative from the server, so the whole segment list is taken
    /// as-is rather than patched field by field.
    fn apply_snapshot(&mut self, snapshot: VideoSnapshot) {
        self.status = snapshot.status;
        self.file_id = snapshot.file_id;
        self.segments = snapshot.segments;
        self.image_groups = snapshot.image_groups;
    }
}
