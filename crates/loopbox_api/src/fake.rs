//! In-memory stand-in for the Loopbox backend, used by tests and local
//! development. Behaves like the real server where the contract cares:
//! durations in returned snapshots come from the music catalog (never from
//! the client), and a triggered render stays `Rendering` for a fixed
//! number of polls before flipping to `Ready` with a fresh file id.

use crate::client::VideoApi;
use crate::error::{ApiError, Result};
use crate::types::{
    ImageVersion, MusicVersion, RenderReceipt, UpdateVideoRequest, VideoSnapshot, VideoStatus,
};
use loopbox_core::types::{ImageGroup, Segment};
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

#[derive(Debug, Default)]
struct ProjectState {
    status: VideoStatus,
    file_id: Option<String>,
    segments: Vec<Segment>,
    image_groups: Vec<ImageGroup>,
    /// Remaining `get_video` polls before an outstanding render completes.
    render_polls_left: u32,
}

#[derive(Debug, Default)]
struct FakeState {
    projects: HashMap<String, ProjectState>,
    music: HashMap<String, MusicVersion>,
    images: HashMap<String, ImageVersion>,
}

/// See module docs. All state sits behind one `Mutex`; calls never hold the
/// lock across an await point.
#[derive(Debug)]
pub struct FakeVideoApi {
    state: Mutex<FakeState>,
    /// How many polls a render takes to complete.
    pub render_poll_count: u32,
}

impl FakeVideoApi {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(FakeState::default()),
            render_poll_count: 2,
        }
    }

    /// Register an empty project.
    pub fn add_project(&self, project_id: impl Into<String>) {
        let mut state = self.state.lock().unwrap();
        state.projects.insert(project_id.into(), ProjectState::default());
    }

    /// Register a music version and return its minted id.
    pub fn add_music_version(&self, music_id: impl Into<String>, duration_seconds: f64) -> String {
        let id = Uuid::new_v4().to_string();
        let mut state = self.state.lock().unwrap();
        state.music.insert(
            id.clone(),
            MusicVersion {
                id: id.clone(),
                music_id: music_id.into(),
                duration_seconds,
            },
        );
        id
    }

    /// Register an image version and return its minted id.
    pub fn add_image_version(&self, image_id: impl Into<String>) -> String {
        let id = Uuid::new_v4().to_string();
        let mut state = self.state.lock().unwrap();
        state.images.insert(
            id.clone(),
            ImageVersion {
                id: id.clone(),
                image_id: image_id.into(),
            },
        );
        id
    }

    fn snapshot(project: &ProjectState) -> VideoSnapshot {
        let total = project.segments.iter().map(|s| s.duration_seconds).sum();
        VideoSnapshot {
            status: project.status,
            total_duration_seconds: total,
            file_id: project.file_id.clone(),
            segments: project.segments.clone(),
            image_groups: project.image_groups.clone(),
        }
    }
}

impl VideoApi for FakeVideoApi {
    async fn get_video(&self, project_id: &str) -> Result<VideoSnapshot> {
        let mut state = self.state.lock().unwrap();
        let project = state
            .projects
            .get_mut(project_id)
            .ok_or_else(|| ApiError::ProjectNotFound(project_id.to_string()))?;

        if project.status == VideoStatus::Rendering {
            project.render_polls_left = project.render_polls_left.saturating_sub(1);
            if project.render_polls_left == 0 {
                project.status = VideoStatus::Ready;
                project.file_id = Some(Uuid::new_v4().to_string());
            }
        }

        Ok(Self::snapshot(&state.projects[project_id]))
    }

    async fn update_video(
        &self,
        project_id: &str,
        request: &UpdateVideoRequest,
    ) -> Result<VideoSnapshot> {
        let mut state = self.state.lock().unwrap();

        // Reconstruct segments server-side: durations always come from the
        // catalog, whatever the client thinks they are.
        let mut segments = Vec::with_capacity(request.segments.len());
        for patch in &request.segments {
            let version = state
                .music
                .get(&patch.music_version_id)
                .ok_or_else(|| ApiError::MusicVersionNotFound(patch.music_version_id.clone()))?;
            segments.push(Segment::new(
                version.id.clone(),
                version.music_id.clone(),
                version.duration_seconds,
            ));
        }

        let mut image_groups = Vec::with_capacity(request.image_groups.len());
        for patch in &request.image_groups {
            let version = state
                .images
                .get(&patch.image_version_id)
                .ok_or_else(|| ApiError::ImageVersionNotFound(patch.image_version_id.clone()))?;
            image_groups.push(ImageGroup::new(
                version.id.clone(),
                version.image_id.clone(),
                patch.segment_index_start,
                patch.segment_index_end,
            ));
        }

        let project = state
            .projects
            .get_mut(project_id)
            .ok_or_else(|| ApiError::ProjectNotFound(project_id.to_string()))?;
        project.segments = segments;
        project.image_groups = image_groups;

        Ok(Self::snapshot(&state.projects[project_id]))
    }

    async fn render_video(&self, project_id: &str) -> Result<RenderReceipt> {
        let polls = self.render_poll_count;
        let mut state = self.state.lock().unwrap();
        let project = state
            .projects
            .get_mut(project_id)
            .ok_or_else(|| ApiError::ProjectNotFound(project_id.to_string()))?;
        if project.segments.is_empty() {
            return Err(ApiError::Rejected("cannot render an empty timeline".into()));
        }
        project.status = VideoStatus::Rendering;
        project.render_polls_left = polls;
        Ok(RenderReceipt {
            status: project.status,
            file_id: project.file_id.clone(),
        })
    }

    async fn list_music_versions(&self, _project_id: &str) -> Result<Vec<MusicVersion>> {
        let state = self.state.lock().unwrap();
        Ok(state.music.values().cloned().collect())
    }

    async fn get_music_version(&self, version_id: &str) -> Result<MusicVersion> {
        let state = self.state.lock().unwrap();
        state
            .music
            .get(version_id)
            .cloned()
            .ok_or_else(|| ApiError::MusicVersionNotFound(version_id.to_string()))
    }

    async fn list_image_versions(&self, _project_id: &str) -> Result<Vec<ImageVersion>> {
        let state = self.state.lock().unwrap();
        Ok(state.images.values().cloned().collect())
    }

    async fn get_image_version(&self, version_id: &str) -> Result<ImageVersion> {
        let state = self.state.lock().unwrap();
        state
            .images
            .get(version_id)
            .cloned()
            .ok_or_else(|| ApiError::ImageVersionNotFound(version_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SegmentPatch;

    #[tokio::test]
    async fn unknown_project_errors() {
        let api = FakeVideoApi::new();
        let err = api.get_video("nope").await.unwrap_err();
        assert!(matches!(err, ApiError::ProjectNotFound(_)));
    }

    #[tokio::test]
    async fn update_uses_catalog_durations() {
        let api = FakeVideoApi::new();
        api.add_project("p1");
        let mv = api.add_music_version("m-1", 12.0);

        let snap = api
            .update_video(
                "p1",
                &UpdateVideoRequest {
                    segments: vec![SegmentPatch {
                        music_version_id: mv.clone(),
                    }],
                    image_groups: vec![],
                },
            )
            .await
            .unwrap();

        assert_eq!(snap.segments.len(), 1);
        assert_eq!(snap.segments[0].duration_seconds, 12.0);
        assert_eq!(snap.total_duration_seconds, 12.0);
    }

    #[tokio::test]
    async fn update_with_unknown_version_errors() {
        let api = FakeVideoApi::new();
        api.add_project("p1");
        let err = api
            .update_video(
                "p1",
                &UpdateVideoRequest {
                    segments: vec![SegmentPatch {
                        music_version_id: "ghost".into(),
                    }],
                    image_groups: vec![],
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::MusicVersionNotFound(_)));
    }

    #[tokio::test]
    async fn render_completes_after_polls() {
        let api = FakeVideoApi::new();
        api.add_project("p1");
        let mv = api.add_music_version("m-1", 5.0);
        api.update_video(
            "p1",
            &UpdateVideoRequest {
                segments: vec![SegmentPatch {
                    music_version_id: mv,
                }],
                image_groups: vec![],
            },
        )
        .await
        .unwrap();

        let receipt = api.render_video("p1").await.unwrap();
        assert_eq!(receipt.status, VideoStatus::Rendering);

        let first = api.get_video("p1").await.unwrap();
        assert_eq!(first.status, VideoStatus::Rendering);
        let second = api.get_video("p1").await.unwrap();
        assert_eq!(second.status, VideoStatus::Ready);
        assert!(second.file_id.is_some());
    }

    #[tokio::test]
    async fn render_of_empty_timeline_is_rejected() {
        let api = FakeVideoApi::new();
        api.add_project("p1");
        let err = api.render_video("p1").await.unwrap_err();
        assert!(matches!(err, ApiError::Rejected(_)));
    }
}
