use crate::error::Result;
use crate::types::{
    ImageVersion, MusicVersion, RenderReceipt, UpdateVideoRequest, VideoSnapshot,
};

/// The backend operations the editor depends on. Every call is one network
/// round-trip; implementations decide transport and auth.
#[allow(async_fn_in_trait)]
pub trait VideoApi {
    /// Fetch the current video resource for a project.
    async fn get_video(&self, project_id: &str) -> Result<VideoSnapshot>;

    /// Replace the segment/image-group lists and get back the canonical
    /// reconstructed resource.
    async fn update_video(
        &self,
        project_id: &str,
        request: &UpdateVideoRequest,
    ) -> Result<VideoSnapshot>;

    /// Trigger a render. Completion is observed via [`get_video`] polling,
    /// not through this call.
    ///
    /// [`get_video`]: VideoApi::get_video
    async fn render_video(&self, project_id: &str) -> Result<RenderReceipt>;

    async fn list_music_versions(&self, project_id: &str) -> Result<Vec<MusicVersion>>;

    async fn get_music_version(&self, version_id: &str) -> Result<MusicVersion>;

    async fn list_image_versions(&self, project_id: &str) -> Result<Vec<ImageVersion>>;

    async fn get_image_version(&self, version_id: &str) -> Result<ImageVersion>;
}
