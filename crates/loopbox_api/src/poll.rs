use crate::client::VideoApi;
use crate::error::Result;
use crate::types::VideoSnapshot;
use std::time::Duration;

/// Default re-fetch cadence while a render is outstanding.
pub const RENDER_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Re-fetch the video resource on a fixed interval until its status is
/// terminal, and return that final snapshot.
///
/// The first fetch happens immediately. Cancellation is dropping the
/// returned future — there is no partial state to clean up, the next
/// snapshot is simply never requested.
pub async fn poll_until_terminal<A: VideoApi>(
    api: &A,
    project_id: &str,
    interval: Duration,
) -> Result<VideoSnapshot> {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    loop {
        ticker.tick().await;
        let snapshot = api.get_video(project_id).await?;
        if snapshot.status.is_terminal() {
            return Ok(snapshot);
        }
        tracing::debug!(project_id, status = ?snapshot.status, "render not finished, polling again");
    }
}
