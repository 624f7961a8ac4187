//! Drives panel artwork generation.
//!
//! A panel moves `pending|error|ready -> generating -> ready|error`. The
//! `generating` update is committed before the backend is called and the
//! outcome is committed once it resolves or times out, so a panel never stays
//! `generating` after its request has finished.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{GenerationError, StoreError};
use crate::models::{Panel, PanelKey, PanelStatus, PanelUpdate};
use crate::services::ImageBackend;
use crate::services::image::request_panel_image;
use crate::services::store::StoryStore;

/// Tally of one pass over a story.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueueReport {
    pub requested: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub skipped: usize,
    /// The session was replaced before the pass finished.
    pub cancelled: bool,
}

#[derive(Clone)]
pub struct Orchestrator {
    store: Arc<StoryStore>,
    images: Arc<dyn ImageBackend>,
    timeout: Duration,
}

impl Orchestrator {
    pub fn new(store: Arc<StoryStore>, images: Arc<dyn ImageBackend>, timeout: Duration) -> Self {
        Self {
            store,
            images,
            timeout,
        }
    }

    /// Generates artwork for one panel of `session_id`.
    ///
    /// Backend failures are recorded on the panel, not returned: the `Ok`
    /// panel carries status `ready` or `error`. `Err` means the panel could
    /// not be addressed or the session was replaced mid-flight.
    pub async fn generate_panel(
        &self,
        session_id: Uuid,
        key: &PanelKey,
    ) -> Result<Panel, StoreError> {
        let (panel, characters) = self.store.panel_with_cast(session_id, key).await?;
        self.store
            .update_panel(Some(session_id), key, PanelUpdate::Generating)
            .await?;
        debug!(panel = %key, backend = self.images.name(), "Generating panel image");

        let outcome = tokio::time::timeout(
            self.timeout,
            request_panel_image(self.images.as_ref(), &panel, &characters),
        )
        .await
        .unwrap_or(Err(GenerationError::Timeout(self.timeout)));

        let update = match outcome {
            Ok(image_url) => PanelUpdate::Ready { image_url },
            Err(e) => {
                warn!(panel = %key, error = %e, "Panel image generation failed");
                PanelUpdate::Failed
            }
        };

        self.store
            .update_panel(Some(session_id), key, update)
            .await
            .inspect_err(|e| debug!(panel = %key, error = %e, "Discarding panel result"))
    }

    /// Walks every panel of `session_id` in page-then-panel order, one request
    /// at a time, skipping panels that are already `ready` or that another
    /// caller is currently generating.
    ///
    /// A failing panel does not stop the pass. Replacing the session does.
    pub async fn run(&self, session_id: Uuid) -> QueueReport {
        let mut report = QueueReport::default();

        let keys = match self.store.snapshot().await {
            Some(session) if session.session_id == session_id => session.story.panel_keys(),
            _ => {
                report.cancelled = true;
                return report;
            }
        };

        for key in &keys {
            let settled = match self.store.panel_with_cast(session_id, key).await {
                Ok((panel, _)) => panel.is_ready() || panel.status == PanelStatus::Generating,
                Err(_) => {
                    report.cancelled = true;
                    break;
                }
            };
            if settled {
                report.skipped += 1;
                continue;
            }

            report.requested += 1;
            match self.generate_panel(session_id, key).await {
                Ok(panel) if panel.is_ready() => report.succeeded += 1,
                Ok(_) => report.failed += 1,
                Err(_) => {
                    report.cancelled = true;
                    break;
                }
            }
        }

        info!(
            session = %session_id,
            requested = report.requested,
            succeeded = report.succeeded,
            failed = report.failed,
            skipped = report.skipped,
            cancelled = report.cancelled,
            "Panel queue finished"
        );
        report
    }

    /// Runs [`Self::run`] on a background task.
    pub fn spawn(&self, session_id: Uuid) -> tokio::task::JoinHandle<QueueReport> {
        let orchestrator = self.clone();
        tokio::spawn(async move { orchestrator.run(session_id).await })
    }
}
