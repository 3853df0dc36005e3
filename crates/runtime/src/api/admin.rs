//! Game-master administration: bulk tick and content reload.

use std::collections::HashSet;

use futures::StreamExt;
use tracing::{info, warn};

use super::errors::{Result, RuntimeError, require_gm};
use super::handle::RuntimeHandle;
use crate::oracle::ReloadReport;
use crate::repository::{Collection, document_id};

/// A creature the bulk tick could not process.
#[derive(Debug)]
pub struct TickFailure {
    /// `None` when the document itself could not be read.
    pub id: Option<String>,
    pub error: RuntimeError,
}

/// Outcome of [`RuntimeHandle::tick_all`].
#[derive(Debug, Default)]
pub struct TickReport {
    pub ticked: usize,
    /// Effect events produced across every creature.
    pub events: usize,
    pub failures: Vec<TickFailure>,
}

impl RuntimeHandle {
    /// Ticks effects and regenerates every persisted creature.
    ///
    /// Creatures are processed one at a time, each fetched and written back
    /// on its own. A failure is recorded and the scan continues; creatures
    /// already written stay written.
    pub async fn tick_all(&self, gm: bool) -> Result<TickReport> {
        require_gm(gm, "tick all")?;
        let report = self.tick_every_creature().await;
        info!(
            target: "runtime::admin",
            ticked = report.ticked,
            events = report.events,
            failures = report.failures.len(),
            "Bulk tick finished"
        );
        Ok(report)
    }

    pub(crate) async fn tick_every_creature(&self) -> TickReport {
        let mut report = TickReport::default();
        let mut seen = HashSet::new();
        let mut documents = self.store().scan(Collection::Creatures);

        while let Some(document) = documents.next().await {
            let id = match document.and_then(|doc| document_id(Collection::Creatures, &doc)) {
                Ok(id) => id,
                Err(e) => {
                    warn!(target: "runtime::admin", error = %e, "Skipping unreadable creature document");
                    report.failures.push(TickFailure {
                        id: None,
                        error: e.into(),
                    });
                    continue;
                }
            };
            if !seen.insert(id.clone()) {
                continue;
            }

            match self.tick_one(&id).await {
                Ok(events) => {
                    report.ticked += 1;
                    report.events += events.len();
                }
                Err(error) => {
                    warn!(target: "runtime::admin", id = %id, error = %error, "Creature tick failed");
                    report.failures.push(TickFailure {
                        id: Some(id),
                        error,
                    });
                }
            }
        }
        report
    }

    /// Replaces the content registry and engine configuration from disk.
    pub async fn reload_content(&self, gm: bool) -> Result<ReloadReport> {
        require_gm(gm, "reload content")?;
        self.content().reload().await
    }
}
