use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::client::{ApplicationPatch, ApplicationQuery, FetchError, JobBoardSource, JobQuery};
use super::domain::{ApplicationId, JobApplication};
use super::errors::{DirectoryError, NotFoundError};
use super::sequencer::RequestSequencer;
use super::snapshot::{BoardSnapshot, Collection, CollectionError};
use crate::config::ViewConfig;

/// Holds the latest board snapshot and keeps it in step with the remote store.
pub struct ApplicantDirectory<S> {
    source: Arc<S>,
    current: RwLock<Arc<BoardSnapshot>>,
    sequencer: RequestSequencer,
    views: ViewConfig,
}

impl<S> ApplicantDirectory<S>
where
    S: JobBoardSource + 'static,
{
    pub fn new(source: Arc<S>, views: ViewConfig) -> Self {
        Self {
            source,
            current: RwLock::new(Arc::new(BoardSnapshot::empty())),
            sequencer: RequestSequencer::new(),
            views,
        }
    }

    pub fn views(&self) -> ViewConfig {
        self.views
    }

    pub async fn snapshot(&self) -> Arc<BoardSnapshot> {
        Arc::clone(&*self.current.read().await)
    }

    /// Fetches both collections with no filters and returns the snapshot now in effect.
    pub async fn refresh(&self) -> Arc<BoardSnapshot> {
        self.refresh_with(&JobQuery::default(), &ApplicationQuery::default()).await
    }

    /// Fetches both collections concurrently. The result is installed only if its ticket is
    /// newer than the installed snapshot's generation; otherwise it is dropped and the newer
    /// snapshot is returned. An earlier refresh that completes before a later one still
    /// installs, and the later one then replaces it.
    pub async fn refresh_with(
        &self,
        jobs_query: &JobQuery,
        applications_query: &ApplicationQuery,
    ) -> Arc<BoardSnapshot> {
        let ticket = self.sequencer.issue();
        let (jobs, applications) = tokio::join!(
            self.source.list_jobs(jobs_query),
            self.source.list_applications(applications_query),
        );

        let mut current = self.current.write().await;
        if !ticket.supersedes(current.generation()) {
            debug!(
                generation = ticket.generation(),
                installed = current.generation(),
                "discarding superseded board refresh"
            );
            return Arc::clone(&*current);
        }

        let mut fetch_errors = Vec::new();
        let jobs =
            keep_previous_on_error(jobs, current.jobs(), Collection::Jobs, &mut fetch_errors);
        let applications = keep_previous_on_error(
            applications,
            current.applications(),
            Collection::Applications,
            &mut fetch_errors,
        );

        let snapshot = Arc::new(
            BoardSnapshot::new(jobs, applications)
                .with_generation(ticket.generation())
                .with_fetch_errors(fetch_errors),
        );
        info!(
            generation = snapshot.generation(),
            companies = snapshot.groups().len(),
            applications = snapshot.applications().map_or(0, |records| records.len()),
            errors = snapshot.fetch_errors().len(),
            "board refreshed"
        );

        *current = Arc::clone(&snapshot);
        snapshot
    }

    /// Sends a validated patch to the store and, once confirmed, swaps the returned record
    /// into a rebuilt snapshot. Failures leave the current snapshot untouched; an upstream
    /// 404 is reported as an unknown application.
    pub async fn update_application(
        &self,
        id: &ApplicationId,
        patch: ApplicationPatch,
    ) -> Result<JobApplication, DirectoryError> {
        patch.validate()?;

        let updated = match self.source.update_application(id, &patch).await {
            Ok(updated) => updated,
            Err(err) if err.is_not_found() => {
                warn!(application_id = %id, error = %err, "application not found upstream");
                return Err(NotFoundError::Application { id: id.clone() }.into());
            }
            Err(err) => {
                warn!(application_id = %id, error = %err, "application update failed");
                return Err(err.into());
            }
        };

        // Issued under the lock so the installed generation never moves backwards.
        let mut current = self.current.write().await;
        let ticket = self.sequencer.issue();
        match current.with_application(updated.clone(), ticket.generation()) {
            Some(next) => *current = Arc::new(next),
            None => {
                warn!(
                    application_id = %id,
                    "applications not loaded yet; update will show after the next refresh"
                );
                return Ok(updated);
            }
        }

        info!(
            application_id = %id,
            status = %updated.status,
            generation = ticket.generation(),
            "application updated"
        );
        Ok(updated)
    }
}

fn keep_previous_on_error<T: Clone>(
    result: Result<Vec<T>, FetchError>,
    previous: Option<&[T]>,
    collection: Collection,
    errors: &mut Vec<CollectionError>,
) -> Option<Vec<T>> {
    match result {
        Ok(records) => Some(records),
        Err(err) => {
            warn!(collection = collection.label(), error = %err, "collection fetch failed");
            errors.push(CollectionError::new(collection, &err));
            previous.map(<[T]>::to_vec)
        }
    }
}
