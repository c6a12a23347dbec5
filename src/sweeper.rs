//! Sweep coordinator orchestrating enumeration, classification, and deletion.

use crate::classifier::Classifier;
use crate::console::ConsoleOutput;
use crate::hosting::{self, HostingService};
use crate::ignore::IgnoreFilter;
use crate::limiter::InFlightLimiter;
use crate::registry::PackageRegistry;
use crate::types::{
    Classification, DeletionOutcome, RepoOutcome, SkipReason, SweepReport,
};
use futures::TryStreamExt;
use std::pin::pin;
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

/// Tuning knobs for a sweep run.
#[derive(Debug, Clone)]
pub struct SweepOptions {
    /// Maximum concurrently in-flight tasks per external service.
    pub max_in_flight: usize,
    /// Report candidates without issuing deletions.
    pub dry_run: bool,
    pub verbose: bool,
    pub quiet: bool,
}

impl Default for SweepOptions {
    fn default() -> Self {
        Self {
            max_in_flight: 10,
            dry_run: false,
            verbose: false,
            quiet: false,
        }
    }
}

/// Coordinates the two-phase pipeline: classify every repository of every
/// organization, then delete the collected candidates as one batch.
///
/// Organizations are processed strictly in input order, one at a time; all
/// classification tasks of an organization resolve before the next
/// organization's enumeration begins. No destructive action happens before
/// the full candidate list is known.
pub struct Sweeper<H, R> {
    hosting: Arc<H>,
    classifier: Arc<Classifier<H, R>>,
    hosting_limiter: InFlightLimiter,
    console: ConsoleOutput,
    ignore: Arc<IgnoreFilter>,
    options: SweepOptions,
}

impl<H, R> Sweeper<H, R>
where
    H: HostingService + 'static,
    R: PackageRegistry + 'static,
{
    /// Create a new sweeper. Each external service gets its own admission
    /// limiter so the two cannot starve each other.
    pub fn new(hosting: Arc<H>, registry: Arc<R>, ignore: IgnoreFilter, options: SweepOptions) -> Self {
        let hosting_limiter = InFlightLimiter::new(options.max_in_flight);
        let registry_limiter = InFlightLimiter::new(options.max_in_flight);
        let ignore = Arc::new(ignore);

        let classifier = Arc::new(Classifier::new(
            Arc::clone(&hosting),
            registry,
            registry_limiter,
            Arc::clone(&ignore),
        ));

        let console = ConsoleOutput::new(options.verbose, options.quiet);

        Self {
            hosting,
            classifier,
            hosting_limiter,
            console,
            ignore,
            options,
        }
    }

    /// Run the full sweep across `organizations`, in input order.
    pub async fn run(&self, organizations: &[String]) -> SweepReport {
        let start_time = Instant::now();

        let mut outcomes: Vec<RepoOutcome> = Vec::new();
        let mut errors: Vec<String> = Vec::new();

        for org in organizations {
            self.console.print_org_start(org);
            if let Err(e) = self.classify_org(org, &mut outcomes).await {
                // Enumeration died for this org; whatever classification
                // tasks were already submitted have been awaited.
                error!("Enumeration of {} failed: {}", org, e);
                errors.push(format!("{}: {}", org, e));
            }
        }

        // Candidate collection is confined to this task; classification
        // workers only return tagged outcomes.
        let candidates: Vec<String> = outcomes
            .iter()
            .filter(|o| matches!(o.classification, Classification::Unregistered { .. }))
            .map(|o| o.repo.full_name.clone())
            .collect();

        self.console.print_candidates(&candidates);

        let deletions = if self.options.dry_run {
            info!("Dry run: skipping deletion of {} candidates", candidates.len());
            Vec::new()
        } else {
            self.delete_all(&candidates).await
        };

        let report = build_report(
            organizations,
            &outcomes,
            candidates,
            deletions,
            errors,
            start_time.elapsed().as_secs_f64(),
        );
        self.console.print_summary(&report);
        report
    }

    /// Enumerate one organization and classify every non-ignored repository,
    /// awaiting all classification tasks before returning.
    async fn classify_org(
        &self,
        org: &str,
        outcomes: &mut Vec<RepoOutcome>,
    ) -> crate::types::Result<()> {
        let mut repos = pin!(hosting::org_repos(
            Arc::clone(&self.hosting),
            self.hosting_limiter.clone(),
            org,
        ));

        let mut tasks: Vec<JoinHandle<RepoOutcome>> = Vec::new();
        let mut enumeration_error = None;

        loop {
            match repos.try_next().await {
                Ok(Some(repo)) => {
                    let skip_reason = if self.ignore.is_self(&repo.full_name) {
                        Some(SkipReason::SelfRepo)
                    } else if self.ignore.ignores_repo(&repo.full_name) {
                        Some(SkipReason::IgnoredRepo)
                    } else {
                        None
                    };

                    if let Some(reason) = skip_reason {
                        self.console.print_skip(&repo.full_name, &reason);
                        outcomes.push(RepoOutcome {
                            repo,
                            classification: Classification::Skipped { reason },
                        });
                        continue;
                    }

                    let classifier = Arc::clone(&self.classifier);
                    let limiter = self.hosting_limiter.clone();
                    tasks.push(tokio::spawn(async move {
                        let classification = limiter.run(classifier.classify(&repo)).await;
                        RepoOutcome {
                            repo,
                            classification,
                        }
                    }));
                }
                Ok(None) => break,
                Err(e) => {
                    enumeration_error = Some(e);
                    break;
                }
            }
        }

        self.console
            .print_progress(&format!("Awaiting {} classification tasks for {}", tasks.len(), org));

        for task in tasks {
            match task.await {
                Ok(outcome) => {
                    self.console.print_outcome(&outcome);
                    outcomes.push(outcome);
                }
                Err(e) => debug!("Classification task join error: {}", e),
            }
        }

        match enumeration_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Issue one deletion per candidate, mutually independent; a failure is
    /// recorded and never affects the rest of the batch.
    async fn delete_all(&self, candidates: &[String]) -> Vec<DeletionOutcome> {
        let pb = self
            .console
            .create_progress_bar(candidates.len() as u64, "Deleting repositories");

        let tasks: Vec<JoinHandle<DeletionOutcome>> = candidates
            .iter()
            .cloned()
            .map(|full_name| {
                let hosting = Arc::clone(&self.hosting);
                let limiter = self.hosting_limiter.clone();
                tokio::spawn(async move {
                    match limiter.run(hosting.delete_repo(&full_name)).await {
                        Ok(()) => {
                            info!("Deleted repo {}", full_name);
                            DeletionOutcome {
                                full_name,
                                error: None,
                            }
                        }
                        Err(e) => DeletionOutcome {
                            full_name,
                            error: Some(e.to_string()),
                        },
                    }
                })
            })
            .collect();

        let mut deletions = Vec::with_capacity(tasks.len());
        for task in tasks {
            match task.await {
                Ok(outcome) => {
                    if let Some(ref pb) = pb {
                        pb.inc(1);
                    }
                    self.console.print_deletion(&outcome);
                    deletions.push(outcome);
                }
                Err(e) => debug!("Deletion task join error: {}", e),
            }
        }

        if let Some(pb) = pb {
            pb.finish_and_clear();
        }

        deletions
    }
}

fn build_report(
    organizations: &[String],
    outcomes: &[RepoOutcome],
    candidates: Vec<String>,
    deletions: Vec<DeletionOutcome>,
    errors: Vec<String>,
    duration_secs: f64,
) -> SweepReport {
    let mut report = SweepReport {
        organizations: organizations.to_vec(),
        processed: outcomes.len(),
        skipped: 0,
        registered: 0,
        unregistered: 0,
        indeterminate: 0,
        candidates,
        deletions,
        errors,
        duration_secs,
    };

    for outcome in outcomes {
        match outcome.classification {
            Classification::Registered { .. } => report.registered += 1,
            Classification::Unregistered { .. } => report.unregistered += 1,
            Classification::Indeterminate { .. } => report.indeterminate += 1,
            Classification::Skipped { .. } => report.skipped += 1,
        }
    }

    report
}
