use crate::constants::LAUNCH_TEMPLATE_NOT_FOUND;
use crate::Ec2Api;
use asg_test_model::ResourceDescriptor;
use log::{error, info, warn};
use std::fmt::{self, Display, Formatter};
use std::path::Path;

/// The result of one cleanup step.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum StepOutcome {
    Done,
    /// Nothing to do, e.g. the resource was never recorded.
    Skipped,
    Failed(String),
}

impl StepOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, StepOutcome::Failed(_))
    }
}

impl Display for StepOutcome {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            StepOutcome::Done => write!(f, "done"),
            StepOutcome::Skipped => write!(f, "skipped"),
            StepOutcome::Failed(reason) => write!(f, "failed: {}", reason),
        }
    }
}

/// What cleanup did. Cleanup never fails as a whole; each step reports its own outcome.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct CleanupReport {
    pub descriptor: StepOutcome,
    pub descriptor_record: StepOutcome,
    pub launch_template: StepOutcome,
}

impl CleanupReport {
    pub fn has_failures(&self) -> bool {
        self.steps().iter().any(|(_, outcome)| outcome.is_failed())
    }

    pub fn steps(&self) -> [(&'static str, &StepOutcome); 3] {
        [
            ("load descriptor", &self.descriptor),
            ("delete launch template", &self.launch_template),
            ("remove descriptor record", &self.descriptor_record),
        ]
    }
}

/// Removes what [`ResourceBootstrapper`](crate::ResourceBootstrapper) created. Resources that
/// are already gone count as cleaned up. The descriptor record is removed only once every cloud
/// resource it names is gone, so a failed cleanup can be retried.
pub struct ResourceCleaner<E> {
    ec2: E,
}

impl<E: Ec2Api> ResourceCleaner<E> {
    pub fn new(ec2: E) -> Self {
        Self { ec2 }
    }

    pub async fn cleanup<P: AsRef<Path>>(&self, bootstrap_dir: P) -> CleanupReport {
        let bootstrap_dir = bootstrap_dir.as_ref();
        let (descriptor, descriptor_outcome) =
            if !ResourceDescriptor::path_in(bootstrap_dir).exists() {
                info!("No resource descriptor in '{}'", bootstrap_dir.display());
                (None, StepOutcome::Skipped)
            } else {
                match ResourceDescriptor::read_from(bootstrap_dir) {
                    Ok(descriptor) => (Some(descriptor), StepOutcome::Done),
                    Err(e) => {
                        warn!("Unable to load the resource descriptor: {}", e);
                        (None, StepOutcome::Failed(e.to_string()))
                    }
                }
            };

        let launch_template = match descriptor
            .as_ref()
            .map(ResourceDescriptor::launch_template_id)
        {
            Some(id) if !id.is_empty() => self.delete_launch_template(id).await,
            _ => StepOutcome::Skipped,
        };

        // Keep the record until every resource it names is gone.
        let descriptor_record = match (&descriptor_outcome, &launch_template) {
            (StepOutcome::Done, StepOutcome::Done | StepOutcome::Skipped) => {
                remove_descriptor_record(bootstrap_dir)
            }
            _ => {
                if ResourceDescriptor::path_in(bootstrap_dir).exists() {
                    warn!(
                        "Keeping the resource descriptor in '{}' for the next cleanup",
                        bootstrap_dir.display()
                    );
                }
                StepOutcome::Skipped
            }
        };

        let report = CleanupReport {
            descriptor: descriptor_outcome,
            descriptor_record,
            launch_template,
        };
        for (step, outcome) in report.steps() {
            match outcome {
                StepOutcome::Failed(_) => error!("Cleanup step '{}' {}", step, outcome),
                _ => info!("Cleanup step '{}' {}", step, outcome),
            }
        }
        report
    }

    async fn delete_launch_template(&self, id: &str) -> StepOutcome {
        match self.ec2.delete_template(id).await {
            Ok(()) => StepOutcome::Done,
            Err(e) if e.has_code(LAUNCH_TEMPLATE_NOT_FOUND) => {
                info!("Launch template '{}' was already deleted", id);
                StepOutcome::Done
            }
            Err(e) => StepOutcome::Failed(e.to_string()),
        }
    }
}

fn remove_descriptor_record(bootstrap_dir: &Path) -> StepOutcome {
    if !ResourceDescriptor::path_in(bootstrap_dir).exists() {
        return StepOutcome::Skipped;
    }
    match ResourceDescriptor::remove_from(bootstrap_dir) {
        Ok(()) => StepOutcome::Done,
        Err(e) => StepOutcome::Failed(e.to_string()),
    }
}
