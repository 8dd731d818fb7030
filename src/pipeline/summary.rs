//! Batch reporting

use std::path::PathBuf;

use crate::classify::Basis;
use crate::domain::ModuleDescriptor;
use crate::merge::{ConsolidationReport, MergeStats};
use crate::registration::Registration;
use crate::resolver::TargetBasis;

use super::cleanup::CleanupReport;
use super::scripts::ScriptOutcome;

/// A module that made it all the way through
#[derive(Debug, Clone)]
pub struct IntegratedModule {
    pub descriptor: ModuleDescriptor,
    pub kind_basis: Basis,
    pub target_basis: TargetBasis,
    pub merge: MergeStats,
    pub scripts: Vec<(String, ScriptOutcome)>,
    pub registration: Option<Registration>,
    pub relocated_to: PathBuf,
}

/// Outcome for one archive
#[derive(Debug, Clone)]
pub struct ArchiveReport {
    pub archive: PathBuf,
    pub outcome: Result<IntegratedModule, String>,
}

impl ArchiveReport {
    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }

    pub fn archive_name(&self) -> String {
        self.archive
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default()
    }
}

/// Everything one `process` run did
#[derive(Debug, Default)]
pub struct BatchSummary {
    pub discovered: usize,
    pub archives: Vec<ArchiveReport>,
    pub consolidation: Option<ConsolidationReport>,
    pub cleanup: Option<CleanupReport>,
}

impl BatchSummary {
    pub fn processed(&self) -> usize {
        self.archives.iter().filter(|r| r.is_success()).count()
    }

    pub fn failed(&self) -> impl Iterator<Item = &ArchiveReport> {
        self.archives.iter().filter(|r| !r.is_success())
    }

    pub fn integrated(&self) -> impl Iterator<Item = &IntegratedModule> {
        self.archives.iter().filter_map(|r| r.outcome.as_ref().ok())
    }

    /// One-line "processed of discovered" statement
    pub fn headline(&self) -> String {
        format!(
            "Processed {} of {} archives",
            self.processed(),
            self.discovered
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts() {
        let summary = BatchSummary {
            discovered: 2,
            archives: vec![ArchiveReport {
                archive: PathBuf::from("inbox/broken.zip"),
                outcome: Err("archive is corrupt".to_string()),
            }],
            ..BatchSummary::default()
        };

        assert_eq!(summary.processed(), 0);
        assert_eq!(summary.failed().count(), 1);
        assert_eq!(summary.headline(), "Processed 0 of 2 archives");
        assert_eq!(summary.archives[0].archive_name(), "broken.zip");
    }
}
