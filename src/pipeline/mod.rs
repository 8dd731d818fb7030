//! Pipeline orchestration
//!
//! Drives each discovered archive through extraction, classification, target
//! resolution, merge, post-integration scripts and registration, then relocates it.
//! Archives are handled one at a time and a failing archive is journaled and left in
//! place; the batch always continues. After the batch, destinations are consolidated
//! and empty directories are removed.

pub mod cleanup;
pub mod discovery;
pub mod lock;
pub mod relocate;
pub mod scripts;
pub mod summary;

use std::path::{Path, PathBuf};

use crate::archive::{Extraction, allocate_scratch, extract_archive};
use crate::classify::{Classification, classify};
use crate::config::{DeclaredConfig, ProjectPaths, Settings};
use crate::domain::ModuleDescriptor;
use crate::error::Result;
use crate::journal::Journal;
use crate::merge::{consolidate, merge_module};
use crate::registration::{Registry, detect_capabilities, register_module};
use crate::resolver::{Resolution, TargetResolver};

pub use cleanup::{CleanupReport, remove_empty_dirs};
pub use discovery::find_archives;
pub use summary::{ArchiveReport, BatchSummary, IntegratedModule};

use lock::DestinationLock;
use relocate::relocate_archive;
use scripts::run_post_scripts;

/// Switches for the optional phases of a run
#[derive(Debug, Clone, Copy)]
pub struct PipelineOptions {
    pub consolidate: bool,
    pub cleanup: bool,
    pub register: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            consolidate: true,
            cleanup: true,
            register: true,
        }
    }
}

/// Everything known about an archive before anything is merged
#[derive(Debug)]
pub struct Prepared {
    pub extraction: Extraction,
    pub declared: Option<DeclaredConfig>,
    pub module_name: String,
    pub classification: Classification,
    pub resolution: Resolution,
}

/// Extract, read the sidecar, classify and resolve one archive into `scratch`
pub fn prepare_archive(
    archive: &Path,
    scratch: &Path,
    resolver: &mut TargetResolver,
    journal: &Journal,
) -> Result<Prepared> {
    let owner = archive
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let inferred_name = archive
        .file_stem()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    let extraction = extract_archive(archive, scratch)?;
    journal.info(format!(
        "Extracted {} files from {}",
        extraction.manifest.len(),
        owner
    ));
    for skipped in &extraction.skipped {
        journal.warn(format!("Skipped unsafe archive entry: {skipped}"));
    }

    let declared = match DeclaredConfig::load(&extraction.root) {
        Ok(declared) => declared,
        Err(e) => {
            journal.warn(format!("Ignoring malformed sidecar in {owner}: {e}"));
            None
        }
    };
    if declared.is_some() {
        journal.info(format!("Found module config in {owner}"));
    }

    let module_name = declared
        .as_ref()
        .map_or_else(|| inferred_name.clone(), |d| d.module_name_or(&inferred_name));

    let classification = classify(
        &module_name,
        &extraction.manifest,
        declared.as_ref().and_then(|d| d.module_type.as_deref()),
    );
    journal.info(format!(
        "Identified {} as {} ({})",
        module_name, classification.kind, classification.basis
    ));

    let resolution = resolver.resolve(
        &owner,
        &module_name,
        &classification.kind,
        declared.as_ref().and_then(|d| d.target_directory.as_deref()),
    )?;
    journal.info(format!(
        "Target directory for {}: {} ({})",
        module_name,
        resolution.target.display(),
        resolution.basis
    ));

    Ok(Prepared {
        extraction,
        declared,
        module_name,
        classification,
        resolution,
    })
}

/// One batch run over a project
pub struct Pipeline<'a> {
    settings: &'a Settings,
    paths: &'a ProjectPaths,
    journal: &'a Journal,
    registry: &'a dyn Registry,
    options: PipelineOptions,
    resolver: TargetResolver,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        settings: &'a Settings,
        paths: &'a ProjectPaths,
        journal: &'a Journal,
        registry: &'a dyn Registry,
        options: PipelineOptions,
    ) -> Self {
        Self {
            settings,
            paths,
            journal,
            registry,
            options,
            resolver: TargetResolver::new(settings.layout.clone(), &settings.namespace_prefix),
        }
    }

    /// Archives waiting in the input directory
    pub fn discover(&self) -> Result<Vec<PathBuf>> {
        self.journal.info(format!(
            "Looking for .{} archives in {}",
            self.settings.extension(),
            self.paths.input.display()
        ));
        let archives = find_archives(&self.paths.input, self.settings.extension())?;
        self.journal
            .info(format!("Found {} archives to process", archives.len()));
        Ok(archives)
    }

    /// Integrate one archive; failures are reported, never propagated
    pub fn process_archive(&mut self, archive: &Path) -> ArchiveReport {
        self.journal
            .info(format!("Processing archive: {}", archive.display()));

        let outcome = self.integrate(archive).map_err(|e| {
            self.journal
                .warn(format!("Error processing {}: {}", archive.display(), e));
            e.to_string()
        });

        ArchiveReport {
            archive: archive.to_path_buf(),
            outcome,
        }
    }

    fn integrate(&mut self, archive: &Path) -> Result<IntegratedModule> {
        let scratch = allocate_scratch(&self.paths.scratch)?;
        let prepared = prepare_archive(archive, scratch.path(), &mut self.resolver, self.journal)?;
        let declared = prepared.declared.unwrap_or_default();
        let target = prepared.resolution.target;
        let destination = self.paths.root.join(&target);

        let merge = {
            let _lock = DestinationLock::acquire(&self.paths.locks, &target)?;
            merge_module(
                &prepared.extraction.root,
                &destination,
                &declared.file_mapping,
                self.journal,
            )?
        };

        let scripts = run_post_scripts(
            &declared.post_integration_scripts,
            &destination,
            &self.paths.root,
            &self.settings.interpreters,
            self.journal,
        );

        let mut descriptor = ModuleDescriptor::new(
            prepared.module_name,
            prepared.classification.kind,
            target,
        );
        descriptor.capabilities = detect_capabilities(&destination);

        let registration = if declared.register_with_integration_hub && self.options.register {
            let outcome = register_module(self.registry, &descriptor, &destination, self.journal);
            Some(outcome.into_result(&descriptor.name)?)
        } else {
            None
        };

        let relocated_to = relocate_archive(archive, &self.paths.processed)?;
        self.journal.info(format!(
            "Moved {} to {}",
            archive.display(),
            relocated_to.display()
        ));

        drop(scratch);

        Ok(IntegratedModule {
            descriptor,
            kind_basis: prepared.classification.basis,
            target_basis: prepared.resolution.basis,
            merge,
            scripts,
            registration,
            relocated_to,
        })
    }

    /// Consolidate and clean up after every archive was processed
    pub fn finish(&self, discovered: usize, archives: Vec<ArchiveReport>) -> BatchSummary {
        let mut summary = BatchSummary {
            discovered,
            archives,
            ..BatchSummary::default()
        };

        if self.options.consolidate && summary.processed() > 0 {
            let destinations: Vec<PathBuf> = summary
                .integrated()
                .map(|m| m.descriptor.target_path.clone())
                .collect();
            summary.consolidation = Some(consolidate(
                &self.paths.root,
                &self.paths.consolidated,
                destinations.iter().map(PathBuf::as_path),
                self.journal,
            ));
        }

        if self.options.cleanup {
            let protected = [
                self.paths.input.as_path(),
                self.paths.processed.as_path(),
            ];
            summary.cleanup = Some(remove_empty_dirs(
                &self.paths.root,
                &protected,
                &self.settings.cleanup.skip_dirs,
                self.journal,
            ));
        }

        self.journal.info(summary.headline());
        summary
    }

    /// Discover, process every archive and finish
    #[cfg(test)]
    pub fn run(&mut self) -> Result<BatchSummary> {
        let archives = self.discover()?;
        let reports = archives
            .iter()
            .map(|archive| self.process_archive(archive))
            .collect();
        Ok(self.finish(archives.len(), reports))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::test_support::create_test_zip;
    use crate::domain::ModuleKind;
    use crate::hash::hash_directory;
    use crate::registration::MANIFEST_FILE;
    use crate::registration::registry::{RegistrationPayload, RegistryError};
    use std::fs;
    use tempfile::TempDir;

    struct Offline;

    impl Registry for Offline {
        fn announce(
            &self,
            _payload: &RegistrationPayload,
        ) -> std::result::Result<u16, RegistryError> {
            Err(RegistryError::Unreachable {
                url: "http://localhost:5003".to_string(),
                reason: "connection refused".to_string(),
            })
        }
    }

    struct Project {
        temp: TempDir,
        settings: Settings,
        paths: ProjectPaths,
    }

    impl Project {
        fn new() -> Self {
            let temp = TempDir::new().unwrap();
            let settings = Settings::default();
            let paths = ProjectPaths::new(temp.path(), &settings);
            fs::create_dir_all(&paths.input).unwrap();
            Self {
                temp,
                settings,
                paths,
            }
        }

        fn root(&self) -> &Path {
            self.temp.path()
        }

        fn add_zip(&self, name: &str, files: &[(&str, &[u8])]) -> PathBuf {
            create_test_zip(&self.paths.input, name, files)
        }

        fn run(&self, options: PipelineOptions) -> BatchSummary {
            let journal = Journal::open(&self.paths.log_file).unwrap();
            Pipeline::new(&self.settings, &self.paths, &journal, &Offline, options)
                .run()
                .unwrap()
        }
    }

    #[test]
    fn test_python_service_scenario() {
        let project = Project::new();
        project.add_zip("Widget-Service.zip", &[("app.py", b"print(1)")]);

        let summary = project.run(PipelineOptions::default());

        assert_eq!(summary.processed(), 1);
        let module = summary.integrated().next().unwrap();
        assert_eq!(module.descriptor.kind, ModuleKind::PythonService);
        assert_eq!(
            module.descriptor.target_path,
            PathBuf::from("services/Widget-Service")
        );
        assert!(project.root().join("services/Widget-Service/app.py").exists());
        assert!(
            project
                .root()
                .join("consolidated/app.py")
                .exists()
        );
        assert!(project.paths.processed.join("Widget-Service.zip").exists());
        assert!(!project.paths.input.join("Widget-Service.zip").exists());
    }

    #[test]
    fn test_sidecar_overrides_structure() {
        let project = Project::new();
        project.add_zip(
            "Dashboard.zip",
            &[
                (
                    "config.json",
                    br#"{"target_directory": "custom/path", "module_type": "backend"}"#,
                ),
                ("package.json", b"{}"),
                ("next.config.js", b"module.exports = {}"),
            ],
        );

        let summary = project.run(PipelineOptions::default());

        let module = summary.integrated().next().unwrap();
        assert_eq!(module.descriptor.kind, ModuleKind::Backend);
        assert_eq!(module.descriptor.target_path, PathBuf::from("custom/path"));
        assert!(project.root().join("custom/path/next.config.js").exists());
        assert!(!project.root().join("custom/path/config.json").exists());
    }

    #[test]
    fn test_frontends_union_under_shared_root() {
        let project = Project::new();
        let files_a: &[(&str, &[u8])] = &[
            ("package.json", b"{\"name\":\"a\"}"),
            ("vite.config.ts", b""),
            ("src/a.tsx", b"a"),
        ];
        let files_b: &[(&str, &[u8])] = &[
            ("package.json", b"{\"name\":\"b\"}"),
            ("vite.config.ts", b""),
            ("src/b.tsx", b"b"),
        ];
        project.add_zip("Alpha.zip", files_a);
        project.add_zip("Beta.zip", files_b);

        let summary = project.run(PipelineOptions::default());

        assert_eq!(summary.processed(), 2);
        assert!(project.root().join("frontend/src/a.tsx").exists());
        assert!(project.root().join("frontend/src/b.tsx").exists());
        assert_eq!(
            fs::read_to_string(project.root().join("frontend/package.json")).unwrap(),
            "{\"name\":\"b\"}"
        );
    }

    #[test]
    fn test_corrupt_archive_does_not_stop_batch() {
        let project = Project::new();
        fs::write(project.paths.input.join("Broken.zip"), b"not a zip").unwrap();
        project.add_zip("Good-API.zip", &[("index.js", b"1")]);

        let summary = project.run(PipelineOptions::default());

        assert_eq!(summary.discovered, 2);
        assert_eq!(summary.processed(), 1);
        assert_eq!(summary.failed().count(), 1);
        assert!(project.paths.input.join("Broken.zip").exists());
        assert!(project.root().join("backend/index.js").exists());

        let log = fs::read_to_string(&project.paths.log_file).unwrap();
        assert!(log.contains("Error processing"));
        assert!(log.contains("Processed 1 of 2 archives"));
    }

    #[test]
    fn test_service_collision_in_one_run() {
        let project = Project::new();
        project.add_zip(
            "a.zip",
            &[("config.json", br#"{"module_name": "Mailer"}"#), ("m.py", b"")],
        );
        project.add_zip(
            "b.zip",
            &[("config.json", br#"{"module_name": "Mailer"}"#), ("n.py", b"")],
        );

        let summary = project.run(PipelineOptions::default());

        let targets: Vec<PathBuf> = summary
            .integrated()
            .map(|m| m.descriptor.target_path.clone())
            .collect();
        assert_eq!(
            targets,
            vec![
                PathBuf::from("services/Mailer"),
                PathBuf::from("services/Mailer-Service")
            ]
        );
    }

    #[test]
    fn test_rerun_is_idempotent() {
        let project = Project::new();
        let files: &[(&str, &[u8])] = &[("lib/", b""), ("lib/util.js", b"u"), ("index.js", b"i")];
        let archive = project.add_zip("Orders-API.zip", files);
        let options = PipelineOptions {
            consolidate: false,
            cleanup: false,
            register: true,
        };

        project.run(options);
        let once = hash_directory(&project.root().join("backend")).unwrap();

        fs::rename(project.paths.processed.join("Orders-API.zip"), &archive).unwrap();
        project.run(options);

        assert_eq!(once, hash_directory(&project.root().join("backend")).unwrap());
    }

    #[test]
    fn test_registration_falls_back_to_local_record() {
        let project = Project::new();
        project.add_zip(
            "EHB-Payments.zip",
            &[
                ("config.json", br#"{"register_with_integration_hub": true}"#),
                ("backend/routes/pay.js", b""),
            ],
        );

        let summary = project.run(PipelineOptions::default());

        let module = summary.integrated().next().unwrap();
        assert_eq!(module.descriptor.target_path, PathBuf::from("EHB-Payments"));
        assert!(matches!(
            module.registration,
            Some(crate::registration::Registration::Local { .. })
        ));
        assert!(
            module
                .descriptor
                .capabilities
                .contains("rest-api")
        );
        assert!(project.root().join("EHB-Payments").join(MANIFEST_FILE).exists());
    }

    #[test]
    fn test_no_register_option_skips_registration() {
        let project = Project::new();
        project.add_zip(
            "EHB-Payments.zip",
            &[
                ("config.json", br#"{"register_with_integration_hub": true}"#),
                ("index.js", b""),
            ],
        );

        let summary = project.run(PipelineOptions {
            register: false,
            ..PipelineOptions::default()
        });

        assert!(summary.integrated().next().unwrap().registration.is_none());
        assert!(!project.root().join("EHB-Payments").join(MANIFEST_FILE).exists());
    }

    #[test]
    fn test_malformed_sidecar_is_ignored() {
        let project = Project::new();
        project.add_zip(
            "Admin-UI.zip",
            &[("config.json", b"{ broken"), ("index.html", b"")],
        );

        let summary = project.run(PipelineOptions::default());

        let module = summary.integrated().next().unwrap();
        assert_eq!(module.descriptor.kind, ModuleKind::Frontend);
        assert_eq!(module.descriptor.target_path, PathBuf::from("frontend"));
    }

    #[test]
    fn test_scratch_is_removed_and_cleanup_runs() {
        let project = Project::new();
        project.add_zip("Misc.zip", &[("notes.txt", b"n")]);
        fs::create_dir_all(project.root().join("leftover/empty")).unwrap();

        let summary = project.run(PipelineOptions::default());

        assert!(!project.root().join("leftover").exists());
        assert!(!project.paths.scratch.exists());
        assert!(project.paths.input.exists());
        assert!(summary.cleanup.unwrap().removed.len() >= 2);
    }

    #[test]
    fn test_empty_input_is_a_no_op() {
        let project = Project::new();
        let summary = project.run(PipelineOptions::default());
        assert_eq!(summary.discovered, 0);
        assert!(summary.consolidation.is_none());
    }

    #[test]
    fn test_prepare_does_not_merge() {
        let temp = TempDir::new().unwrap();
        let zip = create_test_zip(temp.path(), "Widget-Service.zip", &[("app.py", b"")]);
        let mut resolver = TargetResolver::new(Settings::default().layout, "ehb-");

        let prepared = prepare_archive(
            &zip,
            &temp.path().join("scratch"),
            &mut resolver,
            &Journal::detached(),
        )
        .unwrap();

        assert_eq!(prepared.module_name, "Widget-Service");
        assert!(prepared.declared.is_none());
        assert_eq!(
            prepared.resolution.target,
            PathBuf::from("services/Widget-Service")
        );
        assert!(!temp.path().join("services").exists());
    }
}
