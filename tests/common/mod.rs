//! Common test utilities for modfold integration tests

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::io::Write;
use std::net::TcpListener;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

/// A throwaway project root
pub struct TestProject {
    /// Temporary directory
    pub temp: TempDir,
    /// Path to project root
    pub path: PathBuf,
}

impl TestProject {
    /// Create a new project whose registry points at a port nothing listens on
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let path = temp.path().to_path_buf();
        let project = Self { temp, path };
        project.write_file(
            "modfold.yaml",
            &format!(
                "registry:\n  url: {}\n  timeout_secs: 1\n",
                closed_port_url()
            ),
        );
        std::fs::create_dir_all(project.input_dir()).expect("Failed to create input directory");
        project
    }

    pub fn input_dir(&self) -> PathBuf {
        self.path.join("attached_assets")
    }

    pub fn processed_dir(&self) -> PathBuf {
        self.input_dir().join("processed")
    }

    /// Write a file in the project
    pub fn write_file(&self, path: &str, content: &str) {
        let file_path = self.path.join(path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&file_path, content).expect("Failed to write file");
    }

    /// Read a file from the project
    pub fn read_file(&self, path: &str) -> String {
        std::fs::read_to_string(self.path.join(path)).expect("Failed to read file")
    }

    /// Check if a file exists in the project
    pub fn file_exists(&self, path: &str) -> bool {
        self.path.join(path).exists()
    }

    /// Build a zip archive in the input directory
    pub fn add_archive(&self, name: &str, files: &[(&str, &str)]) -> PathBuf {
        write_zip(&self.input_dir().join(name), files)
    }

    /// A modfold command rooted at this project
    pub fn cmd(&self) -> Command {
        let mut cmd = modfold_cmd();
        cmd.current_dir(&self.path)
            .env_remove("MODFOLD_ROOT")
            .env_remove("RUST_LOG")
            .arg("--root")
            .arg(&self.path);
        cmd
    }

    /// Relative path -> content of every file under `dir`
    pub fn snapshot(&self, dir: &str) -> BTreeMap<String, Vec<u8>> {
        let base = self.path.join(dir);
        walkdir::WalkDir::new(&base)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_file())
            .map(|e| {
                let relative = e
                    .path()
                    .strip_prefix(&base)
                    .expect("walked path outside base")
                    .to_string_lossy()
                    .replace('\\', "/");
                let content = std::fs::read(e.path()).expect("Failed to read file");
                (relative, content)
            })
            .collect()
    }
}

// Temporary fix for deprecated cargo_bin - will be updated when build-dir issues are resolved
#[allow(deprecated)]
pub fn modfold_cmd() -> Command {
    Command::cargo_bin("modfold").expect("modfold binary not built")
}

/// Write a zip at `path`; entry names ending in `/` become directories
pub fn write_zip(path: &Path, files: &[(&str, &str)]) -> PathBuf {
    let file = std::fs::File::create(path).expect("Failed to create zip");
    let mut writer = zip::ZipWriter::new(file);
    let options = zip::write::SimpleFileOptions::default();

    for (name, content) in files {
        if name.ends_with('/') {
            writer
                .add_directory(name.to_string(), options)
                .expect("Failed to add directory");
        } else {
            writer
                .start_file(name.to_string(), options)
                .expect("Failed to start file");
            writer
                .write_all(content.as_bytes())
                .expect("Failed to write entry");
        }
    }
    writer.finish().expect("Failed to finish zip");
    path.to_path_buf()
}

/// A registry URL on a port nothing listens on
pub fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind");
    let addr = listener.local_addr().expect("No local address");
    drop(listener);
    format!("http://{addr}/api/integration/register-module")
}
