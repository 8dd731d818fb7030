//! Per-destination advisory locks
//!
//! Concurrent invocations over the same project serialize their merges into any one
//! destination. Lock files live under `<root>/.modfold/locks/`, named by a hash of the
//! destination's project-relative path. Lock files are never unlinked, only unlocked.

use std::fs;
use std::path::Path;

use fslock::LockFile;

use crate::error::{Result, merge};
use crate::path_utils::to_forward_slashes;

/// Held while merging into one destination; released on drop
pub struct DestinationLock {
    lock: LockFile,
}

impl DestinationLock {
    /// Block until the destination is free
    pub fn acquire(locks_dir: &Path, destination: &Path) -> Result<Self> {
        let mut lock = Self::open(locks_dir, destination)?;
        lock.lock().map_err(|e| merge::lock_failed(destination, e))?;
        Ok(Self { lock })
    }

    /// Take the lock only if nobody holds it
    #[cfg(test)]
    pub fn try_acquire(locks_dir: &Path, destination: &Path) -> Result<Option<Self>> {
        let mut lock = Self::open(locks_dir, destination)?;
        let acquired = lock
            .try_lock()
            .map_err(|e| merge::lock_failed(destination, e))?;
        Ok(acquired.then(|| Self { lock }))
    }

    fn open(locks_dir: &Path, destination: &Path) -> Result<LockFile> {
        fs::create_dir_all(locks_dir).map_err(|e| merge::lock_failed(destination, e))?;

        let lock_path = locks_dir.join(lock_file_name(destination));
        LockFile::open(&lock_path)
            .map_err(|e| merge::lock_failed(destination, format!("cannot open lock file: {e}")))
    }
}

impl Drop for DestinationLock {
    fn drop(&mut self) {
        let _ = self.lock.unlock();
    }
}

fn lock_file_name(destination: &Path) -> String {
    let key = to_forward_slashes(destination);
    let hash = blake3::hash(key.as_bytes()).to_hex();
    format!("{}.lock", &hash[..16])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::thread;
    use std::time::Duration;
    use tempfile::TempDir;

    #[test]
    fn test_try_acquire_excludes_second_holder() {
        let temp = TempDir::new().unwrap();
        let locks = temp.path().join(".modfold/locks");
        let dest = Path::new("services/Widget-Service");

        let first = DestinationLock::try_acquire(&locks, dest).unwrap();
        assert!(first.is_some());

        let second = DestinationLock::try_acquire(&locks, dest).unwrap();
        assert!(second.is_none());

        drop(first);
        assert!(DestinationLock::try_acquire(&locks, dest).unwrap().is_some());
    }

    #[test]
    fn test_distinct_destinations_do_not_contend() {
        let temp = TempDir::new().unwrap();
        let locks = temp.path().join("locks");

        let _frontend = DestinationLock::acquire(&locks, Path::new("frontend")).unwrap();
        let backend = DestinationLock::try_acquire(&locks, Path::new("backend")).unwrap();
        assert!(backend.is_some());
    }

    #[test]
    fn test_lock_file_kept_on_release() {
        let temp = TempDir::new().unwrap();
        let locks = temp.path().join("locks");
        let path = locks.join(lock_file_name(Path::new("frontend")));

        let guard = DestinationLock::acquire(&locks, Path::new("frontend")).unwrap();
        assert!(path.exists());
        drop(guard);
        assert!(path.exists());
        assert!(DestinationLock::try_acquire(&locks, Path::new("frontend"))
            .unwrap()
            .is_some());
    }

    #[test]
    fn test_handover_keeps_exclusion() {
        let temp = TempDir::new().unwrap();
        let locks = temp.path().join("locks");
        let dest = Path::new("services/Widget-Service");

        let first = DestinationLock::acquire(&locks, dest).unwrap();

        let (acquired_tx, acquired_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel::<()>();
        let waiter_locks = locks.clone();
        let waiter = thread::spawn(move || {
            let guard =
                DestinationLock::acquire(&waiter_locks, Path::new("services/Widget-Service"))
                    .unwrap();
            acquired_tx.send(()).unwrap();
            release_rx.recv().unwrap();
            drop(guard);
        });

        thread::sleep(Duration::from_millis(100));
        drop(first);
        acquired_rx.recv_timeout(Duration::from_secs(10)).unwrap();

        assert!(DestinationLock::try_acquire(&locks, dest).unwrap().is_none());

        release_tx.send(()).unwrap();
        waiter.join().unwrap();
        assert!(DestinationLock::try_acquire(&locks, dest).unwrap().is_some());
    }
}
