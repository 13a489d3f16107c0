//! Process liveness probe over the proc filesystem.

use std::fs;
use std::path::Path;

/// Kernel limit on the `Name:` field (TASK_COMM_LEN minus the NUL).
const COMM_LEN: usize = 15;

/// Whether any process under `proc_root` is named `process_name`.
///
/// Entries that vanish or cannot be read mid-scan are skipped. An
/// unreadable `proc_root` means "not running".
pub fn is_process_running(proc_root: &Path, process_name: &str) -> bool {
    let entries = match fs::read_dir(proc_root) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(
                proc_root = %proc_root.display(),
                error = %e,
                "Cannot inspect processes, assuming proxy is not running"
            );
            return false;
        }
    };

    let expected = comm_name(process_name);

    entries
        .flatten()
        .filter(|entry| {
            entry
                .file_name()
                .to_str()
                .is_some_and(|name| name.parse::<u32>().is_ok())
        })
        .any(|entry| status_name(&entry.path().join("status")).as_deref() == Some(expected))
}

fn comm_name(name: &str) -> &str {
    if name.len() <= COMM_LEN {
        return name;
    }
    let mut end = COMM_LEN;
    while !name.is_char_boundary(end) {
        end -= 1;
    }
    &name[..end]
}

fn status_name(path: &Path) -> Option<String> {
    let status = fs::read_to_string(path).ok()?;
    status
        .lines()
        .find_map(|line| line.strip_prefix("Name:"))
        .map(|name| name.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fake_process(root: &Path, pid: &str, name: &str) {
        let dir = root.join(pid);
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join("status"),
            format!("Name:\t{}\nUmask:\t0022\nState:\tS (sleeping)\n", name),
        )
        .unwrap();
    }

    #[test]
    fn test_finds_named_process() {
        let root = tempfile::tempdir().unwrap();
        fake_process(root.path(), "1", "init");
        fake_process(root.path(), "42", "nginx");

        assert!(is_process_running(root.path(), "nginx"));
        assert!(!is_process_running(root.path(), "haproxy"));
    }

    #[test]
    fn test_ignores_non_pid_entries() {
        let root = tempfile::tempdir().unwrap();
        fake_process(root.path(), "self", "nginx");
        assert!(!is_process_running(root.path(), "nginx"));
    }

    #[test]
    fn test_name_must_match_exactly() {
        let root = tempfile::tempdir().unwrap();
        fake_process(root.path(), "7", "nginx-exporter");
        assert!(!is_process_running(root.path(), "nginx"));
    }

    #[test]
    fn test_long_names_are_truncated() {
        let root = tempfile::tempdir().unwrap();
        fake_process(root.path(), "9", "envoy-sidecar-p");
        assert!(is_process_running(root.path(), "envoy-sidecar-proxy"));
    }

    #[test]
    fn test_unreadable_entries_are_skipped() {
        let root = tempfile::tempdir().unwrap();
        fs::create_dir_all(root.path().join("5")).unwrap();
        fake_process(root.path(), "6", "nginx");
        assert!(is_process_running(root.path(), "nginx"));
    }

    #[test]
    fn test_missing_proc_root() {
        assert!(!is_process_running(Path::new("/nonexistent/proc"), "nginx"));
    }
}
