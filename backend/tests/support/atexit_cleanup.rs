//! Shared embedded cluster with a shutdown hook.
//!
//! `pg-embed-setup-unpriv` keeps its shared cluster alive for the life of the
//! process. Test binaries run one after another against the same data
//! directory, and a postmaster left behind by one binary stops the next from
//! bootstrapping. An `atexit` hook sends it `SIGTERM` when the binary exits.

#[cfg(unix)]
use std::path::{Path, PathBuf};
#[cfg(unix)]
use std::sync::OnceLock;
use std::time::Duration;

use pg_embedded_setup_unpriv::{BootstrapResult, ClusterHandle};

const BOOTSTRAP_ATTEMPTS: usize = 5;
const BOOTSTRAP_RETRY_DELAY: Duration = Duration::from_millis(500);
const EMBEDDED_PASSWORD: &str = "rentease_embedded_test";

/// Postmaster pid and the data directory whose `postmaster.pid` named it.
#[cfg(unix)]
static POSTMASTER: OnceLock<(i32, PathBuf)> = OnceLock::new();

/// The process-wide cluster, stopped again when the test binary exits.
pub fn shared_cluster_handle() -> BootstrapResult<&'static ClusterHandle> {
    pin_password();
    let mut attempt = 1;
    loop {
        match pg_embedded_setup_unpriv::test_support::shared_cluster_handle() {
            Ok(handle) => {
                #[cfg(unix)]
                stop_on_exit(handle);
                return Ok(handle);
            }
            Err(error) if attempt >= BOOTSTRAP_ATTEMPTS => return Err(error),
            Err(_) => {
                std::thread::sleep(BOOTSTRAP_RETRY_DELAY);
                attempt += 1;
            }
        }
    }
}

/// A reused data directory keeps the password it was initialised with, so
/// every binary must present the same one.
fn pin_password() {
    if std::env::var_os("PG_PASSWORD").is_none() {
        // SAFETY: called before the cluster bootstrap spawns its threads, and
        // the library serialises bootstrap behind its own lock.
        unsafe {
            std::env::set_var("PG_PASSWORD", EMBEDDED_PASSWORD);
        }
    }
}

#[cfg(unix)]
fn read_postmaster_pid(data_dir: &Path) -> Option<i32> {
    let dir = cap_std::fs::Dir::open_ambient_dir(data_dir, cap_std::ambient_authority()).ok()?;
    let content = dir.read_to_string("postmaster.pid").ok()?;
    content.lines().next()?.trim().parse().ok()
}

#[cfg(unix)]
extern "C" fn stop_postmaster() {
    let Some((pid, data_dir)) = POSTMASTER.get() else {
        return;
    };
    // The pid file is re-read so a recycled pid is never signalled.
    if read_postmaster_pid(data_dir) != Some(*pid) {
        return;
    }
    // SAFETY: `pid` matches the live `postmaster.pid`; SIGTERM requests a
    // smart shutdown.
    if unsafe { libc::kill(*pid, libc::SIGTERM) } != 0 {
        return;
    }
    for _ in 0..50 {
        std::thread::sleep(Duration::from_millis(100));
        // SAFETY: signal 0 only checks that the process still exists.
        if unsafe { libc::kill(*pid, 0) } != 0 {
            return;
        }
    }
    // SAFETY: same pid as above; the graceful budget has run out.
    unsafe {
        libc::kill(*pid, libc::SIGKILL);
    }
}

#[cfg(unix)]
fn stop_on_exit(handle: &ClusterHandle) {
    let data_dir = handle.settings().data_dir.clone();
    let Some(pid) = read_postmaster_pid(&data_dir) else {
        return;
    };
    if POSTMASTER.set((pid, data_dir)).is_err() {
        return;
    }
    // SAFETY: `stop_postmaster` is a plain `extern "C"` function that only
    // reads `POSTMASTER`, which is set above.
    let rc = unsafe { libc::atexit(stop_postmaster) };
    if rc != 0 {
        eprintln!("pg-embed: atexit registration failed (rc={rc}); postmaster {pid} may outlive this binary");
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    #[cfg(unix)]
    #[rstest]
    #[case(Some("4242\n/var/lib/pg\n5432\n"), Some(4242))]
    #[case(Some("  77  \n"), Some(77))]
    #[case(Some("postmaster\n"), None)]
    #[case(None, None)]
    fn postmaster_pid_comes_from_the_first_line(
        #[case] content: Option<&str>,
        #[case] expected: Option<i32>,
    ) {
        let dir = tempfile::tempdir().expect("tempdir");
        if let Some(content) = content {
            std::fs::write(dir.path().join("postmaster.pid"), content).expect("write pid file");
        }

        assert_eq!(super::read_postmaster_pid(dir.path()), expected);
    }

    #[test]
    fn pinned_password_leaves_an_explicit_one_alone() {
        let _guard = env_lock::lock_env([("PG_PASSWORD", Some("operator-choice"))]);

        super::pin_password();

        assert_eq!(
            std::env::var("PG_PASSWORD").expect("PG_PASSWORD set"),
            "operator-choice"
        );
    }
}
