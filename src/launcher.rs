//! OSD client invocation.
//!
//! The client is a separate executable run once per notification:
//! `<client> audio <percent> [--mute] [--device <name>]`.
//! Delivery is fire-and-forget: the monitor never waits for a particular
//! child and never looks at its exit status.

use std::ffi::CString;
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};

use crate::error::MonitorError;

/// Client binary used when none is given on the command line.
pub const DEFAULT_CLIENT: &str = "wayland-osd-client";

/// First positional argument, selects the client's audio mode.
const MODE_TAG: &str = "audio";

/// State handed to the OSD client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OsdRequest {
    pub volume_percent: i32,
    pub muted: bool,
    /// Present only when device name display is enabled
    pub device: Option<String>,
}

impl OsdRequest {
    pub fn args(&self) -> Vec<String> {
        let mut args = vec![MODE_TAG.to_string(), self.volume_percent.to_string()];
        if self.muted {
            args.push("--mute".to_string());
        }
        if let Some(ref device) = self.device {
            args.push("--device".to_string());
            args.push(device.clone());
        }
        args
    }
}

/// Something that can deliver an [`OsdRequest`].
pub trait Launch {
    fn launch(&mut self, request: &OsdRequest);
}

/// Spawns the real OSD client.
pub struct ClientLauncher {
    path: PathBuf,
    /// Children that may still be running, reaped opportunistically
    children: Vec<Child>,
}

impl ClientLauncher {
    /// `path` must already have passed [`validate_client`].
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            children: Vec::new(),
        }
    }

    fn reap_finished(&mut self) {
        self.children
            .retain_mut(|child| matches!(child.try_wait(), Ok(None)));
    }
}

impl Launch for ClientLauncher {
    fn launch(&mut self, request: &OsdRequest) {
        self.reap_finished();

        match Command::new(&self.path)
            .args(request.args())
            .stdin(Stdio::null())
            .spawn()
        {
            Ok(child) => self.children.push(child),
            Err(e) => log::error!(
                "Failed to execute client at '{}': {}",
                self.path.display(),
                e
            ),
        }
    }
}

/// Turn the configured client into a path. Bare names are looked up in
/// `PATH`, anything containing a `/` is taken as is.
pub fn resolve_client_path(client: &str) -> Result<PathBuf, MonitorError> {
    if client.contains('/') {
        return Ok(PathBuf::from(client));
    }
    which::which(client).map_err(|source| MonitorError::ClientNotInPath {
        name: client.to_string(),
        source,
    })
}

/// Startup check that the client exists and may be executed by us.
pub fn validate_client(path: &Path) -> Result<(), MonitorError> {
    let Ok(c_path) = CString::new(path.as_os_str().as_bytes()) else {
        return Err(MonitorError::ClientNotFound(path.to_path_buf()));
    };

    // SAFETY: c_path is a valid NUL-terminated string for the whole call.
    if unsafe { libc::access(c_path.as_ptr(), libc::F_OK) } != 0 {
        return Err(MonitorError::ClientNotFound(path.to_path_buf()));
    }
    // SAFETY: as above.
    if unsafe { libc::access(c_path.as_ptr(), libc::X_OK) } != 0 {
        return Err(MonitorError::ClientNotExecutable(path.to_path_buf()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs;
    use std::os::unix::fs::PermissionsExt;

    fn request(muted: bool, device: Option<&str>) -> OsdRequest {
        OsdRequest {
            volume_percent: 75,
            muted,
            device: device.map(String::from),
        }
    }

    #[test]
    fn test_args_all_combinations() {
        assert_eq!(
            request(true, Some("Speakers")).args(),
            ["audio", "75", "--mute", "--device", "Speakers"]
        );
        assert_eq!(request(true, None).args(), ["audio", "75", "--mute"]);
        assert_eq!(
            request(false, Some("Speakers")).args(),
            ["audio", "75", "--device", "Speakers"]
        );
        assert_eq!(request(false, None).args(), ["audio", "75"]);
    }

    #[test]
    fn test_device_name_is_a_single_argument() {
        let args = request(false, Some("USB Audio Device")).args();
        assert_eq!(args.len(), 4);
        assert_eq!(args[3], "USB Audio Device");
    }

    #[test]
    fn test_validate_missing_client() {
        let dir = tempfile::tempdir().unwrap();
        let err = validate_client(&dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, MonitorError::ClientNotFound(_)));
    }

    #[test]
    fn test_validate_executable_bits() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("osd-client");
        fs::write(&path, "#!/bin/sh\nexit 0\n").unwrap();

        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        assert!(validate_client(&path).is_ok());

        // access(2) grants X_OK even to root only when some x bit is set
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();
        let err = validate_client(&path).unwrap_err();
        assert!(matches!(err, MonitorError::ClientNotExecutable(_)));
    }

    #[test]
    fn test_resolve_explicit_path_is_untouched() {
        let path = resolve_client_path("./bin/wayland-osd-client").unwrap();
        assert_eq!(path, PathBuf::from("./bin/wayland-osd-client"));
    }

    #[test]
    fn test_resolve_bare_name_missing_from_path() {
        let err = resolve_client_path("definitely-not-an-osd-client-binary").unwrap_err();
        assert!(matches!(err, MonitorError::ClientNotInPath { .. }));
    }

    #[test]
    fn test_spawn_failure_is_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let mut launcher = ClientLauncher::new(dir.path().join("gone"));
        launcher.launch(&request(false, None));
        assert!(launcher.children.is_empty());
    }
}
