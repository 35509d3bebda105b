use std::env;
use std::path::PathBuf;

use nix::unistd::getuid;

pub const SOCKET_ENV: &str = "MR_SOCKET";

/// Socket Unix del coordinator. El nombre lleva el uid del usuario para que
/// dos usuarios en la misma máquina no choquen.
pub fn default_socket_path() -> PathBuf {
    match env::var(SOCKET_ENV) {
        Ok(p) if !p.is_empty() => PathBuf::from(p),
        _ => socket_path_for_uid(getuid().as_raw()),
    }
}

pub fn socket_path_for_uid(uid: u32) -> PathBuf {
    PathBuf::from(format!("/var/tmp/minimr-{}.sock", uid))
}
