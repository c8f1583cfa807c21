use crate::error::ActivateError;

pub trait HostPort: Send + Sync {
    fn euid(&self) -> u32;

    /// Fails unless running as root.
    fn require_root(&self) -> Result<(), ActivateError> {
        match self.euid() {
            0 => Ok(()),
            euid => Err(ActivateError::Permission { euid }),
        }
    }
}

pub struct Host;

impl HostPort for Host {
    #[cfg(unix)]
    fn euid(&self) -> u32 {
        // SAFETY: geteuid has no preconditions and cannot fail.
        unsafe { libc::geteuid() }
    }

    #[cfg(not(unix))]
    fn euid(&self) -> u32 {
        u32::MAX
    }
}
