//! The restart primitive.

use log::{logger, warn};

/// Irreversibly restart the device.
pub trait Restart {
    /// Never returns: no further work of any kind happens after this call.
    fn trigger_restart(&self) -> !;
}

/// Restarts by ending the process with a fixed exit code, leaving the actual
/// restart to whatever supervises the process.
#[derive(Debug, Clone, Copy)]
pub struct ExitRestart {
    code: i32,
}

impl ExitRestart {
    pub const fn new(code: i32) -> Self {
        Self { code }
    }
}

impl Default for ExitRestart {
    fn default() -> Self {
        Self::new(0)
    }
}

impl Restart for ExitRestart {
    fn trigger_restart(&self) -> ! {
        warn!("System is going down!");
        logger().flush();
        std::process::exit(self.code)
    }
}
