// src/exec/load.rs

//! Optional load-average throttling for the scheduler.
//!
//! With `--load N` the executor will not start new processes while the
//! one-minute load average is at or above `N`. At least one process is
//! always allowed when nothing is running, so a loaded machine slows the
//! run down but never stalls it.

use std::time::Duration;

/// How often a throttled scheduler re-samples the load while waiting.
pub const LOAD_RECHECK_INTERVAL: Duration = Duration::from_millis(250);

/// Source of the one-minute load average.
pub trait LoadSource: Send {
    /// `None` when the platform cannot report a load average.
    fn one_minute(&mut self) -> Option<f64>;
}

/// Load average reported by the operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemLoad;

impl LoadSource for SystemLoad {
    #[cfg(unix)]
    fn one_minute(&mut self) -> Option<f64> {
        let mut loads = [0f64; 3];
        // SAFETY: `loads` is a valid, writable buffer of three doubles and
        // getloadavg writes at most `nelem` entries into it.
        let n = unsafe { libc::getloadavg(loads.as_mut_ptr(), 3) };
        if n < 1 { None } else { Some(loads[0]) }
    }

    #[cfg(not(unix))]
    fn one_minute(&mut self) -> Option<f64> {
        None
    }
}

/// Clamp `capacity` by the headroom left under `max_load`.
///
/// Returns the capacity unchanged when throttling is disabled
/// (`max_load <= 0`) or the load is unknown.
pub fn clamp_capacity(capacity: usize, max_load: f64, load: Option<f64>, pending: usize) -> usize {
    if max_load <= 0.0 {
        return capacity;
    }
    let Some(load) = load else {
        return capacity;
    };

    let headroom = (max_load - load).max(0.0);
    let allowed = headroom.floor() as usize;

    if allowed >= capacity {
        capacity
    } else if allowed == 0 && pending == 0 && capacity > 0 {
        1
    } else {
        allowed
    }
}
