// src/miner/affinity.rs
//! CPU pinning for worker threads

use std::io;

/// Picks the CPU for worker `thread_id` from an affinity bit mask
///
/// Worker *i* gets the *i*-th set bit, wrapping around when there are more
/// workers than CPUs in the mask. An empty mask means "no pinning".
pub fn cpu_for_thread(mask: u64, thread_id: usize) -> Option<usize> {
    let cpus: Vec<usize> = (0..64).filter(|bit| mask & (1u64 << bit) != 0).collect();
    if cpus.is_empty() {
        return None;
    }
    Some(cpus[thread_id % cpus.len()])
}

/// Pins the calling thread to `cpu`
///
/// On non-Linux platforms this is a no-op.
pub fn pin_current_thread(cpu: usize) -> io::Result<()> {
    #[cfg(target_os = "linux")]
    {
        pin_current_thread_linux(cpu)
    }
    #[cfg(not(target_os = "linux"))]
    {
        let _ = cpu;
        Ok(())
    }
}

#[cfg(target_os = "linux")]
#[allow(unsafe_code)]
fn pin_current_thread_linux(cpu: usize) -> io::Result<()> {
    let res = unsafe {
        let mut set: libc::cpu_set_t = std::mem::zeroed();
        libc::CPU_ZERO(&mut set);
        libc::CPU_SET(cpu, &mut set);
        libc::sched_setaffinity(0, std::mem::size_of::<libc::cpu_set_t>(), &set)
    };
    if res != 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}
