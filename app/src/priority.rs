use std::io;

pub const REALTIME_PRIORITY: libc::c_int = 99;

/// Moves the calling process onto the FIFO real-time scheduler so sensor
/// polling keeps its cadence under load. Needs `CAP_SYS_NICE`.
pub fn raise_to_realtime(priority: libc::c_int) -> io::Result<()> {
    let param = libc::sched_param {
        sched_priority: priority,
    };
    // SAFETY: `param` is a valid sched_param for the duration of the call.
    let ret = unsafe { libc::sched_setscheduler(0, libc::SCHED_FIFO, &param) };
    if ret == 0 {
        Ok(())
    } else {
        Err(io::Error::last_os_error())
    }
}
