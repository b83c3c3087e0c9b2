use super::{PlatformExtensions, StackUsage};

pub struct Platform;

impl PlatformExtensions for Platform {
    fn process_priority(pid: u32) -> Option<i32> {
        // Use libc getpriority (libc is a transitive dep of sysinfo)
        // Clear errno before call
        unsafe { *libc::__error() = 0 };
        let prio = unsafe { libc::getpriority(libc::PRIO_PROCESS, pid as libc::id_t) };
        // getpriority returns -1 on error, but -1 can also be a valid priority
        // Check errno to distinguish
        let errno = unsafe { *libc::__error() };
        if prio == -1 && errno != 0 {
            None
        } else {
            Some(prio)
        }
    }

    fn process_stack(_pid: u32) -> Option<StackUsage> {
        // Per-process stack usage is not exposed without task_for_pid.
        None
    }
}
