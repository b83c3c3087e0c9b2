use super::{PlatformExtensions, StackUsage};

pub struct Platform;

impl PlatformExtensions for Platform {
    fn process_priority(pid: u32) -> Option<i32> {
        // Read /proc/{pid}/stat and parse priority (field 18, 0-indexed from stat)
        let path = format!("/proc/{pid}/stat");
        let contents = std::fs::read_to_string(path).ok()?;
        // comm field may contain spaces and parens, so find the closing )
        let after_comm = contents.rfind(')')? + 1;
        let fields: Vec<&str> = contents[after_comm..].split_whitespace().collect();
        // Fields after comm: state(0) ppid(1) pgrp(2) session(3) tty_nr(4)
        // tpgid(5) flags(6) minflt(7) cminflt(8) majflt(9) cmajflt(10)
        // utime(11) stime(12) cutime(13) cstime(14) priority(15) nice(16)
        fields.get(15)?.parse().ok()
    }

    fn process_stack(pid: u32) -> Option<StackUsage> {
        let status = std::fs::read_to_string(format!("/proc/{pid}/status")).ok()?;
        // Kernel threads have no VmStk line.
        let used = parse_vm_stk(&status)?;
        let size = std::fs::read_to_string(format!("/proc/{pid}/limits"))
            .ok()
            .and_then(|limits| parse_stack_limit(&limits))
            .unwrap_or(0);
        Some(StackUsage { used, size })
    }
}

/// `VmStk:      132 kB` from /proc/{pid}/status, in bytes.
fn parse_vm_stk(status: &str) -> Option<u64> {
    let value = status.lines().find_map(|l| l.strip_prefix("VmStk:"))?;
    let kb: u64 = value.trim().trim_end_matches("kB").trim().parse().ok()?;
    Some(kb * 1024)
}

/// Soft limit of `Max stack size` from /proc/{pid}/limits, in bytes.
/// `None` when unlimited.
fn parse_stack_limit(limits: &str) -> Option<u64> {
    let line = limits
        .lines()
        .find_map(|l| l.strip_prefix("Max stack size"))?;
    line.split_whitespace().next()?.parse().ok()
}
