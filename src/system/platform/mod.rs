/// Stack figures for one task, in bytes. `size` is zero when unlimited.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StackUsage {
    pub used: u64,
    pub size: u64,
}

pub trait PlatformExtensions {
    fn process_priority(pid: u32) -> Option<i32>;
    fn process_stack(pid: u32) -> Option<StackUsage>;
}

#[cfg(target_os = "linux")]
mod linux;
#[cfg(target_os = "macos")]
mod macos;
#[cfg(target_os = "windows")]
mod windows;

#[cfg(target_os = "linux")]
use linux as platform_impl;
#[cfg(target_os = "macos")]
use macos as platform_impl;
#[cfg(target_os = "windows")]
use windows as platform_impl;

pub fn process_priority(pid: u32) -> Option<i32> {
    platform_impl::Platform::process_priority(pid)
}

pub fn process_stack(pid: u32) -> Option<StackUsage> {
    platform_impl::Platform::process_stack(pid)
}
