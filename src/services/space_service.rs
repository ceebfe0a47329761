use std::path::Path;
use sysinfo::Disks;

/// Free-space source for move's storage check. Injected so tests can force
/// exhaustion without filling a disk.
pub trait SpaceProbe: Send + Sync {
    /// Available bytes on the volume holding `path`, or `None` when the
    /// volume cannot be resolved (the check is then skipped).
    fn available_space(&self, path: &Path) -> Option<u64>;
}

/// Default probe backed by the OS disk list; picks the longest mount point
/// that prefixes `path`.
pub struct DiskSpace;

impl SpaceProbe for DiskSpace {
    fn available_space(&self, path: &Path) -> Option<u64> {
        let disks = Disks::new_with_refreshed_list();
        disks
            .iter()
            .filter(|disk| path.starts_with(disk.mount_point()))
            .max_by_key(|disk| disk.mount_point().as_os_str().len())
            .map(|disk| disk.available_space())
    }
}
