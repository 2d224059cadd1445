//! Canned `/proc` contents for tests and non-Linux development.

use super::MockFs;

impl MockFs {
    /// A small two-core machine: one NVMe disk, two interfaces, three
    /// processes, two mounted block devices.
    pub fn typical_system() -> Self {
        let mut fs = Self::new();

        fs.add_file(
            "/proc/stat",
            "\
cpu  14000 400 4000 84000 1200 200 200 0 0 0
cpu0 7000 200 2000 42000 600 100 100 0 0 0
cpu1 7000 200 2000 42000 600 100 100 0 0 0
ctxt 123456
btime 1700000000
processes 4242
procs_running 2
procs_blocked 0
",
        );

        fs.add_file(
            "/proc/meminfo",
            "\
MemTotal:       16303932 kB
MemFree:         8112204 kB
MemAvailable:   12205820 kB
Buffers:          517172 kB
Cached:          3366200 kB
SwapCached:            0 kB
Active:          4396312 kB
Inactive:        2964132 kB
SwapTotal:       2097148 kB
SwapFree:        2097148 kB
Dirty:               328 kB
Writeback:             0 kB
",
        );

        fs.add_file(
            "/proc/diskstats",
            "\
 259       0 nvme0n1 515868 24672 39001390 129433 1257614 542490 47595824 842593 0 453412 987570 0 0 0 0 120 15543
 259       1 nvme0n1p1 1801 1 190170 372 10 10 160 8 0 100 381 0 0 0 0 0 0
 259       2 nvme0n1p2 513914 24671 38805204 128991 1257604 542480 47595664 842585 0 453300 987180 0 0 0 0 120 15543
   7       0 loop0 56 0 2288 12 0 0 0 0 0 24 12 0 0 0 0 0 0
",
        );

        fs.add_file(
            "/proc/net/dev",
            "\
Inter-|   Receive                                                |  Transmit
 face |bytes    packets errs drop fifo frame compressed multicast|bytes    packets errs drop fifo colls carrier compressed
    lo: 8742354   12421    0    0    0     0          0         0  8742354   12421    0    0    0     0       0          0
  eth0: 964213555  683214    0    0    0     0          0         0 78214332  410233    0    0    0     0       0          0
",
        );

        fs.add_file(
            "/proc/mounts",
            "\
proc /proc proc rw,nosuid,nodev,noexec,relatime 0 0
sysfs /sys sysfs rw,nosuid,nodev,noexec,relatime 0 0
/dev/nvme0n1p2 / ext4 rw,relatime 0 0
/dev/nvme0n1p1 /boot/efi vfat rw,relatime 0 0
tmpfs /tmp tmpfs rw,nosuid,nodev 0 0
",
        );
        fs.add_usage("/", 498_000_000_000, 201_000_000_000);
        fs.add_usage("/boot/efi", 535_000_000, 529_000_000);

        fs.add_comm(1, "systemd");
        fs.add_comm(1234, "sshd");
        fs.add_comm(4321, "bash");

        fs
    }
}
