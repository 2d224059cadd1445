//! Parsers for the `/proc` text formats the agent reads.

use std::fmt;

/// Error type for parsing failures.
#[derive(Debug)]
pub struct ParseError {
    pub message: String,
}

impl ParseError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ParseError {}

/// One `cpu*` line from `/proc/stat`, values in clock ticks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CpuTicks {
    /// None for the aggregate "cpu" line.
    pub cpu_id: Option<u32>,
    pub user: u64,
    pub nice: u64,
    pub system: u64,
    pub idle: u64,
    pub iowait: u64,
    pub irq: u64,
    pub softirq: u64,
    pub steal: u64,
    pub guest: u64,
    pub guest_nice: u64,
}

/// Parses the `cpu*` lines of `/proc/stat`.
pub fn parse_cpu_ticks(content: &str) -> Result<Vec<CpuTicks>, ParseError> {
    let mut cpus = Vec::new();
    for line in content.lines() {
        let parts: Vec<&str> = line.split_whitespace().collect();
        let Some(&first) = parts.first() else { continue };
        if !first.starts_with("cpu") {
            continue;
        }
        let cpu_id = if first == "cpu" {
            None
        } else {
            first.strip_prefix("cpu").and_then(|s| s.parse().ok())
        };
        let get = |idx: usize| -> u64 { parts.get(idx).and_then(|s| s.parse().ok()).unwrap_or(0) };
        cpus.push(CpuTicks {
            cpu_id,
            user: get(1),
            nice: get(2),
            system: get(3),
            idle: get(4),
            iowait: get(5),
            irq: get(6),
            softirq: get(7),
            steal: get(8),
            guest: get(9),
            guest_nice: get(10),
        });
    }
    if cpus.is_empty() {
        return Err(ParseError::new("no cpu lines in /proc/stat"));
    }
    Ok(cpus)
}

/// Parsed `/proc/meminfo` fields, in kB as reported by the kernel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemInfo {
    pub mem_total: u64,
    pub mem_free: u64,
    pub mem_available: u64,
    pub buffers: u64,
    pub cached: u64,
    pub swap_total: u64,
    pub swap_free: u64,
}

/// Parses `/proc/meminfo` content.
pub fn parse_meminfo(content: &str) -> Result<MemInfo, ParseError> {
    let mut info = MemInfo::default();

    let parse_kb = |line: &str| -> u64 {
        line.split_whitespace()
            .nth(1)
            .and_then(|s| s.parse().ok())
            .unwrap_or(0)
    };

    for line in content.lines() {
        if line.starts_with("MemTotal:") {
            info.mem_total = parse_kb(line);
        } else if line.starts_with("MemFree:") {
            info.mem_free = parse_kb(line);
        } else if line.starts_with("MemAvailable:") {
            info.mem_available = parse_kb(line);
        } else if line.starts_with("Buffers:") {
            info.buffers = parse_kb(line);
        } else if line.starts_with("Cached:") {
            info.cached = parse_kb(line);
        } else if line.starts_with("SwapTotal:") {
            info.swap_total = parse_kb(line);
        } else if line.starts_with("SwapFree:") {
            info.swap_free = parse_kb(line);
        }
    }

    if info.mem_total == 0 {
        return Err(ParseError::new("MemTotal missing from /proc/meminfo"));
    }
    Ok(info)
}

/// One device line from `/proc/diskstats`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiskStats {
    pub name: String,
    pub read_sectors: u64,
    pub written_sectors: u64,
}

/// Parses `/proc/diskstats` content.
///
/// Format: major minor name reads r_merged r_sectors r_time writes
/// w_merged w_sectors w_time io_pending io_time w_io_time [discards ...]
pub fn parse_diskstats(content: &str) -> Result<Vec<DiskStats>, ParseError> {
    let mut devices = Vec::new();
    for line in content.lines() {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 10 {
            continue;
        }
        let get = |idx: usize| -> u64 { parts.get(idx).and_then(|s| s.parse().ok()).unwrap_or(0) };
        devices.push(DiskStats {
            name: parts[2].to_string(),
            read_sectors: get(5),
            written_sectors: get(9),
        });
    }
    Ok(devices)
}

/// One interface line from `/proc/net/dev`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NetDevStats {
    pub interface: String,
    pub recv_bytes: u64,
    pub sent_bytes: u64,
}

/// Parses `/proc/net/dev` content.
///
/// The first two lines are headers. Data lines read
/// `iface: rx_bytes rx_packets ... [8 fields] tx_bytes ...`.
pub fn parse_netdev(content: &str) -> Result<Vec<NetDevStats>, ParseError> {
    let mut interfaces = Vec::new();
    for line in content.lines().skip(2) {
        let Some((iface, rest)) = line.split_once(':') else {
            continue;
        };
        let fields: Vec<&str> = rest.split_whitespace().collect();
        if fields.len() < 9 {
            return Err(ParseError::new(format!(
                "short /proc/net/dev line for '{}'",
                iface.trim()
            )));
        }
        let get = |idx: usize| -> u64 { fields.get(idx).and_then(|s| s.parse().ok()).unwrap_or(0) };
        interfaces.push(NetDevStats {
            interface: iface.trim().to_string(),
            recv_bytes: get(0),
            sent_bytes: get(8),
        });
    }
    Ok(interfaces)
}

/// One mount entry from `/proc/mounts`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MountEntry {
    pub device: String,
    pub mountpoint: String,
    pub fstype: String,
}

/// Parses `/proc/mounts` content.
///
/// Format: device mountpoint fstype options dump pass. Space, tab, newline
/// and backslash in paths arrive octal-escaped (`\040` etc.).
pub fn parse_mounts(content: &str) -> Result<Vec<MountEntry>, ParseError> {
    let mut mounts = Vec::new();
    for line in content.lines() {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 3 {
            continue;
        }
        mounts.push(MountEntry {
            device: unescape_octal(parts[0]),
            mountpoint: unescape_octal(parts[1]),
            fstype: parts[2].to_string(),
        });
    }
    Ok(mounts)
}

/// Decodes the `\NNN` octal escapes the kernel uses in mount paths.
fn unescape_octal(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'\\' && i + 3 < bytes.len() {
            let octal = &bytes[i + 1..i + 4];
            if octal.iter().all(|b| (b'0'..=b'7').contains(b)) {
                let value = (octal[0] - b'0') * 64 + (octal[1] - b'0') * 8 + (octal[2] - b'0');
                out.push(value);
                i += 4;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}
