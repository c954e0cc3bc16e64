use crate::{DriveInfo, MediaKind, WipeError, WipeResult};
use regex::Regex;
use std::fs;
use std::path::Path;
use sysinfo::{DiskKind, Disks};

/// Source of media-kind information for the device behind a path
#[cfg_attr(test, mockall::automock)]
pub trait MediaProbe: Send + Sync {
    fn probe(&self, path: &Path) -> WipeResult<DriveInfo>;
}

/// Platform drive classifier
///
/// Linux reads the block device's `queue/rotational` attribute, macOS asks
/// `diskutil`, Windows asks PowerShell for the physical disk media type.
/// Every platform falls back to the `sysinfo` disk list.
#[derive(Debug, Default, Clone, Copy)]
pub struct DriveClassifier;

impl DriveClassifier {
    /// Classify with the platform probe
    pub fn classify(path: &Path) -> DriveInfo {
        Self::classify_with(&DriveClassifier, path)
    }

    /// Classify with any probe. Probe failures resolve to
    /// `MediaKind::Unknown`; the erase policy for that lives on
    /// [`DriveInfo::erase_method`].
    pub fn classify_with(probe: &dyn MediaProbe, path: &Path) -> DriveInfo {
        match probe.probe(path) {
            Ok(info) => info,
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "Drive detection failed");
                DriveInfo::unknown()
            }
        }
    }

    fn probe_platform(path: &Path) -> WipeResult<DriveInfo> {
        let primary = Self::probe_native(path);
        if matches!(primary, Ok(ref info) if info.kind != MediaKind::Unknown) {
            return primary;
        }

        match Self::probe_sysinfo(path) {
            Ok(info) if info.kind != MediaKind::Unknown => Ok(info),
            fallback => primary.or(fallback),
        }
    }

    #[cfg(target_os = "linux")]
    fn probe_native(path: &Path) -> WipeResult<DriveInfo> {
        use std::os::unix::fs::MetadataExt;

        let dev = fs::metadata(path)
            .map_err(|e| WipeError::DetectionFailed(format!("{}: {}", path.display(), e)))?
            .dev();

        let node = std::path::PathBuf::from(format!(
            "/sys/dev/block/{}:{}",
            nix::sys::stat::major(dev),
            nix::sys::stat::minor(dev)
        ));

        let device_dir = fs::canonicalize(&node)
            .map_err(|e| WipeError::DetectionFailed(format!("{}: {}", node.display(), e)))?;

        Self::rotational_from_sysfs(&device_dir)
    }

    #[cfg(target_os = "macos")]
    fn probe_native(path: &Path) -> WipeResult<DriveInfo> {
        use std::process::Command;

        let mount = super::mount_point(path)?;
        let output = Command::new("diskutil")
            .arg("info")
            .arg(&mount)
            .output()
            .map_err(|e| WipeError::DetectionFailed(format!("diskutil failed: {}", e)))?;

        if !output.status.success() {
            return Err(WipeError::DetectionFailed(format!(
                "diskutil failed: {}",
                String::from_utf8_lossy(&output.stderr)
            )));
        }

        let text = String::from_utf8_lossy(&output.stdout);
        let device = Self::extract_field(&text, "Device Node:")
            .unwrap_or_else(|| mount.display().to_string());

        Ok(DriveInfo::new(Self::parse_diskutil_solid_state(&text), device))
    }

    #[cfg(windows)]
    fn probe_native(path: &Path) -> WipeResult<DriveInfo> {
        use std::process::Command;

        let letter = Self::drive_letter(path).ok_or_else(|| {
            WipeError::DetectionFailed(format!("no drive letter in {}", path.display()))
        })?;

        let script = format!(
            "Get-PhysicalDisk | Where-Object {{ $_.DeviceID -eq (Get-Partition -DriveLetter {}).DiskNumber }} | Select-Object -ExpandProperty MediaType",
            letter
        );

        let output = Command::new("powershell")
            .args(["-NoProfile", "-Command", &script])
            .output()
            .map_err(|e| WipeError::DetectionFailed(format!("powershell failed: {}", e)))?;

        let text = String::from_utf8_lossy(&output.stdout);
        Ok(DriveInfo::new(Self::parse_media_type(&text), format!("{}:", letter)))
    }

    #[cfg(not(any(target_os = "linux", target_os = "macos", windows)))]
    fn probe_native(_path: &Path) -> WipeResult<DriveInfo> {
        Err(WipeError::DetectionFailed(
            "no native probe for this platform".to_string(),
        ))
    }

    /// Use the `sysinfo` disk whose mount point is the longest prefix of `path`
    fn probe_sysinfo(path: &Path) -> WipeResult<DriveInfo> {
        let canonical = path
            .canonicalize()
            .map_err(|e| WipeError::DetectionFailed(format!("{}: {}", path.display(), e)))?;

        let disks = Disks::new_with_refreshed_list();
        let disk = disks
            .list()
            .iter()
            .filter(|d| canonical.starts_with(d.mount_point()))
            .max_by_key(|d| d.mount_point().as_os_str().len())
            .ok_or_else(|| {
                WipeError::DetectionFailed(format!("no disk mounted above {}", canonical.display()))
            })?;

        let kind = match disk.kind() {
            DiskKind::SSD => MediaKind::Flash,
            DiskKind::HDD => MediaKind::Rotational,
            DiskKind::Unknown(_) => MediaKind::Unknown,
        };

        Ok(DriveInfo::new(kind, disk.name().to_string_lossy()))
    }

    /// Read `queue/rotational` for a sysfs block device directory.
    /// Partitions carry no queue of their own, so they defer to the parent disk.
    pub(crate) fn rotational_from_sysfs(device_dir: &Path) -> WipeResult<DriveInfo> {
        let disk_dir = if device_dir.join("partition").exists() {
            device_dir.parent().unwrap_or(device_dir)
        } else {
            device_dir
        };

        let name = disk_dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| {
                WipeError::DetectionFailed(format!("invalid sysfs path {}", disk_dir.display()))
            })?;

        let flag_path = disk_dir.join("queue").join("rotational");
        let raw = fs::read_to_string(&flag_path)
            .map_err(|e| WipeError::DetectionFailed(format!("{}: {}", flag_path.display(), e)))?;

        Ok(DriveInfo::new(Self::parse_rotational_flag(&raw)?, name))
    }

    pub(crate) fn parse_rotational_flag(raw: &str) -> WipeResult<MediaKind> {
        match raw.trim() {
            "0" => Ok(MediaKind::Flash),
            "1" => Ok(MediaKind::Rotational),
            other => Err(WipeError::DetectionFailed(format!(
                "unexpected rotational flag {:?}",
                other
            ))),
        }
    }

    /// `Solid State: Yes|No` line of `diskutil info`
    #[cfg_attr(not(target_os = "macos"), allow(dead_code))]
    pub(crate) fn parse_diskutil_solid_state(output: &str) -> MediaKind {
        let answer = Regex::new(r"(?m)^\s*Solid State:\s*(\w+)")
            .ok()
            .and_then(|re| re.captures(output))
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string());

        match answer.as_deref() {
            Some("Yes") => MediaKind::Flash,
            Some("No") => MediaKind::Rotational,
            _ => MediaKind::Unknown,
        }
    }

    /// PowerShell `MediaType` output (`SSD`, `HDD`, `Unspecified`)
    #[cfg_attr(not(windows), allow(dead_code))]
    pub(crate) fn parse_media_type(output: &str) -> MediaKind {
        let media = output.trim().to_ascii_uppercase();

        if media.contains("SSD") || media.contains("NVME") || media.contains("SCM") {
            MediaKind::Flash
        } else if media.contains("HDD") {
            MediaKind::Rotational
        } else {
            MediaKind::Unknown
        }
    }

    /// Drive letter of a Windows-style path (`C:\...`)
    #[cfg_attr(not(windows), allow(dead_code))]
    pub(crate) fn drive_letter(path: &Path) -> Option<char> {
        let text = path.to_string_lossy();
        let text = text.strip_prefix(r"\\?\").unwrap_or(&text);
        let mut chars = text.chars();

        match (chars.next(), chars.next()) {
            (Some(letter), Some(':')) if letter.is_ascii_alphabetic() => {
                Some(letter.to_ascii_uppercase())
            }
            _ => None,
        }
    }

    /// Extract a `Field: value` entry from utility output
    #[cfg_attr(not(target_os = "macos"), allow(dead_code))]
    pub(crate) fn extract_field(output: &str, field_name: &str) -> Option<String> {
        output
            .lines()
            .find(|line| line.trim_start().starts_with(field_name))?
            .split_once(':')
            .map(|(_, value)| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }
}

impl MediaProbe for DriveClassifier {
    fn probe(&self, path: &Path) -> WipeResult<DriveInfo> {
        Self::probe_platform(path)
    }
}
