//! mount units for filesystems
//!
//! A filesystem with `with_mount_unit: true` gets a `.mount` unit named after its mount point, so the author
//! doesn't have to write one by hand. If the author did declare a unit with that name, only what they left unset is
//! filled in.
use crate::path::Path;
use crate::translate::TranslationSet;
use crate::{path, target};

const GENERATED_BY: &str = "# Generated by kindle";

/// Escape a filesystem path the way systemd names units after paths
///
/// Surrounding and repeated slashes are dropped, the remaining slashes become `-`. Bytes other than ASCII
/// alphanumerics, `:`, `_` and `.` are written as `\xNN`, as is a leading `.`.
pub fn escape_path(path: &str) -> String {
    let mut escaped = String::new();
    for (index, component) in path.split('/').filter(|c| !c.is_empty()).enumerate() {
        if index > 0 {
            escaped.push('-');
        }
        for (position, byte) in component.bytes().enumerate() {
            let leading_dot = index == 0 && position == 0 && byte == b'.';
            if !leading_dot && (byte.is_ascii_alphanumeric() || matches!(byte, b':' | b'_' | b'.')) {
                escaped.push(byte as char);
            } else {
                escaped.push_str(&format!("\\x{byte:02x}"));
            }
        }
    }
    if escaped.is_empty() {
        escaped.push('-');
    }
    escaped
}

/// `/var/lib/containers` -> `var-lib-containers.mount`
pub fn unit_name(mount_point: &str) -> String {
    format!("{}.mount", escape_path(mount_point))
}

/// Whether mounting `device` needs the network
///
/// That's the case for a mapped LUKS volume that is unlocked through at least one Tang server.
pub fn is_remote(device: &str, luks: &[target::Luks]) -> bool {
    let Some(name) = device.strip_prefix("/dev/mapper/") else {
        return false;
    };
    luks.iter().any(|volume| {
        volume.name == name
            && volume
                .clevis
                .as_ref()
                .is_some_and(|clevis| !clevis.tang.is_empty())
    })
}

/// Contents of the generated unit for `filesystem`, which must have a path
pub fn unit_contents(filesystem: &target::Filesystem, remote: bool) -> String {
    let device = escape_path(&filesystem.device);
    let (before, target) = if remote {
        ("remote-fs.target\nDefaultDependencies=no", "remote-fs.target")
    } else {
        ("local-fs.target", "local-fs.target")
    };

    let mut contents = format!(
        "{GENERATED_BY}\n\
         [Unit]\n\
         Before={before}\n\
         Requires=systemd-fsck@{device}.service\n\
         After=systemd-fsck@{device}.service\n\
         \n\
         [Mount]\n\
         Where={}\n\
         What={}\n",
        filesystem.path.as_deref().unwrap_or_default(),
        filesystem.device,
    );
    if let Some(format) = &filesystem.format {
        contents.push_str(&format!("Type={format}\n"));
    }
    if !filesystem.mount_options.is_empty() {
        contents.push_str(&format!("Options={}\n", filesystem.mount_options.join(",")));
    }
    contents.push_str(&format!("\n[Install]\nRequiredBy={target}"));
    contents
}

/// Add or complete the mount unit for `filesystem` in `units`
///
/// `from` is the source path that asked for the unit. Target paths of the result are relative to the systemd
/// section. Filesystems without a path can't be named and are skipped.
#[tracing::instrument(level = "debug", skip_all, fields(path = ?filesystem.path))]
pub fn synthesize(
    from: &Path,
    filesystem: &target::Filesystem,
    remote: bool,
    units: &mut Vec<target::Unit>,
) -> TranslationSet {
    let mut translations = TranslationSet::default();
    let Some(mount_point) = filesystem.path.as_deref() else {
        tracing::debug!("filesystem has no path, no mount unit");
        return translations;
    };
    let name = unit_name(mount_point);

    if let Some(index) = units.iter().position(|unit| unit.name == name) {
        tracing::debug!(%name, "completing declared mount unit");
        let unit = &mut units[index];
        if unit.enabled.is_none() {
            unit.enabled = Some(true);
            translations.add(from.clone(), path!(Target, "units", index, "enabled"));
        }
        if unit.contents.is_none() {
            unit.contents = Some(unit_contents(filesystem, remote));
            translations.add(from.clone(), path!(Target, "units", index, "contents"));
        }
        return translations;
    }

    tracing::debug!(%name, remote, "generating mount unit");
    let unit = target::Unit {
        name,
        enabled: Some(true),
        contents: Some(unit_contents(filesystem, remote)),
        ..Default::default()
    };
    translations.add_from_common_source(from, &path!(Target, "units", units.len()), &unit);
    units.push(unit);
    translations
}
