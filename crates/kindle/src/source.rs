//! authored document schema
//!
//! This is what users write. It is deserialized by the caller (see the `kindle` binary) and handed to
//! [crate::config::translate]. Field names are the YAML names and are what source [crate::path::Path]s refer to.
use serde::Deserialize;

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub variant: Option<String>,
    pub version: Option<String>,
    pub ignition: Ignition,
    pub passwd: Passwd,
    pub storage: Storage,
    pub systemd: Systemd,
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Ignition {
    pub config: IgnitionConfig,
    pub timeouts: Timeouts,
    pub security: Security,
    pub proxy: Proxy,
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct IgnitionConfig {
    pub merge: Vec<Resource>,
    pub replace: Resource,
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Timeouts {
    pub http_response_headers: Option<i64>,
    pub http_total: Option<i64>,
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Security {
    pub tls: Tls,
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Tls {
    pub certificate_authorities: Vec<Resource>,
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Proxy {
    pub http_proxy: Option<String>,
    pub https_proxy: Option<String>,
    pub no_proxy: Vec<String>,
}

/// Content reference
///
/// At most one of `source`, `inline` and `local` is expected to be set. When more are set the first one in that
/// order wins.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Resource {
    pub compression: Option<String>,
    pub http_headers: Vec<HttpHeader>,
    pub source: Option<String>,
    pub inline: Option<String>,
    pub local: Option<String>,
    pub verification: Verification,
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct HttpHeader {
    pub name: String,
    pub value: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Verification {
    pub hash: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Passwd {
    pub users: Vec<PasswdUser>,
    pub groups: Vec<PasswdGroup>,
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct PasswdUser {
    pub name: String,
    pub gecos: Option<String>,
    pub groups: Vec<String>,
    pub home_dir: Option<String>,
    pub no_create_home: Option<bool>,
    pub no_log_init: Option<bool>,
    pub no_user_group: Option<bool>,
    pub password_hash: Option<String>,
    pub primary_group: Option<String>,
    pub shell: Option<String>,
    pub ssh_authorized_keys: Vec<String>,
    pub system: Option<bool>,
    pub uid: Option<i64>,
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct PasswdGroup {
    pub name: String,
    pub gid: Option<i64>,
    pub password_hash: Option<String>,
    pub system: Option<bool>,
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Storage {
    pub directories: Vec<Directory>,
    pub disks: Vec<Disk>,
    pub files: Vec<File>,
    pub filesystems: Vec<Filesystem>,
    pub links: Vec<Link>,
    pub luks: Vec<Luks>,
    pub raid: Vec<Raid>,
    pub trees: Vec<Tree>,
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Disk {
    pub device: String,
    pub partitions: Vec<Partition>,
    pub wipe_table: Option<bool>,
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Partition {
    pub guid: Option<String>,
    pub label: Option<String>,
    pub number: i64,
    pub resize: Option<bool>,
    pub should_exist: Option<bool>,
    pub size_mib: Option<i64>,
    pub start_mib: Option<i64>,
    pub type_guid: Option<String>,
    pub wipe_partition_entry: Option<bool>,
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Raid {
    pub devices: Vec<String>,
    pub level: String,
    pub name: String,
    pub options: Vec<String>,
    pub spares: Option<i64>,
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Luks {
    pub clevis: Option<Clevis>,
    pub device: Option<String>,
    pub key_file: Resource,
    pub label: Option<String>,
    pub name: String,
    pub options: Vec<String>,
    pub uuid: Option<String>,
    pub wipe_volume: Option<bool>,
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Clevis {
    pub custom: Option<Custom>,
    pub tang: Vec<Tang>,
    pub threshold: Option<i64>,
    pub tpm2: Option<bool>,
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Custom {
    pub config: String,
    pub needs_network: Option<bool>,
    pub pin: String,
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Tang {
    pub thumbprint: Option<String>,
    pub url: String,
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Filesystem {
    pub device: String,
    pub format: Option<String>,
    pub label: Option<String>,
    pub mount_options: Vec<String>,
    pub options: Vec<String>,
    pub path: Option<String>,
    pub uuid: Option<String>,
    pub wipe_filesystem: Option<bool>,
    /// generate a mount unit for this filesystem
    pub with_mount_unit: Option<bool>,
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct NodeUser {
    pub id: Option<i64>,
    pub name: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct NodeGroup {
    pub id: Option<i64>,
    pub name: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct File {
    pub path: String,
    pub overwrite: Option<bool>,
    pub user: NodeUser,
    pub group: NodeGroup,
    pub mode: Option<i64>,
    pub contents: Resource,
    pub append: Vec<Resource>,
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Directory {
    pub path: String,
    pub overwrite: Option<bool>,
    pub user: NodeUser,
    pub group: NodeGroup,
    pub mode: Option<i64>,
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Link {
    pub path: String,
    pub overwrite: Option<bool>,
    pub user: NodeUser,
    pub group: NodeGroup,
    pub target: String,
    pub hard: Option<bool>,
}

/// A local directory to import into the target filesystem
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Tree {
    /// directory relative to the files directory
    pub local: String,
    /// where to place the tree, defaults to `/`
    pub path: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Systemd {
    pub units: Vec<Unit>,
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Unit {
    pub name: String,
    pub enabled: Option<bool>,
    pub mask: Option<bool>,
    pub contents: Option<String>,
    pub dropins: Vec<Dropin>,
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Dropin {
    pub name: String,
    pub contents: Option<String>,
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn deserialize_yaml() {
        let config: Config = serde_yaml::from_str(
            "\
variant: fcos
version: 1.3.0
storage:
  files:
    - path: /etc/motd
      contents:
        inline: hello
  trees:
    - local: tree
      path: /etc
",
        )
        .expect("valid document");

        assert_eq!(config.version.as_deref(), Some("1.3.0"));
        assert_eq!(
            config.storage.files[0].contents.inline.as_deref(),
            Some("hello")
        );
        assert_eq!(
            config.storage.trees,
            vec![Tree {
                local: "tree".into(),
                path: Some("/etc".into())
            }]
        );
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result = serde_yaml::from_str::<Config>("storage: { filez: [] }");
        assert!(result.is_err());
    }
}
