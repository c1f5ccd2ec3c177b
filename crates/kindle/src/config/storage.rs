use crate::mirror::{Mirror, Translate};
use crate::options::TranslateOptions;
use crate::translate::Translated;
use crate::{source, target, tree};

impl Translate for source::Storage {
    type Target = target::Storage;

    fn translate(&self, options: &TranslateOptions) -> Translated<target::Storage> {
        let mut m = Mirror::new();
        let mut to = target::Storage {
            directories: m.each("directories", "directories", &self.directories, options),
            disks: m.each("disks", "disks", &self.disks, options),
            files: m.each("files", "files", &self.files, options),
            filesystems: m.each("filesystems", "filesystems", &self.filesystems, options),
            links: m.each("links", "links", &self.links, options),
            luks: m.each("luks", "luks", &self.luks, options),
            raid: m.each("raid", "raid", &self.raid, options),
        };

        if !self.trees.is_empty() {
            let (translations, report) = tree::expand(&self.trees, &mut to, options);
            m.splice(&[], &[], ((), translations, report));
        }

        m.finish(to)
    }
}

impl Translate for source::Disk {
    type Target = target::Disk;

    fn translate(&self, options: &TranslateOptions) -> Translated<target::Disk> {
        let mut m = Mirror::new();
        let to = target::Disk {
            device: m.copy("device", &self.device),
            partitions: m.each("partitions", "partitions", &self.partitions, options),
            wipe_table: m.rename("wipe_table", "wipeTable", &self.wipe_table),
        };
        m.finish(to)
    }
}

impl Translate for source::Partition {
    type Target = target::Partition;

    fn translate(&self, _: &TranslateOptions) -> Translated<target::Partition> {
        let mut m = Mirror::new();
        let to = target::Partition {
            guid: m.copy("guid", &self.guid),
            label: m.copy("label", &self.label),
            number: m.copy("number", &self.number),
            resize: m.copy("resize", &self.resize),
            should_exist: m.rename("should_exist", "shouldExist", &self.should_exist),
            size_mib: m.rename("size_mib", "sizeMiB", &self.size_mib),
            start_mib: m.rename("start_mib", "startMiB", &self.start_mib),
            type_guid: m.rename("type_guid", "typeGuid", &self.type_guid),
            wipe_partition_entry: m.rename(
                "wipe_partition_entry",
                "wipePartitionEntry",
                &self.wipe_partition_entry,
            ),
        };
        m.finish(to)
    }
}

impl Translate for source::Raid {
    type Target = target::Raid;

    fn translate(&self, _: &TranslateOptions) -> Translated<target::Raid> {
        let mut m = Mirror::new();
        let to = target::Raid {
            devices: m.copy_list("devices", "devices", &self.devices),
            level: m.copy("level", &self.level),
            name: m.copy("name", &self.name),
            options: m.copy_list("options", "options", &self.options),
            spares: m.copy("spares", &self.spares),
        };
        m.finish(to)
    }
}

impl Translate for source::Luks {
    type Target = target::Luks;

    fn translate(&self, options: &TranslateOptions) -> Translated<target::Luks> {
        let mut m = Mirror::new();
        let to = target::Luks {
            clevis: m.nest_opt("clevis", "clevis", &self.clevis, options),
            device: m.copy("device", &self.device),
            key_file: m.nest("key_file", "keyFile", &self.key_file, options),
            label: m.copy("label", &self.label),
            name: m.copy("name", &self.name),
            options: m.copy_list("options", "options", &self.options),
            uuid: m.copy("uuid", &self.uuid),
            wipe_volume: m.rename("wipe_volume", "wipeVolume", &self.wipe_volume),
        };
        m.finish(to)
    }
}

impl Translate for source::Clevis {
    type Target = target::Clevis;

    fn translate(&self, options: &TranslateOptions) -> Translated<target::Clevis> {
        let mut m = Mirror::new();
        let to = target::Clevis {
            custom: m.nest_opt("custom", "custom", &self.custom, options),
            tang: m.each("tang", "tang", &self.tang, options),
            threshold: m.copy("threshold", &self.threshold),
            tpm2: m.copy("tpm2", &self.tpm2),
        };
        m.finish(to)
    }
}

impl Translate for source::Custom {
    type Target = target::Custom;

    fn translate(&self, _: &TranslateOptions) -> Translated<target::Custom> {
        let mut m = Mirror::new();
        let to = target::Custom {
            config: m.copy("config", &self.config),
            needs_network: m.rename("needs_network", "needsNetwork", &self.needs_network),
            pin: m.copy("pin", &self.pin),
        };
        m.finish(to)
    }
}

impl Translate for source::Tang {
    type Target = target::Tang;

    fn translate(&self, _: &TranslateOptions) -> Translated<target::Tang> {
        let mut m = Mirror::new();
        let to = target::Tang {
            thumbprint: m.copy("thumbprint", &self.thumbprint),
            url: m.copy("url", &self.url),
        };
        m.finish(to)
    }
}

impl Translate for source::Filesystem {
    type Target = target::Filesystem;

    /// `with_mount_unit` has no counterpart here, see [crate::mount_unit]
    fn translate(&self, _: &TranslateOptions) -> Translated<target::Filesystem> {
        let mut m = Mirror::new();
        let to = target::Filesystem {
            device: m.copy("device", &self.device),
            format: m.copy("format", &self.format),
            label: m.copy("label", &self.label),
            mount_options: m.copy_list("mount_options", "mountOptions", &self.mount_options),
            options: m.copy_list("options", "options", &self.options),
            path: m.copy("path", &self.path),
            uuid: m.copy("uuid", &self.uuid),
            wipe_filesystem: m.rename("wipe_filesystem", "wipeFilesystem", &self.wipe_filesystem),
        };
        m.finish(to)
    }
}

impl Translate for source::NodeUser {
    type Target = target::NodeUser;

    fn translate(&self, _: &TranslateOptions) -> Translated<target::NodeUser> {
        let mut m = Mirror::new();
        let to = target::NodeUser {
            id: m.copy("id", &self.id),
            name: m.copy("name", &self.name),
        };
        m.finish(to)
    }
}

impl Translate for source::NodeGroup {
    type Target = target::NodeGroup;

    fn translate(&self, _: &TranslateOptions) -> Translated<target::NodeGroup> {
        let mut m = Mirror::new();
        let to = target::NodeGroup {
            id: m.copy("id", &self.id),
            name: m.copy("name", &self.name),
        };
        m.finish(to)
    }
}

impl Translate for source::File {
    type Target = target::File;

    fn translate(&self, options: &TranslateOptions) -> Translated<target::File> {
        let mut m = Mirror::new();
        let to = target::File {
            path: m.copy("path", &self.path),
            overwrite: m.copy("overwrite", &self.overwrite),
            user: m.nest("user", "user", &self.user, options),
            group: m.nest("group", "group", &self.group, options),
            mode: m.copy("mode", &self.mode),
            contents: m.nest("contents", "contents", &self.contents, options),
            append: m.each("append", "append", &self.append, options),
        };
        m.finish(to)
    }
}

impl Translate for source::Directory {
    type Target = target::Directory;

    fn translate(&self, options: &TranslateOptions) -> Translated<target::Directory> {
        let mut m = Mirror::new();
        let to = target::Directory {
            path: m.copy("path", &self.path),
            overwrite: m.copy("overwrite", &self.overwrite),
            user: m.nest("user", "user", &self.user, options),
            group: m.nest("group", "group", &self.group, options),
            mode: m.copy("mode", &self.mode),
        };
        m.finish(to)
    }
}

impl Translate for source::Link {
    type Target = target::Link;

    fn translate(&self, options: &TranslateOptions) -> Translated<target::Link> {
        let mut m = Mirror::new();
        let to = target::Link {
            path: m.copy("path", &self.path),
            overwrite: m.copy("overwrite", &self.overwrite),
            user: m.nest("user", "user", &self.user, options),
            group: m.nest("group", "group", &self.group, options),
            target: m.copy("target", &self.target),
            hard: m.copy("hard", &self.hard),
        };
        m.finish(to)
    }
}
