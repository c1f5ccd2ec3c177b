use crate::mirror::{Mirror, Translate};
use crate::options::TranslateOptions;
use crate::translate::Translated;
use crate::{source, target};

impl Translate for source::Passwd {
    type Target = target::Passwd;

    fn translate(&self, options: &TranslateOptions) -> Translated<target::Passwd> {
        let mut m = Mirror::new();
        let to = target::Passwd {
            users: m.each("users", "users", &self.users, options),
            groups: m.each("groups", "groups", &self.groups, options),
        };
        m.finish(to)
    }
}

impl Translate for source::PasswdUser {
    type Target = target::PasswdUser;

    fn translate(&self, _: &TranslateOptions) -> Translated<target::PasswdUser> {
        let mut m = Mirror::new();
        let to = target::PasswdUser {
            name: m.copy("name", &self.name),
            gecos: m.copy("gecos", &self.gecos),
            groups: m.copy_list("groups", "groups", &self.groups),
            home_dir: m.rename("home_dir", "homeDir", &self.home_dir),
            no_create_home: m.rename("no_create_home", "noCreateHome", &self.no_create_home),
            no_log_init: m.rename("no_log_init", "noLogInit", &self.no_log_init),
            no_user_group: m.rename("no_user_group", "noUserGroup", &self.no_user_group),
            password_hash: m.rename("password_hash", "passwordHash", &self.password_hash),
            primary_group: m.rename("primary_group", "primaryGroup", &self.primary_group),
            shell: m.copy("shell", &self.shell),
            ssh_authorized_keys: m.copy_list(
                "ssh_authorized_keys",
                "sshAuthorizedKeys",
                &self.ssh_authorized_keys,
            ),
            system: m.copy("system", &self.system),
            uid: m.copy("uid", &self.uid),
        };
        m.finish(to)
    }
}

impl Translate for source::PasswdGroup {
    type Target = target::PasswdGroup;

    fn translate(&self, _: &TranslateOptions) -> Translated<target::PasswdGroup> {
        let mut m = Mirror::new();
        let to = target::PasswdGroup {
            name: m.copy("name", &self.name),
            gid: m.copy("gid", &self.gid),
            password_hash: m.rename("password_hash", "passwordHash", &self.password_hash),
            system: m.copy("system", &self.system),
        };
        m.finish(to)
    }
}
