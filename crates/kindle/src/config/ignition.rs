use crate::mirror::{Mirror, Translate};
use crate::options::TranslateOptions;
use crate::translate::Translated;
use crate::{source, target};

impl Translate for source::Ignition {
    type Target = target::Ignition;

    fn translate(&self, options: &TranslateOptions) -> Translated<target::Ignition> {
        let mut m = Mirror::new();
        let to = target::Ignition {
            config: m.nest("config", "config", &self.config, options),
            timeouts: m.nest("timeouts", "timeouts", &self.timeouts, options),
            security: m.nest("security", "security", &self.security, options),
            proxy: m.nest("proxy", "proxy", &self.proxy, options),
            // set by the document translation
            version: String::new(),
        };
        m.finish(to)
    }
}

impl Translate for source::IgnitionConfig {
    type Target = target::IgnitionConfig;

    fn translate(&self, options: &TranslateOptions) -> Translated<target::IgnitionConfig> {
        let mut m = Mirror::new();
        let to = target::IgnitionConfig {
            merge: m.each("merge", "merge", &self.merge, options),
            replace: m.nest("replace", "replace", &self.replace, options),
        };
        m.finish(to)
    }
}

impl Translate for source::Timeouts {
    type Target = target::Timeouts;

    fn translate(&self, _: &TranslateOptions) -> Translated<target::Timeouts> {
        let mut m = Mirror::new();
        let to = target::Timeouts {
            http_response_headers: m.rename(
                "http_response_headers",
                "httpResponseHeaders",
                &self.http_response_headers,
            ),
            http_total: m.rename("http_total", "httpTotal", &self.http_total),
        };
        m.finish(to)
    }
}

impl Translate for source::Security {
    type Target = target::Security;

    fn translate(&self, options: &TranslateOptions) -> Translated<target::Security> {
        let mut m = Mirror::new();
        let to = target::Security {
            tls: m.nest("tls", "tls", &self.tls, options),
        };
        m.finish(to)
    }
}

impl Translate for source::Tls {
    type Target = target::Tls;

    fn translate(&self, options: &TranslateOptions) -> Translated<target::Tls> {
        let mut m = Mirror::new();
        let to = target::Tls {
            certificate_authorities: m.each(
                "certificate_authorities",
                "certificateAuthorities",
                &self.certificate_authorities,
                options,
            ),
        };
        m.finish(to)
    }
}

impl Translate for source::Proxy {
    type Target = target::Proxy;

    fn translate(&self, _: &TranslateOptions) -> Translated<target::Proxy> {
        let mut m = Mirror::new();
        let to = target::Proxy {
            http_proxy: m.rename("http_proxy", "httpProxy", &self.http_proxy),
            https_proxy: m.rename("https_proxy", "httpsProxy", &self.https_proxy),
            no_proxy: m.copy_list("no_proxy", "noProxy", &self.no_proxy),
        };
        m.finish(to)
    }
}
