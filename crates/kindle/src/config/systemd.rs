use crate::mirror::{Mirror, Translate};
use crate::options::TranslateOptions;
use crate::translate::Translated;
use crate::{source, target};

impl Translate for source::Systemd {
    type Target = target::Systemd;

    fn translate(&self, options: &TranslateOptions) -> Translated<target::Systemd> {
        let mut m = Mirror::new();
        let to = target::Systemd {
            units: m.each("units", "units", &self.units, options),
        };
        m.finish(to)
    }
}

impl Translate for source::Unit {
    type Target = target::Unit;

    fn translate(&self, options: &TranslateOptions) -> Translated<target::Unit> {
        let mut m = Mirror::new();
        let to = target::Unit {
            name: m.copy("name", &self.name),
            enabled: m.copy("enabled", &self.enabled),
            mask: m.copy("mask", &self.mask),
            contents: m.copy("contents", &self.contents),
            dropins: m.each("dropins", "dropins", &self.dropins, options),
        };
        m.finish(to)
    }
}

impl Translate for source::Dropin {
    type Target = target::Dropin;

    fn translate(&self, _: &TranslateOptions) -> Translated<target::Dropin> {
        let mut m = Mirror::new();
        let to = target::Dropin {
            name: m.copy("name", &self.name),
            contents: m.copy("contents", &self.contents),
        };
        m.finish(to)
    }
}
