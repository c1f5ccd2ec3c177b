//! content references
//!
//! Authors can point at content three ways: a remote URL (`source`), a literal (`inline`) or a file below the files
//! directory (`local`). The target format only knows URLs, so literal and local contents are embedded as `data:`
//! URLs. Remote URLs are passed through untouched.
//!
//! ### Encoding
//!
//! | contents                                    | url                            | compression   |
//! |---------------------------------------------|--------------------------------|---------------|
//! | explicit `compression` set                  | `data:,<url-escaped>`          | kept as given |
//! | auto compression disabled                   | `data:,<url-escaped>`          | `""`          |
//! | shorter than [AUTO_COMPRESSION_THRESHOLD]   | `data:,<url-escaped>`          | `""`          |
//! | gzip+base64 no longer than base64           | `data:;base64,<base64 of gzip>`| `"gzip"`      |
//! | otherwise                                   | `data:;base64,<base64>`        | `""`          |
//!
//! An empty compression is written on purpose: it stops the consumer from inheriting a compression setting from a
//! parent config.
use crate::error::Error;
use crate::mirror::{Mirror, Translate};
use crate::options::TranslateOptions;
use crate::translate::Translated;
use crate::{path, source, target, util};
use data_encoding::BASE64;
use std::io::Write;

/// Contents shorter than this are always embedded URL-escaped
pub const AUTO_COMPRESSION_THRESHOLD: usize = 32;

/// An embedded `data:` URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrl {
    pub url: String,
    /// Compression to record next to the URL; `None` keeps whatever the author set
    pub compression: Option<String>,
}

/// Encode `contents` as a `data:` URL
///
/// `compression` is the author's explicit compression, an empty string counts as unset.
pub fn make_data_url(
    contents: &[u8],
    compression: Option<&str>,
    options: &TranslateOptions,
) -> Result<DataUrl, Error> {
    let escaped = || format!("data:,{}", urlencoding::encode_binary(contents));

    if compression.is_some_and(|c| !c.is_empty()) {
        return Ok(DataUrl {
            url: escaped(),
            compression: None,
        });
    }

    if options.no_resource_auto_compression || contents.len() < AUTO_COMPRESSION_THRESHOLD {
        return Ok(DataUrl {
            url: escaped(),
            compression: Some(String::new()),
        });
    }

    let plain = BASE64.encode(contents);
    let gzipped = BASE64.encode(&gzip(contents)?);
    tracing::debug!(
        len = contents.len(),
        base64 = plain.len(),
        gzip = gzipped.len(),
        "choosing encoding"
    );

    if gzipped.len() <= plain.len() {
        Ok(DataUrl {
            url: format!("data:;base64,{gzipped}"),
            compression: Some("gzip".into()),
        })
    } else {
        Ok(DataUrl {
            url: format!("data:;base64,{plain}"),
            compression: Some(String::new()),
        })
    }
}

fn gzip(contents: &[u8]) -> Result<Vec<u8>, Error> {
    let mut encoder =
        flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::best());
    encoder.write_all(contents).map_err(Error::Compress)?;
    encoder.finish().map_err(Error::Compress)
}

/// Translate a content reference
///
/// Paths in the result are relative to the resource. `source`, `compression`, `http_headers` and `verification`
/// are copied as they are; the first of `source`, `inline`, `local` that is set decides the URL. Failures to find
/// or read a local file are reported at `local` and leave the URL unset.
#[tracing::instrument(level = "debug", skip_all)]
pub fn resolve(from: &source::Resource, options: &TranslateOptions) -> Translated<target::Resource> {
    let mut m = Mirror::new();
    let mut to = target::Resource {
        compression: m.copy("compression", &from.compression),
        http_headers: m.each("http_headers", "httpHeaders", &from.http_headers, options),
        source: m.copy("source", &from.source),
        verification: m.nest("verification", "verification", &from.verification, options),
    };

    if from.source.is_some() {
        return m.finish(to);
    }

    let (key, contents) = if let Some(inline) = &from.inline {
        ("inline", inline.as_bytes().to_vec())
    } else if let Some(local) = &from.local {
        match util::resolve_in_files_dir(options, local).and_then(|path| util::read(&path)) {
            Ok(contents) => ("local", contents),
            Err(err) => {
                m.report_mut().add_error(path!(Source, "local"), err);
                return m.finish(to);
            }
        }
    } else {
        return m.finish(to);
    };

    match make_data_url(&contents, from.compression.as_deref(), options) {
        Ok(DataUrl { url, compression }) => {
            to.source = Some(url);
            m.add(path!(Source, key), path!(Target, "source"));
            if let Some(compression) = compression {
                to.compression = Some(compression);
                m.add(path!(Source, key), path!(Target, "compression"));
            }
        }
        Err(err) => m.report_mut().add_error(path!(Source, key), err),
    }

    m.finish(to)
}

impl Translate for source::Resource {
    type Target = target::Resource;

    fn translate(&self, options: &TranslateOptions) -> Translated<target::Resource> {
        resolve(self, options)
    }
}

impl Translate for source::HttpHeader {
    type Target = target::HttpHeader;

    fn translate(&self, _: &TranslateOptions) -> Translated<target::HttpHeader> {
        let mut m = Mirror::new();
        let to = target::HttpHeader {
            name: m.copy("name", &self.name),
            value: m.copy("value", &self.value),
        };
        m.finish(to)
    }
}

impl Translate for source::Verification {
    type Target = target::Verification;

    fn translate(&self, _: &TranslateOptions) -> Translated<target::Verification> {
        let mut m = Mirror::new();
        let to = target::Verification {
            hash: m.copy("hash", &self.hash),
        };
        m.finish(to)
    }
}
