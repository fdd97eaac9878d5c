use percent_encoding::AsciiSet;

static ENCODE_SET: &AsciiSet = &percent_encoding::NON_ALPHANUMERIC
    .remove(b'*')
    .remove(b'-')
    .remove(b'.')
    .remove(b'_');

pub(crate) fn percent_encode_into(src: &str, dst: &mut String) {
    for chunk in percent_encoding::utf8_percent_encode(src, ENCODE_SET) {
        dst.push_str(chunk);
    }
}

/// Builds object URLs under a configurable API root.
#[derive(Debug, Clone, Copy)]
pub(crate) struct UrlBuilder<'a> {
    root: &'a str,
    bucket: &'a str,
    name: Option<&'a str>,
    upload: bool,
}

impl<'a> UrlBuilder<'a> {
    pub(crate) fn new(root: &'a str, bucket: &'a str) -> Self {
        Self {
            root,
            bucket,
            name: None,
            upload: false,
        }
    }

    pub(crate) fn name(mut self, name: &'a str) -> Self {
        self.name = Some(name);
        self
    }

    #[inline]
    pub(crate) const fn upload(mut self) -> Self {
        self.upload = true;
        self
    }

    pub(crate) fn format(&self) -> String {
        let mut dst = String::with_capacity(
            self.root.len() + self.bucket.len() + self.name.map_or(0, str::len) + 32,
        );

        dst.push_str(self.root);
        if self.upload {
            dst.push_str("/upload");
        }
        dst.push_str("/storage/v1/b/");
        percent_encode_into(self.bucket, &mut dst);
        dst.push_str("/o");

        if let Some(name) = self.name {
            dst.push('/');
            percent_encode_into(name, &mut dst);
        }

        dst
    }
}
