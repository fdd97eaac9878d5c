use base64::Engine;
use base64::alphabet::URL_SAFE;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};

use crate::{AttachmentRef, Message, Part};

/// Gmail pads some payloads and not others.
const URL_SAFE_ANY_PAD: GeneralPurpose = GeneralPurpose::new(
    &URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

pub(crate) fn decode_url_safe(data: &str) -> Result<Vec<u8>, base64::DecodeError> {
    URL_SAFE_ANY_PAD.decode(data.trim_end())
}

/// Narrows which attachments [`query_attachments`] returns. The default matches everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct AttachmentFilter<'a> {
    /// Exact file names to keep.
    pub names: Option<&'a [&'a str]>,
    /// Extension to keep, without the leading `.`.
    pub extension: Option<&'a str>,
}

impl<'a> AttachmentFilter<'a> {
    pub fn names(names: &'a [&'a str]) -> Self {
        Self {
            names: Some(names),
            extension: None,
        }
    }

    pub fn extension(extension: &'a str) -> Self {
        Self {
            names: None,
            extension: Some(extension),
        }
    }

    fn matches(&self, file_name: &str) -> bool {
        let name_ok = self.names.is_none_or(|names| names.contains(&file_name));
        let ext_ok = self
            .extension
            .is_none_or(|ext| file_name.rsplit('.').next() == Some(ext));

        name_ok && ext_ok
    }
}

/// Walks the whole part tree of `message` and returns a reference for every named attachment
/// that passes the filter. Parts with a file name but no attachment id are inline and skipped.
pub fn query_attachments(message: &Message, filter: &AttachmentFilter<'_>) -> Vec<AttachmentRef> {
    let mut found = Vec::new();

    if let Some(payload) = message.payload.as_ref() {
        for part in payload.children() {
            collect(&message.id, part, filter, &mut found);
        }
    }

    found
}

fn collect(
    message_id: &str,
    part: &Part,
    filter: &AttachmentFilter<'_>,
    dst: &mut Vec<AttachmentRef>,
) {
    if part.is_attachment() && filter.matches(&part.filename) {
        if let Some(attachment_id) = part.body.attachment_id.as_deref() {
            dst.push(AttachmentRef {
                message_id: message_id.to_owned(),
                attachment_id: attachment_id.to_owned(),
                file_name: part.filename.clone(),
            });
        }
    }

    for child in part.children() {
        collect(message_id, child, filter, dst);
    }
}
