//! Outgoing mail, rendered as an RFC 5322 message for `messages.send`.
use std::fmt::Write;
use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::{STANDARD, URL_SAFE};
use bytes::Bytes;

use crate::SendRequest;

const NEWLINE: &str = "\r\n";

/// Base64 bodies are wrapped at this width.
const LINE_WIDTH: usize = 76;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BodyType {
    #[default]
    Plain,
    Html,
}

impl BodyType {
    pub const fn content_type(self) -> &'static str {
        match self {
            Self::Plain => "text/plain; charset=\"utf-8\"",
            Self::Html => "text/html; charset=\"utf-8\"",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub file_name: String,
    pub content_type: String,
    pub data: Bytes,
}

impl Attachment {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            data: data.into(),
        }
    }

    /// Reads a local file, guessing the content type from its name.
    pub async fn from_path(path: &Path) -> crate::Result<Self> {
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| {
                std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    format!("'{}' has no file name", path.display()),
                )
            })?
            .to_owned();

        let content_type = mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_owned();

        let data = tokio::fs::read(path).await?;

        Ok(Self::new(file_name, content_type, data))
    }
}

/// A message to send. Without attachments it renders as a single text part, with them as
/// `multipart/mixed` with the body first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email {
    pub from: String,
    pub to: Vec<String>,
    pub cc: Vec<String>,
    pub bcc: Vec<String>,
    pub subject: String,
    pub body: String,
    pub body_type: BodyType,
    pub attachments: Vec<Attachment>,
    /// Threads the message as a reply when set.
    pub thread_id: Option<String>,
}

impl Email {
    pub fn new<I, S>(
        from: impl Into<String>,
        to: I,
        subject: impl Into<String>,
        body: impl Into<String>,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            from: from.into(),
            to: to.into_iter().map(Into::into).collect(),
            cc: Vec::new(),
            bcc: Vec::new(),
            subject: subject.into(),
            body: body.into(),
            body_type: BodyType::Plain,
            attachments: Vec::new(),
            thread_id: None,
        }
    }

    pub fn html(mut self) -> Self {
        self.body_type = BodyType::Html;
        self
    }

    pub fn cc<I, S>(mut self, cc: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.cc.extend(cc.into_iter().map(Into::into));
        self
    }

    pub fn bcc<I, S>(mut self, bcc: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.bcc.extend(bcc.into_iter().map(Into::into));
        self
    }

    pub fn thread_id(mut self, thread_id: impl Into<String>) -> Self {
        self.thread_id = Some(thread_id.into());
        self
    }

    pub fn attach(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    /// Attaches each file in order.
    pub async fn attach_files<P: AsRef<Path>>(mut self, paths: &[P]) -> crate::Result<Self> {
        for path in paths {
            self.attachments
                .push(Attachment::from_path(path.as_ref()).await?);
        }
        Ok(self)
    }

    pub fn to_mime(&self) -> String {
        let boundary = format!("===============boundary-{}", uuid::Uuid::new_v4().simple());
        self.render(&boundary)
    }

    pub fn to_send_request(&self) -> SendRequest {
        SendRequest {
            raw: URL_SAFE.encode(self.to_mime()),
            thread_id: self.thread_id.clone(),
        }
    }

    fn write_headers(&self, dst: &mut String) {
        write_header(dst, "From", &self.from);
        write_header(dst, "To", &self.to.join(", "));
        if !self.cc.is_empty() {
            write_header(dst, "Cc", &self.cc.join(", "));
        }
        if !self.bcc.is_empty() {
            write_header(dst, "Bcc", &self.bcc.join(", "));
        }
        write_header(dst, "Subject", &encode_word(&self.subject));
        write_header(dst, "MIME-Version", "1.0");
    }

    pub(crate) fn render(&self, boundary: &str) -> String {
        let mut dst = String::with_capacity(
            512 + self.body.len() * 2
                + self
                    .attachments
                    .iter()
                    .map(|att| att.data.len() * 2)
                    .sum::<usize>(),
        );

        self.write_headers(&mut dst);

        if self.attachments.is_empty() {
            write_text_part(&mut dst, self.body_type, &self.body);
            return dst;
        }

        write_header(
            &mut dst,
            "Content-Type",
            &format!("multipart/mixed; boundary=\"{boundary}\""),
        );
        dst.push_str(NEWLINE);

        let _ = write!(dst, "--{boundary}{NEWLINE}");
        write_text_part(&mut dst, self.body_type, &self.body);

        for attachment in self.attachments.iter() {
            let _ = write!(dst, "--{boundary}{NEWLINE}");
            write_header(&mut dst, "Content-Type", &attachment.content_type);
            write_header(&mut dst, "Content-Transfer-Encoding", "base64");
            write_header(
                &mut dst,
                "Content-Disposition",
                &format!(
                    "attachment; filename=\"{}\"",
                    quote(&encode_word(&attachment.file_name))
                ),
            );
            dst.push_str(NEWLINE);
            write_base64(&mut dst, &attachment.data);
        }

        let _ = write!(dst, "--{boundary}--{NEWLINE}");
        dst
    }
}

fn write_header(dst: &mut String, name: &str, value: &str) {
    let _ = write!(dst, "{name}: {value}{NEWLINE}");
}

fn write_text_part(dst: &mut String, body_type: BodyType, body: &str) {
    write_header(dst, "Content-Type", body_type.content_type());
    write_header(dst, "Content-Transfer-Encoding", "base64");
    dst.push_str(NEWLINE);
    write_base64(dst, body.as_bytes());
}

fn write_base64(dst: &mut String, data: &[u8]) {
    let encoded = STANDARD.encode(data);

    // base64 output is ascii, so any byte offset is a char boundary.
    let mut start = 0;
    while start < encoded.len() {
        let end = (start + LINE_WIDTH).min(encoded.len());
        dst.push_str(&encoded[start..end]);
        dst.push_str(NEWLINE);
        start = end;
    }
}

/// RFC 2047 encoded-word for non-ascii header text, otherwise the text unchanged.
fn encode_word(text: &str) -> String {
    if text.is_ascii() {
        text.to_owned()
    } else {
        format!("=?utf-8?b?{}?=", STANDARD.encode(text))
    }
}

fn quote(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOUNDARY: &str = "BOUNDARY";

    fn decode(encoded: &str) -> String {
        let joined = encoded.split(NEWLINE).collect::<String>();
        String::from_utf8(STANDARD.decode(joined).unwrap()).unwrap()
    }

    #[test]
    fn test_single_part() {
        let email = Email::new("me@x.com", ["a@x.com", "b@x.com"], "Hi", "hello there")
            .cc(["c@x.com"]);

        let rendered = email.render(BOUNDARY);
        let (headers, body) = rendered.split_once("\r\n\r\n").unwrap();

        assert_eq!(
            headers,
            "From: me@x.com\r\n\
             To: a@x.com, b@x.com\r\n\
             Cc: c@x.com\r\n\
             Subject: Hi\r\n\
             MIME-Version: 1.0\r\n\
             Content-Type: text/plain; charset=\"utf-8\"\r\n\
             Content-Transfer-Encoding: base64"
        );
        assert!(!headers.contains("Bcc"));
        assert_eq!(decode(body.trim_end()), "hello there");
    }

    #[test]
    fn test_with_attachments() {
        let email = Email::new("me@x.com", ["a@x.com"], "Report", "<b>see attached</b>")
            .html()
            .bcc(["hidden@x.com"])
            .attach(Attachment::new("report.csv", "text/csv", &b"a,b\n1,2\n"[..]));

        let rendered = email.render(BOUNDARY);

        assert!(rendered.contains("Bcc: hidden@x.com\r\n"));
        assert!(rendered.contains("Content-Type: multipart/mixed; boundary=\"BOUNDARY\"\r\n"));
        assert!(rendered.contains("Content-Type: text/html; charset=\"utf-8\"\r\n"));
        assert!(rendered.contains("Content-Disposition: attachment; filename=\"report.csv\"\r\n"));
        assert!(rendered.ends_with("--BOUNDARY--\r\n"));

        let parts = rendered.split("--BOUNDARY").collect::<Vec<_>>();
        // preamble, body, attachment, closing
        assert_eq!(parts.len(), 4);

        let (_, attachment_body) = parts[2].split_once("\r\n\r\n").unwrap();
        assert_eq!(decode(attachment_body.trim_end()), "a,b\n1,2\n");
    }

    #[test]
    fn test_long_body_wraps() {
        let body = "x".repeat(300);
        let rendered = Email::new("me@x.com", ["a@x.com"], "long", body.as_str()).render(BOUNDARY);
        let (_, encoded) = rendered.split_once("\r\n\r\n").unwrap();

        assert!(encoded.lines().all(|line| line.trim_end().len() <= LINE_WIDTH));
        assert_eq!(decode(encoded.trim_end()), body);
    }

    #[test]
    fn test_non_ascii_subject() {
        let email = Email::new("me@x.com", ["a@x.com"], "Résumé", "body");
        let rendered = email.render(BOUNDARY);
        assert!(rendered.contains(&format!("Subject: =?utf-8?b?{}?=\r\n", STANDARD.encode("Résumé"))));
    }

    #[test]
    fn test_send_request() {
        let req = Email::new("me@x.com", ["a@x.com"], "s", "b")
            .thread_id("thread-1")
            .to_send_request();

        assert_eq!(req.thread_id.as_deref(), Some("thread-1"));
        let raw = String::from_utf8(URL_SAFE.decode(&req.raw).unwrap()).unwrap();
        assert!(raw.starts_with("From: me@x.com\r\nTo: a@x.com\r\n"));
    }

    #[tokio::test]
    async fn test_attach_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photo.png");
        std::fs::write(&path, [0x89, b'P', b'N', b'G']).unwrap();

        let email = Email::new("me@x.com", ["a@x.com"], "s", "b")
            .attach_files(&[&path])
            .await
            .unwrap();

        assert_eq!(
            email.attachments,
            [Attachment::new("photo.png", "image/png", vec![0x89, b'P', b'N', b'G'])]
        );
    }
}
