//! `multipart/related` request bodies, as used by Google's `uploadType=multipart` endpoints:
//! a JSON metadata part followed by the raw content.
use bytes::{BufMut, Bytes, BytesMut};

const HTTP_NEWLINE: &[u8] = b"\r\n";

const JSON_TYPE: &str = "application/json; charset=UTF-8";

#[derive(Debug)]
pub struct MultipartRelated {
    boundary: String,
    buf: BytesMut,
}

impl Default for MultipartRelated {
    fn default() -> Self {
        Self::new()
    }
}

impl MultipartRelated {
    pub fn new() -> Self {
        Self::with_boundary(format!("boundary-{}", uuid::Uuid::new_v4().simple()))
    }

    pub fn with_boundary(boundary: impl Into<String>) -> Self {
        Self {
            boundary: boundary.into(),
            buf: BytesMut::new(),
        }
    }

    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    /// The `Content-Type` header value for the finished body.
    pub fn content_type(&self) -> String {
        format!("multipart/related; boundary={}", self.boundary)
    }

    pub fn json_part<T>(self, metadata: &T) -> Result<Self, serde_json::Error>
    where
        T: serde::Serialize + ?Sized,
    {
        let json = serde_json::to_vec(metadata)?;
        Ok(self.part(JSON_TYPE, &json))
    }

    pub fn part(mut self, content_type: &str, data: &[u8]) -> Self {
        self.buf
            .reserve(self.boundary.len() + content_type.len() + data.len() + 32);

        self.buf.put_slice(b"--");
        self.buf.put_slice(self.boundary.as_bytes());
        self.buf.put_slice(HTTP_NEWLINE);
        self.buf.put_slice(b"Content-Type: ");
        self.buf.put_slice(content_type.as_bytes());
        self.buf.put_slice(HTTP_NEWLINE);
        self.buf.put_slice(HTTP_NEWLINE);
        self.buf.put_slice(data);
        self.buf.put_slice(HTTP_NEWLINE);
        self
    }

    /// Writes the closing delimiter, returning the content type + body.
    pub fn finish(mut self) -> (String, Bytes) {
        let content_type = self.content_type();

        self.buf.put_slice(b"--");
        self.buf.put_slice(self.boundary.as_bytes());
        self.buf.put_slice(b"--");
        self.buf.put_slice(HTTP_NEWLINE);

        (content_type, self.buf.freeze())
    }
}
