//! Mailbox wrapper over the Gmail v1 REST API, acting as the authenticated user (`me`).
//!
//! [`GmailService`] searches and fetches messages, walks their part trees for attachments,
//! decodes attachment bytes into files or [`Frame`]s, and sends mail built with [`Email`].
mod attachment;
mod client;
mod email;
mod error;
mod excel;
mod message;
mod service;
mod time;

pub use attachment::{AttachmentFilter, query_attachments};
pub use client::GmailClient;
pub use email::{Attachment, BodyType, Email};
pub use error::Error;
pub use message::{
    AttachmentRef, Body, Header, Message, MessageList, MessageRef, Part, Payload, SendRequest,
    Thread,
};
pub use service::GmailService;
pub use tabular::Frame;
pub use time::unix_millis_to_datetime;

/// Type alias to [`core::result::Result<T, Error>`].
pub type Result<T> = core::result::Result<T, Error>;
