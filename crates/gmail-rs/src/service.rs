use std::collections::HashMap;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use net_utils::ApiClient;
use tabular::Frame;

use crate::attachment::decode_url_safe;
use crate::message::AttachmentBody;
use crate::{
    AttachmentFilter, AttachmentRef, Email, Error, GmailClient, Message, MessageList, MessageRef,
    Thread, excel,
};

/// Mailbox operations for the authenticated user.
#[derive(Debug, Clone, Copy)]
pub struct GmailService<'a> {
    client: &'a GmailClient,
    api: &'a ApiClient,
}

impl<'a> GmailService<'a> {
    pub async fn new(client: &'a GmailClient) -> crate::Result<Self> {
        let api = client.session().await?;
        Ok(Self { client, api })
    }

    /// Every message matching `query` (Gmail search syntax), each fetched in full. Messages that
    /// fail to parse are skipped.
    pub async fn search_messages(&self, query: &str) -> crate::Result<Vec<Message>> {
        let url = self.client.user_url("messages");

        let mut messages = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut params = vec![("q", query)];
            if let Some(token) = page_token.as_deref() {
                params.push(("pageToken", token));
            }

            let page: MessageList = self.api.get_json(&url, &params).await?;

            for message_ref in page.messages.iter() {
                if let Some(message) = self.get_message(&message_ref.id).await? {
                    messages.push(message);
                }
            }

            match page.next_page_token {
                Some(next_page_token) if !next_page_token.is_empty() => {
                    page_token = Some(next_page_token)
                }
                _ => break,
            }
        }

        tracing::debug!(message = "searched messages", query, found = messages.len());
        Ok(messages)
    }

    /// `None` if the response doesn't have the shape of a message.
    pub async fn get_message(&self, message_id: &str) -> crate::Result<Option<Message>> {
        let url = self.client.user_url(&format!("messages/{message_id}"));
        let value: serde_json::Value = self.api.get_json(&url, net_utils::NO_QUERY).await?;

        match serde_json::from_value(value) {
            Ok(message) => Ok(Some(message)),
            Err(error) => {
                tracing::warn!(message = "failed to parse message", message_id, ?error);
                Ok(None)
            }
        }
    }

    pub async fn get_thread(&self, thread_id: &str) -> crate::Result<Thread> {
        let url = self.client.user_url(&format!("threads/{thread_id}"));
        let value: serde_json::Value = self.api.get_json(&url, net_utils::NO_QUERY).await?;

        serde_json::from_value(value).map_err(|_| Error::ThreadNotFound(thread_id.to_owned()))
    }

    /// See [`crate::query_attachments`].
    pub fn query_attachments(
        message: &Message,
        filter: &AttachmentFilter<'_>,
    ) -> Vec<AttachmentRef> {
        crate::query_attachments(message, filter)
    }

    /// Fetches and decodes the attachment. Empty if Gmail returned no data.
    pub async fn get_attachment_bytes(&self, attachment: &AttachmentRef) -> crate::Result<Vec<u8>> {
        let url = self.client.user_url(&format!(
            "messages/{}/attachments/{}",
            attachment.message_id, attachment.attachment_id
        ));

        let body: AttachmentBody = self.api.get_json(&url, net_utils::NO_QUERY).await?;

        match body.data.as_deref() {
            Some(data) if !data.is_empty() => Ok(decode_url_safe(data)?),
            _ => Ok(Vec::new()),
        }
    }

    /// Writes each attachment into `parent_folder`, named by `rename[file_name]` when present and
    /// by the original file name otherwise. Attachments without data are skipped. Returns the
    /// absolute paths written.
    pub async fn download_attachments(
        &self,
        attachments: &[AttachmentRef],
        parent_folder: &Path,
        rename: Option<&HashMap<String, String>>,
    ) -> crate::Result<Vec<PathBuf>> {
        let mut written = Vec::with_capacity(attachments.len());

        for attachment in attachments {
            let data = self.get_attachment_bytes(attachment).await?;
            if data.is_empty() {
                continue;
            }

            let file_name = rename
                .and_then(|map| map.get(&attachment.file_name))
                .unwrap_or(&attachment.file_name);

            let path = parent_folder.join(file_name);
            tokio::fs::write(&path, &data).await?;

            let path = tokio::fs::canonicalize(&path).await?;
            tracing::info!(message = "downloaded attachment", path = %path.display());
            written.push(path);
        }

        Ok(written)
    }

    pub async fn read_csv_attachment(&self, attachment: &AttachmentRef) -> crate::Result<Frame> {
        ensure_extension(attachment, "csv")?;

        let data = self.get_attachment_bytes(attachment).await?;
        Ok(Frame::from_csv_bytes(&data)?)
    }

    /// Reads one sheet (the first if `sheet` is `None`) with every cell as text, decrypting with
    /// `password` first if given.
    pub async fn read_excel_attachment(
        &self,
        attachment: &AttachmentRef,
        password: Option<&str>,
        sheet: Option<&str>,
    ) -> crate::Result<Frame> {
        ensure_extension(attachment, "xlsx")?;

        let data = self.get_attachment_bytes(attachment).await?;
        excel::read_sheet(excel::decrypt(data, password)?, sheet)
    }

    /// Every sheet, keyed by name in workbook order.
    pub async fn read_excel_attachment_sheets(
        &self,
        attachment: &AttachmentRef,
        password: Option<&str>,
    ) -> crate::Result<IndexMap<String, Frame>> {
        ensure_extension(attachment, "xlsx")?;

        let data = self.get_attachment_bytes(attachment).await?;
        excel::read_sheets(excel::decrypt(data, password)?)
    }

    pub async fn send_message(&self, email: &Email) -> crate::Result<MessageRef> {
        let url = self.client.user_url("messages/send");
        let request = email.to_send_request();

        let sent: MessageRef = self.api.post_json(&url, &request).await?;
        tracing::info!(
            message = "sent message",
            id = %sent.id,
            thread_id = %sent.thread_id,
            attachments = email.attachments.len()
        );
        Ok(sent)
    }
}

fn ensure_extension(attachment: &AttachmentRef, expected: &'static str) -> crate::Result<()> {
    if attachment.extension() == expected {
        Ok(())
    } else {
        Err(Error::InvalidAttachment {
            file_name: attachment.file_name.clone(),
            expected,
        })
    }
}
