#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("attachment '{file_name}' is not a .{expected} file")]
    InvalidAttachment {
        file_name: String,
        expected: &'static str,
    },
    #[error("thread with id {0} does not exist")]
    ThreadNotFound(String),
    #[error("workbook has no sheet named '{0}'")]
    SheetNotFound(String),
    #[error("workbook has no sheets")]
    EmptyWorkbook,
    #[error(transparent)]
    Decrypt(#[from] office_crypto::DecryptError),
    #[error("wrong password for encrypted workbook")]
    WrongPassword,
    #[error("invalid timestamp '{value}' at scale {scale}")]
    InvalidTimestamp { value: String, scale: i64 },
    #[error(transparent)]
    Excel(#[from] calamine::XlsxError),
    #[error(transparent)]
    Base64(#[from] base64::DecodeError),
    #[error(transparent)]
    Tabular(#[from] tabular::Error),
    #[error(transparent)]
    Api(#[from] net_utils::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Api(err) => err.is_not_found(),
            Self::ThreadNotFound(_) => true,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Self::Api(err.into())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Api(err.into())
    }
}
