#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("'{0}' is not a complete cell reference, expected i.e 'B12'")]
    InvalidCellReference(String),
    #[error("spreadsheet has no worksheet named '{0}'")]
    WorksheetNotFound(String),
    #[error("spreadsheet has no worksheets")]
    NoWorksheets,
    #[error(transparent)]
    Tabular(#[from] tabular::Error),
    #[error(transparent)]
    Api(#[from] net_utils::Error),
}

impl Error {
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Api(err) => err.is_not_found(),
            Self::WorksheetNotFound(_) => true,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Self::Api(err.into())
    }
}
