//! [`Scope`] enum for the OAuth scopes requested by the clients in this workspace.
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    CloudPlatform,
    BigQuery,
    DevStorageReadWrite,
    Drive,
    Gmail,
    Spreadsheets,
}

impl Scope {
    pub const ALL: [Self; 6] = [
        Self::CloudPlatform,
        Self::BigQuery,
        Self::DevStorageReadWrite,
        Self::Drive,
        Self::Gmail,
        Self::Spreadsheets,
    ];

    #[inline]
    pub const fn scope_url(self) -> &'static str {
        match self {
            Self::CloudPlatform => "https://www.googleapis.com/auth/cloud-platform",
            Self::BigQuery => "https://www.googleapis.com/auth/bigquery",
            Self::DevStorageReadWrite => "https://www.googleapis.com/auth/devstorage.read_write",
            Self::Drive => "https://www.googleapis.com/auth/drive",
            Self::Gmail => "https://mail.google.com/",
            Self::Spreadsheets => "https://www.googleapis.com/auth/spreadsheets",
        }
    }

    /// Joins scope urls with a single space, the form token endpoints expect.
    pub fn join(scopes: &[Self]) -> String {
        let mut dst = String::with_capacity(scopes.len() * 48);

        for scope in scopes {
            if !dst.is_empty() {
                dst.push(' ');
            }
            dst.push_str(scope.scope_url());
        }

        dst
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.scope_url())
    }
}
