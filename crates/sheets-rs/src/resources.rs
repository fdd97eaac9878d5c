use serde::{Deserialize, Serialize};

/// An open spreadsheet and its worksheets, in tab order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spreadsheet {
    pub id: String,
    pub title: String,
    pub worksheets: Vec<Worksheet>,
}

impl Spreadsheet {
    pub fn worksheet(&self, title: &str) -> crate::Result<&Worksheet> {
        self.worksheets
            .iter()
            .find(|ws| ws.title == title)
            .ok_or_else(|| crate::Error::WorksheetNotFound(title.to_owned()))
    }

    pub fn first_worksheet(&self) -> crate::Result<&Worksheet> {
        self.worksheets.first().ok_or(crate::Error::NoWorksheets)
    }
}

impl From<SpreadsheetResource> for Spreadsheet {
    fn from(resource: SpreadsheetResource) -> Self {
        let id = resource.spreadsheet_id;

        let mut worksheets = resource
            .sheets
            .into_iter()
            .map(|sheet| {
                let props = sheet.properties;
                Worksheet {
                    spreadsheet_id: id.clone(),
                    id: props.sheet_id,
                    title: props.title,
                    index: props.index,
                    row_count: props.grid_properties.row_count,
                    column_count: props.grid_properties.column_count,
                }
            })
            .collect::<Vec<_>>();
        worksheets.sort_by_key(|ws| ws.index);

        Self {
            id,
            title: resource.properties.title,
            worksheets,
        }
    }
}

/// One tab of a spreadsheet. The grid size is as of when the spreadsheet was opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Worksheet {
    pub spreadsheet_id: String,
    pub id: i64,
    pub title: String,
    pub index: u32,
    pub row_count: u32,
    pub column_count: u32,
}

impl Worksheet {
    /// The title quoted for use in an `A1` range, i.e `'Q1 ''24'`.
    pub fn quoted_title(&self) -> String {
        format!("'{}'", self.title.replace('\'', "''"))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SpreadsheetResource {
    pub spreadsheet_id: String,
    pub properties: SpreadsheetProperties,
    #[serde(default)]
    pub sheets: Vec<SheetResource>,
}

/// Response to a `fields=sheets.properties` metadata request.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct SheetList {
    #[serde(default)]
    pub sheets: Vec<SheetResource>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct SpreadsheetProperties {
    #[serde(default)]
    pub title: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct SheetResource {
    pub properties: SheetProperties,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SheetProperties {
    #[serde(default)]
    pub sheet_id: i64,
    pub title: String,
    #[serde(default)]
    pub index: u32,
    #[serde(default)]
    pub grid_properties: GridProperties,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GridProperties {
    #[serde(default)]
    pub row_count: u32,
    #[serde(default)]
    pub column_count: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ValueRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub major_dimension: Option<String>,
    #[serde(default)]
    pub values: Vec<Vec<String>>,
}

/// The result of writing a block of values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateValuesResponse {
    #[serde(default)]
    pub updated_range: Option<String>,
    #[serde(default)]
    pub updated_rows: u32,
    #[serde(default)]
    pub updated_columns: u32,
    #[serde(default)]
    pub updated_cells: u32,
}
