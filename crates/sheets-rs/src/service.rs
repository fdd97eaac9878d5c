use net_utils::ApiClient;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::Method;
use serde_json::json;
use tabular::Frame;

use crate::resources::{GridProperties, SheetList, SpreadsheetResource, ValueRange};
use crate::{
    CellRef, ReadOptions, SheetsClient, Spreadsheet, UpdateValuesResponse, Worksheet,
    column_letters, frame_from_values, frame_to_values,
};

const SPREADSHEET_MIME: &str = "application/vnd.google-apps.spreadsheet";

const SPREADSHEET_FIELDS: &str = "spreadsheetId,properties.title,sheets.properties";

static RANGE_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'.').remove(b'_');

#[derive(Debug, serde::Deserialize)]
struct CreatedFile {
    id: String,
}

/// Spreadsheet operations, issued through a connected [`SheetsClient`].
#[derive(Debug, Clone, Copy)]
pub struct SheetsService<'a> {
    client: &'a SheetsClient,
    api: &'a ApiClient,
}

impl<'a> SheetsService<'a> {
    pub async fn new(client: &'a SheetsClient) -> crate::Result<Self> {
        let api = client.session().await?;
        Ok(Self { client, api })
    }

    fn values_url(&self, worksheet: &Worksheet, range: &str) -> String {
        let encoded = utf8_percent_encode(range, RANGE_ENCODE_SET).to_string();
        self.client
            .spreadsheet_url(&worksheet.spreadsheet_id, &format!("/values/{encoded}"))
    }

    pub async fn open_spreadsheet(&self, key: &str) -> crate::Result<Spreadsheet> {
        let url = self.client.spreadsheet_url(key, "");
        let resource: SpreadsheetResource = self
            .api
            .get_json(&url, &[("fields", SPREADSHEET_FIELDS)])
            .await?;

        Ok(Spreadsheet::from(resource))
    }

    /// Creates an empty spreadsheet, inside `parent_folder` if given, and opens it.
    pub async fn create_spreadsheet(
        &self,
        name: &str,
        parent_folder: Option<&str>,
    ) -> crate::Result<Spreadsheet> {
        let mut metadata = json!({ "name": name, "mimeType": SPREADSHEET_MIME });
        if let Some(parent) = parent_folder {
            metadata["parents"] = json!([parent]);
        }

        let builder = self
            .api
            .request(Method::POST, self.client.drive_files_url())
            .await?
            .query(&[("fields", "id"), ("supportsAllDrives", "true")])
            .json(&metadata);

        let resp = self.api.send(builder).await?;
        let created: CreatedFile = net_utils::deserialize_json(resp).await?;
        tracing::info!(message = "created spreadsheet", name, id = %created.id);

        self.open_spreadsheet(&created.id).await
    }

    /// Every value on the worksheet as formatted text, padded to a rectangle.
    pub async fn get_all_values(&self, worksheet: &Worksheet) -> crate::Result<Vec<Vec<String>>> {
        let url = self.values_url(worksheet, &worksheet.quoted_title());
        let range: ValueRange = self
            .api
            .get_json(&url, &[("majorDimension", "ROWS")])
            .await?;

        let mut values = range.values;
        let width = values.iter().map(Vec::len).max().unwrap_or(0);
        for row in values.iter_mut() {
            row.resize(width, String::new());
        }

        Ok(values)
    }

    /// Reads a block of the worksheet, see [`frame_from_values`]. `None` for an empty worksheet.
    pub async fn read_frame(
        &self,
        worksheet: &Worksheet,
        options: &ReadOptions<'_>,
    ) -> crate::Result<Option<Frame>> {
        let values = self.get_all_values(worksheet).await?;
        frame_from_values(&values, options)
    }

    /// Sets the worksheet's grid size. Rows and columns past the new size are deleted.
    pub async fn resize_worksheet(
        &self,
        worksheet: &Worksheet,
        row_count: u32,
        column_count: u32,
    ) -> crate::Result<()> {
        let url = self
            .client
            .spreadsheet_url(&worksheet.spreadsheet_id, ":batchUpdate");

        let grid = GridProperties {
            row_count,
            column_count,
        };
        let request = json!({
            "requests": [{
                "updateSheetProperties": {
                    "properties": {
                        "sheetId": worksheet.id,
                        "gridProperties": grid,
                    },
                    "fields": "gridProperties(rowCount,columnCount)",
                },
            }],
        });

        let _: serde_json::Value = self.api.post_json(&url, &request).await?;

        tracing::debug!(
            message = "resized worksheet",
            title = %worksheet.title,
            row_count,
            column_count
        );
        Ok(())
    }

    /// The worksheet's grid size as it is now, not as of when it was opened.
    async fn current_grid(&self, worksheet: &Worksheet) -> crate::Result<GridProperties> {
        let url = self.client.spreadsheet_url(&worksheet.spreadsheet_id, "");
        let list: SheetList = self
            .api
            .get_json(&url, &[("fields", "sheets.properties")])
            .await?;

        list.sheets
            .into_iter()
            .map(|sheet| sheet.properties)
            .find(|props| props.sheet_id == worksheet.id)
            .map(|props| props.grid_properties)
            .ok_or_else(|| crate::Error::WorksheetNotFound(worksheet.title.clone()))
    }

    /// Grows the grid to at least `rows` x `columns`. Never shrinks it.
    async fn ensure_grid(
        &self,
        worksheet: &Worksheet,
        rows: u32,
        columns: u32,
    ) -> crate::Result<()> {
        if rows <= worksheet.row_count && columns <= worksheet.column_count {
            return Ok(());
        }

        let current = self.current_grid(worksheet).await?;
        if rows <= current.row_count && columns <= current.column_count {
            return Ok(());
        }

        self.resize_worksheet(
            worksheet,
            rows.max(current.row_count),
            columns.max(current.column_count),
        )
        .await
    }

    /// Writes `frame` with its top left corner at `start_cell`, growing the grid first if the
    /// block doesn't fit. Values are written as if typed in by a user.
    pub async fn write_frame(
        &self,
        worksheet: &Worksheet,
        frame: &Frame,
        start_cell: &str,
        include_header: bool,
    ) -> crate::Result<UpdateValuesResponse> {
        let (start_row, start_col) = CellRef::require(start_cell)?;

        let values = frame_to_values(frame, include_header);
        if values.is_empty() || frame.num_columns() == 0 {
            return Ok(UpdateValuesResponse::default());
        }

        let out_of_range = || crate::Error::InvalidCellReference(start_cell.to_owned());
        let end_row = u32::try_from(values.len())
            .ok()
            .and_then(|height| start_row.checked_add(height - 1))
            .ok_or_else(out_of_range)?;
        let end_col = u32::try_from(frame.num_columns())
            .ok()
            .and_then(|width| start_col.checked_add(width - 1))
            .ok_or_else(out_of_range)?;

        let end = CellRef {
            row: Some(end_row),
            column: Some(end_col),
        };
        if column_letters(end_col).is_none() {
            return Err(crate::Error::InvalidCellReference(end.to_string()));
        }

        self.ensure_grid(worksheet, end_row, end_col).await?;

        let start = CellRef {
            row: Some(start_row),
            column: Some(start_col),
        };
        let range = format!("{}!{start}:{end}", worksheet.quoted_title());

        let body = ValueRange {
            range: Some(range.clone()),
            major_dimension: Some(String::from("ROWS")),
            values,
        };

        let url = self.values_url(worksheet, &range);
        let resp: UpdateValuesResponse = self
            .api
            .put_json(&url, &[("valueInputOption", "USER_ENTERED")], &body)
            .await?;

        tracing::info!(
            message = "wrote frame",
            range = %range,
            rows = frame.num_rows(),
            columns = frame.num_columns()
        );
        Ok(resp)
    }
}
