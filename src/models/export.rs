use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Pdf,
    Excel,
    Csv,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Excel => "excel",
            ExportFormat::Csv => "csv",
        }
    }
}

/// Opciones de un informe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportOptions {
    pub format: ExportFormat,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

impl ExportOptions {
    pub fn new(format: ExportFormat) -> Self {
        Self {
            format,
            start_date: None,
            end_date: None,
        }
    }

    /// Query string para los exports `GET` (solo caracteres que no necesitan escape)
    pub fn query_string(&self) -> String {
        let mut query = format!("format={}", self.format.as_str());
        if let Some(start) = self.start_date {
            query.push_str(&format!("&startDate={}", start.format("%Y-%m-%d")));
        }
        if let Some(end) = self.end_date {
            query.push_str(&format!("&endDate={}", end.format("%Y-%m-%d")));
        }
        query
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportResponse {
    pub download_url: String,
    pub filename: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_string_includes_date_range() {
        let options = ExportOptions {
            format: ExportFormat::Csv,
            start_date: NaiveDate::from_ymd_opt(2024, 2, 1),
            end_date: NaiveDate::from_ymd_opt(2024, 2, 29),
        };
        assert_eq!(
            options.query_string(),
            "format=csv&startDate=2024-02-01&endDate=2024-02-29"
        );
        assert_eq!(ExportOptions::new(ExportFormat::Pdf).query_string(), "format=pdf");
    }
}
