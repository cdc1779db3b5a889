//! Itinerary file import. The file's text is handed to the model verbatim;
//! its internal structure is never parsed.

use std::path::Path;

use encoding_rs::{Encoding, WINDOWS_1252};
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ItineraryError {
    #[error("unsupported itinerary format {0:?}; expected .csv, .json or .txt")]
    UnsupportedFormat(String),
    #[error("itinerary file is empty")]
    Empty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ItineraryFormat {
    Csv,
    Json,
    Txt,
}

impl ItineraryFormat {
    pub fn from_file_name(name: &str) -> Result<Self, ItineraryError> {
        let extension = Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();
        match extension.as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            "txt" => Ok(Self::Txt),
            _ => Err(ItineraryError::UnsupportedFormat(extension)),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportedItinerary {
    pub file_name: String,
    pub format: ItineraryFormat,
    pub text: String,
}

/// Decode file bytes: BOM-tagged encodings first, then UTF-8, then Windows-1252
/// (the usual encoding of spreadsheet CSV exports).
fn decode_text(bytes: &[u8]) -> String {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        let (text, _) = encoding.decode_without_bom_handling(&bytes[bom_len..]);
        return text.into_owned();
    }
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => {
            let (text, _, _) = WINDOWS_1252.decode(bytes);
            text.into_owned()
        }
    }
}

pub fn import_bytes(file_name: &str, bytes: &[u8]) -> Result<ImportedItinerary, ItineraryError> {
    let format = ItineraryFormat::from_file_name(file_name)?;
    let text = decode_text(bytes);
    if text.trim().is_empty() {
        return Err(ItineraryError::Empty);
    }
    debug!(file_name, ?format, chars = text.chars().count(), "Itinerary imported");
    Ok(ImportedItinerary {
        file_name: file_name.to_string(),
        format,
        text,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_supported_extensions_case_insensitively() {
        assert_eq!(ItineraryFormat::from_file_name("trip.CSV").unwrap(), ItineraryFormat::Csv);
        assert_eq!(ItineraryFormat::from_file_name("trip.json").unwrap(), ItineraryFormat::Json);
        assert_eq!(ItineraryFormat::from_file_name("a.b.Txt").unwrap(), ItineraryFormat::Txt);
        assert!(matches!(
            ItineraryFormat::from_file_name("trip.pdf"),
            Err(ItineraryError::UnsupportedFormat(ext)) if ext == "pdf"
        ));
        assert!(ItineraryFormat::from_file_name("README").is_err());
    }

    #[test]
    fn content_is_passed_through_verbatim() {
        let csv = "date,city\n2024-05-01,Kyoto\n";
        let imported = import_bytes("trip.csv", csv.as_bytes()).unwrap();
        assert_eq!(imported.text, csv);

        let broken_json = "{ not json at all";
        assert_eq!(import_bytes("trip.json", broken_json.as_bytes()).unwrap().text, broken_json);
    }

    #[test]
    fn bom_and_legacy_encodings_are_decoded() {
        let with_bom = [0xEF, 0xBB, 0xBF, b'H', b'i'];
        assert_eq!(import_bytes("a.txt", &with_bom).unwrap().text, "Hi");

        let latin1 = [b'C', b'a', b'f', 0xE9];
        assert_eq!(import_bytes("a.txt", &latin1).unwrap().text, "Café");
    }

    #[test]
    fn blank_files_are_rejected() {
        assert!(matches!(import_bytes("a.txt", b"  \n "), Err(ItineraryError::Empty)));
    }
}
