//! Report decoding.
//!
//! Decoders are looked up by format label in the [`DECODERS`] registry.

pub mod junit;

use std::io::Read;

use tracing::{debug, info};

use crate::error::ReportError;
use crate::models::RawReport;

/// Turns the raw bytes of one report into a [`RawReport`].
pub trait ReportDecoder: Send + Sync {
    fn decode(&self, data: &[u8]) -> Result<RawReport, ReportError>;
}

/// Registered decoders keyed by lower-case format label.
static DECODERS: &[(&str, &dyn ReportDecoder)] = &[("junit", &junit::JunitDecoder)];

/// Find the decoder for a format label (case-insensitive).
pub fn decoder_for(format: &str) -> Option<&'static dyn ReportDecoder> {
    let label = format.trim().to_lowercase();
    DECODERS
        .iter()
        .find(|(name, _)| *name == label)
        .map(|(_, decoder)| *decoder)
}

/// Labels of all registered formats.
pub fn supported_formats() -> Vec<&'static str> {
    DECODERS.iter().map(|(name, _)| *name).collect()
}

/// Whether a decoder is registered for the label.
pub fn is_supported(format: &str) -> bool {
    decoder_for(format).is_some()
}

/// Read the whole input and decode it with the decoder registered for `format`.
///
/// The format is resolved before any input is read, so an unsupported format
/// never consumes the reader.
pub fn decode(mut reader: impl Read, format: &str) -> Result<RawReport, ReportError> {
    let decoder =
        decoder_for(format).ok_or_else(|| ReportError::UnsupportedFormat(format.to_string()))?;

    info!("Reading {} report", format.to_lowercase());
    let mut data = Vec::new();
    reader.read_to_end(&mut data)?;
    debug!("Read {} bytes of report data", data.len());

    decoder.decode(&data)
}
