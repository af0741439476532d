/*
 *
 *
 *
 *
 * MIT License
 * Copyright (c) 2025. Dwight J. Browne
 * dwight[-at-]dwightjbrowne[-dot-]com
 *
 *
 * Permission is hereby granted, free of charge, to any person obtaining a copy
 * of this software and associated documentation files (the "Software"), to deal
 * in the Software without restriction, including without limitation the rights
 * to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
 * copies of the Software, and to permit persons to whom the Software is
 * furnished to do so, subject to the following conditions:
 *
 * The above copyright notice and this permission notice shall be included in all
 * copies or substantial portions of the Software.
 *
 * THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
 * IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
 * FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
 * AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
 * LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
 * OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
 * SOFTWARE.
 */

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum LoaderError {
  #[error("API error: {0}")]
  ApiError(String),

  #[error("CSV parsing error: {0}")]
  CsvError(String),

  #[error("IO error: {0}")]
  IoError(String),

  #[error("Serialization error: {0}")]
  SerializationError(String),

  #[error("Invalid data: {0}")]
  InvalidData(String),

  #[error("Process tracking error: {0}")]
  ProcessTrackingError(String),

  #[error("Batch processing error: {0}")]
  BatchProcessingError(String),

  #[error("Pipeline error: {0}")]
  PipelineError(String),
}

// Implement conversions manually
impl From<csv::Error> for LoaderError {
  fn from(err: csv::Error) -> Self {
    LoaderError::CsvError(err.to_string())
  }
}

impl From<std::io::Error> for LoaderError {
  fn from(err: std::io::Error) -> Self {
    LoaderError::IoError(err.to_string())
  }
}

impl From<serde_json::Error> for LoaderError {
  fn from(err: serde_json::Error) -> Self {
    LoaderError::SerializationError(err.to_string())
  }
}

impl From<tg_core::Error> for LoaderError {
  fn from(err: tg_core::Error) -> Self {
    LoaderError::ApiError(err.to_string())
  }
}

impl From<tg_analysis::AnalysisError> for LoaderError {
  fn from(err: tg_analysis::AnalysisError) -> Self {
    LoaderError::PipelineError(err.to_string())
  }
}

pub type LoaderResult<T> = Result<T, LoaderError>;

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_loader_error_display() {
    let cases = [
      (LoaderError::ApiError("connection failed".to_string()), "API error: connection failed"),
      (LoaderError::CsvError("invalid header".to_string()), "CSV parsing error: invalid header"),
      (LoaderError::IoError("file not found".to_string()), "IO error: file not found"),
      (LoaderError::InvalidData("missing netuid".to_string()), "Invalid data: missing netuid"),
      (LoaderError::PipelineError("phase 1".to_string()), "Pipeline error: phase 1"),
    ];
    for (err, expected) in cases {
      assert_eq!(err.to_string(), expected);
    }
  }

  #[test]
  fn test_loader_error_from_io_error() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
    let err = LoaderError::from(io_err);
    assert!(matches!(err, LoaderError::IoError(_)));
    assert!(err.to_string().contains("file missing"));
  }

  #[test]
  fn test_loader_error_from_serde_json_error() {
    let json_err = serde_json::from_str::<String>("invalid").unwrap_err();
    let err = LoaderError::from(json_err);
    assert!(matches!(err, LoaderError::SerializationError(_)));
  }

  #[test]
  fn test_loader_error_from_core_error() {
    let core_err = tg_core::Error::Http("503 Service Unavailable".to_string());
    let err = LoaderError::from(core_err);
    assert!(matches!(err, LoaderError::ApiError(_)));
    assert!(err.to_string().contains("HTTP error"));
  }

  #[test]
  fn test_loader_error_from_analysis_error() {
    let err = LoaderError::from(tg_analysis::AnalysisError::Parse("bad reply".to_string()));
    assert!(matches!(err, LoaderError::PipelineError(_)));
  }
}
