//! Upload boundary for report scans.
//!
//! Only PDFs and JPEG/PNG images up to 10 MB get through. Everything else is
//! refused here with a message meant for the user, before any analysis runs.

use crate::error::LabsheetError;

/// Largest accepted upload (10 MB).
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub const ACCEPTED_MIME_TYPES: [&str; 4] = ["application/pdf", "image/jpeg", "image/png", "image/jpg"];

pub const UNSUPPORTED_TYPE_MESSAGE: &str = "Please upload a PDF or image file (JPG, PNG)";
pub const TOO_LARGE_MESSAGE: &str = "File size must be less than 10MB";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    Pdf,
    Jpeg,
    Png,
}

impl UploadKind {
    fn from_mime(mime: &str) -> Option<Self> {
        match mime {
            "application/pdf" => Some(UploadKind::Pdf),
            "image/jpeg" | "image/jpg" => Some(UploadKind::Jpeg),
            "image/png" => Some(UploadKind::Png),
            _ => None,
        }
    }

    pub fn is_image(&self) -> bool {
        !matches!(self, UploadKind::Pdf)
    }
}

/// A file that passed the boundary checks.
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: String,
    pub kind: UploadKind,
    pub bytes: Vec<u8>,
}

impl Upload {
    /// Check type and size.
    ///
    /// Without a declared MIME type the type is guessed from the file name.
    pub fn accept(
        file_name: impl Into<String>,
        declared_mime: Option<&str>,
        bytes: Vec<u8>,
    ) -> Result<Self, LabsheetError> {
        let file_name = file_name.into();
        let mime = match declared_mime.map(str::trim).filter(|m| !m.is_empty()) {
            Some(m) => m.to_string(),
            None => mime_guess::from_path(&file_name)
                .first_raw()
                .unwrap_or("application/octet-stream")
                .to_string(),
        };
        let essence = mime.split(';').next().unwrap_or_default().trim().to_ascii_lowercase();

        let kind = UploadKind::from_mime(&essence)
            .ok_or_else(|| LabsheetError::UnsupportedUpload(UNSUPPORTED_TYPE_MESSAGE.into()))?;
        if bytes.len() > MAX_UPLOAD_BYTES {
            return Err(LabsheetError::UnsupportedUpload(TOO_LARGE_MESSAGE.into()));
        }

        tracing::debug!(file = %file_name, mime = %essence, size = bytes.len(), "upload accepted");
        Ok(Self {
            file_name,
            kind,
            bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(err: LabsheetError) -> String {
        match err {
            LabsheetError::UnsupportedUpload(m) => m,
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_accepts_declared_types() {
        for (mime, kind) in [
            ("application/pdf", UploadKind::Pdf),
            ("image/jpeg", UploadKind::Jpeg),
            ("image/jpg", UploadKind::Jpeg),
            ("image/png", UploadKind::Png),
        ] {
            let upload = Upload::accept("scan", Some(mime), vec![0; 4]).unwrap();
            assert_eq!(upload.kind, kind);
        }
    }

    #[test]
    fn test_guesses_type_from_name() {
        let upload = Upload::accept("report.PNG", None, vec![]).unwrap();
        assert_eq!(upload.kind, UploadKind::Png);
        let upload = Upload::accept("report.jpg", Some(""), vec![]).unwrap();
        assert_eq!(upload.kind, UploadKind::Jpeg);
    }

    #[test]
    fn test_rejects_other_types() {
        let err = Upload::accept("notes.docx", None, vec![]).unwrap_err();
        assert_eq!(message(err), UNSUPPORTED_TYPE_MESSAGE);
        let err = Upload::accept("a.png", Some("image/gif"), vec![]).unwrap_err();
        assert_eq!(message(err), UNSUPPORTED_TYPE_MESSAGE);
    }

    #[test]
    fn test_size_ceiling() {
        assert!(Upload::accept("a.pdf", None, vec![0; MAX_UPLOAD_BYTES]).is_ok());
        let err = Upload::accept("a.pdf", None, vec![0; MAX_UPLOAD_BYTES + 1]).unwrap_err();
        assert_eq!(message(err), TOO_LARGE_MESSAGE);
    }
}
