//! Per-format text extraction adapters.
//!
//! One adapter per supported extension (`txt`, `pdf`, `docx`), dispatched
//! on the lowercase file extension. Unknown extensions are rejected with
//! `UnsupportedFormat`; a file whose extraction yields no text at all is
//! an `Extraction` error.

use paperbrain_core::{AppError, AppResult};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Extensions the pipeline accepts.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["pdf", "txt", "docx"];

/// Check whether a path has a supported extension.
pub fn is_supported(path: &Path) -> bool {
    match extension_of(path) {
        Some(ext) => SUPPORTED_EXTENSIONS.contains(&ext.as_str()),
        None => false,
    }
}

fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
}

/// Extract the raw text of a document.
///
/// Returns `UnsupportedFormat` for unknown extensions and `Extraction`
/// for unreadable, corrupt, or empty files.
pub fn extract(path: &Path) -> AppResult<String> {
    let ext = extension_of(path).ok_or_else(|| {
        AppError::UnsupportedFormat(format!("{} has no file extension", path.display()))
    })?;

    let text = match ext.as_str() {
        "txt" => extract_txt(path)?,
        "pdf" => extract_pdf(path)?,
        "docx" => extract_docx(path)?,
        other => {
            return Err(AppError::UnsupportedFormat(format!(
                "{} (supported: {})",
                other,
                SUPPORTED_EXTENSIONS.join(", ")
            )))
        }
    };

    if text.trim().is_empty() {
        return Err(AppError::Extraction(format!(
            "no text extracted from {}",
            path.display()
        )));
    }

    tracing::debug!(
        "Extracted {} characters from {}",
        text.chars().count(),
        path.display()
    );

    Ok(text)
}

/// Plain text: UTF-8 read with a lossy fallback for stray bytes.
fn extract_txt(path: &Path) -> AppResult<String> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(content),
        Err(_) => {
            let bytes = std::fs::read(path)
                .map_err(|e| AppError::Extraction(format!("failed to read {}: {}", path.display(), e)))?;
            Ok(String::from_utf8_lossy(&bytes).to_string())
        }
    }
}

/// PDF: delegate to the pdf-extract crate.
fn extract_pdf(path: &Path) -> AppResult<String> {
    pdf_extract::extract_text(path)
        .map_err(|e| AppError::Extraction(format!("failed to parse {}: {}", path.display(), e)))
}

/// DOCX: unzip the package and pull paragraph text out of
/// `word/document.xml`.
fn extract_docx(path: &Path) -> AppResult<String> {
    let file = File::open(path)
        .map_err(|e| AppError::Extraction(format!("failed to open {}: {}", path.display(), e)))?;

    let mut archive = zip::ZipArchive::new(file)
        .map_err(|e| AppError::Extraction(format!("{} is not a docx package: {}", path.display(), e)))?;

    let mut document_xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| {
            AppError::Extraction(format!("{} has no word/document.xml: {}", path.display(), e))
        })?
        .read_to_string(&mut document_xml)
        .map_err(|e| AppError::Extraction(format!("failed to read {}: {}", path.display(), e)))?;

    plaintext_from_docx_xml(&document_xml)
}

/// Concatenate `<w:t>` runs, one line per `<w:p>` paragraph.
fn plaintext_from_docx_xml(xml: &str) -> AppResult<String> {
    let mut reader = Reader::from_str(xml);
    let mut text = String::new();
    let mut in_run = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.name().as_ref() == b"w:t" => in_run = true,
            Ok(Event::End(e)) if e.name().as_ref() == b"w:t" => in_run = false,
            Ok(Event::End(e)) if e.name().as_ref() == b"w:p" => text.push('\n'),
            Ok(Event::Text(t)) if in_run => {
                let fragment = t
                    .unescape()
                    .map_err(|e| AppError::Extraction(format!("bad docx text run: {}", e)))?;
                text.push_str(&fragment);
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(AppError::Extraction(format!("malformed docx xml: {}", e)));
            }
        }
    }

    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_is_supported() {
        assert!(is_supported(Path::new("report.pdf")));
        assert!(is_supported(Path::new("notes.TXT")));
        assert!(is_supported(Path::new("a/b/letter.docx")));
        assert!(!is_supported(Path::new("image.png")));
        assert!(!is_supported(Path::new("Makefile")));
    }

    #[test]
    fn test_extract_txt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "hello from a text file").unwrap();

        let text = extract(&path).unwrap();
        assert_eq!(text, "hello from a text file");
    }

    #[test]
    fn test_extract_txt_lossy_on_invalid_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("weird.txt");
        let mut file = File::create(&path).unwrap();
        file.write_all(b"valid \xFF invalid").unwrap();

        let text = extract(&path).unwrap();
        assert!(text.starts_with("valid "));
    }

    #[test]
    fn test_unknown_extension_is_unsupported() {
        let err = extract(Path::new("diagram.svg")).unwrap_err();
        assert!(matches!(err, AppError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_missing_extension_is_unsupported() {
        let err = extract(Path::new("README")).unwrap_err();
        assert!(matches!(err, AppError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_empty_file_is_extraction_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.txt");
        std::fs::write(&path, "   \n\t ").unwrap();

        let err = extract(&path).unwrap_err();
        assert!(matches!(err, AppError::Extraction(_)));
    }

    #[test]
    fn test_corrupt_docx_is_extraction_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.docx");
        std::fs::write(&path, "this is not a zip archive").unwrap();

        let err = extract(&path).unwrap_err();
        assert!(matches!(err, AppError::Extraction(_)));
    }

    #[test]
    fn test_docx_xml_paragraphs() {
        let xml = r#"<?xml version="1.0"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p><w:r><w:t>First paragraph.</w:t></w:r></w:p>
    <w:p><w:r><w:t xml:space="preserve">Second </w:t></w:r><w:r><w:t>paragraph.</w:t></w:r></w:p>
  </w:body>
</w:document>"#;

        let text = plaintext_from_docx_xml(xml).unwrap();
        assert!(text.contains("First paragraph.\n"));
        assert!(text.contains("Second paragraph.\n"));
    }

    #[test]
    fn test_docx_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("letter.docx");

        let file = File::create(&path).unwrap();
        let mut writer = zip::ZipWriter::new(file);
        let options = zip::write::SimpleFileOptions::default();
        writer.start_file("word/document.xml", options).unwrap();
        writer
            .write_all(
                br#"<w:document xmlns:w="ns"><w:body><w:p><w:r><w:t>Dear reader</w:t></w:r></w:p></w:body></w:document>"#,
            )
            .unwrap();
        writer.finish().unwrap();

        let text = extract(&path).unwrap();
        assert_eq!(text.trim(), "Dear reader");
    }
}
