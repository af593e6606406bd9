//! Multi-format file parser

use calamine::Reader;

use crate::error::{Error, Result};
use crate::types::FileType;

/// Text extracted from one file
#[derive(Debug, Clone)]
pub struct ParsedDocument {
    /// File type
    pub file_type: FileType,
    /// Extracted text content
    pub content: String,
}

/// Parser for the formats handled in-process
pub struct FileParser;

impl FileParser {
    /// Parse a file based on its extension
    pub fn parse(filename: &str, data: &[u8]) -> Result<ParsedDocument> {
        let extension = filename.rsplit('.').next().unwrap_or("").to_lowercase();
        let file_type = FileType::from_extension(&extension);

        match file_type {
            FileType::Pdf => Self::parse_pdf(filename, data),
            FileType::Docx => Self::parse_docx(filename, data),
            FileType::Xlsx | FileType::Xls => Self::parse_spreadsheet(filename, data, file_type),
            FileType::Csv => Self::parse_csv(filename, data),
            FileType::Txt | FileType::Markdown => Self::parse_text(data, file_type),
            FileType::Html => Self::parse_html(data),
            FileType::Doc => Err(Error::UnsupportedFileType(format!(
                "{} - legacy Word files need LibreOffice or the hosted parser",
                extension
            ))),
            FileType::Unknown => Err(Error::UnsupportedFileType(extension)),
        }
    }

    /// Parse PDF document
    fn parse_pdf(filename: &str, data: &[u8]) -> Result<ParsedDocument> {
        let content = pdf_extract::extract_text_from_mem(data)
            .map_err(|e| Error::file_parse(filename, e.to_string()))?;

        Ok(ParsedDocument {
            file_type: FileType::Pdf,
            content,
        })
    }

    /// Parse DOCX document
    pub fn parse_docx(filename: &str, data: &[u8]) -> Result<ParsedDocument> {
        let doc = docx_rs::read_docx(data).map_err(|e| Error::file_parse(filename, e.to_string()))?;

        let mut content = String::new();

        for child in doc.document.children {
            match child {
                docx_rs::DocumentChild::Paragraph(p) => {
                    Self::push_paragraph(&mut content, &p);
                    content.push('\n');
                }
                docx_rs::DocumentChild::Table(table) => {
                    Self::push_table(&mut content, &table);
                }
                _ => {}
            }
        }

        Ok(ParsedDocument {
            file_type: FileType::Docx,
            content,
        })
    }

    fn push_paragraph(content: &mut String, paragraph: &docx_rs::Paragraph) {
        for child in &paragraph.children {
            if let docx_rs::ParagraphChild::Run(run) = child {
                for child in &run.children {
                    if let docx_rs::RunChild::Text(t) = child {
                        content.push_str(&t.text);
                    }
                }
            }
        }
    }

    /// Tables are flattened to one line per row, cells separated by " | "
    #[allow(irrefutable_let_patterns)]
    fn push_table(content: &mut String, table: &docx_rs::Table) {
        for row in &table.rows {
            let docx_rs::TableChild::TableRow(row) = row else {
                continue;
            };
            let mut cells = Vec::new();

            for cell in &row.cells {
                let docx_rs::TableRowChild::TableCell(cell) = cell else {
                    continue;
                };
                let mut text = String::new();
                for child in &cell.children {
                    if let docx_rs::TableCellContent::Paragraph(p) = child {
                        Self::push_paragraph(&mut text, p);
                    }
                }
                cells.push(text);
            }

            content.push_str(&cells.join(" | "));
            content.push('\n');
        }
    }

    /// Parse plain text or markdown
    fn parse_text(data: &[u8], file_type: FileType) -> Result<ParsedDocument> {
        Ok(ParsedDocument {
            file_type,
            content: String::from_utf8_lossy(data).to_string(),
        })
    }

    /// Parse HTML document
    fn parse_html(data: &[u8]) -> Result<ParsedDocument> {
        let html = String::from_utf8_lossy(data);
        let document = scraper::Html::parse_document(&html);

        let mut content = String::new();
        let body_selector = scraper::Selector::parse("body")
            .map_err(|e| Error::internal(format!("Invalid selector: {}", e)))?;

        if let Some(body) = document.select(&body_selector).next() {
            for text in body.text() {
                let trimmed = text.trim();
                if !trimmed.is_empty() {
                    if !content.is_empty() {
                        content.push(' ');
                    }
                    content.push_str(trimmed);
                }
            }
        }

        Ok(ParsedDocument {
            file_type: FileType::Html,
            content,
        })
    }

    /// Parse CSV file
    fn parse_csv(filename: &str, data: &[u8]) -> Result<ParsedDocument> {
        let mut reader = csv::Reader::from_reader(data);
        let mut content = String::new();

        let headers = reader
            .headers()
            .map_err(|e| Error::file_parse(filename, e.to_string()))?;
        content.push_str(&headers.iter().collect::<Vec<_>>().join(" | "));
        content.push('\n');

        for record in reader.records() {
            let record = record.map_err(|e| Error::file_parse(filename, e.to_string()))?;
            content.push_str(&record.iter().collect::<Vec<_>>().join(" | "));
            content.push('\n');
        }

        Ok(ParsedDocument {
            file_type: FileType::Csv,
            content,
        })
    }

    /// Parse Excel spreadsheet, one "Sheet:" section per worksheet
    fn parse_spreadsheet(filename: &str, data: &[u8], file_type: FileType) -> Result<ParsedDocument> {
        let cursor = std::io::Cursor::new(data);
        let mut workbook = calamine::open_workbook_auto_from_rs(cursor)
            .map_err(|e| Error::file_parse(filename, e.to_string()))?;

        let mut content = String::new();

        for sheet_name in workbook.sheet_names().to_vec() {
            let range = workbook
                .worksheet_range(&sheet_name)
                .map_err(|e| Error::file_parse(filename, e.to_string()))?;

            content.push_str(&format!("Sheet: {}\n", sheet_name));

            for row in range.rows() {
                let row_text: Vec<String> = row
                    .iter()
                    .map(|cell| match cell {
                        calamine::Data::Empty => String::new(),
                        calamine::Data::String(s) => s.clone(),
                        calamine::Data::Float(f) => f.to_string(),
                        calamine::Data::Int(i) => i.to_string(),
                        calamine::Data::Bool(b) => b.to_string(),
                        calamine::Data::DateTime(dt) => dt.to_string(),
                        _ => String::new(),
                    })
                    .collect();

                if !row_text.iter().all(|s| s.is_empty()) {
                    content.push_str(&row_text.join(" | "));
                    content.push('\n');
                }
            }

            content.push('\n');
        }

        Ok(ParsedDocument { file_type, content })
    }
}
