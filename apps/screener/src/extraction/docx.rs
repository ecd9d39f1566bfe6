//! DOCX extraction straight from the OOXML container.
//!
//! Output order: every non-empty body paragraph, then every row of every top-level table
//! with its cells joined by `" | "`. Paragraphs nested inside text boxes and tables nested
//! inside cells are not emitted.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::{debug, warn};
use zip::ZipArchive;

use super::ExtractError;

const DOCUMENT_PART: &str = "word/document.xml";
const CELL_SEPARATOR: &str = " | ";

pub fn extract_docx(path: &Path) -> Result<String, ExtractError> {
    let file = File::open(path)?;
    let mut archive = ZipArchive::new(file)
        .map_err(|e| ExtractError::Docx(format!("not a DOCX container: {e}")))?;

    let mut xml = String::new();
    archive
        .by_name(DOCUMENT_PART)
        .map_err(|e| ExtractError::Docx(format!("missing {DOCUMENT_PART}: {e}")))?
        .read_to_string(&mut xml)?;

    Ok(render_document(&xml))
}

/// Flattens `word/document.xml` into text.
pub(crate) fn render_document(xml: &str) -> String {
    let body = collect_body(xml);

    let mut lines: Vec<String> = body
        .paragraphs
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .map(String::from)
        .collect();

    for row in &body.rows {
        if row.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        let cells: Vec<&str> = row.iter().map(|cell| cell.trim()).collect();
        lines.push(cells.join(CELL_SEPARATOR));
    }

    lines.join("\n").trim().to_string()
}

#[derive(Debug, Default)]
struct Body {
    paragraphs: Vec<String>,
    rows: Vec<Vec<String>>,
}

#[derive(Debug, Default)]
struct BodyWalker {
    body: Body,
    table_depth: usize,
    paragraph_depth: usize,
    run_depth: usize,
    in_text: bool,
    paragraph: String,
    row: Vec<String>,
    cell: Vec<String>,
}

impl BodyWalker {
    fn start(&mut self, name: &[u8]) {
        match name {
            b"tbl" => self.table_depth += 1,
            b"tr" if self.table_depth == 1 => self.row.clear(),
            b"tc" if self.table_depth == 1 => self.cell.clear(),
            b"p" => {
                self.paragraph_depth += 1;
                if self.paragraph_depth == 1 {
                    self.paragraph.clear();
                }
            }
            b"r" => self.run_depth += 1,
            b"t" => self.in_text = true,
            _ => {}
        }
    }

    fn end(&mut self, name: &[u8]) {
        match name {
            b"tbl" => self.table_depth = self.table_depth.saturating_sub(1),
            b"tr" if self.table_depth == 1 => {
                self.body.rows.push(std::mem::take(&mut self.row));
            }
            b"tc" if self.table_depth == 1 => {
                let cell_text = std::mem::take(&mut self.cell).join("\n");
                self.row.push(cell_text);
            }
            b"p" => {
                if self.paragraph_depth == 1 {
                    let paragraph = std::mem::take(&mut self.paragraph);
                    match self.table_depth {
                        0 => self.body.paragraphs.push(paragraph),
                        1 => self.cell.push(paragraph),
                        _ => {}
                    }
                }
                self.paragraph_depth = self.paragraph_depth.saturating_sub(1);
            }
            b"r" => self.run_depth = self.run_depth.saturating_sub(1),
            b"t" => self.in_text = false,
            _ => {}
        }
    }

    fn empty(&mut self, name: &[u8]) {
        if self.paragraph_depth != 1 || self.run_depth == 0 {
            return;
        }
        match name {
            b"tab" => self.paragraph.push('\t'),
            b"br" | b"cr" => self.paragraph.push('\n'),
            _ => {}
        }
    }

    fn text(&mut self, content: &str) {
        if self.in_text && self.paragraph_depth == 1 {
            self.paragraph.push_str(content);
        }
    }
}

fn collect_body(xml: &str) -> Body {
    let mut reader = Reader::from_str(xml);
    let mut walker = BodyWalker::default();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => walker.start(e.local_name().as_ref()),
            Ok(Event::End(e)) => walker.end(e.local_name().as_ref()),
            Ok(Event::Empty(e)) => walker.empty(e.local_name().as_ref()),
            Ok(Event::Text(e)) => match e.unescape() {
                Ok(content) => walker.text(&content),
                Err(err) => debug!(error = %err, "Skipping undecodable DOCX text run"),
            },
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(err) => {
                warn!(
                    position = reader.buffer_position(),
                    error = %err,
                    "Malformed DOCX body; keeping text read so far"
                );
                break;
            }
        }
    }

    walker.body
}
