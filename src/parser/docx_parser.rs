//! DOCX element extraction backed by `docx-rust`.

use std::io::Cursor;
use std::path::Path;

use docx_rust::document::{
    BodyContent, Drawing, Paragraph, ParagraphContent, Run, RunContent, Table, TableCellContent,
    TableRowContent,
};
use docx_rust::{Docx, DocxFile};

use crate::error::{Error, Result};
use crate::model::Element;

use super::{drop_trailing_image, DocumentParser, ParseOptions};

/// English Metric Units per typographic point.
const EMU_PER_POINT: f64 = 12_700.0;

/// DOCX document parser.
///
/// Walks the document body in reading order, descending into tables and
/// content controls. Each paragraph contributes its trimmed text followed by
/// the images drawn inside it. Image sizes are reported in points.
#[derive(Debug, Clone, Default)]
pub struct DocxParser {
    options: ParseOptions,
}

impl DocxParser {
    /// Create a parser with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a parser with custom options.
    pub fn with_options(options: ParseOptions) -> Self {
        Self { options }
    }

    /// Get the parse options.
    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    fn extract(&self, file: &DocxFile) -> Result<Vec<Element>> {
        let docx = file
            .parse()
            .map_err(|e| Error::DocumentParse(e.to_string()))?;

        let mut walker = ElementWalker {
            docx: &docx,
            options: &self.options,
            elements: Vec::new(),
        };
        for content in &docx.document.body.content {
            walker.body_content(content);
        }

        let mut elements = walker.elements;
        if self.options.skip_trailing_image {
            drop_trailing_image(&mut elements);
        }

        log::debug!(
            "Extracted {} elements ({} images)",
            elements.len(),
            elements.iter().filter(|e| e.is_image()).count()
        );
        Ok(elements)
    }
}

impl DocumentParser for DocxParser {
    fn name(&self) -> &str {
        "docx"
    }

    fn parse(&self, path: &Path) -> Result<Vec<Element>> {
        let file = DocxFile::from_file(path).map_err(|e| {
            Error::DocumentParse(format!("failed to open {}: {}", path.display(), e))
        })?;
        self.extract(&file)
    }

    fn parse_bytes(&self, bytes: &[u8]) -> Result<Vec<Element>> {
        let file = DocxFile::from_reader(Cursor::new(bytes))
            .map_err(|e| Error::DocumentParse(e.to_string()))?;
        self.extract(&file)
    }
}

struct ElementWalker<'a> {
    docx: &'a Docx<'a>,
    options: &'a ParseOptions,
    elements: Vec<Element>,
}

impl<'a> ElementWalker<'a> {
    fn body_content(&mut self, content: &BodyContent) {
        match content {
            BodyContent::Paragraph(para) => self.paragraph(para),
            BodyContent::Table(table) => self.table(table),
            BodyContent::Sdt(sdt) => {
                if let Some(ref sdt_content) = sdt.content {
                    for item in &sdt_content.content {
                        self.body_content(item);
                    }
                }
            }
            _ => {}
        }
    }

    fn table(&mut self, table: &Table) {
        for row in &table.rows {
            for cell_content in &row.cells {
                if let TableRowContent::TableCell(cell) = cell_content {
                    for tc in &cell.content {
                        let TableCellContent::Paragraph(para) = tc;
                        self.paragraph(para);
                    }
                }
            }
        }
    }

    fn paragraph(&mut self, para: &Paragraph) {
        let mut text = String::new();
        let mut images = Vec::new();

        for pc in &para.content {
            match pc {
                ParagraphContent::Run(run) => self.run(run, &mut text, &mut images),
                ParagraphContent::Link(link) => {
                    if let Some(ref run) = link.content {
                        self.run(run, &mut text, &mut images);
                    }
                }
                _ => {}
            }
        }

        let text = text.trim();
        if !text.is_empty() {
            if self.options.is_boilerplate(text) {
                log::debug!("Skipping boilerplate paragraph");
            } else {
                self.elements.push(Element::text(text));
            }
        }
        self.elements.extend(images);
    }

    fn run(&self, run: &Run, text: &mut String, images: &mut Vec<Element>) {
        for rc in &run.content {
            match rc {
                RunContent::Text(t) => text.push_str(&t.text),
                RunContent::Break(_) => text.push('\n'),
                RunContent::Tab(_) => text.push('\t'),
                RunContent::Drawing(drawing) => {
                    if let Some(image) = self.drawing(drawing) {
                        images.push(image);
                    }
                }
                _ => {}
            }
        }
    }

    fn drawing(&self, drawing: &Drawing) -> Option<Element> {
        if let Some(ref inline) = drawing.inline {
            if let Some(ref graphic) = inline.graphic {
                if let Some(pic) = graphic.data.children.first() {
                    let (width, height) = inline
                        .extent
                        .as_ref()
                        .map(|e| (emu_to_points(e.cx as f64), emu_to_points(e.cy as f64)))
                        .unwrap_or_default();
                    return self.image(pic.fill.blip.embed.as_ref(), width, height);
                }
            }
        }

        if let Some(ref anchor) = drawing.anchor {
            if let Some(ref graphic) = anchor.graphic {
                if let Some(pic) = graphic.data.children.first() {
                    let (width, height) = anchor
                        .extent
                        .as_ref()
                        .map(|e| (emu_to_points(e.cx as f64), emu_to_points(e.cy as f64)))
                        .unwrap_or_default();
                    return self.image(pic.fill.blip.embed.as_ref(), width, height);
                }
            }
        }

        None
    }

    fn image(&self, embed_id: &str, width: f64, height: f64) -> Option<Element> {
        let target = self
            .docx
            .document_rels
            .as_ref()?
            .relationships
            .iter()
            .find(|r| r.id.as_ref() == embed_id)?
            .target
            .as_ref();

        for (path, (_media_type, data)) in &self.docx.media {
            if media_path_matches(path, target) {
                return Some(Element::image(data.to_vec(), width, height));
            }
        }

        log::warn!("Image relationship {} has no media part ({})", embed_id, target);
        None
    }
}

fn emu_to_points(emu: f64) -> f64 {
    emu / EMU_PER_POINT
}

/// Relationship targets are relative to `word/` or absolute part names.
fn media_path_matches(path: &str, target: &str) -> bool {
    part_name(path) == part_name(target)
}

fn part_name(path: &str) -> &str {
    let path = path.trim_start_matches('/');
    path.strip_prefix("word/").unwrap_or(path)
}
