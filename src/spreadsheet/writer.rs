//! Workbook writing: serializes worksheets of styled cells into an `.xlsx` package.

use crate::error::ScrutinySheetError;
use crate::helpers::xml::XmlWriter;
use crate::helpers::zip::ZipWriterHelper;
use crate::spreadsheet::reference::index_to_reference;
use crate::spreadsheet::SpreadsheetError;
use std::collections::BTreeMap;
use std::io::Cursor;
use std::io::Seek;
use std::io::Write;
use std::path::Path;
use zip::ZipWriter;

const NS_MAIN: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
const NS_RELATIONSHIPS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const NS_PACKAGE_RELATIONSHIPS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const NS_CONTENT_TYPES: &str = "http://schemas.openxmlformats.org/package/2006/content-types";

const REL_OFFICE_DOCUMENT: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
const REL_WORKSHEET: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet";
const REL_STYLES: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles";

const TYPE_RELATIONSHIPS: &str = "application/vnd.openxmlformats-package.relationships+xml";
const TYPE_WORKBOOK: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml";
const TYPE_WORKSHEET: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml";
const TYPE_STYLES: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml";

/// Longest sheet name Excel opens
const MAX_SHEET_NAME_LENGTH: usize = 31;

/// Characters Excel forbids in sheet names
const FORBIDDEN_SHEET_NAME_CHARS: [char; 7] = ['[', ']', ':', '*', '?', '/', '\\'];

/// Checks that Excel accepts `name` as a sheet name.
pub fn validate_sheet_name(name: &str) -> Result<(), ScrutinySheetError> {
    let reason = if name.is_empty() {
        Some("name is empty".to_owned())
    } else if name.chars().count() > MAX_SHEET_NAME_LENGTH {
        Some(format!("longer than {MAX_SHEET_NAME_LENGTH} characters"))
    } else if let Some(character) = name.chars().find(|character| FORBIDDEN_SHEET_NAME_CHARS.contains(character)) {
        Some(format!("contains '{character}'"))
    } else if name.starts_with('\'') || name.ends_with('\'') {
        Some("starts or ends with an apostrophe".to_owned())
    } else {
        None
    };
    match reason {
        Some(reason) => Err(SpreadsheetError::InvalidSheetNameError(name.to_owned(), reason).into()),
        None => Ok(()),
    }
}

/// Value written into an output cell.
#[derive(Clone, Debug, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
    /// No value, but the cell still carries its style (merged ranges)
    Blank,
}

impl CellValue {
    pub fn text<S: Into<String>>(value: S) -> Self {
        CellValue::Text(value.into())
    }

    pub fn number(value: f64) -> Self {
        CellValue::Number(value)
    }
}

/// Cell formats known to the generated `styles.xml`.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum CellStyle {
    #[default]
    Normal,
    /// Bold, centered, thin border
    Header,
    /// Bold, centered horizontally and vertically
    Title,
}

impl CellStyle {
    /// Index into `cellXfs`
    const fn index(&self) -> usize {
        match self {
            CellStyle::Normal => 0,
            CellStyle::Header => 1,
            CellStyle::Title => 2,
        }
    }
}

/// One positioned output cell.
#[derive(Clone, Debug, PartialEq)]
pub struct OutputCell {
    /// Row index (0-based)
    pub row: usize,
    /// Column index (0-based)
    pub col: usize,
    pub value: CellValue,
    pub style: CellStyle,
}

/// Rectangular range of cells merged into one, bounds inclusive and 0-based.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MergedRange {
    pub first_row: usize,
    pub first_col: usize,
    pub last_row: usize,
    pub last_col: usize,
}

impl MergedRange {
    /// Merges `first_col..=last_col` within a single row.
    pub fn row(row: usize, first_col: usize, last_col: usize) -> Self {
        MergedRange {
            first_row: row,
            first_col,
            last_row: row,
            last_col,
        }
    }

    /// Excel-style reference such as `A1:C1`.
    pub fn reference(&self) -> String {
        format!(
            "{}:{}",
            index_to_reference(self.first_row, self.first_col),
            index_to_reference(self.last_row, self.last_col)
        )
    }
}

/// A sheet under construction. Cells are kept ordered by position; setting a
/// position twice keeps the last value.
#[derive(Clone, Debug, PartialEq)]
pub struct Worksheet {
    name: String,
    cells: BTreeMap<(usize, usize), OutputCell>,
    merges: Vec<MergedRange>,
}

impl Worksheet {
    pub fn new(name: &str) -> Self {
        Worksheet {
            name: name.to_owned(),
            cells: BTreeMap::new(),
            merges: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sets an unstyled cell.
    pub fn set(&mut self, row: usize, col: usize, value: CellValue) {
        self.set_styled(row, col, value, CellStyle::Normal);
    }

    pub fn set_styled(&mut self, row: usize, col: usize, value: CellValue, style: CellStyle) {
        self.cells.insert((row, col), OutputCell { row, col, value, style });
    }

    pub fn merge(&mut self, range: MergedRange) {
        self.merges.push(range);
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&OutputCell> {
        self.cells.get(&(row, col))
    }

    /// Cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = &OutputCell> {
        self.cells.values()
    }

    pub fn merges(&self) -> &[MergedRange] {
        &self.merges
    }

    /// Indexes of rows holding at least one cell, ascending.
    pub fn used_rows(&self) -> Vec<usize> {
        let mut rows: Vec<usize> = self.cells.keys().map(|(row, _)| *row).collect();
        rows.dedup();
        rows
    }

    fn write_xml<W: Write>(&self, sink: W) -> Result<W, ScrutinySheetError> {
        let mut xml = XmlWriter::new(sink)?;
        xml.start("worksheet", &[("xmlns", NS_MAIN), ("xmlns:r", NS_RELATIONSHIPS)])?;
        xml.start("sheetData", &[])?;
        let mut current_row = None::<usize>;
        for cell in self.cells.values() {
            if current_row != Some(cell.row) {
                if current_row.is_some() {
                    xml.end("row")?;
                }
                xml.start("row", &[("r", (cell.row + 1).to_string().as_str())])?;
                current_row = Some(cell.row);
            }
            write_cell(&mut xml, cell)?;
        }
        if current_row.is_some() {
            xml.end("row")?;
        }
        xml.end("sheetData")?;

        if !self.merges.is_empty() {
            xml.start("mergeCells", &[("count", self.merges.len().to_string().as_str())])?;
            for range in &self.merges {
                xml.empty("mergeCell", &[("ref", range.reference().as_str())])?;
            }
            xml.end("mergeCells")?;
        }
        xml.end("worksheet")?;
        Ok(xml.into_inner())
    }
}

/// Writes a single `<c>` element.
fn write_cell<W: Write>(xml: &mut XmlWriter<W>, cell: &OutputCell) -> Result<(), ScrutinySheetError> {
    let reference = index_to_reference(cell.row, cell.col);
    let style = cell.style.index().to_string();
    let mut attributes = vec![("r", reference.as_str())];
    if cell.style != CellStyle::Normal {
        attributes.push(("s", style.as_str()));
    }
    match &cell.value {
        CellValue::Text(text) => {
            attributes.push(("t", "inlineStr"));
            xml.start("c", &attributes)?;
            xml.start("is", &[])?;
            xml.text_element("t", &[("xml:space", "preserve")], text)?;
            xml.end("is")?;
            xml.end("c")
        }
        CellValue::Number(number) => {
            xml.start("c", &attributes)?;
            xml.text_element("v", &[], &number.to_string())?;
            xml.end("c")
        }
        CellValue::Blank => xml.empty("c", &attributes),
    }
}

/// A workbook ready to be serialized.
#[derive(Clone, Debug, PartialEq)]
pub struct Workbook {
    sheets: Vec<Worksheet>,
}

impl Workbook {
    pub fn new(sheets: Vec<Worksheet>) -> Self {
        Workbook { sheets }
    }

    pub fn sheets(&self) -> &[Worksheet] {
        &self.sheets
    }

    /// Serializes the package into memory.
    pub fn to_bytes(&self) -> Result<Vec<u8>, ScrutinySheetError> {
        for sheet in &self.sheets {
            validate_sheet_name(sheet.name())?;
        }
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        self.write_package(&mut zip)?;
        Ok(zip.finish()?.into_inner())
    }

    /// Serializes the package and writes it to `path` in one step, so a
    /// failure while building never leaves a partial file behind.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ScrutinySheetError> {
        let bytes = self.to_bytes()?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    fn write_package<W: Write + Seek>(&self, zip: &mut ZipWriter<W>) -> Result<(), ScrutinySheetError> {
        zip.start_part("[Content_Types].xml")?;
        self.write_content_types(&mut *zip)?;

        zip.start_part("_rels/.rels")?;
        let mut xml = XmlWriter::new(&mut *zip)?;
        xml.start("Relationships", &[("xmlns", NS_PACKAGE_RELATIONSHIPS)])?;
        xml.empty("Relationship", &[("Id", "rId1"), ("Type", REL_OFFICE_DOCUMENT), ("Target", "xl/workbook.xml")])?;
        xml.end("Relationships")?;

        zip.start_part("xl/workbook.xml")?;
        self.write_workbook(&mut *zip)?;

        zip.start_part("xl/_rels/workbook.xml.rels")?;
        self.write_workbook_relationships(&mut *zip)?;

        zip.start_part("xl/styles.xml")?;
        write_styles(&mut *zip)?;

        for (index, sheet) in self.sheets.iter().enumerate() {
            zip.start_part(&format!("xl/worksheets/sheet{}.xml", index + 1))?;
            sheet.write_xml(&mut *zip)?;
        }
        Ok(())
    }

    fn write_content_types<W: Write>(&self, sink: W) -> Result<(), ScrutinySheetError> {
        let mut xml = XmlWriter::new(sink)?;
        xml.start("Types", &[("xmlns", NS_CONTENT_TYPES)])?;
        xml.empty("Default", &[("Extension", "rels"), ("ContentType", TYPE_RELATIONSHIPS)])?;
        xml.empty("Default", &[("Extension", "xml"), ("ContentType", "application/xml")])?;
        xml.empty("Override", &[("PartName", "/xl/workbook.xml"), ("ContentType", TYPE_WORKBOOK)])?;
        xml.empty("Override", &[("PartName", "/xl/styles.xml"), ("ContentType", TYPE_STYLES)])?;
        for index in 1..=self.sheets.len() {
            let part = format!("/xl/worksheets/sheet{index}.xml");
            xml.empty("Override", &[("PartName", part.as_str()), ("ContentType", TYPE_WORKSHEET)])?;
        }
        xml.end("Types")
    }

    fn write_workbook<W: Write>(&self, sink: W) -> Result<(), ScrutinySheetError> {
        let mut xml = XmlWriter::new(sink)?;
        xml.start("workbook", &[("xmlns", NS_MAIN), ("xmlns:r", NS_RELATIONSHIPS)])?;
        xml.start("sheets", &[])?;
        for (index, sheet) in self.sheets.iter().enumerate() {
            let id = (index + 1).to_string();
            let relationship = format!("rId{id}");
            xml.empty("sheet", &[("name", sheet.name()), ("sheetId", id.as_str()), ("r:id", relationship.as_str())])?;
        }
        xml.end("sheets")?;
        xml.end("workbook")
    }

    fn write_workbook_relationships<W: Write>(&self, sink: W) -> Result<(), ScrutinySheetError> {
        let mut xml = XmlWriter::new(sink)?;
        xml.start("Relationships", &[("xmlns", NS_PACKAGE_RELATIONSHIPS)])?;
        for index in 1..=self.sheets.len() {
            let id = format!("rId{index}");
            let target = format!("worksheets/sheet{index}.xml");
            xml.empty("Relationship", &[("Id", id.as_str()), ("Type", REL_WORKSHEET), ("Target", target.as_str())])?;
        }
        let styles_id = format!("rId{}", self.sheets.len() + 1);
        xml.empty("Relationship", &[("Id", styles_id.as_str()), ("Type", REL_STYLES), ("Target", "styles.xml")])?;
        xml.end("Relationships")
    }
}

/// Writes `styles.xml` with the three formats of [`CellStyle`], in `cellXfs` order.
fn write_styles<W: Write>(sink: W) -> Result<(), ScrutinySheetError> {
    let mut xml = XmlWriter::new(sink)?;
    xml.start("styleSheet", &[("xmlns", NS_MAIN)])?;

    xml.start("fonts", &[("count", "2")])?;
    for bold in [false, true] {
        xml.start("font", &[])?;
        if bold {
            xml.empty("b", &[])?;
        }
        xml.empty("sz", &[("val", "11")])?;
        xml.empty("name", &[("val", "Calibri")])?;
        xml.end("font")?;
    }
    xml.end("fonts")?;

    xml.start("fills", &[("count", "2")])?;
    for pattern in ["none", "gray125"] {
        xml.start("fill", &[])?;
        xml.empty("patternFill", &[("patternType", pattern)])?;
        xml.end("fill")?;
    }
    xml.end("fills")?;

    xml.start("borders", &[("count", "2")])?;
    xml.start("border", &[])?;
    for side in ["left", "right", "top", "bottom", "diagonal"] {
        xml.empty(side, &[])?;
    }
    xml.end("border")?;
    xml.start("border", &[])?;
    for side in ["left", "right", "top", "bottom"] {
        xml.start(side, &[("style", "thin")])?;
        xml.empty("color", &[("auto", "1")])?;
        xml.end(side)?;
    }
    xml.empty("diagonal", &[])?;
    xml.end("border")?;
    xml.end("borders")?;

    xml.start("cellStyleXfs", &[("count", "1")])?;
    xml.empty("xf", &[("numFmtId", "0"), ("fontId", "0"), ("fillId", "0"), ("borderId", "0")])?;
    xml.end("cellStyleXfs")?;

    xml.start("cellXfs", &[("count", "3")])?;
    xml.empty("xf", &[("numFmtId", "0"), ("fontId", "0"), ("fillId", "0"), ("borderId", "0"), ("xfId", "0")])?;
    xml.start("xf", &[("numFmtId", "0"), ("fontId", "1"), ("fillId", "0"), ("borderId", "1"), ("xfId", "0"), ("applyFont", "1"), ("applyBorder", "1"), ("applyAlignment", "1")])?;
    xml.empty("alignment", &[("horizontal", "center"), ("vertical", "top")])?;
    xml.end("xf")?;
    xml.start("xf", &[("numFmtId", "0"), ("fontId", "1"), ("fillId", "0"), ("borderId", "0"), ("xfId", "0"), ("applyFont", "1"), ("applyAlignment", "1")])?;
    xml.empty("alignment", &[("horizontal", "center"), ("vertical", "center")])?;
    xml.end("xf")?;
    xml.end("cellXfs")?;

    xml.start("cellStyles", &[("count", "1")])?;
    xml.empty("cellStyle", &[("name", "Normal"), ("xfId", "0"), ("builtinId", "0")])?;
    xml.end("cellStyles")?;

    xml.end("styleSheet")
}
