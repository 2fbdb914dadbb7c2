//! Low-level building blocks shared by the workbook reader and writer
pub(crate) mod reader;
pub(crate) mod xml;
pub(crate) mod zip;
