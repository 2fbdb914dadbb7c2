use crate::error::ScrutinySheetError;
use std::fs::File;
use std::io::BufReader;
use std::io::Cursor;
use std::io::Read;
use std::io::Seek;
use std::path::Path;

/// A unified reader over either a local file or an in-memory workbook
pub(crate) enum UnifiedReader {
    /// Local file reader
    Local(BufReader<File>),
    /// In-memory buffer (uploaded bytes)
    Memory(Cursor<Vec<u8>>),
}

impl UnifiedReader {
    /// Opens a local file for buffered reading
    ///
    /// # Arguments
    /// * `path` - Path to the file
    ///
    /// # Returns
    /// * `Result<UnifiedReader, ScrutinySheetError>` - Reader for the file content
    pub(crate) fn new<P: AsRef<Path>>(path: P) -> Result<UnifiedReader, ScrutinySheetError> {
        let file = File::open(path)?;
        Ok(UnifiedReader::Local(BufReader::new(file)))
    }

    /// Wraps bytes that are already in memory
    pub(crate) fn from_bytes(bytes: Vec<u8>) -> UnifiedReader {
        UnifiedReader::Memory(Cursor::new(bytes))
    }

    /// Peeks at the first bytes and rewinds, used for format sniffing
    pub(crate) fn starts_with(&mut self, signature: &[u8]) -> Result<bool, ScrutinySheetError> {
        let mut head = vec![0u8; signature.len()];
        let matched = match self.read_exact(&mut head) {
            Ok(()) => head == signature,
            Err(error) if error.kind() == std::io::ErrorKind::UnexpectedEof => false,
            Err(error) => Err(error)?,
        };
        self.rewind()?;
        Ok(matched)
    }
}

impl Read for UnifiedReader {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        match self {
            UnifiedReader::Local(reader) => reader.read(buf),
            UnifiedReader::Memory(reader) => reader.read(buf),
        }
    }
}

impl Seek for UnifiedReader {
    fn seek(&mut self, pos: std::io::SeekFrom) -> std::io::Result<u64> {
        match self {
            UnifiedReader::Local(reader) => reader.seek(pos),
            UnifiedReader::Memory(reader) => reader.seek(pos),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_local_file() {
        // Cargo.toml always exists at the crate root during tests
        let result = UnifiedReader::new("Cargo.toml");
        assert!(result.is_ok(), "Failed to open local file: {:?}", result.err());

        let result = UnifiedReader::new("non_existent_file.xlsx");
        assert!(result.is_err(), "Should fail to open non-existent file");
    }

    #[test]
    fn test_starts_with_rewinds() {
        let mut reader = UnifiedReader::from_bytes(b"PK\x03\x04rest".to_vec());
        assert!(reader.starts_with(b"PK\x03\x04").unwrap());
        assert!(!reader.starts_with(b"\xD0\xCF").unwrap());

        let mut content = Vec::new();
        reader.read_to_end(&mut content).unwrap();
        assert_eq!(content, b"PK\x03\x04rest");
    }

    #[test]
    fn test_starts_with_short_input() {
        let mut reader = UnifiedReader::from_bytes(b"P".to_vec());
        assert!(!reader.starts_with(b"PK\x03\x04").unwrap());
    }
}
