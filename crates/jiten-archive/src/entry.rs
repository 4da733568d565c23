use std::fs::File;
use std::io::Read;
use std::path::Path;

use zip::ZipArchive;
use zip::result::ZipError;

use jiten_types::index::DictionaryIndex;

use crate::decode;
use crate::error::ArchiveError;

/// Bank file kinds recognized inside a dictionary archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BankKind {
    Terms,
    TermMeta,
    Tags,
    Kanji,
    KanjiMeta,
}

impl BankKind {
    fn prefix(&self) -> &'static str {
        match self {
            BankKind::Terms => "term_bank_",
            BankKind::TermMeta => "term_meta_bank_",
            BankKind::Tags => "tag_bank_",
            BankKind::Kanji => "kanji_bank_",
            BankKind::KanjiMeta => "kanji_meta_bank_",
        }
    }
}

/// Parse a bank file name like `term_bank_3.json` into its kind and number.
pub fn parse_bank_name(name: &str) -> Option<(BankKind, u32)> {
    const KINDS: [BankKind; 5] = [
        BankKind::TermMeta,
        BankKind::Terms,
        BankKind::KanjiMeta,
        BankKind::Kanji,
        BankKind::Tags,
    ];

    for kind in KINDS {
        let Some(rest) = name.strip_prefix(kind.prefix()) else {
            continue;
        };
        let Some(number) = rest.strip_suffix(".json") else {
            continue;
        };
        match number.parse::<u32>() {
            Ok(n) if n >= 1 => return Some((kind, n)),
            _ => continue,
        }
    }
    None
}

/// One bank file pulled out of the archive.
pub struct BankEntry {
    pub kind: BankKind,
    pub number: u32,
    pub name: String,
    pub bytes: Vec<u8>,
}

/// An opened dictionary zip archive.
pub struct DictionaryArchive {
    archive: ZipArchive<File>,
}

impl DictionaryArchive {
    /// Open an archive file; fails before anything is written downstream if
    /// the zip is missing or corrupt.
    pub fn open(path: &Path) -> Result<Self, ArchiveError> {
        let file = File::open(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ArchiveError::NotFound(path.to_path_buf())
            } else {
                ArchiveError::Io(e)
            }
        })?;
        let archive = ZipArchive::new(file)?;
        Ok(Self { archive })
    }

    /// Dedicated lookahead read of `index.json`, performed before bank
    /// processing because its title/revision gate the whole import.
    pub fn read_index(&mut self) -> Result<DictionaryIndex, ArchiveError> {
        let bytes = match self.read_entry("index.json") {
            Ok(bytes) => bytes,
            Err(ArchiveError::Zip(ZipError::FileNotFound)) => {
                return Err(ArchiveError::MissingIndex);
            }
            Err(other) => return Err(other),
        };
        decode::decode_index(&bytes)
    }

    /// Single-pass iterator over recognized bank entries; only one entry's
    /// bytes are materialized at a time.
    pub fn entries(&mut self) -> BankEntries<'_> {
        BankEntries {
            archive: &mut self.archive,
            next: 0,
        }
    }

    fn read_entry(&mut self, name: &str) -> Result<Vec<u8>, ArchiveError> {
        let mut entry = self.archive.by_name(name)?;
        let mut bytes = Vec::with_capacity(entry.size() as usize);
        entry.read_to_end(&mut bytes)?;
        Ok(bytes)
    }
}

/// Lazy sequence of bank entries: finite, single-pass, not restartable.
pub struct BankEntries<'a> {
    archive: &'a mut ZipArchive<File>,
    next: usize,
}

impl Iterator for BankEntries<'_> {
    type Item = Result<BankEntry, ArchiveError>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.next < self.archive.len() {
            let index = self.next;
            self.next += 1;

            let name = match self.archive.name_for_index(index) {
                Some(name) => name.to_string(),
                None => continue,
            };
            let Some((kind, number)) = parse_bank_name(&name) else {
                continue;
            };

            let mut entry = match self.archive.by_index(index) {
                Ok(entry) => entry,
                Err(e) => return Some(Err(e.into())),
            };
            let mut bytes = Vec::with_capacity(entry.size() as usize);
            if let Err(e) = entry.read_to_end(&mut bytes) {
                return Some(Err(e.into()));
            }

            return Some(Ok(BankEntry {
                kind,
                number,
                name,
                bytes,
            }));
        }
        None
    }
}
