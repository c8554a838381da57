use std::io::{Read, Seek, Write};
use std::path::Path;

use zip::CompressionMethod;
use zip::write::SimpleFileOptions;

use crate::error::Error;

struct Entry {
    name: String,
    data: Vec<u8>,
    stored: bool,
    is_dir: bool,
}

/// All entries of a DOCX zip, held in memory in archive order.
pub struct Package {
    entries: Vec<Entry>,
}

impl Package {
    pub fn open(path: &Path) -> Result<Self, Error> {
        let file = std::fs::File::open(path)?;
        Package::read(file)
    }

    pub fn read<R: Read + Seek>(reader: R) -> Result<Self, Error> {
        let mut zip = zip::ZipArchive::new(reader)?;
        let mut entries = Vec::with_capacity(zip.len());
        for i in 0..zip.len() {
            let mut file = zip.by_index(i)?;
            let mut data = Vec::new();
            file.read_to_end(&mut data)?;
            entries.push(Entry {
                name: file.name().to_string(),
                stored: file.compression() == CompressionMethod::Stored,
                is_dir: file.is_dir(),
                data,
            });
        }
        Ok(Package { entries })
    }

    /// Build a package from `(name, bytes)` pairs; every entry is deflated on write.
    pub fn from_entries<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = (S, Vec<u8>)>,
        S: Into<String>,
    {
        let entries = parts
            .into_iter()
            .map(|(name, data)| Entry {
                name: name.into(),
                data,
                stored: false,
                is_dir: false,
            })
            .collect();
        Package { entries }
    }

    pub fn save(&self, path: &Path) -> Result<(), Error> {
        let file = std::fs::File::create(path)?;
        self.write(file)?;
        Ok(())
    }

    pub fn write<W: Write + Seek>(&self, writer: W) -> Result<W, Error> {
        let mut zip = zip::ZipWriter::new(writer);
        let deflated = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        let stored = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        for entry in &self.entries {
            let opts = if entry.stored { stored } else { deflated };
            if entry.is_dir {
                zip.add_directory(entry.name.as_str(), opts)?;
                continue;
            }
            zip.start_file(entry.name.as_str(), opts)?;
            zip.write_all(&entry.data)?;
        }
        Ok(zip.finish()?)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|e| e.name == name)
    }

    pub fn part(&self, name: &str) -> Option<&[u8]> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.data.as_slice())
    }

    /// The part as UTF-8 text.
    pub fn part_text(&self, name: &str) -> Result<&str, Error> {
        let data = self
            .part(name)
            .ok_or_else(|| Error::InvalidDocx(format!("missing part {name}")))?;
        std::str::from_utf8(data)
            .map_err(|_| Error::InvalidDocx(format!("part {name} is not UTF-8")))
    }

    pub fn set_part(&mut self, name: &str, data: Vec<u8>) {
        match self.entries.iter_mut().find(|e| e.name == name) {
            Some(entry) => entry.data = data,
            None => self.entries.push(Entry {
                name: name.to_string(),
                data,
                stored: false,
                is_dir: false,
            }),
        }
    }
}
