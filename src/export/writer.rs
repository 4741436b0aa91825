use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use serde::Serialize;
use std::fmt::Display;
use std::fs::{self, File};
use std::io::{self, Cursor, Write};
use std::path::{Path, PathBuf};
use tempfile::{NamedTempFile, TempDir};
use tracing::{debug, error, info};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::config::OutputFormat;
use crate::data::{CorpusBatch, CorpusUnit, SourceKind};
use crate::error::{CorpusError, Result};

/// Flat record shared by the JSON and XML artifacts of both pipelines
#[derive(Debug, Serialize)]
struct UnitRecord<'a> {
    title: &'a str,
    author: &'a str,
    language: &'a str,
    text: &'a str,
    source: SourceKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    url: Option<&'a str>,
}

impl<'a> From<&'a CorpusUnit> for UnitRecord<'a> {
    fn from(unit: &'a CorpusUnit) -> Self {
        Self {
            title: &unit.title,
            author: &unit.author,
            language: &unit.language,
            text: &unit.body,
            source: unit.source,
            url: unit.url.as_deref(),
        }
    }
}

fn xml_names(kind: SourceKind) -> (&'static str, &'static str) {
    match kind {
        SourceKind::File => ("books", "book"),
        SourceKind::Web => ("news_corpus", "entry"),
    }
}

fn serialization_error(err: impl Display) -> CorpusError {
    CorpusError::Serialization(err.to_string())
}

/// Header block followed by the body, one block per unit
pub fn render_txt(batch: &CorpusBatch) -> String {
    let blocks: Vec<String> = batch
        .units()
        .iter()
        .map(|unit| {
            let mut block = format!(
                "# Title: {}\n# Author: {}\n# Language: {}\n",
                unit.title, unit.author, unit.language
            );
            if let Some(url) = &unit.url {
                block.push_str(&format!("# URL: {}\n", url));
            }
            block.push_str("# -----\n");
            block.push_str(&unit.body);
            block
        })
        .collect();

    let mut out = blocks.join("\n\n");
    out.push('\n');
    out
}

pub fn render_json(batch: &CorpusBatch) -> Result<String> {
    let records: Vec<UnitRecord<'_>> = batch.units().iter().map(UnitRecord::from).collect();
    Ok(serde_json::to_string_pretty(&records)?)
}

fn write_element<W: Write>(writer: &mut Writer<W>, name: &str, value: &str) -> Result<()> {
    writer
        .write_event(Event::Start(BytesStart::new(name)))
        .map_err(serialization_error)?;
    writer
        .write_event(Event::Text(BytesText::new(value)))
        .map_err(serialization_error)?;
    writer
        .write_event(Event::End(BytesEnd::new(name)))
        .map_err(serialization_error)?;
    Ok(())
}

pub fn render_xml(batch: &CorpusBatch) -> Result<String> {
    let (root, child) = xml_names(batch.kind());
    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(serialization_error)?;
    writer
        .write_event(Event::Start(BytesStart::new(root)))
        .map_err(serialization_error)?;

    for unit in batch.units() {
        let record = UnitRecord::from(unit);
        writer
            .write_event(Event::Start(BytesStart::new(child)))
            .map_err(serialization_error)?;
        write_element(&mut writer, "title", record.title)?;
        write_element(&mut writer, "author", record.author)?;
        write_element(&mut writer, "language", record.language)?;
        write_element(&mut writer, "source", &record.source.to_string())?;
        if let Some(url) = record.url {
            write_element(&mut writer, "url", url)?;
        }
        write_element(&mut writer, "text", record.text)?;
        writer
            .write_event(Event::End(BytesEnd::new(child)))
            .map_err(serialization_error)?;
    }

    writer
        .write_event(Event::End(BytesEnd::new(root)))
        .map_err(serialization_error)?;

    String::from_utf8(writer.into_inner().into_inner()).map_err(serialization_error)
}

/// Write `bytes` next to `path` and rename into place
fn persist_atomically(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path)?;
    Ok(())
}

/// Serializes a batch to `{output_dir}/{output_base}.{format}`
#[derive(Debug, Clone)]
pub struct CorpusWriter {
    output_dir: PathBuf,
    output_base: String,
    format: OutputFormat,
}

impl CorpusWriter {
    pub fn new(
        output_dir: impl Into<PathBuf>,
        output_base: impl Into<String>,
        format: OutputFormat,
    ) -> Self {
        Self {
            output_dir: output_dir.into(),
            output_base: output_base.into(),
            format,
        }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn artifact_path(&self) -> PathBuf {
        self.output_dir.join(self.file_name(self.format))
    }

    fn file_name(&self, format: OutputFormat) -> String {
        format!("{}.{}", self.output_base, format.extension())
    }

    /// Write one artifact and return its path. Nothing is left at the
    /// target path when writing fails.
    pub fn write(&self, batch: &CorpusBatch) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)?;
        let path = self.artifact_path();

        let result = match self.format {
            OutputFormat::Txt => persist_atomically(&path, render_txt(batch).as_bytes()),
            OutputFormat::Json => {
                render_json(batch).and_then(|json| persist_atomically(&path, json.as_bytes()))
            }
            OutputFormat::Xml => {
                render_xml(batch).and_then(|xml| persist_atomically(&path, xml.as_bytes()))
            }
            OutputFormat::Zip => self.write_zip(batch, &path),
        };

        match result {
            Ok(()) => {
                info!("Saved {} units to {:?}", batch.len(), path);
                Ok(path)
            }
            Err(e) => {
                error!("Failed to write {:?}: {}", path, e);
                Err(e)
            }
        }
    }

    /// Stage the txt, json and xml artifacts in a scoped directory and pack them
    fn write_zip(&self, batch: &CorpusBatch, path: &Path) -> Result<()> {
        let staging = TempDir::new_in(&self.output_dir)?;
        let members = [
            (OutputFormat::Txt, render_txt(batch)),
            (OutputFormat::Json, render_json(batch)?),
            (OutputFormat::Xml, render_xml(batch)?),
        ];

        let mut staged = Vec::with_capacity(members.len());
        for (format, content) in members {
            let name = self.file_name(format);
            let member_path = staging.path().join(&name);
            persist_atomically(&member_path, content.as_bytes())?;
            debug!("Staged {:?}", member_path);
            staged.push((name, member_path));
        }

        let mut archive = NamedTempFile::new_in(&self.output_dir)?;
        {
            let mut zip = ZipWriter::new(archive.as_file_mut());
            let options =
                SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

            for (name, member_path) in &staged {
                zip.start_file(name.as_str(), options)?;
                let mut member = File::open(member_path)?;
                io::copy(&mut member, &mut zip)?;
            }
            zip.finish()?;
        }
        archive.persist(path)?;

        Ok(())
    }
}
