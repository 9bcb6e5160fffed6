//! Document assembly and finalization.
//!
//! The assembler walks a [`ResumeRecord`] through a fixed sequence of [`Stage`]s, emitting blocks
//! for every non-empty section, then hands the finished [`OutputDocument`] to a
//! [`DocumentWriter`].  Output is written to a temporary file in the destination directory and
//! only renamed into place once the writer succeeded, so a failed render never leaves a partial
//! file at the returned path.

use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::Local;
use log::{debug, info};
use tempfile::NamedTempFile;

use crate::config::RenderConfig;
use crate::document::OutputDocument;
use crate::emit::Emitter;
use crate::error::Result;
use crate::model::ResumeRecord;
use crate::writer::DocumentWriter;

/// Assembly stages in the order they are visited.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Start,
    Header,
    Summary,
    Education,
    Experience,
    Projects,
    Coursework,
    Skills,
    Finalize,
}

impl Stage {
    /// The stage that follows `self`; `Finalize` is terminal.
    pub fn next(self) -> Option<Stage> {
        match self {
            Stage::Start => Some(Stage::Header),
            Stage::Header => Some(Stage::Summary),
            Stage::Summary => Some(Stage::Education),
            Stage::Education => Some(Stage::Experience),
            Stage::Experience => Some(Stage::Projects),
            Stage::Projects => Some(Stage::Coursework),
            Stage::Coursework => Some(Stage::Skills),
            Stage::Skills => Some(Stage::Finalize),
            Stage::Finalize => None,
        }
    }

    /// Whether the record has content for this stage.
    fn applies_to(self, record: &ResumeRecord) -> bool {
        match self {
            Stage::Start | Stage::Finalize => true,
            Stage::Header => record.header().is_some(),
            Stage::Summary => record.summary().is_some(),
            Stage::Education => record.visible_education().next().is_some(),
            Stage::Experience => record.visible_experience().next().is_some(),
            Stage::Projects => record.visible_projects().next().is_some(),
            Stage::Coursework => !record.visible_coursework().is_empty(),
            Stage::Skills => !record.skills.is_empty(),
        }
    }
}

/// Builds the output document for `record`.
pub fn assemble(record: &ResumeRecord, config: &RenderConfig) -> OutputDocument {
    let layout = &config.layout;
    let mut document = OutputDocument::new(
        layout.paper,
        layout.margins,
        layout.font_family.clone(),
        layout.base_font_size,
    );
    document.set_bullet_glyph(layout.bullet_glyph.as_str());
    if let Some(header) = record.header() {
        if !header.name.trim().is_empty() {
            document.set_title(header.name.trim());
        }
    }

    let mut stage = Some(Stage::Start);
    while let Some(current) = stage {
        if current.applies_to(record) {
            debug!("assembling stage {current:?}");
            emit_stage(current, record, config, &mut Emitter::new(&mut document, config));
        } else {
            debug!("skipping empty stage {current:?}");
        }
        stage = current.next();
    }

    document
}

fn emit_stage(
    stage: Stage,
    record: &ResumeRecord,
    config: &RenderConfig,
    emitter: &mut Emitter<'_>,
) {
    let labels = &config.labels;
    match stage {
        Stage::Start | Stage::Finalize => {}
        Stage::Header => {
            if let Some(header) = record.header() {
                emitter.header(header);
            }
        }
        Stage::Summary => {
            match labels.summary.as_deref() {
                Some(label) => emitter.section_title(label),
                None => emitter.divider(),
            }
            if let Some(summary) = record.summary() {
                emitter.paragraph(summary);
            }
        }
        Stage::Education => {
            emitter.section_title(&labels.education);
            for entry in record.visible_education() {
                emitter.left_right(&entry.degree, &entry.duration, true, true);
                emitter.left_right(&entry.institution, &entry.grade, false, false);
            }
        }
        Stage::Experience => {
            emitter.section_title(&labels.experience);
            for entry in record.visible_experience() {
                let heading = join_nonblank(
                    [entry.role.as_str(), entry.company.as_str()],
                    &config.role_company_separator,
                );
                emitter.left_right(&heading, &entry.duration, true, true);
                for bullet in entry.bullets.iter().filter(|b| !b.trim().is_empty()) {
                    emitter.bullet(bullet);
                }
            }
        }
        Stage::Projects => {
            emitter.section_title(&labels.projects);
            for entry in record.visible_projects() {
                if !entry.title.trim().is_empty() {
                    emitter.item_title(&entry.title);
                }
                for bullet in entry.bullets.iter().filter(|b| !b.trim().is_empty()) {
                    emitter.bullet(bullet);
                }
            }
        }
        Stage::Coursework => {
            emitter.section_title(&labels.coursework);
            let courses = record.visible_coursework();
            emitter.paragraph(&courses.join(&config.coursework_separator));
        }
        Stage::Skills => {
            emitter.section_title(&labels.skills);
            for category in record.skills.visible_categories() {
                let skills = category.visible_skills().join(&config.skills_separator);
                emitter.labeled_paragraph(&category.name, &skills);
            }
        }
    }
}

fn join_nonblank<'a>(parts: impl IntoIterator<Item = &'a str>, separator: &str) -> String {
    parts
        .into_iter()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(separator)
}

/// Where a rendered document is written.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OutputTarget {
    /// An explicit file path; an existing file is replaced.
    Path(PathBuf),
    /// A fresh, timestamp-derived file name inside `dir`: `<stem>_<YYYYmmdd_HHMMSS_mmm>.<ext>`.
    Timestamped { dir: PathBuf, stem: String },
}

impl OutputTarget {
    pub fn path(path: impl Into<PathBuf>) -> Self {
        Self::Path(path.into())
    }

    pub fn timestamped(dir: impl Into<PathBuf>, stem: impl Into<String>) -> Self {
        Self::Timestamped {
            dir: dir.into(),
            stem: stem.into(),
        }
    }

    fn directory(&self) -> &Path {
        match self {
            OutputTarget::Path(path) => match path.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent,
                _ => Path::new("."),
            },
            OutputTarget::Timestamped { dir, .. } => dir,
        }
    }
}

const MAX_NAME_ATTEMPTS: usize = 100;

/// Serializes `document` with `writer` and moves it into place at `target`.
///
/// Returns the final path.  On error the temporary file is removed and nothing is left at the
/// destination.
pub fn finalize(
    document: &OutputDocument,
    writer: &dyn DocumentWriter,
    target: &OutputTarget,
) -> Result<PathBuf> {
    let directory = target.directory();
    fs::create_dir_all(directory)?;

    let mut temp = NamedTempFile::new_in(directory)?;
    {
        let mut sink = BufWriter::new(temp.as_file_mut());
        writer.write(document, &mut sink)?;
        sink.flush()?;
    }
    temp.as_file().sync_all()?;

    let path = match target {
        OutputTarget::Path(path) => {
            temp.persist(path).map_err(|err| err.error)?;
            path.clone()
        }
        OutputTarget::Timestamped { dir, stem } => {
            persist_unique(temp, dir, stem, writer.extension())?
        }
    };

    info!("wrote {}", path.display());
    Ok(path)
}

fn persist_unique(
    mut temp: NamedTempFile,
    dir: &Path,
    stem: &str,
    extension: &str,
) -> Result<PathBuf> {
    let timestamp = Local::now().format("%Y%m%d_%H%M%S_%3f").to_string();
    for attempt in 0..MAX_NAME_ATTEMPTS {
        let name = if attempt == 0 {
            format!("{stem}_{timestamp}.{extension}")
        } else {
            format!("{stem}_{timestamp}_{attempt}.{extension}")
        };
        let candidate = dir.join(name);
        match temp.persist_noclobber(&candidate) {
            Ok(_) => return Ok(candidate),
            Err(err) if err.error.kind() == io::ErrorKind::AlreadyExists => temp = err.file,
            Err(err) => return Err(err.error.into()),
        }
    }
    Err(io::Error::new(
        io::ErrorKind::AlreadyExists,
        format!("no free output name for `{stem}` in {}", dir.display()),
    )
    .into())
}

/// Assembles `record` and writes it to `target`, returning the final path.
pub fn render(
    record: &ResumeRecord,
    config: &RenderConfig,
    writer: &dyn DocumentWriter,
    target: &OutputTarget,
) -> Result<PathBuf> {
    let document = assemble(record, config);
    debug!("assembled {} blocks", document.blocks().len());
    finalize(&document, writer, target)
}

/// Validates a JSON value as a [`ResumeRecord`] and renders it.
pub fn render_value(
    value: serde_json::Value,
    config: &RenderConfig,
    writer: &dyn DocumentWriter,
    target: &OutputTarget,
) -> Result<PathBuf> {
    let record = ResumeRecord::from_json_value(value)?;
    render(&record, config, writer, target)
}

/// Bundles a configuration and a writer for repeated renders.
pub struct Renderer<W> {
    config: RenderConfig,
    writer: W,
}

impl<W: DocumentWriter> Renderer<W> {
    pub fn new(writer: W) -> Self {
        Self::with_config(writer, RenderConfig::default())
    }

    pub fn with_config(writer: W, config: RenderConfig) -> Self {
        Self { config, writer }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    /// Builds the output document without writing it.
    pub fn assemble(&self, record: &ResumeRecord) -> OutputDocument {
        assemble(record, &self.config)
    }

    /// Renders `record` to `target`.
    pub fn render(&self, record: &ResumeRecord, target: &OutputTarget) -> Result<PathBuf> {
        render(record, &self.config, &self.writer, target)
    }

    /// Renders `record` into memory.
    pub fn render_to_vec(&self, record: &ResumeRecord) -> Result<Vec<u8>> {
        self.writer.write_to_vec(&self.assemble(record))
    }
}
