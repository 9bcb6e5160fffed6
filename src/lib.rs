//! Core entry point for the resume_render crate.
//!
//! A [`ResumeRecord`] is assembled into an [`OutputDocument`] of typed blocks, which a
//! [`DocumentWriter`] then serializes as PDF or plain text.

pub mod assemble;
pub mod config;
pub mod document;
pub mod emit;
pub mod error;
pub mod fonts;
pub mod layout;
pub mod legacy;
pub mod model;
pub mod pdf;
pub mod response;
pub mod richtext;
pub mod validate;
pub mod writer;

pub use assemble::{assemble, finalize, render, render_value, OutputTarget, Renderer};
pub use config::{HeadingCase, RenderConfig, SectionLabels};
pub use document::{Block, BlockContent, BlockKind, BlockLayout, OutputDocument};
pub use error::{RecordError, RenderError, Result};
pub use legacy::SavedResume;
pub use model::{
    EducationEntry, ExperienceEntry, Header, ProjectEntry, ResumeRecord, SkillCategory, SkillSet,
};
pub use pdf::PdfWriter;
pub use response::parse_model_response;
pub use writer::{DocumentWriter, PlainTextWriter};
