use resume_render::document::{PageMargins, PaperSize};
use resume_render::fonts;
use resume_render::richtext::StyledRun;
use resume_render::model::{
    EducationEntry, ExperienceEntry, Header, ProjectEntry, ResumeRecord, SkillSet,
};
use resume_render::{
    assemble, render, Block, BlockContent, BlockKind, BlockLayout, DocumentWriter,
    OutputDocument, OutputTarget, PdfWriter, RenderConfig,
};
use sha2::{Digest, Sha256};

const SKIP_HINT: &str =
    "fonts missing. Set RESUME_RENDER_FONTS_DIR or copy assets/fonts next to the binary.";

fn sample_record() -> ResumeRecord {
    ResumeRecord {
        header: Some(
            Header::new("Jane Doe")
                .with_phone("555-0100")
                .with_email("jane@example.com")
                .with_github("github.com/jane"),
        ),
        summary: Some("Backend engineer focused on **storage** and reliability.".into()),
        education: vec![EducationEntry {
            degree: "B.S. Computer Science".into(),
            institution: "State University".into(),
            duration: "2015 - 2019".into(),
            grade: "GPA 3.8".into(),
        }],
        experience: vec![ExperienceEntry {
            role: "Software Engineer".into(),
            company: "Acme".into(),
            duration: "2019 - Present".into(),
            bullets: vec![
                "Cut p99 latency by **40%** with a write-back cache".into(),
                "Owned the on-call rotation for the ingest pipeline".into(),
            ],
        }],
        projects: vec![ProjectEntry {
            title: "resume-render".into(),
            bullets: vec!["PDF resume renderer".into()],
        }],
        coursework: vec!["Operating Systems".into(), "Databases".into()],
        skills: SkillSet::new().with("Languages", ["Rust", "Go"]),
    }
}

fn render_sample_pdf(record: &ResumeRecord) -> Option<Vec<u8>> {
    if !fonts::default_fonts_available() {
        return None;
    }

    let document = assemble(record, &RenderConfig::default());
    let bytes = PdfWriter::new()
        .write_to_vec(&document)
        .expect("render sample pdf");
    Some(bytes)
}

fn scrub_pdf(bytes: &[u8]) -> Vec<u8> {
    fn scrub_segment(data: &mut [u8], tag: &[u8], terminator: u8) {
        let mut index = 0;
        while index + tag.len() < data.len() {
            if data[index..].starts_with(tag) {
                let mut cursor = index + tag.len();
                while cursor < data.len() {
                    let byte = data[cursor];
                    if byte == terminator {
                        break;
                    }
                    if terminator == b')' {
                        data[cursor] = b'0';
                    } else if !matches!(byte, b'<' | b'>' | b' ' | b'\n' | b'\r' | b'\t') {
                        data[cursor] = b'0';
                    }
                    cursor += 1;
                }
                index = cursor;
            } else {
                index += 1;
            }
        }
    }

    fn scrub_xml(data: &mut [u8], start: &[u8], end: &[u8]) {
        let mut offset = 0;
        while offset + start.len() < data.len() {
            if let Some(start_pos) = data[offset..]
                .windows(start.len())
                .position(|window| window == start)
            {
                let start_index = offset + start_pos + start.len();
                if let Some(end_pos) = data[start_index..]
                    .windows(end.len())
                    .position(|window| window == end)
                {
                    for byte in &mut data[start_index..start_index + end_pos] {
                        if !matches!(*byte, b'<' | b'>' | b'/' | b' ' | b'\n' | b'\r' | b'\t') {
                            *byte = b'0';
                        }
                    }
                    offset = start_index + end_pos + end.len();
                } else {
                    break;
                }
            } else {
                break;
            }
        }
    }

    let mut normalized = bytes.to_vec();
    scrub_segment(&mut normalized, b"/CreationDate(", b')');
    scrub_segment(&mut normalized, b"/ModDate(", b')');
    scrub_segment(&mut normalized, b"/ID[", b']');
    scrub_segment(&mut normalized, b"/Producer(", b')');
    scrub_xml(&mut normalized, b"<xmp:CreateDate>", b"</xmp:CreateDate>");
    scrub_xml(&mut normalized, b"<xmp:ModifyDate>", b"</xmp:ModifyDate>");
    scrub_xml(
        &mut normalized,
        b"<xmp:MetadataDate>",
        b"</xmp:MetadataDate>",
    );
    scrub_xml(
        &mut normalized,
        b"<xmpMM:DocumentID>",
        b"</xmpMM:DocumentID>",
    );
    scrub_xml(
        &mut normalized,
        b"<xmpMM:InstanceID>",
        b"</xmpMM:InstanceID>",
    );
    scrub_xml(&mut normalized, b"<xmpMM:VersionID>", b"</xmpMM:VersionID>");
    normalized
}

fn normalized_hash(bytes: &[u8]) -> [u8; 32] {
    let normalized = scrub_pdf(bytes);
    let digest = Sha256::digest(&normalized);
    digest.into()
}

#[test]
fn renders_non_empty_output() {
    let Some(bytes) = render_sample_pdf(&sample_record()) else {
        eprintln!("Skipping renders_non_empty_output: {SKIP_HINT}");
        return;
    };
    assert!(bytes.starts_with(b"%PDF"), "output should be a PDF");
}

#[test]
fn rendering_is_deterministic() {
    let record = sample_record();
    let Some(bytes_a) = render_sample_pdf(&record) else {
        eprintln!("Skipping rendering_is_deterministic: {SKIP_HINT}");
        return;
    };
    let Some(bytes_b) = render_sample_pdf(&record) else {
        eprintln!("Skipping rendering_is_deterministic: {SKIP_HINT}");
        return;
    };

    assert_eq!(
        normalized_hash(&bytes_a),
        normalized_hash(&bytes_b),
        "PDF renders must be deterministic after metadata normalization"
    );
}

#[test]
fn long_resume_paginates() {
    let mut record = sample_record();
    let job = record.experience[0].clone();
    record.experience = std::iter::repeat(job).take(40).collect();
    let Some(bytes) = render_sample_pdf(&record) else {
        eprintln!("Skipping long_resume_paginates: {SKIP_HINT}");
        return;
    };
    let single = render_sample_pdf(&sample_record()).expect("fonts already checked");
    assert!(bytes.len() > single.len());
}

#[test]
fn empty_record_still_renders() {
    let Some(bytes) = render_sample_pdf(&ResumeRecord::default()) else {
        eprintln!("Skipping empty_record_still_renders: {SKIP_HINT}");
        return;
    };
    assert!(bytes.starts_with(b"%PDF"));
}

#[test]
fn pdf_is_written_to_target_path() {
    if !fonts::default_fonts_available() {
        eprintln!("Skipping pdf_is_written_to_target_path: {SKIP_HINT}");
        return;
    }
    let dir = tempfile::tempdir().expect("temp dir");
    let target = OutputTarget::path(dir.path().join("resume.pdf"));
    let path = render(
        &sample_record(),
        &RenderConfig::default(),
        &PdfWriter::new(),
        &target,
    )
    .expect("render to file");
    let bytes = std::fs::read(&path).expect("read output");
    assert!(bytes.starts_with(b"%PDF"));
}

fn line_block(kind: BlockKind, index: usize, keep_with_next: bool) -> Block {
    Block::new(
        kind,
        BlockContent::Runs(vec![StyledRun::plain(format!("Line {index}"))]),
        BlockLayout {
            keep_with_next,
            ..BlockLayout::default()
        },
    )
}

fn page_count(writer: &PdfWriter, blocks: Vec<Block>) -> usize {
    let mut document = OutputDocument::new(PaperSize::Letter, PageMargins::default(), "Roboto", 10);
    blocks.into_iter().for_each(|block| document.push(block));
    writer
        .write_pages(&document, &mut Vec::new())
        .expect("render pdf")
}

/// `count` one-line blocks; a chain binds every line to the next except the last.
fn lines(kind: BlockKind, count: usize, chained: bool) -> Vec<Block> {
    (0..count)
        .map(|index| line_block(kind, index, chained && index + 1 < count))
        .collect()
}

#[test]
fn bound_heading_chain_moves_to_next_page() {
    let family = match fonts::default_font_family() {
        Ok(family) => family,
        Err(_) => {
            eprintln!("Skipping bound_heading_chain_moves_to_next_page: {SKIP_HINT}");
            return;
        }
    };
    let writer = PdfWriter::new().with_font_family(family);

    // Largest number of plain lines that fits on one page.
    let (mut fits, mut overflows) = (1, 400);
    assert_eq!(page_count(&writer, lines(BlockKind::Paragraph, fits, false)), 1);
    assert!(page_count(&writer, lines(BlockKind::Paragraph, overflows, false)) > 1);
    while overflows - fits > 1 {
        let mid = (fits + overflows) / 2;
        if page_count(&writer, lines(BlockKind::Paragraph, mid, false)) == 1 {
            fits = mid;
        } else {
            overflows = mid;
        }
    }
    let per_page = fits;
    assert!(per_page >= 12, "unexpectedly small page: {per_page} lines");

    // Three runs of a little over half a page each.
    let run = per_page / 2 + 2;
    let document = |chained: bool| {
        let mut blocks = lines(BlockKind::Paragraph, run, false);
        for _ in 0..2 {
            let mut chain = lines(BlockKind::Paragraph, run, chained);
            chain[0] = line_block(BlockKind::SectionTitle, 0, chained);
            blocks.extend(chain);
        }
        blocks
    };

    assert_eq!(page_count(&writer, document(false)), 2);
    assert_eq!(page_count(&writer, document(true)), 3);
}

#[test]
fn page_count_matches_short_resume() {
    if !fonts::default_fonts_available() {
        eprintln!("Skipping page_count_matches_short_resume: {SKIP_HINT}");
        return;
    }
    let document = assemble(&sample_record(), &RenderConfig::default());
    let pages = PdfWriter::new()
        .write_pages(&document, &mut Vec::new())
        .expect("render sample pdf");
    assert_eq!(pages, 1);
}
