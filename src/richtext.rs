//! Inline bold markup for resume text.
//!
//! Resume prose coming from the form or from the model may wrap emphasised phrases in a paired
//! marker (`**like this**`).  The parser in this module splits such a fragment into [`StyledRun`]s
//! that the block emitters append to the output document and that the PDF backend later turns
//! into [`genpdf`] styled strings.
//!
//! Unlike a general markdown parser this one never fails: free-form prose must not abort a render
//! over a stray asterisk, so an opening marker without a partner is kept as literal text.

use genpdf::style::{Style, StyledString};

/// Default paired marker for bold spans.
pub const DEFAULT_BOLD_MARKER: &str = "**";

/// A slice of text together with its weight.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StyledRun {
    /// Raw text of the run, markers removed.
    pub text: String,
    /// Whether the run is emphasised.
    pub bold: bool,
}

impl StyledRun {
    /// Creates a non-bold run.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
        }
    }

    /// Creates a bold run.
    pub fn bold(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: true,
        }
    }

    /// Converts the run to a [`StyledString`] layered on top of `base`.
    pub fn to_styled_string(&self, base: Style) -> StyledString {
        let mut style = base;
        if self.bold {
            style.set_bold();
        }
        StyledString::new(self.text.clone(), style)
    }
}

/// Converts a sequence of runs into styled strings sharing the same base style.
pub fn runs_to_styled_strings<'a, I>(runs: I, base: Style) -> Vec<StyledString>
where
    I: IntoIterator<Item = &'a StyledRun>,
{
    runs.into_iter()
        .map(|run| run.to_styled_string(base))
        .collect()
}

/// Concatenates the text of all runs.
pub fn plain_text(runs: &[StyledRun]) -> String {
    runs.iter().map(|run| run.text.as_str()).collect()
}

/// Parses `fragment` using the default `**` marker.
pub fn parse_bold(fragment: &str) -> Vec<StyledRun> {
    parse_runs(fragment, DEFAULT_BOLD_MARKER)
}

/// Splits `fragment` into runs on the paired `marker`.
///
/// Matches are found left to right and never nest: after a closing marker, scanning resumes right
/// behind it.  A bold span needs at least one character between its markers, so `****` stays
/// literal.  An empty marker disables parsing and yields the whole fragment as a single run.
pub fn parse_runs(fragment: &str, marker: &str) -> Vec<StyledRun> {
    let mut runs = Vec::new();
    if fragment.is_empty() {
        return runs;
    }
    if marker.is_empty() {
        runs.push(StyledRun::plain(fragment));
        return runs;
    }

    let mut buffer = String::new();
    let mut index = 0;

    while index < fragment.len() {
        let Some(open) = fragment[index..].find(marker).map(|pos| index + pos) else {
            break;
        };
        let inner_start = open + marker.len();
        let Some(first_char) = fragment[inner_start..].chars().next() else {
            break;
        };
        let search_from = inner_start + first_char.len_utf8();
        let Some(close) = fragment[search_from..]
            .find(marker)
            .map(|pos| search_from + pos)
        else {
            break;
        };

        buffer.push_str(&fragment[index..open]);
        flush(&mut buffer, &mut runs);
        runs.push(StyledRun::bold(&fragment[inner_start..close]));
        index = close + marker.len();
    }

    buffer.push_str(&fragment[index..]);
    flush(&mut buffer, &mut runs);
    runs
}

fn flush(buffer: &mut String, runs: &mut Vec<StyledRun>) {
    if buffer.is_empty() {
        return;
    }
    runs.push(StyledRun::plain(std::mem::take(buffer)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn bold_span_is_extracted() {
        let runs = parse_bold("Improved **latency** by 40%");
        assert_eq!(
            runs,
            vec![
                StyledRun::plain("Improved "),
                StyledRun::bold("latency"),
                StyledRun::plain(" by 40%"),
            ]
        );
    }

    #[test]
    fn unterminated_marker_is_literal() {
        let runs = parse_bold("Use **C++ for systems");
        assert_eq!(runs, vec![StyledRun::plain("Use **C++ for systems")]);
    }

    #[test]
    fn empty_fragment_has_no_runs() {
        assert!(parse_bold("").is_empty());
    }

    #[test]
    fn whole_fragment_bold() {
        assert_eq!(parse_bold("**Rust**"), vec![StyledRun::bold("Rust")]);
    }

    #[test]
    fn trailing_unmatched_marker_merges_with_plain_text() {
        let runs = parse_bold("**a**b**");
        assert_eq!(runs, vec![StyledRun::bold("a"), StyledRun::plain("b**")]);
    }

    #[test]
    fn empty_span_stays_literal() {
        assert_eq!(parse_bold("x****y"), vec![StyledRun::plain("x****y")]);
    }

    #[test]
    fn custom_marker() {
        let runs = parse_runs("ship __fast__ now", "__");
        assert_eq!(
            runs,
            vec![
                StyledRun::plain("ship "),
                StyledRun::bold("fast"),
                StyledRun::plain(" now"),
            ]
        );
    }

    #[test]
    fn multibyte_text_around_markers() {
        let runs = parse_bold("Café **naïve** – ok");
        assert_eq!(runs[1], StyledRun::bold("naïve"));
        assert_eq!(plain_text(&runs), "Café naïve – ok");
    }

    #[test]
    fn styled_string_reflects_weight() {
        let base = Style::new().with_font_size(11);
        let styled = StyledRun::bold("Lead").to_styled_string(base);
        assert_eq!(styled.s, "Lead");
        assert!(styled.style.is_bold());
        assert_eq!(styled.style.font_size(), 11);

        let plain = StyledRun::plain("follow").to_styled_string(base);
        assert!(!plain.style.is_bold());
    }

    fn segment() -> impl Strategy<Value = (String, bool)> {
        ("[a-zA-Z0-9 ,.%()+-]{1,12}", any::<bool>())
    }

    proptest! {
        #[test]
        fn prop_runs_reassemble_fragment(segments in prop::collection::vec(segment(), 0..8)) {
            let mut fragment = String::new();
            let mut expected = String::new();
            for (text, bold) in &segments {
                if *bold {
                    fragment.push_str("**");
                    fragment.push_str(text);
                    fragment.push_str("**");
                } else {
                    fragment.push_str(text);
                }
                expected.push_str(text);
            }
            let runs = parse_bold(&fragment);
            prop_assert_eq!(plain_text(&runs), expected);
            prop_assert!(runs.iter().all(|run| !run.text.is_empty()));
        }

        #[test]
        fn prop_marker_free_text_is_one_plain_run(text in "[^*]{1,40}") {
            let runs = parse_bold(&text);
            prop_assert_eq!(runs, vec![StyledRun::plain(text.clone())]);
        }
    }
}
