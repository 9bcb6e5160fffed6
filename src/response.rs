//! Parsing of the language model's reply into a [`ResumeRecord`].
//!
//! Models are asked for bare JSON but regularly wrap it in a markdown code fence, so the fence is
//! removed before parsing.  Failures are [`RecordError`]s and never reach the renderer.

use crate::error::RecordError;
use crate::model::ResumeRecord;

/// Removes a surrounding ```` ```json ```` or ```` ``` ```` fence, if present.
pub fn strip_code_fences(text: &str) -> &str {
    let text = text.trim();
    let Some(stripped) = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
    else {
        return text;
    };
    stripped
        .trim_start()
        .strip_suffix("```")
        .map(str::trim)
        .unwrap_or(stripped.trim_start())
}

/// Parses a model reply into a record.
pub fn parse_model_response(text: &str) -> Result<ResumeRecord, RecordError> {
    let body = strip_code_fences(text);
    if body.is_empty() {
        return Err(RecordError::EmptyResponse);
    }
    ResumeRecord::from_json_str(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_json_tagged_fence() {
        let input = "```json\n{\"summary\": \"Hi\"}\n```";
        assert_eq!(strip_code_fences(input), "{\"summary\": \"Hi\"}");
    }

    #[test]
    fn strips_bare_fence() {
        let input = "  ```\n{}\n```  ";
        assert_eq!(strip_code_fences(input), "{}");
    }

    #[test]
    fn unterminated_fence_keeps_body() {
        assert_eq!(strip_code_fences("```json\n{\"a\": 1}"), "{\"a\": 1}");
    }

    #[test]
    fn plain_json_is_untouched() {
        assert_eq!(strip_code_fences("{\"a\": 1}\n"), "{\"a\": 1}");
    }

    #[test]
    fn fenced_reply_parses_into_record() {
        let reply = "```json\n{\"header\": {\"name\": \"Jane Doe\"}, \"coursework\": [\"OS\"]}\n```";
        let record = parse_model_response(reply).expect("parses");
        assert_eq!(record.header().map(|h| h.name.as_str()), Some("Jane Doe"));
        assert_eq!(record.coursework, ["OS"]);
    }

    #[test]
    fn empty_reply_is_reported() {
        assert!(matches!(
            parse_model_response("```json\n```"),
            Err(RecordError::EmptyResponse)
        ));
        assert!(matches!(
            parse_model_response("   "),
            Err(RecordError::EmptyResponse)
        ));
    }

    #[test]
    fn prose_reply_is_a_json_error() {
        assert!(matches!(
            parse_model_response("Sure! Here is your resume."),
            Err(RecordError::Json(_))
        ));
    }
}
