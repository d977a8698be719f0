//! Resume document I/O: reading (comment-tolerant JSON), writing rendered
//! output, and seeding a sample resume for `init`.

use crate::{Error, RenderedOutput, Result, Resume};
use std::path::Path;

/// Sample resume embedded for `vitae init`
const SAMPLE_RESUME: &str = include_str!("../resources/sample.resume.json");

/// Read and parse a resume file.
///
/// Line (`//`) and block (`/* */`) comments are stripped before parsing, so
/// hand-edited resumes with annotations still load. Any I/O or parse failure
/// is [`Error::ResumeLoad`] naming the path and the underlying cause.
pub fn read_resume(path: &Path) -> Result<Resume> {
    let load_err = |message: String| Error::ResumeLoad {
        path: path.to_path_buf(),
        message,
    };

    let raw = std::fs::read_to_string(path).map_err(|e| load_err(e.to_string()))?;
    serde_json::from_str(&strip_comments(&raw)).map_err(|e| load_err(e.to_string()))
}

/// Persist rendered output
pub fn write_output(path: &Path, output: &RenderedOutput) -> std::io::Result<()> {
    match output {
        RenderedOutput::Text(s) => std::fs::write(path, s),
        RenderedOutput::Binary(b) => std::fs::write(path, b),
    }
}

/// Write the embedded sample resume to `path`
pub fn init(path: &Path) -> std::io::Result<()> {
    std::fs::write(path, SAMPLE_RESUME)
}

/// Remove `//` and `/* */` comments outside of string literals
fn strip_comments(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    let mut in_string = false;
    let mut escaped = false;

    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            '/' if chars.peek() == Some(&'/') => {
                for c in chars.by_ref() {
                    if c == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut prev = '\0';
                for c in chars.by_ref() {
                    if prev == '*' && c == '/' {
                        break;
                    }
                    prev = c;
                }
            }
            _ => out.push(c),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn test_reads_plain_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resume.json");
        std::fs::write(&path, r#"{"basics":{"name":"Ada"}}"#).unwrap();

        let resume = read_resume(&path).unwrap();
        assert_eq!(resume["basics"]["name"], json!("Ada"));
    }

    #[test]
    fn test_tolerates_comments() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resume.json");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, "{{").unwrap();
        writeln!(f, "  // personal details").unwrap();
        writeln!(f, "  \"basics\": {{ \"name\": \"Ada\" /* maiden name */ }}").unwrap();
        writeln!(f, "}}").unwrap();

        let resume = read_resume(&path).unwrap();
        assert_eq!(resume["basics"]["name"], json!("Ada"));
    }

    #[test]
    fn test_comment_markers_inside_strings_survive() {
        let input = r#"{"url":"https://ada.dev","note":"a /* b */ c"}"#;
        let resume: Resume = serde_json::from_str(&strip_comments(input)).unwrap();
        assert_eq!(resume["url"], json!("https://ada.dev"));
        assert_eq!(resume["note"], json!("a /* b */ c"));
    }

    #[test]
    fn test_missing_file_is_resume_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.json");
        assert!(matches!(
            read_resume(&path),
            Err(Error::ResumeLoad { .. })
        ));
    }

    #[test]
    fn test_invalid_json_is_resume_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resume.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            read_resume(&path),
            Err(Error::ResumeLoad { .. })
        ));
    }

    #[test]
    fn test_init_writes_a_parseable_sample() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resume.json");
        init(&path).unwrap();

        let resume = read_resume(&path).unwrap();
        assert!(resume["basics"]["name"].is_string());
    }
}
