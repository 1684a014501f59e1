//! Segmenter - splits raw T-SQL into code, string and comment segments
//!
//! This is the critical component that protects string literals and comments
//! from the rewrite passes. The scanner walks the input once, left to right,
//! with explicit states for code, single-quoted strings (`''` is an escaped
//! quote, not a terminator), `--` line comments and `/* */` block comments.
//! Concatenating the segment texts in order reconstructs the input exactly.
//!
//! The pipeline never rewrites protected segments directly. Instead they are
//! masked behind opaque placeholder atoms (private-use sentinel characters
//! around a numeric index) while the passes run, and restored verbatim
//! afterwards in their original relative order.

use std::sync::LazyLock;

use regex::Regex;

/// Opening sentinel for a masked protected segment.
pub const MASK_OPEN: char = '\u{E000}';
/// Closing sentinel for a masked protected segment.
pub const MASK_CLOSE: char = '\u{E001}';

static MASK_ATOM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("\u{E000}([0-9]+)\u{E001}").unwrap());

/// Kind of a source segment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    Code,
    StringLiteral,
    LineComment,
    BlockComment,
}

impl SegmentKind {
    /// Protected segments are never rewritten by any pass.
    #[must_use]
    pub fn is_protected(self) -> bool {
        self != SegmentKind::Code
    }
}

/// A maximal span of input with a single classification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub kind: SegmentKind,
    pub text: String,
}

impl Segment {
    fn new(kind: SegmentKind, text: &str) -> Self {
        Self {
            kind,
            text: text.to_string(),
        }
    }
}

/// Split input into an ordered sequence of segments.
///
/// The segmentation is lossless and total: concatenating the `text` of every
/// segment, in order, reconstructs the input exactly. Unterminated strings
/// and block comments consume the remainder of the input rather than failing.
/// A `--` comment runs to end of line; the newline itself belongs to the
/// following code run.
#[must_use]
pub fn segment(input: &str) -> Vec<Segment> {
    let bytes = input.as_bytes();
    let len = bytes.len();
    let mut segments = Vec::new();
    let mut i = 0;

    while i < len {
        match bytes[i] {
            b'\'' => {
                let end = scan_string(bytes, i);
                segments.push(Segment::new(SegmentKind::StringLiteral, &input[i..end]));
                i = end;
            }
            b'-' if i + 1 < len && bytes[i + 1] == b'-' => {
                let end = scan_to_eol(bytes, i + 2);
                segments.push(Segment::new(SegmentKind::LineComment, &input[i..end]));
                i = end;
            }
            b'/' if i + 1 < len && bytes[i + 1] == b'*' => {
                let end = scan_block_comment(bytes, i + 2);
                segments.push(Segment::new(SegmentKind::BlockComment, &input[i..end]));
                i = end;
            }
            _ => {
                let end = scan_code(bytes, i);
                segments.push(Segment::new(SegmentKind::Code, &input[i..end]));
                i = end;
            }
        }
    }

    segments
}

/// Consume a string literal starting at the opening quote.
///
/// A doubled quote (`''`) is an escaped quote inside the literal. Without a
/// closing quote the remainder of the input is one literal.
fn scan_string(bytes: &[u8], start: usize) -> usize {
    let len = bytes.len();
    let mut j = start + 1;
    while j < len {
        if bytes[j] == b'\'' {
            if j + 1 < len && bytes[j + 1] == b'\'' {
                j += 2;
                continue;
            }
            return j + 1;
        }
        j += 1;
    }
    len
}

fn scan_to_eol(bytes: &[u8], from: usize) -> usize {
    let mut j = from;
    while j < bytes.len() && bytes[j] != b'\n' {
        j += 1;
    }
    j
}

fn scan_block_comment(bytes: &[u8], from: usize) -> usize {
    let len = bytes.len();
    let mut j = from;
    while j + 1 < len {
        if bytes[j] == b'*' && bytes[j + 1] == b'/' {
            return j + 2;
        }
        j += 1;
    }
    len
}

fn scan_code(bytes: &[u8], start: usize) -> usize {
    let len = bytes.len();
    let mut j = start;
    while j < len {
        match bytes[j] {
            b'\'' => break,
            b'-' if j + 1 < len && bytes[j + 1] == b'-' => break,
            b'/' if j + 1 < len && bytes[j + 1] == b'*' => break,
            _ => j += 1,
        }
    }
    j
}

/// Replace protected segments with placeholder atoms.
///
/// Returns the masked text (code verbatim, protected segments as
/// `MASK_OPEN index MASK_CLOSE` atoms) together with the store of protected
/// segments, indexed by atom number.
#[must_use]
pub fn mask_segments(segments: &[Segment]) -> (String, Vec<Segment>) {
    let mut masked = String::new();
    let mut store = Vec::new();
    for seg in segments {
        if seg.kind.is_protected() {
            masked.push(MASK_OPEN);
            masked.push_str(&store.len().to_string());
            masked.push(MASK_CLOSE);
            store.push(seg.clone());
        } else {
            masked.push_str(&seg.text);
        }
    }
    (masked, store)
}

/// Restore placeholder atoms to their original protected text.
///
/// Atoms appear in their original relative order, so restoration is what
/// guarantees literal and comment content is never mutated. An atom with an
/// out-of-range index is left as-is (this cannot happen unless a pass
/// manufactured one).
#[must_use]
pub fn restore_segments(masked: &str, store: &[Segment]) -> String {
    MASK_ATOM_RE
        .replace_all(masked, |caps: &regex::Captures| {
            caps[1]
                .parse::<usize>()
                .ok()
                .and_then(|idx| store.get(idx))
                .map_or_else(|| caps[0].to_string(), |seg| seg.text.clone())
        })
        .into_owned()
}

/// Look up the protected segment behind an atom match, if any.
pub(crate) fn atom_kind(index_text: &str, store: &[Segment]) -> Option<SegmentKind> {
    index_text
        .parse::<usize>()
        .ok()
        .and_then(|idx| store.get(idx))
        .map(|seg| seg.kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn concat(segments: &[Segment]) -> String {
        segments.iter().map(|s| s.text.as_str()).collect()
    }

    #[test]
    fn test_plain_code() {
        let input = "SELECT 1";
        let segs = segment(input);
        assert_eq!(segs.len(), 1);
        assert_eq!(segs[0].kind, SegmentKind::Code);
        assert_eq!(concat(&segs), input);
    }

    #[test]
    fn test_string_literal() {
        let input = "SELECT 'a' FROM t";
        let segs = segment(input);
        assert_eq!(segs.len(), 3);
        assert_eq!(segs[1].kind, SegmentKind::StringLiteral);
        assert_eq!(segs[1].text, "'a'");
        assert_eq!(concat(&segs), input);
    }

    #[test]
    fn test_escaped_quote_inside_literal() {
        let input = "x = 'it''s fine' + y";
        let segs = segment(input);
        assert_eq!(segs[1].kind, SegmentKind::StringLiteral);
        assert_eq!(segs[1].text, "'it''s fine'");
        assert_eq!(concat(&segs), input);
    }

    #[test]
    fn test_unterminated_literal_consumes_rest() {
        let input = "SELECT 'oops";
        let segs = segment(input);
        assert_eq!(segs.len(), 2);
        assert_eq!(segs[1].kind, SegmentKind::StringLiteral);
        assert_eq!(segs[1].text, "'oops");
        assert_eq!(concat(&segs), input);
    }

    #[test]
    fn test_line_comment_excludes_newline() {
        let input = "a -- comment\nb";
        let segs = segment(input);
        assert_eq!(segs[1].kind, SegmentKind::LineComment);
        assert_eq!(segs[1].text, "-- comment");
        assert_eq!(segs[2].text, "\nb");
        assert_eq!(concat(&segs), input);
    }

    #[test]
    fn test_line_comment_at_eof() {
        let input = "a -- trailing";
        let segs = segment(input);
        assert_eq!(segs.last().unwrap().kind, SegmentKind::LineComment);
        assert_eq!(concat(&segs), input);
    }

    #[test]
    fn test_block_comment() {
        let input = "/* one\ntwo */ SELECT 1";
        let segs = segment(input);
        assert_eq!(segs[0].kind, SegmentKind::BlockComment);
        assert_eq!(segs[0].text, "/* one\ntwo */");
        assert_eq!(concat(&segs), input);
    }

    #[test]
    fn test_unterminated_block_comment() {
        let input = "a /* never closed";
        let segs = segment(input);
        assert_eq!(segs[1].kind, SegmentKind::BlockComment);
        assert_eq!(segs[1].text, "/* never closed");
        assert_eq!(concat(&segs), input);
    }

    #[test]
    fn test_comment_markers_inside_literal() {
        let input = "x = '-- not a comment /* nor this */'";
        let segs = segment(input);
        assert_eq!(segs.len(), 2);
        assert_eq!(segs[1].kind, SegmentKind::StringLiteral);
        assert_eq!(concat(&segs), input);
    }

    #[test]
    fn test_no_empty_segments() {
        let input = "'a'--b";
        let segs = segment(input);
        assert!(segs.iter().all(|s| !s.text.is_empty()));
        assert_eq!(segs.len(), 2);
    }

    #[test]
    fn test_mask_and_restore_roundtrip() {
        let input = "SELECT 'x' -- c\nFROM /* b */ t";
        let segs = segment(input);
        let (masked, store) = mask_segments(&segs);
        assert!(!masked.contains('\''));
        assert!(!masked.contains("--"));
        assert_eq!(restore_segments(&masked, &store), input);
    }

    #[test]
    fn test_masked_atoms_are_ordered() {
        let input = "'a' 'b' 'c'";
        let segs = segment(input);
        let (masked, store) = mask_segments(&segs);
        assert_eq!(store.len(), 3);
        assert_eq!(
            masked,
            format!("{MASK_OPEN}0{MASK_CLOSE} {MASK_OPEN}1{MASK_CLOSE} {MASK_OPEN}2{MASK_CLOSE}")
        );
    }

    #[test]
    fn test_lossless_over_tricky_input() {
        let inputs = [
            "",
            "''",
            "''''",
            "-- only a comment",
            "/**/",
            "a/*b*/c--d\ne'f'",
            "name = 'O''Brien' -- quote",
        ];
        for input in inputs {
            assert_eq!(concat(&segment(input)), input, "lossless for {input:?}");
        }
    }
}
