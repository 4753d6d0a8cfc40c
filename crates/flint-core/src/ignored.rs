//! Stripping of `// %flint: pause` ... `// %flint: resume` regions.

const PAUSE: &str = "// %flint: pause";
const RESUME: &str = "// %flint: resume";

/// Source text with ignored regions blanked out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stripped {
    /// The text to lint. Line numbers match the original.
    pub text: String,
    /// Line of a pause marker with no matching resume.
    pub unmatched_pause_line: Option<usize>,
}

/// Replaces each paused region, markers included, with as many newlines as
/// it spanned. A pause with no resume leaves the rest of the file intact.
#[must_use]
pub fn strip_ignored_regions(source: &str) -> Stripped {
    let mut text = String::with_capacity(source.len());
    let mut pos = 0;

    while let Some(found) = source[pos..].find(PAUSE) {
        let pause = pos + found;
        let Some(found) = source[pause + PAUSE.len()..].find(RESUME) else {
            text.push_str(&source[pos..]);
            return Stripped {
                text,
                unmatched_pause_line: Some(source[..pause].matches('\n').count() + 1),
            };
        };
        let end = pause + PAUSE.len() + found + RESUME.len();
        text.push_str(&source[pos..pause]);
        let newlines = source[pause..end].matches('\n').count();
        text.extend(std::iter::repeat('\n').take(newlines));
        pos = end;
    }

    text.push_str(&source[pos..]);
    Stripped {
        text,
        unmatched_pause_line: None,
    }
}
