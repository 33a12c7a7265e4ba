//! Single-pass context scanner.
//!
//! Walks the lines of a post-processor output file once, remembering the most
//! recent parent, operation-number, tool-change and tool-number lines. Every
//! line containing the target text produces a [`HitRecord`] that freezes those
//! four values as they stand at that point.

pub mod tool_number;

pub use tool_number::is_tool_number_line;

/// Search settings for one scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanConfig {
    /// Text that marks a hit.
    pub target_text: String,
    /// Text identifying parent (operation name) lines.
    pub parent_text: String,
    /// When false the parent tracker is never updated.
    pub use_parent: bool,
    /// Text identifying operation-number lines.
    pub op_no_text: String,
    /// Text identifying tool-change lines.
    pub tool_change_text: String,
    /// Applies to every substring test and to tool-number detection.
    pub case_sensitive: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            target_text: "POST-GENERATED".to_string(),
            parent_text: "OPERATION NAME".to_string(),
            use_parent: true,
            op_no_text: "OPERATION NO. =".to_string(),
            tool_change_text: "M06".to_string(),
            case_sensitive: false,
        }
    }
}

/// One occurrence of the target text and the context seen before it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HitRecord {
    /// 1-based order of discovery.
    pub hit_index: usize,
    /// 1-based line number in the scanned file.
    pub line_number: usize,
    pub target_text: String,
    pub target_line: String,
    pub operation_no_line: String,
    pub tool_number_line: String,
    pub tool_change_line: String,
    pub parent_line: String,
}

/// Rolling "last seen" trackers, owned by a single scan.
#[derive(Debug, Default)]
struct ScanState {
    last_parent: Option<String>,
    last_op_no: Option<String>,
    last_tool_change: Option<String>,
    last_tool_number: Option<String>,
}

/// Substring test honoring case sensitivity. An empty needle never matches.
fn contains(haystack: &str, needle: &str, case_sensitive: bool) -> bool {
    if needle.is_empty() {
        return false;
    }

    if case_sensitive {
        haystack.contains(needle)
    } else {
        haystack.to_lowercase().contains(&needle.to_lowercase())
    }
}

/// Scan `lines` in order and collect one [`HitRecord`] per target occurrence.
///
/// Returns the hits together with their count. Tracker updates for a line
/// happen before that line is checked for the target, so a hit line that also
/// names a tool reports itself as the tool-number line.
pub fn scan<I, S>(lines: I, config: &ScanConfig) -> (Vec<HitRecord>, usize)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let cs = config.case_sensitive;
    let mut state = ScanState::default();
    let mut hits: Vec<HitRecord> = Vec::new();

    for (idx, raw) in lines.into_iter().enumerate() {
        let line = raw.as_ref().trim();

        if config.use_parent && contains(line, &config.parent_text, cs) {
            tracing::trace!(line_number = idx + 1, "parent line");
            state.last_parent = Some(line.to_string());
        }

        if contains(line, &config.op_no_text, cs) {
            tracing::trace!(line_number = idx + 1, "operation number line");
            state.last_op_no = Some(line.to_string());
        }

        if contains(line, &config.tool_change_text, cs) {
            tracing::trace!(line_number = idx + 1, "tool change line");
            state.last_tool_change = Some(line.to_string());
        }

        // Must precede the target check below.
        if is_tool_number_line(line, cs) {
            tracing::trace!(line_number = idx + 1, "tool number line");
            state.last_tool_number = Some(line.to_string());
        }

        if contains(line, &config.target_text, cs) {
            let hit = HitRecord {
                hit_index: hits.len() + 1,
                line_number: idx + 1,
                target_text: config.target_text.clone(),
                target_line: line.to_string(),
                operation_no_line: state.last_op_no.clone().unwrap_or_default(),
                tool_number_line: state.last_tool_number.clone().unwrap_or_default(),
                tool_change_line: state.last_tool_change.clone().unwrap_or_default(),
                parent_line: state.last_parent.clone().unwrap_or_default(),
            };
            tracing::debug!(
                hit_index = hit.hit_index,
                line_number = hit.line_number,
                "target hit"
            );
            hits.push(hit);
        }
    }

    let total = hits.len();
    (hits, total)
}
