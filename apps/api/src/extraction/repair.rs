//! Truncation repair for model output cut off mid-structure.
//!
//! Two strategies are available:
//!
//! - `Legacy` counts braces and brackets over the whole text, drops an
//!   incomplete trailing property when the last `",` sits in the final 20% of
//!   the text, then appends every missing `]` followed by every missing `}`.
//!   It cannot see the real nesting order, so interleaved containers come out
//!   wrong.
//! - `Depth` scans the text with string and escape tracking, cuts back to the
//!   last point where a member or element was complete, and closes the
//!   containers open at that point innermost first.
//!
//! Both only ever remove a trailing fragment and append closers. Neither
//! invents values.

use std::str::FromStr;

use serde::Deserialize;

use super::strip_fences;

/// Legacy cut-back only happens when the boundary is past this share of the text.
const LEGACY_TAIL_FRACTION: f64 = 0.8;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepairStrategy {
    Legacy,
    #[default]
    Depth,
}

impl FromStr for RepairStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "legacy" => Ok(RepairStrategy::Legacy),
            "depth" | "depth-tracking" => Ok(RepairStrategy::Depth),
            other => Err(format!(
                "unknown repair strategy '{other}' (expected 'legacy' or 'depth')"
            )),
        }
    }
}

/// Raw occurrence counts of the four structural characters, strings included.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct StructuralCounts {
    open_braces: usize,
    close_braces: usize,
    open_brackets: usize,
    close_brackets: usize,
}

impl StructuralCounts {
    fn of(text: &str) -> Self {
        let mut counts = StructuralCounts::default();
        for byte in text.bytes() {
            match byte {
                b'{' => counts.open_braces += 1,
                b'}' => counts.close_braces += 1,
                b'[' => counts.open_brackets += 1,
                b']' => counts.close_brackets += 1,
                _ => {}
            }
        }
        counts
    }

    fn looks_truncated(&self) -> bool {
        self.open_braces > self.close_braces || self.open_brackets > self.close_brackets
    }

    fn brace_surplus(&self) -> usize {
        self.open_braces.saturating_sub(self.close_braces)
    }

    fn bracket_surplus(&self) -> usize {
        self.open_brackets.saturating_sub(self.close_brackets)
    }
}

/// Produces a repaired candidate for `raw`, or `None` when no repair applies.
///
/// Starts again from the raw text (fences are stripped here, independently of
/// the strict parse). Returns `None` when no opening character outnumbers its
/// closer, so malformed-but-balanced text keeps its original parse error.
pub fn repair_truncated(raw: &str, strategy: RepairStrategy) -> Option<String> {
    let text = strip_fences(raw);
    let counts = StructuralCounts::of(text);

    if !counts.looks_truncated() {
        return None;
    }

    match strategy {
        RepairStrategy::Legacy => Some(repair_legacy(text, counts)),
        RepairStrategy::Depth => repair_depth(text),
    }
}

fn repair_legacy(text: &str, counts: StructuralCounts) -> String {
    let mut kept = text;

    if let Some(quote_comma) = text.rfind("\",") {
        if quote_comma as f64 > text.len() as f64 * LEGACY_TAIL_FRACTION {
            // Keep the closing quote, drop the comma.
            kept = &text[..quote_comma + 1];
        }
    }

    let mut repaired =
        String::with_capacity(kept.len() + counts.bracket_surplus() + counts.brace_surplus());
    repaired.push_str(kept);
    repaired.extend(std::iter::repeat(']').take(counts.bracket_surplus()));
    repaired.extend(std::iter::repeat('}').take(counts.brace_surplus()));
    repaired
}

/// A position the text can be cut back to, and how many containers are open there.
#[derive(Debug, Clone, Copy)]
struct Boundary {
    cut: usize,
    depth: usize,
}

fn repair_depth(text: &str) -> Option<String> {
    let mut stack: Vec<u8> = Vec::new();
    let mut in_string = false;
    let mut escaped = false;
    let mut boundary: Option<Boundary> = None;

    // Structural characters are ASCII, so byte offsets are always char boundaries.
    for (idx, byte) in text.bytes().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if byte == b'\\' {
                escaped = true;
            } else if byte == b'"' {
                in_string = false;
            }
            continue;
        }

        match byte {
            b'"' => in_string = true,
            b'{' | b'[' => {
                stack.push(byte);
                // The top-level container can always be closed empty.
                if stack.len() == 1 {
                    boundary = Some(Boundary {
                        cut: idx + 1,
                        depth: 1,
                    });
                }
            }
            b'}' | b']' => {
                let opener = if byte == b'}' { b'{' } else { b'[' };
                if stack.pop() != Some(opener) {
                    return None;
                }
                if stack.is_empty() {
                    // The top-level value closed, so the failure was not truncation.
                    return None;
                }
                boundary = Some(Boundary {
                    cut: idx + 1,
                    depth: stack.len(),
                });
            }
            b',' => {
                if stack.is_empty() {
                    return None;
                }
                boundary = Some(Boundary {
                    cut: idx,
                    depth: stack.len(),
                });
            }
            _ => {}
        }
    }

    if stack.is_empty() {
        return None;
    }

    // Nothing at or below the boundary depth was popped after the boundary was
    // recorded (every pop records a new one), so the open prefix is unchanged.
    let Boundary { cut, depth } = boundary?;
    let mut repaired = text[..cut].trim_end().to_string();
    for opener in stack[..depth].iter().rev() {
        repaired.push(if *opener == b'{' { '}' } else { ']' });
    }
    Some(repaired)
}
