//! Setting numbers over ordered lines

use super::lines::LineTokens;

/// Setting of every line: 1 for the first, +1 wherever the onstage set
/// or the speaker differs from the previous line.
pub fn settings(lines: &[LineTokens]) -> Vec<u32> {
    let mut setting = 1;
    lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            if i > 0 {
                let previous = &lines[i - 1];
                if previous.onstage != line.onstage || previous.speaker != line.speaker {
                    setting += 1;
                }
            }
            setting
        })
        .collect()
}
