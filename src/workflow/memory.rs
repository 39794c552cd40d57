//! Append-only memory accumulation

use crate::domain::{MemoryHints, StructuredMemory};

/// Fold evaluation hints into session memory.
///
/// Each list keeps first-appearance order; strings already present are
/// skipped. Lists are deduplicated independently of one another.
pub fn merge(memory: &mut StructuredMemory, hints: Option<&MemoryHints>) {
    let Some(hints) = hints else {
        return;
    };

    append_unique(&mut memory.strengths, &hints.strengths);
    append_unique(&mut memory.weaknesses, &hints.weaknesses);
    append_unique(&mut memory.notes, &hints.notes);
}

fn append_unique(target: &mut Vec<String>, incoming: &[String]) {
    for item in incoming {
        if !target.contains(item) {
            target.push(item.clone());
        }
    }
}
