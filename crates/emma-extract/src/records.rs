//! Conversion of extraction results into record sets

use crate::extractor::BlockMatches;
use emma_ir::{RecordSet, Value};
use indexmap::IndexMap;
use tracing::debug;

/// One row per block that matched at least one field.
///
/// Each field takes its first match. Columns appear in the order fields
/// were first seen; a field missing from a block is null in that row.
pub fn records_from_matches(blocks: &[BlockMatches]) -> RecordSet {
    let records = blocks.iter().filter(|b| !b.is_empty()).map(|block| {
        block
            .iter()
            .filter_map(|(field, matches)| {
                let first = matches.first()?;
                Some((field.clone(), Value::String(first.value.clone())))
            })
            .collect::<IndexMap<_, _>>()
    });

    let set = RecordSet::from_records(records);
    debug!(blocks = blocks.len(), rows = set.len(), columns = set.columns().len(), "Built records");
    set
}
