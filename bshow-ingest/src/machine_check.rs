//! Marks which orders-plan machines already exist in the document store
//!
//! Names are compared on their normalized key, so "Mayer 34A" in the sheet
//! matches a stored "mayer34a".

use crate::order_plan::MachineBlock;
use bshow_common::names::normalize;
use bshow_common::store::list_records;
use bshow_common::{Collection, DocumentStore, MachineRecord, Result};
use std::collections::HashSet;
use tracing::{debug, info};

/// Set each block's `exists` flag against the given stored machine names
pub fn annotate_existence<I, S>(blocks: Vec<MachineBlock>, stored_names: I) -> Vec<MachineBlock>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let known: HashSet<String> = stored_names
        .into_iter()
        .map(|name| normalize(name.as_ref()))
        .collect();

    blocks
        .into_iter()
        .map(|block| {
            let exists = known.contains(&normalize(&block.machine_name));
            debug!(machine = %block.machine_name, exists, "Machine existence resolved");
            MachineBlock { exists, ..block }
        })
        .collect()
}

/// Load all stored machines and annotate the blocks against their names
pub async fn check_machines<S>(store: &S, blocks: Vec<MachineBlock>) -> Result<Vec<MachineBlock>>
where
    S: DocumentStore + ?Sized,
{
    let machines = list_records::<S, MachineRecord>(store, Collection::Machines).await?;
    let annotated = annotate_existence(blocks, machines.iter().map(|m| m.record.name.as_str()));

    let found = annotated.iter().filter(|b| b.exists).count();
    info!(
        checked = annotated.len(),
        found,
        stored = machines.len(),
        "Checked orders-plan machines against stored machines"
    );
    Ok(annotated)
}
