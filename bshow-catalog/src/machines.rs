//! Machine scheduling
//!
//! A machine lists the fabrics it can knit. Creating a machine also appends
//! its id to each of those fabrics' `Machines` field; that reverse link is
//! written once, at creation, and never re-synchronized.

use crate::error::{CatalogError, CatalogResult};
use bshow_common::events::{EventBus, ShowroomEvent};
use bshow_common::store::{add_record, get_record, list_records};
use bshow_common::time::now;
use bshow_common::{
    Collection, DocumentStore, FabricRecord, FieldUpdate, MachineRecord, MachineType, Stored,
};
use rand::seq::SliceRandom;
use rand::Rng;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const ADD_MACHINE_REQUIRED: &str = "Please enter a machine name and select a type.";

/// Form input for a new machine
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MachineDraft {
    pub name: String,
    pub machine_type: Option<MachineType>,
    pub dia_gauge: String,
    /// Fabric ids the machine can produce
    pub fabrics: Vec<String>,
}

impl MachineDraft {
    pub fn validate(self) -> CatalogResult<MachineRecord> {
        match self.machine_type {
            Some(machine_type) if !self.name.trim().is_empty() => Ok(MachineRecord {
                name: self.name,
                machine_type: Some(machine_type),
                dia_gauge: self.dia_gauge,
                fabrics: self.fabrics,
                orders: Vec::new(),
            }),
            _ => Err(CatalogError::Validation(ADD_MACHINE_REQUIRED.to_string())),
        }
    }
}

/// A created machine and how many fabrics got the reverse link
#[derive(Debug, Clone, PartialEq)]
pub struct AddedMachine {
    pub machine: Stored<MachineRecord>,
    pub backlinked: usize,
}

/// Machines that can produce `fabric_id`, in listing order
pub fn suggest_machines<'a>(
    machines: &'a [Stored<MachineRecord>],
    fabric_id: &str,
) -> Vec<&'a Stored<MachineRecord>> {
    if fabric_id.is_empty() {
        return Vec::new();
    }
    machines
        .iter()
        .filter(|m| m.record.fabrics.iter().any(|f| f == fabric_id))
        .collect()
}

/// Pick one suggestion uniformly at random
pub fn pick_best_machine<'a, T, R>(suggestions: &'a [T], rng: &mut R) -> Option<&'a T>
where
    R: Rng + ?Sized,
{
    suggestions.choose(rng)
}

/// Machine scheduling service
#[derive(Clone)]
pub struct MachineScheduler {
    documents: Arc<dyn DocumentStore>,
    event_bus: EventBus,
}

impl MachineScheduler {
    pub fn new(documents: Arc<dyn DocumentStore>, event_bus: EventBus) -> Self {
        Self {
            documents,
            event_bus,
        }
    }

    pub async fn list_machines(&self) -> CatalogResult<Vec<Stored<MachineRecord>>> {
        let machines = list_records(self.documents.as_ref(), Collection::Machines).await?;
        debug!(count = machines.len(), "Listed machines");
        Ok(machines)
    }

    /// Create a machine, then link it from each listed fabric that exists
    ///
    /// A failed link is logged and skipped; the machine stays created.
    pub async fn add_machine(&self, draft: MachineDraft) -> CatalogResult<AddedMachine> {
        let record = draft.validate()?;
        let id = add_record(self.documents.as_ref(), Collection::Machines, &record).await?;
        info!(machine_id = %id, name = %record.name, "Machine added");

        let mut backlinked = 0;
        for fabric_id in &record.fabrics {
            match self.link_fabric(fabric_id, &id).await {
                Ok(true) => backlinked += 1,
                Ok(false) => {
                    debug!(fabric_id = %fabric_id, "Listed fabric not found, no backlink");
                }
                Err(e) => {
                    warn!(
                        fabric_id = %fabric_id,
                        machine_id = %id,
                        error = %e,
                        "Failed to link machine from fabric"
                    );
                }
            }
        }

        self.event_bus.emit_lossy(ShowroomEvent::MachineAdded {
            machine_id: id.clone(),
            name: record.name.clone(),
            timestamp: now(),
        });

        Ok(AddedMachine {
            machine: Stored::new(id, record),
            backlinked,
        })
    }

    /// Returns false when the fabric does not exist
    async fn link_fabric(&self, fabric_id: &str, machine_id: &str) -> bshow_common::Result<bool> {
        let fabric =
            get_record::<_, FabricRecord>(self.documents.as_ref(), Collection::Fabrics, fabric_id)
                .await?;
        if fabric.is_none() {
            return Ok(false);
        }
        self.documents
            .update(
                Collection::Fabrics,
                fabric_id,
                vec![FieldUpdate::array_union("Machines", [machine_id])],
            )
            .await?;
        Ok(true)
    }
}
