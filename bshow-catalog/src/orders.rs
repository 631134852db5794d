//! Order submission

use crate::error::{CatalogError, CatalogResult};
use bshow_common::events::{EventBus, ShowroomEvent};
use bshow_common::store::add_record;
use bshow_common::time::now;
use bshow_common::{Collection, DocumentStore, FieldUpdate, OrderRecord};
use std::sync::Arc;
use tracing::{error, info};

pub const SELECT_MACHINE_FIRST: &str = "Please select a machine before submitting the order.";
pub const ORDER_FIELDS_REQUIRED: &str = "Please enter a customer and select a fabric.";
pub const INVALID_AMOUNT: &str = "Please enter the amount as a whole number of kg.";

/// Form input for a new order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderDraft {
    pub customer: String,
    /// Fabric document id
    pub fabric_id: String,
    /// Amount in kg as typed
    pub amount: String,
    /// Machine document id the order is booked on
    pub machine_id: Option<String>,
}

impl OrderDraft {
    /// Check the form and build the order record plus its machine id
    pub fn validate(&self) -> CatalogResult<(OrderRecord, String)> {
        let machine_id = match self.machine_id.as_deref() {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => return Err(CatalogError::Validation(SELECT_MACHINE_FIRST.to_string())),
        };
        if self.customer.trim().is_empty() || self.fabric_id.is_empty() {
            return Err(CatalogError::Validation(ORDER_FIELDS_REQUIRED.to_string()));
        }
        let amount = parse_amount(&self.amount)
            .ok_or_else(|| CatalogError::Validation(INVALID_AMOUNT.to_string()))?;

        Ok((
            OrderRecord {
                customer: self.customer.clone(),
                fabric: self.fabric_id.clone(),
                amount,
            },
            machine_id,
        ))
    }
}

/// Base-10 kg amount, surrounding whitespace ignored
pub fn parse_amount(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok()
}

/// A written order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmittedOrder {
    pub order_id: String,
    pub machine_id: String,
    /// False when the machine was not found and the order was left unlinked
    pub machine_linked: bool,
}

/// Write an order, then append its id to the chosen machine's `Orders`
///
/// The order is not rolled back when the machine is missing.
pub async fn submit_order(
    documents: &dyn DocumentStore,
    event_bus: &EventBus,
    draft: &OrderDraft,
) -> CatalogResult<SubmittedOrder> {
    let (order, machine_id) = draft.validate()?;

    let order_id = add_record(documents, Collection::Orders, &order).await?;
    info!(order_id = %order_id, customer = %order.customer, amount = order.amount, "Order created");

    let machine_linked = documents.get(Collection::Machines, &machine_id).await?.is_some();
    if machine_linked {
        documents
            .update(
                Collection::Machines,
                &machine_id,
                vec![FieldUpdate::array_union("Orders", [order_id.as_str()])],
            )
            .await?;
        info!(order_id = %order_id, machine_id = %machine_id, "Machine orders updated");
    } else {
        error!(order_id = %order_id, machine_id = %machine_id, "No such machine found");
    }

    event_bus.emit_lossy(ShowroomEvent::OrderSubmitted {
        order_id: order_id.clone(),
        machine_id: machine_id.clone(),
        timestamp: now(),
    });

    Ok(SubmittedOrder {
        order_id,
        machine_id,
        machine_linked,
    })
}

/// Order booking service
#[derive(Clone)]
pub struct OrderDesk {
    documents: Arc<dyn DocumentStore>,
    event_bus: EventBus,
}

impl OrderDesk {
    pub fn new(documents: Arc<dyn DocumentStore>, event_bus: EventBus) -> Self {
        Self {
            documents,
            event_bus,
        }
    }

    pub async fn submit(&self, draft: &OrderDraft) -> CatalogResult<SubmittedOrder> {
        submit_order(self.documents.as_ref(), &self.event_bus, draft).await
    }
}
