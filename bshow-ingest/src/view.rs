//! Bulk-import screen state
//!
//! The screen holds two independent panels (fabric/machine consolidation and
//! the orders plan) plus a "check machines" action. State changes only
//! through [`BulkImportView::reduce`].

use crate::fabric_machines::MachineAssignments;
use crate::order_plan::MachineBlock;

/// Everything the bulk-import screen renders
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BulkImportView {
    /// Consolidated fabric/machine sheet, once one has been parsed
    pub assignments: Option<MachineAssignments>,
    /// Parsed orders plan
    pub order_plan: Vec<MachineBlock>,
    /// Whether the orders-plan panel is shown
    pub show_order_plan: bool,
    /// A machine check is in flight
    pub checking: bool,
    /// Last error or notice
    pub status: Option<String>,
}

/// Inputs to the bulk-import screen
#[derive(Debug, Clone, PartialEq)]
pub enum BulkImportEvent {
    AssignmentsParsed(MachineAssignments),
    OrderPlanParsed(Vec<MachineBlock>),
    /// Parsing either sheet failed; carries the status line
    ParseFailed(String),
    CheckStarted,
    CheckCompleted(Vec<MachineBlock>),
    CheckFailed(String),
}

impl BulkImportView {
    pub fn reduce(self, event: BulkImportEvent) -> Self {
        match event {
            BulkImportEvent::AssignmentsParsed(assignments) => Self {
                assignments: Some(assignments),
                status: None,
                ..self
            },
            BulkImportEvent::OrderPlanParsed(blocks) => Self {
                order_plan: blocks,
                show_order_plan: true,
                status: None,
                ..self
            },
            BulkImportEvent::ParseFailed(message) => Self {
                status: Some(message),
                ..self
            },
            BulkImportEvent::CheckStarted => Self {
                checking: true,
                ..self
            },
            BulkImportEvent::CheckCompleted(blocks) => Self {
                order_plan: blocks,
                checking: false,
                ..self
            },
            BulkImportEvent::CheckFailed(message) => Self {
                checking: false,
                status: Some(message),
                ..self
            },
        }
    }

    /// Label for the check button
    pub fn check_label(&self) -> &'static str {
        if self.checking {
            "Checking Machines..."
        } else {
            "Check Machines"
        }
    }

    /// Whether the check button accepts clicks
    pub fn can_check(&self) -> bool {
        !self.checking
    }
}

/// Existence label shown beside each machine block
pub fn existence_label(block: &MachineBlock) -> &'static str {
    if block.exists {
        "Exists"
    } else {
        "Does not exist"
    }
}
