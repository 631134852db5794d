//! Screen state for the add-fabric and new-order forms
//!
//! Each screen is a plain value advanced by `reduce` over form edits and
//! completion events. Store calls happen elsewhere; their results come back
//! in as events.

use crate::fabrics::{fabric_added_status, FabricDraft};
use crate::machines::{pick_best_machine, suggest_machines};
use crate::orders::{OrderDraft, SubmittedOrder};
use crate::upload::{percent_of, ImageFile};
use bshow_common::{GallerySegment, MachineRecord, Stored};
use rand::Rng;

pub const STATUS_UPLOADING: &str = "Uploading images...";
pub const STATUS_SAVING: &str = "Saving fabric metadata...";

/// Add-fabric form
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AddFabricView {
    pub name: String,
    pub main_image: Option<ImageFile>,
    pub men: Vec<ImageFile>,
    pub women: Vec<ImageFile>,
    pub kids: Vec<ImageFile>,
    pub submitting: bool,
    pub uploaded: usize,
    pub total: usize,
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AddFabricEvent {
    NameChanged(String),
    MainImagePicked(ImageFile),
    /// Files picked for a gallery; added after the ones already picked
    FilesAppended(GallerySegment, Vec<ImageFile>),
    SubmitStarted,
    UploadProgressed { completed: usize },
    UploadsFinished,
    /// Fabric written under the given id
    Succeeded(String),
    /// Carries the status line to show
    Failed(String),
}

impl AddFabricView {
    pub fn reduce(mut self, event: AddFabricEvent) -> Self {
        match event {
            AddFabricEvent::NameChanged(name) => self.name = name,
            AddFabricEvent::MainImagePicked(file) => self.main_image = Some(file),
            AddFabricEvent::FilesAppended(segment, files) => {
                self.gallery_mut(segment).extend(files);
            }
            AddFabricEvent::SubmitStarted => {
                self.submitting = true;
                self.uploaded = 0;
                self.total = self.draft().file_count();
                self.status = Some(STATUS_UPLOADING.to_string());
            }
            AddFabricEvent::UploadProgressed { completed } => {
                self.uploaded = self.uploaded.max(completed);
            }
            AddFabricEvent::UploadsFinished => {
                self.status = Some(STATUS_SAVING.to_string());
            }
            AddFabricEvent::Succeeded(id) => {
                return Self {
                    status: Some(fabric_added_status(&id)),
                    ..Self::default()
                };
            }
            AddFabricEvent::Failed(message) => {
                self.submitting = false;
                self.status = Some(message);
            }
        }
        self
    }

    /// Whole percent of files uploaded
    pub fn percent(&self) -> u8 {
        percent_of(self.uploaded, self.total)
    }

    pub fn gallery(&self, segment: GallerySegment) -> &[ImageFile] {
        match segment {
            GallerySegment::Men => &self.men,
            GallerySegment::Women => &self.women,
            GallerySegment::Kids => &self.kids,
        }
    }

    fn gallery_mut(&mut self, segment: GallerySegment) -> &mut Vec<ImageFile> {
        match segment {
            GallerySegment::Men => &mut self.men,
            GallerySegment::Women => &mut self.women,
            GallerySegment::Kids => &mut self.kids,
        }
    }

    /// Form contents as a submit draft
    pub fn draft(&self) -> FabricDraft {
        FabricDraft {
            name: self.name.clone(),
            main_image: self.main_image.clone(),
            men: self.men.clone(),
            women: self.women.clone(),
            kids: self.kids.clone(),
        }
    }
}

/// New-order form
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewOrderView {
    pub machines: Vec<Stored<MachineRecord>>,
    pub fabric_id: String,
    /// Ids of machines that can produce the selected fabric
    pub suggestions: Vec<String>,
    pub best_machine: Option<String>,
    pub machine_id: Option<String>,
    pub customer: String,
    pub amount: String,
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NewOrderEvent {
    MachinesLoaded(Vec<Stored<MachineRecord>>),
    /// Fabric picked, with the machine drawn as best pick
    FabricSelected {
        fabric_id: String,
        best_machine: Option<String>,
    },
    MachineSelected(String),
    CustomerChanged(String),
    AmountChanged(String),
    Submitted(SubmittedOrder),
    SubmitFailed(String),
    Reset,
}

impl NewOrderView {
    pub fn reduce(mut self, event: NewOrderEvent) -> Self {
        match event {
            NewOrderEvent::MachinesLoaded(machines) => {
                self.machines = machines;
                self.suggestions = self.suggested_ids(&self.fabric_id);
            }
            NewOrderEvent::FabricSelected {
                fabric_id,
                best_machine,
            } => {
                self.suggestions = self.suggested_ids(&fabric_id);
                self.best_machine = best_machine.filter(|id| self.suggestions.contains(id));
                self.fabric_id = fabric_id;
            }
            NewOrderEvent::MachineSelected(id) => self.machine_id = Some(id),
            NewOrderEvent::CustomerChanged(customer) => self.customer = customer,
            NewOrderEvent::AmountChanged(amount) => self.amount = amount,
            NewOrderEvent::Submitted(_) => {
                return Self {
                    machines: self.machines,
                    ..Self::default()
                };
            }
            NewOrderEvent::SubmitFailed(message) => self.status = Some(message),
            NewOrderEvent::Reset => {
                return Self {
                    machines: self.machines,
                    ..Self::default()
                };
            }
        }
        self
    }

    /// Build the fabric-selected event, drawing the best machine with `rng`
    pub fn select_fabric<R: Rng + ?Sized>(&self, fabric_id: &str, rng: &mut R) -> NewOrderEvent {
        let suggestions = self.suggested_ids(fabric_id);
        NewOrderEvent::FabricSelected {
            fabric_id: fabric_id.to_string(),
            best_machine: pick_best_machine(&suggestions, rng).cloned(),
        }
    }

    fn suggested_ids(&self, fabric_id: &str) -> Vec<String> {
        suggest_machines(&self.machines, fabric_id)
            .into_iter()
            .map(|m| m.id.clone())
            .collect()
    }

    pub fn is_best(&self, machine_id: &str) -> bool {
        self.best_machine.as_deref() == Some(machine_id)
    }

    /// Form contents as a submit draft
    pub fn draft(&self) -> OrderDraft {
        OrderDraft {
            customer: self.customer.clone(),
            fabric_id: self.fabric_id.clone(),
            amount: self.amount.clone(),
            machine_id: self.machine_id.clone(),
        }
    }
}
