//! The order draft state machine.
//!
//! `DraftEngine` is synchronous and deterministic: gateway calls happen in
//! [`DraftService`](super::DraftService), which feeds their results back in
//! through the `finish_*` transitions.

use crate::domain::{sort_by_name, Client, Decrease, OrderDraft, OrderSubmission, Product};
use crate::gateway::GatewayError;
use super::{DraftError, DraftPhase, DraftSnapshot};

pub struct DraftEngine {
    client: Client,
    draft: OrderDraft,
    candidates: Vec<Product>,
    picker_open: bool,
    loading_catalog: bool,
    submitting: bool,
    submitted: bool,
    discarded: bool,
    error: Option<String>,
}

impl DraftEngine {
    /// Starts an empty draft for `client`.
    pub fn new(client: Client) -> Self {
        Self {
            client,
            draft: OrderDraft::new(),
            candidates: Vec::new(),
            picker_open: false,
            loading_catalog: false,
            submitting: false,
            submitted: false,
            discarded: false,
            error: None,
        }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn draft(&self) -> &OrderDraft {
        &self.draft
    }

    pub fn candidates(&self) -> &[Product] {
        &self.candidates
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn phase(&self) -> DraftPhase {
        if self.discarded {
            DraftPhase::Discarded
        } else if self.submitted {
            DraftPhase::Submitted
        } else if self.submitting {
            DraftPhase::Submitting
        } else if self.draft.is_confirming() {
            DraftPhase::Confirming
        } else {
            DraftPhase::Editing
        }
    }

    pub fn snapshot(&self) -> DraftSnapshot {
        DraftSnapshot {
            client: self.client.clone(),
            lines: self.draft.lines().to_vec(),
            total: self.draft.total(),
            candidates: self.candidates.clone(),
            phase: self.phase(),
            picker_open: self.picker_open,
            loading_catalog: self.loading_catalog,
            error: self.error.clone(),
        }
    }

    fn ensure_editable(&self, action: &'static str) -> Result<(), DraftError> {
        match self.phase() {
            DraftPhase::Editing => Ok(()),
            phase if phase.is_terminal() => Err(DraftError::SessionClosed),
            phase => Err(DraftError::InvalidPhase { action, phase }),
        }
    }

    // --- Catalog ---

    /// Marks a catalog load as in flight.
    pub fn begin_catalog_load(&mut self) -> Result<(), DraftError> {
        self.ensure_editable("load the catalog")?;
        self.loading_catalog = true;
        Ok(())
    }

    /// Applies the catalog gateway's answer and opens the picker.
    ///
    /// Products already in the draft are filtered out and the rest sorted by
    /// name. On failure the candidate list is emptied and the message kept as
    /// the session error; the draft itself is never touched.
    pub fn finish_catalog_load(
        &mut self,
        result: Result<Vec<Product>, GatewayError>,
    ) -> Result<Vec<Product>, DraftError> {
        self.loading_catalog = false;
        match result {
            Ok(mut products) => {
                products.retain(|product| !self.draft.contains(&product.id));
                sort_by_name(&mut products);
                self.candidates = products.clone();
                self.picker_open = true;
                self.error = None;
                Ok(products)
            }
            Err(e) => {
                self.candidates.clear();
                self.picker_open = false;
                self.error = Some(e.message.clone());
                Err(DraftError::CatalogLoad(e.message))
            }
        }
    }

    pub fn candidate(&self, product_id: &str) -> Option<&Product> {
        self.candidates.iter().find(|product| product.id == product_id)
    }

    pub fn close_picker(&mut self) {
        self.picker_open = false;
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    // --- Editing ---

    /// Fails when `product_id` could not be selected right now.
    pub fn check_selectable(&self, product_id: &str) -> Result<(), DraftError> {
        self.ensure_editable("select a product")?;
        if self.draft.contains(product_id) {
            return Err(DraftError::DuplicateProduct(product_id.to_string()));
        }
        Ok(())
    }

    /// Adds `product` as a new line with quantity 1.
    ///
    /// Products with no stock, or with a price that is negative or not a
    /// number, are refused with `ProductUnavailable`; the draft and the
    /// candidates stay as they were.
    pub fn select_product(&mut self, product: Product) -> Result<(), DraftError> {
        self.check_selectable(&product.id)?;
        if product.stock == 0 {
            return Err(DraftError::ProductUnavailable(format!("{} is out of stock", product.name)));
        }
        if !product.price.is_finite() || product.price < 0.0 {
            return Err(DraftError::ProductUnavailable(format!(
                "{} has an invalid price: {}",
                product.name, product.price
            )));
        }
        let id = product.id.clone();
        self.draft
            .add(product)
            .map_err(|product| DraftError::DuplicateProduct(product.id))?;
        self.candidates.retain(|candidate| candidate.id != id);
        self.picker_open = false;
        Ok(())
    }

    /// Adds one unit. Returns `false` when the line is already at the
    /// product's stock, which is not an error.
    pub fn increase_quantity(&mut self, product_id: &str) -> Result<bool, DraftError> {
        self.ensure_editable("change quantities")?;
        if !self.draft.contains(product_id) {
            return Err(DraftError::LineNotFound(product_id.to_string()));
        }
        Ok(self.draft.increase(product_id))
    }

    /// Removes one unit; a line at quantity 1 leaves the draft and its
    /// product goes back to the candidates.
    pub fn decrease_quantity(&mut self, product_id: &str) -> Result<(), DraftError> {
        self.ensure_editable("change quantities")?;
        match self.draft.decrease(product_id) {
            None => Err(DraftError::LineNotFound(product_id.to_string())),
            Some(Decrease::Decremented(_)) => Ok(()),
            Some(Decrease::Removed(product)) => {
                if self.candidate(&product.id).is_none() {
                    self.candidates.push(product);
                    sort_by_name(&mut self.candidates);
                }
                Ok(())
            }
        }
    }

    // --- Confirmation ---

    /// Moves to the read-only review. An empty draft is allowed here.
    pub fn enter_confirmation(&mut self) -> Result<(), DraftError> {
        self.ensure_editable("enter confirmation")?;
        self.draft.set_confirming(true);
        self.picker_open = false;
        Ok(())
    }

    pub fn exit_confirmation(&mut self) -> Result<(), DraftError> {
        match self.phase() {
            DraftPhase::Editing | DraftPhase::Confirming => {
                self.draft.set_confirming(false);
                Ok(())
            }
            DraftPhase::Submitting => Err(DraftError::InvalidPhase {
                action: "leave confirmation",
                phase: DraftPhase::Submitting,
            }),
            DraftPhase::Submitted | DraftPhase::Discarded => Err(DraftError::SessionClosed),
        }
    }

    // --- Submission ---

    /// Enters `Submitting` and returns the payload to send.
    pub fn begin_submission(&mut self) -> Result<OrderSubmission, DraftError> {
        match self.phase() {
            DraftPhase::Confirming => {
                self.submitting = true;
                self.error = None;
                Ok(self.draft.to_submission(self.client.id.clone()))
            }
            DraftPhase::Submitting => Err(DraftError::SubmissionInProgress),
            DraftPhase::Editing => Err(DraftError::InvalidPhase {
                action: "submit",
                phase: DraftPhase::Editing,
            }),
            DraftPhase::Submitted | DraftPhase::Discarded => Err(DraftError::SessionClosed),
        }
    }

    /// Applies the submission gateway's answer.
    ///
    /// Success discards the draft. Failure returns to `Confirming` with the
    /// gateway's message and the lines untouched, ready for another submit.
    pub fn finish_submission(&mut self, result: Result<(), GatewayError>) -> Result<(), DraftError> {
        self.submitting = false;
        match result {
            Ok(()) => {
                self.submitted = true;
                self.draft = OrderDraft::new();
                self.candidates.clear();
                self.error = None;
                Ok(())
            }
            Err(e) => {
                self.error = Some(e.message.clone());
                Err(DraftError::Submission(e.message))
            }
        }
    }

    /// Abandons the flow before submission.
    pub fn discard(&mut self) -> Result<(), DraftError> {
        match self.phase() {
            DraftPhase::Submitting => Err(DraftError::InvalidPhase {
                action: "discard the draft",
                phase: DraftPhase::Submitting,
            }),
            DraftPhase::Submitted | DraftPhase::Discarded => Err(DraftError::SessionClosed),
            DraftPhase::Editing | DraftPhase::Confirming => {
                self.discarded = true;
                self.draft = OrderDraft::new();
                self.candidates.clear();
                self.picker_open = false;
                Ok(())
            }
        }
    }
}
