use std::fmt;
use crate::domain::{Client, OrderLine, Product};

/// Where a draft session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftPhase {
    /// Lines can be added and adjusted.
    Editing,
    /// Read-only review before submission.
    Confirming,
    /// A submission is in flight.
    Submitting,
    /// The order was accepted and the draft discarded.
    Submitted,
    /// The flow was abandoned before submission.
    Discarded,
}

impl DraftPhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, DraftPhase::Submitted | DraftPhase::Discarded)
    }
}

impl fmt::Display for DraftPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DraftPhase::Editing => "editing",
            DraftPhase::Confirming => "confirming",
            DraftPhase::Submitting => "submitting",
            DraftPhase::Submitted => "submitted",
            DraftPhase::Discarded => "discarded",
        };
        f.write_str(name)
    }
}

/// Everything a view needs to render a draft session.
#[derive(Debug, Clone, PartialEq)]
pub struct DraftSnapshot {
    pub client: Client,
    pub lines: Vec<OrderLine>,
    pub total: f64,
    pub candidates: Vec<Product>,
    pub phase: DraftPhase,
    pub picker_open: bool,
    pub loading_catalog: bool,
    pub error: Option<String>,
}

impl DraftSnapshot {
    pub fn is_confirming(&self) -> bool {
        matches!(self.phase, DraftPhase::Confirming | DraftPhase::Submitting)
    }

    /// True once the caller should leave the order flow.
    pub fn is_finished(&self) -> bool {
        self.phase.is_terminal()
    }

    pub fn quantity_of(&self, product_id: &str) -> Option<u32> {
        self.lines
            .iter()
            .find(|line| line.product.id == product_id)
            .map(|line| line.quantity)
    }
}
