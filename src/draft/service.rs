use std::ops::ControlFlow;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, info_span, instrument, warn, Instrument};
use crate::domain::{Client, Product};
use crate::gateway::{OrderSubmitter, ProductCatalog};
use super::{DraftClient, DraftEngine, DraftError, DraftRequest, DraftSnapshot, ServiceResponse, SubmissionOutcome};

/// Actor owning one order draft session.
///
/// Requests are handled one at a time, so the engine needs no locking.
/// Catalog loads are awaited inside the loop, which keeps at most one in
/// flight. Submissions run on a spawned task and report back through
/// `completions`, so the session keeps answering (and refusing a second
/// submit) while the gateway call is pending.
pub struct DraftService {
    receiver: mpsc::Receiver<DraftRequest>,
    completions: mpsc::Receiver<SubmissionOutcome>,
    completion_sender: mpsc::Sender<SubmissionOutcome>,
    engine: DraftEngine,
    catalog: Arc<dyn ProductCatalog>,
    submitter: Arc<dyn OrderSubmitter>,
    state: watch::Sender<DraftSnapshot>,
}

impl DraftService {
    pub fn new(
        buffer_size: usize,
        client: Client,
        catalog: Arc<dyn ProductCatalog>,
        submitter: Arc<dyn OrderSubmitter>,
    ) -> (Self, DraftClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let (completion_sender, completions) = mpsc::channel(1);
        let engine = DraftEngine::new(client);
        let (state, state_receiver) = watch::channel(engine.snapshot());
        let service = Self {
            receiver,
            completions,
            completion_sender,
            engine,
            catalog,
            submitter,
            state,
        };
        let client = DraftClient::new(sender, state_receiver);
        (service, client)
    }

    /// Main actor loop. Ends on `Discard` or when every client is dropped.
    #[instrument(name = "draft_service", skip(self))]
    pub async fn run(mut self) {
        info!(client_id = %self.engine.client().id, "DraftService starting");

        loop {
            tokio::select! {
                Some(outcome) = self.completions.recv() => {
                    self.handle_submission_finished(outcome);
                }
                msg = self.receiver.recv() => {
                    let Some(msg) = msg else { break };
                    if self.handle_request(msg).await.is_break() {
                        break;
                    }
                }
            }
        }

        info!(phase = %self.engine.phase(), "DraftService stopped");
    }

    async fn handle_request(&mut self, msg: DraftRequest) -> ControlFlow<()> {
        match msg {
            DraftRequest::LoadCatalog { respond_to } => {
                self.handle_load_catalog(respond_to).await;
            }
            DraftRequest::SelectProduct { product, respond_to } => {
                self.handle_select_product(product, respond_to);
            }
            DraftRequest::SelectProductById { product_id, respond_to } => {
                self.handle_select_product_by_id(product_id, respond_to).await;
            }
            DraftRequest::IncreaseQuantity { product_id, respond_to } => {
                self.handle_increase_quantity(product_id, respond_to);
            }
            DraftRequest::DecreaseQuantity { product_id, respond_to } => {
                self.handle_decrease_quantity(product_id, respond_to);
            }
            DraftRequest::ClosePicker { respond_to } => {
                self.engine.close_picker();
                self.reply_with_snapshot(Ok(()), respond_to);
            }
            DraftRequest::DismissError { respond_to } => {
                self.engine.dismiss_error();
                self.reply_with_snapshot(Ok(()), respond_to);
            }
            DraftRequest::EnterConfirmation { respond_to } => {
                let result = self.engine.enter_confirmation();
                info!(lines = self.engine.draft().lines().len(), "Entering confirmation");
                self.reply_with_snapshot(result, respond_to);
            }
            DraftRequest::ExitConfirmation { respond_to } => {
                let result = self.engine.exit_confirmation();
                self.reply_with_snapshot(result, respond_to);
            }
            DraftRequest::Submit { respond_to } => {
                self.handle_submit(respond_to);
            }
            DraftRequest::GetSnapshot { respond_to } => {
                let _ = respond_to.send(Ok(self.engine.snapshot()));
            }
            DraftRequest::Discard { respond_to } => {
                let result = self.engine.discard();
                let stop = result.is_ok();
                if stop {
                    info!("Draft discarded");
                    self.publish();
                }
                let _ = respond_to.send(result);
                if stop {
                    return ControlFlow::Break(());
                }
            }
        }
        ControlFlow::Continue(())
    }

    /// Publishes the current snapshot to subscribers.
    fn publish(&self) {
        self.state.send_replace(self.engine.snapshot());
    }

    fn reply_with_snapshot(
        &self,
        result: Result<(), DraftError>,
        respond_to: ServiceResponse<DraftSnapshot, DraftError>,
    ) {
        let reply = match result {
            Ok(()) => {
                self.publish();
                Ok(self.engine.snapshot())
            }
            Err(e) => {
                debug!(error = %e, "Request rejected");
                Err(e)
            }
        };
        let _ = respond_to.send(reply);
    }

    #[instrument(skip(self, respond_to))]
    async fn handle_load_catalog(&mut self, respond_to: ServiceResponse<Vec<Product>, DraftError>) {
        debug!("Processing load_catalog request");

        if let Err(e) = self.engine.begin_catalog_load() {
            let _ = respond_to.send(Err(e));
            return;
        }
        self.publish();

        let result = self.catalog.fetch_all().await;
        let reply = self.engine.finish_catalog_load(result);
        match &reply {
            Ok(candidates) => info!(candidates = candidates.len(), "Catalog loaded"),
            Err(e) => warn!(error = %e, "Catalog load failed"),
        }
        self.publish();

        let _ = respond_to.send(reply);
    }

    #[instrument(fields(product_id = %product.id), skip(self, product, respond_to))]
    fn handle_select_product(&mut self, product: Product, respond_to: ServiceResponse<DraftSnapshot, DraftError>) {
        let result = self.engine.select_product(product);
        if result.is_ok() {
            info!(total = %self.engine.draft().total(), "Product added to draft");
        }
        self.reply_with_snapshot(result, respond_to);
    }

    #[instrument(fields(product_id = %product_id), skip(self, respond_to))]
    async fn handle_select_product_by_id(
        &mut self,
        product_id: String,
        respond_to: ServiceResponse<DraftSnapshot, DraftError>,
    ) {
        if let Err(e) = self.engine.check_selectable(&product_id) {
            let _ = respond_to.send(Err(e));
            return;
        }

        let product = match self.engine.candidate(&product_id) {
            Some(product) => product.clone(),
            None => match self.catalog.fetch_by_id(&product_id).await {
                Ok(product) => product,
                Err(e) => {
                    warn!(error = %e, "Product lookup failed");
                    let _ = respond_to.send(Err(DraftError::ProductUnavailable(e.message)));
                    return;
                }
            },
        };

        self.handle_select_product(product, respond_to);
    }

    #[instrument(fields(product_id = %product_id), skip(self, respond_to))]
    fn handle_increase_quantity(&mut self, product_id: String, respond_to: ServiceResponse<DraftSnapshot, DraftError>) {
        let result = self.engine.increase_quantity(&product_id).map(|changed| {
            if !changed {
                debug!("Quantity already at available stock");
            }
        });
        self.reply_with_snapshot(result, respond_to);
    }

    #[instrument(fields(product_id = %product_id), skip(self, respond_to))]
    fn handle_decrease_quantity(&mut self, product_id: String, respond_to: ServiceResponse<DraftSnapshot, DraftError>) {
        let result = self.engine.decrease_quantity(&product_id);
        self.reply_with_snapshot(result, respond_to);
    }

    /// **Background handler** - the spawned task owns the gateway call; its
    /// outcome comes back as a `SubmissionOutcome`.
    #[instrument(skip(self, respond_to))]
    fn handle_submit(&mut self, respond_to: ServiceResponse<(), DraftError>) {
        let submission = match self.engine.begin_submission() {
            Ok(submission) => submission,
            Err(e) => {
                warn!(error = %e, "Submit rejected");
                let _ = respond_to.send(Err(e));
                return;
            }
        };
        self.publish();
        info!(items = submission.items.len(), total = %submission.total, "Submitting order");

        let submitter = Arc::clone(&self.submitter);
        let completions = self.completion_sender.clone();
        let span = info_span!("submission", client_id = %submission.client_id);
        tokio::spawn(
            async move {
                let result = submitter.submit(&submission).await;
                if completions.send(SubmissionOutcome { result, respond_to }).await.is_err() {
                    error!("Draft session ended before the submission finished");
                }
            }
            .instrument(span),
        );
    }

    fn handle_submission_finished(&mut self, outcome: SubmissionOutcome) {
        let result = self.engine.finish_submission(outcome.result);
        match &result {
            Ok(()) => info!("Order submitted, draft discarded"),
            Err(e) => error!(error = %e, "Order submission failed"),
        }
        self.publish();
        let _ = outcome.respond_to.send(result);
    }
}
