//! # Model Form Controller
//!
//! A [`FormController`] binds a [`FormSchema`] to one instance of its model, or
//! to none when creating. It moves through
//! `Unloaded -> Loading -> Ready -> Submitting -> Succeeded`:
//!
//! - A failed load of the target instance is blocking (`Blocked`), and so is
//!   an update answered with `NotFound`.
//! - A failed auxiliary load only degrades the field that needed it.
//! - A rejected submit lands back in `Ready` with the entered values intact
//!   and the failure in `last_error`.
//! - A second submit while one is in flight is refused, not queued.
//!
//! Remote calls are spawned into a controller-owned `JoinSet` and applied by
//! [`FormController::settle`]. Dropping or closing the controller aborts them,
//! so nothing arrives after the form is gone.

use crate::entity::ResourceEntity;
use crate::error::{AdminError, ClientError, Failure, Operation, ValidationErrors};
use crate::field::{check_required, AuxiliaryData, Choice, FieldSpec, FieldValue, FormValues};
use crate::remote::RemoteResource;
use async_trait::async_trait;
use futures::future::join_all;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPhase {
    Unloaded,
    Loading,
    Ready,
    Submitting,
    Succeeded,
    /// The target instance could not be loaded; the form cannot render.
    Blocked,
}

/// Completion signal from a form to whoever opened it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormOutcome<Id> {
    Saved(Id),
    Cancelled,
}

pub type CompletionSender<Id> = mpsc::UnboundedSender<FormOutcome<Id>>;

/// Per-model form definition.
///
/// `fields` must be a pure function of the instance (or its absence) and the
/// auxiliary data; the controller overlays the user's entered values on top.
#[async_trait]
pub trait FormSchema: Send + Sync + 'static {
    type Model: ResourceEntity;

    /// Auxiliary kinds to load before the form can render its choices.
    fn auxiliary_kinds(&self) -> Vec<&'static str> {
        Vec::new()
    }

    async fn load_auxiliary(&self, kind: &str) -> Result<Vec<Choice>, ClientError> {
        Err(ClientError::Remote(format!("no auxiliary source for {kind}")))
    }

    fn fields(&self, instance: Option<&Self::Model>, auxiliary: &AuxiliaryData) -> Vec<FieldSpec>;

    /// Turns entered values into a create/update payload.
    ///
    /// Required fields have already been checked; this handles the rest
    /// (parsing ids, decoding settings text, …).
    fn payload(
        &self,
        values: &FormValues,
        instance: Option<&Self::Model>,
    ) -> Result<<Self::Model as ResourceEntity>::Payload, ValidationErrors>;

    fn success_message(&self, mode: FormMode) -> String;
}

type ModelId<S> = <<S as FormSchema>::Model as ResourceEntity>::Id;

enum FormTask<T: ResourceEntity> {
    Loaded {
        auxiliary: AuxiliaryData,
        instance: Option<Result<T, ClientError>>,
    },
    Submitted(Result<T, ClientError>),
}

/// What `settle` applied.
#[derive(Debug, Clone, PartialEq)]
pub enum FormEvent<Id> {
    /// Ready to edit. `degraded` lists auxiliary kinds that failed to load.
    Loaded { degraded: Vec<AdminError> },
    LoadFailed(Failure),
    Saved { id: Id, message: String },
    SubmitFailed(Failure),
}

/// Everything needed to draw the form.
#[derive(Debug, Clone, PartialEq)]
pub struct FormRender {
    pub mode: FormMode,
    pub phase: FormPhase,
    pub fields: Vec<FieldSpec>,
    pub field_errors: ValidationErrors,
    pub error: Option<String>,
    pub success_message: Option<String>,
    pub submit_enabled: bool,
}

pub struct FormController<S: FormSchema, C: RemoteResource<S::Model>> {
    schema: Arc<S>,
    client: C,
    target: Option<ModelId<S>>,
    phase: FormPhase,
    instance: Option<S::Model>,
    auxiliary: AuxiliaryData,
    values: FormValues,
    last_error: Option<Failure>,
    success_message: Option<String>,
    pending: JoinSet<FormTask<S::Model>>,
    on_complete: Option<CompletionSender<ModelId<S>>>,
}

impl<S: FormSchema, C: RemoteResource<S::Model>> FormController<S, C> {
    /// `target` selects Edit mode for that id; `None` creates.
    pub fn new(schema: Arc<S>, client: C, target: Option<ModelId<S>>) -> Self {
        Self {
            schema,
            client,
            target,
            phase: FormPhase::Unloaded,
            instance: None,
            auxiliary: AuxiliaryData::new(),
            values: FormValues::new(),
            last_error: None,
            success_message: None,
            pending: JoinSet::new(),
            on_complete: None,
        }
    }

    /// Sends the form's [`FormOutcome`] to `sender` when it finishes.
    pub fn with_completion(mut self, sender: CompletionSender<ModelId<S>>) -> Self {
        self.on_complete = Some(sender);
        self
    }

    pub fn mode(&self) -> FormMode {
        if self.target.is_some() {
            FormMode::Edit
        } else {
            FormMode::Create
        }
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    pub fn instance(&self) -> Option<&S::Model> {
        self.instance.as_ref()
    }

    pub fn values(&self) -> &FormValues {
        &self.values
    }

    pub fn last_error(&self) -> Option<&Failure> {
        self.last_error.as_ref()
    }

    pub fn success_message(&self) -> Option<&str> {
        self.success_message.as_deref()
    }

    /// Starts loading auxiliary data and, in Edit mode, the target instance.
    pub fn begin_load(&mut self) -> Result<(), AdminError> {
        match self.phase {
            FormPhase::Loading | FormPhase::Submitting => return Err(AdminError::NotReady),
            _ => {}
        }
        self.phase = FormPhase::Loading;
        self.last_error = None;

        let schema = self.schema.clone();
        let client = self.client.clone();
        let target = self.target.clone();
        debug!(kind = <S::Model as ResourceEntity>::KIND, ?target, "Loading form");
        self.pending.spawn(async move {
            let kinds = schema.auxiliary_kinds();
            let auxiliary_loads = join_all(kinds.iter().map(|kind| schema.load_auxiliary(kind)));
            let instance_load = async move {
                match target {
                    Some(id) => Some(client.retrieve(id).await),
                    None => None,
                }
            };
            let (loaded, instance) = tokio::join!(auxiliary_loads, instance_load);

            let mut auxiliary = AuxiliaryData::new();
            for (kind, result) in kinds.iter().zip(loaded) {
                auxiliary.insert(kind, result.map_err(|e| e.to_string()));
            }
            FormTask::Loaded {
                auxiliary,
                instance,
            }
        });
        Ok(())
    }

    /// Loads and waits for the result.
    pub async fn load(&mut self) -> Result<(), Failure> {
        self.begin_load()
            .map_err(|e| Failure::new(Operation::Load, e))?;
        while self.phase == FormPhase::Loading {
            match self.settle().await {
                Some(FormEvent::LoadFailed(failure)) => return Err(failure),
                Some(_) => {}
                None => break,
            }
        }
        Ok(())
    }

    /// Fields bound to the instance (or defaults) with entered values overlaid.
    fn bound_fields(&self) -> Vec<FieldSpec> {
        let mut fields = self.schema.fields(self.instance.as_ref(), &self.auxiliary);
        for field in &mut fields {
            if let Some(value) = self.values.get(&field.name) {
                field.bind(value.clone());
            }
        }
        fields
    }

    pub fn render(&self) -> FormRender {
        let fields = match self.phase {
            FormPhase::Unloaded | FormPhase::Loading | FormPhase::Blocked => Vec::new(),
            _ => self.bound_fields(),
        };
        let field_errors = match &self.last_error {
            Some(Failure {
                error: AdminError::Validation(errors),
                ..
            }) => errors.clone(),
            _ => ValidationErrors::new(),
        };
        FormRender {
            mode: self.mode(),
            phase: self.phase,
            fields,
            field_errors,
            error: self.last_error.as_ref().map(ToString::to_string),
            success_message: self.success_message.clone(),
            submit_enabled: self.phase == FormPhase::Ready,
        }
    }

    pub fn set_value(&mut self, name: &str, value: FieldValue) -> Result<(), AdminError> {
        self.ensure_editable()?;
        self.values.set(name, value);
        Ok(())
    }

    /// Adds or removes one option of a multi-select field.
    pub fn toggle_choice(&mut self, name: &str, value: &str) -> Result<(), AdminError> {
        self.ensure_editable()?;
        self.values.toggle(name, value);
        Ok(())
    }

    fn ensure_editable(&self) -> Result<(), AdminError> {
        match self.phase {
            FormPhase::Ready => Ok(()),
            FormPhase::Submitting => Err(AdminError::SubmitInFlight),
            _ => Err(AdminError::NotReady),
        }
    }

    /// Overwrites the entered values with `values`, then submits.
    pub fn submit_values(&mut self, values: FormValues) -> Result<(), AdminError> {
        self.ensure_editable()?;
        for (name, value) in values.iter() {
            self.values.set(name, value.clone());
        }
        self.submit()
    }

    /// Validates locally and, if clean, starts the create or update call.
    ///
    /// Validation failures are stored in `last_error` and returned; no remote
    /// call is made for them.
    pub fn submit(&mut self) -> Result<(), AdminError> {
        if self.phase == FormPhase::Submitting {
            debug!("Submit ignored, one is already in flight");
            return Err(AdminError::SubmitInFlight);
        }
        self.ensure_editable()?;

        let fields = self.bound_fields();
        let payload = check_required(&fields, &self.values)
            .and_then(|()| self.schema.payload(&self.values, self.instance.as_ref()));
        let payload = match payload {
            Ok(payload) => payload,
            Err(errors) => {
                debug!(error = %errors, "Submit rejected locally");
                self.last_error = Some(Failure::new(Operation::Submit, errors.clone()));
                return Err(AdminError::Validation(errors));
            }
        };

        self.phase = FormPhase::Submitting;
        self.last_error = None;
        let client = self.client.clone();
        let target = self.target.clone();
        debug!(kind = <S::Model as ResourceEntity>::KIND, ?payload, "Submitting");
        self.pending.spawn(async move {
            let result = match target {
                Some(id) => client.update(id, payload).await,
                None => client.create(payload).await,
            };
            FormTask::Submitted(result)
        });
        Ok(())
    }

    /// Waits for the next in-flight call and applies its result.
    ///
    /// Returns `None` when nothing is in flight.
    pub async fn settle(&mut self) -> Option<FormEvent<ModelId<S>>> {
        match self.pending.join_next().await? {
            Ok(task) => Some(self.apply(task)),
            Err(e) => {
                warn!(error = %e, "Form task did not complete");
                let (operation, phase) = match self.phase {
                    FormPhase::Submitting => (Operation::Submit, FormPhase::Ready),
                    _ => (Operation::Load, FormPhase::Blocked),
                };
                let failure = Failure::new(operation, AdminError::RemoteFetch(e.to_string()));
                self.phase = phase;
                self.last_error = Some(failure.clone());
                Some(match operation {
                    Operation::Submit => FormEvent::SubmitFailed(failure),
                    _ => FormEvent::LoadFailed(failure),
                })
            }
        }
    }

    fn apply(&mut self, task: FormTask<S::Model>) -> FormEvent<ModelId<S>> {
        let kind = <S::Model as ResourceEntity>::KIND;
        match task {
            FormTask::Loaded {
                auxiliary,
                instance,
            } => {
                match instance {
                    Some(Err(e)) => {
                        warn!(kind, error = %e, "Form subject could not be loaded");
                        let failure = Failure::new(Operation::Load, e);
                        self.phase = FormPhase::Blocked;
                        self.last_error = Some(failure.clone());
                        return FormEvent::LoadFailed(failure);
                    }
                    Some(Ok(item)) => self.instance = Some(item),
                    None => {}
                }
                let degraded: Vec<AdminError> = auxiliary
                    .failures()
                    .map(|(aux_kind, reason)| {
                        warn!(kind, auxiliary = aux_kind, reason, "Field degraded");
                        AdminError::AuxiliaryLoad {
                            kind: aux_kind.to_string(),
                            message: reason.to_string(),
                        }
                    })
                    .collect();
                self.auxiliary = auxiliary;
                let fields = self.schema.fields(self.instance.as_ref(), &self.auxiliary);
                self.values = FormValues::from_fields(&fields);
                self.phase = FormPhase::Ready;
                info!(kind, mode = ?self.mode(), "Form ready");
                FormEvent::Loaded { degraded }
            }
            FormTask::Submitted(Ok(item)) => {
                let id = item.pk().clone();
                let message = self.schema.success_message(self.mode());
                info!(kind, %id, success = %message, "Saved");
                self.instance = Some(item);
                self.phase = FormPhase::Succeeded;
                self.success_message = Some(message.clone());
                if let Some(sender) = &self.on_complete {
                    // The opener may already be gone.
                    let _ = sender.send(FormOutcome::Saved(id.clone()));
                }
                FormEvent::Saved { id, message }
            }
            FormTask::Submitted(Err(e)) => {
                warn!(kind, error = %e, "Submit failed");
                let failure = Failure::new(Operation::Submit, e);
                // The subject is gone; resubmitting cannot succeed.
                self.phase = match failure.error {
                    AdminError::NotFound(_) => FormPhase::Blocked,
                    _ => FormPhase::Ready,
                };
                self.last_error = Some(failure.clone());
                FormEvent::SubmitFailed(failure)
            }
        }
    }

    /// Closes the form. In-flight calls are aborted; the opener is told the
    /// form was cancelled unless it already saved.
    pub fn close(mut self) {
        self.pending.abort_all();
        if self.phase != FormPhase::Succeeded {
            if let Some(sender) = &self.on_complete {
                let _ = sender.send(FormOutcome::Cancelled);
            }
        }
        debug!(phase = ?self.phase, "Form closed");
    }
}
