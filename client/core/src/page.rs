//! Admin page orchestration
//!
//! Drives one entity screen: list -> detail -> edit/create -> back. Creates
//! and updates go through the list orchestrator so notices and the refresh
//! happen in one place.

use crate::api::{entity_id, ApiClient, EntityService, PrivacyConsentSource};
use crate::detail::DetailView;
use crate::dialog::Dialog;
use crate::entity::EntityConfig;
use crate::error::{AdminError, AdminResult, ApiError};
use crate::form::{form_data_to_json, FormState, SubmitOutcome};
use crate::list::{Confirm, DeleteConfirmation, ListOrchestrator};
use serde_json::Value;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageMode {
    List,
    Detail,
    Create,
    Edit,
}

pub struct AdminPage {
    config: EntityConfig,
    client: Option<ApiClient>,
    privacy: Option<Arc<dyn PrivacyConsentSource>>,
    list: ListOrchestrator,
    mode: PageMode,
    selected: Option<Value>,
    detail: Option<DetailView>,
    form: Option<FormState>,
    dialog: Option<Dialog>,
}

impl AdminPage {
    /// Page over an arbitrary service. `client` serves option endpoints and privacy consent.
    pub fn new(config: EntityConfig, service: Arc<dyn EntityService>, client: Option<ApiClient>) -> Self {
        let list = ListOrchestrator::new(service, config.list.clone(), config.messages.clone());
        let privacy = client
            .clone()
            .map(|c| Arc::new(c) as Arc<dyn PrivacyConsentSource>);
        Self {
            config,
            client,
            privacy,
            list,
            mode: PageMode::List,
            selected: None,
            detail: None,
            form: None,
            dialog: None,
        }
    }

    /// Page over the entity's REST resource
    pub fn connect(config: EntityConfig, client: ApiClient) -> Self {
        let service = Arc::new(config.service(client.clone()));
        Self::new(config, service, Some(client))
    }

    pub fn privacy_source(mut self, source: Arc<dyn PrivacyConsentSource>) -> Self {
        self.privacy = Some(source);
        self
    }

    pub fn config(&self) -> &EntityConfig {
        &self.config
    }

    pub fn list(&self) -> &ListOrchestrator {
        &self.list
    }

    pub fn list_mut(&mut self) -> &mut ListOrchestrator {
        &mut self.list
    }

    pub fn mode(&self) -> PageMode {
        self.mode
    }

    pub fn selected(&self) -> Option<&Value> {
        self.selected.as_ref()
    }

    pub fn detail(&self) -> Option<&DetailView> {
        self.detail.as_ref()
    }

    pub fn form(&self) -> Option<&FormState> {
        self.form.as_ref()
    }

    pub fn form_mut(&mut self) -> Option<&mut FormState> {
        self.form.as_mut()
    }

    pub fn dialog(&self) -> Option<&Dialog> {
        self.dialog.as_ref()
    }

    pub async fn load(&mut self) -> Result<(), ApiError> {
        self.list.fetch().await
    }

    /// Fetch one entity and show its detail view
    pub async fn select(&mut self, id: &str) -> Result<&DetailView, ApiError> {
        let item = self.list.service().get_one(id).await?;
        Ok(self.show_detail(item))
    }

    fn show_detail(&mut self, item: Value) -> &DetailView {
        let view = self.config.compose_detail(&item);
        self.selected = Some(item);
        self.form = None;
        self.mode = PageMode::Detail;
        self.detail.insert(view)
    }

    pub async fn begin_create(&mut self) {
        let form = self.config.form_for(None);
        form.load_options(self.client.as_ref()).await;
        self.form = Some(form);
        self.mode = PageMode::Create;
    }

    /// Edit form for the selected entity, with options and privacy consent loaded
    pub async fn begin_edit(&mut self) -> AdminResult<()> {
        let Some(item) = self.selected.as_ref() else {
            return Err(AdminError::Validation("Kein Eintrag ausgewählt.".into()));
        };
        let mut form = self.config.form_for(Some(item));
        form.load_options(self.client.as_ref()).await;
        if let Some(source) = self.privacy.as_deref() {
            form.load_privacy_consent(source).await;
        }
        self.form = Some(form);
        self.mode = PageMode::Edit;
        Ok(())
    }

    /// Submit the open form. Create returns to the list, edit to the updated detail.
    pub async fn submit(&mut self) -> SubmitOutcome {
        let mode = self.mode;
        let Some(form) = self.form.as_mut() else {
            return SubmitOutcome::Invalid("Kein Formular geöffnet.".into());
        };
        let id = form.entity_id();
        let list = &mut self.list;
        let mut saved: Option<Value> = None;
        let saved_slot = &mut saved;

        let outcome = form
            .submit(|data| async move {
                let payload = form_data_to_json(&data);
                let result = match (mode, id) {
                    (PageMode::Edit, Some(id)) => list.update(&id, &payload).await,
                    (PageMode::Edit, None) => {
                        return Err(AdminError::Validation("Eintrag ohne ID.".into()))
                    }
                    _ => list.create(&payload).await,
                };
                *saved_slot = Some(result?);
                Ok(())
            })
            .await;

        if outcome == SubmitOutcome::Submitted {
            match (mode, saved) {
                (PageMode::Edit, Some(item)) => {
                    self.show_detail(item);
                }
                _ => self.back_to_list(),
            }
        }
        outcome
    }

    /// Open the delete confirmation for the selected entity
    pub fn request_delete(&mut self) -> Option<&Dialog> {
        let item = self.selected.as_ref()?;
        let name = self.config.detail.title.resolve(item);
        let mut dialog = Dialog::confirm_delete(&self.config.singular, &name);
        dialog.open();
        self.dialog = Some(dialog);
        self.dialog.as_ref()
    }

    /// Close the dialog without deleting
    pub async fn cancel_dialog(&mut self) {
        if let Some(mut dialog) = self.dialog.take() {
            dialog.close(|| ()).await;
        }
    }

    /// Confirm the open delete dialog: let it close, then delete
    pub async fn confirm_delete(&mut self) -> Result<bool, ApiError> {
        let Some(mut dialog) = self.dialog.take() else {
            return Ok(false);
        };
        dialog.close(|| ()).await;
        self.delete_selected(DeleteConfirmation::AlreadyConfirmed).await
    }

    /// Delete the selected entity after asking `prompt`
    pub async fn delete_with(&mut self, prompt: &dyn Confirm) -> Result<bool, ApiError> {
        self.delete_selected(DeleteConfirmation::Prompt(prompt)).await
    }

    async fn delete_selected(&mut self, confirmation: DeleteConfirmation<'_>) -> Result<bool, ApiError> {
        let Some(id) = self.selected.as_ref().and_then(entity_id) else {
            return Ok(false);
        };
        let deleted = self.list.delete(&id, confirmation).await?;
        if deleted {
            self.back_to_list();
        }
        Ok(deleted)
    }

    /// One step back: edit -> detail, everything else -> list
    pub fn back(&mut self) {
        match self.mode {
            PageMode::Edit if self.selected.is_some() => {
                self.form = None;
                self.mode = PageMode::Detail;
            }
            _ => self.back_to_list(),
        }
    }

    fn back_to_list(&mut self) {
        self.selected = None;
        self.detail = None;
        self.form = None;
        self.mode = PageMode::List;
    }
}
