//! Campus resource calls
//!
//! Typed wrappers over [`ApiClient`] for the campus collections and the
//! auxiliary endpoints. Bearer handling and the 401 rule come from the
//! client, so they apply here without any extra code.

use reqwest::multipart::{Form, Part};

use crate::app::api::ApiClient;
use crate::shared::{
    ApiError, ContactMessage, ContactReceipt, DashboardStats, ListQuery, MaterialDraft, MaterialFile, Page, Resource,
    StudyMaterial, UserSummary,
};

pub const DASHBOARD_STATS_PATH: &str = "/dashboard-stats/";
pub const STUDENTS_PATH: &str = "/students/";
pub const FACULTY_PATH: &str = "/faculty/";
pub const MESSAGES_PATH: &str = "/messages/";

/// Events, exams, results, study materials and dashboard data
#[derive(Debug, Clone)]
pub struct CampusApi {
    api: ApiClient,
}

impl CampusApi {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn list<R: Resource>(&self, query: &ListQuery) -> Result<Page<R>, ApiError> {
        self.api.get_json_with_query(R::COLLECTION, query).await
    }

    pub async fn get<R: Resource>(&self, id: i64) -> Result<R, ApiError> {
        self.api.get_json(&R::detail_path(id)).await
    }

    pub async fn create<R: Resource>(&self, draft: &R::Draft) -> Result<R, ApiError> {
        tracing::info!(collection = R::COLLECTION, "Creating resource");
        self.api.post_json(R::COLLECTION, draft).await
    }

    pub async fn update<R: Resource>(&self, id: i64, draft: &R::Draft) -> Result<R, ApiError> {
        tracing::info!(collection = R::COLLECTION, id, "Updating resource");
        self.api.put_json(&R::detail_path(id), draft).await
    }

    pub async fn delete<R: Resource>(&self, id: i64) -> Result<(), ApiError> {
        tracing::info!(collection = R::COLLECTION, id, "Deleting resource");
        self.api.delete(&R::detail_path(id)).await
    }

    /// Upload a new study material as multipart
    pub async fn create_material(
        &self,
        draft: &MaterialDraft,
        file: Option<MaterialFile>,
    ) -> Result<StudyMaterial, ApiError> {
        let form = material_form(draft, file)?;
        self.api.post_multipart(StudyMaterial::COLLECTION, form).await
    }

    /// Replace a study material; without a file the stored one is kept
    pub async fn update_material(
        &self,
        id: i64,
        draft: &MaterialDraft,
        file: Option<MaterialFile>,
    ) -> Result<StudyMaterial, ApiError> {
        let form = material_form(draft, file)?;
        self.api.put_multipart(&StudyMaterial::detail_path(id), form).await
    }

    /// Counters for the current user's role
    pub async fn dashboard_stats(&self) -> Result<DashboardStats, ApiError> {
        self.api.get_json(DASHBOARD_STATS_PATH).await
    }

    pub async fn students(&self) -> Result<Page<UserSummary>, ApiError> {
        self.api.get_json(STUDENTS_PATH).await
    }

    pub async fn faculty(&self) -> Result<Page<UserSummary>, ApiError> {
        self.api.get_json(FACULTY_PATH).await
    }

    /// Contact form submission
    pub async fn send_message(&self, message: &ContactMessage) -> Result<ContactReceipt, ApiError> {
        self.api.post_json(MESSAGES_PATH, message).await
    }
}

fn material_form(draft: &MaterialDraft, file: Option<MaterialFile>) -> Result<Form, ApiError> {
    let mut form = Form::new()
        .text("title", draft.title.clone())
        .text("material_type", draft.material_type.as_str());

    if let Some(description) = &draft.description {
        form = form.text("description", description.clone());
    }
    if let Some(subject) = &draft.subject {
        form = form.text("subject", subject.clone());
    }

    if let Some(file) = file {
        let mut part = Part::bytes(file.bytes).file_name(file.file_name);
        if let Some(mime) = &file.mime_type {
            part = part.mime_str(mime)?;
        }
        form = form.part("file", part);
    }

    Ok(form)
}
