//! Campus resources
//!
//! Events, exams, exam results and study materials as the backend serves
//! them, plus the drafts sent on create/update. List endpoints may answer
//! either with a paged envelope or a bare array; [`Page`] accepts both.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

use crate::shared::identity::Role;

/// A CRUD collection under the API root
pub trait Resource: DeserializeOwned + Send + 'static {
    /// Body accepted by create and update
    type Draft: Serialize + Send + Sync;

    /// Collection path, e.g. `/events/`
    const COLLECTION: &'static str;

    fn detail_path(id: i64) -> String {
        format!("{}{}/", Self::COLLECTION, id)
    }
}

/// Campus event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub created_by: Option<i64>,
    #[serde(default)]
    pub created_by_name: Option<String>,
    #[serde(default)]
    pub created_by_username: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default = "active")]
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventDraft {
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl Resource for Event {
    type Draft = EventDraft;
    const COLLECTION: &'static str = "/events/";
}

/// Scheduled exam
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exam {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub date: DateTime<Utc>,
    pub subject: String,
    #[serde(default)]
    pub faculty: Option<i64>,
    #[serde(default)]
    pub faculty_name: Option<String>,
    #[serde(default)]
    pub faculty_username: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default = "active")]
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExamDraft {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub date: DateTime<Utc>,
    pub subject: String,
}

impl Resource for Exam {
    type Draft = ExamDraft;
    const COLLECTION: &'static str = "/exams/";
}

/// A student's result for one exam. Grade and percentage are computed by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamResult {
    pub id: i64,
    pub exam: i64,
    pub student: i64,
    #[serde(deserialize_with = "decimal")]
    pub marks_obtained: f64,
    #[serde(deserialize_with = "decimal")]
    pub total_marks: f64,
    #[serde(default)]
    pub grade: Option<String>,
    #[serde(default)]
    pub remarks: Option<String>,
    #[serde(default, deserialize_with = "optional_decimal")]
    pub percentage: Option<f64>,
    #[serde(default)]
    pub student_name: Option<String>,
    #[serde(default)]
    pub student_username: Option<String>,
    #[serde(default)]
    pub exam_title: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultDraft {
    pub exam: i64,
    pub student: i64,
    pub marks_obtained: f64,
    pub total_marks: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
}

impl Resource for ExamResult {
    type Draft = ResultDraft;
    const COLLECTION: &'static str = "/results/";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialType {
    LectureNotes,
    Assignment,
    Reference,
    Syllabus,
    #[default]
    Other,
}

impl MaterialType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MaterialType::LectureNotes => "lecture_notes",
            MaterialType::Assignment => "assignment",
            MaterialType::Reference => "reference",
            MaterialType::Syllabus => "syllabus",
            MaterialType::Other => "other",
        }
    }
}

/// Uploaded study material
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyMaterial {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub material_type: MaterialType,
    /// Download URL of the uploaded file
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub uploaded_by: Option<i64>,
    #[serde(default)]
    pub uploaded_by_name: Option<String>,
    #[serde(default)]
    pub uploaded_by_username: Option<String>,
    /// Size in KB
    #[serde(default, deserialize_with = "optional_decimal")]
    pub file_size: Option<f64>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default = "active")]
    pub is_active: bool,
}

/// Text fields of a material upload; sent as multipart form fields
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaterialDraft {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub material_type: MaterialType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
}

/// File part of a material upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterialFile {
    pub file_name: String,
    pub mime_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl Resource for StudyMaterial {
    type Draft = MaterialDraft;
    const COLLECTION: &'static str = "/materials/";
}

/// List response: either `{count, next, previous, results}` or a bare array
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub count: Option<u64>,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

impl<T> Page<T> {
    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PageRepr<T> {
    Paged {
        #[serde(default)]
        count: Option<u64>,
        #[serde(default)]
        next: Option<String>,
        #[serde(default)]
        previous: Option<String>,
        results: Vec<T>,
    },
    Bare(Vec<T>),
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Page<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match PageRepr::deserialize(deserializer)? {
            PageRepr::Paged {
                count,
                next,
                previous,
                results,
            } => Page {
                count,
                next,
                previous,
                results,
            },
            PageRepr::Bare(results) => Page {
                count: Some(results.len() as u64),
                next: None,
                previous: None,
                results,
            },
        })
    }
}

/// Filters accepted by list endpoints
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ListQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ordering: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
}

impl ListQuery {
    pub fn search(term: impl Into<String>) -> Self {
        Self {
            search: Some(term.into()),
            ..Default::default()
        }
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }
}

/// Role-dependent counters from `/dashboard-stats/`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    // admin
    #[serde(default)]
    pub total_events: Option<u64>,
    #[serde(default)]
    pub total_exams: Option<u64>,
    #[serde(default)]
    pub total_results: Option<u64>,
    #[serde(default)]
    pub total_materials: Option<u64>,
    #[serde(default)]
    pub total_users: Option<u64>,
    // faculty
    #[serde(default)]
    pub my_events: Option<u64>,
    #[serde(default)]
    pub my_exams: Option<u64>,
    #[serde(default)]
    pub my_materials: Option<u64>,
    // faculty and student
    #[serde(default)]
    pub my_results: Option<u64>,
    // student
    #[serde(default)]
    pub available_events: Option<u64>,
    #[serde(default)]
    pub available_exams: Option<u64>,
    #[serde(default)]
    pub available_materials: Option<u64>,
}

impl DashboardStats {
    /// Labelled counters that are present, in display order
    pub fn counters(&self) -> Vec<(&'static str, u64)> {
        [
            ("Total events", self.total_events),
            ("Total exams", self.total_exams),
            ("Total results", self.total_results),
            ("Total materials", self.total_materials),
            ("Total users", self.total_users),
            ("My events", self.my_events),
            ("My exams", self.my_exams),
            ("My results", self.my_results),
            ("My materials", self.my_materials),
            ("Available events", self.available_events),
            ("Available exams", self.available_exams),
            ("Available materials", self.available_materials),
        ]
        .into_iter()
        .filter_map(|(label, value)| value.map(|v| (label, v)))
        .collect()
    }
}

/// Entry of the `/students/` and `/faculty/` pickers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub full_name: String,
    pub role: Role,
}

/// Contact form submission for `/messages/`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContactMessage {
    pub message: String,
    pub meta: ContactMeta,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactMeta {
    pub subject: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ContactReceipt {
    pub inserted_id: String,
}

fn active() -> bool {
    true
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Number {
    Float(f64),
    Text(String),
}

impl Number {
    fn into_f64<E: serde::de::Error>(self) -> Result<f64, E> {
        match self {
            Number::Float(value) => Ok(value),
            Number::Text(text) => text.trim().parse().map_err(E::custom),
        }
    }
}

/// Decimal fields arrive as JSON strings ("85.50") or numbers
fn decimal<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Number::deserialize(deserializer)?.into_f64()
}

fn optional_decimal<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Number>::deserialize(deserializer)?
        .map(Number::into_f64)
        .transpose()
}
