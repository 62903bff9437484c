//! Plain records persisted by the entity store.
//!
//! Field names serialize in camelCase so a persisted collection is a JSON
//! array of objects like `{"id":"1","semilleroId":"1","createdAt":"..."}`.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::storage::Record;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Administrador,
    Profesor,
    Estudiante,
    Visitante,
}

impl Role {
    pub const ALL: [Role; 4] = [
        Role::Administrador,
        Role::Profesor,
        Role::Estudiante,
        Role::Visitante,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Administrador => "administrador",
            Role::Profesor => "profesor",
            Role::Estudiante => "estudiante",
            Role::Visitante => "visitante",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semillero_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semillero_name: Option<String>,
}

impl User {
    /// True when `semillero_id` names this user's own group.
    pub fn belongs_to(&self, semillero_id: &str) -> bool {
        self.semillero_id.as_deref() == Some(semillero_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub role: Role,
    pub semillero_id: Option<String>,
    pub semillero_name: Option<String>,
}

/// A research group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Semillero {
    pub id: String,
    pub name: String,
    pub description: String,
    pub coordinator_id: String,
    pub coordinator: String,
    pub members: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSemillero {
    pub name: String,
    pub description: String,
    pub coordinator_id: String,
    pub coordinator: String,
    pub members: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StudentStatus {
    Activo,
    Inactivo,
    Pendiente,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: String,
    pub name: String,
    pub email: String,
    pub semillero_id: String,
    pub semillero_name: String,
    pub status: StudentStatus,
    pub created_by: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStudent {
    pub name: String,
    pub email: String,
    pub semillero_id: String,
    pub semillero_name: String,
    pub status: StudentStatus,
    pub created_by: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectStatus {
    Planificacion,
    EnProgreso,
    Completado,
    Pausado,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub title: String,
    pub description: String,
    pub status: ProjectStatus,
    /// 0..=100
    pub progress: u8,
    pub budget: f64,
    pub start_date: NaiveDate,
    /// Expected to be on or after `start_date`; not enforced.
    pub end_date: NaiveDate,
    pub semillero_id: String,
    pub semillero_name: String,
    pub team: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_name: Option<String>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

impl Project {
    /// Thematic category derived from the owning semillero's name.
    pub fn category(&self) -> &'static str {
        let name = self.semillero_name.as_str();
        if name.contains("Inteligencia Artificial") || name.contains("Blockchain") {
            "Tecnología"
        } else if name.contains("Sostenibilidad") || name.contains("Medio Ambiente") {
            "Ambiental"
        } else if name.contains("Fintech") {
            "Finanzas"
        } else if name.contains("Biotecnología") || name.contains("Médica") {
            "Medicina"
        } else {
            "Otros"
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProject {
    pub title: String,
    pub description: String,
    pub status: ProjectStatus,
    pub progress: u8,
    pub budget: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub semillero_id: String,
    pub semillero_name: String,
    pub team: Vec<String>,
    pub document_name: Option<String>,
    pub created_by: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    Equipo,
    Presupuesto,
    Personal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResourceStatus {
    Disponible,
    EnUso,
    Mantenimiento,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ResourceType,
    pub status: ResourceStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
    pub semillero_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    pub description: String,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewResource {
    pub name: String,
    pub kind: ResourceType,
    pub status: ResourceStatus,
    pub project_id: Option<String>,
    pub project_name: Option<String>,
    pub semillero_id: String,
    pub assigned_to: Option<String>,
    pub description: String,
    pub created_by: String,
}

/// Who a message or meeting is addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Audience<'a> {
    General,
    Semillero(&'a str),
    /// Neither general nor bound to a group; only administrators see it.
    Unassigned,
}

impl<'a> Audience<'a> {
    /// `is_general` wins when both fields are set.
    fn resolve(is_general: bool, semillero_id: Option<&'a str>) -> Self {
        match (is_general, semillero_id) {
            (true, _) => Audience::General,
            (false, Some(id)) => Audience::Semillero(id),
            (false, None) => Audience::Unassigned,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reply {
    pub id: String,
    pub content: String,
    pub author: String,
    pub author_id: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub title: String,
    pub content: String,
    pub author: String,
    pub author_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semillero_id: Option<String>,
    pub is_general: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub replies: Vec<Reply>,
}

impl Message {
    pub fn audience(&self) -> Audience<'_> {
        Audience::resolve(self.is_general, self.semillero_id.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMessage {
    pub title: String,
    pub content: String,
    pub author: String,
    pub author_id: String,
    pub semillero_id: Option<String>,
    pub is_general: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meeting {
    pub id: String,
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    /// `HH:MM`
    pub time: String,
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semillero_id: Option<String>,
    pub is_general: bool,
    pub organizer: String,
    pub organizer_id: String,
    pub attendees: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl Meeting {
    pub fn audience(&self) -> Audience<'_> {
        Audience::resolve(self.is_general, self.semillero_id.as_deref())
    }

    /// A URL location means the meeting happens online.
    pub fn is_virtual(&self) -> bool {
        let location = self.location.trim_start();
        location.starts_with("http://") || location.starts_with("https://")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMeeting {
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    pub time: String,
    pub location: String,
    pub semillero_id: Option<String>,
    pub is_general: bool,
    pub organizer: String,
    pub organizer_id: String,
    pub attendees: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    Conferencia,
    Taller,
    Seminario,
    Congreso,
}

/// Outreach event, visible to everyone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    pub location: String,
    #[serde(rename = "type")]
    pub kind: EventType,
    pub organizer: String,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEvent {
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    pub location: String,
    pub kind: EventType,
    pub organizer: String,
    pub created_by: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollaborationStatus {
    Activa,
    Finalizada,
    Pendiente,
}

/// Institutional partnership, visible to everyone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collaboration {
    pub id: String,
    pub title: String,
    pub institution: String,
    pub description: String,
    pub status: CollaborationStatus,
    pub start_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    pub contact: String,
    pub email: String,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCollaboration {
    pub title: String,
    pub institution: String,
    pub description: String,
    pub status: CollaborationStatus,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub contact: String,
    pub email: String,
    pub created_by: String,
}

// ---------- Record impls ----------

impl Record for User {
    const COLLECTION: &'static str = "users";
    const KIND: &'static str = "User";
    type New = NewUser;

    fn id(&self) -> &str {
        &self.id
    }

    fn from_new(new: NewUser, id: String, _now: DateTime<Utc>) -> Self {
        User {
            id,
            name: new.name,
            email: new.email,
            role: new.role,
            semillero_id: new.semillero_id,
            semillero_name: new.semillero_name,
        }
    }
}

impl Record for Semillero {
    const COLLECTION: &'static str = "semilleros";
    const KIND: &'static str = "Semillero";
    type New = NewSemillero;

    fn id(&self) -> &str {
        &self.id
    }

    fn from_new(new: NewSemillero, id: String, _now: DateTime<Utc>) -> Self {
        Semillero {
            id,
            name: new.name,
            description: new.description,
            coordinator_id: new.coordinator_id,
            coordinator: new.coordinator,
            members: new.members,
        }
    }
}

impl Record for Student {
    const COLLECTION: &'static str = "students";
    const KIND: &'static str = "Student";
    type New = NewStudent;

    fn id(&self) -> &str {
        &self.id
    }

    fn from_new(new: NewStudent, id: String, _now: DateTime<Utc>) -> Self {
        Student {
            id,
            name: new.name,
            email: new.email,
            semillero_id: new.semillero_id,
            semillero_name: new.semillero_name,
            status: new.status,
            created_by: new.created_by,
        }
    }
}

impl Record for Project {
    const COLLECTION: &'static str = "projects";
    const KIND: &'static str = "Project";
    type New = NewProject;

    fn id(&self) -> &str {
        &self.id
    }

    fn from_new(new: NewProject, id: String, now: DateTime<Utc>) -> Self {
        Project {
            id,
            title: new.title,
            description: new.description,
            status: new.status,
            progress: new.progress,
            budget: new.budget,
            start_date: new.start_date,
            end_date: new.end_date,
            semillero_id: new.semillero_id,
            semillero_name: new.semillero_name,
            team: new.team,
            document_name: new.document_name,
            created_by: new.created_by,
            created_at: now,
        }
    }
}

impl Record for Resource {
    const COLLECTION: &'static str = "resources";
    const KIND: &'static str = "Resource";
    type New = NewResource;

    fn id(&self) -> &str {
        &self.id
    }

    fn from_new(new: NewResource, id: String, now: DateTime<Utc>) -> Self {
        Resource {
            id,
            name: new.name,
            kind: new.kind,
            status: new.status,
            project_id: new.project_id,
            project_name: new.project_name,
            semillero_id: new.semillero_id,
            assigned_to: new.assigned_to,
            description: new.description,
            created_by: new.created_by,
            created_at: now,
        }
    }
}

impl Record for Message {
    const COLLECTION: &'static str = "messages";
    const KIND: &'static str = "Message";
    type New = NewMessage;

    fn id(&self) -> &str {
        &self.id
    }

    fn from_new(new: NewMessage, id: String, now: DateTime<Utc>) -> Self {
        Message {
            id,
            title: new.title,
            content: new.content,
            author: new.author,
            author_id: new.author_id,
            semillero_id: new.semillero_id,
            is_general: new.is_general,
            created_at: now,
            replies: Vec::new(),
        }
    }
}

impl Record for Meeting {
    const COLLECTION: &'static str = "meetings";
    const KIND: &'static str = "Meeting";
    type New = NewMeeting;

    fn id(&self) -> &str {
        &self.id
    }

    fn from_new(new: NewMeeting, id: String, now: DateTime<Utc>) -> Self {
        Meeting {
            id,
            title: new.title,
            description: new.description,
            date: new.date,
            time: new.time,
            location: new.location,
            semillero_id: new.semillero_id,
            is_general: new.is_general,
            organizer: new.organizer,
            organizer_id: new.organizer_id,
            attendees: new.attendees,
            created_at: now,
        }
    }
}

impl Record for Event {
    const COLLECTION: &'static str = "events";
    const KIND: &'static str = "Event";
    type New = NewEvent;

    fn id(&self) -> &str {
        &self.id
    }

    fn from_new(new: NewEvent, id: String, now: DateTime<Utc>) -> Self {
        Event {
            id,
            title: new.title,
            description: new.description,
            date: new.date,
            location: new.location,
            kind: new.kind,
            organizer: new.organizer,
            created_by: new.created_by,
            created_at: now,
        }
    }
}

impl Record for Collaboration {
    const COLLECTION: &'static str = "collaborations";
    const KIND: &'static str = "Collaboration";
    type New = NewCollaboration;

    fn id(&self) -> &str {
        &self.id
    }

    fn from_new(new: NewCollaboration, id: String, now: DateTime<Utc>) -> Self {
        Collaboration {
            id,
            title: new.title,
            institution: new.institution,
            description: new.description,
            status: new.status,
            start_date: new.start_date,
            end_date: new.end_date,
            contact: new.contact,
            email: new.email,
            created_by: new.created_by,
            created_at: now,
        }
    }
}
