//! Projects, resources, messages, meetings and outreach content.
//!
//! Every write checks the acting session first, validates its input and only
//! then touches the store, so a rejected call leaves persisted data as it was.

use chrono::{NaiveDate, Utc};

use crate::authz::visibility;
use crate::errors::SemilleroError;
use crate::model::{
    Collaboration, Event, Meeting, Message, NewCollaboration, NewEvent, NewMeeting, NewMessage,
    NewProject, NewResource, Project, ProjectStatus, Reply, Resource, Semillero, User,
};
use crate::session::Session;
use crate::storage::{random_id, Store};

/// Location used when a meeting is scheduled without one.
pub const DEFAULT_LOCATION: &str = "Por definir";

fn acting_user<'a>(session: &'a Session, action: &str) -> Result<&'a User, SemilleroError> {
    session
        .user()
        .ok_or_else(|| SemilleroError::denied(format!("{action} requires a logged in user")))
}

fn require_text(value: &str, field: &str) -> Result<(), SemilleroError> {
    if value.trim().is_empty() {
        return Err(SemilleroError::invalid(format!("{field} is required")));
    }
    Ok(())
}

// ---------- Projects ----------

/// Project form input. Unset fields are filled from the session.
#[derive(Debug, Clone)]
pub struct ProjectDraft {
    pub title: String,
    pub description: String,
    pub status: ProjectStatus,
    pub progress: u8,
    pub budget: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Falls back to the selected semillero, then the user's own.
    pub semillero_id: Option<String>,
    /// Defaults to the creator alone.
    pub team: Vec<String>,
    pub document_name: Option<String>,
}

fn validate_project(title: &str, progress: u8, budget: f64) -> Result<(), SemilleroError> {
    require_text(title, "title")?;
    if progress > 100 {
        return Err(SemilleroError::invalid(format!(
            "progress must be between 0 and 100, got {progress}"
        )));
    }
    if !budget.is_finite() || budget < 0.0 {
        return Err(SemilleroError::invalid("budget cannot be negative"));
    }
    Ok(())
}

pub async fn create_project(
    store: &Store,
    session: &Session,
    draft: ProjectDraft,
) -> Result<Project, SemilleroError> {
    let user = acting_user(session, "creating a project")?;
    if !session.can_create_project() {
        return Err(SemilleroError::denied(format!(
            "role {} cannot create projects",
            user.role
        )));
    }
    validate_project(&draft.title, draft.progress, draft.budget)?;

    let semillero_id = draft
        .semillero_id
        .filter(|id| !id.is_empty())
        .or_else(|| session.selected_id().map(str::to_string))
        .or_else(|| user.semillero_id.clone())
        .ok_or_else(|| SemilleroError::invalid("project needs a semillero"))?;
    if !user.belongs_to(&semillero_id) {
        return Err(SemilleroError::denied(format!(
            "projects can only be created in your own semillero, not `{semillero_id}`"
        )));
    }

    let semillero_name = match store.find::<Semillero>(&semillero_id).await {
        Some(s) => s.name,
        None if user.belongs_to(&semillero_id) => user.semillero_name.clone().unwrap_or_default(),
        None => return Err(SemilleroError::not_found("Semillero", semillero_id)),
    };

    let team = if draft.team.is_empty() {
        vec![user.name.clone()]
    } else {
        draft.team
    };

    let project = store
        .create::<Project>(NewProject {
            title: draft.title,
            description: draft.description,
            status: draft.status,
            progress: draft.progress,
            budget: draft.budget,
            start_date: draft.start_date,
            end_date: draft.end_date,
            semillero_id,
            semillero_name,
            team,
            document_name: draft.document_name,
            created_by: user.id.clone(),
        })
        .await?;

    tracing::info!(project_id = %project.id, semillero_id = %project.semillero_id, "Created project");
    Ok(project)
}

/// Edit a project the acting student is a team member of.
pub async fn update_project<F>(
    store: &Store,
    session: &Session,
    id: &str,
    apply: F,
) -> Result<Project, SemilleroError>
where
    F: FnOnce(&mut Project),
{
    let Some(mut project) = store.find::<Project>(id).await else {
        return Err(SemilleroError::not_found("Project", id));
    };
    if !visibility::can_edit_project(session.user(), &project) {
        return Err(SemilleroError::denied(format!("editing project `{id}`")));
    }

    apply(&mut project);
    project.id = id.to_string();
    validate_project(&project.title, project.progress, project.budget)?;

    let edited = project.clone();
    if !store.update::<Project, _>(id, move |p| *p = edited).await? {
        return Err(SemilleroError::not_found("Project", id));
    }
    Ok(project)
}

pub async fn visible_projects(store: &Store, session: &Session) -> Vec<Project> {
    visibility::scoped(session.viewer(), store.list::<Project>().await)
}

/// Name of the project's document if the session may download it.
pub fn download_document<'p>(
    session: &Session,
    project: &'p Project,
) -> Result<&'p str, SemilleroError> {
    if !session.can_download(Some(&project.semillero_id)) {
        return Err(SemilleroError::denied(format!(
            "downloading documents of semillero `{}`",
            project.semillero_id
        )));
    }
    project
        .document_name
        .as_deref()
        .ok_or_else(|| SemilleroError::not_found("Document", project.id.clone()))
}

// ---------- Resources ----------

pub async fn visible_resources(store: &Store, session: &Session) -> Vec<Resource> {
    visibility::scoped(session.viewer(), store.list::<Resource>().await)
}

fn require_resource_manager(session: &Session, semillero_id: &str) -> Result<(), SemilleroError> {
    if session.can_manage_resources(Some(semillero_id)) {
        Ok(())
    } else {
        Err(SemilleroError::denied(format!(
            "managing resources of semillero `{semillero_id}`"
        )))
    }
}

/// `created_by` is overwritten with the acting user.
pub async fn create_resource(
    store: &Store,
    session: &Session,
    mut new: NewResource,
) -> Result<Resource, SemilleroError> {
    let user = acting_user(session, "creating a resource")?;
    require_resource_manager(session, &new.semillero_id)?;
    require_text(&new.name, "name")?;

    new.created_by = user.id.clone();
    store.create::<Resource>(new).await
}

/// The resource stays in its semillero; `apply` cannot move it elsewhere.
pub async fn update_resource<F>(
    store: &Store,
    session: &Session,
    id: &str,
    apply: F,
) -> Result<(), SemilleroError>
where
    F: FnOnce(&mut Resource),
{
    let Some(resource) = store.find::<Resource>(id).await else {
        return Err(SemilleroError::not_found("Resource", id));
    };
    require_resource_manager(session, &resource.semillero_id)?;

    let semillero_id = resource.semillero_id;
    store
        .update::<Resource, _>(id, move |r| {
            apply(r);
            r.semillero_id = semillero_id;
        })
        .await?;
    Ok(())
}

pub async fn delete_resource(
    store: &Store,
    session: &Session,
    id: &str,
) -> Result<(), SemilleroError> {
    let Some(resource) = store.find::<Resource>(id).await else {
        return Err(SemilleroError::not_found("Resource", id));
    };
    require_resource_manager(session, &resource.semillero_id)?;
    store.delete::<Resource>(id).await?;
    Ok(())
}

// ---------- Communication ----------

#[derive(Debug, Clone, Default)]
pub struct MessageDraft {
    /// Defaults to "Mensaje de <author>".
    pub title: Option<String>,
    pub content: String,
    pub is_general: bool,
    /// Ignored for general messages; otherwise falls back to the selection.
    pub semillero_id: Option<String>,
}

/// Resolve the semillero a non-general item is addressed to.
fn addressed_to(
    session: &Session,
    is_general: bool,
    semillero_id: Option<String>,
) -> Result<Option<String>, SemilleroError> {
    if is_general {
        return Ok(None);
    }
    semillero_id
        .or_else(|| session.selected_id().map(str::to_string))
        .map(Some)
        .ok_or_else(|| SemilleroError::invalid("choose a semillero or mark it as general"))
}

pub async fn post_message(
    store: &Store,
    session: &Session,
    draft: MessageDraft,
) -> Result<Message, SemilleroError> {
    let user = acting_user(session, "posting a message")?;
    require_text(&draft.content, "content")?;
    let semillero_id = addressed_to(session, draft.is_general, draft.semillero_id)?;

    let title = draft
        .title
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| format!("Mensaje de {}", user.name));

    store
        .create::<Message>(NewMessage {
            title,
            content: draft.content,
            author: user.name.clone(),
            author_id: user.id.clone(),
            semillero_id,
            is_general: draft.is_general,
        })
        .await
}

pub async fn add_reply(
    store: &Store,
    session: &Session,
    message_id: &str,
    content: &str,
) -> Result<Reply, SemilleroError> {
    let user = acting_user(session, "replying")?;
    require_text(content, "reply")?;

    let reply = Reply {
        id: random_id(),
        content: content.to_string(),
        author: user.name.clone(),
        author_id: user.id.clone(),
        created_at: Utc::now(),
    };
    let appended = reply.clone();
    if !store
        .update::<Message, _>(message_id, move |m| m.replies.push(appended))
        .await?
    {
        return Err(SemilleroError::not_found("Message", message_id));
    }
    Ok(reply)
}

pub async fn visible_messages(store: &Store, session: &Session) -> Vec<Message> {
    visibility::addressed(session.viewer(), store.list::<Message>().await)
}

#[derive(Debug, Clone, Default)]
pub struct MeetingDraft {
    pub title: String,
    pub description: String,
    pub date: Option<NaiveDate>,
    /// `HH:MM`
    pub time: String,
    /// Room name or video link.
    pub location: Option<String>,
    pub is_general: bool,
    pub semillero_id: Option<String>,
}

pub async fn schedule_meeting(
    store: &Store,
    session: &Session,
    draft: MeetingDraft,
) -> Result<Meeting, SemilleroError> {
    let user = acting_user(session, "scheduling a meeting")?;
    require_text(&draft.title, "title")?;
    require_text(&draft.time, "time")?;
    let date = draft
        .date
        .ok_or_else(|| SemilleroError::invalid("date is required"))?;
    let semillero_id = addressed_to(session, draft.is_general, draft.semillero_id)?;

    let location = draft
        .location
        .filter(|l| !l.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_LOCATION.to_string());

    let meeting = store
        .create::<Meeting>(NewMeeting {
            title: draft.title,
            description: draft.description,
            date,
            time: draft.time,
            location,
            semillero_id,
            is_general: draft.is_general,
            organizer: user.name.clone(),
            organizer_id: user.id.clone(),
            attendees: vec![user.name.clone()],
        })
        .await?;

    tracing::info!(meeting_id = %meeting.id, is_virtual = meeting.is_virtual(), "Scheduled meeting");
    Ok(meeting)
}

pub async fn visible_meetings(store: &Store, session: &Session) -> Vec<Meeting> {
    visibility::addressed(session.viewer(), store.list::<Meeting>().await)
}

// ---------- Outreach ----------

fn require_content_manager<'a>(
    session: &'a Session,
    action: &str,
) -> Result<&'a User, SemilleroError> {
    let user = acting_user(session, action)?;
    if !session.can_manage_content() {
        return Err(SemilleroError::denied(format!(
            "{action} is reserved to professors and administrators"
        )));
    }
    Ok(user)
}

/// Events and collaborations are public; anyone may list them.
pub async fn list_events(store: &Store) -> Vec<Event> {
    store.list::<Event>().await
}

pub async fn list_collaborations(store: &Store) -> Vec<Collaboration> {
    store.list::<Collaboration>().await
}

pub async fn create_event(
    store: &Store,
    session: &Session,
    mut new: NewEvent,
) -> Result<Event, SemilleroError> {
    let user = require_content_manager(session, "publishing an event")?;
    require_text(&new.title, "title")?;
    new.created_by = user.id.clone();
    store.create::<Event>(new).await
}

pub async fn create_collaboration(
    store: &Store,
    session: &Session,
    mut new: NewCollaboration,
) -> Result<Collaboration, SemilleroError> {
    let user = require_content_manager(session, "registering a collaboration")?;
    require_text(&new.title, "title")?;
    require_text(&new.institution, "institution")?;
    new.created_by = user.id.clone();
    store.create::<Collaboration>(new).await
}

pub async fn delete_event(store: &Store, session: &Session, id: &str) -> Result<(), SemilleroError> {
    require_content_manager(session, "deleting an event")?;
    if !store.delete::<Event>(id).await? {
        return Err(SemilleroError::not_found("Event", id));
    }
    tracing::info!(event_id = id, "Deleted event");
    Ok(())
}

pub async fn delete_collaboration(
    store: &Store,
    session: &Session,
    id: &str,
) -> Result<(), SemilleroError> {
    require_content_manager(session, "deleting a collaboration")?;
    if !store.delete::<Collaboration>(id).await? {
        return Err(SemilleroError::not_found("Collaboration", id));
    }
    tracing::info!(collaboration_id = id, "Deleted collaboration");
    Ok(())
}
