//! Semilleros, students and user accounts, gated by role.

use crate::authz::{self, visibility};
use crate::credentials;
use crate::errors::SemilleroError;
use crate::model::{NewSemillero, NewStudent, NewUser, Role, Semillero, Student, StudentStatus, User};
use crate::session::Session;
use crate::storage::Store;

fn acting_user<'a>(session: &'a Session, action: &str) -> Result<&'a User, SemilleroError> {
    session
        .user()
        .ok_or_else(|| SemilleroError::denied(format!("{action} requires a logged in user")))
}

fn require_staff<'a>(session: &'a Session, action: &str) -> Result<&'a User, SemilleroError> {
    let user = acting_user(session, action)?;
    if !authz::can_manage_students(Some(user)) {
        return Err(SemilleroError::denied(format!(
            "{action} is reserved to professors and administrators"
        )));
    }
    Ok(user)
}

fn require_admin<'a>(session: &'a Session, action: &str) -> Result<&'a User, SemilleroError> {
    let user = acting_user(session, action)?;
    if user.role != Role::Administrador {
        return Err(SemilleroError::denied(format!(
            "{action} is reserved to administrators"
        )));
    }
    Ok(user)
}

fn require_text(value: &str, field: &str) -> Result<(), SemilleroError> {
    if value.trim().is_empty() {
        return Err(SemilleroError::invalid(format!("{field} is required")));
    }
    Ok(())
}

/// A coordinator is a professor or administrator, either compiled in or
/// created at runtime.
async fn coordinator_is_professor(store: &Store, user_id: &str) -> bool {
    if credentials::is_professor_capable(user_id) {
        return true;
    }
    store
        .list::<User>()
        .await
        .iter()
        .any(|u| u.id == user_id && matches!(u.role, Role::Profesor | Role::Administrador))
}

async fn require_coordinator(store: &Store, coordinator_id: &str) -> Result<(), SemilleroError> {
    if !coordinator_is_professor(store, coordinator_id).await {
        return Err(SemilleroError::invalid(format!(
            "coordinator `{coordinator_id}` is not a professor"
        )));
    }
    Ok(())
}

// ---------- Semilleros ----------

pub async fn list_semilleros(store: &Store) -> Vec<Semillero> {
    store.list::<Semillero>().await
}

pub async fn create_semillero(
    store: &Store,
    session: &Session,
    new: NewSemillero,
) -> Result<Semillero, SemilleroError> {
    require_staff(session, "creating a semillero")?;
    require_text(&new.name, "name")?;
    require_coordinator(store, &new.coordinator_id).await?;

    let semillero = store.create::<Semillero>(new).await?;
    tracing::info!(semillero_id = %semillero.id, name = %semillero.name, "Created semillero");
    Ok(semillero)
}

pub async fn update_semillero<F>(
    store: &Store,
    session: &Session,
    id: &str,
    apply: F,
) -> Result<(), SemilleroError>
where
    F: FnOnce(&mut Semillero),
{
    require_admin(session, "updating a semillero")?;
    let Some(mut edited) = store.find::<Semillero>(id).await else {
        return Err(SemilleroError::not_found("Semillero", id));
    };
    apply(&mut edited);
    edited.id = id.to_string();
    require_text(&edited.name, "name")?;
    require_coordinator(store, &edited.coordinator_id).await?;

    if !store.update::<Semillero, _>(id, move |s| *s = edited).await? {
        return Err(SemilleroError::not_found("Semillero", id));
    }
    Ok(())
}

pub async fn delete_semillero(
    store: &Store,
    session: &Session,
    id: &str,
) -> Result<(), SemilleroError> {
    require_admin(session, "deleting a semillero")?;
    if !store.delete::<Semillero>(id).await? {
        return Err(SemilleroError::not_found("Semillero", id));
    }
    tracing::info!(semillero_id = id, "Deleted semillero");
    Ok(())
}

// ---------- Students ----------

/// Register a student. `created_by` is overwritten with the acting user.
pub async fn create_student(
    store: &Store,
    session: &Session,
    mut new: NewStudent,
) -> Result<Student, SemilleroError> {
    let user = require_staff(session, "creating a student")?;
    require_text(&new.name, "name")?;
    require_text(&new.email, "email")?;
    require_text(&new.semillero_id, "semillero")?;

    new.created_by = user.id.clone();
    store.create::<Student>(new).await
}

pub async fn students_by_semillero(
    store: &Store,
    session: &Session,
    semillero_id: &str,
) -> Vec<Student> {
    visibility::students_of(session.user(), semillero_id, store.list::<Student>().await)
}

pub async fn update_student_status(
    store: &Store,
    session: &Session,
    student_id: &str,
    status: StudentStatus,
) -> Result<(), SemilleroError> {
    require_staff(session, "changing a student's status")?;
    if !store
        .update::<Student, _>(student_id, |s| s.status = status)
        .await?
    {
        return Err(SemilleroError::not_found("Student", student_id));
    }
    Ok(())
}

// ---------- Users ----------

/// Compiled-in accounts followed by the ones created at runtime.
pub async fn list_users(store: &Store) -> Vec<User> {
    let mut users = credentials::directory_users();
    users.extend(store.list::<User>().await);
    users
}

/// Create a user account.
///
/// Administrators create any role; professors only students of their own
/// group. Student accounts need a semillero and are also registered in the
/// student roster.
pub async fn create_user(
    store: &Store,
    session: &Session,
    new: NewUser,
) -> Result<User, SemilleroError> {
    let actor = require_staff(session, "creating a user")?;
    require_text(&new.name, "name")?;
    require_text(&new.email, "email")?;

    if actor.role == Role::Profesor {
        let own_group = new
            .semillero_id
            .as_deref()
            .is_some_and(|id| actor.belongs_to(id));
        if new.role != Role::Estudiante || !own_group {
            return Err(SemilleroError::denied(
                "professors may only create students of their own semillero",
            ));
        }
    }

    let roster_entry = match (&new.role, &new.semillero_id) {
        (Role::Estudiante, None) => {
            return Err(SemilleroError::invalid("students must belong to a semillero"));
        }
        (Role::Estudiante, Some(semillero_id)) => {
            require_text(semillero_id, "semillero")?;
            Some(NewStudent {
                name: new.name.clone(),
                email: new.email.clone(),
                semillero_id: semillero_id.clone(),
                semillero_name: new.semillero_name.clone().unwrap_or_default(),
                status: StudentStatus::Activo,
                created_by: actor.id.clone(),
            })
        }
        _ => None,
    };

    // The account is written first; a roster entry never exists without it
    let user = store.create::<User>(new).await?;
    if let Some(entry) = roster_entry {
        if let Err(e) = store.create::<Student>(entry).await {
            tracing::warn!(user_id = %user.id, error = %e, "Roster write failed, removing user");
            store.delete::<User>(&user.id).await?;
            return Err(e);
        }
    }
    tracing::info!(user_id = %user.id, role = %user.role, "Created user");
    Ok(user)
}
