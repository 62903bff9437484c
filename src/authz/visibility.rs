//! Which records a viewer sees, given the selected semillero.

use crate::model::{Audience, Meeting, Message, Project, Resource, Role, Student, User};

/// The acting user together with the semillero currently selected.
#[derive(Debug, Clone, Copy, Default)]
pub struct Viewer<'a> {
    pub user: Option<&'a User>,
    pub selected: Option<&'a str>,
}

impl<'a> Viewer<'a> {
    pub fn new(user: Option<&'a User>, selected: Option<&'a str>) -> Self {
        Self { user, selected }
    }

    fn is_admin(&self) -> bool {
        self.user.is_some_and(|u| u.role == Role::Administrador)
    }
}

/// Records owned by exactly one semillero.
pub trait GroupScoped {
    fn semillero_id(&self) -> &str;
}

impl GroupScoped for Project {
    fn semillero_id(&self) -> &str {
        &self.semillero_id
    }
}

impl GroupScoped for Resource {
    fn semillero_id(&self) -> &str {
        &self.semillero_id
    }
}

/// Records addressed either to everyone or to one semillero.
pub trait Addressed {
    fn audience(&self) -> Audience<'_>;
}

impl Addressed for Message {
    fn audience(&self) -> Audience<'_> {
        Message::audience(self)
    }
}

impl Addressed for Meeting {
    fn audience(&self) -> Audience<'_> {
        Meeting::audience(self)
    }
}

/// Administrators see every group; everyone else sees the selected group
/// only, and nothing before selecting one.
pub fn scoped<T: GroupScoped>(viewer: Viewer<'_>, records: Vec<T>) -> Vec<T> {
    if viewer.is_admin() {
        return records;
    }
    let Some(selected) = viewer.selected else {
        return Vec::new();
    };
    records
        .into_iter()
        .filter(|r| r.semillero_id() == selected)
        .collect()
}

/// Administrators see everything; others see general items plus the ones
/// addressed to the selected group.
pub fn addressed<T: Addressed>(viewer: Viewer<'_>, records: Vec<T>) -> Vec<T> {
    if viewer.is_admin() {
        return records;
    }
    records
        .into_iter()
        .filter(|r| match r.audience() {
            Audience::General => true,
            Audience::Semillero(id) => viewer.selected == Some(id),
            Audience::Unassigned => false,
        })
        .collect()
}

/// Students of `semillero_id` the user may list: administrators any group,
/// professors their own, nobody else.
pub fn students_of(user: Option<&User>, semillero_id: &str, students: Vec<Student>) -> Vec<Student> {
    let allowed = match user {
        Some(u) if u.role == Role::Administrador => true,
        Some(u) if u.role == Role::Profesor => u.belongs_to(semillero_id),
        _ => false,
    };
    if !allowed {
        return Vec::new();
    }
    students
        .into_iter()
        .filter(|s| s.semillero_id == semillero_id)
        .collect()
}

/// Students edit projects of their own group they are a team member of.
pub fn can_edit_project(user: Option<&User>, project: &Project) -> bool {
    let Some(u) = user else {
        return false;
    };
    if u.role != Role::Estudiante || !u.belongs_to(&project.semillero_id) {
        return false;
    }
    let name = u.name.to_lowercase();
    project
        .team
        .iter()
        .any(|member| member.to_lowercase().contains(&name))
}
