pub mod roles;
pub mod section;
pub mod visibility;

pub use section::Section;

use crate::model::{Role, User};

/// The capability checks every role answers.
///
/// Implementations are stateless; the acting user and the target semillero
/// are passed in so any (user, target) pair can be checked without touching
/// session state.
pub trait Capabilities {
    fn can_access(&self, user: &User, section: &Section, target: Option<&str>) -> bool;
    fn can_download(&self, user: &User, target: Option<&str>) -> bool;
    fn can_create_project(&self) -> bool;
    fn can_manage_resources(&self, user: &User, target: Option<&str>) -> bool;
}

/// Rules for `role`.
pub fn policy(role: Role) -> &'static dyn Capabilities {
    match role {
        Role::Administrador => &roles::Administrator,
        Role::Profesor => &roles::Professor,
        Role::Estudiante => &roles::Student,
        Role::Visitante => &roles::Visitor,
    }
}

/// An empty target names no semillero and is treated as omitted.
pub fn named_target(target: Option<&str>) -> Option<&str> {
    target.filter(|t| !t.is_empty())
}

// Entry points taking an optional user: no user is always denied.

pub fn can_access(user: Option<&User>, section: &Section, target: Option<&str>) -> bool {
    let target = named_target(target);
    user.is_some_and(|u| policy(u.role).can_access(u, section, target))
}

pub fn can_download(user: Option<&User>, target: Option<&str>) -> bool {
    let target = named_target(target);
    user.is_some_and(|u| policy(u.role).can_download(u, target))
}

pub fn can_create_project(user: Option<&User>) -> bool {
    user.is_some_and(|u| policy(u.role).can_create_project())
}

pub fn can_manage_resources(user: Option<&User>, target: Option<&str>) -> bool {
    let target = named_target(target);
    user.is_some_and(|u| policy(u.role).can_manage_resources(u, target))
}

/// Outreach events and collaborations are curated by staff.
pub fn can_manage_content(user: Option<&User>) -> bool {
    matches!(
        user.map(|u| u.role),
        Some(Role::Administrador | Role::Profesor)
    )
}

/// Students and semilleros are managed by professors and administrators.
pub fn can_manage_students(user: Option<&User>) -> bool {
    can_manage_content(user)
}

/// Sidebar sections shown to `user`.
pub fn navigation(user: Option<&User>) -> Vec<Section> {
    let Some(u) = user else {
        return Vec::new();
    };
    Section::NAVIGATION
        .into_iter()
        .filter(|section| {
            // Students never see the group and user directories in the menu
            !(u.role == Role::Estudiante
                && matches!(section, Section::Semilleros | Section::Usuarios))
        })
        .filter(|section| can_access(user, section, None))
        .collect()
}
