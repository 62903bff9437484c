//! Per-role capability rules.
//!
//! Each role is its own type so its rules can be read and tested in
//! isolation. `target` is the semillero the check is about; `None` means the
//! caller did not name one.

use crate::authz::{Capabilities, Section};
use crate::model::User;

/// Full access everywhere.
#[derive(Debug, Clone, Copy, Default)]
pub struct Administrator;

/// Coordinates the group currently recorded on the user.
#[derive(Debug, Clone, Copy, Default)]
pub struct Professor;

/// Permanently bound to one group.
#[derive(Debug, Clone, Copy, Default)]
pub struct Student;

/// External reader limited to the outreach section.
#[derive(Debug, Clone, Copy, Default)]
pub struct Visitor;

/// Resolve an omitted target to the user's own group.
fn resolve<'a>(user: &'a User, target: Option<&'a str>) -> Option<&'a str> {
    target.or(user.semillero_id.as_deref())
}

fn is_own_group(user: &User, target: Option<&str>) -> bool {
    resolve(user, target) == user.semillero_id.as_deref()
}

/// Shared professor/student rule: everything inside the own group, only the
/// cross-group sections elsewhere.
fn member_can_access(user: &User, section: &Section, target: Option<&str>) -> bool {
    is_own_group(user, target) || section.is_cross_group()
}

/// Members download freely in the public context and only from their own
/// group otherwise.
fn member_can_download(user: &User, target: Option<&str>) -> bool {
    match target {
        None => true,
        Some(id) => user.belongs_to(id),
    }
}

impl Capabilities for Administrator {
    fn can_access(&self, _user: &User, _section: &Section, _target: Option<&str>) -> bool {
        true
    }

    fn can_download(&self, _user: &User, _target: Option<&str>) -> bool {
        true
    }

    fn can_create_project(&self) -> bool {
        false
    }

    fn can_manage_resources(&self, _user: &User, _target: Option<&str>) -> bool {
        true
    }
}

impl Capabilities for Professor {
    fn can_access(&self, user: &User, section: &Section, target: Option<&str>) -> bool {
        member_can_access(user, section, target)
    }

    fn can_download(&self, user: &User, target: Option<&str>) -> bool {
        member_can_download(user, target)
    }

    fn can_create_project(&self) -> bool {
        false
    }

    fn can_manage_resources(&self, user: &User, target: Option<&str>) -> bool {
        is_own_group(user, target)
    }
}

impl Capabilities for Student {
    fn can_access(&self, user: &User, section: &Section, target: Option<&str>) -> bool {
        if matches!(section, Section::Usuarios | Section::Configuracion) {
            return false;
        }
        member_can_access(user, section, target)
    }

    fn can_download(&self, user: &User, target: Option<&str>) -> bool {
        member_can_download(user, target)
    }

    // Only students create projects; professors and administrators do not.
    fn can_create_project(&self) -> bool {
        true
    }

    fn can_manage_resources(&self, _user: &User, _target: Option<&str>) -> bool {
        false
    }
}

impl Capabilities for Visitor {
    fn can_access(&self, _user: &User, section: &Section, _target: Option<&str>) -> bool {
        *section == Section::Divulgacion
    }

    fn can_download(&self, _user: &User, _target: Option<&str>) -> bool {
        false
    }

    fn can_create_project(&self) -> bool {
        false
    }

    fn can_manage_resources(&self, _user: &User, _target: Option<&str>) -> bool {
        false
    }
}
