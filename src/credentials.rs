//! Fixed account table login matches against. Never persisted or modified.

use crate::model::{Role, User};

#[derive(Debug, Clone, Copy)]
pub struct Credential {
    pub id: &'static str,
    pub name: &'static str,
    pub email: &'static str,
    pub password: &'static str,
    pub role: Role,
    /// (semillero id, semillero name)
    pub semillero: Option<(&'static str, &'static str)>,
}

impl Credential {
    pub fn to_user(&self) -> User {
        User {
            id: self.id.to_string(),
            name: self.name.to_string(),
            email: self.email.to_string(),
            role: self.role,
            semillero_id: self.semillero.map(|(id, _)| id.to_string()),
            semillero_name: self.semillero.map(|(_, name)| name.to_string()),
        }
    }
}

pub const ACCOUNTS: [Credential; 7] = [
    Credential {
        id: "1",
        name: "Admin Sistema",
        email: "admin@unilibre.edu.co",
        password: "admin123",
        role: Role::Administrador,
        semillero: None,
    },
    Credential {
        id: "2",
        name: "Dr. García Martínez",
        email: "garcia@unilibre.edu.co",
        password: "prof123",
        role: Role::Profesor,
        semillero: Some(("1", "Inteligencia Artificial y Educación")),
    },
    Credential {
        id: "3",
        name: "María Estudiante",
        email: "maria@unilibre.edu.co",
        password: "est123",
        role: Role::Estudiante,
        semillero: Some(("1", "Inteligencia Artificial y Educación")),
    },
    Credential {
        id: "4",
        name: "Visitante Externo",
        email: "visitante@external.com",
        password: "visit123",
        role: Role::Visitante,
        semillero: None,
    },
    Credential {
        id: "5",
        name: "Dra. Martínez López",
        email: "martinez@unilibre.edu.co",
        password: "prof123",
        role: Role::Profesor,
        semillero: Some(("2", "Sostenibilidad y Medio Ambiente")),
    },
    Credential {
        id: "6",
        name: "Ing. Pérez Ramírez",
        email: "perez@unilibre.edu.co",
        password: "prof123",
        role: Role::Profesor,
        semillero: Some(("3", "Blockchain y Fintech")),
    },
    Credential {
        id: "7",
        name: "Dr. Silva Torres",
        email: "silva@unilibre.edu.co",
        password: "prof123",
        role: Role::Profesor,
        semillero: Some(("4", "Biotecnología Médica")),
    },
];

/// Exact email and password match.
pub fn authenticate(email: &str, password: &str) -> Option<User> {
    ACCOUNTS
        .iter()
        .find(|c| c.email == email && c.password == password)
        .map(Credential::to_user)
}

/// The account table without passwords.
pub fn directory_users() -> Vec<User> {
    ACCOUNTS.iter().map(Credential::to_user).collect()
}

/// Professors who may coordinate a semillero.
pub fn is_professor_capable(user_id: &str) -> bool {
    ACCOUNTS
        .iter()
        .any(|c| c.id == user_id && matches!(c.role, Role::Profesor | Role::Administrador))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authenticate_exact_match() {
        let user = authenticate("garcia@unilibre.edu.co", "prof123").unwrap();
        assert_eq!(user.id, "2");
        assert_eq!(user.role, Role::Profesor);
        assert_eq!(user.semillero_id.as_deref(), Some("1"));

        assert!(authenticate("garcia@unilibre.edu.co", "wrong").is_none());
        assert!(authenticate("GARCIA@unilibre.edu.co", "prof123").is_none());
        assert!(authenticate("", "").is_none());
    }

    #[test]
    fn test_directory_has_every_role() {
        let users = directory_users();
        assert_eq!(users.len(), ACCOUNTS.len());
        for role in Role::ALL {
            assert!(users.iter().any(|u| u.role == role), "missing {role}");
        }
    }

    #[test]
    fn test_professor_capable() {
        assert!(is_professor_capable("2"));
        assert!(is_professor_capable("1"));
        assert!(!is_professor_capable("3"));
        assert!(!is_professor_capable("999"));
    }
}
