use semillero::model::{Role, Semillero, User};
use semillero::session::Session;

/// Builder for users outside the compiled-in account table
pub struct UserBuilder {
    id: String,
    name: String,
    role: Role,
    semillero_id: Option<String>,
}

impl UserBuilder {
    pub fn new(role: Role) -> Self {
        Self {
            id: "100".to_string(),
            name: format!("Usuario {role}"),
            role,
            semillero_id: None,
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = id.to_string();
        self
    }

    pub fn named(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn in_semillero(mut self, semillero_id: &str) -> Self {
        self.semillero_id = Some(semillero_id.to_string());
        self
    }

    pub fn build(self) -> User {
        User {
            email: format!("{}@unilibre.edu.co", self.id),
            semillero_name: self.semillero_id.as_ref().map(|id| format!("Semillero {id}")),
            id: self.id,
            name: self.name,
            role: self.role,
            semillero_id: self.semillero_id,
        }
    }
}

/// Minimal semillero record with the given id
pub fn semillero(id: &str) -> Semillero {
    Semillero {
        id: id.to_string(),
        name: format!("Semillero {id}"),
        description: String::new(),
        coordinator_id: "2".to_string(),
        coordinator: "Dr. García Martínez".to_string(),
        members: 0,
    }
}

/// Builder for sessions without going through login
pub struct SessionBuilder {
    user: Option<User>,
    selected: Option<Semillero>,
}

impl SessionBuilder {
    pub fn anonymous() -> Self {
        Self {
            user: None,
            selected: None,
        }
    }

    pub fn for_user(user: User) -> Self {
        Self {
            user: Some(user),
            selected: None,
        }
    }

    pub fn selecting(mut self, semillero_id: &str) -> Self {
        self.selected = Some(semillero(semillero_id));
        self
    }

    pub fn build(self) -> Session {
        let session = match self.user {
            Some(user) => Session::for_user(user),
            None => Session::anonymous(),
        };
        match self.selected {
            Some(selected) => session.with_selected(selected),
            None => session,
        }
    }
}
