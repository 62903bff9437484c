use crate::authz::{self, visibility::Viewer, Section};
use crate::credentials;
use crate::errors::SemilleroError;
use crate::model::{Role, Semillero, User};
use crate::seed;
use crate::storage::Store;

/// Storage key of the authenticated user.
pub const USER_KEY: &str = "user";
/// Storage key of the selected semillero.
pub const SELECTED_SEMILLERO_KEY: &str = "selectedSemillero";

/// Who is acting and which semillero they are looking at.
///
/// Passed explicitly to every gated operation; nothing reads it from ambient
/// state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    user: Option<User>,
    selected: Option<Semillero>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoginOutcome {
    pub user: User,
    /// Set when the user's own semillero was found and auto-selected.
    pub selected: Option<Semillero>,
    /// Forced navigation the front end must perform.
    pub redirect: Option<Section>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// A session for `user` with nothing selected.
    pub fn for_user(user: User) -> Self {
        Self {
            user: Some(user),
            selected: None,
        }
    }

    pub fn with_selected(mut self, semillero: Semillero) -> Self {
        self.selected = Some(semillero);
        self
    }

    /// Reload the persisted session (e.g. after a restart).
    pub async fn restore(store: &Store) -> Self {
        let user = store.read_value::<User>(USER_KEY).await;
        let selected = store.read_value::<Semillero>(SELECTED_SEMILLERO_KEY).await;
        Self { user, selected }
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn selected(&self) -> Option<&Semillero> {
        self.selected.as_ref()
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_ref().map(|s| s.id.as_str())
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn viewer(&self) -> Viewer<'_> {
        Viewer::new(self.user(), self.selected_id())
    }

    /// Professors and students must pick a semillero before any protected
    /// content is shown.
    pub fn requires_semillero_selection(&self) -> bool {
        matches!(
            self.user.as_ref().map(|u| u.role),
            Some(Role::Profesor | Role::Estudiante)
        ) && self.selected.is_none()
    }

    /// Match the credentials table and start a session.
    ///
    /// Returns `Ok(None)` when no account matches; the current session is
    /// left untouched in that case.
    pub async fn login(
        &mut self,
        store: &Store,
        email: &str,
        password: &str,
    ) -> Result<Option<LoginOutcome>, SemilleroError> {
        let Some(user) = credentials::authenticate(email, password) else {
            tracing::info!(email, "Login rejected");
            return Ok(None);
        };

        store.write_value(USER_KEY, &user).await?;
        store.remove_value(SELECTED_SEMILLERO_KEY).await?;
        self.user = Some(user.clone());
        self.selected = None;

        seed::initialize_sample_data(store).await?;

        if matches!(user.role, Role::Profesor | Role::Estudiante) {
            if let Some(own_id) = user.semillero_id.as_deref() {
                if let Some(semillero) = store.find::<Semillero>(own_id).await {
                    store.write_value(SELECTED_SEMILLERO_KEY, &semillero).await?;
                    self.selected = Some(semillero);
                }
            }
        }

        let redirect = (user.role == Role::Visitante).then_some(Section::Divulgacion);

        tracing::info!(
            user_id = %user.id,
            role = %user.role,
            selected = ?self.selected_id(),
            "User logged in"
        );

        Ok(Some(LoginOutcome {
            user,
            selected: self.selected.clone(),
            redirect,
        }))
    }

    /// Clear the session and its persisted copies.
    pub async fn logout(&mut self, store: &Store) -> Result<(), SemilleroError> {
        if let Some(user) = &self.user {
            tracing::info!(user_id = %user.id, "User logged out");
        }
        self.user = None;
        self.selected = None;
        store.remove_value(USER_KEY).await?;
        store.remove_value(SELECTED_SEMILLERO_KEY).await?;
        Ok(())
    }

    /// Switch the working semillero.
    ///
    /// A professor's home group follows the selection: the user record is
    /// rewritten to point at `semillero` and persisted with it. Students may
    /// only select their own group; visitors and anonymous sessions cannot
    /// select at all.
    pub async fn select_semillero(
        &mut self,
        store: &Store,
        semillero: Semillero,
    ) -> Result<(), SemilleroError> {
        let Some(user) = self.user.as_mut() else {
            return Err(SemilleroError::denied("select a semillero without logging in"));
        };

        match user.role {
            Role::Profesor => {
                user.semillero_id = Some(semillero.id.clone());
                user.semillero_name = Some(semillero.name.clone());
                store.write_value(USER_KEY, &*user).await?;
            }
            Role::Estudiante if !user.belongs_to(&semillero.id) => {
                return Err(SemilleroError::denied(
                    "students cannot switch to another semillero",
                ));
            }
            Role::Estudiante | Role::Administrador => {}
            Role::Visitante => {
                return Err(SemilleroError::denied("visitors cannot select a semillero"));
            }
        }

        store.write_value(SELECTED_SEMILLERO_KEY, &semillero).await?;
        tracing::info!(user_id = %user.id, semillero_id = %semillero.id, "Selected semillero");
        self.selected = Some(semillero);
        Ok(())
    }

    // Capability checks against this session.

    pub fn can_access(&self, section: impl Into<Section>, target: Option<&str>) -> bool {
        authz::can_access(self.user(), &section.into(), target)
    }

    /// [`Session::can_access`] as a gate for operations that read a section.
    pub fn require_access(
        &self,
        section: impl Into<Section>,
        target: Option<&str>,
    ) -> Result<(), SemilleroError> {
        let section = section.into();
        if !authz::can_access(self.user(), &section, target) {
            return Err(SemilleroError::denied(format!(
                "no access to section `{}`",
                section.as_str()
            )));
        }
        Ok(())
    }

    pub fn can_download(&self, target: Option<&str>) -> bool {
        authz::can_download(self.user(), target)
    }

    pub fn can_create_project(&self) -> bool {
        authz::can_create_project(self.user())
    }

    /// An omitted target falls back to the selected semillero.
    pub fn can_manage_resources(&self, target: Option<&str>) -> bool {
        let target = authz::named_target(target).or(self.selected_id());
        authz::can_manage_resources(self.user(), target)
    }

    pub fn can_manage_content(&self) -> bool {
        authz::can_manage_content(self.user())
    }

    pub fn navigation(&self) -> Vec<Section> {
        authz::navigation(self.user())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bad_credentials_leave_session_untouched() {
        let store = Store::in_memory();
        let mut session = Session::anonymous();

        let outcome = session
            .login(&store, "garcia@unilibre.edu.co", "nope")
            .await
            .unwrap();

        assert!(outcome.is_none());
        assert!(!session.is_authenticated());
        assert!(store.read_value::<User>(USER_KEY).await.is_none());
    }

    #[tokio::test]
    async fn test_professor_login_auto_selects() {
        let store = Store::in_memory();
        let mut session = Session::anonymous();

        let outcome = session
            .login(&store, "garcia@unilibre.edu.co", "prof123")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(outcome.selected.as_ref().map(|s| s.id.as_str()), Some("1"));
        assert!(outcome.redirect.is_none());
        assert_eq!(session.selected_id(), Some("1"));
        assert!(!session.requires_semillero_selection());
    }

    #[tokio::test]
    async fn test_visitor_login_redirects() {
        let store = Store::in_memory();
        let mut session = Session::anonymous();

        let outcome = session
            .login(&store, "visitante@external.com", "visit123")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(outcome.redirect, Some(Section::Divulgacion));
        assert!(outcome.selected.is_none());
        assert!(!session.requires_semillero_selection());
    }

    #[tokio::test]
    async fn test_admin_login_selects_nothing() {
        let store = Store::in_memory();
        let mut session = Session::anonymous();

        session
            .login(&store, "admin@unilibre.edu.co", "admin123")
            .await
            .unwrap()
            .unwrap();

        assert!(session.selected().is_none());
        assert!(!session.requires_semillero_selection());
        assert!(store
            .read_value::<Semillero>(SELECTED_SEMILLERO_KEY)
            .await
            .is_none());
    }

    #[tokio::test]
    async fn test_restore_reads_persisted_state() {
        let store = Store::in_memory();
        let mut session = Session::anonymous();
        session
            .login(&store, "maria@unilibre.edu.co", "est123")
            .await
            .unwrap();

        let restored = Session::restore(&store).await;
        assert_eq!(restored, session);
    }

    #[tokio::test]
    async fn test_logout_clears_everything() {
        let store = Store::in_memory();
        let mut session = Session::anonymous();
        session
            .login(&store, "garcia@unilibre.edu.co", "prof123")
            .await
            .unwrap();

        session.logout(&store).await.unwrap();

        assert_eq!(session, Session::anonymous());
        assert_eq!(Session::restore(&store).await, Session::anonymous());
    }

    #[tokio::test]
    async fn test_student_cannot_switch_group() {
        let store = Store::in_memory();
        let mut session = Session::anonymous();
        session
            .login(&store, "maria@unilibre.edu.co", "est123")
            .await
            .unwrap();

        let other = store.find::<Semillero>("2").await.unwrap();
        let err = session.select_semillero(&store, other).await.unwrap_err();
        assert!(matches!(err, SemilleroError::PermissionDenied(_)));
        assert_eq!(session.selected_id(), Some("1"));
    }

    #[tokio::test]
    async fn test_anonymous_cannot_select() {
        let store = Store::in_memory();
        seed::initialize_sample_data(&store).await.unwrap();
        let semillero = store.find::<Semillero>("1").await.unwrap();

        let mut session = Session::anonymous();
        assert!(session.select_semillero(&store, semillero).await.is_err());
    }

    #[tokio::test]
    async fn test_manage_resources_falls_back_to_selection() {
        let store = Store::in_memory();
        seed::initialize_sample_data(&store).await.unwrap();
        let own = store.find::<Semillero>("1").await.unwrap();
        let other = store.find::<Semillero>("2").await.unwrap();

        let prof = credentials::authenticate("garcia@unilibre.edu.co", "prof123").unwrap();
        let session = Session::for_user(prof.clone()).with_selected(own);
        assert!(session.can_manage_resources(None));

        // Selection and home group drifted apart (admin-style browsing)
        let session = Session::for_user(prof).with_selected(other);
        assert!(!session.can_manage_resources(None));
        assert!(session.can_manage_resources(Some("1")));
    }

    #[tokio::test]
    async fn test_empty_resource_target_uses_selection() {
        let store = Store::in_memory();
        seed::initialize_sample_data(&store).await.unwrap();
        let other = store.find::<Semillero>("2").await.unwrap();

        let prof = credentials::authenticate("garcia@unilibre.edu.co", "prof123").unwrap();
        let session = Session::for_user(prof).with_selected(other);
        assert_eq!(
            session.can_manage_resources(Some("")),
            session.can_manage_resources(None)
        );
        assert!(!session.can_manage_resources(Some("")));
    }

    #[tokio::test]
    async fn test_require_access_gates_sections() {
        let visitor = credentials::authenticate("visitante@external.com", "visit123").unwrap();
        let session = Session::for_user(visitor);
        assert!(session.require_access(Section::Divulgacion, None).is_ok());
        assert!(matches!(
            session.require_access(Section::Proyectos, None),
            Err(SemilleroError::PermissionDenied(_))
        ));

        let student = credentials::authenticate("maria@unilibre.edu.co", "est123").unwrap();
        let session = Session::for_user(student);
        assert!(session.require_access(Section::Seguimiento, Some("1")).is_ok());
        assert!(session.require_access(Section::Seguimiento, Some("2")).is_err());
        assert!(session.require_access(Section::Usuarios, None).is_err());

        assert!(Session::anonymous().require_access("divulgacion", None).is_err());
    }
}
