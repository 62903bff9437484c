mod helpers;

use helpers::TestStore;
use semillero::authz::Section;
use semillero::content::{self, MessageDraft};
use semillero::model::{Semillero, User};
use semillero::session::{Session, SELECTED_SEMILLERO_KEY, USER_KEY};

#[tokio::test]
async fn test_professor_switches_home_group() {
    let test_store = TestStore::file();
    let store = test_store.store();
    let mut session = Session::anonymous();

    let outcome = session
        .login(store, "garcia@unilibre.edu.co", "prof123")
        .await
        .expect("Failed to log in")
        .expect("Known account rejected");
    assert_eq!(outcome.selected.map(|s| s.id), Some("1".to_string()));

    let group_two = store
        .find::<Semillero>("2")
        .await
        .expect("Seeded semillero missing");
    session
        .select_semillero(store, group_two)
        .await
        .expect("Failed to select semillero");

    let user = session.user().expect("Session lost its user");
    assert_eq!(user.semillero_id.as_deref(), Some("2"));
    assert_eq!(
        user.semillero_name.as_deref(),
        Some("Sostenibilidad y Medio Ambiente")
    );

    let persisted: User = store
        .read_value(USER_KEY)
        .await
        .expect("User not persisted");
    assert_eq!(persisted.semillero_id.as_deref(), Some("2"));
    let selected: Semillero = store
        .read_value(SELECTED_SEMILLERO_KEY)
        .await
        .expect("Selection not persisted");
    assert_eq!(selected.id, "2");

    // The new home group now drives the capability checks
    assert!(session.can_manage_resources(Some("2")));
    assert!(!session.can_manage_resources(Some("1")));
    assert!(!session.can_access(Section::Comunicacion, Some("1")));
}

#[tokio::test]
async fn test_student_denied_usuarios() {
    let test_store = TestStore::file();
    let store = test_store.store();
    let mut session = Session::anonymous();

    session
        .login(store, "maria@unilibre.edu.co", "est123")
        .await
        .expect("Failed to log in")
        .expect("Known account rejected");

    assert!(!session.can_access("usuarios", None));
    assert!(session.can_access("proyectos", Some("1")));
    assert!(session.can_create_project());
}

#[tokio::test]
async fn test_session_survives_restart() {
    let test_store = TestStore::sqlite().await;
    let store = test_store.store();

    let mut session = Session::anonymous();
    session
        .login(store, "martinez@unilibre.edu.co", "prof123")
        .await
        .expect("Failed to log in")
        .expect("Known account rejected");

    let restored = Session::restore(store).await;
    assert_eq!(restored, session);
    assert_eq!(restored.selected_id(), Some("2"));

    let visible = content::visible_projects(store, &restored).await;
    assert!(visible.iter().all(|p| p.semillero_id == "2"));
    assert!(!visible.is_empty());
}

#[tokio::test]
async fn test_logout_evicts_persisted_session() {
    let test_store = TestStore::file();
    let store = test_store.store();
    let mut session = Session::anonymous();

    session
        .login(store, "admin@unilibre.edu.co", "admin123")
        .await
        .expect("Failed to log in")
        .expect("Known account rejected");
    session.logout(store).await.expect("Failed to log out");

    assert!(!session.is_authenticated());
    assert!(store.read_value::<User>(USER_KEY).await.is_none());
    assert!(!Session::restore(store).await.is_authenticated());

    let denied = content::post_message(
        store,
        &session,
        MessageDraft {
            content: "Hola".into(),
            is_general: true,
            ..Default::default()
        },
    )
    .await;
    assert!(denied.is_err());
}

#[tokio::test]
async fn test_login_seeds_sample_data() {
    let test_store = TestStore::file();
    let store = test_store.store();
    assert!(store.is_empty::<Semillero>().await);

    let mut session = Session::anonymous();
    session
        .login(store, "visitante@external.com", "visit123")
        .await
        .expect("Failed to log in")
        .expect("Known account rejected");

    assert_eq!(store.list::<Semillero>().await.len(), 4);
    assert_eq!(session.navigation(), vec![Section::Divulgacion]);
    assert_eq!(content::list_events(store).await.len(), 2);
}
