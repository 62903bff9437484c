mod helpers;

use helpers::{SessionBuilder, UserBuilder};
use semillero::authz::{self, Section};
use semillero::credentials;
use semillero::model::Role;

const SECTIONS: [&str; 13] = [
    "dashboard",
    "proyectos",
    "recursos",
    "comunicacion",
    "seguimiento",
    "divulgacion",
    "semilleros",
    "usuarios",
    "estudiantes",
    "configuracion",
    "ayuda",
    "",
    "no-such-section",
];

const TARGETS: [Option<&str>; 4] = [None, Some("1"), Some("2"), Some("999")];

#[test]
fn test_admin_accesses_every_section() {
    let admin = UserBuilder::new(Role::Administrador).build();
    for section in SECTIONS {
        for target in TARGETS {
            assert!(
                authz::can_access(Some(&admin), &Section::from(section), target),
                "admin denied {section:?} for {target:?}"
            );
        }
    }
}

#[test]
fn test_visitor_only_reaches_divulgacion() {
    let visitor = UserBuilder::new(Role::Visitante).build();
    for section in SECTIONS {
        for target in TARGETS {
            let allowed = authz::can_access(Some(&visitor), &Section::from(section), target);
            assert_eq!(allowed, section == "divulgacion", "{section:?} for {target:?}");
        }
    }
}

#[test]
fn test_members_own_and_other_groups() {
    for role in [Role::Profesor, Role::Estudiante] {
        let user = UserBuilder::new(role).in_semillero("1").build();
        let user = Some(&user);

        assert!(authz::can_access(user, &Section::Proyectos, Some("1")));
        assert!(authz::can_access(user, &Section::Proyectos, Some("2")));
        assert!(authz::can_access(user, &Section::Recursos, Some("2")));
        assert!(authz::can_access(user, &Section::Divulgacion, Some("2")));
        assert!(!authz::can_access(user, &Section::Comunicacion, Some("2")));
        assert!(!authz::can_access(user, &Section::Seguimiento, Some("2")));
        assert!(!authz::can_access(user, &Section::Semilleros, Some("2")));

        // No target resolves to the user's own group
        assert!(authz::can_access(user, &Section::Comunicacion, None));
    }
}

#[test]
fn test_student_restricted_sections() {
    let student = UserBuilder::new(Role::Estudiante).in_semillero("1").build();
    for target in TARGETS {
        assert!(!authz::can_access(Some(&student), &Section::Usuarios, target));
        assert!(!authz::can_access(Some(&student), &Section::Configuracion, target));
    }

    let professor = UserBuilder::new(Role::Profesor).in_semillero("1").build();
    assert!(authz::can_access(Some(&professor), &Section::Usuarios, Some("1")));
}

#[test]
fn test_no_user_is_denied_everything() {
    for section in SECTIONS {
        for target in TARGETS {
            assert!(!authz::can_access(None, &Section::from(section), target));
            assert!(!authz::can_download(None, target));
            assert!(!authz::can_manage_resources(None, target));
        }
    }
    assert!(!authz::can_create_project(None));
    assert!(authz::navigation(None).is_empty());
}

#[test]
fn test_only_students_create_projects() {
    for role in Role::ALL {
        let user = UserBuilder::new(role).in_semillero("1").build();
        assert_eq!(
            authz::can_create_project(Some(&user)),
            role == Role::Estudiante,
            "{role}"
        );
    }
}

#[test]
fn test_download_rules() {
    for role in [Role::Profesor, Role::Estudiante] {
        let user = UserBuilder::new(role).in_semillero("1").build();
        assert!(authz::can_download(Some(&user), Some("1")));
        assert!(!authz::can_download(Some(&user), Some("2")));
        assert!(authz::can_download(Some(&user), None));
    }

    let admin = UserBuilder::new(Role::Administrador).build();
    let visitor = UserBuilder::new(Role::Visitante).build();
    for target in TARGETS {
        assert!(authz::can_download(Some(&admin), target));
        assert!(!authz::can_download(Some(&visitor), target));
    }
}

#[test]
fn test_resource_management_rules() {
    let admin = UserBuilder::new(Role::Administrador).build();
    let professor = UserBuilder::new(Role::Profesor).in_semillero("1").build();
    let student = UserBuilder::new(Role::Estudiante).in_semillero("1").build();
    let visitor = UserBuilder::new(Role::Visitante).build();

    for target in [Some("1"), Some("2"), Some("999")] {
        assert!(authz::can_manage_resources(Some(&admin), target));
        assert_eq!(
            authz::can_manage_resources(Some(&professor), target),
            target == Some("1")
        );
        assert!(!authz::can_manage_resources(Some(&student), target));
        assert!(!authz::can_manage_resources(Some(&visitor), target));
    }
}

#[test]
fn test_session_checks_use_selection_for_resources() {
    let professor = UserBuilder::new(Role::Profesor).in_semillero("1").build();

    let own = SessionBuilder::for_user(professor.clone()).selecting("1").build();
    assert!(own.can_manage_resources(None));

    let other = SessionBuilder::for_user(professor).selecting("2").build();
    assert!(!other.can_manage_resources(None));

    let anonymous = SessionBuilder::anonymous().build();
    assert!(!anonymous.can_access("divulgacion", None));
}

#[test]
fn test_navigation_per_account() {
    let nav = |email: &str, password: &str| -> Vec<Section> {
        let user = credentials::authenticate(email, password).expect("known account");
        authz::navigation(Some(&user))
    };

    assert_eq!(nav("admin@unilibre.edu.co", "admin123"), Section::NAVIGATION.to_vec());
    assert_eq!(
        nav("visitante@external.com", "visit123"),
        vec![Section::Divulgacion]
    );

    let student = nav("maria@unilibre.edu.co", "est123");
    assert!(!student.contains(&Section::Semilleros));
    assert!(!student.contains(&Section::Usuarios));
    assert!(student.contains(&Section::Proyectos));

    let professor = nav("garcia@unilibre.edu.co", "prof123");
    assert!(professor.contains(&Section::Semilleros));
    assert!(professor.contains(&Section::Usuarios));
}
