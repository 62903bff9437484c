use std::convert::Infallible;
use std::str::FromStr;

/// A top-level area of the dashboard.
///
/// Unknown names parse to [`Section::Other`] so checks against arbitrary
/// strings stay total.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Section {
    Dashboard,
    Proyectos,
    Recursos,
    Comunicacion,
    Seguimiento,
    Divulgacion,
    Semilleros,
    Usuarios,
    Estudiantes,
    Configuracion,
    Ayuda,
    Other(String),
}

impl Section {
    /// Sidebar entries, in display order.
    pub const NAVIGATION: [Section; 9] = [
        Section::Dashboard,
        Section::Proyectos,
        Section::Recursos,
        Section::Comunicacion,
        Section::Seguimiento,
        Section::Divulgacion,
        Section::Semilleros,
        Section::Usuarios,
        Section::Ayuda,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            Section::Dashboard => "dashboard",
            Section::Proyectos => "proyectos",
            Section::Recursos => "recursos",
            Section::Comunicacion => "comunicacion",
            Section::Seguimiento => "seguimiento",
            Section::Divulgacion => "divulgacion",
            Section::Semilleros => "semilleros",
            Section::Usuarios => "usuarios",
            Section::Estudiantes => "estudiantes",
            Section::Configuracion => "configuracion",
            Section::Ayuda => "ayuda",
            Section::Other(name) => name,
        }
    }

    /// Sections a member may still open while looking at another group.
    pub fn is_cross_group(&self) -> bool {
        matches!(
            self,
            Section::Proyectos | Section::Recursos | Section::Divulgacion
        )
    }
}

impl FromStr for Section {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "dashboard" | "" => Section::Dashboard,
            "proyectos" => Section::Proyectos,
            "recursos" => Section::Recursos,
            "comunicacion" => Section::Comunicacion,
            "seguimiento" => Section::Seguimiento,
            "divulgacion" => Section::Divulgacion,
            "semilleros" => Section::Semilleros,
            "usuarios" => Section::Usuarios,
            "estudiantes" => Section::Estudiantes,
            "configuracion" => Section::Configuracion,
            "ayuda" => Section::Ayuda,
            other => Section::Other(other.to_string()),
        })
    }
}

impl From<&str> for Section {
    fn from(s: &str) -> Self {
        match s.parse() {
            Ok(section) => section,
            Err(never) => match never {},
        }
    }
}

impl std::fmt::Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
