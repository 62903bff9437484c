use serde_json::{json, Value};

use crate::errors::SemilleroError;
use crate::model::{
    Collaboration, Event, Meeting, Message, Project, Resource, Semillero, Student,
};
use crate::storage::{Record, Store};

/// Populate every empty collection with the sample data set (idempotent).
///
/// Collections that already hold records are left untouched, so calling this
/// on every startup never rewrites existing data.
pub async fn initialize_sample_data(store: &Store) -> Result<(), SemilleroError> {
    let mut seeded = Vec::new();

    let collections = [
        (seed_if_empty::<Semillero>(store, semilleros()).await?, Semillero::COLLECTION),
        (seed_if_empty::<Student>(store, students()).await?, Student::COLLECTION),
        (seed_if_empty::<Project>(store, projects()).await?, Project::COLLECTION),
        (seed_if_empty::<Resource>(store, resources()).await?, Resource::COLLECTION),
        (seed_if_empty::<Message>(store, messages()).await?, Message::COLLECTION),
        (seed_if_empty::<Meeting>(store, meetings()).await?, Meeting::COLLECTION),
        (seed_if_empty::<Event>(store, events()).await?, Event::COLLECTION),
        (
            seed_if_empty::<Collaboration>(store, collaborations()).await?,
            Collaboration::COLLECTION,
        ),
    ];
    for (was_seeded, name) in collections {
        if was_seeded {
            seeded.push(name);
        }
    }

    if seeded.is_empty() {
        tracing::debug!("Sample data already present");
    } else {
        tracing::info!(collections = ?seeded, "Seeded sample data");
    }
    Ok(())
}

async fn seed_if_empty<T: Record>(store: &Store, sample: Value) -> Result<bool, SemilleroError> {
    // An unreadable collection is left alone rather than overwritten
    match store.try_list::<T>().await {
        Ok(existing) if existing.is_empty() => {}
        Ok(_) => return Ok(false),
        Err(e) => {
            tracing::warn!(collection = T::COLLECTION, error = %e, "Skipping seed of unreadable collection");
            return Ok(false);
        }
    }
    let records: Vec<T> = serde_json::from_value(sample)?;
    store.replace_all(&records).await?;
    Ok(true)
}

fn semilleros() -> Value {
    json!([
        {
            "id": "1",
            "name": "Inteligencia Artificial y Educación",
            "description": "Investigación en IA aplicada a procesos educativos",
            "coordinatorId": "2",
            "coordinator": "Dr. García Martínez",
            "members": 12
        },
        {
            "id": "2",
            "name": "Sostenibilidad y Medio Ambiente",
            "description": "Estudios de impacto ambiental y sostenibilidad urbana",
            "coordinatorId": "5",
            "coordinator": "Dra. Martínez López",
            "members": 8
        },
        {
            "id": "3",
            "name": "Blockchain y Fintech",
            "description": "Tecnologías blockchain aplicadas a sistemas financieros",
            "coordinatorId": "6",
            "coordinator": "Ing. Pérez Ramírez",
            "members": 10
        },
        {
            "id": "4",
            "name": "Biotecnología Médica",
            "description": "Investigación en biotecnología aplicada a la medicina",
            "coordinatorId": "7",
            "coordinator": "Dr. Silva Torres",
            "members": 15
        }
    ])
}

fn students() -> Value {
    json!([
        {
            "id": "1",
            "name": "Carlos Rodríguez",
            "email": "carlos@unilibre.edu.co",
            "semilleroId": "1",
            "semilleroName": "Inteligencia Artificial y Educación",
            "status": "activo",
            "createdBy": "2"
        },
        {
            "id": "2",
            "name": "Ana Martínez",
            "email": "ana@unilibre.edu.co",
            "semilleroId": "1",
            "semilleroName": "Inteligencia Artificial y Educación",
            "status": "activo",
            "createdBy": "2"
        },
        {
            "id": "3",
            "name": "María Estudiante",
            "email": "maria@unilibre.edu.co",
            "semilleroId": "1",
            "semilleroName": "Inteligencia Artificial y Educación",
            "status": "activo",
            "createdBy": "2"
        },
        {
            "id": "4",
            "name": "Luis Pérez",
            "email": "luis@unilibre.edu.co",
            "semilleroId": "2",
            "semilleroName": "Sostenibilidad y Medio Ambiente",
            "status": "pendiente",
            "createdBy": "1"
        },
        {
            "id": "5",
            "name": "Sofía Gómez",
            "email": "sofia@unilibre.edu.co",
            "semilleroId": "3",
            "semilleroName": "Blockchain y Fintech",
            "status": "inactivo",
            "createdBy": "1"
        }
    ])
}

fn projects() -> Value {
    json!([
        {
            "id": "1",
            "title": "Sistema de Recomendación Educativa",
            "description": "Desarrollo de un sistema de IA para recomendar contenido educativo personalizado",
            "status": "en-progreso",
            "progress": 65,
            "budget": 15000.0,
            "startDate": "2024-01-15",
            "endDate": "2024-06-30",
            "semilleroId": "1",
            "semilleroName": "Inteligencia Artificial y Educación",
            "team": ["Dr. García Martínez", "María Estudiante", "Carlos Rodríguez"],
            "documentName": "propuesta_sistema_recomendacion.pdf",
            "createdBy": "3",
            "createdAt": "2024-01-15T10:00:00Z"
        },
        {
            "id": "2",
            "title": "Análisis de Huella de Carbono Universitaria",
            "description": "Estudio del impacto ambiental de las actividades universitarias",
            "status": "planificacion",
            "progress": 25,
            "budget": 8000.0,
            "startDate": "2024-03-01",
            "endDate": "2024-08-15",
            "semilleroId": "2",
            "semilleroName": "Sostenibilidad y Medio Ambiente",
            "team": ["Dra. Martínez López", "Luis Pérez"],
            "createdBy": "3",
            "createdAt": "2024-02-20T14:30:00Z"
        },
        {
            "id": "3",
            "title": "Plataforma de Aprendizaje Adaptativo",
            "description": "Desarrollo de una plataforma que se adapta al ritmo de aprendizaje del estudiante",
            "status": "completado",
            "progress": 100,
            "budget": 12000.0,
            "startDate": "2023-09-01",
            "endDate": "2024-01-30",
            "semilleroId": "1",
            "semilleroName": "Inteligencia Artificial y Educación",
            "team": ["Dr. García Martínez", "María Estudiante", "Ana Torres"],
            "documentName": "plataforma_adaptativa_final.pdf",
            "createdBy": "3",
            "createdAt": "2023-09-01T08:00:00Z"
        }
    ])
}

fn resources() -> Value {
    json!([
        {
            "id": "1",
            "name": "Servidor de Procesamiento",
            "type": "equipo",
            "status": "en-uso",
            "projectId": "1",
            "projectName": "Sistema de Recomendación Educativa",
            "semilleroId": "1",
            "assignedTo": "María Estudiante",
            "description": "Servidor dedicado para procesamiento de algoritmos de IA",
            "createdBy": "2",
            "createdAt": "2024-01-20T10:00:00Z"
        },
        {
            "id": "2",
            "name": "Presupuesto Investigación Q1",
            "type": "presupuesto",
            "status": "disponible",
            "projectId": "2",
            "projectName": "Análisis de Huella de Carbono",
            "semilleroId": "2",
            "description": "Presupuesto asignado para el primer trimestre de investigación",
            "createdBy": "2",
            "createdAt": "2024-02-01T14:00:00Z"
        }
    ])
}

fn messages() -> Value {
    json!([
        {
            "id": "1",
            "title": "Reunión Semanal - Avances del Proyecto",
            "content": "Recordatorio de la reunión semanal para revisar avances del sistema de recomendación educativa.",
            "author": "Dr. García Martínez",
            "authorId": "2",
            "semilleroId": "1",
            "isGeneral": false,
            "createdAt": "2024-01-22T09:00:00Z",
            "replies": [
                {
                    "id": "1",
                    "content": "Perfecto, estaré presente con el reporte de avances.",
                    "author": "María Estudiante",
                    "authorId": "3",
                    "createdAt": "2024-01-22T10:30:00Z"
                }
            ]
        },
        {
            "id": "2",
            "title": "Convocatoria General - Congreso de Investigación",
            "content": "Se abre la convocatoria para participar en el congreso anual de investigación universitaria.",
            "author": "Administrador Sistema",
            "authorId": "1",
            "isGeneral": true,
            "createdAt": "2024-01-25T16:00:00Z",
            "replies": []
        }
    ])
}

fn meetings() -> Value {
    json!([
        {
            "id": "1",
            "title": "Revisión de Avances - Sistema IA",
            "description": "Reunión para revisar el progreso del sistema de recomendación educativa",
            "date": "2024-02-15",
            "time": "14:00",
            "location": "Sala de Juntas 201",
            "semilleroId": "1",
            "isGeneral": false,
            "organizer": "Dr. García Martínez",
            "organizerId": "2",
            "attendees": ["María Estudiante", "Carlos Rodríguez"],
            "createdAt": "2024-01-30T11:00:00Z"
        }
    ])
}

fn events() -> Value {
    json!([
        {
            "id": "1",
            "title": "Congreso Internacional de IA",
            "description": "Presentación de avances en inteligencia artificial aplicada a la educación",
            "date": "2024-05-15",
            "location": "Auditorio Principal",
            "type": "congreso",
            "organizer": "Semillero IA y Educación",
            "createdBy": "2",
            "createdAt": "2024-01-10T09:00:00Z"
        },
        {
            "id": "2",
            "title": "Taller de Sostenibilidad",
            "description": "Taller práctico sobre metodologías de investigación en sostenibilidad",
            "date": "2024-03-20",
            "location": "Laboratorio de Ciencias",
            "type": "taller",
            "organizer": "Semillero Sostenibilidad",
            "createdBy": "2",
            "createdAt": "2024-02-01T15:00:00Z"
        }
    ])
}

fn collaborations() -> Value {
    json!([
        {
            "id": "1",
            "title": "Proyecto Conjunto con Universidad Nacional",
            "institution": "Universidad Nacional de Colombia",
            "description": "Investigación colaborativa en sistemas inteligentes para educación",
            "status": "activa",
            "startDate": "2024-01-01",
            "contact": "Dr. Rodríguez",
            "email": "rodriguez@unal.edu.co",
            "createdBy": "1",
            "createdAt": "2023-12-15T16:00:00Z"
        },
        {
            "id": "2",
            "title": "Alianza con Ministerio de Ambiente",
            "institution": "Ministerio de Ambiente y Desarrollo Sostenible",
            "description": "Colaboración en proyectos de investigación ambiental universitaria",
            "status": "pendiente",
            "startDate": "2024-04-01",
            "contact": "Ing. Martínez",
            "email": "martinez@minambiente.gov.co",
            "createdBy": "1",
            "createdAt": "2024-01-15T12:00:00Z"
        }
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryBackend;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_seed_populates_every_collection() {
        let store = Store::in_memory();
        initialize_sample_data(&store).await.unwrap();

        assert_eq!(store.list::<Semillero>().await.len(), 4);
        assert_eq!(store.list::<Student>().await.len(), 5);
        assert_eq!(store.list::<Project>().await.len(), 3);
        assert_eq!(store.list::<Resource>().await.len(), 2);
        assert_eq!(store.list::<Message>().await.len(), 2);
        assert_eq!(store.list::<Meeting>().await.len(), 1);
        assert_eq!(store.list::<Event>().await.len(), 2);
        assert_eq!(store.list::<Collaboration>().await.len(), 2);

        let first = store.find::<Message>("1").await.unwrap();
        assert_eq!(first.replies.len(), 1);
    }

    #[tokio::test]
    async fn test_seed_is_idempotent_byte_for_byte() {
        let backend = Arc::new(MemoryBackend::new());
        let store = Store::new(backend.clone(), "semillero_");

        initialize_sample_data(&store).await.unwrap();
        let first = backend.snapshot();
        initialize_sample_data(&store).await.unwrap();
        let second = backend.snapshot();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_seed_leaves_populated_collections_alone() {
        let store = Store::in_memory();
        initialize_sample_data(&store).await.unwrap();
        assert!(store.delete::<Event>("1").await.unwrap());

        initialize_sample_data(&store).await.unwrap();

        let events = store.list::<Event>().await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].id, "2");
    }

    #[tokio::test]
    async fn test_seed_keeps_corrupt_collection() {
        let backend = Arc::new(MemoryBackend::new());
        crate::storage::Backend::set(backend.as_ref(), "semillero_events", "{not json")
            .await
            .unwrap();
        let store = Store::new(backend.clone(), "semillero_");

        initialize_sample_data(&store).await.unwrap();

        assert_eq!(
            backend.snapshot().get("semillero_events").map(String::as_str),
            Some("{not json")
        );
        assert_eq!(store.list::<Project>().await.len(), 3);
    }

    #[tokio::test]
    async fn test_seed_refills_emptied_collection() {
        let store = Store::in_memory();
        initialize_sample_data(&store).await.unwrap();
        store.replace_all::<Meeting>(&[]).await.unwrap();

        initialize_sample_data(&store).await.unwrap();
        assert_eq!(store.list::<Meeting>().await.len(), 1);
    }
}
