use clinica_core::db::open_db_in_memory;
use clinica_core::{
    validate_record, CrudError, CrudService, Laboratorio, Laboratory, OperationalState, Resource,
    Sample, SqliteResourceRepository,
};
use rusqlite::Connection;

type Service<'conn, R> = CrudService<R, SqliteResourceRepository<'conn, R>>;

fn service<R: Resource>(conn: &Connection) -> Service<'_, R> {
    CrudService::new(SqliteResourceRepository::new(conn))
}

fn laboratory(name: &str, description: &str, state: OperationalState) -> Laboratory {
    Laboratory {
        id: None,
        name: name.to_string(),
        description: description.to_string(),
        state,
    }
}

fn laboratorio(nombre: &str, tipo: &str) -> Laboratorio {
    Laboratorio {
        id: None,
        nombre: nombre.to_string(),
        descripcion: "Analisis clinicos".to_string(),
        tipo: tipo.to_string(),
        capacidad: 50,
        estado: OperationalState::Activo,
        tipo_analisis: "Rutina".to_string(),
    }
}

fn sample(code: &str, technician: &str, laboratory: &str) -> Sample {
    Sample {
        id: None,
        code: code.to_string(),
        description: "Tubo rojo".to_string(),
        technician: technician.to_string(),
        laboratory: laboratory.to_string(),
    }
}

#[test]
fn create_then_get_returns_equal_record() {
    let conn = open_db_in_memory().unwrap();
    let laboratories = service::<Laboratory>(&conn);

    let created = laboratories
        .create(laboratory("Hemato", "Sangre", OperationalState::Activo))
        .unwrap();
    assert!(created.id.unwrap() >= 1);
    assert_eq!(created.name, "Hemato");

    let loaded = laboratories.get(created.id.unwrap()).unwrap();
    assert_eq!(loaded, created);
}

#[test]
fn create_rejects_case_insensitive_duplicate() {
    let conn = open_db_in_memory().unwrap();
    let laboratories = service::<Laboratory>(&conn);

    laboratories
        .create(laboratory("Hemato", "Sangre", OperationalState::Activo))
        .unwrap();
    let err = laboratories
        .create(laboratory("hEMATO", "Otra cosa", OperationalState::Inactivo))
        .unwrap_err();

    assert!(matches!(
        err,
        CrudError::DuplicateKey {
            resource: "laboratory",
            ..
        }
    ));
    assert_eq!(laboratories.list().unwrap().len(), 1);
}

#[test]
fn duplicate_scan_folds_non_ascii_case() {
    let conn = open_db_in_memory().unwrap();
    let samples = service::<Sample>(&conn);

    samples.create(sample("MUESTRA-Ñ1", "T", "L")).unwrap();
    let err = samples.create(sample("muestra-ñ1", "T", "L")).unwrap_err();
    assert!(matches!(err, CrudError::DuplicateKey { .. }));
}

#[test]
fn create_discards_caller_identity() {
    let conn = open_db_in_memory().unwrap();
    let samples = service::<Sample>(&conn);

    let mut record = sample("S0001", "T", "L");
    record.id = Some(99);
    let created = samples.create(record).unwrap();

    assert_eq!(created.id, Some(1));
    assert!(matches!(
        samples.get(99).unwrap_err(),
        CrudError::NotFound { id: 99, .. }
    ));
}

#[test]
fn create_reports_only_invalid_fields() {
    let conn = open_db_in_memory().unwrap();
    let laboratorios = service::<Laboratorio>(&conn);

    let mut record = laboratorio("Laboratorio Central", "Hematologia");
    record.capacidad = 0;
    let err = laboratorios.create(record).unwrap_err();

    match err {
        CrudError::Validation(errors) => {
            assert_eq!(errors.fields().len(), 1);
            assert!(errors.get("capacidad").is_some());
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(laboratorios.list().unwrap().is_empty());
}

#[test]
fn update_copies_mutable_fields_and_keeps_path_identity() {
    let conn = open_db_in_memory().unwrap();
    let laboratories = service::<Laboratory>(&conn);

    let created = laboratories
        .create(laboratory("Hemato", "Sangre", OperationalState::Activo))
        .unwrap();
    let id = created.id.unwrap();

    let mut incoming = laboratory("Hemato2", "Sangre2", OperationalState::Inactivo);
    incoming.id = Some(id + 100);
    let updated = laboratories.update(id, incoming).unwrap();

    assert_eq!(updated.id, Some(id));
    assert_eq!(updated.name, "Hemato2");
    assert_eq!(updated.state, OperationalState::Inactivo);
    assert_eq!(laboratories.get(id).unwrap(), updated);
    assert_eq!(laboratories.list().unwrap().len(), 1);
}

#[test]
fn update_with_same_fields_is_identity() {
    let conn = open_db_in_memory().unwrap();
    let laboratorios = service::<Laboratorio>(&conn);

    let created = laboratorios
        .create(laboratorio("Laboratorio Central", "Hematologia"))
        .unwrap();
    let id = created.id.unwrap();

    laboratorios.update(id, created.clone()).unwrap();
    assert_eq!(laboratorios.get(id).unwrap(), created);
}

#[test]
fn update_sample_replaces_snapshots() {
    let conn = open_db_in_memory().unwrap();
    let samples = service::<Sample>(&conn);

    let created = samples.create(sample("S0001", "Ana", "Central")).unwrap();
    let id = created.id.unwrap();

    samples
        .update(id, sample("S0001", "Luis", "Norte"))
        .unwrap();
    let loaded = samples.get(id).unwrap();
    assert_eq!(loaded.technician, "Luis");
    assert_eq!(loaded.laboratory, "Norte");
}

#[test]
fn update_missing_record_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let laboratories = service::<Laboratory>(&conn);

    let err = laboratories
        .update(5, laboratory("Hemato", "Sangre", OperationalState::Activo))
        .unwrap_err();
    assert!(matches!(err, CrudError::NotFound { id: 5, .. }));
    assert!(laboratories.list().unwrap().is_empty());
}

#[test]
fn update_validates_before_lookup() {
    let conn = open_db_in_memory().unwrap();
    let laboratories = service::<Laboratory>(&conn);

    let err = laboratories
        .update(5, laboratory("abc", "Sangre", OperationalState::Activo))
        .unwrap_err();
    assert!(matches!(err, CrudError::Validation(_)));
}

#[test]
fn update_onto_another_records_key_is_rejected_by_store() {
    let conn = open_db_in_memory().unwrap();
    let laboratories = service::<Laboratory>(&conn);

    laboratories
        .create(laboratory("Hemato", "Sangre", OperationalState::Activo))
        .unwrap();
    let second = laboratories
        .create(laboratory("Quimica", "Reactivos", OperationalState::Activo))
        .unwrap();

    let err = laboratories
        .update(
            second.id.unwrap(),
            laboratory("HEMATO", "Reactivos", OperationalState::Activo),
        )
        .unwrap_err();
    assert!(matches!(err, CrudError::DuplicateKey { .. }));
}

#[test]
fn update_may_change_case_of_own_key() {
    let conn = open_db_in_memory().unwrap();
    let laboratories = service::<Laboratory>(&conn);

    let created = laboratories
        .create(laboratory("Hemato", "Sangre", OperationalState::Activo))
        .unwrap();
    let updated = laboratories
        .update(
            created.id.unwrap(),
            laboratory("HEMATO", "Sangre", OperationalState::Activo),
        )
        .unwrap();
    assert_eq!(updated.name, "HEMATO");
}

#[test]
fn delete_then_get_and_second_delete_are_not_found() {
    let conn = open_db_in_memory().unwrap();
    let samples = service::<Sample>(&conn);

    let created = samples.create(sample("S0001", "T", "L")).unwrap();
    let id = created.id.unwrap();

    samples.delete(id).unwrap();
    assert!(matches!(samples.get(id).unwrap_err(), CrudError::NotFound { .. }));
    assert!(matches!(
        samples.delete(id).unwrap_err(),
        CrudError::NotFound { .. }
    ));
}

#[test]
fn filter_returns_exactly_matching_records() {
    let conn = open_db_in_memory().unwrap();
    let laboratorios = service::<Laboratorio>(&conn);

    laboratorios
        .create(laboratorio("Laboratorio Uno", "Hematologia"))
        .unwrap();
    laboratorios
        .create(laboratorio("Laboratorio Dos", "Bioquimica"))
        .unwrap();
    laboratorios
        .create(laboratorio("Laboratorio Tres", "Hematologia"))
        .unwrap();

    let all = laboratorios.list().unwrap();
    for tipo in ["Hematologia", "Bioquimica", "hematologia", "Microbiologia"] {
        let expected: Vec<_> = all.iter().filter(|lab| lab.tipo == tipo).cloned().collect();
        assert_eq!(laboratorios.filter(tipo).unwrap(), expected, "tipo={tipo}");
    }
}

#[test]
fn filter_after_update_no_longer_matches_old_state() {
    let conn = open_db_in_memory().unwrap();
    let laboratories = service::<Laboratory>(&conn);

    let created = laboratories
        .create(laboratory("Hemato", "Sangre", OperationalState::Activo))
        .unwrap();
    laboratories
        .update(
            created.id.unwrap(),
            laboratory("Hemato2", "Sangre2", OperationalState::Inactivo),
        )
        .unwrap();

    assert!(laboratories.filter("ACTIVO").unwrap().is_empty());
    assert_eq!(laboratories.filter("INACTIVO").unwrap().len(), 1);
}

#[test]
fn listed_records_satisfy_constraints_and_unique_keys() {
    let conn = open_db_in_memory().unwrap();
    let samples = service::<Sample>(&conn);

    for code in ["S0001", "s0001", "S0002", "S0003", "S0002"] {
        let _ = samples.create(sample(code, "T", "L"));
    }

    let listed = samples.list().unwrap();
    assert_eq!(listed.len(), 3);
    for record in &listed {
        validate_record(record).unwrap();
    }
    for (index, left) in listed.iter().enumerate() {
        for right in &listed[index + 1..] {
            assert_ne!(left.code.to_lowercase(), right.code.to_lowercase());
        }
    }
}
