use rusqlite::Connection;
use thickness_core::db::schema::SCHEMA_VERSION;
use thickness_core::db::{open_db_in_memory, DbError};
use thickness_core::{
    MaterialRecord, OrbitalRecord, RecordKey, RecordValidationError, ReferenceRepository,
    ReferenceService, RepoError, SqliteReferenceRepository,
};

#[test]
fn seeded_records_are_listed() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteReferenceRepository::try_new(&conn).unwrap();

    assert_eq!(
        repo.list_orbitals().unwrap(),
        vec![OrbitalRecord::new("Mo3d", 0.1303, 1486.6)]
    );
    assert_eq!(
        repo.list_materials().unwrap(),
        vec![MaterialRecord::new("MoS2", 5.06, 160.07)]
    );
}

#[test]
fn add_orbital_then_lookup_returns_exact_value() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteReferenceRepository::try_new(&conn).unwrap();

    let record = OrbitalRecord::new("S2p", 0.0673, 1253.6);
    repo.add_orbital(&record).unwrap();

    assert_eq!(repo.lookup_cross_section("S2p", 1253.6).unwrap(), Some(0.0673));
}

#[test]
fn cross_section_lookup_requires_exact_energy() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteReferenceRepository::try_new(&conn).unwrap();

    assert_eq!(repo.lookup_cross_section("Mo3d", 1486.6).unwrap(), Some(0.1303));
    assert_eq!(repo.lookup_cross_section("Mo3d", 1486.7).unwrap(), None);
    assert_eq!(repo.lookup_cross_section("Mo3", 1486.6).unwrap(), None);
    assert_eq!(repo.lookup_cross_section("mo3d", 1486.6).unwrap(), None);
}

#[test]
fn material_lookups_miss_without_default() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteReferenceRepository::try_new(&conn).unwrap();

    assert_eq!(repo.lookup_density("MoS2").unwrap(), Some(5.06));
    assert_eq!(repo.lookup_molar_mass("MoS2").unwrap(), Some(160.07));
    assert_eq!(repo.lookup_density("WS2").unwrap(), None);
    assert_eq!(repo.lookup_molar_mass("MoS").unwrap(), None);
}

#[test]
fn add_material_twice_returns_duplicate_key() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteReferenceRepository::try_new(&conn).unwrap();

    repo.add_material(&MaterialRecord::new("WS2", 7.5, 247.97))
        .unwrap();
    let err = repo
        .add_material(&MaterialRecord::new("WS2", 7.6, 248.0))
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::DuplicateKey(RecordKey::Material { ref name }) if name == "WS2"
    ));
    assert_eq!(repo.lookup_density("WS2").unwrap(), Some(7.5));
}

#[test]
fn orbital_uniqueness_is_per_name_and_energy() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteReferenceRepository::try_new(&conn).unwrap();

    repo.add_orbital(&OrbitalRecord::new("Mo3d", 0.0959, 1253.6))
        .unwrap();
    let err = repo
        .add_orbital(&OrbitalRecord::new("Mo3d", 0.2, 1486.6))
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::DuplicateKey(RecordKey::Orbital { ref name, energy })
            if name == "Mo3d" && energy == 1486.6
    ));
    assert_eq!(repo.list_orbitals().unwrap().len(), 2);
}

#[test]
fn padded_names_are_trimmed_before_write() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteReferenceRepository::try_new(&conn).unwrap();

    repo.add_material(&MaterialRecord {
        material_name: " WS2 ".to_string(),
        density: 7.5,
        molar_mass: 247.97,
    })
    .unwrap();
    repo.add_orbital(&OrbitalRecord {
        orbital_name: "\tW4f\n".to_string(),
        excitation_energy: 1486.6,
        cross_section: 0.1765,
    })
    .unwrap();

    assert_eq!(repo.lookup_density("WS2").unwrap(), Some(7.5));
    assert_eq!(repo.lookup_cross_section("W4f", 1486.6).unwrap(), Some(0.1765));
    let names: Vec<String> = repo
        .list_materials()
        .unwrap()
        .into_iter()
        .map(|record| record.material_name)
        .collect();
    assert_eq!(names, vec!["MoS2", "WS2"]);

    let err = repo
        .add_material(&MaterialRecord {
            material_name: "WS2  ".to_string(),
            density: 7.6,
            molar_mass: 248.0,
        })
        .unwrap_err();
    assert!(matches!(err, RepoError::DuplicateKey(_)));
}

#[test]
fn invalid_records_are_rejected_before_write() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteReferenceRepository::try_new(&conn).unwrap();

    let err = repo
        .add_material(&MaterialRecord::new("  ", 1.0, 1.0))
        .unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(RecordValidationError::EmptyName("material name"))
    ));

    let err = repo
        .add_orbital(&OrbitalRecord::new("W4f", -0.1, 1486.6))
        .unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));
    assert_eq!(repo.list_orbitals().unwrap().len(), 1);
    assert_eq!(repo.list_materials().unwrap().len(), 1);
}

#[test]
fn lists_keep_insertion_order() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteReferenceRepository::try_new(&conn).unwrap();

    repo.add_material(&MaterialRecord::new("SiO2", 2.2, 60.08))
        .unwrap();
    repo.add_material(&MaterialRecord::new("Au", 19.3, 196.97))
        .unwrap();

    let names: Vec<String> = repo
        .list_materials()
        .unwrap()
        .into_iter()
        .map(|record| record.material_name)
        .collect();
    assert_eq!(names, vec!["MoS2", "SiO2", "Au"]);
}

#[test]
fn list_rejects_invalid_persisted_rows() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO material_properties (material_name, density, molar_mass)
         VALUES ('broken', 0.0, 10.0);",
        [],
    )
    .unwrap();
    let repo = SqliteReferenceRepository::try_new(&conn).unwrap();

    let err = repo.list_materials().unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
}

#[test]
fn service_adds_trimmed_records_and_labels_orbitals() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteReferenceRepository::try_new(&conn).unwrap();
    let service = ReferenceService::new(&repo);

    let added = service.add_orbital(" S2p ", 0.0673, 1486.6).unwrap();
    assert_eq!(added.orbital_name, "S2p");
    assert_eq!(service.lookup_cross_section("S2p", 1486.6).unwrap(), Some(0.0673));

    service.add_material("WSe2", 9.32, 341.76).unwrap();
    assert_eq!(service.lookup_molar_mass("WSe2").unwrap(), Some(341.76));

    assert_eq!(
        service.orbital_labels().unwrap(),
        vec!["Mo3d @ 1486.6 eV", "S2p @ 1486.6 eV"]
    );
    assert_eq!(repo.list_materials().unwrap().len(), 2);
}

#[test]
fn repository_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    match SqliteReferenceRepository::try_new(&conn) {
        Err(RepoError::Db(DbError::SchemaNotInstalled {
            expected_version,
            actual_version: 0,
        })) => assert_eq!(expected_version, SCHEMA_VERSION),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn repository_rejects_connection_without_reference_tables() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {SCHEMA_VERSION};"))
        .unwrap();

    assert!(matches!(
        SqliteReferenceRepository::try_new(&conn),
        Err(RepoError::Db(DbError::MissingTable("orbital_properties")))
    ));
}
