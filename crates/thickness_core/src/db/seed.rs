//! Default reference rows for a fresh store.
//!
//! # Invariants
//! - A table is seeded only while it holds zero rows.
//! - Seeding runs inside one transaction; partial seeds are never committed.

use super::DbResult;
use log::info;
use rusqlite::{params, Connection};

/// Default orbital row: `(orbital, cross_section, energy)`.
pub const DEFAULT_ORBITAL: (&str, f64, f64) = ("Mo3d", 0.1303, 1486.6);

/// Default material row: `(material_name, density, molar_mass)`.
pub const DEFAULT_MATERIAL: (&str, f64, f64) = ("MoS2", 5.06, 160.07);

/// Inserts the default orbital and material rows into empty tables.
pub fn seed_defaults(conn: &mut Connection) -> DbResult<()> {
    let tx = conn.transaction()?;

    let orbital_rows: i64 =
        tx.query_row("SELECT COUNT(*) FROM orbital_properties;", [], |row| {
            row.get(0)
        })?;
    let seeded_orbital = orbital_rows == 0;
    if seeded_orbital {
        let (orbital, cross_section, energy) = DEFAULT_ORBITAL;
        tx.execute(
            "INSERT INTO orbital_properties (orbital, cross_section, energy)
             VALUES (?1, ?2, ?3);",
            params![orbital, cross_section, energy],
        )?;
    }

    let material_rows: i64 =
        tx.query_row("SELECT COUNT(*) FROM material_properties;", [], |row| {
            row.get(0)
        })?;
    let seeded_material = material_rows == 0;
    if seeded_material {
        let (material_name, density, molar_mass) = DEFAULT_MATERIAL;
        tx.execute(
            "INSERT INTO material_properties (material_name, density, molar_mass)
             VALUES (?1, ?2, ?3);",
            params![material_name, density, molar_mass],
        )?;
    }

    tx.commit()?;

    if seeded_orbital || seeded_material {
        info!(
            "event=seed_defaults module=db status=ok orbital={} material={}",
            seeded_orbital, seeded_material
        );
    }
    Ok(())
}
