//! Migration sub-step: population flow between an owned cell and one neighbor.

use super::params::GlobalParams;

/// Interior cells below this population keep their people.
pub const INTERIOR_MIGRATION_FLOOR: f64 = 50.0;

/// Working populations of a cell and one of its neighbors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Populations {
    pub cell: f64,
    pub neighbor: f64,
}

/// Moves population from a cell toward a stronger neighbor.
///
/// `population` is the cell's post-growth population, which sizes the transfer;
/// `current` holds both sides after combat. Flow only ever goes toward a neighbor whose
/// current population exceeds `population`:
///
/// - interior cells send `floor(population * base_rate)`, unless their current
///   population is below [`INTERIOR_MIGRATION_FLOOR`];
/// - border cells send `floor(population * border_rate)` with no floor.
#[must_use]
pub fn migrate(
    population: u32,
    current: Populations,
    is_border: bool,
    params: &GlobalParams,
) -> Populations {
    let pop = f64::from(population);
    if current.neighbor <= pop {
        return current;
    }
    let transfer = if is_border {
        (pop * params.border_migration_rate()).floor()
    } else {
        if current.cell < INTERIOR_MIGRATION_FLOOR {
            return current;
        }
        (pop * params.base_migration_rate()).floor()
    };
    Populations {
        cell: current.cell - transfer,
        neighbor: current.neighbor + transfer,
    }
}
