use crate::core::{FactionMap, Grid, clamp_population};

use super::{
    combat,
    dice::CombatDice,
    growth,
    migration::{self, Populations},
    outcome::{self, FactionCounts},
    overrides::RoundOverrides,
    params::GlobalParams,
    settings::FactionSettings,
    snapshot::Snapshot,
};

/// Advances `snapshot` by one round and returns the new state.
///
/// Overrides replace the stored settings and parameters first. A well-formed snapshot at
/// round zero passes through with only its counter advanced. Otherwise every owned cell, in
/// row-major order, grows, drifts its terrain and then resolves combat and migration
/// against its north, south, east and west neighbors. Neighbor changes are written back
/// immediately, so later cells see them within the same round. In every round each cell,
/// owned or not, ends up clamped into the population and terrain bounds.
///
/// # Example
///
/// ```
/// use cellquest_engine::{
///     FactionMap, FactionSettings, GlobalParams, RngDice, RoundOverrides, new_episode, play_round,
/// };
/// use rand::{SeedableRng, rngs::StdRng};
///
/// let settings = FactionMap::from_fn(|_| FactionSettings::UNIT);
/// let mut snapshot = new_episode(20, 10, settings, GlobalParams::fallback()).unwrap();
/// let mut dice = RngDice(StdRng::seed_from_u64(7));
/// for _ in 0..3 {
///     snapshot = play_round(&snapshot, &RoundOverrides::none(), &mut dice);
/// }
/// assert_eq!(snapshot.round_count(), 3);
/// ```
pub fn play_round<D>(snapshot: &Snapshot, overrides: &RoundOverrides, dice: &mut D) -> Snapshot
where
    D: CombatDice + ?Sized,
{
    let mut next = snapshot.clone();
    next.apply_overrides(overrides);
    next.finished = false;

    if next.round_count > 0 {
        for index in 0..next.grid.len() {
            advance_cell(&mut next.grid, index, &next.settings, &next.params, dice);
        }
    }
    next.grid.clamp_cells();

    next.counts = FactionCounts::tally(&next.grid);
    next.round_count += 1;
    next.finished = outcome::is_episode_finished(&next.counts);
    tracing::debug!(
        round = next.round_count,
        finished = next.finished,
        "round complete"
    );
    next
}

fn advance_cell<D>(
    grid: &mut Grid,
    index: usize,
    settings: &FactionMap<FactionSettings>,
    params: &GlobalParams,
    dice: &mut D,
) where
    D: CombatDice + ?Sized,
{
    let cell = *grid.cell(index);
    let Some(faction) = cell.owner else {
        return;
    };
    let strength = settings[faction].effective(params);
    let population = growth::grow(cell.population, cell.terrain, &strength, params);
    let terrain = growth::drift_terrain(cell.terrain, population, &strength, params);
    let is_border = grid.is_border(index);

    let mut last_population = population;
    for neighbor_index in grid.neighbors(index) {
        let neighbor = *grid.cell(neighbor_index);
        let mut current = Populations {
            cell: f64::from(population),
            neighbor: f64::from(neighbor.population),
        };

        if combat::is_eligible(cell.owner, population, &neighbor) {
            let defense = neighbor.owner.map_or(0.0, |f| settings[f].defense);
            let clash = combat::resolve(
                population, terrain, &strength, &neighbor, defense, params, dice,
            );
            if clash.outcome.is_conquest() {
                grid.cell_mut(neighbor_index).owner = cell.owner;
            }
            current = Populations {
                cell: clash.attacker,
                neighbor: clash.defender,
            };
        }

        let current = migration::migrate(population, current, is_border, params);
        grid.cell_mut(neighbor_index).population = clamp_population(current.neighbor);
        last_population = clamp_population(current.cell);
    }

    let cell = grid.cell_mut(index);
    cell.population = last_population;
    cell.terrain = terrain;
}
