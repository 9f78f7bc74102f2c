//! Reaction matching and application between neighbouring atoms

use achem_chemistry::{Orientation, ReactionData, ReactionRegistry};

use crate::world::{AtomId, Location, MAX_BOND_LENGTH, SimStats, SquareMap};

/// Decides whether two atoms react and applies the rule's effects.
///
/// Candidate rules come from the global registry first (registration order),
/// then from the enzyme index (first-registration order). The first rule
/// that matches and is applicable fires; later candidates are not examined.
pub struct ReactionEngine {
    registry: ReactionRegistry,
    enzyme_range: i32,
}

impl ReactionEngine {
    pub fn new(registry: ReactionRegistry, enzyme_range: i32) -> Self {
        Self {
            registry,
            enzyme_range,
        }
    }

    pub fn registry(&self) -> &ReactionRegistry {
        &self.registry
    }

    pub fn enzyme_range(&self) -> i32 {
        self.enzyme_range
    }

    /// React the atom at `center` with each of its neighbours in turn.
    ///
    /// Every reaction pushes the neighbour's location and then `center` onto
    /// `dirty`. Returns the number of reactions that fired.
    pub fn react_around(
        &self,
        map: &mut SquareMap,
        center: Location,
        dirty: &mut Vec<Location>,
        stats: &mut dyn SimStats,
    ) -> usize {
        let Some(central) = map.atom_at(center) else {
            return 0;
        };

        let mut fired = 0;
        for neighbor_loc in map.adjacent_locations(center) {
            let Some(neighbor) = map.atom_at(neighbor_loc) else {
                continue;
            };
            if self.react(map, neighbor, central) {
                stats.record_reaction();
                dirty.push(neighbor_loc);
                dirty.push(center);
                fired += 1;
            }
        }
        fired
    }

    /// Try to react two atoms. Returns true if a rule fired.
    pub fn react(&self, map: &mut SquareMap, a: AtomId, b: AtomId) -> bool {
        if a == b {
            return false;
        }
        let Some((rule, orientation)) = self.find_applicable(map, a, b) else {
            return false;
        };
        self.apply(map, a, b, &rule, orientation)
    }

    fn find_applicable(
        &self,
        map: &SquareMap,
        a: AtomId,
        b: AtomId,
    ) -> Option<(ReactionData, Orientation)> {
        let atom_a = map.atom(a)?;
        let atom_b = map.atom(b)?;
        let loc_a = atom_a.location()?;
        let loc_b = atom_b.location()?;

        let first = atom_a.reactant();
        let second = atom_b.reactant();
        let bonded = atom_a.is_bonded_to(b);

        let global = self
            .registry
            .matching(first, second, bonded)
            .map(|(rule, orientation)| (rule, orientation, false));
        let catalysed = map
            .enzyme_index()
            .candidates(first.state, second.state)
            .iter()
            .filter_map(|rule| Some((*rule, rule.orient(first, second, bonded)?, true)));

        global.chain(catalysed).find_map(|(rule, orientation, from_enzyme)| {
            // Rules carried by an enzyme only fire near one
            if (rule.requires_enzyme() || from_enzyme)
                && !map.enzyme_within(&rule, &[loc_a, loc_b], self.enzyme_range)
            {
                log::trace!("{rule} matched {a} and {b} but no enzyme is in range");
                return None;
            }

            if rule.bonded_after() && !bonded {
                if map.distance(loc_a, loc_b) > MAX_BOND_LENGTH {
                    return None;
                }
                if map.bond_would_cross(loc_a, loc_b, a, b) {
                    log::trace!("{rule} rejected: bond {loc_a}-{loc_b} would cross");
                    return None;
                }
            }

            Some((rule, orientation))
        })
    }

    fn apply(
        &self,
        map: &mut SquareMap,
        a: AtomId,
        b: AtomId,
        rule: &ReactionData,
        orientation: Orientation,
    ) -> bool {
        let bonded = map.are_bonded(a, b);
        match (bonded, rule.bonded_after()) {
            (false, true) => {
                if let Err(err) = map.bond(a, b) {
                    log::warn!("{rule} could not bond {a} and {b}: {err}");
                    return false;
                }
            }
            (true, false) => {
                map.unbond(a, b);
            }
            _ => {}
        }

        let (post_a, post_b) = rule.post_states(orientation);
        map.set_state(a, post_a);
        map.set_state(b, post_b);
        log::trace!("{rule} fired between {a} and {b}");
        true
    }
}
