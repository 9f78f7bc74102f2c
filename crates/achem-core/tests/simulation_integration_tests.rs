//! Integration tests for the tick scheduler driving a populated grid
//!
//! These exercise the map, reaction engine, simulator and mutation operators
//! together through the public API only.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};

use achem_core::chemistry::{
    AtomType, CompositeMacroreaction, ElementaryMacroreaction, EmptyMacroreaction, Macroreaction,
    MutableReactionData, ReactionRegistry, RuleSlots, TypePattern,
};
use achem_core::world::MAX_BOND_LENGTH;
use achem_core::{
    Atom, AtomId, DeletionMutation, InsertionMutation, Location, MoveOutcome, MutationOperator,
    NoopStats, SimConfig, SimRng, Simulator, SquareMap, TickCounters,
};
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256StarStar;

fn config(grid_size: i32, movement_chance: f32) -> SimConfig {
    SimConfig {
        grid_size,
        movement_chance,
        ..Default::default()
    }
}

/// Every bond within reach and uncrossed, every atom where the occupancy
/// table says it is
fn assert_consistent(map: &SquareMap) {
    let mut seen = HashSet::new();
    let mut bonds: Vec<(AtomId, AtomId)> = Vec::new();
    for (id, atom) in map.atoms() {
        let location = atom.location().expect("placed atom has a location");
        assert!(map.is_on_grid(location));
        assert_eq!(map.atom_at(location), Some(id));
        assert!(seen.insert(location), "two atoms at {location}");

        for &partner in atom.bonds() {
            assert!(map.are_bonded(partner, id), "bond {id}-{partner} not symmetric");
            let other = map.location_of(partner).unwrap();
            assert!(
                map.distance(location, other) <= MAX_BOND_LENGTH,
                "bond {id}-{partner} stretched to {}",
                map.distance(location, other)
            );
            if id < partner {
                bonds.push((id, partner));
            }
        }
    }

    for (i, &(a1, a2)) in bonds.iter().enumerate() {
        for &(b1, b2) in &bonds[i + 1..] {
            if a1 == b1 || a1 == b2 || a2 == b1 || a2 == b2 {
                continue;
            }
            let at = |id| map.location_of(id).unwrap();
            assert!(
                !map.crossed(at(a1), at(a2), at(b1), at(b2)),
                "bond {a1}-{a2} crosses bond {b1}-{b2}"
            );
        }
    }
}

/// Rows of bonded pairs on a 16x16 grid plus two enzymes carrying a cleavage rule
fn populated_simulator(seed: u64) -> (Simulator, Vec<AtomId>) {
    let mut sim =
        Simulator::from_config(&config(16, 0.7), ReactionRegistry::with_default_reactions())
            .unwrap();
    let mut rng = Xoshiro256StarStar::seed_from_u64(seed);
    let kinds = AtomType::ALL;

    for y in (1..15).step_by(3) {
        for x in (1..13).step_by(4) {
            let left = sim
                .map_mut()
                .add_atom(
                    Location::square(x, y),
                    Atom::new(kinds[rng.gen_index(kinds.len())], 0),
                )
                .unwrap();
            let right = sim
                .map_mut()
                .add_atom(Location::square(x + 1, y), Atom::new(AtomType::B, 1))
                .unwrap();
            sim.map_mut().bond(left, right).unwrap();
        }
    }

    let cleave = MutableReactionData::new(TypePattern::X, 2, TypePattern::Y, 2)
        .to_states(0, 0)
        .bonds(true, false)
        .catalysed(true)
        .build();
    let mut enzymes = Vec::new();
    for (x, y) in [(3, 3), (11, 12)] {
        let table = RuleSlots::from_rules([cleave], sim_capacity()).unwrap();
        let enzyme = sim
            .map_mut()
            .add_atom(Location::square(x, y), Atom::enzyme(AtomType::E, 0, table))
            .unwrap();
        enzymes.push(enzyme);
    }

    (sim, enzymes)
}

fn sim_capacity() -> usize {
    SimConfig::default().enzyme_capacity
}

#[test]
fn test_bond_stretch_boundary() {
    let mut sim = Simulator::from_config(&config(10, 1.0), ReactionRegistry::new()).unwrap();
    let x = sim
        .map_mut()
        .add_atom(Location::square(5, 5), Atom::new(AtomType::A, 0))
        .unwrap();
    let y = sim
        .map_mut()
        .add_atom(Location::square(5, 6), Atom::new(AtomType::B, 0))
        .unwrap();
    sim.map_mut().bond(x, y).unwrap();

    // (5,5)-(5,7) is distance 2: allowed
    assert_eq!(
        sim.attempt_move(y, Location::square(5, 7), &mut NoopStats),
        MoveOutcome::Moved
    );
    assert_eq!(sim.map().atom_at(Location::square(5, 6)), None);
    assert_eq!(sim.map().atom_at(Location::square(5, 7)), Some(y));

    // (5,5)-(5,8) would be distance 3: rejected, nothing changes
    assert_eq!(
        sim.attempt_move(y, Location::square(5, 8), &mut NoopStats),
        MoveOutcome::StretchesBond
    );
    assert_eq!(sim.map().atom_at(Location::square(5, 7)), Some(y));
    assert_eq!(sim.map().atom_at(Location::square(5, 8)), None);
    assert!(sim.map().are_bonded(x, y));
}

#[test]
fn test_tick_rejects_stretching_moves() {
    // 4x4 grid full except (3,3). Each neighbour of the free cell is bonded
    // two steps away from it, so stepping into it stretches that bond.
    let mut sim = Simulator::from_config(&config(4, 1.0), ReactionRegistry::new()).unwrap();
    let mut ids = HashMap::new();
    for y in 0..4 {
        for x in 0..4 {
            if (x, y) == (3, 3) {
                continue;
            }
            let id = sim
                .map_mut()
                .add_atom(Location::square(x, y), Atom::new(AtomType::C, 0))
                .unwrap();
            ids.insert((x, y), id);
        }
    }
    let pairs = [((2, 2), (0, 0)), ((3, 2), (1, 0)), ((2, 3), (0, 1))];
    for (near, far) in pairs {
        sim.map_mut().bond(ids[&near], ids[&far]).unwrap();
    }

    let free = Location::square(3, 3);
    let mut rng = Xoshiro256StarStar::seed_from_u64(8);
    let mut counters = TickCounters::default();
    for _ in 0..50 {
        sim.tick(&mut counters, &mut rng);
    }

    assert_eq!(counters.atoms_moved, 0);
    assert_eq!(counters.moves_rejected, 15 * 50);
    assert_eq!(sim.map().atom_at(free), None);
    for (near, far) in pairs {
        assert!(sim.map().are_bonded(ids[&near], ids[&far]));
    }
    assert_consistent(sim.map());

    // Once the bonds are gone the free cell gets taken
    for (near, far) in pairs {
        sim.map_mut().unbond(ids[&near], ids[&far]);
    }
    counters.reset();
    for _ in 0..50 {
        sim.tick(&mut counters, &mut rng);
    }
    assert!(counters.atoms_moved > 0);
}

#[test]
fn test_diagonal_reaction_on_replay() {
    let rule = MutableReactionData::new(AtomType::C, 3, AtomType::D, 4)
        .to_states(5, 6)
        .build();
    let mut registry = ReactionRegistry::new();
    registry.register(rule);

    let mut sim = Simulator::from_config(&config(10, 0.0), registry).unwrap();
    let c = sim
        .map_mut()
        .add_atom(Location::square(2, 2), Atom::new(AtomType::C, 3))
        .unwrap();
    let d = sim
        .map_mut()
        .add_atom(Location::square(3, 3), Atom::new(AtomType::D, 4))
        .unwrap();

    sim.mark_dirty(Location::square(2, 2));
    sim.mark_dirty(Location::square(3, 3));
    let mut rng = Xoshiro256StarStar::seed_from_u64(0);
    let mut counters = TickCounters::default();
    sim.tick(&mut counters, &mut rng);

    assert_eq!(sim.map().atom(c).unwrap().state, 5);
    assert_eq!(sim.map().atom(d).unwrap().state, 6);
    assert_eq!(counters.reactions, 1);
    assert_eq!(counters.atoms_moved, 0);
}

#[test]
fn test_seeded_run_keeps_invariants() {
    let (mut sim, _) = populated_simulator(17);
    let atom_count = sim.map().len();
    let mut rng = Xoshiro256StarStar::seed_from_u64(17);
    let mut counters = TickCounters::default();

    for _ in 0..300 {
        sim.tick(&mut counters, &mut rng);
        assert_consistent(sim.map());
    }

    assert_eq!(sim.map().len(), atom_count);
    assert!(counters.atoms_moved > 0);
    assert!(counters.moves_rejected > 0);
}

#[test]
fn test_seeded_runs_are_reproducible() {
    let run = |seed: u64| {
        let (mut sim, _) = populated_simulator(seed);
        let mut rng = Xoshiro256StarStar::seed_from_u64(seed);
        for _ in 0..50 {
            sim.tick(&mut NoopStats, &mut rng);
        }
        sim.map()
            .atoms()
            .map(|(id, atom)| (id, atom.location(), atom.state))
            .collect::<Vec<_>>()
    };

    assert_eq!(run(5), run(5));
}

#[test]
fn test_concurrent_reader_sees_whole_snapshots() {
    let (mut sim, _) = populated_simulator(23);
    let atom_count = sim.map().len();
    let reader = sim.snapshots();
    let done = AtomicBool::new(false);
    let mut rng = Xoshiro256StarStar::seed_from_u64(23);

    std::thread::scope(|scope| {
        let observer = scope.spawn(|| {
            let mut observed = 0;
            while !done.load(Ordering::Acquire) {
                let snapshot = reader.load();
                if snapshot.tick == 0 {
                    continue;
                }
                assert_eq!(snapshot.atoms.len(), atom_count);
                let cells: HashSet<Location> = snapshot.atoms.iter().map(|a| a.location).collect();
                assert_eq!(cells.len(), atom_count);
                observed += 1;
            }
            observed
        });

        for _ in 0..200 {
            sim.tick(&mut NoopStats, &mut rng);
        }
        done.store(true, Ordering::Release);
        observer.join().unwrap();
    });

    assert_eq!(reader.load().tick, 200);
}

#[test]
fn test_add_and_move_properties() {
    let mut map = SquareMap::new(6).unwrap();
    let a = map
        .add_atom(Location::square(1, 1), Atom::new(AtomType::A, 0))
        .unwrap();
    assert!(
        map.add_atom(Location::square(1, 1), Atom::new(AtomType::F, 9))
            .is_err()
    );
    assert_eq!(map.len(), 1);

    let b = map
        .add_atom(Location::square(2, 2), Atom::new(AtomType::B, 0))
        .unwrap();
    assert!(!map.move_atom(a, Location::square(2, 2)));
    assert_eq!(map.atom_at(Location::square(1, 1)), Some(a));
    assert_eq!(map.atom_at(Location::square(2, 2)), Some(b));

    assert!(map.move_atom(a, Location::square(1, 2)));
    assert_eq!(map.atom_at(Location::square(1, 1)), None);
    assert_eq!(map.atom_at(Location::square(1, 2)), Some(a));
}

#[test]
fn test_enzyme_mutation_keeps_index_in_sync() {
    let (mut sim, enzymes) = populated_simulator(31);
    let operators: Vec<MutationOperator> = vec![
        InsertionMutation::new(3).into(),
        DeletionMutation::new(1).into(),
    ];
    let mut rng = Xoshiro256StarStar::seed_from_u64(31);
    let mut counters = TickCounters::default();

    for round in 0..40 {
        let enzyme = enzymes[round % enzymes.len()];
        let mutated = sim
            .mutate_enzyme(enzyme, &operators, &mut rng, &mut counters)
            .unwrap();
        assert!(mutated);

        for id in &enzymes {
            let rules = sim.map().atom(*id).unwrap().rules().unwrap();
            assert!(rules.active_count() <= sim_capacity());
            assert!(rules.active_count() >= 1);
            for rule in rules.active() {
                assert!(sim.map().enzyme_index().enzymes_for(rule).any(|e| e == *id));
            }
        }
        sim.tick(&mut counters, &mut rng);
    }
    assert_eq!(counters.mutations, 40);

    // Plain atoms cannot be mutated
    let plain = sim
        .map()
        .atoms()
        .find(|(_, atom)| !atom.is_enzyme())
        .map(|(id, _)| id)
        .unwrap();
    assert!(
        !sim.mutate_enzyme(plain, &operators, &mut rng, &mut counters)
            .unwrap()
    );
}

#[test]
fn test_macroreaction_registration_drives_reactions() {
    let leaf: Box<dyn Macroreaction> = Box::new(ElementaryMacroreaction::new(
        MutableReactionData::new(AtomType::A, 0, AtomType::A, 0)
            .to_states(1, 1)
            .build(),
    ));
    let empty: Box<dyn Macroreaction> = Box::new(EmptyMacroreaction);
    let inner: Box<dyn Macroreaction> = Box::new(CompositeMacroreaction::new(vec![leaf, empty]));
    let root = CompositeMacroreaction::new(vec![inner]);

    let mut registry = ReactionRegistry::new();
    assert_eq!(registry.register_macroreaction(&root), 1);

    let mut sim = Simulator::from_config(&config(5, 0.0), registry).unwrap();
    let a = sim
        .map_mut()
        .add_atom(Location::square(0, 0), Atom::new(AtomType::A, 0))
        .unwrap();
    sim.map_mut()
        .add_atom(Location::square(1, 0), Atom::new(AtomType::A, 0))
        .unwrap();

    sim.mark_dirty(Location::square(0, 0));
    sim.tick(&mut NoopStats, &mut Xoshiro256StarStar::seed_from_u64(1));
    assert_eq!(sim.map().atom(a).unwrap().state, 1);
}

#[test]
fn test_removed_atom_leaves_no_trace() {
    let (mut sim, enzymes) = populated_simulator(41);
    let enzyme = enzymes[0];
    let location = sim.map().location_of(enzyme).unwrap();

    sim.map_mut().remove_atom(enzyme).unwrap();
    assert_eq!(sim.map().atom_at(location), None);
    assert!(sim.map().atom(enzyme).is_none());

    let remaining = sim.map().atom(enzymes[1]).unwrap().rules().unwrap().clone();
    for rule in remaining.active() {
        assert_eq!(sim.map().enzyme_index().enzymes_for(rule).count(), 1);
    }
    assert_consistent(sim.map());
}
