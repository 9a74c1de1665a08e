//! Network Builder
//!
//! Wires a population into a degree-20 ring lattice (10 forward, 10 backward)
//! and then rewires a number of forward slots to uniformly random agents.

use rand::seq::index;
use rand::Rng;

use crate::components::{Edge, Opinion, Population, NEIGHBORS_PER_SIDE};

/// Smallest population the builder will create
pub const MIN_POPULATION: usize = 2;

/// Population size used when the requested size cannot be read
pub const DEFAULT_POPULATION_SIZE: usize = 20;

/// Reset and rewire every agent in `population`.
///
/// Slots wrap modulo n, so populations smaller than 21 get duplicate or
/// self-referencing edges. Returns the number of forward slots actually
/// rewired, which is `min(random_connections, 10 * n)`.
pub fn connect<R: Rng + ?Sized>(
    population: &mut Population,
    random_connections: usize,
    rng: &mut R,
) -> usize {
    let n = population.len();
    if n == 0 {
        return 0;
    }

    for (i, agent) in population.agents_mut().iter_mut().enumerate() {
        agent.clear_edges();
        for j in 1..=NEIGHBORS_PER_SIDE {
            agent.forward.push(Edge::structural((i + j) % n));
            agent.backward.push((i + n - j % n) % n);
        }
    }

    let slots = n * NEIGHBORS_PER_SIDE;
    let amount = random_connections.min(slots);
    let chosen = index::sample(rng, slots, amount);

    let agents = population.agents_mut();
    for slot_index in chosen.into_iter() {
        let target = rng.gen_range(0..n);
        agents[slot_index / NEIGHBORS_PER_SIDE].forward[slot_index % NEIGHBORS_PER_SIDE] =
            Edge::random(target);
    }

    tracing::debug!(agents = n, requested = random_connections, rewired = amount, "Wired population");
    amount
}

/// Build a wired population of `size` agents with random initial opinions.
///
/// Sizes below [`MIN_POPULATION`] (including zero and negatives) are clamped up.
pub fn build_population<R: Rng + ?Sized>(
    size: i64,
    random_connections: usize,
    rng: &mut R,
) -> (Population, usize) {
    let size = usize::try_from(size).unwrap_or(0).max(MIN_POPULATION);
    let opinions: Vec<Opinion> = (0..size).map(|_| rng.gen_range(0..=1)).collect();
    build_population_from(&opinions, random_connections, rng)
}

/// Build a wired population from explicit initial opinions.
pub fn build_population_from<R: Rng + ?Sized>(
    opinions: &[Opinion],
    random_connections: usize,
    rng: &mut R,
) -> (Population, usize) {
    let mut population = Population::from_opinions(opinions);
    let rewired = connect(&mut population, random_connections, rng);
    (population, rewired)
}
