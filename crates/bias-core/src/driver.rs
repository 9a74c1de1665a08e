//! Simulation Driver
//!
//! Owns one population and runs (tension -> bias) steps over it. The ECS
//! world holds the population, the seeded network RNG, the bias rule and the
//! tension model of the current run; the schedule chains the two systems.

use bevy_ecs::prelude::*;
use bevy_ecs::schedule::ExecutorKind;
use rand::rngs::SmallRng;
use rand::SeedableRng;

use bias_events::TensionSample;

use crate::components::Population;
use crate::config::SimConfig;
use crate::error::SimError;
use crate::setup::{build_population, connect};
use crate::systems::{diffuse_bias, measure_tension, BiasRule, StepClock, TensionModel, TensionParams};
use crate::SimRng;

/// Result of one run request
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub iterations: u64,
    pub final_tension: f64,
    pub samples: Vec<TensionSample>,
}

/// A population plus everything needed to rebuild and run it
pub struct Simulation {
    world: World,
    schedule: Schedule,
    params: TensionParams,
    last_rewired: usize,
}

impl Simulation {
    /// Build the initial population described by `config`.
    pub fn new(config: &SimConfig) -> Result<Self, SimError> {
        config.validate()?;

        let mut rng = SmallRng::seed_from_u64(config.population.seed);
        let (population, rewired) = build_population(
            config.population.size,
            config.population.random_connections,
            &mut rng,
        );
        tracing::info!(
            agents = population.len(),
            rewired,
            "Created population"
        );

        let mut world = World::new();
        world.insert_resource(SimRng(rng));

        Ok(Self::assemble(world, population, config.tension.clone(), config.bias, rewired))
    }

    /// Wrap an already wired population. Rebuilds use a network RNG seeded
    /// with `network_seed`.
    pub fn from_population(
        population: Population,
        params: TensionParams,
        rule: BiasRule,
        network_seed: u64,
    ) -> Result<Self, SimError> {
        params.validate()?;

        let rewired = population.random_edge_count();
        let mut world = World::new();
        world.insert_resource(SimRng(SmallRng::seed_from_u64(network_seed)));
        Ok(Self::assemble(world, population, params, rule, rewired))
    }

    fn assemble(
        mut world: World,
        population: Population,
        params: TensionParams,
        rule: BiasRule,
        last_rewired: usize,
    ) -> Self {
        let model = TensionModel::from_validated(params.clone());
        world.insert_resource(StepClock {
            step: 0,
            tension: model.tension(),
            last_sample: None,
        });
        world.insert_resource(model);
        world.insert_resource(population);
        world.insert_resource(rule);

        let mut schedule = Schedule::default();
        schedule.set_executor_kind(ExecutorKind::SingleThreaded);
        schedule.add_systems((measure_tension, diffuse_bias).chain());

        Self {
            world,
            schedule,
            params,
            last_rewired,
        }
    }

    pub fn population(&self) -> &Population {
        self.world.resource::<Population>()
    }

    /// Tension of the most recent run (0.5 before any step).
    pub fn tension(&self) -> f64 {
        self.world.resource::<TensionModel>().tension()
    }

    pub fn params(&self) -> &TensionParams {
        &self.params
    }

    pub fn rule(&self) -> BiasRule {
        *self.world.resource::<BiasRule>()
    }

    /// Rewired edge count of the current population.
    pub fn last_rewired(&self) -> usize {
        self.last_rewired
    }

    /// Replace the population with a freshly built one.
    ///
    /// Old opinions and tension state are discarded. Returns the number of
    /// forward edges rewired.
    pub fn rebuild(&mut self, size: i64, random_connections: usize) -> usize {
        let (population, rewired) = {
            let mut rng = self.world.resource_mut::<SimRng>();
            build_population(size, random_connections, &mut rng.0)
        };
        tracing::info!(
            agents = population.len(),
            requested = random_connections,
            rewired,
            "Rebuilt population"
        );

        self.world.insert_resource(population);
        self.reset_tension();
        self.last_rewired = rewired;
        rewired
    }

    /// Rewire the current population in place.
    ///
    /// Every edge list is rebuilt from the lattice and `random_connections`
    /// forward slots are rewired again; opinions and confidence are kept.
    /// Returns the number of forward edges rewired.
    pub fn rewire(&mut self, random_connections: usize) -> usize {
        let rewired = self.world.resource_scope(|world, mut rng: Mut<SimRng>| {
            let mut population = world.resource_mut::<Population>();
            connect(&mut population, random_connections, &mut rng.0)
        });
        tracing::info!(requested = random_connections, rewired, "Rewired population");

        self.last_rewired = rewired;
        rewired
    }

    /// Run `iterations` steps with a fresh tension model.
    pub fn run(&mut self, iterations: u64) -> RunSummary {
        self.run_with(iterations, |_, _| {})
    }

    /// Run `iterations` steps, calling `observer` after each one with the
    /// updated population and that step's tension sample.
    pub fn run_with<F>(&mut self, iterations: u64, mut observer: F) -> RunSummary
    where
        F: FnMut(&Population, &TensionSample),
    {
        self.reset_tension();

        let mut samples = Vec::new();
        for step in 0..iterations {
            self.world.resource_mut::<StepClock>().step = step;
            self.schedule.run(&mut self.world);

            if let Some(sample) = self.world.resource::<StepClock>().last_sample {
                observer(self.world.resource::<Population>(), &sample);
                samples.push(sample);
            }
        }

        let final_tension = self.tension();
        tracing::info!(
            iterations,
            final_tension,
            ones = self.population().count_ones(),
            "Run complete"
        );

        RunSummary {
            iterations,
            final_tension,
            samples,
        }
    }

    fn reset_tension(&mut self) {
        let model = TensionModel::from_validated(self.params.clone());
        self.world.insert_resource(StepClock {
            step: 0,
            tension: model.tension(),
            last_sample: None,
        });
        self.world.insert_resource(model);
    }
}

/// Run the step loop directly on a population, without a schedule.
///
/// Returns the tension model after the last step, or an error before any
/// step if `params` is invalid.
pub fn run(
    population: &mut Population,
    iterations: u64,
    params: &TensionParams,
    rule: &BiasRule,
) -> Result<TensionModel, SimError> {
    let mut model = TensionModel::new(params.clone())?;
    for step in 0..iterations {
        let tension = model.update(population, step);
        rule.apply(population, tension);
    }
    Ok(model)
}
