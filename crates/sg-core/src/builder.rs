//! Level graph generation
//!
//! Places a spawn section at the origin, then repeatedly expands a placed
//! section through its free exits until every rule's population target is
//! met:
//! 1. Roll which free exits take part in this pass (dead-end rolls)
//! 2. For each attempt, sample a successor category and a template of it
//! 3. Pick one of the pass's exits and place the template behind it,
//!    unless the cell is taken
//! 4. When the pass ends without completing, pick any placed section and
//!    expand it next
//!
//! The walk is a bounded loop; one pass is one iteration.

use log::{debug, info, warn};

use crate::config::{CompletionPolicy, DEFAULT_MAX_ITERATIONS, GeneratorConfig};
use crate::error::{ConfigError, GenerationError};
use crate::graph::LevelGraph;
use crate::rng::SectionRng;
use crate::rules::RuleSet;
use crate::section::{Catalog, Category, GridPos, SectionId};

/// Outcome of one expansion pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pass {
    /// Targets met mid-pass
    Complete,
    /// Pass ran out of exits or hit a budget
    Exhausted,
}

/// One build: owns the graph and the random stream until it finishes
#[derive(Debug)]
pub struct LevelBuilder<'a> {
    catalog: &'a Catalog,
    rules: &'a RuleSet,
    rng: SectionRng,
    graph: LevelGraph,
    disable_sections_on_start: bool,
    max_iterations: usize,
    completion: CompletionPolicy,
    /// Per-rule targets when using `CompletionPolicy::FixedTarget`
    targets: Vec<(Category, usize)>,
    passes: usize,
}

impl<'a> LevelBuilder<'a> {
    pub fn new(catalog: &'a Catalog, rules: &'a RuleSet, rng: SectionRng) -> Self {
        let seed = rng.seed();
        Self {
            catalog,
            rules,
            rng,
            graph: LevelGraph::new(seed),
            disable_sections_on_start: true,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            completion: CompletionPolicy::default(),
            targets: Vec::new(),
            passes: 0,
        }
    }

    pub fn disable_sections_on_start(mut self, disable: bool) -> Self {
        self.disable_sections_on_start = disable;
        self
    }

    pub fn max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn completion(mut self, completion: CompletionPolicy) -> Self {
        self.completion = completion;
        self
    }

    /// Run the build and return the finalized graph
    pub fn run(self) -> Result<LevelGraph, GenerationError> {
        self.finish().0
    }

    /// Run the build, also handing back the random stream (for draw traces)
    pub fn finish(mut self) -> (Result<LevelGraph, GenerationError>, SectionRng) {
        let outcome = self.generate();
        let LevelBuilder { graph, rng, .. } = self;
        (outcome.map(|()| graph), rng)
    }

    fn generate(&mut self) -> Result<(), GenerationError> {
        if self.max_iterations == 0 {
            return Err(ConfigError::ZeroIterationCeiling.into());
        }

        let catalog = self.catalog;
        let spawn = catalog
            .random_of(Category::Spawn, &mut self.rng)
            .ok_or(ConfigError::MissingSpawnTemplate(Category::Spawn))?;
        let origin = self.graph.place(spawn, GridPos::ORIGIN, true)?;

        if self.completion == CompletionPolicy::FixedTarget {
            self.draw_targets();
        }

        self.expand_until_complete(origin)
    }

    /// Expansion passes starting at `current` until the targets are met or
    /// the ceiling is reached
    fn expand_until_complete(&mut self, mut current: SectionId) -> Result<(), GenerationError> {
        while self.passes < self.max_iterations {
            self.passes += 1;

            if self.expand(current)? == Pass::Complete || self.is_complete() {
                return self.complete();
            }

            current = SectionId(self.rng.rn2(self.graph.len() as u32) as usize);
        }

        warn!(
            "seed {}: population targets still unmet after {} passes ({} sections placed)",
            self.graph.seed(),
            self.passes,
            self.graph.len()
        );
        Err(GenerationError::NonTermination {
            iterations: self.passes,
        })
    }

    /// Fix one target per rule, in rule order. Spawn is always one.
    fn draw_targets(&mut self) {
        let rules = self.rules;
        self.targets = rules
            .rules()
            .iter()
            .map(|rule| {
                let target = if rule.category == Category::Spawn {
                    1
                } else {
                    self.rng.range_inclusive(rule.min() as u32, rule.max() as u32) as usize
                };
                (rule.category, target)
            })
            .collect();
        debug!("population targets: {:?}", self.targets);
    }

    /// One pass over the free exits of `id`
    fn expand(&mut self, id: SectionId) -> Result<Pass, GenerationError> {
        let catalog = self.catalog;
        let Some(section) = self.graph.section(id) else {
            return Ok(Pass::Exhausted);
        };
        let (category, position) = (section.category, section.position);
        let mut candidates = section.free_exits(&mut self.rng);

        let attempts = candidates.len();
        for _ in 0..attempts {
            if self.is_complete() {
                return Ok(Pass::Complete);
            }

            let next = self.rules.successor(category, &mut self.rng);
            if let Err(err) = self.check_budget(next) {
                debug!("{err}; ending pass at {id}");
                break;
            }

            let Some(template) = catalog.random_of(next, &mut self.rng) else {
                continue;
            };
            let Some(pick) = self.rng.pick_index(candidates.len()) else {
                break;
            };
            let direction = candidates[pick];
            let target = position.step(direction);
            if self.graph.is_occupied(target) {
                continue;
            }

            let active = !self.disable_sections_on_start;
            let placed = self.graph.place(template, target, active)?;
            self.graph.connect(id, direction, placed)?;
            candidates.remove(pick);

            debug!(
                "placed {} '{}' at {} via {} exit of {}",
                next, template.name, target, direction, id
            );
        }

        Ok(Pass::Exhausted)
    }

    /// Budget for one more `category` section
    fn check_budget(&self, category: Category) -> Result<(), GenerationError> {
        let budget = match self.completion {
            CompletionPolicy::FixedTarget => self.target_for(category),
            CompletionPolicy::Redraw => self.rules.max_count(category),
        };
        if self.graph.count_of(category) >= budget {
            return Err(GenerationError::PlacementBudgetExceeded { category });
        }
        Ok(())
    }

    fn target_for(&self, category: Category) -> usize {
        self.targets
            .iter()
            .find(|(c, _)| *c == category)
            .map_or(0, |(_, t)| *t)
    }

    /// Every rule's category at its target count
    fn is_complete(&mut self) -> bool {
        match self.completion {
            CompletionPolicy::FixedTarget => self
                .targets
                .iter()
                .all(|(category, target)| self.graph.count_of(*category) == *target),
            CompletionPolicy::Redraw => {
                let rules = self.rules;
                for rule in rules.rules() {
                    let target =
                        self.rng.range_inclusive(rule.min() as u32, rule.max() as u32) as usize;
                    if self.graph.count_of(rule.category) != target {
                        return false;
                    }
                }
                true
            }
        }
    }

    fn complete(&mut self) -> Result<(), GenerationError> {
        self.graph.mark_complete();
        self.graph.finalize()?;
        info!(
            "seed {}: level complete with {} sections after {} passes",
            self.graph.seed(),
            self.graph.len(),
            self.passes
        );
        Ok(())
    }
}

/// Build a level graph from a catalog and rules with a fixed seed and
/// default settings
pub fn build(catalog: &Catalog, rules: &RuleSet, seed: u64) -> Result<LevelGraph, GenerationError> {
    catalog.validate()?;
    rules.warn_on_catalog_gaps(catalog);
    LevelBuilder::new(catalog, rules, SectionRng::new(seed)).run()
}

/// Validate `config` and run one build.
///
/// All configuration checks run before anything is placed. Without a
/// configured seed a fresh one is derived; it is available from
/// `LevelGraph::seed` afterwards.
pub fn start_generation(config: &GeneratorConfig) -> Result<LevelGraph, GenerationError> {
    builder_for(config, &RuleSet::new(config.rules.clone())?)?.run()
}

/// A configured builder for `config`, for callers that want the draw trace
pub fn builder_for<'a>(
    config: &'a GeneratorConfig,
    rules: &'a RuleSet,
) -> Result<LevelBuilder<'a>, GenerationError> {
    config.validate()?;
    rules.warn_on_catalog_gaps(&config.catalog);

    let rng = match config.seed {
        Some(seed) => SectionRng::new(seed),
        None => SectionRng::from_entropy(),
    };
    debug!("building with seed {}", rng.seed());

    Ok(LevelBuilder::new(&config.catalog, rules, rng)
        .disable_sections_on_start(config.disable_sections_on_start)
        .max_iterations(config.max_iterations)
        .completion(config.completion))
}
