use crate::config::GaConfig;
use crate::vec2::Vec2;
use log::debug;
use rand::Rng;
use std::f64::consts::TAU;

/// One thrust instruction: a 2D acceleration applied for a single tick.
pub type Gene = Vec2;

/// Fixed-length ordered sequence of thrust vectors controlling one rocket's
/// trajectory. Immutable once handed to a rocket; replaced wholesale between
/// generations.
#[derive(Debug, Clone, PartialEq)]
pub struct Genome {
    genes: Vec<Gene>,
}

/// Draws a gene with direction uniform in [0, 2π) and magnitude uniform in
/// [0, thrust_cap].
fn random_gene(thrust_cap: f64, rng: &mut impl Rng) -> Gene {
    let angle = rng.random_range(0.0..TAU);
    let magnitude = rng.random_range(0.0..=thrust_cap);
    Vec2::from_angle(angle, magnitude)
}

impl Genome {
    pub fn random(length: usize, thrust_cap: f64, rng: &mut impl Rng) -> Self {
        Self {
            genes: (0..length).map(|_| random_gene(thrust_cap, rng)).collect(),
        }
    }

    /// Builds a genome from an explicit gene sequence.
    pub fn from_genes(genes: Vec<Gene>) -> Self {
        Self { genes }
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    pub fn genes(&self) -> &[Gene] {
        &self.genes
    }

    /// Single-point crossover: a cut index is drawn uniformly from the
    /// interior [1, length-1]; the offspring takes `self`'s genes below the
    /// cut and `other`'s genes from the cut onward. Output length always
    /// equals the parents' length.
    ///
    /// A genome of length 1 has no interior cut point; the offspring is a
    /// clone of `self`.
    pub fn crossover(&self, other: &Genome, rng: &mut impl Rng) -> Genome {
        debug_assert_eq!(self.len(), other.len(), "parents must share a length");
        if self.len() < 2 {
            return self.clone();
        }
        let cut = rng.random_range(1..self.len());
        let genes = self.genes[..cut]
            .iter()
            .chain(&other.genes[cut..])
            .copied()
            .collect();
        Genome { genes }
    }

    /// Per-gene probabilistic mutation: each gene is independently replaced
    /// by a fresh random gene with probability `rate`. Applied after
    /// crossover, never before.
    pub fn mutate(&mut self, rate: f64, thrust_cap: f64, rng: &mut impl Rng) {
        for gene in &mut self.genes {
            if rng.random::<f64>() < rate {
                *gene = random_gene(thrust_cap, rng);
            }
        }
    }
}

/// N genomes plus the parallel fitness array, with the genetic operators
/// that breed the next generation. Slot index doubles as agent identity
/// within a generation.
#[derive(Debug, Clone)]
pub struct Population {
    config: GaConfig,
    genomes: Vec<Genome>,
    fitnesses: Vec<f64>,
}

impl Population {
    /// Builds a population of `population_size` random genomes with zeroed
    /// fitness scores.
    pub fn new(config: GaConfig, rng: &mut impl Rng) -> Self {
        let genomes = (0..config.population_size)
            .map(|_| Genome::random(config.dna_length, config.thrust_cap, rng))
            .collect();
        let fitnesses = vec![0.0; config.population_size];
        Self {
            config,
            genomes,
            fitnesses,
        }
    }

    pub fn len(&self) -> usize {
        self.genomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genomes.is_empty()
    }

    pub fn genomes(&self) -> &[Genome] {
        &self.genomes
    }

    pub fn fitnesses(&self) -> &[f64] {
        &self.fitnesses
    }

    pub fn fitness(&self, slot: usize) -> f64 {
        self.fitnesses[slot]
    }

    pub fn set_fitness(&mut self, slot: usize, fitness: f64) {
        self.fitnesses[slot] = fitness;
    }

    /// Scales every fitness by the population maximum so scores land in
    /// [0, 1]. A degenerate all-zero population falls back to uniform 1/N
    /// weights; this is a defined policy, not an error.
    pub fn normalize(&mut self) {
        let max = self.fitnesses.iter().copied().fold(0.0_f64, f64::max);
        if max > 0.0 {
            for fitness in &mut self.fitnesses {
                *fitness /= max;
            }
        } else {
            let uniform = 1.0 / self.fitnesses.len() as f64;
            self.fitnesses.fill(uniform);
        }
    }

    /// Roulette-wheel selection: draws u uniform in [0, total) and walks the
    /// cumulative fitness sequence in population order, returning the first
    /// genome whose running sum exceeds u. Selection probability is
    /// proportional to fitness; zero-fitness genomes are never picked unless
    /// every score is zero.
    pub fn select_parent(&self, rng: &mut impl Rng) -> &Genome {
        let total: f64 = self.fitnesses.iter().sum();
        if total <= 0.0 {
            // Only reachable before normalize() has run on a degenerate
            // population; fall back to a uniform draw.
            return &self.genomes[rng.random_range(0..self.genomes.len())];
        }
        let pick = rng.random_range(0.0..total);
        let mut cumulative = 0.0;
        for (genome, fitness) in self.genomes.iter().zip(&self.fitnesses) {
            cumulative += fitness;
            if cumulative > pick {
                return genome;
            }
        }
        // Floating-point accumulation can land just short of the total.
        self.genomes.last().expect("population is never empty")
    }

    /// Breeds the next generation in place: for each output slot, two
    /// parents are drawn independently (with replacement, so a genome may
    /// parent itself) and combined via crossover then mutation. The previous
    /// genomes and fitness scores are replaced wholesale; the population
    /// size never changes. If `elite_count` is configured, the top genomes
    /// by fitness are carried over verbatim first.
    pub fn evolve(&mut self, rng: &mut impl Rng) {
        let size = self.genomes.len();
        let mut next = Vec::with_capacity(size);

        if self.config.elite_count > 0 {
            let mut ranked: Vec<usize> = (0..size).collect();
            ranked.sort_by(|&a, &b| {
                self.fitnesses[b]
                    .partial_cmp(&self.fitnesses[a])
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
            for &slot in ranked.iter().take(self.config.elite_count.min(size)) {
                next.push(self.genomes[slot].clone());
            }
        }

        while next.len() < size {
            let parent_a = self.select_parent(rng);
            let parent_b = self.select_parent(rng);
            let mut child = parent_a.crossover(parent_b, rng);
            child.mutate(self.config.mutation_rate, self.config.thrust_cap, rng);
            next.push(child);
        }

        debug!("evolved population of {} genomes", next.len());
        self.genomes = next;
        self.fitnesses.fill(0.0);
    }

    /// Discards all genomes and fitness scores in favor of a fresh random
    /// population, as for an external restart.
    pub fn reset(&mut self, rng: &mut impl Rng) {
        self.genomes = (0..self.config.population_size)
            .map(|_| Genome::random(self.config.dna_length, self.config.thrust_cap, rng))
            .collect();
        self.fitnesses.fill(0.0);
    }
}
