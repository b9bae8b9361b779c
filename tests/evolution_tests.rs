use fastrand::Rng;
use nestforge::config::EvolutionConfig;
use nestforge::geometry::{PieceSet, Point, Polygon};
use nestforge::optimizer::{
    EvolutionState, GenerationHistory, NoProgress, Optimizer, OptimizerParams,
};
use nestforge::scorer::{BoundingBoxArea, FitnessMode, Objective, Scorer};
use nestforge::workspace::Workspace;
use rstest::rstest;
use std::sync::Arc;

fn workspace() -> Workspace {
    Workspace::new(1300.0, 2500.0, 10.0, 10.0).unwrap()
}

fn bbox_config(
    population_size: usize,
    elite_size: usize,
    crossover_rate: f64,
    generations: usize,
) -> EvolutionConfig {
    EvolutionConfig {
        population_size,
        elite_size,
        crossover_rate,
        generations,
        fitness_mode: FitnessMode::BoundingBox,
        ..Default::default()
    }
}

fn square(size: f64) -> Polygon {
    Polygon::new(vec![
        Point::new(0.0, 0.0),
        Point::new(size, 0.0),
        Point::new(size, size),
        Point::new(0.0, size),
    ])
    .unwrap()
}

fn three_squares() -> Arc<PieceSet> {
    Arc::new(PieceSet::new(vec![square(100.0), square(100.0), square(60.0)]).unwrap())
}

#[test]
fn test_one_generation_of_ten_two_piece_genomes() {
    let cfg = bbox_config(10, 2, 0.5, 1);
    let sizes = cfg.offspring_sizes().unwrap();
    assert_eq!(sizes.crossover, 4);
    assert_eq!(sizes.mutation, 4);
    assert_eq!(sizes.parent, 12);

    let mut opt = Optimizer::new(cfg, workspace(), 2, BoundingBoxArea, Rng::with_seed(42)).unwrap();
    let report = opt.step().unwrap().expect("one generation to run");
    assert_eq!(report.generation, 0);

    assert_eq!(opt.state(), EvolutionState::Terminated);
    assert_eq!(opt.population().len(), 10);
    assert!(opt.population().genomes().iter().all(|g| g.len() == 4));
    assert!(opt.step().unwrap().is_none());
}

#[rstest]
#[case(10, 2, 0.5, 4)]
#[case(100, 6, 0.7, 66)]
#[case(7, 0, 1.0, 7)]
#[case(5, 4, 0.0, 0)]
#[case(11, 3, 0.3, 2)]
// 0.25 * 10 = 2.5 rounds away from zero
#[case(12, 2, 0.25, 3)]
fn test_population_size_is_constant(
    #[case] pop: usize,
    #[case] elite: usize,
    #[case] rate: f64,
    #[case] expected_crossover: usize,
) {
    let cfg = bbox_config(pop, elite, rate, 4);
    let sizes = cfg.offspring_sizes().unwrap();
    assert_eq!(sizes.crossover, expected_crossover);
    assert_eq!(sizes.elite + sizes.crossover + sizes.mutation, pop);
    assert_eq!(sizes.parent, 2 * sizes.crossover + sizes.mutation);

    let mut opt = Optimizer::new(cfg, workspace(), 3, BoundingBoxArea, Rng::with_seed(1)).unwrap();
    while opt.step().unwrap().is_some() {
        assert_eq!(opt.population().len(), pop);
        assert_eq!(opt.population().genome_len(), 6);
    }
}

/// Sum of squared distances of every reference point from the origin.
struct PullToOrigin;

impl Objective for PullToOrigin {
    fn evaluate(&self, genes: &[f64]) -> f64 {
        genes.iter().map(|g| g * g).sum()
    }
}

#[rstest]
#[case::bounding_box(FitnessMode::BoundingBox)]
#[case::overlap_aware(FitnessMode::OverlapAware)]
fn test_best_fitness_never_regresses(#[case] mode: FitnessMode) {
    let cfg = EvolutionConfig {
        population_size: 30,
        generations: 40,
        elite_size: 1,
        fitness_mode: mode,
        mutation_rate: 0.2,
        ..Default::default()
    };

    let mut opt = OptimizerParams::builder()
        .config(cfg)
        .workspace(workspace())
        .pieces(three_squares())
        .seed(Some(5))
        .build()
        .build_optimizer()
        .unwrap();

    let history = GenerationHistory::new();
    let result = opt.run(&history).unwrap();
    let reports = history.reports();
    assert_eq!(reports.len(), 40);

    for pair in reports.windows(2) {
        assert!(
            pair[1].best_fitness <= pair[0].best_fitness,
            "generation {} regressed: {} -> {}",
            pair[1].generation,
            pair[0].best_fitness,
            pair[1].best_fitness
        );
    }
    assert!(result.fitness <= reports[39].best_fitness);
    assert_eq!(result.generations, 40);
}

#[test]
fn test_custom_objective_improves() {
    let cfg = bbox_config(40, 2, 0.7, 60);
    let mut opt = Optimizer::new(cfg, workspace(), 4, PullToOrigin, Rng::with_seed(8)).unwrap();

    let first = opt.step().unwrap().unwrap();
    let result = opt.run(NoProgress).unwrap();
    assert!(result.fitness < first.best_fitness);
    assert_eq!(PullToOrigin.evaluate(result.genome.genes()), result.fitness);
}

#[test]
fn test_fixed_seed_is_bit_identical() {
    let run = |seed: u64| {
        let cfg = EvolutionConfig {
            population_size: 24,
            generations: 15,
            elite_size: 2,
            ..Default::default()
        };
        OptimizerParams::builder()
            .config(cfg)
            .workspace(workspace())
            .pieces(three_squares())
            .seed(Some(seed))
            .build()
            .build_optimizer()
            .unwrap()
            .run(NoProgress)
            .unwrap()
    };

    let a = run(99);
    let b = run(99);
    assert_eq!(a.genome.genes(), b.genome.genes());
    assert_eq!(a.fitness.to_bits(), b.fitness.to_bits());
    assert_eq!(a.best_index, b.best_index);
    assert_eq!(a.fingerprint(), b.fingerprint());

    let c = run(100);
    assert_ne!(a.fingerprint(), c.fingerprint());
}

#[test]
fn test_single_piece_has_zero_fitness_and_first_index_wins() {
    let cfg = bbox_config(8, 2, 0.5, 5);
    let mut opt = Optimizer::new(cfg, workspace(), 1, BoundingBoxArea, Rng::with_seed(3)).unwrap();

    while let Some(report) = opt.step().unwrap() {
        assert_eq!(report.best_fitness, 0.0);
        assert_eq!(report.mean_fitness, 0.0);
        assert_eq!(report.best_index, 0);
    }

    let result = opt.best().unwrap();
    assert_eq!(result.fitness, 0.0);
    assert_eq!(result.best_index, 0);
    assert_eq!(result.genome.len(), 2);
}

#[test]
fn test_overlap_aware_run_ends_feasible() {
    let pieces = three_squares();
    let cfg = EvolutionConfig {
        population_size: 40,
        generations: 30,
        ..Default::default()
    };

    let mut opt = OptimizerParams::builder()
        .config(cfg)
        .workspace(workspace())
        .pieces(pieces.clone())
        .seed(Some(17))
        .build()
        .build_optimizer()
        .unwrap();
    let result = opt.run(NoProgress).unwrap();

    let Scorer::OverlapAware(objective) = opt.objective() else {
        panic!("default fitness mode should be overlap aware");
    };
    assert!(objective.violations(result.genome.genes()).is_feasible());
    assert!(result.fitness < workspace().area());
}

#[test]
fn test_invalid_configuration_fails_at_construction() {
    let cfg = bbox_config(4, 4, 0.5, 10);
    let res = Optimizer::new(cfg, workspace(), 2, BoundingBoxArea, Rng::with_seed(0));
    assert!(res.is_err());

    let res = Optimizer::new(
        bbox_config(4, 1, 0.5, 10),
        workspace(),
        0,
        BoundingBoxArea,
        Rng::with_seed(0),
    );
    assert!(res.is_err());
}
