mod common;

use approx::assert_relative_eq;
use common::{load_graph, parse_graph, relabel};
use rand::rngs::StdRng;
use rand::SeedableRng;
use smatch_hill_climbing::candidate_pool::CandidatePool;
use smatch_hill_climbing::graph::{Graph, Triple};
use smatch_hill_climbing::hill_climbing::best_match;
use smatch_hill_climbing::{
    compute_f, smatch_score, GraphSource, RunningTotals, Smatch, SmatchConfig, SmatchError,
    TripleKinds, TripleSelection, Triples,
};

const FIXTURES: &[&str] = &[
    "graphs/amr/want_boy.triples",
    "graphs/amr/want_girl.triples",
    "graphs/amr/believe.triples",
    "graphs/amr/believe_pred.triples",
    "graphs/amr/boys.triples",
    "graphs/amr/boys_pred.triples",
    "graphs/amr/weather.triples",
];

fn scorer(restarts: usize) -> Smatch {
    Smatch::seeded(SmatchConfig::default().restarts(restarts), 17)
}

#[test]
fn test_identical_graphs() {
    for file in FIXTURES {
        let a = load_graph(file, "a");
        let b = load_graph(file, "b");
        for &restarts in &[0, 1, 4] {
            let pair = scorer(restarts).match_pair(&a, &b);
            assert_eq!(a.num_triples() as u32, pair.num_matches, "{}", file);
            let s = pair.scores();
            assert_eq!(1.0, s.precision);
            assert_eq!(1.0, s.recall);
            assert_eq!(1.0, s.f_score);
        }
    }
}

#[test]
fn test_want_boy() {
    let a = load_graph("graphs/amr/want_boy.triples", "a");
    let b = load_graph("graphs/amr/want_boy.triples", "b");
    let pair = scorer(4).match_pair(&a, &b);
    assert_eq!((3, 3, 3), (pair.num_matches, pair.num_test, pair.num_gold));
    assert_eq!(1.0, pair.scores().f_score);
}

#[test]
fn test_want_girl() {
    // the want-01 instance and the ARG0 relation match, boy/girl does not
    let a = load_graph("graphs/amr/want_boy.triples", "a");
    let b = load_graph("graphs/amr/want_girl.triples", "b");
    let pair = scorer(4).match_pair(&a, &b);
    assert_eq!((2, 3, 3), (pair.num_matches, pair.num_test, pair.num_gold));
    assert_relative_eq!(2.0 / 3.0, pair.scores().f_score, epsilon = 1e-9);
}

#[test]
fn test_attribute_requires_equal_value() {
    // ARG0 written as an attribute whose constant is a node name: the constants
    // differ between the graphs, so only the want-01 instance matches
    let a = Graph::from_triples(
        "a",
        vec![Triple::instance("a0", "want-01"), Triple::instance("a1", "boy")],
        vec![Triple::new("ARG0", "a0", "a1")],
        vec![],
    )
    .unwrap();
    let b = Graph::from_triples(
        "b",
        vec![Triple::instance("b0", "want-01"), Triple::instance("b1", "girl")],
        vec![Triple::new("ARG0", "b0", "b1")],
        vec![],
    )
    .unwrap();
    let pair = scorer(4).match_pair(&a, &b);
    assert_eq!((1, 3, 3), (pair.num_matches, pair.num_test, pair.num_gold));
}

#[test]
fn test_disjoint_graphs() {
    let a = load_graph("graphs/amr/weather.triples", "a");
    let b = load_graph("graphs/amr/want_boy.triples", "b");
    let pair = scorer(4).match_pair(&a, &b);
    assert_eq!(0, pair.num_matches);
    assert_eq!(0.0, pair.scores().f_score);
    assert_eq!(0.0, smatch_score(&a, &b, 2).f_score);
}

#[test]
fn test_similarity() {
    let gold = load_graph("graphs/amr/believe.triples", "b");
    let test = load_graph("graphs/amr/believe_pred.triples", "a");
    let pair = scorer(4).match_pair(&test, &gold);
    assert_eq!((6, 8, 9), (pair.num_matches, pair.num_test, pair.num_gold));
    let s = pair.scores();
    assert_relative_eq!(0.75, s.precision, epsilon = 1e-9);
    assert_relative_eq!(6.0 / 9.0, s.recall, epsilon = 1e-9);
    assert_relative_eq!(12.0 / 17.0, s.f_score, epsilon = 1e-9);

    let gold = load_graph("graphs/amr/boys.triples", "b");
    let test = load_graph("graphs/amr/boys_pred.triples", "a");
    let pair = scorer(4).match_pair(&test, &gold);
    assert_eq!((11, 13, 14), (pair.num_matches, pair.num_test, pair.num_gold));
    assert_relative_eq!(22.0 / 27.0, pair.scores().f_score, epsilon = 1e-9);
}

#[test]
fn test_swapping_test_and_gold() {
    let x = load_graph("graphs/amr/boys.triples", "a");
    let y = load_graph("graphs/amr/boys_pred.triples", "a");
    let forward = scorer(4).match_pair(&x, &y.with_prefix("b"));
    let backward = scorer(4).match_pair(&y, &x.with_prefix("b"));
    assert_eq!(forward.num_matches, backward.num_matches);
    let (f, b) = (forward.scores(), backward.scores());
    assert_relative_eq!(f.precision, b.recall, epsilon = 1e-9);
    assert_relative_eq!(f.recall, b.precision, epsilon = 1e-9);
    assert_relative_eq!(f.f_score, b.f_score, epsilon = 1e-9);

    let (s, t) = (compute_f(11, 13, 14), compute_f(11, 14, 13));
    assert_relative_eq!(s.precision, t.recall, epsilon = 1e-9);
    assert_relative_eq!(s.f_score, t.f_score, epsilon = 1e-9);
}

#[test]
fn test_invariant_to_relabeling() {
    let test = load_graph("graphs/amr/boys_pred.triples", "a");
    let gold = load_graph("graphs/amr/boys.triples", "b");
    let expected = scorer(4).match_pair(&test, &gold).num_matches;

    for permutation in &[[5, 4, 3, 2, 1, 0], [1, 0, 3, 2, 5, 4], [2, 5, 0, 4, 1, 3]] {
        let relabeled_gold = relabel(&gold, permutation).to_graph("b").unwrap();
        let relabeled_test = relabel(&test, permutation).to_graph("a").unwrap();
        assert_eq!(
            expected,
            scorer(4).match_pair(&test, &relabeled_gold).num_matches,
            "{:?}",
            permutation
        );
        assert_eq!(
            expected,
            scorer(4).match_pair(&relabeled_test, &gold).num_matches,
            "{:?}",
            permutation
        );
    }
}

#[test]
fn test_more_restarts_never_worse() {
    let pairs = [
        ("graphs/amr/believe_pred.triples", "graphs/amr/believe.triples"),
        ("graphs/amr/boys_pred.triples", "graphs/amr/boys.triples"),
        ("graphs/amr/boys.triples", "graphs/amr/believe.triples"),
    ];
    for (t, g) in &pairs {
        let test = load_graph(t, "a");
        let gold = load_graph(g, "b");
        let pool = CandidatePool::build(&test, &gold, TripleKinds::all());
        for seed in 0..5 {
            let few = best_match(&test, &gold, &pool, 4, &mut StdRng::seed_from_u64(seed));
            let many = best_match(&test, &gold, &pool, 50, &mut StdRng::seed_from_u64(seed));
            assert!(many.num_matches >= few.num_matches);
            assert!(many.mapping.is_injective());
        }
    }
}

#[test]
fn test_corpus_score() {
    let tests: Vec<Graph> = ["want_boy", "believe_pred", "boys_pred"]
        .iter()
        .map(|n| load_graph(&format!("graphs/amr/{}.triples", n), "a"))
        .collect();
    let golds: Vec<Graph> = ["want_girl", "believe", "boys"]
        .iter()
        .map(|n| load_graph(&format!("graphs/amr/{}.triples", n), "b"))
        .collect();

    let mut s = scorer(4);
    let pairs = s.process_batch(&tests, &golds).unwrap();
    assert_eq!(3, pairs.len());
    assert_eq!(
        RunningTotals {
            num_matches: 2 + 6 + 11,
            num_test: 3 + 8 + 13,
            num_gold: 3 + 9 + 14
        },
        s.totals()
    );
    assert_relative_eq!(2.0 * 19.0 / 50.0, s.metrics().f_score, epsilon = 1e-9);

    // two shards merged give the corpus totals
    let mut first = scorer(4);
    first.process_batch(&tests[..1], &golds[..1]).unwrap();
    let mut second = scorer(4);
    second.process_batch(&tests[1..], &golds[1..]).unwrap();
    assert_eq!(s.totals(), first.totals() + second.totals());

    let json = serde_json::to_value(s.metrics()).unwrap();
    assert_relative_eq!(0.76, json["SMATCH"].as_f64().unwrap(), epsilon = 1e-9);
    assert_relative_eq!(19.0 / 24.0, json["Precision"].as_f64().unwrap(), epsilon = 1e-9);
    assert_relative_eq!(19.0 / 26.0, json["Recall"].as_f64().unwrap(), epsilon = 1e-9);
}

#[test]
fn test_batch_recovers_malformed_graphs() {
    let gold = load_graph("graphs/amr/want_boy.triples", "b");
    let tests: Vec<Result<Graph, SmatchError>> = vec![
        Ok(load_graph("graphs/amr/want_boy.triples", "a")),
        parse_graph("instance w want-01\nrelation w ARG0", "a"),
        parse_graph("instance w want-01\ninstance w boy", "a"),
    ];
    assert!(tests[1].is_err());
    assert!(tests[2].is_err());
    let golds = vec![gold.clone(), gold.clone(), Graph::placeholder("b")];

    let mut s = scorer(0);
    let pairs = s.process_batch(&tests, &golds).unwrap();
    assert_eq!(3, pairs[0].num_matches);
    // placeholder (7 triples) against want_boy
    assert_eq!((3, 7, 3), (pairs[1].num_matches, pairs[1].num_test, pairs[1].num_gold));
    assert_eq!(7, pairs[2].num_matches);
    assert_eq!(3, s.num_pairs());
}

#[test]
fn test_batch_of_triples() {
    let sources = vec![
        Triples {
            prefix: "x".to_string(),
            instances: vec![Triple::instance("x0", "rain-01")],
            attributes: vec![Triple::new("TOP", "x0", "rain-01")],
            relations: vec![],
        },
        Triples {
            prefix: "x".to_string(),
            instances: vec![Triple::instance("x0", "rain-01")],
            attributes: vec![],
            relations: vec![Triple::new("time", "x0", "x7")],
        },
    ];
    let golds = vec![load_graph("graphs/amr/weather.triples", "b"); 2];

    let mut s = scorer(2);
    let pairs = s.process_batch(&sources, &golds).unwrap();
    assert_eq!((2, 2, 4), (pairs[0].num_matches, pairs[0].num_test, pairs[0].num_gold));
    // out-of-range node: placeholder is scored instead, sharing nothing with the gold graph
    assert_eq!((0, 7, 4), (pairs[1].num_matches, pairs[1].num_test, pairs[1].num_gold));

    let err = s.process_batch(&sources, &golds[..1]);
    assert_eq!(
        Err(SmatchError::BatchLengthMismatch { tests: 2, golds: 1 }),
        err
    );
}

#[test]
fn test_just_relation() {
    let config = SmatchConfig::new()
        .restarts(4)
        .just(false, false, true)
        .unwrap();
    assert_eq!(TripleSelection::JustRelation, config.selection);
    let mut s = Smatch::seeded(config, 3);
    let test = load_graph("graphs/amr/believe_pred.triples", "a");
    let gold = load_graph("graphs/amr/believe.triples", "b");
    let pair = s.process_pair(&test, &gold);
    assert_eq!((3, 4), (pair.num_test, pair.num_gold));
    // ARG0(w, g), ARG1(w, b2) and ARG0(b2, b) all fit under one mapping
    assert_eq!(3, pair.num_matches);

    assert_eq!(
        Err(SmatchError::ConflictingSelection),
        SmatchConfig::new().just(true, true, false)
    );
}

#[test]
fn test_verbose_logging() {
    let _ = env_logger::builder()
        .is_test(true)
        .filter_level(log::LevelFilter::Trace)
        .try_init();

    let config = SmatchConfig::default().document_level(false);
    let mut s = Smatch::seeded(config, 5);
    let test = load_graph("graphs/amr/boys_pred.triples", "a");
    let gold = load_graph("graphs/amr/boys.triples", "b");
    assert_eq!(11, s.process_pair(&test, &gold).num_matches);
    assert!(s.report().to_string().starts_with("11 13 14\n"));
}
