//! End-to-end tests of the search with the varisat backend.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use dfa_sat::decode::induced_model;
use dfa_sat::dfa::Dfa;
use dfa_sat::encode::{encode, EncodeOptions};
use dfa_sat::reference::ReferenceAutomaton;
use dfa_sat::search::{minimise, solve_size, SearchError, SearchOptions};
use dfa_sat::solver::VarisatBackend;

// ─── Helpers ───────────────────────────────────────────────────────────────────

fn random_dfa(rng: &mut ChaCha8Rng, num_states: usize, num_symbols: usize) -> Dfa {
    let delta = (0..num_states)
        .map(|_| (0..num_symbols).map(|_| rng.random_range(0..num_states)).collect())
        .collect();
    let finals = (0..num_states).map(|_| rng.random_bool(0.5)).collect();
    Dfa::new(delta, finals)
}

/// Prefix tree of random words, with every word's end labeled by `target`.
fn sample_tree(rng: &mut ChaCha8Rng, target: &Dfa, num_words: usize, max_len: usize) -> ReferenceAutomaton {
    let k = target.num_symbols();
    let mut children: Vec<Vec<Option<usize>>> = vec![vec![None; k]];
    let mut transitions = Vec::new();
    let mut accepting = Vec::new();
    let mut rejecting = Vec::new();

    for _ in 0..num_words {
        let len = rng.random_range(0..=max_len);
        let word: Vec<usize> = (0..len).map(|_| rng.random_range(0..k)).collect();
        let mut node = 0;
        for &a in &word {
            node = match children[node][a] {
                Some(next) => next,
                None => {
                    let next = children.len();
                    children.push(vec![None; k]);
                    children[node][a] = Some(next);
                    transitions.push((node, a, next));
                    next
                }
            };
        }
        if target.accepts(&word) {
            accepting.push(node);
        } else {
            rejecting.push(node);
        }
    }

    ReferenceAutomaton::new(children.len(), k, 0, transitions, accepting, rejecting).unwrap()
}

/// All words over `0..num_symbols` of length at most `max_len`.
fn all_words(num_symbols: usize, max_len: usize) -> Vec<Vec<usize>> {
    let mut words = vec![Vec::new()];
    let mut last = vec![Vec::new()];
    for _ in 0..max_len {
        last = last
            .iter()
            .flat_map(|word: &Vec<usize>| {
                (0..num_symbols).map(move |a| {
                    let mut next = word.clone();
                    next.push(a);
                    next
                })
            })
            .collect();
        words.extend(last.iter().cloned());
    }
    words
}

/// Checks every word up to `max_len` that ends in a labeled reference state.
fn assert_labels_respected(dfa: &Dfa, reference: &ReferenceAutomaton, max_len: usize) {
    for word in all_words(reference.num_symbols(), max_len) {
        if let Some(r) = reference.walk(&word) {
            if reference.accepting().contains(&r) {
                assert!(dfa.accepts(&word), "{:?} must be accepted by\n{}", word, dfa);
            } else if reference.rejecting().contains(&r) {
                assert!(!dfa.accepts(&word), "{:?} must be rejected by\n{}", word, dfa);
            }
        }
    }
}

// ─── Concrete scenarios ────────────────────────────────────────────────────────

#[test]
fn two_samples_need_two_states() {
    let reference = ReferenceAutomaton::new(2, 2, 0, [(0, 0, 0), (0, 1, 1)], [1], [0]).unwrap();

    let (dfa, attempt) = solve_size(&reference, 1, &EncodeOptions::default(), &mut VarisatBackend).unwrap();
    assert!(dfa.is_none());
    assert!(!attempt.satisfiable);

    let solution = minimise(&reference, &SearchOptions::default(), &mut VarisatBackend).unwrap();
    let dfa = solution.dfa;
    assert_eq!(dfa.num_states(), 2);
    assert!(!dfa.is_final(0));
    assert!(dfa.is_final(1));
    assert_eq!(dfa.successor(0, 0), 0);
    assert_eq!(dfa.successor(0, 1), 1);
    assert!(dfa.is_consistent_with(&reference));
}

#[test]
fn looping_reference_labels_every_lap() {
    // (01)* is accepted, (01)*1 is rejected; the loop 0 -> 1 -> 0 can be taken any number of times.
    let reference = ReferenceAutomaton::new(3, 2, 0, [(0, 0, 1), (1, 1, 0), (0, 1, 2)], [0], [2]).unwrap();
    let solution = minimise(&reference, &SearchOptions::default(), &mut VarisatBackend).unwrap();
    let dfa = solution.dfa;

    assert_eq!(dfa.num_states(), 2);
    assert!(dfa.is_consistent_with(&reference));
    assert!(dfa.accepts(&[0, 1, 0, 1]));
    assert!(dfa.accepts(&[0, 1, 0, 1, 0, 1]));
    assert!(!dfa.accepts(&[0, 1, 0, 1, 1]));
    assert_labels_respected(&dfa, &reference, 8);
}

#[test]
fn merging_paths_share_a_label() {
    // "01" and "10" both reach the accepting state 3; "0" and "1" are rejected.
    let reference =
        ReferenceAutomaton::new(4, 2, 0, [(0, 0, 1), (0, 1, 2), (1, 1, 3), (2, 0, 3)], [3], [1, 2]).unwrap();
    let solution = minimise(&reference, &SearchOptions::default(), &mut VarisatBackend).unwrap();
    let dfa = solution.dfa;

    assert_eq!(dfa.num_states(), 2);
    assert!(dfa.is_consistent_with(&reference));
    assert!(dfa.accepts(&[0, 1]));
    assert!(dfa.accepts(&[1, 0]));
    assert!(!dfa.accepts(&[0]));
    assert!(!dfa.accepts(&[1]));
}

#[test]
fn accepting_only_needs_one_state() {
    let reference = ReferenceAutomaton::new(3, 2, 0, [(0, 0, 1), (1, 1, 2)], [0, 1, 2], []).unwrap();
    let solution = minimise(&reference, &SearchOptions::default(), &mut VarisatBackend).unwrap();
    assert_eq!(solution.attempts.len(), 1);
    assert_eq!(solution.dfa, Dfa::new(vec![vec![0, 0]], vec![true]));
}

#[test]
fn rejecting_only_needs_one_state() {
    let reference = ReferenceAutomaton::new(2, 1, 0, [(0, 0, 1)], [], [1]).unwrap();
    let solution = minimise(&reference, &SearchOptions::default(), &mut VarisatBackend).unwrap();
    assert_eq!(solution.dfa, Dfa::new(vec![vec![0]], vec![false]));
}

#[test]
fn cyclic_reference() {
    // Parity of 1s, with both states labeled: exactly two states are needed.
    let reference =
        ReferenceAutomaton::new(2, 2, 0, [(0, 0, 0), (0, 1, 1), (1, 0, 1), (1, 1, 0)], [0], [1]).unwrap();
    let solution = minimise(&reference, &SearchOptions::default(), &mut VarisatBackend).unwrap();
    let dfa = solution.dfa;
    assert_eq!(dfa, Dfa::new(vec![vec![0, 1], vec![1, 0]], vec![true, false]));
}

#[test]
fn counting_modulo_three() {
    // Words over {0} of length 0..9, accepted iff length is divisible by 3.
    let transitions: Vec<_> = (0..9).map(|i| (i, 0, i + 1)).collect();
    let accepting: Vec<_> = (0..10).filter(|i| i % 3 == 0).collect();
    let rejecting: Vec<_> = (0..10).filter(|i| i % 3 != 0).collect();
    let reference = ReferenceAutomaton::new(10, 1, 0, transitions, accepting, rejecting).unwrap();

    let solution = minimise(&reference, &SearchOptions::default(), &mut VarisatBackend).unwrap();
    assert_eq!(solution.attempts.len(), 3);
    assert_eq!(
        solution.dfa,
        Dfa::new(vec![vec![1], vec![2], vec![0]], vec![true, false, false])
    );
}

#[test]
fn unreachable_samples_are_ignored() {
    // State 2 is rejecting but unreachable; the empty word is accepted.
    let reference = ReferenceAutomaton::new(3, 1, 0, [(2, 0, 1)], [0], [2]).unwrap();
    let solution = minimise(&reference, &SearchOptions::default(), &mut VarisatBackend).unwrap();
    assert_eq!(solution.dfa.num_states(), 1);
}

#[test]
fn exhausted_below_minimum() {
    let reference = ReferenceAutomaton::new(2, 2, 0, [(0, 0, 0), (0, 1, 1)], [1], [0]).unwrap();
    let options = SearchOptions::default().with_upper_bound(1);
    let result = minimise(&reference, &options, &mut VarisatBackend);
    assert!(matches!(result, Err(SearchError::Exhausted { lower: 1, upper: 1 })));
}

// ─── Random samples ────────────────────────────────────────────────────────────

#[test]
fn random_samples_minimal_canonical_consistent() {
    let mut rng = ChaCha8Rng::seed_from_u64(42);

    for _ in 0..20 {
        let size = rng.random_range(1..=4);
        let target = random_dfa(&mut rng, size, 2);
        let reference = sample_tree(&mut rng, &target, 12, 6);

        let solution = minimise(&reference, &SearchOptions::default(), &mut VarisatBackend).unwrap();
        let dfa = &solution.dfa;
        let n = dfa.num_states();

        assert!(dfa.is_consistent_with(&reference));
        assert!(dfa.is_bfs_canonical(), "not canonical:\n{}", dfa);
        assert!(n <= target.num_states());

        // Every smaller size was tried and refuted, in increasing order.
        let sizes: Vec<usize> = solution.attempts.iter().map(|a| a.num_states).collect();
        assert_eq!(sizes, (1..=n).collect::<Vec<_>>());
        assert!(solution.attempts[..n - 1].iter().all(|a| !a.satisfiable));

        // The model induced by the result satisfies the full encoding.
        let encoding = encode(n, &reference, &EncodeOptions::default());
        let model = induced_model(dfa, &encoding.vars, &reference);
        assert_eq!(encoding.cnf.first_violated(&model), None);
    }
}

#[test]
fn random_cyclic_references_fully_respected() {
    let mut rng = ChaCha8Rng::seed_from_u64(11);

    for _ in 0..15 {
        let size = rng.random_range(1..=5);
        let target = random_dfa(&mut rng, size, 2);
        // The target itself, with a random part of its states left unlabeled.
        let transitions: Vec<_> = (0..size)
            .flat_map(|p| (0..2).map(move |a| (p, a)))
            .map(|(p, a)| (p, a, target.successor(p, a)))
            .collect();
        let labeled: Vec<usize> = (0..size).filter(|_| rng.random_bool(0.7)).collect();
        let accepting: Vec<usize> = labeled.iter().copied().filter(|&q| target.is_final(q)).collect();
        let rejecting: Vec<usize> = labeled.iter().copied().filter(|&q| !target.is_final(q)).collect();
        let reference = ReferenceAutomaton::new(size, 2, 0, transitions, accepting, rejecting).unwrap();

        let solution = minimise(&reference, &SearchOptions::default(), &mut VarisatBackend).unwrap();
        assert!(solution.dfa.num_states() <= size);
        assert!(solution.dfa.is_consistent_with(&reference));
        assert_labels_respected(&solution.dfa, &reference, 7);
    }
}

#[test]
fn symmetry_breaking_preserves_minimum() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);

    for _ in 0..10 {
        let size = rng.random_range(1..=3);
        let target = random_dfa(&mut rng, size, 2);
        let reference = sample_tree(&mut rng, &target, 10, 5);

        let with = minimise(&reference, &SearchOptions::default(), &mut VarisatBackend).unwrap();
        let options = SearchOptions::default().with_symmetry_breaking(false);
        let without = minimise(&reference, &options, &mut VarisatBackend).unwrap();

        assert_eq!(with.dfa.num_states(), without.dfa.num_states());
        assert!(without.dfa.is_consistent_with(&reference));
    }
}

#[test]
fn result_is_a_valid_reference() {
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let target = random_dfa(&mut rng, 3, 2);
    let reference = sample_tree(&mut rng, &target, 12, 6);
    let first = minimise(&reference, &SearchOptions::default(), &mut VarisatBackend).unwrap();

    // Minimising the result against itself gives it back.
    let text = first.dfa.to_fa_string();
    let again = ReferenceAutomaton::from_fa_string(&text).unwrap();
    let second = minimise(&again, &SearchOptions::default(), &mut VarisatBackend).unwrap();
    assert_eq!(second.dfa, first.dfa);
}
