use ndarray::array;
use rstest::{fixture, rstest};

use independent_q_learning::space::{MultiBinary, TupleSpace};
use independent_q_learning::{ActionSpace, IndependentQLearner, IqlError};

fn discrete_learner(n_acts: &[usize], gamma: f64, epsilon: f64, seed: u64) -> IndependentQLearner {
    let spaces = n_acts.iter().map(|&n| ActionSpace::discrete(n)).collect();
    IndependentQLearner::new(n_acts.len(), spaces, gamma, 0.5, epsilon, seed).unwrap()
}

#[fixture]
fn two_by_two() -> IndependentQLearner {
    discrete_learner(&[2, 2], 0.9, 1.0, 42)
}

#[rstest]
fn unseen_pairs_read_zero(two_by_two: IndependentQLearner) {
    for agent in 0..2 {
        for action in 0..2 {
            assert_eq!(two_by_two.q_value(agent, &"never seen", action).unwrap(), 0.0);
        }
    }
}

#[rstest]
#[case(1.0, 0.5)]
#[case(-3.0, 0.1)]
#[case(0.25, 1.0)]
fn first_update_is_learning_rate_times_reward(#[case] reward: f64, #[case] learning_rate: f64) {
    let mut learner = IndependentQLearner::new(
        1,
        vec![ActionSpace::discrete(3)],
        0.9,
        learning_rate,
        1.0,
        0,
    )
    .unwrap();
    let updated = learner.learn(&[5u32], &[2], &[reward], &[5u32], false).unwrap();
    assert_eq!(updated, vec![learning_rate * reward]);
    assert_eq!(learner.q_value(0, &5u32, 2).unwrap(), learning_rate * reward);
}

#[rstest]
#[case(0.5, 30)]
#[case(0.1, 100)]
#[case(0.9, 10)]
fn repeated_updates_converge_monotonically(#[case] learning_rate: f64, #[case] steps: usize) {
    let mut learner =
        IndependentQLearner::new(1, vec![ActionSpace::discrete(2)], 0.9, learning_rate, 1.0, 0)
            .unwrap();
    // a terminal-like successor that is never written keeps the target fixed at the reward
    let target = 2.0;
    let mut distance = f64::INFINITY;
    for _ in 0..steps {
        let value = learner.learn(&[0u8], &[1], &[target], &[1u8], false).unwrap()[0];
        let new_distance = (target - value).abs();
        assert!(new_distance < distance);
        distance = new_distance;
    }
}

#[rstest]
fn full_exploration_is_uniform() {
    let mut learner = discrete_learner(&[4, 3], 0.9, 1.0, 2024);
    let trials = 12_000;
    let mut counts = [vec![0usize; 4], vec![0usize; 3]];
    for _ in 0..trials {
        let actions = learner.act(&[0usize, 0]).unwrap();
        counts[0][actions[0]] += 1;
        counts[1][actions[1]] += 1;
    }
    // chi-square critical values at p = 0.001 for 3 and 2 degrees of freedom
    for (agent_counts, critical) in counts.iter().zip([16.27, 13.82]) {
        let expected = trials as f64 / agent_counts.len() as f64;
        let chi_square: f64 = agent_counts
            .iter()
            .map(|&c| (c as f64 - expected).powi(2) / expected)
            .sum();
        assert!(chi_square < critical, "chi-square {} for {:?}", chi_square, agent_counts);
    }
}

#[rstest]
fn greedy_picks_strictly_best_action() {
    let mut learner = discrete_learner(&[4, 4], 0.0, 0.0, 42);
    learner
        .learn(&["s", "s"], &[2, 0], &[1.0, -1.0], &["t", "t"], false)
        .unwrap();
    for _ in 0..100 {
        let actions = learner.act(&["s", "s"]).unwrap();
        assert_eq!(actions[0], 2);
        // agent 1 lowered action 0, so action 1 is the first maximum
        assert_eq!(actions[1], 1);
    }
}

#[rstest]
fn unseen_observation_exploits_action_zero() {
    let mut learner = discrete_learner(&[3, 5], 0.9, 0.0, 42);
    for step in 0..50u64 {
        assert_eq!(learner.act(&[step, step + 1]).unwrap(), vec![0, 0]);
    }
}

#[rstest]
#[case(1)]
#[case(10)]
#[case(997)]
fn schedule_endpoints(mut two_by_two: IndependentQLearner, #[case] max_timestep: u64) {
    two_by_two.schedule_hyperparameters(0, max_timestep).unwrap();
    assert!((two_by_two.epsilon() - 1.0).abs() < 1e-9);
    assert!((two_by_two.learning_rate() - 0.05).abs() < 1e-9);

    two_by_two
        .schedule_hyperparameters(max_timestep, max_timestep)
        .unwrap();
    assert!(two_by_two.epsilon().abs() < 1e-9);
    assert!((two_by_two.learning_rate() - 0.01).abs() < 1e-9);

    // recomputing is idempotent
    two_by_two
        .schedule_hyperparameters(max_timestep, max_timestep)
        .unwrap();
    assert!(two_by_two.epsilon().abs() < 1e-9);
}

#[rstest]
fn schedule_rejects_zero_horizon(mut two_by_two: IndependentQLearner) {
    assert!(matches!(
        two_by_two.schedule_hyperparameters(0, 0),
        Err(IqlError::Domain { .. })
    ));
    assert_eq!(two_by_two.epsilon(), 1.0);
    assert_eq!(two_by_two.learning_rate(), 0.5);
}

#[rstest]
fn two_agent_scenario(mut two_by_two: IndependentQLearner) {
    let obs = [0usize, 0];
    let actions = two_by_two.act(&obs).unwrap();
    assert!(actions.iter().all(|&a| a < 2));

    let learning_rate = two_by_two.learning_rate();
    let updated = two_by_two
        .learn(&obs, &actions, &[1.0, -1.0], &obs, false)
        .unwrap();
    assert_eq!(updated, vec![learning_rate * 1.0, learning_rate * -1.0]);
    assert_eq!(
        two_by_two.q_value(0, &0usize, actions[0]).unwrap(),
        learning_rate * 1.0
    );
    assert_eq!(
        two_by_two.q_value(1, &0usize, actions[1]).unwrap(),
        learning_rate * -1.0
    );
}

#[rstest]
fn array_observations_are_canonicalised() {
    let mut learner = discrete_learner(&[2], 0.0, 0.0, 42);
    let obs = array![[0.5, 1.0], [1.5, 2.0]];
    learner
        .learn(&[obs.clone()], &[1], &[3.0], &[obs.clone()], false)
        .unwrap();
    // a copy with a different memory layout is the same observation
    let copy = obs.t().to_owned().t().to_owned();
    assert_eq!(learner.greedy_act(&[copy]).unwrap(), vec![1]);
    assert_eq!(learner.q_value(0, &obs, 1).unwrap(), 1.5);
    // same numbers in another shape are a different observation
    let flat = array![0.5, 1.0, 1.5, 2.0];
    assert_eq!(learner.q_value(0, &flat, 1).unwrap(), 0.0);
}

#[rstest]
fn composite_action_spaces_are_flattened() {
    let spaces = vec![
        TupleSpace::new(vec![ActionSpace::discrete(2), MultiBinary::new(2).into()]).into(),
        ActionSpace::discrete(1),
    ];
    let mut learner = IndependentQLearner::new(2, spaces, 0.9, 0.5, 1.0, 3).unwrap();
    assert_eq!(learner.n_acts(), &[4, 1]);
    for _ in 0..200 {
        let actions = learner.act(&[(), ()]).unwrap();
        assert!(actions[0] < 4);
        assert_eq!(actions[1], 0);
    }
    assert!(matches!(
        learner.learn(&[(), ()], &[4, 0], &[0.0, 0.0], &[(), ()], true),
        Err(IqlError::OutOfRange { agent: 0, action: 4, n_actions: 4 })
    ));
}

#[rstest]
fn action_probabilities_follow_epsilon(mut two_by_two: IndependentQLearner) {
    two_by_two.schedule_hyperparameters(1, 2).unwrap();
    let probs = two_by_two.action_probabilities(0, &0usize).unwrap();
    assert!((probs[0] - 0.75).abs() < 1e-9);
    assert!((probs[1] - 0.25).abs() < 1e-9);
}

#[rstest]
fn same_seed_same_trajectory() {
    let mut a = discrete_learner(&[5, 5], 0.9, 0.3, 9);
    let mut b = discrete_learner(&[5, 5], 0.9, 0.3, 9);
    for step in 0..100usize {
        let obs = [step % 3, step % 4];
        let left = a.act(&obs).unwrap();
        let right = b.act(&obs).unwrap();
        assert_eq!(left, right);
        let rewards = [left[0] as f64, -(left[1] as f64)];
        a.learn(&obs, &left, &rewards, &obs, false).unwrap();
        b.learn(&obs, &right, &rewards, &obs, false).unwrap();
    }
}
