mod common;

use castle_escape::{
    app::BaselineConfig,
    encode,
    ports::{Observer, Trainer},
    q_learning::BaselineTrainer,
    types::{Action, Health},
};
use common::{Recorder, ScriptedEnvironment, obs, open_castle, pos, transition};

#[test]
fn exploration_delegates_to_the_environment_sampler() {
    let mut trainer = BaselineTrainer::new(&BaselineConfig::default().with_seed(3)).unwrap();
    let start = obs(1, 1, Health::Full, None);
    let mut env = ScriptedEnvironment::new(
        start,
        vec![
            transition(obs(1, 1, Health::Full, None), 0.0, false),
            transition(obs(1, 1, Health::Full, None), 0.0, false),
            transition(obs(1, 1, Health::Full, None), 5.0, true),
        ],
    );
    env.sampled_action = Action::Left;

    let report = trainer.run_episode(0, &mut env, &mut []).unwrap();

    assert_eq!(report.steps, 3);
    assert_eq!(env.sample_calls, 3);
    assert!(env.actions.iter().all(|a| *a == Action::Left));
    assert!(report.success);
    assert_eq!(trainer.visits().total(), 3);
}

#[test]
fn greedy_choice_breaks_ties_toward_up() {
    let config = BaselineConfig::default()
        .with_epsilon(0.0)
        .with_min_epsilon(0.0)
        .with_seed(1);
    let mut trainer = BaselineTrainer::new(&config).unwrap();
    let start = obs(2, 2, Health::Full, None);
    let mut env = ScriptedEnvironment::new(start, vec![transition(start, 1.0, true)]);

    trainer.run_episode(0, &mut env, &mut []).unwrap();

    assert_eq!(env.actions, vec![Action::Up]);
    assert_eq!(env.sample_calls, 0);
}

#[test]
fn repeated_visits_converge_to_the_mean_target() {
    let mut trainer = BaselineTrainer::new(&BaselineConfig::default()).unwrap();
    let s = encode(&obs(0, 1, Health::Full, None));
    let terminal = encode(&obs(4, 4, Health::Full, None));

    let rewards = [3.0, -1.0, 4.0, 1.0, 5.0, -9.0];
    let mut q = 0.0;
    for (i, reward) in rewards.iter().enumerate() {
        q = trainer.update(s, Action::Right, *reward, terminal);
        let mean = rewards[..=i].iter().sum::<f64>() / (i + 1) as f64;
        assert!((q - mean).abs() < 1e-9, "after {} updates", i + 1);
    }
    assert!((q - 0.5).abs() < 1e-9);
}

#[test]
fn epsilon_never_increases_and_respects_the_floor() {
    let config = BaselineConfig::default()
        .with_epsilon_decay(0.5)
        .with_min_epsilon(0.05)
        .with_seed(11);
    let mut trainer = BaselineTrainer::new(&config).unwrap();
    let mut env = open_castle(pos(3, 4), 11);
    let recorder = Recorder::default();
    let mut observers: Vec<Box<dyn Observer>> = vec![Box::new(recorder.clone())];

    let mut previous = trainer.epsilon();
    for episode in 0..12 {
        let report = trainer.run_episode(episode, &mut env, &mut observers).unwrap();
        assert_eq!(report.epsilon, previous);
        assert!(report.terminated);
        assert!(trainer.epsilon() <= previous);
        assert!(trainer.epsilon() >= 0.05);
        previous = trainer.epsilon();
    }
    assert_eq!(previous, 0.05);

    let steps = recorder.steps().len() as u64;
    assert_eq!(trainer.visits().total(), steps);
}
