use horde_sim::SimConfig;
use horde_sim::sim::{GameEvent, GamePhase, GameState};
use proptest::prelude::*;

fn count_level_ups(state: &GameState) -> usize {
    state
        .events()
        .count(|e| matches!(e, GameEvent::LevelUp { .. }))
}

/// Pick the first offered upgrade until no prompt remains
fn settle(state: &mut GameState) {
    while let Some(&id) = state.upgrade_choices().and_then(|c| c.first()) {
        state.select_upgrade(id).unwrap();
    }
}

#[test]
fn gain_crossing_two_thresholds_levels_twice() {
    let mut state = GameState::new(SimConfig::default(), 11);
    // Thresholds are 10, then 18
    state.gain_experience(28.0);
    assert_eq!(state.player.level, 3);
    assert_eq!(count_level_ups(&state), 2);
    assert!(state.player.experience.abs() < 1e-4);
    assert_eq!(state.progression.pending_level_ups(), 2);
    assert_eq!(state.phase(), GamePhase::LevelingUp);

    // One prompt per level, the pause holds across both
    let first = state.upgrade_choices().unwrap()[0];
    state.select_upgrade(first).unwrap();
    assert_eq!(state.phase(), GamePhase::LevelingUp);
    assert!(state.is_paused());
    let second = state.upgrade_choices().unwrap()[0];
    state.select_upgrade(second).unwrap();
    assert_eq!(state.phase(), GamePhase::Playing);
    assert!(!state.is_paused());
}

#[test]
fn experience_gain_multiplier_scales_collected_experience() {
    let mut state = GameState::new(SimConfig::default(), 11);
    state.player.modifiers.experience_gain = 2.0;
    // 5 raw becomes 10, exactly the first threshold
    state.gain_experience(5.0);
    assert_eq!(state.player.level, 2);
    assert_eq!(count_level_ups(&state), 1);
    assert!(state.events().iter().any(
        |e| matches!(e, GameEvent::ExperienceCollected { value, .. } if (*value - 10.0).abs() < 1e-4)
    ));

    let mut plain = GameState::new(SimConfig::default(), 11);
    plain.gain_experience(5.0);
    assert_eq!(plain.player.level, 1);
    assert!((plain.player.experience - 5.0).abs() < 1e-4);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn level_and_threshold_never_decrease(
        seed in any::<u64>(),
        gains in prop::collection::vec(0.0f32..60.0, 1..40),
    ) {
        let mut state = GameState::new(SimConfig::default(), seed);
        let mut level = state.player.level;
        let mut threshold = state.player.experience_to_next_level;

        for gain in gains {
            state.world.events.clear();
            state.gain_experience(gain);
            let after = state.player.level;
            prop_assert!(after >= level);
            prop_assert_eq!(count_level_ups(&state), (after - level) as usize);
            prop_assert!(state.player.experience_to_next_level >= threshold);
            prop_assert!(state.player.experience < state.player.experience_to_next_level);
            level = after;
            threshold = state.player.experience_to_next_level;
            settle(&mut state);
            prop_assert_eq!(state.progression.pending_level_ups(), 0);
        }
    }
}
