use volosd::{
    Error,
    backend::{DeviceKind, DeviceState, DeviceTarget},
    command::Command,
    display::{Icon, Progress},
    interpreter::{Options, TargetMode, execute},
    pactl::PactlBackend,
    test_support::{MockBackend, RecordingNotifier, ScriptedRunner},
};

fn output_at(volume: u32) -> MockBackend {
    let backend = MockBackend::new();
    backend.set_state(
        DeviceKind::Output,
        DeviceState {
            muted: false,
            volume,
        },
    );
    backend
}

#[test]
fn set_fifty_on_output() {
    let backend = output_at(20);
    let notifier = RecordingNotifier::new();
    let outcome = execute(Command::Set(50), &Options::default(), &backend, &notifier).unwrap();

    assert_eq!(
        backend.calls(),
        vec![
            "set_volume(output, default, 50%)",
            "get_mute(output, default)",
            "get_volume(output, default)",
        ]
    );
    assert!(!outcome.clamped);
    assert_eq!(
        outcome.state,
        DeviceState {
            muted: false,
            volume: 50
        }
    );
    assert_eq!(notifier.shown(), vec![(Icon::Medium, Progress::from_volume(50))]);
    assert_eq!(outcome.progress.to_string(), "0.50");
}

#[test]
fn unmute_precedes_volume_change() {
    let backend = output_at(40);
    backend.set_state(
        DeviceKind::Output,
        DeviceState {
            muted: true,
            volume: 40,
        },
    );
    let notifier = RecordingNotifier::new();
    let options = Options {
        unmute_on_change: true,
        ..Options::default()
    };
    let outcome = execute(Command::Increase(10), &options, &backend, &notifier).unwrap();

    assert_eq!(
        backend.calls(),
        vec![
            "set_mute(output, default, false)",
            "set_volume(output, default, +10%)",
            "get_mute(output, default)",
            "get_volume(output, default)",
        ]
    );
    assert_eq!(outcome.icon, Icon::Medium);
    assert_eq!(outcome.state.volume, 50);
}

#[test]
fn unmute_flag_is_ignored_for_mute_commands() {
    let backend = output_at(40);
    let options = Options {
        unmute_on_change: true,
        ..Options::default()
    };
    execute(Command::Mute, &options, &backend, &RecordingNotifier::new()).unwrap();
    assert_eq!(backend.calls()[0], "set_mute(output, default, true)");
    assert!(!backend.calls_contains("set_volume"));
}

#[test]
fn over_limit_volume_is_clamped_without_boost() {
    let backend = output_at(95);
    let notifier = RecordingNotifier::new();
    let outcome =
        execute(Command::Increase(10), &Options::default(), &backend, &notifier).unwrap();

    assert!(outcome.clamped);
    assert_eq!(
        backend.calls().last().map(String::as_str),
        Some("set_volume(output, default, 100%)")
    );
    assert_eq!(backend.peek(DeviceKind::Output).volume, 100);
    assert_eq!(outcome.state.volume, 100);
    assert_eq!(notifier.shown(), vec![(Icon::High, Progress::from_volume(100))]);
}

#[test]
fn boost_allows_over_limit_volume() {
    let backend = output_at(95);
    let notifier = RecordingNotifier::new();
    let options = Options {
        allow_boost: true,
        ..Options::default()
    };
    let outcome = execute(Command::Increase(10), &options, &backend, &notifier).unwrap();

    assert!(!outcome.clamped);
    assert_eq!(backend.peek(DeviceKind::Output).volume, 105);
    assert_eq!(outcome.progress.to_string(), "1.00");
    assert_eq!(outcome.icon, Icon::High);
}

#[test]
fn mute_commands_never_clamp() {
    let backend = output_at(130);
    let outcome = execute(
        Command::ToggleMute,
        &Options::default(),
        &backend,
        &RecordingNotifier::new(),
    )
    .unwrap();
    assert!(!outcome.clamped);
    assert_eq!(outcome.icon, Icon::Muted);
    assert_eq!(backend.peek(DeviceKind::Output).volume, 130);
}

#[test]
fn toggle_twice_restores_mute_state() {
    let backend = output_at(30);
    let notifier = RecordingNotifier::new();
    let options = Options::default();
    let first = execute(Command::ToggleMute, &options, &backend, &notifier).unwrap();
    let second = execute(Command::ToggleMute, &options, &backend, &notifier).unwrap();
    assert!(first.state.muted);
    assert!(!second.state.muted);
    assert_eq!(
        notifier.shown(),
        vec![
            (Icon::Muted, Progress::from_volume(30)),
            (Icon::Low, Progress::from_volume(30)),
        ]
    );
}

#[test]
fn input_device_uses_mic_icons() {
    let backend = MockBackend::new();
    let notifier = RecordingNotifier::new();
    let options = Options {
        kind: DeviceKind::Input,
        ..Options::default()
    };
    execute(Command::Mute, &options, &backend, &notifier).unwrap();
    execute(Command::Unmute, &options, &backend, &notifier).unwrap();

    assert!(backend.calls().iter().all(|c| c.contains("(input")));
    let icons: Vec<Icon> = notifier.shown().into_iter().map(|(i, _)| i).collect();
    assert_eq!(icons, vec![Icon::MicMuted, Icon::MicUnmuted]);
}

#[test]
fn running_device_is_targeted_when_requested() {
    let backend = output_at(50);
    backend.set_running(Some("bluez_output.headset"));
    let options = Options {
        target: TargetMode::Running,
        ..Options::default()
    };
    let outcome = execute(Command::Decrease(5), &options, &backend, &RecordingNotifier::new())
        .unwrap();

    assert_eq!(
        outcome.target,
        DeviceTarget::Named("bluez_output.headset".into())
    );
    assert_eq!(
        backend.calls()[..2],
        [
            "query_running(output)".to_string(),
            "set_volume(output, bluez_output.headset, -5%)".to_string(),
        ]
    );
}

#[test]
fn running_mode_falls_back_to_default() {
    let backend = output_at(50);
    let options = Options {
        target: TargetMode::Running,
        ..Options::default()
    };
    let outcome =
        execute(Command::Set(10), &options, &backend, &RecordingNotifier::new()).unwrap();
    assert_eq!(outcome.target, DeviceTarget::Default);
    assert!(backend.calls_contains("set_volume(output, default, 10%)"));
}

#[test]
fn failed_unmute_aborts_before_volume_change() {
    let backend = output_at(50);
    backend.set_fail_set_mute(true);
    let notifier = RecordingNotifier::new();
    let options = Options {
        unmute_on_change: true,
        ..Options::default()
    };
    let err = execute(Command::Increase(5), &options, &backend, &notifier).unwrap_err();

    assert!(matches!(err, Error::CommandFailed { .. }));
    assert_eq!(backend.calls(), vec!["set_mute(output, default, false)"]);
    assert!(notifier.shown().is_empty());
}

#[test]
fn failed_volume_change_is_not_rolled_back() {
    let backend = output_at(50);
    backend.set_state(
        DeviceKind::Output,
        DeviceState {
            muted: true,
            volume: 50,
        },
    );
    backend.set_fail_set_volume(true);
    let options = Options {
        unmute_on_change: true,
        ..Options::default()
    };
    assert!(execute(Command::Set(70), &options, &backend, &RecordingNotifier::new()).is_err());
    assert!(!backend.peek(DeviceKind::Output).muted);
}

#[test]
fn notifier_failure_does_not_fail_invocation() {
    let backend = output_at(50);
    let notifier = RecordingNotifier::new();
    notifier.set_fail(true);
    let outcome = execute(Command::Set(80), &Options::default(), &backend, &notifier).unwrap();
    assert_eq!(outcome.icon, Icon::High);
    assert_eq!(notifier.shown().len(), 1);
}

#[test]
fn bad_magnitude_touches_nothing() {
    let backend = MockBackend::new();
    let notifier = RecordingNotifier::new();
    let result = Command::parse(&["up", "loud"])
        .and_then(|cmd| execute(cmd, &Options::default(), &backend, &notifier));

    assert!(matches!(result, Err(Error::InvalidArguments(_))));
    assert!(backend.calls().is_empty());
    assert!(notifier.shown().is_empty());
}

#[test]
fn unparsable_backend_volume_is_a_backend_error() {
    let runner = ScriptedRunner::new()
        .respond("get-sink-mute", "Mute: no\n")
        .respond("get-sink-volume", "Volume: (unavailable)\n");
    let backend = PactlBackend::with_runner("pactl", runner);
    let notifier = RecordingNotifier::new();
    let err = execute(Command::Set(50), &Options::default(), &backend, &notifier).unwrap_err();

    assert!(matches!(err, Error::Backend(_)));
    assert!(notifier.shown().is_empty());
    assert_eq!(
        backend.runner().calls(),
        vec![
            "pactl -- set-sink-volume @DEFAULT_SINK@ 50%",
            "pactl -- get-sink-mute @DEFAULT_SINK@",
            "pactl -- get-sink-volume @DEFAULT_SINK@",
        ]
    );
}

#[test]
fn pactl_clamp_sequence() {
    let runner = ScriptedRunner::new()
        .respond("get-source-mute", "Mute: no\n")
        .respond("get-source-volume", "Volume: mono: 72089 / 110% / 2.48 dB\n");
    let backend = PactlBackend::with_runner("pactl", runner);
    let notifier = RecordingNotifier::new();
    let options = Options {
        kind: DeviceKind::Input,
        unmute_on_change: true,
        ..Options::default()
    };
    let outcome = execute(Command::Increase(20), &options, &backend, &notifier).unwrap();

    assert!(outcome.clamped);
    assert_eq!(outcome.icon, Icon::MicUnmuted);
    assert_eq!(
        backend.runner().calls(),
        vec![
            "pactl -- set-source-mute @DEFAULT_SOURCE@ false",
            "pactl -- set-source-volume @DEFAULT_SOURCE@ +20%",
            "pactl -- get-source-mute @DEFAULT_SOURCE@",
            "pactl -- get-source-volume @DEFAULT_SOURCE@",
            "pactl -- set-source-volume @DEFAULT_SOURCE@ 100%",
        ]
    );
}
