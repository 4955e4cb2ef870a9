#[cfg(test)]
mod tests {
    use clap::Parser;
    use log::LevelFilter;
    use metrodial::mode::TimerMode;
    use metrodial::*;
    use std::fs;
    use std::path::{Path, PathBuf};

    fn args(extra: &[&str], config: &Path) -> Args {
        let mut argv = vec!["metrodial", "--config", config.to_str().unwrap()];
        argv.extend_from_slice(extra);
        Args::parse_from(argv)
    }

    #[test]
    fn test_args_defaults() {
        let args = Args::parse_from(["metrodial"]);
        assert_eq!(args.bpm, None);
        assert_eq!(args.config, PathBuf::from("metrodial.toml"));
        assert!(!args.start);
        assert_eq!(args.mode, None);
    }

    #[test]
    fn test_args_flags() {
        let args = Args::parse_from([
            "metrodial", "--bpm", "144", "--start", "--mode", "timer", "--log-level", "warn",
        ]);
        assert_eq!(args.bpm, Some(144));
        assert!(args.start);
        assert_eq!(args.mode.as_deref(), Some("timer"));
        assert_eq!(args.log_level.as_deref(), Some("warn"));
    }

    #[test]
    fn test_missing_config_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load(&args(&[], &dir.path().join("absent.toml"))).unwrap();
        assert_eq!(settings.bpm.get(), 60);
        assert_eq!(settings.frame_rate_hz, 60);
        assert_eq!(settings.log_level, LevelFilter::Debug);
        assert_eq!(settings.mode, TimerMode::Metronome);
    }

    #[test]
    fn test_file_then_flags() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metrodial.toml");
        fs::write(
            &path,
            "bpm = 90\nclick_volume = 0.5\nmode = \"stopwatch\"\nasset_dir = \"sounds\"\n",
        )
        .unwrap();

        let from_file = Settings::load(&args(&[], &path)).unwrap();
        assert_eq!(from_file.bpm.get(), 90);
        assert_eq!(from_file.click_volume, 0.5);
        assert_eq!(from_file.high_tone().volume, 0.5);
        assert_eq!(from_file.mode, TimerMode::Stopwatch);
        assert_eq!(from_file.asset_dir, PathBuf::from("sounds"));

        let overridden =
            Settings::load(&args(&["--bpm", "500", "--mode", "timer"], &path)).unwrap();
        assert_eq!(overridden.bpm.get(), 300, "out-of-range tempo clamps");
        assert_eq!(overridden.mode, TimerMode::Timer);
    }

    #[test]
    fn test_invalid_settings_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metrodial.toml");
        fs::write(&path, "frame_rate_hz = 0\n").unwrap();
        let err = Settings::load(&args(&[], &path)).unwrap_err();
        assert!(matches!(err, SettingsError::Invalid { key: "frame_rate_hz", .. }));

        let err = Settings::load(&args(&["--mode", "alarm"], &dir.path().join("none.toml")))
            .unwrap_err();
        assert_eq!(err.to_string(), "invalid setting 'mode': Unknown timer mode: alarm");

        let err = Settings::load(&args(&["--log-level", "loud"], &dir.path().join("none.toml")))
            .unwrap_err();
        assert!(matches!(err, SettingsError::Invalid { key: "log_level", .. }));
    }
}
