//! Unit tests for external command invocation and exit classification

use super::*;

mod exit_classification {
    use super::*;

    #[test]
    fn zero_is_success() {
        assert_eq!(classify_exit(Some(0), &[]), ExitDisposition::Success);
    }

    #[test]
    fn unlisted_nonzero_code_fails() {
        assert_eq!(classify_exit(Some(3), &[]), ExitDisposition::Failed(3));
        assert_eq!(classify_exit(Some(3), &[1, 2]), ExitDisposition::Failed(3));
    }

    #[test]
    fn listed_nonzero_code_is_ignored() {
        assert_eq!(classify_exit(Some(1), &[1]), ExitDisposition::Ignored(1));
    }

    #[test]
    fn sigint_exit_code_overrides_the_ignorable_set() {
        assert_eq!(
            classify_exit(Some(SIGINT_EXIT_CODE), &[SIGINT_EXIT_CODE]),
            ExitDisposition::Interrupted
        );
    }

    #[test]
    fn death_by_signal_is_interrupted() {
        assert_eq!(classify_exit(None, &[]), ExitDisposition::Interrupted);
    }
}

mod real_processes {
    use super::*;

    #[tokio::test]
    async fn successful_command_returns_ok() {
        let runner = ProcessRunner::new();
        runner.run(&Invocation::new("true")).await.unwrap();
    }

    #[tokio::test]
    async fn failure_carries_the_command_line_and_exit_code() {
        let runner = ProcessRunner::new();
        let invocation = Invocation::new("sh").args(["-c", "exit 7"]);

        match runner.run(&invocation).await {
            Err(SyncError::CommandFailed { command, code }) => {
                assert_eq!(code, 7);
                assert!(command.starts_with("sh -c"), "got: {command}");
            }
            other => panic!("expected CommandFailed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn ignorable_exit_code_is_not_an_error() {
        let runner = ProcessRunner::new();
        let invocation = Invocation::new("sh")
            .args(["-c", "exit 3"])
            .ignore_exit_code(3);
        runner.run(&invocation).await.unwrap();
    }

    #[tokio::test]
    async fn sigint_exit_status_propagates_as_interruption() {
        let runner = ProcessRunner::new();
        let invocation = Invocation::new("sh").args(["-c", "exit 130"]);
        assert!(matches!(
            runner.run(&invocation).await,
            Err(SyncError::Interrupted)
        ));
    }

    #[tokio::test]
    async fn runs_in_the_given_working_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("marker"), b"").unwrap();

        let runner = ProcessRunner::new();
        let invocation = Invocation::new("sh")
            .args(["-c", "test -e marker"])
            .current_dir(dir.path());
        runner.run(&invocation).await.unwrap();
    }
}

#[test]
fn display_renders_program_and_arguments() {
    let invocation = Invocation::new("git")
        .arg("clone")
        .arg("backup.example.com:notes");
    assert_eq!(invocation.to_string(), "git clone backup.example.com:notes");
}
