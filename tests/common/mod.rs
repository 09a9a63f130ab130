use std::process::{Command, Output};
use tempfile::TempDir;

/// Helper struct to run cadence commands in an isolated temp directory
pub struct CadenceTest {
    pub temp_dir: TempDir,
    binary_path: String,
}

impl CadenceTest {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");

        let binary_path = if cfg!(debug_assertions) {
            concat!(env!("CARGO_MANIFEST_DIR"), "/target/debug/cadence")
        } else {
            concat!(env!("CARGO_MANIFEST_DIR"), "/target/release/cadence")
        };

        let binary_path = if std::path::Path::new(binary_path).exists() {
            binary_path.to_string()
        } else {
            concat!(env!("CARGO_MANIFEST_DIR"), "/target/debug/cadence").to_string()
        };

        CadenceTest {
            temp_dir,
            binary_path,
        }
    }

    /// New harness with an already-initialized workspace
    pub fn initialized() -> Self {
        let test = Self::new();
        test.run_success(&["init"]);
        test
    }

    pub fn run(&self, args: &[&str]) -> Output {
        Command::new(&self.binary_path)
            .args(args)
            .current_dir(self.temp_dir.path())
            .output()
            .expect("Failed to execute cadence command")
    }

    pub fn run_success(&self, args: &[&str]) -> String {
        let output = self.run(args);
        if !output.status.success() {
            panic!(
                "Command {:?} failed with status {:?}\nstdout: {}\nstderr: {}",
                args,
                output.status,
                String::from_utf8_lossy(&output.stdout),
                String::from_utf8_lossy(&output.stderr)
            );
        }
        String::from_utf8_lossy(&output.stdout).to_string()
    }

    pub fn run_failure(&self, args: &[&str]) -> String {
        let output = self.run(args);
        assert!(
            !output.status.success(),
            "Command {:?} unexpectedly succeeded\nstdout: {}",
            args,
            String::from_utf8_lossy(&output.stdout)
        );
        String::from_utf8_lossy(&output.stderr).to_string()
    }

    /// Run a command with --json and parse its stdout
    pub fn run_json(&self, args: &[&str]) -> serde_json::Value {
        let mut args = args.to_vec();
        args.push("--json");
        let stdout = self.run_success(&args);
        serde_json::from_str(&stdout)
            .unwrap_or_else(|e| panic!("invalid JSON from {args:?}: {e}\n{stdout}"))
    }

    /// Add a member and return the generated id
    pub fn add_member(&self, name: &str, hours: &str) -> String {
        let json = self.run_json(&["member", "add", name, "--hours", hours]);
        json["id"].as_str().expect("member id").to_string()
    }
}
