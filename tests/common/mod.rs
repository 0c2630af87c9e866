use std::fs;
use std::path::PathBuf;
use std::process::{Command, ExitStatus};
use std::sync::atomic::{AtomicU64, Ordering};

/// Env vars scrubbed before every case so the host machine cannot skew
/// output-mode or catalog resolution.
const SCRUBBED_ENV: &[&str] = &[
    "SIB_OUTPUT_FORMAT",
    "SIB_CATALOG_FILE",
    "SIB_VIEW_DEFAULT_FILTER",
    "SIB_VIEW_DEFAULT_SORT",
    "SIB_LOG_ENABLED",
];

pub struct CmdResult {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
    pub log_path: PathBuf,
}

pub fn run_cli_case(case_name: &str, args: &[&str]) -> CmdResult {
    run_cli_case_env(case_name, args, &[])
}

pub fn run_cli_case_env(case_name: &str, args: &[&str], envs: &[(&str, &str)]) -> CmdResult {
    let mut command = Command::new(binary_under_test());
    command.args(args).env("RUST_BACKTRACE", "1");
    for key in SCRUBBED_ENV {
        command.env_remove(key);
    }
    for (key, value) in envs {
        command.env(key, value);
    }
    let output = command.output().expect("execute sib command");

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
    let log_path = write_transcript(case_name, args, &output.status, &stdout, &stderr);

    CmdResult {
        status: output.status,
        stdout,
        stderr,
        log_path,
    }
}

fn binary_under_test() -> PathBuf {
    if let Some(path) = std::env::var_os("CARGO_BIN_EXE_sib") {
        return PathBuf::from(path);
    }
    // Fallback for runners that invoke the compiled test directly: the test
    // lives in target/<profile>/deps/, the binary two levels up.
    let name = if cfg!(windows) { "sib.exe" } else { "sib" };
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.ancestors().nth(2).map(|dir| dir.join(name)))
        .filter(|candidate| candidate.exists())
        .expect("locate the sib binary for integration tests")
}

/// Persist a per-case transcript so a failed assertion can point at the
/// full stdout/stderr instead of a truncated panic message.
fn write_transcript(
    case_name: &str,
    args: &[&str],
    status: &ExitStatus,
    stdout: &str,
    stderr: &str,
) -> PathBuf {
    static SEQ: AtomicU64 = AtomicU64::new(0);

    let dir = std::env::temp_dir().join("sib-test-logs");
    fs::create_dir_all(&dir).expect("create transcript dir");

    let slug: String = case_name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    let path = dir.join(format!(
        "{slug}-{}-{}.log",
        std::process::id(),
        SEQ.fetch_add(1, Ordering::Relaxed),
    ));

    let transcript = format!(
        "case={case_name}\nargs={args:?}\nstatus={status}\n\
         ----- stdout -----\n{stdout}\n----- stderr -----\n{stderr}\n",
    );
    fs::write(&path, transcript).expect("write transcript");
    path
}
