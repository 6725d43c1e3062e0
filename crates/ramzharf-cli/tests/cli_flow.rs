use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

const ACCOUNT_PASSWORD: &str = "correct-horse";
const NOTE_PASSWORD: &str = "pw123456";

fn bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_ramzharf"))
}

struct Sandbox {
    _root: TempDir,
    config_home: PathBuf,
    data_home: PathBuf,
}

impl Sandbox {
    fn new() -> Self {
        let root = TempDir::new().expect("tempdir should succeed");
        let config_home = root.path().join("config");
        let data_home = root.path().join("data");
        std::fs::create_dir_all(&config_home).expect("create config dir");
        std::fs::create_dir_all(&data_home).expect("create data dir");
        Self {
            _root: root,
            config_home,
            data_home,
        }
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(bin());
        cmd.env("XDG_CONFIG_HOME", &self.config_home)
            .env("XDG_DATA_HOME", &self.data_home)
            .env_remove("RAMZHARF_CONFIG")
            .env_remove("RAMZHARF_DB")
            .env_remove("RAMZHARF_LOG")
            .env("NO_COLOR", "1")
            .env("RAMZHARF_PASSWORD", ACCOUNT_PASSWORD)
            .env("RAMZHARF_NOTE_PASSWORD", NOTE_PASSWORD);
        cmd
    }

    fn run(&self, args: &[&str]) -> Output {
        self.command()
            .args(args)
            .output()
            .expect("run ramzharf should succeed")
    }

    fn run_with_password(&self, args: &[&str], password: &str) -> Output {
        self.command()
            .env("RAMZHARF_PASSWORD", password)
            .args(args)
            .output()
            .expect("run ramzharf should succeed")
    }

    fn session_path(&self) -> PathBuf {
        self.data_home.join("ramzharf").join("session.json")
    }

    fn config_path(&self) -> PathBuf {
        self.config_home.join("ramzharf").join("config.toml")
    }
}

fn assert_success(output: &Output, what: &str) {
    assert!(
        output.status.success(),
        "{} failed: {}",
        what,
        String::from_utf8_lossy(&output.stderr)
    );
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

#[cfg(unix)]
fn assert_private(path: &Path) {
    use std::os::unix::fs::PermissionsExt;
    let mode = std::fs::metadata(path).expect("metadata").permissions().mode();
    assert_eq!(mode & 0o777, 0o600, "{} is not owner-only", path.display());
}

#[cfg(not(unix))]
fn assert_private(_path: &Path) {}

#[test]
fn test_note_lifecycle_through_cli() {
    let sandbox = Sandbox::new();

    assert_success(&sandbox.run(&["init", "--quiet"]), "init");
    assert_private(&sandbox.config_path());

    let again = sandbox.run(&["init"]);
    assert_eq!(again.status.code(), Some(4));

    assert_success(
        &sandbox.run(&["register", "alice", "--no-input", "--quiet"]),
        "register",
    );
    assert_private(&sandbox.session_path());

    let whoami = sandbox.run(&["whoami", "--json"]);
    assert_success(&whoami, "whoami");
    let user: serde_json::Value =
        serde_json::from_str(&stdout(&whoami)).expect("whoami json should parse");
    assert_eq!(user["username"], "alice");

    let created = sandbox.run(&[
        "note",
        "create",
        "--body",
        "hello world",
        "--json",
        "--no-input",
    ]);
    assert_success(&created, "note create");
    let note: serde_json::Value =
        serde_json::from_str(&stdout(&created)).expect("note json should parse");
    let id = note["id"].as_str().expect("note id").to_string();
    assert!(!stdout(&created).contains("hello world"));

    let shown = sandbox.run(&["note", "show", &id, "--no-input", "--quiet"]);
    assert_success(&shown, "note show");
    assert_eq!(stdout(&shown).trim(), "hello world");

    let wrong = sandbox
        .command()
        .env("RAMZHARF_NOTE_PASSWORD", "pw12345")
        .args(["note", "show", &id, "--no-input"])
        .output()
        .expect("run ramzharf should succeed");
    assert_eq!(wrong.status.code(), Some(5));
    assert!(!stdout(&wrong).contains("hello world"));

    let listed = sandbox.run(&["note", "list", "--json"]);
    assert_success(&listed, "note list");
    let notes: serde_json::Value =
        serde_json::from_str(&stdout(&listed)).expect("list json should parse");
    assert_eq!(notes.as_array().map(Vec::len), Some(1));

    assert_success(&sandbox.run(&["note", "delete", &id, "--quiet"]), "delete");
    let gone = sandbox.run(&["note", "show", &id, "--no-input"]);
    assert_eq!(gone.status.code(), Some(3));

    assert_success(&sandbox.run(&["logout", "--quiet"]), "logout");
    assert!(!sandbox.session_path().exists());

    let after = sandbox.run(&["whoami"]);
    assert_eq!(after.status.code(), Some(5));
}

#[test]
fn test_expired_note_exits_gone_and_unknown_exits_not_found() {
    let sandbox = Sandbox::new();
    assert_success(&sandbox.run(&["init", "--quiet"]), "init");
    assert_success(
        &sandbox.run(&["register", "alice", "--no-input", "--quiet"]),
        "register",
    );

    let created = sandbox.run(&[
        "note",
        "create",
        "--body",
        "short lived",
        "--expires-in",
        "1s",
        "--json",
        "--no-input",
    ]);
    assert_success(&created, "note create");
    let note: serde_json::Value =
        serde_json::from_str(&stdout(&created)).expect("note json should parse");
    let id = note["id"].as_str().expect("note id").to_string();

    std::thread::sleep(std::time::Duration::from_millis(2100));

    let expired = sandbox.run(&["note", "show", &id, "--no-input"]);
    assert_eq!(expired.status.code(), Some(7));
    assert!(!stdout(&expired).contains("short lived"));

    let unknown = sandbox.run(&[
        "note",
        "show",
        "00000000-0000-4000-8000-000000000000",
        "--no-input",
    ]);
    assert_eq!(unknown.status.code(), Some(3));

    let too_far = sandbox.run(&[
        "note",
        "create",
        "--body",
        "forever",
        "--expires-in",
        "1000000000000d",
        "--no-input",
    ]);
    assert_eq!(too_far.status.code(), Some(4));
}

#[test]
fn test_lockout_after_repeated_failures() {
    let sandbox = Sandbox::new();
    assert_success(&sandbox.run(&["init", "--quiet"]), "init");
    assert_success(
        &sandbox.run(&["register", "alice", "--no-input", "--quiet"]),
        "register",
    );

    for attempt in 0..5 {
        let output = sandbox.run_with_password(&["login", "alice", "--no-input"], "wrong-pass");
        assert_eq!(output.status.code(), Some(5), "attempt {}", attempt);
    }

    let locked = sandbox.run(&["login", "alice", "--no-input"]);
    assert_eq!(locked.status.code(), Some(6));
}

#[test]
fn test_refresh_rotates_stored_session() {
    let sandbox = Sandbox::new();
    assert_success(&sandbox.run(&["init", "--quiet"]), "init");
    assert_success(
        &sandbox.run(&["register", "alice", "--no-input", "--quiet"]),
        "register",
    );

    let before = std::fs::read_to_string(sandbox.session_path()).expect("read session");
    assert_success(&sandbox.run(&["refresh", "--quiet"]), "refresh");
    let after = std::fs::read_to_string(sandbox.session_path()).expect("read session");
    assert_ne!(before, after);

    let parsed: serde_json::Value = serde_json::from_str(&after).expect("session json");
    assert_eq!(parsed["username"], "alice");
    assert!(parsed["accessToken"].is_string());
    assert!(parsed["refreshToken"].is_string());
}

#[test]
fn test_standalone_encrypt_then_decrypt() {
    let sandbox = Sandbox::new();

    let sealed = sandbox.run(&["encrypt", "--body", "offline secret", "--no-input"]);
    assert_success(&sealed, "encrypt");
    let value: serde_json::Value =
        serde_json::from_str(&stdout(&sealed)).expect("sealed json should parse");
    let ciphertext = value["ciphertext"].as_str().expect("ciphertext");
    let salt = value["salt"].as_str().expect("salt");

    let opened = sandbox.run(&[
        "decrypt",
        "--ciphertext",
        ciphertext,
        "--salt",
        salt,
        "--no-input",
    ]);
    assert_success(&opened, "decrypt");
    assert_eq!(stdout(&opened).trim(), "offline secret");
}

#[test]
fn test_commands_without_init_point_at_init() {
    let sandbox = Sandbox::new();
    let output = sandbox.run(&["note", "list"]);
    assert_eq!(output.status.code(), Some(3));
    assert!(String::from_utf8_lossy(&output.stderr).contains("ramzharf init"));
}
