//! Companion viewer process control (OS boundary).
//!
//! Viewer — соседний исполняемый файл рядом с текущим бинарём. Запуск и
//! остановка по имени вынесены сюда целиком: ядро кольца про процессы
//! ничего не знает. Unix only.

use anyhow::{anyhow, Context, Result};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientMode {
    /// Запустить отсоединённым фоновым процессом.
    Run,
    /// Запустить в новом терминальном окне.
    RunWithConsole,
    /// Только выставить права исполнения, не запускать.
    CertifyOnly,
}

#[cfg(unix)]
pub fn run_client(
    exe_name: &str,
    mode: ClientMode,
    hostname: &str,
    workdir: Option<&Path>,
) -> Result<()> {
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use std::process::{Command, Stdio};

    let current = std::env::current_exe().context("resolve current executable")?;
    let dir = current
        .parent()
        .ok_or_else(|| anyhow!("current executable has no parent directory"))?;
    let exe = dir.join(exe_name);

    fs::set_permissions(&exe, fs::Permissions::from_mode(0o755))
        .with_context(|| format!("chmod viewer {}", exe.display()))?;

    match mode {
        ClientMode::CertifyOnly => {}
        ClientMode::Run => {
            let mut cmd = Command::new(&exe);
            if !hostname.is_empty() {
                cmd.arg(hostname);
            }
            cmd.stdin(Stdio::null())
                .stdout(Stdio::null())
                .stderr(Stdio::null());
            cmd.spawn()
                .with_context(|| format!("spawn viewer {}", exe.display()))?;
        }
        ClientMode::RunWithConsole => {
            let mut shell = String::new();
            if let Some(wd) = workdir {
                shell.push_str(&format!("mkdir -p {0} && cd {0} && ", wd.display()));
            }
            shell.push_str(&format!("gnome-terminal -e '{}", exe.display()));
            if !hostname.is_empty() {
                shell.push(' ');
                shell.push_str(hostname);
            }
            shell.push('\'');
            Command::new("sh")
                .arg("-c")
                .arg(&shell)
                .status()
                .with_context(|| format!("spawn viewer console {}", exe.display()))?;
        }
    }
    Ok(())
}

/// Послать SIGINT процессам, чей /proc/<pid>/exe содержит `name`.
/// `all == false` останавливает первый же найденный.
#[cfg(unix)]
pub fn kill_client(name: &str, all: bool) -> Result<()> {
    use std::fs;

    let entries = fs::read_dir("/proc").context("open /proc")?;
    for entry in entries {
        let entry = entry?;
        let file_name = entry.file_name();
        let pid = match file_name.to_str().and_then(|s| s.parse::<i32>().ok()) {
            Some(pid) => pid,
            None => continue,
        };
        let target = match fs::read_link(entry.path().join("exe")) {
            Ok(t) => t,
            Err(_) => continue, // чужой или уже умерший процесс
        };
        if target.to_string_lossy().contains(name) {
            log::debug!("detector: SIGINT to pid {} ({})", pid, target.display());
            unsafe {
                libc::kill(pid, libc::SIGINT);
            }
            if !all {
                break;
            }
        }
    }
    Ok(())
}

#[cfg(not(unix))]
pub fn run_client(
    _exe_name: &str,
    _mode: ClientMode,
    _hostname: &str,
    _workdir: Option<&Path>,
) -> Result<()> {
    Err(anyhow!("viewer process control is unix-only"))
}

#[cfg(not(unix))]
pub fn kill_client(_name: &str, _all: bool) -> Result<()> {
    Err(anyhow!("viewer process control is unix-only"))
}
