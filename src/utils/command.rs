use crate::error::{GlideError, Result};
use std::collections::HashMap;
use std::io::Write;
use std::process::{Command, Stdio};
use tracing::debug;

/// Переменные окружения пользовательской сессии.
/// При запуске через sudo внешние утилиты должны видеть дисплей и шину вызвавшего пользователя.
fn build_env_overrides() -> HashMap<String, String> {
    let mut env_vars = HashMap::new();

    if std::env::var("USER").unwrap_or_default() == "root" {
        if let Ok(sudo_user) = std::env::var("SUDO_USER") {
            if let Ok(output) = Command::new("id").args(["-u", &sudo_user]).output() {
                if let Ok(uid_str) = String::from_utf8(output.stdout) {
                    let uid = uid_str.trim();
                    let user_runtime_dir = format!("/run/user/{}", uid);
                    let dbus_address = format!("unix:path={}/bus", user_runtime_dir);

                    debug!("Подставляем переменные окружения для пользователя {}: uid={}", sudo_user, uid);
                    env_vars.insert("DBUS_SESSION_BUS_ADDRESS".to_string(), dbus_address);
                    env_vars.insert("XDG_RUNTIME_DIR".to_string(), user_runtime_dir);
                    env_vars.insert("USER".to_string(), sudo_user);
                }
            }
        }
    }

    for key in ["DISPLAY", "WAYLAND_DISPLAY", "XAUTHORITY"] {
        if let Ok(value) = std::env::var(key) {
            env_vars.insert(key.to_string(), value);
        }
    }

    env_vars
}

/// Команда, запускаемая от имени пользователя сессии
pub fn user_command(program: &str, args: &[&str]) -> Command {
    let mut cmd = if let Ok(sudo_user) = std::env::var("SUDO_USER") {
        let mut cmd = Command::new("sudo");
        cmd.args(["-E", "-u", &sudo_user, program]);
        cmd.args(args);
        cmd
    } else {
        let mut cmd = Command::new(program);
        cmd.args(args);
        cmd
    };

    // Строим подстановки на лету без глобального кэша
    for (key, value) in build_env_overrides() {
        cmd.env(key, value);
    }

    cmd
}

/// Запустить утилиту и вернуть stdout при успешном завершении
pub fn run_for_output(program: &str, args: &[&str]) -> Result<String> {
    let output = user_command(program, args).output().map_err(|e| {
        debug!("{} не найден или не работает: {}", program, e);
        GlideError::Command(format!("{} не найден: {}", program, e))
    })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        debug!("{} вернул ошибку: {}", program, stderr.trim());
        return Err(GlideError::Command(format!("{} вернул ошибку: {}", program, stderr.trim())));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Запустить утилиту, передав `input` в stdin
pub fn run_with_input(program: &str, args: &[&str], input: &str) -> Result<()> {
    let mut child = user_command(program, args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| GlideError::Command(format!("{} не найден: {}", program, e)))?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(input.as_bytes())?;
    }

    let output = child.wait_with_output()?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(GlideError::Command(format!("{} вернул ошибку: {}", program, stderr.trim())));
    }

    Ok(())
}

/// Разобрать вывод вида `KEY=value` (формат `--shell` у xdotool)
pub fn parse_shell_output(output: &str) -> HashMap<&str, &str> {
    output
        .lines()
        .filter_map(|line| line.split_once('='))
        .map(|(key, value)| (key.trim(), value.trim()))
        .collect()
}
