use anyhow::{Context, Result};
use log::debug;
use std::process::{Command, Stdio};

/// Shell 命令的執行結果
#[derive(Debug, Clone)]
pub struct CommandOutput {
    /// 結束代碼（被信號終止時為 `None`）
    pub status_code: Option<i32>,
    /// stdout 與 stderr 合併後的輸出
    pub output: String,
}

impl CommandOutput {
    #[must_use]
    pub fn success(&self) -> bool {
        self.status_code == Some(0)
    }
}

fn shell_command(cmd: &str) -> Command {
    if cfg!(windows) {
        let mut command = Command::new("cmd");
        command.args(["/C", cmd]);
        command
    } else {
        let mut command = Command::new("sh");
        // stderr 併入 stdout，保持輸出順序
        command.args(["-c", &format!("exec 2>&1; {cmd}")]);
        command
    }
}

/// 透過系統 shell 執行命令並擷取輸出
pub fn run_cmd(cmd: &str) -> Result<CommandOutput> {
    debug!("執行命令: {cmd}");

    let output = shell_command(cmd)
        .stdin(Stdio::null())
        .output()
        .with_context(|| format!("無法執行命令: {cmd}"))?;

    let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
    text.push_str(&String::from_utf8_lossy(&output.stderr));

    Ok(CommandOutput {
        status_code: output.status.code(),
        output: text,
    })
}
