use crate::error::{CoreResult, command_failed_error, command_start_error};
use std::process::{Command, Output};

fn program_name(cmd: &Command) -> String {
    cmd.get_program().to_string_lossy().into_owned()
}

/// Renders a command line for logging.
pub fn describe(cmd: &Command) -> String {
    let mut line = program_name(cmd);
    for arg in cmd.get_args() {
        line.push(' ');
        line.push_str(&arg.to_string_lossy());
    }
    line
}

/// Runs a command and returns its output whatever the exit status.
pub fn capture(cmd: &mut Command) -> CoreResult<Output> {
    log::debug!("Running: {}", describe(cmd));
    cmd.output().map_err(|e| {
        log::error!("Failed to execute {}: {}", program_name(cmd), e);
        command_start_error(program_name(cmd), e)
    })
}

/// Runs a command and fails on a non-zero exit status.
pub fn run_command(cmd: &mut Command) -> CoreResult<Output> {
    let output = capture(cmd)?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        log::error!(
            "{} failed with exit code {}: {}",
            program_name(cmd),
            output.status.code().unwrap_or(-1),
            stderr
        );
        return Err(command_failed_error(program_name(cmd), output.status, stderr));
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;

    #[test]
    fn test_describe() {
        let mut cmd = Command::new("gdalwarp");
        cmd.args(["-of", "GTiff", "in.vrt", "out.tif"]);
        assert_eq!(describe(&cmd), "gdalwarp -of GTiff in.vrt out.tif");
    }

    #[test]
    fn test_run_command_echo() {
        let mut cmd = Command::new("echo");
        cmd.arg("test");
        let output = run_command(&mut cmd).unwrap();
        assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "test");
    }

    #[test]
    fn test_run_command_failure() {
        let mut cmd = Command::new("false");
        let err = run_command(&mut cmd).unwrap_err();
        assert!(matches!(err, CoreError::CommandFailed(..)));
    }

    #[test]
    fn test_capture_missing_program() {
        let mut cmd = Command::new("surely-not-a-program-42");
        let err = capture(&mut cmd).unwrap_err();
        assert!(matches!(err, CoreError::CommandStart(..)));
    }
}
