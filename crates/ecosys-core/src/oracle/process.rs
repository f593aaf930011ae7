//! Out-of-process oracle speaking line-delimited JSON over stdin/stdout.

use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

use ecosys_protocol::{
    decode_init_response, decode_tick_response, encode_call, InitRequest, InitResponse,
    OracleCall, RewardEvent, TickRequest, TickResponse,
};

use super::{Oracle, OracleError};

/// Spawned child process. `init` and `tick` block until one response line arrives;
/// `reward` and `save` are written without waiting.
pub struct ProcessOracle {
    command: String,
    child: Child,
    stdin: Option<ChildStdin>,
    stdout: BufReader<ChildStdout>,
}

impl ProcessOracle {
    pub fn spawn(program: &str, args: &[String]) -> Result<Self, OracleError> {
        let command = std::iter::once(program)
            .chain(args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ");

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|source| OracleError::Spawn {
                command: command.clone(),
                source,
            })?;

        let stdin = child.stdin.take();
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| OracleError::Failed("oracle stdout not captured".to_string()))?;

        tracing::info!(command = %command, pid = child.id(), "spawned oracle process");

        Ok(Self {
            command,
            child,
            stdin,
            stdout: BufReader::new(stdout),
        })
    }

    fn send(&mut self, call: &OracleCall) -> Result<(), OracleError> {
        let line = encode_call(call)?;
        let stdin = self.stdin.as_mut().ok_or(OracleError::Closed)?;
        writeln!(stdin, "{}", line)?;
        stdin.flush()?;
        Ok(())
    }

    fn receive(&mut self) -> Result<String, OracleError> {
        let mut line = String::new();
        let read = self.stdout.read_line(&mut line)?;
        if read == 0 {
            return Err(OracleError::Closed);
        }
        Ok(line)
    }
}

impl Oracle for ProcessOracle {
    fn init(&mut self, request: &InitRequest) -> Result<InitResponse, OracleError> {
        self.send(&OracleCall::Init(request.clone()))?;
        let line = self.receive()?;
        Ok(decode_init_response(&line)?)
    }

    fn tick(&mut self, request: &TickRequest) -> Result<TickResponse, OracleError> {
        self.send(&OracleCall::Tick(request.clone()))?;
        let line = self.receive()?;
        Ok(decode_tick_response(&line)?)
    }

    fn reward(&mut self, event: &RewardEvent) -> Result<(), OracleError> {
        self.send(&OracleCall::Reward(event.clone()))
    }

    fn save(&mut self) -> Result<(), OracleError> {
        self.send(&OracleCall::Save)
    }
}

impl Drop for ProcessOracle {
    fn drop(&mut self) {
        // Closing stdin is the shutdown signal; the child is expected to exit on EOF.
        drop(self.stdin.take());
        match self.child.wait() {
            Ok(status) => tracing::debug!(command = %self.command, %status, "oracle exited"),
            Err(err) => tracing::warn!(command = %self.command, error = %err, "oracle wait failed"),
        }
    }
}
