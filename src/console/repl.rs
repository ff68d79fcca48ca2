use std::io::{BufRead, Write};
use tracing::{debug, info};

use crate::ai::client::LanguageModel;
use crate::core::models::PipelineRun;
use crate::errors::ChainError;
use crate::pipeline::Pipeline;

pub const EXIT_SENTINEL: &str = "exit";
pub const PROMPT: &str = ">> ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command<'a> {
    Exit,
    Forward(&'a str),
}

/// Only the exact sentinel stops the loop; everything else, empty lines
/// included, is forwarded.
#[must_use]
pub fn parse_line(line: &str) -> Command<'_> {
    if line == EXIT_SENTINEL {
        Command::Exit
    } else {
        Command::Forward(line)
    }
}

fn console_error(error: std::io::Error) -> ChainError {
    ChainError::Console(error.to_string())
}

/// Line-at-a-time driver over any reader/writer pair.
pub struct ConsoleLoop<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> ConsoleLoop<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Read lines until `exit` or end of input, running each through the
    /// pipeline. Returns the number of completed turns.
    ///
    /// # Errors
    ///
    /// Stops at the first pipeline or console failure and returns it.
    pub async fn run<M: LanguageModel>(
        &mut self,
        pipeline: &mut Pipeline<M>,
    ) -> Result<usize, ChainError> {
        let mut turns = 0;

        loop {
            write!(self.output, "\n{PROMPT}").map_err(console_error)?;
            self.output.flush().map_err(console_error)?;

            let Some(line) = self.read_line()? else {
                debug!("End of input");
                break;
            };

            let input = match parse_line(&line) {
                Command::Exit => break,
                Command::Forward(raw) => raw,
            };

            let run = pipeline.run(input).await?;
            self.write_run(&run)?;
            turns += 1;
        }

        info!("Console loop finished after {} turns", turns);
        Ok(turns)
    }

    fn read_line(&mut self) -> Result<Option<String>, ChainError> {
        let mut line = String::new();
        let read = self.input.read_line(&mut line).map_err(console_error)?;
        if read == 0 {
            return Ok(None);
        }

        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        Ok(Some(line))
    }

    /// # Errors
    ///
    /// Returns [`ChainError::Console`] if the output cannot be written.
    pub fn write_run(&mut self, run: &PipelineRun) -> Result<(), ChainError> {
        writeln!(self.output, "\n[Human AI]:\n {}", run.input).map_err(console_error)?;
        writeln!(self.output, "\n[Cockney AI]:\n {}", run.stage_a_output).map_err(console_error)?;
        writeln!(self.output, "\n[Translated AI]:\n {}", run.stage_b_output)
            .map_err(console_error)?;
        self.output.flush().map_err(console_error)
    }

    pub fn into_output(self) -> W {
        self.output
    }
}
