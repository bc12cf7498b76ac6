//! Interactive prompts for run parameters not given on the command line

use std::fmt::Display;
use std::io::{self, BufRead, Write};
use std::str::FromStr;

use anyhow::{Result, bail};

use crate::hex_utils::parse_offset;

pub struct CliPrompter<R, W> {
    input: R,
    output: W,
}

impl CliPrompter<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> CliPrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    #[cfg(test)]
    pub fn into_parts(self) -> (R, W) {
        (self.input, self.output)
    }

    fn read_line(&mut self, prompt: &str) -> Result<String> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            bail!("Input closed while waiting for: {}", prompt.trim());
        }
        Ok(line.trim().to_string())
    }

    /// Ask for a non-empty line of text
    pub fn prompt_text(&mut self, prompt: &str) -> Result<String> {
        loop {
            let line = self.read_line(prompt)?;
            if !line.is_empty() {
                return Ok(line);
            }
            eprintln!("Value required, please try again");
        }
    }

    /// Ask until the answer parses as `T`
    pub fn prompt_number<T>(&mut self, prompt: &str) -> Result<T>
    where
        T: FromStr,
        T::Err: Display,
    {
        loop {
            let line = self.read_line(prompt)?;
            match line.parse::<T>() {
                Ok(n) => return Ok(n),
                Err(e) => eprintln!("Invalid number ({}), please try again", e),
            }
        }
    }

    /// Ask until the answer is a depth of at least 1
    pub fn prompt_depth(&mut self, prompt: &str) -> Result<u32> {
        loop {
            match self.prompt_number::<u32>(prompt)? {
                0 => eprintln!("Depth must be at least 1, please try again"),
                depth => return Ok(depth),
            }
        }
    }

    /// Ask for an offset in decimal or `0x` hex
    pub fn prompt_offset(&mut self, prompt: &str) -> Result<u64> {
        loop {
            let line = self.read_line(prompt)?;
            match parse_offset(&line) {
                Ok(n) => return Ok(n),
                Err(e) => eprintln!("{}, please try again", e),
            }
        }
    }
}
