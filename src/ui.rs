use crossterm::{
    cursor::MoveToPreviousLine,
    queue,
    terminal::{Clear, ClearType},
    tty::IsTty,
};
use std::io::{self, BufRead, StdinLock, Stdout, Write};

/// Predicate applied to a raw answer before `ask` accepts it.
pub type Validator<'a> = &'a dyn Fn(&str) -> bool;

/// The two question shapes the prompt engine knows how to ask.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    /// Free-form answer, optionally checked by a validator.
    Input,
    /// Yes/no answer, only `y` or `n` (any case) is accepted.
    #[allow(dead_code)]
    Confirm,
}

/// ANSI color codes used for every line the tool writes.
///
/// Either every field holds an escape sequence or every field is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub cyan: &'static str,
    pub green: &'static str,
    pub red: &'static str,
    pub white: &'static str,
    pub grey: &'static str,
}

impl Palette {
    pub const fn ansi() -> Self {
        Self {
            cyan: "\x1b[0;96m",
            green: "\x1b[0;92m",
            red: "\x1b[0;91m",
            white: "\x1b[0;97m",
            grey: "\x1b[1;30m",
        }
    }

    pub const fn plain() -> Self {
        Self {
            cyan: "",
            green: "",
            red: "",
            white: "",
            grey: "",
        }
    }

    /// Picks the palette for this process from the state of stdout.
    ///
    /// Runs the one-time Windows console fix before anything is printed.
    pub fn detect() -> Self {
        let palette = Self::for_terminal(io::stdout().is_tty());
        if !palette.is_plain() && runs_on_windows(std::env::var("OS").ok().as_deref()) {
            enable_ansi_support();
        }
        palette
    }

    pub fn for_terminal(is_terminal: bool) -> Self {
        if is_terminal {
            Self::ansi()
        } else {
            Self::plain()
        }
    }

    pub fn is_plain(&self) -> bool {
        self.entries().iter().all(|code| code.is_empty())
    }

    fn entries(&self) -> [&'static str; 5] {
        [self.cyan, self.green, self.red, self.white, self.grey]
    }
}

fn runs_on_windows(os: Option<&str>) -> bool {
    os.is_some_and(|value| value.to_lowercase().contains("windows"))
}

#[cfg(windows)]
fn enable_ansi_support() {
    if !crossterm::ansi_support::supports_ansi() {
        tracing::warn!("console refused ANSI escape processing, output may contain raw escapes");
    }
}

#[cfg(not(windows))]
fn enable_ansi_support() {
    tracing::debug!("OS reports windows but this build has no console API, skipping ANSI fix");
}

/// Renders questions and status lines, and reads answers back.
pub struct Prompter<R, W> {
    palette: Palette,
    input: R,
    output: W,
}

impl Prompter<StdinLock<'static>, Stdout> {
    pub fn stdio(palette: Palette) -> Self {
        Self::new(palette, io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(palette: Palette, input: R, output: W) -> Self {
        Self {
            palette,
            input,
            output,
        }
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }

    /// Writes `text` followed by a single space, without a newline.
    pub fn print(&mut self, text: &str) -> io::Result<()> {
        write!(self.output, "{}{} ", self.palette.white, text)?;
        self.output.flush()
    }

    /// Same as `print` but ends the line.
    pub fn line(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.output, "{}{}", self.palette.white, text)?;
        self.output.flush()
    }

    /// Asks `question` until an acceptable answer arrives and returns it.
    ///
    /// Confirm answers come back lowercased. When `recap` is set a
    /// `✓ question » answer` line is left behind on success.
    pub fn ask(
        &mut self,
        kind: PromptKind,
        question: &str,
        validator: Option<Validator<'_>>,
        recap: bool,
    ) -> io::Result<String> {
        loop {
            let answer = match kind {
                PromptKind::Input => {
                    let answer = self.read_answer(question)?;
                    if validator.is_some_and(|accepts| !accepts(&answer)) {
                        self.reject("× Invalid input. Try again.")?;
                        continue;
                    }
                    answer
                }
                PromptKind::Confirm => {
                    let decorated = format!("{} {}(y/n)", question, self.palette.grey);
                    let answer = self.read_answer(&decorated)?.to_lowercase();
                    if answer != "y" && answer != "n" {
                        self.reject("× Please answer with 'y' or 'n'.")?;
                        continue;
                    }
                    answer
                }
            };

            if recap {
                self.recap(question, &answer)?;
            }
            return Ok(answer);
        }
    }

    fn read_answer(&mut self, question: &str) -> io::Result<String> {
        let Palette {
            cyan, white, grey, ..
        } = self.palette;
        self.print(&format!("{cyan}? {white}{question} {grey}»{white}"))?;

        let mut raw = String::new();
        if self.input.read_line(&mut raw)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input closed while waiting for an answer",
            ));
        }

        // Only a real terminal echoed the answer, so only then is there a line to wipe.
        if !self.palette.is_plain() {
            queue!(self.output, MoveToPreviousLine(1), Clear(ClearType::CurrentLine))?;
        }

        Ok(raw.trim().to_string())
    }

    fn reject(&mut self, message: &str) -> io::Result<()> {
        let text = format!("{}{}{}", self.palette.red, message, self.palette.white);
        self.print(&text)
    }

    fn recap(&mut self, question: &str, answer: &str) -> io::Result<()> {
        let Palette {
            green, white, grey, ..
        } = self.palette;
        writeln!(
            self.output,
            "{green}✓{white} {question} {grey}»{white} {answer}"
        )?;
        self.output.flush()
    }
}
