use colored::Colorize;
use ctorgen_core::constructor::{
    FieldDescriptor, NegotiationError, PresenterResponse, SelectionPresenter,
};
use std::io::{BufRead, Write};

/// Asks on a terminal which fields become constructor parameters.
///
/// Candidates are listed from 1. An empty answer or `all` keeps every field,
/// `none` keeps none, `q`/`quit`/`cancel` or end of input cancels, and anything
/// else is read as a list of numbers or binding names separated by commas or
/// spaces. Invalid answers are reported and asked again.
pub struct TerminalPresenter<R, W> {
    input: R,
    output: W,
    title: String,
}

impl TerminalPresenter<std::io::StdinLock<'static>, anstream::Stderr> {
    pub fn stdio(struct_name: &str) -> Self {
        Self::new(std::io::stdin().lock(), anstream::stderr(), struct_name)
    }
}

impl<R: BufRead, W: Write> TerminalPresenter<R, W> {
    pub fn new(input: R, output: W, struct_name: &str) -> Self {
        Self {
            input,
            output,
            title: format!("Generate constructor for {struct_name}"),
        }
    }

    fn list(&mut self, candidates: &[FieldDescriptor]) -> std::io::Result<()> {
        writeln!(self.output, "{}", self.title.bold())?;
        for (number, candidate) in candidates.iter().enumerate() {
            let number = format!("{:>3}.", number + 1);
            writeln!(self.output, "{} {}", number.cyan(), candidate.label())?;
        }
        Ok(())
    }

    fn ask(&mut self) -> std::io::Result<Option<String>> {
        write!(
            self.output,
            "{} ",
            "Parameters [all | none | 1,2,.. | names | q]:".dimmed()
        )?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }
}

impl<R: BufRead, W: Write> SelectionPresenter for TerminalPresenter<R, W> {
    fn present(
        &mut self,
        candidates: &[FieldDescriptor],
    ) -> Result<PresenterResponse, NegotiationError> {
        let io_error = |e: std::io::Error| NegotiationError::Presenter(e.to_string());

        self.list(candidates).map_err(io_error)?;

        loop {
            let Some(line) = self.ask().map_err(io_error)? else {
                writeln!(self.output).map_err(io_error)?;
                return Ok(PresenterResponse::Cancelled);
            };

            match parse_answer(&line, candidates) {
                Ok(response) => return Ok(response),
                Err(message) => {
                    writeln!(self.output, "{}", message.red()).map_err(io_error)?;
                }
            }
        }
    }
}

/// Interpret one answer line against the offered candidates.
pub fn parse_answer(
    answer: &str,
    candidates: &[FieldDescriptor],
) -> Result<PresenterResponse, String> {
    let answer = answer.trim();

    if let Some(index) = candidates.iter().position(|c| c.binding_name == answer) {
        return Ok(PresenterResponse::Chosen(vec![index]));
    }

    match answer.to_ascii_lowercase().as_str() {
        "" | "all" => return Ok(PresenterResponse::Chosen((0..candidates.len()).collect())),
        "none" => return Ok(PresenterResponse::Chosen(Vec::new())),
        "q" | "quit" | "cancel" => return Ok(PresenterResponse::Cancelled),
        _ => {}
    }

    answer
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .map(|token| resolve_token(token, candidates))
        .collect::<Result<Vec<_>, _>>()
        .map(PresenterResponse::Chosen)
}

fn resolve_token(token: &str, candidates: &[FieldDescriptor]) -> Result<usize, String> {
    if let Some(index) = candidates.iter().position(|c| c.binding_name == token) {
        return Ok(index);
    }

    match token.parse::<usize>() {
        Ok(number) if (1..=candidates.len()).contains(&number) => Ok(number - 1),
        Ok(number) => Err(format!(
            "{number} is not between 1 and {}",
            candidates.len()
        )),
        Err(_) => Err(format!("'{token}' is neither a number nor a field name")),
    }
}
