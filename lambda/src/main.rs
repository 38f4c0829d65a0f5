use std::{io::stdout, path::PathBuf};

use anyhow::{bail, Context as _, Result};
use clap::Parser;
use crossterm::{
    cursor::MoveTo,
    execute,
    terminal::{Clear, ClearType},
};
use lambda::{
    config::{self, Config},
    library, Evaluator,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use util::repl::{self, Flow};

#[derive(Parser, Debug)]
#[command(version, about = "Untyped lambda calculus, reduced step by step", long_about = None)]
struct Args {
    /// Reduce this expression and exit instead of starting the REPL.
    #[arg(short, long)]
    eval: Option<String>,
    /// Library to import at start-up; may be repeated.
    #[arg(short, long = "import")]
    imports: Vec<String>,
    /// Library file used by `import`.
    #[arg(long)]
    library: Option<PathBuf>,
    /// Steps printed per expression.
    #[arg(long)]
    max_steps: Option<usize>,
    /// Do not read or write the history file.
    #[arg(long)]
    no_history: bool,
}

struct Session {
    evaluator: Evaluator,
    config: Config,
    library: String,
    help: String,
    last_ran: Option<String>,
}

impl Session {
    fn new(config: Config) -> Result<Self> {
        let read = |path: &Option<PathBuf>, bundled: &str| -> Result<String> {
            match path {
                Some(path) => std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read {}", path.display())),
                None => Ok(bundled.to_string()),
            }
        };
        let library = read(&config.library, library::PRELUDE)?;
        let help = read(&config.help, library::HELP)?;
        Ok(Self {
            evaluator: Evaluator::new(),
            config,
            library,
            help,
            last_ran: None,
        })
    }

    /// Prints every step of `input`, at most `max_steps` of them.
    fn run(&mut self, input: &str) {
        let mut sequence = self.evaluator.evaluate(input);
        for term in sequence.by_ref().take(self.config.max_steps) {
            match term {
                Ok(term) => println!("{term}"),
                Err(e) => eprintln!("{e}"),
            }
        }
        if sequence.next().is_some() {
            println!("... stopped after {} steps", self.config.max_steps);
        }
        println!();
        self.last_ran = Some(input.to_string());
    }

    fn import(&mut self, names: &[&str]) -> Result<()> {
        if names.is_empty() {
            bail!("Usage: import LIBRARY...");
        }
        let defined = self.evaluator.import(&self.library, names)?;
        if defined.is_empty() {
            bail!("No library named {}", names.join(", "));
        }
        for name in &defined {
            let definition = self.evaluator.store().get(name).unwrap_or_default();
            println!("{name} := {definition}");
        }
        info!(count = defined.len(), total = self.evaluator.store().len(), "imported");
        println!();
        Ok(())
    }

    fn define(&mut self, args: &str) -> Result<()> {
        let args = args.trim();
        let (name, raw) = args.split_once(char::is_whitespace).unwrap_or((args, ""));
        if name.is_empty() {
            bail!("Usage: define NAME [EXPR]");
        }
        let raw = match raw.trim() {
            "" => self
                .last_ran
                .clone()
                .context("Nothing has been reduced yet")?,
            raw => raw.to_string(),
        };
        self.evaluator.define(name, &raw)?;
        println!("{name} := {}", self.evaluator.store().get(name).unwrap_or_default());
        Ok(())
    }

    fn names(&self) {
        for (name, definition) in self.evaluator.store().iter() {
            println!("{name} := {definition}");
        }
    }

    fn help(&self, topic: &str) {
        let topic = if topic.is_empty() { "default" } else { topic };
        match library::topic(&self.help, topic) {
            Some(text) => println!("{}", text.trim_end()),
            None => warn!(topic, "no help available"),
        }
    }

    fn handle(&mut self, input: &str) -> Result<Flow> {
        let input = input.trim();
        let (cmd, args) = input.split_once(char::is_whitespace).unwrap_or((input, ""));
        match cmd {
            "" => {}
            "import" => self.import(&args.split_whitespace().collect::<Vec<_>>())?,
            "define" => self.define(args)?,
            "names" => self.names(),
            "help" => self.help(args.trim()),
            "clear" => execute!(stdout(), Clear(ClearType::All), MoveTo(0, 0))?,
            "exit" => return Ok(Flow::Exit),
            _ => self.run(input),
        }
        Ok(Flow::Continue)
    }
}

impl repl::Repl for Session {
    type Error = anyhow::Error;
    fn prompt(&self) -> &str {
        &self.config.prompt
    }
    fn history(&self) -> Option<PathBuf> {
        self.config.history.clone()
    }
    fn evaluate(&mut self, input: String) -> Result<Flow, Self::Error> {
        match self.handle(&input) {
            Ok(flow) => Ok(flow),
            Err(e) => {
                eprintln!("{e:#}");
                Ok(Flow::Continue)
            }
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let mut config: Config = config::load_base_config()
        .extract()
        .context("Invalid configuration")?;
    config.imports.extend(args.imports);
    if let Some(library) = args.library {
        config.library = Some(library);
    }
    if let Some(max_steps) = args.max_steps {
        config.max_steps = max_steps;
    }
    if args.no_history {
        config.history = None;
    }

    let mut session = Session::new(config)?;
    let imports = session.config.imports.clone();
    if !imports.is_empty() {
        session.import(&imports.iter().map(String::as_str).collect::<Vec<_>>())?;
    }

    if let Some(input) = args.eval {
        session.run(&input);
        return Ok(());
    }
    session.help("start");
    repl::start_repl(session)?;
    Ok(())
}
