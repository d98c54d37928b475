//! Line-oriented terminal front-end over a [`Session`].

use std::{io::Write, path::Path};

use abi_console::{
    connect, load, types::ContractCapability, Filter, Invocation, InvocationController,
    Resolution, Session,
};
use anyhow::{Context, Result};
use tokio::io::{stdin, AsyncBufReadExt, BufReader, Lines, Stdin};

const HELP: &str = "\
commands:
  list                     show the visible functions
  tabs                     show the filter tabs
  filter <text>            filter by name (`all` resets)
  open <n>                 expand or collapse panel n
  call <n>                 fill in panel n and execute it
  connect                  (re)connect the wallet
  load <abi-path> <addr>   load another contract
  status                   show the current status
  quit                     leave";

type Input = Lines<BufReader<Stdin>>;

pub struct Console<C> {
    session: Session,
    capability: C,
    lines: Input,
}

impl<C: ContractCapability> Console<C> {
    pub fn new(session: Session, capability: C) -> Self {
        Self {
            session,
            capability,
            lines: BufReader::new(stdin()).lines(),
        }
    }

    pub async fn connect(&mut self) {
        // Failures land in the session status.
        let _ = connect(&mut self.session, &self.capability).await;
        println!("{}", self.session.status());
    }

    pub fn set_filter(&mut self, filter: Filter) {
        self.session.set_filter(filter);
    }

    pub async fn load_file(&mut self, abi_path: &Path, address: &str) -> Result<()> {
        let interface = std::fs::read_to_string(abi_path)
            .with_context(|| format!("failed reading {}", abi_path.display()))?;
        let _ = load(&mut self.session, &mut self.capability, &interface, address).await;
        println!("{}", self.session.status());
        Ok(())
    }

    pub async fn run(&mut self) -> Result<()> {
        println!("{HELP}");
        self.list();
        loop {
            let Some(line) = prompt(&mut self.lines, "> ").await? else {
                return Ok(());
            };
            let words: Vec<&str> = line.split_whitespace().collect();
            match words.as_slice() {
                [] => {}
                ["quit" | "exit"] => return Ok(()),
                ["help"] => println!("{HELP}"),
                ["list" | "ls"] => self.list(),
                ["tabs"] => self.tabs(),
                ["filter", rest @ ..] => {
                    self.session.set_filter(Filter::parse(&rest.join(" ")));
                    self.list();
                }
                ["open", n] => match parse_index(n) {
                    Some(i) => match self.session.panel_mut(i) {
                        Ok(panel) => {
                            panel.toggle();
                            println!("{}", panel.render_text());
                        }
                        Err(err) => println!("{err}"),
                    },
                    None => println!("not a panel number: {n}"),
                },
                ["call", n] => match parse_index(n) {
                    Some(i) => self.call(i).await?,
                    None => println!("not a panel number: {n}"),
                },
                ["connect"] => self.connect().await,
                ["load", path, address] => {
                    if let Err(err) = self.load_file(Path::new(path), address).await {
                        println!("{err:#}");
                    }
                }
                ["status"] => println!("{}", self.session.status()),
                _ => println!("unknown command, try `help`"),
            }
        }
    }

    fn list(&self) {
        self.tabs();
        if self.session.panels().is_empty() {
            println!("(no functions)");
        }
        for (i, panel) in self.session.panels().iter().enumerate() {
            println!("{i}: {}", panel.render_text());
        }
        if let Some(output) = self.session.output() {
            println!("last output:\n{output}");
        }
    }

    fn tabs(&self) {
        let tabs: Vec<String> = Filter::tabs()
            .into_iter()
            .map(|tab| {
                if &tab == self.session.filter() {
                    format!("[{tab}]")
                } else {
                    format!(" {tab} ")
                }
            })
            .collect();
        println!("{}", tabs.join(" "));
    }

    /// Prompt for each input of panel `index`, then execute it. State-changing functions
    /// show a live fee estimate after every input and ask before submitting.
    async fn call(&mut self, index: usize) -> Result<()> {
        let Self {
            session,
            capability,
            lines,
        } = self;

        let (slots, read_only) = match session.panel(index) {
            Ok(panel) => (panel.inputs().to_vec(), panel.descriptor().is_read_only()),
            Err(err) => {
                println!("{err}");
                return Ok(());
            }
        };
        let controller = InvocationController::new(&*capability);

        for (i, slot) in slots.iter().enumerate() {
            let Some(text) = prompt(lines, &format!("{} [{}]: ", slot.label, slot.value)).await?
            else {
                return Ok(());
            };
            // An empty answer keeps the current value.
            if !text.trim().is_empty() {
                session.panel_mut(index)?.set_input(i, text.trim())?;
            }
            if !read_only {
                let readout = controller.live_estimate(session, index).await?;
                println!("  {readout}");
            }
        }

        match controller.execute_panel(session, index).await {
            Ok(Invocation::Output(output)) => println!("{output}"),
            Ok(Invocation::AwaitingConfirmation(request)) => {
                println!("{}", request.estimate);
                let answer = prompt(lines, &format!("{} [y/N] ", request.prompt)).await?;
                let accept = answer
                    .map(|a| matches!(a.trim().to_lowercase().as_str(), "y" | "yes"))
                    .unwrap_or(false);
                let mark = session.reported();
                if let Ok(Resolution::Cancelled) =
                    controller.resolve(session, request.token, accept).await
                {
                    println!("Cancelled.");
                    return Ok(());
                }
                for status in session.status_since(mark) {
                    println!("{status}");
                }
            }
            Err(_) => println!("{}", session.status()),
        }
        Ok(())
    }
}

fn parse_index(text: &str) -> Option<usize> {
    text.parse().ok()
}

async fn prompt(lines: &mut Input, message: &str) -> Result<Option<String>> {
    print!("{message}");
    std::io::stdout().flush()?;
    Ok(lines.next_line().await?)
}
